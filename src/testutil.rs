//! Calibration image builder for unit tests.

use crate::bits::{Piece, pack};
use std::vec::Vec;

/// Words in a test image.
pub(crate) const IMAGE_WORDS: usize = 0x400;

/// A zero-filled calibration image that tests write fields into.
pub(crate) struct Image {
    words: Vec<u16>,
}

impl Image {
    pub(crate) fn new() -> Self {
        Self {
            words: std::vec![0; IMAGE_WORDS],
        }
    }

    /// An image with the version word set.
    pub(crate) fn with_version(version: u16) -> Self {
        let mut image = Self::new();
        image.set(0xc1, version);
        image
    }

    pub(crate) fn set(&mut self, offset: u32, word: u16) {
        self.words[offset as usize] = word;
    }

    /// Packs `value` into the window of words starting at `offset`.
    pub(crate) fn pack(&mut self, offset: u32, field: &[Piece], value: u16) {
        pack(&mut self.words[offset as usize..], field, value);
    }

    pub(crate) fn words(&self) -> &[u16] {
        &self.words
    }

    pub(crate) fn words_mut(&mut self) -> &mut [u16] {
        &mut self.words
    }
}
