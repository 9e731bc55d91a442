//! Word sources.
//!
//! A [`WordSource`] yields the 16-bit word stored at a given word offset of
//! the calibration store. Decoding reads strictly through this trait, so the
//! same decoder runs over an in-memory image, a serial EEPROM on an I2C bus
//! ([`I2cEeprom`]), a polled controller ([`Polled`]) or a source shared with
//! an interrupt handler (`SharedWordSource`, behind the `critical-section`
//! feature).

use crate::error::DecodeError;
use thiserror::Error;

mod i2c;
mod poll;
#[cfg(feature = "critical-section")]
mod shared;

pub use i2c::{I2cEeprom, I2cWordError};
pub use poll::{Polled, PollingWordSource};
#[cfg(feature = "critical-section")]
pub use shared::SharedWordSource;

/// A random-access store of 16-bit words.
pub trait WordSource {
    /// Error produced when a word cannot be read.
    type Error: core::fmt::Debug;

    /// Reads the word at word offset `offset`.
    fn read(&mut self, offset: u32) -> Result<u16, Self::Error>;
}

/// The requested offset lies past the end of an in-memory image.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[error("offset {offset:#06x} is outside the image")]
pub struct OutOfRange {
    /// Offending word offset.
    pub offset: u32,
}

impl WordSource for [u16] {
    type Error = OutOfRange;

    fn read(&mut self, offset: u32) -> Result<u16, OutOfRange> {
        usize::try_from(offset)
            .ok()
            .and_then(|index| self.get(index))
            .copied()
            .ok_or(OutOfRange { offset })
    }
}

impl<const N: usize> WordSource for [u16; N] {
    type Error = OutOfRange;

    fn read(&mut self, offset: u32) -> Result<u16, OutOfRange> {
        self.as_mut_slice().read(offset)
    }
}

impl<S: WordSource + ?Sized> WordSource for &mut S {
    type Error = S::Error;

    fn read(&mut self, offset: u32) -> Result<u16, S::Error> {
        (**self).read(offset)
    }
}

/// Sequential cursor over a [`WordSource`].
///
/// Read failures are tagged with the offset that failed.
pub(crate) struct WordReader<'a, S: ?Sized> {
    source: &'a mut S,
    offset: u32,
}

impl<'a, S: WordSource + ?Sized> WordReader<'a, S> {
    pub(crate) fn new(source: &'a mut S, offset: u32) -> Self {
        Self { source, offset }
    }

    /// Offset of the next word [`next_word`](Self::next_word) reads.
    pub(crate) fn offset(&self) -> u32 {
        self.offset
    }

    pub(crate) fn seek(&mut self, offset: u32) {
        self.offset = offset;
    }

    pub(crate) fn skip(&mut self, words: u32) {
        self.offset = self.offset.saturating_add(words);
    }

    /// Reads an arbitrary word without moving the cursor.
    pub(crate) fn read_at(&mut self, offset: u32) -> Result<u16, DecodeError<S::Error>> {
        self.source
            .read(offset)
            .map_err(|cause| DecodeError::WordSource { offset, cause })
    }

    pub(crate) fn next_word(&mut self) -> Result<u16, DecodeError<S::Error>> {
        let word = self.read_at(self.offset)?;
        self.skip(1);
        Ok(word)
    }

    /// Fills `buf` with consecutive words.
    pub(crate) fn read_into(&mut self, buf: &mut [u16]) -> Result<(), DecodeError<S::Error>> {
        for word in buf.iter_mut() {
            *word = self.next_word()?;
        }
        Ok(())
    }

    /// Reads a window of `N` consecutive words.
    pub(crate) fn read_group<const N: usize>(
        &mut self,
    ) -> Result<[u16; N], DecodeError<S::Error>> {
        let mut words = [0u16; N];
        self.read_into(&mut words)?;
        Ok(words)
    }
}
