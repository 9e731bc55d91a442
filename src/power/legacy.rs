//! Legacy (map 0) PCDAC calibration.
//!
//! Each pier is a 5-word group holding its PCDAC range and eleven 6-bit
//! power values. The PCDAC codes themselves are not stored: they are
//! interpolated between the range ends at fixed percentage break-points.

use super::PcdacChannel;
use crate::bits::{Field, Piece, unpack};
use crate::consts::{
    GROUP2_OFFSET, GROUP3_OFFSET, GROUP4_OFFSET, LEGACY_WORDS_PER_CHANNEL, MAX_PIERS,
    NUM_INTERCEPTS, PWR_STEP,
};
use crate::error::DecodeError;
use crate::freq::Band;
use crate::source::{WordReader, WordSource};
use crate::version::FormatVersion;
use heapless::Vec;

const INTERCEPTS_3: [u16; NUM_INTERCEPTS] = [0, 5, 10, 20, 30, 50, 70, 85, 90, 95, 100];
const INTERCEPTS_3_2: [u16; NUM_INTERCEPTS] = [0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

const PCDAC_MAX: Field = &[Piece::new(0, 10, 6)];
const PCDAC_MIN: Field = &[Piece::new(0, 4, 6)];
const POWER: [Field; NUM_INTERCEPTS] = [
    &[Piece::new(0, 0, 4).at(2), Piece::new(1, 14, 2)],
    &[Piece::new(1, 8, 6)],
    &[Piece::new(1, 2, 6)],
    &[Piece::new(1, 0, 2).at(4), Piece::new(2, 12, 4)],
    &[Piece::new(2, 6, 6)],
    &[Piece::new(2, 0, 6)],
    &[Piece::new(3, 10, 6)],
    &[Piece::new(3, 4, 6)],
    &[Piece::new(3, 0, 4).at(2), Piece::new(4, 14, 2)],
    &[Piece::new(4, 8, 6)],
    &[Piece::new(4, 2, 6)],
];

/// Percentage break-points used to place the PCDAC intercepts.
pub const fn intercept_table(version: FormatVersion) -> &'static [u16; NUM_INTERCEPTS] {
    if version.raw() < FormatVersion::V3_2.raw() {
        &INTERCEPTS_3
    } else {
        &INTERCEPTS_3_2
    }
}

/// Interpolates the PCDAC intercepts between `min` and `max`.
pub fn intercepts(version: FormatVersion, min: u16, max: u16) -> [u16; NUM_INTERCEPTS] {
    let (min, max) = (u32::from(min), u32::from(max));
    let mut pcdac = [0u16; NUM_INTERCEPTS];
    for (code, &percent) in pcdac.iter_mut().zip(intercept_table(version)) {
        let percent = u32::from(percent);
        *code = ((percent * max + (100 - percent) * min) / 100) as u16;
    }
    pcdac
}

/// Decodes one 5-word pier group.
pub fn decode_channel(
    words: &[u16; LEGACY_WORDS_PER_CHANNEL],
    version: FormatVersion,
    frequency: u16,
) -> PcdacChannel {
    let pcdac_min = unpack(words, PCDAC_MIN);
    let pcdac_max = unpack(words, PCDAC_MAX);
    let mut power = [0u16; NUM_INTERCEPTS];
    for (value, field) in power.iter_mut().zip(POWER) {
        *value = PWR_STEP * unpack(words, field);
    }
    PcdacChannel {
        frequency,
        pcdac_min,
        pcdac_max,
        pcdac: intercepts(version, pcdac_min, pcdac_max),
        power,
    }
}

/// Group holding the raw power of `band`.
pub const fn group_offset(band: Band) -> u32 {
    match band {
        Band::A => GROUP2_OFFSET,
        Band::B => GROUP3_OFFSET,
        Band::G => GROUP4_OFFSET,
    }
}

/// Decodes one group per pier of `band`.
pub(crate) fn decode_band<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    version: FormatVersion,
    band: Band,
    piers: &[u16],
) -> Result<Vec<PcdacChannel, MAX_PIERS>, DecodeError<S::Error>> {
    reader.seek(version.groups_offset() + group_offset(band));
    let mut channels = Vec::new();
    for &frequency in piers {
        let words = reader.read_group::<LEGACY_WORDS_PER_CHANNEL>()?;
        let channel = decode_channel(&words, version, frequency);
        trace!(
            "pcdac pier {}: min={} max={}",
            frequency, channel.pcdac_min, channel.pcdac_max
        );
        let _ = channels.push(channel);
    }
    Ok(channels)
}
