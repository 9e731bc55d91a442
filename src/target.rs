//! Per-rate target powers.
//!
//! Each band lists up to a fixed number of test channels, two words each:
//! the channel bin and four 6-bit target powers in half dB, for the
//! 6–24, 36, 48 and 54 Mb/s rate groups. A zero bin ends the list.

use crate::bits::{Field, Piece, unpack, unpack_u8};
use crate::consts::{
    GROUP5_OFFSET, GROUP6_OFFSET, GROUP7_OFFSET, NUM_TARGET_POWER_11B, NUM_TARGET_POWER_11G,
    NUM_TEST_FREQUENCIES,
};
use crate::error::DecodeError;
use crate::freq::{Band, bin_to_frequency};
use crate::header::EepromHeader;
use crate::source::{WordReader, WordSource};
use crate::version::FormatVersion;
use heapless::Vec;

/// Target powers of one test channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TargetPower {
    /// Test channel frequency in MHz.
    pub frequency: u16,
    /// Target for the 6 to 24 Mb/s rates, in half dB.
    pub twice_pwr_6_24: u8,
    /// Target for 36 Mb/s, in half dB.
    pub twice_pwr_36: u8,
    /// Target for 48 Mb/s, in half dB.
    pub twice_pwr_48: u8,
    /// Target for 54 Mb/s, in half dB.
    pub twice_pwr_54: u8,
}

/// Target power list of one band.
pub type TargetPowers = Vec<TargetPower, NUM_TEST_FREQUENCIES>;

/// Bit positions of a two-word record.
struct Schedule {
    bin: Field,
    pwr_6_24: Field,
    pwr_36: Field,
    pwr_48: Field,
    pwr_54: Field,
}

const SCHEDULE: Schedule = Schedule {
    bin: &[Piece::new(0, 8, 8)],
    pwr_6_24: &[Piece::new(0, 2, 6)],
    pwr_36: &[Piece::new(0, 0, 2).at(4), Piece::new(1, 12, 4)],
    pwr_48: &[Piece::new(1, 6, 6)],
    pwr_54: &[Piece::new(1, 0, 6)],
};

const SCHEDULE_PRE_3_3: Schedule = Schedule {
    bin: &[Piece::new(0, 9, 7)],
    pwr_6_24: &[Piece::new(0, 3, 6)],
    pwr_36: &[Piece::new(0, 0, 3).at(3), Piece::new(1, 13, 3)],
    pwr_48: &[Piece::new(1, 7, 6)],
    pwr_54: &[Piece::new(1, 1, 6)],
};

const fn schedule(version: FormatVersion) -> &'static Schedule {
    if version.raw() >= FormatVersion::V3_3.raw() {
        &SCHEDULE
    } else {
        &SCHEDULE_PRE_3_3
    }
}

/// Base offset of the target power and CTL groups.
///
/// From 4.0 the header locates the 11a target powers; earlier images use
/// the group base.
pub fn base_offset(header: &EepromHeader) -> u32 {
    if header.version >= FormatVersion::V4_0 {
        u32::from(header.target_powers_start).wrapping_sub(GROUP5_OFFSET)
    } else {
        header.version.groups_offset()
    }
}

/// Group offset and test channel count of `band`.
pub const fn group(band: Band) -> (u32, usize) {
    match band {
        Band::A => (GROUP5_OFFSET, NUM_TEST_FREQUENCIES),
        Band::B => (GROUP6_OFFSET, NUM_TARGET_POWER_11B),
        Band::G => (GROUP7_OFFSET, NUM_TARGET_POWER_11G),
    }
}

/// Decodes the target list of `band` from the reader's position.
fn decode_band<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    version: FormatVersion,
    band: Band,
    count: usize,
) -> Result<TargetPowers, DecodeError<S::Error>> {
    let schedule = schedule(version);
    let mut powers = TargetPowers::new();
    while powers.len() < count {
        let first = reader.next_word()?;
        let bin = unpack(&[first], schedule.bin);
        if bin == 0 {
            break;
        }
        let words = [first, reader.next_word()?];
        let _ = powers.push(TargetPower {
            frequency: bin_to_frequency(band.spectrum(), version, bin),
            twice_pwr_6_24: unpack_u8(&words, schedule.pwr_6_24),
            twice_pwr_36: unpack_u8(&words, schedule.pwr_36),
            twice_pwr_48: unpack_u8(&words, schedule.pwr_48),
            twice_pwr_54: unpack_u8(&words, schedule.pwr_54),
        });
    }
    Ok(powers)
}

/// Decodes the target powers of every enabled band.
///
/// Disabled bands yield an empty list and read nothing.
pub fn decode<S: WordSource + ?Sized>(
    source: &mut S,
    header: &EepromHeader,
) -> Result<[TargetPowers; 3], DecodeError<S::Error>> {
    let base = base_offset(header);
    let mut reader = WordReader::new(source, base);
    let mut powers: [TargetPowers; 3] = Default::default();
    for band in Band::ALL {
        if !header.band_enabled(band) {
            continue;
        }
        let (offset, count) = group(band);
        reader.seek(base.wrapping_add(offset));
        powers[band.index()] = decode_band(&mut reader, header.version, band, count)?;
        trace!("{} target power channels", powers[band.index()].len());
    }
    Ok(powers)
}
