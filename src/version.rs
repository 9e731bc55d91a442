//! Format version and EEPROM map selection.
//!
//! The version word at [`VERSION_OFFSET`] holds the major version in its top
//! four bits and the minor version in the remaining twelve. From 4.0 the map
//! type is held in bits 15..14 of word `0xC4`; earlier images always use
//! map 0.

use crate::consts::{GROUPS_OFFSET_3_2, GROUPS_OFFSET_3_3, VERSION_OFFSET};
use crate::error::{DecodeError, HeaderFault};
use crate::source::{WordReader, WordSource};
use core::fmt;

/// Offset of the word carrying the map selector (4.0 and later).
const MAP_SELECTOR_OFFSET: u32 = 0x00c4;

/// A calibration store format version, e.g. `0x4003` for 4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct FormatVersion(u16);

impl FormatVersion {
    /// Format 3.0.
    pub const V3_0: Self = Self(0x3000);
    /// Format 3.1.
    pub const V3_1: Self = Self(0x3001);
    /// Format 3.2.
    pub const V3_2: Self = Self(0x3002);
    /// Format 3.3.
    pub const V3_3: Self = Self(0x3003);
    /// Format 3.4.
    pub const V3_4: Self = Self(0x3004);
    /// Format 4.0.
    pub const V4_0: Self = Self(0x4000);
    /// Format 4.1.
    pub const V4_1: Self = Self(0x4001);
    /// Format 4.2.
    pub const V4_2: Self = Self(0x4002);
    /// Format 4.3.
    pub const V4_3: Self = Self(0x4003);
    /// Format 4.6.
    pub const V4_6: Self = Self(0x4006);
    /// Format 5.0.
    pub const V5_0: Self = Self(0x5000);
    /// Format 5.3.
    pub const V5_3: Self = Self(0x5003);

    /// Validates a raw version word.
    ///
    /// Only versions 3.0 through 5.3 are recognised.
    pub const fn from_raw(raw: u16) -> Option<Self> {
        if raw >= Self::V3_0.0 && raw <= Self::V5_3.0 {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// The raw version word.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// The major version.
    pub const fn major(self) -> u8 {
        (self.0 >> 12) as u8
    }

    /// The minor version.
    pub const fn minor(self) -> u16 {
        self.0 & 0x0fff
    }

    /// Base offset of the calibration groups.
    pub const fn groups_offset(self) -> u32 {
        if self.0 >= Self::V3_3.0 {
            GROUPS_OFFSET_3_3
        } else {
            GROUPS_OFFSET_3_2
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

/// Encoding of the raw power calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum MapType {
    /// Map 0: legacy PCDAC intercepts.
    Pcdac = 0,
    /// Map 1: XPD gain stages.
    Xpd = 1,
    /// Map 2: multi-pdgain Vpd curves.
    Vpd = 2,
}

impl MapType {
    /// Interprets the two-bit map selector.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Pcdac),
            1 => Some(Self::Xpd),
            2 => Some(Self::Vpd),
            _ => None,
        }
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// Reads the format version and the map type.
///
/// # Errors
/// * [`HeaderFault::UnknownVersion`] for versions outside 3.0 to 5.3
/// * [`HeaderFault::UnknownMapType`] for the reserved selector value 3
/// * [`DecodeError::UnsupportedCombination`] for map 2 before 5.0
pub fn select<S: WordSource + ?Sized>(
    source: &mut S,
) -> Result<(FormatVersion, MapType), DecodeError<S::Error>> {
    let mut reader = WordReader::new(source, VERSION_OFFSET);
    let raw = reader.next_word()?;
    let version = FormatVersion::from_raw(raw).ok_or(HeaderFault::UnknownVersion(raw))?;
    if version < FormatVersion::V4_0 {
        debug!("calibration format {:#x}, map 0", raw);
        return Ok((version, MapType::Pcdac));
    }

    let bits = (reader.read_at(MAP_SELECTOR_OFFSET)? >> 14) as u8;
    let map = MapType::from_bits(bits).ok_or(HeaderFault::UnknownMapType(bits))?;
    if map == MapType::Vpd && version < FormatVersion::V5_0 {
        return Err(DecodeError::UnsupportedCombination { version, map });
    }
    debug!("calibration format {:#x}, map {}", raw, bits);
    Ok((version, map))
}
