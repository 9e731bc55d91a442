//! Error types for calibration store decoding.
//!
//! Every decode step returns [`DecodeError`], generic over the error type of
//! the underlying [`WordSource`](crate::source::WordSource). A failure at any
//! step aborts the decode.

use crate::freq::Band;
use crate::version::{FormatVersion, MapType};
use thiserror::Error;

/// Errors that can occur while decoding a calibration store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DecodeError<E> {
    /// The word source failed to produce a word.
    #[error("word source failed at offset {offset:#06x}: {cause:?}")]
    WordSource {
        /// Word offset that was being read.
        offset: u32,
        /// Error reported by the source.
        cause: E,
    },

    /// The version word or map selector is not recognised.
    #[error("malformed header: {0}")]
    MalformedHeader(#[from] HeaderFault),

    /// A per-band record violates its structural constraints.
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] RecordFault),

    /// The map type cannot occur with the stored format version.
    #[error("map type {map} is not supported by format version {version}")]
    UnsupportedCombination {
        /// Stored format version.
        version: FormatVersion,
        /// Map type selected by the header.
        map: MapType,
    },
}

/// Faults in the version word and map selector.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum HeaderFault {
    /// The version word is outside the supported 3.0 to 5.3 range.
    #[error("unknown format version {0:#06x}")]
    UnknownVersion(u16),

    /// The map selector holds the reserved value.
    #[error("unknown EEPROM map type {0}")]
    UnknownMapType(u8),
}

/// Structural faults in a per-band record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RecordFault {
    /// The gain mask selects a number of stages the map cannot carry.
    #[error("band {band} selects {count} gain stages")]
    GainStages {
        /// Band whose mask is at fault.
        band: Band,
        /// Number of stages selected by the mask.
        count: u32,
    },

    /// An enabled band has no calibrated channels.
    #[error("band {band} is enabled but has no calibrated channels")]
    NoChannels {
        /// Band without channels.
        band: Band,
    },
}
