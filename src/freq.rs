//! Bands and frequency bins.
//!
//! Channels are stored as compact bins whose decoding depends on the
//! spectrum and the format version:
//!
//! | Spectrum | Before 3.3 | 3.3 and later |
//! |----------|------------|---------------|
//! | 5 GHz    | `5100 + 10·bin`, or `5720 + 5·(bin − 62)` above bin 62 | `4800 + 5·bin` |
//! | 2.4 GHz  | `2400 + bin` | `2300 + bin` |
//!
//! The bin [`CHANNEL_UNUSED`] is reserved and never converted.

use crate::consts::CHANNEL_UNUSED;
use crate::version::FormatVersion;
use core::fmt;

/// An 802.11 band carried by the calibration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Band {
    /// 802.11a, 5 GHz.
    A,
    /// 802.11b, 2.4 GHz CCK.
    B,
    /// 802.11g, 2.4 GHz OFDM.
    G,
}

impl Band {
    /// All bands in decode order.
    pub const ALL: [Band; 3] = [Band::A, Band::B, Band::G];

    /// Index of the band in per-band arrays.
    pub const fn index(self) -> usize {
        match self {
            Band::A => 0,
            Band::B => 1,
            Band::G => 2,
        }
    }

    /// Spectrum the band's bins are expressed in.
    pub const fn spectrum(self) -> Spectrum {
        match self {
            Band::A => Spectrum::Ghz5,
            Band::B | Band::G => Spectrum::Ghz2,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Band::A => "11a",
            Band::B => "11b",
            Band::G => "11g",
        })
    }
}

/// Frequency range a bin is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Spectrum {
    /// The 5 GHz range.
    Ghz5,
    /// The 2.4 GHz range.
    Ghz2,
}

/// Converts a stored bin to a channel frequency in MHz.
///
/// [`CHANNEL_UNUSED`] is returned unchanged.
pub fn bin_to_frequency(spectrum: Spectrum, version: FormatVersion, bin: u16) -> u16 {
    if bin == CHANNEL_UNUSED {
        return bin;
    }
    let compact = version >= FormatVersion::V3_3;
    match spectrum {
        Spectrum::Ghz5 if compact => 4800 + 5 * bin,
        Spectrum::Ghz5 if bin > 62 => 5720 + 5 * (bin - 62),
        Spectrum::Ghz5 => 5100 + 10 * bin,
        Spectrum::Ghz2 if compact => 2300 + bin,
        Spectrum::Ghz2 => 2400 + bin,
    }
}

/// Converts a channel frequency back to its stored bin.
///
/// Returns `None` when the frequency is not exactly representable.
pub fn frequency_to_bin(spectrum: Spectrum, version: FormatVersion, frequency: u16) -> Option<u16> {
    let compact = version >= FormatVersion::V3_3;
    let (base, step, offset) = match spectrum {
        Spectrum::Ghz5 if compact => (4800, 5, 0),
        Spectrum::Ghz5 if frequency > 5720 => (5720, 5, 62),
        Spectrum::Ghz5 => (5100, 10, 0),
        Spectrum::Ghz2 if compact => (2300, 1, 0),
        Spectrum::Ghz2 => (2400, 1, 0),
    };
    let delta = frequency.checked_sub(base)?;
    if delta % step != 0 {
        return None;
    }
    let bin = delta / step + offset;
    (bin != CHANNEL_UNUSED).then_some(bin)
}
