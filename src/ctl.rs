//! Conformance test limits.
//!
//! A CTL caps the transmit power at up to eight band edges for one
//! regulatory domain and mode. Records follow the target powers in header
//! CTL id order. An id of 0 marks a hole: its words are skipped and no
//! record is produced.

use crate::bits::{Field, Piece, flag, hi8, lo8, unpack, unpack_u8};
use crate::consts::{CTL_MODE_M, GROUP8_OFFSET, NUM_CTLS_3_3, NUM_EDGES};
use crate::error::DecodeError;
use crate::freq::{Spectrum, bin_to_frequency};
use crate::header::EepromHeader;
use crate::piers::PACKED_BINS;
use crate::source::{WordReader, WordSource};
use crate::target;
use crate::version::FormatVersion;
use heapless::Vec;

/// Mode nibble of a CTL id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum CtlMode {
    /// 802.11a.
    A,
    /// 802.11b.
    B,
    /// 802.11g.
    G,
    /// 5 GHz turbo.
    Turbo,
    /// 2.4 GHz turbo.
    TurboG,
    /// Any other mode value.
    Other(u8),
}

impl CtlMode {
    /// The mode encoded in the low nibble of `ctl`.
    pub const fn from_id(ctl: u8) -> Self {
        match ctl & CTL_MODE_M {
            0 => Self::A,
            1 => Self::B,
            2 => Self::G,
            3 => Self::Turbo,
            4 => Self::TurboG,
            mode => Self::Other(mode),
        }
    }

    /// Spectrum used to convert the edge bins of this mode.
    pub const fn spectrum(self) -> Spectrum {
        match self {
            Self::A | Self::Turbo => Spectrum::Ghz5,
            _ => Spectrum::Ghz2,
        }
    }
}

/// A band edge limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct BandEdge {
    /// Edge frequency in MHz, 0 for an unused edge.
    pub frequency: u16,
    /// Power limit in half dB.
    pub twice_power: u8,
    /// In-band flag (3.3 and later).
    pub flag: bool,
}

/// The band edges of one CTL id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct CtlRecord {
    /// Regulatory domain and mode.
    pub ctl: u8,
    /// Band edges, in storage order.
    pub edges: [BandEdge; NUM_EDGES],
}

impl CtlRecord {
    /// Mode of the record.
    pub const fn mode(&self) -> CtlMode {
        CtlMode::from_id(self.ctl)
    }
}

/// Edge powers of the dense layout, after the bins in words 0 to 3.
const DENSE_POWERS: [Field; NUM_EDGES] = [
    &[Piece::new(3, 2, 6)],
    &[Piece::new(3, 0, 2).at(4), Piece::new(4, 12, 4)],
    &[Piece::new(4, 6, 6)],
    &[Piece::new(4, 0, 6)],
    &[Piece::new(5, 10, 6)],
    &[Piece::new(5, 4, 6)],
    &[Piece::new(5, 0, 4).at(2), Piece::new(6, 14, 2)],
    &[Piece::new(6, 8, 6)],
];

/// Words occupied by one record.
pub const fn ctl_skip_words(version: FormatVersion) -> u32 {
    if version.raw() >= FormatVersion::V3_3.raw() {
        8
    } else {
        7
    }
}

/// Reads the raw bins and powers of one record.
fn read_edges<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    version: FormatVersion,
) -> Result<[(u16, BandEdge); NUM_EDGES], DecodeError<S::Error>> {
    let mut edges = [(0u16, BandEdge::default()); NUM_EDGES];
    if version >= FormatVersion::V3_3 {
        let words = reader.read_group::<8>()?;
        let (bins, powers) = words.split_at(4);
        for (pair, &word) in edges.chunks_exact_mut(2).zip(bins) {
            pair[0].0 = hi8(word);
            pair[1].0 = lo8(word);
        }
        for (pair, &word) in edges.chunks_exact_mut(2).zip(powers) {
            pair[0].1.twice_power = unpack_u8(&[word], &[Piece::new(0, 8, 6)]);
            pair[0].1.flag = flag(word, 14);
            pair[1].1.twice_power = unpack_u8(&[word], &[Piece::new(0, 0, 6)]);
            pair[1].1.flag = flag(word, 6);
        }
    } else {
        let words = reader.read_group::<7>()?;
        for ((edge, bin), power) in edges.iter_mut().zip(PACKED_BINS).zip(DENSE_POWERS) {
            edge.0 = unpack(&words, bin);
            edge.1.twice_power = unpack_u8(&words, power);
        }
    }
    Ok(edges)
}

/// Decodes the record of every non-zero CTL id in the header.
pub fn decode<S: WordSource + ?Sized>(
    source: &mut S,
    header: &EepromHeader,
) -> Result<Vec<CtlRecord, NUM_CTLS_3_3>, DecodeError<S::Error>> {
    let version = header.version;
    let start = target::base_offset(header).wrapping_add(GROUP8_OFFSET);
    let mut reader = WordReader::new(source, start);
    let mut records = Vec::new();
    for &ctl in &header.ctl_ids {
        if ctl == 0 {
            trace!("ctl hole at {:#x}", reader.offset());
            reader.skip(ctl_skip_words(version));
            continue;
        }
        let spectrum = CtlMode::from_id(ctl).spectrum();
        let mut edges = [BandEdge::default(); NUM_EDGES];
        for (edge, (bin, raw)) in edges.iter_mut().zip(read_edges(&mut reader, version)?) {
            *edge = raw;
            if bin != 0 {
                edge.frequency = bin_to_frequency(spectrum, version, bin);
            }
        }
        let _ = records.push(CtlRecord { ctl, edges });
    }
    debug!("{} ctl records", records.len());
    Ok(records)
}
