//! Multi-pdgain Vpd (map 2) calibration.
//!
//! A band section starts with its pier bins, two per word, followed by one
//! record per pier. A record spends [`WORDS_FOR_PD_GAINS`] words on the gain
//! stages selected by the band's mask. Each stage stores an initial
//! `(power, vpd)` point and three delta pairs; the last stage stores a
//! fourth pair, which shares bits with the start of the stage that would
//! follow it.

use super::expand::expand;
use super::{GainChannel, gain_stages};
use crate::bits::{Field, Piece, unpack_u8};
use crate::consts::{
    MAX_NUM_PDGAINS_PER_CHANNEL, MAX_PIERS, MAX_VPD_DELTAS, NUM_11A_EEPROM_CHANNELS,
    NUM_2_4_EEPROM_CHANNELS_2413, WORDS_FOR_PD_GAINS,
};
use crate::error::{DecodeError, RecordFault};
use crate::freq::Band;
use crate::piers::{self, PierList};
use crate::source::{WordReader, WordSource};
use crate::version::FormatVersion;
use heapless::Vec;

/// Longest record, four stages.
const MAX_RECORD_WORDS: usize = WORDS_FOR_PD_GAINS[MAX_NUM_PDGAINS_PER_CHANNEL - 1];

/// Where one stage's fields sit inside a record.
struct StageLayout {
    pwr_i: Field,
    vpd_i: Field,
    pwr_delta: [Field; MAX_VPD_DELTAS - 1],
    vpd_delta: [Field; MAX_VPD_DELTAS - 1],
    /// Fourth delta pair, present only when this is the record's last stage.
    last: (Field, Field),
}

const STAGES: [StageLayout; MAX_NUM_PDGAINS_PER_CHANNEL] = [
    StageLayout {
        pwr_i: &[Piece::new(0, 0, 5)],
        vpd_i: &[Piece::new(0, 5, 7)],
        pwr_delta: [
            &[Piece::new(0, 12, 4)],
            &[Piece::new(1, 6, 4)],
            &[Piece::new(2, 0, 4)],
        ],
        vpd_delta: [
            &[Piece::new(1, 0, 6)],
            &[Piece::new(1, 10, 6)],
            &[Piece::new(2, 4, 6)],
        ],
        last: (
            &[Piece::new(2, 10, 4)],
            &[Piece::new(2, 14, 2), Piece::new(3, 0, 4).at(2)],
        ),
    },
    StageLayout {
        pwr_i: &[Piece::new(2, 10, 5)],
        vpd_i: &[Piece::new(2, 15, 1), Piece::new(3, 0, 6).at(1)],
        pwr_delta: [
            &[Piece::new(3, 6, 4)],
            &[Piece::new(4, 0, 4)],
            &[Piece::new(4, 10, 4)],
        ],
        vpd_delta: [
            &[Piece::new(3, 10, 6)],
            &[Piece::new(4, 4, 6)],
            &[Piece::new(4, 14, 2), Piece::new(5, 0, 4).at(2)],
        ],
        last: (&[Piece::new(5, 4, 4)], &[Piece::new(5, 8, 6)]),
    },
    StageLayout {
        pwr_i: &[Piece::new(5, 4, 5)],
        vpd_i: &[Piece::new(5, 9, 7)],
        pwr_delta: [
            &[Piece::new(6, 0, 4)],
            &[Piece::new(6, 10, 4)],
            &[Piece::new(7, 4, 4)],
        ],
        vpd_delta: [
            &[Piece::new(6, 4, 6)],
            &[Piece::new(6, 14, 2), Piece::new(7, 0, 4).at(2)],
            &[Piece::new(7, 8, 6)],
        ],
        last: (
            &[Piece::new(7, 14, 2), Piece::new(8, 0, 2).at(2)],
            &[Piece::new(8, 2, 6)],
        ),
    },
    StageLayout {
        pwr_i: &[Piece::new(7, 14, 2), Piece::new(8, 0, 3).at(2)],
        vpd_i: &[Piece::new(8, 3, 7)],
        pwr_delta: [
            &[Piece::new(8, 10, 4)],
            &[Piece::new(9, 4, 4)],
            &[Piece::new(9, 14, 2), Piece::new(10, 0, 2).at(2)],
        ],
        vpd_delta: [
            &[Piece::new(8, 14, 2), Piece::new(9, 0, 4).at(2)],
            &[Piece::new(9, 8, 6)],
            &[Piece::new(10, 2, 6)],
        ],
        last: (
            &[Piece::new(10, 8, 4)],
            &[Piece::new(10, 12, 4), Piece::new(11, 0, 2).at(4)],
        ),
    },
];

/// Raw fields of one gain stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct VpdStage {
    /// Initial power in 1 dB steps.
    pub pwr_i: u8,
    /// Initial Vpd code.
    pub vpd_i: u8,
    /// Power steps in 0.5 dB.
    pub pwr_delta: [u8; MAX_VPD_DELTAS],
    /// Vpd steps.
    pub vpd_delta: [u8; MAX_VPD_DELTAS],
}

/// A raw map 2 record, stages in storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct VpdRecord {
    /// Pier frequency in MHz.
    pub frequency: u16,
    /// One entry per stored stage. Only the last carries a fourth delta.
    pub stages: Vec<VpdStage, MAX_NUM_PDGAINS_PER_CHANNEL>,
}

/// Words a record occupies for `stages` gain stages, if that count is valid.
pub fn record_words(stages: usize) -> Option<usize> {
    stages
        .checked_sub(1)
        .and_then(|index| WORDS_FOR_PD_GAINS.get(index))
        .copied()
}

/// Decodes a record of `count` stages from `words`.
///
/// `words` must hold at least [`record_words`]`(count)` words.
pub fn decode_record(words: &[u16], count: usize, frequency: u16) -> VpdRecord {
    let mut stages = Vec::new();
    for (j, layout) in STAGES.iter().take(count).enumerate() {
        let mut stage = VpdStage {
            pwr_i: unpack_u8(words, layout.pwr_i),
            vpd_i: unpack_u8(words, layout.vpd_i),
            ..VpdStage::default()
        };
        for k in 0..MAX_VPD_DELTAS - 1 {
            stage.pwr_delta[k] = unpack_u8(words, layout.pwr_delta[k]);
            stage.vpd_delta[k] = unpack_u8(words, layout.vpd_delta[k]);
        }
        if j + 1 == count {
            let (pwr, vpd) = layout.last;
            stage.pwr_delta[MAX_VPD_DELTAS - 1] = unpack_u8(words, pwr);
            stage.vpd_delta[MAX_VPD_DELTAS - 1] = unpack_u8(words, vpd);
        }
        let _ = stages.push(stage);
    }
    VpdRecord { frequency, stages }
}

/// Most piers a band section may list.
pub const fn max_piers(band: Band) -> usize {
    match band {
        Band::A => NUM_11A_EEPROM_CHANNELS,
        Band::B | Band::G => NUM_2_4_EEPROM_CHANNELS_2413,
    }
}

/// Decodes the section of `band` starting at the reader's position.
///
/// The records begin `max_piers / 2` words into the section, whatever the
/// number of piers found. The reader is left after the last record, which is
/// where the next band's section starts.
///
/// # Errors
/// * [`RecordFault::GainStages`] when the mask selects no stage
pub(crate) fn decode_band<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    version: FormatVersion,
    band: Band,
    xpd_mask: u8,
) -> Result<(PierList, Vec<GainChannel, MAX_PIERS>), DecodeError<S::Error>> {
    let count = gain_stages(xpd_mask).len();
    let words = record_words(count).ok_or(RecordFault::GainStages {
        band,
        count: count as u32,
    })?;

    let start = reader.offset();
    let max = max_piers(band);
    let piers = piers::scan(reader, band.spectrum(), version, max)?;
    reader.seek(start + (max / 2) as u32);

    let mut buf = [0u16; MAX_RECORD_WORDS];
    let mut channels = Vec::new();
    for &frequency in &piers {
        reader.read_into(&mut buf[..words])?;
        let record = decode_record(&buf[..words], count, frequency);
        let _ = channels.push(expand(&record, xpd_mask));
    }
    debug!(
        "map 2: {} piers, {} stages, xpd mask {:#x}",
        piers.len(),
        count,
        xpd_mask
    );
    Ok((piers, channels))
}
