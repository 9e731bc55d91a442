//! XPD (map 1) calibration.
//!
//! Every pier is a 5-word record carrying two gain stages: a high-power
//! stage of four points whose PCDAC codes are stored as a start code plus
//! deltas, and a low-power stage of three points at fixed PCDAC codes.

use super::{CalibrationPoint, GainChannel, GainCurve, gain_stages};
use crate::bits::{Field, Piece, signed_byte, unpack};
use crate::consts::{
    MAX_PIERS, NUM_11A_EEPROM_CHANNELS, NUM_POINTS_XPD0, NUM_POINTS_XPD3, XPD3_PCDACS,
    XPD_WORDS_PER_CHANNEL,
};
use crate::error::{DecodeError, RecordFault};
use crate::freq::{Band, Spectrum};
use crate::header::EepromHeader;
use crate::piers::{self, PierList};
use crate::source::{WordReader, WordSource};
use crate::version::FormatVersion;
use heapless::Vec;

const PWR_XG0: [Field; NUM_POINTS_XPD0] = [
    &[Piece::new(0, 0, 8)],
    &[Piece::new(0, 8, 8)],
    &[Piece::new(1, 0, 8)],
    &[Piece::new(1, 8, 8)],
];
const PCD_DELTA_XG0: [Field; NUM_POINTS_XPD0 - 1] = [
    &[Piece::new(2, 0, 5)],
    &[Piece::new(2, 5, 5)],
    &[Piece::new(2, 10, 5)],
];
const PWR_XG3: [Field; NUM_POINTS_XPD3] = [
    &[Piece::new(3, 0, 8)],
    &[Piece::new(3, 8, 8)],
    &[Piece::new(4, 0, 8)],
];
/// Start PCDAC of the high-power stage (4.3 and later).
const PCD1_XG0: Field = &[Piece::new(4, 8, 6)];
/// Channel maximum power (before 4.3).
const MAX_POWER: Field = &[Piece::new(4, 8, 8)];

/// A raw map 1 record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct XpdRecord {
    /// Pier frequency in MHz.
    pub frequency: u16,
    /// Powers of the high-power stage, in quarter dB.
    pub pwr_xg0: [i16; NUM_POINTS_XPD0],
    /// First PCDAC code of the high-power stage.
    pub pcd1_xg0: u16,
    /// PCDAC steps between consecutive high-power points.
    pub pcd_delta_xg0: [u16; NUM_POINTS_XPD0 - 1],
    /// Powers of the low-power stage, in quarter dB.
    pub pwr_xg3: [i16; NUM_POINTS_XPD3],
    /// Channel maximum power in quarter dB.
    pub max_power: i16,
}

fn power(words: &[u16], field: Field) -> i16 {
    i16::from(signed_byte(unpack(words, field)))
}

/// Decodes one 5-word record.
///
/// From 4.3 the start PCDAC is stored and the last high-power point doubles
/// as the channel maximum. Earlier records store the maximum and start at
/// PCDAC 1.
pub fn decode_record(
    words: &[u16; XPD_WORDS_PER_CHANNEL],
    version: FormatVersion,
    frequency: u16,
) -> XpdRecord {
    let pwr_xg0 = PWR_XG0.map(|field| power(words, field));
    let (pcd1_xg0, max_power) = if version >= FormatVersion::V4_3 {
        (unpack(words, PCD1_XG0), pwr_xg0[NUM_POINTS_XPD0 - 1])
    } else {
        (1, power(words, MAX_POWER))
    };
    XpdRecord {
        frequency,
        pwr_xg0,
        pcd1_xg0,
        pcd_delta_xg0: PCD_DELTA_XG0.map(|field| unpack(words, field)),
        pwr_xg3: PWR_XG3.map(|field| power(words, field)),
        max_power,
    }
}

/// Expands a record into curves for the selected `stages`.
///
/// The first stage receives the high-power points. A second stage, if any,
/// receives the low-power points at the fixed codes [`XPD3_PCDACS`].
pub fn expand(record: &XpdRecord, stages: &[u8]) -> GainChannel {
    let mut curves = Vec::new();
    if let Some(&pd_gain) = stages.first() {
        let mut points = Vec::new();
        let mut control = record.pcd1_xg0;
        for (k, &power) in record.pwr_xg0.iter().enumerate() {
            if k > 0 {
                control += record.pcd_delta_xg0[k - 1];
            }
            let _ = points.push(CalibrationPoint { power, control });
        }
        let _ = curves.push(GainCurve { pd_gain, points });
    }
    if let Some(&pd_gain) = stages.get(1) {
        let points = record
            .pwr_xg3
            .iter()
            .zip(XPD3_PCDACS)
            .map(|(&power, control)| CalibrationPoint { power, control })
            .collect();
        let _ = curves.push(GainCurve { pd_gain, points });
    }
    GainChannel {
        frequency: record.frequency,
        max_power: Some(record.max_power),
        curves,
    }
}

/// Decodes the piers and records of `band` from the reader's position.
///
/// 11a piers are scanned ahead of the records; 11b and 11g use the piers of
/// their modal header. The reader is left after the last record.
///
/// # Errors
/// * [`RecordFault::GainStages`] unless the mask selects one or two stages
/// * [`RecordFault::NoChannels`] when the band has no piers
pub(crate) fn decode_band<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    header: &EepromHeader,
    band: Band,
) -> Result<(PierList, Vec<GainChannel, MAX_PIERS>), DecodeError<S::Error>> {
    let xpd_mask = header.modal(band).xgain;
    let stages = gain_stages(xpd_mask);
    if stages.is_empty() || stages.len() > 2 {
        return Err(RecordFault::GainStages {
            band,
            count: stages.len() as u32,
        }
        .into());
    }

    let piers = match band {
        Band::A => piers::scan(
            reader,
            Spectrum::Ghz5,
            header.version,
            NUM_11A_EEPROM_CHANNELS,
        )?,
        Band::B | Band::G => piers::header_2ghz(header, band),
    };
    if piers.is_empty() {
        return Err(RecordFault::NoChannels { band }.into());
    }

    let mut channels = Vec::new();
    for &frequency in &piers {
        let words = reader.read_group::<XPD_WORDS_PER_CHANNEL>()?;
        let record = decode_record(&words, header.version, frequency);
        let _ = channels.push(expand(&record, &stages));
    }
    debug!(
        "map 1: {} piers, xpd mask {:#x}",
        piers.len(),
        xpd_mask
    );
    Ok((piers, channels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::assert_disjoint;
    use crate::consts::CHANNEL_UNUSED;
    use crate::testutil::Image;
    use crate::version::MapType;

    // pwr_xg0 = [16, -2, 32, 48], deltas 5/6/7, pwr_xg3 = [4, 8, 12],
    // and 0x0a in the top byte of the last word.
    const RECORD: [u16; 5] = [0xfe10, 0x3020, 0x1cc5, 0x0804, 0x0a0c];

    fn header(version: FormatVersion, band: Band, xgain: u8) -> EepromHeader {
        let mut header = EepromHeader::new(version, MapType::Xpd);
        header.modal[band.index()].xgain = xgain;
        header
    }

    fn powers(curve: &GainCurve) -> std::vec::Vec<(i16, u16)> {
        curve
            .points
            .iter()
            .map(|point| (point.power, point.control))
            .collect()
    }

    #[test]
    fn test_record_layout_is_disjoint() {
        let mut from_4_3 = std::vec::Vec::new();
        from_4_3.extend_from_slice(&PWR_XG0);
        from_4_3.extend_from_slice(&PCD_DELTA_XG0);
        from_4_3.extend_from_slice(&PWR_XG3);
        let mut before_4_3 = from_4_3.clone();
        from_4_3.push(PCD1_XG0);
        before_4_3.push(MAX_POWER);
        assert_disjoint(XPD_WORDS_PER_CHANNEL, &from_4_3);
        assert_disjoint(XPD_WORDS_PER_CHANNEL, &before_4_3);
    }

    #[test]
    fn test_decode_record_from_4_3() {
        let record = decode_record(&RECORD, FormatVersion::V4_3, 5180);
        assert_eq!(record.pwr_xg0, [16, -2, 32, 48]);
        assert_eq!(record.pcd_delta_xg0, [5, 6, 7]);
        assert_eq!(record.pwr_xg3, [4, 8, 12]);
        assert_eq!(record.pcd1_xg0, 10);
        assert_eq!(record.max_power, 48);
    }

    #[test]
    fn test_decode_record_before_4_3() {
        let mut words = RECORD;
        words[4] = 0xf00c;
        let record = decode_record(&words, FormatVersion::V4_2, 5180);
        assert_eq!(record.pcd1_xg0, 1);
        assert_eq!(record.max_power, -16);
    }

    #[test]
    fn test_expand_single_stage() {
        let record = decode_record(&RECORD, FormatVersion::V4_3, 5180);
        let channel = expand(&record, &[2]);
        assert_eq!(channel.max_power, Some(48));
        assert_eq!(channel.curves.len(), 1);
        let curve = channel.curve(2).unwrap();
        assert_eq!(powers(curve), [(16, 10), (-2, 15), (32, 21), (48, 28)]);
    }

    #[test]
    fn test_expand_two_stages() {
        let record = decode_record(&RECORD, FormatVersion::V4_3, 5180);
        let channel = expand(&record, &[0, 3]);
        assert_eq!(channel.curves.len(), 2);
        assert_eq!(channel.curve(0).unwrap().points.len(), 4);
        assert_eq!(powers(channel.curve(3).unwrap()), [(4, 20), (8, 35), (12, 63)]);
    }

    #[test]
    fn test_decode_band_11a_follows_scan() {
        let mut image = Image::new();
        // Piers 5180 and 5200 MHz, then a terminating zero bin.
        image.set(0x150, 0x4c48);
        image.set(0x151, 0x0000);
        for (i, word) in RECORD.into_iter().enumerate() {
            image.set(0x152 + i as u32, word);
            image.set(0x157 + i as u32, word);
        }
        let header = header(FormatVersion::V4_3, Band::A, 0b0011);
        let mut reader = WordReader::new(image.words_mut(), 0x150);
        let (piers, channels) = decode_band(&mut reader, &header, Band::A).unwrap();
        assert_eq!(&piers[..], &[5160, 5180]);
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[1].frequency, 5180);
        assert_eq!(channels[1].curves.len(), 2);
        assert_eq!(reader.offset(), 0x15c);
    }

    #[test]
    fn test_decode_band_2ghz_uses_header_piers() {
        let mut image = Image::new();
        for (i, word) in RECORD.into_iter().enumerate() {
            image.set(0x160 + i as u32, word);
        }
        let mut header = header(FormatVersion::V4_3, Band::G, 0b0100);
        header.cal_pier_11g = [2412, CHANNEL_UNUSED, CHANNEL_UNUSED];
        let mut reader = WordReader::new(image.words_mut(), 0x160);
        let (piers, channels) = decode_band(&mut reader, &header, Band::G).unwrap();
        assert_eq!(&piers[..], &[2412]);
        assert_eq!(channels[0].curve(2).unwrap().points[0].control, 10);
        assert_eq!(reader.offset(), 0x165);
    }

    #[test]
    fn test_decode_band_rejects_stage_counts() {
        let mut image = Image::new();
        for (mask, count) in [(0b0000, 0), (0b0111, 3), (0b1111, 4)] {
            let header = header(FormatVersion::V4_3, Band::B, mask);
            let mut reader = WordReader::new(image.words_mut(), 0x150);
            assert_eq!(
                decode_band(&mut reader, &header, Band::B),
                Err(DecodeError::MalformedRecord(RecordFault::GainStages {
                    band: Band::B,
                    count,
                }))
            );
        }
    }

    #[test]
    fn test_decode_band_rejects_empty_pier_list() {
        let mut image = Image::new();
        let mut header = header(FormatVersion::V4_3, Band::B, 0b0001);
        header.cal_pier_11b = [CHANNEL_UNUSED; 3];
        let mut reader = WordReader::new(image.words_mut(), 0x150);
        assert_eq!(
            decode_band(&mut reader, &header, Band::B),
            Err(DecodeError::MalformedRecord(RecordFault::NoChannels {
                band: Band::B
            }))
        );
    }
}
