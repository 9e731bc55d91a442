//! Frequency pier lists.
//!
//! A pier is a channel at which raw power was measured. Where the list comes
//! from depends on the map type:
//!
//! - map 0: 11a piers live in group 1; 11b and 11g use fixed lists
//! - map 1: 11a piers are scanned at the start of the raw power section;
//!   11b and 11g reuse the piers stored in their modal header
//! - map 2: every band scans its piers at the head of its own section

use crate::bits::{Field, Piece, hi8, lo8, unpack};
use crate::consts::{
    CHANNEL_UNUSED, CHANNELS_11B, CHANNELS_11G, GROUP1_OFFSET, MAX_PIERS, NUM_11A_EEPROM_CHANNELS,
};
use crate::error::DecodeError;
use crate::freq::{Band, Spectrum, bin_to_frequency};
use crate::header::EepromHeader;
use crate::source::{WordReader, WordSource};
use crate::version::FormatVersion;
use heapless::Vec;

/// Calibrated channel frequencies of one band, in MHz.
pub type PierList = Vec<u16, MAX_PIERS>;

/// Ten 7-bit bins packed into five words, used before format 3.3.
///
/// The first eight entries are shared with the CTL band edge layout.
pub(crate) const PACKED_BINS: [Field; NUM_11A_EEPROM_CHANNELS] = [
    &[Piece::new(0, 9, 7)],
    &[Piece::new(0, 2, 7)],
    &[Piece::new(0, 0, 2).at(5), Piece::new(1, 11, 5)],
    &[Piece::new(1, 4, 7)],
    &[Piece::new(1, 0, 4).at(3), Piece::new(2, 13, 3)],
    &[Piece::new(2, 6, 7)],
    &[Piece::new(2, 0, 6).at(1), Piece::new(3, 15, 1)],
    &[Piece::new(3, 8, 7)],
    &[Piece::new(3, 1, 7)],
    &[Piece::new(3, 0, 1).at(6), Piece::new(4, 10, 6)],
];

/// Reads the 11a piers of group 1 (map 0).
///
/// The list ends at the first zero bin.
pub(crate) fn legacy_11a<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    version: FormatVersion,
) -> Result<PierList, DecodeError<S::Error>> {
    reader.seek(version.groups_offset() + GROUP1_OFFSET);
    let words = reader.read_group::<5>()?;

    let mut bins = [0u16; NUM_11A_EEPROM_CHANNELS];
    if version >= FormatVersion::V3_3 {
        for (pair, word) in bins.chunks_exact_mut(2).zip(words) {
            pair[0] = hi8(word);
            pair[1] = lo8(word);
        }
    } else {
        for (bin, field) in bins.iter_mut().zip(PACKED_BINS) {
            *bin = unpack(&words, field);
        }
    }

    let mut piers = PierList::new();
    for bin in bins.into_iter().take_while(|&bin| bin != 0) {
        let _ = piers.push(bin_to_frequency(Spectrum::Ghz5, version, bin));
    }
    Ok(piers)
}

/// The fixed 2.4 GHz pier list of map 0.
pub fn legacy_2ghz(band: Band) -> PierList {
    let channels: &[u16] = match band {
        Band::A => &[],
        Band::B => &CHANNELS_11B,
        Band::G => &CHANNELS_11G,
    };
    channels.iter().copied().collect()
}

/// The 2.4 GHz piers stored in the modal header (map 1).
///
/// Unused slots are dropped.
pub fn header_2ghz(header: &EepromHeader, band: Band) -> PierList {
    let channels: &[u16] = match band {
        Band::A => &[],
        Band::B => &header.cal_pier_11b,
        Band::G => &header.cal_pier_11g,
    };
    channels
        .iter()
        .copied()
        .filter(|&frequency| frequency != CHANNEL_UNUSED)
        .collect()
}

/// Scans up to `max` piers from the reader's position.
///
/// Each word holds two bins, low byte first; a zero bin ends the list. The
/// reader is left after the last word read.
pub(crate) fn scan<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    spectrum: Spectrum,
    version: FormatVersion,
    max: usize,
) -> Result<PierList, DecodeError<S::Error>> {
    let mut piers = PierList::new();
    'words: while piers.len() < max {
        let word = reader.next_word()?;
        for bin in [lo8(word), hi8(word)] {
            if bin == 0 || piers.len() == max {
                break 'words;
            }
            let _ = piers.push(bin_to_frequency(spectrum, version, bin));
        }
    }
    Ok(piers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::assert_disjoint;
    use crate::consts::GROUPS_OFFSET_3_2;
    use crate::testutil::Image;

    #[test]
    fn test_packed_bins_are_disjoint() {
        assert_disjoint(5, &PACKED_BINS);
    }

    #[test]
    fn test_legacy_11a_from_3_3() {
        let mut image = Image::new();
        image.set(0x150, 0x2428);
        image.set(0x151, 0x2c00);
        let mut reader = WordReader::new(image.words_mut(), 0);
        let piers = legacy_11a(&mut reader, FormatVersion::V3_3).unwrap();
        assert_eq!(&piers[..], &[4980, 5000, 5020]);
    }

    #[test]
    fn test_legacy_11a_packed() {
        let mut image = Image::new();
        // 5180 and 5200 MHz.
        image.pack(GROUPS_OFFSET_3_2, PACKED_BINS[0], 8);
        image.pack(GROUPS_OFFSET_3_2, PACKED_BINS[1], 10);
        let mut reader = WordReader::new(image.words_mut(), 0);
        let piers = legacy_11a(&mut reader, FormatVersion::V3_2).unwrap();
        assert_eq!(&piers[..], &[5180, 5200]);
    }

    #[test]
    fn test_legacy_11a_full_list() {
        let mut image = Image::new();
        let bins = [1u16, 20, 33, 47, 58, 62, 63, 70, 100, 127];
        for (field, bin) in PACKED_BINS.iter().zip(bins) {
            image.pack(GROUPS_OFFSET_3_2, field, bin);
        }
        let mut reader = WordReader::new(image.words_mut(), 0);
        let piers = legacy_11a(&mut reader, FormatVersion::V3_1).unwrap();
        assert_eq!(piers.len(), NUM_11A_EEPROM_CHANNELS);
        assert_eq!(piers[0], 5110);
        assert_eq!(piers[5], 5720);
        assert_eq!(piers[6], 5725);
        assert_eq!(piers[9], 6045);
    }

    #[test]
    fn test_fixed_2ghz_lists() {
        assert_eq!(&legacy_2ghz(Band::B)[..], &[2412, 2447, 2484]);
        assert_eq!(&legacy_2ghz(Band::G)[..], &[2312, 2412, 2484]);
        assert!(legacy_2ghz(Band::A).is_empty());
    }

    #[test]
    fn test_scan_stops_at_zero_bin() {
        let mut image = Image::new();
        image.set(0x150, 0x2824);
        image.set(0x151, 0x0030);
        image.set(0x152, 0x4444);
        let mut reader = WordReader::new(image.words_mut(), 0x150);
        let piers = scan(&mut reader, Spectrum::Ghz5, FormatVersion::V4_0, 10).unwrap();
        assert_eq!(&piers[..], &[4980, 5000, 5040]);
        assert_eq!(reader.offset(), 0x152);
    }

    #[test]
    fn test_scan_stops_at_limit() {
        let mut image = Image::new();
        for (i, word) in [0x0201u16, 0x0403, 0x0605].into_iter().enumerate() {
            image.set(0x200 + i as u32, word);
        }
        let mut reader = WordReader::new(image.words_mut(), 0x200);
        let piers = scan(&mut reader, Spectrum::Ghz2, FormatVersion::V5_0, 4).unwrap();
        assert_eq!(&piers[..], &[2301, 2302, 2303, 2304]);
        assert_eq!(reader.offset(), 0x202);
    }

    #[test]
    fn test_scan_passes_unused_bin_through() {
        let mut image = Image::new();
        image.set(0x150, 0x24ff);
        let mut reader = WordReader::new(image.words_mut(), 0x150);
        let piers = scan(&mut reader, Spectrum::Ghz5, FormatVersion::V4_0, 10).unwrap();
        assert_eq!(&piers[..], &[CHANNEL_UNUSED, 4980]);
    }
}
