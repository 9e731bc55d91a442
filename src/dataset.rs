//! The decoded calibration dataset.
//!
//! [`decode`] runs every stage in order and only returns a dataset once all
//! of them have succeeded.

use crate::consts::{GROUPS_OFFSET_3_3, NUM_CTLS_3_3};
use crate::ctl::{self, CtlRecord};
use crate::error::DecodeError;
use crate::freq::Band;
use crate::header::{self, EepromHeader};
use crate::piers::{self, PierList};
use crate::power::{PowerCalibration, legacy, vpd, xpd};
use crate::source::{WordReader, WordSource};
use crate::target::{self, TargetPower, TargetPowers};
use crate::version::{self, FormatVersion, MapType};
use heapless::Vec;

/// Raw power calibration of one enabled band.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct BandCalibration {
    /// The calibrated band.
    pub band: Band,
    /// Pier frequencies, in storage order.
    pub piers: PierList,
    /// One calibrated channel per pier.
    pub power: PowerCalibration,
}

/// Everything decoded from a calibration store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct CalibrationDataset {
    header: EepromHeader,
    bands: [Option<BandCalibration>; 3],
    target_powers: [TargetPowers; 3],
    ctls: Vec<CtlRecord, NUM_CTLS_3_3>,
}

impl CalibrationDataset {
    /// The decoded header.
    pub fn header(&self) -> &EepromHeader {
        &self.header
    }

    /// The stored format version.
    pub fn version(&self) -> FormatVersion {
        self.header.version
    }

    /// The raw power encoding.
    pub fn map(&self) -> MapType {
        self.header.map
    }

    /// Calibration of `band`, or `None` if the band is disabled.
    pub fn band(&self, band: Band) -> Option<&BandCalibration> {
        self.bands[band.index()].as_ref()
    }

    /// Calibrations of every enabled band.
    pub fn bands(&self) -> impl Iterator<Item = &BandCalibration> {
        self.bands.iter().flatten()
    }

    /// Target powers of `band`. Empty for a disabled band.
    pub fn target_powers(&self, band: Band) -> &[TargetPower] {
        &self.target_powers[band.index()]
    }

    /// Conformance test limits, holes removed.
    pub fn ctls(&self) -> &[CtlRecord] {
        &self.ctls
    }

    /// The limits of CTL id `ctl`.
    pub fn ctl(&self, ctl: u8) -> Option<&CtlRecord> {
        self.ctls.iter().find(|record| record.ctl == ctl)
    }
}

/// Decodes the raw power of every enabled band.
///
/// Map 1 and map 2 bands share one running offset, so a disabled band
/// consumes no words.
fn decode_power<S: WordSource + ?Sized>(
    source: &mut S,
    header: &EepromHeader,
) -> Result<[Option<BandCalibration>; 3], DecodeError<S::Error>> {
    let version = header.version;
    let start = match header.map {
        MapType::Pcdac => version.groups_offset(),
        MapType::Xpd => GROUPS_OFFSET_3_3,
        MapType::Vpd => u32::from(header.map2_power_cal_start),
    };
    let mut reader = WordReader::new(source, start);

    let mut bands: [Option<BandCalibration>; 3] = Default::default();
    for band in Band::ALL {
        if !header.band_enabled(band) {
            continue;
        }
        let xpd_mask = header.modal(band).xgain;
        let (piers, power) = match header.map {
            MapType::Pcdac => {
                let piers = match band {
                    Band::A => piers::legacy_11a(&mut reader, version)?,
                    Band::B | Band::G => piers::legacy_2ghz(band),
                };
                let channels = legacy::decode_band(&mut reader, version, band, &piers)?;
                (piers, PowerCalibration::Pcdac(channels))
            }
            MapType::Xpd => {
                let (piers, channels) = xpd::decode_band(&mut reader, header, band)?;
                (piers, PowerCalibration::Xpd { xpd_mask, channels })
            }
            MapType::Vpd => {
                let (piers, channels) = vpd::decode_band(&mut reader, version, band, xpd_mask)?;
                (piers, PowerCalibration::Vpd { xpd_mask, channels })
            }
        };
        debug!("band {}: {} piers", band.index(), piers.len());
        bands[band.index()] = Some(BandCalibration { band, piers, power });
    }
    Ok(bands)
}

/// Decodes a calibration store.
///
/// Reads the version and map type, the header, the raw power of each enabled
/// band, the target powers and the conformance test limits, in that order.
/// The source is only read, so decoding the same store twice yields equal
/// datasets.
///
/// # Errors
/// The first failure of any stage, see [`DecodeError`].
pub fn decode<S: WordSource + ?Sized>(
    source: &mut S,
) -> Result<CalibrationDataset, DecodeError<S::Error>> {
    let (version, map) = version::select(source)?;
    let header = header::decode(source, version, map)?;
    let bands = decode_power(source, &header)?;
    let target_powers = target::decode(source, &header)?;
    let ctls = ctl::decode(source, &header)?;
    Ok(CalibrationDataset {
        header,
        bands,
        target_powers,
        ctls,
    })
}
