//! Raw power calibration.
//!
//! Each enabled band carries one raw power record per pier. The record
//! encoding is chosen by the map type:
//!
//! - [`legacy`]: a PCDAC min/max pair and eleven scaled power values
//! - [`xpd`]: up to two XPD gain stages of PCDAC/power points
//! - [`vpd`]: up to four pd gain stages stored as an initial point plus
//!   deltas, rebuilt into curves by [`expand`]
//!
//! Maps 1 and 2 produce [`GainChannel`]s: per pier, one [`GainCurve`] for
//! every gain stage selected by the band's mask.

use crate::consts::{MAX_CURVE_POINTS, MAX_NUM_PDGAINS_PER_CHANNEL, MAX_PIERS, NUM_INTERCEPTS};
use heapless::Vec;

pub mod expand;
pub mod legacy;
pub mod vpd;
pub mod xpd;

/// A measured point of a power curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct CalibrationPoint {
    /// Output power in quarter dB.
    pub power: i16,
    /// PCDAC code (map 1) or Vpd detector code (map 2).
    pub control: u16,
}

/// Points of one gain stage, ordered by increasing control code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct GainCurve {
    /// Index of the gain stage, 0 to 3.
    pub pd_gain: u8,
    /// Curve points.
    pub points: Vec<CalibrationPoint, MAX_CURVE_POINTS>,
}

/// Gain stage curves measured at one pier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct GainChannel {
    /// Pier frequency in MHz.
    pub frequency: u16,
    /// Channel maximum power in quarter dB (map 1 only).
    pub max_power: Option<i16>,
    /// One curve per selected gain stage, by increasing `pd_gain`.
    pub curves: Vec<GainCurve, MAX_NUM_PDGAINS_PER_CHANNEL>,
}

impl GainChannel {
    /// Curve of gain stage `pd_gain`, if selected.
    pub fn curve(&self, pd_gain: u8) -> Option<&GainCurve> {
        self.curves.iter().find(|curve| curve.pd_gain == pd_gain)
    }
}

/// Legacy (map 0) calibration of one pier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct PcdacChannel {
    /// Pier frequency in MHz.
    pub frequency: u16,
    /// Lowest calibrated PCDAC code.
    pub pcdac_min: u16,
    /// Highest calibrated PCDAC code.
    pub pcdac_max: u16,
    /// PCDAC intercepts interpolated between `pcdac_min` and `pcdac_max`.
    pub pcdac: [u16; NUM_INTERCEPTS],
    /// Power at each intercept, scaled by [`PWR_STEP`](crate::consts::PWR_STEP).
    pub power: [u16; NUM_INTERCEPTS],
}

/// Raw power calibration of one band.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum PowerCalibration {
    /// Map 0.
    Pcdac(Vec<PcdacChannel, MAX_PIERS>),
    /// Map 1.
    Xpd {
        /// Gain stages selected for the band.
        xpd_mask: u8,
        /// Expanded channels.
        channels: Vec<GainChannel, MAX_PIERS>,
    },
    /// Map 2.
    Vpd {
        /// Gain stages selected for the band.
        xpd_mask: u8,
        /// Expanded channels.
        channels: Vec<GainChannel, MAX_PIERS>,
    },
}

impl PowerCalibration {
    /// Number of calibrated piers.
    pub fn len(&self) -> usize {
        match self {
            PowerCalibration::Pcdac(channels) => channels.len(),
            PowerCalibration::Xpd { channels, .. } | PowerCalibration::Vpd { channels, .. } => {
                channels.len()
            }
        }
    }

    /// Whether no pier was calibrated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gain stage channels of maps 1 and 2.
    pub fn gain_channels(&self) -> Option<&[GainChannel]> {
        match self {
            PowerCalibration::Pcdac(_) => None,
            PowerCalibration::Xpd { channels, .. } | PowerCalibration::Vpd { channels, .. } => {
                Some(channels.as_slice())
            }
        }
    }
}

/// Gain stages selected by the low four bits of `mask`, in increasing order.
pub fn gain_stages(mask: u8) -> Vec<u8, MAX_NUM_PDGAINS_PER_CHANNEL> {
    let mut stages = Vec::new();
    for stage in 0..MAX_NUM_PDGAINS_PER_CHANNEL as u8 {
        if (mask >> stage) & 1 != 0 {
            let _ = stages.push(stage);
        }
    }
    stages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_stages() {
        assert!(gain_stages(0b0000).is_empty());
        assert_eq!(&gain_stages(0b1001)[..], &[0, 3]);
        assert_eq!(&gain_stages(0b1111)[..], &[0, 1, 2, 3]);
        // Bits above the fourth stage are ignored.
        assert_eq!(&gain_stages(0xf4)[..], &[2]);
    }

    #[test]
    fn test_curve_lookup() {
        let mut channel = GainChannel {
            frequency: 5180,
            max_power: None,
            curves: Vec::new(),
        };
        channel
            .curves
            .push(GainCurve {
                pd_gain: 3,
                points: Vec::new(),
            })
            .unwrap();
        assert!(channel.curve(3).is_some());
        assert!(channel.curve(0).is_none());
    }
}
