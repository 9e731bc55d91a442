//! Rebuilds map 2 curves from their delta-compressed records.
//!
//! Records store stages from the highest selected pd gain down. The lowest
//! pd gain covers the highest powers and carries one more point than the
//! others.

use super::vpd::VpdRecord;
use super::{CalibrationPoint, GainChannel, GainCurve, gain_stages};
use crate::consts::{NUM_POINTS_LAST_PDGAIN, NUM_POINTS_OTHER_PDGAINS};
use heapless::Vec;

/// Expands `record` into one curve per pd gain selected by `xpd_mask`.
///
/// Point 0 is `(4 * pwr_i, vpd_i)`; each further point adds
/// `(2 * pwr_delta, vpd_delta)`, so every curve is non-decreasing in both
/// power and Vpd. Curves are returned by increasing pd gain.
pub fn expand(record: &VpdRecord, xpd_mask: u8) -> GainChannel {
    let pd_gains = gain_stages(xpd_mask);
    let count = record.stages.len().min(pd_gains.len());

    let mut curves = Vec::new();
    // Storage stage `j` holds pd gain `pd_gains[count - 1 - j]`.
    for (j, stage) in record.stages.iter().enumerate().take(count).rev() {
        let points = if j + 1 == count {
            NUM_POINTS_LAST_PDGAIN
        } else {
            NUM_POINTS_OTHER_PDGAINS
        };

        let mut curve = GainCurve {
            pd_gain: pd_gains[count - 1 - j],
            points: Vec::new(),
        };
        let mut point = CalibrationPoint {
            power: 4 * i16::from(stage.pwr_i),
            control: u16::from(stage.vpd_i),
        };
        let _ = curve.points.push(point);
        for k in 1..points {
            point.power += 2 * i16::from(stage.pwr_delta[k - 1]);
            point.control += u16::from(stage.vpd_delta[k - 1]);
            let _ = curve.points.push(point);
        }
        let _ = curves.push(curve);
    }

    GainChannel {
        frequency: record.frequency,
        max_power: None,
        curves,
    }
}
