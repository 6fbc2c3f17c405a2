//! Tilt-compensated compass: absolute orientation from gravity + magnetic field.

use crate::rotation::{self, wrap_pi};
use crate::types::Orientation;
use glam::{Mat3, Vec3};

/// Minimum magnitude of the field cross product accepted by the rotation
/// construction. Below this the device is in free-fall or the magnetic
/// field is (anti)parallel to gravity and no heading can be derived.
const MIN_FIELD_CROSS: f32 = 0.1;

/// Absolute 3-axis orientation from the latest accelerometer + magnetometer
/// pair.
///
/// A no-op until both streams have reported at least once. A singular
/// rotation (free-fall, degenerate field geometry) leaves the previous
/// estimate in place and flags it stale.
pub struct TiltCompass {
    accel: Option<Vec3>,
    mag: Option<Vec3>,
    orientation: Option<Orientation>,
    azimuth_shift: f32,
    stale: bool,
}

impl TiltCompass {
    pub fn new() -> Self {
        Self {
            accel: None,
            mag: None,
            orientation: None,
            azimuth_shift: 0.0,
            stale: false,
        }
    }

    /// Record an accelerometer reading and recompute the estimate.
    pub fn push_accel(&mut self, values: Vec3) {
        self.accel = Some(values);
        self.recompute();
    }

    /// Record a magnetometer reading. The estimate is recomputed on the
    /// next accelerometer arrival, matching the source cadence the tuning
    /// assumes.
    pub fn push_mag(&mut self, values: Vec3) {
        self.mag = Some(values);
    }

    /// Latest estimate, if one has ever been derived.
    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// True when the most recent update failed and the estimate is a
    /// retained older value.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Install the azimuth anchor shift, re-basing the current estimate.
    ///
    /// Computed once at session anchoring; every subsequent estimate has the
    /// shift subtracted so the configured anchor heading reads as azimuth 0
    /// plus the anchor value.
    pub fn set_azimuth_shift(&mut self, shift: f32) {
        self.azimuth_shift = shift;
        if let Some(o) = &mut self.orientation {
            o.azimuth = wrap_pi(o.azimuth - shift);
        }
    }

    fn recompute(&mut self) {
        let (Some(accel), Some(mag)) = (self.accel, self.mag) else {
            return;
        };
        match rotation_from_gravity_mag(accel, mag) {
            Some(matrix) => {
                let mut o = rotation::orientation_from_matrix(&matrix);
                o.azimuth = wrap_pi(o.azimuth - self.azimuth_shift);
                self.orientation = Some(o);
                self.stale = false;
            }
            None => {
                self.stale = true;
            }
        }
    }
}

impl Default for TiltCompass {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation matrix from a gravity vector and a geomagnetic field vector.
///
/// Rows are the device-frame east (H = E x A), north (M = A x H) and up (A)
/// directions. Returns `None` when the cross product is too small to
/// normalize.
fn rotation_from_gravity_mag(gravity: Vec3, geomagnetic: Vec3) -> Option<Mat3> {
    let h = geomagnetic.cross(gravity);
    let norm_h = h.length();
    if norm_h < MIN_FIELD_CROSS {
        return None;
    }
    let h = h / norm_h;
    let a = gravity.normalize();
    let m = a.cross(h);
    Some(Mat3::from_cols_array(&[h.x, h.y, h.z, m.x, m.y, m.z, a.x, a.y, a.z]).transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    /// Device flat, top edge pointing north: gravity straight down the
    /// device z-axis, field pointing north with a downward inclination.
    fn level_north() -> (Vec3, Vec3) {
        (Vec3::new(0.0, 0.0, 9.8), Vec3::new(0.0, 22.0, -40.0))
    }

    #[test]
    fn level_north_reads_zero_azimuth() {
        let mut compass = TiltCompass::new();
        let (accel, mag) = level_north();
        compass.push_mag(mag);
        compass.push_accel(accel);

        let o = compass.orientation().unwrap();
        assert!(o.azimuth.abs() < 1e-5);
        assert!(o.pitch.abs() < 1e-5);
        assert!(o.roll.abs() < 1e-5);
        assert!(!compass.is_stale());
    }

    #[test]
    fn no_estimate_until_both_streams_report() {
        let mut compass = TiltCompass::new();
        compass.push_accel(Vec3::new(0.0, 0.0, 9.8));
        assert!(compass.orientation().is_none());
    }

    #[test]
    fn parallel_field_and_gravity_is_singular() {
        let mut compass = TiltCompass::new();
        compass.push_mag(Vec3::new(0.0, 40.0, 0.0));
        compass.push_accel(Vec3::new(0.0, 9.8, 0.0));
        assert!(compass.orientation().is_none());
        assert!(compass.is_stale());
    }

    #[test]
    fn free_fall_retains_previous_estimate() {
        let mut compass = TiltCompass::new();
        let (accel, mag) = level_north();
        compass.push_mag(mag);
        compass.push_accel(accel);
        let before = compass.orientation().unwrap();

        compass.push_accel(Vec3::ZERO);
        assert!(compass.is_stale());
        assert_eq!(compass.orientation().unwrap(), before);
    }

    #[test]
    fn azimuth_shift_re_bases_current_and_future_estimates() {
        let mut compass = TiltCompass::new();
        let (accel, mag) = level_north();
        compass.push_mag(mag);
        compass.push_accel(accel);

        // Anchor at -pi/2: shift = raw azimuth (0) - anchor.
        compass.set_azimuth_shift(FRAC_PI_2);
        assert!((compass.orientation().unwrap().azimuth + FRAC_PI_2).abs() < 1e-5);

        // A fresh sample pair goes through the same shift.
        compass.push_accel(accel);
        assert!((compass.orientation().unwrap().azimuth + FRAC_PI_2).abs() < 1e-5);
    }
}
