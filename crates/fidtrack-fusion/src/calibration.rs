//! Gyro drift calibration bookkeeping.

use crate::types::Orientation;
use glam::Vec3;

/// Running per-axis drift accumulator used during the calibration window.
///
/// Differences the integrator orientation against its own previous-tick
/// value (never against the compass, whose noise would contaminate the
/// estimate) and maintains the running average. Lives only inside the
/// calibrating phase; completion freezes the average and discards this
/// state.
#[derive(Debug, Default)]
pub struct CalibrationAccumulator {
    previous: Option<Vec3>,
    cumulative: Vec3,
    average: Vec3,
    count: u32,
}

impl CalibrationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one calibration tick.
    pub fn observe(&mut self, orientation: Orientation) {
        let angles = orientation.to_vec3();
        if let Some(previous) = self.previous {
            self.cumulative += angles - previous;
            self.count += 1;
            self.average = self.cumulative / self.count as f32;
        }
        self.previous = Some(angles);
    }

    /// Number of per-tick differences accumulated so far.
    pub fn samples(&self) -> u32 {
        self.count
    }

    /// Average per-tick drift, (azimuth, pitch, roll).
    pub fn average(&self) -> Vec3 {
        self.average
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_yields_no_sample() {
        let mut acc = CalibrationAccumulator::new();
        acc.observe(Orientation {
            azimuth: 0.5,
            ..Orientation::ZERO
        });
        assert_eq!(acc.samples(), 0);
        assert_eq!(acc.average(), Vec3::ZERO);
    }

    #[test]
    fn constant_drift_averages_to_the_step() {
        let mut acc = CalibrationAccumulator::new();
        let step = 0.002_f32;
        for i in 0..=20 {
            acc.observe(Orientation {
                azimuth: i as f32 * step,
                ..Orientation::ZERO
            });
        }
        assert_eq!(acc.samples(), 20);
        assert!((acc.average().x - step).abs() < 1e-6);
        assert!(acc.average().y.abs() < 1e-9);
        assert!(acc.average().z.abs() < 1e-9);
    }

    #[test]
    fn mixed_drift_averages_per_axis() {
        let mut acc = CalibrationAccumulator::new();
        for i in 0..=10 {
            acc.observe(Orientation {
                azimuth: i as f32 * 0.01,
                pitch: i as f32 * -0.004,
                roll: 0.3,
            });
        }
        assert!((acc.average().x - 0.01).abs() < 1e-6);
        assert!((acc.average().y + 0.004).abs() < 1e-6);
        assert!(acc.average().z.abs() < 1e-7);
    }
}
