//! The orientation fusion filter.
//!
//! A fixed-interval complementary filter: the gyro integrator supplies
//! high-frequency responsiveness, the tilt compass anchors long-term
//! accuracy. Each tick blends the two per axis (with explicit handling of
//! the +/-pi seam) and commits the result as the new cumulative rotation.

use crate::calibration::CalibrationAccumulator;
use crate::compass::TiltCompass;
use crate::gyro::GyroIntegrator;
use crate::rotation::wrap_pi;
use crate::types::{FusedOrientation, Orientation};
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::time::Duration;
use tracing::info;

/// Fusion filter parameters.
#[derive(Debug, Clone)]
pub struct FusionSettings {
    /// Weight given to the gyro-derived orientation per tick.
    pub coefficient: f32,
    /// Number of per-tick drift samples in the calibration window.
    pub calibration_ticks: u32,
    /// Fixed fusion tick interval.
    pub tick_interval: Duration,
    /// Physical heading the azimuth anchor shift maps onto.
    pub anchor_azimuth: f32,
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            coefficient: 0.98,
            calibration_ticks: 50,
            tick_interval: Duration::from_millis(90),
            anchor_azimuth: -FRAC_PI_2,
        }
    }
}

enum FilterPhase {
    /// Waiting for the first valid compass estimate to seed the filter.
    Anchoring,
    /// Estimating per-tick gyro drift.
    Calibrating(CalibrationAccumulator),
    /// Steady state: the frozen bias is applied before every blend.
    Fusing { bias: Vec3 },
}

/// Owns all per-session fusion state. Created at session start, dropped at
/// session stop; never shared beyond the session lock.
pub struct FusionEngine {
    settings: FusionSettings,
    compass: TiltCompass,
    integrator: GyroIntegrator,
    phase: FilterPhase,
    fused: Orientation,
    tick: u64,
}

impl FusionEngine {
    pub fn new(settings: FusionSettings) -> Self {
        Self {
            settings,
            compass: TiltCompass::new(),
            integrator: GyroIntegrator::new(),
            phase: FilterPhase::Anchoring,
            fused: Orientation::ZERO,
            tick: 0,
        }
    }

    pub fn push_accel(&mut self, values: Vec3) {
        self.compass.push_accel(values);
    }

    pub fn push_mag(&mut self, values: Vec3) {
        self.compass.push_mag(values);
    }

    /// Integrate a gyroscope sample. Ignored until the session has anchored:
    /// there is nothing meaningful to integrate on top of before the
    /// cumulative rotation has been seeded from the compass.
    pub fn push_gyro(&mut self, values: Vec3, timestamp_ns: u64) {
        if matches!(self.phase, FilterPhase::Anchoring) {
            return;
        }
        self.integrator.integrate(values, timestamp_ns);
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self.phase, FilterPhase::Fusing { .. })
    }

    /// Frozen per-tick drift estimate, once calibration has completed.
    pub fn gyro_bias(&self) -> Option<Vec3> {
        match self.phase {
            FilterPhase::Fusing { bias } => Some(bias),
            _ => None,
        }
    }

    pub fn fused(&self) -> Orientation {
        self.fused
    }

    /// Run one fusion tick.
    ///
    /// Returns `None` until the compass has produced a first valid estimate;
    /// afterwards always yields a complete snapshot computed from the latest
    /// available samples (missing updates are tolerated by reuse).
    pub fn tick(&mut self) -> Option<FusedOrientation> {
        let mut compass = self.compass.orientation()?;

        match &mut self.phase {
            FilterPhase::Anchoring => {
                let shift = wrap_pi(compass.azimuth - self.settings.anchor_azimuth);
                self.compass.set_azimuth_shift(shift);
                compass.azimuth = wrap_pi(compass.azimuth - shift);
                self.integrator.set_orientation(compass);
                info!(shift_rad = shift, "fusion anchored");
                self.phase = FilterPhase::Calibrating(CalibrationAccumulator::new());
            }
            FilterPhase::Calibrating(accumulator) => {
                accumulator.observe(self.integrator.orientation());
                if accumulator.samples() >= self.settings.calibration_ticks {
                    let bias = accumulator.average();
                    info!(
                        bias_azimuth = bias.x,
                        bias_pitch = bias.y,
                        bias_roll = bias.z,
                        "gyro bias calibration complete"
                    );
                    // Re-anchor the integrator on the compass before steady state.
                    self.integrator.set_orientation(compass);
                    self.phase = FilterPhase::Fusing { bias };
                }
            }
            FilterPhase::Fusing { bias } => {
                let corrected =
                    Orientation::from_vec3(self.integrator.orientation().to_vec3() - *bias);
                self.integrator.set_orientation(corrected);
            }
        }

        let coefficient = self.settings.coefficient;
        let gyro = self.integrator.orientation();
        let fused = Orientation {
            azimuth: blend_axis(coefficient, gyro.azimuth, compass.azimuth),
            pitch: blend_axis(coefficient, gyro.pitch, compass.pitch),
            roll: blend_axis(coefficient, gyro.roll, compass.roll),
        };
        self.fused = fused;

        // Drift correction: overwrite the cumulative rotation with the fused
        // orientation. Held off during calibration so the drift estimate
        // differences the integrator purely against itself.
        let calibrated = self.is_calibrated();
        if calibrated {
            self.integrator.set_orientation(fused);
        }

        self.tick += 1;
        Some(FusedOrientation {
            orientation: fused,
            compass_stale: self.compass.is_stale(),
            calibrated,
            tick: self.tick,
        })
    }
}

/// Complementary blend of one axis.
///
/// When the two estimates straddle the +/-pi seam (one below -pi/2, the
/// other positive), the negative one is lifted by 2*pi before blending and
/// the result wrapped back. Without this, -179 deg and +179 deg would
/// average near 0 deg instead of +/-180 deg.
fn blend_axis(coefficient: f32, gyro: f32, compass: f32) -> f32 {
    let one_minus = 1.0 - coefficient;
    let mut fused = if gyro < -FRAC_PI_2 && compass > 0.0 {
        coefficient * (gyro + TAU) + one_minus * compass
    } else if compass < -FRAC_PI_2 && gyro > 0.0 {
        coefficient * gyro + one_minus * (compass + TAU)
    } else {
        return coefficient * gyro + one_minus * compass;
    };
    if fused > PI {
        fused -= TAU;
    }
    fused
}
