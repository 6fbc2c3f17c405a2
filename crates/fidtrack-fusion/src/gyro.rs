//! Incremental gyroscope integration.

use crate::rotation;
use crate::types::Orientation;
use glam::{Mat3, Quat, Vec3};

/// Angular velocity magnitude below this is treated as zero rotation.
pub const EPSILON: f32 = 1.0e-9;

const NS2S: f32 = 1.0e-9;

/// Integrates angular-velocity samples into a cumulative rotation.
///
/// Purely incremental: the cumulative matrix is never renormalized, so it
/// drifts from strict orthogonality over long sessions. The fusion filter
/// re-seeds it from the fused orientation; that re-anchoring is the drift
/// mitigation, not anything done here.
pub struct GyroIntegrator {
    matrix: Mat3,
    orientation: Orientation,
    last_timestamp_ns: Option<u64>,
    /// Previous normalized rotation axis, reused when the angular velocity
    /// is too small to normalize.
    axis: Vec3,
}

impl GyroIntegrator {
    pub fn new() -> Self {
        Self {
            matrix: Mat3::IDENTITY,
            orientation: Orientation::ZERO,
            last_timestamp_ns: None,
            axis: Vec3::ZERO,
        }
    }

    /// Integrate one angular-velocity sample (rad/s).
    ///
    /// The first sample after construction only records its timestamp (no
    /// valid delta yet); the same applies if the sensor clock runs
    /// backwards, which signals a source restart.
    pub fn integrate(&mut self, angular_velocity: Vec3, timestamp_ns: u64) {
        if let Some(prev) = self.last_timestamp_ns {
            if let Some(elapsed) = timestamp_ns.checked_sub(prev) {
                let dt = elapsed as f32 * NS2S;
                let delta = self.delta_rotation(angular_velocity, dt / 2.0);
                self.matrix *= delta;
                self.orientation = rotation::orientation_from_matrix(&self.matrix);
            }
        }
        self.last_timestamp_ns = Some(timestamp_ns);
    }

    /// Delta rotation matrix for this sample: axis-angle over the timestep,
    /// via a half-angle quaternion.
    fn delta_rotation(&mut self, omega: Vec3, half_dt: f32) -> Mat3 {
        let magnitude = omega.length();
        if magnitude > EPSILON {
            self.axis = omega / magnitude;
        }
        let theta_over_two = magnitude * half_dt;
        let (sin_half, cos_half) = theta_over_two.sin_cos();
        let q = Quat::from_xyzw(
            sin_half * self.axis.x,
            sin_half * self.axis.y,
            sin_half * self.axis.z,
            cos_half,
        );
        Mat3::from_quat(q)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Re-seed the cumulative rotation from the given orientation.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.matrix = rotation::matrix_from_orientation(orientation);
        self.orientation = orientation;
    }
}

impl Default for GyroIntegrator {
    fn default() -> Self {
        Self::new()
    }
}
