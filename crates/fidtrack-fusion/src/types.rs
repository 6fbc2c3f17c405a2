use glam::Vec3;

/// Orientation angles derived from a rotation matrix.
///
/// Azimuth, pitch and roll in radians, each normalized to (-pi, pi].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub azimuth: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Orientation {
    pub const ZERO: Self = Self {
        azimuth: 0.0,
        pitch: 0.0,
        roll: 0.0,
    };

    /// Angles as a vector in (azimuth, pitch, roll) order.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.azimuth, self.pitch, self.roll)
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self {
            azimuth: v.x,
            pitch: v.y,
            roll: v.z,
        }
    }
}

/// A raw 3-axis sensor reading with its source timestamp.
///
/// Accelerometer values are m/s^2, magnetometer values uT, gyroscope values
/// rad/s. Timestamps come from the sensor clock; only the gyroscope path
/// uses them (for integration deltas).
#[derive(Debug, Clone, Copy)]
pub struct SensorSample {
    pub values: Vec3,
    /// Sensor clock timestamp in nanoseconds.
    pub timestamp_ns: u64,
}

impl SensorSample {
    pub fn new(values: Vec3, timestamp_ns: u64) -> Self {
        Self {
            values,
            timestamp_ns,
        }
    }
}

/// Snapshot published once per fusion tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct FusedOrientation {
    pub orientation: Orientation,
    /// True when the most recent tilt-compass update failed (singular
    /// rotation) and the compass contribution is a retained older value.
    pub compass_stale: bool,
    /// True once the gyro bias calibration window has completed.
    pub calibrated: bool,
    /// Ticks elapsed since the session anchored.
    pub tick: u64,
}
