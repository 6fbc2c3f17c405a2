use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Orientation fusion parameters.
    pub fusion: FusionConfig,
    /// Camera view parameters, fixed for a session.
    pub camera: CameraConfig,
    /// Physical marker parameters.
    pub marker: MarkerConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            fusion: FusionConfig::default(),
            camera: CameraConfig::default(),
            marker: MarkerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Complementary filter coefficient: weight given to the gyro-derived
    /// orientation per tick. Higher = more responsive, more drift-prone.
    pub filter_coefficient: f32,
    /// Number of fusion ticks in the gyro bias calibration window.
    pub calibration_ticks: u32,
    /// Fusion tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Physical heading (radians) that the azimuth anchor shift maps onto.
    pub anchor_azimuth_rad: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            filter_coefficient: 0.98,
            calibration_ticks: 50,
            tick_interval_ms: 90,
            anchor_azimuth_rad: -std::f32::consts::FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Horizontal field of view in radians.
    pub horizontal_fov_rad: f64,
    /// Sensor resolution in pixels (width, height).
    pub resolution: (u32, u32),
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            horizontal_fov_rad: 1.0,
            resolution: (1920, 1080),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Physical edge length of the marker square, in centimeters.
    pub edge_length_cm: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self { edge_length_cm: 12.2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tuning() {
        let config = TrackerConfig::default();
        assert!((config.fusion.filter_coefficient - 0.98).abs() < f32::EPSILON);
        assert_eq!(config.fusion.calibration_ticks, 50);
        assert_eq!(config.fusion.tick_interval_ms, 90);
        assert_eq!(config.camera.resolution, (1920, 1080));
        assert!((config.marker.edge_length_cm - 12.2).abs() < f64::EPSILON);
    }

    #[test]
    fn toml_round_trip() {
        let config = TrackerConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: TrackerConfig = toml::from_str(&text).unwrap();
        assert!((parsed.fusion.anchor_azimuth_rad - config.fusion.anchor_azimuth_rad).abs() < 1e-6);
        assert!((parsed.camera.horizontal_fov_rad - config.camera.horizontal_fov_rad).abs() < 1e-12);
    }
}
