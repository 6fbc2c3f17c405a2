use crate::error::GeometryError;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// The four detected marker corners in pixel space, detector order: edge
/// (0,1) is the marker's vertical reference edge, edge (1,2) its horizontal
/// reference edge. Supplied per detection, never retained across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerCorners([DVec2; 4]);

impl MarkerCorners {
    /// Validate a detector point list. Anything but exactly four points is
    /// an invalid input.
    pub fn from_points(points: &[DVec2]) -> Result<Self, GeometryError> {
        <[DVec2; 4]>::try_from(points)
            .map(Self)
            .map_err(|_| GeometryError::InvalidCornerCount { got: points.len() })
    }

    pub fn points(&self) -> &[DVec2; 4] {
        &self.0
    }

    /// Pixel length of the vertical reference edge (corners 0-1).
    pub fn vertical_edge_px(&self) -> f64 {
        self.0[0].distance(self.0[1])
    }

    /// Pixel length of the horizontal reference edge (corners 1-2).
    pub fn horizontal_edge_px(&self) -> f64 {
        self.0[1].distance(self.0[2])
    }

    pub fn vertical_edge_midpoint(&self) -> DVec2 {
        (self.0[0] + self.0[1]) / 2.0
    }

    pub fn horizontal_edge_midpoint(&self) -> DVec2 {
        (self.0[1] + self.0[2]) / 2.0
    }

    /// Marker centre: midpoint of the diagonal corners 0 and 2.
    pub fn center(&self) -> DVec2 {
        (self.0[0] + self.0[2]) / 2.0
    }
}

/// Pinhole view parameters, fixed for a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Horizontal field of view in radians.
    pub horizontal_fov: f64,
    /// Sensor resolution in pixels (width, height).
    pub resolution: (u32, u32),
}

impl CameraIntrinsics {
    /// Angular width of a single pixel.
    pub fn angle_per_pixel(&self) -> f64 {
        self.horizontal_fov / self.resolution.0 as f64
    }

    /// Image centre in pixel coordinates.
    pub fn center(&self) -> DVec2 {
        DVec2::new(
            self.resolution.0 as f64 / 2.0,
            self.resolution.1 as f64 / 2.0,
        )
    }
}

/// Fused camera attitude at the moment of detection.
///
/// Azimuth is the heading offset from the session anchor, elevation the
/// pitch above the horizon; both radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraAttitude {
    pub azimuth: f64,
    pub elevation: f64,
}

/// Camera-relative marker position.
///
/// Sign conventions: positive `rad_x` puts the marker right of the camera
/// axis, positive `rad_y` above it; `distance` is the slant distance along
/// the viewing ray, non-negative, in the unit of the marker edge length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativePosition {
    pub rad_x: f64,
    pub rad_y: f64,
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_corners() -> Vec<DVec2> {
        vec![
            DVec2::new(910.0, 490.0),
            DVec2::new(910.0, 590.0),
            DVec2::new(1010.0, 590.0),
            DVec2::new(1010.0, 490.0),
        ]
    }

    #[test]
    fn corner_count_is_enforced() {
        let points = square_corners();
        assert!(MarkerCorners::from_points(&points).is_ok());
        assert_eq!(
            MarkerCorners::from_points(&points[..3]),
            Err(GeometryError::InvalidCornerCount { got: 3 })
        );
        assert_eq!(
            MarkerCorners::from_points(&[]),
            Err(GeometryError::InvalidCornerCount { got: 0 })
        );
    }

    #[test]
    fn edges_and_centre_follow_detector_order() {
        let corners = MarkerCorners::from_points(&square_corners()).unwrap();
        assert!((corners.vertical_edge_px() - 100.0).abs() < 1e-12);
        assert!((corners.horizontal_edge_px() - 100.0).abs() < 1e-12);
        assert_eq!(corners.center(), DVec2::new(960.0, 540.0));
    }

    #[test]
    fn angle_per_pixel_from_fov() {
        let intrinsics = CameraIntrinsics {
            horizontal_fov: 1.0,
            resolution: (1920, 1080),
        };
        assert!((intrinsics.angle_per_pixel() - 1.0 / 1920.0).abs() < 1e-15);
        assert_eq!(intrinsics.center(), DVec2::new(960.0, 540.0));
    }
}
