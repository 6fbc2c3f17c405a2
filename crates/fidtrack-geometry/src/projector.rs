//! Projection of a camera-relative position into camera and world frames.
//!
//! Pure frame bookkeeping on top of the resolver output; no estimation
//! happens here.

use crate::types::{CameraAttitude, RelativePosition};
use glam::DVec3;

/// Camera-frame displacement of the marker.
///
/// Axes: x right of the camera axis, y forward along it, z up. The forward
/// component uses the mean of the two offset cosines, matching the
/// calibration the marker size constant was tuned against.
pub fn camera_frame(position: &RelativePosition) -> DVec3 {
    let d = position.distance;
    DVec3::new(
        d * position.rad_x.sin(),
        d * (position.rad_x.cos() + position.rad_y.cos()) / 2.0,
        d * position.rad_y.sin(),
    )
}

/// World-frame displacement of the marker relative to the camera.
///
/// The fused attitude carries the camera's bearing off the session anchor
/// and its elevation; adding the marker's angular offsets gives the ray to
/// the marker. Axes: x right of the anchor heading, y along it, z up.
pub fn world_frame(attitude: &CameraAttitude, position: &RelativePosition) -> DVec3 {
    let bearing = attitude.azimuth + position.rad_x;
    let elevation = attitude.elevation + position.rad_y;
    let d = position.distance;
    DVec3::new(
        d * elevation.cos() * bearing.sin(),
        d * elevation.cos() * bearing.cos(),
        d * elevation.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn on_axis_marker_sits_straight_ahead() {
        let position = RelativePosition {
            rad_x: 0.0,
            rad_y: 0.0,
            distance: 3.0,
        };
        let cam = camera_frame(&position);
        assert!(close(cam.x, 0.0) && close(cam.y, 3.0) && close(cam.z, 0.0));

        let world = world_frame(&CameraAttitude::default(), &position);
        assert!(close(world.x, 0.0) && close(world.y, 3.0) && close(world.z, 0.0));
    }

    #[test]
    fn positive_rad_x_lands_right_of_the_axis() {
        let position = RelativePosition {
            rad_x: 0.2,
            rad_y: 0.0,
            distance: 2.0,
        };
        let cam = camera_frame(&position);
        assert!(cam.x > 0.0);
        assert!(close(cam.x, 2.0 * 0.2_f64.sin()));
    }

    #[test]
    fn positive_rad_y_lands_above_the_axis() {
        let position = RelativePosition {
            rad_x: 0.0,
            rad_y: 0.15,
            distance: 2.0,
        };
        let cam = camera_frame(&position);
        assert!(cam.z > 0.0);
        assert!(close(cam.z, 2.0 * 0.15_f64.sin()));
    }

    #[test]
    fn camera_bearing_rotates_the_world_vector() {
        let position = RelativePosition {
            rad_x: 0.0,
            rad_y: 0.0,
            distance: 5.0,
        };
        // Camera turned a quarter turn right of the anchor: the marker sits
        // along +x in world frame.
        let attitude = CameraAttitude {
            azimuth: FRAC_PI_2,
            elevation: 0.0,
        };
        let world = world_frame(&attitude, &position);
        assert!(close(world.x, 5.0));
        assert!(world.y.abs() < 1e-9);
    }

    #[test]
    fn elevation_lifts_the_world_vector() {
        let position = RelativePosition {
            rad_x: 0.0,
            rad_y: 0.1,
            distance: 4.0,
        };
        let attitude = CameraAttitude {
            azimuth: 0.0,
            elevation: 0.2,
        };
        let world = world_frame(&attitude, &position);
        assert!(close(world.z, 4.0 * 0.3_f64.sin()));
        assert!(close(world.y, 4.0 * 0.3_f64.cos()));
    }
}
