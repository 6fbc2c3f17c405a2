//! Rotation matrix <-> orientation angle conversions.
//!
//! The matrix conventions mirror the platform sensor stack the tuning
//! constants were calibrated against: row-major rotations composed in
//! y, x, z order (roll, pitch, azimuth), with angles extracted via
//! azimuth = atan2(R01, R11), pitch = asin(-R21), roll = atan2(-R20, R22).

use crate::types::Orientation;
use glam::Mat3;
use std::f32::consts::{PI, TAU};

/// Build a [`Mat3`] from a row-major element array.
fn row_major(rows: [f32; 9]) -> Mat3 {
    Mat3::from_cols_array(&rows).transpose()
}

/// Row-major element accessor.
fn at(m: &Mat3, row: usize, col: usize) -> f32 {
    m.col(col)[row]
}

/// Normalize an angle into (-pi, pi].
pub fn wrap_pi(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Rotation matrix for the given orientation angles.
pub fn matrix_from_orientation(o: Orientation) -> Mat3 {
    let (sin_z, cos_z) = o.azimuth.sin_cos();
    let (sin_x, cos_x) = o.pitch.sin_cos();
    let (sin_y, cos_y) = o.roll.sin_cos();

    // rotation about x-axis (pitch)
    let x_m = row_major([
        1.0, 0.0, 0.0, //
        0.0, cos_x, sin_x, //
        0.0, -sin_x, cos_x,
    ]);
    // rotation about y-axis (roll)
    let y_m = row_major([
        cos_y, 0.0, sin_y, //
        0.0, 1.0, 0.0, //
        -sin_y, 0.0, cos_y,
    ]);
    // rotation about z-axis (azimuth)
    let z_m = row_major([
        cos_z, sin_z, 0.0, //
        -sin_z, cos_z, 0.0, //
        0.0, 0.0, 1.0,
    ]);

    // rotation order is y, x, z (roll, pitch, azimuth)
    z_m * x_m * y_m
}

/// Orientation angles extracted from a rotation matrix.
pub fn orientation_from_matrix(m: &Mat3) -> Orientation {
    Orientation {
        azimuth: at(m, 0, 1).atan2(at(m, 1, 1)),
        pitch: (-at(m, 2, 1)).asin(),
        roll: (-at(m, 2, 0)).atan2(at(m, 2, 2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} vs {b}");
    }

    #[test]
    fn identity_matrix_is_zero_orientation() {
        let o = orientation_from_matrix(&Mat3::IDENTITY);
        assert_close(o.azimuth, 0.0);
        assert_close(o.pitch, 0.0);
        assert_close(o.roll, 0.0);
    }

    #[test]
    fn single_axis_angles_round_trip() {
        for angle in [-1.2_f32, -0.3, 0.0, 0.4, 1.5] {
            let az = orientation_from_matrix(&matrix_from_orientation(Orientation {
                azimuth: angle,
                ..Orientation::ZERO
            }));
            assert_close(az.azimuth, angle);

            let pitch = orientation_from_matrix(&matrix_from_orientation(Orientation {
                pitch: angle,
                ..Orientation::ZERO
            }));
            assert_close(pitch.pitch, angle);

            let roll = orientation_from_matrix(&matrix_from_orientation(Orientation {
                roll: angle,
                ..Orientation::ZERO
            }));
            assert_close(roll.roll, angle);
        }
    }

    #[test]
    fn composite_orientation_round_trips() {
        let o = Orientation {
            azimuth: 0.7,
            pitch: -0.4,
            roll: 1.1,
        };
        let back = orientation_from_matrix(&matrix_from_orientation(o));
        assert_close(back.azimuth, o.azimuth);
        assert_close(back.pitch, o.pitch);
        assert_close(back.roll, o.roll);
    }

    #[test]
    fn wrap_pi_stays_in_half_open_interval() {
        for angle in [-7.0_f32, -PI, -0.1, 0.0, PI, 3.5, 9.42] {
            let w = wrap_pi(angle);
            assert!(w > -PI && w <= PI, "{angle} wrapped to {w}");
        }
        assert_close(wrap_pi(PI + 0.25), -PI + 0.25);
        assert_close(wrap_pi(-PI - 0.25), PI - 0.25);
    }
}
