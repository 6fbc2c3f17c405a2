//! Closed-form marker position from corner geometry.
//!
//! The foreshortening corrections (scaling an edge by the cosine of its
//! midpoint's off-centre angle and dividing by the cosine of the orthogonal
//! fused tilt axis) are empirically derived; the physical marker size
//! constants downstream were tuned against these exact formulas, so they
//! are preserved as the reference behavior rather than re-derived from
//! projective geometry.

use crate::error::GeometryError;
use crate::types::{CameraAttitude, CameraIntrinsics, MarkerCorners, RelativePosition};
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, PI};

/// A correction cosine below this magnitude is treated as singular.
const COS_EPSILON: f64 = 1e-6;

/// Resolve a detector point list into a camera-relative position.
///
/// Pure: identical inputs produce bit-identical output. All failures are
/// surfaced; no partial result is ever produced.
pub fn resolve(
    points: &[DVec2],
    intrinsics: &CameraIntrinsics,
    marker_edge_len: f64,
    attitude: CameraAttitude,
) -> Result<RelativePosition, GeometryError> {
    let corners = MarkerCorners::from_points(points)?;
    resolve_corners(&corners, intrinsics, marker_edge_len, attitude)
}

/// [`resolve`] for already-validated corners.
pub fn resolve_corners(
    corners: &MarkerCorners,
    intrinsics: &CameraIntrinsics,
    marker_edge_len: f64,
    attitude: CameraAttitude,
) -> Result<RelativePosition, GeometryError> {
    let angle_per_pixel = intrinsics.angle_per_pixel();
    let image_center = intrinsics.center();

    // The vertical edge foreshortens with vertical off-axis placement and
    // device elevation; the horizontal edge with the azimuth axis.
    let v_mid = corners.vertical_edge_midpoint();
    let v_offset = (image_center.y - v_mid.y) * angle_per_pixel;
    let v_len = corrected_edge(
        corners.vertical_edge_px(),
        v_offset,
        attitude.elevation,
    )?;

    let h_mid = corners.horizontal_edge_midpoint();
    let h_offset = (h_mid.x - image_center.x) * angle_per_pixel;
    let h_len = corrected_edge(corners.horizontal_edge_px(), h_offset, attitude.azimuth)?;

    let apparent_px = (v_len + h_len) / 2.0;
    if apparent_px <= 0.0 {
        return Err(GeometryError::NonPositiveApparentSize { apparent_px });
    }

    let subtense_rad = apparent_px * angle_per_pixel;
    if subtense_rad >= PI {
        return Err(GeometryError::SubtenseOutOfRange { subtense_rad });
    }

    // A square of side s at distance D subtends 2*atan((s/2)/D); rearranged
    // into the tangent-half-angle form, valid for subtense < pi.
    let distance = ((PI - subtense_rad) / 2.0).tan() * (marker_edge_len / 2.0);

    let marker_center = corners.center();
    let rad_x = (marker_center.x - image_center.x) * angle_per_pixel;
    let rad_y = (image_center.y - marker_center.y) * angle_per_pixel;
    for offset in [rad_x, rad_y] {
        if offset.abs() >= FRAC_PI_2 {
            return Err(GeometryError::OffsetOutOfRange { offset_rad: offset });
        }
    }

    tracing::debug!(rad_x, rad_y, distance, "marker geometry resolved");
    Ok(RelativePosition {
        rad_x,
        rad_y,
        distance,
    })
}

/// Foreshortening-corrected pixel length of one edge.
fn corrected_edge(raw_px: f64, midpoint_offset: f64, tilt: f64) -> Result<f64, GeometryError> {
    let tilt_cos = tilt.cos();
    if tilt_cos.abs() <= COS_EPSILON {
        return Err(GeometryError::TiltSingularity { tilt_rad: tilt });
    }
    Ok(raw_px * midpoint_offset.cos() / tilt_cos)
}
