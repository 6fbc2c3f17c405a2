//! Marker geometry: camera-relative position from detected corner points.
//!
//! Given the four corners of a planar square marker, the camera's field of
//! view and the marker's known physical size, [`resolver::resolve`] computes
//! the marker's angular offsets and slant distance; [`projector`] turns that
//! into camera-frame and world-frame displacement vectors using the fused
//! camera attitude.

pub mod error;
pub mod projector;
pub mod resolver;
pub mod types;

pub use error::GeometryError;
pub use resolver::{resolve, resolve_corners};
pub use types::{CameraAttitude, CameraIntrinsics, MarkerCorners, RelativePosition};
