use thiserror::Error;

/// Failure modes of marker geometry resolution.
///
/// Always surfaced to the caller: a stale distance must never be silently
/// substituted for a failed frame, since position errors compound in
/// downstream storage. [`InvalidCornerCount`](Self::InvalidCornerCount) is
/// an invalid input; every other variant is a degenerate geometry.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    /// The detector did not supply exactly four corner points.
    #[error("expected 4 marker corners, got {got}")]
    InvalidCornerCount { got: usize },
    /// The corrected apparent size collapsed to zero or below.
    #[error("apparent marker size {apparent_px} px is not positive")]
    NonPositiveApparentSize { apparent_px: f64 },
    /// The marker fills or exceeds the field of view; distance is undefined.
    #[error("angular subtense {subtense_rad} rad meets or exceeds pi")]
    SubtenseOutOfRange { subtense_rad: f64 },
    /// A foreshortening correction cosine is at zero (camera tilted a
    /// quarter turn); the correction would blow up.
    #[error("camera tilt {tilt_rad} rad makes the foreshortening correction singular")]
    TiltSingularity { tilt_rad: f64 },
    /// The marker centre sits outside the half-circle where angular offsets
    /// are meaningful.
    #[error("marker centre offset {offset_rad} rad outside (-pi/2, pi/2)")]
    OffsetOutOfRange { offset_rad: f64 },
}

impl GeometryError {
    /// True for every variant except [`InvalidCornerCount`](Self::InvalidCornerCount).
    pub fn is_degenerate(&self) -> bool {
        !matches!(self, GeometryError::InvalidCornerCount { .. })
    }
}
