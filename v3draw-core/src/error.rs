//! Error types for v3draw-core.

use crate::volume::PlaneCoordinate;
use thiserror::Error;

/// Result type alias for v3draw operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for volume planning and plane encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The volume has a frame axis with more than one frame (or none).
    #[error("unsupported dimensionality: {frames} frames, only single-frame volumes can be written")]
    UnsupportedDimensionality { frames: u32 },

    /// The host pixel type has no `.v3draw` encoding.
    #[error("unsupported pixel type: {0}")]
    UnsupportedPixelType(String),

    /// One of the volume axes is zero.
    #[error("volume {0} must be at least 1")]
    EmptyDimension(&'static str),

    /// The file size does not fit the 64-bit offset range.
    #[error("volume too large: file length overflows 64-bit offsets")]
    LayoutOverflow,

    /// A plane coordinate lies outside the volume.
    #[error("plane coordinate out of range: z={z}, channel={channel}")]
    InvalidCoordinate { z: u32, channel: u32 },

    /// A plane buffer does not match the descriptor.
    #[error("malformed plane{}: {reason}", fmt_coordinate(.coordinate))]
    MalformedPlane {
        coordinate: Option<PlaneCoordinate>,
        reason: String,
    },
}

impl Error {
    /// Creates a `MalformedPlane` error without a coordinate.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPlane {
            coordinate: None,
            reason: reason.into(),
        }
    }

    /// Attaches a plane coordinate to a `MalformedPlane` error.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn at(self, at: PlaneCoordinate) -> Self {
        match self {
            Self::MalformedPlane { reason, .. } => Self::MalformedPlane {
                coordinate: Some(at),
                reason,
            },
            other => other,
        }
    }
}

fn fmt_coordinate(coordinate: &Option<PlaneCoordinate>) -> String {
    match coordinate {
        Some(c) => format!(" at z={}, channel={}", c.z, c.channel),
        None => String::new(),
    }
}
