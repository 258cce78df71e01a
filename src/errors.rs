//! Error types for height field conversion, meshing and export

use crate::float_types::Real;
use std::path::PathBuf;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, LayerforgeError>;

/// All the errors a conversion request can terminate with.
///
/// Geometry construction and serialization report errors, while sampling and
/// statistics degrade to sentinel values instead (see [`crate::heightfield`]).
#[derive(Debug, thiserror::Error)]
pub enum LayerforgeError {
    /// (InvalidRange) The maximum depth is below the minimum depth
    #[error("(InvalidRange) max depth {max} mm is below min depth {min} mm")]
    InvalidRange { min: Real, max: Real },

    /// (EmptyInput) A grid or field has zero width or height, or its buffer
    /// does not match its declared dimensions
    #[error("(EmptyInput) {0}")]
    EmptyInput(String),

    /// (EmptyMesh) Serialization or statistics were requested for a solid without triangles
    #[error("(EmptyMesh) the solid contains no triangles")]
    EmptyMesh,

    /// (IoWrite) The output artifact could not be written
    #[error("(IoWrite) could not write {}: {source}", path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An in-memory encoder failed
    #[error("std::io::Error: {0}")]
    Io(#[from] std::io::Error),

    /// Input bytes or text are malformed
    #[error("Input is malformed: {0}")]
    MalformedInput(String),

    /// A configuration value is out of its valid domain
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The height field transport text is not valid base64
    #[error("Could not decode base64 height field: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The request envelope is not valid JSON
    #[error("Could not parse request: {0}")]
    Json(#[from] serde_json::Error),
}

impl LayerforgeError {
    pub(crate) fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoWrite {
            path: path.into(),
            source,
        }
    }
}
