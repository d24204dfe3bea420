//! Error types for mesh loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while finding or loading meshes.
#[derive(Debug, Error)]
pub enum IoError {
    /// File or directory not found.
    #[error("not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Unknown file format (unrecognized extension).
    #[error("unknown file format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// A face with more than three vertices.
    #[error("line {line}: {vertices}-sided polygon, only triangles are supported")]
    UnsupportedPolygon {
        /// 1-based line number.
        line: usize,
        /// Number of vertices in the face.
        vertices: usize,
    },

    /// Binary STL ended before its declared face count.
    #[error("invalid face count: expected {expected}, got {got}")]
    InvalidFaceCount {
        /// Number of faces declared in the header.
        expected: u32,
        /// Number of faces actually read.
        got: u32,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Map `NotFound` to [`IoError::FileNotFound`] for `path`.
    pub(crate) fn open(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
