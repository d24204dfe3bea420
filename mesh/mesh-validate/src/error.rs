//! Error types for surface validation.
//!
//! Errors are precondition violations: the mesh (or the options) cannot be
//! validated at all. A mesh that is well formed but fails a check is not an
//! error; see [`ValidationResult`](crate::ValidationResult).

use thiserror::Error;

use crate::outcome::FailureKind;

/// Result type for validation operations.
pub type ValidateResult<T> = Result<T, ValidateError>;

/// Errors that prevent a mesh from being validated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidateError {
    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    IndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A face uses the same vertex more than once.
    #[error("face {face} repeats a vertex: {vertices:?}")]
    RepeatedIndex {
        /// Index of the offending face.
        face: usize,
        /// The face's vertex indices.
        vertices: [u32; 3],
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Index of the offending vertex.
        index: usize,
    },

    /// Validation options are out of range.
    #[error("invalid options: {message}")]
    InvalidOptions {
        /// Description of the problem.
        message: String,
    },
}

impl ValidateError {
    /// Failure category of a malformed mesh.
    ///
    /// The three mesh precondition violations map to
    /// [`FailureKind::MalformedInput`]. Bad options say nothing about the
    /// mesh and have no category.
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::IndexOutOfRange { .. }
            | Self::RepeatedIndex { .. }
            | Self::NonFiniteVertex { .. } => Some(FailureKind::MalformedInput),
            Self::InvalidOptions { .. } => None,
        }
    }

    /// Stable identifier for reports: the failure code, or `invalid_options`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind().map_or("invalid_options", |kind| kind.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = ValidateError::IndexOutOfRange {
            face: 3,
            index: 99,
            vertex_count: 8,
        };
        assert_eq!(
            err.to_string(),
            "face 3 references vertex 99 (mesh has 8 vertices)"
        );

        let err = ValidateError::RepeatedIndex {
            face: 0,
            vertices: [1, 1, 2],
        };
        assert_eq!(err.to_string(), "face 0 repeats a vertex: [1, 1, 2]");
    }

    #[test]
    fn only_mesh_errors_are_malformed_input() {
        let mesh_errors = [
            ValidateError::NonFiniteVertex { index: 0 },
            ValidateError::RepeatedIndex {
                face: 1,
                vertices: [0, 0, 1],
            },
            ValidateError::IndexOutOfRange {
                face: 2,
                index: 9,
                vertex_count: 3,
            },
        ];
        for err in mesh_errors {
            assert_eq!(err.kind(), Some(FailureKind::MalformedInput));
            assert_eq!(err.code(), "malformed_input");
        }

        let options = ValidateError::InvalidOptions {
            message: "x".to_string(),
        };
        assert_eq!(options.kind(), None);
        assert_eq!(options.code(), "invalid_options");
    }
}
