//! Surface mesh validation pipeline.
//!
//! Decides whether a triangle mesh is a well-formed solid: non-zero volume,
//! edge- and vertex-manifold, watertight (with one repair attempt), free of
//! thin triangles and abnormal sharp vertices, and consistently wound.
//!
//! # Features
//!
//! - **Ordered checks**: volume, edge-manifold, vertex-manifold, watertight,
//!   then the optional thin-angle, sharp-vertex and winding checks
//! - **First failure wins**: the pipeline stops at the first failing check and
//!   names the offending face, corner or vertices
//! - **One-shot repair**: open meshes get a single hole-fill / normal-fix pass
//! - **Highlighting**: offending elements are colored on the mesh
//! - **Batch runs**: every outcome goes to a [`DiagnosticSink`]
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_validate::{FailureKind, SurfaceValidator, ValidationOptions};
//!
//! let mut validator = SurfaceValidator::new(ValidationOptions::default()).unwrap();
//!
//! let mut cube = unit_cube();
//! assert!(validator.validate("cube", &mut cube).unwrap().is_pass());
//!
//! // Inconsistent winding is reported, not fixed
//! let mut flipped = unit_cube();
//! flipped.flip_face(0);
//! let report = validator.validate("flipped", &mut flipped).unwrap();
//! assert_eq!(report.result.kind(), Some(FailureKind::InconsistentWinding));
//! ```
//!
//! # Errors and failures
//!
//! A mesh that cannot be validated (face index out of range, repeated index,
//! non-finite coordinate) is an `Err(`[`ValidateError`]`)`. A mesh that is
//! well formed but fails a check is `Ok` with
//! [`ValidationResult::Fail`].

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod analysis;
pub mod checks;
mod error;
mod highlight;
mod options;
mod outcome;
mod validator;

pub use analysis::{MeshAnalysis, check_input};
pub use error::{ValidateError, ValidateResult};
pub use highlight::{ColorHighlighter, Highlighter, NoHighlight};
pub use options::ValidationOptions;
pub use outcome::{
    Check, FailureKind, Offender, ValidationFailure, ValidationReport, ValidationResult,
};
pub use validator::{BatchSummary, DiagnosticSink, SurfaceValidator};

// Re-export the repair summary carried by reports
pub use mesh_repair::WatertightRepair;
