//! Repair errors.

use thiserror::Error;

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Why a repair could not run. An unsuccessful repair is not an error; it
/// is reported through the returned summary.
#[derive(Debug, Error)]
pub enum RepairError {
    /// Nothing to repair.
    #[error("nothing to repair: mesh has no vertices or no faces")]
    EmptyMesh,

    /// A face or boundary loop references a vertex that does not exist.
    #[error("vertex index {index} out of range for {vertex_count} vertices")]
    InvalidIndex {
        /// The offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A boundary loop could not be triangulated.
    #[error("cannot fill {edges}-edge hole: {reason}")]
    HoleFillFailed {
        /// Boundary edges around the hole.
        edges: usize,
        /// What went wrong.
        reason: String,
    },
}
