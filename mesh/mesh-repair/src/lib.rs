//! Mesh topology queries and watertight repair.
//!
//! This crate provides tools for:
//! - Edge adjacency (face pairs, vertex degrees, boundary and non-manifold edges)
//! - Watertight and winding-consistency queries
//! - Hole detection and filling
//! - Winding order correction
//! - A one-shot watertight repair that also marks broken faces
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_repair::{MeshAdjacency, RepairParams, repair_watertight};
//!
//! let mut mesh = unit_cube();
//! mesh.faces.remove(5);
//! assert!(!MeshAdjacency::build(&mesh.faces).is_watertight());
//!
//! let summary = repair_watertight(&mut mesh, &RepairParams::default()).unwrap();
//! println!("{summary}");
//! assert!(summary.is_watertight);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod error;
pub mod holes;
mod repair;
pub mod winding;

pub use adjacency::{MeshAdjacency, face_edges, traverses};
pub use error::{RepairError, RepairResult};
pub use repair::{RepairParams, WatertightRepair, mark_faces, repair_watertight};

// Re-export commonly used items from submodules
pub use holes::{BoundaryLoop, HoleFill, HoleScan, detect_holes, fill_holes};
pub use winding::{count_inconsistent_edges, fix_winding_order};
