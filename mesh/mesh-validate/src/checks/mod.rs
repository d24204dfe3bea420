//! Individual checks of the validation pipeline.
//!
//! Each check reads a [`MeshAnalysis`](crate::MeshAnalysis) and returns
//! `None` when it passes or the [`ValidationFailure`](crate::ValidationFailure)
//! describing the first offence. Checks never mutate the mesh; highlighting
//! and repair are driven by the orchestrator.

mod geometry;
mod topology;

pub use geometry::{sharp_vertices, thin_angles, volume};
pub use topology::{edge_manifold, unrepairable_holes, vertex_manifold, winding};

use mesh_types::Point3;

/// Format coordinates for failure messages.
fn fmt_point(p: &Point3<f64>) -> String {
    format!("({}, {}, {})", p.x, p.y, p.z)
}
