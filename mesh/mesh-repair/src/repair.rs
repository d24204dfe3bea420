//! One-shot watertight repair.
//!
//! Runs hole filling, winding correction and broken-face marking once, in
//! that order, then reports whether the mesh is now watertight.

use mesh_types::{Color, IndexedMesh};
use tracing::{debug, info, warn};

use crate::adjacency::MeshAdjacency;
use crate::error::{RepairError, RepairResult};
use crate::holes::fill_holes;
use crate::winding::fix_winding_order;

/// Configuration parameters for the watertight repair.
///
/// # Example
///
/// ```
/// use mesh_repair::RepairParams;
///
/// let params = RepairParams::default().with_max_hole_edges(16);
/// assert_eq!(params.max_hole_edges, 16);
/// assert!(params.broken_face_color.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RepairParams {
    /// Largest boundary loop (in edges) that will be triangulated.
    ///
    /// Default: `4` (triangles and quads)
    pub max_hole_edges: usize,

    /// Color written to faces still touching an open or non-manifold edge.
    ///
    /// `None` disables marking. Default: [`Color::HIGHLIGHT`]
    pub broken_face_color: Option<Color>,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            max_hole_edges: 4,
            broken_face_color: Some(Color::HIGHLIGHT),
        }
    }
}

impl RepairParams {
    /// Set the largest hole that will be filled.
    #[must_use]
    pub fn with_max_hole_edges(mut self, max_hole_edges: usize) -> Self {
        self.max_hole_edges = max_hole_edges;
        self
    }

    /// Set the color for broken faces, or `None` to leave colors alone.
    #[must_use]
    pub fn with_broken_face_color(mut self, color: Option<Color>) -> Self {
        self.broken_face_color = color;
        self
    }
}

/// Summary of a [`repair_watertight`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatertightRepair {
    /// Number of holes triangulated.
    pub holes_filled: usize,
    /// Number of faces appended by hole filling.
    pub faces_added: usize,
    /// Holes left open because they exceed `max_hole_edges`.
    pub holes_too_large: usize,
    /// Boundary chains that were open or pinched and could not be filled.
    pub holes_rejected: usize,
    /// Number of faces whose winding was reversed.
    pub faces_flipped: usize,
    /// Faces still touching an edge not shared by exactly two faces.
    pub broken_faces: Vec<usize>,
    /// Boundary edges left after the repair.
    pub boundary_edges: usize,
    /// Edges shared by more than two faces after the repair.
    pub non_manifold_edges: usize,
    /// Whether the mesh is watertight after the repair.
    pub is_watertight: bool,
}

impl std::fmt::Display for WatertightRepair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "filled {} holes (+{} faces), flipped {} faces, {} broken faces, {} boundary and {} non-manifold edges left",
            self.holes_filled,
            self.faces_added,
            self.faces_flipped,
            self.broken_faces.len(),
            self.boundary_edges,
            self.non_manifold_edges
        )
    }
}

/// Attempt to make the mesh watertight in a single pass.
///
/// 1. fill holes of at most `max_hole_edges` edges,
/// 2. fix winding (consistent per component, outward for closed ones),
/// 3. color faces that still touch a boundary or non-manifold edge.
///
/// Faces are only appended or reoriented; existing indices stay valid.
///
/// # Errors
///
/// Returns [`RepairError::EmptyMesh`] for a mesh without vertices or faces
/// and [`RepairError::InvalidIndex`] if a face references a missing vertex.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_repair::{RepairParams, repair_watertight};
///
/// let mut mesh = unit_cube();
/// mesh.faces.remove(2);
///
/// let summary = repair_watertight(&mut mesh, &RepairParams::default()).unwrap();
/// assert!(summary.is_watertight);
/// assert_eq!(summary.faces_added, 1);
/// assert!(summary.broken_faces.is_empty());
/// ```
pub fn repair_watertight(
    mesh: &mut IndexedMesh,
    params: &RepairParams,
) -> RepairResult<WatertightRepair> {
    if mesh.is_empty() {
        return Err(RepairError::EmptyMesh);
    }
    check_indices(mesh)?;

    let fill = fill_holes(mesh, params.max_hole_edges)?;
    let faces_flipped = fix_winding_order(mesh);

    let adjacency = MeshAdjacency::build(&mesh.faces);
    let broken_faces = adjacency.broken_faces();
    if let Some(color) = params.broken_face_color {
        mark_faces(mesh, &broken_faces, color);
    }

    let summary = WatertightRepair {
        holes_filled: fill.holes_filled,
        faces_added: fill.faces_added,
        holes_too_large: fill.skipped_large,
        holes_rejected: fill.rejected,
        faces_flipped,
        broken_faces,
        boundary_edges: adjacency.boundary_edge_count(),
        non_manifold_edges: adjacency.non_manifold_edge_count(),
        is_watertight: adjacency.is_watertight(),
    };

    if summary.is_watertight {
        info!("Watertight repair succeeded: {}", summary);
    } else {
        warn!("Watertight repair incomplete: {}", summary);
    }

    Ok(summary)
}

/// Color the given faces. Out-of-range indices are ignored.
pub fn mark_faces(mesh: &mut IndexedMesh, faces: &[usize], color: Color) {
    for &f in faces {
        mesh.set_face_color(f, color);
    }
    if !faces.is_empty() {
        debug!("Marked {} faces", faces.len());
    }
}

fn check_indices(mesh: &IndexedMesh) -> RepairResult<()> {
    let vertex_count = mesh.vertices.len();
    match mesh
        .faces
        .iter()
        .flatten()
        .find(|&&i| i as usize >= vertex_count)
    {
        Some(&index) => Err(RepairError::InvalidIndex {
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}
