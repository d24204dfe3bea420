//! Edge-manifold, vertex-manifold, watertight and winding checks.

use mesh_repair::{WatertightRepair, face_edges};

use super::fmt_point;
use crate::analysis::MeshAnalysis;
use crate::outcome::{FailureKind, Offender, ValidationFailure};

/// Every face must appear in exactly three adjacency pairs.
///
/// With `strict` unset, a face whose missing pairs come only from boundary
/// edges passes here and is left to the watertight repair; a face touching an
/// edge shared by more than two faces always fails.
#[must_use]
pub fn edge_manifold(
    analysis: &MeshAnalysis<'_>,
    name: &str,
    strict: bool,
) -> Option<ValidationFailure> {
    let mesh = analysis.mesh();
    let adjacency = analysis.adjacency();

    let (index, &vertices) = analysis
        .face_adjacency_counts()
        .iter()
        .zip(&mesh.faces)
        .enumerate()
        .find(|&(_, (&count, face))| {
            count < 3
                && (strict
                    || face_edges(*face)
                        .iter()
                        .any(|&(a, b)| adjacency.edge_valence(a, b) > 2))
        })
        .map(|(index, (_, face))| (index, face))?;

    Some(
        ValidationFailure::new(
            FailureKind::NonManifoldEdge,
            name,
            format!("edge not manifold on face {vertices:?} at index {index}"),
        )
        .with_offender(Offender::Face { index, vertices }),
    )
}

/// Every vertex must have at least three incident edges.
#[must_use]
pub fn vertex_manifold(analysis: &MeshAnalysis<'_>, name: &str) -> Option<ValidationFailure> {
    let index = analysis.vertex_degrees().iter().position(|&d| d < 3)?;
    let position = analysis.mesh().vertices[index].position;

    Some(
        ValidationFailure::new(
            FailureKind::NonManifoldVertex,
            name,
            format!(
                "vertex not manifold at index {index} {}",
                fmt_point(&position)
            ),
        )
        .with_offender(Offender::Vertex { index, position }),
    )
}

/// Failure for a mesh that is still open after the repair attempt.
#[must_use]
pub fn unrepairable_holes(name: &str, repair: Option<&WatertightRepair>) -> ValidationFailure {
    let detail = repair.map_or_else(
        || "repair could not run".to_string(),
        |r| {
            format!(
                "{} boundary edges, {} non-manifold edges and {} broken faces remain",
                r.boundary_edges,
                r.non_manifold_edges,
                r.broken_faces.len()
            )
        },
    );
    ValidationFailure::new(
        FailureKind::UnrepairableHoles,
        name,
        format!("holes detected, unable to fix: {detail}"),
    )
}

/// Adjacent faces must traverse shared edges in opposite directions.
#[must_use]
pub fn winding(analysis: &MeshAnalysis<'_>, name: &str) -> Option<ValidationFailure> {
    if analysis.is_winding_consistent() {
        return None;
    }
    Some(ValidationFailure::new(
        FailureKind::InconsistentWinding,
        name,
        "winding not consistent in this mesh; disable the winding check in the \
         configuration if this is intentional",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{IndexedMesh, Vertex, unit_cube};

    fn cube_with_fin() -> IndexedMesh {
        // Extra triangle on edge (0, 1): that edge is shared by three faces
        let mut mesh = unit_cube();
        mesh.vertices.push(Vertex::from_coords(0.5, -1.0, -1.0));
        mesh.faces.push([0, 1, 8]);
        mesh
    }

    #[test]
    fn cube_passes_topology() {
        let cube = unit_cube();
        let analysis = MeshAnalysis::new(&cube);

        assert!(edge_manifold(&analysis, "cube", true).is_none());
        assert!(vertex_manifold(&analysis, "cube").is_none());
        assert!(winding(&analysis, "cube").is_none());
    }

    #[test]
    fn shared_edge_names_first_face() {
        let mesh = cube_with_fin();
        let analysis = MeshAnalysis::new(&mesh);

        for strict in [false, true] {
            let failure = edge_manifold(&analysis, "fin", strict).unwrap();
            assert_eq!(failure.kind, FailureKind::NonManifoldEdge);
            assert_eq!(
                failure.offender,
                Offender::Face {
                    index: 0,
                    vertices: [0, 2, 1]
                }
            );
            assert_eq!(
                failure.message,
                "edge not manifold on face [0, 2, 1] at index 0"
            );
        }
    }

    #[test]
    fn boundary_only_faces_are_deferred_unless_strict() {
        let mut mesh = unit_cube();
        mesh.faces.remove(2);
        let analysis = MeshAnalysis::new(&mesh);

        assert!(edge_manifold(&analysis, "open", false).is_none());

        let strict = edge_manifold(&analysis, "open", true).unwrap();
        assert_eq!(strict.offender.faces(), vec![2]);
    }

    #[test]
    fn isolated_vertex_fails_vertex_manifold() {
        let mut mesh = unit_cube();
        mesh.vertices.push(Vertex::from_coords(3.0, 2.0, 1.0));
        let analysis = MeshAnalysis::new(&mesh);

        let failure = vertex_manifold(&analysis, "stray").unwrap();
        assert_eq!(failure.kind, FailureKind::NonManifoldVertex);
        assert_eq!(failure.offender.vertices(), vec![8]);
        assert!(failure.message.contains("index 8 (3, 2, 1)"));
    }

    #[test]
    fn flipped_face_fails_winding() {
        let mut mesh = unit_cube();
        mesh.flip_face(0);
        let analysis = MeshAnalysis::new(&mesh);

        let failure = winding(&analysis, "flipped").unwrap();
        assert_eq!(failure.kind, FailureKind::InconsistentWinding);
        assert!(failure.message.contains("configuration"));
    }

    #[test]
    fn unrepairable_message_counts_remaining_damage() {
        let repair = WatertightRepair {
            boundary_edges: 6,
            non_manifold_edges: 1,
            broken_faces: vec![0, 3, 5],
            ..WatertightRepair::default()
        };
        let failure = unrepairable_holes("pinched", Some(&repair));
        assert_eq!(failure.offender, Offender::Mesh);
        assert!(
            failure
                .message
                .ends_with("6 boundary edges, 1 non-manifold edges and 3 broken faces remain")
        );
    }
}
