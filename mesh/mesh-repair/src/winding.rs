//! Winding order correction.
//!
//! Faces are grouped into connected components over manifold edges. Within a
//! component, orientation is propagated breadth first from the lowest face
//! index so that every shared edge is traversed in opposite directions. A
//! closed component that ends up with negative signed volume is inverted so
//! its normals point outward.

use std::collections::VecDeque;

use mesh_types::IndexedMesh;
use tracing::debug;

use crate::adjacency::{MeshAdjacency, traverses};

/// Count manifold edges whose two faces traverse them in the same direction.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_repair::winding::count_inconsistent_edges;
///
/// let mut cube = unit_cube();
/// assert_eq!(count_inconsistent_edges(&cube), 0);
///
/// cube.flip_face(0);
/// assert_eq!(count_inconsistent_edges(&cube), 3);
/// ```
#[must_use]
pub fn count_inconsistent_edges(mesh: &IndexedMesh) -> usize {
    MeshAdjacency::build(&mesh.faces)
        .manifold_edges()
        .iter()
        .filter(|((a, b), [f, g])| {
            traverses(mesh.faces[*f], *a, *b) == traverses(mesh.faces[*g], *a, *b)
        })
        .count()
}

/// Make face winding consistent and outward facing.
///
/// Returns the number of faces whose winding was reversed. Faces connected
/// only through non-manifold edges or vertices form separate components.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_repair::winding::fix_winding_order;
///
/// let mut cube = unit_cube();
/// cube.flip_face(4);
///
/// assert_eq!(fix_winding_order(&mut cube), 1);
/// assert!(cube.signed_volume() > 0.0);
/// ```
pub fn fix_winding_order(mesh: &mut IndexedMesh) -> usize {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let face_count = mesh.faces.len();

    let mut neighbors: Vec<Vec<(usize, u32, u32)>> = vec![Vec::new(); face_count];
    for ((a, b), [f, g]) in adjacency.manifold_edges() {
        neighbors[f].push((g, a, b));
        neighbors[g].push((f, a, b));
    }

    let mut flipped = vec![false; face_count];
    let mut component = vec![usize::MAX; face_count];
    let mut components: Vec<Vec<usize>> = Vec::new();

    for seed in 0..face_count {
        if component[seed] != usize::MAX {
            continue;
        }
        let id = components.len();
        let mut members = vec![seed];
        component[seed] = id;

        let mut queue = VecDeque::from([seed]);
        while let Some(f) = queue.pop_front() {
            for &(g, a, b) in &neighbors[f] {
                if component[g] != usize::MAX {
                    continue;
                }
                component[g] = id;
                members.push(g);
                if traverses(mesh.faces[f], a, b) == traverses(mesh.faces[g], a, b) {
                    mesh.flip_face(g);
                    flipped[g] = true;
                }
                queue.push_back(g);
            }
        }
        components.push(members);
    }

    let counts = adjacency.face_adjacency_counts();
    for members in &components {
        let closed = members.iter().all(|&f| counts[f] == 3);
        if !closed || component_volume(mesh, members) >= 0.0 {
            continue;
        }
        debug!("Inverting inside-out component of {} faces", members.len());
        for &f in members {
            mesh.flip_face(f);
            flipped[f] = !flipped[f];
        }
    }

    let changed = flipped.iter().filter(|&&f| f).count();
    debug!(
        "Winding fix: {} components, {} faces reversed",
        components.len(),
        changed
    );
    changed
}

fn component_volume(mesh: &IndexedMesh, members: &[usize]) -> f64 {
    members
        .iter()
        .filter_map(|&f| mesh.triangle(f))
        .map(|t| t.v0.coords.dot(&t.v1.coords.cross(&t.v2.coords)))
        .sum::<f64>()
        / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Vertex, unit_cube};

    #[test]
    fn consistent_cube_is_untouched() {
        let mut cube = unit_cube();
        let before = cube.faces.clone();

        assert_eq!(fix_winding_order(&mut cube), 0);
        assert_eq!(cube.faces, before);
    }

    #[test]
    fn single_flipped_face_is_restored() {
        let mut cube = unit_cube();
        cube.flip_face(7);

        assert_eq!(count_inconsistent_edges(&cube), 3);
        assert_eq!(fix_winding_order(&mut cube), 1);
        assert_eq!(count_inconsistent_edges(&cube), 0);
        assert_eq!(cube.faces, unit_cube().faces);
    }

    #[test]
    fn inside_out_cube_is_inverted() {
        let mut cube = unit_cube();
        for f in 0..cube.face_count() {
            cube.flip_face(f);
        }

        assert_eq!(fix_winding_order(&mut cube), 12);
        assert_relative_eq!(cube.signed_volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn seed_face_flipped_is_corrected_globally() {
        // Face 0 is the BFS seed; the rest of the cube gets flipped to match,
        // then the whole closed component is inverted back outward.
        let mut cube = unit_cube();
        cube.flip_face(0);

        assert_eq!(fix_winding_order(&mut cube), 1);
        assert_eq!(cube.faces, unit_cube().faces);
    }

    #[test]
    fn open_component_keeps_seed_orientation() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([1, 2, 3]); // same direction on edge 1-2

        assert_eq!(fix_winding_order(&mut mesh), 1);
        assert_eq!(mesh.faces[1], [1, 3, 2]);
        assert_eq!(count_inconsistent_edges(&mesh), 0);
    }

    #[test]
    fn empty_mesh() {
        let mut mesh = IndexedMesh::new();
        assert_eq!(fix_winding_order(&mut mesh), 0);
    }
}
