//! Merging of coincident vertices.

use hashbrown::HashMap;
use mesh_types::IndexedMesh;

/// Bit pattern of a coordinate, with `-0.0` folded onto `0.0`.
fn key(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

/// Merge vertices with bit-identical coordinates and remap faces.
///
/// The first occurrence of a position is kept, so vertex order is stable.
/// Returns the number of vertices removed.
pub(crate) fn merge_vertices(mesh: &mut IndexedMesh) -> usize {
    let before = mesh.vertices.len();
    let mut seen: HashMap<[u64; 3], u32> = HashMap::with_capacity(before);
    let mut remap = Vec::with_capacity(before);
    let mut kept = Vec::with_capacity(before);

    for vertex in mesh.vertices.drain(..) {
        let p = vertex.position;
        let index = *seen.entry([key(p.x), key(p.y), key(p.z)]).or_insert_with(|| {
            kept.push(vertex);
            kept.len() as u32 - 1
        });
        remap.push(index);
    }

    for face in &mut mesh.faces {
        for index in face.iter_mut() {
            *index = remap[*index as usize];
        }
    }
    mesh.vertices = kept;
    before - mesh.vertices.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::Vertex;

    #[test]
    fn shared_corners_are_merged() {
        let mut mesh = IndexedMesh::new();
        for p in [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ] {
            mesh.vertices.push(Vertex::from(p));
        }
        mesh.faces = vec![[0, 1, 2], [3, 4, 5]];

        assert_eq!(merge_vertices(&mut mesh), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn signed_zero_is_one_position() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 2.0));
        mesh.vertices.push(Vertex::from_coords(-0.0, 1.0, 2.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 2.000_001));

        assert_eq!(merge_vertices(&mut mesh), 1);
        assert_eq!(mesh.vertex_count(), 2);
    }
}
