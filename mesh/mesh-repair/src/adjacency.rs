//! Mesh adjacency data structures.
//!
//! Provides edge-to-face lookups and the topology queries built on them:
//! face adjacency pairs, vertex degrees, boundary and non-manifold edges,
//! watertightness and winding consistency.

use hashbrown::HashMap;

/// Adjacency information for a mesh.
///
/// Every undirected edge maps to the faces that use it, in face index order.
/// Edges shared by exactly two faces are *manifold*; edges with a single face
/// are *boundary* edges; edges with more than two faces are *non-manifold*.
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    /// Maps edge (v0, v1) to list of face indices. v0 < v1.
    edge_to_faces: HashMap<(u32, u32), Vec<usize>>,
    face_count: usize,
}

impl MeshAdjacency {
    /// Build adjacency information from a list of faces.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_repair::MeshAdjacency;
    ///
    /// let faces = vec![[0, 1, 2], [1, 3, 2]];
    /// let adj = MeshAdjacency::build(&faces);
    ///
    /// assert_eq!(adj.boundary_edge_count(), 4);
    /// assert_eq!(adj.face_adjacency(), vec![[0, 1]]);
    /// ```
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut edge_to_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();

        for (face_idx, face) in faces.iter().enumerate() {
            for (a, b) in face_edges(*face) {
                let faces = edge_to_faces.entry(normalize_edge(a, b)).or_default();
                // A face that repeats a vertex would otherwise count twice.
                if faces.last() != Some(&face_idx) {
                    faces.push(face_idx);
                }
            }
        }

        Self {
            edge_to_faces,
            face_count: faces.len(),
        }
    }

    /// Get faces adjacent to an edge.
    ///
    /// Returns `None` if the edge doesn't exist in the mesh.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[usize]> {
        self.edge_to_faces
            .get(&normalize_edge(v0, v1))
            .map(Vec::as_slice)
    }

    /// Number of faces sharing an edge (0 if the edge doesn't exist).
    #[must_use]
    pub fn edge_valence(&self, v0: u32, v1: u32) -> usize {
        self.faces_for_edge(v0, v1).map_or(0, <[usize]>::len)
    }

    /// Face pairs sharing a manifold edge, one pair per edge, sorted.
    ///
    /// Edges used by one face or by more than two faces contribute nothing.
    #[must_use]
    pub fn face_adjacency(&self) -> Vec<[usize; 2]> {
        let mut pairs: Vec<[usize; 2]> = self
            .edge_to_faces
            .values()
            .filter(|faces| faces.len() == 2)
            .map(|faces| [faces[0], faces[1]])
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Manifold edges with the two faces sharing them, sorted by edge.
    #[must_use]
    pub fn manifold_edges(&self) -> Vec<((u32, u32), [usize; 2])> {
        let mut edges: Vec<((u32, u32), [usize; 2])> = self
            .edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 2)
            .map(|(&edge, faces)| (edge, [faces[0], faces[1]]))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Faces touching at least one edge not shared by exactly two faces,
    /// ascending.
    #[must_use]
    pub fn broken_faces(&self) -> Vec<usize> {
        self.face_adjacency_counts()
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count < 3)
            .map(|(f, _)| f)
            .collect()
    }

    /// Number of adjacency pairs each face appears in (0..=3).
    ///
    /// Equals 3 for every face of a closed manifold triangulation.
    #[must_use]
    pub fn face_adjacency_counts(&self) -> Vec<u8> {
        let mut counts = vec![0u8; self.face_count];
        for faces in self.edge_to_faces.values().filter(|f| f.len() == 2) {
            for &f in faces {
                counts[f] = counts[f].saturating_add(1);
            }
        }
        counts
    }

    /// Number of unique edges incident to each vertex.
    ///
    /// Vertices not referenced by any face have degree 0.
    #[must_use]
    pub fn vertex_degrees(&self, vertex_count: usize) -> Vec<u32> {
        let mut degrees = vec![0u32; vertex_count];
        for &(a, b) in self.edge_to_faces.keys() {
            for v in [a, b] {
                if let Some(d) = degrees.get_mut(v as usize) {
                    *d += 1;
                }
            }
        }
        degrees
    }

    /// All boundary edges (edges with exactly one adjacent face), sorted.
    ///
    /// Boundary edges indicate holes in the mesh surface.
    #[must_use]
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        self.sorted_edges_where(|n| n == 1)
    }

    /// Count the number of boundary edges.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }

    /// Count the number of non-manifold edges.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }

    /// Check if the mesh is watertight.
    ///
    /// Requires at least one face and every edge shared by exactly two faces.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.face_count > 0 && self.edge_to_faces.values().all(|faces| faces.len() == 2)
    }

    /// Check if the two faces of every manifold edge traverse it in opposite
    /// directions.
    ///
    /// `faces` must be the face list this adjacency was built from. A mesh
    /// without faces is never winding consistent.
    #[must_use]
    pub fn is_winding_consistent(&self, faces: &[[u32; 3]]) -> bool {
        if self.face_count == 0 {
            return false;
        }
        self.edge_to_faces
            .iter()
            .filter(|(_, adjacent)| adjacent.len() == 2)
            .all(|(&(a, b), adjacent)| {
                let first = traverses(faces[adjacent[0]], a, b);
                let second = traverses(faces[adjacent[1]], a, b);
                first != second
            })
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Number of faces the adjacency was built from.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    fn sorted_edges_where(&self, valence: impl Fn(usize) -> bool) -> Vec<(u32, u32)> {
        let mut edges: Vec<(u32, u32)> = self
            .edge_to_faces
            .iter()
            .filter(|(_, faces)| valence(faces.len()))
            .map(|(&edge, _)| edge)
            .collect();
        edges.sort_unstable();
        edges
    }
}

/// The three directed edges of a face: v0→v1, v1→v2, v2→v0.
#[inline]
#[must_use]
pub fn face_edges(face: [u32; 3]) -> [(u32, u32); 3] {
    [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])]
}

/// Whether `face` contains the directed edge `a → b`.
#[inline]
#[must_use]
pub fn traverses(face: [u32; 3], a: u32, b: u32) -> bool {
    face_edges(face).contains(&(a, b))
}

/// Normalize edge direction so v0 < v1.
#[inline]
pub(crate) fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 { (v0, v1) } else { (v1, v0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    fn single_triangle() -> Vec<[u32; 3]> {
        vec![[0, 1, 2]]
    }

    fn two_triangles_sharing_edge() -> Vec<[u32; 3]> {
        vec![[0, 1, 2], [1, 3, 2]]
    }

    fn non_manifold_edge() -> Vec<[u32; 3]> {
        // Three triangles sharing the same edge (0, 1)
        vec![[0, 1, 2], [0, 1, 3], [0, 1, 4]]
    }

    #[test]
    fn build_single_triangle() {
        let adj = MeshAdjacency::build(&single_triangle());

        assert_eq!(adj.edge_count(), 3);
        assert_eq!(adj.boundary_edge_count(), 3);
        assert!(!adj.is_watertight());
        assert!(adj.face_adjacency().is_empty());
        assert_eq!(adj.face_adjacency_counts(), vec![0]);
    }

    #[test]
    fn faces_for_edge() {
        let adj = MeshAdjacency::build(&two_triangles_sharing_edge());

        assert_eq!(adj.faces_for_edge(1, 2), Some(&[0, 1][..]));
        assert_eq!(adj.faces_for_edge(2, 1), Some(&[0, 1][..]));
        assert_eq!(adj.edge_valence(0, 1), 1);
        assert!(adj.faces_for_edge(0, 5).is_none());
        assert_eq!(adj.edge_valence(0, 5), 0);
    }

    #[test]
    fn cube_is_closed_and_consistent() {
        let cube = unit_cube();
        let adj = MeshAdjacency::build(&cube.faces);

        assert_eq!(adj.edge_count(), 18);
        assert_eq!(adj.face_adjacency().len(), 18);
        assert!(adj.face_adjacency_counts().iter().all(|&c| c == 3));
        assert!(adj.is_watertight());
        assert_eq!(adj.non_manifold_edge_count(), 0);
        assert!(adj.is_winding_consistent(&cube.faces));
    }

    #[test]
    fn cube_vertex_degrees() {
        let cube = unit_cube();
        let adj = MeshAdjacency::build(&cube.faces);
        let degrees = adj.vertex_degrees(cube.vertex_count() + 1);

        // 18 edges, each counted at both ends
        assert_eq!(degrees.iter().sum::<u32>(), 36);
        assert!(degrees[..8].iter().all(|&d| d >= 3));
        assert_eq!(degrees[8], 0); // unreferenced
    }

    #[test]
    fn flipped_face_breaks_winding() {
        let mut cube = unit_cube();
        cube.flip_face(0);
        let adj = MeshAdjacency::build(&cube.faces);

        assert!(adj.is_watertight());
        assert!(!adj.is_winding_consistent(&cube.faces));
    }

    #[test]
    fn non_manifold_detection() {
        let adj = MeshAdjacency::build(&non_manifold_edge());

        assert_eq!(adj.non_manifold_edge_count(), 1);
        assert_eq!(adj.edge_valence(1, 0), 3);
        // The shared edge yields no adjacency pair at all
        assert!(adj.face_adjacency().is_empty());
    }

    #[test]
    fn broken_faces_touch_open_edges() {
        let mut cube = unit_cube();
        cube.faces.remove(2); // [4, 5, 6]
        let adj = MeshAdjacency::build(&cube.faces);

        // Faces that shared an edge with the removed top triangle
        assert_eq!(adj.broken_faces(), vec![2, 4, 10]);
        assert_eq!(adj.manifold_edges().len(), 15);
    }

    #[test]
    fn boundary_edges_are_sorted() {
        let adj = MeshAdjacency::build(&two_triangles_sharing_edge());
        assert_eq!(adj.boundary_edges(), vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn empty_mesh_is_neither_watertight_nor_consistent() {
        let adj = MeshAdjacency::build(&[]);
        assert!(!adj.is_watertight());
        assert!(!adj.is_winding_consistent(&[]));
    }

    #[test]
    fn directed_edge_helpers() {
        assert!(traverses([0, 1, 2], 2, 0));
        assert!(!traverses([0, 1, 2], 0, 2));
        assert_eq!(face_edges([4, 5, 6]), [(4, 5), (5, 6), (6, 4)]);
    }
}
