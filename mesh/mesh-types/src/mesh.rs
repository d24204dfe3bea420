//! Indexed triangle mesh.

use crate::{Color, Triangle, Vertex};
use nalgebra::Vector3;

/// An indexed triangle mesh.
///
/// Stores vertices and faces separately, with faces referencing vertices by
/// index. Vertex and face indices are the permanent identity of an element
/// for the lifetime of the mesh; operations only ever append faces.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Vertex>` - Vertex positions and colors
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
/// - face colors: sparse, grown on first write
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,

    face_colors: Vec<Option<Color>>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            face_colors: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            face_colors: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, Vertex};
    ///
    /// let vertices = vec![
    ///     Vertex::from_coords(0.0, 0.0, 0.0),
    ///     Vertex::from_coords(1.0, 0.0, 0.0),
    ///     Vertex::from_coords(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = IndexedMesh::from_parts(vertices, vec![[0, 1, 2]]);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            face_colors: Vec::new(),
        }
    }

    /// Create a mesh from raw coordinate and index data.
    ///
    /// * `positions` - Flat array of vertex positions `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `indices` - Flat array of face indices `[v0a, v1a, v2a, v0b, v1b, v2b, ...]`
    ///
    /// Returns an empty mesh if either length is not divisible by 3.
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self::from_parts(vertices, faces)
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// A mesh is empty when it has no vertices or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Triangle for a face, with resolved positions.
    ///
    /// Returns `None` if the face index or one of its vertex indices is out of
    /// bounds.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.faces.get(face_index)?;
        Some(Triangle::new(
            self.vertices.get(i0 as usize)?.position,
            self.vertices.get(i1 as usize)?.position,
            self.vertices.get(i2 as usize)?.position,
        ))
    }

    /// Iterate over all triangles with resolved vertex positions.
    ///
    /// Faces with out-of-range indices are skipped; validate indices first
    /// when every face must be visited.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Uses the divergence theorem: the signed volume is the sum of signed
    /// tetrahedra volumes formed by each face and the origin.
    ///
    /// - Positive value: normals point outward (correct orientation)
    /// - Negative value: normals point inward (inside-out mesh)
    /// - Zero: no faces, or flat geometry
    ///
    /// Only meaningful as a volume when the mesh is closed.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles().map(|t| signed_tetra_volume(&t)).sum::<f64>() / 6.0
    }

    /// Absolute value of [`signed_volume`](Self::signed_volume).
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Reverse the winding of a single face.
    pub fn flip_face(&mut self, face_index: usize) {
        if let Some(face) = self.faces.get_mut(face_index) {
            face.swap(1, 2);
        }
    }

    /// Color assigned to a face, if any.
    #[must_use]
    pub fn face_color(&self, face_index: usize) -> Option<Color> {
        self.face_colors.get(face_index).copied().flatten()
    }

    /// Assign a color to a face. Out-of-range face indices are ignored.
    pub fn set_face_color(&mut self, face_index: usize, color: Color) {
        if face_index >= self.faces.len() {
            return;
        }
        if self.face_colors.len() <= face_index {
            self.face_colors.resize(face_index + 1, None);
        }
        self.face_colors[face_index] = Some(color);
    }

    /// Assign a color to a vertex. Out-of-range vertex indices are ignored.
    pub fn set_vertex_color(&mut self, vertex_index: usize, color: Color) {
        if let Some(vertex) = self.vertices.get_mut(vertex_index) {
            vertex.color = Some(color);
        }
    }

    /// Indices of faces colored with `color`, ascending.
    #[must_use]
    pub fn faces_with_color(&self, color: Color) -> Vec<usize> {
        self.face_colors
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Some(color))
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of vertices colored with `color`, ascending.
    #[must_use]
    pub fn vertices_with_color(&self, color: Color) -> Vec<usize> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.color == Some(color))
            .map(|(i, _)| i)
            .collect()
    }

    /// Faces marked with [`Color::HIGHLIGHT`].
    #[inline]
    #[must_use]
    pub fn highlighted_faces(&self) -> Vec<usize> {
        self.faces_with_color(Color::HIGHLIGHT)
    }

    /// Vertices marked with [`Color::HIGHLIGHT`].
    #[inline]
    #[must_use]
    pub fn highlighted_vertices(&self) -> Vec<usize> {
        self.vertices_with_color(Color::HIGHLIGHT)
    }
}

/// Six times the signed volume of the tetrahedron (origin, v0, v1, v2).
fn signed_tetra_volume(tri: &Triangle) -> f64 {
    let (v0, v1, v2) = (&tri.v0, &tri.v1, &tri.v2);
    // v0 · (v1 × v2), with mul_add for accuracy
    let cross = Vector3::new(
        v1.y.mul_add(v2.z, -(v1.z * v2.y)),
        v1.z.mul_add(v2.x, -(v1.x * v2.z)),
        v1.x.mul_add(v2.y, -(v1.y * v2.x)),
    );
    v0.z.mul_add(cross.z, v0.x.mul_add(cross.x, v0.y * cross.y))
}

/// Create a unit cube mesh.
///
/// Spans (0,0,0) to (1,1,1): 8 vertices, 12 faces, outward-facing normals.
/// Every face angle is 45° or 90°.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let mut mesh = IndexedMesh::with_capacity(8, 12);

    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0)); // 2
    mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0)); // 3
    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 1.0)); // 4
    mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 1.0)); // 5
    mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 1.0)); // 6
    mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 1.0)); // 7

    // Bottom (z=0), normal -Z
    mesh.faces.push([0, 2, 1]);
    mesh.faces.push([0, 3, 2]);

    // Top (z=1), normal +Z
    mesh.faces.push([4, 5, 6]);
    mesh.faces.push([4, 6, 7]);

    // Front (y=0), normal -Y
    mesh.faces.push([0, 1, 5]);
    mesh.faces.push([0, 5, 4]);

    // Back (y=1), normal +Y
    mesh.faces.push([3, 7, 6]);
    mesh.faces.push([3, 6, 2]);

    // Left (x=0), normal -X
    mesh.faces.push([0, 4, 7]);
    mesh.faces.push([0, 7, 3]);

    // Right (x=1), normal +X
    mesh.faces.push([1, 2, 6]);
    mesh.faces.push([1, 6, 5]);

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mesh_is_empty() {
        let mesh = IndexedMesh::new();
        assert!(mesh.is_empty());

        let mut mesh2 = IndexedMesh::new();
        mesh2.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert!(mesh2.is_empty()); // no faces

        mesh2.faces.push([0, 0, 0]);
        assert!(!mesh2.is_empty());
    }

    #[test]
    fn mesh_from_raw() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mesh = IndexedMesh::from_raw(&positions, &[0, 1, 2]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);

        let bad = IndexedMesh::from_raw(&positions[..4], &[0, 1, 2]);
        assert!(bad.is_empty());
    }

    #[test]
    fn unit_cube_volume() {
        let cube = unit_cube();
        assert_relative_eq!(cube.signed_volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn flipped_cube_has_negative_volume() {
        let mut cube = unit_cube();
        for i in 0..cube.face_count() {
            cube.flip_face(i);
        }
        assert_relative_eq!(cube.signed_volume(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(cube.volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn planar_mesh_has_exactly_zero_volume() {
        let mesh = IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 1.0, 2.0, 0.0],
            &[0, 1, 2],
        );
        assert!(mesh.signed_volume() == 0.0);
    }

    #[test]
    fn triangle_out_of_range_is_none() {
        let mesh = IndexedMesh::from_raw(&[0.0, 0.0, 0.0], &[0, 1, 2]);
        assert!(mesh.triangle(0).is_none());
        assert!(mesh.triangle(5).is_none());
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn face_colors_are_sparse() {
        let mut cube = unit_cube();
        assert!(cube.face_color(3).is_none());

        cube.set_face_color(3, Color::HIGHLIGHT);
        cube.set_face_color(99, Color::HIGHLIGHT); // ignored

        assert_eq!(cube.face_color(3), Some(Color::HIGHLIGHT));
        assert!(cube.face_color(4).is_none());
        assert_eq!(cube.highlighted_faces(), vec![3]);
    }

    #[test]
    fn vertex_colors() {
        let mut cube = unit_cube();
        cube.set_vertex_color(6, Color::HIGHLIGHT);
        cube.set_vertex_color(100, Color::HIGHLIGHT); // ignored
        assert_eq!(cube.highlighted_vertices(), vec![6]);
        assert!(cube.vertices_with_color(Color::WHITE).is_empty());
    }

    #[test]
    fn cube_angles_are_45_or_90() {
        for tri in unit_cube().triangles() {
            for angle in tri.angles() {
                let deg = angle.to_degrees();
                assert!(
                    (deg - 45.0).abs() < 1e-9 || (deg - 90.0).abs() < 1e-9,
                    "unexpected angle {deg}"
                );
            }
        }
    }
}
