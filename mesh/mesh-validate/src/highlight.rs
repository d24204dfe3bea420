//! Marking offending elements on the mesh.

use mesh_types::{Color, IndexedMesh};

use crate::outcome::Offender;

/// Receives the elements named by a failure, just before it is returned.
pub trait Highlighter {
    /// Mark one face.
    fn highlight_face(&mut self, mesh: &mut IndexedMesh, face: usize);

    /// Mark one vertex.
    fn highlight_vertex(&mut self, mesh: &mut IndexedMesh, vertex: usize);

    /// Mark every face and vertex named by `offender`.
    fn highlight(&mut self, mesh: &mut IndexedMesh, offender: &Offender) {
        for face in offender.faces() {
            self.highlight_face(mesh, face);
        }
        for vertex in offender.vertices() {
            self.highlight_vertex(mesh, vertex);
        }
    }
}

/// Writes a fixed color into the mesh's face and vertex colors.
///
/// # Example
///
/// ```
/// use mesh_types::{Color, unit_cube};
/// use mesh_validate::{ColorHighlighter, Highlighter};
///
/// let mut cube = unit_cube();
/// ColorHighlighter::default().highlight_face(&mut cube, 3);
/// assert_eq!(cube.face_color(3), Some(Color::HIGHLIGHT));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorHighlighter {
    /// Color written to offending elements.
    pub color: Color,
}

impl Default for ColorHighlighter {
    fn default() -> Self {
        Self {
            color: Color::HIGHLIGHT,
        }
    }
}

impl Highlighter for ColorHighlighter {
    fn highlight_face(&mut self, mesh: &mut IndexedMesh, face: usize) {
        mesh.set_face_color(face, self.color);
    }

    fn highlight_vertex(&mut self, mesh: &mut IndexedMesh, vertex: usize) {
        mesh.set_vertex_color(vertex, self.color);
    }
}

/// Leaves the mesh untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn highlight_face(&mut self, _mesh: &mut IndexedMesh, _face: usize) {}

    fn highlight_vertex(&mut self, _mesh: &mut IndexedMesh, _vertex: usize) {}
}
