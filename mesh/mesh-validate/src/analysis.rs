//! Derived mesh views, computed lazily and memoized.
//!
//! A [`MeshAnalysis`] borrows the mesh immutably. Every view is built on
//! first use and shared by all checks that need it. After the mesh is
//! mutated (by the watertight repair) a fresh analysis must be created.

use std::cell::OnceCell;
use std::f64::consts::TAU;

use mesh_repair::MeshAdjacency;
use mesh_types::IndexedMesh;
use tracing::debug;

use crate::error::{ValidateError, ValidateResult};

/// Verify face indices are in range and distinct and coordinates are finite.
///
/// # Errors
///
/// Returns the first violation found: out-of-range and repeated indices in
/// face order, then non-finite vertices in vertex order.
pub fn check_input(mesh: &IndexedMesh) -> ValidateResult<()> {
    let vertex_count = mesh.vertices.len();

    for (face, &vertices) in mesh.faces.iter().enumerate() {
        if let Some(&index) = vertices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ValidateError::IndexOutOfRange {
                face,
                index,
                vertex_count,
            });
        }
        let [a, b, c] = vertices;
        if a == b || b == c || a == c {
            return Err(ValidateError::RepeatedIndex { face, vertices });
        }
    }

    if let Some(index) = mesh.vertices.iter().position(|v| !v.is_finite()) {
        return Err(ValidateError::NonFiniteVertex { index });
    }

    Ok(())
}

/// Memoized derived views of a mesh.
///
/// Assumes the mesh passed [`check_input`]; faces with out-of-range indices
/// would be skipped by the geometric views.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_validate::MeshAnalysis;
///
/// let cube = unit_cube();
/// let analysis = MeshAnalysis::new(&cube);
///
/// assert!(analysis.is_watertight());
/// assert!(analysis.face_adjacency_counts().iter().all(|&c| c == 3));
/// assert!((analysis.volume() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct MeshAnalysis<'a> {
    mesh: &'a IndexedMesh,
    adjacency: OnceCell<MeshAdjacency>,
    face_adjacency: OnceCell<Vec<[usize; 2]>>,
    face_adjacency_counts: OnceCell<Vec<u8>>,
    vertex_degrees: OnceCell<Vec<u32>>,
    face_angles: OnceCell<Vec<[f64; 3]>>,
    vertex_defects: OnceCell<Vec<f64>>,
    volume: OnceCell<f64>,
    is_watertight: OnceCell<bool>,
    is_winding_consistent: OnceCell<bool>,
}

impl<'a> MeshAnalysis<'a> {
    /// Create an analysis over `mesh`. Nothing is computed yet.
    #[must_use]
    pub fn new(mesh: &'a IndexedMesh) -> Self {
        Self {
            mesh,
            adjacency: OnceCell::new(),
            face_adjacency: OnceCell::new(),
            face_adjacency_counts: OnceCell::new(),
            vertex_degrees: OnceCell::new(),
            face_angles: OnceCell::new(),
            vertex_defects: OnceCell::new(),
            volume: OnceCell::new(),
            is_watertight: OnceCell::new(),
            is_winding_consistent: OnceCell::new(),
        }
    }

    /// The analysed mesh.
    #[must_use]
    pub fn mesh(&self) -> &'a IndexedMesh {
        self.mesh
    }

    /// Edge-to-face adjacency.
    pub fn adjacency(&self) -> &MeshAdjacency {
        self.adjacency.get_or_init(|| {
            debug!(faces = self.mesh.face_count(), "building edge adjacency");
            MeshAdjacency::build(&self.mesh.faces)
        })
    }

    /// Face pairs sharing an edge used by exactly two faces.
    pub fn face_adjacency(&self) -> &[[usize; 2]] {
        self.face_adjacency
            .get_or_init(|| self.adjacency().face_adjacency())
    }

    /// Number of adjacency pairs each face appears in.
    pub fn face_adjacency_counts(&self) -> &[u8] {
        self.face_adjacency_counts.get_or_init(|| {
            let mut counts = vec![0u8; self.mesh.face_count()];
            for &[f, g] in self.face_adjacency() {
                counts[f] = counts[f].saturating_add(1);
                counts[g] = counts[g].saturating_add(1);
            }
            counts
        })
    }

    /// Number of unique edges incident to each vertex.
    pub fn vertex_degrees(&self) -> &[u32] {
        self.vertex_degrees
            .get_or_init(|| self.adjacency().vertex_degrees(self.mesh.vertex_count()))
    }

    /// Interior angles (radians) at the three corners of every face.
    pub fn face_angles(&self) -> &[[f64; 3]] {
        self.face_angles.get_or_init(|| {
            debug!("computing face angles");
            (0..self.mesh.face_count())
                .map(|f| self.mesh.triangle(f).map_or([0.0; 3], |t| t.angles()))
                .collect()
        })
    }

    /// `2π` minus the sum of face angles at each vertex.
    pub fn vertex_angle_defects(&self) -> &[f64] {
        self.vertex_defects.get_or_init(|| {
            let mut sums = vec![0.0; self.mesh.vertex_count()];
            for (face, angles) in self.mesh.faces.iter().zip(self.face_angles()) {
                for (&v, &angle) in face.iter().zip(angles) {
                    if let Some(sum) = sums.get_mut(v as usize) {
                        *sum += angle;
                    }
                }
            }
            sums.into_iter().map(|sum| TAU - sum).collect()
        })
    }

    /// Signed enclosed volume.
    pub fn volume(&self) -> f64 {
        *self.volume.get_or_init(|| self.mesh.signed_volume())
    }

    /// At least one face, and every edge shared by exactly two faces.
    pub fn is_watertight(&self) -> bool {
        *self
            .is_watertight
            .get_or_init(|| self.adjacency().is_watertight())
    }

    /// Every manifold edge is traversed in opposite directions by its faces.
    pub fn is_winding_consistent(&self) -> bool {
        *self
            .is_winding_consistent
            .get_or_init(|| self.adjacency().is_winding_consistent(&self.mesh.faces))
    }
}
