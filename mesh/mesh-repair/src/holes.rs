//! Hole detection and filling.
//!
//! A hole is a closed loop of boundary edges (edges with only one adjacent
//! face). Loops are traced over undirected boundary edges; a loop is only
//! fillable when it closes and none of its vertices is a *pinch* vertex (a
//! vertex with more than two boundary edges, where two holes touch).
//!
//! # Example
//!
//! ```
//! use mesh_types::unit_cube;
//! use mesh_repair::MeshAdjacency;
//! use mesh_repair::holes::{detect_holes, fill_holes};
//!
//! let mut mesh = unit_cube();
//! mesh.faces.remove(2);
//!
//! let scan = detect_holes(&mesh.faces, &MeshAdjacency::build(&mesh.faces));
//! assert_eq!(scan.loops.len(), 1);
//!
//! let fill = fill_holes(&mut mesh, 4).unwrap();
//! assert_eq!(fill.holes_filled, 1);
//! assert!(MeshAdjacency::build(&mesh.faces).is_watertight());
//! ```

use hashbrown::{HashMap, HashSet};
use mesh_types::{IndexedMesh, Point3, Triangle, Vector3};
use tracing::{debug, info, warn};

use crate::adjacency::{MeshAdjacency, normalize_edge, traverses};
use crate::error::{RepairError, RepairResult};

/// A boundary loop representing a hole in the mesh.
///
/// Vertices are ordered so that walking the loop traverses each boundary edge
/// opposite to the face that owns it. Triangles that follow the loop order
/// therefore agree with the surrounding winding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    /// Ordered list of vertex indices forming the loop.
    pub vertices: Vec<u32>,
}

impl BoundaryLoop {
    /// Number of edges (and vertices) in the loop.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Result of tracing the boundary of a mesh.
#[derive(Debug, Clone, Default)]
pub struct HoleScan {
    /// Closed, pinch-free loops that can be triangulated.
    pub loops: Vec<BoundaryLoop>,
    /// Boundary chains that cannot be filled (open or pinched).
    pub rejected: usize,
}

/// Outcome of [`fill_holes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoleFill {
    /// Number of holes triangulated.
    pub holes_filled: usize,
    /// Number of faces appended to the mesh.
    pub faces_added: usize,
    /// Fillable holes left open because they exceed the edge limit.
    pub skipped_large: usize,
    /// Boundary chains that are open or pinched.
    pub rejected: usize,
}

/// Detect all fillable boundary loops (holes) in the mesh.
///
/// `faces` must be the face list `adjacency` was built from.
///
/// # Example
///
/// ```
/// use mesh_repair::{MeshAdjacency, holes::detect_holes};
///
/// let faces = vec![[0, 1, 2]];
/// let scan = detect_holes(&faces, &MeshAdjacency::build(&faces));
///
/// // A single triangle has one boundary loop (all 3 edges are boundary)
/// assert_eq!(scan.loops.len(), 1);
/// assert_eq!(scan.loops[0].edge_count(), 3);
/// ```
#[must_use]
pub fn detect_holes(faces: &[[u32; 3]], adjacency: &MeshAdjacency) -> HoleScan {
    let boundary_edges = adjacency.boundary_edges();
    if boundary_edges.is_empty() {
        return HoleScan::default();
    }

    debug!("Found {} boundary edges", boundary_edges.len());

    let mut neighbors: HashMap<u32, Vec<u32>> = HashMap::new();
    for &(a, b) in &boundary_edges {
        neighbors.entry(a).or_default().push(b);
        neighbors.entry(b).or_default().push(a);
    }
    let is_pinch = |v: u32| neighbors.get(&v).is_some_and(|n| n.len() > 2);

    let mut used: HashSet<(u32, u32)> = HashSet::new();
    let mut scan = HoleScan::default();

    for &(start, second) in &boundary_edges {
        if !used.insert((start, second)) {
            continue;
        }

        let mut chain = vec![start, second];
        let mut pinched = is_pinch(start) || is_pinch(second);
        let mut closed = false;

        while let Some(&current) = chain.last() {
            if current == start {
                chain.pop();
                closed = true;
                break;
            }
            let next = neighbors.get(&current).and_then(|candidates| {
                candidates
                    .iter()
                    .copied()
                    .find(|&n| !used.contains(&normalize_edge(current, n)))
            });
            let Some(next) = next else {
                break;
            };
            used.insert(normalize_edge(current, next));
            pinched |= is_pinch(next);
            chain.push(next);
        }

        if !closed || pinched || chain.len() < 3 {
            warn!(
                "Boundary chain starting at vertex {} is {}",
                start,
                if closed { "pinched" } else { "not closed" }
            );
            scan.rejected += 1;
            continue;
        }

        let mut hole = BoundaryLoop { vertices: chain };
        orient_against_owner(&mut hole, faces, adjacency);
        scan.loops.push(hole);
    }

    info!(
        "Detected {} holes (boundary loops), sizes: {:?}, rejected: {}",
        scan.loops.len(),
        scan.loops
            .iter()
            .map(BoundaryLoop::edge_count)
            .collect::<Vec<_>>(),
        scan.rejected
    );

    scan
}

/// Reverse the loop when its first edge runs the same way as the owning face.
fn orient_against_owner(hole: &mut BoundaryLoop, faces: &[[u32; 3]], adjacency: &MeshAdjacency) {
    let (a, b) = (hole.vertices[0], hole.vertices[1]);
    let owner = adjacency
        .faces_for_edge(a, b)
        .and_then(|f| f.first())
        .and_then(|&f| faces.get(f));
    if owner.is_some_and(|&face| traverses(face, a, b)) {
        hole.vertices.reverse();
    }
}

/// Fill a hole using ear clipping triangulation.
///
/// Returns the new triangles to add to the mesh, wound in loop order. Falls
/// back to a fan over the remaining vertices when no ear can be found.
///
/// # Errors
///
/// Returns [`RepairError::InvalidIndex`] if a loop vertex is out of range.
pub fn fill_hole_ear_clipping(
    mesh: &IndexedMesh,
    boundary: &BoundaryLoop,
) -> RepairResult<Vec<[u32; 3]>> {
    let n = boundary.vertices.len();
    if n < 3 {
        return Ok(Vec::new());
    }

    let positions = boundary
        .vertices
        .iter()
        .map(|&idx| {
            mesh.vertices
                .get(idx as usize)
                .map(|v| v.position)
                .ok_or(RepairError::InvalidIndex {
                    index: idx,
                    vertex_count: mesh.vertices.len(),
                })
        })
        .collect::<RepairResult<Vec<Point3<f64>>>>()?;

    let hole_normal = compute_hole_normal(&positions);

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let len = remaining.len();
        let ear = (0..len).find(|&i| {
            let prev = remaining[(i + len - 1) % len];
            let next = remaining[(i + 1) % len];
            is_ear(&positions, &remaining, prev, remaining[i], next, &hole_normal)
        });

        let Some(i) = ear else {
            warn!(
                "Ear clipping stuck with {} vertices remaining, using fan triangulation",
                len
            );
            break;
        };

        let prev = remaining[(i + len - 1) % len];
        let next = remaining[(i + 1) % len];
        triangles.push([
            boundary.vertices[prev],
            boundary.vertices[remaining[i]],
            boundary.vertices[next],
        ]);
        remaining.remove(i);
    }

    // Whatever is left (a triangle, or a polygon with no ears) becomes a fan
    for i in 1..remaining.len() - 1 {
        triangles.push([
            boundary.vertices[remaining[0]],
            boundary.vertices[remaining[i]],
            boundary.vertices[remaining[i + 1]],
        ]);
    }

    debug!(
        "Filled hole with {} edges using {} triangles",
        n,
        triangles.len()
    );

    Ok(triangles)
}

/// Newell normal of a closed polygon, in loop order.
fn compute_hole_normal(positions: &[Point3<f64>]) -> Vector3<f64> {
    let n = positions.len();
    let centroid = positions
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / n as f64;

    let mut normal = Vector3::zeros();
    for i in 0..n {
        let v0 = positions[i].coords - centroid;
        let v1 = positions[(i + 1) % n].coords - centroid;
        normal += v0.cross(&v1);
    }

    normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z)
}

/// Check if vertex at index `curr` forms a valid ear.
fn is_ear(
    positions: &[Point3<f64>],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    hole_normal: &Vector3<f64>,
) -> bool {
    let (p_prev, p_curr, p_next) = (positions[prev], positions[curr], positions[next]);

    let Some(tri_normal) = Triangle::new(p_prev, p_curr, p_next).normal() else {
        return false; // Degenerate
    };

    // Reflex corner
    if tri_normal.dot(hole_normal) < 0.0 {
        return false;
    }

    !remaining
        .iter()
        .filter(|&&idx| idx != prev && idx != curr && idx != next)
        .any(|&idx| point_in_triangle_2d(&positions[idx], &p_prev, &p_curr, &p_next, hole_normal))
}

/// Check if point is inside triangle (projected onto plane defined by normal).
fn point_in_triangle_2d(
    p: &Point3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    normal: &Vector3<f64>,
) -> bool {
    // Drop the axis most aligned with the normal
    let abs = normal.abs();
    let project = |q: &Point3<f64>| {
        if abs.z >= abs.x && abs.z >= abs.y {
            (q.x, q.y)
        } else if abs.y >= abs.x {
            (q.x, q.z)
        } else {
            (q.y, q.z)
        }
    };

    let (p, a, b, c) = (project(p), project(v0), project(v1), project(v2));
    let sign = |p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)| -> f64 {
        (p1.0 - p3.0).mul_add(p2.1 - p3.1, -((p2.0 - p3.0) * (p1.1 - p3.1)))
    };

    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Fill all holes in the mesh with at most `max_hole_edges` edges.
///
/// Larger holes, open boundary chains and pinched loops are left untouched
/// and counted in the returned [`HoleFill`].
///
/// # Errors
///
/// Returns an error if a hole references a vertex outside the mesh or cannot
/// be triangulated.
pub fn fill_holes(mesh: &mut IndexedMesh, max_hole_edges: usize) -> RepairResult<HoleFill> {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let scan = detect_holes(&mesh.faces, &adjacency);

    let (fillable, skipped): (Vec<_>, Vec<_>) = scan
        .loops
        .into_iter()
        .partition(|hole| hole.edge_count() <= max_hole_edges);

    for hole in &skipped {
        warn!(
            "Skipping large hole with {} edges (max: {})",
            hole.edge_count(),
            max_hole_edges
        );
    }

    let mut fill = HoleFill {
        skipped_large: skipped.len(),
        rejected: scan.rejected,
        ..HoleFill::default()
    };

    for hole in &fillable {
        let triangles = fill_hole_ear_clipping(mesh, hole)?;
        if triangles.is_empty() {
            return Err(RepairError::HoleFillFailed {
                edges: hole.edge_count(),
                reason: "no triangles produced".to_string(),
            });
        }
        fill.faces_added += triangles.len();
        fill.holes_filled += 1;
        mesh.faces.extend(triangles);
    }

    if fill.holes_filled > 0 {
        info!(
            "Filled {} holes with {} faces",
            fill.holes_filled, fill.faces_added
        );
    }

    Ok(fill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{Vertex, unit_cube};

    fn open_box_mesh() -> IndexedMesh {
        // Unit cube without its two top triangles (square hole at z=1)
        let mut mesh = unit_cube();
        mesh.faces.retain(|f| f.iter().any(|&v| v < 4));
        mesh
    }

    fn cube_missing_face(face: usize) -> IndexedMesh {
        let mut mesh = unit_cube();
        mesh.faces.remove(face);
        mesh
    }

    #[test]
    fn detect_holes_open_box() {
        let mesh = open_box_mesh();
        let scan = detect_holes(&mesh.faces, &MeshAdjacency::build(&mesh.faces));

        assert_eq!(scan.loops.len(), 1);
        assert_eq!(scan.loops[0].edge_count(), 4);
        assert_eq!(scan.rejected, 0);
    }

    #[test]
    fn detect_holes_closed_box() {
        let mesh = unit_cube();
        let scan = detect_holes(&mesh.faces, &MeshAdjacency::build(&mesh.faces));

        assert!(scan.loops.is_empty());
        assert_eq!(scan.rejected, 0);
    }

    #[test]
    fn loop_runs_against_owning_faces() {
        let mesh = cube_missing_face(2); // [4, 5, 6]
        let scan = detect_holes(&mesh.faces, &MeshAdjacency::build(&mesh.faces));

        let hole = &scan.loops[0];
        let n = hole.edge_count();
        for i in 0..n {
            let (a, b) = (hole.vertices[i], hole.vertices[(i + 1) % n]);
            assert!(
                !mesh.faces.iter().any(|&f| traverses(f, a, b)),
                "edge {a}->{b} already used in this direction"
            );
        }
    }

    #[test]
    fn refilled_triangle_restores_winding() {
        let mut mesh = cube_missing_face(2);
        let fill = fill_holes(&mut mesh, 4).unwrap();

        assert_eq!(fill.holes_filled, 1);
        assert_eq!(fill.faces_added, 1);
        let adjacency = MeshAdjacency::build(&mesh.faces);
        assert!(adjacency.is_watertight());
        assert!(adjacency.is_winding_consistent(&mesh.faces));
    }

    #[test]
    fn fill_square_hole() {
        let mut mesh = open_box_mesh();
        let before = mesh.face_count();

        let fill = fill_holes(&mut mesh, 100).unwrap();

        assert_eq!(fill.holes_filled, 1);
        assert_eq!(mesh.face_count(), before + 2);
        let adjacency = MeshAdjacency::build(&mesh.faces);
        assert!(adjacency.is_watertight());
        assert!(adjacency.is_winding_consistent(&mesh.faces));
        assert!(mesh.signed_volume() > 0.0);
    }

    #[test]
    fn fill_holes_max_edges_limit() {
        let mut mesh = open_box_mesh();

        let fill = fill_holes(&mut mesh, 3).unwrap();

        assert_eq!(fill.holes_filled, 0);
        assert_eq!(fill.skipped_large, 1);
    }

    #[test]
    fn pinched_loops_are_rejected() {
        // Removing [4, 6, 7] and [1, 2, 6] leaves two holes touching at vertex 6
        let mut mesh = unit_cube();
        mesh.faces.retain(|f| *f != [4, 6, 7] && *f != [1, 2, 6]);

        let before = mesh.face_count();
        let fill = fill_holes(&mut mesh, 4).unwrap();

        assert_eq!(fill.holes_filled, 0);
        assert_eq!(fill.rejected, 2);
        assert_eq!(mesh.face_count(), before);
    }

    #[test]
    fn concave_hole_uses_ears_inside_polygon() {
        // L-shaped planar ring: triangulation must stay inside the outline
        let outline = [
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ];
        let mut mesh = IndexedMesh::new();
        for &(x, y) in &outline {
            mesh.vertices.push(Vertex::from_coords(x, y, 0.0));
        }
        let hole = BoundaryLoop {
            vertices: (0..6).collect(),
        };

        let triangles = fill_hole_ear_clipping(&mesh, &hole).unwrap();
        assert_eq!(triangles.len(), 4);

        let area: f64 = triangles
            .iter()
            .map(|t| {
                Triangle::new(
                    mesh.vertices[t[0] as usize].position,
                    mesh.vertices[t[1] as usize].position,
                    mesh.vertices[t[2] as usize].position,
                )
                .area()
            })
            .sum();
        assert!((area - 3.0).abs() < 1e-12);
    }

    #[test]
    fn fill_rejects_out_of_range_loop() {
        let mesh = IndexedMesh::new();
        let hole = BoundaryLoop {
            vertices: vec![0, 1, 2],
        };
        assert!(matches!(
            fill_hole_ear_clipping(&mesh, &hole),
            Err(RepairError::InvalidIndex { index: 0, .. })
        ));
    }
}
