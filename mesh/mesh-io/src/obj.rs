//! Wavefront OBJ loading.
//!
//! Only `v` and `f` records are read. Face corners may carry texture and
//! normal references (`f 1/1/1 2/2/2 3/3/3`), which are ignored, and may use
//! negative indices relative to the vertices read so far. Faces with more
//! than three corners are rejected.

use std::path::Path;

use mesh_types::{IndexedMesh, Vertex};
use tracing::debug;

use crate::error::{IoError, IoResult};
use crate::weld::merge_vertices;

/// Load a triangle mesh from an OBJ file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a record cannot be parsed,
/// a face index is out of range, or a face is not a triangle.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_obj;
///
/// let mesh = load_obj("model.obj").unwrap();
/// println!("Loaded {} faces", mesh.faces.len());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| IoError::open(e, path))?;
    let mut mesh = parse_obj(&text)?;
    let merged = merge_vertices(&mut mesh);
    debug!(
        path = %path.display(),
        faces = mesh.face_count(),
        merged,
        "loaded OBJ"
    );
    Ok(mesh)
}

pub(crate) fn parse_obj(text: &str) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();

    for (number, line) in text.lines().enumerate() {
        let line_number = number + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let coords: Vec<f64> = parts
                    .take(3)
                    .map(str::parse)
                    .collect::<Result<_, _>>()?;
                let &[x, y, z] = coords.as_slice() else {
                    return Err(IoError::invalid_content(format!(
                        "line {line_number}: vertex needs 3 coordinates"
                    )));
                };
                mesh.vertices.push(Vertex::from_coords(x, y, z));
            }
            Some("f") => {
                let corners = parts
                    .map(|corner| resolve_index(corner, mesh.vertices.len(), line_number))
                    .collect::<IoResult<Vec<u32>>>()?;
                match corners.as_slice() {
                    &[a, b, c] => mesh.faces.push([a, b, c]),
                    other if other.len() > 3 => {
                        return Err(IoError::UnsupportedPolygon {
                            line: line_number,
                            vertices: other.len(),
                        });
                    }
                    other => {
                        return Err(IoError::invalid_content(format!(
                            "line {line_number}: face with {} vertices",
                            other.len()
                        )));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Turn one face corner (`7`, `7/2`, `7//3`, `-1`) into a 0-based index.
fn resolve_index(corner: &str, vertex_count: usize, line: usize) -> IoResult<u32> {
    let raw = corner.split('/').next().unwrap_or_default();
    let index: i64 = raw.parse().map_err(|_| {
        IoError::invalid_content(format!("line {line}: bad face index `{corner}`"))
    })?;

    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => vertex_count as i64 + i,
        _ => -1,
    };
    if resolved < 0 || resolved >= vertex_count as i64 {
        return Err(IoError::invalid_content(format!(
            "line {line}: face index {index} out of range for {vertex_count} vertices"
        )));
    }
    Ok(resolved as u32)
}
