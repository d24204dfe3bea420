//! STL (Stereolithography) loading.
//!
//! Both ASCII and binary STL are accepted. A file is read as binary when its
//! size matches the face count in the header exactly, since some binary
//! exporters write `solid` into the header too. Otherwise a file starting
//! with `solid` is read as ASCII.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```
//!
//! STL stores every triangle with its own three corners; coincident corners
//! are merged after loading so that the faces share vertices.

use std::path::Path;

use mesh_types::{IndexedMesh, Vertex};
use tracing::debug;

use crate::error::{IoError, IoResult};
use crate::weld::merge_vertices;

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_stl;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("Loaded {} faces", mesh.faces.len());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| IoError::open(e, path))?;
    let mut mesh = parse_stl(&bytes)?;
    let merged = merge_vertices(&mut mesh);
    debug!(
        path = %path.display(),
        faces = mesh.face_count(),
        merged,
        "loaded STL"
    );
    Ok(mesh)
}

/// Parse STL bytes into an unmerged triangle soup.
pub(crate) fn parse_stl(bytes: &[u8]) -> IoResult<IndexedMesh> {
    if bytes.len() < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }
    if is_binary(bytes) {
        return parse_binary(bytes);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) if text.trim_start().starts_with("solid") => parse_ascii(text),
        _ => parse_binary(bytes),
    }
}

/// Check if the declared face count accounts for the whole file.
fn is_binary(bytes: &[u8]) -> bool {
    declared_faces(bytes)
        .is_some_and(|n| HEADER_SIZE + 4 + n as usize * TRIANGLE_SIZE == bytes.len())
}

fn declared_faces(bytes: &[u8]) -> Option<u32> {
    let count = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]))
}

fn parse_binary(bytes: &[u8]) -> IoResult<IndexedMesh> {
    let face_count = declared_faces(bytes).ok_or_else(|| {
        IoError::invalid_content(format!(
            "binary STL header needs {} bytes, got {}",
            HEADER_SIZE + 4,
            bytes.len()
        ))
    })?;

    let body = &bytes[HEADER_SIZE + 4..];
    // The header count is untrusted; reserve no more than the body can hold.
    let capacity = (face_count as usize).min(body.len() / TRIANGLE_SIZE);
    let mut mesh = IndexedMesh::with_capacity(capacity * 3, capacity);
    let mut chunks = body.chunks_exact(TRIANGLE_SIZE);
    for i in 0..face_count {
        let triangle = chunks.next().ok_or(IoError::InvalidFaceCount {
            expected: face_count,
            got: i,
        })?;
        // Skip the normal, read three corners.
        let base = mesh.vertices.len() as u32;
        for corner in triangle[12..48].chunks_exact(12) {
            mesh.vertices.push(read_vertex(corner));
        }
        mesh.faces.push([base, base + 1, base + 2]);
    }

    Ok(mesh)
}

/// Read a vertex from 12 bytes (3 little-endian f32s).
fn read_vertex(buf: &[u8]) -> Vertex {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Vertex::from_coords(f64::from(x), f64::from(y), f64::from(z))
}

fn parse_ascii(text: &str) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut corners: Vec<Vertex> = Vec::with_capacity(3);
    let mut in_loop = false;

    for (number, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" if in_loop => {
                let coords: Vec<f64> = parts.map(str::parse).collect::<Result<_, _>>()?;
                let &[x, y, z] = coords.as_slice() else {
                    return Err(IoError::invalid_content(format!(
                        "line {}: vertex needs 3 coordinates, got {}",
                        number + 1,
                        coords.len()
                    )));
                };
                corners.push(Vertex::from_coords(x, y, z));
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                if corners.len() != 3 {
                    return Err(IoError::invalid_content(format!(
                        "line {}: facet with {} vertices",
                        number + 1,
                        corners.len()
                    )));
                }
                let base = mesh.vertices.len() as u32;
                mesh.vertices.append(&mut corners);
                mesh.faces.push([base, base + 1, base + 2]);
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(mesh)
}
