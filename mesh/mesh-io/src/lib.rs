//! Mesh discovery and loading.
//!
//! This crate finds mesh files in a directory and loads triangle meshes from
//! them:
//!
//! - **STL** (Stereolithography) - Binary and ASCII, detected automatically
//! - **OBJ** (Wavefront) - Triangles only
//!
//! Coincident vertices are merged after loading, so faces reference shared
//! vertices even for formats that store every triangle separately.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{find_mesh_files, load_mesh};
//!
//! for path in find_mesh_files("models", &["stl", ".obj"]).unwrap() {
//!     let mesh = load_mesh(&path).unwrap();
//!     println!("{}: {} faces", path.display(), mesh.face_count());
//! }
//! ```

#![warn(missing_docs)]
// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod obj;
mod stl;
mod weld;

pub use error::{IoError, IoResult};
pub use obj::load_obj;
pub use stl::load_stl;

use std::path::{Path, PathBuf};

use mesh_types::IndexedMesh;
use tracing::debug;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// STL (Stereolithography) format, binary or ASCII.
    Stl,
    /// OBJ (Wavefront) format.
    Obj,
}

impl MeshFormat {
    /// Detect format from file extension (case-insensitive).
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }
}

/// List the files in `dir` whose extension is one of `extensions`.
///
/// Extensions match case-insensitively and may be given with or without a
/// leading dot. Subdirectories are not searched. The result is sorted.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `dir` does not exist, or an I/O
/// error if it cannot be read.
pub fn find_mesh_files<P, S>(dir: P, extensions: &[S]) -> IoResult<Vec<PathBuf>>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let dir = dir.as_ref();
    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
        .collect();

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| IoError::open(e, dir))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| wanted.iter().any(|w| w.eq_ignore_ascii_case(e)));
        if matches {
            files.push(path);
        }
    }
    files.sort();

    debug!(dir = %dir.display(), found = files.len(), "listed mesh files");
    Ok(files)
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if the extension is not recognized, the file cannot be
/// read, or its content is invalid for the detected format.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_mesh;
///
/// let mesh = load_mesh("model.stl").unwrap();
/// ```
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path).ok_or_else(|| IoError::UnknownFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        MeshFormat::Stl => load_stl(path),
        MeshFormat::Obj => load_obj(path),
    }
}
