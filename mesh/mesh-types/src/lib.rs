//! Core mesh types for the surface validator.
//!
//! This crate provides the in-memory mesh representation every other crate
//! works on:
//!
//! - [`Vertex`] - A point in 3D space with an optional highlight color
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices and per-face colors
//! - [`Triangle`] - A concrete triangle with vertex positions (angles, normal, area)
//! - [`Color`] - RGBA color used to mark offending geometry
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Winding
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule, so a closed, correctly
//! oriented mesh has a positive signed volume.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod mesh;
mod triangle;
mod vertex;

pub use mesh::{IndexedMesh, unit_cube};
pub use triangle::Triangle;
pub use vertex::{Color, Vertex};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
