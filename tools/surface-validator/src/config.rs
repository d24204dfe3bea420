//! Run configuration loaded from TOML.
//!
//! ```toml
//! path_to_files = "models"
//! validated_file_endings = ["stl", "obj"]
//! maximum_files_for_verbosity = 10
//!
//! [checks]
//! thin_angle = true
//! min_triangle_angle_degrees = 10.0
//! sharp_vertex = false
//! sharp_defect_threshold = 0.1
//! consistent_winding = true
//! strict_edge_manifold = false
//! max_hole_edges = 4
//! ```
//!
//! Missing keys take the defaults shown above. Unknown keys are rejected.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mesh_validate::ValidationOptions;
use serde::{Deserialize, Serialize};

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory searched for meshes.
    pub path_to_files: PathBuf,
    /// Extensions of the files to validate, with or without a leading dot.
    pub validated_file_endings: Vec<String>,
    /// Log every check transition when there are at most this many files.
    pub maximum_files_for_verbosity: usize,
    /// Which optional checks run, and their thresholds.
    pub checks: ChecksConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path_to_files: PathBuf::from("."),
            validated_file_endings: vec!["stl".to_string()],
            maximum_files_for_verbosity: 10,
            checks: ChecksConfig::default(),
        }
    }
}

/// The `[checks]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChecksConfig {
    /// Run the thin-triangle check.
    pub thin_angle: bool,
    /// Smallest acceptable interior angle, in degrees.
    pub min_triangle_angle_degrees: f64,
    /// Run the sharp-vertex check.
    pub sharp_vertex: bool,
    /// Angle defect (radians) below which a vertex is reported.
    pub sharp_defect_threshold: f64,
    /// Run the winding-consistency check.
    pub consistent_winding: bool,
    /// Fail faces on boundary edges instead of attempting a repair.
    pub strict_edge_manifold: bool,
    /// Largest hole, in boundary edges, the repair fills.
    pub max_hole_edges: usize,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        let options = ValidationOptions::default();
        Self {
            thin_angle: options.enable_thin_angle_check,
            min_triangle_angle_degrees: options.min_triangle_angle_radians.to_degrees(),
            sharp_vertex: options.enable_sharp_vertex_check,
            sharp_defect_threshold: options.sharp_defect_threshold,
            consistent_winding: options.enable_winding_check,
            strict_edge_manifold: options.strict_edge_manifold,
            max_hole_edges: options.max_hole_edges,
        }
    }
}

impl ChecksConfig {
    /// Convert to validator options.
    #[must_use]
    pub fn to_options(&self) -> ValidationOptions {
        ValidationOptions::default()
            .with_thin_angle_check(self.thin_angle)
            .with_min_triangle_angle_degrees(self.min_triangle_angle_degrees)
            .with_sharp_vertex_check(self.sharp_vertex)
            .with_sharp_defect_threshold(self.sharp_defect_threshold)
            .with_winding_check(self.consistent_winding)
            .with_strict_edge_manifold(self.strict_edge_manifold)
            .with_max_hole_edges(self.max_hole_edges)
    }
}

impl Config {
    /// Default config file, read when present and no file is named.
    pub const DEFAULT_PATH: &'static str = "mesh.toml";

    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid TOML, a wrong type or an unknown key.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Load `path`, or [`Config::DEFAULT_PATH`] if it exists, or defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(Self::DEFAULT_PATH).is_file() => Path::new(Self::DEFAULT_PATH),
            None => {
                tracing::debug!("no {} found, using defaults", Self::DEFAULT_PATH);
                return Ok(Self::default());
            }
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in config file {}", path.display()))
    }

    /// The directory to search, checked to exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist.
    pub fn target_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        let dir = override_dir.unwrap_or(&self.path_to_files);
        if !dir.is_dir() {
            anyhow::bail!("mesh directory not found: {}", dir.display());
        }
        Ok(dir.to_path_buf())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_file_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());

        let options = config.checks.to_options();
        let defaults = ValidationOptions::default();
        assert_relative_eq!(
            options.min_triangle_angle_radians,
            defaults.min_triangle_angle_radians
        );
        assert_eq!(options.max_hole_edges, defaults.max_hole_edges);
        assert_eq!(options.enable_winding_check, defaults.enable_winding_check);
    }

    #[test]
    fn full_file() {
        let config = Config::from_toml(
            r#"
            path_to_files = "models"
            validated_file_endings = [".STL", "obj"]
            maximum_files_for_verbosity = 2

            [checks]
            thin_angle = false
            min_triangle_angle_degrees = 5.0
            sharp_vertex = true
            sharp_defect_threshold = 0.05
            consistent_winding = false
            strict_edge_manifold = true
            max_hole_edges = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.path_to_files, PathBuf::from("models"));
        assert_eq!(config.validated_file_endings, [".STL", "obj"]);
        assert_eq!(config.maximum_files_for_verbosity, 2);

        let options = config.checks.to_options();
        assert!(!options.enable_thin_angle_check);
        assert_relative_eq!(options.min_triangle_angle_radians, 5.0_f64.to_radians());
        assert!(options.enable_sharp_vertex_check);
        assert_relative_eq!(options.sharp_defect_threshold, 0.05);
        assert!(!options.enable_winding_check);
        assert!(options.strict_edge_manifold);
        assert_eq!(options.max_hole_edges, 12);
    }

    #[test]
    fn partial_checks_table() {
        let config = Config::from_toml("[checks]\nsharp_vertex = true\n").unwrap();
        assert!(config.checks.sharp_vertex);
        assert!(config.checks.thin_angle);
        assert_eq!(config.validated_file_endings, ["stl"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("path_to_stl_files = \"x\"").is_err());
        assert!(Config::from_toml("[checks]\ncheck_four = true\n").is_err());
        assert!(Config::from_toml("maximum_files_for_verbosity = \"ten\"").is_err());
    }

    #[test]
    fn load_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "maximum_files_for_verbosity = 0\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.maximum_files_for_verbosity, 0);

        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn target_dir_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            path_to_files: dir.path().join("nope"),
            ..Config::default()
        };
        assert!(config.target_dir(None).is_err());
        assert_eq!(
            config.target_dir(Some(dir.path())).unwrap(),
            dir.path().to_path_buf()
        );
    }
}
