//! Validation options.
//!
//! Selects which optional checks run and sets their thresholds. Options are
//! immutable for the duration of a run.

use crate::error::{ValidateError, ValidateResult};
use crate::outcome::Check;

/// Configuration for a validation run.
///
/// # Example
///
/// ```
/// use mesh_validate::ValidationOptions;
///
/// let options = ValidationOptions::default()
///     .with_min_triangle_angle_degrees(5.0)
///     .with_sharp_vertex_check(true);
///
/// assert!(options.check().is_ok());
/// assert!(options.enable_sharp_vertex_check);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOptions {
    /// Run the thin-triangle check.
    ///
    /// Default: `true`
    pub enable_thin_angle_check: bool,

    /// Smallest acceptable interior angle, in radians.
    ///
    /// Default: 10°
    pub min_triangle_angle_radians: f64,

    /// Run the sharp-vertex (angle defect) check.
    ///
    /// Default: `false`
    pub enable_sharp_vertex_check: bool,

    /// Vertices with `|defect|` strictly below this value are reported.
    ///
    /// Default: `0.1`
    pub sharp_defect_threshold: f64,

    /// Run the winding-consistency check.
    ///
    /// Default: `true`
    pub enable_winding_check: bool,

    /// Fail faces with boundary edges in the edge-manifold check instead of
    /// leaving them to the watertight repair.
    ///
    /// Default: `false`
    pub strict_edge_manifold: bool,

    /// Largest hole (in boundary edges) the repair will fill.
    ///
    /// Default: `4`
    pub max_hole_edges: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            enable_thin_angle_check: true,
            min_triangle_angle_radians: 10.0_f64.to_radians(),
            enable_sharp_vertex_check: false,
            sharp_defect_threshold: 0.1,
            enable_winding_check: true,
            strict_edge_manifold: false,
            max_hole_edges: 4,
        }
    }
}

impl ValidationOptions {
    /// Only the mandatory checks.
    #[must_use]
    pub fn mandatory_only() -> Self {
        Self {
            enable_thin_angle_check: false,
            enable_sharp_vertex_check: false,
            enable_winding_check: false,
            ..Self::default()
        }
    }

    /// Every optional check enabled, with default thresholds.
    #[must_use]
    pub fn all_checks() -> Self {
        Self {
            enable_thin_angle_check: true,
            enable_sharp_vertex_check: true,
            enable_winding_check: true,
            ..Self::default()
        }
    }

    /// Enable or disable the thin-triangle check.
    #[must_use]
    pub fn with_thin_angle_check(mut self, enable: bool) -> Self {
        self.enable_thin_angle_check = enable;
        self
    }

    /// Set the minimum triangle angle in radians.
    #[must_use]
    pub fn with_min_triangle_angle(mut self, radians: f64) -> Self {
        self.min_triangle_angle_radians = radians;
        self
    }

    /// Set the minimum triangle angle in degrees.
    #[must_use]
    pub fn with_min_triangle_angle_degrees(self, degrees: f64) -> Self {
        self.with_min_triangle_angle(degrees.to_radians())
    }

    /// Enable or disable the sharp-vertex check.
    #[must_use]
    pub fn with_sharp_vertex_check(mut self, enable: bool) -> Self {
        self.enable_sharp_vertex_check = enable;
        self
    }

    /// Set the angle-defect threshold of the sharp-vertex check.
    #[must_use]
    pub fn with_sharp_defect_threshold(mut self, threshold: f64) -> Self {
        self.sharp_defect_threshold = threshold;
        self
    }

    /// Enable or disable the winding-consistency check.
    #[must_use]
    pub fn with_winding_check(mut self, enable: bool) -> Self {
        self.enable_winding_check = enable;
        self
    }

    /// Enable or disable strict edge-manifold checking.
    #[must_use]
    pub fn with_strict_edge_manifold(mut self, strict: bool) -> Self {
        self.strict_edge_manifold = strict;
        self
    }

    /// Set the largest hole the repair will fill.
    #[must_use]
    pub fn with_max_hole_edges(mut self, max_hole_edges: usize) -> Self {
        self.max_hole_edges = max_hole_edges;
        self
    }

    /// Whether `check` runs under these options. Mandatory checks always do.
    #[must_use]
    pub fn is_enabled(&self, check: Check) -> bool {
        match check {
            Check::ThinAngle => self.enable_thin_angle_check,
            Check::SharpVertex => self.enable_sharp_vertex_check,
            Check::Winding => self.enable_winding_check,
            _ => check.is_mandatory(),
        }
    }

    /// Verify thresholds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::InvalidOptions`] for a non-finite or negative
    /// threshold, or a hole limit below 3.
    pub fn check(&self) -> ValidateResult<()> {
        let thresholds = [
            ("min_triangle_angle", self.min_triangle_angle_radians),
            ("sharp_defect_threshold", self.sharp_defect_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidateError::InvalidOptions {
                    message: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        if self.max_hole_edges < 3 {
            return Err(ValidateError::InvalidOptions {
                message: format!(
                    "max_hole_edges must be at least 3, got {}",
                    self.max_hole_edges
                ),
            });
        }
        Ok(())
    }
}
