//! The validation orchestrator.
//!
//! Runs the checks in a fixed order, stops at the first failure, attempts the
//! watertight repair once, and highlights the offending elements before a
//! failure is returned.

use std::convert::Infallible;
use std::fmt::Display;

use mesh_repair::{RepairParams, repair_watertight};
use mesh_types::IndexedMesh;
use tracing::{debug, info, warn};

use crate::analysis::{MeshAnalysis, check_input};
use crate::checks;
use crate::error::ValidateResult;
use crate::highlight::{ColorHighlighter, Highlighter};
use crate::options::ValidationOptions;
use crate::outcome::{Check, ValidationFailure, ValidationReport, ValidationResult};

/// Receives the outcome of every mesh in a batch.
pub trait DiagnosticSink {
    /// Record the outcome for the mesh called `name`.
    fn record(&mut self, name: &str, outcome: &ValidateResult<ValidationReport>);

    /// Record a mesh that could not be obtained, e.g. a file that failed to
    /// load. Does nothing by default.
    fn unavailable(&mut self, name: &str, reason: &dyn std::fmt::Display) {
        let _ = (name, reason);
    }
}

impl DiagnosticSink for Vec<(String, ValidateResult<ValidationReport>)> {
    fn record(&mut self, name: &str, outcome: &ValidateResult<ValidationReport>) {
        self.push((name.to_string(), outcome.clone()));
    }
}

/// Counts over a batch of meshes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Meshes seen.
    pub total: usize,
    /// Meshes that passed every enabled check.
    pub passed: usize,
    /// Meshes that failed a check.
    pub failed: usize,
    /// Meshes that could not be loaded or validated at all.
    pub errors: usize,
    /// Meshes modified by the watertight repair (whatever the outcome).
    pub repaired: usize,
}

impl BatchSummary {
    /// Check if every mesh passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Count one outcome.
    pub fn tally(&mut self, outcome: &ValidateResult<ValidationReport>) {
        self.total += 1;
        match outcome {
            Ok(report) => {
                if report.is_pass() {
                    self.passed += 1;
                } else {
                    self.failed += 1;
                }
                if report.was_repaired() {
                    self.repaired += 1;
                }
            }
            Err(_) => self.errors += 1,
        }
    }

    /// Count a mesh that could not be obtained as an error.
    pub fn tally_unavailable(&mut self) {
        self.total += 1;
        self.errors += 1;
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} meshes: {} passed, {} failed, {} errors ({} repaired)",
            self.total, self.passed, self.failed, self.errors, self.repaired
        )
    }
}

/// Validates meshes against a fixed set of options.
///
/// Check order: volume, edge-manifold, vertex-manifold, watertight (with one
/// repair attempt), then the enabled optional checks: thin-angle,
/// sharp-vertex, winding.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
/// use mesh_validate::{SurfaceValidator, ValidationOptions};
///
/// let mut validator = SurfaceValidator::new(ValidationOptions::all_checks()).unwrap();
/// let mut cube = unit_cube();
///
/// let report = validator.validate("cube", &mut cube).unwrap();
/// assert!(report.is_pass());
/// assert_eq!(report.checks.len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct SurfaceValidator<H: Highlighter = ColorHighlighter> {
    options: ValidationOptions,
    highlighter: H,
    verbose: bool,
}

impl SurfaceValidator<ColorHighlighter> {
    /// Create a validator that colors offending elements red.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::InvalidOptions`](crate::ValidateError::InvalidOptions)
    /// if the options fail [`ValidationOptions::check`].
    pub fn new(options: ValidationOptions) -> ValidateResult<Self> {
        Self::with_highlighter(options, ColorHighlighter::default())
    }
}

impl<H: Highlighter> SurfaceValidator<H> {
    /// Create a validator with a custom highlighter.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::InvalidOptions`](crate::ValidateError::InvalidOptions)
    /// if the options fail [`ValidationOptions::check`].
    pub fn with_highlighter(options: ValidationOptions, highlighter: H) -> ValidateResult<Self> {
        options.check()?;
        Ok(Self {
            options,
            highlighter,
            verbose: false,
        })
    }

    /// Log every check transition at `info` instead of `debug`.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// The highlighter in use.
    #[must_use]
    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    /// Validate one mesh.
    ///
    /// The mesh is only modified by the watertight repair and by highlighting
    /// the elements of a failure.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedInput` error if a face index is out of range or
    /// repeated, or a coordinate is not finite. No check runs in that case.
    pub fn validate(
        &mut self,
        name: &str,
        mesh: &mut IndexedMesh,
    ) -> ValidateResult<ValidationReport> {
        check_input(mesh)?;

        let mut report = ValidationReport::new(name);
        match self.run_checks(name, mesh, &mut report) {
            Ok(()) => {
                if self.verbose {
                    info!("{}", report.summary());
                } else {
                    debug!("{}", report.summary());
                }
            }
            Err(failure) => {
                self.highlighter.highlight(mesh, &failure.offender);
                warn!("{failure}");
                report.result = ValidationResult::Fail(failure);
            }
        }
        Ok(report)
    }

    /// Validate every mesh in turn, handing each outcome to `sink`.
    ///
    /// A failure or error on one mesh never stops the others.
    pub fn validate_batch<I, N, S>(&mut self, meshes: I, sink: &mut S) -> BatchSummary
    where
        I: IntoIterator<Item = (N, IndexedMesh)>,
        N: AsRef<str>,
        S: DiagnosticSink + ?Sized,
    {
        let sources = meshes
            .into_iter()
            .map(|(name, mesh)| (name, Ok::<_, Infallible>(mesh)));
        self.validate_sources(sources, sink)
    }

    /// Like [`validate_batch`](Self::validate_batch), for meshes that may
    /// have failed to load.
    ///
    /// Sources are consumed in order. An `Err` source is handed to
    /// [`DiagnosticSink::unavailable`] and counted as an error, in its place
    /// in the sequence.
    pub fn validate_sources<I, N, E, S>(&mut self, sources: I, sink: &mut S) -> BatchSummary
    where
        I: IntoIterator<Item = (N, Result<IndexedMesh, E>)>,
        N: AsRef<str>,
        E: Display,
        S: DiagnosticSink + ?Sized,
    {
        let mut summary = BatchSummary::default();
        for (name, source) in sources {
            let name = name.as_ref();
            if self.verbose {
                info!("Starting with {name}");
            }
            let mut mesh = match source {
                Ok(mesh) => mesh,
                Err(err) => {
                    warn!("{name}: cannot load: {err}");
                    summary.tally_unavailable();
                    sink.unavailable(name, &err);
                    continue;
                }
            };
            let outcome = self.validate(name, &mut mesh);
            if let Err(err) = &outcome {
                warn!("{name}: cannot validate: {err}");
            }
            summary.tally(&outcome);
            sink.record(name, &outcome);
        }
        info!("{summary}");
        summary
    }

    fn run_checks(
        &self,
        name: &str,
        mesh: &mut IndexedMesh,
        report: &mut ValidationReport,
    ) -> Result<(), ValidationFailure> {
        let options = &self.options;

        let watertight = {
            let analysis = MeshAnalysis::new(mesh);
            self.step(name, Check::Volume, report, || {
                checks::volume(&analysis, name)
            })?;
            self.step(name, Check::EdgeManifold, report, || {
                checks::edge_manifold(&analysis, name, options.strict_edge_manifold)
            })?;
            self.step(name, Check::VertexManifold, report, || {
                checks::vertex_manifold(&analysis, name)
            })?;
            analysis.is_watertight()
        };

        if watertight {
            self.step(name, Check::Watertight, report, || None)?;
        } else {
            self.announce(name, Check::Watertight);
            self.repair(name, mesh, report)?;
        }

        let analysis = MeshAnalysis::new(mesh);
        if options.is_enabled(Check::ThinAngle) {
            self.step(name, Check::ThinAngle, report, || {
                checks::thin_angles(&analysis, name, options.min_triangle_angle_radians)
            })?;
        }
        if options.is_enabled(Check::SharpVertex) {
            self.step(name, Check::SharpVertex, report, || {
                checks::sharp_vertices(&analysis, name, options.sharp_defect_threshold)
            })?;
        }
        if options.is_enabled(Check::Winding) {
            self.step(name, Check::Winding, report, || checks::winding(&analysis, name))?;
        }
        Ok(())
    }

    /// Run the single watertight repair attempt and re-verify.
    fn repair(
        &self,
        name: &str,
        mesh: &mut IndexedMesh,
        report: &mut ValidationReport,
    ) -> Result<(), ValidationFailure> {
        if self.verbose {
            info!("{name}: holes detected, attempting to fix");
        }
        let params = RepairParams::default().with_max_hole_edges(self.options.max_hole_edges);
        report.repair = match repair_watertight(mesh, &params) {
            Ok(summary) => Some(summary),
            Err(err) => {
                warn!("{name}: repair failed: {err}");
                None
            }
        };

        let fixed = report.repair.as_ref().is_some_and(|r| r.is_watertight);
        if !fixed {
            return Err(checks::unrepairable_holes(name, report.repair.as_ref()));
        }
        if self.verbose {
            info!("{name}: holes fixed");
        }
        self.passed(name, Check::Watertight, report);
        Ok(())
    }

    fn step(
        &self,
        name: &str,
        check: Check,
        report: &mut ValidationReport,
        run: impl FnOnce() -> Option<ValidationFailure>,
    ) -> Result<(), ValidationFailure> {
        self.announce(name, check);
        match run() {
            Some(failure) => Err(failure),
            None => {
                self.passed(name, check, report);
                Ok(())
            }
        }
    }

    fn announce(&self, name: &str, check: Check) {
        if self.verbose {
            info!("{name}: checking if {} ...", check.description());
        } else {
            debug!("{name}: checking if {} ...", check.description());
        }
    }

    fn passed(&self, name: &str, check: Check, report: &mut ValidationReport) {
        if self.verbose {
            info!("{name}: {check} check completed");
        } else {
            debug!("{name}: {check} check completed");
        }
        report.checks.push(check);
    }
}
