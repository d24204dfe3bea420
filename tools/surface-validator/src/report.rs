//! Per-mesh outcome records and the JSON report.

use std::path::Path;

use anyhow::{Context, Result};
use mesh_validate::{
    DiagnosticSink, ValidateResult, ValidationReport, ValidationResult, WatertightRepair,
};
use serde::Serialize;
use tracing::info;

/// Outcome of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Every enabled check passed.
    Pass,
    /// A check failed.
    Fail,
    /// The file could not be loaded or validated.
    Error,
}

/// Repair counters worth reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairRecord {
    /// Holes triangulated.
    pub holes_filled: usize,
    /// Faces appended.
    pub faces_added: usize,
    /// Faces whose winding was reversed.
    pub faces_flipped: usize,
    /// Boundary edges left open.
    pub boundary_edges: usize,
    /// Edges left with more than two faces.
    pub non_manifold_edges: usize,
    /// Whether the mesh ended up watertight.
    pub is_watertight: bool,
}

impl From<&WatertightRepair> for RepairRecord {
    fn from(repair: &WatertightRepair) -> Self {
        Self {
            holes_filled: repair.holes_filled,
            faces_added: repair.faces_added,
            faces_flipped: repair.faces_flipped,
            boundary_edges: repair.boundary_edges,
            non_manifold_edges: repair.non_manifold_edges,
            is_watertight: repair.is_watertight,
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshRecord {
    /// File name.
    pub name: String,
    /// Pass, fail or error.
    pub status: Status,
    /// Failure kind, or `load_error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Failure or error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Checks that completed, in order.
    pub checks: Vec<&'static str>,
    /// Repair summary, when a repair was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair: Option<RepairRecord>,
    /// Offending face indices.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<usize>,
    /// Offending vertex indices.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<usize>,
}

impl MeshRecord {
    fn error(name: &str, kind: &'static str, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: Status::Error,
            kind: Some(kind),
            message: Some(message),
            checks: Vec::new(),
            repair: None,
            faces: Vec::new(),
            vertices: Vec::new(),
        }
    }

    fn from_outcome(name: &str, outcome: &ValidateResult<ValidationReport>) -> Self {
        let report = match outcome {
            Ok(report) => report,
            Err(err) => return Self::error(name, err.code(), err.to_string()),
        };

        let mut record = Self {
            name: name.to_string(),
            status: Status::Pass,
            kind: None,
            message: None,
            checks: report.checks.iter().map(|c| c.as_str()).collect(),
            repair: report.repair.as_ref().map(RepairRecord::from),
            faces: Vec::new(),
            vertices: Vec::new(),
        };
        if let ValidationResult::Fail(failure) = &report.result {
            record.status = Status::Fail;
            record.kind = Some(failure.kind.code());
            record.message = Some(failure.message.clone());
            record.faces = failure.offender.faces();
            record.vertices = failure.offender.vertices();
        }
        record
    }
}

/// Totals in the report header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Files seen.
    pub total: usize,
    /// Files that passed.
    pub passed: usize,
    /// Files that failed a check.
    pub failed: usize,
    /// Files that could not be loaded or validated.
    pub errors: usize,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    #[serde(flatten)]
    totals: Totals,
    meshes: &'a [MeshRecord],
}

/// Logs every outcome and collects a record for the JSON report.
#[derive(Debug, Default)]
pub struct Reporter {
    records: Vec<MeshRecord>,
}

impl Reporter {
    /// Create an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records so far, in the order received.
    #[cfg(test)]
    #[must_use]
    pub fn records(&self) -> &[MeshRecord] {
        &self.records
    }

    /// Counts by status.
    #[must_use]
    pub fn totals(&self) -> Totals {
        let mut totals = Totals {
            total: self.records.len(),
            ..Totals::default()
        };
        for record in &self.records {
            match record.status {
                Status::Pass => totals.passed += 1,
                Status::Fail => totals.failed += 1,
                Status::Error => totals.errors += 1,
            }
        }
        totals
    }

    /// Render the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let report = ReportJson {
            totals: self.totals(),
            meshes: &self.records,
        };
        serde_json::to_string_pretty(&report).context("failed to serialize report")
    }

    /// Write the JSON report to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized or written.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!("report written to {}", path.display());
        Ok(())
    }
}

impl DiagnosticSink for Reporter {
    fn record(&mut self, name: &str, outcome: &ValidateResult<ValidationReport>) {
        let record = MeshRecord::from_outcome(name, outcome);
        match (&record.status, &record.kind) {
            (Status::Pass, _) => info!("{name}: passed"),
            (_, Some(kind)) => info!("{name}: {kind}"),
            (_, None) => {}
        }
        self.records.push(record);
    }

    fn unavailable(&mut self, name: &str, reason: &dyn std::fmt::Display) {
        info!("{name}: load_error");
        self.records
            .push(MeshRecord::error(name, "load_error", reason.to_string()));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mesh_io::IoError;
    use mesh_types::{IndexedMesh, unit_cube};
    use mesh_validate::{SurfaceValidator, ValidationOptions};

    fn run(meshes: Vec<(&str, IndexedMesh)>) -> Reporter {
        let mut validator = SurfaceValidator::new(ValidationOptions::all_checks()).unwrap();
        let mut reporter = Reporter::new();
        validator.validate_batch(meshes, &mut reporter);
        reporter
    }

    #[test]
    fn records_pass_fail_and_error() {
        let mut open = unit_cube();
        open.faces.remove(4);
        let mut malformed = unit_cube();
        malformed.faces[0] = [0, 0, 1];

        let mut reporter = run(vec![
            ("cube.stl", unit_cube()),
            ("empty.stl", IndexedMesh::new()),
            ("open.stl", open),
            ("bad.stl", malformed),
        ]);
        reporter.unavailable(
            "broken.obj",
            &IoError::UnsupportedPolygon {
                line: 9,
                vertices: 4,
            },
        );

        let statuses: Vec<_> = reporter.records().iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            [
                Status::Pass,
                Status::Fail,
                Status::Pass,
                Status::Error,
                Status::Error
            ]
        );
        assert_eq!(
            reporter.totals(),
            Totals {
                total: 5,
                passed: 2,
                failed: 1,
                errors: 2
            }
        );

        let records = reporter.records();
        assert_eq!(records[0].checks.len(), 7);
        assert_eq!(records[1].kind, Some("empty_or_zero_volume"));
        assert_eq!(records[2].repair.as_ref().map(|r| r.faces_added), Some(1));
        assert_eq!(records[3].kind, Some("malformed_input"));
        assert_eq!(records[4].kind, Some("load_error"));
    }

    #[test]
    fn json_shape() {
        let mut fin = unit_cube();
        fin.vertices.push(mesh_types::Vertex::from_coords(0.5, 0.5, -1.0));
        fin.faces.push([0, 1, 8]);

        let reporter = run(vec![("fin.stl", fin)]);
        let json: serde_json::Value = serde_json::from_str(&reporter.to_json().unwrap()).unwrap();

        assert_eq!(json["total"], 1);
        assert_eq!(json["failed"], 1);
        let mesh = &json["meshes"][0];
        assert_eq!(mesh["name"], "fin.stl");
        assert_eq!(mesh["status"], "fail");
        assert_eq!(mesh["kind"], "non_manifold_edge");
        assert_eq!(mesh["checks"], serde_json::json!(["volume"]));
        assert!(mesh["faces"].as_array().is_some_and(|f| f.len() == 1));
        assert!(mesh.get("repair").is_none());
    }

    #[test]
    fn report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let reporter = run(vec![("cube.stl", unit_cube())]);
        reporter.write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"status\": \"pass\""));
        assert_eq!(reporter.totals().passed, 1);
    }
}
