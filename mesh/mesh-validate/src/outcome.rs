//! Validation outcomes: checks, failure kinds, offenders and reports.

use mesh_repair::WatertightRepair;
use mesh_types::Point3;

/// The checks of the pipeline, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Check {
    /// Mesh has data and non-zero enclosed volume.
    Volume,
    /// Every face has three manifold edges.
    EdgeManifold,
    /// Every vertex has at least three incident edges.
    VertexManifold,
    /// Mesh is closed, after at most one repair.
    Watertight,
    /// No triangle angle below the minimum.
    ThinAngle,
    /// No vertex with an abnormal angle defect.
    SharpVertex,
    /// Adjacent faces agree on winding.
    Winding,
}

impl Check {
    /// All checks in pipeline order.
    pub const ALL: [Self; 7] = [
        Self::Volume,
        Self::EdgeManifold,
        Self::VertexManifold,
        Self::Watertight,
        Self::ThinAngle,
        Self::SharpVertex,
        Self::Winding,
    ];

    /// Short machine-friendly name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::EdgeManifold => "edge_manifold",
            Self::VertexManifold => "vertex_manifold",
            Self::Watertight => "watertight",
            Self::ThinAngle => "thin_angle",
            Self::SharpVertex => "sharp_vertex",
            Self::Winding => "winding",
        }
    }

    /// What the check verifies, for progress output.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Volume => "volume is defined and positive",
            Self::EdgeManifold => "edges are manifold",
            Self::VertexManifold => "vertices are manifold",
            Self::Watertight => "shape is watertight (no holes)",
            Self::ThinAngle => "no triangle is too thin",
            Self::SharpVertex => "no abnormal sharp points",
            Self::Winding => "winding is consistent",
        }
    }

    /// Whether the check always runs.
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            Self::Volume | Self::EdgeManifold | Self::VertexManifold | Self::Watertight
        )
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Face indices or coordinates are invalid; no check ran.
    MalformedInput,
    /// Mesh has no faces, no vertices, or zero volume.
    EmptyOrZeroVolume,
    /// A face has an edge not shared by exactly two faces.
    NonManifoldEdge,
    /// A vertex has fewer than three incident edges.
    NonManifoldVertex,
    /// Mesh is still open after the repair attempt.
    UnrepairableHoles,
    /// A triangle angle is below the minimum.
    DegenerateAngle,
    /// One or more vertices have an abnormal angle defect.
    AbnormalSharpFeature,
    /// Adjacent faces disagree on winding.
    InconsistentWinding,
}

impl FailureKind {
    /// Get a human-readable name for the failure kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "Malformed Input",
            Self::EmptyOrZeroVolume => "Empty Or Zero Volume",
            Self::NonManifoldEdge => "Non-Manifold Edge",
            Self::NonManifoldVertex => "Non-Manifold Vertex",
            Self::UnrepairableHoles => "Unrepairable Holes",
            Self::DegenerateAngle => "Degenerate Angle",
            Self::AbnormalSharpFeature => "Abnormal Sharp Feature",
            Self::InconsistentWinding => "Inconsistent Winding",
        }
    }

    /// Stable snake_case identifier, for machine-readable reports.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed_input",
            Self::EmptyOrZeroVolume => "empty_or_zero_volume",
            Self::NonManifoldEdge => "non_manifold_edge",
            Self::NonManifoldVertex => "non_manifold_vertex",
            Self::UnrepairableHoles => "unrepairable_holes",
            Self::DegenerateAngle => "degenerate_angle",
            Self::AbnormalSharpFeature => "abnormal_sharp_feature",
            Self::InconsistentWinding => "inconsistent_winding",
        }
    }

    /// The check that produces this kind, if any.
    #[must_use]
    pub fn check(&self) -> Option<Check> {
        match self {
            Self::MalformedInput => None,
            Self::EmptyOrZeroVolume => Some(Check::Volume),
            Self::NonManifoldEdge => Some(Check::EdgeManifold),
            Self::NonManifoldVertex => Some(Check::VertexManifold),
            Self::UnrepairableHoles => Some(Check::Watertight),
            Self::DegenerateAngle => Some(Check::ThinAngle),
            Self::AbnormalSharpFeature => Some(Check::SharpVertex),
            Self::InconsistentWinding => Some(Check::Winding),
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mesh element a failure points at.
#[derive(Debug, Clone, PartialEq)]
pub enum Offender {
    /// The mesh as a whole.
    Mesh,
    /// A single face.
    Face {
        /// Face index.
        index: usize,
        /// The face's vertex indices.
        vertices: [u32; 3],
    },
    /// One corner of a face.
    Corner {
        /// Face index.
        face: usize,
        /// Corner position within the face (0..3).
        corner: usize,
        /// Interior angle at the corner, in degrees.
        degrees: f64,
    },
    /// A single vertex.
    Vertex {
        /// Vertex index.
        index: usize,
        /// Vertex coordinates.
        position: Point3<f64>,
    },
    /// A set of vertices, as (index, coordinates) pairs.
    Vertices(Vec<(usize, Point3<f64>)>),
}

impl Offender {
    /// Face indices named by the offender.
    #[must_use]
    pub fn faces(&self) -> Vec<usize> {
        match self {
            Self::Face { index, .. } => vec![*index],
            Self::Corner { face, .. } => vec![*face],
            Self::Mesh | Self::Vertex { .. } | Self::Vertices(_) => Vec::new(),
        }
    }

    /// Vertex indices named by the offender.
    #[must_use]
    pub fn vertices(&self) -> Vec<usize> {
        match self {
            Self::Vertex { index, .. } => vec![*index],
            Self::Vertices(list) => list.iter().map(|(i, _)| *i).collect(),
            Self::Mesh | Self::Face { .. } | Self::Corner { .. } => Vec::new(),
        }
    }
}

/// A failed check, with enough detail to locate the problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Identity of the mesh (usually its file name).
    pub mesh: String,
    /// Human-readable description naming the offending elements.
    pub message: String,
    /// Offending element(s).
    pub offender: Offender,
}

impl ValidationFailure {
    /// Create a failure pointing at the whole mesh.
    #[must_use]
    pub fn new(kind: FailureKind, mesh: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            mesh: mesh.into(),
            message: message.into(),
            offender: Offender::Mesh,
        }
    }

    /// Set the offending element(s).
    #[must_use]
    pub fn with_offender(mut self, offender: Offender) -> Self {
        self.offender = offender;
        self
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.mesh, self.kind, self.message)
    }
}

/// Outcome of validating one mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Every enabled check passed.
    Pass,
    /// The first failing check.
    Fail(ValidationFailure),
}

impl ValidationResult {
    /// Check if the mesh passed.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// The failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Pass => None,
            Self::Fail(failure) => Some(failure),
        }
    }

    /// The failure kind, if any.
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        self.failure().map(|f| f.kind)
    }
}

/// Full record of one validation run.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Identity of the mesh.
    pub mesh: String,
    /// Pass or the first failure.
    pub result: ValidationResult,
    /// Checks that completed successfully, in order.
    pub checks: Vec<Check>,
    /// Summary of the watertight repair, when one was attempted.
    pub repair: Option<WatertightRepair>,
}

impl ValidationReport {
    pub(crate) fn new(mesh: impl Into<String>) -> Self {
        Self {
            mesh: mesh.into(),
            result: ValidationResult::Pass,
            checks: Vec::new(),
            repair: None,
        }
    }

    /// Check if the mesh passed.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.result.is_pass()
    }

    /// Whether the mesh was modified by a repair.
    #[must_use]
    pub fn was_repaired(&self) -> bool {
        self.repair
            .as_ref()
            .is_some_and(|r| r.faces_added > 0 || r.faces_flipped > 0)
    }

    /// Get a summary of the validation result.
    #[must_use]
    pub fn summary(&self) -> String {
        match &self.result {
            ValidationResult::Pass if self.was_repaired() => {
                format!("{} all good (repaired)", self.mesh)
            }
            ValidationResult::Pass => format!("{} all good", self.mesh),
            ValidationResult::Fail(failure) => failure.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_order_and_kinds_line_up() {
        let mut sorted = Check::ALL;
        sorted.sort();
        assert_eq!(sorted, Check::ALL);

        assert_eq!(
            FailureKind::InconsistentWinding.check(),
            Some(Check::Winding)
        );
        assert!(FailureKind::MalformedInput.check().is_none());
        assert_eq!(Check::ALL.iter().filter(|c| c.is_mandatory()).count(), 4);
        assert_eq!(FailureKind::NonManifoldEdge.code(), "non_manifold_edge");
        assert_eq!(FailureKind::NonManifoldEdge.as_str(), "Non-Manifold Edge");
    }

    #[test]
    fn offender_elements() {
        let corner = Offender::Corner {
            face: 4,
            corner: 1,
            degrees: 1.0,
        };
        assert_eq!(corner.faces(), vec![4]);
        assert!(corner.vertices().is_empty());

        let set = Offender::Vertices(vec![(2, Point3::origin()), (7, Point3::origin())]);
        assert_eq!(set.vertices(), vec![2, 7]);
        assert!(Offender::Mesh.faces().is_empty());
    }

    #[test]
    fn failure_display() {
        let failure = ValidationFailure::new(
            FailureKind::EmptyOrZeroVolume,
            "part.stl",
            "no data is on the current mesh",
        );
        assert_eq!(
            failure.to_string(),
            "part.stl [Empty Or Zero Volume]: no data is on the current mesh"
        );
        assert_eq!(failure.offender, Offender::Mesh);
    }

    #[test]
    fn report_summary() {
        let mut report = ValidationReport::new("cube.stl");
        assert_eq!(report.summary(), "cube.stl all good");

        report.repair = Some(WatertightRepair {
            faces_added: 1,
            ..WatertightRepair::default()
        });
        assert!(report.was_repaired());
        assert_eq!(report.summary(), "cube.stl all good (repaired)");

        report.result = ValidationResult::Fail(ValidationFailure::new(
            FailureKind::UnrepairableHoles,
            "cube.stl",
            "holes detected, unable to fix",
        ));
        assert!(!report.is_pass());
        assert_eq!(report.result.kind(), Some(FailureKind::UnrepairableHoles));
    }
}
