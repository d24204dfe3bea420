//! Volume, thin-triangle and sharp-vertex checks.

use super::fmt_point;
use crate::analysis::MeshAnalysis;
use crate::outcome::{FailureKind, Offender, ValidationFailure};

/// The mesh must have data and a non-zero computed volume.
///
/// Only an exactly zero volume fails; an inside-out mesh (negative volume)
/// passes here and is caught by the winding check or fixed by the repair.
#[must_use]
pub fn volume(analysis: &MeshAnalysis<'_>, name: &str) -> Option<ValidationFailure> {
    if analysis.mesh().is_empty() {
        return Some(ValidationFailure::new(
            FailureKind::EmptyOrZeroVolume,
            name,
            "no data is on the current mesh",
        ));
    }
    let volume = analysis.volume();
    if volume == 0.0 {
        return Some(ValidationFailure::new(
            FailureKind::EmptyOrZeroVolume,
            name,
            "mesh encloses zero volume",
        ));
    }
    None
}

/// No interior angle may be strictly below `min_angle` (radians).
///
/// Faces and corners are scanned in index order; the first offence is
/// reported with 1-based positions.
#[must_use]
pub fn thin_angles(
    analysis: &MeshAnalysis<'_>,
    name: &str,
    min_angle: f64,
) -> Option<ValidationFailure> {
    let (face, corner, angle) = analysis
        .face_angles()
        .iter()
        .enumerate()
        .flat_map(|(f, angles)| angles.iter().enumerate().map(move |(k, &a)| (f, k, a)))
        .find(|&(_, _, angle)| angle < min_angle)?;

    let degrees = angle.to_degrees();
    Some(
        ValidationFailure::new(
            FailureKind::DegenerateAngle,
            name,
            format!(
                "angle #{} on face #{} too small, rendering too thin ({degrees:.4}°) to be useful",
                corner + 1,
                face + 1
            ),
        )
        .with_offender(Offender::Corner {
            face,
            corner,
            degrees,
        }),
    )
}

/// Collect every vertex with `|defect| < threshold`.
///
/// The comparison flags vertices whose surroundings are close to flat.
#[must_use]
pub fn sharp_vertices(
    analysis: &MeshAnalysis<'_>,
    name: &str,
    threshold: f64,
) -> Option<ValidationFailure> {
    let mesh = analysis.mesh();
    let sharp: Vec<_> = analysis
        .vertex_angle_defects()
        .iter()
        .enumerate()
        .filter(|&(_, defect)| defect.abs() < threshold)
        .map(|(i, _)| (i, mesh.vertices[i].position))
        .collect();

    if sharp.is_empty() {
        return None;
    }

    let listed: Vec<String> = sharp
        .iter()
        .map(|(i, p)| format!("#{i} {}", fmt_point(p)))
        .collect();
    Some(
        ValidationFailure::new(
            FailureKind::AbnormalSharpFeature,
            name,
            format!(
                "sharp jutting detected at these vertices: {}",
                listed.join(", ")
            ),
        )
        .with_offender(Offender::Vertices(sharp)),
    )
}
