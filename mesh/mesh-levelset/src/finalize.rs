//! Turns raw search records into distances and unit normals.

use mesh_types::{Aabb, Point3};
use rayon::prelude::*;

use crate::candidate::ClosestTriangle;
use crate::surface::{Sidedness, Surface};

/// Distances at or below this are too small to normalize by.
///
/// Scales with the larger of the two inputs' bounding boxes.
pub(crate) fn relative_epsilon(query_bounds: Option<&Aabb>, surface_bounds: Option<&Aabb>) -> f64 {
    let extent = |b: Option<&Aabb>| b.map_or(0.0, Aabb::max_extent);
    f64::EPSILON.sqrt() * extent(query_bounds).max(extent(surface_bounds))
}

/// Finalize every record in place. Returns how many points hit the
/// degenerate sign fallback.
pub(crate) fn finalize_records(
    points: &[Point3<f64>],
    surface: &Surface,
    records: &mut [ClosestTriangle],
    compute_signs: bool,
    epsilon: f64,
    parallel: bool,
) -> u64 {
    let finalize = |(record, point): (&mut ClosestTriangle, &Point3<f64>)| {
        u64::from(finalize_record(record, point, surface, compute_signs, epsilon))
    };
    if parallel {
        records.par_iter_mut().zip(points.par_iter()).map(finalize).sum()
    } else {
        records.iter_mut().zip(points).map(finalize).sum()
    }
}

/// Square-root `phi`, apply the sign and normalize the displacement.
///
/// Returns `true` when the sign test was indeterminate and the record fell
/// back to zero distance with the face normal.
pub(crate) fn finalize_record(
    record: &mut ClosestTriangle,
    point: &Point3<f64>,
    surface: &Surface,
    compute_signs: bool,
    epsilon: f64,
) -> bool {
    record.phi = record.phi.sqrt();
    let Some(t) = record.triangle else {
        record.normal.fill(0.0);
        return false;
    };
    let face_normal = surface.face_normal(t);

    if !compute_signs {
        if record.phi > epsilon {
            record.normal /= record.phi;
        } else if record.normal.dot(&face_normal) >= 0.0 {
            record.normal = face_normal;
        } else {
            record.normal = -face_normal;
        }
        return false;
    }

    match surface.inside_given_closest_point(point, t, &record.weights) {
        Sidedness::Indeterminate => {
            record.phi = 0.0;
            record.normal = face_normal;
            true
        }
        side => {
            if side == Sidedness::Inside {
                record.phi = -record.phi;
            }
            if record.phi.abs() > epsilon {
                record.normal /= record.phi;
            } else {
                record.normal = face_normal;
            }
            false
        }
    }
}
