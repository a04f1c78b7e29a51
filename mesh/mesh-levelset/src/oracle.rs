//! Exhaustive reference search.
//!
//! Checks every point against every triangle. Only meant for validating
//! the dual-tree search on small inputs.

use mesh_types::{Point3, Vector3};
use rayon::prelude::*;

use crate::candidate::ClosestTriangle;
use crate::surface::Surface;

/// Unsigned closest-triangle records by exhaustive search.
///
/// Distances are unsigned and there is no cutoff. The direction is the
/// normalized displacement from the surface, or `+x` when the point lies
/// exactly on the surface. An empty surface leaves every record at
/// infinite distance with no triangle.
///
/// # Example
///
/// ```
/// use mesh_levelset::{Surface, oracle::brute_force_levelset};
/// use mesh_types::{Point3, unit_cube};
///
/// let surface = Surface::from_mesh(&unit_cube()).unwrap();
/// let records = brute_force_levelset(&[Point3::new(0.5, 0.5, 2.0)], &surface);
///
/// assert!((records[0].phi - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn brute_force_levelset(points: &[Point3<f64>], surface: &Surface) -> Vec<ClosestTriangle> {
    points
        .par_iter()
        .map(|x| {
            let mut record = ClosestTriangle::unbounded(f64::INFINITY);
            for t in 0..surface.len() {
                let close = surface.closest_point(t, x);
                let delta = x - close.point;
                record.offer(delta.norm_squared(), delta, t, close.weights);
            }
            if record.is_found() {
                record.phi = record.phi.sqrt();
                record.normal = if record.phi > 0.0 {
                    record.normal / record.phi
                } else {
                    Vector3::x()
                };
            }
            record
        })
        .collect()
}
