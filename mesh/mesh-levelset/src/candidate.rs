//! Per-point closest-triangle record.

use mesh_types::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closest triangle found for one query point.
///
/// During a search `phi` is the best **squared** distance so far and
/// `normal` the raw displacement from the surface point to the query point.
/// After finalization `phi` is the (optionally signed) distance and
/// `normal` a unit direction, or zero when no triangle was found.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClosestTriangle {
    /// Distance (squared while searching).
    pub phi: f64,
    /// Direction away from the surface (raw displacement while searching).
    pub normal: Vector3<f64>,
    /// Owning triangle, `None` if nothing lies within the cutoff.
    pub triangle: Option<usize>,
    /// Barycentric weights of the closest point on `triangle`.
    pub weights: Vector3<f64>,
}

impl ClosestTriangle {
    /// A record with nothing found yet, bounded by `sqr_max_distance`.
    #[must_use]
    pub fn unbounded(sqr_max_distance: f64) -> Self {
        Self {
            phi: sqr_max_distance,
            normal: Vector3::zeros(),
            triangle: None,
            weights: Vector3::zeros(),
        }
    }

    /// Replace this candidate if `sqr_distance` is strictly closer.
    ///
    /// Returns whether the record changed. `phi` never increases.
    pub fn offer(
        &mut self,
        sqr_distance: f64,
        delta: Vector3<f64>,
        triangle: usize,
        weights: Vector3<f64>,
    ) -> bool {
        if sqr_distance < self.phi {
            *self = Self {
                phi: sqr_distance,
                normal: delta,
                triangle: Some(triangle),
                weights,
            };
            true
        } else {
            false
        }
    }

    /// Whether a triangle was found within the cutoff.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.triangle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_only_improves() {
        let mut rec = ClosestTriangle::unbounded(4.0);
        assert!(!rec.is_found());

        assert!(!rec.offer(5.0, Vector3::x(), 0, Vector3::x()));
        assert!(!rec.is_found());

        assert!(rec.offer(1.0, Vector3::y(), 3, Vector3::z()));
        assert_eq!(rec.triangle, Some(3));

        // Ties keep the first candidate
        assert!(!rec.offer(1.0, Vector3::x(), 7, Vector3::x()));
        assert_eq!(rec.triangle, Some(3));
        assert_eq!(rec.normal, Vector3::y());
    }

    #[test]
    fn nan_distance_is_ignored() {
        let mut rec = ClosestTriangle::unbounded(f64::INFINITY);
        assert!(!rec.offer(f64::NAN, Vector3::x(), 0, Vector3::x()));
        assert!(!rec.is_found());
    }
}
