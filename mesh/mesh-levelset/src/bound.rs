//! Box-distance lower bounds.
//!
//! Both functions return the smallest squared distance between any point of
//! the first region and any point of the second. They never overestimate,
//! which is what makes pruning on them exact.

use mesh_types::{Aabb, Point3};

/// Lower bound on the squared distance from `point` to anything inside `aabb`.
///
/// # Example
///
/// ```
/// use mesh_levelset::point_box_sqr_distance;
/// use mesh_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
/// assert_eq!(point_box_sqr_distance(&Point3::new(3.0, 0.5, 0.5), &aabb), 4.0);
/// assert_eq!(point_box_sqr_distance(&Point3::new(0.5, 0.5, 0.5), &aabb), 0.0);
/// ```
#[inline]
#[must_use]
pub fn point_box_sqr_distance(point: &Point3<f64>, aabb: &Aabb) -> f64 {
    (point - aabb.clamp(point)).norm_squared()
}

/// Lower bound on the squared distance between anything in `a` and anything in `b`.
///
/// Per axis the gap is the separation between the two intervals, or zero
/// when they overlap.
///
/// # Example
///
/// ```
/// use mesh_levelset::box_box_sqr_distance;
/// use mesh_types::{Aabb, Point3};
///
/// let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
/// let b = Aabb::new(Point3::new(2.0, 3.0, 0.5), Point3::new(4.0, 4.0, 4.0));
/// assert_eq!(box_box_sqr_distance(&a, &b), 1.0 + 4.0);
/// ```
#[inline]
#[must_use]
pub fn box_box_sqr_distance(a: &Aabb, b: &Aabb) -> f64 {
    (0..3)
        .map(|axis| {
            let gap = (b.min[axis] - a.max[axis])
                .max(a.min[axis] - b.max[axis])
                .max(0.0);
            gap * gap
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit() -> Aabb {
        Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn overlapping_boxes_have_zero_bound() {
        let b = Aabb::new(Point3::new(0.5, 0.5, 0.5), Point3::new(2.0, 2.0, 2.0));
        assert_relative_eq!(box_box_sqr_distance(&unit(), &b), 0.0);
        assert_relative_eq!(box_box_sqr_distance(&b, &unit()), 0.0);
    }

    #[test]
    fn corner_gap_sums_axes() {
        let b = Aabb::new(Point3::new(2.0, 3.0, 4.0), Point3::new(5.0, 5.0, 5.0));
        assert_relative_eq!(box_box_sqr_distance(&unit(), &b), 1.0 + 4.0 + 9.0);
        assert_relative_eq!(box_box_sqr_distance(&b, &unit()), 14.0);
    }

    #[test]
    fn degenerate_box_matches_point_bound() {
        let p = Point3::new(-2.0, 0.5, 3.0);
        let as_box = Aabb::from_point(p);
        assert_relative_eq!(
            box_box_sqr_distance(&as_box, &unit()),
            point_box_sqr_distance(&p, &unit())
        );
        assert_relative_eq!(point_box_sqr_distance(&p, &unit()), 4.0 + 4.0);
    }

    #[test]
    fn never_exceeds_corner_pairs() {
        let a = unit();
        let b = Aabb::new(Point3::new(1.5, -0.5, 2.0), Point3::new(3.0, 0.25, 2.5));
        let bound = box_box_sqr_distance(&a, &b);
        for pa in [a.min, a.max, a.center()] {
            for pb in [b.min, b.max, b.center()] {
                assert!(bound <= (pa - pb).norm_squared());
            }
        }
    }
}
