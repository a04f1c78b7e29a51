//! Triangle type and point projection.

use nalgebra::{Point3, Vector3};

use crate::Aabb;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Winding is **counter-clockwise (CCW) when viewed from the front**
/// (normal points toward viewer).
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// let normal = tri.normal().unwrap();
/// assert!((normal.z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

/// Result of projecting a point onto a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClosestPoint {
    /// Closest point on the triangle.
    pub point: Point3<f64>,
    /// Barycentric weights of `point` with respect to `(v0, v1, v2)`.
    ///
    /// Weights on a vertex or edge region are exact: the weights of the
    /// vertices not spanning that feature are `0.0`.
    pub weights: Vector3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// The three vertices in winding order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Compute the (unnormalized) face normal via cross product.
    ///
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Compute the unit face normal.
    ///
    /// Returns `None` for degenerate triangles (zero area).
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.normal_unnormalized().try_normalize(f64::MIN_POSITIVE)
    }

    /// Bounding box of the three vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices().iter())
    }

    /// Closest point on the triangle to `point`, with barycentric weights.
    ///
    /// Voronoi-region walk from "Real-Time Collision Detection" (Ericson):
    /// vertex regions first, then edge regions, then the face interior.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// );
    ///
    /// let close = tri.closest_point(&Point3::new(-1.0, -1.0, 0.0));
    /// assert_eq!(close.point, tri.v0);
    /// assert_eq!(close.weights.x, 1.0);
    /// ```
    #[must_use]
    pub fn closest_point(&self, point: &Point3<f64>) -> ClosestPoint {
        let (a, b, c) = (self.v0, self.v1, self.v2);
        let ab = b - a;
        let ac = c - a;

        let ap = point - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return ClosestPoint::at(a, Vector3::x());
        }

        let bp = point - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return ClosestPoint::at(b, Vector3::y());
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 && d1 > d3 {
            let v = d1 / (d1 - d3);
            return ClosestPoint::at(a + ab * v, Vector3::new(1.0 - v, v, 0.0));
        }

        let cp = point - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return ClosestPoint::at(c, Vector3::z());
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 && d2 > d6 {
            let w = d2 / (d2 - d6);
            return ClosestPoint::at(a + ac * w, Vector3::new(1.0 - w, 0.0, w));
        }

        let va = d3 * d6 - d5 * d4;
        let (e4, e5) = (d4 - d3, d5 - d6);
        if va <= 0.0 && e4 >= 0.0 && e5 >= 0.0 && e4 + e5 > 0.0 {
            let w = e4 / (e4 + e5);
            return ClosestPoint::at(b + (c - b) * w, Vector3::new(0.0, 1.0 - w, w));
        }

        let sum = va + vb + vc;
        if sum <= 0.0 {
            return self.closest_on_edges(point);
        }
        let denom = 1.0 / sum;
        let v = vb * denom;
        let w = vc * denom;
        ClosestPoint::at(a + ab * v + ac * w, Vector3::new(1.0 - v - w, v, w))
    }

    /// Best projection onto the three edges. Only reached for flat triangles.
    fn closest_on_edges(&self, point: &Point3<f64>) -> ClosestPoint {
        let (a, b, c) = (self.v0, self.v1, self.v2);
        [
            (a, b, [0, 1]),
            (b, c, [1, 2]),
            (c, a, [2, 0]),
        ]
        .into_iter()
        .map(|(p, q, [i, j])| {
            let pq = q - p;
            let len_sq = pq.norm_squared();
            let s = if len_sq > 0.0 {
                ((point - p).dot(&pq) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut weights = Vector3::zeros();
            weights[i] = 1.0 - s;
            weights[j] = s;
            ClosestPoint::at(p + pq * s, weights)
        })
        .min_by(|x, y| {
            let dx = (point - x.point).norm_squared();
            let dy = (point - y.point).norm_squared();
            dx.total_cmp(&dy)
        })
        .unwrap_or_else(|| ClosestPoint::at(a, Vector3::x()))
    }
}

impl ClosestPoint {
    const fn at(point: Point3<f64>, weights: Vector3<f64>) -> Self {
        Self { point, weights }
    }
}
