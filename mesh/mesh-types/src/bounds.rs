//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned box used as a bounding volume.
///
/// [`Aabb::empty`] is inverted on every axis, so it is the identity for
/// [`Aabb::union`] and reports [`is_empty`](Aabb::is_empty).
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let bounds = Aabb::new(Point3::new(2.0, -1.0, 0.0), Point3::new(-2.0, 1.0, 3.0));
///
/// assert_eq!(bounds.min, Point3::new(-2.0, -1.0, 0.0));
/// assert!(bounds.contains(&Point3::origin()));
/// assert_eq!(bounds.max_extent(), 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Lower corner.
    pub min: Point3<f64>,
    /// Upper corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from two corners.
    ///
    /// The corners are reordered per axis, so any two opposite corners work.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Create a zero-volume AABB around a single point.
    #[inline]
    #[must_use]
    pub const fn from_point(point: Point3<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Create an empty (inverted) AABB, the identity for [`Aabb::union`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::from(Vector3::repeat(f64::INFINITY)),
            max: Point3::from(Vector3::repeat(f64::NEG_INFINITY)),
        }
    }

    /// Tightest box around `points`, or [`Aabb::empty`] if there are none.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let corners = [Point3::new(1.0, 4.0, -1.0), Point3::new(3.0, 0.0, 2.0)];
    /// let bounds = Aabb::from_points(corners.iter());
    ///
    /// assert_eq!(bounds.size().x, 2.0);
    /// assert!(Aabb::from_points(std::iter::empty()).is_empty());
    /// ```
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        points.fold(Self::empty(), |mut bounds, p| {
            bounds.expand_to_include(p);
            bounds
        })
    }

    /// Whether the box is inverted on some axis.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    /// Dimensions of the box along each axis.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the longest edge, or 0.0 for an empty box.
    #[inline]
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.size().max()
    }

    /// Index of the longest axis (0 = X, 1 = Y, 2 = Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        self.size().imax()
    }

    /// Whether `point` lies in the closed box.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.clamp(point) == *point
    }

    /// Closest point of the box to `point`.
    ///
    /// Points inside the box are returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    /// let clamped = aabb.clamp(&Point3::new(2.0, 0.5, -1.0));
    /// assert_eq!(clamped, Point3::new(1.0, 0.5, 0.0));
    /// ```
    #[inline]
    #[must_use]
    pub fn clamp(&self, point: &Point3<f64>) -> Point3<f64> {
        point.sup(&self.min).inf(&self.max)
    }

    /// Smallest AABB enclosing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Grow the box in place so it contains `point`.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
