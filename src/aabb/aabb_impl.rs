use std::fmt;

use crate::axis::Axis;
use crate::{Point3, Real, Vector3};

/// An axis-aligned bounding box given by its minimum and maximum corners.
///
/// A freshly created [`Aabb::empty`] has `min = +inf` and `max = -inf` so that the first
/// call to [`Aabb::expand_by_point`] or [`Aabb::expand_by`] turns it into a proper box.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum coordinates
    pub min: Point3,

    /// Maximum coordinates
    pub max: Point3,
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Min bound: {}; Max bound: {}", self.min, self.max)
    }
}

impl Default for Aabb {
    fn default() -> Aabb {
        Aabb::empty()
    }
}

impl Aabb {
    /// Creates a new [`Aabb`] with the given bounds.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::aabb::Aabb;
    /// use octree_accel::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0,-1.0,-1.0), Point3::new(1.0,1.0,1.0));
    /// assert_eq!(aabb.min.x, -1.0);
    /// assert_eq!(aabb.max.z, 1.0);
    /// ```
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn with_bounds(min: Point3, max: Point3) -> Aabb {
        Aabb { min, max }
    }

    /// Creates a new empty [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use octree_accel::aabb::Aabb;
    ///
    /// let aabb = Aabb::empty();
    /// assert!(aabb.is_empty());
    /// ```
    pub fn empty() -> Aabb {
        Aabb {
            min: Point3::new(Real::INFINITY, Real::INFINITY, Real::INFINITY),
            max: Point3::new(Real::NEG_INFINITY, Real::NEG_INFINITY, Real::NEG_INFINITY),
        }
    }

    /// Returns the smallest [`Aabb`] containing every point of `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Aabb {
        points
            .into_iter()
            .fold(Aabb::empty(), |aabb, point| aabb.grow(point))
    }

    /// Returns true if the [`Aabb`] contains no point at all, i.e. `min > max` along some axis.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns true if the [`Point3`] is inside the [`Aabb`]. The boundary counts as inside.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::aabb::Aabb;
    /// use octree_accel::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0,-1.0,-1.0), Point3::new(1.0,1.0,1.0));
    /// assert!(aabb.contains(&Point3::new(0.0, 1.0, -1.0)));
    /// assert!(!aabb.contains(&Point3::new(1.1, 0.0, 0.0)));
    /// ```
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns true if `other` lies entirely within this [`Aabb`].
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        self.contains(&other.min) && self.contains(&other.max)
    }

    /// Returns true if the two boxes share at least one point. Touching faces count as
    /// overlapping, so a triangle lying exactly on an octant boundary overlaps both octants.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::aabb::Aabb;
    /// use octree_accel::Point3;
    ///
    /// let a = Aabb::with_bounds(Point3::new(0.0,0.0,0.0), Point3::new(1.0,1.0,1.0));
    /// let b = Aabb::with_bounds(Point3::new(1.0,0.0,0.0), Point3::new(2.0,1.0,1.0));
    /// let c = Aabb::with_bounds(Point3::new(1.5,0.0,0.0), Point3::new(2.0,1.0,1.0));
    /// assert!(a.overlaps(&b));
    /// assert!(!a.overlaps(&c));
    /// ```
    pub fn overlaps(&self, other: &Aabb) -> bool {
        for i in 0..3 {
            if self.max[i] < other.min[i] || other.max[i] < self.min[i] {
                return false;
            }
        }
        true
    }

    /// Enlarges this [`Aabb`] so that it contains `point`.
    pub fn expand_by_point(&mut self, point: &Point3) {
        *self = self.grow(point);
    }

    /// Enlarges this [`Aabb`] so that it contains `other`.
    pub fn expand_by(&mut self, other: &Aabb) {
        *self = self.join(other);
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and `other`.
    pub fn join(&self, other: &Aabb) -> Aabb {
        Aabb::with_bounds(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and the [`Point3`] `other`.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::aabb::Aabb;
    /// use octree_accel::Point3;
    ///
    /// let aabb = Aabb::empty()
    ///     .grow(&Point3::new(1.0, 2.0, 3.0))
    ///     .grow(&Point3::new(-1.0, 0.0, 4.0));
    /// assert_eq!(aabb.min, Point3::new(-1.0, 0.0, 3.0));
    /// assert_eq!(aabb.max, Point3::new(1.0, 2.0, 4.0));
    /// ```
    pub fn grow(&self, other: &Point3) -> Aabb {
        Aabb::with_bounds(self.min.inf(other), self.max.sup(other))
    }

    /// Returns the size of this [`Aabb`] in all three dimensions.
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Returns the center [`Point3`] of the [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use octree_accel::aabb::Aabb;
    /// use octree_accel::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0,-5.0,0.0), Point3::new(3.0,1.0,8.0));
    /// assert_eq!(aabb.center(), Point3::new(1.0, -2.0, 4.0));
    /// ```
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns one of the eight corners of the [`Aabb`]. Bit `axis as usize` of `index`
    /// selects the maximum along that [`Axis`], a cleared bit selects the minimum.
    /// Corner `0` is `min`, corner `7` is `max`.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::aabb::Aabb;
    /// use octree_accel::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(0.0,0.0,0.0), Point3::new(1.0,2.0,3.0));
    /// assert_eq!(aabb.corner(0), aabb.min);
    /// assert_eq!(aabb.corner(0b001), Point3::new(1.0, 0.0, 0.0));
    /// assert_eq!(aabb.corner(0b110), Point3::new(0.0, 2.0, 3.0));
    /// assert_eq!(aabb.corner(7), aabb.max);
    /// ```
    ///
    /// [`Axis`]: ../axis/enum.Axis.html
    ///
    pub fn corner(&self, index: usize) -> Point3 {
        debug_assert!(index < 8, "an Aabb has 8 corners, got index {}", index);
        let mut corner = self.min;
        for axis in Axis::ALL {
            if axis.is_upper(index) {
                corner[axis] = self.max[axis];
            }
        }
        corner
    }

    /// Returns the box spanned by the center of this [`Aabb`] and its corner `index`.
    /// The eight octants share the center and together cover the whole box.
    pub fn octant(&self, index: usize) -> Aabb {
        let mut octant = Aabb::empty();
        octant.expand_by_point(&self.center());
        octant.expand_by_point(&self.corner(index));
        octant
    }
}
