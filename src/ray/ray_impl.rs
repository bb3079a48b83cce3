//! This module defines a Ray structure and intersection algorithms
//! for axis aligned bounding boxes and triangles.

use crate::aabb::Aabb;
use crate::utils::{fast_max, fast_min};
use crate::{Point3, Real, Vector3, EPSILON};

/// Determinants smaller than this in magnitude mean the ray runs parallel to the triangle.
const PARALLEL_EPSILON: Real = 1e-8;

/// A ray restricted to the parametric interval `[min_t, max_t]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The ray origin.
    pub origin: Point3,

    /// The ray direction. Not necessarily normalized.
    pub direction: Vector3,

    /// Inverse (1/x) ray direction. Cached for use in [`Aabb`] intersections.
    ///
    /// [`Aabb`]: ../aabb/struct.Aabb.html
    ///
    pub inv_direction: Vector3,

    /// Smallest parameter considered part of the ray.
    pub min_t: Real,

    /// Largest parameter considered part of the ray.
    pub max_t: Real,
}

/// A struct which is returned by [`Ray::intersects_triangle()`] on a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter of the intersection point.
    pub distance: Real,

    /// Barycentric weight of the triangle's second vertex.
    pub u: Real,

    /// Barycentric weight of the triangle's third vertex.
    pub v: Real,
}

impl Ray {
    /// Creates a new [`Ray`] from an `origin` and a `direction`, covering `[EPSILON, inf]`.
    /// `direction` is kept as given, so `t` is measured in multiples of its length.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::ray::Ray;
    /// use octree_accel::{Point3, Vector3};
    ///
    /// let origin = Point3::new(0.0,0.0,0.0);
    /// let direction = Vector3::new(1.0,0.0,0.0);
    /// let ray = Ray::new(origin, direction);
    ///
    /// assert_eq!(ray.origin, origin);
    /// assert_eq!(ray.direction, direction);
    /// assert_eq!(ray.max_t, f32::INFINITY);
    /// ```
    ///
    /// [`Ray`]: struct.Ray.html
    ///
    pub fn new(origin: Point3, direction: Vector3) -> Ray {
        Ray::with_bounds(origin, direction, EPSILON, Real::INFINITY)
    }

    /// Creates a new [`Ray`] covering the parametric interval `[min_t, max_t]`.
    pub fn with_bounds(origin: Point3, direction: Vector3, min_t: Real, max_t: Real) -> Ray {
        Ray {
            origin,
            direction,
            inv_direction: direction.map(|x| 1.0 / x),
            min_t,
            max_t,
        }
    }

    /// Creates a shadow [`Ray`] which runs from `from` to `to`, stopping just short of
    /// both end points.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::ray::Ray;
    /// use octree_accel::Point3;
    ///
    /// let ray = Ray::segment(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 4.0));
    /// assert_eq!(ray.at(1.0), Point3::new(0.0, 0.0, 4.0));
    /// assert!(ray.max_t < 1.0);
    /// ```
    pub fn segment(from: Point3, to: Point3) -> Ray {
        Ray::with_bounds(from, to - from, EPSILON, 1.0 - EPSILON)
    }

    /// Returns the point at parameter `t`.
    pub fn at(&self, t: Real) -> Point3 {
        self.origin + self.direction * t
    }

    /// Returns true if `t` lies within `[min_t, max_t]`.
    pub fn contains_t(&self, t: Real) -> bool {
        t >= self.min_t && t <= self.max_t
    }

    /// Tests the intersection of a [`Ray`] with an [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use octree_accel::aabb::Aabb;
    /// use octree_accel::ray::Ray;
    /// use octree_accel::{Point3, Vector3};
    ///
    /// let origin = Point3::new(0.0,0.0,0.0);
    /// let direction = Vector3::new(1.0,0.0,0.0);
    /// let ray = Ray::new(origin, direction);
    ///
    /// let point1 = Point3::new(99.9,-1.0,-1.0);
    /// let point2 = Point3::new(100.1,1.0,1.0);
    /// let aabb = Aabb::with_bounds(point1, point2);
    ///
    /// assert!(ray.intersects_aabb(&aabb));
    /// ```
    ///
    /// [`Ray`]: struct.Ray.html
    /// [`Aabb`]: ../aabb/struct.Aabb.html
    ///
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.intersection_interval(aabb).is_some()
    }

    /// Slab test of the [`Ray`] against an [`Aabb`].
    ///
    /// Returns the entry and exit parameters `(t_near, t_far)` of the infinite line through
    /// the ray, provided that interval is non-empty and overlaps `[min_t, max_t]`. `t_near`
    /// is negative when the origin lies inside the box.
    ///
    /// A direction component of exactly zero never divides: the ray then misses unless its
    /// origin already lies between the two slab planes, and the axis constrains nothing.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::aabb::Aabb;
    /// use octree_accel::ray::Ray;
    /// use octree_accel::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::new(0.0, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0));
    /// let aabb = Aabb::with_bounds(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0));
    ///
    /// assert_eq!(ray.intersection_interval(&aabb), Some((2.0, 3.0)));
    /// ```
    pub fn intersection_interval(&self, aabb: &Aabb) -> Option<(Real, Real)> {
        let mut t_near = Real::NEG_INFINITY;
        let mut t_far = Real::INFINITY;

        for i in 0..3 {
            let origin = self.origin[i];
            let (min, max) = (aabb.min[i], aabb.max[i]);

            if self.direction[i] == 0.0 {
                if origin < min || origin > max {
                    return None;
                }
            } else {
                let t1 = (min - origin) * self.inv_direction[i];
                let t2 = (max - origin) * self.inv_direction[i];
                // Ordered by direction rather than by value, so an empty box stays empty.
                let (t1, t2) = if self.inv_direction[i] < 0.0 {
                    (t2, t1)
                } else {
                    (t1, t2)
                };

                t_near = fast_max(t1, t_near);
                t_far = fast_min(t2, t_far);

                if !(t_near <= t_far) {
                    return None;
                }
            }
        }

        if self.min_t <= t_far && t_near <= self.max_t {
            Some((t_near, t_far))
        } else {
            None
        }
    }

    /// Implementation of the
    /// [Möller-Trumbore triangle/ray intersection algorithm](https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm).
    /// Both faces of the triangle are hit. Returns the ray parameter of the intersection
    /// together with the barycentric `u` and `v` coordinates, if the intersection lies
    /// within `[min_t, max_t]`.
    #[allow(clippy::many_single_char_names)]
    pub fn intersects_triangle(&self, a: &Point3, b: &Point3, c: &Point3) -> Option<TriangleHit> {
        let a_to_b = b - a;
        let a_to_c = c - a;

        // Begin calculating determinant - also used to calculate u parameter
        let u_vec = self.direction.cross(&a_to_c);

        // det = 0 => [dir, a_to_b, a_to_c] not linearly independent
        let det = a_to_b.dot(&u_vec);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;

        // Vector from point a to ray origin
        let a_to_origin = self.origin - a;

        // Test bounds: u < 0 || u > 1 => outside of triangle
        let u = a_to_origin.dot(&u_vec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let v_vec = a_to_origin.cross(&a_to_b);

        // The intersection lies outside of the triangle
        let v = self.direction.dot(&v_vec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let distance = a_to_c.dot(&v_vec) * inv_det;
        if self.contains_t(distance) {
            Some(TriangleHit { distance, u, v })
        } else {
            None
        }
    }
}
