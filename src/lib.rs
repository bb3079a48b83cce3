//! A crate which exports rays, axis-aligned bounding boxes, triangle meshes and an
//! octree accelerator answering ray/scene intersection queries.
//!
//! ## About
//!
//! An offline renderer spends most of its time asking a single question: does this ray
//! hit any surface, and if so, which point, which surface and what local frame? This crate
//! answers it for scenes made of triangle meshes. All triangles of a scene are referenced
//! from a fixed-depth octree whose leaves hold at most a handful of triangles. Triangles that
//! straddle an octant boundary are referenced from every octant they overlap.
//!
//! The tree is built once and is immutable afterwards, so any number of threads can query it
//! at the same time.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use octree_accel::accel::Accelerator;
//! use octree_accel::intersection::Intersection;
//! use octree_accel::mesh::Mesh;
//! use octree_accel::ray::Ray;
//! use octree_accel::{Point3, Vector3};
//!
//! let quad = Mesh::new(
//!     "quad",
//!     vec![
//!         Point3::new(-1.0, -1.0, 0.0),
//!         Point3::new(1.0, -1.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(-1.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2], [0, 2, 3]],
//! )
//! .unwrap();
//!
//! let mut accel = Accelerator::new();
//! accel.add_mesh(Arc::new(quad));
//! let octree = accel.build();
//!
//! let ray = Ray::new(Point3::new(0.25, -0.5, 5.0), Vector3::new(0.0, 0.0, -1.0));
//! let mut its = Intersection::default();
//! assert!(octree.ray_intersect(&ray, &mut its, false));
//! assert!((its.t - 5.0).abs() < 1e-5);
//!
//! // Shadow rays only answer whether anything is in the way.
//! let shadow = Ray::segment(Point3::new(0.5, -0.25, 5.0), Point3::new(0.5, -0.25, -5.0));
//! assert!(octree.ray_intersect(&shadow, &mut Intersection::default(), true));
//! ```
//!
//! ## Features
//!
//! - `rayon` (default **enabled**) - answers batched queries in parallel
//! - `serde` (default **disabled**) - adds `Serialize` and `Deserialize` implementations for some types
//!

/// Point math type used by this crate. Type alias for [`nalgebra::Point3`].
pub type Point3 = nalgebra::Point3<Real>;

/// Vector math type used by this crate. Type alias for [`nalgebra::Vector3`].
pub type Vector3 = nalgebra::Vector3<Real>;

/// Texture coordinate type used by this crate. Type alias for [`nalgebra::Point2`].
pub type Point2 = nalgebra::Point2<Real>;

/// Float type used by this crate
pub type Real = f32;

/// A minimal floating value used as a lower bound.
/// Rays start this far from their origin so that surfaces do not shadow themselves.
pub const EPSILON: Real = 1e-4;

/// Archimedes' constant.
pub const PI: Real = std::f32::consts::PI;

/// `1 / PI`
pub const INV_PI: Real = std::f32::consts::FRAC_1_PI;

/// `1 / (2 * PI)`
pub const INV_TWO_PI: Real = 0.5 * std::f32::consts::FRAC_1_PI;

pub mod aabb;
pub mod accel;
pub mod axis;
pub mod frame;
pub mod intersection;
pub mod mesh;
pub mod octree;
pub mod ray;
mod utils;

#[cfg(test)]
mod testbase;
