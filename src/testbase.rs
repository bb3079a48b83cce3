//! Common utilities shared by unit tests.
#![cfg(test)]

use std::f32;
use std::sync::Arc;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::aabb::Aabb;
use crate::accel::Accelerator;
use crate::mesh::Mesh;
use crate::octree::{Octree, OctreeConfig};
use crate::ray::Ray;
use crate::{Point2, Point3, Real, Vector3};

/// A vector represented as a tuple
pub type TupleVec = (f32, f32, f32);

/// Generate a `TupleVec` for [`proptest::strategy::Strategy`] from -10e10 to 10e10
/// A small enough range to prevent most fp32 errors from breaking certain tests
pub fn tuplevec_small_strategy() -> impl Strategy<Value = TupleVec> {
    (
        -10e10_f32..10e10_f32,
        -10e10_f32..10e10_f32,
        -10e10_f32..10e10_f32,
    )
}

/// Convert a `TupleVec` to a [`Point3`].
pub fn tuple_to_point(tpl: &TupleVec) -> Point3 {
    Point3::new(tpl.0, tpl.1, tpl.2)
}

/// Convert a `TupleVec` to a [`Vector3`].
pub fn tuple_to_vector(tpl: &TupleVec) -> Vector3 {
    Vector3::new(tpl.0, tpl.1, tpl.2)
}

/// A square of side 2 centered on the z axis at height `z`, split along its diagonal
/// into two triangles.
pub fn unit_quad(name: &str, z: Real) -> Mesh {
    Mesh::new(
        name,
        vec![
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(-1.0, 1.0, z),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
    .unwrap()
}

/// One triangle parallel to the xy plane, without normals or texture coordinates.
pub fn single_triangle() -> Mesh {
    Mesh::new(
        "triangle",
        vec![
            Point3::new(-1.0, -1.0, 0.5),
            Point3::new(1.0, -1.0, 0.5),
            Point3::new(0.0, 1.0, 0.5),
        ],
        vec![[0, 1, 2]],
    )
    .unwrap()
}

/// A flat triangle in the xy plane whose vertex normals lean away from the face normal.
pub fn smooth_triangle() -> Mesh {
    Mesh::new(
        "smooth",
        vec![
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2]],
    )
    .and_then(|mesh| {
        mesh.with_normals(vec![
            Vector3::new(-0.6, -0.4, 1.0),
            Vector3::new(0.6, -0.4, 1.0),
            Vector3::new(0.0, 0.8, 1.0),
        ])
    })
    .and_then(|mesh| {
        mesh.with_tex_coords(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
        ])
    })
    .unwrap()
}

/// Generates `n` deterministic random triangles with edges of up to about 4 units,
/// scattered in the cube from -10 to 10.
pub fn random_triangle_soup(seed: u64, n: usize) -> Mesh {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions = Vec::with_capacity(3 * n);
    let mut indices = Vec::with_capacity(n);
    for i in 0..n {
        let center = next_point3(&mut rng, &default_bounds());
        for _ in 0..3 {
            let offset = Vector3::new(
                rng.random_range(-2.0..2.0),
                rng.random_range(-2.0..2.0),
                rng.random_range(-2.0..2.0),
            );
            positions.push(center + offset);
        }
        let first = 3 * i as u32;
        indices.push([first, first + 1, first + 2]);
    }
    Mesh::new("soup", positions, indices).unwrap()
}

/// Returns an `Aabb` which defines the default testing space bounds.
pub fn default_bounds() -> Aabb {
    Aabb::with_bounds(Point3::new(-10.0, -10.0, -10.0), Point3::new(10.0, 10.0, 10.0))
}

/// Generates a new `Point3`, which will lie inside the given `aabb`.
pub fn next_point3(rng: &mut StdRng, aabb: &Aabb) -> Point3 {
    let size = aabb.size();
    let offset = Vector3::new(
        rng.random::<f32>() * size.x,
        rng.random::<f32>() * size.y,
        rng.random::<f32>() * size.z,
    );
    aabb.min + offset
}

/// Generates a ray starting well outside `aabb` and aimed at a random point within it.
pub fn random_ray_towards(rng: &mut StdRng, aabb: &Aabb) -> Ray {
    let target = next_point3(rng, aabb);
    let radius = aabb.size().norm().max(1.0);
    let direction = loop {
        let v = Vector3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let norm = v.norm();
        if norm > 0.1 && norm <= 1.0 {
            break v / norm;
        }
    };
    let origin = aabb.center() - direction * (2.0 * radius);
    Ray::new(origin, target - origin)
}

/// Closest hit distance of `ray` found by testing every triangle of `mesh`.
pub fn brute_force_closest(mesh: &Mesh, ray: &Ray) -> Option<Real> {
    (0..mesh.triangle_count())
        .filter_map(|index| mesh.ray_intersect(index, ray))
        .map(|hit| hit.distance)
        .min_by(|a, b| a.total_cmp(b))
}

/// Builds an octree over `meshes` and checks its structure.
pub fn build_octree(meshes: Vec<Mesh>, config: OctreeConfig) -> Octree {
    let mut accel = Accelerator::with_config(config);
    for mesh in meshes {
        assert!(accel.add_mesh(Arc::new(mesh)));
    }
    let octree = accel.build();
    octree.assert_consistent();
    octree
}
