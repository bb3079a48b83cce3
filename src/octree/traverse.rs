//! Recursive ray traversal of an [`Octree`].
//!
//! [`Octree`]: struct.Octree.html

use crate::frame::Frame;
use crate::intersection::Intersection;
use crate::mesh::Mesh;
use crate::octree::{Octree, OctreeNode, TriangleRef};
use crate::ray::{Ray, TriangleHit};
use crate::{Point2, Point3, Real, Vector3};

impl Octree {
    /// Intersects `ray` with the subtree rooted at `node_index`, whose box the caller has
    /// already found to be hit.
    ///
    /// `ray.max_t` is lowered to every closer hit found, so later siblings and their
    /// descendants are tested against the narrowed range only.
    pub(crate) fn intersect_node<'a>(
        &'a self,
        node_index: usize,
        ray: &mut Ray,
        its: &mut Intersection<'a>,
        shadow_ray: bool,
    ) -> bool {
        match &self.nodes[node_index] {
            OctreeNode::Leaf { triangles, .. } => {
                self.intersect_leaf(triangles, ray, its, shadow_ray)
            }
            OctreeNode::Internal { children, .. } => {
                // Visit the octants front to back.
                let mut order = [(0.0 as Real, 0usize); 8];
                let mut count = 0;
                for &child in children {
                    let node = &self.nodes[child];
                    if node.is_empty_leaf() {
                        continue;
                    }
                    if let Some((t_near, _)) = ray.intersection_interval(node.aabb()) {
                        order[count] = (t_near, child);
                        count += 1;
                    }
                }
                let order = &mut order[..count];
                order.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut found = false;
                for &(t_near, child) in order.iter() {
                    // Everything from here on starts behind the closest hit so far.
                    if t_near > ray.max_t {
                        break;
                    }
                    if self.intersect_node(child, ray, its, shadow_ray) {
                        if shadow_ray {
                            return true;
                        }
                        found = true;
                    }
                }
                found
            }
        }
    }

    /// Tests every triangle of a leaf. For closest-hit queries the record is completed for
    /// the best triangle of this leaf, if it beats every hit found before.
    fn intersect_leaf<'a>(
        &'a self,
        triangles: &[TriangleRef],
        ray: &mut Ray,
        its: &mut Intersection<'a>,
        shadow_ray: bool,
    ) -> bool {
        let mut found = false;
        let mut closest: Option<(TriangleRef, TriangleHit)> = None;

        for &triangle in triangles {
            let mesh = self.mesh(triangle);
            if let Some(hit) = mesh.ray_intersect(triangle.triangle_index(), ray) {
                if shadow_ray {
                    return true;
                }
                found = true;
                if hit.distance < its.t {
                    ray.max_t = hit.distance;
                    its.t = hit.distance;
                    closest = Some((triangle, hit));
                }
            }
        }

        if let Some((triangle, hit)) = closest {
            let mesh: &'a Mesh = &self.meshes[triangle.mesh_slot()];
            complete_intersection(mesh, triangle, &hit, its);
        }
        found
    }
}

/// Fills in the surface properties of `its` for a hit on `triangle` of `mesh`.
fn complete_intersection<'a>(
    mesh: &'a Mesh,
    triangle: TriangleRef,
    hit: &TriangleHit,
    its: &mut Intersection<'a>,
) {
    let bary = Vector3::new(1.0 - hit.u - hit.v, hit.u, hit.v);
    let [i0, i1, i2] = mesh.triangle_indices(triangle.triangle_index());

    let positions = mesh.vertex_positions();
    let (p0, p1, p2) = (positions[i0], positions[i1], positions[i2]);
    its.p = Point3::from(p0.coords * bary.x + p1.coords * bary.y + p2.coords * bary.z);

    let tex_coords = mesh.vertex_tex_coords();
    its.uv = if tex_coords.is_empty() {
        Point2::new(hit.u, hit.v)
    } else {
        Point2::from(
            tex_coords[i0].coords * bary.x
                + tex_coords[i1].coords * bary.y
                + tex_coords[i2].coords * bary.z,
        )
    };

    its.geo_frame = Frame::from_normal((p1 - p0).cross(&(p2 - p0)).normalize());

    let normals = mesh.vertex_normals();
    its.sh_frame = if normals.is_empty() {
        its.geo_frame
    } else {
        // Tangents are not kept continuous across triangles.
        Frame::from_normal(
            (normals[i0] * bary.x + normals[i1] * bary.y + normals[i2] * bary.z).normalize(),
        )
    };

    its.mesh = Some(mesh);
    its.triangle = Some(triangle);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::accel::Accelerator;
    use crate::aabb::Bounded;
    use crate::intersection::Intersection;
    use crate::mesh::Mesh;
    use crate::octree::OctreeConfig;
    use crate::ray::Ray;
    use crate::testbase::{
        brute_force_closest, build_octree, random_ray_towards, random_triangle_soup,
        single_triangle, smooth_triangle, unit_quad,
    };
    use crate::{Point2, Point3, Vector3};

    use float_eq::assert_float_eq;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// One triangle in a single leaf: a ray through the centroid hits at the analytic
    /// distance, a ray beside it misses.
    #[test]
    fn test_single_leaf_centroid_hit() {
        let octree = build_octree(
            vec![single_triangle()],
            OctreeConfig::default().with_max_depth(0),
        );
        assert_eq!(octree.nodes().len(), 1);

        let mesh = &octree.meshes()[0];
        let centroid = mesh.centroid(0);
        let origin = Point3::new(centroid.x, centroid.y, 5.0);
        let ray = Ray::new(origin, Vector3::new(0.0, 0.0, -1.0));

        let mut its = Intersection::default();
        assert!(octree.ray_intersect(&ray, &mut its, false));
        assert_float_eq!(its.t, 5.0 - centroid.z, abs <= 1e-5);
        assert_float_eq!((its.p - centroid).norm(), 0.0, abs <= 1e-5);
        assert_eq!(its.triangle.map(|t| t.triangle_index()), Some(0));

        let beside = Ray::new(Point3::new(5.0, 5.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let mut its = Intersection::default();
        assert!(!octree.ray_intersect(&beside, &mut its, false));
        assert!(!its.is_hit());
        assert_eq!(its.t, f32::INFINITY);
    }

    /// Two triangles in far-apart octants. A shadow ray from next to one of them into
    /// empty space past the other must report no occluder.
    #[test]
    fn test_shadow_ray_between_distant_triangles() {
        let near = Mesh::new(
            "near",
            vec![
                Point3::new(-10.0, -10.0, -10.0),
                Point3::new(-9.0, -10.0, -10.0),
                Point3::new(-10.0, -9.0, -10.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let far = Mesh::new(
            "far",
            vec![
                Point3::new(10.0, 10.0, 10.0),
                Point3::new(9.0, 10.0, 10.0),
                Point3::new(10.0, 9.0, 10.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let octree = build_octree(
            vec![near, far],
            OctreeConfig::default()
                .with_max_depth(2)
                .with_max_leaf_triangles(0),
        );
        assert!(!octree.root().unwrap().is_leaf());

        let from = Point3::new(-9.8, -9.8, -9.5);
        let past_far = Ray::segment(from, Point3::new(12.0, 12.0, 9.5));
        let mut its = Intersection::default();
        assert!(!octree.ray_intersect(&past_far, &mut its, true));

        // Aimed through the far triangle, the same kind of query finds it.
        let at_far = Ray::segment(from, Point3::new(19.45, 19.45, 19.75));
        assert!(octree.ray_intersect(&at_far, &mut its, true));
    }

    /// The shading frame follows the interpolated vertex normals, the geometric frame the face.
    #[test]
    fn test_shading_frame_from_vertex_normals() {
        let mesh = smooth_triangle();
        let normals = mesh.vertex_normals().to_vec();
        let octree = build_octree(vec![mesh], OctreeConfig::default());

        let (u, v) = (0.2, 0.3);
        let mesh = &octree.meshes()[0];
        let [p0, p1, p2] = mesh.triangle_vertices(0);
        let target = Point3::from(p0.coords * (1.0 - u - v) + p1.coords * u + p2.coords * v);
        let ray = Ray::new(target + Vector3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0));

        let mut its = Intersection::default();
        assert!(octree.ray_intersect(&ray, &mut its, false));

        let expected = (normals[0] * (1.0 - u - v) + normals[1] * u + normals[2] * v).normalize();
        assert_float_eq!((its.sh_frame.n - expected).norm(), 0.0, abs <= 1e-5);
        assert_float_eq!(its.geo_frame.n.z.abs(), 1.0, abs <= 1e-6);
        assert!((its.sh_frame.n - its.geo_frame.n).norm() > 1e-2);

        // Texture coordinates are interpolated the same way.
        let uvs = mesh.vertex_tex_coords();
        let expected_uv = uvs[0].coords * (1.0 - u - v) + uvs[1].coords * u + uvs[2].coords * v;
        assert_float_eq!((its.uv.coords - expected_uv).norm(), 0.0, abs <= 1e-5);
    }

    #[test]
    fn test_flat_mesh_shading_frame_equals_geometric_frame() {
        let octree = build_octree(vec![unit_quad("quad", 0.0)], OctreeConfig::default());
        let ray = Ray::new(Point3::new(0.3, 0.6, 1.0), Vector3::new(0.0, 0.0, -1.0));
        let mut its = Intersection::default();
        assert!(octree.ray_intersect(&ray, &mut its, false));
        assert_eq!(its.sh_frame, its.geo_frame);
        assert!(its.uv.x >= 0.0 && its.uv.y >= 0.0 && its.uv.x + its.uv.y <= 1.0);
        assert_float_eq!(its.to_local(&Vector3::new(0.0, 0.0, 1.0)).z.abs(), 1.0, abs <= 1e-6);
    }

    /// The closer of two stacked quads wins, regardless of which is added first.
    #[test]
    fn test_closest_of_stacked_quads() {
        for order in [[0.0, 1.0], [1.0, 0.0]] {
            let meshes = order.iter().map(|&z| unit_quad("quad", z)).collect();
            let octree = build_octree(meshes, OctreeConfig::default());
            let ray = Ray::new(Point3::new(0.1, 0.2, 3.0), Vector3::new(0.0, 0.0, -1.0));
            let mut its = Intersection::default();
            assert!(octree.ray_intersect(&ray, &mut its, false));
            assert_float_eq!(its.t, 2.0, abs <= 1e-6);
            assert_float_eq!(its.p.z, 1.0, abs <= 1e-6);

            let upward = Ray::new(Point3::new(0.1, 0.2, -3.0), Vector3::new(0.0, 0.0, 1.0));
            assert!(octree.ray_intersect(&upward, &mut its, false));
            assert_float_eq!(its.p.z, 0.0, abs <= 1e-6);
        }
    }

    #[test]
    fn test_ray_range_is_respected() {
        let octree = build_octree(vec![unit_quad("quad", 0.0)], OctreeConfig::default());
        let origin = Point3::new(0.5, 0.2, 2.0);
        let direction = Vector3::new(0.0, 0.0, -1.0);
        let mut its = Intersection::default();
        let short = Ray::with_bounds(origin, direction, 0.0, 1.9);
        let long = Ray::with_bounds(origin, direction, 0.0, 2.1);
        let behind = Ray::with_bounds(origin, direction, 2.1, 5.0);
        assert!(!octree.ray_intersect(&short, &mut its, false));
        assert!(octree.ray_intersect(&long, &mut its, false));
        assert!(!octree.ray_intersect(&behind, &mut its, true));
    }

    #[test]
    fn test_batch_matches_single_queries() {
        let octree = build_octree(vec![random_triangle_soup(5, 300)], OctreeConfig::default());
        let mut rng = StdRng::seed_from_u64(99);
        let rays = (0..64)
            .map(|_| random_ray_towards(&mut rng, octree.bounding_box()))
            .collect::<Vec<_>>();

        for shadow_ray in [false, true] {
            let batch = octree.ray_intersect_batch(&rays, shadow_ray);
            assert_eq!(batch.len(), rays.len());
            for (ray, result) in rays.iter().zip(&batch) {
                let mut its = Intersection::default();
                let hit = octree.ray_intersect(ray, &mut its, shadow_ray);
                assert_eq!(hit, result.is_some());
                if let (false, Some(batched)) = (shadow_ray, result) {
                    assert_eq!(batched.t.to_bits(), its.t.to_bits());
                    assert_eq!(batched.triangle, its.triangle);
                }
            }
        }
    }

    #[test]
    fn test_octree_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::octree::Octree>();

        let octree = Arc::new(build_octree(
            vec![random_triangle_soup(8, 200)],
            OctreeConfig::default(),
        ));
        let ray = Ray::new(Point3::new(-20.0, 0.1, 0.2), Vector3::new(1.0, 0.0, 0.0));
        let mut expected = Intersection::default();
        let expected_hit = octree.ray_intersect(&ray, &mut expected, false);
        let expected_t = expected.t.to_bits();

        let handles = (0..4)
            .map(|_| {
                let octree = Arc::clone(&octree);
                std::thread::spawn(move || {
                    let mut its = Intersection::default();
                    let hit = octree.ray_intersect(&ray, &mut its, false);
                    (hit, its.t.to_bits())
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), (expected_hit, expected_t));
        }
    }

    #[test]
    fn test_empty_scene_misses() {
        let octree = Accelerator::new().build();
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 1.0, 1.0));
        let mut its = Intersection::default();
        assert!(!octree.ray_intersect(&ray, &mut its, false));
        assert!(!octree.ray_intersect(&ray, &mut its, true));
        assert!(octree.ray_intersect_batch(&[ray], false)[0].is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        // The octree reports the same closest distance as testing every triangle.
        #[test]
        fn test_closest_hit_is_minimal(seed in any::<u64>(), count in 1usize..300, depth in 0u32..7) {
            let soup = random_triangle_soup(seed, count);
            let octree = build_octree(vec![soup], OctreeConfig::default().with_max_depth(depth));
            let mesh = octree.meshes()[0].clone();
            let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);

            for _ in 0..32 {
                let ray = random_ray_towards(&mut rng, &mesh.aabb());
                let mut its = Intersection::default();
                let hit = octree.ray_intersect(&ray, &mut its, false);
                let expected = brute_force_closest(&mesh, &ray);

                prop_assert_eq!(hit, expected.is_some());
                if let Some(t) = expected {
                    prop_assert!((its.t - t).abs() <= 1e-4 * t.abs().max(1.0));
                    prop_assert!(its.is_hit());
                }

                let mut shadow = Intersection::default();
                prop_assert_eq!(octree.ray_intersect(&ray, &mut shadow, true), hit);
            }
        }

        // Rays whose whole extent stays outside the scene bounds never hit.
        #[test]
        fn test_rays_outside_bounds_miss(seed in any::<u64>(), offset in 0.5f32..100.0) {
            let soup = random_triangle_soup(seed, 50);
            let octree = build_octree(vec![soup], OctreeConfig::default());
            let aabb = *octree.bounding_box();
            let origin = Point3::new(aabb.max.x + offset, aabb.center().y, aabb.center().z);

            let mut its = Intersection::default();
            let away = Ray::new(origin, Vector3::new(1.0, 0.3, -0.2));
            prop_assert!(!octree.ray_intersect(&away, &mut its, false));
            prop_assert!(!octree.ray_intersect(&away, &mut its, true));

            let above = Ray::new(
                Point3::new(aabb.min.x, aabb.max.y + offset, aabb.min.z),
                Vector3::new(1.0, 0.0, 1.0),
            );
            prop_assert!(!octree.ray_intersect(&above, &mut its, false));
        }

        // Repeating a query gives bit-identical results.
        #[test]
        fn test_queries_are_deterministic(seed in any::<u64>()) {
            let soup = random_triangle_soup(seed, 200);
            let octree = build_octree(vec![soup], OctreeConfig::default());
            let mut rng = StdRng::seed_from_u64(seed);
            let ray = random_ray_towards(&mut rng, octree.bounding_box());

            let mut first = Intersection::default();
            let mut second = Intersection::default();
            let first_hit = octree.ray_intersect(&ray, &mut first, false);
            let second_hit = octree.ray_intersect(&ray, &mut second, false);

            prop_assert_eq!(first_hit, second_hit);
            prop_assert_eq!(first.t.to_bits(), second.t.to_bits());
            prop_assert_eq!(first.p, second.p);
            prop_assert_eq!(first.uv, second.uv);
            prop_assert_eq!(first.triangle, second.triangle);
        }
    }

    #[test]
    fn test_tex_coords_are_interpolated() {
        let mesh = single_triangle()
            .with_tex_coords(vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(0.0, 2.0),
            ])
            .unwrap();
        let octree = build_octree(vec![mesh], OctreeConfig::default());
        let [p0, p1, p2] = octree.meshes()[0].triangle_vertices(0);
        let target = Point3::from(p0.coords * 0.5 + p1.coords * 0.25 + p2.coords * 0.25);
        let ray = Ray::new(target + Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0));
        let mut its = Intersection::default();
        assert!(octree.ray_intersect(&ray, &mut its, false));
        assert_float_eq!(its.uv.x, 0.5, abs <= 1e-5);
        assert_float_eq!(its.uv.y, 0.5, abs <= 1e-5);
    }
}
