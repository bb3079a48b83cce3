//! This module defines the [`Octree`] and functions for inspecting and querying it.
//!
//! [`Octree`]: struct.Octree.html
//!

use std::iter::repeat;
use std::sync::Arc;

use crate::aabb::Aabb;
use crate::intersection::Intersection;
use crate::mesh::Mesh;
use crate::octree::{OctreeBuilder, OctreeConfig, OctreeNode, TriangleRef, ROOT_INDEX};
use crate::ray::Ray;

/// Summary of the shape of a built [`Octree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OctreeStats {
    /// Number of nodes in the arena.
    pub node_count: usize,

    /// Number of leaves, empty ones included.
    pub leaf_count: usize,

    /// Number of leaves without any triangle.
    pub empty_leaf_count: usize,

    /// Total number of triangle references over all leaves. Exceeds the triangle
    /// count when triangles straddle octant boundaries.
    pub triangle_refs: usize,

    /// Largest number of triangles referenced by a single leaf.
    pub max_leaf_triangles: usize,

    /// Depth of the deepest leaf. The root is at depth 0.
    pub depth: u32,

    /// Leaves holding more triangles than the leaf threshold because the depth budget
    /// ran out.
    pub oversized_leaves: usize,
}

/// An immutable octree over the triangles of a set of meshes.
///
/// The tree is produced by [`Accelerator::build`] and answers ray queries through
/// [`Octree::ray_intersect`]. Queries never modify the tree, so an `Octree` can be
/// shared between any number of threads.
///
/// [`Accelerator::build`]: ../accel/struct.Accelerator.html#method.build
///
pub struct Octree {
    pub(crate) meshes: Vec<Arc<Mesh>>,
    pub(crate) nodes: Vec<OctreeNode>,
    aabb: Aabb,
    config: OctreeConfig,
    triangle_count: usize,
}

impl Octree {
    /// Builds an [`Octree`] over every triangle of `meshes`, covering `aabb`.
    /// `aabb` must contain every mesh.
    pub(crate) fn build(meshes: Vec<Arc<Mesh>>, aabb: Aabb, config: OctreeConfig) -> Octree {
        let triangles = meshes
            .iter()
            .enumerate()
            .flat_map(|(slot, mesh)| {
                (0..mesh.triangle_count()).map(move |index| TriangleRef::new(slot, index))
            })
            .collect::<Vec<_>>();

        let nodes = OctreeBuilder::new(&meshes, &triangles, config)
            .build(aabb)
            .unwrap_or_default();

        let octree = Octree {
            meshes,
            nodes,
            aabb,
            config,
            triangle_count: triangles.len(),
        };

        if octree.nodes.is_empty() {
            log::debug!("Octree over an empty scene, every query will miss");
        } else {
            let stats = octree.stats();
            log::debug!(
                "Built octree over {} triangles: {} nodes, {} leaves ({} empty), {} triangle references, depth {}, largest leaf {}",
                octree.triangle_count,
                stats.node_count,
                stats.leaf_count,
                stats.empty_leaf_count,
                stats.triangle_refs,
                stats.depth,
                stats.max_leaf_triangles
            );
            if stats.oversized_leaves > 0 {
                log::debug!(
                    "{} leaves exceed {} triangles at the depth limit of {}",
                    stats.oversized_leaves,
                    config.max_leaf_triangles,
                    config.max_depth
                );
            }
        }

        octree
    }

    /// Intersects `ray` with the scene.
    ///
    /// Resets `its.t` to `+inf` first. With `shadow_ray` set, returns as soon as any
    /// triangle is found within the ray's range and leaves the remaining fields of `its`
    /// untouched. Otherwise finds the closest hit and fills in `its` completely.
    ///
    /// `ray` itself is never modified; the traversal narrows a private copy.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use octree_accel::accel::Accelerator;
    /// use octree_accel::intersection::Intersection;
    /// use octree_accel::mesh::Mesh;
    /// use octree_accel::ray::Ray;
    /// use octree_accel::{Point3, Vector3};
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 1.0),
    ///     Point3::new(1.0, 0.0, 1.0),
    ///     Point3::new(0.0, 1.0, 1.0),
    /// ];
    /// let mut accel = Accelerator::new();
    /// accel.add_mesh(Arc::new(Mesh::new("tri", positions, vec![[0, 1, 2]]).unwrap()));
    /// let octree = accel.build();
    ///
    /// let ray = Ray::new(Point3::new(0.2, 0.2, 0.0), Vector3::new(0.0, 0.0, 1.0));
    /// let mut its = Intersection::default();
    /// assert!(octree.ray_intersect(&ray, &mut its, false));
    /// assert_eq!(its.mesh.map(|mesh| mesh.name()), Some("tri"));
    /// assert!((its.p.z - 1.0).abs() < 1e-6);
    /// ```
    pub fn ray_intersect<'a>(
        &'a self,
        ray: &Ray,
        its: &mut Intersection<'a>,
        shadow_ray: bool,
    ) -> bool {
        its.t = crate::Real::INFINITY;

        let root = match self.nodes.get(ROOT_INDEX) {
            Some(root) => root,
            None => return false,
        };
        if !ray.intersects_aabb(root.aabb()) {
            return false;
        }

        let mut ray = *ray;
        self.intersect_node(ROOT_INDEX, &mut ray, its, shadow_ray)
    }

    /// Answers many independent queries. Entry `i` of the result is the intersection for
    /// `rays[i]`, or `None` if it missed. Runs in parallel with the `rayon` feature.
    pub fn ray_intersect_batch(
        &self,
        rays: &[Ray],
        shadow_ray: bool,
    ) -> Vec<Option<Intersection<'_>>> {
        let query = |ray: &Ray| {
            let mut its = Intersection::default();
            if self.ray_intersect(ray, &mut its, shadow_ray) {
                Some(its)
            } else {
                None
            }
        };

        #[cfg(feature = "rayon")]
        let intersections = {
            use rayon::prelude::*;
            rays.par_iter().map(query).collect()
        };

        #[cfg(not(feature = "rayon"))]
        let intersections = rays.iter().map(query).collect();

        intersections
    }

    /// The box the tree was built over: the union of all mesh bounds.
    pub fn bounding_box(&self) -> &Aabb {
        &self.aabb
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// The meshes of the scene, in the order referenced by [`TriangleRef::mesh`].
    ///
    /// [`TriangleRef::mesh`]: struct.TriangleRef.html#structfield.mesh
    pub fn meshes(&self) -> &[Arc<Mesh>] {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Looks up the mesh a [`TriangleRef`] points into.
    pub fn mesh(&self, triangle: TriangleRef) -> &Mesh {
        &self.meshes[triangle.mesh_slot()]
    }

    /// Number of distinct triangles in the scene.
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// The node arena. The root, if any, is at [`ROOT_INDEX`].
    ///
    /// [`ROOT_INDEX`]: constant.ROOT_INDEX.html
    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    /// The root node, or `None` for an empty scene.
    pub fn root(&self) -> Option<&OctreeNode> {
        self.nodes.get(ROOT_INDEX)
    }

    /// Collects [`OctreeStats`] by walking the tree.
    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats::default();
        if !self.nodes.is_empty() {
            self.collect_stats(ROOT_INDEX, 0, &mut stats);
        }
        stats
    }

    fn collect_stats(&self, node_index: usize, depth: u32, stats: &mut OctreeStats) {
        stats.node_count += 1;
        stats.depth = stats.depth.max(depth);
        match &self.nodes[node_index] {
            OctreeNode::Leaf { triangles, .. } => {
                stats.leaf_count += 1;
                stats.triangle_refs += triangles.len();
                stats.max_leaf_triangles = stats.max_leaf_triangles.max(triangles.len());
                if triangles.is_empty() {
                    stats.empty_leaf_count += 1;
                }
                if triangles.len() > self.config.max_leaf_triangles {
                    stats.oversized_leaves += 1;
                }
            }
            OctreeNode::Internal { children, .. } => {
                for &child in children {
                    self.collect_stats(child, depth + 1, stats);
                }
            }
        }
    }

    /// Prints the [`Octree`] in a tree-like visualization.
    pub fn pretty_print(&self) {
        if !self.nodes.is_empty() {
            self.print_node(ROOT_INDEX, 0);
        }
    }

    fn print_node(&self, node_index: usize, depth: usize) {
        let padding: String = repeat(" ").take(depth).collect();
        match &self.nodes[node_index] {
            OctreeNode::Internal { aabb, children } => {
                println!("{}node={} {}", padding, node_index, aabb);
                for &child in children {
                    self.print_node(child, depth + 1);
                }
            }
            OctreeNode::Leaf { aabb, triangles } => {
                println!(
                    "{}leaf={} triangles={} {}",
                    padding,
                    node_index,
                    triangles.len(),
                    aabb
                );
            }
        }
    }

    /// Checks the structural invariants of the tree: every node is reachable from the
    /// root, each internal node is tiled by its eight octants, and each leaf holds
    /// exactly the triangles whose bounds overlap its box.
    pub fn is_consistent(&self) -> bool {
        self.find_inconsistency().is_none()
    }

    /// Assert version of [`Octree::is_consistent`].
    pub fn assert_consistent(&self) {
        if let Some(message) = self.find_inconsistency() {
            panic!("{}", message);
        }
    }

    fn find_inconsistency(&self) -> Option<String> {
        let root = self.root()?;
        if *root.aabb() != self.aabb {
            return Some(format!(
                "Root bounds {} differ from the scene bounds {}",
                root.aabb(),
                self.aabb
            ));
        }

        let mut visited = 0;
        let result = self.find_inconsistency_in_subtree(ROOT_INDEX, &mut visited);
        if result.is_some() {
            return result;
        }
        if visited != self.nodes.len() {
            return Some(format!(
                "Detached subtree: reached {} of {} nodes",
                visited,
                self.nodes.len()
            ));
        }
        None
    }

    fn find_inconsistency_in_subtree(
        &self,
        node_index: usize,
        visited: &mut usize,
    ) -> Option<String> {
        *visited += 1;
        match &self.nodes[node_index] {
            OctreeNode::Internal { aabb, children } => {
                let mut union = Aabb::empty();
                for (octant, &child) in children.iter().enumerate() {
                    if child <= node_index || child >= self.nodes.len() {
                        return Some(format!(
                            "Node {} has invalid child index {}",
                            node_index, child
                        ));
                    }
                    let child_aabb = self.nodes[child].aabb();
                    if *child_aabb != aabb.octant(octant) {
                        return Some(format!(
                            "Child {} of node {} is not octant {}.\n\tBounds: {}\n\tChild: {}",
                            child, node_index, octant, aabb, child_aabb
                        ));
                    }
                    union.expand_by(child_aabb);
                    if let Some(message) = self.find_inconsistency_in_subtree(child, visited) {
                        return Some(message);
                    }
                }
                if union != *aabb {
                    return Some(format!(
                        "Children of node {} do not cover it.\n\tBounds: {}\n\tUnion: {}",
                        node_index, aabb, union
                    ));
                }
                None
            }
            OctreeNode::Leaf { aabb, triangles } => {
                for &triangle in triangles {
                    let triangle_aabb =
                        self.mesh(triangle).triangle_aabb(triangle.triangle_index());
                    if !triangle_aabb.overlaps(aabb) {
                        return Some(format!(
                            "Leaf {} holds {:?} which lies outside it.\n\tBounds: {}\n\tTriangle: {}",
                            node_index, triangle, aabb, triangle_aabb
                        ));
                    }
                }
                for (slot, mesh) in self.meshes.iter().enumerate() {
                    for index in 0..mesh.triangle_count() {
                        let triangle = TriangleRef::new(slot, index);
                        if mesh.triangle_aabb(index).overlaps(aabb)
                            && !triangles.contains(&triangle)
                        {
                            return Some(format!(
                                "Leaf {} is missing {:?}.\n\tBounds: {}",
                                node_index, triangle, aabb
                            ));
                        }
                    }
                }
                None
            }
        }
    }
}
