use std::sync::Arc;

use crate::aabb::Aabb;
use crate::mesh::Mesh;
use crate::octree::{OctreeConfig, OctreeNode, TriangleRef};

/// One-shot recursive subdivision of a triangle list into an arena of [`OctreeNode`]s.
///
/// Each node that holds more than [`OctreeConfig::max_leaf_triangles`] triangles and still
/// has depth budget left is split at its center into eight octants. A triangle goes to every
/// octant its bounding box overlaps, so triangles straddling a split plane are referenced
/// more than once. The parent keeps no triangles once split.
///
/// [`OctreeNode`]: enum.OctreeNode.html
/// [`OctreeConfig::max_leaf_triangles`]: struct.OctreeConfig.html#structfield.max_leaf_triangles
pub struct OctreeBuilder<'a> {
    triangles: &'a [TriangleRef],
    triangle_aabbs: Vec<Aabb>,
    config: OctreeConfig,
    nodes: Vec<OctreeNode>,
}

impl<'a> OctreeBuilder<'a> {
    /// Prepares a build over `triangles`, whose geometry is looked up in `meshes`.
    pub fn new(meshes: &[Arc<Mesh>], triangles: &'a [TriangleRef], config: OctreeConfig) -> Self {
        let triangle_aabbs = triangles
            .iter()
            .map(|triangle| {
                meshes[triangle.mesh_slot()].triangle_aabb(triangle.triangle_index())
            })
            .collect();
        OctreeBuilder {
            triangles,
            triangle_aabbs,
            config,
            nodes: Vec::new(),
        }
    }

    /// Builds the tree covering `aabb`. The root ends up at index `0` of the returned arena.
    /// Returns `None` if there are no triangles.
    pub fn build(mut self, aabb: Aabb) -> Option<Vec<OctreeNode>> {
        if self.triangles.is_empty() {
            return None;
        }
        let all = (0..self.triangles.len()).collect::<Vec<usize>>();
        let max_depth = self.config.max_depth;
        self.build_node(aabb, all, max_depth);
        Some(self.nodes)
    }

    /// Appends the subtree for `aabb` to the arena and returns the index of its root.
    /// `members` index into the builder's triangle list.
    fn build_node(&mut self, aabb: Aabb, members: Vec<usize>, remaining_depth: u32) -> usize {
        let node_index = self.nodes.len();

        if !self.config.should_subdivide(members.len(), remaining_depth) {
            let triangles = members.iter().map(|&m| self.triangles[m]).collect();
            self.nodes.push(OctreeNode::Leaf { aabb, triangles });
            return node_index;
        }

        // Reserve the slot so that the root of this subtree precedes its children.
        self.nodes.push(OctreeNode::Leaf {
            aabb,
            triangles: Vec::new(),
        });

        let mut children = [0; 8];
        for (octant, child) in children.iter_mut().enumerate() {
            let child_aabb = aabb.octant(octant);
            let child_members = members
                .iter()
                .copied()
                .filter(|&m| self.triangle_aabbs[m].overlaps(&child_aabb))
                .collect::<Vec<_>>();
            *child = self.build_node(child_aabb, child_members, remaining_depth - 1);
        }

        self.nodes[node_index] = OctreeNode::Internal { aabb, children };
        node_index
    }
}
