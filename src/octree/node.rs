use crate::aabb::Aabb;

/// Index of the root node in [`Octree::nodes`].
///
/// [`Octree::nodes`]: struct.Octree.html#method.nodes
pub const ROOT_INDEX: usize = 0;

/// Locates one triangle of one mesh of an [`Octree`] without owning any geometry.
///
/// [`Octree`]: struct.Octree.html
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriangleRef {
    /// Position of the mesh in the octree's mesh list.
    pub mesh: u32,

    /// Index of the triangle within its mesh.
    pub index: u32,
}

impl TriangleRef {
    /// Both `mesh` and `index` must fit in a `u32`.
    ///
    /// # Panics
    ///
    /// In debug builds, if either value exceeds `u32::MAX`.
    pub fn new(mesh: usize, index: usize) -> TriangleRef {
        debug_assert!(
            u32::try_from(mesh).is_ok() && u32::try_from(index).is_ok(),
            "triangle reference ({}, {}) does not fit in 32 bits",
            mesh,
            index
        );
        TriangleRef {
            mesh: mesh as u32,
            index: index as u32,
        }
    }

    #[inline]
    pub fn mesh_slot(&self) -> usize {
        self.mesh as usize
    }

    #[inline]
    pub fn triangle_index(&self) -> usize {
        self.index as usize
    }
}

/// The [`OctreeNode`] enum that describes a node in an [`Octree`].
/// It's either a leaf which references the triangles overlapping its box,
/// or an internal node whose eight children split its box at the center.
///
/// Children are stored by their index in the octree's node arena, ordered by octant:
/// child `i` spans from the center to [`Aabb::corner`]`(i)`.
///
/// [`Octree`]: struct.Octree.html
/// [`Aabb::corner`]: ../aabb/struct.Aabb.html#method.corner
///
#[derive(Debug, Clone, PartialEq)]
pub enum OctreeNode {
    /// Leaf node.
    Leaf {
        /// The region covered by this leaf.
        aabb: Aabb,

        /// Every triangle whose bounding box overlaps `aabb`.
        triangles: Vec<TriangleRef>,
    },
    /// Internal node.
    Internal {
        /// The region covered by this node.
        aabb: Aabb,

        /// Arena indices of the eight octants.
        children: [usize; 8],
    },
}

impl OctreeNode {
    /// Returns the region covered by this node.
    pub fn aabb(&self) -> &Aabb {
        match self {
            OctreeNode::Leaf { aabb, .. } | OctreeNode::Internal { aabb, .. } => aabb,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, OctreeNode::Leaf { .. })
    }

    /// Returns true for a leaf that references no triangle at all.
    pub fn is_empty_leaf(&self) -> bool {
        matches!(self, OctreeNode::Leaf { triangles, .. } if triangles.is_empty())
    }

    /// Returns the triangles referenced by a leaf. Internal nodes reference none.
    pub fn triangles(&self) -> &[TriangleRef] {
        match self {
            OctreeNode::Leaf { triangles, .. } => triangles,
            OctreeNode::Internal { .. } => &[],
        }
    }

    /// Returns the arena indices of the children of an internal node.
    pub fn children(&self) -> Option<&[usize; 8]> {
        match self {
            OctreeNode::Leaf { .. } => None,
            OctreeNode::Internal { children, .. } => Some(children),
        }
    }
}
