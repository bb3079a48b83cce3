/// Depth budget used for scene builds.
pub const DEFAULT_MAX_DEPTH: u32 = 6;

/// Nodes holding at most this many triangles are not subdivided.
pub const DEFAULT_MAX_LEAF_TRIANGLES: usize = 10;

/// Parameters of the octree subdivision.
///
/// # Examples
/// ```
/// use octree_accel::octree::OctreeConfig;
///
/// let config = OctreeConfig::default().with_max_depth(8);
/// assert_eq!(config.max_depth, 8);
/// assert_eq!(config.max_leaf_triangles, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct OctreeConfig {
    /// Number of times the root may be subdivided. A node at this depth stays a leaf
    /// no matter how many triangles it holds.
    pub max_depth: u32,

    /// A node holding more triangles than this is subdivided while depth remains.
    pub max_leaf_triangles: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        OctreeConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            max_leaf_triangles: DEFAULT_MAX_LEAF_TRIANGLES,
        }
    }
}

impl OctreeConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_leaf_triangles(mut self, max_leaf_triangles: usize) -> Self {
        self.max_leaf_triangles = max_leaf_triangles;
        self
    }

    /// Returns true if a node with `triangle_count` triangles and `remaining_depth` levels
    /// of budget left is split into octants.
    #[inline]
    pub fn should_subdivide(&self, triangle_count: usize, remaining_depth: u32) -> bool {
        remaining_depth > 0 && triangle_count > self.max_leaf_triangles
    }
}
