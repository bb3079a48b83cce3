//! Scene assembly ahead of the octree build.

use std::collections::HashSet;
use std::sync::Arc;

use crate::aabb::{Aabb, Bounded};
use crate::mesh::{Mesh, MeshId};
use crate::octree::{Octree, OctreeConfig};

/// Collects the meshes of a scene and turns them into an [`Octree`].
///
/// Queries are only available on the built tree: [`Accelerator::build`] consumes the
/// accelerator, so no mesh can be added to a scene that is already being queried.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use octree_accel::accel::Accelerator;
/// use octree_accel::mesh::Mesh;
/// use octree_accel::Point3;
///
/// let mesh = Arc::new(
///     Mesh::new(
///         "tri",
///         vec![
///             Point3::new(0.0, 0.0, 0.0),
///             Point3::new(1.0, 0.0, 0.0),
///             Point3::new(0.0, 1.0, 0.0),
///         ],
///         vec![[0, 1, 2]],
///     )
///     .unwrap(),
/// );
///
/// let mut accel = Accelerator::new();
/// assert!(accel.add_mesh(mesh.clone()));
/// assert!(!accel.add_mesh(mesh));
///
/// let octree = accel.build();
/// assert_eq!(octree.triangle_count(), 1);
/// ```
///
/// [`Octree`]: ../octree/struct.Octree.html
#[derive(Debug, Default)]
pub struct Accelerator {
    meshes: Vec<Arc<Mesh>>,
    ids: HashSet<MeshId>,
    aabb: Aabb,
    config: OctreeConfig,
}

impl Accelerator {
    /// Creates an empty scene using the default subdivision parameters.
    pub fn new() -> Accelerator {
        Accelerator::default()
    }

    pub fn with_config(config: OctreeConfig) -> Accelerator {
        Accelerator {
            config,
            ..Accelerator::default()
        }
    }

    /// Registers a mesh and grows the scene bounds to contain it.
    ///
    /// Returns `false` and changes nothing if the same mesh was added before.
    pub fn add_mesh(&mut self, mesh: Arc<Mesh>) -> bool {
        if !self.ids.insert(mesh.id()) {
            log::trace!("Mesh {:?} ({}) is already part of the scene", mesh.id(), mesh.name());
            return false;
        }

        let mesh_aabb = mesh.aabb();
        if self.meshes.is_empty() {
            self.aabb = mesh_aabb;
        } else {
            self.aabb.expand_by(&mesh_aabb);
        }
        self.meshes.push(mesh);
        true
    }

    pub fn meshes(&self) -> &[Arc<Mesh>] {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Bounds of every mesh added so far. Empty while no mesh has been added.
    pub fn bounding_box(&self) -> &Aabb {
        &self.aabb
    }

    /// Total number of triangles over all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.triangle_count()).sum()
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Builds the octree over all meshes added so far.
    pub fn build(self) -> Octree {
        Octree::build(self.meshes, self.aabb, self.config)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::accel::Accelerator;
    use crate::aabb::Aabb;
    use crate::octree::OctreeConfig;
    use crate::testbase::{random_triangle_soup, single_triangle, unit_quad};
    use crate::Point3;

    #[test]
    fn test_empty_accelerator() {
        let accel = Accelerator::new();
        assert_eq!(accel.mesh_count(), 0);
        assert_eq!(accel.triangle_count(), 0);
        assert!(accel.bounding_box().is_empty());
        assert_eq!(accel.config(), &OctreeConfig::default());
    }

    #[test]
    fn test_add_mesh_grows_bounds() {
        let mut accel = Accelerator::new();
        assert!(accel.add_mesh(Arc::new(unit_quad("low", -2.0))));
        assert_eq!(
            *accel.bounding_box(),
            Aabb::with_bounds(Point3::new(-1.0, -1.0, -2.0), Point3::new(1.0, 1.0, -2.0))
        );

        assert!(accel.add_mesh(Arc::new(unit_quad("high", 3.0))));
        assert_eq!(
            *accel.bounding_box(),
            Aabb::with_bounds(Point3::new(-1.0, -1.0, -2.0), Point3::new(1.0, 1.0, 3.0))
        );
        assert_eq!(accel.mesh_count(), 2);
        assert_eq!(accel.triangle_count(), 4);
    }

    #[test]
    fn test_same_mesh_is_added_once() {
        let mesh = Arc::new(single_triangle());
        let mut accel = Accelerator::new();
        assert!(accel.add_mesh(mesh.clone()));
        assert!(!accel.add_mesh(mesh.clone()));
        assert_eq!(accel.mesh_count(), 1);

        // An identical but separately created mesh is a different mesh.
        assert!(accel.add_mesh(Arc::new(single_triangle())));
        assert_eq!(accel.mesh_count(), 2);

        let octree = accel.build();
        assert_eq!(octree.triangle_count(), 2);
        assert!(Arc::ptr_eq(&octree.meshes()[0], &mesh));
    }

    #[test]
    fn test_build_keeps_config_and_bounds() {
        let config = OctreeConfig::default()
            .with_max_depth(3)
            .with_max_leaf_triangles(4);
        let mut accel = Accelerator::with_config(config);
        accel.add_mesh(Arc::new(random_triangle_soup(21, 150)));
        let aabb = *accel.bounding_box();

        let octree = accel.build();
        assert_eq!(octree.config(), &config);
        assert_eq!(octree.bounding_box(), &aabb);
        assert!(octree.stats().depth <= 3);
        octree.assert_consistent();
    }
}
