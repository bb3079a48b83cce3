//! Indexed triangle meshes.
//!
//! A [`Mesh`] owns its vertex buffers. Everything the accelerator learns about a
//! triangle, be it its bounds or its intersection with a ray, is asked of the mesh
//! through the triangle's local index.

use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use crate::aabb::{Aabb, Bounded};
use crate::ray::{Ray, TriangleHit};
use crate::{Point2, Point3, Real, Vector3};

static NEXT_MESH_ID: AtomicUsize = AtomicUsize::new(0);

/// Process-unique identity of a [`Mesh`], assigned when the mesh is created.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(usize);

impl MeshId {
    fn next() -> MeshId {
        MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Errors raised while assembling a [`Mesh`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("expected one {attribute} per vertex ({expected}), got {actual}")]
    AttributeCountMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// An indexed triangle mesh with optional per-vertex normals and texture coordinates.
///
/// Meshes are deliberately not `Clone`: a copy would carry the same [`MeshId`] and
/// defeat the deduplication in [`Accelerator::add_mesh`].
///
/// [`Accelerator::add_mesh`]: ../accel/struct.Accelerator.html#method.add_mesh
#[derive(Debug)]
pub struct Mesh {
    id: MeshId,
    name: String,
    positions: Vec<Point3>,
    normals: Vec<Vector3>,
    tex_coords: Vec<Point2>,
    indices: Vec<[u32; 3]>,
    aabb: Aabb,
}

impl Mesh {
    /// Creates a mesh from vertex positions and triangle index triples.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfBounds`] if a triangle references a vertex that
    /// does not exist.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::mesh::{Mesh, MeshError};
    /// use octree_accel::Point3;
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = Mesh::new("tri", positions.clone(), vec![[0, 1, 2]]).unwrap();
    /// assert_eq!(mesh.triangle_count(), 1);
    ///
    /// let broken = Mesh::new("tri", positions, vec![[0, 1, 3]]);
    /// assert!(matches!(broken, Err(MeshError::IndexOutOfBounds { index: 3, .. })));
    /// ```
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Point3>,
        indices: Vec<[u32; 3]>,
    ) -> Result<Mesh, MeshError> {
        let vertex_count = positions.len();
        for (triangle, face) in indices.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfBounds {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Mesh {
            id: MeshId::next(),
            name: name.into(),
            aabb: Aabb::from_points(&positions),
            positions,
            normals: Vec::new(),
            tex_coords: Vec::new(),
            indices,
        })
    }

    /// Attaches one normal per vertex. Normals are used for shading frames and need
    /// not be normalized.
    pub fn with_normals(mut self, normals: Vec<Vector3>) -> Result<Mesh, MeshError> {
        self.check_attribute_count("normal", normals.len())?;
        self.normals = normals;
        Ok(self)
    }

    /// Attaches one texture coordinate per vertex.
    pub fn with_tex_coords(mut self, tex_coords: Vec<Point2>) -> Result<Mesh, MeshError> {
        self.check_attribute_count("texture coordinate", tex_coords.len())?;
        self.tex_coords = tex_coords;
        Ok(self)
    }

    fn check_attribute_count(
        &self,
        attribute: &'static str,
        actual: usize,
    ) -> Result<(), MeshError> {
        if actual == self.positions.len() {
            Ok(())
        } else {
            Err(MeshError::AttributeCountMismatch {
                attribute,
                expected: self.positions.len(),
                actual,
            })
        }
    }

    /// The identity used to tell meshes apart.
    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn vertex_positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Per-vertex normals, empty if the mesh has none.
    pub fn vertex_normals(&self) -> &[Vector3] {
        &self.normals
    }

    /// Per-vertex texture coordinates, empty if the mesh has none.
    pub fn vertex_tex_coords(&self) -> &[Point2] {
        &self.tex_coords
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Returns the vertex indices of triangle `index`.
    #[inline]
    pub fn triangle_indices(&self, index: usize) -> [usize; 3] {
        let [i0, i1, i2] = self.indices[index];
        [i0 as usize, i1 as usize, i2 as usize]
    }

    /// Returns the three corner positions of triangle `index`.
    #[inline]
    pub fn triangle_vertices(&self, index: usize) -> [Point3; 3] {
        let [i0, i1, i2] = self.triangle_indices(index);
        [self.positions[i0], self.positions[i1], self.positions[i2]]
    }

    /// Returns the bounding box of triangle `index`.
    pub fn triangle_aabb(&self, index: usize) -> Aabb {
        Aabb::from_points(&self.triangle_vertices(index))
    }

    /// Returns the centroid of triangle `index`.
    pub fn centroid(&self, index: usize) -> Point3 {
        let [p0, p1, p2] = self.triangle_vertices(index);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Returns the area of triangle `index`.
    pub fn surface_area(&self, index: usize) -> Real {
        let [p0, p1, p2] = self.triangle_vertices(index);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Intersects `ray` with triangle `index`. On a hit, returns the ray parameter and the
    /// barycentric coordinates `(u, v)` of the hit point.
    pub fn ray_intersect(&self, index: usize, ray: &Ray) -> Option<TriangleHit> {
        let [p0, p1, p2] = self.triangle_vertices(index);
        ray.intersects_triangle(&p0, &p1, &p2)
    }
}

impl Bounded for Mesh {
    fn aabb(&self) -> Aabb {
        self.aabb
    }
}
