//! The record filled in by a closest-hit query.

use crate::frame::Frame;
use crate::mesh::Mesh;
use crate::octree::TriangleRef;
use crate::{Point2, Point3, Real, Vector3};

/// Everything known about the surface point where a ray hit the scene.
///
/// The record is threaded through a traversal as an out-parameter. `t` only ever
/// decreases while a query runs; all other fields describe the hit at distance `t`
/// once the query has returned `true`.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// Ray parameter of the hit. `+inf` until something is hit.
    pub t: Real,

    /// Position of the hit, interpolated from the triangle's vertices.
    pub p: Point3,

    /// Interpolated texture coordinates, or the barycentric `(u, v)` if the mesh has none.
    pub uv: Point2,

    /// Shading frame, following the interpolated vertex normals when the mesh has them.
    pub sh_frame: Frame,

    /// Geometric frame, following the face normal.
    pub geo_frame: Frame,

    /// The mesh that was hit.
    pub mesh: Option<&'a Mesh>,

    /// The triangle that was hit.
    pub triangle: Option<TriangleRef>,
}

impl Default for Intersection<'_> {
    fn default() -> Self {
        Intersection {
            t: Real::INFINITY,
            p: Point3::origin(),
            uv: Point2::origin(),
            sh_frame: Frame::default(),
            geo_frame: Frame::default(),
            mesh: None,
            triangle: None,
        }
    }
}

impl<'a> Intersection<'a> {
    /// Returns true once the record describes an actual hit.
    pub fn is_hit(&self) -> bool {
        self.mesh.is_some()
    }

    /// Expresses the world-space vector `v` in the shading frame.
    pub fn to_local(&self, v: &Vector3) -> Vector3 {
        self.sh_frame.to_local(v)
    }

    /// Converts the shading-frame vector `v` to world space.
    pub fn to_world(&self, v: &Vector3) -> Vector3 {
        self.sh_frame.to_world(v)
    }
}
