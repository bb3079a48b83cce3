//! Orthonormal frames attached to surface points.

use crate::{Real, Vector3};

/// A right-handed orthonormal basis `(s, t, n)`, where `n` is the surface normal and
/// `s`, `t` span the tangent plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// First tangent.
    pub s: Vector3,
    /// Second tangent.
    pub t: Vector3,
    /// Normal.
    pub n: Vector3,
}

impl Default for Frame {
    fn default() -> Frame {
        Frame {
            s: Vector3::x(),
            t: Vector3::y(),
            n: Vector3::z(),
        }
    }
}

impl Frame {
    /// Builds a frame around the unit normal `n`. The tangents are derived from the
    /// larger of the normal's x and y components, which keeps them well conditioned.
    ///
    /// # Examples
    /// ```
    /// use octree_accel::frame::Frame;
    /// use octree_accel::Vector3;
    ///
    /// let frame = Frame::from_normal(Vector3::new(0.0, 0.0, 1.0));
    /// assert!(frame.s.dot(&frame.n).abs() < 1e-6);
    /// assert!(frame.t.dot(&frame.n).abs() < 1e-6);
    /// assert!(frame.s.cross(&frame.t).dot(&frame.n) > 0.0);
    /// ```
    pub fn from_normal(n: Vector3) -> Frame {
        let t = if n.x.abs() > n.y.abs() {
            let inv_len = 1.0 / (n.x * n.x + n.z * n.z).sqrt();
            Vector3::new(n.z * inv_len, 0.0, -n.x * inv_len)
        } else {
            let inv_len = 1.0 / (n.y * n.y + n.z * n.z).sqrt();
            Vector3::new(0.0, n.z * inv_len, -n.y * inv_len)
        };
        Frame {
            s: t.cross(&n),
            t,
            n,
        }
    }

    /// Expresses the world-space vector `v` in this frame.
    pub fn to_local(&self, v: &Vector3) -> Vector3 {
        Vector3::new(v.dot(&self.s), v.dot(&self.t), v.dot(&self.n))
    }

    /// Converts the frame-local vector `v` back to world space.
    pub fn to_world(&self, v: &Vector3) -> Vector3 {
        self.s * v.x + self.t * v.y + self.n * v.z
    }

    /// Cosine of the angle between the local vector `v` and the normal.
    pub fn cos_theta(v: &Vector3) -> Real {
        v.z
    }
}
