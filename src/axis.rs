//! Axis enum for indexing three-dimensional structures.

use crate::{Point3, Real};
use std::ops::{Index, IndexMut};

/// An `Axis` in a three-dimensional coordinate system.
/// Used to access `Point3` structs via index, and to decode
/// octant numbers: bit `axis as usize` of an octant number selects the
/// upper half along that axis.
///
/// # Examples
/// ```
/// use octree_accel::axis::Axis;
/// use octree_accel::Point3;
///
/// let mut position = Point3::new(1.0, 2.0, 3.0);
/// position[Axis::X] = 1000.0;
///
/// assert_eq!(position[Axis::X], 1000.0);
/// assert_eq!(Axis::Z.octant_bit(), 0b100);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Index of the X axis.
    X = 0,

    /// Index of the Y axis.
    Y = 1,

    /// Index of the Z axis.
    Z = 2,
}

impl Axis {
    /// All three axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The bit of an octant number that selects the upper half along this axis.
    #[inline]
    pub fn octant_bit(self) -> usize {
        1 << self as usize
    }

    /// Returns true if `octant` lies in the upper half along this axis.
    #[inline]
    pub fn is_upper(self, octant: usize) -> bool {
        octant & self.octant_bit() != 0
    }
}

/// Make `Point3` indexable by `Axis`.
impl Index<Axis> for Point3 {
    type Output = Real;

    fn index(&self, axis: Axis) -> &Real {
        &self[axis as usize]
    }
}

/// Make `Point3` mutably accessible by `Axis`.
impl IndexMut<Axis> for Point3 {
    fn index_mut(&mut self, axis: Axis) -> &mut Real {
        &mut self[axis as usize]
    }
}
