//! 3-D normals

use super::{Dot, Vector3, Vector3f};
use crate::pbrt::*;
use num_traits::Num;
use std::ops::{Mul, Neg};

/// A 3-D surface normal containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normal3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D normal containing `Float` values.
pub type Normal3f = Normal3<Float>;

impl<T: Num + Copy> Normal3<T> {
    /// Creates a new 3-D normal.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl Normal3f {
    /// Returns the unit normal.
    pub fn normalize(&self) -> Self {
        let v = Vector3f::from(*self).normalize();
        Self::new(v.x, v.y, v.z)
    }

    /// Returns the normal flipped, if necessary, to lie in the same hemisphere as the given vector.
    ///
    /// * `v` - The reference vector.
    pub fn face_forward(&self, v: &Vector3f) -> Self {
        if self.dot(v) < 0.0 {
            -*self
        } else {
            *self
        }
    }
}

impl<T: Num + Copy> Dot<Vector3<T>> for Normal3<T> {
    type Output = T;

    /// Returns the dot product with a vector.
    ///
    /// * `other` - The vector.
    fn dot(&self, other: &Vector3<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl<T: Num + Copy> Dot<Normal3<T>> for Vector3<T> {
    type Output = T;

    /// Returns the dot product with a normal.
    ///
    /// * `n` - The normal.
    fn dot(&self, n: &Normal3<T>) -> T {
        self.x * n.x + self.y * n.y + self.z * n.z
    }
}

impl<T: Num + Neg<Output = T> + Copy> Neg for Normal3<T> {
    type Output = Self;

    /// Flip the normal's direction.
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T: Num + Copy> Mul<T> for Normal3<T> {
    type Output = Self;

    /// Scale the normal.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl From<Vector3f> for Normal3f {
    /// Convert a vector to a normal.
    ///
    /// * `v` - The vector.
    fn from(v: Vector3f) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Normal3f> for Vector3f {
    /// Convert a normal to a vector.
    ///
    /// * `n` - The normal.
    fn from(n: Normal3f) -> Self {
        Self::new(n.x, n.y, n.z)
    }
}
