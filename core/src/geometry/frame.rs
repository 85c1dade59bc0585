//! Orthonormal frames

use super::{Cross, Dot, Vector3f};
use crate::pbrt::*;

/// An orthonormal basis used to move directions between world space and a local
/// space where `z` is the surface normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// Tangent.
    pub x: Vector3f,

    /// Bitangent.
    pub y: Vector3f,

    /// Normal.
    pub z: Vector3f,
}

impl Frame {
    /// Builds a frame around a unit vector.
    ///
    /// * `z` - Unit vector that becomes the local z-axis.
    pub fn from_z(z: &Vector3f) -> Self {
        let (x, y) = coordinate_system(z);
        Self { x, y, z: *z }
    }

    /// Transform a world space direction into the local frame.
    ///
    /// * `v` - World space direction.
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    /// Transform a local direction into world space.
    ///
    /// * `v` - Local direction.
    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
}

/// Construct a local coordinate system given a unit vector. Returns the two
/// remaining axes.
///
/// * `v1` - The unit vector.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}
