//! Rays

use super::{Point3f, Vector3f};
use crate::pbrt::*;

/// A semi-infinite line specified by its origin and direction.
#[derive(Copy, Clone, Debug, Default)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Restricts the ray to segment [0, t_max].
    pub t_max: Float,
}

impl Ray {
    /// Create a new ray.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `t_max` - Restricts the ray to segment [0, t_max].
    pub fn new(o: Point3f, d: Vector3f, t_max: Float) -> Self {
        Self { o, d, t_max }
    }

    /// Returns a ray leaving a surface point. The origin is nudged along the direction to
    /// avoid re-intersecting the surface it leaves.
    ///
    /// * `p` - Surface point.
    /// * `d` - Unit direction.
    pub fn spawn(p: &Point3f, d: &Vector3f) -> Self {
        Self::new(*p + *d * RAY_EPSILON, *d, INFINITY)
    }

    /// Returns a shadow ray segment from `p` along unit direction `d` that stops just short of
    /// `distance`.
    ///
    /// * `p`        - Surface point.
    /// * `d`        - Unit direction.
    /// * `distance` - Distance to the other end point.
    pub fn segment(p: &Point3f, d: &Vector3f, distance: Float) -> Self {
        Self::new(*p + *d * RAY_EPSILON, *d, distance - 2.0 * RAY_EPSILON)
    }

    /// Returns the position along the ray at given parameter.
    ///
    /// * `t` - The parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}
