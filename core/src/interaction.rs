//! Interactions

use crate::geometry::*;
use crate::pbrt::*;

/// Geometric details of a ray hitting a shape.
#[derive(Copy, Clone, Debug)]
pub struct ShapeIntersection {
    /// Parametric distance along the ray.
    pub t: Float,

    /// Unit geometric normal on the side the shape considers its front.
    pub n: Normal3f,
}

impl ShapeIntersection {
    /// Create a new `ShapeIntersection`.
    ///
    /// * `t` - Parametric distance along the ray.
    /// * `n` - Unit geometric normal.
    pub fn new(t: Float, n: Normal3f) -> Self {
        Self { t, n }
    }
}

/// A ray hitting a scene primitive.
#[derive(Copy, Clone, Debug)]
pub struct SurfaceInteraction {
    /// Hit point.
    pub p: Point3f,

    /// Unit geometric normal.
    pub n: Normal3f,

    /// Distance from the ray origin.
    pub t: Float,

    /// Index of the primitive in the scene.
    pub primitive: usize,
}

impl SurfaceInteraction {
    /// Create a new `SurfaceInteraction`.
    ///
    /// * `ray`       - The ray that hit the primitive.
    /// * `hit`       - Shape intersection details.
    /// * `primitive` - Index of the primitive in the scene.
    pub fn new(ray: &Ray, hit: &ShapeIntersection, primitive: usize) -> Self {
        Self {
            p: ray.at(hit.t),
            n: hit.n,
            t: hit.t,
            primitive,
        }
    }
}
