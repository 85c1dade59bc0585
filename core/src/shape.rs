//! Shapes

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use std::sync::Arc;

/// Shape interface.
pub trait Shape {
    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns the closest hit along the ray within `(0, r.t_max)`, if any.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &Ray) -> Option<ShapeIntersection>;

    /// Returns `true` if the ray hits the shape within `(0, r.t_max)`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.intersect(r).is_some()
    }

    /// Returns the surface area.
    fn area(&self) -> Float;

    /// Uniformly sample a point on the surface by area. Returns the point and
    /// the unit geometric normal there.
    ///
    /// * `u` - Sample value to use.
    fn sample(&self, u: &Point2f) -> (Point3f, Normal3f);
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape + Send + Sync>;
