//! 3-D axis aligned bounding boxes

use super::{Point3f, Vector3f};
use crate::pbrt::*;

/// A 3-D axis aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum corner.
    pub p_min: Point3f,

    /// Maximum corner.
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    /// Returns an empty bounding box; the union of it with any point is that point.
    fn default() -> Self {
        Self {
            p_min: Point3f::new(INFINITY, INFINITY, INFINITY),
            p_max: Point3f::new(-INFINITY, -INFINITY, -INFINITY),
        }
    }
}

impl Bounds3f {
    /// Creates a new bounding box enclosing two points.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns true if the box contains no points.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// Returns a bounding box that also encloses the given point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns a bounding box enclosing both boxes.
    ///
    /// * `b` - The other bounding box.
    pub fn union(&self, b: &Self) -> Self {
        Self {
            p_min: self.p_min.min(&b.p_min),
            p_max: self.p_max.max(&b.p_max),
        }
    }

    /// Pads the bounding box by a constant factor in all dimensions.
    ///
    /// * `delta` - Padding amount.
    pub fn expand(&self, delta: Float) -> Self {
        let d = Vector3f::new(delta, delta, delta);
        Self {
            p_min: self.p_min - d,
            p_max: self.p_max + d,
        }
    }

    /// Returns true if the point lies inside or on the boundary of the box.
    ///
    /// * `p` - The point.
    pub fn inside(&self, p: &Point3f) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }

    /// Returns the vector from the minimum to the maximum corner.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the sphere that bounds the box.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let center = (self.p_min + self.p_max) * 0.5;
        let radius = if self.inside(&center) {
            center.distance(&self.p_max)
        } else {
            0.0
        };
        BoundingSphere::new(center, radius)
    }
}

/// A sphere bounding the scene; used by lights at infinity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingSphere {
    /// Center of the sphere.
    pub center: Point3f,

    /// Radius of the sphere.
    pub radius: Float,

    /// 1 / radius^2.
    pub inv_radius_sqr: Float,
}

impl BoundingSphere {
    /// Creates a new bounding sphere.
    ///
    /// * `center` - Center.
    /// * `radius` - Radius.
    pub fn new(center: Point3f, radius: Float) -> Self {
        Self {
            center,
            radius,
            inv_radius_sqr: if radius > 0.0 { 1.0 / (radius * radius) } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn union_of_points() {
        let b = Bounds3f::default()
            .union_point(&Point3f::new(1.0, -2.0, 3.0))
            .union_point(&Point3f::new(-1.0, 2.0, 0.0));
        assert_eq!(b.p_min, Point3f::new(-1.0, -2.0, 0.0));
        assert_eq!(b.p_max, Point3f::new(1.0, 2.0, 3.0));
        assert!(!b.is_empty());
        assert!(Bounds3f::default().is_empty());
    }

    #[test]
    fn expand_and_inside() {
        let b = Bounds3f::new(Point3f::zero(), Point3f::new(1.0, 1.0, 1.0)).expand(0.5);
        assert!(b.inside(&Point3f::new(-0.5, 1.5, 0.0)));
        assert!(!b.inside(&Point3f::new(-0.6, 0.0, 0.0)));
    }

    #[test]
    fn bounding_sphere_encloses_corners() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let s = b.bounding_sphere();
        assert_eq!(s.center, Point3f::zero());
        assert!(approx_eq!(Float, s.radius, (3.0 as Float).sqrt(), epsilon = 1e-6));
        assert!(approx_eq!(Float, s.inv_radius_sqr, 1.0 / 3.0, epsilon = 1e-6));
    }
}
