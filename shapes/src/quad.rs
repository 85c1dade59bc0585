//! Quads

use vcm_core::geometry::*;
use vcm_core::interaction::*;
use vcm_core::pbrt::*;
use vcm_core::shape::*;

/// A parallelogram spanned by two edges from a corner. The front face is the
/// side the normal `e1 x e2` points to.
#[derive(Clone, Debug)]
pub struct Quad {
    /// Corner.
    pub p0: Point3f,

    /// First edge.
    pub e1: Vector3f,

    /// Second edge.
    pub e2: Vector3f,

    /// Unit geometric normal.
    pub n: Normal3f,

    /// Unnormalized normal `e1 x e2`.
    n_raw: Vector3f,

    /// Reciprocal of `|e1 x e2|^2`.
    inv_n_raw_sqr: Float,
}

impl Quad {
    /// Create a new `Quad`.
    ///
    /// * `p0` - Corner.
    /// * `e1` - First edge.
    /// * `e2` - Second edge.
    pub fn new(p0: Point3f, e1: Vector3f, e2: Vector3f) -> Self {
        let n_raw = e1.cross(&e2);
        let len_sqr = n_raw.length_squared();
        if len_sqr == 0.0 {
            warn!("Degenerate quad at ({}, {}, {})", p0.x, p0.y, p0.z);
        }
        Self {
            p0,
            e1,
            e2,
            n: Normal3f::from(n_raw.normalize()),
            n_raw,
            inv_n_raw_sqr: if len_sqr > 0.0 { 1.0 / len_sqr } else { 0.0 },
        }
    }
}

impl Shape for Quad {
    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f {
        Bounds3f::new(self.p0, self.p0 + self.e1)
            .union_point(&(self.p0 + self.e2))
            .union_point(&(self.p0 + self.e1 + self.e2))
    }

    /// Returns the closest hit along the ray, if any.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &Ray) -> Option<ShapeIntersection> {
        let denom = self.n_raw.dot(&r.d);
        if denom == 0.0 || self.inv_n_raw_sqr == 0.0 {
            return None;
        }

        let t = self.n_raw.dot(&(self.p0 - r.o)) / denom;
        if t <= 0.0 || t >= r.t_max {
            return None;
        }

        // Solve q = u * e1 + v * e2 in the plane.
        let q = r.at(t) - self.p0;
        let u = q.cross(&self.e2).dot(&self.n_raw) * self.inv_n_raw_sqr;
        let v = self.e1.cross(&q).dot(&self.n_raw) * self.inv_n_raw_sqr;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        Some(ShapeIntersection::new(t, self.n))
    }

    /// Returns the surface area.
    fn area(&self) -> Float {
        self.n_raw.length()
    }

    /// Uniformly sample a point on the surface.
    ///
    /// * `u` - Sample value to use.
    fn sample(&self, u: &Point2f) -> (Point3f, Normal3f) {
        (self.p0 + self.e1 * u[0] + self.e2 * u[1], self.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn floor_quad() -> Quad {
        Quad::new(
            Point3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(2.0, 0.0, 0.0),
        )
    }

    #[test]
    fn normal_follows_edge_order() {
        let quad = floor_quad();
        assert!(approx_eq!(f32, quad.n.y, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, quad.area(), 4.0, epsilon = 1e-6));
    }

    #[test]
    fn ray_misses_outside_and_beyond_t_max() {
        let quad = floor_quad();
        let down = Vector3f::new(0.0, -1.0, 0.0);
        assert!(quad.intersect(&Ray::new(Point3f::new(1.5, 1.0, 0.0), down, INFINITY)).is_none());
        assert!(quad.intersect(&Ray::new(Point3f::new(0.0, 1.0, 0.0), down, 0.5)).is_none());
        assert!(quad.intersect(&Ray::new(Point3f::new(0.0, 1.0, 0.0), -down, INFINITY)).is_none());
    }

    #[test]
    fn bound_contains_all_corners() {
        let quad = floor_quad();
        let b = quad.world_bound();
        assert!(b.inside(&Point3f::new(1.0, 0.0, 1.0)));
        assert!(b.inside(&Point3f::new(-1.0, 0.0, -1.0)));
    }

    proptest! {
        #[test]
        fn vertical_rays_hit_sampled_points(u in 0.01f32..0.99, v in 0.01f32..0.99) {
            let quad = floor_quad();
            let (p, n) = quad.sample(&Point2f::new(u, v));
            let ray = Ray::new(p + Vector3f::new(0.0, 2.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), INFINITY);
            let hit = quad.intersect(&ray);
            prop_assert!(hit.is_some());
            if let Some(hit) = hit {
                prop_assert!(approx_eq!(f32, hit.t, 2.0, epsilon = 1e-4));
                prop_assert!(approx_eq!(f32, hit.n.y, n.y, epsilon = 1e-6));
            }
        }
    }
}
