//! Spheres

use vcm_core::geometry::*;
use vcm_core::interaction::*;
use vcm_core::pbrt::*;
use vcm_core::sampling::*;
use vcm_core::shape::*;

/// A sphere with outward facing normals.
#[derive(Clone, Debug)]
pub struct Sphere {
    /// Center.
    pub center: Point3f,

    /// Radius of sphere.
    pub radius: Float,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `center` - Center.
    /// * `radius` - Radius of sphere.
    pub fn new(center: Point3f, radius: Float) -> Self {
        if radius <= 0.0 {
            warn!("Sphere radius {} is not positive", radius);
        }
        Self { center, radius }
    }
}

impl Shape for Sphere {
    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    /// Returns the closest hit along the ray, if any.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &Ray) -> Option<ShapeIntersection> {
        let o = r.o - self.center;
        let a = r.d.length_squared();
        let b = 2.0 * r.d.dot(&o);
        let c = o.length_squared() - self.radius * self.radius;

        let (t0, t1) = solve_quadratic(a, b, c)?;
        if t0 >= r.t_max || t1 <= 0.0 {
            return None;
        }

        let t = if t0 > 0.0 { t0 } else { t1 };
        if t >= r.t_max {
            return None;
        }

        let n = Normal3f::from((r.at(t) - self.center) / self.radius);
        Some(ShapeIntersection::new(t, n.normalize()))
    }

    /// Returns the surface area.
    fn area(&self) -> Float {
        FOUR_PI * self.radius * self.radius
    }

    /// Uniformly sample a point on the surface.
    ///
    /// * `u` - Sample value to use.
    fn sample(&self, u: &Point2f) -> (Point3f, Normal3f) {
        let d = uniform_sample_sphere(u);
        (self.center + d * self.radius, Normal3f::from(d))
    }
}

/// Solve the quadratic equation a * x ^ 2  + b * x + c = 0. Returns the roots
/// in ascending order.
///
/// * `a` - Coefficient of x ^ 2 term.
/// * `b` - Coefficient of x term.
/// * `c` - Constant term.
fn solve_quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let a = a as f64;
    let b = b as f64;
    let c = c as f64;

    let discrim = b * b - 4.0 * a * c;
    if discrim < 0.0 || a == 0.0 {
        return None;
    }

    let root_discrim = discrim.sqrt();
    let q = if b < 0.0 {
        -0.5 * (b - root_discrim)
    } else {
        -0.5 * (b + root_discrim)
    };

    let (t0, t1) = if q == 0.0 {
        (0.0, 0.0)
    } else {
        ((q / a) as Float, (c / q) as Float)
    };
    Some(if t0 > t1 { (t1, t0) } else { (t0, t1) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn ray_from_outside_hits_near_side() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0);
        let hit = sphere
            .intersect(&Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), INFINITY))
            .unwrap();
        assert!(approx_eq!(f32, hit.t, 4.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, hit.n.z, -1.0, epsilon = 1e-5));
    }

    #[test]
    fn ray_from_inside_hits_far_side() {
        let sphere = Sphere::new(Point3f::zero(), 2.0);
        let hit = sphere
            .intersect(&Ray::new(Point3f::zero(), Vector3f::new(1.0, 0.0, 0.0), INFINITY))
            .unwrap();
        assert!(approx_eq!(f32, hit.t, 2.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, hit.n.x, 1.0, epsilon = 1e-5));
    }

    #[test]
    fn quadratic_without_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_none());
        assert_eq!(solve_quadratic(1.0, -3.0, 2.0), Some((1.0, 2.0)));
    }

    proptest! {
        #[test]
        fn samples_lie_on_surface(u0 in 0.0f32..1.0, u1 in 0.0f32..1.0) {
            let sphere = Sphere::new(Point3f::new(1.0, -2.0, 3.0), 0.5);
            let (p, n) = sphere.sample(&Point2f::new(u0, u1));
            prop_assert!(approx_eq!(f32, p.distance(&sphere.center), 0.5, epsilon = 1e-5));
            let outward = (p - sphere.center) / 0.5;
            prop_assert!(approx_eq!(f32, n.dot(&outward), 1.0, epsilon = 1e-4));
        }
    }
}
