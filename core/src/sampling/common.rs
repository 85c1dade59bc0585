//! Common sampling functions.

use crate::geometry::*;
use crate::pbrt::*;

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let ox = 2.0 * u.x - 1.0;
    let oy = 2.0 * u.y - 1.0;

    // Handle degeneracy at the origin.
    if ox == 0.0 && oy == 0.0 {
        return Point2f::zero();
    }

    // Apply concentric mapping to point
    let (r, theta) = if abs(ox) > abs(oy) {
        (ox, PI_OVER_FOUR * (oy / ox))
    } else {
        (oy, PI_OVER_TWO - PI_OVER_FOUR * (ox / oy))
    };

    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Returns the area density of `concentric_sample_disk` scaled to a disk
/// with the given inverse squared radius.
///
/// * `inv_radius_sqr` - 1 / radius^2 of the disk.
#[inline]
pub fn concentric_disk_pdf_a(inv_radius_sqr: Float) -> Float {
    inv_radius_sqr * INV_PI
}

/// Sample a direction on a hemisphere using cosine-weighted sampling.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted sampling a direction from a hemisphere.
///
/// * `cos_theta` - Cosine term of incident radiance.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    max(0.0, cos_theta) * INV_PI
}

/// Sample a direction around the `z` axis from a normalized `cos^n` lobe.
///
/// * `u` - The random sample point.
/// * `n` - Exponent of the lobe.
pub fn power_cos_sample_hemisphere(u: &Point2f, n: Float) -> Vector3f {
    let phi = TWO_PI * u[0];
    let cos_theta = u[1].powf(1.0 / (n + 1.0));
    let sin_theta = max(0.0, 1.0 - cos_theta * cos_theta).sqrt();
    Vector3f::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Returns the PDF of `power_cos_sample_hemisphere`.
///
/// * `cos_theta` - Cosine between the direction and the lobe axis.
/// * `n`         - Exponent of the lobe.
#[inline]
pub fn power_cos_hemisphere_pdf(cos_theta: Float, n: Float) -> Float {
    if cos_theta <= 0.0 {
        0.0
    } else {
        (n + 1.0) * INV_TWO_PI * cos_theta.powf(n)
    }
}

/// Converts a solid angle density at one vertex into an area density at the
/// vertex the direction points to.
///
/// * `pdf_w`     - Solid angle density.
/// * `distance`  - Distance between the two vertices.
/// * `cos_there` - Cosine at the target vertex.
#[inline]
pub fn pdf_w_to_a(pdf_w: Float, distance: Float, cos_there: Float) -> Float {
    pdf_w * abs(cos_there) / (distance * distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn concentric_disk_stays_inside(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let d = concentric_sample_disk(&Point2f::new(u0, u1));
            prop_assert!(d.x * d.x + d.y * d.y <= 1.0 + 1e-5);
        }

        #[test]
        fn cosine_hemisphere_is_unit_and_upper(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let w = cosine_sample_hemisphere(&Point2f::new(u0, u1));
            prop_assert!(w.z >= 0.0);
            prop_assert!(approx_eq!(Float, w.length(), 1.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn power_cos_pdf_integrates_to_one() {
        // Midpoint rule over theta for a few exponents.
        for &n in &[1.0, 10.0, 50.0] {
            let steps = 4000;
            let d_theta = PI_OVER_TWO / steps as Float;
            let integral: Float = (0..steps)
                .map(|i| {
                    let theta = (i as Float + 0.5) * d_theta;
                    power_cos_hemisphere_pdf(theta.cos(), n) * theta.sin() * TWO_PI * d_theta
                })
                .sum();
            assert!(approx_eq!(Float, integral, 1.0, epsilon = 1e-2));
        }
    }
}
