//! Point Light Source

use vcm_core::geometry::*;
use vcm_core::light::*;
use vcm_core::pbrt::*;
use vcm_core::sampling::*;
use vcm_core::spectrum::*;

/// Implements an isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Clone, Debug)]
pub struct PointLight {
    /// Position.
    pub p_light: Point3f,

    /// Intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `p_light`   - Position.
    /// * `intensity` - Intensity.
    pub fn new(p_light: Point3f, intensity: Spectrum) -> Self {
        Self { p_light, intensity }
    }
}

impl Light for PointLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        LightType::DELTA_POSITION_LIGHT
    }

    /// The solid angle "density" of a delta light is the squared distance so
    /// that `intensity / direct_pdf_w` gives the incident radiance.
    ///
    /// * `receiving` - The point receiving light.
    /// * `_u`        - Unused.
    fn illuminate(&self, receiving: &Point3f, _u: &Point2f) -> Option<Illumination> {
        let to_light = self.p_light - *receiving;
        let dist_sqr = to_light.length_squared();
        if dist_sqr == 0.0 {
            return None;
        }
        let distance = dist_sqr.sqrt();

        Some(Illumination {
            radiance: self.intensity,
            wi: to_light / distance,
            distance,
            direct_pdf_w: dist_sqr,
            emission_pdf_w: uniform_sphere_pdf(),
            cos_at_light: 1.0,
        })
    }

    /// Returns a ray leaving the light in a uniformly sampled direction.
    ///
    /// * `u_dir` - Sample value for the direction.
    /// * `_u_pos` - Unused.
    fn emit(&self, u_dir: &Point2f, _u_pos: &Point2f) -> Option<Emission> {
        Some(Emission {
            origin: self.p_light,
            direction: uniform_sample_sphere(u_dir),
            energy: self.intensity,
            emission_pdf_w: uniform_sphere_pdf(),
            direct_pdf_a: 1.0,
            cos_at_light: 1.0,
        })
    }

    /// Point lights cannot be hit.
    fn radiance(&self, _ray_dir: &Vector3f, _hit_point: &Point3f) -> Option<LightRadiance> {
        None
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        FOUR_PI * self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn inverse_square_falloff() {
        let light = PointLight::new(Point3f::new(0.0, 2.0, 0.0), Spectrum::new(4.0));
        let ill = light.illuminate(&Point3f::zero(), &Point2f::zero()).unwrap();
        let incident = ill.radiance / ill.direct_pdf_w;
        assert!(approx_eq!(f32, incident[0], 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, ill.wi.y, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, ill.distance, 2.0, epsilon = 1e-6));
        assert!(light.is_delta());
        assert!(light.is_finite());
    }

    #[test]
    fn coincident_receiver_gets_nothing() {
        let light = PointLight::new(Point3f::zero(), Spectrum::new(1.0));
        assert!(light.illuminate(&Point3f::zero(), &Point2f::zero()).is_none());
        assert!(light.radiance(&Vector3f::new(0.0, 0.0, 1.0), &Point3f::zero()).is_none());
    }
}
