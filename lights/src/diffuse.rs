//! Diffuse Area Lights

use shapes::Quad;
use vcm_core::geometry::*;
use vcm_core::light::*;
use vcm_core::pbrt::*;
use vcm_core::sampling::*;
use vcm_core::shape::*;
use vcm_core::spectrum::*;

/// Implements a one-sided quad emitter with uniform radiance. Light leaves
/// the side the quad's normal points to.
#[derive(Clone, Debug)]
pub struct DiffuseAreaLight {
    /// The emitting quad.
    pub quad: Quad,

    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Local frame around the quad normal.
    frame: Frame,

    /// Reciprocal of the quad area.
    inv_area: Float,
}

impl DiffuseAreaLight {
    /// Create a new `DiffuseAreaLight`.
    ///
    /// * `quad`   - The emitting quad.
    /// * `l_emit` - Emitted radiance.
    pub fn new(quad: Quad, l_emit: Spectrum) -> Self {
        let area = quad.area();
        if area == 0.0 {
            warn!("Area light has zero area and will not emit");
        }
        Self {
            frame: Frame::from_z(&Vector3f::from(quad.n)),
            inv_area: if area > 0.0 { 1.0 / area } else { 0.0 },
            quad,
            l_emit,
        }
    }
}

impl Light for DiffuseAreaLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        LightType::AREA_LIGHT
    }

    /// Samples a point uniformly on the quad.
    ///
    /// * `receiving` - The point receiving light.
    /// * `u`         - Sample value for the position.
    fn illuminate(&self, receiving: &Point3f, u: &Point2f) -> Option<Illumination> {
        if self.inv_area == 0.0 {
            return None;
        }

        let (p, n) = self.quad.sample(u);
        let to_light = p - *receiving;
        let dist_sqr = to_light.length_squared();
        let distance = dist_sqr.sqrt();
        let wi = to_light / distance;

        let cos_at_light = -n.dot(&wi);
        if !(cos_at_light > COSINE_EPSILON) {
            return None;
        }

        Some(Illumination {
            radiance: self.l_emit,
            wi,
            distance,
            direct_pdf_w: self.inv_area * dist_sqr / cos_at_light,
            emission_pdf_w: self.inv_area * cos_at_light * INV_PI,
            cos_at_light,
        })
    }

    /// Samples a position uniformly and a cosine weighted direction.
    ///
    /// * `u_dir` - Sample value for the direction.
    /// * `u_pos` - Sample value for the position.
    fn emit(&self, u_dir: &Point2f, u_pos: &Point2f) -> Option<Emission> {
        if self.inv_area == 0.0 {
            return None;
        }

        let (origin, _) = self.quad.sample(u_pos);
        let mut local = cosine_sample_hemisphere(u_dir);
        let emission_pdf_w = cosine_hemisphere_pdf(local.z) * self.inv_area;
        if emission_pdf_w == 0.0 {
            return None;
        }
        local.z = max(local.z, COSINE_EPSILON);

        Some(Emission {
            origin,
            direction: self.frame.to_world(&local),
            energy: self.l_emit * local.z,
            emission_pdf_w,
            direct_pdf_a: self.inv_area,
            cos_at_light: local.z,
        })
    }

    /// Returns emitted radiance if the ray arrives at the front side.
    ///
    /// * `ray_dir`    - Direction of the ray that hit the light.
    /// * `_hit_point` - Unused; emission is uniform over the quad.
    fn radiance(&self, ray_dir: &Vector3f, _hit_point: &Point3f) -> Option<LightRadiance> {
        let cos_out = -self.quad.n.dot(ray_dir);
        if cos_out <= 0.0 || self.inv_area == 0.0 {
            return None;
        }

        Some(LightRadiance {
            radiance: self.l_emit,
            direct_pdf_a: self.inv_area,
            emission_pdf_w: cosine_hemisphere_pdf(cos_out) * self.inv_area,
        })
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        self.l_emit * (PI * self.quad.area())
    }
}
