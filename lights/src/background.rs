//! Constant Environment Light

use vcm_core::geometry::*;
use vcm_core::light::*;
use vcm_core::pbrt::*;
use vcm_core::sampling::*;
use vcm_core::spectrum::*;

/// A constant radiance environment surrounding the scene. Emitted rays start on
/// a disk tangent to the scene bounding sphere.
#[derive(Clone, Debug)]
pub struct BackgroundLight {
    /// Radiance arriving from every direction.
    pub l_emit: Spectrum,

    /// Bounding sphere of the scene.
    pub scene_sphere: BoundingSphere,
}

impl BackgroundLight {
    /// Create a new `BackgroundLight`.
    ///
    /// * `l_emit`       - Radiance arriving from every direction.
    /// * `scene_sphere` - Bounding sphere of the scene.
    pub fn new(l_emit: Spectrum, scene_sphere: BoundingSphere) -> Self {
        if scene_sphere.radius <= 0.0 {
            warn!("Background light with degenerate scene sphere");
        }
        Self { l_emit, scene_sphere }
    }

    /// Returns the area density of the emitted ray origin on the disk.
    fn position_pdf(&self) -> Float {
        concentric_disk_pdf_a(self.scene_sphere.inv_radius_sqr)
    }
}

impl Light for BackgroundLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        LightType::INFINITE_LIGHT
    }

    /// Samples a uniform direction over the sphere.
    ///
    /// * `_receiving` - Unused.
    /// * `u`          - Sample value for the direction.
    fn illuminate(&self, _receiving: &Point3f, u: &Point2f) -> Option<Illumination> {
        let direct_pdf_w = uniform_sphere_pdf();
        Some(Illumination {
            radiance: self.l_emit,
            wi: uniform_sample_sphere(u),
            distance: INFINITY,
            direct_pdf_w,
            emission_pdf_w: direct_pdf_w * self.position_pdf(),
            cos_at_light: 1.0,
        })
    }

    /// Samples an incoming direction and a ray origin on the disk facing it.
    ///
    /// * `u_dir` - Sample value for the direction.
    /// * `u_pos` - Sample value for the position on the disk.
    fn emit(&self, u_dir: &Point2f, u_pos: &Point2f) -> Option<Emission> {
        let direction = -uniform_sample_sphere(u_dir);
        let frame = Frame::from_z(&direction);
        let xy = concentric_sample_disk(u_pos);
        let r = self.scene_sphere.radius;
        let origin = self.scene_sphere.center + (frame.x * xy.x + frame.y * xy.y - direction) * r;

        let direct_pdf = uniform_sphere_pdf();
        Some(Emission {
            origin,
            direction,
            energy: self.l_emit,
            emission_pdf_w: direct_pdf * self.position_pdf(),
            direct_pdf_a: direct_pdf,
            cos_at_light: 1.0,
        })
    }

    /// Returns the environment radiance for an escaped ray.
    ///
    /// * `_ray_dir`   - Unused; radiance is constant.
    /// * `_hit_point` - Unused.
    fn radiance(&self, _ray_dir: &Vector3f, _hit_point: &Point3f) -> Option<LightRadiance> {
        let direct_pdf_a = uniform_sphere_pdf();
        Some(LightRadiance {
            radiance: self.l_emit,
            direct_pdf_a,
            emission_pdf_w: direct_pdf_a * self.position_pdf(),
        })
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        let r = self.scene_sphere.radius;
        self.l_emit * (PI * FOUR_PI * r * r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn sky() -> BackgroundLight {
        BackgroundLight::new(Spectrum::new(1.0), BoundingSphere::new(Point3f::new(1.0, 0.0, 0.0), 2.0))
    }

    #[test]
    fn is_infinite_and_not_delta() {
        let light = sky();
        assert!(!light.is_finite());
        assert!(!light.is_delta());
    }

    proptest! {
        #[test]
        fn emitted_rays_start_outside_and_enter_the_sphere(d0 in 0.0f32..1.0, d1 in 0.0f32..1.0, p0 in 0.0f32..1.0, p1 in 0.0f32..1.0) {
            let light = sky();
            let e = light.emit(&Point2f::new(d0, d1), &Point2f::new(p0, p1)).unwrap();
            let to_center = light.scene_sphere.center - e.origin;
            prop_assert!(approx_eq!(f32, e.direction.length(), 1.0, epsilon = 1e-4));
            // Origin is on the disk tangent to the sphere, one radius behind the center.
            prop_assert!(approx_eq!(f32, to_center.dot(&e.direction), 2.0, epsilon = 1e-3));
            prop_assert!(approx_eq!(f32, e.emission_pdf_w, INV_FOUR_PI * 0.25 * INV_PI, epsilon = 1e-6));
        }
    }
}
