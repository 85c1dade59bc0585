//! Light

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::Arc;

mod light_type;

// Re-export
pub use light_type::*;

/// Return value for `Light::illuminate()`.
#[derive(Copy, Clone, Debug)]
pub struct Illumination {
    /// Radiance arriving at the receiving point.
    pub radiance: Spectrum,

    /// Unit direction from the receiving point towards the light.
    pub wi: Vector3f,

    /// Distance to the sampled point on the light.
    pub distance: Float,

    /// Solid angle density of the sample as seen from the receiving point.
    pub direct_pdf_w: Float,

    /// Density of emitting the same ray from the light, as used by `Light::emit()`.
    pub emission_pdf_w: Float,

    /// Cosine at the light between its normal and the direction to the receiving point.
    pub cos_at_light: Float,
}

/// Return value for `Light::emit()`.
#[derive(Copy, Clone, Debug)]
pub struct Emission {
    /// Ray origin on the light.
    pub origin: Point3f,

    /// Unit direction of the emitted ray.
    pub direction: Vector3f,

    /// Emitted energy; radiance times the emission cosine.
    pub energy: Spectrum,

    /// Joint density of the origin and direction (area times solid angle).
    pub emission_pdf_w: Float,

    /// Density of sampling the origin with `Light::illuminate()`, in area measure
    /// (solid angle for lights at infinity).
    pub direct_pdf_a: Float,

    /// Cosine at the light between its normal and the emitted direction.
    pub cos_at_light: Float,
}

/// Return value for `Light::radiance()`.
#[derive(Copy, Clone, Debug)]
pub struct LightRadiance {
    /// Emitted radiance towards the ray origin.
    pub radiance: Spectrum,

    /// Density of sampling the hit point with `Light::illuminate()`.
    pub direct_pdf_a: Float,

    /// Density of emitting the reversed ray with `Light::emit()`.
    pub emission_pdf_w: Float,
}

/// Light trait provides common behavior.
pub trait Light {
    /// Returns the type of light.
    fn get_type(&self) -> LightType;

    /// Samples a point on the light for direct illumination of a receiving point.
    ///
    /// * `receiving` - The point receiving light.
    /// * `u`         - Sample value for Monte Carlo integration.
    fn illuminate(&self, receiving: &Point3f, u: &Point2f) -> Option<Illumination>;

    /// Samples a ray leaving the light.
    ///
    /// * `u_dir` - Sample value for the direction.
    /// * `u_pos` - Sample value for the position.
    fn emit(&self, u_dir: &Point2f, u_pos: &Point2f) -> Option<Emission>;

    /// Returns radiance carried towards the origin of a ray that hit the light.
    ///
    /// * `ray_dir`   - Direction of the ray that hit the light.
    /// * `hit_point` - The hit point; ignored by lights at infinity.
    fn radiance(&self, ray_dir: &Vector3f, hit_point: &Point3f) -> Option<LightRadiance>;

    /// Return the total emitted power.
    fn power(&self) -> Spectrum;

    /// Returns whether light source is a delta light.
    fn is_delta(&self) -> bool {
        self.get_type().is_delta_light()
    }

    /// Returns whether light source is located at a finite distance.
    fn is_finite(&self) -> bool {
        self.get_type().is_finite_light()
    }
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light + Send + Sync>;
