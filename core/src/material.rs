//! Materials

use crate::pbrt::*;
use crate::spectrum::*;

/// Surface reflectance made of up to three lobes: Lambertian diffuse, a
/// normalized Phong glossy lobe and a perfect mirror.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Material {
    /// Diffuse reflectance.
    pub diffuse: Spectrum,

    /// Glossy reflectance.
    pub glossy: Spectrum,

    /// Phong exponent of the glossy lobe.
    pub exponent: Float,

    /// Mirror reflectance.
    pub mirror: Spectrum,
}

impl Material {
    /// Returns a purely Lambertian material.
    ///
    /// * `kd` - Diffuse reflectance.
    pub fn matte(kd: Spectrum) -> Self {
        Self {
            diffuse: kd,
            ..Default::default()
        }
    }

    /// Returns a material with diffuse and glossy lobes.
    ///
    /// * `kd`       - Diffuse reflectance.
    /// * `ks`       - Glossy reflectance.
    /// * `exponent` - Phong exponent.
    pub fn glossy(kd: Spectrum, ks: Spectrum, exponent: Float) -> Self {
        Self {
            diffuse: kd,
            glossy: ks,
            exponent,
            ..Default::default()
        }
    }

    /// Returns a perfect mirror.
    ///
    /// * `kr` - Mirror reflectance.
    pub fn mirror(kr: Spectrum) -> Self {
        Self {
            mirror: kr,
            ..Default::default()
        }
    }

    /// Returns a material that absorbs everything, used for emitters.
    pub fn black() -> Self {
        Self::default()
    }
}
