//! BSDF

use super::BxDFType;
use crate::geometry::*;
use crate::material::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::*;

/// Albedo below which a material is treated as black.
const MIN_ALBEDO: Float = 1e-8;

/// Result of evaluating a `BSDF` for a generated direction.
#[derive(Copy, Clone, Debug)]
pub struct BsdfEval {
    /// BSDF value, excluding the cosine term.
    pub f: Spectrum,

    /// Cosine between the generated direction and the shading normal.
    pub cos_gen: Float,

    /// Solid angle density of sampling the generated direction given the fixed one.
    pub dir_pdf_w: Float,

    /// Solid angle density of sampling the fixed direction given the generated one.
    pub rev_pdf_w: Float,
}

/// Result of sampling a `BSDF`.
#[derive(Copy, Clone, Debug)]
pub struct BsdfSample {
    /// BSDF value, excluding the cosine term.
    pub f: Spectrum,

    /// Sampled world space direction.
    pub wi: Vector3f,

    /// Cosine between `wi` and the shading normal.
    pub cos_theta: Float,

    /// Solid angle density of `wi`.
    pub pdf_w: Float,

    /// Solid angle density of sampling the fixed direction given `wi`.
    pub rev_pdf_w: Float,

    /// The lobe that produced the sample.
    pub sampled_type: BxDFType,
}

impl BsdfSample {
    /// Returns true if the sample came from a delta lobe.
    pub fn is_specular(&self) -> bool {
        self.sampled_type.is_specular()
    }
}

/// Scattering at a surface point with one direction fixed: the direction
/// towards the previous vertex of the subpath. Surfaces are two sided; the
/// shading frame is oriented towards the fixed direction.
#[derive(Copy, Clone, Debug)]
pub struct BSDF {
    /// Shading frame.
    frame: Frame,

    /// Fixed direction in world space.
    world_dir_fix: Vector3f,

    /// Fixed direction in the shading frame.
    local_dir_fix: Vector3f,

    /// The material.
    material: Material,

    /// Probability of selecting the diffuse lobe.
    diffuse_prob: Float,

    /// Probability of selecting the glossy lobe.
    glossy_prob: Float,

    /// Probability of selecting the mirror lobe.
    mirror_prob: Float,

    /// Russian roulette continuation probability.
    continuation_prob: Float,
}

impl BSDF {
    /// Create a new `BSDF`. Returns `None` when the fixed direction grazes the
    /// surface.
    ///
    /// * `dir_fix`  - Unit direction pointing away from the surface towards the previous vertex.
    /// * `n`        - Unit geometric normal.
    /// * `material` - The material.
    pub fn new(dir_fix: &Vector3f, n: &Normal3f, material: &Material) -> Option<Self> {
        let frame = Frame::from_z(&Vector3f::from(n.face_forward(dir_fix)));
        let local_dir_fix = frame.to_local(dir_fix);
        if local_dir_fix.z < COSINE_EPSILON {
            return None;
        }

        let diffuse = material.diffuse.max_component_value();
        let glossy = material.glossy.max_component_value();
        let mirror = material.mirror.max_component_value();
        let total = diffuse + glossy + mirror;

        let (diffuse_prob, glossy_prob, mirror_prob, continuation_prob) = if total < MIN_ALBEDO {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            (diffuse / total, glossy / total, mirror / total, min(1.0, total))
        };

        Some(Self {
            frame,
            world_dir_fix: *dir_fix,
            local_dir_fix,
            material: *material,
            diffuse_prob,
            glossy_prob,
            mirror_prob,
            continuation_prob,
        })
    }

    /// Returns the fixed direction in world space.
    pub fn world_dir_fix(&self) -> Vector3f {
        self.world_dir_fix
    }

    /// Returns the cosine between the fixed direction and the shading normal.
    pub fn cos_theta_fix(&self) -> Float {
        self.local_dir_fix.z
    }

    /// Returns the shading normal, oriented towards the fixed direction.
    pub fn normal(&self) -> Vector3f {
        self.frame.z
    }

    /// Returns true if every lobe with non-zero weight is a delta distribution.
    pub fn is_delta(&self) -> bool {
        self.diffuse_prob == 0.0 && self.glossy_prob == 0.0
    }

    /// Returns the albedo based probability of continuing a path from here.
    pub fn continuation_prob(&self) -> Float {
        self.continuation_prob
    }

    /// Evaluates the non-delta lobes for a generated direction. Returns `None`
    /// if the value is black.
    ///
    /// * `dir_gen` - Unit world space direction pointing away from the surface.
    pub fn evaluate(&self, dir_gen: &Vector3f) -> Option<BsdfEval> {
        self.evaluate_local(&self.frame.to_local(dir_gen))
    }

    /// Returns the forward and reverse solid angle densities for a generated direction.
    ///
    /// * `dir_gen` - Unit world space direction pointing away from the surface.
    pub fn pdf(&self, dir_gen: &Vector3f) -> (Float, Float) {
        self.evaluate(dir_gen)
            .map_or((0.0, 0.0), |e| (e.dir_pdf_w, e.rev_pdf_w))
    }

    /// Samples a direction. Returns `None` for absorption or a degenerate sample.
    ///
    /// * `u_lobe` - Sample value used to select a lobe.
    /// * `u`      - Sample value used to pick the direction within the lobe.
    pub fn sample(&self, u_lobe: Float, u: &Point2f) -> Option<BsdfSample> {
        let reflected = self.reflect_local();

        let (local_dir_gen, sampled_type) = if u_lobe < self.diffuse_prob {
            (cosine_sample_hemisphere(u), BxDFType::DIFFUSE)
        } else if u_lobe < self.diffuse_prob + self.glossy_prob {
            let lobe = Frame::from_z(&reflected);
            let w = lobe.to_world(&power_cos_sample_hemisphere(u, self.material.exponent));
            (w, BxDFType::GLOSSY)
        } else if u_lobe < self.diffuse_prob + self.glossy_prob + self.mirror_prob {
            let f = self.material.mirror / reflected.z;
            return Some(BsdfSample {
                f,
                wi: self.frame.to_world(&reflected),
                cos_theta: reflected.z,
                pdf_w: self.mirror_prob,
                rev_pdf_w: self.mirror_prob,
                sampled_type: BxDFType::SPECULAR,
            });
        } else {
            return None;
        };

        let eval = self.evaluate_local(&local_dir_gen)?;
        if eval.dir_pdf_w <= 0.0 {
            return None;
        }

        Some(BsdfSample {
            f: eval.f,
            wi: self.frame.to_world(&local_dir_gen),
            cos_theta: eval.cos_gen,
            pdf_w: eval.dir_pdf_w,
            rev_pdf_w: eval.rev_pdf_w,
            sampled_type,
        })
    }

    /// Mirror reflection of the fixed direction in the shading frame.
    fn reflect_local(&self) -> Vector3f {
        Vector3f::new(-self.local_dir_fix.x, -self.local_dir_fix.y, self.local_dir_fix.z)
    }

    /// Evaluates the non-delta lobes for a generated direction in the shading frame.
    ///
    /// * `local_dir_gen` - Unit direction in the shading frame.
    fn evaluate_local(&self, local_dir_gen: &Vector3f) -> Option<BsdfEval> {
        if local_dir_gen.z < COSINE_EPSILON {
            return None;
        }

        let mut f = Spectrum::zero();
        let mut dir_pdf_w = 0.0;
        let mut rev_pdf_w = 0.0;

        if self.diffuse_prob > 0.0 {
            f += self.material.diffuse * INV_PI;
            dir_pdf_w += self.diffuse_prob * cosine_hemisphere_pdf(local_dir_gen.z);
            rev_pdf_w += self.diffuse_prob * cosine_hemisphere_pdf(self.local_dir_fix.z);
        }

        if self.glossy_prob > 0.0 {
            let cos_r = self.reflect_local().dot(local_dir_gen);
            if cos_r > COSINE_EPSILON {
                let n = self.material.exponent;
                f += self.material.glossy * ((n + 2.0) * INV_TWO_PI * cos_r.powf(n));

                // The lobe is symmetric in the two directions.
                let pdf = self.glossy_prob * power_cos_hemisphere_pdf(cos_r, n);
                dir_pdf_w += pdf;
                rev_pdf_w += pdf;
            }
        }

        if f.is_black() {
            return None;
        }

        Some(BsdfEval {
            f,
            cos_gen: local_dir_gen.z,
            dir_pdf_w,
            rev_pdf_w,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    fn up() -> Normal3f {
        Normal3f::new(0.0, 0.0, 1.0)
    }

    fn direction(theta: Float, phi: Float) -> Vector3f {
        Vector3f::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
    }

    #[test]
    fn grazing_fixed_direction_is_rejected() {
        let m = Material::matte(Spectrum::new(0.5));
        assert!(BSDF::new(&Vector3f::new(1.0, 0.0, 0.0), &up(), &m).is_none());
    }

    #[test]
    fn two_sided_surface_flips_frame() {
        let m = Material::matte(Spectrum::new(0.5));
        let bsdf = BSDF::new(&Vector3f::new(0.0, 0.0, -1.0), &up(), &m).unwrap();
        assert!(approx_eq!(Float, bsdf.normal().z, -1.0));
        assert!(bsdf.evaluate(&Vector3f::new(0.0, 0.0, 1.0)).is_none());
        assert!(bsdf.evaluate(&Vector3f::new(0.0, 0.0, -1.0)).is_some());
    }

    #[test]
    fn mirror_is_delta() {
        let m = Material::mirror(Spectrum::new(0.9));
        let wo = direction(0.5, 0.3);
        let bsdf = BSDF::new(&wo, &up(), &m).unwrap();
        assert!(bsdf.is_delta());
        assert!(bsdf.evaluate(&direction(0.5, 0.3 + PI)).is_none());

        let s = bsdf.sample(0.5, &Point2f::new(0.3, 0.7)).unwrap();
        assert!(s.is_specular());
        assert!(approx_eq!(Float, s.wi.z, wo.z, epsilon = 1e-5));
        assert!(approx_eq!(Float, s.wi.x, -wo.x, epsilon = 1e-5));
        assert!(approx_eq!(Float, s.pdf_w, s.rev_pdf_w));
    }

    #[test]
    fn black_material_absorbs() {
        let bsdf = BSDF::new(&direction(0.2, 0.0), &up(), &Material::black()).unwrap();
        assert_eq!(bsdf.continuation_prob(), 0.0);
        assert!(bsdf.sample(0.0, &Point2f::new(0.5, 0.5)).is_none());
        assert!(bsdf.evaluate(&direction(0.3, 1.0)).is_none());
    }

    #[test]
    fn lambertian_albedo_estimate() {
        // E[f cos / pdf] over sampled directions equals the reflectance.
        let m = Material::matte(Spectrum::new(0.6));
        let bsdf = BSDF::new(&direction(0.7, 0.1), &up(), &m).unwrap();
        let mut rng = RNG::new(3);
        let n = 4000;
        let mut sum = 0.0;
        for _ in 0..n {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            if let Some(s) = bsdf.sample(rng.uniform_float(), &u) {
                sum += s.f[0] * s.cos_theta / s.pdf_w;
            }
        }
        assert!(approx_eq!(Float, sum / n as Float, 0.6, epsilon = 1e-3));
    }

    proptest! {
        #[test]
        fn forward_and_reverse_pdfs_swap(
            t0 in 0.05..1.5f32, p0 in 0.0..6.28f32,
            t1 in 0.05..1.5f32, p1 in 0.0..6.28f32,
        ) {
            let m = Material::glossy(Spectrum::new(0.4), Spectrum::new(0.4), 20.0);
            let a = direction(t0, p0);
            let b = direction(t1, p1);
            let bsdf_a = BSDF::new(&a, &up(), &m).unwrap();
            let bsdf_b = BSDF::new(&b, &up(), &m).unwrap();
            let (ab_dir, ab_rev) = bsdf_a.pdf(&b);
            let (ba_dir, ba_rev) = bsdf_b.pdf(&a);
            prop_assert!(approx_eq!(Float, ab_dir, ba_rev, epsilon = 1e-3 * (1.0 + ab_dir)));
            prop_assert!(approx_eq!(Float, ab_rev, ba_dir, epsilon = 1e-3 * (1.0 + ab_rev)));
        }

        #[test]
        fn sampled_pdf_matches_evaluate(u_lobe in 0.0..1.0f32, u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let m = Material::glossy(Spectrum::new(0.5), Spectrum::new(0.3), 10.0);
            let bsdf = BSDF::new(&direction(0.6, 0.4), &up(), &m).unwrap();
            if let Some(s) = bsdf.sample(u_lobe, &Point2f::new(u0, u1)) {
                if let Some(e) = bsdf.evaluate(&s.wi) {
                    prop_assert!(approx_eq!(Float, e.dir_pdf_w, s.pdf_w, epsilon = 1e-3 * (1.0 + s.pdf_w)));
                    prop_assert!(approx_eq!(Float, e.rev_pdf_w, s.rev_pdf_w, epsilon = 1e-3 * (1.0 + s.rev_pdf_w)));
                }
            }
        }
    }
}
