//! VCM Configuration

use vcm_core::error::*;
use vcm_core::pbrt::*;

/// Light transport estimator used by the integrator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VcmMode {
    /// Vertex connection and merging.
    Vcm,

    /// Bidirectional path tracing; merging is disabled.
    Bpt,
}

impl VcmMode {
    /// Returns true if light vertices are merged with eye vertices.
    pub fn merges(&self) -> bool {
        *self == Self::Vcm
    }
}

/// Integrator settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VcmConfig {
    /// Estimator.
    pub mode: VcmMode,

    /// Number of iterations rendered by `VCMIntegrator::render()`.
    pub iterations: usize,

    /// Maximum number of segments of a complete path.
    pub max_depth: usize,

    /// Maximum number of segments of an eye subpath.
    pub max_eye_depth: usize,

    /// Maximum number of segments of a light subpath.
    pub max_light_depth: usize,

    /// Number of light subpaths traced per iteration. Defaults to one per
    /// pixel; eye samples are paired with light subpaths modulo this count.
    pub light_path_count: Option<usize>,

    /// Subpath length at which russian roulette starts.
    pub rr_depth: usize,

    /// Lower bound of the russian roulette survival probability.
    pub rr_cap: Float,

    /// Initial merge radius relative to the scene bounding sphere radius.
    pub radius_factor: Float,

    /// Radius reduction parameter.
    pub alpha: Float,

    /// Seed for all random streams.
    pub seed: u64,

    /// Number of worker threads.
    pub threads: usize,

    /// Tile edge length in pixels.
    pub tile_size: usize,

    /// Hide the progress bar.
    pub quiet: bool,
}

impl Default for VcmConfig {
    fn default() -> Self {
        Self {
            mode: VcmMode::Vcm,
            iterations: 16,
            max_depth: 10,
            max_eye_depth: 10,
            max_light_depth: 10,
            light_path_count: None,
            rr_depth: 3,
            rr_cap: 0.5,
            radius_factor: 0.003,
            alpha: 2.0 / 3.0,
            seed: 0,
            threads: 1,
            tile_size: 16,
            quiet: false,
        }
    }
}

impl VcmConfig {
    /// Checks the settings that do not depend on the scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius_factor > 0.0 && self.radius_factor.is_finite()) {
            return Err(ConfigError::InvalidRadius(self.radius_factor));
        }
        if !(0.0..1.0).contains(&self.alpha) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        if self.max_depth < 1 {
            return Err(ConfigError::InvalidMaxDepth(self.max_depth));
        }
        if self.max_eye_depth < 1 {
            return Err(ConfigError::InvalidMaxEyeDepth(self.max_eye_depth));
        }
        if self.max_light_depth < 1 {
            return Err(ConfigError::InvalidMaxLightDepth(self.max_light_depth));
        }
        if self.light_path_count == Some(0) {
            return Err(ConfigError::InvalidLightPathCount);
        }
        if !(self.rr_cap > 0.0 && self.rr_cap <= 1.0) {
            return Err(ConfigError::InvalidRussianRouletteCap(self.rr_cap));
        }
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreadCount);
        }
        Ok(())
    }

    /// Returns the russian roulette survival probability at a vertex. It is 1
    /// before roulette starts, otherwise the continuation probability of the
    /// BSDF clamped to the cap. The same value scales the forward and reverse
    /// densities of the vertex in every MIS weight.
    ///
    /// * `continuation_prob` - Albedo based continuation probability of the BSDF.
    /// * `path_length`       - Number of segments of the subpath up to the vertex.
    pub fn roulette_prob(&self, continuation_prob: Float, path_length: usize) -> Float {
        if self.roulette_active(path_length) {
            clamp(continuation_prob, self.rr_cap, 1.0)
        } else {
            1.0
        }
    }

    /// Returns true if a subpath of given length plays russian roulette before
    /// its next bounce.
    ///
    /// * `path_length` - Number of segments of the subpath so far.
    pub fn roulette_active(&self, path_length: usize) -> bool {
        path_length >= self.rr_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(VcmConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_invalid_settings() {
        let base = VcmConfig::default();
        let cases = [
            (VcmConfig { radius_factor: 0.0, ..base.clone() }, ConfigError::InvalidRadius(0.0)),
            (VcmConfig { alpha: 1.0, ..base.clone() }, ConfigError::InvalidAlpha(1.0)),
            (VcmConfig { max_depth: 0, ..base.clone() }, ConfigError::InvalidMaxDepth(0)),
            (VcmConfig { max_eye_depth: 0, ..base.clone() }, ConfigError::InvalidMaxEyeDepth(0)),
            (VcmConfig { max_light_depth: 0, ..base.clone() }, ConfigError::InvalidMaxLightDepth(0)),
            (VcmConfig { light_path_count: Some(0), ..base.clone() }, ConfigError::InvalidLightPathCount),
            (VcmConfig { rr_cap: 0.0, ..base.clone() }, ConfigError::InvalidRussianRouletteCap(0.0)),
            (VcmConfig { threads: 0, ..base.clone() }, ConfigError::InvalidThreadCount),
        ];
        for (config, err) in cases {
            assert_eq!(config.validate(), Err(err));
        }
        assert!(VcmConfig { radius_factor: Float::NAN, ..base }.validate().is_err());
        assert!(VcmConfig { light_path_count: Some(1), ..base }.validate().is_ok());
    }

    #[test]
    fn roulette_is_gated_by_depth_and_capped() {
        let config = VcmConfig { rr_depth: 2, rr_cap: 0.25, ..Default::default() };
        assert!(!config.roulette_active(1));
        assert!(config.roulette_active(2));
        assert_eq!(config.roulette_prob(0.1, 1), 1.0);
        assert_eq!(config.roulette_prob(0.1, 2), 0.25);
        assert_eq!(config.roulette_prob(0.6, 2), 0.6);
        assert_eq!(config.roulette_prob(3.0, 5), 1.0);
    }
}
