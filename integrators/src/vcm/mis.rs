//! MIS Constants

use super::config::*;
use vcm_core::pbrt::*;

/// Balance heuristic.
///
/// * `pdf` - Density or density ratio.
#[inline]
pub fn mis(pdf: Float) -> Float {
    pdf
}

/// Per iteration factors relating vertex connection and vertex merging.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MisConstants {
    /// Weight of merging relative to connecting, `pi r^2 N`.
    pub vm_weight_factor: Float,

    /// Weight of connecting relative to merging, `1 / (pi r^2 N)`.
    pub vc_weight_factor: Float,

    /// Normalization of the constant merge kernel, `1 / (pi r^2 N)`.
    pub vm_normalization: Float,

    /// Number of light subpaths traced per iteration.
    pub light_path_count: Float,

    /// Whether merging is used.
    pub merging: bool,
}

impl MisConstants {
    /// Returns the constants for one iteration.
    ///
    /// * `mode`             - Estimator.
    /// * `radius`           - Merge radius of the iteration.
    /// * `light_path_count` - Number of light subpaths traced per iteration.
    pub fn new(mode: VcmMode, radius: Float, light_path_count: usize) -> Self {
        let light_path_count = light_path_count as Float;
        let eta = PI * radius * radius * light_path_count;
        let merging = mode.merges();

        Self {
            vm_weight_factor: if merging { mis(eta) } else { 0.0 },
            vc_weight_factor: if merging { mis(1.0 / eta) } else { 0.0 },
            vm_normalization: 1.0 / eta,
            light_path_count,
            merging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn connection_and_merging_factors_are_reciprocal() {
        let c = MisConstants::new(VcmMode::Vcm, 0.01, 10_000);
        assert!(approx_eq!(f32, c.vm_weight_factor, PI, epsilon = 1e-5));
        assert!(approx_eq!(f32, c.vm_weight_factor * c.vc_weight_factor, 1.0, epsilon = 1e-6));
        assert!(c.merging);
    }

    #[test]
    fn bidirectional_mode_disables_merging() {
        let c = MisConstants::new(VcmMode::Bpt, 0.01, 10_000);
        assert_eq!(c.vm_weight_factor, 0.0);
        assert_eq!(c.vc_weight_factor, 0.0);
        assert!(!c.merging);
    }
}
