//! Merge Radius Schedule

use vcm_core::pbrt::*;

/// Smallest merge radius the schedule hands out.
pub const RADIUS_EPSILON: Float = 1e-7;

/// Progressive photon mapping radius reduction. The radius for iteration `i`
/// is `base_radius / (i + 1)^(0.5 * (1 - alpha))`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProgressiveRadiusSchedule {
    /// Radius of the first iteration.
    pub base_radius: Float,

    /// Radius reduction parameter in `[0, 1)`.
    pub alpha: Float,

    /// Index of the iteration the current radius belongs to.
    iteration: usize,
}

impl ProgressiveRadiusSchedule {
    /// Create a new schedule starting at iteration 0.
    ///
    /// * `base_radius` - Radius of the first iteration.
    /// * `alpha`       - Radius reduction parameter.
    pub fn new(base_radius: Float, alpha: Float) -> Self {
        Self {
            base_radius,
            alpha,
            iteration: 0,
        }
    }

    /// Returns the index of the iteration the current radius belongs to.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Returns the merge radius for the current iteration.
    pub fn current(&self) -> Float {
        self.radius_at(self.iteration)
    }

    /// Returns the merge radius for a given iteration.
    ///
    /// * `iteration` - The iteration index.
    pub fn radius_at(&self, iteration: usize) -> Float {
        let exponent = 0.5 * (1.0 - self.alpha);
        let r = self.base_radius / ((iteration + 1) as Float).powf(exponent);
        max(r, RADIUS_EPSILON)
    }

    /// Moves to the next iteration. Called once per committed iteration.
    pub fn advance(&mut self) {
        self.iteration += 1;
    }
}
