//! Uniform light selection.

use super::LightSelector;
use crate::pbrt::*;

/// Selects every light with the same probability. Works well for scenes with a
/// handful of lights.
pub struct UniformLightSelector {
    /// Number of lights.
    count: usize,
}

impl UniformLightSelector {
    /// Create a new instance of `UniformLightSelector`.
    ///
    /// * `count` - Number of lights.
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl LightSelector for UniformLightSelector {
    fn sample(&self, u: Float) -> Option<(usize, Float)> {
        if self.count == 0 {
            return None;
        }
        let index = min((u * self.count as Float) as usize, self.count - 1);
        Some((index, 1.0 / self.count as Float))
    }

    fn pdf(&self, _light_index: usize) -> Float {
        if self.count == 0 {
            0.0
        } else {
            1.0 / self.count as Float
        }
    }
}
