//! Power based light selection.

use super::LightSelector;
use crate::light::*;
use crate::pbrt::*;
use crate::sampling::*;

/// Selects lights with probability proportional to their emitted power. This
/// works well when the most powerful lights are also the most important
/// contributors to lighting in the scene.
pub struct PowerLightSelector {
    distrib: Option<Distribution1D>,
}

impl PowerLightSelector {
    /// Create a new instance of `PowerLightSelector`.
    ///
    /// * `lights` - The scene lights.
    pub fn new(lights: &[ArcLight]) -> Self {
        if lights.is_empty() {
            return Self { distrib: None };
        }
        let light_power: Vec<Float> = lights.iter().map(|light| light.power().y()).collect();
        Self {
            distrib: Some(Distribution1D::new(light_power)),
        }
    }
}

impl LightSelector for PowerLightSelector {
    fn sample(&self, u: Float) -> Option<(usize, Float)> {
        self.distrib
            .as_ref()
            .map(|d| d.sample_discrete(u))
            .filter(|&(_, pdf)| pdf > 0.0)
    }

    fn pdf(&self, light_index: usize) -> Float {
        self.distrib.as_ref().map_or(0.0, |d| d.discrete_pdf(light_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light_distrib::UniformLightSelector;
    use float_cmp::approx_eq;

    #[test]
    fn uniform_selector_covers_all_lights() {
        let s = UniformLightSelector::new(4);
        assert_eq!(s.sample(0.0).map(|(i, _)| i), Some(0));
        assert_eq!(s.sample(0.999).map(|(i, _)| i), Some(3));
        assert!(approx_eq!(Float, s.pdf(2), 0.25));
        assert!(UniformLightSelector::new(0).sample(0.5).is_none());
    }

    #[test]
    fn power_selector_without_lights() {
        let s = PowerLightSelector::new(&[]);
        assert!(s.sample(0.5).is_none());
        assert_eq!(s.pdf(0), 0.0);
    }
}
