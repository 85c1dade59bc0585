//! Light selection.

mod power;
mod uniform;

pub use power::*;
pub use uniform::*;

use crate::light::*;
use crate::pbrt::*;

/// Light sampling strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LightSampleStrategy {
    /// Sample all light sources uniformly.
    #[default]
    Uniform,

    /// Samples light sources according to their emitted power.
    Power,
}

impl From<&str> for LightSampleStrategy {
    /// Returns a `LightSampleStrategy` given a string name.
    fn from(name: &str) -> Self {
        match name {
            "uniform" => Self::Uniform,
            "power" => Self::Power,
            _ => {
                error!("Light sample distribution type '{}' unknown. Using 'uniform'.", name);
                Self::Uniform
            }
        }
    }
}

/// Picks one light out of the scene lights for emission or direct illumination.
pub trait LightSelector {
    /// Returns the index of the selected light and the probability of selecting
    /// it, or `None` if there are no lights.
    ///
    /// * `u` - The random sample.
    fn sample(&self, u: Float) -> Option<(usize, Float)>;

    /// Returns the probability of selecting the light at `light_index`.
    ///
    /// * `light_index` - Index of the light in the scene.
    fn pdf(&self, light_index: usize) -> Float;
}

/// Boxed `LightSelector` that can be shared across threads.
pub type BoxLightSelector = Box<dyn LightSelector + Send + Sync>;

/// Returns a new `LightSelector` implementation.
///
/// * `strategy` - The strategy to use for light sampling.
/// * `lights`   - The scene lights.
pub fn create_light_selector(strategy: LightSampleStrategy, lights: &[ArcLight]) -> BoxLightSelector {
    let strategy = if lights.len() == 1 {
        LightSampleStrategy::Uniform
    } else {
        strategy
    };
    match strategy {
        LightSampleStrategy::Uniform => Box::new(UniformLightSelector::new(lights.len())),
        LightSampleStrategy::Power => Box::new(PowerLightSelector::new(lights)),
    }
}
