//! Random Sampler.

use vcm_core::geometry::*;
use vcm_core::pbrt::*;
use vcm_core::rng::*;
use vcm_core::sampler::*;

/// Implements a sampler that uses a PRNG to generate uniformly random samples.
#[derive(Clone)]
pub struct RandomSampler {
    /// The random number generator.
    pub rng: RNG,
}

impl RandomSampler {
    /// Create a new `RandomSampler`.
    ///
    /// * `seed` - Optional seed for the random number generator.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: match seed {
                Some(s) => RNG::new(s),
                None => RNG::default(),
            },
        }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Sampler for RandomSampler {
    /// Returns the sample value for the next dimension of the current sample vector.
    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    /// Returns the sample value for the next two dimensions of the current sample vector.
    fn get_2d(&mut self) -> Point2f {
        let x = self.rng.uniform_float();
        let y = self.rng.uniform_float();
        Point2f::new(x, y)
    }

    /// Generates a new instance for use by a rendering thread.
    ///
    /// * `seed` - The seed for the random number generator.
    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler + Send> {
        Box::new(Self::new(Some(seed)))
    }

    /// Restart the sample stream.
    ///
    /// * `seed` - The seed for the random number generator.
    fn reseed(&mut self, seed: u64) {
        self.rng.set_sequence(seed);
    }
}
