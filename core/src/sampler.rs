//! Sampler

use crate::geometry::*;
use crate::pbrt::*;
use std::sync::Arc;

/// A decoupled stream of sample values.
pub trait Sampler {
    /// Returns the sample value for the next dimension of the current sample vector.
    fn get_1d(&mut self) -> Float;

    /// Returns the sample value for the next two dimensions of the current sample vector.
    fn get_2d(&mut self) -> Point2f;

    /// Returns a new instance of the sampler that produces an independent stream.
    ///
    /// * `seed` - The seed for the new stream.
    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler + Send>;

    /// Restart the sample stream from a seed.
    ///
    /// * `seed` - The seed.
    fn reseed(&mut self, seed: u64);
}

// Implement `Sampler` so `Box<dyn Sampler>` can be passed around where `&mut dyn Sampler` is expected.
impl<S: Sampler + ?Sized> Sampler for Box<S> {
    #[inline]
    fn get_1d(&mut self) -> Float {
        (**self).get_1d()
    }

    #[inline]
    fn get_2d(&mut self) -> Point2f {
        (**self).get_2d()
    }

    #[inline]
    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler + Send> {
        (**self).clone_with_seed(seed)
    }

    #[inline]
    fn reseed(&mut self, seed: u64) {
        (**self).reseed(seed)
    }
}

/// Atomic reference counted `Sampler` used as a prototype for per worker streams.
pub type ArcSampler = Arc<dyn Sampler + Send + Sync>;
