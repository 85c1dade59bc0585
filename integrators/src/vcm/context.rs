//! Render Context

use super::stats::*;
use vcm_core::sampler::*;

/// Per worker state passed explicitly through the tracer and the
/// connection strategies.
pub struct RenderContext {
    /// Sample stream.
    pub sampler: Box<dyn Sampler + Send>,

    /// Counters.
    pub stats: RenderStats,
}

impl RenderContext {
    /// Create a new `RenderContext`.
    ///
    /// * `sampler` - Sample stream.
    pub fn new(sampler: Box<dyn Sampler + Send>) -> Self {
        Self {
            sampler,
            stats: RenderStats::default(),
        }
    }
}
