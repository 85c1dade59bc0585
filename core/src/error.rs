//! Errors

use crate::pbrt::*;
use thiserror::Error;

/// Invalid renderer configuration. Reported before any rendering work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("merge radius factor must be positive and finite, got {0}")]
    InvalidRadius(Float),

    #[error("radius reduction alpha must be in [0, 1), got {0}")]
    InvalidAlpha(Float),

    #[error("maximum path length must be at least 1, got {0}")]
    InvalidMaxDepth(usize),

    #[error("maximum eye subpath length must be at least 1, got {0}")]
    InvalidMaxEyeDepth(usize),

    #[error("maximum light subpath length must be at least 1, got {0}")]
    InvalidMaxLightDepth(usize),

    #[error("light path count must be at least 1")]
    InvalidLightPathCount,

    #[error("russian roulette cap must be in (0, 1], got {0}")]
    InvalidRussianRouletteCap(Float),

    #[error("thread count must be at least 1")]
    InvalidThreadCount,

    #[error("film resolution {0}x{1} has no pixels")]
    EmptyFilm(usize, usize),

    #[error("scene has no geometry")]
    EmptyScene,

    #[error("scene has no lights")]
    NoLights,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            ConfigError::InvalidAlpha(1.5).to_string(),
            "radius reduction alpha must be in [0, 1), got 1.5"
        );
        assert_eq!(ConfigError::EmptyFilm(0, 4).to_string(), "film resolution 0x4 has no pixels");
    }
}
