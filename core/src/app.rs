//! Application related stuff

use crate::pbrt::Float;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

/// Light transport algorithm.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Vertex connection and merging.
    Vcm,

    /// Bidirectional path tracing only (no merging).
    Bpt,
}

/// Built-in scene to render.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneChoice {
    /// Diffuse box lit by a ceiling area light.
    Box,

    /// Diffuse box lit by a point light, with a glossy and a mirror sphere.
    Spheres,

    /// Open ground plane and spheres lit by a constant environment.
    Sky,
}

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Vertex connection and merging renderer", long_about = None)]
pub struct Options {
    /// Number of threads to use for rendering.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 1,
        help = "Use specified number of threads for rendering."
    )]
    n_threads: usize,

    /// Automatically reduce a number of quality settings to render more quickly.
    #[arg(
        long = "quick",
        help = "Automatically reduce a number of quality settings to render more quickly."
    )]
    pub quick_render: bool,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Path to the image file.
    #[arg(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        default_value = "vcm.exr",
        help = "Write the final image to the given filename (.exr, .pfm, .png or .tga)."
    )]
    pub image_file: String,

    /// Number of rendering iterations.
    #[arg(
        long = "iterations",
        short = 'i',
        value_name = "NUM",
        default_value_t = 16,
        help = "Number of iterations (one light path per pixel each)."
    )]
    pub iterations: usize,

    /// Image width.
    #[arg(long, value_name = "NUM", default_value_t = 256, help = "Image width in pixels.")]
    pub width: usize,

    /// Image height.
    #[arg(long, value_name = "NUM", default_value_t = 256, help = "Image height in pixels.")]
    pub height: usize,

    /// Light transport algorithm.
    #[arg(long, value_enum, default_value_t = Algorithm::Vcm, help = "Light transport algorithm.")]
    pub algorithm: Algorithm,

    /// Scene to render.
    #[arg(long, value_enum, default_value_t = SceneChoice::Box, help = "Built-in scene to render.")]
    pub scene: SceneChoice,

    /// Maximum path length.
    #[arg(
        long = "maxdepth",
        value_name = "NUM",
        default_value_t = 10,
        help = "Maximum number of segments of a complete path."
    )]
    pub max_depth: usize,

    /// Maximum eye subpath length.
    #[arg(
        long = "maxeyedepth",
        value_name = "NUM",
        help = "Maximum number of segments of an eye subpath [default: maxdepth]."
    )]
    pub max_eye_depth: Option<usize>,

    /// Maximum light subpath length.
    #[arg(
        long = "maxlightdepth",
        value_name = "NUM",
        help = "Maximum number of segments of a light subpath [default: maxdepth]."
    )]
    pub max_light_depth: Option<usize>,

    /// Light subpaths per iteration.
    #[arg(
        long = "lightpaths",
        value_name = "NUM",
        help = "Number of light subpaths per iteration [default: one per pixel]."
    )]
    pub light_paths: Option<usize>,

    /// Path length where russian roulette starts.
    #[arg(
        long = "rrdepth",
        value_name = "NUM",
        default_value_t = 3,
        help = "Path length at which russian roulette starts."
    )]
    pub rr_depth: usize,

    /// Lower bound of the russian roulette survival probability.
    #[arg(
        long = "rrcap",
        value_name = "FLOAT",
        default_value_t = 0.5,
        help = "Minimum russian roulette survival probability."
    )]
    pub rr_cap: Float,

    /// Merge radius as a fraction of the scene bounding sphere radius.
    #[arg(
        long = "radius",
        value_name = "FLOAT",
        default_value_t = 0.003,
        help = "Initial merge radius relative to the scene radius."
    )]
    pub radius_factor: Float,

    /// Radius reduction parameter.
    #[arg(
        long = "alpha",
        value_name = "FLOAT",
        default_value_t = 2.0 / 3.0,
        help = "Merge radius reduction parameter in [0, 1)."
    )]
    pub alpha: Float,

    /// Light selection strategy.
    #[arg(
        long = "lightstrategy",
        value_name = "NAME",
        default_value = "uniform",
        help = "Light selection strategy (uniform or power)."
    )]
    pub light_strategy: String,

    /// Random seed.
    #[arg(long, value_name = "NUM", default_value_t = 0, help = "Seed for the random number generators.")]
    pub seed: u64,

    /// Tile size.
    #[arg(
        long = "tilesize",
        short = 'p',
        value_name = "NUM",
        default_value_t = 16,
        help = "Size in pixels of square tiles rendered per thread."
    )]
    pub tile_size: usize,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads");
                1
            }
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the number of iterations taking the quick render flag into account.
    pub fn iterations(&self) -> usize {
        if self.quick_render {
            (self.iterations / 4).max(1)
        } else {
            self.iterations
        }
    }

    /// Returns the image resolution taking the quick render flag into account.
    pub fn resolution(&self) -> (usize, usize) {
        if self.quick_render {
            ((self.width / 4).max(1), (self.height / 4).max(1))
        } else {
            (self.width, self.height)
        }
    }
}

/// Create a progress bar.
///
/// * `len`   - Number of steps.
/// * `quiet` - Hide the progress bar.
pub fn create_progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len);
    match ProgressStyle::with_template("[{elapsed_precise}] [{bar:60.cyan/blue}] {pos}/{len} ({eta}) {msg}") {
        Ok(style) => progress.set_style(style.progress_chars("=>-")),
        Err(err) => warn!("Using default progress style: {err}"),
    }
    progress
}
