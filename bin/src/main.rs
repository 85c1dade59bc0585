#[macro_use]
extern crate log;

use clap::Parser;
use integrators::*;
use samplers::RandomSampler;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use vcm_core::app::*;
use vcm_core::camera::*;
use vcm_core::film::*;
use vcm_core::geometry::*;
use vcm_core::light_distrib::*;
use vcm_core::sampler::*;

mod scenes;

use scenes::*;

#[cfg(all(feature = "dhat-rs", feature = "jemalloc"))]
compile_error!("feature 'dhat-rs' and feature 'jemalloc' cannot be enabled at the same time");

#[cfg(feature = "dhat-rs")]
use dhat::{Dhat, DhatAlloc};

#[cfg(feature = "dhat-rs")]
#[global_allocator]
static ALLOCATOR: DhatAlloc = DhatAlloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

fn main() -> ExitCode {
    #[cfg(feature = "dhat-rs")]
    let _dhat = Dhat::start_heap_profiling();

    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    match render(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn render(options: &Options) -> Result<(), String> {
    let (width, height) = options.resolution();
    let strategy = LightSampleStrategy::from(options.light_strategy.as_str());
    let (scene, camera) = build_scene(options.scene, Point2::new(width, height), strategy);

    let config = VcmConfig {
        mode: match options.algorithm {
            Algorithm::Vcm => VcmMode::Vcm,
            Algorithm::Bpt => VcmMode::Bpt,
        },
        iterations: options.iterations(),
        max_depth: options.max_depth,
        max_eye_depth: options.max_eye_depth.unwrap_or(options.max_depth),
        max_light_depth: options.max_light_depth.unwrap_or(options.max_depth),
        light_path_count: options.light_paths,
        rr_depth: options.rr_depth,
        rr_cap: options.rr_cap,
        radius_factor: options.radius_factor,
        alpha: options.alpha,
        seed: options.seed,
        threads: options.threads(),
        tile_size: options.tile_size,
        quiet: options.quiet,
    };

    let sampler: ArcSampler = Arc::new(RandomSampler::new(Some(options.seed)));
    let integrator = VCMIntegrator::new(config, Arc::clone(&camera), sampler, &scene).map_err(|e| e.to_string())?;

    let film = Film::new(camera.resolution());
    let summary = integrator.render(&scene, &film, &AtomicBool::new(false));
    info!(
        "Rendered {} iterations, final merge radius {}",
        summary.iterations, summary.final_radius
    );

    film.write_image(&options.image_file)
}
