//! Vertex Connection and Merging

use itertools::iproduct;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use vcm_core::app::create_progress_bar;
use vcm_core::camera::*;
use vcm_core::error::*;
use vcm_core::film::*;
use vcm_core::geometry::*;
use vcm_core::pbrt::*;
use vcm_core::sampler::*;
use vcm_core::scene::*;
use vcm_core::spectrum::*;

mod config;
mod connect;
mod context;
mod hash_grid;
mod merge;
mod mis;
mod radius;
mod stats;
mod tracer;
mod vertex;

// Re-export
pub use config::*;
pub use connect::*;
pub use context::*;
pub use hash_grid::*;
pub use merge::*;
pub use mis::*;
pub use radius::*;
pub use stats::*;
pub use tracer::*;
pub use vertex::*;

/// Radiance arriving at a film position.
#[derive(Copy, Clone, Debug)]
pub struct RadianceContribution {
    /// Film position in raster coordinates.
    pub p_film: Point2f,

    /// Radiance estimate.
    pub l: Spectrum,
}

impl RadianceContribution {
    /// Create a new `RadianceContribution`.
    ///
    /// * `p_film` - Film position in raster coordinates.
    /// * `l`      - Radiance estimate.
    pub fn new(p_film: Point2f, l: Spectrum) -> Self {
        Self { p_film, l }
    }
}

/// Light subpaths of one iteration and the merge index built over their
/// vertices. Read only once built.
pub struct IterationFrame {
    /// Iteration index.
    pub iteration: usize,

    /// Merge radius of the iteration.
    pub radius: Float,

    /// MIS constants of the iteration.
    pub constants: MisConstants,

    /// All light subpaths of the iteration.
    pub light_paths: LightPathArena,

    /// Merge index over `light_paths.vertices`; empty without merging.
    pub grid: HashGrid,

    /// Counters of the light pass.
    pub stats: RenderStats,
}

/// A rendered iteration that has not been committed to the film yet.
pub struct IterationResult {
    /// Iteration index.
    pub iteration: usize,

    /// Merge radius of the iteration.
    pub radius: Float,

    /// Radiance of the iteration.
    pub buffer: FilmBuffer,

    /// Counters of the light and eye passes.
    pub stats: RenderStats,
}

/// Outcome of `VCMIntegrator::render()`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSummary {
    /// Number of iterations committed to the film.
    pub iterations: usize,

    /// Merge radius of the last committed iteration.
    pub final_radius: Float,

    /// Counters summed over all iterations.
    pub stats: RenderStats,

    /// Whether rendering stopped early.
    pub cancelled: bool,
}

/// Implements the vertex connection and merging integrator. In `Bpt` mode it
/// reduces to bidirectional path tracing.
pub struct VCMIntegrator {
    /// Render configuration.
    pub config: VcmConfig,

    /// The camera.
    camera: ArcCamera,

    /// Prototype for the per worker sample streams.
    sampler: ArcSampler,

    /// Merge radius of the first iteration.
    base_radius: Float,

    /// Number of light subpaths per iteration.
    light_path_count: usize,
}

impl VCMIntegrator {
    /// Create a new `VCMIntegrator`. Every configuration error is reported
    /// here, before any rendering work.
    ///
    /// * `config`  - Render configuration.
    /// * `camera`  - The camera.
    /// * `sampler` - Prototype for the per worker sample streams.
    /// * `scene`   - The scene; used to scale the merge radius.
    pub fn new(config: VcmConfig, camera: ArcCamera, sampler: ArcSampler, scene: &Scene) -> Result<Self, ConfigError> {
        config.validate()?;

        let resolution = camera.resolution();
        let pixel_count = resolution.x * resolution.y;
        if pixel_count == 0 {
            return Err(ConfigError::EmptyFilm(resolution.x, resolution.y));
        }
        let light_path_count = config.light_path_count.unwrap_or(pixel_count);
        if scene.aggregate.is_empty() {
            return Err(ConfigError::EmptyScene);
        }
        if scene.lights.is_empty() {
            return Err(ConfigError::NoLights);
        }

        let base_radius = config.radius_factor * scene.scene_sphere.radius;
        if !(base_radius > 0.0) || !base_radius.is_finite() {
            return Err(ConfigError::InvalidRadius(base_radius));
        }

        info!(
            "{:?}: {} light paths per iteration, base radius {}",
            config.mode, light_path_count, base_radius
        );

        Ok(Self {
            config,
            camera,
            sampler,
            base_radius,
            light_path_count,
        })
    }

    /// Returns the number of light subpaths traced per iteration.
    pub fn light_path_count(&self) -> usize {
        self.light_path_count
    }

    /// Returns a fresh merge radius schedule.
    pub fn radius_schedule(&self) -> ProgressiveRadiusSchedule {
        ProgressiveRadiusSchedule::new(self.base_radius, self.config.alpha)
    }

    /// Returns the MIS constants for a merge radius.
    ///
    /// * `radius` - Merge radius.
    pub fn mis_constants(&self, radius: Float) -> MisConstants {
        MisConstants::new(self.config.mode, radius, self.light_path_count)
    }

    /// Returns the worker state for one unit of work. The sample stream only
    /// depends on the seed, iteration, pass and work unit.
    ///
    /// * `iteration` - Iteration index.
    /// * `pass`      - 0 for the light pass, 1 for the eye pass.
    /// * `unit`      - Index of the chunk or tile.
    pub fn context(&self, iteration: usize, pass: u64, unit: usize) -> RenderContext {
        let seed = mix_seed(self.config.seed, &[iteration as u64, pass, unit as u64]);
        RenderContext::new(self.sampler.clone_with_seed(seed))
    }

    /// Traces all light subpaths of an iteration and builds the merge index
    /// over their vertices.
    ///
    /// * `scene`     - The scene.
    /// * `iteration` - Iteration index.
    /// * `radius`    - Merge radius of the iteration.
    pub fn trace_light_paths(&self, scene: &Scene, iteration: usize, radius: Float) -> IterationFrame {
        let constants = self.mis_constants(radius);
        let tracer = SubpathTracer::new(&self.config, constants, scene, &*self.camera);

        let chunk_size = max(1, self.config.tile_size * self.config.tile_size);
        let chunk_count = (self.light_path_count + chunk_size - 1) / chunk_size;

        let chunks = self.run_parallel(chunk_count, |chunk| {
            let mut ctx = self.context(iteration, 0, chunk);
            let start = chunk * chunk_size;
            let end = min(start + chunk_size, self.light_path_count);

            let mut arena = LightPathArena::with_capacity(end - start);
            let mut vertices = Vec::with_capacity(self.config.max_depth);
            let mut splats = Vec::with_capacity(self.config.max_depth);
            for _ in start..end {
                vertices.clear();
                splats.clear();
                tracer.trace_light_path(&mut ctx, &mut vertices, &mut splats);
                arena.push_path(&vertices, &splats);
            }
            (arena, ctx.stats)
        });

        let mut light_paths = LightPathArena::with_capacity(self.light_path_count);
        let mut stats = RenderStats::default();
        for (_, (arena, chunk_stats)) in chunks {
            light_paths.append(arena);
            stats += chunk_stats;
        }
        debug_assert_eq!(light_paths.path_count(), self.light_path_count);

        let grid = if constants.merging {
            HashGrid::build(&light_paths.vertices, radius)
        } else {
            HashGrid::default()
        };
        debug!(
            "Iteration {iteration}: {} light vertices, {} splats, radius {radius}",
            light_paths.vertices.len(),
            light_paths.splats.len()
        );

        IterationFrame {
            iteration,
            radius,
            constants,
            light_paths,
            grid,
            stats,
        }
    }

    /// Evaluates one film sample: the eye subpath through `pixel` with every
    /// strategy, followed by the light tracing contributions of the light
    /// subpaths whose index equals the pixel index modulo the pixel count.
    /// Every light subpath's contributions are emitted exactly once.
    ///
    /// * `scene` - The scene.
    /// * `frame` - Light subpaths and merge index of the iteration.
    /// * `ctx`   - Worker state.
    /// * `pixel` - The pixel.
    pub fn evaluate_sample(
        &self,
        scene: &Scene,
        frame: &IterationFrame,
        ctx: &mut RenderContext,
        pixel: Point2<usize>,
    ) -> Vec<RadianceContribution> {
        let resolution = self.camera.resolution();
        let pixel_count = resolution.x * resolution.y;
        let pixel_index = pixel.y * resolution.x + pixel.x;
        let tracer = SubpathTracer::new(&self.config, frame.constants, scene, &*self.camera);

        let (p_film, l) = tracer.trace_eye_path(frame, pixel_index, pixel, ctx);

        let mut contributions = vec![RadianceContribution::new(p_film, l)];
        for path in (pixel_index..frame.light_paths.path_count()).step_by(max(1, pixel_count)) {
            contributions.extend_from_slice(frame.light_paths.path_splats(path));
        }
        contributions
    }

    /// Renders one iteration without committing it.
    ///
    /// * `scene`     - The scene.
    /// * `iteration` - Iteration index.
    /// * `radius`    - Merge radius of the iteration.
    pub fn render_iteration(&self, scene: &Scene, iteration: usize, radius: Float) -> IterationResult {
        let frame = self.trace_light_paths(scene, iteration, radius);

        let resolution = self.camera.resolution();
        let tile_size = max(1, self.config.tile_size);
        let n_tiles = Point2::new(
            (resolution.x + tile_size - 1) / tile_size,
            (resolution.y + tile_size - 1) / tile_size,
        );
        let tile_count = n_tiles.x * n_tiles.y;

        let tiles = self.run_parallel(tile_count, |tile| {
            let mut ctx = self.context(iteration, 1, tile);
            let x0 = (tile % n_tiles.x) * tile_size;
            let y0 = (tile / n_tiles.x) * tile_size;
            let x1 = min(x0 + tile_size, resolution.x);
            let y1 = min(y0 + tile_size, resolution.y);

            let mut contributions = Vec::with_capacity((x1 - x0) * (y1 - y0));
            for (y, x) in iproduct!(y0..y1, x0..x1) {
                contributions.extend(self.evaluate_sample(scene, &frame, &mut ctx, Point2::new(x, y)));
            }
            (contributions, ctx.stats)
        });

        let mut buffer = FilmBuffer::new(resolution);
        let mut stats = frame.stats;
        for (_, (contributions, tile_stats)) in tiles {
            for c in contributions.iter() {
                buffer.add_splat(&c.p_film, &c.l, 1.0);
            }
            stats += tile_stats;
        }

        IterationResult {
            iteration,
            radius,
            buffer,
            stats,
        }
    }

    /// Renders all iterations into the film. The cancellation flag is checked
    /// between iterations; a started iteration always completes.
    ///
    /// * `scene`  - The scene.
    /// * `film`   - Receives the committed iterations.
    /// * `cancel` - Stops rendering when set.
    pub fn render(&self, scene: &Scene, film: &Film, cancel: &AtomicBool) -> RenderSummary {
        let progress = create_progress_bar(self.config.iterations as u64, self.config.quiet);
        progress.set_message("Rendering scene");

        let mut schedule = self.radius_schedule();
        let mut stats = RenderStats::default();
        let mut final_radius = schedule.current();
        let mut cancelled = false;

        while schedule.iteration() < self.config.iterations {
            if cancel.load(Ordering::Relaxed) {
                warn!("Rendering cancelled after {} iterations", schedule.iteration());
                cancelled = true;
                break;
            }

            let iteration = schedule.iteration();
            let radius = schedule.current();
            let result = self.render_iteration(scene, iteration, radius);
            film.commit(&result.buffer);
            debug!("Committed iteration {iteration} with radius {radius}");

            stats += result.stats;
            final_radius = radius;
            schedule.advance();
            progress.inc(1);
        }

        progress.finish_with_message("Render complete");
        stats.report("Render");

        RenderSummary {
            iterations: schedule.iteration(),
            final_radius,
            stats,
            cancelled,
        }
    }

    /// Runs work units on `config.threads` scoped workers fed through a
    /// bounded channel. Results are returned sorted by work unit.
    ///
    /// * `count` - Number of work units.
    /// * `work`  - Computes the result of one work unit.
    fn run_parallel<T, F>(&self, count: usize, work: F) -> Vec<(usize, T)>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        let n_threads = clamp(self.config.threads, 1, max(1, count));
        let mut results = Vec::with_capacity(count);

        thread::scope(|scope| {
            let (tx_worker, rx_worker) = crossbeam_channel::bounded::<usize>(n_threads);
            let (tx_result, rx_result) = crossbeam_channel::unbounded::<(usize, T)>();

            // Spawn worker threads.
            for _ in 0..n_threads {
                let rx_worker = rx_worker.clone();
                let tx_result = tx_result.clone();
                let work = &work;
                scope.spawn(move || {
                    for unit in rx_worker.iter() {
                        if tx_result.send((unit, work(unit))).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(rx_worker); // Drop extra since we've cloned one for each worker.
            drop(tx_result);

            // Send work.
            for unit in 0..count {
                if tx_worker.send(unit).is_err() {
                    error!("Workers stopped before all work was sent");
                    break;
                }
            }
            drop(tx_worker);

            results.extend(rx_result.iter());
        });

        results.sort_by_key(|(unit, _)| *unit);
        results
    }
}
