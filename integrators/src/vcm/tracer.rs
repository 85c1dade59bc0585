//! Subpath Tracer

use super::config::*;
use super::context::*;
use super::mis::*;
use super::vertex::*;
use super::{IterationFrame, RadianceContribution};
use vcm_core::camera::*;
use vcm_core::geometry::*;
use vcm_core::light::*;
use vcm_core::pbrt::*;
use vcm_core::reflection::*;
use vcm_core::sampler::*;
use vcm_core::scene::*;
use vcm_core::spectrum::*;

/// Traces light and eye subpaths of one iteration and evaluates the
/// connection and merging strategies between them.
pub struct SubpathTracer<'a> {
    /// Render configuration.
    pub config: &'a VcmConfig,

    /// MIS constants of the iteration.
    pub constants: MisConstants,

    /// The scene.
    pub scene: &'a Scene,

    /// The camera.
    pub camera: &'a (dyn Camera + Send + Sync),
}

/// Returns the initial state of a light subpath for an emitted ray.
///
/// * `emission`  - The emitted ray and its densities.
/// * `pick_pdf`  - Probability of having picked the light.
/// * `is_delta`  - Whether the light is a delta light.
/// * `is_finite` - Whether the light is at a finite distance.
/// * `constants` - MIS constants of the iteration.
pub fn light_state_from_emission(
    emission: &Emission,
    pick_pdf: Float,
    is_delta: bool,
    is_finite: bool,
    constants: &MisConstants,
) -> Option<SubpathState> {
    let emission_pdf_w = emission.emission_pdf_w * pick_pdf;
    let direct_pdf_a = emission.direct_pdf_a * pick_pdf;
    if emission_pdf_w <= 0.0 || emission.energy.is_black() {
        return None;
    }

    let d_vc = if is_delta {
        0.0
    } else if is_finite {
        mis(emission.cos_at_light / emission_pdf_w)
    } else {
        mis(1.0 / emission_pdf_w)
    };

    Some(SubpathState {
        origin: emission.origin,
        direction: emission.direction,
        throughput: emission.energy / emission_pdf_w,
        path_length: 1,
        is_finite_light: is_finite,
        d_vcm: mis(direct_pdf_a / emission_pdf_w),
        d_vc,
        d_vm: d_vc * constants.vc_weight_factor,
    })
}

/// Returns the initial state of an eye subpath through a film position.
///
/// * `camera`           - The camera.
/// * `p_film`           - Film position.
/// * `light_path_count` - Number of light subpaths traced per iteration.
pub fn camera_state(camera: &dyn Camera, p_film: &Point2f, light_path_count: Float) -> Option<SubpathState> {
    let ray = camera.generate_ray(p_film);
    let cos_at_camera = camera.forward().dot(&ray.d);
    if cos_at_camera <= 0.0 {
        return None;
    }

    // Density of the ray direction for an image plane of unit pixel area.
    let image_point_to_camera_dist = camera.image_plane_distance() / cos_at_camera;
    let camera_pdf_w = sqr(image_point_to_camera_dist) / cos_at_camera;

    Some(SubpathState {
        origin: ray.o,
        direction: ray.d,
        throughput: Spectrum::new(1.0),
        path_length: 1,
        is_finite_light: true,
        d_vcm: mis(light_path_count / camera_pdf_w),
        d_vc: 0.0,
        d_vm: 0.0,
    })
}

impl<'a> SubpathTracer<'a> {
    /// Create a new `SubpathTracer`.
    ///
    /// * `config`    - Render configuration.
    /// * `constants` - MIS constants of the iteration.
    /// * `scene`     - The scene.
    /// * `camera`    - The camera.
    pub fn new(
        config: &'a VcmConfig,
        constants: MisConstants,
        scene: &'a Scene,
        camera: &'a (dyn Camera + Send + Sync),
    ) -> Self {
        Self {
            config,
            constants,
            scene,
            camera,
        }
    }

    /// Returns the roulette survival probability at a vertex; 1 before
    /// roulette starts.
    ///
    /// * `bsdf`        - Scattering function at the vertex.
    /// * `path_length` - Number of segments of the subpath up to the vertex.
    pub(crate) fn survival_prob(&self, bsdf: &BSDF, path_length: usize) -> Float {
        self.config.roulette_prob(bsdf.continuation_prob(), path_length)
    }

    /// Picks a light and emits a ray from it.
    ///
    /// * `ctx` - Worker state.
    pub fn generate_light_sample(&self, ctx: &mut RenderContext) -> Option<SubpathState> {
        let (_, light, pick_pdf) = self.scene.select_light(ctx.sampler.get_1d())?;
        let u_dir = ctx.sampler.get_2d();
        let u_pos = ctx.sampler.get_2d();
        let emission = light.emit(&u_dir, &u_pos)?;
        light_state_from_emission(
            &emission,
            pick_pdf,
            light.is_delta(),
            light.is_finite(),
            &self.constants,
        )
    }

    /// Samples the next direction of a subpath. Returns false if the subpath
    /// terminates: absorption, failed russian roulette or a numerical defect.
    ///
    /// * `bsdf`  - Scattering function at the vertex.
    /// * `p`     - Position of the vertex.
    /// * `state` - The subpath.
    /// * `ctx`   - Worker state.
    pub fn sample_scattering(&self, bsdf: &BSDF, p: Point3f, state: &mut SubpathState, ctx: &mut RenderContext) -> bool {
        let u_lobe = ctx.sampler.get_1d();
        let u = ctx.sampler.get_2d();
        let u_roulette = ctx.sampler.get_1d();

        let sample = match bsdf.sample(u_lobe, &u) {
            Some(s) if s.pdf_w > 0.0 && !s.f.is_black() => s,
            _ => return false,
        };

        let q = self.survival_prob(bsdf, state.path_length);
        if u_roulette >= q {
            return false;
        }

        state.scatter(p, &sample, q, &self.constants);
        if !state.is_finite() {
            debug!("Dropping subpath with non-finite state at length {}", state.path_length);
            ctx.stats.discarded += 1;
            return false;
        }
        true
    }

    /// Traces one light subpath, storing its non-delta vertices and the light
    /// tracing contributions made from them.
    ///
    /// * `ctx`      - Worker state.
    /// * `vertices` - Receives the stored vertices.
    /// * `splats`   - Receives the light tracing contributions.
    pub fn trace_light_path(
        &self,
        ctx: &mut RenderContext,
        vertices: &mut Vec<PathVertex>,
        splats: &mut Vec<RadianceContribution>,
    ) {
        ctx.stats.light_paths += 1;

        let mut state = match self.generate_light_sample(ctx) {
            Some(state) => state,
            None => return,
        };

        loop {
            let ray = Ray::spawn(&state.origin, &state.direction);
            let isect = match self.scene.intersect(&ray) {
                Some(isect) => isect,
                None => break,
            };

            let material = &self.scene.primitive(isect.primitive).material;
            let bsdf = match BSDF::new(&(-ray.d), &isect.n, material) {
                Some(bsdf) => bsdf,
                None => break,
            };

            state.arrive(state.origin.distance(&isect.p), bsdf.cos_theta_fix());
            ctx.stats.max_light_path_length = ctx.stats.max_light_path_length.max(state.path_length as u64);

            if !bsdf.is_delta() {
                let vertex = state.vertex(isect.p, bsdf);
                vertices.push(vertex);
                ctx.stats.light_vertices += 1;

                if state.path_length < self.config.max_depth {
                    if let Some(splat) = self.connect_to_camera(&vertex, ctx) {
                        splats.push(splat);
                    }
                }
            }

            // Any further vertex could only take part in paths that are too long.
            if state.path_length >= self.config.max_light_depth || state.path_length + 2 > self.config.max_depth {
                break;
            }

            if !self.sample_scattering(&bsdf, isect.p, &mut state, ctx) {
                break;
            }
        }
    }

    /// Traces the eye subpath of a film sample and evaluates every strategy
    /// at its vertices. Returns the film position and the radiance estimate
    /// excluding light tracing.
    ///
    /// * `frame`       - Light subpaths and merge index of the iteration.
    /// * `pixel_index` - Index of the pixel; selects the paired light subpath
    ///                   modulo the number of light subpaths.
    /// * `pixel`       - The pixel.
    /// * `ctx`         - Worker state.
    pub fn trace_eye_path(
        &self,
        frame: &IterationFrame,
        pixel_index: usize,
        pixel: Point2<usize>,
        ctx: &mut RenderContext,
    ) -> (Point2f, Spectrum) {
        let jitter = ctx.sampler.get_2d();
        let p_film = Point2f::new(pixel.x as Float + jitter.x, pixel.y as Float + jitter.y);
        let mut l = Spectrum::zero();

        let mut state = match camera_state(self.camera, &p_film, self.constants.light_path_count) {
            Some(state) => state,
            None => return (p_film, l),
        };
        let light_path = frame.light_paths.paired_path(pixel_index);

        loop {
            let ray = Ray::spawn(&state.origin, &state.direction);
            let isect = match self.scene.intersect(&ray) {
                Some(isect) => isect,
                None => {
                    if let Some(index) = self.scene.background_light {
                        let c = self.direct_hit(&state, index, &ray.d, &ray.o);
                        accumulate(&mut l, state.throughput, c, ctx);
                    }
                    break;
                }
            };

            let primitive = self.scene.primitive(isect.primitive);
            let bsdf = match BSDF::new(&(-ray.d), &isect.n, &primitive.material) {
                Some(bsdf) => bsdf,
                None => break,
            };

            state.arrive(state.origin.distance(&isect.p), bsdf.cos_theta_fix());
            ctx.stats.eye_vertices += 1;

            if let Some(index) = primitive.area_light {
                let c = self.direct_hit(&state, index, &ray.d, &isect.p);
                accumulate(&mut l, state.throughput, c, ctx);
                break;
            }

            if state.path_length >= self.config.max_depth {
                break;
            }

            if !bsdf.is_delta() {
                let vertex = state.vertex(isect.p, bsdf);
                let q_eye = self.survival_prob(&bsdf, state.path_length);

                let c = self.direct_illumination(&vertex, q_eye, ctx);
                accumulate(&mut l, state.throughput, c, ctx);

                for light_vertex in light_path {
                    if light_vertex.path_length + 1 + state.path_length > self.config.max_depth {
                        break;
                    }
                    let c = self.connect_vertices(&vertex, light_vertex, q_eye, ctx);
                    accumulate(&mut l, state.throughput, c, ctx);
                }

                if self.constants.merging {
                    let c = self.merge(&vertex, q_eye, frame, ctx);
                    accumulate(&mut l, state.throughput * self.constants.vm_normalization, c, ctx);
                }
            }

            if state.path_length >= self.config.max_eye_depth {
                break;
            }

            if !self.sample_scattering(&bsdf, isect.p, &mut state, ctx) {
                break;
            }
        }

        (p_film, l)
    }
}

/// Adds a weighted contribution to the radiance estimate, dropping non-finite
/// values.
///
/// * `l`          - The radiance estimate.
/// * `throughput` - Eye subpath throughput.
/// * `c`          - Weighted contribution, if any.
/// * `ctx`        - Worker state.
fn accumulate(l: &mut Spectrum, throughput: Spectrum, c: Option<Spectrum>, ctx: &mut RenderContext) {
    let c = match c {
        Some(c) if !c.is_black() => throughput * c,
        _ => return,
    };
    if c.is_finite() {
        *l += c;
    } else {
        debug!("Dropping non-finite eye path contribution");
        ctx.stats.discarded += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cameras::PerspectiveCamera;
    use float_cmp::*;

    fn constants() -> MisConstants {
        MisConstants::new(VcmMode::Vcm, 0.01, 64)
    }

    #[test]
    fn emission_state_folds_pick_probability() {
        let emission = Emission {
            origin: Point3f::zero(),
            direction: Vector3f::new(0.0, 1.0, 0.0),
            energy: Spectrum::new(2.0),
            emission_pdf_w: 0.5,
            direct_pdf_a: 4.0,
            cos_at_light: 0.5,
        };

        let s = light_state_from_emission(&emission, 0.5, false, true, &constants()).unwrap();
        assert!(approx_eq!(f32, s.throughput[0], 8.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, s.d_vcm, 8.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, s.d_vc, 2.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, s.d_vm, 2.0 * constants().vc_weight_factor, epsilon = 1e-5));
        assert_eq!(s.path_length, 1);

        let s = light_state_from_emission(&emission, 0.5, true, true, &constants()).unwrap();
        assert_eq!(s.d_vc, 0.0);
        assert_eq!(s.d_vm, 0.0);

        let s = light_state_from_emission(&emission, 1.0, false, false, &constants()).unwrap();
        assert!(approx_eq!(f32, s.d_vc, 2.0, epsilon = 1e-5));
        assert!(!s.is_finite_light);
    }

    #[test]
    fn zero_emission_density_yields_no_subpath() {
        let emission = Emission {
            origin: Point3f::zero(),
            direction: Vector3f::new(0.0, 1.0, 0.0),
            energy: Spectrum::new(1.0),
            emission_pdf_w: 0.0,
            direct_pdf_a: 1.0,
            cos_at_light: 1.0,
        };
        assert!(light_state_from_emission(&emission, 1.0, false, true, &constants()).is_none());
    }

    #[test]
    fn camera_state_at_image_center() {
        let camera = PerspectiveCamera::new(
            Point3f::zero(),
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            90.0,
            Point2::new(16, 16),
        );
        let s = camera_state(&camera, &Point2f::new(8.0, 8.0), 256.0).unwrap();
        // cos = 1 so the density is the squared image plane distance.
        assert!(approx_eq!(f32, s.d_vcm, 256.0 / 64.0, epsilon = 1e-3));
        assert_eq!(s.d_vc, 0.0);
        assert_eq!(s.d_vm, 0.0);
        assert!(approx_eq!(f32, s.direction.z, 1.0, epsilon = 1e-5));
    }
}
