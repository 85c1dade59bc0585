//! Connection Strategies

use super::context::*;
use super::mis::*;
use super::tracer::*;
use super::vertex::*;
use super::RadianceContribution;
use vcm_core::camera::*;
use vcm_core::geometry::*;
use vcm_core::light::*;
use vcm_core::pbrt::*;
use vcm_core::sampler::*;
use vcm_core::sampling::*;
use vcm_core::spectrum::*;

/// An unweighted contribution of one strategy together with the MIS weight
/// ratios of the techniques on the light and camera sides.
#[derive(Copy, Clone, Debug)]
pub struct Connection {
    /// Unweighted contribution. Excludes the eye subpath throughput.
    pub contribution: Spectrum,

    /// Sum of density ratios of the techniques that sample more vertices on
    /// the light side.
    pub weight_light: Float,

    /// Sum of density ratios of the techniques that sample more vertices on
    /// the camera side.
    pub weight_camera: Float,
}

impl Connection {
    /// Returns the balance heuristic weight.
    pub fn mis_weight(&self) -> Float {
        1.0 / (self.weight_light + 1.0 + self.weight_camera)
    }

    /// Returns the MIS weighted contribution.
    pub fn weighted(&self) -> Spectrum {
        self.contribution * self.mis_weight()
    }
}

/// Evaluates an eye subpath that hit a light, either an area light or the
/// background.
///
/// * `state`    - Eye subpath after arriving at the light.
/// * `pick_pdf` - Probability of picking the light.
/// * `emitted`  - Emitted radiance and its densities.
pub fn direct_hit_connection(state: &SubpathState, pick_pdf: Float, emitted: &LightRadiance) -> Option<Connection> {
    if emitted.radiance.is_black() {
        return None;
    }

    // Only the camera ray can sample a light seen directly.
    if state.path_length == 1 {
        return Some(Connection {
            contribution: emitted.radiance,
            weight_light: 0.0,
            weight_camera: 0.0,
        });
    }

    let direct_pdf_a = emitted.direct_pdf_a * pick_pdf;
    let emission_pdf_w = emitted.emission_pdf_w * pick_pdf;
    Some(Connection {
        contribution: emitted.radiance,
        weight_light: 0.0,
        weight_camera: mis(direct_pdf_a) * state.d_vcm + mis(emission_pdf_w) * state.d_vc,
    })
}

/// Evaluates next event estimation from an eye vertex, excluding visibility.
///
/// * `vertex`       - The eye vertex.
/// * `illumination` - Sampled point on the light.
/// * `pick_pdf`     - Probability of picking the light.
/// * `is_delta`     - Whether the light is a delta light.
/// * `q`            - Russian roulette survival probability at the vertex.
/// * `constants`    - MIS constants of the iteration.
pub fn direct_illumination_connection(
    vertex: &PathVertex,
    illumination: &Illumination,
    pick_pdf: Float,
    is_delta: bool,
    q: Float,
    constants: &MisConstants,
) -> Option<Connection> {
    if illumination.radiance.is_black() || illumination.direct_pdf_w <= 0.0 {
        return None;
    }

    let eval = vertex.bsdf.evaluate(&illumination.wi)?;
    let bsdf_dir_pdf_w = eval.dir_pdf_w * q;
    let bsdf_rev_pdf_w = eval.rev_pdf_w * q;
    let direct_pdf_w = illumination.direct_pdf_w * pick_pdf;
    let emission_pdf_w = illumination.emission_pdf_w * pick_pdf;

    let weight_light = if is_delta {
        0.0
    } else {
        mis(bsdf_dir_pdf_w / direct_pdf_w)
    };
    let weight_camera = mis(emission_pdf_w * eval.cos_gen / (direct_pdf_w * illumination.cos_at_light))
        * (constants.vm_weight_factor + vertex.d_vcm + vertex.d_vc * mis(bsdf_rev_pdf_w));

    Some(Connection {
        contribution: illumination.radiance * eval.f * (eval.cos_gen / direct_pdf_w),
        weight_light,
        weight_camera,
    })
}

/// Evaluates the connection of a light vertex to the camera, excluding
/// visibility. Returns the film position, the unit direction and distance to
/// the camera and the connection.
///
/// * `camera`    - The camera.
/// * `vertex`    - The light vertex.
/// * `q`         - Russian roulette survival probability at the vertex.
/// * `constants` - MIS constants of the iteration.
pub fn camera_connection(
    camera: &dyn Camera,
    vertex: &PathVertex,
    q: Float,
    constants: &MisConstants,
) -> Option<(Point2f, Vector3f, Float, Connection)> {
    let to_camera = camera.position() - vertex.p;
    let distance = to_camera.length();
    if distance <= 0.0 {
        return None;
    }
    let dir_to_camera = to_camera / distance;

    let cos_at_camera = -camera.forward().dot(&dir_to_camera);
    if cos_at_camera <= 0.0 {
        return None;
    }
    let p_film = camera.project_to_film(&vertex.p)?;

    let eval = vertex.bsdf.evaluate(&dir_to_camera)?;
    let bsdf_rev_pdf_w = eval.rev_pdf_w * q;

    // Density of reaching the vertex from the camera, for unit pixel area.
    let image_point_to_camera_dist = camera.image_plane_distance() / cos_at_camera;
    let image_to_solid_angle = sqr(image_point_to_camera_dist) / cos_at_camera;
    let image_to_surface = image_to_solid_angle * eval.cos_gen / sqr(distance);
    let camera_pdf_a = image_to_surface;

    let weight_light = mis(camera_pdf_a / constants.light_path_count)
        * (constants.vm_weight_factor + vertex.d_vcm + vertex.d_vc * mis(bsdf_rev_pdf_w));

    let connection = Connection {
        contribution: vertex.throughput * eval.f * (image_to_surface / constants.light_path_count),
        weight_light,
        weight_camera: 0.0,
    };
    Some((p_film, dir_to_camera, distance, connection))
}

/// Evaluates the connection of an eye vertex to a light vertex, excluding
/// visibility. Returns the unit direction and distance from the eye vertex
/// to the light vertex and the connection.
///
/// * `eye`       - The eye vertex.
/// * `light`     - The light vertex.
/// * `q_eye`     - Russian roulette survival probability at the eye vertex.
/// * `q_light`   - Russian roulette survival probability at the light vertex.
/// * `constants` - MIS constants of the iteration.
pub fn vertex_connection(
    eye: &PathVertex,
    light: &PathVertex,
    q_eye: Float,
    q_light: Float,
    constants: &MisConstants,
) -> Option<(Vector3f, Float, Connection)> {
    let d = light.p - eye.p;
    let dist_sqr = d.length_squared();
    if dist_sqr <= 0.0 {
        return None;
    }
    let distance = dist_sqr.sqrt();
    let dir = d / distance;

    let eye_eval = eye.bsdf.evaluate(&dir)?;
    let light_eval = light.bsdf.evaluate(&(-dir))?;

    let eye_dir_pdf_w = eye_eval.dir_pdf_w * q_eye;
    let eye_rev_pdf_w = eye_eval.rev_pdf_w * q_eye;
    let light_dir_pdf_w = light_eval.dir_pdf_w * q_light;
    let light_rev_pdf_w = light_eval.rev_pdf_w * q_light;

    let g = eye_eval.cos_gen * light_eval.cos_gen / dist_sqr;

    let eye_dir_pdf_a = pdf_w_to_a(eye_dir_pdf_w, distance, light_eval.cos_gen);
    let light_dir_pdf_a = pdf_w_to_a(light_dir_pdf_w, distance, eye_eval.cos_gen);

    let weight_light = mis(eye_dir_pdf_a) * (constants.vm_weight_factor + light.d_vcm + light.d_vc * mis(light_rev_pdf_w));
    let weight_camera = mis(light_dir_pdf_a) * (constants.vm_weight_factor + eye.d_vcm + eye.d_vc * mis(eye_rev_pdf_w));

    let connection = Connection {
        contribution: eye_eval.f * light_eval.f * light.throughput * g,
        weight_light,
        weight_camera,
    };
    Some((dir, distance, connection))
}

impl<'a> SubpathTracer<'a> {
    /// Returns the weighted radiance of a light hit by the eye subpath.
    ///
    /// * `state`       - Eye subpath after arriving at the light.
    /// * `light_index` - Index of the light in the scene.
    /// * `ray_dir`     - Direction of the ray that hit the light.
    /// * `hit_point`   - The hit point; ignored for the background.
    pub fn direct_hit(
        &self,
        state: &SubpathState,
        light_index: usize,
        ray_dir: &Vector3f,
        hit_point: &Point3f,
    ) -> Option<Spectrum> {
        let light = self.scene.lights.get(light_index)?;
        let pick_pdf = self.scene.light_pick_pdf(light_index);
        let emitted = light.radiance(ray_dir, hit_point)?;
        direct_hit_connection(state, pick_pdf, &emitted).map(|c| c.weighted())
    }

    /// Returns the weighted next event estimate at an eye vertex.
    ///
    /// * `vertex` - The eye vertex.
    /// * `q`      - Russian roulette survival probability at the vertex.
    /// * `ctx`    - Worker state.
    pub fn direct_illumination(&self, vertex: &PathVertex, q: Float, ctx: &mut RenderContext) -> Option<Spectrum> {
        let u_light = ctx.sampler.get_1d();
        let u = ctx.sampler.get_2d();

        let (_, light, pick_pdf) = self.scene.select_light(u_light)?;
        let illumination = light.illuminate(&vertex.p, &u)?;
        let connection = direct_illumination_connection(
            vertex,
            &illumination,
            pick_pdf,
            light.is_delta(),
            q,
            &self.constants,
        )?;

        ctx.stats.shadow_rays += 1;
        if self.scene.occluded(&vertex.p, &illumination.wi, illumination.distance) {
            return None;
        }
        Some(connection.weighted())
    }

    /// Connects a light vertex to the camera. Returns the film contribution if
    /// the vertex is visible.
    ///
    /// * `vertex` - The light vertex.
    /// * `ctx`    - Worker state.
    pub fn connect_to_camera(&self, vertex: &PathVertex, ctx: &mut RenderContext) -> Option<RadianceContribution> {
        let q = self.survival_prob(&vertex.bsdf, vertex.path_length);
        let (p_film, dir_to_camera, distance, connection) = camera_connection(self.camera, vertex, q, &self.constants)?;

        let l = connection.weighted();
        if l.is_black() {
            return None;
        }
        if !l.is_finite() {
            debug!("Dropping non-finite light tracing contribution at ({}, {})", p_film.x, p_film.y);
            ctx.stats.discarded += 1;
            return None;
        }

        ctx.stats.shadow_rays += 1;
        if self.scene.occluded(&vertex.p, &dir_to_camera, distance) {
            return None;
        }
        Some(RadianceContribution::new(p_film, l))
    }

    /// Returns the weighted contribution of connecting an eye vertex to a
    /// light vertex.
    ///
    /// * `eye`   - The eye vertex.
    /// * `light` - The light vertex.
    /// * `q_eye` - Russian roulette survival probability at the eye vertex.
    /// * `ctx`   - Worker state.
    pub fn connect_vertices(
        &self,
        eye: &PathVertex,
        light: &PathVertex,
        q_eye: Float,
        ctx: &mut RenderContext,
    ) -> Option<Spectrum> {
        let q_light = self.survival_prob(&light.bsdf, light.path_length);
        let (dir, distance, connection) = vertex_connection(eye, light, q_eye, q_light, &self.constants)?;
        let l = connection.weighted();
        if l.is_black() {
            return None;
        }

        ctx.stats.shadow_rays += 1;
        if self.scene.occluded(&eye.p, &dir, distance) {
            return None;
        }
        Some(l)
    }
}

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use super::super::merge::merge_connection;
    use super::*;
    use cameras::PerspectiveCamera;
    use float_cmp::*;
    use lights::DiffuseAreaLight;
    use proptest::prelude::*;
    use samplers::RandomSampler;
    use shapes::Quad;
    use std::sync::Arc;
    use vcm_core::light_distrib::*;
    use vcm_core::material::*;
    use vcm_core::primitive::*;
    use vcm_core::reflection::*;
    use vcm_core::scene::*;

    const LIGHT_PATHS: usize = 64;

    fn ceiling_light() -> DiffuseAreaLight {
        let quad = Quad::new(
            Point3f::new(-0.25, 1.0, -0.25),
            Vector3f::new(0.5, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 0.5),
        );
        DiffuseAreaLight::new(quad, Spectrum::new(4.0))
    }

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(
            Point3f::new(0.0, 0.5, 2.0),
            Point3f::zero(),
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            Point2::new(8, 8),
        )
    }

    fn matte() -> Material {
        Material::matte(Spectrum::new(0.6))
    }

    /// Sums the MIS weights of every technique that can produce the path
    /// camera -> x -> y, with x on a floor at height 0 and y on the light.
    fn weight_sum(mode: VcmMode, x: Point3f, u: Point2f, rr_depth: usize) -> Option<Float> {
        let config = VcmConfig {
            mode,
            rr_depth,
            ..VcmConfig::default()
        };
        let constants = MisConstants::new(mode, 0.01, LIGHT_PATHS);
        let light = ceiling_light();
        let camera = camera();
        let n = Normal3f::new(0.0, 1.0, 0.0);
        let q = config.roulette_prob(0.6, 1);

        // Eye vertex at x.
        let p_film = camera.project_to_film(&x)?;
        let mut eye = camera_state(&camera, &p_film, constants.light_path_count)?;
        let to_x = x - eye.origin;
        let eye_bsdf = BSDF::new(&(-to_x.normalize()), &n, &matte())?;
        eye.arrive(to_x.length(), eye_bsdf.cos_theta_fix());
        let eye_vertex = eye.vertex(x, eye_bsdf);

        // Next event estimation samples y.
        let ill = light.illuminate(&x, &u)?;
        let y = x + ill.wi * ill.distance;
        let mut sum = direct_illumination_connection(&eye_vertex, &ill, 1.0, false, q, &constants)?.mis_weight();

        // The eye subpath scatters towards y and hits the light.
        let eval = eye_bsdf.evaluate(&ill.wi)?;
        let sample = BsdfSample {
            f: eval.f,
            wi: ill.wi,
            cos_theta: eval.cos_gen,
            pdf_w: eval.dir_pdf_w,
            rev_pdf_w: eval.rev_pdf_w,
            sampled_type: BxDFType::DIFFUSE,
        };
        let mut hit = eye;
        hit.scatter(x, &sample, q, &constants);
        hit.arrive(ill.distance, ill.cos_at_light);
        let emitted = light.radiance(&ill.wi, &y)?;
        sum += direct_hit_connection(&hit, 1.0, &emitted)?.mis_weight();

        // A light subpath leaves y towards x and connects to the camera.
        let emission = Emission {
            origin: y,
            direction: -ill.wi,
            energy: Spectrum::new(4.0) * ill.cos_at_light,
            emission_pdf_w: ill.emission_pdf_w,
            direct_pdf_a: 1.0 / 0.25,
            cos_at_light: ill.cos_at_light,
        };
        let mut lp = light_state_from_emission(&emission, 1.0, false, true, &constants)?;
        let light_bsdf = BSDF::new(&ill.wi, &n, &matte())?;
        lp.arrive(ill.distance, light_bsdf.cos_theta_fix());
        let light_vertex = lp.vertex(x, light_bsdf);
        let (_, _, _, lt) = camera_connection(&camera, &light_vertex, q, &constants)?;
        sum += lt.mis_weight();

        if mode.merges() {
            sum += merge_connection(&eye_vertex, &light_vertex, q, &constants)?.mis_weight();
        }
        Some(sum)
    }

    /// Returns a BSDF sample that scatters towards a given direction.
    fn sample_towards(bsdf: &BSDF, wi: Vector3f) -> Option<BsdfSample> {
        let eval = bsdf.evaluate(&wi)?;
        Some(BsdfSample {
            f: eval.f,
            wi,
            cos_theta: eval.cos_gen,
            pdf_w: eval.dir_pdf_w,
            rev_pdf_w: eval.rev_pdf_w,
            sampled_type: BxDFType::DIFFUSE,
        })
    }

    /// Sums the MIS weights of every technique that can produce the path
    /// camera -> x1 -> x2 -> y, with x1 on the floor, x2 on a wall at z = -1
    /// and y on the light. Subscripts count segments from the subpath origin.
    fn three_segment_weight_sum(mode: VcmMode, x1: Point3f, x2: Point3f, u: Point2f, rr_depth: usize) -> Option<Float> {
        let config = VcmConfig {
            mode,
            rr_depth,
            ..VcmConfig::default()
        };
        let constants = MisConstants::new(mode, 0.01, LIGHT_PATHS);
        let light = ceiling_light();
        let camera = camera();
        let n1 = Normal3f::new(0.0, 1.0, 0.0);
        let n2 = Normal3f::new(0.0, 0.0, 1.0);
        let d12 = x2 - x1;
        let dist12 = d12.length();
        let dir12 = d12 / dist12;

        // Eye subpath c -> x1 -> x2.
        let p_film = camera.project_to_film(&x1)?;
        let mut eye = camera_state(&camera, &p_film, constants.light_path_count)?;
        let to_x1 = x1 - eye.origin;
        let eye_bsdf1 = BSDF::new(&(-to_x1.normalize()), &n1, &matte())?;
        eye.arrive(to_x1.length(), eye_bsdf1.cos_theta_fix());
        let eye1 = eye.vertex(x1, eye_bsdf1);
        let q_eye1 = config.roulette_prob(0.6, 1);

        eye.scatter(x1, &sample_towards(&eye_bsdf1, dir12)?, q_eye1, &constants);
        let eye_bsdf2 = BSDF::new(&(-dir12), &n2, &matte())?;
        eye.arrive(dist12, eye_bsdf2.cos_theta_fix());
        let eye2 = eye.vertex(x2, eye_bsdf2);
        let q_eye2 = config.roulette_prob(0.6, 2);

        // Next event estimation at x2 samples y.
        let ill = light.illuminate(&x2, &u)?;
        let y = x2 + ill.wi * ill.distance;
        let mut sum = direct_illumination_connection(&eye2, &ill, 1.0, false, q_eye2, &constants)?.mis_weight();

        // The eye subpath continues to y and hits the light.
        let mut hit = eye;
        hit.scatter(x2, &sample_towards(&eye_bsdf2, ill.wi)?, q_eye2, &constants);
        hit.arrive(ill.distance, ill.cos_at_light);
        let emitted = light.radiance(&ill.wi, &y)?;
        sum += direct_hit_connection(&hit, 1.0, &emitted)?.mis_weight();

        // Light subpath y -> x2 -> x1.
        let emission = Emission {
            origin: y,
            direction: -ill.wi,
            energy: Spectrum::new(4.0) * ill.cos_at_light,
            emission_pdf_w: ill.emission_pdf_w,
            direct_pdf_a: 1.0 / 0.25,
            cos_at_light: ill.cos_at_light,
        };
        let mut lp = light_state_from_emission(&emission, 1.0, false, true, &constants)?;
        let light_bsdf2 = BSDF::new(&ill.wi, &n2, &matte())?;
        lp.arrive(ill.distance, light_bsdf2.cos_theta_fix());
        let light1 = lp.vertex(x2, light_bsdf2);
        let q_light1 = config.roulette_prob(0.6, 1);

        let (_, _, vc) = vertex_connection(&eye1, &light1, q_eye1, q_light1, &constants)?;
        sum += vc.mis_weight();

        lp.scatter(x2, &sample_towards(&light_bsdf2, -dir12)?, q_light1, &constants);
        let light_bsdf1 = BSDF::new(&dir12, &n1, &matte())?;
        lp.arrive(dist12, light_bsdf1.cos_theta_fix());
        let light2 = lp.vertex(x1, light_bsdf1);
        let q_light2 = config.roulette_prob(0.6, 2);

        let (_, _, _, lt) = camera_connection(&camera, &light2, q_light2, &constants)?;
        sum += lt.mis_weight();

        if mode.merges() {
            sum += merge_connection(&eye1, &light2, q_eye1, &constants)?.mis_weight();
            sum += merge_connection(&eye2, &light1, q_eye2, &constants)?.mis_weight();
        }
        Some(sum)
    }

    #[test]
    fn connection_weight_is_balance_heuristic() {
        let c = Connection {
            contribution: Spectrum::new(3.0),
            weight_light: 1.0,
            weight_camera: 1.0,
        };
        assert!(approx_eq!(f32, c.mis_weight(), 1.0 / 3.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, c.weighted()[1], 1.0, epsilon = 1e-6));
    }

    #[test]
    fn camera_ray_hitting_light_has_full_weight() {
        let state = SubpathState {
            origin: Point3f::zero(),
            direction: Vector3f::new(0.0, 1.0, 0.0),
            throughput: Spectrum::new(1.0),
            path_length: 1,
            is_finite_light: true,
            d_vcm: 10.0,
            d_vc: 0.0,
            d_vm: 0.0,
        };
        let emitted = LightRadiance {
            radiance: Spectrum::new(2.0),
            direct_pdf_a: 4.0,
            emission_pdf_w: 1.0,
        };
        let c = direct_hit_connection(&state, 0.5, &emitted).unwrap();
        assert_eq!(c.mis_weight(), 1.0);
    }

    proptest! {
        #[test]
        fn bidirectional_weights_sum_to_one(
            x in -0.5f32..0.5,
            z in -0.5f32..0.5,
            u0 in 0.01f32..0.99,
            u1 in 0.01f32..0.99,
        ) {
            if let Some(sum) = weight_sum(VcmMode::Bpt, Point3f::new(x, 0.0, z), Point2f::new(u0, u1), 3) {
                prop_assert!(approx_eq!(f32, sum, 1.0, epsilon = 1e-3), "sum = {}", sum);
            }
        }

        #[test]
        fn vcm_weights_sum_to_one(
            x in -0.5f32..0.5,
            z in -0.5f32..0.5,
            u0 in 0.01f32..0.99,
            u1 in 0.01f32..0.99,
            rr_depth in 0usize..4,
        ) {
            if let Some(sum) = weight_sum(VcmMode::Vcm, Point3f::new(x, 0.0, z), Point2f::new(u0, u1), rr_depth) {
                prop_assert!(approx_eq!(f32, sum, 1.0, epsilon = 1e-3), "sum = {}", sum);
            }
        }

        // At rr_depth 2 the eye and light subpaths disagree on whether the
        // middle vertices play roulette, so the weights are not normalized.
        #[test]
        fn three_segment_weights_sum_to_one(
            x in -0.5f32..0.5,
            z in -0.5f32..0.5,
            a in -0.5f32..0.5,
            b in 0.2f32..0.7,
            u0 in 0.01f32..0.99,
            u1 in 0.01f32..0.99,
            merging in proptest::bool::ANY,
            rr_depth in prop::sample::select(vec![0usize, 1, 3, 8]),
        ) {
            let mode = if merging { VcmMode::Vcm } else { VcmMode::Bpt };
            let x1 = Point3f::new(x, 0.0, z);
            let x2 = Point3f::new(a, b, -1.0);
            if let Some(sum) = three_segment_weight_sum(mode, x1, x2, Point2f::new(u0, u1), rr_depth) {
                prop_assert!(approx_eq!(f32, sum, 1.0, epsilon = 1e-3), "sum = {}", sum);
            }
        }
    }

    fn scene_with_blocker(blocked: bool) -> Scene {
        let floor = Quad::new(
            Point3f::new(-1.0, 0.0, 1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -2.0),
        );
        let mut primitives = vec![GeometricPrimitive::new(Arc::new(floor), matte(), None)];
        if blocked {
            // Plate between the floor and the camera.
            let plate = Quad::new(
                Point3f::new(-1.0, 0.3, 1.5),
                Vector3f::new(2.0, 0.0, 0.0),
                Vector3f::new(0.0, 0.0, -2.0),
            );
            primitives.push(GeometricPrimitive::new(Arc::new(plate), matte(), None));
        }
        let lights: Vec<ArcLight> = vec![Arc::new(ceiling_light())];
        Scene::new(PrimitiveList::new(primitives), lights, None, LightSampleStrategy::Uniform)
    }

    #[test]
    fn light_tracing_respects_visibility() {
        let config = VcmConfig::default();
        let constants = MisConstants::new(VcmMode::Vcm, 0.01, LIGHT_PATHS);
        let camera = camera();
        let n = Normal3f::new(0.0, 1.0, 0.0);

        let wi = Vector3f::new(0.0, 1.0, 0.0);
        let bsdf = BSDF::new(&wi, &n, &matte()).unwrap();
        let vertex = PathVertex {
            p: Point3f::zero(),
            bsdf,
            throughput: Spectrum::new(1.0),
            path_length: 1,
            d_vcm: 1.0,
            d_vc: 1.0,
            d_vm: 0.0,
        };

        let open = scene_with_blocker(false);
        let tracer = SubpathTracer::new(&config, constants, &open, &camera);
        let mut ctx = RenderContext::new(Box::new(RandomSampler::new(Some(1))));
        let splat = tracer.connect_to_camera(&vertex, &mut ctx);
        assert!(splat.is_some());
        let splat = splat.unwrap();
        assert!(splat.l.y() > 0.0);
        assert!(approx_eq!(f32, splat.p_film.x, 4.0, epsilon = 1e-3));

        let closed = scene_with_blocker(true);
        let tracer = SubpathTracer::new(&config, constants, &closed, &camera);
        assert!(tracer.connect_to_camera(&vertex, &mut ctx).is_none());
        assert_eq!(ctx.stats.shadow_rays, 2);
    }

    /// A floor half covered by a plate, lit from above by a wide light that is
    /// not part of the geometry. The camera looks straight down, so floor
    /// points under the plate are hidden from it.
    fn light_trap() -> Scene {
        let floor = Quad::new(
            Point3f::new(-1.0, 0.0, 1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -2.0),
        );
        let plate = Quad::new(
            Point3f::new(0.0, 0.5, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -2.0),
        );
        let light = DiffuseAreaLight::new(
            Quad::new(
                Point3f::new(-1.0, 1.5, -1.0),
                Vector3f::new(2.0, 0.0, 0.0),
                Vector3f::new(0.0, 0.0, 2.0),
            ),
            Spectrum::new(1.0),
        );
        let primitives = vec![
            GeometricPrimitive::new(Arc::new(floor), matte(), None),
            GeometricPrimitive::new(Arc::new(plate), matte(), None),
        ];
        let lights: Vec<ArcLight> = vec![Arc::new(light)];
        Scene::new(PrimitiveList::new(primitives), lights, None, LightSampleStrategy::Uniform)
    }

    #[test]
    fn light_paths_splat_only_where_the_camera_sees_them() {
        let config = VcmConfig {
            max_depth: 2,
            ..VcmConfig::default()
        };
        let constants = MisConstants::new(VcmMode::Vcm, 0.01, LIGHT_PATHS);
        let camera = PerspectiveCamera::new(
            Point3f::new(0.0, 3.0, 0.0),
            Point3f::zero(),
            Vector3f::new(0.0, 0.0, 1.0),
            60.0,
            Point2::new(16, 16),
        );
        let scene = light_trap();
        let tracer = SubpathTracer::new(&config, constants, &scene, &camera);
        let mut ctx = RenderContext::new(Box::new(RandomSampler::new(Some(3))));

        let mut hidden = 0;
        let mut visible = 0;
        let mut vertices = Vec::new();
        let mut splats = Vec::new();
        for _ in 0..4000 {
            vertices.clear();
            splats.clear();
            tracer.trace_light_path(&mut ctx, &mut vertices, &mut splats);
            assert!(vertices.len() <= 1);

            let p = match vertices.first() {
                Some(v) => v.p,
                None => continue,
            };
            if p.y < 0.25 && p.x > 0.05 {
                hidden += 1;
                assert!(splats.is_empty(), "splat from hidden floor point {:?}", p);
            } else if p.y > 0.25 || p.x < -0.05 {
                visible += 1;
                assert_eq!(splats.len(), 1, "no splat from visible point {:?}", p);
                assert!(splats[0].l.y() > 0.0);
            }
        }

        assert!(hidden > 0);
        assert!(visible > 0);
        assert_eq!(ctx.stats.light_paths, 4000);
    }
}
