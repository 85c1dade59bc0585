//! Vertex Merging

use super::connect::Connection;
use super::context::*;
use super::mis::*;
use super::tracer::*;
use super::vertex::*;
use super::IterationFrame;
use vcm_core::pbrt::*;
use vcm_core::spectrum::*;

/// Evaluates merging an eye vertex with a nearby light vertex. The light
/// vertex is treated as if it lay at the eye vertex. The contribution
/// excludes the kernel normalization and the eye subpath throughput.
///
/// * `eye`       - The eye vertex.
/// * `light`     - The light vertex.
/// * `q_eye`     - Russian roulette survival probability at the eye vertex.
/// * `constants` - MIS constants of the iteration.
pub fn merge_connection(eye: &PathVertex, light: &PathVertex, q_eye: Float, constants: &MisConstants) -> Option<Connection> {
    let eval = eye.bsdf.evaluate(&light.bsdf.world_dir_fix())?;
    let bsdf_dir_pdf_w = eval.dir_pdf_w * q_eye;
    let bsdf_rev_pdf_w = eval.rev_pdf_w * q_eye;

    Some(Connection {
        contribution: eval.f * light.throughput,
        weight_light: light.d_vcm * constants.vc_weight_factor + light.d_vm * mis(bsdf_dir_pdf_w),
        weight_camera: eye.d_vcm * constants.vc_weight_factor + eye.d_vm * mis(bsdf_rev_pdf_w),
    })
}

impl<'a> SubpathTracer<'a> {
    /// Returns the weighted sum over all light vertices within the merge
    /// radius of an eye vertex, before kernel normalization.
    ///
    /// * `eye`   - The eye vertex.
    /// * `q_eye` - Russian roulette survival probability at the eye vertex.
    /// * `frame` - Light subpaths and merge index of the iteration.
    /// * `ctx`   - Worker state.
    pub fn merge(&self, eye: &PathVertex, q_eye: Float, frame: &IterationFrame, ctx: &mut RenderContext) -> Option<Spectrum> {
        if frame.grid.is_empty() {
            return None;
        }

        let radius_sqr = sqr(frame.grid.radius());
        let vertices = &frame.light_paths.vertices;
        let max_depth = self.config.max_depth;

        let mut sum = Spectrum::zero();
        let mut candidates = 0;
        let mut merges = 0;
        frame.grid.for_each_candidate(&eye.p, |index| {
            candidates += 1;
            let light = match vertices.get(index) {
                Some(light) => light,
                None => return,
            };
            if light.p.distance_squared(&eye.p) > radius_sqr || light.path_length + eye.path_length > max_depth {
                return;
            }
            if let Some(c) = merge_connection(eye, light, q_eye, &self.constants) {
                merges += 1;
                sum += c.weighted();
            }
        });

        ctx.stats.merge_candidates += candidates;
        ctx.stats.merges += merges;
        Some(sum)
    }
}
