//! Path Vertices

use super::hash_grid::*;
use super::mis::*;
use super::RadianceContribution;
use std::ops::Range;
use vcm_core::geometry::*;
use vcm_core::pbrt::*;
use vcm_core::reflection::*;
use vcm_core::spectrum::*;

/// A scattering vertex of a subpath.
#[derive(Copy, Clone, Debug)]
pub struct PathVertex {
    /// Position.
    pub p: Point3f,

    /// Scattering function with the direction to the previous vertex fixed.
    pub bsdf: BSDF,

    /// Path throughput up to and including the segment arriving here.
    pub throughput: Spectrum,

    /// Number of segments from the subpath origin.
    pub path_length: usize,

    /// Partial MIS weight shared by connections and merging.
    pub d_vcm: Float,

    /// Partial MIS weight for vertex connection.
    pub d_vc: Float,

    /// Partial MIS weight for vertex merging.
    pub d_vm: Float,
}

impl GridPoint for PathVertex {
    fn position(&self) -> Point3f {
        self.p
    }
}

/// State of a subpath while it is being traced.
#[derive(Copy, Clone, Debug)]
pub struct SubpathState {
    /// Origin of the next segment.
    pub origin: Point3f,

    /// Unit direction of the next segment.
    pub direction: Vector3f,

    /// Path throughput.
    pub throughput: Spectrum,

    /// Number of segments including the next one.
    pub path_length: usize,

    /// Whether the subpath started on a light at a finite distance. Always
    /// true for eye subpaths.
    pub is_finite_light: bool,

    /// Partial MIS weight shared by connections and merging.
    pub d_vcm: Float,

    /// Partial MIS weight for vertex connection.
    pub d_vc: Float,

    /// Partial MIS weight for vertex merging.
    pub d_vm: Float,
}

impl SubpathState {
    /// Updates the partial MIS weights when the next segment reaches a surface.
    ///
    /// The squared distance turns the solid angle density of the previous bounce
    /// into an area density. Lights at infinity emit with an area density on
    /// their disk so the first segment skips it.
    ///
    /// * `distance` - Length of the segment.
    /// * `cos_fix`  - Cosine between the surface normal and the arriving direction.
    pub fn arrive(&mut self, distance: Float, cos_fix: Float) {
        if self.path_length > 1 || self.is_finite_light {
            self.d_vcm *= sqr(distance);
        }

        let inv_cos = 1.0 / abs(cos_fix);
        self.d_vcm *= inv_cos;
        self.d_vc *= inv_cos;
        self.d_vm *= inv_cos;
    }

    /// Continues the subpath with a sampled direction and updates throughput
    /// and the partial MIS weights.
    ///
    /// * `p`         - Position of the scattering vertex.
    /// * `sample`    - The BSDF sample.
    /// * `q`         - Russian roulette survival probability of the vertex; 1
    ///                 when roulette is not played.
    /// * `constants` - MIS constants of the iteration.
    pub fn scatter(&mut self, p: Point3f, sample: &BsdfSample, q: Float, constants: &MisConstants) {
        let dir_pdf_w = sample.pdf_w * q;
        let rev_pdf_w = sample.rev_pdf_w * q;
        let cos_out = abs(sample.cos_theta);

        if sample.is_specular() {
            // Forward and reverse densities are equal and cancel.
            self.d_vcm = 0.0;
            self.d_vc *= mis(cos_out);
            self.d_vm *= mis(cos_out);
        } else {
            let scale = mis(cos_out / dir_pdf_w);
            self.d_vc = scale * (self.d_vc * mis(rev_pdf_w) + self.d_vcm + constants.vm_weight_factor);
            self.d_vm = scale * (self.d_vm * mis(rev_pdf_w) + self.d_vcm * constants.vc_weight_factor + 1.0);
            self.d_vcm = mis(1.0 / dir_pdf_w);
        }

        self.throughput *= sample.f * (cos_out / dir_pdf_w);
        self.origin = p;
        self.direction = sample.wi;
        self.path_length += 1;
    }

    /// Returns true if the throughput and partial weights are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.throughput.is_finite() && self.d_vcm.is_finite() && self.d_vc.is_finite() && self.d_vm.is_finite()
    }

    /// Returns the vertex for a surface hit after `arrive()`.
    ///
    /// * `p`    - Hit position.
    /// * `bsdf` - Scattering function at the hit.
    pub fn vertex(&self, p: Point3f, bsdf: BSDF) -> PathVertex {
        PathVertex {
            p,
            bsdf,
            throughput: self.throughput,
            path_length: self.path_length,
            d_vcm: self.d_vcm,
            d_vc: self.d_vc,
            d_vm: self.d_vm,
        }
    }
}

/// Storage for all light subpaths of an iteration. Vertices of path `i` are
/// contiguous and so are its light tracing splats.
#[derive(Clone, Debug, Default)]
pub struct LightPathArena {
    /// Vertices of all light subpaths in path order.
    pub vertices: Vec<PathVertex>,

    /// Light tracing contributions of all light subpaths in path order.
    pub splats: Vec<RadianceContribution>,

    /// Range of `vertices` for each light subpath.
    vertex_ranges: Vec<Range<usize>>,

    /// Range of `splats` for each light subpath.
    splat_ranges: Vec<Range<usize>>,
}

impl LightPathArena {
    /// Create an empty arena with room for a number of light subpaths.
    ///
    /// * `path_count` - Expected number of light subpaths.
    pub fn with_capacity(path_count: usize) -> Self {
        Self {
            vertices: Vec::new(),
            splats: Vec::new(),
            vertex_ranges: Vec::with_capacity(path_count),
            splat_ranges: Vec::with_capacity(path_count),
        }
    }

    /// Appends the next light subpath.
    ///
    /// * `vertices` - Stored vertices of the subpath.
    /// * `splats`   - Light tracing contributions of the subpath.
    pub fn push_path(&mut self, vertices: &[PathVertex], splats: &[RadianceContribution]) {
        let start = self.vertices.len();
        self.vertices.extend_from_slice(vertices);
        self.vertex_ranges.push(start..self.vertices.len());

        let start = self.splats.len();
        self.splats.extend_from_slice(splats);
        self.splat_ranges.push(start..self.splats.len());
    }

    /// Moves all light subpaths of another arena to the end of this one.
    ///
    /// * `other` - The arena to append.
    pub fn append(&mut self, other: Self) {
        let v0 = self.vertices.len();
        let s0 = self.splats.len();
        self.vertices.extend(other.vertices);
        self.splats.extend(other.splats);
        self.vertex_ranges
            .extend(other.vertex_ranges.into_iter().map(|r| r.start + v0..r.end + v0));
        self.splat_ranges
            .extend(other.splat_ranges.into_iter().map(|r| r.start + s0..r.end + s0));
    }

    /// Returns the number of light subpaths.
    pub fn path_count(&self) -> usize {
        self.vertex_ranges.len()
    }

    /// Returns the vertices of a light subpath. Unknown indices yield no vertices.
    ///
    /// * `index` - Index of the light subpath.
    pub fn path(&self, index: usize) -> &[PathVertex] {
        match self.vertex_ranges.get(index) {
            Some(r) => &self.vertices[r.clone()],
            None => &[],
        }
    }

    /// Returns the light subpath paired with an eye sample. Eye samples wrap
    /// around when there are fewer light subpaths than samples.
    ///
    /// * `sample_index` - Index of the eye sample.
    pub fn paired_path(&self, sample_index: usize) -> &[PathVertex] {
        match self.path_count() {
            0 => &[],
            n => self.path(sample_index % n),
        }
    }

    /// Returns the light tracing contributions of a light subpath.
    ///
    /// * `index` - Index of the light subpath.
    pub fn path_splats(&self, index: usize) -> &[RadianceContribution] {
        match self.splat_ranges.get(index) {
            Some(r) => &self.splats[r.clone()],
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use vcm_core::material::Material;

    fn state(path_length: usize, is_finite_light: bool) -> SubpathState {
        SubpathState {
            origin: Point3f::zero(),
            direction: Vector3f::new(0.0, 0.0, 1.0),
            throughput: Spectrum::new(1.0),
            path_length,
            is_finite_light,
            d_vcm: 1.0,
            d_vc: 2.0,
            d_vm: 3.0,
        }
    }

    #[test]
    fn arrival_converts_to_area_measure() {
        let mut s = state(1, true);
        s.arrive(2.0, -0.5);
        assert!(approx_eq!(f32, s.d_vcm, 8.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.d_vc, 4.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.d_vm, 6.0, epsilon = 1e-6));
    }

    #[test]
    fn first_segment_from_infinity_skips_distance() {
        let mut s = state(1, false);
        s.arrive(100.0, 1.0);
        assert_eq!(s.d_vcm, 1.0);

        let mut s = state(2, false);
        s.arrive(100.0, 1.0);
        assert_eq!(s.d_vcm, 10_000.0);
    }

    #[test]
    fn arena_keeps_paths_apart() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let bsdf = BSDF::new(&Vector3f::new(0.0, 0.0, 1.0), &n, &Material::matte(Spectrum::new(0.5))).unwrap();
        let v = state(1, true).vertex(Point3f::zero(), bsdf);
        let splat = RadianceContribution::new(Point2f::new(0.5, 0.5), Spectrum::new(1.0));

        let mut arena = LightPathArena::with_capacity(3);
        arena.push_path(&[v, v], &[]);
        arena.push_path(&[], &[splat]);
        arena.push_path(&[v], &[splat, splat]);

        assert_eq!(arena.path_count(), 3);
        assert_eq!(arena.path(0).len(), 2);
        assert!(arena.path(1).is_empty());
        assert_eq!(arena.path(2).len(), 1);
        assert_eq!(arena.path_splats(1).len(), 1);
        assert_eq!(arena.path_splats(2).len(), 2);
        assert!(arena.path(3).is_empty());
        assert_eq!(arena.paired_path(3).len(), 2);
        assert_eq!(arena.paired_path(5).len(), 1);
        assert!(LightPathArena::default().paired_path(0).is_empty());
        assert_eq!(arena.vertices.len(), 3);

        let mut joined = LightPathArena::default();
        joined.push_path(&[v], &[]);
        joined.append(arena);
        assert_eq!(joined.path_count(), 4);
        assert_eq!(joined.path(1).len(), 2);
        assert_eq!(joined.path(3).len(), 1);
        assert_eq!(joined.path_splats(3).len(), 2);
    }

    #[test]
    fn lambertian_bounce_keeps_unit_albedo_throughput() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let bsdf = BSDF::new(&Vector3f::new(0.0, 0.0, 1.0), &n, &Material::matte(Spectrum::new(0.5))).unwrap();
        let sample = bsdf.sample(0.5, &Point2f::new(0.3, 0.7)).unwrap();
        let constants = MisConstants::new(super::super::VcmMode::Bpt, 0.1, 100);

        let mut s = state(1, true);
        s.scatter(Point3f::zero(), &sample, 1.0, &constants);
        assert!(approx_eq!(f32, s.throughput[0], 0.5, epsilon = 1e-5));
        assert_eq!(s.path_length, 2);
        assert!(approx_eq!(f32, s.d_vcm, 1.0 / sample.pdf_w, epsilon = 1e-4));

        // Surviving roulette with q = albedo restores unit throughput.
        let mut s = state(1, true);
        s.scatter(Point3f::zero(), &sample, 0.5, &constants);
        assert!(approx_eq!(f32, s.throughput[0], 1.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, s.d_vcm, 1.0 / (0.5 * sample.pdf_w), epsilon = 1e-4));
    }

    #[test]
    fn specular_bounce_clears_connection_weight() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let dir_fix = Vector3f::new(0.6, 0.0, 0.8);
        let bsdf = BSDF::new(&dir_fix, &n, &Material::mirror(Spectrum::new(1.0))).unwrap();
        let sample = bsdf.sample(0.5, &Point2f::new(0.5, 0.5)).unwrap();
        let constants = MisConstants::new(super::super::VcmMode::Vcm, 0.1, 100);

        let mut s = state(1, true);
        s.scatter(Point3f::zero(), &sample, 1.0, &constants);
        assert_eq!(s.d_vcm, 0.0);
        assert!(approx_eq!(f32, s.d_vc, 2.0 * 0.8, epsilon = 1e-5));
        assert!(approx_eq!(f32, s.throughput[0], 1.0, epsilon = 1e-5));
    }
}
