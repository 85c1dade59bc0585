//! Scene

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::light_distrib::*;
use crate::pbrt::*;
use crate::primitive::*;

/// Scene.
pub struct Scene {
    /// An aggregate of all primitives in the scene.
    pub aggregate: PrimitiveList,

    /// All light sources in the scene.
    pub lights: Vec<ArcLight>,

    /// Index of the light at infinity returned for rays that escape the scene.
    pub background_light: Option<usize>,

    /// The bounding box of the scene geometry.
    pub world_bound: Bounds3f,

    /// Sphere bounding the scene geometry.
    pub scene_sphere: BoundingSphere,

    /// Strategy for picking a light.
    light_selector: BoxLightSelector,
}

impl Scene {
    /// Creates a new `Scene`.
    ///
    /// * `aggregate`        - An aggregate of all primitives in the scene.
    /// * `lights`           - All light sources in the scene.
    /// * `background_light` - Index of the light at infinity, if any.
    /// * `strategy`         - Strategy for picking a light.
    pub fn new(
        aggregate: PrimitiveList,
        lights: Vec<ArcLight>,
        background_light: Option<usize>,
        strategy: LightSampleStrategy,
    ) -> Self {
        let world_bound = aggregate.world_bound();
        let scene_sphere = world_bound.bounding_sphere();
        let light_selector = create_light_selector(strategy, &lights);

        Self {
            aggregate,
            lights,
            background_light,
            world_bound,
            scene_sphere,
            light_selector,
        }
    }

    /// Traces the ray into the scene and returns the `SurfaceInteraction` if
    /// an intersection occurred.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        self.aggregate.intersect(ray)
    }

    /// Traces the ray into the scene and returns whether or not an intersection
    /// occurred.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.aggregate.intersect_p(ray)
    }

    /// Returns true if the segment from `p` along unit direction `d` of given
    /// length is blocked.
    ///
    /// * `p`        - Start point.
    /// * `d`        - Unit direction.
    /// * `distance` - Length of the segment.
    pub fn occluded(&self, p: &Point3f, d: &Vector3f, distance: Float) -> bool {
        self.intersect_p(&Ray::segment(p, d, distance))
    }

    /// Returns the primitive with the given index.
    ///
    /// * `index` - Index of the primitive.
    pub fn primitive(&self, index: usize) -> &GeometricPrimitive {
        &self.aggregate.primitives[index]
    }

    /// Picks a light. Returns its index, the light and the probability of picking it.
    ///
    /// * `u` - The random sample.
    pub fn select_light(&self, u: Float) -> Option<(usize, &ArcLight, Float)> {
        self.light_selector
            .sample(u)
            .and_then(|(index, pdf)| self.lights.get(index).map(|light| (index, light, pdf)))
    }

    /// Returns the probability of picking the light at the given index.
    ///
    /// * `light_index` - Index of the light.
    pub fn light_pick_pdf(&self, light_index: usize) -> Float {
        self.light_selector.pdf(light_index)
    }
}
