//! Primitives

use crate::geometry::*;
use crate::interaction::*;
use crate::material::*;
use crate::shape::*;

/// Scene ray intersection interface.
pub trait Intersector {
    /// Returns the closest hit along the ray, if any.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &Ray) -> Option<SurfaceInteraction>;

    /// Returns `true` if anything is hit along the ray.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool;

    /// Returns a bounding box of all geometry.
    fn world_bound(&self) -> Bounds3f;
}

/// A shape with its material and, for emitters, the index of its area light.
#[derive(Clone)]
pub struct GeometricPrimitive {
    /// The shape.
    pub shape: ArcShape,

    /// The material.
    pub material: Material,

    /// Index of the area light in the scene lights, if the primitive emits.
    pub area_light: Option<usize>,
}

impl GeometricPrimitive {
    /// Create a new `GeometricPrimitive`.
    ///
    /// * `shape`      - The shape.
    /// * `material`   - The material.
    /// * `area_light` - Index of the area light in the scene lights, if any.
    pub fn new(shape: ArcShape, material: Material, area_light: Option<usize>) -> Self {
        Self {
            shape,
            material,
            area_light,
        }
    }
}

/// Aggregate that tests every primitive; adequate for the small scenes this
/// renderer is exercised with.
#[derive(Clone, Default)]
pub struct PrimitiveList {
    /// The primitives.
    pub primitives: Vec<GeometricPrimitive>,
}

impl PrimitiveList {
    /// Create a new `PrimitiveList`.
    ///
    /// * `primitives` - The primitives.
    pub fn new(primitives: Vec<GeometricPrimitive>) -> Self {
        Self { primitives }
    }

    /// Returns the number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns true if there are no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Intersector for PrimitiveList {
    fn intersect(&self, r: &Ray) -> Option<SurfaceInteraction> {
        let mut ray = *r;
        let mut closest = None;
        for (i, primitive) in self.primitives.iter().enumerate() {
            if let Some(hit) = primitive.shape.intersect(&ray) {
                ray.t_max = hit.t;
                closest = Some(SurfaceInteraction::new(&ray, &hit, i));
            }
        }
        closest
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.primitives.iter().any(|p| p.shape.intersect_p(r))
    }

    fn world_bound(&self) -> Bounds3f {
        self.primitives
            .iter()
            .fold(Bounds3f::default(), |b, p| b.union(&p.shape.world_bound()))
    }
}
