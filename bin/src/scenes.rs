//! Built-in Scenes

use cameras::PerspectiveCamera;
use lights::{BackgroundLight, DiffuseAreaLight, PointLight};
use shapes::{Quad, Sphere};
use std::sync::Arc;
use vcm_core::app::SceneChoice;
use vcm_core::camera::*;
use vcm_core::geometry::*;
use vcm_core::light::*;
use vcm_core::light_distrib::*;
use vcm_core::material::*;
use vcm_core::primitive::*;
use vcm_core::scene::*;
use vcm_core::shape::*;
use vcm_core::spectrum::*;

/// Returns a built-in scene and the camera looking at it.
///
/// * `choice`     - The scene.
/// * `resolution` - Image resolution in pixels.
/// * `strategy`   - Strategy for picking a light.
pub fn build_scene(choice: SceneChoice, resolution: Point2<usize>, strategy: LightSampleStrategy) -> (Scene, ArcCamera) {
    let (primitives, lights, background_light) = match choice {
        SceneChoice::Box => lit_box(),
        SceneChoice::Spheres => spheres_in_box(),
        SceneChoice::Sky => sky(),
    };
    info!(
        "Scene {:?}: {} primitives, {} lights",
        choice,
        primitives.len(),
        lights.len()
    );

    let camera: ArcCamera = Arc::new(PerspectiveCamera::new(
        Point3f::new(0.0, 1.0, 3.6),
        Point3f::new(0.0, 1.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        resolution,
    ));

    let scene = Scene::new(PrimitiveList::new(primitives), lights, background_light, strategy);
    (scene, camera)
}

/// Returns the five walls of a box spanning `[-1, 1] x [0, 2] x [-1, 1]`,
/// open towards +z.
fn walls() -> Vec<GeometricPrimitive> {
    let white = Material::matte(Spectrum::new(0.75));
    let red = Material::matte(Spectrum::from_rgb(0.75, 0.1, 0.1));
    let blue = Material::matte(Spectrum::from_rgb(0.1, 0.1, 0.75));

    let quad = |p0: Point3f, e1: Vector3f, e2: Vector3f, material: Material| {
        GeometricPrimitive::new(Arc::new(Quad::new(p0, e1, e2)), material, None)
    };

    vec![
        // Floor.
        quad(
            Point3f::new(-1.0, 0.0, 1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -2.0),
            white,
        ),
        // Ceiling.
        quad(
            Point3f::new(-1.0, 2.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            white,
        ),
        // Back.
        quad(
            Point3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 2.0, 0.0),
            white,
        ),
        // Left.
        quad(
            Point3f::new(-1.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, -2.0),
            Vector3f::new(0.0, 2.0, 0.0),
            red,
        ),
        // Right.
        quad(
            Point3f::new(1.0, 0.0, -1.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, 2.0, 0.0),
            blue,
        ),
    ]
}

/// Glossy and mirror spheres resting on the floor.
fn spheres() -> Vec<GeometricPrimitive> {
    let glossy = Material::glossy(Spectrum::new(0.1), Spectrum::new(0.7), 90.0);
    let mirror = Material::mirror(Spectrum::new(0.95));
    vec![
        GeometricPrimitive::new(Arc::new(Sphere::new(Point3f::new(-0.45, 0.35, -0.3), 0.35)), glossy, None),
        GeometricPrimitive::new(Arc::new(Sphere::new(Point3f::new(0.45, 0.35, 0.2), 0.35)), mirror, None),
    ]
}

type SceneParts = (Vec<GeometricPrimitive>, Vec<ArcLight>, Option<usize>);

/// Diffuse box lit by a ceiling area light.
fn lit_box() -> SceneParts {
    let mut primitives = walls();
    primitives.extend(spheres());

    // Edge order makes the emitter face down.
    let emitter = Quad::new(
        Point3f::new(-0.25, 1.98, -0.25),
        Vector3f::new(0.5, 0.0, 0.0),
        Vector3f::new(0.0, 0.0, 0.5),
    );
    primitives.push(GeometricPrimitive::new(
        Arc::new(emitter.clone()),
        Material::black(),
        Some(0),
    ));
    let lights: Vec<ArcLight> = vec![Arc::new(DiffuseAreaLight::new(emitter, Spectrum::new(25.0)))];
    (primitives, lights, None)
}

/// Diffuse box lit by a point light; caustics from the mirror sphere are only
/// reachable by merging.
fn spheres_in_box() -> SceneParts {
    let mut primitives = walls();
    primitives.extend(spheres());

    let lights: Vec<ArcLight> = vec![Arc::new(PointLight::new(Point3f::new(0.0, 1.7, 0.3), Spectrum::new(3.0)))];
    (primitives, lights, None)
}

/// Ground plane and spheres under a constant sky.
fn sky() -> SceneParts {
    let ground = Quad::new(
        Point3f::new(-4.0, 0.0, 4.0),
        Vector3f::new(8.0, 0.0, 0.0),
        Vector3f::new(0.0, 0.0, -8.0),
    );
    let mut primitives = vec![GeometricPrimitive::new(
        Arc::new(ground),
        Material::matte(Spectrum::new(0.6)),
        None,
    )];
    primitives.extend(spheres());

    let scene_sphere = primitives
        .iter()
        .fold(Bounds3f::default(), |b, p| b.union(&p.shape.world_bound()))
        .bounding_sphere();
    let lights: Vec<ArcLight> = vec![Arc::new(BackgroundLight::new(
        Spectrum::from_rgb(0.6, 0.75, 1.0),
        scene_sphere,
    ))];
    (primitives, lights, Some(0))
}
