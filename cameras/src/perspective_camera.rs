//! Perspective Camera

use vcm_core::camera::*;
use vcm_core::geometry::*;
use vcm_core::pbrt::*;

/// Pinhole camera with a horizontal field of view.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    /// Camera position.
    pub position: Point3f,

    /// Unit viewing direction.
    pub forward: Vector3f,

    /// Unit vector pointing to the right of the image.
    pub right: Vector3f,

    /// Unit vector pointing to the top of the image.
    pub up: Vector3f,

    /// Image resolution in pixels.
    pub resolution: Point2<usize>,

    /// Distance to the image plane measured in pixels.
    image_plane_dist: Float,
}

impl PerspectiveCamera {
    /// Create a new `PerspectiveCamera`.
    ///
    /// * `position`   - Camera position.
    /// * `look_at`    - Point the camera looks at.
    /// * `up`         - Approximate up direction.
    /// * `fov`        - Horizontal field of view in degrees.
    /// * `resolution` - Image resolution in pixels.
    pub fn new(position: Point3f, look_at: Point3f, up: Vector3f, fov: Float, resolution: Point2<usize>) -> Self {
        let forward = (look_at - position).normalize();
        let mut right = forward.cross(&up);
        if right.length_squared() == 0.0 {
            warn!("Camera up vector is parallel to the viewing direction");
            right = coordinate_system(&forward).0;
        }
        let right = right.normalize();
        let up = right.cross(&forward);

        let fov = clamp(fov, 1e-2, 179.0);
        let image_plane_dist = resolution.x as Float / (2.0 * (0.5 * fov).to_radians().tan());

        Self {
            position,
            forward,
            right,
            up,
            resolution,
            image_plane_dist,
        }
    }
}

impl Camera for PerspectiveCamera {
    fn resolution(&self) -> Point2<usize> {
        self.resolution
    }

    fn position(&self) -> Point3f {
        self.position
    }

    fn forward(&self) -> Vector3f {
        self.forward
    }

    fn image_plane_distance(&self) -> Float {
        self.image_plane_dist
    }

    /// Returns a primary ray through a film position.
    ///
    /// * `p_film` - The film position.
    fn generate_ray(&self, p_film: &Point2f) -> Ray {
        let dx = p_film.x - 0.5 * self.resolution.x as Float;
        let dy = 0.5 * self.resolution.y as Float - p_film.y;
        let d = self.forward * self.image_plane_dist + self.right * dx + self.up * dy;
        Ray::new(self.position, d.normalize(), INFINITY)
    }

    /// Projects a world space point onto the film.
    ///
    /// * `p` - The world space point.
    fn project_to_film(&self, p: &Point3f) -> Option<Point2f> {
        let d = *p - self.position;
        let dz = d.dot(&self.forward);
        if dz <= 0.0 {
            return None;
        }

        let scale = self.image_plane_dist / dz;
        let x = 0.5 * self.resolution.x as Float + d.dot(&self.right) * scale;
        let y = 0.5 * self.resolution.y as Float - d.dot(&self.up) * scale;
        if x < 0.0 || y < 0.0 || x >= self.resolution.x as Float || y >= self.resolution.y as Float {
            return None;
        }
        Some(Point2f::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(
            Point3f::new(0.0, 0.0, 5.0),
            Point3f::zero(),
            Vector3f::new(0.0, 1.0, 0.0),
            90.0,
            Point2::new(64, 32),
        )
    }

    #[test]
    fn image_plane_distance_from_fov() {
        // tan(45 deg) = 1 so the plane sits half the width away.
        assert!(approx_eq!(f32, camera().image_plane_distance(), 32.0, epsilon = 1e-3));
    }

    #[test]
    fn raster_y_grows_downwards() {
        let cam = camera();
        let top = cam.project_to_film(&Point3f::new(0.0, 1.0, 0.0)).unwrap();
        assert!(top.y < 16.0);
        let right = cam.project_to_film(&Point3f::new(1.0, 0.0, 0.0)).unwrap();
        assert!(right.x > 32.0);
    }

    #[test]
    fn points_behind_or_outside_do_not_project() {
        let cam = camera();
        assert!(cam.project_to_film(&Point3f::new(0.0, 0.0, 6.0)).is_none());
        assert!(cam.project_to_film(&Point3f::new(0.0, 10.0, 0.0)).is_none());
    }

    proptest! {
        #[test]
        fn generated_rays_project_back(x in 0.5f32..63.5, y in 0.5f32..31.5, t in 1.0f32..20.0) {
            let cam = camera();
            let ray = cam.generate_ray(&Point2f::new(x, y));
            let p = cam.project_to_film(&ray.at(t));
            prop_assert!(p.is_some());
            if let Some(p) = p {
                prop_assert!(approx_eq!(f32, p.x, x, epsilon = 1e-2));
                prop_assert!(approx_eq!(f32, p.y, y, epsilon = 1e-2));
            }
        }
    }
}
