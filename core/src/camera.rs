//! Camera

use crate::geometry::*;
use crate::pbrt::*;
use std::sync::Arc;

/// Camera interface.
///
/// Film positions are raster coordinates: `x` in `[0, width)` from left to
/// right and `y` in `[0, height)` from top to bottom.
pub trait Camera {
    /// Returns the image resolution in pixels.
    fn resolution(&self) -> Point2<usize>;

    /// Returns the camera position.
    fn position(&self) -> Point3f;

    /// Returns the unit viewing direction.
    fn forward(&self) -> Vector3f;

    /// Returns the distance from the camera to an image plane whose pixels have unit area.
    fn image_plane_distance(&self) -> Float;

    /// Returns a primary ray through a film position.
    ///
    /// * `p_film` - The film position.
    fn generate_ray(&self, p_film: &Point2f) -> Ray;

    /// Projects a world space point onto the film. Returns `None` if the point is
    /// behind the camera or projects outside the image.
    ///
    /// * `p` - The world space point.
    fn project_to_film(&self, p: &Point3f) -> Option<Point2f>;

    /// Returns the number of pixels on the film.
    fn pixel_count(&self) -> usize {
        let res = self.resolution();
        res.x * res.y
    }
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera + Send + Sync>;
