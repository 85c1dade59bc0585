//! Film

use crate::geometry::*;
use crate::image_io::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::{PoisonError, RwLock};

/// Accumulates the radiance of one rendering iteration before it is committed
/// to the `Film`. Owned by a single thread.
#[derive(Clone)]
pub struct FilmBuffer {
    /// Image resolution.
    pub resolution: Point2<usize>,

    /// Accumulated radiance per pixel.
    pixels: Vec<Spectrum>,
}

impl FilmBuffer {
    /// Create a new black `FilmBuffer`.
    ///
    /// * `resolution` - Image resolution.
    pub fn new(resolution: Point2<usize>) -> Self {
        Self {
            resolution,
            pixels: vec![Spectrum::zero(); resolution.x * resolution.y],
        }
    }

    /// Add a splat contribution at a film position. Values that are NaN,
    /// infinite or negative are ignored, as are positions outside the image.
    ///
    /// * `p_film`   - Film position in raster coordinates.
    /// * `radiance` - Radiance to add.
    /// * `weight`   - Scale factor applied to `radiance`.
    pub fn add_splat(&mut self, p_film: &Point2f, radiance: &Spectrum, weight: Float) {
        let v = *radiance * weight;
        if v.has_nans() {
            warn!("Ignoring splatted spectrum with NaN values at ({}, {})", p_film.x, p_film.y);
            return;
        }

        let vy = v.y();
        if vy < 0.0 {
            warn!(
                "Ignoring splatted spectrum with negative luminance {} at ({}, {})",
                vy, p_film.x, p_film.y
            );
        } else if !v.is_finite() {
            warn!(
                "Ignoring splatted spectrum with infinite luminance at ({}, {})",
                p_film.x, p_film.y
            );
        } else if let Some(offset) = self.pixel_offset(p_film) {
            self.pixels[offset] += v;
        }
    }

    /// Returns the accumulated radiance of a pixel.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn pixel(&self, x: usize, y: usize) -> Spectrum {
        self.pixels[y * self.resolution.x + x]
    }

    /// Returns the pixel offset for a film position or `None` if it lies outside the image.
    ///
    /// * `p_film` - Film position in raster coordinates.
    fn pixel_offset(&self, p_film: &Point2f) -> Option<usize> {
        let p = p_film.floor();
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        if x >= self.resolution.x || y >= self.resolution.y {
            return None;
        }
        Some(y * self.resolution.x + x)
    }
}

/// Accumulated image state.
struct FilmState {
    /// Sum of all committed iterations.
    pixels: Vec<Spectrum>,

    /// Number of committed iterations.
    iterations: usize,
}

/// Models the sensing device in a simulated camera. Completed iterations are
/// committed to it and the final image is their average.
pub struct Film {
    /// The overall image resolution in pixels.
    pub resolution: Point2<usize>,

    /// Stores the image pixels.
    state: RwLock<FilmState>,
}

impl Film {
    /// Create a new `Film` instance.
    ///
    /// * `resolution` - The overall image resolution in pixels.
    pub fn new(resolution: Point2<usize>) -> Self {
        Self {
            resolution,
            state: RwLock::new(FilmState {
                pixels: vec![Spectrum::zero(); resolution.x * resolution.y],
                iterations: 0,
            }),
        }
    }

    /// Commits one completed iteration.
    ///
    /// * `buffer` - The iteration's accumulated radiance.
    pub fn commit(&self, buffer: &FilmBuffer) {
        debug_assert_eq!(buffer.resolution, self.resolution);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        for (pixel, v) in state.pixels.iter_mut().zip(buffer.pixels.iter()) {
            *pixel += *v;
        }
        state.iterations += 1;
    }

    /// Returns the number of committed iterations.
    pub fn iterations(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).iterations
    }

    /// Returns the image as the average of all committed iterations.
    pub fn image(&self) -> Vec<Spectrum> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let scale = if state.iterations > 0 {
            1.0 / state.iterations as Float
        } else {
            0.0
        };
        state.pixels.iter().map(|&p| p * scale).collect()
    }

    /// Write the image to an output file.
    ///
    /// * `path` - Output file path.
    pub fn write_image(&self, path: &str) -> Result<(), String> {
        info!("Converting image to RGB and computing final pixel values");

        let rgb: Vec<Float> = self.image().iter().flat_map(|p| p.to_rgb()).collect();
        write_image(path, &rgb, &self.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splats_outside_or_invalid_are_ignored() {
        let mut buffer = FilmBuffer::new(Point2::new(2, 2));
        buffer.add_splat(&Point2f::new(-0.5, 0.5), &Spectrum::new(1.0), 1.0);
        buffer.add_splat(&Point2f::new(2.0, 0.5), &Spectrum::new(1.0), 1.0);
        buffer.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(Float::NAN), 1.0);
        buffer.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(INFINITY), 1.0);
        buffer.add_splat(&Point2f::new(1.5, 1.5), &Spectrum::new(2.0), 0.5);
        assert!(buffer.pixel(0, 0).is_black());
        assert_eq!(buffer.pixel(1, 1), Spectrum::new(1.0));
    }

    #[test]
    fn image_averages_iterations() {
        let film = Film::new(Point2::new(1, 1));
        let mut buffer = FilmBuffer::new(Point2::new(1, 1));
        buffer.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(3.0), 1.0);
        film.commit(&buffer);
        film.commit(&FilmBuffer::new(Point2::new(1, 1)));
        assert_eq!(film.iterations(), 2);
        assert_eq!(film.image()[0], Spectrum::new(1.5));
    }
}
