//! Image I/O

use crate::geometry::*;
use crate::pbrt::*;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use exr::prelude::*;
use image::{ImageBuffer, ImageFormat, Rgb};
use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::result::Result;
use std::sync::OnceLock;

/// Write the output image to given path. The format is chosen from the file
/// extension: `.exr`, `.pfm`, `.png` or `.tga`.
///
/// * `path`       - Output file path.
/// * `rgb`        - Floating point RGB pixel data, row major from the top left.
/// * `resolution` - Image resolution.
pub fn write_image(path: &str, rgb: &[Float], resolution: &Point2<usize>) -> Result<(), String> {
    if rgb.len() != 3 * resolution.x * resolution.y {
        return Err(format!(
            "Pixel data for {path} has {} values; expected {}",
            rgb.len(),
            3 * resolution.x * resolution.y
        ));
    }

    let res_x = resolution.x as u32;
    let res_y = resolution.y as u32;

    match get_extension_from_filename(path) {
        Some(".exr") => write_exr(path, rgb, res_x, res_y),
        Some(".tga") => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Tga),
        Some(".png") => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Png),
        Some(".pfm") => write_pfm(path, rgb, res_x, res_y),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Returns regular expression for extracting the file extension: the last period
/// followed by no periods or slashes.
fn regex_file_ext() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").expect("file extension pattern is valid"))
}

/// Retrieve the extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    regex_file_ext()
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Writes the image in OpenEXR format.
///
/// * `path`  - Output file path.
/// * `rgb`   - Floating point RGB pixel data.
/// * `res_x` - X resolution.
/// * `res_y` - Y resolution.
fn write_exr(path: &str, rgb: &[Float], res_x: u32, res_y: u32) -> Result<(), String> {
    info!("Writing image {path} with resolution {res_x}x{res_y}");

    let width = res_x as usize;
    write_rgb_file(path, width, res_y as usize, |x, y| {
        let offset = 3 * (y * width + x);
        (rgb[offset], rgb[offset + 1], rgb[offset + 2])
    })
    .map_err(|err| format!("Error saving output image {path}: {err}"))
}

/// Writes the image in an 8-bit image format with sRGB gamma applied.
///
/// * `path`         - Output file path.
/// * `rgb`          - Floating point RGB pixel data.
/// * `res_x`        - X resolution.
/// * `res_y`        - Y resolution.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, rgb: &[Float], res_x: u32, res_y: u32, image_format: ImageFormat) -> Result<(), String> {
    info!("Writing image {path} with resolution {res_x}x{res_y}");

    let imgbuf = ImageBuffer::from_fn(res_x, res_y, |x, y| {
        let offset = 3 * (y * res_x + x) as usize;
        Rgb(apply_gamma(&[rgb[offset], rgb[offset + 1], rgb[offset + 2]]))
    });

    imgbuf
        .save_with_format(path, image_format)
        .map_err(|err| format!("Error saving output image {path}: {err}."))
}

/// Writes the image in PFM (Portable FloatMap) format. Rows are stored bottom
/// to top as specified by http://netpbm.sourceforge.net/doc/pfm.html and the
/// sign of the scale encodes the byte order.
///
/// * `path`  - Output file path.
/// * `rgb`   - Floating point RGB pixel data.
/// * `res_x` - X resolution.
/// * `res_y` - Y resolution.
fn write_pfm(path: &str, rgb: &[Float], res_x: u32, res_y: u32) -> Result<(), String> {
    info!("Writing image {path} with resolution {res_x}x{res_y}");

    let width = res_x as usize;
    let height = res_y as usize;
    let big_endian = cfg!(target_endian = "big");
    let scale = if big_endian { 1.0 } else { -1.0 };

    let file = File::create(path).map_err(|e| format!("write_pfm(): Error writing PFM file '{path}': {e}"))?;
    let mut out = BufWriter::new(file);

    write!(out, "PF\n{width} {height}\n{scale}\n")
        .map_err(|e| format!("write_pfm(): Error writing PFM header '{path}': {e}"))?;

    for y in (0..height).rev() {
        for &f in &rgb[3 * y * width..3 * (y + 1) * width] {
            if big_endian {
                out.write_f32::<BigEndian>(f)
            } else {
                out.write_f32::<LittleEndian>(f)
            }
            .map_err(|e| format!("write_pfm(): Error writing PFM pixels '{path}': {e}"))?;
        }
    }

    out.flush()
        .map_err(|e| format!("write_pfm(): Error writing PFM file '{path}': {e}"))
}

/// Apply gamma correction to a RGB floating point pixel and return the clamped 8-bit values.
///
/// * `rgb` - RGB floating point pixel value.
#[inline]
fn apply_gamma(rgb: &[Float; 3]) -> [u8; 3] {
    [clamp_byte(rgb[0]), clamp_byte(rgb[1]), clamp_byte(rgb[2])]
}

/// Clamp floating point value to 8-bit range [0, 255].
///
/// * `v` - Value to clamp.
#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_last_suffix() {
        assert_eq!(get_extension_from_filename("out/render.v2.exr"), Some(".exr"));
        assert_eq!(get_extension_from_filename("render.png"), Some(".png"));
        assert_eq!(get_extension_from_filename("dir.d/render"), None);
    }

    #[test]
    fn gamma_clamps_to_bytes() {
        assert_eq!(apply_gamma(&[0.0, 1.0, 4.0]), [0, 255, 255]);
    }

    #[test]
    fn rejects_unknown_extension_and_bad_sizes() {
        let res = Point2::new(1, 1);
        assert!(write_image("render.bmp", &[0.0; 3], &res).is_err());
        assert!(write_image("render.pfm", &[0.0; 6], &res).is_err());
    }

    #[test]
    fn writes_pfm() {
        let path = std::env::temp_dir().join("vcm_core_image_io_test.pfm");
        let path = path.to_string_lossy().to_string();
        let rgb = [0.25; 12];
        write_image(&path, &rgb, &Point2::new(2, 2)).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PF\n2 2\n"));
        assert_eq!(bytes.len(), "PF\n2 2\n-1\n".len() + 12 * 4);
        let _ = std::fs::remove_file(&path);
    }
}
