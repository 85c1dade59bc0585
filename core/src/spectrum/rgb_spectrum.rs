//! RGB Spectrum

use crate::pbrt::*;
use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign};

/// Number of samples in an RGB spectrum.
pub const RGB_SAMPLES: usize = 3;

/// Luminance weights for linear RGB.
const Y_WEIGHT: [Float; RGB_SAMPLES] = [0.212671, 0.715160, 0.072169];

/// Radiometric quantity stored as linear RGB coefficients.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    /// The RGB coefficients.
    c: [Float; RGB_SAMPLES],
}

impl RGBSpectrum {
    /// Create a new spectrum with a constant value for all coefficients.
    ///
    /// * `v` - Constant value.
    pub fn new(v: Float) -> Self {
        Self { c: [v; RGB_SAMPLES] }
    }

    /// Create a new spectrum from RGB values.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns the spectrum with all coefficients zero.
    pub fn zero() -> Self {
        Self::new(0.0)
    }

    /// Returns true if all coefficients are zero.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|&v| v == 0.0)
    }

    /// Returns true if any coefficient is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns true if all coefficients are finite.
    pub fn is_finite(&self) -> bool {
        self.c.iter().all(|v| v.is_finite())
    }

    /// Returns the largest coefficient.
    pub fn max_component_value(&self) -> Float {
        max(self.c[0], max(self.c[1], self.c[2]))
    }

    /// Returns the luminance.
    pub fn y(&self) -> Float {
        Y_WEIGHT[0] * self.c[0] + Y_WEIGHT[1] * self.c[1] + Y_WEIGHT[2] * self.c[2]
    }

    /// Returns the average of the coefficients.
    pub fn average(&self) -> Float {
        (self.c[0] + self.c[1] + self.c[2]) / RGB_SAMPLES as Float
    }

    /// Returns the RGB coefficients.
    pub fn to_rgb(&self) -> [Float; RGB_SAMPLES] {
        self.c
    }
}

impl From<Float> for RGBSpectrum {
    /// Create a constant spectrum.
    ///
    /// * `v` - Constant value.
    fn from(v: Float) -> Self {
        Self::new(v)
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    /// Adds the coefficients of another spectrum.
    ///
    /// * `other` - The other spectrum.
    fn add(self, other: Self) -> Self {
        Self::from_rgb(self.c[0] + other.c[0], self.c[1] + other.c[1], self.c[2] + other.c[2])
    }
}

impl AddAssign for RGBSpectrum {
    /// Performs the `+=` operation.
    ///
    /// * `other` - The other spectrum.
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    /// Multiplies coefficients component-wise.
    ///
    /// * `other` - The other spectrum.
    fn mul(self, other: Self) -> Self {
        Self::from_rgb(self.c[0] * other.c[0], self.c[1] * other.c[1], self.c[2] * other.c[2])
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales the coefficients.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: Float) -> Self {
        Self::from_rgb(self.c[0] * f, self.c[1] * f, self.c[2] * f)
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    /// Scales the coefficients.
    ///
    /// * `s` - The spectrum.
    fn mul(self, s: RGBSpectrum) -> RGBSpectrum {
        s * self
    }
}

impl MulAssign for RGBSpectrum {
    /// Multiplies coefficients component-wise.
    ///
    /// * `other` - The other spectrum.
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl MulAssign<Float> for RGBSpectrum {
    /// Scales the coefficients.
    ///
    /// * `f` - The scaling factor.
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    /// Divides the coefficients by a scalar.
    ///
    /// * `f` - The divisor.
    fn div(self, f: Float) -> Self {
        let inv = 1.0 / f;
        self * inv
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    /// Returns the coefficient at the given index.
    ///
    /// * `i` - Index (0 = red, 1 = green, 2 = blue).
    fn index(&self, i: usize) -> &Float {
        &self.c[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn white_luminance_is_one() {
        assert!(approx_eq!(Float, RGBSpectrum::new(1.0).y(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn black_and_finite() {
        assert!(RGBSpectrum::zero().is_black());
        assert!(!RGBSpectrum::from_rgb(0.0, 0.1, 0.0).is_black());
        assert!(!(RGBSpectrum::new(1.0) / 0.0).is_finite());
        assert!(RGBSpectrum::new(Float::NAN).has_nans());
    }
}
