//! Geometry

mod bounds3;
mod frame;
mod normal;
mod point2;
mod point3;
mod ray;
mod vector3;

// Re-export
pub use bounds3::*;
pub use frame::*;
pub use normal::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use vector3::*;

/// Dot product.
pub trait Dot<T> {
    /// Output type for the dot product.
    type Output;

    /// Returns the dot product.
    ///
    /// * `other` - The other value.
    fn dot(&self, other: &T) -> Self::Output;
}

/// Dot product for `Float` values that returns the absolute value.
pub trait AbsDot<T>: Dot<T, Output = crate::pbrt::Float> {
    /// Returns the absolute value of the dot product.
    ///
    /// * `other` - The other value.
    fn abs_dot(&self, other: &T) -> crate::pbrt::Float {
        self.dot(other).abs()
    }
}

impl<T, U: Dot<T, Output = crate::pbrt::Float>> AbsDot<T> for U {}

/// Cross product.
pub trait Cross<T> {
    /// Output type for the cross product.
    type Output;

    /// Returns the cross product.
    ///
    /// * `other` - The other value.
    fn cross(&self, other: &T) -> Self::Output;
}
