//! 2-D points

use crate::pbrt::*;
use num_traits::{Num, Zero};
use std::ops::{Add, Index, Mul};

/// A 2-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D point containing `Float` values.
pub type Point2f = Point2<Float>;

/// 2-D point containing `Int` values.
pub type Point2i = Point2<Int>;

impl<T: Num + Copy> Point2<T> {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D point at the origin.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero())
    }
}

impl Point2f {
    /// Returns a new point with the components floored.
    pub fn floor(&self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }
}

impl<T: Num + Copy> Add for Point2<T> {
    type Output = Self;

    /// Adds the coordinates of another point.
    ///
    /// * `other` - The point to add.
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Num + Copy> Mul<T> for Point2<T> {
    type Output = Self;

    /// Scale the point coordinates.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self {
        Self::new(self.x * f, self.y * f)
    }
}

impl<T> Index<usize> for Point2<T> {
    type Output = T;

    /// Index the point by an axis to get the immutable coordinate axis value.
    ///
    /// * `i` - The axis index (0 = x, 1 = y).
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Invalid axis for std::Index on Point2<T>"),
        }
    }
}

impl From<Point2<usize>> for Point2f {
    /// Convert integer pixel coordinates to floating point.
    ///
    /// * `p` - The pixel coordinates.
    fn from(p: Point2<usize>) -> Self {
        Self::new(p.x as Float, p.y as Float)
    }
}
