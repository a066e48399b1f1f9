pub mod reflection;
mod wall;

pub use reflection::{distance, right_wall_reflection_point, top_wall_reflection_point};
pub use wall::{Mic, Wall, WallSide};

use crate::math::{Point2, Scalar};

/// A planar position whose coordinates may carry derivative information.
///
/// `Coord<f64>` is interchangeable with [`Point2`]; `Coord<Dual2>` is the
/// unknown clap position while solving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord<T> {
    pub x: T,
    pub y: T,
}

impl<T: Scalar> Coord<T> {
    /// Creates a coordinate pair.
    #[must_use]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Lifts a concrete point (e.g. the mic) into `T`.
    #[must_use]
    pub fn constant(p: &Point2) -> Self {
        Self::new(T::constant(p.x), T::constant(p.y))
    }

    /// Drops derivative information.
    #[must_use]
    pub fn to_point(self) -> Point2 {
        Point2::new(self.x.value(), self.y.value())
    }
}

impl From<Point2> for Coord<f64> {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}
