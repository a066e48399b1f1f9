//! Mirror-image reflection geometry.
//!
//! A reflected path `source → wall → mic` is as long as the straight segment
//! from `source` to the mic mirrored across the wall. The reflection point is
//! where that segment crosses the wall.

use crate::error::GeometryError;
use crate::math::{Scalar, TOLERANCE};

use super::Coord;

/// Euclidean distance between two points.
#[must_use]
pub fn distance<T: Scalar>(a: Coord<T>, b: Coord<T>) -> T {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Returns the point on `y = wall_y` where sound from `source` reflects to `mic`.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] when `source` shares the mic's x
/// coordinate (the slope through the virtual mic is vertical) or lies on the
/// virtual mic's horizontal line.
pub fn top_wall_reflection_point<T: Scalar>(
    source: Coord<T>,
    mic: Coord<T>,
    wall_y: f64,
) -> Result<Coord<T>, GeometryError> {
    let h = T::constant(wall_y);
    let run = source.x - mic.x;
    if run.value().abs() < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "source x = {} is aligned with the mic; top-wall reflection is undefined",
            source.x.value()
        )));
    }

    let g = (h + h - source.y - mic.y) / run;
    if g.value().abs() < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "source y = {} lies on the mirrored mic line",
            source.y.value()
        )));
    }

    Ok(Coord::new(mic.x + (h - mic.y) / g, h))
}

/// Returns the point on `x = wall_x` where sound from `source` reflects to `mic`.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] when `source` shares the mic's y
/// coordinate or lies on the virtual mic's vertical line.
pub fn right_wall_reflection_point<T: Scalar>(
    source: Coord<T>,
    mic: Coord<T>,
    wall_x: f64,
) -> Result<Coord<T>, GeometryError> {
    let w = T::constant(wall_x);
    let rise = source.y - mic.y;
    if rise.value().abs() < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "source y = {} is aligned with the mic; right-wall reflection is undefined",
            source.y.value()
        )));
    }

    let g = (w + w - source.x - mic.x) / rise;
    if g.value().abs() < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "source x = {} lies on the mirrored mic line",
            source.x.value()
        )));
    }

    Ok(Coord::new(w, mic.y + (w - mic.x) / g))
}
