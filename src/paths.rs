//! Travel-time expressions for the direct and wall-reflected sound paths.
//!
//! Times are path lengths in room units (unit propagation speed). All
//! builders are generic over [`Scalar`], so the same code yields plain numbers
//! for prediction and value-plus-gradient for the solver.

use crate::error::GeometryError;
use crate::geometry::{
    distance, right_wall_reflection_point, top_wall_reflection_point, Coord, Wall, WallSide,
};
use crate::math::Scalar;

/// Length of the straight path from `source` to `mic`.
#[must_use]
pub fn direct_path<T: Scalar>(source: Coord<T>, mic: Coord<T>) -> T {
    distance(source, mic)
}

/// Length of the path `source → wall → mic`.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidWallKind`] for walls other than top or
/// right, and [`GeometryError::Degenerate`] when the reflection point is
/// undefined for this source.
pub fn reflected_path<T: Scalar>(
    source: Coord<T>,
    mic: Coord<T>,
    wall: &Wall,
) -> Result<T, GeometryError> {
    let bounce = match wall.side() {
        WallSide::Top => top_wall_reflection_point(source, mic, wall.limit())?,
        WallSide::Right => right_wall_reflection_point(source, mic, wall.limit())?,
        found => {
            return Err(GeometryError::InvalidWallKind {
                expected: &WallSide::REFLECTING,
                found,
            })
        }
    };
    Ok(distance(source, bounce) + distance(bounce, mic))
}
