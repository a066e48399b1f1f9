use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, InputError, Result};
use crate::math::Point2;

/// Which side of the room a wall bounds.
///
/// Only [`WallSide::Top`] and [`WallSide::Right`] produce modelled
/// reflections; the others exist so that descriptors naming them can be
/// rejected with a precise error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl fmt::Display for WallSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        };
        f.write_str(name)
    }
}

impl WallSide {
    /// Sides whose walls produce modelled reflections.
    pub const REFLECTING: [WallSide; 2] = [WallSide::Top, WallSide::Right];
}

/// An axis-aligned wall: `y = limit` for top/bottom, `x = limit` for left/right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    side: WallSide,
    limit: f64,
}

impl Wall {
    /// Creates a wall.
    ///
    /// # Errors
    ///
    /// Returns an error if `limit` is not finite.
    pub fn new(side: WallSide, limit: f64) -> Result<Self> {
        if !limit.is_finite() {
            let msg = format!("{side} wall limit {limit} is not finite");
            return Err(InputError::InvalidRoom(msg).into());
        }
        Ok(Self { side, limit })
    }

    /// Returns the side this wall bounds.
    #[must_use]
    pub fn side(&self) -> WallSide {
        self.side
    }

    /// Returns the wall's fixed coordinate.
    #[must_use]
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Checks that this wall is on one of the `expected` sides.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidWallKind`] otherwise.
    pub fn expect_side(
        &self,
        expected: &'static [WallSide],
    ) -> std::result::Result<(), GeometryError> {
        if expected.contains(&self.side) {
            Ok(())
        } else {
            Err(GeometryError::InvalidWallKind {
                expected,
                found: self.side,
            })
        }
    }
}

/// The single omnidirectional microphone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mic {
    position: Point2,
}

impl Mic {
    #[must_use]
    pub fn new(position: Point2) -> Self {
        Self { position }
    }

    #[must_use]
    pub fn position(&self) -> &Point2 {
        &self.position
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn displays_lowercase_side_names() {
        assert_eq!(WallSide::Top.to_string(), "top");
        assert_eq!(WallSide::Left.to_string(), "left");
    }

    #[test]
    fn rejects_non_finite_limit() {
        assert!(Wall::new(WallSide::Top, f64::NAN).is_err());
        assert!(Wall::new(WallSide::Top, 10.0).is_ok());
    }

    #[test]
    fn expect_side_reports_mismatch() {
        let wall = Wall::new(WallSide::Left, 0.0).unwrap();
        assert_eq!(
            wall.expect_side(&[WallSide::Right]),
            Err(GeometryError::InvalidWallKind {
                expected: &[WallSide::Right],
                found: WallSide::Left,
            })
        );
        assert!(wall.expect_side(&WallSide::REFLECTING).is_err());

        let top = Wall::new(WallSide::Top, 10.0).unwrap();
        assert!(top.expect_side(&WallSide::REFLECTING).is_ok());
    }
}
