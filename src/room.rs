use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::geometry::{Coord, Mic, Wall, WallSide};
use crate::math::Point2;
use crate::paths::{direct_path, reflected_path};

/// Serializable room descriptor.
///
/// The upper bounds are implied by the wall limits; only the lower bounds are
/// free and default to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Mic position as `[x, y]`.
    pub mic: [f64; 2],
    /// `y` coordinate of the top wall.
    pub top_wall_limit: f64,
    /// `x` coordinate of the right wall.
    pub right_wall_limit: f64,
    #[serde(default)]
    pub x_min: f64,
    #[serde(default)]
    pub y_min: f64,
}

/// An axis-aligned room with one mic and two reflecting walls.
///
/// A `Room` is immutable once built and can be shared across any number of
/// concurrent localization queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    mic: Mic,
    top_wall: Wall,
    right_wall: Wall,
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
}

/// The three arrival times of one clap, sorted ascending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrivalTimes(pub [f64; 3]);

impl ArrivalTimes {
    /// The earliest arrival, which is the direct path.
    #[must_use]
    pub fn direct(&self) -> f64 {
        self.0[0]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// One assignment of the two later peaks to the reflecting walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionHypothesis {
    pub right_time: f64,
    pub top_time: f64,
}

/// The direct time and every reflection assignment derived from one recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionHypotheses {
    pub direct_time: f64,
    pub hypotheses: [ReflectionHypothesis; 2],
}

impl Room {
    /// Creates a room from its mic, walls and lower bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if a wall is on the wrong side, the bounds are empty
    /// or non-finite, or the mic lies outside the room or on a reflecting
    /// wall.
    pub fn new(
        mic: Mic,
        top_wall: Wall,
        right_wall: Wall,
        x_min: f64,
        y_min: f64,
    ) -> Result<Self> {
        top_wall.expect_side(&[WallSide::Top])?;
        right_wall.expect_side(&[WallSide::Right])?;

        let x_bounds = (x_min, right_wall.limit());
        let y_bounds = (y_min, top_wall.limit());
        for (axis, (lo, hi)) in [("x", x_bounds), ("y", y_bounds)] {
            if !lo.is_finite() || lo >= hi {
                let msg = format!("{axis} bounds [{lo}, {hi}] are empty");
                return Err(InputError::InvalidRoom(msg).into());
            }
        }

        let p = mic.position();
        if !within(p.x, x_bounds) || !within(p.y, y_bounds) {
            let msg = format!("mic ({}, {}) lies outside the room", p.x, p.y);
            return Err(InputError::InvalidRoom(msg).into());
        }
        // A mic on a reflecting wall makes that reflection coincide with the
        // direct path and leaves the path length non-differentiable at the mic.
        if p.x >= right_wall.limit() || p.y >= top_wall.limit() {
            let msg = format!("mic ({}, {}) lies on a reflecting wall", p.x, p.y);
            return Err(InputError::InvalidRoom(msg).into());
        }

        Ok(Self {
            mic,
            top_wall,
            right_wall,
            x_bounds,
            y_bounds,
        })
    }

    /// Builds a room from a descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor violates any room invariant.
    pub fn from_config(config: &RoomConfig) -> Result<Self> {
        let [mx, my] = config.mic;
        Self::new(
            Mic::new(Point2::new(mx, my)),
            Wall::new(WallSide::Top, config.top_wall_limit)?,
            Wall::new(WallSide::Right, config.right_wall_limit)?,
            config.x_min,
            config.y_min,
        )
    }

    /// Returns the descriptor this room was built from.
    #[must_use]
    pub fn to_config(&self) -> RoomConfig {
        let p = self.mic.position();
        RoomConfig {
            mic: [p.x, p.y],
            top_wall_limit: self.top_wall.limit(),
            right_wall_limit: self.right_wall.limit(),
            x_min: self.x_bounds.0,
            y_min: self.y_bounds.0,
        }
    }

    #[must_use]
    pub fn mic(&self) -> &Mic {
        &self.mic
    }

    #[must_use]
    pub fn top_wall(&self) -> &Wall {
        &self.top_wall
    }

    #[must_use]
    pub fn right_wall(&self) -> &Wall {
        &self.right_wall
    }

    #[must_use]
    pub fn x_bounds(&self) -> (f64, f64) {
        self.x_bounds
    }

    #[must_use]
    pub fn y_bounds(&self) -> (f64, f64) {
        self.y_bounds
    }

    /// Geometric centre of the room.
    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new(
            0.5 * (self.x_bounds.0 + self.x_bounds.1),
            0.5 * (self.y_bounds.0 + self.y_bounds.1),
        )
    }

    /// Returns `true` if `p` lies inside the room, walls included.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        within(p.x, self.x_bounds) && within(p.y, self.y_bounds)
    }

    /// Straight-line distance from `source` to the mic.
    #[must_use]
    pub fn direct_distance(&self, source: &Point2) -> f64 {
        direct_path(Coord::from(*source), Coord::constant(self.mic.position()))
    }

    /// Predicts the arrival times of a clap at `source`.
    ///
    /// The mic cannot tell which wall produced which peak, so the result is
    /// sorted rather than labelled.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`](crate::error::GeometryError::Degenerate)
    /// when `source` shares an axis with the mic.
    pub fn predict_times(&self, source: &Point2) -> Result<ArrivalTimes> {
        let s = Coord::from(*source);
        let m = Coord::constant(self.mic.position());
        let mut times = [
            direct_path(s, m),
            reflected_path(s, m, &self.right_wall)?,
            reflected_path(s, m, &self.top_wall)?,
        ];
        times.sort_by(f64::total_cmp);
        Ok(ArrivalTimes(times))
    }

    /// Splits a recording into the direct time and the two possible
    /// reflection assignments.
    ///
    /// The earliest peak is taken as the direct path; this holds for any
    /// source inside a room whose reflecting walls lie beyond the mic.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] unless `times` holds exactly three positive
    /// finite values.
    pub fn reflection_hypotheses(&self, times: &[f64]) -> Result<ReflectionHypotheses> {
        let &[a, b, c] = times else {
            return Err(InputError::TimeCount(times.len()).into());
        };
        if let Some((index, &value)) = times
            .iter()
            .enumerate()
            .find(|(_, t)| !t.is_finite() || **t <= 0.0)
        {
            return Err(InputError::NonPositiveTime { index, value }.into());
        }

        let mut sorted = [a, b, c];
        sorted.sort_by(f64::total_cmp);
        let [direct_time, early, late] = sorted;

        Ok(ReflectionHypotheses {
            direct_time,
            hypotheses: [
                ReflectionHypothesis {
                    right_time: early,
                    top_time: late,
                },
                ReflectionHypothesis {
                    right_time: late,
                    top_time: early,
                },
            ],
        })
    }
}

fn within(v: f64, (lo, hi): (f64, f64)) -> bool {
    v >= lo && v <= hi
}
