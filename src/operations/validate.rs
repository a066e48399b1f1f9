use tracing::debug;

use crate::math::Point2;
use crate::room::{ReflectionHypothesis, Room};

/// Default relative tolerance between the recomputed and measured direct time.
pub const DIRECT_TIME_RELATIVE_TOLERANCE: f64 = 1e-3;

/// A solved position, not yet checked for plausibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub position: Point2,
    pub hypothesis: ReflectionHypothesis,
    /// Newton iterations spent reaching `position`.
    pub iterations: usize,
}

/// A candidate that passed every plausibility check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedCandidate {
    pub position: Point2,
    pub hypothesis: ReflectionHypothesis,
    /// Direct-path length recomputed from `position`.
    pub direct_distance: f64,
}

/// Why a candidate was discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// A coordinate is NaN or infinite.
    NotReal,
    /// The position lies outside the room bounds.
    OutOfRoom,
    /// The position's direct distance disagrees with the measured direct time.
    InconsistentDirectTime { expected: f64, actual: f64 },
}

/// Filters candidates down to physically plausible clap positions.
pub struct CandidateValidator<'a> {
    room: &'a Room,
    direct_time: f64,
    relative_tolerance: f64,
}

impl<'a> CandidateValidator<'a> {
    /// Creates a validator for one recording whose earliest peak is `direct_time`.
    #[must_use]
    pub fn new(room: &'a Room, direct_time: f64) -> Self {
        Self {
            room,
            direct_time,
            relative_tolerance: DIRECT_TIME_RELATIVE_TOLERANCE,
        }
    }

    /// Overrides the direct-time relative tolerance.
    #[must_use]
    pub fn with_relative_tolerance(mut self, relative_tolerance: f64) -> Self {
        self.relative_tolerance = relative_tolerance;
        self
    }

    /// Checks a single candidate.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] the candidate fails.
    pub fn check(&self, candidate: &Candidate) -> Result<ValidatedCandidate, Rejection> {
        let p = candidate.position;
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(Rejection::NotReal);
        }
        if !self.room.contains(&p) {
            return Err(Rejection::OutOfRoom);
        }

        let direct = self.room.direct_distance(&p);
        if (direct - self.direct_time).abs() > self.relative_tolerance * self.direct_time.abs() {
            return Err(Rejection::InconsistentDirectTime {
                expected: self.direct_time,
                actual: direct,
            });
        }

        Ok(ValidatedCandidate {
            position: p,
            hypothesis: candidate.hypothesis,
            direct_distance: direct,
        })
    }

    /// Keeps the candidates that pass [`check`](Self::check), in order.
    pub fn filter<I>(&self, candidates: I) -> Vec<ValidatedCandidate>
    where
        I: IntoIterator<Item = Candidate>,
    {
        candidates
            .into_iter()
            .filter_map(|c| match self.check(&c) {
                Ok(valid) => Some(valid),
                Err(reason) => {
                    debug!(x = c.position.x, y = c.position.y, ?reason, "candidate rejected");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::room::RoomConfig;

    fn room() -> Room {
        Room::from_config(&RoomConfig {
            mic: [0.0, 0.0],
            top_wall_limit: 15.0,
            right_wall_limit: 15.0,
            x_min: 0.0,
            y_min: 0.0,
        })
        .unwrap()
    }

    fn candidate(x: f64, y: f64) -> Candidate {
        Candidate {
            position: Point2::new(x, y),
            hypothesis: ReflectionHypothesis {
                right_time: 20.0,
                top_time: 25.0,
            },
            iterations: 4,
        }
    }

    #[test]
    fn accepts_consistent_position() {
        let room = room();
        let validator = CandidateValidator::new(&room, 5.0);
        let ok = validator.check(&candidate(3.0, 4.0)).unwrap();
        assert_eq!(ok.position, Point2::new(3.0, 4.0));
        assert!((ok.direct_distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_real() {
        let room = room();
        let validator = CandidateValidator::new(&room, 5.0);
        assert_eq!(validator.check(&candidate(f64::NAN, 4.0)), Err(Rejection::NotReal));
        assert_eq!(
            validator.check(&candidate(3.0, f64::INFINITY)),
            Err(Rejection::NotReal)
        );
    }

    #[test]
    fn rejects_outside_bounds() {
        let room = room();
        let validator = CandidateValidator::new(&room, 5.0);
        assert_eq!(validator.check(&candidate(-3.0, 4.0)), Err(Rejection::OutOfRoom));
        assert_eq!(validator.check(&candidate(3.0, 15.5)), Err(Rejection::OutOfRoom));
    }

    #[test]
    fn rejects_beyond_relative_tolerance() {
        let room = room();
        // 0.2% off the true direct distance of 5.
        let validator = CandidateValidator::new(&room, 5.0 * 1.002);
        assert!(matches!(
            validator.check(&candidate(3.0, 4.0)),
            Err(Rejection::InconsistentDirectTime { .. })
        ));

        // 0.05% off stays inside the default 0.1% band.
        let validator = CandidateValidator::new(&room, 5.0 * 1.0005);
        assert!(validator.check(&candidate(3.0, 4.0)).is_ok());

        let strict = CandidateValidator::new(&room, 5.0 * 1.0005).with_relative_tolerance(1e-5);
        assert!(strict.check(&candidate(3.0, 4.0)).is_err());
    }

    #[test]
    fn filter_keeps_order_of_survivors() {
        let room = room();
        let validator = CandidateValidator::new(&room, 5.0);
        let kept = validator.filter([
            candidate(4.0, 3.0),
            candidate(20.0, 1.0),
            candidate(3.0, 4.0),
            candidate(1.0, 1.0),
        ]);
        let positions: Vec<_> = kept.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![Point2::new(4.0, 3.0), Point2::new(3.0, 4.0)]);
    }
}
