use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{GeometryError, Result, SolveError};
use crate::geometry::Coord;
use crate::math::newton::{self, NewtonSettings, System2};
use crate::math::{Point2, Scalar};
use crate::paths::reflected_path;
use crate::room::{ReflectionHypothesis, Room};

use super::validate::{
    Candidate, CandidateValidator, ValidatedCandidate, DIRECT_TIME_RELATIVE_TOLERANCE,
};

/// Tuning for [`LocateClap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Newton start point as `[x, y]`; `None` starts from the room centre.
    pub initial_guess: Option<[f64; 2]>,
    pub newton: NewtonSettings,
    /// Allowed relative mismatch between a candidate's direct distance and
    /// the earliest measured time.
    pub relative_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            initial_guess: None,
            newton: NewtonSettings::default(),
            relative_tolerance: DIRECT_TIME_RELATIVE_TOLERANCE,
        }
    }
}

/// The two reflected-path equations of one hypothesis.
///
/// The direct-path equation is left out: with two unknowns it is redundant,
/// and the direct time is used afterwards to validate the solution.
pub struct ReflectionSystem<'a> {
    room: &'a Room,
    hypothesis: ReflectionHypothesis,
}

impl<'a> ReflectionSystem<'a> {
    #[must_use]
    pub fn new(room: &'a Room, hypothesis: ReflectionHypothesis) -> Self {
        Self { room, hypothesis }
    }
}

impl System2 for ReflectionSystem<'_> {
    fn residuals<T: Scalar>(&self, x: T, y: T) -> std::result::Result<[T; 2], GeometryError> {
        let source = Coord::new(x, y);
        let mic = Coord::constant(self.room.mic().position());
        let right = reflected_path(source, mic, self.room.right_wall())?;
        let top = reflected_path(source, mic, self.room.top_wall())?;
        Ok([
            right - T::constant(self.hypothesis.right_time),
            top - T::constant(self.hypothesis.top_time),
        ])
    }
}

/// Locates a clap from its three measured arrival times.
///
/// Every reflection hypothesis is solved independently; hypotheses whose
/// system has no numeric solution are dropped. The surviving positions are
/// validated and returned in hypothesis order. An empty result means no
/// plausible location; several results mean the recording is ambiguous.
pub struct LocateClap<'t> {
    times: &'t [f64],
    options: SolverOptions,
}

impl<'t> LocateClap<'t> {
    /// Creates a new localization query.
    #[must_use]
    pub fn new(times: &'t [f64]) -> Self {
        Self {
            times,
            options: SolverOptions::default(),
        }
    }

    /// Replaces the solver options.
    #[must_use]
    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the query against `room`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`](crate::error::InputError) if the times are not
    /// three positive finite values. Solver failures are not errors.
    pub fn execute(&self, room: &Room) -> Result<Vec<ValidatedCandidate>> {
        let set = room.reflection_hypotheses(self.times)?;
        let start = self
            .options
            .initial_guess
            .map_or_else(|| room.center(), |[x, y]| Point2::new(x, y));

        let candidates = set.hypotheses.iter().filter_map(|hypothesis| {
            match solve_hypothesis(room, *hypothesis, start, &self.options.newton) {
                Ok(candidate) => {
                    debug!(
                        x = candidate.position.x,
                        y = candidate.position.y,
                        iterations = candidate.iterations,
                        "hypothesis solved"
                    );
                    Some(candidate)
                }
                Err(err) => {
                    debug!(
                        right_time = hypothesis.right_time,
                        top_time = hypothesis.top_time,
                        %err,
                        "hypothesis unsolvable"
                    );
                    None
                }
            }
        });

        let validator = CandidateValidator::new(room, set.direct_time)
            .with_relative_tolerance(self.options.relative_tolerance);
        let found = validator.filter(candidates);
        debug!(direct_time = set.direct_time, found = found.len(), "clap located");
        Ok(found)
    }
}

/// Solves a single hypothesis.
///
/// # Errors
///
/// Returns the [`SolveError`] that stopped the Newton iteration.
pub fn solve_hypothesis(
    room: &Room,
    hypothesis: ReflectionHypothesis,
    start: Point2,
    settings: &NewtonSettings,
) -> std::result::Result<Candidate, SolveError> {
    let system = ReflectionSystem::new(room, hypothesis);
    let root = newton::solve(&system, start, settings)?;
    trace!(residual = root.residual, iterations = root.iterations, "newton converged");
    Ok(Candidate {
        position: root.point,
        hypothesis,
        iterations: root.iterations,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::room::RoomConfig;
    use approx::assert_abs_diff_eq;

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

    fn recovers(found: &[ValidatedCandidate], expected: Point2) -> bool {
        found.iter().any(|c| {
            (c.position.x - expected.x).abs() < 1e-3 && (c.position.y - expected.y).abs() < 1e-3
        })
    }

    #[test]
    fn system_vanishes_at_true_source() {
        let room = room();
        let hypothesis = ReflectionHypothesis {
            right_time: 634.0_f64.sqrt(),
            top_time: 754.0_f64.sqrt(),
        };
        let [r0, r1] = ReflectionSystem::new(&room, hypothesis).residuals(5.0, 3.0).unwrap();
        assert_abs_diff_eq!(r0, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r1, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn solves_correct_hypothesis() {
        let room = room();
        let hypothesis = ReflectionHypothesis {
            right_time: 634.0_f64.sqrt(),
            top_time: 754.0_f64.sqrt(),
        };
        let settings = NewtonSettings::default();
        let c = solve_hypothesis(&room, hypothesis, room.center(), &settings).unwrap();
        assert!(c.iterations > 0 && c.iterations < settings.max_iterations);
        assert_abs_diff_eq!(c.position.x, 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.position.y, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn symmetric_clap_round_trips() {
        let room = room();
        let times = room.predict_times(&Point2::new(8.0, 8.0)).unwrap();
        let found = LocateClap::new(times.as_slice()).execute(&room).unwrap();
        assert!(recovers(&found, Point2::new(8.0, 8.0)), "{found:?}");
    }

    #[test]
    fn asymmetric_clap_round_trips() {
        let room = room();
        let times = room.predict_times(&Point2::new(5.0, 3.0)).unwrap();
        assert_abs_diff_eq!(times.direct(), 34.0_f64.sqrt(), epsilon = 1e-10);

        let found = LocateClap::new(times.as_slice()).execute(&room).unwrap();
        assert!(recovers(&found, Point2::new(5.0, 3.0)), "{found:?}");
        // Swapping the walls yields the mirror image, which is equally plausible.
        assert!(recovers(&found, Point2::new(3.0, 5.0)), "{found:?}");
    }

    #[test]
    fn inconsistent_direct_time_yields_nothing() {
        let room = room();
        let mut times = room.predict_times(&Point2::new(5.0, 3.0)).unwrap().0;
        times[0] *= 0.9;
        let found = LocateClap::new(&times).execute(&room).unwrap();
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn invalid_times_are_rejected_up_front() {
        let room = room();
        assert!(LocateClap::new(&[1.0, 2.0]).execute(&room).is_err());
        assert!(LocateClap::new(&[1.0, 2.0, -3.0]).execute(&room).is_err());
    }

    #[test]
    fn starting_on_mic_axis_drops_every_hypothesis() {
        let room = room();
        let times = room.predict_times(&Point2::new(5.0, 3.0)).unwrap();
        let options = SolverOptions {
            initial_guess: Some([0.0, 7.0]),
            ..SolverOptions::default()
        };
        let found = LocateClap::new(times.as_slice())
            .with_options(options)
            .execute(&room)
            .unwrap();
        assert!(found.is_empty(), "{found:?}");
    }
}
