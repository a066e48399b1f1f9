use crate::error::Result;
use crate::math::Point2;
use crate::operations::{LocateClap, SolverOptions, ValidatedCandidate};
use crate::room::{ArrivalTimes, Room};

/// A clap observed in a room.
///
/// Either the listener recorded the arrival times and wants the position, or
/// the position is known and the listener wants the times it would record.
#[derive(Debug, Clone, PartialEq)]
pub enum ClapEvent {
    Recorded(Vec<f64>),
    Located(Point2),
}

/// What [`ClapEvent::dispatch`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ClapOutcome {
    Positions(Vec<ValidatedCandidate>),
    Times(ArrivalTimes),
}

impl ClapEvent {
    /// Resolves the event with default solver options.
    ///
    /// # Errors
    ///
    /// Propagates input and geometry errors from the underlying operation.
    pub fn dispatch(&self, room: &Room) -> Result<ClapOutcome> {
        self.dispatch_with(room, SolverOptions::default())
    }

    /// Resolves the event with explicit solver options.
    ///
    /// # Errors
    ///
    /// Propagates input and geometry errors from the underlying operation.
    pub fn dispatch_with(&self, room: &Room, options: SolverOptions) -> Result<ClapOutcome> {
        match self {
            Self::Recorded(times) => LocateClap::new(times)
                .with_options(options)
                .execute(room)
                .map(ClapOutcome::Positions),
            Self::Located(position) => room.predict_times(position).map(ClapOutcome::Times),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::room::RoomConfig;

    #[test]
    fn located_then_recorded_round_trips() {
        let room = Room::from_config(&RoomConfig {
            mic: [0.0, 0.0],
            top_wall_limit: 15.0,
            right_wall_limit: 15.0,
            x_min: 0.0,
            y_min: 0.0,
        })
        .unwrap();

        let located = ClapEvent::Located(Point2::new(6.0, 2.0));
        let ClapOutcome::Times(times) = located.dispatch(&room).unwrap() else {
            panic!("prediction must yield times");
        };
        let recorded = ClapEvent::Recorded(times.0.to_vec());
        let ClapOutcome::Positions(found) = recorded.dispatch(&room).unwrap() else {
            panic!("localization must yield positions");
        };
        assert!(found
            .iter()
            .any(|c| (c.position - Point2::new(6.0, 2.0)).norm() < 1e-3));
    }
}
