//! Locates a clap inside a rectangular room from the arrival times of its
//! direct sound and of its reflections off the top and right walls.

pub mod error;
pub mod event;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod paths;
pub mod room;

pub use error::{LocatorError, Result};
pub use event::{ClapEvent, ClapOutcome};
pub use operations::{LocateClap, SolverOptions, ValidatedCandidate};
pub use room::{ArrivalTimes, Room, RoomConfig};
