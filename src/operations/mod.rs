mod locate;
mod validate;

pub use locate::{solve_hypothesis, LocateClap, ReflectionSystem, SolverOptions};
pub use validate::{
    Candidate, CandidateValidator, Rejection, ValidatedCandidate, DIRECT_TIME_RELATIVE_TOLERANCE,
};
