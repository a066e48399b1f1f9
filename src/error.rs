use thiserror::Error;

use crate::geometry::WallSide;

/// Top-level error type for clap localization.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Errors related to reflection geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{found} wall cannot be used here; expected one of {expected:?}")]
    InvalidWallKind {
        expected: &'static [WallSide],
        found: WallSide,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors caused by malformed caller input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("expected 3 measured times, got {0}")]
    TimeCount(usize),

    #[error("measured time #{index} = {value} is not a positive finite number")]
    NonPositiveTime { index: usize, value: f64 },

    #[error("invalid room: {0}")]
    InvalidRoom(String),
}

/// Failure of the numeric solve for a single reflection hypothesis.
///
/// These are recovered inside [`LocateClap`](crate::operations::LocateClap):
/// the hypothesis is dropped and the remaining ones are still tried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("singular jacobian at iteration {iteration}")]
    Singular { iteration: usize },

    #[error("no convergence after {iterations} iterations (residual {residual:e})")]
    NotConverged { iterations: usize, residual: f64 },

    #[error("iterate became non-finite at iteration {iteration}")]
    Diverged { iteration: usize },

    #[error("system could not be evaluated: {0}")]
    Evaluation(GeometryError),
}

/// Convenience type alias for results using [`LocatorError`].
pub type Result<T> = std::result::Result<T, LocatorError>;
