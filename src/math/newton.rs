use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{GeometryError, SolveError};

use super::{Dual2, Matrix2, Point2, Scalar, Vector2};

/// Determinant magnitude below which the Jacobian is treated as singular.
const SINGULAR_DETERMINANT: f64 = 1e-14;

/// A system of two equations in the two unknowns `(x, y)`.
///
/// Implementors write the residuals once, generically; the solver evaluates
/// them on `f64` for line-search probes and on [`Dual2`] for the Jacobian.
pub trait System2 {
    /// Evaluates both residuals at `(x, y)`. A root is where both are zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the equations are undefined at `(x, y)`.
    fn residuals<T: Scalar>(&self, x: T, y: T) -> Result<[T; 2], GeometryError>;
}

/// Iteration limits for [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonSettings {
    /// Hard cap on Newton iterations.
    pub max_iterations: usize,
    /// Maximum step halvings per iteration.
    pub max_backtracks: usize,
    /// Residual norm accepted as a root.
    pub tolerance: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_backtracks: 20,
            tolerance: 1e-10,
        }
    }
}

/// A converged Newton solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRoot {
    pub point: Point2,
    pub iterations: usize,
    pub residual: f64,
}

/// Solves `system` by damped Newton iteration starting from `start`.
///
/// Each step solves `J · Δ = -F` with the exact Jacobian obtained from dual
/// numbers, then halves `Δ` until the residual norm decreases (or the
/// backtrack budget runs out).
///
/// # Errors
///
/// Returns [`SolveError`] when the Jacobian is singular, the iterate leaves the
/// finite range, the system cannot be evaluated, or the iteration cap is hit.
pub fn solve<S: System2>(
    system: &S,
    start: Point2,
    settings: &NewtonSettings,
) -> Result<NewtonRoot, SolveError> {
    let mut point = start;

    for iteration in 0..settings.max_iterations {
        let [f0, f1] = system
            .residuals(Dual2::var_x(point.x), Dual2::var_y(point.y))
            .map_err(SolveError::Evaluation)?;
        let residual = Vector2::new(f0.value, f1.value);
        let norm = residual.norm();

        if !norm.is_finite() {
            return Err(SolveError::Diverged { iteration });
        }
        if norm <= settings.tolerance {
            return Ok(NewtonRoot {
                point,
                iterations: iteration,
                residual: norm,
            });
        }

        let jacobian = Matrix2::new(f0.grad.x, f0.grad.y, f1.grad.x, f1.grad.y);
        if jacobian.determinant().abs() < SINGULAR_DETERMINANT {
            return Err(SolveError::Singular { iteration });
        }
        let inverse = jacobian
            .try_inverse()
            .ok_or(SolveError::Singular { iteration })?;
        let step = -(inverse * residual);

        let mut scale = 1.0;
        let mut next = point + step;
        for _ in 0..settings.max_backtracks {
            match residual_norm(system, next) {
                Some(n) if n < norm => break,
                _ => {
                    scale *= 0.5;
                    next = point + step * scale;
                }
            }
        }

        if !next.x.is_finite() || !next.y.is_finite() {
            return Err(SolveError::Diverged { iteration });
        }
        trace!(iteration, norm, x = next.x, y = next.y, scale, "newton step");
        point = next;
    }

    // The last step may have landed on the root.
    match residual_norm(system, point) {
        Some(norm) if norm <= settings.tolerance => Ok(NewtonRoot {
            point,
            iterations: settings.max_iterations,
            residual: norm,
        }),
        other => Err(SolveError::NotConverged {
            iterations: settings.max_iterations,
            residual: other.unwrap_or(f64::NAN),
        }),
    }
}

/// Residual norm at `point`, or `None` if the system is undefined there.
fn residual_norm<S: System2>(system: &S, point: Point2) -> Option<f64> {
    let [f0, f1] = system.residuals(point.x, point.y).ok()?;
    let norm = Vector2::new(f0, f1).norm();
    norm.is_finite().then_some(norm)
}
