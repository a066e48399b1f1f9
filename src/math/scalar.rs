use std::ops::{Add, Div, Mul, Neg, Sub};

/// Arithmetic shared by concrete evaluation and derivative-carrying evaluation.
///
/// The reflection geometry and the path equations are written once against
/// this trait. With `f64` they produce plain path lengths (time prediction);
/// with [`Dual2`](super::Dual2) they also produce the gradient with respect to
/// the unknown source position, which is what the Newton solver consumes.
pub trait Scalar:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Lifts a known constant (a wall limit, a mic coordinate) into `Self`.
    fn constant(value: f64) -> Self;

    /// Returns the numeric value, dropping any derivative information.
    fn value(self) -> f64;

    /// Square root.
    fn sqrt(self) -> Self;
}

impl Scalar for f64 {
    fn constant(value: f64) -> Self {
        value
    }

    fn value(self) -> f64 {
        self
    }

    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
}
