use std::ops::{Add, Div, Mul, Neg, Sub};

use super::{Scalar, Vector2};

/// A forward-mode dual number over two unknowns.
///
/// `value` is the function value and `grad` its partial derivatives with
/// respect to `(x, y)`. Every arithmetic operation applies the chain rule, so
/// evaluating a path equation on `Dual2` inputs yields one row of the exact
/// Jacobian alongside the residual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual2 {
    pub value: f64,
    pub grad: Vector2,
}

impl Dual2 {
    /// Creates a dual number with an explicit gradient.
    #[must_use]
    pub fn new(value: f64, grad: Vector2) -> Self {
        Self { value, grad }
    }

    /// The unknown `x` evaluated at `value`.
    #[must_use]
    pub fn var_x(value: f64) -> Self {
        Self::new(value, Vector2::new(1.0, 0.0))
    }

    /// The unknown `y` evaluated at `value`.
    #[must_use]
    pub fn var_y(value: f64) -> Self {
        Self::new(value, Vector2::new(0.0, 1.0))
    }
}

impl Add for Dual2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.value, self.grad + rhs.grad)
    }
}

impl Sub for Dual2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.value, self.grad - rhs.grad)
    }
}

impl Mul for Dual2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.value * rhs.value,
            self.grad * rhs.value + rhs.grad * self.value,
        )
    }
}

impl Div for Dual2 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let denom = rhs.value * rhs.value;
        Self::new(
            self.value / rhs.value,
            (self.grad * rhs.value - rhs.grad * self.value) / denom,
        )
    }
}

impl Neg for Dual2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.value, -self.grad)
    }
}

impl Scalar for Dual2 {
    fn constant(value: f64) -> Self {
        Self::new(value, Vector2::zeros())
    }

    fn value(self) -> f64 {
        self.value
    }

    fn sqrt(self) -> Self {
        let root = self.value.sqrt();
        Self::new(root, self.grad / (2.0 * root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample<T: Scalar>(x: T, y: T) -> T {
        // Mixed expression touching every operation.
        let two = T::constant(2.0);
        ((x - two) * (x - two) + y * y).sqrt() / (x + y) - (-y)
    }

    #[test]
    fn constant_has_zero_gradient() {
        let c = Dual2::constant(3.0);
        assert_eq!(c.grad, Vector2::zeros());
    }

    #[test]
    fn product_rule() {
        let x = Dual2::var_x(3.0);
        let y = Dual2::var_y(4.0);
        let p = x * y;
        assert_abs_diff_eq!(p.value, 12.0);
        assert_abs_diff_eq!(p.grad.x, 4.0);
        assert_abs_diff_eq!(p.grad.y, 3.0);
    }

    #[test]
    fn quotient_rule() {
        let x = Dual2::var_x(2.0);
        let y = Dual2::var_y(4.0);
        let q = x / y;
        assert_abs_diff_eq!(q.value, 0.5);
        assert_abs_diff_eq!(q.grad.x, 0.25);
        assert_abs_diff_eq!(q.grad.y, -0.125);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let (x0, y0) = (5.0, 3.0);
        let d = sample(Dual2::var_x(x0), Dual2::var_y(y0));
        let h = 1e-6;
        let dx = (sample(x0 + h, y0) - sample(x0 - h, y0)) / (2.0 * h);
        let dy = (sample(x0, y0 + h) - sample(x0, y0 - h)) / (2.0 * h);

        assert_abs_diff_eq!(d.value, sample(x0, y0), epsilon = 1e-12);
        assert_abs_diff_eq!(d.grad.x, dx, epsilon = 1e-6);
        assert_abs_diff_eq!(d.grad.y, dy, epsilon = 1e-6);
    }
}
