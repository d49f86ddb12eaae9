use std::ops::*;

mod float32;
mod float64;

/// Generic float numbers representation.
///
/// Every weight, bias, activation and gradient of the neural network
/// module is stored in this type, so you can pick between single and
/// double precision for the whole network at once.
pub trait Float:
    Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self> +
    AddAssign + SubAssign + MulAssign + DivAssign + Neg<Output = Self> +
    Default + Clone + Copy + PartialEq + PartialOrd + std::fmt::Debug + std::fmt::Display +
    Send + Sync + Sized + 'static
{
    /// Constant equal to `Self::from_float(0.0)`.
    /// Needed for compiler optimizations.
    ///
    /// Use `-Float::ZERO` for negative zero.
    const ZERO: Self;

    /// Constant equal to `Self::from_float(0.5)`.
    /// Needed for compiler optimizations.
    const HALF: Self;

    /// Constant equal to `Self::from_float(1.0)`.
    /// Needed for compiler optimizations.
    const ONE: Self;

    /// Minimal allowed value of the float.
    const MIN: Self;

    /// Maximal allowed value of the float.
    const MAX: Self;

    /// Machine epsilon value.
    ///
    /// This is the difference between 1.0 and the next
    /// larger representable number.
    const EPSILON: Self;

    /// Represent current float as machine f64 (double precision).
    fn as_f64(&self) -> f64;

    /// Convert given float to another type.
    fn from_float<F: Float>(float: F) -> Self;

    #[inline]
    /// Convert machine f64 to the current type.
    fn from_f64(float: f64) -> Self {
        Self::from_float(float)
    }

    #[inline]
    /// Convert amount of items (e.g. dataset length) to the current type.
    fn from_usize(value: usize) -> Self {
        Self::from_float(value as f64)
    }

    // =================================== Arithmetic functions ===================================

    /// Returns true if self is neither infinite nor NaN.
    fn is_finite(&self) -> bool {
        self.as_f64().is_finite()
    }

    /// Computes the absolute value of self.
    fn abs(&self) -> Self {
        Self::from_float(self.as_f64().abs())
    }

    /// Returns the maximum of the two numbers, ignoring NaN.
    fn max(self, other: Self) -> Self {
        Self::from_float(self.as_f64().max(other.as_f64()))
    }

    /// Returns the minimum of the two numbers, ignoring NaN.
    fn min(self, other: Self) -> Self {
        Self::from_float(self.as_f64().min(other.as_f64()))
    }

    /// Calculate `e^(self)`.
    fn exp(&self) -> Self {
        Self::from_float(self.as_f64().exp())
    }

    /// Hyperbolic tangent function.
    fn tanh(&self) -> Self {
        Self::from_float(self.as_f64().tanh())
    }
}

#[test]
fn test_float_conversions() {
    assert_eq!(<f32 as Float>::from_f64(0.5), 0.5_f32);
    assert_eq!(<f64 as Float>::from_usize(7), 7.0_f64);
    assert_eq!(<f64 as Float>::from_float(1.5_f32), 1.5_f64);

    assert_eq!(Float::max(2.0_f64, -3.0), 2.0);
    assert_eq!(Float::min(2.0_f32, -3.0), -3.0);

    assert!(!Float::is_finite(&f64::NAN));
    assert!(Float::is_finite(&0.1_f32));
}
