use super::Float;

impl Float for f64 {
    const ZERO: Self = 0.0;
    const HALF: Self = 0.5;
    const ONE: Self = 1.0;

    const MIN: Self = f64::MIN;
    const MAX: Self = f64::MAX;
    const EPSILON: Self = f64::EPSILON;

    #[inline]
    fn as_f64(&self) -> f64 {
        *self
    }

    #[inline]
    fn from_float<F: Float>(float: F) -> Self {
        float.as_f64()
    }

    // =================================== Arithmetic functions ===================================

    #[inline]
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }

    #[inline]
    fn abs(&self) -> Self {
        f64::abs(*self)
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        f64::max(self, other)
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        f64::min(self, other)
    }

    #[inline]
    fn exp(&self) -> Self {
        f64::exp(*self)
    }

    #[inline]
    fn tanh(&self) -> Self {
        f64::tanh(*self)
    }
}
