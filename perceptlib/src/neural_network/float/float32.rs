use super::Float;

impl Float for f32 {
    const ZERO: Self = 0.0;
    const HALF: Self = 0.5;
    const ONE: Self = 1.0;

    const MIN: Self = f32::MIN;
    const MAX: Self = f32::MAX;
    const EPSILON: Self = f32::EPSILON;

    #[inline]
    fn as_f64(&self) -> f64 {
        *self as f64
    }

    #[inline]
    fn from_float<F: Float>(float: F) -> Self {
        float.as_f64() as f32
    }

    // =================================== Arithmetic functions ===================================

    #[inline]
    fn is_finite(&self) -> bool {
        f32::is_finite(*self)
    }

    #[inline]
    fn abs(&self) -> Self {
        f32::abs(*self)
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        f32::max(self, other)
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        f32::min(self, other)
    }

    #[inline]
    fn exp(&self) -> Self {
        f32::exp(*self)
    }

    #[inline]
    fn tanh(&self) -> Self {
        f32::tanh(*self)
    }
}
