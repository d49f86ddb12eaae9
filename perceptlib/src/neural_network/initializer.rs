use super::prelude::*;

/// Default divisor of the layer weights range.
///
/// Weights of a layer with `n` neurons are sampled
/// from `[-n / range_factor, n / range_factor)`.
pub const DEFAULT_RANGE_FACTOR: f64 = 2.4;

#[derive(Debug, Clone)]
/// Source of random initial weights and biases.
///
/// Seeded once per network build so two builds with
/// the same seed produce the same neurons.
pub struct Initializer {
    rng: fastrand::Rng,
    seed: u64
}

impl Default for Initializer {
    #[inline]
    fn default() -> Self {
        Self::with_seed(fastrand::u64(..))
    }
}

impl Initializer {
    #[inline]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            seed
        }
    }

    #[inline]
    /// Seed this initializer was created with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    /// Sample uniformly distributed float from `[low, high)`.
    pub fn uniform<F: Float>(&mut self, low: F, high: F) -> F {
        low + F::from_f64(self.rng.f64()) * (high - low)
    }

    #[inline]
    /// Weights range of a layer with given amount of neurons.
    pub fn layer_bounds<F: Float>(neurons: usize, range_factor: f64) -> (F, F) {
        let bound = F::from_f64(neurons as f64 / range_factor);

        (-bound, bound)
    }
}

#[test]
fn test_initializer_reproducibility() {
    let mut a = Initializer::with_seed(42);
    let mut b = Initializer::with_seed(42);

    for _ in 0..100 {
        let x = a.uniform(-1.0_f64, 1.0);

        assert_eq!(x, b.uniform(-1.0, 1.0));
        assert!((-1.0..1.0).contains(&x));
    }

    assert_eq!(a.seed(), 42);
}

#[test]
fn test_layer_bounds() {
    let (low, high) = Initializer::layer_bounds::<f64>(3, 2.4);

    assert_eq!(low, -1.25);
    assert_eq!(high, 1.25);
}
