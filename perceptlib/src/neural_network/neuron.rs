use super::prelude::*;

/// Generic `Neuron` type with f32 float type.
pub type Neuron32 = Neuron<f32>;

/// Generic `Neuron` type with f64 float type.
pub type Neuron64 = Neuron<f64>;

#[derive(Debug, Clone, PartialEq)]
/// Single neuron representation.
///
/// Neurons have fixed amount of inputs, associated float weights
/// and a single float bias. When input is given neuron sums
/// multiplications of weights and input numbers and adds a bias.
/// Activation is not applied by the neuron itself: it's a property
/// of the layer the neuron belongs to.
///
/// ```
/// use perceptlib::prelude::*;
///
/// let mut neuron = Neuron64::new(vec![0.5, -0.25], 0.125);
///
/// assert_eq!(neuron.process(&[2.0, 4.0]), 0.125);
///
/// // Gradient descent step: w -= alpha * gradient * input.
/// neuron.adjust_by_gradient(&[2.0, 4.0], 1.0, 0.25);
///
/// assert_eq!(neuron.weights(), &[0.0, -1.25]);
/// assert_eq!(neuron.bias(), -0.125);
/// ```
pub struct Neuron<F: Float> {
    /// Weights for the neuron inputs.
    weights: Vec<F>,

    /// Value added to the weighted input sum.
    bias: F
}

impl<F: Float> Neuron<F> {
    #[inline]
    pub fn new(weights: impl Into<Vec<F>>, bias: F) -> Self {
        Self {
            weights: weights.into(),
            bias
        }
    }

    /// Construct new neuron with weights and bias
    /// sampled uniformly from `[low, high)`.
    pub fn random(inputs: usize, low: F, high: F, initializer: &mut Initializer) -> Self {
        let weights = (0..inputs)
            .map(|_| initializer.uniform(low, high))
            .collect::<Vec<F>>();

        let bias = initializer.uniform(low, high);

        Self {
            weights,
            bias
        }
    }

    #[inline]
    pub fn weights(&self) -> &[F] {
        &self.weights
    }

    #[inline]
    pub const fn bias(&self) -> F {
        self.bias
    }

    #[inline]
    /// Amount of the neuron's inputs.
    pub fn size(&self) -> usize {
        self.weights.len()
    }

    /// Calculate sum of inputs multiplied by appropriate weights
    /// plus the neuron's bias.
    pub fn process(&self, inputs: &[F]) -> F {
        assert_eq!(
            self.weights.len(), inputs.len(),
            "neuron expects {} inputs, got {}", self.weights.len(), inputs.len()
        );

        let mut output = F::ZERO;

        for (weight, input) in self.weights.iter().zip(inputs) {
            output += *weight * *input;
        }

        output + self.bias
    }

    /// Add given deltas to the neuron's weights and bias.
    pub fn adjust(&mut self, weight_deltas: &[F], bias_delta: F) {
        assert_eq!(
            self.weights.len(), weight_deltas.len(),
            "neuron has {} weights, got {} deltas", self.weights.len(), weight_deltas.len()
        );

        for (weight, delta) in self.weights.iter_mut().zip(weight_deltas) {
            *weight += *delta;
        }

        self.bias += bias_delta;
    }

    /// Perform a single stochastic gradient descent step
    /// using inputs the neuron was activated with, its
    /// gradient and the learning rate.
    pub fn adjust_by_gradient(&mut self, inputs: &[F], gradient: F, learning_rate: F) {
        let factor = -learning_rate * gradient;

        let deltas = inputs.iter()
            .map(|input| factor * *input)
            .collect::<Vec<F>>();

        self.adjust(&deltas, factor);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const EPSILON: f64 = 1e-12;

    fn neuron() -> Neuron64 {
        Neuron::new(vec![0.1, -0.2, 0.3], -1.0)
    }

    #[test]
    fn test_process_weighted_sum() {
        let n0 = neuron();

        let expected = 0.1 * -0.5 + -0.2 * 0.125 + 0.3 * 0.75 - 1.0;

        assert_abs_diff_eq!(n0.process(&[-0.5, 0.125, 0.75]), expected, epsilon = EPSILON);
        assert_abs_diff_eq!(n0.process(&[0.0, 0.0, 0.0]), n0.bias(), epsilon = EPSILON);
    }

    #[test]
    #[should_panic(expected = "neuron expects 3 inputs, got 2")]
    fn test_process_length_mismatch() {
        neuron().process(&[1.0, 2.0]);
    }

    #[test]
    fn test_adjust_manually() {
        let n0 = neuron();
        let mut n = n0.clone();

        n.adjust(&[0.2, 0.1, -0.5], 2.0);

        assert_abs_diff_eq!(n.weights()[0], n0.weights()[0] + 0.2, epsilon = EPSILON);
        assert_abs_diff_eq!(n.weights()[1], n0.weights()[1] + 0.1, epsilon = EPSILON);
        assert_abs_diff_eq!(n.weights()[2], n0.weights()[2] - 0.5, epsilon = EPSILON);
        assert_abs_diff_eq!(n.bias(), n0.bias() + 2.0, epsilon = EPSILON);

        let mut n = n0.clone();

        n.adjust(&[0.0, 0.0, 0.0], 0.0);

        assert_eq!(n, n0);
    }

    #[test]
    #[should_panic]
    fn test_adjust_length_mismatch() {
        neuron().adjust(&[0.1], 0.0);
    }

    #[test]
    fn test_adjust_by_gradient() {
        let n0 = neuron();
        let mut n = n0.clone();

        n.adjust_by_gradient(&[0.2, 0.1, -0.5], 0.5, 0.1);

        let factor = -1.0 * 0.5 * 0.1;

        assert_abs_diff_eq!(n.weights()[0], n0.weights()[0] + 0.2 * factor, epsilon = EPSILON);
        assert_abs_diff_eq!(n.weights()[1], n0.weights()[1] + 0.1 * factor, epsilon = EPSILON);
        assert_abs_diff_eq!(n.weights()[2], n0.weights()[2] - 0.5 * factor, epsilon = EPSILON);
        assert_abs_diff_eq!(n.bias(), n0.bias() + factor, epsilon = EPSILON);
    }

    #[test]
    fn test_adjust_by_zero_gradient_or_rate() {
        let n0 = neuron();

        let mut n = n0.clone();

        n.adjust_by_gradient(&[0.2, 0.1, -0.5], 0.0, 0.1);

        assert_eq!(n.weights(), n0.weights());
        assert_eq!(n.bias(), n0.bias());

        let mut n = n0.clone();

        n.adjust_by_gradient(&[0.2, 0.1, -0.5], 0.5, 0.0);

        assert_eq!(n.weights(), n0.weights());
        assert_eq!(n.bias(), n0.bias());
    }

    #[test]
    fn test_random_neuron() {
        let mut initializer = Initializer::with_seed(7);

        let n = Neuron64::random(4, -0.5, 0.5, &mut initializer);

        assert_eq!(n.size(), 4);
        assert!(n.weights().iter().all(|w| (-0.5..0.5).contains(w)));
        assert!((-0.5..0.5).contains(&n.bias()));

        let mut initializer = Initializer::with_seed(7);

        assert_eq!(Neuron64::random(4, -0.5, 0.5, &mut initializer), n);
    }
}
