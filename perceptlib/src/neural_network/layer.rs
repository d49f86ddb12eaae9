use super::prelude::*;

/// Generic `HiddenLayer` type with f32 float type.
pub type HiddenLayer32 = HiddenLayer<f32>;

/// Generic `HiddenLayer` type with f64 float type.
pub type HiddenLayer64 = HiddenLayer<f64>;

/// Generic `OutputLayer` type with f32 float type.
pub type OutputLayer32 = OutputLayer<f32>;

/// Generic `OutputLayer` type with f64 float type.
pub type OutputLayer64 = OutputLayer<f64>;

#[derive(Debug, Clone, PartialEq)]
/// Values remembered by the layer during the last training pass.
pub struct LayerCache<F: Float> {
    /// Activated outputs of the last forward pass.
    pub outputs: Vec<F>,

    /// Gradients of the last backward pass.
    pub gradients: Vec<F>
}

impl<F: Float> LayerCache<F> {
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            outputs: vec![F::ZERO; size],
            gradients: vec![F::ZERO; size]
        }
    }
}

/// Check that neurons list is not empty and all the neurons
/// have the same amount of inputs. Returns this amount.
pub fn validate_neurons<F: Float>(neurons: &[Neuron<F>]) -> anyhow::Result<usize> {
    let Some(first) = neurons.first() else {
        anyhow::bail!("layer must have at least one neuron");
    };

    let inputs = first.size();

    for (i, neuron) in neurons.iter().enumerate() {
        anyhow::ensure!(
            neuron.size() == inputs,
            "neuron {i} has {} inputs while neuron 0 has {inputs}",
            neuron.size()
        );
    }

    Ok(inputs)
}

/// Build list of randomly initialized neurons for a layer.
///
/// Weights and biases are sampled from `[-neurons / range_factor, neurons / range_factor)`.
pub fn random_neurons<F: Float>(
    inputs: usize,
    neurons: usize,
    range_factor: f64,
    initializer: &mut Initializer
) -> Vec<Neuron<F>> {
    let (low, high) = Initializer::layer_bounds::<F>(neurons, range_factor);

    (0..neurons)
        .map(|_| Neuron::random(inputs, low, high, initializer))
        .collect()
}

/// Move every neuron against its gradient.
fn adjust_neurons<F: Float>(neurons: &mut [Neuron<F>], gradients: &[F], inputs: &[F], learning_rate: F) {
    for (neuron, gradient) in neurons.iter_mut().zip(gradients) {
        assert_eq!(
            inputs.len(), neuron.size(),
            "neuron of {} inputs got {} layer inputs", neuron.size(), inputs.len()
        );

        neuron.adjust_by_gradient(inputs, *gradient, learning_rate);
    }
}

/// Group of neurons representation.
///
/// Layers have fixed amount of neurons with same amount
/// of inputs. Layers can connect to each other, when
/// output size of the first layer equals input size
/// of the second layer.
///
/// Implemented by `HiddenLayer` and `OutputLayer` which only differ
/// in how they activate weighted sums and calculate gradients.
///
/// Neurons and caches can only be changed by the layer itself, so the
/// caches always have one value per neuron:
///
/// ```compile_fail
/// use perceptlib::prelude::*;
///
/// let mut layer = OutputLayer64::new(vec![Neuron::new(vec![0.5], 0.0)]).unwrap();
///
/// layer.neurons_mut()[0] = Neuron::new(vec![1.0, 2.0], 0.0);
/// ```
pub trait Layer<F: Float> {
    /// Neurons of the layer.
    fn neurons(&self) -> &[Neuron<F>];

    /// Values remembered during the last training pass.
    fn cache(&self) -> &LayerCache<F>;

    /// Calculate activated outputs of the layer.
    fn activate(&self, inputs: &[F]) -> Vec<F>;

    /// Same as `activate` but remembers outputs in the cache.
    fn activate_and_cache(&mut self, inputs: &[F]) -> Vec<F>;

    /// Calculate gradients of the layer's neurons using
    /// the cached outputs of the last forward pass.
    fn calculate_gradients(&self, intermediate_gradients: &[F]) -> Vec<F>;

    /// Same as `calculate_gradients` but remembers gradients in the cache.
    fn calculate_gradients_and_cache(&mut self, intermediate_gradients: &[F]) -> Vec<F>;

    /// Perform gradient descent step for all the neurons using
    /// cached gradients and the inputs the layer was activated with.
    fn adjust_weights(&mut self, inputs: &[F], learning_rate: F);

    #[inline]
    /// Amount of neurons in the layer.
    fn size(&self) -> usize {
        self.neurons().len()
    }

    #[inline]
    /// Amount of inputs of each neuron of the layer.
    fn input_size(&self) -> usize {
        self.neurons()[0].size()
    }

    /// Calculate weighted sums of all the neurons
    /// without applying activation function.
    fn process(&self, inputs: &[F]) -> Vec<F> {
        self.neurons().iter()
            .map(|neuron| neuron.process(inputs))
            .collect()
    }

    /// Multiply transposed weights matrix of the layer by its gradients.
    ///
    /// Derivative of the previous layer's activation function is not
    /// applied: the previous layer does it in its `calculate_gradients`.
    fn propagate_error_backward(&self, gradients: &[F]) -> Vec<F> {
        assert_eq!(
            gradients.len(), self.size(),
            "layer of {} neurons got {} gradients", self.size(), gradients.len()
        );

        let mut errors = vec![F::ZERO; self.input_size()];

        for (neuron, gradient) in self.neurons().iter().zip(gradients) {
            for (error, weight) in errors.iter_mut().zip(neuron.weights()) {
                *error += *weight * *gradient;
            }
        }

        errors
    }

    #[inline]
    fn output_cache(&self) -> &[F] {
        &self.cache().outputs
    }

    #[inline]
    fn gradient_cache(&self) -> &[F] {
        &self.cache().gradients
    }

    /// Copy weights of all the neurons.
    fn weights(&self) -> Vec<Vec<F>> {
        self.neurons().iter()
            .map(|neuron| neuron.weights().to_vec())
            .collect()
    }

    /// Copy biases of all the neurons.
    fn biases(&self) -> Vec<F> {
        self.neurons().iter()
            .map(Neuron::bias)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Layer with configurable activation function.
pub struct HiddenLayer<F: Float> {
    neurons: Vec<Neuron<F>>,
    activation: Activation,
    cache: LayerCache<F>
}

impl<F: Float> HiddenLayer<F> {
    pub fn new(neurons: Vec<Neuron<F>>, activation: Activation) -> anyhow::Result<Self> {
        validate_neurons(&neurons)?;

        Ok(Self {
            cache: LayerCache::new(neurons.len()),
            neurons,
            activation
        })
    }

    #[inline]
    /// Build layer from randomly initialized neurons.
    pub fn random(
        inputs: usize,
        neurons: usize,
        activation: Activation,
        range_factor: f64,
        initializer: &mut Initializer
    ) -> anyhow::Result<Self> {
        Self::new(random_neurons(inputs, neurons, range_factor, initializer), activation)
    }

    #[inline]
    pub const fn activation(&self) -> Activation {
        self.activation
    }
}

impl<F: Float> Layer<F> for HiddenLayer<F> {
    #[inline]
    fn neurons(&self) -> &[Neuron<F>] {
        &self.neurons
    }

    #[inline]
    fn cache(&self) -> &LayerCache<F> {
        &self.cache
    }

    fn activate(&self, inputs: &[F]) -> Vec<F> {
        self.process(inputs)
            .into_iter()
            .map(|x| self.activation.function(x))
            .collect()
    }

    fn activate_and_cache(&mut self, inputs: &[F]) -> Vec<F> {
        let outputs = self.activate(inputs);

        self.cache.outputs.clone_from(&outputs);

        outputs
    }

    fn calculate_gradients(&self, intermediate_gradients: &[F]) -> Vec<F> {
        assert_eq!(
            intermediate_gradients.len(), self.size(),
            "hidden layer of {} neurons got {} intermediate gradients",
            self.size(), intermediate_gradients.len()
        );

        intermediate_gradients.iter()
            .zip(&self.cache.outputs)
            .map(|(gradient, output)| *gradient * self.activation.derivative(*output))
            .collect()
    }

    fn calculate_gradients_and_cache(&mut self, intermediate_gradients: &[F]) -> Vec<F> {
        let gradients = self.calculate_gradients(intermediate_gradients);

        self.cache.gradients.clone_from(&gradients);

        gradients
    }

    #[inline]
    fn adjust_weights(&mut self, inputs: &[F], learning_rate: F) {
        adjust_neurons(&mut self.neurons, &self.cache.gradients, inputs, learning_rate);
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Last layer of the network.
///
/// Converts weighted sums into a probability distribution
/// using softmax function. Single-neuron layers (binary
/// classification) use sigmoid instead, since softmax of
/// a single value is always 1.
pub struct OutputLayer<F: Float> {
    neurons: Vec<Neuron<F>>,
    cache: LayerCache<F>
}

impl<F: Float> OutputLayer<F> {
    pub fn new(neurons: Vec<Neuron<F>>) -> anyhow::Result<Self> {
        validate_neurons(&neurons)?;

        Ok(Self {
            cache: LayerCache::new(neurons.len()),
            neurons
        })
    }

    #[inline]
    /// Build layer from randomly initialized neurons.
    pub fn random(
        inputs: usize,
        neurons: usize,
        range_factor: f64,
        initializer: &mut Initializer
    ) -> anyhow::Result<Self> {
        Self::new(random_neurons(inputs, neurons, range_factor, initializer))
    }
}

impl<F: Float> Layer<F> for OutputLayer<F> {
    #[inline]
    fn neurons(&self) -> &[Neuron<F>] {
        &self.neurons
    }

    #[inline]
    fn cache(&self) -> &LayerCache<F> {
        &self.cache
    }

    fn activate(&self, inputs: &[F]) -> Vec<F> {
        let outputs = self.process(inputs);

        if outputs.len() == 1 {
            return vec![sigmoid(outputs[0])];
        }

        softmax(&outputs)
    }

    fn activate_and_cache(&mut self, inputs: &[F]) -> Vec<F> {
        let outputs = self.activate(inputs);

        self.cache.outputs.clone_from(&outputs);

        outputs
    }

    /// For the output layer intermediate gradients are
    /// the desired outputs of the network.
    ///
    /// `actual - desired` is the gradient of the cross-entropy
    /// loss over softmax outputs.
    fn calculate_gradients(&self, desired: &[F]) -> Vec<F> {
        assert_eq!(
            desired.len(), self.size(),
            "output layer of {} neurons got {} desired values",
            self.size(), desired.len()
        );

        self.cache.outputs.iter()
            .zip(desired)
            .map(|(actual, desired)| *actual - *desired)
            .collect()
    }

    fn calculate_gradients_and_cache(&mut self, intermediate_gradients: &[F]) -> Vec<F> {
        let gradients = self.calculate_gradients(intermediate_gradients);

        self.cache.gradients.clone_from(&gradients);

        gradients
    }

    #[inline]
    fn adjust_weights(&mut self, inputs: &[F], learning_rate: F) {
        adjust_neurons(&mut self.neurons, &self.cache.gradients, inputs, learning_rate);
    }
}
