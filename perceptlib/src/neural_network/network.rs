use super::prelude::*;

/// Generic `Network` type with f32 float type.
pub type Network32 = Network<f32>;

/// Generic `Network` type with f64 float type.
pub type Network64 = Network<f64>;

#[derive(Debug, Clone, PartialEq)]
/// Chain of hidden layers followed by the output layer.
///
/// Network is trained online: every `train` call performs forward
/// and backward propagation for a single sample and immediately
/// updates weights of all the neurons.
///
/// ```
/// use perceptlib::prelude::*;
///
/// let config = NetworkConfig::default()
///     .with_dimensions([2, 3, 2])
///     .with_seed(1);
///
/// let mut network = Network64::from_config(&config).unwrap();
///
/// assert_eq!(network.dimensions(), [2, 3, 2]);
///
/// let loss = network.train(&[1.0, 0.0], &[0.0, 1.0]);
///
/// assert!(loss >= 0.0);
/// assert_eq!(network.predict(&[1.0, 0.0]).len(), 2);
/// ```
pub struct Network<F: Float> {
    hidden_layers: Vec<HiddenLayer<F>>,
    output_layer: OutputLayer<F>,
    learning_rate: F,
    loss: Loss
}

impl<F: Float> Network<F> {
    /// Connect given layers into a network.
    ///
    /// Return error if amount of inputs of some layer
    /// doesn't equal amount of neurons of the previous one.
    pub fn new(
        hidden_layers: Vec<HiddenLayer<F>>,
        output_layer: OutputLayer<F>,
        learning_rate: F,
        loss: Loss
    ) -> anyhow::Result<Self> {
        let mut prev_size = None;

        for (i, layer) in hidden_layers.iter().enumerate() {
            if let Some(prev_size) = prev_size {
                anyhow::ensure!(
                    layer.input_size() == prev_size,
                    "hidden layer {i} expects {} inputs but previous layer has {prev_size} neurons",
                    layer.input_size()
                );
            }

            prev_size = Some(layer.size());
        }

        if let Some(prev_size) = prev_size {
            anyhow::ensure!(
                output_layer.input_size() == prev_size,
                "output layer expects {} inputs but last hidden layer has {prev_size} neurons",
                output_layer.input_size()
            );
        }

        if learning_rate == F::ZERO {
            log::warn!("network learning rate is 0, training won't change weights");
        }

        let network = Self {
            hidden_layers,
            output_layer,
            learning_rate,
            loss
        };

        log::debug!(
            "Created network with dimensions {:?}, learning rate {}, loss {}",
            network.dimensions(),
            learning_rate.as_f64(),
            loss
        );

        Ok(network)
    }

    /// Build network with randomly initialized neurons.
    pub fn build(config: &NetworkConfig, initializer: &mut Initializer) -> anyhow::Result<Self> {
        config.validate()?;

        let dimensions = &config.dimensions;
        let outputs = dimensions.len() - 1;

        log::debug!("Building network {dimensions:?} with seed {}", initializer.seed());

        let hidden_layers = (1..outputs)
            .map(|i| HiddenLayer::random(
                dimensions[i - 1],
                dimensions[i],
                config.hidden_activation(i - 1),
                config.range_factor,
                initializer
            ))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let output_layer = OutputLayer::random(
            dimensions[outputs - 1],
            dimensions[outputs],
            config.range_factor,
            initializer
        )?;

        Self::new(hidden_layers, output_layer, F::from_f64(config.learning_rate), config.loss)
    }

    #[inline]
    /// Build network using initializer seeded from the config.
    pub fn from_config(config: &NetworkConfig) -> anyhow::Result<Self> {
        Self::build(config, &mut config.initializer())
    }

    #[inline]
    pub const fn learning_rate(&self) -> F {
        self.learning_rate
    }

    #[inline]
    pub fn set_learning_rate(&mut self, learning_rate: F) {
        self.learning_rate = learning_rate;
    }

    #[inline]
    pub const fn loss(&self) -> Loss {
        self.loss
    }

    #[inline]
    pub fn set_loss(&mut self, loss: Loss) {
        self.loss = loss;
    }

    #[inline]
    /// Amount of layers including the output one.
    pub fn size(&self) -> usize {
        self.hidden_layers.len() + 1
    }

    #[inline]
    pub fn hidden_layers(&self) -> &[HiddenLayer<F>] {
        &self.hidden_layers
    }

    #[inline]
    pub const fn output_layer(&self) -> &OutputLayer<F> {
        &self.output_layer
    }

    /// Get layer by its index from the input side.
    /// Index `size() - 1` is the output layer.
    pub fn get(&self, index: usize) -> &dyn Layer<F> {
        assert!(index < self.size(), "layer index {index} is out of {} layers", self.size());

        if index == self.hidden_layers.len() {
            return &self.output_layer;
        }

        &self.hidden_layers[index]
    }

    /// Get layer by its index from the output side.
    /// Index 0 is the output layer.
    pub fn rget(&self, index: usize) -> &dyn Layer<F> {
        assert!(index < self.size(), "layer index {index} is out of {} layers", self.size());

        self.get(self.size() - 1 - index)
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.get(0).input_size()
    }

    #[inline]
    pub fn output_size(&self) -> usize {
        self.output_layer.size()
    }

    /// Input width followed by sizes of all the layers.
    pub fn dimensions(&self) -> Vec<usize> {
        let mut dimensions = Vec::with_capacity(self.size() + 1);

        dimensions.push(self.input_size());

        for i in 0..self.size() {
            dimensions.push(self.get(i).size());
        }

        dimensions
    }

    /// Weights of all the layers' neurons.
    pub fn weights(&self) -> Vec<Vec<Vec<F>>> {
        (0..self.size())
            .map(|i| self.get(i).weights())
            .collect()
    }

    /// Biases of all the layers' neurons.
    pub fn biases(&self) -> Vec<Vec<F>> {
        (0..self.size())
            .map(|i| self.get(i).biases())
            .collect()
    }

    /// Total amount of weights and biases.
    pub fn params(&self) -> usize {
        (0..self.size())
            .map(|i| {
                let layer = self.get(i);

                layer.size() * (layer.input_size() + 1)
            })
            .sum()
    }

    #[inline]
    fn assert_input(&self, input: &[F]) {
        assert_eq!(
            input.len(), self.input_size(),
            "network expects {} inputs, got {}", self.input_size(), input.len()
        );
    }

    #[inline]
    fn assert_output(&self, output: &[F]) {
        assert_eq!(
            output.len(), self.output_size(),
            "network has {} outputs, got {} desired values", self.output_size(), output.len()
        );
    }

    /// Activate all the layers remembering their outputs.
    pub fn forward_propagate(&mut self, input: &[F]) -> Vec<F> {
        self.assert_input(input);

        let mut signal = input.to_vec();

        for layer in &mut self.hidden_layers {
            signal = layer.activate_and_cache(&signal);
        }

        let output = self.output_layer.activate_and_cache(&signal);

        log::trace!("Forward propagation done");

        output
    }

    /// Calculate gradients of all the layers, starting from the output one.
    ///
    /// Must be called after `forward_propagate` since gradients
    /// are calculated from the cached layers outputs.
    pub fn backward_propagate(&mut self, desired: &[F]) {
        self.assert_output(desired);

        let gradients = self.output_layer.calculate_gradients_and_cache(desired);

        if self.hidden_layers.is_empty() {
            log::trace!("Backward propagation done");

            return;
        }

        let mut signal = self.output_layer.propagate_error_backward(&gradients);

        for (i, layer) in self.hidden_layers.iter_mut().enumerate().rev() {
            let gradients = layer.calculate_gradients_and_cache(&signal);

            if i > 0 {
                signal = layer.propagate_error_backward(&gradients);
            }
        }

        log::trace!("Backward propagation done");
    }

    /// Update weights of all the neurons using cached gradients.
    fn update_weights(&mut self, input: &[F]) {
        let learning_rate = self.learning_rate;

        let mut layer_input = input.to_vec();

        for layer in &mut self.hidden_layers {
            layer.adjust_weights(&layer_input, learning_rate);

            layer_input = layer.output_cache().to_vec();
        }

        self.output_layer.adjust_weights(&layer_input, learning_rate);
    }

    /// Perform single training step and return
    /// prediction made before weights update.
    pub fn train_prediction(&mut self, input: &[F], output: &[F]) -> Vec<F> {
        self.assert_output(output);

        let prediction = self.forward_propagate(input);

        self.backward_propagate(output);
        self.update_weights(input);

        prediction
    }

    /// Perform single training step and return loss
    /// of the prediction made before weights update.
    pub fn train(&mut self, input: &[F], output: &[F]) -> F {
        let prediction = self.train_prediction(input, output);

        let loss = self.loss.loss(output, &prediction);

        log::trace!("Propagation loss: {}", loss.as_f64());

        loss
    }

    /// Calculate network output without changing its state.
    pub fn predict(&self, input: &[F]) -> Vec<F> {
        self.assert_input(input);

        let mut signal = input.to_vec();

        for layer in &self.hidden_layers {
            signal = layer.activate(&signal);
        }

        self.output_layer.activate(&signal)
    }

    /// Calculate loss of the network prediction.
    pub fn test(&self, input: &[F], output: &[F]) -> F {
        self.assert_output(output);

        self.loss.loss(output, &self.predict(input))
    }

    /// Train the network on the whole dataset until the worst
    /// sample loss of an epoch goes below the threshold or
    /// the epochs limit is reached.
    ///
    /// Return the worst sample loss of each performed epoch.
    pub fn train_epochs<T: AsRef<[F]>>(
        &mut self,
        dataset: &[(T, T)],
        epochs_limit: usize,
        error_threshold: F
    ) -> Vec<F> {
        let mut losses = Vec::new();

        for epoch in 1..=epochs_limit {
            let mut worst_loss = F::ZERO;

            for (input, output) in dataset {
                worst_loss = worst_loss.max(self.train(input.as_ref(), output.as_ref()));
            }

            log::debug!("Epoch {epoch}: worst loss {}", worst_loss.as_f64());

            losses.push(worst_loss);

            if worst_loss < error_threshold {
                break;
            }
        }

        losses
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn network() -> Network64 {
        let l1 = HiddenLayer::new(vec![
            Neuron::new(vec![-0.1, 0.2], 0.1),
            Neuron::new(vec![0.2, -0.1], -0.2)
        ], Activation::Sigmoid).unwrap();

        let l2 = HiddenLayer::new(vec![
            Neuron::new(vec![-0.05, -0.2], -0.3),
            Neuron::new(vec![-0.05, -0.3], 0.2),
            Neuron::new(vec![-0.1, -0.7], 0.5)
        ], Activation::Tanh).unwrap();

        let l3 = OutputLayer::new(vec![
            Neuron::new(vec![0.5, -0.2, -0.1], -0.3),
            Neuron::new(vec![-0.05, -0.3, 0.4], 0.2)
        ]).unwrap();

        Network::new(vec![l1, l2], l3, 0.3, Loss::Sse).unwrap()
    }

    fn assert_all_near(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());

        for (actual, expected) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(actual, expected, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_forward_propagation() {
        let mut network = network();

        let expected: [&[f64]; 3] = [
            &[0.5, 0.5],
            &[-0.4011342849, 0.0249947929, 0.0996679946],
            &[0.316920916177, 0.683079083822]
        ];

        network.forward_propagate(&[1.0, 0.0]);

        for (i, expected) in expected.iter().enumerate() {
            assert_all_near(network.get(i).output_cache(), expected);
        }
    }

    #[test]
    fn test_backward_propagation() {
        let mut network = network();

        network.forward_propagate(&[1.0, 0.0]);
        network.backward_propagate(&[0.0, 1.0]);

        assert_all_near(network.rget(0).gradient_cache(), &[0.316920916177, 0.683079083822 - 1.0]);

        // Hidden layer gradient is the derivative of the activation
        // times the error propagated from the next layer.
        let output_gradients = network.rget(0).gradient_cache().to_vec();
        let outputs = network.rget(1).output_cache().to_vec();

        let signal = network.rget(0).propagate_error_backward(&output_gradients);

        for (i, gradient) in network.rget(1).gradient_cache().iter().enumerate() {
            assert_abs_diff_eq!(*gradient, signal[i] * (1.0 - outputs[i] * outputs[i]), epsilon = EPSILON);
        }
    }

    #[test]
    /// Every weight moves by `-alpha * gradient * layer_input`
    /// and every bias by `-alpha * gradient`.
    fn test_weights_update() {
        let before = network();
        let mut network = network();

        network.train(&[1.0, 0.0], &[0.0, 1.0]);

        assert_all_near(network.rget(0).gradient_cache(), &[0.316920916177, -0.316920916178]);
        assert_all_near(network.rget(2).gradient_cache(), &[0.0016980169406, 0.0177667373042]);

        // Inputs of each layer: network input, then outputs of the previous layer.
        let layer_inputs: [&[f64]; 3] = [
            &[1.0, 0.0],
            &[0.5, 0.5],
            &[-0.4011342849, 0.0249947929, 0.0996679946]
        ];

        for (i, inputs) in layer_inputs.iter().enumerate() {
            let old = before.get(i);
            let new = network.get(i);

            let old_weights = old.weights();
            let new_weights = new.weights();

            for (j, gradient) in new.gradient_cache().iter().enumerate() {
                for (k, input) in inputs.iter().enumerate() {
                    assert_abs_diff_eq!(
                        new_weights[j][k],
                        old_weights[j][k] - 0.3 * gradient * input,
                        epsilon = EPSILON
                    );
                }

                assert_abs_diff_eq!(new.biases()[j], old.biases()[j] - 0.3 * gradient, epsilon = EPSILON);
            }
        }
    }

    #[test]
    /// Training returns prediction made before weights update.
    fn test_simple_training() {
        let mut network = network();

        let before = network.weights();
        let prediction = network.train_prediction(&[1.0, 0.0], &[0.0, 1.0]);

        assert_all_near(&prediction, &[0.316920916177, 0.683079083822]);
        assert_ne!(network.weights(), before);

        let mut network = self::network();

        let loss = network.train(&[1.0, 0.0], &[0.0, 1.0]);
        let expected = sum_squared_error(&[0.0, 1.0], &[0.316920916177, 0.683079083822]);

        assert_abs_diff_eq!(loss, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_zero_learning_rate() {
        let mut network = network();

        network.set_learning_rate(0.0);
        network.train(&[1.0, 0.0], &[0.0, 1.0]);

        assert_eq!(network.weights(), self::network().weights());
        assert_eq!(network.biases(), self::network().biases());
    }

    #[test]
    fn test_predict_doesnt_change_caches() {
        let mut network = network();

        network.train(&[1.0, 0.0], &[0.0, 1.0]);

        let snapshot = network.clone();

        network.predict(&[0.3, -0.7]);
        network.test(&[0.3, -0.7], &[1.0, 0.0]);

        for i in 0..network.size() {
            assert_eq!(network.get(i).output_cache(), snapshot.get(i).output_cache());
            assert_eq!(network.get(i).gradient_cache(), snapshot.get(i).gradient_cache());
        }

        assert_eq!(network, snapshot);
    }

    #[test]
    fn test_predict_matches_forward_propagation() {
        let mut network = network();

        let prediction = network.predict(&[0.25, 0.75]);

        assert_all_near(&network.forward_propagate(&[0.25, 0.75]), &prediction);
    }

    #[test]
    fn test_layers_indexing() {
        let network = network();

        assert_eq!(network.size(), 3);
        assert_eq!(network.dimensions(), [2, 2, 3, 2]);
        assert_eq!(network.input_size(), 2);
        assert_eq!(network.output_size(), 2);
        assert_eq!(network.params(), 2 * 3 + 3 * 3 + 2 * 4);

        assert_eq!(network.rget(0).biases(), network.get(2).biases());
        assert_eq!(network.rget(2).biases(), [0.1, -0.2]);
        assert_eq!(network.weights()[1][2], [-0.1, -0.7]);
    }

    #[test]
    #[should_panic(expected = "layer index 3 is out of 3 layers")]
    fn test_layer_index_out_of_bounds() {
        network().get(3);
    }

    #[test]
    fn test_broken_chain() {
        let hidden = HiddenLayer64::new(vec![
            Neuron::new(vec![0.0, 0.0], 0.0)
        ], Activation::Relu).unwrap();

        let output = OutputLayer64::new(vec![
            Neuron::new(vec![0.0, 0.0], 0.0)
        ]).unwrap();

        assert!(Network::new(vec![hidden], output, 0.1, Loss::Sse).is_err());
    }

    #[test]
    #[should_panic(expected = "network expects 2 inputs, got 3")]
    fn test_wrong_input_size() {
        network().predict(&[1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic]
    fn test_wrong_output_size() {
        network().train(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    /// Two builds with the same seed produce the same network.
    fn test_seeded_build() -> anyhow::Result<()> {
        let config = NetworkConfig::default()
            .with_dimensions([3, 5, 4, 2])
            .with_seed(123);

        let a = Network64::from_config(&config)?;
        let b = Network64::from_config(&config)?;

        assert_eq!(a, b);
        assert_eq!(a.dimensions(), [3, 5, 4, 2]);

        let c = Network64::from_config(&config.with_seed(124))?;

        assert_ne!(a.weights(), c.weights());

        Ok(())
    }

    #[test]
    fn test_no_hidden_layers() -> anyhow::Result<()> {
        let config = NetworkConfig::default()
            .with_dimensions([2, 1])
            .with_seed(5);

        let mut network = Network64::from_config(&config)?;

        assert_eq!(network.size(), 1);
        assert_eq!(network.dimensions(), [2, 1]);

        let prediction = network.train_prediction(&[0.5, 0.5], &[1.0]);

        assert_eq!(prediction.len(), 1);
        assert!(prediction[0] > 0.0 && prediction[0] < 1.0);

        Ok(())
    }

    #[test]
    /// Worst epoch loss goes down on a small separable dataset.
    fn test_train_epochs_convergence() -> anyhow::Result<()> {
        let config = NetworkConfig::default()
            .with_dimensions([2, 4, 2])
            .with_activation(Activation::Sigmoid)
            .with_learning_rate(0.5)
            .with_seed(42);

        let mut network = Network64::from_config(&config)?;

        let dataset = [
            (vec![0.0, 0.0], vec![1.0, 0.0]),
            (vec![0.0, 1.0], vec![1.0, 0.0]),
            (vec![1.0, 0.0], vec![0.0, 1.0]),
            (vec![1.0, 1.0], vec![0.0, 1.0])
        ];

        let losses = network.train_epochs(dataset.as_slice(), 2000, 0.05);

        assert!(!losses.is_empty());

        let window = (losses.len() / 4).max(1);

        let head = losses[..window].iter().sum::<f64>() / window as f64;
        let tail = losses[losses.len() - window..].iter().sum::<f64>() / window as f64;

        assert!(tail < head, "loss didn't decrease: {head} -> {tail}");

        Ok(())
    }

    #[test]
    fn test_train_epochs_threshold() {
        let mut network = network();

        let dataset = [(vec![1.0, 0.0], vec![0.0, 1.0])];

        // Any loss is below infinite threshold so only one epoch is performed.
        assert_eq!(network.train_epochs(dataset.as_slice(), 10, f64::INFINITY).len(), 1);

        // Loss is never negative so all the epochs are performed.
        assert_eq!(network.train_epochs(dataset.as_slice(), 10, 0.0).len(), 10);
    }
}
