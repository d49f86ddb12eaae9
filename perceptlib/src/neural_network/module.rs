use anyhow::Context;

use super::prelude::*;

/// Generic `Module` type with f32 float type.
pub type Module32 = Module<f32>;

/// Generic `Module` type with f64 float type.
pub type Module64 = Module<f64>;

#[derive(Debug, Clone, PartialEq)]
/// Network training orchestrator.
///
/// Keeps the network together with training and testing
/// datasets. Training tables are normalized on assignment,
/// testing tables are stored raw and normalized using training
/// bounds every time they're used, so the network always sees
/// values scaled the same way it was trained on.
///
/// ```
/// use perceptlib::prelude::*;
///
/// let mut module = Module64::new();
///
/// module.build(&NetworkConfig::default().with_dimensions([2, 3, 2]).with_seed(1)).unwrap();
///
/// module.set_train_input(vec![vec![0.0, 10.0], vec![1.0, 20.0]]).unwrap();
/// module.set_train_output(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
///
/// let losses = module.train_for(10).unwrap();
///
/// assert_eq!(losses.len(), 10);
/// ```
pub struct Module<F: Float> {
    network: Option<Network<F>>,

    train_input: Normalization<F>,
    train_output: Normalization<F>,

    test_input: Vec<Vec<F>>,
    test_output: Vec<Vec<F>>
}

impl<F: Float> Default for Module<F> {
    #[inline]
    fn default() -> Self {
        Self {
            network: None,
            train_input: Normalization::default(),
            train_output: Normalization::default(),
            test_input: Vec::new(),
            test_output: Vec::new()
        }
    }
}

/// Check that dataset tables are usable by the network.
fn check_dataset<F: Float>(
    network: &Network<F>,
    name: &str,
    inputs: &[Vec<F>],
    outputs: &[Vec<F>]
) -> anyhow::Result<()> {
    anyhow::ensure!(!inputs.is_empty(), "{name} dataset is empty");

    anyhow::ensure!(
        inputs.len() == outputs.len(),
        "{name} dataset has {} input rows but {} output rows",
        inputs.len(),
        outputs.len()
    );

    check_width(network, name, inputs, outputs)
}

fn check_width<F: Float>(
    network: &Network<F>,
    name: &str,
    inputs: &[Vec<F>],
    outputs: &[Vec<F>]
) -> anyhow::Result<()> {
    if let Some(row) = inputs.first() {
        anyhow::ensure!(
            row.len() == network.input_size(),
            "{name} inputs have {} columns but network expects {}",
            row.len(),
            network.input_size()
        );
    }

    if let Some(row) = outputs.first() {
        anyhow::ensure!(
            row.len() == network.output_size(),
            "{name} outputs have {} columns but network has {} outputs",
            row.len(),
            network.output_size()
        );
    }

    Ok(())
}

/// Sum values and divide them by their amount.
fn mean<F: Float>(values: impl IntoIterator<Item = F>) -> F {
    let mut sum = F::ZERO;
    let mut len = 0;

    for value in values {
        sum += value;
        len += 1;
    }

    if len == 0 {
        return F::ZERO;
    }

    sum / F::from_usize(len)
}

impl<F: Float> Module<F> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_network(network: Network<F>) -> Self {
        Self {
            network: Some(network),
            ..Self::default()
        }
    }

    #[inline]
    /// Replace current network with a new one.
    pub fn set_network(&mut self, network: Network<F>) {
        self.network = Some(network);
    }

    /// Build new network from the config and replace
    /// the current one with it.
    pub fn build(&mut self, config: &NetworkConfig) -> anyhow::Result<()> {
        let network = Network::from_config(config)
            .context("failed to build network")?;

        self.set_network(network);

        Ok(())
    }

    #[inline]
    pub fn network(&self) -> Option<&Network<F>> {
        self.network.as_ref()
    }

    #[inline]
    pub fn network_mut(&mut self) -> Option<&mut Network<F>> {
        self.network.as_mut()
    }

    #[inline]
    fn require_network(&self) -> anyhow::Result<&Network<F>> {
        self.network.as_ref().context("network is not built")
    }

    #[inline]
    /// Weights of the network per layer per neuron.
    pub fn weights(&self) -> anyhow::Result<Vec<Vec<Vec<F>>>> {
        Ok(self.require_network()?.weights())
    }

    #[inline]
    /// Biases of the network per layer.
    pub fn biases(&self) -> anyhow::Result<Vec<Vec<F>>> {
        Ok(self.require_network()?.biases())
    }

    #[inline]
    pub fn learning_rate(&self) -> anyhow::Result<F> {
        Ok(self.require_network()?.learning_rate())
    }

    pub fn set_learning_rate(&mut self, learning_rate: F) -> anyhow::Result<()> {
        self.network.as_mut()
            .context("network is not built")?
            .set_learning_rate(learning_rate);

        Ok(())
    }

    #[inline]
    pub fn set_train_input(&mut self, data: Vec<Vec<F>>) -> anyhow::Result<()> {
        self.train_input = Normalization::fit(&data)
            .context("invalid training inputs")?;

        Ok(())
    }

    #[inline]
    pub fn set_train_output(&mut self, data: Vec<Vec<F>>) -> anyhow::Result<()> {
        self.train_output = Normalization::fit(&data)
            .context("invalid training outputs")?;

        Ok(())
    }

    #[inline]
    pub fn set_test_input(&mut self, data: Vec<Vec<F>>) -> anyhow::Result<()> {
        table_width(&data).context("invalid testing inputs")?;

        self.test_input = data;

        Ok(())
    }

    #[inline]
    pub fn set_test_output(&mut self, data: Vec<Vec<F>>) -> anyhow::Result<()> {
        table_width(&data).context("invalid testing outputs")?;

        self.test_output = data;

        Ok(())
    }

    #[inline]
    /// Training inputs in their original scale.
    pub fn train_input(&self) -> Vec<Vec<F>> {
        self.train_input.original()
    }

    #[inline]
    /// Training outputs in their original scale.
    pub fn train_output(&self) -> Vec<Vec<F>> {
        self.train_output.original()
    }

    #[inline]
    pub fn test_input(&self) -> &[Vec<F>] {
        &self.test_input
    }

    #[inline]
    pub fn test_output(&self) -> &[Vec<F>] {
        &self.test_output
    }

    /// Train the network on every sample of the training dataset once.
    ///
    /// Return mean loss of the epoch.
    pub fn train(&mut self) -> anyhow::Result<F> {
        let inputs = self.train_input.normalized();
        let outputs = self.train_output.normalized();

        let network = self.network.as_mut()
            .context("network is not built")?;

        check_dataset(network, "training", inputs, outputs)?;

        let losses = inputs.iter()
            .zip(outputs)
            .map(|(input, output)| network.train(input, output))
            .collect::<Vec<F>>();

        Ok(mean(losses))
    }

    /// Calculate mean loss of the network on the testing dataset.
    ///
    /// Doesn't change the network.
    pub fn test(&self) -> anyhow::Result<F> {
        let network = self.require_network()?;

        check_dataset(network, "testing", &self.test_input, &self.test_output)?;

        let inputs = self.train_input.normalize(&self.test_input)
            .context("failed to normalize testing inputs")?;

        let outputs = self.train_output.normalize(&self.test_output)
            .context("failed to normalize testing outputs")?;

        let losses = inputs.iter()
            .zip(&outputs)
            .map(|(input, output)| network.test(input, output));

        Ok(mean(losses))
    }

    /// Run given amount of training epochs and return their mean losses.
    pub fn train_for(&mut self, epochs: usize) -> anyhow::Result<Vec<F>> {
        let mut losses = Vec::with_capacity(epochs);

        for epoch in 1..=epochs {
            let loss = self.train()?;

            log::debug!("Epoch {epoch}: train loss {loss}");

            losses.push(loss);
        }

        Ok(losses)
    }

    /// Run testing given amount of times.
    ///
    /// Network doesn't change between runs so all
    /// the returned losses are equal.
    pub fn test_for(&self, epochs: usize) -> anyhow::Result<Vec<F>> {
        (0..epochs)
            .map(|_| self.test())
            .collect()
    }

    /// Run given amount of epochs, each is a training followed by a testing.
    ///
    /// Return `(train_loss, test_loss)` pair for each epoch.
    pub fn train_and_test(&mut self, epochs: usize) -> anyhow::Result<Vec<(F, F)>> {
        let mut losses = Vec::with_capacity(epochs);

        for epoch in 1..=epochs {
            let train_loss = self.train()?;
            let test_loss = self.test()?;

            log::debug!("Epoch {epoch}: train loss {train_loss}, test loss {test_loss}");

            losses.push((train_loss, test_loss));
        }

        Ok(losses)
    }

    #[inline]
    /// Predict outputs for the testing inputs.
    pub fn predict(&self) -> anyhow::Result<Vec<Vec<F>>> {
        self.predict_data(&self.test_input)
    }

    /// Predict outputs for given inputs.
    ///
    /// Inputs are normalized using training inputs bounds,
    /// and predictions are denormalized using training outputs bounds.
    pub fn predict_data(&self, data: &[Vec<F>]) -> anyhow::Result<Vec<Vec<F>>> {
        let network = self.require_network()?;

        anyhow::ensure!(!self.train_input.is_empty(), "training inputs are not set");
        anyhow::ensure!(!self.train_output.is_empty(), "training outputs are not set");

        check_width(network, "prediction", data, &[])?;

        let inputs = self.train_input.normalize(data)
            .context("failed to normalize prediction inputs")?;

        let predictions = inputs.iter()
            .map(|input| network.predict(input))
            .collect::<Vec<_>>();

        self.train_output.denormalize(&predictions)
            .context("failed to denormalize predictions")
    }
}
