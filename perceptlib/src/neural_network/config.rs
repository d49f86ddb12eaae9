use super::prelude::*;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
/// Structural description of a network.
///
/// ```
/// use perceptlib::prelude::*;
///
/// let config = NetworkConfig::default()
///     .with_dimensions([2, 8, 1])
///     .with_activation(Activation::Sigmoid)
///     .with_learning_rate(0.1)
///     .with_seed(42);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.hidden_activation(0), Activation::Sigmoid);
/// ```
pub struct NetworkConfig {
    /// Input width, hidden layers widths and output width.
    pub dimensions: Vec<usize>,

    /// Activation function of each hidden layer.
    /// Single entry is applied to all of them.
    pub activations: Vec<Activation>,

    pub loss: Loss,

    pub learning_rate: f64,

    /// Divisor of the initial weights range.
    pub range_factor: f64,

    /// Seed of the weights initializer. Random if not set.
    pub seed: Option<u64>
}

impl Default for NetworkConfig {
    #[inline]
    fn default() -> Self {
        Self {
            dimensions: vec![4, 3, 4],
            activations: vec![Activation::default()],
            loss: Loss::default(),
            learning_rate: 0.01,
            range_factor: DEFAULT_RANGE_FACTOR,
            seed: None
        }
    }
}

impl NetworkConfig {
    #[inline]
    pub fn with_dimensions(mut self, dimensions: impl Into<Vec<usize>>) -> Self {
        self.dimensions = dimensions.into();

        self
    }

    #[inline]
    /// Use the same activation function for all the hidden layers.
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activations = vec![activation];

        self
    }

    #[inline]
    pub fn with_activations(mut self, activations: impl Into<Vec<Activation>>) -> Self {
        self.activations = activations.into();

        self
    }

    #[inline]
    pub fn with_loss(mut self, loss: Loss) -> Self {
        self.loss = loss;

        self
    }

    #[inline]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;

        self
    }

    #[inline]
    pub fn with_range_factor(mut self, range_factor: f64) -> Self {
        self.range_factor = range_factor;

        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);

        self
    }

    #[inline]
    /// Amount of hidden layers described by the config.
    pub fn hidden_layers(&self) -> usize {
        self.dimensions.len().saturating_sub(2)
    }

    /// Activation function of the hidden layer with given index.
    pub fn hidden_activation(&self, index: usize) -> Activation {
        match self.activations.as_slice() {
            [activation] => *activation,

            activations => activations.get(index)
                .copied()
                .unwrap_or_default()
        }
    }

    #[inline]
    /// Create weights initializer from the config's seed.
    pub fn initializer(&self) -> Initializer {
        match self.seed {
            Some(seed) => Initializer::with_seed(seed),
            None => Initializer::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.dimensions.len() >= 2,
            "network needs at least input and output dimensions, got {:?}",
            self.dimensions
        );

        if let Some(i) = self.dimensions.iter().position(|dimension| *dimension == 0) {
            anyhow::bail!("dimension {i} must be positive, got {:?}", self.dimensions);
        }

        anyhow::ensure!(
            self.range_factor.is_finite() && self.range_factor > 0.0,
            "range factor must be positive, got {}",
            self.range_factor
        );

        anyhow::ensure!(
            self.learning_rate.is_finite() && self.learning_rate >= 0.0,
            "learning rate must be a non-negative number, got {}",
            self.learning_rate
        );

        let hidden = self.hidden_layers();

        anyhow::ensure!(
            self.activations.len() == 1 || self.activations.len() == hidden,
            "expected 1 or {hidden} activation functions, got {}",
            self.activations.len()
        );

        Ok(())
    }
}

#[test]
fn test_default_config() {
    let config = NetworkConfig::default();

    assert_eq!(config.dimensions, [4, 3, 4]);
    assert_eq!(config.hidden_layers(), 1);
    assert_eq!(config.hidden_activation(0), Activation::Tanh);
    assert_eq!(config.loss, Loss::Sse);
    assert_eq!(config.learning_rate, 0.01);

    assert!(config.validate().is_ok());
}

#[test]
/// Invalid dimensions, activations and factors are rejected.
fn test_config_validation() {
    let config = NetworkConfig::default();

    assert!(config.clone().with_dimensions([4]).validate().is_err());
    assert!(config.clone().with_dimensions([4, 0, 2]).validate().is_err());
    assert!(config.clone().with_range_factor(0.0).validate().is_err());
    assert!(config.clone().with_learning_rate(-0.1).validate().is_err());

    let config = config.with_dimensions([2, 3, 3, 1]);

    assert!(config.clone().with_activations([Activation::Relu, Activation::Sigmoid]).validate().is_ok());
    assert!(config.clone().with_activations([Activation::Relu; 3]).validate().is_err());

    // Zero hidden layers with a single activation is fine.
    assert!(config.with_dimensions([2, 1]).validate().is_ok());
}

#[test]
fn test_hidden_activations() {
    let config = NetworkConfig::default()
        .with_dimensions([2, 3, 3, 1])
        .with_activations([Activation::Relu, Activation::Sigmoid]);

    assert_eq!(config.hidden_activation(0), Activation::Relu);
    assert_eq!(config.hidden_activation(1), Activation::Sigmoid);
}

#[cfg(feature = "serde")]
#[test]
/// Missing fields fall back to defaults.
fn test_config_json() -> anyhow::Result<()> {
    let config: NetworkConfig = serde_json::from_str(r#"{
        "dimensions": [2, 5, 2],
        "activations": ["relu"],
        "loss": "mse",
        "seed": 7
    }"#)?;

    assert_eq!(config.dimensions, [2, 5, 2]);
    assert_eq!(config.hidden_activation(0), Activation::Relu);
    assert_eq!(config.loss, Loss::Mse);
    assert_eq!(config.learning_rate, 0.01);
    assert_eq!(config.seed, Some(7));

    let json = serde_json::to_string(&config)?;

    assert_eq!(serde_json::from_str::<NetworkConfig>(&json)?, config);

    Ok(())
}
