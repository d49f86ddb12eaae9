use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use colorful::Colorful;

use perceptlib::prelude::*;

#[derive(Args)]
pub struct NetworkArgs {
    #[arg(long, short)]
    /// Path to the JSON network config.
    ///
    /// Other network flags override values from this file.
    pub config: Option<PathBuf>,

    #[arg(long, short, value_delimiter = ',')]
    /// Input width, hidden layers widths and output width.
    ///
    /// Input and output widths are taken from the datasets
    /// if they don't match.
    pub dimensions: Option<Vec<usize>>,

    #[arg(long, short, value_delimiter = ',')]
    /// Activation function of the hidden layers.
    ///
    /// Either one for all the layers or one per layer.
    pub activation: Vec<Activation>,

    #[arg(long)]
    /// Loss function used to score predictions.
    pub loss: Option<Loss>,

    #[arg(long)]
    pub learning_rate: Option<f64>,

    #[arg(long)]
    /// Seed of the weights initializer.
    pub seed: Option<u64>
}

impl NetworkArgs {
    /// Read network config and apply flags on top of it.
    pub fn config(&self) -> anyhow::Result<NetworkConfig> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => NetworkConfig::default()
        };

        if let Some(dimensions) = &self.dimensions {
            config.dimensions.clone_from(dimensions);
        }

        if !self.activation.is_empty() {
            config.activations.clone_from(&self.activation);
        }

        if let Some(loss) = self.loss {
            config.loss = loss;
        }

        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        log::debug!("Network config: {config:?}");

        Ok(config)
    }
}

fn read_config(path: &Path) -> anyhow::Result<NetworkConfig> {
    log::trace!("Reading network config from {path:?}");

    let config = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {path:?}"))?;

    serde_json::from_str(&config)
        .with_context(|| format!("failed to parse config file {path:?}"))
}

/// Make input and output dimensions match the datasets widths.
pub fn fit_dimensions(config: &mut NetworkConfig, inputs: usize, outputs: usize) {
    let dimensions = &mut config.dimensions;

    if let Some(first) = dimensions.first_mut() {
        if *first != inputs {
            println!("{} input width changed from {first} to {inputs}", "📖 Note:".blue());

            *first = inputs;
        }
    }

    if let Some(last) = dimensions.last_mut() {
        if *last != outputs {
            println!("{} output width changed from {last} to {outputs}", "📖 Note:".blue());

            *last = outputs;
        }
    }

    log::debug!("Network dimensions fitted to datasets: {dimensions:?}");
}

#[derive(Args)]
pub struct DatasetArgs {
    #[arg(long)]
    /// Path to the training inputs table.
    pub train_input: PathBuf,

    #[arg(long)]
    /// Path to the training outputs table.
    pub train_output: PathBuf,

    #[arg(long, requires = "test_output")]
    /// Path to the testing inputs table.
    pub test_input: Option<PathBuf>,

    #[arg(long, requires = "test_input")]
    /// Path to the testing outputs table.
    pub test_output: Option<PathBuf>
}

pub struct Dataset {
    pub train_input: Vec<Vec<f64>>,
    pub train_output: Vec<Vec<f64>>,

    pub test_input: Vec<Vec<f64>>,
    pub test_output: Vec<Vec<f64>>
}

impl Dataset {
    #[inline]
    pub fn has_tests(&self) -> bool {
        !self.test_input.is_empty()
    }

    #[inline]
    pub fn input_width(&self) -> usize {
        self.train_input.first().map(Vec::len).unwrap_or_default()
    }

    #[inline]
    pub fn output_width(&self) -> usize {
        self.train_output.first().map(Vec::len).unwrap_or_default()
    }
}

impl DatasetArgs {
    fn load(path: &Path) -> anyhow::Result<Vec<Vec<f64>>> {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        println!("⏳ Reading table {path:?}...");

        let table = load_table(&path)?;

        if table.is_empty() {
            log::warn!("Table {path:?} has no rows");
        }

        Ok(table)
    }

    pub fn load_all(&self) -> anyhow::Result<Dataset> {
        let train_input = Self::load(&self.train_input)?;
        let train_output = Self::load(&self.train_output)?;

        anyhow::ensure!(!train_input.is_empty(), "training inputs table is empty");

        anyhow::ensure!(
            train_input.len() == train_output.len(),
            "training inputs have {} rows but outputs have {}",
            train_input.len(),
            train_output.len()
        );

        let (test_input, test_output) = match (&self.test_input, &self.test_output) {
            (Some(input), Some(output)) => (Self::load(input)?, Self::load(output)?),
            _ => (Vec::new(), Vec::new())
        };

        Ok(Dataset {
            train_input,
            train_output,
            test_input,
            test_output
        })
    }
}

#[derive(serde::Serialize)]
/// Exported network parameters.
pub struct WeightsExport {
    pub dimensions: Vec<usize>,
    pub weights: Vec<Vec<Vec<f64>>>,
    pub biases: Vec<Vec<f64>>
}

impl WeightsExport {
    #[inline]
    pub fn new(network: &Network64) -> Self {
        Self {
            dimensions: network.dimensions(),
            weights: network.weights(),
            biases: network.biases()
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("failed to serialize weights")?;

        std::fs::write(path, json)
            .with_context(|| format!("failed to write weights to {path:?}"))?;

        println!("{}", format!("✅ Weights saved to {path:?}").green());

        Ok(())
    }
}
