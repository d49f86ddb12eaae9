use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use colorful::Colorful;

use perceptlib::prelude::*;

use super::args::*;

#[derive(Args)]
pub struct TrainCli {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub network: NetworkArgs,

    #[arg(long, short, default_value_t = 100)]
    /// Amount of training epochs.
    pub epochs: usize,

    #[arg(long, requires = "test_input")]
    /// Save predictions for the testing inputs to this file.
    pub predictions: Option<PathBuf>,

    #[arg(long, short)]
    /// Save weights and biases of the trained network to this JSON file.
    pub weights: Option<PathBuf>
}

impl TrainCli {
    pub fn execute(self) -> anyhow::Result<()> {
        let dataset = self.dataset.load_all()?;

        let mut config = self.network.config()?;

        fit_dimensions(&mut config, dataset.input_width(), dataset.output_width());

        let has_tests = dataset.has_tests();

        let mut module = Module64::new();

        module.build(&config)?;

        module.set_train_input(dataset.train_input)?;
        module.set_train_output(dataset.train_output)?;
        module.set_test_input(dataset.test_input)?;
        module.set_test_output(dataset.test_output)?;

        let network = module.network()
            .context("network is not built")?;

        println!("{}", describe_network(network, &config).green());

        println!("⏳ Training for {} epochs...", self.epochs);

        for epoch in 1..=self.epochs {
            let train_loss = module.train()?;

            log::trace!("Epoch {epoch} finished");

            if has_tests {
                let test_loss = module.test()?;

                println!(
                    "Epoch {}: train loss {}, test loss {}",
                    epoch.to_string().yellow(),
                    format!("{train_loss:.8}").blue(),
                    format!("{test_loss:.8}").blue()
                );
            } else {
                println!(
                    "Epoch {}: train loss {}",
                    epoch.to_string().yellow(),
                    format!("{train_loss:.8}").blue()
                );
            }
        }

        println!("{}", "✅ Training finished".green());

        if let Some(path) = self.predictions {
            let predictions = module.predict()?;

            std::fs::write(&path, format_table(&predictions))
                .with_context(|| format!("failed to write predictions to {path:?}"))?;

            println!("{}", format!("✅ Predictions saved to {path:?}").green());
        }

        if let Some(path) = self.weights {
            let network = module.network()
                .context("network is not built")?;

            WeightsExport::new(network).save(&path)?;
        }

        Ok(())
    }
}

/// Banner line for the freshly built network.
///
/// Networks without hidden layers have no activation to mention.
fn describe_network(network: &Network64, config: &NetworkConfig) -> String {
    let dimensions = network.dimensions();

    if dimensions.len() > 2 {
        format!(
            "🚀 Network {dimensions:?} built, {} params, {} activation, {} loss",
            network.params(),
            config.hidden_activation(0),
            network.loss()
        )
    } else {
        format!(
            "🚀 Network {dimensions:?} built, {} params, {} loss",
            network.params(),
            network.loss()
        )
    }
}

#[test]
fn test_describe_network() -> anyhow::Result<()> {
    let config = NetworkConfig::default()
        .with_dimensions([2, 3, 1])
        .with_activation(Activation::Relu)
        .with_seed(1);

    let banner = describe_network(&Network64::from_config(&config)?, &config);

    assert!(banner.contains("relu activation"));

    let config = config.with_dimensions([2, 1]);

    let banner = describe_network(&Network64::from_config(&config)?, &config);

    assert!(!banner.contains("activation"));
    assert!(banner.contains("[2, 1]"));

    Ok(())
}
