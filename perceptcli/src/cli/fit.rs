use std::path::PathBuf;

use clap::Args;
use colorful::Colorful;

use perceptlib::prelude::*;

use super::args::*;

#[derive(Args)]
pub struct FitCli {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub network: NetworkArgs,

    #[arg(long, default_value_t = 1000)]
    /// Maximal amount of training epochs.
    pub epochs_limit: usize,

    #[arg(long, default_value_t = 0.01)]
    /// Stop training when the worst sample loss of an epoch goes below this value.
    pub error_threshold: f64,

    #[arg(long, short)]
    /// Save weights and biases of the trained network to this JSON file.
    pub weights: Option<PathBuf>
}

impl FitCli {
    pub fn execute(self) -> anyhow::Result<()> {
        let dataset = self.dataset.load_all()?;

        if dataset.has_tests() {
            println!("{} testing tables are not used by {}", "📖 Note:".blue(), "`fit`".yellow());
        }

        let mut config = self.network.config()?;

        fit_dimensions(&mut config, dataset.input_width(), dataset.output_width());

        let inputs = Normalization::fit(&dataset.train_input)?;
        let outputs = Normalization::fit(&dataset.train_output)?;

        let samples = inputs.normalized().iter()
            .cloned()
            .zip(outputs.normalized().iter().cloned())
            .collect::<Vec<_>>();

        let mut network = Network64::from_config(&config)?;

        println!("{}", format!("🚀 Network {:?} built, {} params", network.dimensions(), network.params()).green());

        println!(
            "⏳ Training for at most {} epochs until worst loss is below {}...",
            self.epochs_limit,
            self.error_threshold
        );

        let losses = network.train_epochs(samples.as_slice(), self.epochs_limit, self.error_threshold);

        for (i, loss) in losses.iter().enumerate() {
            println!("Epoch {}: worst loss {}", (i + 1).to_string().yellow(), format!("{loss:.8}").blue());
        }

        match losses.last() {
            Some(loss) if *loss < self.error_threshold => {
                println!("{}", format!("✅ Converged after {} epochs", losses.len()).green());
            }

            _ => println!("{}", format!("🧯 Epochs limit reached, worst loss is above {}", self.error_threshold).red())
        }

        if let Some(path) = self.weights {
            WeightsExport::new(&network).save(&path)?;
        }

        Ok(())
    }
}
