use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use colorful::Colorful;

use perceptlib::prelude::*;

use super::args::NetworkArgs;

#[derive(Args)]
pub struct ConfigCli {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[arg(long, short)]
    /// Path to the output file. Config is printed if not set.
    pub output: Option<PathBuf>
}

impl ConfigCli {
    pub fn execute(self) -> anyhow::Result<()> {
        let config = self.network.config()?;

        config.validate()?;

        let json = serde_json::to_string_pretty(&config)
            .context("failed to serialize config")?;

        match self.output {
            Some(path) => {
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write config to {path:?}"))?;

                let path = path.canonicalize().unwrap_or(path);

                println!("{}", format!("✅ Config saved to {path:?}").green());
                println!("{} pass it to {} using {} flag", "📖 Note:".blue(), "`train`".yellow(), "--config".yellow());
            }

            None => println!("{json}")
        }

        Ok(())
    }
}
