use clap::{Parser, Subcommand, ValueEnum};

pub mod args;
pub mod train;
pub mod fit;
pub mod config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace
}

impl LogLevel {
    #[inline]
    pub const fn filter(&self) -> &'static str {
        match self {
            Self::Off   => "off",
            Self::Error => "error",
            Self::Warn  => "warn",
            Self::Info  => "info",
            Self::Debug => "debug",
            Self::Trace => "trace"
        }
    }

    /// Initialize logger with current level unless
    /// `RUST_LOG` environment variable is set.
    pub fn init_logger(&self) {
        let env = env_logger::Env::default()
            .default_filter_or(self.filter());

        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .init();
    }
}

#[derive(Parser)]
#[command(name = "percept", version, about)]
pub struct CLI {
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    /// Verbosity of the library logs.
    ///
    /// Ignored if `RUST_LOG` environment variable is set.
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand)]
pub enum Command {
    /// Train network on numeric tables, one sample at a time.
    Train(train::TrainCli),

    /// Train network until the worst sample loss goes below a threshold.
    Fit(fit::FitCli),

    /// Manage network configs.
    Config(config::ConfigCli)
}

impl CLI {
    #[inline]
    pub fn execute(self) -> anyhow::Result<()> {
        self.log_level.init_logger();

        match self.command {
            Command::Train(command) => command.execute(),
            Command::Fit(command) => command.execute(),
            Command::Config(command) => command.execute()
        }
    }
}
