//! Structured logging setup for the binary
//!
//! Logs go to stderr so that stdout carries only results.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Configuration for log output
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Raise the default filter to debug
    pub verbose: bool,
    pub format: LogFormat,
}

impl TracingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> &'static str {
        if self.verbose {
            "nugget_cli=debug,nugget_core=debug"
        } else {
            "nugget_cli=info,nugget_core=info"
        }
    }
}

/// Initialize the global subscriber. `RUST_LOG` takes precedence over the default filter.
pub fn init_tracing(config: &TracingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
