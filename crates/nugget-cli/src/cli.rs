//! Command-line interface for the nugget cover tool

use crate::batch::{discover, load_topic, run_batch};
use crate::config::{CoverConfig, OutputFormat};
use crate::output::{render_batch_json, render_batch_text, render_documents, render_explain};
use crate::tracing_setup::{LogFormat, TracingConfig};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Minimal document cover for nugget requirement sets
#[derive(Parser, Debug)]
#[command(name = "nugget-cover")]
#[command(about = "Select the fewest documents that substantiate every required nugget")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Configuration file (defaults to $NUGGET_COVER_CONFIG or nugget-cover.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a single topic file and print the selected documents
    Resolve {
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Fail if any supportable fact is left uncovered
        #[arg(long)]
        verify: bool,
    },

    /// Show requirements, OR choices and greedy steps for one topic file
    Explain { file: PathBuf },

    /// Resolve every configured language × topic file
    Batch(BatchArgs),

    /// Print the default configuration template
    Config,
}

#[derive(Args, Debug, Default)]
pub struct BatchArgs {
    /// Directory containing the nugget files
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Language code (repeatable)
    #[arg(long = "lang")]
    pub languages: Vec<String>,

    /// Topic id (repeatable)
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit with an error code if any topic is missing or fails
    #[arg(long)]
    pub strict: bool,

    /// Resolve topics one after another
    #[arg(long)]
    pub sequential: bool,

    /// Re-check coverage of every resolved topic
    #[arg(long)]
    pub verify: bool,
}

impl BatchArgs {
    /// Overlay flags onto the loaded configuration
    pub fn apply(&self, config: &mut CoverConfig) {
        if let Some(base_dir) = &self.base_dir {
            config.input.base_dir = base_dir.clone();
        }
        if !self.languages.is_empty() {
            config.input.languages = self.languages.clone();
        }
        if !self.topics.is_empty() {
            config.input.topics = self.topics.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        config.output.verify |= self.verify;
        config.execution.strict |= self.strict;
        if self.sequential {
            config.execution.parallel = false;
        }
    }
}

impl Cli {
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig { verbose: self.verbose, format: self.log_format }
    }

    /// Execute the selected command
    pub fn execute(&self) -> anyhow::Result<ExitCode> {
        match &self.command {
            Command::Resolve { file, format, verify } => self.resolve(file, *format, *verify),
            Command::Explain { file } => {
                let topic = load_topic(file).with_context(|| format!("resolving {}", file.display()))?;
                print!("{}", render_explain(&topic));
                Ok(ExitCode::SUCCESS)
            }
            Command::Batch(args) => self.batch(args),
            Command::Config => {
                print!("{}", CoverConfig::default().to_toml_string()?);
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    fn load_config(&self) -> anyhow::Result<CoverConfig> {
        CoverConfig::load(self.config.as_deref()).context("loading configuration")
    }

    fn resolve(&self, file: &Path, format: Option<OutputFormat>, verify: bool) -> anyhow::Result<ExitCode> {
        let config = self.load_config()?;
        let topic = load_topic(file).with_context(|| format!("resolving {}", file.display()))?;

        if (verify || config.output.verify) && !topic.resolution.covers_all() {
            error!(file = %file.display(), "Coverage verification failed");
            return Ok(ExitCode::FAILURE);
        }

        match format.unwrap_or(config.output.format) {
            OutputFormat::Text => print!("{}", render_documents(&topic)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&topic.documents())?),
        }
        Ok(ExitCode::SUCCESS)
    }

    fn batch(&self, args: &BatchArgs) -> anyhow::Result<ExitCode> {
        let mut config = self.load_config()?;
        args.apply(&mut config);
        config.validate().context("validating configuration")?;

        let sources = discover(&config.input);
        if sources.is_empty() {
            warn!(
                languages = config.input.languages.len(),
                topics = config.input.topics.len(),
                "No topics configured; nothing to do"
            );
        }

        let report = run_batch(sources, config.execution.parallel, config.output.verify);
        let rendered = match config.output.format {
            OutputFormat::Text => render_batch_text(&report),
            OutputFormat::Json => render_batch_json(&report)?,
        };

        match &args.output {
            Some(path) => {
                fs::write(path, &rendered).with_context(|| format!("writing {}", path.display()))?;
                info!("Results written to: {}", path.display());
            }
            None => print!("{rendered}"),
        }

        if config.execution.strict && report.has_problems() {
            error!(
                missing = report.missing(),
                failed = report.failed(),
                "Batch incomplete in strict mode"
            );
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }
}
