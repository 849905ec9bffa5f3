#![deny(warnings)]
//! Batch driver and command-line surface for Nugget Cover.
//!
//! The core crate never touches the filesystem; this crate discovers per-language,
//! per-topic nugget files, skips missing ones, resolves the rest (in parallel when enabled)
//! and renders the selected documents.

pub mod batch;
pub mod cli;
pub mod config;
pub mod output;
pub mod tracing_setup;

pub use batch::{BatchReport, TopicOutcome, TopicSource, TopicStatus, discover, load_topic, run_batch};
pub use cli::{BatchArgs, Cli, Command};
pub use config::{CoverConfig, OutputFormat};
pub use tracing_setup::{LogFormat, TracingConfig, init_tracing};
