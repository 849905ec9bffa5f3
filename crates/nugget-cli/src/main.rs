use clap::Parser;
use nugget_cli::{Cli, init_tracing};
use std::process::ExitCode;
use tracing::info;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.tracing_config())?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting nugget cover");

    cli.execute()
}
