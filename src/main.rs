//! usdx-reader - command-line inspection of UltraStar song files.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use usdx_reader::cli;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; keep stdout free for command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("usdx_reader=info".parse()?))
        .init();

    cli::run_command(&args)
}
