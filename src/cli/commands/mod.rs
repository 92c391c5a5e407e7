//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `info`: read one song file and print what was found
//! - `encodings`: list the encodings `#ENCODING` accepts

mod encodings;
mod info;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{self, Config, OutputFormat};

pub use encodings::cmd_encodings;
pub use info::{InfoOptions, cmd_info};

/// Inspect UltraStar song files
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: usdx-reader/config.toml in the user config directory)
    #[arg(long, global = true, env = "USDX_READER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Read a song file and print its header, warnings and errors
    Info {
        /// Path to the song file
        path: PathBuf,
        /// Directory name to record (default: the file's parent directory)
        #[arg(long)]
        dir: Option<String>,
        /// Source file name to record (default: the file name)
        #[arg(long)]
        source: Option<String>,
        /// Encoding to start with (overrides the config)
        #[arg(short, long)]
        encoding: Option<String>,
        /// Output format (overrides the config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Also print the notes body
        #[arg(long)]
        notes: bool,
    },
    /// List the supported encoding names
    Encodings,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Info {
            path,
            dir,
            source,
            encoding,
            format,
            notes,
        } => {
            let options = InfoOptions {
                dir: dir.clone(),
                source: source.clone(),
                encoding: encoding.clone(),
                format: format.unwrap_or(config.output.format),
                show_notes: *notes || config.output.show_notes,
            };
            cmd_info(&config, path, &options)
        }
        Commands::Encodings => cmd_encodings(&config),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => config::load().context("Failed to load config"),
    }
}
