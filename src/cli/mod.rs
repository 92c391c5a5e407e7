//! Command-line interface for usdx-reader.
//!
//! Provides commands for inspecting song files from a shell.

mod commands;

pub use commands::{Cli, Commands, run_command};
