//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Session meter for Claude Code status lines.
///
/// Reads a session transcript and reports how the session is going: idle
/// time, pace, turn alternation, current mode of work and file focus.
#[derive(Debug, Parser)]
#[command(name = "meter", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute session metrics from a transcript.
    Transcript {
        /// Path to the transcript JSONL file.
        path: Option<PathBuf>,

        /// JSON object overriding configuration values
        /// (e.g. '{"stride_window": 10}').
        overrides: Option<String>,

        /// Print metrics as JSON instead of shell assignments.
        #[arg(long)]
        json: bool,
    },

    /// Extract token counts from the last /context report in a transcript.
    Context {
        /// Path to the transcript JSONL file.
        path: Option<PathBuf>,
    },
}
