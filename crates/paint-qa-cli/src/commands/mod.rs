//! CLI command definitions and handlers.

pub mod analyze;
pub mod enhance;
pub mod names;

use clap::{Parser, Subcommand};

/// Paint QA - distortion metrics for paint inspection photographs
#[derive(Parser)]
#[command(name = "paint-qa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared analyze arguments, used when no subcommand is given.
    #[command(flatten)]
    pub analyze: analyze::AnalyzeArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Compute distortion metrics for images
    Analyze(analyze::AnalyzeArgs),
    /// Analyze one image, plan and apply enhancements, write the result
    Enhance(enhance::EnhanceArgs),
    /// Print the metric names in vector order
    Names,
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every image was analyzed.
    Success = 0,
    /// At least one image was skipped.
    Skipped = 1,
    /// Fatal error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
