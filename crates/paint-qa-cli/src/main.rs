//! Paint QA CLI - distortion metrics for paint inspection photographs.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{analyze::AnalyzeArgs, enhance::EnhanceArgs, Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = match cli.command {
        Some(Commands::Analyze(args)) => analyze(args),
        Some(Commands::Enhance(args)) => {
            let args = EnhanceArgs::with_config(args, &AppConfig::load());
            report(commands::enhance::run(&args).map(|()| ExitCode::Success))
        }
        Some(Commands::Names) => report(commands::names::run().map(|()| ExitCode::Success)),
        None => {
            // Default behavior: analyze with flattened args
            if cli.analyze.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            analyze(cli.analyze)
        }
    };

    exit_code.into()
}

fn analyze(args: AnalyzeArgs) -> ExitCode {
    let args = AnalyzeArgs::with_config(args, &AppConfig::load());
    report(commands::analyze::run(&args).map(|outcome| {
        debug!(
            "{} processed, {} skipped",
            outcome.processed, outcome.skipped
        );
        outcome.exit_code
    }))
}

fn report(result: anyhow::Result<ExitCode>) -> ExitCode {
    result.unwrap_or_else(|e| {
        eprintln!("error: {e:#}");
        ExitCode::Error
    })
}
