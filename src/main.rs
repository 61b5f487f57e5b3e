//! Binary entry point for cardbox.
//!
//! This binary provides the CLI interface for the cardbox flashcard store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr/print_stdout in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use std::process::ExitCode;

use cardbox::cli::{self, App, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = cli::resolve_config(cli.config.as_ref(), cli.data_dir.clone());
    let app = match App::open(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            return ExitCode::FAILURE;
        },
    };

    match cli::run(&app, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Initializes stderr logging; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
