//! taxa CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Validation failure, missing files, or any other error
//! - 2: Invalid arguments (reported by clap)

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    // Initialize logging; RUST_LOG takes precedence over the flags.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taxa={},warn", level)));
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let workspace = cli.workspace();
    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(&workspace, args),
        Commands::Generate(args) => commands::generate::execute(&workspace, args),
        Commands::Dimensions(args) => commands::dimensions::execute(&workspace, args),
        Commands::Events(args) => commands::events::execute(&workspace, args),
        Commands::Properties(args) => commands::properties::execute(&workspace, args),
        Commands::Init(args) => commands::init::execute(&workspace, args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(ExitCodes::FAILURE)
        }
    }
}
