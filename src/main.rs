mod commands;
mod config;
mod diagnostics;
mod document;
mod error;
mod fingerprint;
mod generator;
mod grammar;
mod parser;
mod patch;
mod scanner;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::CliOptions;

#[derive(Parser)]
#[command(name = "autodocs", about = "Keep @autodocs comments in sync with the code they describe")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file
    #[arg(long, global = true, default_value = ".autodocs.toml")]
    config: PathBuf,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Do not use a config file
    #[arg(long, global = true)]
    no_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check if all the docs are up to date
    Check,
    /// Generate docs for every stale comment and write them back
    Generate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let opts = CliOptions {
        config_path: cli.config,
        debug: cli.debug,
        no_config: cli.no_config,
    };

    let result = match cli.command {
        Commands::Check => commands::check(&opts),
        Commands::Generate => commands::generate(&opts),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}
