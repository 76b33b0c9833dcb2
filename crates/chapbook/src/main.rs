//! Chapbook CLI - Tutorial chapter compiler.
//!
//! Provides commands for:
//! - `convert`: Compile Markdown chapters into component modules
//! - `migrate`: Recover a Markdown draft from a generated module

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, MigrateArgs};
use output::Output;

/// Chapbook - Tutorial chapter compiler.
#[derive(Parser)]
#[command(name = "chapbook", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every chapter in the content directory.
    Convert(ConvertArgs),
    /// Recover a Markdown draft from a generated chapter module.
    Migrate(MigrateArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Convert(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(&output),
        Commands::Migrate(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
