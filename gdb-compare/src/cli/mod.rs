//! Command-line interface

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::compare::{handle_compare_command, CompareArgs};
use commands::inspect::{handle_inspect_command, InspectArgs};

#[derive(Parser, Debug)]
#[command(name = "gdb-compare")]
#[command(about = "Compare two GIS workspace schema XML exports and report the differences")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a base schema against a test schema
    Compare(CompareArgs),
    /// Parse one schema and list its entities
    Inspect(InspectArgs),
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Compare(args) => handle_compare_command(args),
        Commands::Inspect(args) => handle_inspect_command(args),
    }
}
