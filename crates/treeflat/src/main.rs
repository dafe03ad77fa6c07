//! treeflat - flatten hierarchical report tables
//!
//! Usage:
//!     treeflat flatten report.json --module Actions --method getPageUrls
//!     treeflat flatten report.json --subtable-dir ./subtables \
//!         --include-aggregate-rows --format table

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use treeflat_logging::{init_logging, LogConfig};

#[derive(Parser, Debug)]
#[command(
    name = "treeflat",
    version,
    about = "Flatten hierarchical report tables into path-labelled rows"
)]
struct Cli {
    /// Debug logging for treeflat crates
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Append logs to this file as well as stderr
    #[arg(long, global = true, env = "TREEFLAT_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Flatten a report read from a JSON file
    Flatten(cli::flatten::FlattenArgs),
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_logging(LogConfig {
        app_name: "treeflat",
        verbose: args.verbose,
        log_file: args.log_file.clone(),
    })?;

    match args.command {
        Commands::Flatten(flatten_args) => cli::flatten::run(flatten_args),
    }
}
