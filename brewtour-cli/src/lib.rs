//! Command-line interface for planning brewery tours.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod error;
mod import;
mod plan;
mod present;

pub use error::CliError;

use import::{ImportArgs, run_import};
use plan::{PlanArgs, run_plan};

const ARG_DATA_DIR: &str = "data-dir";
const ARG_DATABASE: &str = "database";
const ARG_LAT: &str = "lat";
const ARG_LONG: &str = "long";
const ARG_FUEL: &str = "fuel";
const ENV_PLAN_LAT: &str = "BREWTOUR_CMDS_PLAN_LAT";
const ENV_PLAN_LONG: &str = "BREWTOUR_CMDS_PLAN_LONG";
const ENV_PLAN_FUEL: &str = "BREWTOUR_CMDS_PLAN_FUEL";

const DEFAULT_DATA_DIR: &str = "breweries";
const DEFAULT_DATABASE: &str = "breweries.db";

/// Run the Brewtour CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration, import or
/// planning fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Import(args) => run_import(args),
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "brewtour",
    about = "Plan a round trip collecting beer types from nearby breweries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the brewery CSV dataset into the SQLite database.
    Import(ImportArgs),
    /// Plan a tour from a starting point within a fuel budget.
    Plan(PlanArgs),
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match brewtour_data::fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
