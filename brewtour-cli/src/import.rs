//! Import command implementation for the Brewtour CLI.

use std::io::Write;

use brewtour_data::{BEERS_FILE, BREWERIES_FILE, GEOCODES_FILE, ImportSummary, import_dataset};
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATA_DIR, ARG_DATABASE, CliError, DEFAULT_DATA_DIR, DEFAULT_DATABASE, require_existing,
};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Join breweries.csv, geocodes.csv and beers.csv from the \
                 data directory and upsert the result into the SQLite \
                 database read by `brewtour plan`.",
    about = "Import the brewery dataset"
)]
#[ortho_config(prefix = "BREWTOUR")]
pub(crate) struct ImportArgs {
    /// Directory holding the brewery CSV files.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Path of the SQLite database to create or update.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(ImportConfig::from(merged))
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) data_dir: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
}

impl ImportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        for file in [BREWERIES_FILE, GEOCODES_FILE, BEERS_FILE] {
            require_existing(&self.data_dir.join(file), ARG_DATA_DIR)?;
        }
        Ok(())
    }
}

impl From<ImportArgs> for ImportConfig {
    fn from(args: ImportArgs) -> Self {
        Self {
            data_dir: args
                .data_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR)),
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
        }
    }
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_with(args, &mut stdout)
}

pub(crate) fn run_import_with(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let summary = import_dataset(&config.data_dir, &config.database)?;
    write_summary(writer, &config, summary).map_err(CliError::WriteOutput)
}

fn write_summary(
    writer: &mut dyn Write,
    config: &ImportConfig,
    summary: ImportSummary,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "Imported {} breweries into {}",
        summary.imported, config.database
    )?;
    let skipped = summary.orphan_geocodes + summary.duplicate_geocodes;
    if skipped > 0 {
        writeln!(
            writer,
            "Skipped {skipped} geocodes ({} without a brewery, {} duplicates)",
            summary.orphan_geocodes, summary.duplicate_geocodes
        )?;
    }
    Ok(())
}
