//! Error types emitted by the Brewtour CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use brewtour_core::{PlanError, SqliteCandidateStoreError};
use brewtour_data::ImportError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the Brewtour CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A numeric option is outside its accepted range.
    #[error("invalid {field} {value} (set --{field} or {env}): {reason}")]
    InvalidArgument {
        field: &'static str,
        env: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Importing the CSV dataset failed.
    #[error("failed to import breweries: {0}")]
    Import(#[from] ImportError),
    /// Opening the brewery database failed.
    #[error(transparent)]
    OpenStore(#[from] SqliteCandidateStoreError),
    /// The planner could not build a tour.
    #[error("planning failed: {source}")]
    Plan { source: PlanError },
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
