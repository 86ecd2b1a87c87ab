//! Import pipeline for the Brewtour brewery dataset.
//!
//! Responsibilities:
//! - Read the `breweries.csv`, `geocodes.csv` and `beers.csv` tables.
//! - Join them into [`Candidate`](brewtour_core::Candidate) values.
//! - Persist candidates to the SQLite database read by
//!   `brewtour_core::SqliteCandidateStore`.
//!
//! Boundaries:
//! - Do not encode planning rules (live in `brewtour-core`).
//!
//! Invariants:
//! - A failed import leaves an existing database unchanged.
//! - No global mutable state.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use log::info;
use thiserror::Error;

pub mod dataset;
pub mod fs;
pub mod join;
pub mod sqlite;

pub use dataset::{
    BEERS_FILE, BREWERIES_FILE, BeerRow, BreweryRow, Dataset, GEOCODES_FILE, GeocodeRow,
    ReadDatasetError, read_dataset,
};
pub use join::{ImportReport, join_dataset};
pub use sqlite::{PersistCandidatesError, persist_candidates_to_sqlite};

/// Outcome of [`import_dataset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Breweries written to the database.
    pub imported: usize,
    /// Geocodes skipped because their brewery was unknown.
    pub orphan_geocodes: usize,
    /// Geocodes skipped because their brewery was already placed.
    pub duplicate_geocodes: usize,
}

/// Errors returned by [`import_dataset`].
#[derive(Debug, Error)]
pub enum ImportError {
    /// The CSV dataset could not be read.
    #[error(transparent)]
    Read(#[from] ReadDatasetError),
    /// The joined breweries could not be written.
    #[error(transparent)]
    Persist(#[from] PersistCandidatesError),
}

/// Read the dataset in `data_dir`, join it, and write it to `database`.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use brewtour_data::import_dataset;
///
/// # fn main() -> Result<(), brewtour_data::ImportError> {
/// let summary = import_dataset(Utf8Path::new("breweries"), Utf8Path::new("breweries.db"))?;
/// assert!(summary.imported > 0);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`ImportError`] when reading or persisting fails.
pub fn import_dataset(
    data_dir: &Utf8Path,
    database: &Utf8Path,
) -> Result<ImportSummary, ImportError> {
    info!("Reading brewery dataset from {data_dir}");
    let dataset = read_dataset(data_dir)?;
    let report = join_dataset(&dataset);

    info!(
        "Uploading {} breweries to {database}",
        report.candidates.len()
    );
    persist_candidates_to_sqlite(database, &report.candidates)?;

    Ok(ImportSummary {
        imported: report.candidates.len(),
        orphan_geocodes: report.orphan_geocodes,
        duplicate_geocodes: report.duplicate_geocodes,
    })
}
