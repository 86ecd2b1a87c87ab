//! SQLite persistence for imported breweries.

use brewtour_core::Candidate;
use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, Error as SqliteError, Transaction};
use thiserror::Error;

use crate::fs::ensure_parent_dir;

/// Errors raised when writing breweries to SQLite.
#[derive(Debug, Error)]
pub enum PersistCandidatesError {
    /// The directory holding the database could not be created.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Starting, preparing or committing the write failed.
    #[error("failed to {step} while persisting breweries")]
    Transaction {
        /// Step that failed.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A brewery identifier does not fit SQLite's signed 64-bit integers.
    #[error("brewery id {id} exceeds SQLite i64 range")]
    IdOutOfRange {
        /// Offending identifier.
        id: u64,
    },
    /// Encoding the beer list as JSON failed.
    #[error("failed to serialize beers for brewery {id}")]
    SerializeBeers {
        /// Brewery whose beers failed to encode.
        id: u64,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Writing a brewery row failed.
    #[error("failed to persist brewery {id}")]
    PersistRow {
        /// Brewery being written.
        id: u64,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

const CREATE_BREWERIES_TABLE: &str = "CREATE TABLE IF NOT EXISTS breweries (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    lon REAL NOT NULL,
    lat REAL NOT NULL,
    beers TEXT NOT NULL
)";

const UPSERT_BREWERY: &str =
    "INSERT OR REPLACE INTO breweries (id, name, lon, lat, beers) VALUES (?1, ?2, ?3, ?4, ?5)";

/// Write breweries to the SQLite database at `path`.
///
/// Missing parent directories and the `breweries` table are created on
/// demand. Rows are upserted by id inside a single transaction, so a failed
/// import leaves the database unchanged. Beers are stored as a JSON array.
///
/// # Errors
///
/// Returns [`PersistCandidatesError`] describing the step that failed.
pub fn persist_candidates_to_sqlite(
    path: &Utf8Path,
    candidates: &[Candidate],
) -> Result<(), PersistCandidatesError> {
    ensure_parent_dir(path).map_err(|source| PersistCandidatesError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    let mut connection =
        Connection::open(path.as_std_path()).map_err(|source| PersistCandidatesError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let transaction = connection
        .transaction()
        .map_err(|source| PersistCandidatesError::Transaction {
            step: "begin transaction",
            source,
        })?;
    transaction
        .execute(CREATE_BREWERIES_TABLE, [])
        .map_err(|source| PersistCandidatesError::Transaction {
            step: "create breweries table",
            source,
        })?;
    insert_rows(&transaction, candidates)?;
    transaction
        .commit()
        .map_err(|source| PersistCandidatesError::Transaction {
            step: "commit",
            source,
        })
}

fn insert_rows(
    transaction: &Transaction<'_>,
    candidates: &[Candidate],
) -> Result<(), PersistCandidatesError> {
    let mut statement =
        transaction
            .prepare(UPSERT_BREWERY)
            .map_err(|source| PersistCandidatesError::Transaction {
                step: "prepare insert",
                source,
            })?;

    for candidate in candidates {
        let id = candidate.id;
        let row_id =
            i64::try_from(id).map_err(|_| PersistCandidatesError::IdOutOfRange { id })?;
        let beers = serde_json::to_string(&candidate.tags)
            .map_err(|source| PersistCandidatesError::SerializeBeers { id, source })?;
        statement
            .execute((
                row_id,
                candidate.name.as_str(),
                candidate.location.x,
                candidate.location.y,
                beers,
            ))
            .map_err(|source| PersistCandidatesError::PersistRow { id, source })?;
    }

    Ok(())
}
