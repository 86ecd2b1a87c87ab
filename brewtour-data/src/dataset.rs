//! Reading the brewery CSV dataset.
//!
//! The dataset is three comma-separated files sharing brewery identifiers:
//!
//! - `breweries.csv`: `id, name, ...`
//! - `geocodes.csv`: `id, brewery_id, latitude, longitude, ...`
//! - `beers.csv`: `id, brewery_id, name, ...`
//!
//! Each file starts with a header row. Rows may carry extra trailing columns,
//! which are ignored.

use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use thiserror::Error;

use crate::fs::open_file;

/// File name of the brewery table.
pub const BREWERIES_FILE: &str = "breweries.csv";
/// File name of the geocode table.
pub const GEOCODES_FILE: &str = "geocodes.csv";
/// File name of the beer table.
pub const BEERS_FILE: &str = "beers.csv";

/// A row of `breweries.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreweryRow {
    /// Brewery identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// A row of `geocodes.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeRow {
    /// Brewery the coordinate belongs to.
    pub brewery_id: u64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// A row of `beers.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeerRow {
    /// Brewery producing the beer.
    pub brewery_id: u64,
    /// Beer name.
    pub name: String,
}

/// The three tables of the brewery dataset, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Rows of `breweries.csv`.
    pub breweries: Vec<BreweryRow>,
    /// Rows of `geocodes.csv`.
    pub geocodes: Vec<GeocodeRow>,
    /// Rows of `beers.csv`.
    pub beers: Vec<BeerRow>,
}

/// Errors raised while reading the CSV dataset.
#[derive(Debug, Error)]
pub enum ReadDatasetError {
    /// A dataset file could not be opened.
    #[error("failed to open {path}")]
    Open {
        /// File that could not be opened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The CSV reader failed, for example on malformed quoting.
    #[error("failed to read CSV from {path}")]
    Csv {
        /// File being read.
        path: Utf8PathBuf,
        /// Error reported by the `csv` crate.
        #[source]
        source: csv::Error,
    },
    /// A row ended before a required column.
    #[error("{path}:{line}: missing {column} column")]
    MissingColumn {
        /// File being read.
        path: Utf8PathBuf,
        /// One-based line number of the row.
        line: u64,
        /// Name of the absent column.
        column: &'static str,
    },
    /// A field could not be parsed.
    #[error("{path}:{line}: invalid {column} {value:?}")]
    InvalidField {
        /// File being read.
        path: Utf8PathBuf,
        /// One-based line number of the row.
        line: u64,
        /// Name of the offending column.
        column: &'static str,
        /// Raw field contents.
        value: String,
    },
}

/// Read `breweries.csv`, `geocodes.csv` and `beers.csv` from `dir`.
///
/// # Errors
///
/// Returns [`ReadDatasetError`] when a file is missing, is not valid CSV,
/// or contains a row with an absent or unparsable required column.
pub fn read_dataset(dir: &Utf8Path) -> Result<Dataset, ReadDatasetError> {
    let dataset = Dataset {
        breweries: read_rows(&dir.join(BREWERIES_FILE), |row| {
            Ok(BreweryRow {
                id: row.parse(0, "id")?,
                name: row.text(1, "name")?.to_owned(),
            })
        })?,
        geocodes: read_rows(&dir.join(GEOCODES_FILE), |row| {
            Ok(GeocodeRow {
                brewery_id: row.parse(1, "brewery_id")?,
                latitude: row.coordinate(2, "latitude")?,
                longitude: row.coordinate(3, "longitude")?,
            })
        })?,
        beers: read_rows(&dir.join(BEERS_FILE), |row| {
            Ok(BeerRow {
                brewery_id: row.parse(1, "brewery_id")?,
                name: row.text(2, "name")?.to_owned(),
            })
        })?,
    };
    debug!(
        "read {} breweries, {} geocodes and {} beers from {dir}",
        dataset.breweries.len(),
        dataset.geocodes.len(),
        dataset.beers.len()
    );
    Ok(dataset)
}

/// One CSV record with enough context to report errors.
struct Row<'a> {
    path: &'a Utf8Path,
    line: u64,
    record: &'a StringRecord,
}

impl Row<'_> {
    fn text(&self, index: usize, column: &'static str) -> Result<&str, ReadDatasetError> {
        self.record
            .get(index)
            .ok_or_else(|| ReadDatasetError::MissingColumn {
                path: self.path.to_path_buf(),
                line: self.line,
                column,
            })
    }

    fn parse<T: FromStr>(&self, index: usize, column: &'static str) -> Result<T, ReadDatasetError> {
        let raw = self.text(index, column)?;
        raw.trim()
            .parse()
            .map_err(|_| self.invalid(column, raw))
    }

    fn coordinate(&self, index: usize, column: &'static str) -> Result<f64, ReadDatasetError> {
        let value: f64 = self.parse(index, column)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(self.invalid(column, self.text(index, column)?))
        }
    }

    fn invalid(&self, column: &'static str, raw: &str) -> ReadDatasetError {
        ReadDatasetError::InvalidField {
            path: self.path.to_path_buf(),
            line: self.line,
            column,
            value: raw.to_owned(),
        }
    }
}

fn read_rows<T, F>(path: &Utf8Path, parse: F) -> Result<Vec<T>, ReadDatasetError>
where
    F: Fn(&Row<'_>) -> Result<T, ReadDatasetError>,
{
    let file = open_file(path).map_err(|source| ReadDatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|source| ReadDatasetError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        if !more {
            break;
        }
        let line = record.position().map_or(0, csv::Position::line);
        rows.push(parse(&Row {
            path,
            line,
            record: &record,
        })?);
    }
    Ok(rows)
}
