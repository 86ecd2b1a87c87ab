//! SQLite-backed candidate store.
//!
//! Breweries are read once from the `breweries` table written by the import
//! pipeline and held in an R\*-tree. Radius queries prefilter by a bounding
//! box in degrees and then apply the exact haversine distance.

use std::{
    f64::consts::{FRAC_PI_2, PI},
    fmt,
    path::{Path, PathBuf},
};

use geo::Coord;
use log::debug;
use rstar::{AABB, RTree, RTreeObject};
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

use crate::{Candidate, Distance, EARTH_RADIUS_METRES, haversine_distance};

use super::CandidateProvider;

/// Padding in degrees applied to the prefilter box so that candidates lying
/// exactly on the radius survive floating-point rounding.
const ENVELOPE_PADDING_DEGREES: f64 = 1.0e-9;

/// Error raised when loading breweries from SQLite.
#[derive(Debug, Error)]
pub enum SqliteCandidateStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The stored beer list was not a JSON array of strings.
    #[error("failed to parse beers for brewery {id}: {source}")]
    InvalidBeers {
        /// Identifier of the brewery whose beers failed to parse.
        id: u64,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored brewery id is negative and cannot identify a candidate.
    #[error("brewery id {id} is outside the supported range")]
    IdOutOfRange {
        /// Raw identifier read from the database.
        id: i64,
    },
    /// Generic SQLite error when reading brewery rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// R\*-tree entry keyed on `[longitude, latitude]`.
#[derive(Debug, Clone)]
struct IndexedCandidate(Candidate);

impl RTreeObject for IndexedCandidate {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.0.location.x, self.0.location.y])
    }
}

/// Read-only candidate store backed by a SQLite database.
pub struct SqliteCandidateStore {
    index: RTree<IndexedCandidate>,
}

impl fmt::Debug for SqliteCandidateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCandidateStore")
            .field("entries", &self.index.size())
            .finish_non_exhaustive()
    }
}

impl SqliteCandidateStore {
    /// Open the database at `path` and index every brewery it contains.
    ///
    /// # Errors
    ///
    /// Fails when the database cannot be opened read-only, when the
    /// `breweries` table is missing or malformed, or when a beer list is not
    /// valid JSON.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteCandidateStoreError> {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqliteCandidateStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;

        let candidates = load_candidates(&connection)?;
        debug!("indexed {} breweries from {}", candidates.len(), path.display());

        Ok(Self {
            index: RTree::bulk_load(candidates.into_iter().map(IndexedCandidate).collect()),
        })
    }

    /// Number of indexed breweries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.size()
    }

    /// Whether the store holds no breweries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CandidateProvider for SqliteCandidateStore {
    fn candidates_within(
        &self,
        centre: Coord<f64>,
        radius: Distance,
    ) -> Box<dyn Iterator<Item = Candidate> + Send + '_> {
        let envelope = search_envelope(centre, radius);
        let mut found: Vec<Candidate> = self
            .index
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| haversine_distance(centre, entry.0.location) <= radius)
            .map(|entry| entry.0.clone())
            .collect();

        found.sort_unstable_by_key(|candidate| candidate.id);

        Box::new(found.into_iter())
    }
}

fn load_candidates(connection: &Connection) -> Result<Vec<Candidate>, SqliteCandidateStoreError> {
    let mut statement =
        connection.prepare("SELECT id, name, lon, lat, beers FROM breweries ORDER BY id")?;
    let mut rows = statement.query([])?;
    let mut candidates = Vec::new();

    while let Some(row) = rows.next()? {
        let raw_id: i64 = row.get(0)?;
        let id = u64::try_from(raw_id)
            .map_err(|_| SqliteCandidateStoreError::IdOutOfRange { id: raw_id })?;
        let name: String = row.get(1)?;
        let lon: f64 = row.get(2)?;
        let lat: f64 = row.get(3)?;
        let beers_json: String = row.get(4)?;
        let beers: Vec<String> = serde_json::from_str(&beers_json)
            .map_err(|source| SqliteCandidateStoreError::InvalidBeers { id, source })?;

        candidates.push(Candidate::new(id, name, Coord { x: lon, y: lat }, beers));
    }

    Ok(candidates)
}

/// Bounding box in degrees containing every point within `radius` of
/// `centre`.
///
/// The longitude span is `asin(sin(r) / cos(lat))` for angular radius `r`.
/// Boxes that reach a pole or cross the antimeridian widen to the full
/// longitude range; the exact distance filter trims the surplus.
#[expect(
    clippy::float_arithmetic,
    reason = "bounding box derivation is spherical trigonometry"
)]
fn search_envelope(centre: Coord<f64>, radius: Distance) -> AABB<[f64; 2]> {
    let angular = radius.km() * 1_000.0 / EARTH_RADIUS_METRES;
    if angular >= PI {
        return AABB::from_corners([-180.0, -90.0], [180.0, 90.0]);
    }

    let lat = centre.y.to_radians();
    let min_lat = lat - angular;
    let max_lat = lat + angular;

    let (min_lon, max_lon) = if min_lat > -FRAC_PI_2 && max_lat < FRAC_PI_2 {
        let delta_lon = (angular.sin() / lat.cos()).asin().to_degrees();
        let west = centre.x - delta_lon;
        let east = centre.x + delta_lon;
        if west < -180.0 || east > 180.0 {
            (-180.0, 180.0)
        } else {
            (west, east)
        }
    } else {
        (-180.0, 180.0)
    };

    AABB::from_corners(
        [
            min_lon - ENVELOPE_PADDING_DEGREES,
            min_lat.to_degrees().max(-90.0) - ENVELOPE_PADDING_DEGREES,
        ],
        [
            max_lon + ENVELOPE_PADDING_DEGREES,
            max_lat.to_degrees().min(90.0) + ENVELOPE_PADDING_DEGREES,
        ],
    )
}
