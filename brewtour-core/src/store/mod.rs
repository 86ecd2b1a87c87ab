//! Sources of candidate breweries.
//!
//! The `CandidateProvider` trait defines a read-only radius query over
//! [`Candidate`] values. The planner consumes its output and never talks to
//! storage directly.

use geo::Coord;

use crate::{Candidate, Distance};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteCandidateStore, SqliteCandidateStoreError};

/// Read-only access to candidate breweries.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use brewtour_core::{Candidate, CandidateProvider, Distance, haversine_distance};
///
/// struct VecProvider(Vec<Candidate>);
///
/// impl CandidateProvider for VecProvider {
///     fn candidates_within(
///         &self,
///         centre: Coord<f64>,
///         radius: Distance,
///     ) -> Box<dyn Iterator<Item = Candidate> + Send + '_> {
///         Box::new(
///             self.0
///                 .iter()
///                 .filter(move |c| haversine_distance(centre, c.location) <= radius)
///                 .cloned(),
///         )
///     }
/// }
///
/// let provider = VecProvider(vec![Candidate::untagged(1, "Pub", Coord { x: 0.0, y: 0.0 })]);
/// let found: Vec<_> = provider
///     .candidates_within(Coord { x: 0.0, y: 0.5 }, Distance::from_km(100.0))
///     .collect();
/// assert_eq!(found.len(), 1);
/// ```
pub trait CandidateProvider {
    /// Return every candidate whose great-circle distance from `centre` is at
    /// most `radius`, ordered by ascending id.
    ///
    /// Coordinates use WGS84 degrees (`x = longitude`, `y = latitude`).
    /// Candidates exactly `radius` away are included.
    fn candidates_within(
        &self,
        centre: Coord<f64>,
        radius: Distance,
    ) -> Box<dyn Iterator<Item = Candidate> + Send + '_>;
}

impl<P: CandidateProvider + ?Sized> CandidateProvider for &P {
    fn candidates_within(
        &self,
        centre: Coord<f64>,
        radius: Distance,
    ) -> Box<dyn Iterator<Item = Candidate> + Send + '_> {
        (**self).candidates_within(centre, radius)
    }
}
