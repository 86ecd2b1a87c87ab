//! Breweries eligible for a tour.

use geo::Coord;

/// A brewery that a tour may visit.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Tags list
/// the beer types brewed there in source order and may be empty.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use brewtour_core::Candidate;
///
/// let brewery = Candidate::new(
///     7,
///     "Volfas Engelman",
///     Coord { x: 23.93, y: 54.89 },
///     vec!["Lager".into(), "Porter".into()],
/// );
///
/// assert_eq!(brewery.id, 7);
/// assert_eq!(brewery.tags.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Beer types associated with the brewery.
    pub tags: Vec<String>,
}

impl Candidate {
    /// Construct a `Candidate`.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, location: Coord<f64>, tags: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            tags,
        }
    }

    /// Construct a `Candidate` without tags.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use brewtour_core::Candidate;
    ///
    /// let brewery = Candidate::untagged(1, "Taproom", Coord { x: 0.0, y: 0.0 });
    /// assert!(brewery.tags.is_empty());
    /// ```
    #[must_use]
    pub fn untagged(id: u64, name: impl Into<String>, location: Coord<f64>) -> Self {
        Self::new(id, name, location, Vec::new())
    }
}
