//! Joining the dataset tables into candidates.

use std::collections::{HashMap, HashSet, hash_map::Entry};

use brewtour_core::Candidate;
use geo::Coord;
use log::{debug, warn};

use crate::dataset::Dataset;

/// Candidates produced by [`join_dataset`] together with what was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Joined breweries in geocode file order.
    pub candidates: Vec<Candidate>,
    /// Geocodes referencing a brewery absent from `breweries.csv`.
    pub orphan_geocodes: usize,
    /// Additional geocodes for a brewery that already had one.
    pub duplicate_geocodes: usize,
}

/// Join geocodes with their brewery and beers.
///
/// Every geocode whose brewery exists yields one candidate carrying the
/// brewery name, the geocode position and every beer of that brewery in
/// `beers.csv` order. Only the first geocode of a brewery is used, and the
/// first row wins when `breweries.csv` repeats an id.
#[must_use]
pub fn join_dataset(dataset: &Dataset) -> ImportReport {
    let mut names: HashMap<u64, &str> = HashMap::with_capacity(dataset.breweries.len());
    for brewery in &dataset.breweries {
        names.entry(brewery.id).or_insert(brewery.name.as_str());
    }

    let mut beers: HashMap<u64, Vec<String>> = HashMap::new();
    for beer in &dataset.beers {
        beers
            .entry(beer.brewery_id)
            .or_default()
            .push(beer.name.clone());
    }

    let mut report = ImportReport::default();
    let mut placed: HashSet<u64> = HashSet::with_capacity(dataset.geocodes.len());
    for geocode in &dataset.geocodes {
        let id = geocode.brewery_id;
        let Some(name) = names.get(&id) else {
            debug!("skipping geocode for unknown brewery {id}");
            report.orphan_geocodes += 1;
            continue;
        };
        if !placed.insert(id) {
            debug!("skipping extra geocode for brewery {id}");
            report.duplicate_geocodes += 1;
            continue;
        }
        let tags = match beers.entry(id) {
            Entry::Occupied(entry) => entry.remove(),
            Entry::Vacant(_) => Vec::new(),
        };
        report.candidates.push(Candidate::new(
            id,
            *name,
            Coord {
                x: geocode.longitude,
                y: geocode.latitude,
            },
            tags,
        ));
    }

    if report.orphan_geocodes > 0 {
        warn!(
            "Skipped {} geocodes without a matching brewery",
            report.orphan_geocodes
        );
    }
    if report.duplicate_geocodes > 0 {
        warn!(
            "Skipped {} duplicate geocodes",
            report.duplicate_geocodes
        );
    }
    report
}
