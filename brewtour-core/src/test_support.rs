//! Test-only, in-memory `CandidateProvider` used by unit and behaviour
//! tests.

use geo::Coord;

use crate::{Candidate, CandidateProvider, Distance, haversine_distance};

/// In-memory `CandidateProvider` implementation used in tests.
///
/// The provider performs a linear scan and is intended only for small
/// datasets.
#[derive(Default, Debug, Clone)]
pub struct MemoryProvider {
    candidates: Vec<Candidate>,
}

impl MemoryProvider {
    /// Create a provider containing a single candidate.
    #[must_use]
    pub fn with_candidate(candidate: Candidate) -> Self {
        Self::with_candidates(std::iter::once(candidate))
    }

    /// Create a provider from a collection of candidates.
    pub fn with_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }
}

impl CandidateProvider for MemoryProvider {
    fn candidates_within(
        &self,
        centre: Coord<f64>,
        radius: Distance,
    ) -> Box<dyn Iterator<Item = Candidate> + Send + '_> {
        let mut found: Vec<Candidate> = self
            .candidates
            .iter()
            .filter(|candidate| haversine_distance(centre, candidate.location) <= radius)
            .cloned()
            .collect();
        found.sort_by_key(|candidate| candidate.id);
        Box::new(found.into_iter())
    }
}
