//! Fuel-bounded tour construction.
//!
//! [`plan_tour`] grows a round trip greedily: it seeds the tour with the
//! candidate nearest the start, then keeps hopping to the nearest unvisited
//! candidate for as long as the hop plus the drive home still fits the
//! budget. The first hop that does not fit ends the tour; the planner never
//! backtracks or tries a farther candidate instead.

use std::collections::BTreeMap;

use geo::Coord;
use log::{debug, trace};
use thiserror::Error;

use crate::{Candidate, CandidateProvider, Distance, haversine_distance};

/// Errors returned by [`plan_tour`] and [`TourPlanner::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The candidate pool was empty, so no tour can be seeded.
    #[error("no breweries found within reach")]
    EmptyCandidateSet,
}

/// A candidate committed to the tour together with its leg distances.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// The visited brewery.
    pub candidate: Candidate,
    /// Distance from the previous stop, or from the start for the first stop.
    pub distance_from_previous: Distance,
    /// Distance from this stop straight back to the start.
    pub distance_to_home: Distance,
}

/// The state and outcome of one planning run.
///
/// Every input candidate ends up either in [`TourPlan::stops`] or in
/// [`TourPlan::remaining`], never both. Once returned by [`plan_tour`] the
/// plan is closed: [`TourPlan::total_distance`] includes the final leg home.
#[derive(Debug, Clone, PartialEq)]
pub struct TourPlan {
    start: Coord<f64>,
    budget: Distance,
    remaining: BTreeMap<u64, Candidate>,
    stops: Vec<Stop>,
    total_distance: Distance,
    collected_tags: Vec<String>,
}

impl TourPlan {
    fn new(start: Coord<f64>, budget: Distance, remaining: BTreeMap<u64, Candidate>) -> Self {
        Self {
            start,
            budget,
            remaining,
            stops: Vec::new(),
            total_distance: Distance::ZERO,
            collected_tags: Vec::new(),
        }
    }

    /// Where the tour starts and ends.
    #[must_use]
    pub const fn start(&self) -> Coord<f64> {
        self.start
    }

    /// Maximum round-trip distance the tour may use.
    #[must_use]
    pub const fn budget(&self) -> Distance {
        self.budget
    }

    /// Visited candidates in order.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The final stop before heading home.
    #[must_use]
    pub fn last_stop(&self) -> Option<&Stop> {
        self.stops.last()
    }

    /// Candidates left unvisited, in ascending id order.
    pub fn remaining(&self) -> impl ExactSizeIterator<Item = &Candidate> + '_ {
        self.remaining.values()
    }

    /// Length of every leg, including the return to the start.
    #[must_use]
    pub const fn total_distance(&self) -> Distance {
        self.total_distance
    }

    /// Tags of every visited candidate in visiting order, duplicates kept.
    #[must_use]
    pub fn collected_tags(&self) -> &[String] {
        &self.collected_tags
    }

    /// Nearest unvisited candidate to `from`, ties going to the lowest id.
    fn nearest_to(&self, from: Coord<f64>) -> Option<(u64, Distance)> {
        // `min_by` keeps the first of equal elements and the map iterates by id.
        self.remaining
            .values()
            .map(|candidate| (candidate.id, haversine_distance(from, candidate.location)))
            .min_by(|(_, lhs), (_, rhs)| lhs.km().total_cmp(&rhs.km()))
    }

    fn commit(&mut self, id: u64, leg: Distance) {
        let Some(candidate) = self.remaining.remove(&id) else {
            return;
        };
        let distance_to_home = haversine_distance(candidate.location, self.start);
        trace!(
            "visiting brewery {id} ({}) after {leg}, {distance_to_home} from home",
            candidate.name
        );
        self.total_distance += leg;
        self.collected_tags.extend(candidate.tags.iter().cloned());
        self.stops.push(Stop {
            candidate,
            distance_from_previous: leg,
            distance_to_home,
        });
    }

    fn close(&mut self) {
        if let Some(home_leg) = self.last_stop().map(|stop| stop.distance_to_home) {
            self.total_distance += home_leg;
        }
    }
}

/// Build a round trip from `start` through as many candidates as `budget`
/// allows.
///
/// The first stop is the candidate nearest `start` and is not checked
/// against the budget: callers are expected to pass only candidates within
/// `budget / 2` of `start`, which guarantees that the seed's round trip
/// fits. Subsequent stops follow nearest-neighbour order. When two
/// candidates are equally near, the one with the lower id is chosen.
/// Candidates sharing an id collapse to the last one supplied.
///
/// # Errors
///
/// Returns [`PlanError::EmptyCandidateSet`] when `candidates` is empty.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use brewtour_core::{Candidate, Distance, plan_tour};
///
/// let start = Coord { x: 0.0, y: 0.0 };
/// let near = Candidate::untagged(1, "Near", Coord { x: 0.1, y: 0.0 });
/// let far = Candidate::untagged(2, "Far", Coord { x: 5.0, y: 0.0 });
///
/// let plan = plan_tour(start, vec![near, far], Distance::from_km(100.0))?;
/// assert_eq!(plan.stops().len(), 1);
/// assert_eq!(plan.remaining().len(), 1);
/// assert!(plan.total_distance() <= plan.budget());
/// # Ok::<(), brewtour_core::PlanError>(())
/// ```
pub fn plan_tour<I>(
    start: Coord<f64>,
    candidates: I,
    budget: Distance,
) -> Result<TourPlan, PlanError>
where
    I: IntoIterator<Item = Candidate>,
{
    let pool = candidates
        .into_iter()
        .map(|candidate| (candidate.id, candidate))
        .collect();
    let mut plan = TourPlan::new(start, budget, pool);

    let (seed, outbound) = plan
        .nearest_to(start)
        .ok_or(PlanError::EmptyCandidateSet)?;
    plan.commit(seed, outbound);

    while let Some(last) = plan.last_stop().map(|stop| stop.candidate.location) {
        let Some((best, leg)) = plan.nearest_to(last) else {
            break;
        };
        let home_leg = plan
            .remaining
            .get(&best)
            .map_or(Distance::ZERO, |candidate| {
                haversine_distance(candidate.location, start)
            });
        let projected = plan.total_distance + leg + home_leg;
        if projected > budget {
            debug!(
                "stopping before brewery {best}: projected {projected} exceeds budget {budget}"
            );
            break;
        }
        plan.commit(best, leg);
    }

    plan.close();
    debug!(
        "planned {} stops covering {} with {} breweries left",
        plan.stops.len(),
        plan.total_distance,
        plan.remaining.len()
    );
    Ok(plan)
}

/// Plans tours from candidates supplied by a [`CandidateProvider`].
///
/// The provider is queried with a radius of half the budget around the start
/// so that every candidate's own round trip fits, as [`plan_tour`] expects.
#[derive(Debug)]
pub struct TourPlanner<P> {
    provider: P,
}

impl<P: CandidateProvider> TourPlanner<P> {
    /// Construct a planner over `provider`.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Plan a round trip from `start` within `budget`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::EmptyCandidateSet`] when no candidate lies within
    /// `budget / 2` of `start`.
    pub fn plan(&self, start: Coord<f64>, budget: Distance) -> Result<TourPlan, PlanError> {
        let radius = budget.half();
        let candidates: Vec<Candidate> = self.provider.candidates_within(start, radius).collect();
        debug!(
            "found {} breweries within {radius} of ({}, {})",
            candidates.len(),
            start.y,
            start.x
        );
        plan_tour(start, candidates, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryProvider;
    use rstest::{fixture, rstest};

    const ORIGIN: Coord<f64> = Coord { x: 0.0, y: 0.0 };

    /// Kilometres spanned by one degree along a great circle.
    fn km_per_degree() -> f64 {
        crate::EARTH_RADIUS_METRES / 1_000.0 * std::f64::consts::PI / 180.0
    }

    fn on_equator(id: u64, lon: f64) -> Candidate {
        Candidate::untagged(id, format!("brewery {id}"), Coord { x: lon, y: 0.0 })
    }

    fn ids(plan: &TourPlan) -> Vec<u64> {
        plan.stops().iter().map(|stop| stop.candidate.id).collect()
    }

    #[fixture]
    fn cutoff_candidates() -> Vec<Candidate> {
        vec![
            on_equator(1, 1.0),
            on_equator(2, 2.0),
            on_equator(3, 3.9),
            // Farther from stop 2 than stop 3, yet its detour would fit.
            on_equator(4, -1.05),
        ]
    }

    #[rstest]
    fn empty_pool_is_rejected() {
        let result = plan_tour(ORIGIN, Vec::new(), Distance::from_km(500.0));
        assert_eq!(result, Err(PlanError::EmptyCandidateSet));
    }

    #[rstest]
    fn single_candidate_round_trip() {
        let lat = 100.0 / km_per_degree();
        let candidate = Candidate::untagged(9, "Solo", Coord { x: 0.0, y: lat });

        let plan = plan_tour(ORIGIN, vec![candidate.clone()], Distance::from_km(250.0))
            .expect("plan single candidate");

        assert_eq!(ids(&plan), [9]);
        assert!((plan.total_distance().km() - 200.0).abs() < 1.0e-6);
        let stop = plan.last_stop().expect("one stop");
        assert!((stop.distance_from_previous.km() - 100.0).abs() < 1.0e-6);
        assert!((stop.distance_to_home.km() - 100.0).abs() < 1.0e-6);
        assert_eq!(plan.remaining().len(), 0);
    }

    #[rstest]
    fn stops_at_first_unaffordable_neighbour(cutoff_candidates: Vec<Candidate>) {
        let plan = plan_tour(ORIGIN, cutoff_candidates, Distance::from_km(700.0))
            .expect("plan cutoff scenario");

        assert_eq!(ids(&plan), [1, 2]);
        let left: Vec<u64> = plan.remaining().map(|candidate| candidate.id).collect();
        assert_eq!(left, [3, 4]);
        let expected = 4.0 * km_per_degree();
        assert!((plan.total_distance().km() - expected).abs() < 1.0e-6);
        assert!(plan.total_distance() <= plan.budget());
    }

    #[rstest]
    fn visits_everything_when_budget_allows(cutoff_candidates: Vec<Candidate>) {
        let plan = plan_tour(ORIGIN, cutoff_candidates, Distance::from_km(2_000.0))
            .expect("plan generous budget");

        assert_eq!(ids(&plan), [1, 2, 3, 4]);
        assert_eq!(plan.remaining().len(), 0);
        let legs: Distance = plan
            .stops()
            .iter()
            .map(|stop| stop.distance_from_previous)
            .sum();
        let home = plan.last_stop().expect("stops").distance_to_home;
        assert_eq!(plan.total_distance(), legs + home);
    }

    #[rstest]
    fn equidistant_candidates_prefer_lowest_id() {
        let plan = plan_tour(
            ORIGIN,
            vec![on_equator(5, 1.0), on_equator(2, -1.0)],
            Distance::from_km(250.0),
        )
        .expect("plan tie");

        assert_eq!(ids(&plan), [2]);
    }

    #[rstest]
    fn seed_is_not_checked_against_budget() {
        let plan = plan_tour(ORIGIN, vec![on_equator(1, 3.0)], Distance::from_km(10.0))
            .expect("seed beyond budget");

        assert_eq!(ids(&plan), [1]);
        assert!(plan.total_distance() > plan.budget());
    }

    #[rstest]
    fn tags_are_collected_in_visiting_order() {
        let tagged = |id, lon, tags: &[&str]| {
            Candidate::new(
                id,
                format!("brewery {id}"),
                Coord { x: lon, y: 0.0 },
                tags.iter().map(|tag| (*tag).to_owned()).collect(),
            )
        };
        let candidates = vec![
            tagged(1, 0.2, &["Porter", "Lager"]),
            tagged(2, 0.1, &["Lager"]),
            tagged(3, 0.3, &[]),
        ];

        let plan = plan_tour(ORIGIN, candidates, Distance::from_km(200.0)).expect("plan tags");

        assert_eq!(ids(&plan), [2, 1, 3]);
        assert_eq!(plan.collected_tags(), ["Lager", "Porter", "Lager"]);
    }

    #[rstest]
    fn first_stop_leg_is_measured_from_start() {
        let plan = plan_tour(ORIGIN, vec![on_equator(1, 0.5)], Distance::from_km(200.0))
            .expect("plan");
        let stop = plan.last_stop().expect("stop");
        assert_eq!(stop.distance_from_previous, stop.distance_to_home);
        assert_eq!(plan.start(), ORIGIN);
    }

    #[rstest]
    fn planner_queries_half_budget_radius() {
        let provider = MemoryProvider::with_candidates([
            on_equator(1, 1.0),
            // 222 km away: outside the 150 km radius for a 300 km budget.
            on_equator(2, -2.0),
        ]);
        let planner = TourPlanner::new(provider);

        let plan = planner
            .plan(ORIGIN, Distance::from_km(300.0))
            .expect("plan via provider");

        assert_eq!(ids(&plan), [1]);
        assert_eq!(plan.remaining().len(), 0);
    }

    #[rstest]
    fn planner_reports_empty_neighbourhood() {
        let planner = TourPlanner::new(MemoryProvider::with_candidate(on_equator(1, 10.0)));
        let err = planner
            .plan(ORIGIN, Distance::from_km(100.0))
            .expect_err("nothing in range");
        assert_eq!(err, PlanError::EmptyCandidateSet);
    }
}
