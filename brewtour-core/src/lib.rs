//! Core domain types and the tour planner for Brewtour.
//!
//! The crate computes great-circle distances, models brewery candidates and
//! builds fuel-bounded round trips from a candidate pool. Coordinates use
//! WGS84 degrees with `x = longitude` and `y = latitude`.
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod candidate;
pub mod geodesy;
pub mod plan;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use candidate::Candidate;
pub use geodesy::{Distance, EARTH_RADIUS_METRES, haversine_distance};
pub use plan::{PlanError, Stop, TourPlan, TourPlanner, plan_tour};
pub use store::CandidateProvider;

#[cfg(feature = "store-sqlite")]
pub use store::{SqliteCandidateStore, SqliteCandidateStoreError};
