//! Facade crate for the Brewtour planner.
//!
//! This crate re-exports the core domain types and exposes the SQLite
//! candidate store behind a feature flag.

#![forbid(unsafe_code)]

pub use brewtour_core::{
    Candidate, CandidateProvider, Distance, EARTH_RADIUS_METRES, PlanError, Stop, TourPlan,
    TourPlanner, haversine_distance, plan_tour,
};

#[cfg(feature = "store-sqlite")]
pub use brewtour_core::{SqliteCandidateStore, SqliteCandidateStoreError};

#[cfg(feature = "test-support")]
pub use brewtour_core::test_support;
