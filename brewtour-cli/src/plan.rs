//! Plan command implementation for the Brewtour CLI.

use std::io::Write;
use std::time::Instant;

use brewtour_core::{CandidateProvider, Distance, SqliteCandidateStore, TourPlan, TourPlanner};
use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::present::write_plan;
use crate::{
    ARG_DATABASE, ARG_FUEL, ARG_LAT, ARG_LONG, CliError, DEFAULT_DATABASE, ENV_PLAN_FUEL,
    ENV_PLAN_LAT, ENV_PLAN_LONG, require_existing,
};

const DEFAULT_LAT: f64 = 54.900_518;
const DEFAULT_LONG: f64 = 23.893_718;
const DEFAULT_FUEL_KM: f64 = 2_000.0;

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a round trip from a starting point, repeatedly \
                 driving to the nearest unvisited brewery while enough fuel \
                 remains to return home. Values can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Plan a brewery tour"
)]
#[ortho_config(prefix = "BREWTOUR")]
pub(crate) struct PlanArgs {
    /// Latitude of the starting point in degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the starting point in degrees.
    #[arg(long = ARG_LONG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) long: Option<f64>,
    /// Total distance the tour may cover, in kilometres.
    #[arg(long = ARG_FUEL, value_name = "km", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) fuel: Option<f64>,
    /// Path to the brewery database written by `brewtour import`.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// Home location (`x = longitude`, `y = latitude`).
    pub(crate) start: Coord<f64>,
    /// Fuel budget for the whole round trip.
    pub(crate) budget: Distance,
    /// Path to the SQLite brewery database.
    pub(crate) database: Utf8PathBuf,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let lat = finite(args.lat.unwrap_or(DEFAULT_LAT), ARG_LAT, ENV_PLAN_LAT)?;
        let long = finite(args.long.unwrap_or(DEFAULT_LONG), ARG_LONG, ENV_PLAN_LONG)?;
        let fuel = finite(args.fuel.unwrap_or(DEFAULT_FUEL_KM), ARG_FUEL, ENV_PLAN_FUEL)?;
        if fuel <= 0.0 {
            return Err(CliError::InvalidArgument {
                field: ARG_FUEL,
                env: ENV_PLAN_FUEL,
                value: fuel,
                reason: "must be positive",
            });
        }
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));

        Ok(Self {
            start: Coord { x: long, y: lat },
            budget: Distance::from_km(fuel),
            database,
        })
    }
}

fn finite(value: f64, field: &'static str, env: &'static str) -> Result<f64, CliError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CliError::InvalidArgument {
            field,
            env,
            value,
            reason: "must be a finite number",
        })
    }
}

/// Builds the candidate provider for the current plan invocation.
pub(crate) trait PlanProviderBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn CandidateProvider>, CliError>;
}

pub(crate) struct SqliteProviderBuilder;

impl PlanProviderBuilder for SqliteProviderBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn CandidateProvider>, CliError> {
        let store = SqliteCandidateStore::open(config.database.as_std_path())?;
        info!("Loaded {} breweries from {}", store.len(), config.database);
        Ok(Box::new(store))
    }
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &SqliteProviderBuilder, &mut stdout)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn PlanProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let started = Instant::now();
    let plan = execute_plan(args, builder)?;
    write_plan(writer, &plan, started.elapsed()).map_err(CliError::WriteOutput)
}

fn execute_plan(args: PlanArgs, builder: &dyn PlanProviderBuilder) -> Result<TourPlan, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let provider = builder.build(&config)?;
    TourPlanner::new(provider.as_ref())
        .plan(config.start, config.budget)
        .map_err(|source| CliError::Plan { source })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
