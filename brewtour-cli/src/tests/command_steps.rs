//! Behaviour-driven step definitions for the import and plan commands.

use super::helpers::{Workspace, baltic_dataset};
use super::*;
use crate::import::run_import_with;
use crate::plan::{SqliteProviderBuilder, run_plan_with};
use brewtour_core::PlanError;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

struct CommandWorld {
    workspace: Workspace,
    database: Utf8PathBuf,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CommandWorld {
    fn new() -> Self {
        let workspace = Workspace::new();
        let database = workspace.root.join("breweries.db");
        Self {
            workspace,
            database,
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn run(&self, argv: &[String]) {
        self.stdout.borrow_mut().clear();
        let mut buffer = self.stdout.borrow_mut();
        let outcome = Cli::try_parse_from(argv)
            .map_err(CliError::from)
            .and_then(|cli| match cli.command {
                Command::Import(args) => run_import_with(args, &mut *buffer),
                Command::Plan(args) => run_plan_with(args, &SqliteProviderBuilder, &mut *buffer),
            });
        self.result.replace(Some(outcome));
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }

    fn output(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld::new()
}

#[given("the Baltic dataset has been imported")]
fn dataset_imported(world: &CommandWorld) {
    let argv = [
        "brewtour".to_owned(),
        "import".to_owned(),
        format!("--{ARG_DATA_DIR}"),
        baltic_dataset().into_string(),
        format!("--{ARG_DATABASE}"),
        world.database.to_string(),
    ];
    world.run(&argv);
    world
        .result
        .borrow()
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("import succeeds");
    assert!(world.output().starts_with("Imported 4 breweries into "));
}

#[given("no database has been imported")]
fn nothing_imported(world: &CommandWorld) {
    assert!(!world.database.exists());
    assert!(world.workspace.root.exists());
}

#[when("I plan from {lat}, {long} with {fuel} km of fuel")]
fn plan_from(world: &CommandWorld, lat: f64, long: f64, fuel: f64) {
    let argv = [
        "brewtour".to_owned(),
        "plan".to_owned(),
        format!("--{ARG_LAT}={lat}"),
        format!("--{ARG_LONG}={long}"),
        format!("--{ARG_FUEL}={fuel}"),
        format!("--{ARG_DATABASE}"),
        world.database.to_string(),
    ];
    world.run(&argv);
}

#[then("the command succeeds")]
fn command_succeeds(world: &CommandWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err:?}");
    }
}

#[then("the output lists Volfas Engelman then Švyturys before returning home")]
fn output_lists_stops(world: &CommandWorld) {
    let text = world.output();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines.get(..5),
        Some(
            &[
                "Found 2 beer factories:",
                "\t -> HOME: 54.900518 23.893718 distance 0km",
                "\t -> [1] Volfas Engelman: 54.8926 23.9278 distance 2km",
                "\t -> [2] Švyturys: 55.7033 21.1443 distance 197km",
                "\t <- HOME: 54.900518 23.893718 distance 195km",
            ][..]
        )
    );
}

#[then("the output reports {total} travelled and {count} beer types")]
fn output_reports_totals(world: &CommandWorld, total: String, count: usize) {
    let text = world.output();
    assert!(
        text.contains(&format!("Total distance travelled: {total}\n")),
        "{text}"
    );
    assert!(
        text.contains(&format!("Collected {count} beer types:\n")),
        "{text}"
    );
}

#[then("the command fails because the database is missing")]
fn fails_missing_database(world: &CommandWorld) {
    match &*world.error() {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_DATABASE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[then("the command fails because no brewery is within reach")]
fn fails_out_of_reach(world: &CommandWorld) {
    let error = world.error();
    match &*error {
        CliError::Plan { source } => assert_eq!(*source, PlanError::EmptyCandidateSet),
        other => panic!("expected Plan, found {other:?}"),
    }
    assert_eq!(
        error.to_string(),
        "planning failed: no breweries found within reach"
    );
}

macro_rules! register_command_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

register_command_scenario!(
    import_then_plan,
    "importing the dataset and planning a tour"
);
register_command_scenario!(
    plan_without_database,
    "planning without an imported database"
);
register_command_scenario!(
    plan_out_of_reach,
    "planning from a start with no brewery in reach"
);
