//! Human-readable rendering of a planned tour.

use std::io::{self, Write};
use std::time::Duration;

use brewtour_core::{Distance, TourPlan};

/// Write the stops, totals and collected beer types of `plan`.
pub(crate) fn write_plan(
    writer: &mut dyn Write,
    plan: &TourPlan,
    elapsed: Duration,
) -> io::Result<()> {
    let home = plan.start();
    writeln!(writer, "Found {} beer factories:", plan.stops().len())?;
    writeln!(writer, "\t -> HOME: {} {} distance {}", home.y, home.x, Distance::ZERO)?;
    for stop in plan.stops() {
        let candidate = &stop.candidate;
        writeln!(
            writer,
            "\t -> [{}] {}: {} {} distance {}",
            candidate.id,
            candidate.name,
            candidate.location.y,
            candidate.location.x,
            stop.distance_from_previous
        )?;
    }
    let return_leg = plan
        .last_stop()
        .map_or(Distance::ZERO, |stop| stop.distance_to_home);
    writeln!(writer, "\t <- HOME: {} {} distance {return_leg}", home.y, home.x)?;

    writeln!(writer)?;
    writeln!(writer, "Total distance travelled: {}", plan.total_distance())?;

    writeln!(writer)?;
    writeln!(writer, "Collected {} beer types:", plan.collected_tags().len())?;
    for tag in plan.collected_tags() {
        writeln!(writer, "\t -> {tag}")?;
    }

    writeln!(writer)?;
    writeln!(writer, "Program took: {elapsed:?}")
}
