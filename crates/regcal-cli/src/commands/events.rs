//! Implementation of the `regcal events` command.
//!
//! Prints the synthesized event list as JSON to stdout, one entry per
//! calendar-service create call, in submission order. Excluded records are
//! reported on stderr.

use std::io::{BufWriter, Write, stdout};

use anyhow::{Context, Result};
use regcal_core::{QuarterRange, parse_schedule, plan_events};

/// Run the events command.
pub fn run(text: &str, quarter: &QuarterRange) -> Result<()> {
    let records = parse_schedule(text)?;
    let outcome = plan_events(&records, quarter);

    let out = stdout();
    let mut writer = BufWriter::new(out.lock());
    serde_json::to_writer_pretty(&mut writer, &outcome.events)
        .context("failed to serialize events")?;
    writeln!(writer)?;
    writer.flush()?;

    for excluded in &outcome.excluded {
        eprintln!(
            "excluded {} {}: {}",
            excluded.course_code,
            excluded.kind.label(),
            excluded.status.label()
        );
    }

    Ok(())
}
