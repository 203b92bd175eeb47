//! Implementation of the `regcal export` command.
//!
//! Parses the schedule, synthesizes events for the quarter, and writes the
//! iCalendar document under its suggested file name.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regcal_core::{QuarterRange, build_document, parse_schedule, plan_events, suggested_file_name};

/// Run the export command.
pub fn run(text: &str, quarter: &QuarterRange, output_dir: &Path) -> Result<()> {
    let records = parse_schedule(text)?;
    let outcome = plan_events(&records, quarter);

    let document = build_document(&outcome.events);
    let file_name = suggested_file_name(quarter.term, quarter.year);

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;
    let path = output_dir.join(file_name);
    fs::write(&path, document)
        .with_context(|| format!("failed to write calendar document: {}", path.display()))?;

    println!(
        "wrote {} event(s) for {} to {}",
        outcome.events.len(),
        quarter.label(),
        path.display()
    );
    if !outcome.excluded.is_empty() {
        println!("{} record(s) excluded pending review:", outcome.excluded.len());
        for excluded in &outcome.excluded {
            println!(
                "  {} {}: {}",
                excluded.course_code,
                excluded.kind.label(),
                excluded.status.label()
            );
        }
    }

    Ok(())
}
