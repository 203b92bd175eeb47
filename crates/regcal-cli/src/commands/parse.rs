//! Implementation of the `regcal parse` command.
//!
//! Prints the ordered session records as JSON to stdout, with a review
//! summary on stderr so the JSON stream stays machine-readable.

use std::io::{BufWriter, Write, stdout};

use anyhow::{Context, Result};
use regcal_core::record::ReviewStatus;
use regcal_core::{QuarterRange, parse_schedule};

/// Run the parse command.
pub fn run(text: &str, quarter: &QuarterRange) -> Result<()> {
    let records = parse_schedule(text)?;
    tracing::debug!(
        count = records.len(),
        quarter = %quarter.label(),
        "parsed schedule"
    );

    let out = stdout();
    let mut writer = BufWriter::new(out.lock());
    serde_json::to_writer_pretty(&mut writer, &records)
        .context("failed to serialize session records")?;
    writeln!(writer)?;
    writer.flush()?;

    let needs_review: Vec<_> = records
        .iter()
        .filter(|r| r.review_status() != ReviewStatus::Complete)
        .collect();
    eprintln!(
        "{} record(s) parsed for {}; {} need review",
        records.len(),
        quarter.label(),
        needs_review.len()
    );
    for record in needs_review {
        eprintln!(
            "  {} {}: {}",
            record.course_code,
            record.kind.label(),
            record.review_status().label()
        );
    }

    Ok(())
}
