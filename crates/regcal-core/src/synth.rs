//! Calendar event synthesis from session records.
//!
//! Recurring kinds (lecture/discussion/lab) produce one weekly event **per
//! weekday** in the day pattern, each starting on that weekday's first
//! occurrence within the quarter and terminating on the quarter's last
//! instructional date. A document therefore never mixes single- and
//! multi-day recurrence shapes, and consumers cannot double-count
//! occurrences. Exam kinds produce one non-recurring event on their exact
//! date.
//!
//! Records missing a day, time, or exam date are never guessed at: they are
//! excluded from synthesis and surfaced to the caller for human review.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::days::DayCode;
use crate::quarter::QuarterRange;
use crate::record::{ReviewStatus, SessionRecord, TimeRange};

/// Weekly recurrence bounded by the quarter's last instructional date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    /// The single weekday this event repeats on.
    pub weekday: DayCode,
    /// Termination instant in UTC.
    pub until: chrono::DateTime<chrono::Utc>,
}

/// One synthesized calendar entry, ready for document serialization or a
/// remote calendar-service create call. Start/end are campus-local wall
/// clock; the document layer qualifies them with the timezone identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPlan {
    pub uid: String,
    pub summary: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

/// A record excluded from synthesis, with the reason it needs review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRecord {
    pub course_code: String,
    pub kind: crate::record::SessionKind,
    pub status: ReviewStatus,
}

/// The full result of one synthesis pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisOutcome {
    pub events: Vec<EventPlan>,
    pub excluded: Vec<ExcludedRecord>,
}

/// Synthesizes calendar events for every complete record, collecting the
/// incomplete ones for the caller to report.
#[must_use]
pub fn plan_events(records: &[SessionRecord], quarter: &QuarterRange) -> SynthesisOutcome {
    let mut outcome = SynthesisOutcome::default();

    for record in records {
        match record.review_status() {
            ReviewStatus::Complete => {
                if record.kind.is_exam() {
                    if let Some(event) = plan_exam(record, quarter) {
                        outcome.events.push(event);
                    }
                } else {
                    outcome.events.extend(plan_recurring(record, quarter));
                }
            }
            status => {
                tracing::debug!(
                    course = %record.course_code,
                    kind = %record.kind,
                    ?status,
                    "excluding incomplete record from synthesis"
                );
                outcome.excluded.push(ExcludedRecord {
                    course_code: record.course_code.clone(),
                    kind: record.kind,
                    status,
                });
            }
        }
    }

    outcome
}

/// One weekly event per weekday in the record's day pattern.
fn plan_recurring(record: &SessionRecord, quarter: &QuarterRange) -> Vec<EventPlan> {
    let Some(days) = record.days.as_deref() else {
        return Vec::new();
    };
    let Some(time) = record.time else {
        return Vec::new();
    };

    let mut events = Vec::with_capacity(days.len());
    for &day in days {
        let Some(first) = quarter.first_occurrence(day) else {
            tracing::warn!(
                course = %record.course_code,
                day = %day,
                "weekday never occurs inside the quarter range"
            );
            continue;
        };
        let Some((start, end)) = meeting_times(first, time) else {
            continue;
        };
        events.push(EventPlan {
            uid: event_uid(record, quarter, Some(day)),
            summary: summary(record),
            description: describe(record, quarter),
            location: record.location.as_ref().map(ToString::to_string),
            start,
            end,
            recurrence: Some(Recurrence {
                weekday: day,
                until: quarter.recurrence_until(),
            }),
        });
    }
    events
}

/// A single dated, non-recurring event for a midterm or final.
fn plan_exam(record: &SessionRecord, quarter: &QuarterRange) -> Option<EventPlan> {
    let date = record.exam_date?;
    let time = record.time?;
    let (start, end) = meeting_times(date, time)?;

    Some(EventPlan {
        uid: event_uid(record, quarter, None),
        summary: summary(record),
        description: describe(record, quarter),
        location: record.location.as_ref().map(ToString::to_string),
        start,
        end,
        recurrence: None,
    })
}

/// Combines a date with a meeting time range into start/end wall-clock
/// instants. An end at or before the start means the range crossed
/// midnight or was misread; the record stays out of the calendar.
fn meeting_times(date: NaiveDate, time: TimeRange) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = date.and_time(time.start.to_naive()?);
    let end = date.and_time(time.end.to_naive().unwrap_or(NaiveTime::MIN));
    if end <= start {
        tracing::debug!(%date, "meeting end does not follow its start");
        return None;
    }
    Some((start, end))
}

/// Deterministic identifier: course code + kind + term + year, with the
/// weekday appended for per-weekday recurring events.
fn event_uid(record: &SessionRecord, quarter: &QuarterRange, day: Option<DayCode>) -> String {
    let course = record.course_code.replace(' ', "").to_ascii_lowercase();
    let mut uid = format!(
        "{course}-{}-{}{}",
        record.kind.as_str().replace('_', "-"),
        quarter.term.as_str(),
        quarter.year
    );
    if let Some(day) = day {
        uid.push('-');
        uid.push_str(&day.as_str().to_ascii_lowercase());
    }
    uid.push_str("@regcal");
    uid
}

/// Event summary: `"<course code> - <session kind>"`.
fn summary(record: &SessionRecord) -> String {
    format!("{} - {}", record.course_code, record.kind.label())
}

/// Event description as labeled lines.
fn describe(record: &SessionRecord, quarter: &QuarterRange) -> String {
    let mut lines = Vec::new();

    match record.course_title.as_deref() {
        Some(title) => lines.push(format!("Course: {} - {title}", record.course_code)),
        None => lines.push(format!("Course: {}", record.course_code)),
    }
    if let Some(section) = record.section.as_deref() {
        lines.push(format!("Section: {section}"));
    }
    if let Some(instructor) = record.instructor.as_deref() {
        lines.push(format!("Instructor: {instructor}"));
    }
    if let Some(location) = record.location.as_ref() {
        lines.push(format!("Location: {location}"));
    }
    lines.push(format!("Term: {}", quarter.label()));

    lines.join("\n")
}
