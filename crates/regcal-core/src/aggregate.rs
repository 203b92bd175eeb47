//! Single-pass schedule aggregation.
//!
//! WebReg prints one course as a block of narrow rows: a main row carrying
//! the course code and title, continuation rows for discussion/lab meetings,
//! and dated exam rows that name neither the course nor the section. The
//! aggregator scans lines in source order, carries the current course
//! context across rows, and emits one [`SessionRecord`] per meeting.
//!
//! No single malformed line aborts the scan; line parsers return `None` on
//! failure and the line is skipped with a debug log. Only a whole-input
//! insufficiency is escalated to the caller.

use thiserror::Error;

use crate::days::DayCode;
use crate::fields;
use crate::line::{self, LineKind};
use crate::record::{Location, SessionKind, SessionRecord, TimeRange};

/// Inputs shorter than this cannot contain even one course row; they are
/// rejected outright instead of producing an empty list indistinguishable
/// from "no classes".
pub const MIN_INPUT_LEN: usize = 25;

/// Whole-input parse failures.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("schedule text too short to parse ({length} bytes, need at least {MIN_INPUT_LEN})")]
    InsufficientInput { length: usize },
}

/// Cross-line context carried through one scan. WebReg's table prints
/// course identity once per block, so continuation rows inherit it.
#[derive(Debug, Default)]
struct ScanState {
    course_code: Option<String>,
    course_title: Option<String>,
    instructor: Option<String>,
    /// Baseline section for exam attribution. A Discussion/Lab row
    /// overwrites this: that is the section students are enrolled in.
    section: Option<String>,
}

/// Parses a raw schedule dump into an ordered list of session records.
pub fn parse_schedule(text: &str) -> Result<Vec<SessionRecord>, ParseError> {
    let trimmed = text.trim();
    if trimmed.len() < MIN_INPUT_LEN {
        return Err(ParseError::InsufficientInput {
            length: trimmed.len(),
        });
    }

    let mut state = ScanState::default();
    let mut records: Vec<SessionRecord> = Vec::new();

    for (line_no, raw) in trimmed.lines().enumerate() {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        let fields = line::split_fields(text);

        match line::classify(text, &fields) {
            LineKind::Header => {}
            LineKind::MainCourse => {
                if let Some(record) = parse_main_course(&fields, &mut state) {
                    records.push(record);
                } else {
                    tracing::debug!(line_no, line = text, "skipping unparseable course line");
                }
            }
            LineKind::SecondarySession => {
                if let Some(record) = parse_secondary(&fields, &mut state) {
                    records.push(record);
                } else {
                    tracing::debug!(
                        line_no,
                        line = text,
                        "secondary session line outside a course block"
                    );
                }
            }
            LineKind::Midterm => {
                if let Some(record) = parse_exam(&fields, SessionKind::Midterm, &state) {
                    records.push(record);
                } else {
                    tracing::debug!(line_no, line = text, "midterm line without an active course");
                }
            }
            LineKind::FinalExam => {
                if let Some(record) = parse_exam(&fields, SessionKind::FinalExam, &state) {
                    records.push(record);
                } else {
                    tracing::debug!(
                        line_no,
                        line = text,
                        "final exam line without an active course"
                    );
                }
            }
            LineKind::OrphanInstructor => {
                apply_orphan_instructor(text, &mut state, &mut records);
            }
            LineKind::Unrecognized => {
                tracing::debug!(line_no, line = text, "skipping unrecognized line");
            }
        }
    }

    Ok(records)
}

/// Fields recognized while walking one line's tokens.
#[derive(Debug, Default)]
struct ScannedFields {
    section: Option<String>,
    kind: Option<SessionKind>,
    days: Option<Vec<DayCode>>,
    time: Option<TimeRange>,
    exam_date: Option<chrono::NaiveDate>,
    building: Option<String>,
    room: Option<String>,
    instructor: Option<String>,
    title_words: Vec<String>,
}

impl ScannedFields {
    /// Structured columns start at the section or type code; everything
    /// recognized before that point is title territory.
    fn structured(&self) -> bool {
        self.section.is_some()
            || self.kind.is_some()
            || self.days.is_some()
            || self.time.is_some()
            || self.exam_date.is_some()
    }

    fn title(&self) -> Option<String> {
        if self.title_words.is_empty() {
            None
        } else {
            Some(self.title_words.join(" "))
        }
    }

    fn location(&self) -> Option<Location> {
        self.building.as_ref().map(|building| Location {
            building: building.clone(),
            room: self.room.clone().unwrap_or_default(),
        })
    }
}

/// Walks a line's fields, applying the recognizers in priority order:
/// the fused day+time splitter first, then the closed vocabularies
/// (section, type code), then times/dates/days, and the open-ended
/// building/room categories last.
fn scan_tokens(fields: &[&str]) -> ScannedFields {
    let mut out = ScannedFields::default();
    // Set while an instructor surname ending in "," waits for its
    // given-name token (single-whitespace splitting only).
    let mut instructor_open = false;

    for token in fields {
        if token.eq_ignore_ascii_case("tba") {
            instructor_open = false;
            continue;
        }
        if let Some((days, time)) = fields::split_fused_day_time(token) {
            out.days.get_or_insert(days);
            out.time.get_or_insert(time);
            instructor_open = false;
            continue;
        }
        if out.section.is_none() {
            if let Some(section) = fields::parse_section_code(token) {
                out.section = Some(section);
                instructor_open = false;
                continue;
            }
        }
        if out.kind.is_none() {
            if let Some(kind) = fields::parse_session_type(token) {
                out.kind = Some(kind);
                instructor_open = false;
                continue;
            }
        }
        if out.time.is_none() {
            if let Some(time) = fields::parse_time_range(token) {
                out.time = Some(time);
                instructor_open = false;
                continue;
            }
        }
        if out.exam_date.is_none() {
            if let Some(date) = fields::parse_exam_date(token) {
                out.exam_date = Some(date);
                instructor_open = false;
                continue;
            }
        }
        if out.days.is_none() {
            if let Some(days) = fields::parse_day_pattern_field(token) {
                out.days = Some(days);
                instructor_open = false;
                continue;
            }
        }
        if fields::is_units_field(token) {
            instructor_open = false;
            continue;
        }
        if fields::is_instructor_name(token) {
            out.instructor = Some((*token).to_string());
            instructor_open = token.ends_with(',');
            continue;
        }
        if instructor_open && token.chars().all(char::is_alphabetic) {
            if let Some(name) = out.instructor.as_mut() {
                name.push(' ');
                name.push_str(token);
            }
            instructor_open = false;
            continue;
        }
        // Single-letter grade option column (L/P/S).
        if token.len() == 1 && token.chars().all(|c| c.is_ascii_uppercase()) {
            continue;
        }
        if out.structured() {
            if out.building.is_none() && fields::is_building_code(token) {
                out.building = Some((*token).to_string());
                continue;
            }
            if out.building.is_some() && out.room.is_none() && fields::is_room_code(token) {
                out.room = Some((*token).to_string());
                continue;
            }
        } else if token.chars().any(char::is_alphabetic) {
            out.title_words.push((*token).to_string());
            continue;
        }
        tracing::trace!(token, "unclaimed token");
    }

    out
}

/// Parses a main course row and resets the carried state to it.
fn parse_main_course(fields: &[&str], state: &mut ScanState) -> Option<SessionRecord> {
    let course_code = line::leading_course_code(fields)?;
    // Skip the field(s) the course code consumed.
    let consumed = if fields::parse_course_code(fields[0]).is_some() {
        1
    } else {
        2
    };
    let scanned = scan_tokens(&fields[consumed..]);

    let record = SessionRecord {
        course_code: course_code.clone(),
        course_title: scanned.title(),
        kind: scanned.kind.unwrap_or(SessionKind::Lecture),
        section: scanned.section.clone(),
        instructor: scanned.instructor.clone(),
        days: scanned.days.clone(),
        time: scanned.time,
        location: scanned.location(),
        exam_date: None,
    };

    // This row is the new course block: all four carried values reset,
    // including to empty when the row left them blank.
    state.course_code = Some(course_code);
    state.course_title = record.course_title.clone();
    state.instructor = record.instructor.clone();
    state.section = record.section.clone();

    Some(record)
}

/// Parses a discussion/lab continuation row, inheriting course identity
/// from the current block.
fn parse_secondary(fields: &[&str], state: &mut ScanState) -> Option<SessionRecord> {
    let course_code = state.course_code.clone()?;
    let scanned = scan_tokens(fields);

    // The Discussion/Lab section is the one students enroll in; it becomes
    // the baseline that later exam rows inherit.
    if scanned.section.is_some() {
        state.section.clone_from(&scanned.section);
    }
    let location = scanned.location();

    Some(SessionRecord {
        course_code,
        course_title: state.course_title.clone(),
        kind: scanned.kind.unwrap_or(SessionKind::Discussion),
        section: scanned.section,
        instructor: scanned.instructor.or_else(|| state.instructor.clone()),
        days: scanned.days,
        time: scanned.time,
        location,
        exam_date: None,
    })
}

/// Parses a dated exam row. Requires an active course block; an exam that
/// cannot be attributed is dropped.
fn parse_exam(fields: &[&str], kind: SessionKind, state: &ScanState) -> Option<SessionRecord> {
    let course_code = state.course_code.clone()?;
    let scanned = scan_tokens(fields);

    if scanned.exam_date.is_none() {
        tracing::debug!(course = %course_code, "exam row without a parseable date");
    }

    Some(SessionRecord {
        course_code,
        course_title: state.course_title.clone(),
        kind,
        section: state.section.clone(),
        instructor: state.instructor.clone(),
        // Exams carry a single date, never a weekly day pattern.
        days: None,
        time: scanned.time,
        location: scanned.location(),
        exam_date: scanned.exam_date,
    })
}

/// Attributes a bare instructor-name line to the current course block.
/// Backfills the most recently emitted record in place so the scan stays
/// single-pass.
fn apply_orphan_instructor(
    text: &str,
    state: &mut ScanState,
    records: &mut Vec<SessionRecord>,
) {
    if state.instructor.is_some() {
        // A confidently parsed instructor is never overwritten by a later
        // noisy line.
        tracing::debug!(line = text, "discarding redundant instructor line");
        return;
    }

    let name = text.trim().to_string();
    state.instructor = Some(name.clone());

    if let Some(last) = records.last_mut() {
        let same_course = state.course_code.as_deref() == Some(last.course_code.as_str());
        if same_course && last.instructor.is_none() {
            last.instructor = Some(name);
        }
    }
}
