//! Line classification for raw schedule dumps.
//!
//! A WebReg dump interleaves several line shapes: column headers, the main
//! row for a course, continuation rows for secondary sessions and exams,
//! and the occasional bare instructor name that OCR split off onto its own
//! line. The classifier assigns each trimmed line exactly one kind; the
//! aggregator dispatches on it with an exhaustive match.

use std::sync::LazyLock;

use regex::Regex;

use crate::fields;
use crate::record::SessionKind;

/// The fixed set of line kinds a schedule dump can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Column-header row; discarded.
    Header,
    /// First row of a course block, starting with a course code.
    MainCourse,
    /// Continuation row for a discussion/lab/extra lecture meeting.
    SecondarySession,
    /// Dated midterm row.
    Midterm,
    /// Dated final-exam row.
    FinalExam,
    /// A bare instructor name with no schedule payload.
    OrphanInstructor,
    /// Nothing recognizable; skipped and logged, never fatal.
    Unrecognized,
}

/// Keywords whose presence (two or more) marks a column-header row.
const HEADER_KEYWORDS: &[&str] = &[
    "subject", "course", "title", "section", "instructor", "units", "grade", "days", "time",
    "bldg", "building", "room", "status", "action",
];

/// Column separator: a tab, or a run of two-plus spaces left by a copied
/// table layout.
static COLUMN_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\t+| {2,}").unwrap());

/// Splits a raw line into its column fields. Tab or multi-space runs are
/// column boundaries; a line with neither falls back to single-whitespace
/// splitting, which leaves multi-word values (titles, names) spread over
/// several fields for the token scanner to reassemble.
#[must_use]
pub fn split_fields(line: &str) -> Vec<&str> {
    if line.contains('\t') || line.contains("  ") {
        COLUMN_SPLIT_RE
            .split(line)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Classifies one trimmed line given its split fields.
///
/// Rules are tested in a fixed order, so classification is deterministic
/// for any fixed input.
#[must_use]
pub fn classify(line: &str, fields: &[&str]) -> LineKind {
    if fields.is_empty() {
        return LineKind::Unrecognized;
    }

    let lower = line.to_lowercase();

    if header_keyword_count(&lower) >= 2 {
        return LineKind::Header;
    }

    if leading_course_code(fields).is_some() {
        return LineKind::MainCourse;
    }

    if lower.contains("final exam") || has_type_code(fields, SessionKind::FinalExam) {
        return LineKind::FinalExam;
    }
    if lower.contains("midterm") || has_type_code(fields, SessionKind::Midterm) {
        return LineKind::Midterm;
    }

    if fields::parse_section_code(fields[0]).is_some()
        || has_type_code(fields, SessionKind::Discussion)
        || has_type_code(fields, SessionKind::Lab)
    {
        return LineKind::SecondarySession;
    }

    if looks_like_orphan_instructor(line, fields) {
        return LineKind::OrphanInstructor;
    }

    LineKind::Unrecognized
}

/// Parses a course code from the head of a line, joining the first two
/// fields when whitespace splitting separated "CSE" from "100".
#[must_use]
pub fn leading_course_code(fields: &[&str]) -> Option<String> {
    if let Some(code) = fields::parse_course_code(fields[0]) {
        return Some(code);
    }
    if fields.len() >= 2 {
        return fields::parse_course_code(&format!("{} {}", fields[0], fields[1]));
    }
    None
}

fn header_keyword_count(lower: &str) -> usize {
    HEADER_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count()
}

fn has_type_code(fields: &[&str], kind: SessionKind) -> bool {
    fields
        .iter()
        .any(|f| fields::parse_session_type(f) == Some(kind))
}

/// A line is a bare instructor name when it carries no schedule payload at
/// all (no time, day pattern, course code, or section code) and either
/// contains a comma or is short alphabetic text.
fn looks_like_orphan_instructor(line: &str, fields: &[&str]) -> bool {
    if fields::line_has_time(fields) {
        return false;
    }
    if fields.iter().any(|f| fields::parse_day_pattern_field(f).is_some()) {
        return false;
    }
    if leading_course_code(fields).is_some() {
        return false;
    }
    if fields.iter().any(|f| fields::parse_section_code(f).is_some()) {
        return false;
    }

    if line.contains(',') {
        return true;
    }
    line.len() <= 40
        && line.chars().any(char::is_alphabetic)
        && line
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '.' || c == '-')
}
