//! Field recognizers for raw schedule tokens.
//!
//! Each recognizer tests one token against one semantic category. Because
//! categories overlap syntactically (a short uppercase token could be a
//! building code or a malformed session-type code), callers apply them in a
//! fixed priority order: closed vocabularies (section code, session-type
//! code) before open-ended ones (building, room).

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::days::{self, DayCode};
use crate::record::{SessionKind, TimeOfDay, TimeRange};

/// Section code: one letter then two digits ("A01"). The digit positions
/// tolerate the zero/letter-O OCR confusion.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])([0-9Oo])([0-9Oo])$").unwrap());

/// Course code: 2-4 uppercase letters, optional space, 1-3 digits, optional
/// trailing letter ("CSE 100", "MATH20D").
static COURSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,4}) ?(\d{1,3}[A-Z]?)$").unwrap());

/// Time range: two `H:MM` + meridiem components separated by a dash.
static TIME_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})([ap])m?-(\d{1,2}):(\d{2})([ap])m?$").unwrap()
});

/// A day pattern fused onto a time range with the column boundary lost
/// ("W8:00p-8:50p").
static FUSED_DAY_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z]{1,6}?)(\d{1,2}:\d{2}[ap]m?-\d{1,2}:\d{2}[ap]m?)$").unwrap()
});

/// Exam date token: optional weekday prefix, then a slash-delimited date
/// ("W 03/18/2026").
static EXAM_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:([a-z]{1,2}) +)?(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());

/// Units column ("4.00").
static UNITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,2}\.\d{2}$").unwrap());

/// Room code: 2-5 alphanumeric characters.
static ROOM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{2,5}$").unwrap());

/// Campus building codes seen in WebReg dumps. The fallback rule below
/// covers codes missing from this list.
const KNOWN_BUILDINGS: &[&str] = &[
    "APM", "CENTR", "CICC", "CSB", "DIB", "EBU1", "EBU2", "EBU3B", "FAH", "GH", "HSS", "LEDDN",
    "MANDE", "MCGIL", "MOS", "NSB", "PCYNH", "PETER", "PRICE", "RCLAS", "RWAC", "SEQUO", "SOLIS",
    "SSB", "TM102", "WLH", "YORK",
];

/// Parses a section code, correcting letter-O to zero in the digit
/// positions ("AO1" becomes "A01").
#[must_use]
pub fn parse_section_code(token: &str) -> Option<String> {
    let caps = SECTION_RE.captures(token)?;
    let mut code = caps[1].to_string();
    for digit in [&caps[2], &caps[3]] {
        if digit.eq_ignore_ascii_case("o") {
            code.push('0');
        } else {
            code.push_str(digit);
        }
    }
    Some(code)
}

/// Parses a course code into normalized "SUBJ NUM" form.
#[must_use]
pub fn parse_course_code(token: &str) -> Option<String> {
    let caps = COURSE_RE.captures(token)?;
    Some(format!("{} {}", &caps[1], &caps[2]))
}

/// Parses a session-type code from the closed two-letter vocabulary.
#[must_use]
pub fn parse_session_type(token: &str) -> Option<SessionKind> {
    if token.len() == 2 {
        SessionKind::from_code(token)
    } else {
        None
    }
}

/// Parses a time range like "9:00a-9:50a".
#[must_use]
pub fn parse_time_range(token: &str) -> Option<TimeRange> {
    let caps = TIME_RANGE_RE.captures(token)?;
    let start = parse_clock(&caps[1], &caps[2], &caps[3])?;
    let end = parse_clock(&caps[4], &caps[5], &caps[6])?;
    Some(TimeRange { start, end })
}

fn parse_clock(hour: &str, minute: &str, meridiem: &str) -> Option<TimeOfDay> {
    let hour12: u8 = hour.parse().ok()?;
    let minute: u8 = minute.parse().ok()?;
    let pm = meridiem.eq_ignore_ascii_case("p");
    TimeOfDay::from_clock(hour12, minute, pm)
}

/// Whether a token looks like an instructor name: contains a comma
/// separator and is not purely numeric.
#[must_use]
pub fn is_instructor_name(token: &str) -> bool {
    token.contains(',') && token.chars().any(char::is_alphabetic)
}

/// Parses a day-pattern token. Tokens on the curated building list are
/// rejected first so a building abbreviation is never read as days.
#[must_use]
pub fn parse_day_pattern_field(token: &str) -> Option<Vec<DayCode>> {
    if is_known_building(token) {
        return None;
    }
    days::parse_day_pattern(token)
}

/// Whether the token is on the curated building list.
#[must_use]
pub fn is_known_building(token: &str) -> bool {
    KNOWN_BUILDINGS.contains(&token)
}

/// Whether a token is a plausible building code: the curated list, plus a
/// fallback accepting short all-uppercase tokens that are not day patterns,
/// session-type codes, or the TBA sentinel.
#[must_use]
pub fn is_building_code(token: &str) -> bool {
    if is_known_building(token) {
        return true;
    }
    (2..=6).contains(&token.len())
        && token.chars().all(|c| c.is_ascii_uppercase())
        && token != "TBA"
        && parse_session_type(token).is_none()
        && days::parse_day_pattern(token).is_none()
}

/// Whether a token is a plausible room code.
#[must_use]
pub fn is_room_code(token: &str) -> bool {
    ROOM_RE.is_match(token)
}

/// Whether a token is the units column ("4.00").
#[must_use]
pub fn is_units_field(token: &str) -> bool {
    UNITS_RE.is_match(token)
}

/// Splits a fused day+time token ("W8:00p-8:50p") into its day and time
/// halves. Returns `None` unless both halves parse.
#[must_use]
pub fn split_fused_day_time(token: &str) -> Option<(Vec<DayCode>, TimeRange)> {
    let caps = FUSED_DAY_TIME_RE.captures(token)?;
    let time_text = caps.get(2)?.as_str();
    let days = days::parse_day_pattern(&caps[1])?;
    let time = parse_time_range(time_text)?;
    Some((days, time))
}

/// Parses an exam date token ("W 03/18/2026" or bare "03/18/2026").
/// The weekday prefix, when present, is advisory; the date itself is the
/// source of truth.
#[must_use]
pub fn parse_exam_date(token: &str) -> Option<NaiveDate> {
    let caps = EXAM_DATE_RE.captures(token)?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    let year: i32 = caps[4].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whether any field in a line carries a time range (fused or plain).
#[must_use]
pub fn line_has_time(fields: &[&str]) -> bool {
    fields
        .iter()
        .any(|f| parse_time_range(f).is_some() || split_fused_day_time(f).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_code_basic() {
        assert_eq!(parse_section_code("A00").as_deref(), Some("A00"));
        assert_eq!(parse_section_code("B12").as_deref(), Some("B12"));
        assert_eq!(parse_section_code("a01"), None);
        assert_eq!(parse_section_code("A1"), None);
        assert_eq!(parse_section_code("AB1"), None);
    }

    #[test]
    fn test_section_code_ocr_letter_o() {
        assert_eq!(parse_section_code("AO1").as_deref(), Some("A01"));
        assert_eq!(parse_section_code("AOO").as_deref(), Some("A00"));
    }

    #[test]
    fn test_course_code_shapes() {
        assert_eq!(parse_course_code("CSE 100").as_deref(), Some("CSE 100"));
        assert_eq!(parse_course_code("CSE100").as_deref(), Some("CSE 100"));
        assert_eq!(parse_course_code("MATH 20D").as_deref(), Some("MATH 20D"));
        assert_eq!(parse_course_code("BILD 3").as_deref(), Some("BILD 3"));
        assert_eq!(parse_course_code("CS 1"), Some("CS 1".into()));
        assert_eq!(parse_course_code("Advanced"), None);
        assert_eq!(parse_course_code("A00"), None);
        assert_eq!(parse_course_code("9:00a-9:50a"), None);
    }

    #[test]
    fn test_session_type_closed_vocabulary() {
        assert_eq!(parse_session_type("LE"), Some(SessionKind::Lecture));
        assert_eq!(parse_session_type("DI"), Some(SessionKind::Discussion));
        assert_eq!(parse_session_type("FI"), Some(SessionKind::FinalExam));
        assert_eq!(parse_session_type("PETER"), None);
        assert_eq!(parse_session_type("XX"), None);
    }

    #[test]
    fn test_time_range_parsing() {
        let range = parse_time_range("9:00a-9:50a").unwrap();
        assert_eq!(range.start, TimeOfDay { hour: 9, minute: 0 });
        assert_eq!(range.end, TimeOfDay { hour: 9, minute: 50 });

        let noon = parse_time_range("12:00p-1:00p").unwrap();
        assert_eq!(noon.start.hour, 12);
        assert_eq!(noon.end.hour, 13);

        let midnight = parse_time_range("12:00a-12:50a").unwrap();
        assert_eq!(midnight.start.hour, 0);
        assert_eq!(midnight.end.hour, 0);
        assert_eq!(midnight.end.minute, 50);
    }

    #[test]
    fn test_time_range_with_full_meridiem() {
        let range = parse_time_range("8:00pm-8:50pm").unwrap();
        assert_eq!(range.start.hour, 20);
        assert_eq!(range.end.hour, 20);
    }

    #[test]
    fn test_time_range_rejects_noise() {
        assert_eq!(parse_time_range("9:00-9:50"), None);
        assert_eq!(parse_time_range("MWF"), None);
        assert_eq!(parse_time_range("9:00a"), None);
    }

    #[test]
    fn test_instructor_name_predicate() {
        assert!(is_instructor_name("Sahoo, Debashis"));
        assert!(is_instructor_name("Smith,John"));
        assert!(!is_instructor_name("PETER"));
        assert!(!is_instructor_name("1,000"));
    }

    #[test]
    fn test_day_pattern_field_rejects_buildings() {
        // "MWF" parses even though it is short and uppercase.
        assert!(parse_day_pattern_field("MWF").is_some());
        // Known building codes never parse as day patterns.
        assert!(parse_day_pattern_field("PETER").is_none());
        assert!(parse_day_pattern_field("WLH").is_none());
    }

    #[test]
    fn test_building_fallback_rules() {
        assert!(is_building_code("PETER"));
        assert!(is_building_code("WLH"));
        // Unknown but plausible code passes the fallback.
        assert!(is_building_code("QRT"));
        // Sentinels and overlapping vocabularies are excluded.
        assert!(!is_building_code("TBA"));
        assert!(!is_building_code("LE"));
        assert!(!is_building_code("MWF"));
        assert!(!is_building_code("peter"));
        assert!(!is_building_code("A"));
    }

    #[test]
    fn test_room_code_shape() {
        assert!(is_room_code("108"));
        assert!(is_room_code("2154"));
        assert!(is_room_code("B250"));
        assert!(!is_room_code("1"));
        assert!(!is_room_code("108-B2"));
    }

    #[test]
    fn test_units_field() {
        assert!(is_units_field("4.00"));
        assert!(is_units_field("1.50"));
        assert!(!is_units_field("4"));
        assert!(!is_units_field("4.0"));
    }

    #[test]
    fn test_fused_day_time_split() {
        let (days, time) = split_fused_day_time("W8:00p-8:50p").unwrap();
        assert_eq!(days, vec![DayCode::Wednesday]);
        assert_eq!(time.start.hour, 20);

        let (days, time) = split_fused_day_time("TuTh9:30a-10:50a").unwrap();
        assert_eq!(days, vec![DayCode::Tuesday, DayCode::Thursday]);
        assert_eq!(time.start.hour, 9);
        assert_eq!(time.start.minute, 30);
    }

    #[test]
    fn test_fused_day_time_requires_both_halves() {
        assert!(split_fused_day_time("9:00a-9:50a").is_none());
        assert!(split_fused_day_time("X8:00p-8:50p").is_none());
        assert!(split_fused_day_time("MWF").is_none());
    }

    #[test]
    fn test_exam_date_with_weekday_prefix() {
        let date = parse_exam_date("W 03/18/2026").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 18).unwrap());
    }

    #[test]
    fn test_exam_date_bare() {
        let date = parse_exam_date("3/9/2026").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
    }

    #[test]
    fn test_exam_date_rejects_invalid() {
        assert_eq!(parse_exam_date("13/40/2026"), None);
        assert_eq!(parse_exam_date("03-18-2026"), None);
        assert_eq!(parse_exam_date("MWF"), None);
    }

    #[test]
    fn test_line_has_time() {
        assert!(line_has_time(&["A01", "DI", "W", "8:00p-8:50p"]));
        assert!(line_has_time(&["A01", "DI", "W8:00p-8:50p"]));
        assert!(!line_has_time(&["Sahoo,", "Debashis"]));
    }
}
