//! iCalendar document serialization.
//!
//! Emits one VCALENDAR with a fixed VTIMEZONE block for the campus zone
//! and one VEVENT per synthesized event plan. Meeting times are written as
//! TZID-qualified local wall clock; recurrence termination is absolute UTC
//! as RRULE requires.

use chrono::{NaiveDateTime, Utc};

use crate::days::DayCode;
use crate::quarter::{TZID, Term};
use crate::synth::EventPlan;

/// Institution slug used in suggested file names.
pub const INSTITUTION: &str = "ucsd";

const PRODID: &str = "-//regcal//WebReg Schedule//EN";

/// Escapes text for an iCalendar TEXT property value.
///
/// Escaped characters, in substitution order: backslash first (so later
/// substitutions cannot be double-escaped), then semicolon, comma, and all
/// line-break variants, which collapse to the literal `\n` sequence.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                // CRLF is one line break, not two.
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_text`] on the escaped character set.
#[must_use]
pub fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Suggested output name: `<institution>-<term>-<year>-schedule.ics`.
#[must_use]
pub fn suggested_file_name(term: Term, year: i32) -> String {
    format!("{INSTITUTION}-{term}-{year}-schedule.ics")
}

/// Serializes event plans into a complete iCalendar document.
#[must_use]
pub fn build_document(events: &[EventPlan]) -> String {
    let mut doc = String::new();
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    push_line(&mut doc, "BEGIN:VCALENDAR");
    push_line(&mut doc, "VERSION:2.0");
    push_line(&mut doc, &format!("PRODID:{PRODID}"));
    push_line(&mut doc, "CALSCALE:GREGORIAN");
    push_line(&mut doc, "METHOD:PUBLISH");
    push_timezone_block(&mut doc);

    for event in events {
        push_line(&mut doc, "BEGIN:VEVENT");
        push_line(&mut doc, &format!("UID:{}", event.uid));
        push_line(&mut doc, &format!("DTSTAMP:{stamp}"));
        push_line(
            &mut doc,
            &format!("DTSTART;TZID={TZID}:{}", format_local(event.start)),
        );
        push_line(
            &mut doc,
            &format!("DTEND;TZID={TZID}:{}", format_local(event.end)),
        );
        if let Some(recurrence) = &event.recurrence {
            push_line(
                &mut doc,
                &format!(
                    "RRULE:FREQ=WEEKLY;BYDAY={};UNTIL={}",
                    byday_code(recurrence.weekday),
                    recurrence.until.format("%Y%m%dT%H%M%SZ"),
                ),
            );
        }
        push_line(&mut doc, &format!("SUMMARY:{}", escape_text(&event.summary)));
        push_line(
            &mut doc,
            &format!("DESCRIPTION:{}", escape_text(&event.description)),
        );
        if let Some(location) = &event.location {
            push_line(&mut doc, &format!("LOCATION:{}", escape_text(location)));
        }
        push_line(&mut doc, "END:VEVENT");
    }

    push_line(&mut doc, "END:VCALENDAR");
    doc
}

fn push_line(doc: &mut String, line: &str) {
    doc.push_str(line);
    doc.push_str("\r\n");
}

/// Fixed timezone definition for the campus zone, covering the US
/// standard/daylight transition rules.
fn push_timezone_block(doc: &mut String) {
    for line in [
        "BEGIN:VTIMEZONE",
        "TZID:America/Los_Angeles",
        "X-LIC-LOCATION:America/Los_Angeles",
        "BEGIN:DAYLIGHT",
        "TZOFFSETFROM:-0800",
        "TZOFFSETTO:-0700",
        "TZNAME:PDT",
        "DTSTART:19700308T020000",
        "RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=2SU",
        "END:DAYLIGHT",
        "BEGIN:STANDARD",
        "TZOFFSETFROM:-0700",
        "TZOFFSETTO:-0800",
        "TZNAME:PST",
        "DTSTART:19701101T020000",
        "RRULE:FREQ=YEARLY;BYMONTH=11;BYDAY=1SU",
        "END:STANDARD",
        "END:VTIMEZONE",
    ] {
        push_line(doc, line);
    }
}

fn format_local(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

/// RRULE BYDAY code for a weekday.
const fn byday_code(day: DayCode) -> &'static str {
    match day {
        DayCode::Monday => "MO",
        DayCode::Tuesday => "TU",
        DayCode::Wednesday => "WE",
        DayCode::Thursday => "TH",
        DayCode::Friday => "FR",
        DayCode::Saturday => "SA",
        DayCode::Sunday => "SU",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Recurrence;
    use chrono::{NaiveDate, TimeZone};

    fn sample_event(recurring: bool) -> EventPlan {
        let start = NaiveDate::from_ymd_opt(2026, 1, 9)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 9)
            .unwrap()
            .and_hms_opt(9, 50, 0)
            .unwrap();
        EventPlan {
            uid: "cse100-lecture-winter2026-f@regcal".into(),
            summary: "CSE 100 - Lecture".into(),
            description: "Course: CSE 100\nTerm: Winter 2026".into(),
            location: Some("PETER 108".into()),
            start,
            end,
            recurrence: recurring.then(|| Recurrence {
                weekday: DayCode::Friday,
                until: Utc.with_ymd_and_hms(2026, 3, 14, 6, 59, 59).unwrap(),
            }),
        }
    }

    #[test]
    fn test_escape_order_backslash_first() {
        // A backslash in the input must not swallow later substitutions.
        assert_eq!(escape_text(r"a\b"), r"a\\b");
        assert_eq!(escape_text("a;b,c"), r"a\;b\,c");
        assert_eq!(escape_text("a\nb"), r"a\nb");
        assert_eq!(escape_text("a\r\nb"), r"a\nb");
        assert_eq!(escape_text("a\rb"), r"a\nb");
        assert_eq!(escape_text(r"\;"), r"\\\;");
    }

    #[test]
    fn test_escape_unescape_roundtrip() {
        for original in [
            "plain text",
            "semi;colon, and comma",
            "line\nbreak",
            r"back\slash",
            "all: \\, ;, \n together",
            "Instructor: Sahoo, Debashis\nLocation: PETER 108",
        ] {
            let escaped = escape_text(original);
            assert_eq!(unescape_text(&escaped), original.replace("\r\n", "\n"));
        }
    }

    #[test]
    fn test_document_envelope() {
        let doc = build_document(&[sample_event(true)]);
        assert!(doc.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(doc.ends_with("END:VCALENDAR\r\n"));
        assert!(doc.contains("VERSION:2.0\r\n"));
        // Exactly one timezone block.
        assert_eq!(doc.matches("BEGIN:VTIMEZONE").count(), 1);
        assert!(doc.contains("TZID:America/Los_Angeles\r\n"));
        assert!(doc.contains("TZNAME:PDT\r\n"));
        assert!(doc.contains("TZNAME:PST\r\n"));
    }

    #[test]
    fn test_recurring_event_block() {
        let doc = build_document(&[sample_event(true)]);
        assert!(doc.contains("UID:cse100-lecture-winter2026-f@regcal\r\n"));
        assert!(doc.contains("DTSTART;TZID=America/Los_Angeles:20260109T090000\r\n"));
        assert!(doc.contains("DTEND;TZID=America/Los_Angeles:20260109T095000\r\n"));
        assert!(doc.contains("RRULE:FREQ=WEEKLY;BYDAY=FR;UNTIL=20260314T065959Z\r\n"));
        assert!(doc.contains("SUMMARY:CSE 100 - Lecture\r\n"));
        assert!(doc.contains("LOCATION:PETER 108\r\n"));
    }

    #[test]
    fn test_single_event_has_no_rrule() {
        let doc = build_document(&[sample_event(false)]);
        assert!(!doc.contains("RRULE:FREQ=WEEKLY"));
    }

    #[test]
    fn test_description_escaped_in_document() {
        let mut event = sample_event(false);
        event.description = "Instructor: Sahoo, Debashis\nLocation: PETER 108".into();
        let doc = build_document(&[event]);
        assert!(doc.contains(r"DESCRIPTION:Instructor: Sahoo\, Debashis\nLocation: PETER 108"));
    }

    #[test]
    fn test_one_vevent_per_plan() {
        let doc = build_document(&[sample_event(true), sample_event(false)]);
        assert_eq!(doc.matches("BEGIN:VEVENT").count(), 2);
        assert_eq!(doc.matches("END:VEVENT").count(), 2);
    }

    #[test]
    fn test_suggested_file_name() {
        assert_eq!(
            suggested_file_name(Term::Winter, 2026),
            "ucsd-winter-2026-schedule.ics"
        );
        assert_eq!(
            suggested_file_name(Term::Summer1, 2025),
            "ucsd-summer1-2025-schedule.ics"
        );
    }
}
