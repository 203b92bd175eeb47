//! The structured session record produced by the schedule parser.
//!
//! One record describes one scheduled meeting pattern for one course: a
//! recurring lecture/discussion/lab, or a dated midterm/final exam. Records
//! are created by the line parsers inside the aggregator and may have their
//! section/instructor fields backfilled before the final list is handed to
//! the caller.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::days::{DayCode, pattern_string};

/// Kind of scheduled meeting, normalized from the WebReg two-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Lecture,
    Discussion,
    Lab,
    Midterm,
    FinalExam,
}

impl SessionKind {
    /// Parses a WebReg session-type code ("LE", "DI", "LA", "MI", "FI").
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "LE" => Some(Self::Lecture),
            "DI" => Some(Self::Discussion),
            "LA" => Some(Self::Lab),
            "MI" => Some(Self::Midterm),
            "FI" => Some(Self::FinalExam),
            _ => None,
        }
    }

    /// Returns the snake_case string used for serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Discussion => "discussion",
            Self::Lab => "lab",
            Self::Midterm => "midterm",
            Self::FinalExam => "final_exam",
        }
    }

    /// Human-readable label used in event summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lecture => "Lecture",
            Self::Discussion => "Discussion",
            Self::Lab => "Lab",
            Self::Midterm => "Midterm",
            Self::FinalExam => "Final Exam",
        }
    }

    /// Exam kinds carry a single dated occurrence instead of a weekly
    /// day pattern.
    #[must_use]
    pub const fn is_exam(self) -> bool {
        matches!(self, Self::Midterm | Self::FinalExam)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lecture" => Ok(Self::Lecture),
            "discussion" => Ok(Self::Discussion),
            "lab" => Ok(Self::Lab),
            "midterm" => Ok(Self::Midterm),
            "final_exam" => Ok(Self::FinalExam),
            _ => Err(format!("invalid session kind: {s}")),
        }
    }
}

impl Serialize for SessionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SessionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Wall-clock time of day in 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    /// Builds from a 12-hour clock reading plus meridiem marker.
    ///
    /// 12 AM maps to hour 0; PM hours other than 12 get +12.
    #[must_use]
    pub fn from_clock(hour12: u8, minute: u8, pm: bool) -> Option<Self> {
        if hour12 == 0 || hour12 > 12 || minute > 59 {
            return None;
        }
        let hour = match (hour12, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Some(Self { hour, minute })
    }

    /// Converts to a chrono time, if the fields are in range.
    #[must_use]
    pub fn to_naive(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A start/end time-of-day pair for one meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Meeting location. An absent location means "to be announced".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub building: String,
    pub room: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.room.is_empty() {
            f.write_str(&self.building)
        } else {
            write!(f, "{} {}", self.building, self.room)
        }
    }
}

/// Why a record is not yet ready for calendar synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// All fields needed for synthesis are present.
    Complete,
    /// Has a meeting time but the source gave no day pattern; needs
    /// confirmation rather than a guess.
    MissingDays,
    /// Has days (or an exam date) but no meeting time yet.
    MissingTime,
    /// Exam line without a parseable exam date.
    MissingExamDate,
    /// Neither days nor time scheduled yet.
    Tba,
}

impl ReviewStatus {
    /// Short human-readable reason shown in review reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::MissingDays => "missing day pattern",
            Self::MissingTime => "missing meeting time",
            Self::MissingExamDate => "missing exam date",
            Self::Tba => "days and time to be announced",
        }
    }
}

/// One scheduled meeting pattern for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub course_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    pub kind: SessionKind,
    /// Section the student is enrolled in; may be inherited from a
    /// sibling line in the same course block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    /// Weekly meeting days for recurring kinds. `None` means unknown or
    /// to-be-announced; exam kinds never carry a day pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<DayCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Exact calendar date for Midterm/FinalExam kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
}

impl SessionRecord {
    /// The weekday the exam falls on, derived from the exam date.
    #[must_use]
    pub fn exam_weekday(&self) -> Option<DayCode> {
        self.exam_date.map(|d| DayCode::from_weekday(d.weekday()))
    }

    /// Canonical day-pattern string ("MWF"), if days are known.
    #[must_use]
    pub fn day_pattern(&self) -> Option<String> {
        self.days.as_deref().map(pattern_string)
    }

    /// Whether the record carries everything calendar synthesis needs:
    /// course code, kind, a start time, and either a day pattern or an
    /// exam date.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.review_status() == ReviewStatus::Complete
    }

    /// Classifies what, if anything, still needs human review.
    #[must_use]
    pub fn review_status(&self) -> ReviewStatus {
        if self.course_code.is_empty() {
            return ReviewStatus::Tba;
        }
        if self.kind.is_exam() {
            return match (self.exam_date, self.time) {
                (Some(_), Some(_)) => ReviewStatus::Complete,
                (None, Some(_)) => ReviewStatus::MissingExamDate,
                (Some(_), None) => ReviewStatus::MissingTime,
                (None, None) => ReviewStatus::Tba,
            };
        }
        let has_days = self.days.as_ref().is_some_and(|d| !d.is_empty());
        match (has_days, self.time) {
            (true, Some(_)) => ReviewStatus::Complete,
            (false, Some(_)) => ReviewStatus::MissingDays,
            (true, None) => ReviewStatus::MissingTime,
            (false, None) => ReviewStatus::Tba,
        }
    }
}
