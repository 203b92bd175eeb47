//! Academic quarter date ranges and weekday arithmetic.
//!
//! Instructional date ranges come from a fixed lookup table, never derived
//! from the schedule text itself. An unknown term/year pair is a typed
//! error; the calendar math never guesses a range.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::days::DayCode;

/// The campus time zone used for meeting times and recurrence math.
pub const CAMPUS_TZ: Tz = chrono_tz::America::Los_Angeles;

/// Timezone identifier emitted into calendar documents.
pub const TZID: &str = "America/Los_Angeles";

/// Named academic terms with fixed instructional ranges per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    Fall,
    Winter,
    Spring,
    Summer1,
    Summer2,
}

impl Term {
    /// Returns the snake_case string used for serialization and file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fall => "fall",
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer1 => "summer1",
            Self::Summer2 => "summer2",
        }
    }

    /// Human-readable label used in event descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fall => "Fall",
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer1 => "Summer Session 1",
            Self::Summer2 => "Summer Session 2",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fall" | "fa" => Ok(Self::Fall),
            "winter" | "wi" => Ok(Self::Winter),
            "spring" | "sp" => Ok(Self::Spring),
            "summer1" | "s1" => Ok(Self::Summer1),
            "summer2" | "s2" => Ok(Self::Summer2),
            _ => Err(format!("invalid term: {s}")),
        }
    }
}

impl Serialize for Term {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Term {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Quarter lookup failures.
#[derive(Debug, Error)]
pub enum QuarterError {
    #[error("no instructional date range on record for {term} {year}")]
    UnknownQuarter { term: Term, year: i32 },
}

/// Instructional date range table: (term, year, first m/d, last m/d).
/// First/last instructional day, inclusive; finals week falls after the
/// last day and is reached only through explicit exam dates.
const QUARTER_TABLE: &[(Term, i32, (u32, u32), (u32, u32))] = &[
    (Term::Fall, 2024, (9, 26), (12, 6)),
    (Term::Winter, 2025, (1, 6), (3, 14)),
    (Term::Spring, 2025, (3, 31), (6, 6)),
    (Term::Summer1, 2025, (6, 30), (8, 1)),
    (Term::Summer2, 2025, (8, 4), (9, 5)),
    (Term::Fall, 2025, (9, 25), (12, 5)),
    (Term::Winter, 2026, (1, 5), (3, 13)),
    (Term::Spring, 2026, (3, 30), (6, 5)),
    (Term::Summer1, 2026, (6, 29), (7, 31)),
    (Term::Summer2, 2026, (8, 3), (9, 4)),
    (Term::Fall, 2026, (9, 24), (12, 4)),
    (Term::Winter, 2027, (1, 4), (3, 12)),
    (Term::Spring, 2027, (3, 29), (6, 4)),
];

/// First and last instructional date for one named quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterRange {
    pub term: Term,
    pub year: i32,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl QuarterRange {
    /// Looks up the instructional range for a term/year pair.
    pub fn lookup(term: Term, year: i32) -> Result<Self, QuarterError> {
        QUARTER_TABLE
            .iter()
            .find(|(t, y, _, _)| *t == term && *y == year)
            .and_then(|(_, _, first, last)| {
                Some(Self {
                    term,
                    year,
                    first_day: NaiveDate::from_ymd_opt(year, first.0, first.1)?,
                    last_day: NaiveDate::from_ymd_opt(year, last.0, last.1)?,
                })
            })
            .ok_or(QuarterError::UnknownQuarter { term, year })
    }

    /// Term and year as one label ("Winter 2026").
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.term.label(), self.year)
    }

    /// Finds the first calendar occurrence of a weekday on or after the
    /// range start, scanning date by date. Returns `None` when the weekday
    /// never occurs before the range end (degenerately short ranges).
    #[must_use]
    pub fn first_occurrence(&self, day: DayCode) -> Option<NaiveDate> {
        let target = day.to_weekday();
        let mut date = self.first_day;
        while date <= self.last_day {
            if date.weekday() == target {
                return Some(date);
            }
            date = date.succ_opt()?;
        }
        None
    }

    /// The recurrence termination instant: end of the last instructional
    /// day in campus local time, expressed in UTC as calendar documents
    /// require.
    #[must_use]
    pub fn recurrence_until(&self) -> DateTime<Utc> {
        let end_of_day = self
            .last_day
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| self.last_day.and_time(NaiveTime::MIN));
        // 23:59:59 is never inside a DST transition window; fall back to
        // reading the wall time as UTC if the zone lookup ever fails.
        CAMPUS_TZ
            .from_local_datetime(&end_of_day)
            .single()
            .map_or_else(
                || Utc.from_utc_datetime(&end_of_day),
                |dt| dt.with_timezone(&Utc),
            )
    }
}
