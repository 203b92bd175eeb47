//! Weekday code normalization for OCR-noised day patterns.
//!
//! WebReg prints meeting days as concatenated abbreviations ("MWF", "TuTh").
//! OCR output of a schedule screenshot garbles these in predictable ways:
//! a stray "E" where an "F" belongs, trailing punctuation artifacts, or
//! embedded spaces from lost column boundaries. This module canonicalizes
//! a raw day substring into an ordered, duplicate-free code sequence.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Canonical weekday code as printed by WebReg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCode {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayCode {
    /// Returns the canonical schedule abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "M",
            Self::Tuesday => "Tu",
            Self::Wednesday => "W",
            Self::Thursday => "Th",
            Self::Friday => "F",
            Self::Saturday => "Sa",
            Self::Sunday => "Su",
        }
    }

    /// Converts to the chrono weekday for date arithmetic.
    #[must_use]
    pub const fn to_weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Tuesday => Weekday::Tue,
            Self::Wednesday => Weekday::Wed,
            Self::Thursday => Weekday::Thu,
            Self::Friday => Weekday::Fri,
            Self::Saturday => Weekday::Sat,
            Self::Sunday => Weekday::Sun,
        }
    }

    /// Converts from a chrono weekday.
    #[must_use]
    pub const fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" => Ok(Self::Monday),
            "tu" => Ok(Self::Tuesday),
            "w" => Ok(Self::Wednesday),
            "th" => Ok(Self::Thursday),
            "f" => Ok(Self::Friday),
            "sa" => Ok(Self::Saturday),
            "su" => Ok(Self::Sunday),
            _ => Err(format!("invalid day code: {s}")),
        }
    }
}

impl Serialize for DayCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DayCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Trailing glyphs the OCR engine produces at column edges.
const OCR_ARTIFACTS: &[char] = &['.', ',', ';', ':', '|', '\'', '`'];

/// Exact canonical mappings for the day combinations WebReg actually prints.
/// Checked before the greedy scan so the common cases take one lookup.
const KNOWN_COMBOS: &[(&str, &[DayCode])] = &[
    ("mwf", &[DayCode::Monday, DayCode::Wednesday, DayCode::Friday]),
    ("mw", &[DayCode::Monday, DayCode::Wednesday]),
    ("wf", &[DayCode::Wednesday, DayCode::Friday]),
    ("mf", &[DayCode::Monday, DayCode::Friday]),
    ("tuth", &[DayCode::Tuesday, DayCode::Thursday]),
    (
        "mtuwthf",
        &[
            DayCode::Monday,
            DayCode::Tuesday,
            DayCode::Wednesday,
            DayCode::Thursday,
            DayCode::Friday,
        ],
    ),
];

/// Two-letter codes must be consumed before one-letter codes: "th" is
/// Thursday, not a "T" followed by a stray "h".
const TWO_LETTER_CODES: &[(&str, DayCode)] = &[
    ("tu", DayCode::Tuesday),
    ("th", DayCode::Thursday),
    ("sa", DayCode::Saturday),
    ("su", DayCode::Sunday),
];

const ONE_LETTER_CODES: &[(&str, DayCode)] = &[
    ("m", DayCode::Monday),
    ("w", DayCode::Wednesday),
    ("f", DayCode::Friday),
];

/// Parses a raw day-pattern substring into an ordered, duplicate-free
/// sequence of day codes. Returns `None` when any character cannot be
/// attributed to a weekday after OCR correction.
#[must_use]
pub fn parse_day_pattern(raw: &str) -> Option<Vec<DayCode>> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        // "E" never occurs in a day abbreviation; it is an OCR misread of "F".
        .map(|c| if c == 'E' || c == 'e' { 'f' } else { c })
        .collect();

    while cleaned.ends_with(OCR_ARTIFACTS) {
        cleaned.pop();
    }

    let lower = cleaned.to_ascii_lowercase();
    if lower.is_empty() {
        return None;
    }

    for (combo, codes) in KNOWN_COMBOS {
        if lower == *combo {
            return Some(codes.to_vec());
        }
    }

    let mut days: Vec<DayCode> = Vec::new();
    let mut rest = lower.as_str();
    'scan: while !rest.is_empty() {
        for (code, day) in TWO_LETTER_CODES {
            if let Some(tail) = rest.strip_prefix(code) {
                push_unique(&mut days, *day);
                rest = tail;
                continue 'scan;
            }
        }
        for (code, day) in ONE_LETTER_CODES {
            if let Some(tail) = rest.strip_prefix(code) {
                push_unique(&mut days, *day);
                rest = tail;
                continue 'scan;
            }
        }
        return None;
    }

    if days.is_empty() { None } else { Some(days) }
}

/// Normalizes a raw day-pattern substring into its canonical string form.
///
/// Idempotent: normalizing an already-canonical pattern returns it unchanged.
#[must_use]
pub fn normalize_day_pattern(raw: &str) -> Option<String> {
    parse_day_pattern(raw).map(|days| pattern_string(&days))
}

/// Renders a day sequence in canonical concatenated form ("MWF", "TuTh").
#[must_use]
pub fn pattern_string(days: &[DayCode]) -> String {
    days.iter().map(|d| d.as_str()).collect()
}

fn push_unique(days: &mut Vec<DayCode>, day: DayCode) {
    if !days.contains(&day) {
        days.push(day);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_common_patterns() {
        assert_eq!(normalize_day_pattern("MWF").as_deref(), Some("MWF"));
        assert_eq!(normalize_day_pattern("TuTh").as_deref(), Some("TuTh"));
        assert_eq!(normalize_day_pattern("MW").as_deref(), Some("MW"));
        assert_eq!(normalize_day_pattern("WF").as_deref(), Some("WF"));
        assert_eq!(normalize_day_pattern("M").as_deref(), Some("M"));
        assert_eq!(normalize_day_pattern("W").as_deref(), Some("W"));
        assert_eq!(normalize_day_pattern("F").as_deref(), Some("F"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["MWE", "TuTh", "t h", "mwf", "MTuWThF", "Sa", "w f."] {
            let once = normalize_day_pattern(raw);
            let twice = once.as_deref().and_then(normalize_day_pattern);
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_ocr_stray_e_corrected_to_f() {
        assert_eq!(normalize_day_pattern("MWE").as_deref(), Some("MWF"));
        assert_eq!(normalize_day_pattern("MWF").as_deref(), Some("MWF"));
        assert_eq!(normalize_day_pattern("E").as_deref(), Some("F"));
    }

    #[test]
    fn test_trailing_artifacts_dropped() {
        assert_eq!(normalize_day_pattern("MWF.").as_deref(), Some("MWF"));
        assert_eq!(normalize_day_pattern("TuTh|").as_deref(), Some("TuTh"));
        assert_eq!(normalize_day_pattern("M,").as_deref(), Some("M"));
    }

    #[test]
    fn test_two_letter_codes_win_over_one_letter() {
        // "Th" must parse as Thursday, never as "T" plus a leftover "h".
        assert_eq!(normalize_day_pattern("Th").as_deref(), Some("Th"));
        assert_eq!(normalize_day_pattern("T h").as_deref(), Some("Th"));
        assert_eq!(normalize_day_pattern("TuTh").as_deref(), Some("TuTh"));
    }

    #[test]
    fn test_embedded_whitespace_stripped() {
        assert_eq!(normalize_day_pattern("M W F").as_deref(), Some("MWF"));
        assert_eq!(normalize_day_pattern(" Tu Th ").as_deref(), Some("TuTh"));
    }

    #[test]
    fn test_mixed_case_accepted() {
        assert_eq!(normalize_day_pattern("mwf").as_deref(), Some("MWF"));
        assert_eq!(normalize_day_pattern("tuth").as_deref(), Some("TuTh"));
        assert_eq!(normalize_day_pattern("TUTH").as_deref(), Some("TuTh"));
    }

    #[test]
    fn test_duplicates_collapsed() {
        assert_eq!(normalize_day_pattern("MM").as_deref(), Some("M"));
        assert_eq!(normalize_day_pattern("MWFW").as_deref(), Some("MWF"));
    }

    #[test]
    fn test_unrecognized_input_rejected() {
        assert_eq!(normalize_day_pattern(""), None);
        assert_eq!(normalize_day_pattern("   "), None);
        assert_eq!(normalize_day_pattern("XYZ"), None);
        assert_eq!(normalize_day_pattern("MQ"), None);
        // Bare "T" is ambiguous and not a valid one-letter code.
        assert_eq!(normalize_day_pattern("T"), None);
    }

    #[test]
    fn test_weekend_codes() {
        assert_eq!(normalize_day_pattern("Sa").as_deref(), Some("Sa"));
        assert_eq!(normalize_day_pattern("SaSu").as_deref(), Some("SaSu"));
    }

    #[test]
    fn test_full_week_combo() {
        assert_eq!(
            normalize_day_pattern("MTuWThF").as_deref(),
            Some("MTuWThF")
        );
    }

    #[test]
    fn test_day_code_roundtrip() {
        for day in [
            DayCode::Monday,
            DayCode::Tuesday,
            DayCode::Wednesday,
            DayCode::Thursday,
            DayCode::Friday,
            DayCode::Saturday,
            DayCode::Sunday,
        ] {
            let parsed: DayCode = day.as_str().parse().unwrap();
            assert_eq!(parsed, day);
            assert_eq!(DayCode::from_weekday(day.to_weekday()), day);
        }
    }

    #[test]
    fn test_day_code_serde_matches_as_str() {
        let value = serde_json::to_value(DayCode::Thursday).unwrap();
        assert_eq!(value.as_str(), Some("Th"));
        let back: DayCode = serde_json::from_value(value).unwrap();
        assert_eq!(back, DayCode::Thursday);
    }
}
