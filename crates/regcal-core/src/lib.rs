//! Core domain logic for the schedule-to-calendar converter.
//!
//! This crate contains the fundamental types and logic for:
//! - Parsing: turning a raw WebReg schedule dump into session records
//! - Quarter calendars: instructional date ranges and weekday arithmetic
//! - Synthesis: planning calendar events from complete records
//! - Serialization: emitting the events as an iCalendar document

pub mod aggregate;
pub mod days;
pub mod fields;
pub mod ics;
pub mod line;
pub mod quarter;
pub mod record;
pub mod synth;

pub use aggregate::{MIN_INPUT_LEN, ParseError, parse_schedule};
pub use days::DayCode;
pub use ics::{build_document, suggested_file_name};
pub use quarter::{QuarterError, QuarterRange, Term};
pub use record::{ReviewStatus, SessionKind, SessionRecord};
pub use synth::{EventPlan, SynthesisOutcome, plan_events};
