//! Core domain logic for the logind attendance tracker.
//!
//! This crate contains the pure pipeline that turns systemd-logind journal
//! lines into a per-day attendance report:
//! - Classification: mapping a log message to an IN/OUT/UNKNOWN event
//! - Aggregation: grouping timestamped events into calendar-day buckets
//! - Hours: worked hours and overtime per day

pub mod aggregate;
pub mod attendance;
pub mod classify;
pub mod event_kind;
pub mod hours;
pub mod source;

pub use aggregate::{DayAggregator, DayBucket, TimestampedEvent, parse_timestamp};
pub use attendance::{AttendanceReport, analyze};
pub use classify::{LineClassifier, classify};
pub use event_kind::{EventKind, UnknownEventKind};
pub use hours::{
    DayReport, DayStatus, HoursConfig, HoursPolicy, STANDARD_DAY_HOURS, Summary, summarize,
};
pub use source::{FetchError, LogSource};
