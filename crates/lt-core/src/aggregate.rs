//! Grouping of classified journal lines into calendar-day buckets.
//!
//! Lines must arrive in chronological order. Each bucket keeps its timestamps
//! in ingestion order, so "first" and "last" downstream only mean earliest
//! and latest when the input was sorted.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::classify::LineClassifier;
use crate::event_kind::EventKind;

/// Index of the first message token in `journalctl -o short-iso` output
/// (`<timestamp> <host> <unit>: <message...>`).
pub const MESSAGE_OFFSET: usize = 3;

/// Offset-qualified layouts; the offset is dropped, not applied.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses a leading journal timestamp token as naive local wall-clock time.
pub fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(token, fmt).ok())
        .map(|dt| dt.naive_local())
        .or_else(|| NaiveDateTime::parse_from_str(token, NAIVE_FORMAT).ok())
}

/// A classified event at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimestampedEvent {
    pub timestamp: NaiveDateTime,
    pub kind: EventKind,
}

/// Events attributed to one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub day: NaiveDate,
    #[serde(rename = "in")]
    pub ins: Vec<NaiveDateTime>,
    #[serde(rename = "out")]
    pub outs: Vec<NaiveDateTime>,
    pub unknown: Vec<NaiveDateTime>,
}

impl DayBucket {
    pub const fn new(day: NaiveDate) -> Self {
        Self {
            day,
            ins: Vec::new(),
            outs: Vec::new(),
            unknown: Vec::new(),
        }
    }

    fn push(&mut self, event: TimestampedEvent) {
        let target = match event.kind {
            EventKind::In => &mut self.ins,
            EventKind::Out => &mut self.outs,
            EventKind::Unknown => &mut self.unknown,
        };
        target.push(event.timestamp);
    }

    /// Timestamps recorded for `kind`, in ingestion order.
    pub fn timestamps(&self, kind: EventKind) -> &[NaiveDateTime] {
        match kind {
            EventKind::In => &self.ins,
            EventKind::Out => &self.outs,
            EventKind::Unknown => &self.unknown,
        }
    }

    /// Total number of events of any kind.
    pub fn len(&self) -> usize {
        self.ins.len() + self.outs.len() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accumulates journal lines into day buckets for a single run.
#[derive(Debug)]
pub struct DayAggregator {
    classifier: LineClassifier,
    buckets: Vec<DayBucket>,
    index: HashMap<NaiveDate, usize>,
    start_time: Option<NaiveDateTime>,
    skipped: usize,
}

impl DayAggregator {
    /// Creates an aggregator for journal lines in `short-iso` layout.
    pub fn new(current_user: impl Into<String>) -> Self {
        Self {
            classifier: LineClassifier::new(current_user),
            buckets: Vec::new(),
            index: HashMap::new(),
            start_time: None,
            skipped: 0,
        }
    }

    /// Ingests one raw journal line.
    ///
    /// Lines whose first token is not a timestamp (blank lines, `-- Boot ...`
    /// markers, `-- No entries --`) are counted and skipped.
    pub fn ingest(&mut self, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(timestamp) = tokens.first().and_then(|t| parse_timestamp(t)) else {
            tracing::debug!(line, "skipping line without a parseable timestamp");
            self.skipped += 1;
            return;
        };

        let message = tokens.get(MESSAGE_OFFSET..).unwrap_or_default();
        let kind = self.classifier.classify(message);
        self.record(TimestampedEvent { timestamp, kind });
    }

    /// Ingests every line of `text` in order.
    pub fn ingest_text(&mut self, text: &str) {
        for line in text.lines() {
            self.ingest(line);
        }
    }

    /// Appends an already classified event to its day's bucket.
    pub fn record(&mut self, event: TimestampedEvent) {
        self.start_time.get_or_insert(event.timestamp);

        let day = event.timestamp.date();
        let slot = *self.index.entry(day).or_insert_with(|| {
            self.buckets.push(DayBucket::new(day));
            self.buckets.len() - 1
        });
        self.buckets[slot].push(event);
    }

    /// Buckets in the order their day first appeared in the input.
    pub fn buckets(&self) -> &[DayBucket] {
        &self.buckets
    }

    pub fn bucket(&self, day: NaiveDate) -> Option<&DayBucket> {
        self.index.get(&day).map(|&slot| &self.buckets[slot])
    }

    /// First successfully parsed timestamp of the stream.
    pub const fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    /// Number of lines skipped for lack of a timestamp.
    pub const fn skipped_lines(&self) -> usize {
        self.skipped
    }

    pub fn into_buckets(self) -> Vec<DayBucket> {
        self.buckets
    }
}
