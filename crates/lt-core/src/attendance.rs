//! The fetch, aggregate and summarize pipeline.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::aggregate::{DayAggregator, DayBucket};
use crate::hours::{HoursConfig, Summary, summarize};
use crate::source::{FetchError, LogSource};

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceReport {
    /// First parsed timestamp of the input.
    pub start_time: Option<NaiveDateTime>,
    /// Raw classified events per day, in first-appearance order.
    pub buckets: Vec<DayBucket>,
    /// Lines dropped for lack of a timestamp.
    pub skipped_lines: usize,
    #[serde(flatten)]
    pub summary: Summary,
}

/// Builds the report from already retrieved log text.
pub fn analyze(text: &str, current_user: &str, config: &HoursConfig) -> AttendanceReport {
    let mut aggregator = DayAggregator::new(current_user);
    aggregator.ingest_text(text);

    let start_time = aggregator.start_time();
    let skipped_lines = aggregator.skipped_lines();
    let buckets = aggregator.into_buckets();
    let summary = summarize(&buckets, config);

    tracing::info!(
        days = buckets.len(),
        skipped_lines,
        overtime_total = summary.overtime_total,
        "analyzed journal"
    );

    AttendanceReport {
        start_time,
        buckets,
        skipped_lines,
        summary,
    }
}

/// Fetches log text from `source` and analyzes it.
///
/// A failed fetch is returned as-is; nothing is aggregated in that case.
pub fn run(
    source: &dyn LogSource,
    current_user: &str,
    config: &HoursConfig,
) -> Result<AttendanceReport, FetchError> {
    tracing::debug!(source = %source.describe(), current_user, "fetching journal");
    let text = source.fetch()?;
    Ok(analyze(&text, current_user, config))
}
