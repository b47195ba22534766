//! Worked hours and overtime per day.
//!
//! A day is complete when its bucket has at least one IN and one OUT event.
//! Worked hours run from the first IN to the last OUT; overtime is measured
//! against a fixed standard day and only weekday overtime feeds the total.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::aggregate::DayBucket;

/// Length of a standard working day in hours.
pub const STANDARD_DAY_HOURS: f64 = 8.5;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;

/// How the elapsed time between first IN and last OUT becomes whole hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursPolicy {
    /// Only the time-of-day part of the elapsed duration counts: whole days
    /// are discarded and a negative span wraps around to the previous day.
    #[default]
    TimeOfDay,
    /// Whole hours of the full elapsed duration, truncated toward zero.
    TotalElapsed,
}

impl HoursPolicy {
    pub fn worked_hours(self, elapsed: TimeDelta) -> i64 {
        match self {
            Self::TimeOfDay => {
                // Whole seconds are floored, so -3600.3s is -3601s before wrapping.
                let seconds = elapsed.num_milliseconds().div_euclid(1_000);
                seconds.rem_euclid(SECONDS_PER_DAY) / SECONDS_PER_HOUR
            }
            Self::TotalElapsed => elapsed.num_hours(),
        }
    }
}

/// Parameters of the hours computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoursConfig {
    /// Hours a weekday must exceed to accrue overtime.
    pub standard_day_hours: f64,
    pub policy: HoursPolicy,
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            standard_day_hours: STANDARD_DAY_HOURS,
            policy: HoursPolicy::default(),
        }
    }
}

/// Whether a day had both ends of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayStatus {
    Complete,
    Incomplete,
}

/// Attendance figures for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    pub day: NaiveDate,
    pub status: DayStatus,
    pub first_in: Option<NaiveDateTime>,
    pub last_out: Option<NaiveDateTime>,
    pub worked_hours: Option<i64>,
    pub is_weekday: bool,
    /// Signed difference to the standard day; reported for weekends too.
    pub overtime_hours: Option<f64>,
}

impl DayReport {
    pub fn is_complete(&self) -> bool {
        self.status == DayStatus::Complete
    }

    /// Overtime this day adds to the running total.
    pub fn counted_overtime(&self) -> f64 {
        if self.is_weekday {
            self.overtime_hours.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Per-day reports plus the weekday overtime total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub days: Vec<DayReport>,
    pub overtime_total: f64,
}

impl Summary {
    pub fn incomplete_days(&self) -> impl Iterator<Item = &DayReport> {
        self.days.iter().filter(|d| !d.is_complete())
    }
}

fn is_weekday(day: NaiveDate) -> bool {
    day.weekday().num_days_from_monday() < 5
}

/// Computes the report for a single day bucket.
#[expect(clippy::cast_precision_loss, reason = "whole hours fit in f64")]
pub fn report_day(bucket: &DayBucket, config: &HoursConfig) -> DayReport {
    let first_in = bucket.ins.first().copied();
    let last_out = bucket.outs.last().copied();

    let (Some(start), Some(end)) = (first_in, last_out) else {
        tracing::warn!(
            day = %bucket.day,
            ins = bucket.ins.len(),
            outs = bucket.outs.len(),
            "day has no complete session"
        );
        return DayReport {
            day: bucket.day,
            status: DayStatus::Incomplete,
            first_in,
            last_out,
            worked_hours: None,
            is_weekday: is_weekday(first_in.map_or(bucket.day, |t| t.date())),
            overtime_hours: None,
        };
    };

    let worked = config.policy.worked_hours(end - start);
    DayReport {
        day: bucket.day,
        status: DayStatus::Complete,
        first_in,
        last_out,
        worked_hours: Some(worked),
        is_weekday: is_weekday(start.date()),
        overtime_hours: Some(worked as f64 - config.standard_day_hours),
    }
}

/// Summarizes buckets in the order given.
pub fn summarize(buckets: &[DayBucket], config: &HoursConfig) -> Summary {
    let days: Vec<DayReport> = buckets.iter().map(|b| report_day(b, config)).collect();
    let overtime_total: f64 = days.iter().map(DayReport::counted_overtime).sum();

    tracing::debug!(days = days.len(), overtime_total, "summarized day buckets");
    Summary {
        days,
        overtime_total,
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn bucket(day: &str, ins: &[&str], outs: &[&str]) -> DayBucket {
        let mut bucket = DayBucket::new(NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap());
        bucket.ins = ins.iter().map(|s| ts(s)).collect();
        bucket.outs = outs.iter().map(|s| ts(s)).collect();
        bucket
    }

    #[test]
    fn weekday_overtime_counts_toward_total() {
        // 2024-03-13 is a Wednesday
        let buckets = [bucket(
            "2024-03-13",
            &["2024-03-13 08:00:00"],
            &["2024-03-13 17:30:00"],
        )];
        let summary = summarize(&buckets, &HoursConfig::default());

        let day = &summary.days[0];
        assert_eq!(day.status, DayStatus::Complete);
        assert_eq!(day.worked_hours, Some(9));
        assert!(day.is_weekday);
        assert_eq!(day.overtime_hours, Some(0.5));
        assert_eq!(summary.overtime_total, 0.5);
    }

    #[test]
    fn weekend_overtime_is_reported_but_not_counted() {
        // 2024-03-16 is a Saturday
        let buckets = [bucket(
            "2024-03-16",
            &["2024-03-16 08:00:00"],
            &["2024-03-16 17:30:00"],
        )];
        let summary = summarize(&buckets, &HoursConfig::default());

        let day = &summary.days[0];
        assert_eq!(day.worked_hours, Some(9));
        assert!(!day.is_weekday);
        assert_eq!(day.overtime_hours, Some(0.5));
        assert_eq!(summary.overtime_total, 0.0);
    }

    #[test]
    fn missing_in_is_incomplete_and_not_counted() {
        let buckets = [
            bucket("2024-03-13", &[], &["2024-03-13 17:30:00"]),
            bucket(
                "2024-03-14",
                &["2024-03-14 08:00:00"],
                &["2024-03-14 15:00:00"],
            ),
        ];
        let summary = summarize(&buckets, &HoursConfig::default());

        let incomplete = &summary.days[0];
        assert_eq!(incomplete.status, DayStatus::Incomplete);
        assert_eq!(incomplete.first_in, None);
        assert_eq!(incomplete.last_out, Some(ts("2024-03-13 17:30:00")));
        assert_eq!(incomplete.worked_hours, None);
        assert_eq!(incomplete.overtime_hours, None);
        assert!(incomplete.is_weekday);

        assert_eq!(summary.days[1].overtime_hours, Some(-1.5));
        assert_eq!(summary.overtime_total, -1.5);
        assert_eq!(summary.incomplete_days().count(), 1);
    }

    #[test]
    fn missing_out_is_incomplete() {
        let buckets = [bucket("2024-03-13", &["2024-03-13 08:00:00"], &[])];
        let summary = summarize(&buckets, &HoursConfig::default());
        assert_eq!(summary.days[0].status, DayStatus::Incomplete);
        assert_eq!(summary.overtime_total, 0.0);
    }

    #[test]
    fn uses_first_in_and_last_out() {
        let buckets = [bucket(
            "2024-03-13",
            &["2024-03-13 07:10:00", "2024-03-13 13:00:00"],
            &["2024-03-13 12:00:00", "2024-03-13 18:20:00"],
        )];
        let report = &summarize(&buckets, &HoursConfig::default()).days[0];
        assert_eq!(report.first_in, Some(ts("2024-03-13 07:10:00")));
        assert_eq!(report.last_out, Some(ts("2024-03-13 18:20:00")));
        assert_eq!(report.worked_hours, Some(11));
    }

    #[test]
    fn partial_hours_are_floored() {
        let buckets = [bucket(
            "2024-03-13",
            &["2024-03-13 08:00:00"],
            &["2024-03-13 16:59:59"],
        )];
        let report = &summarize(&buckets, &HoursConfig::default()).days[0];
        assert_eq!(report.worked_hours, Some(8));
        assert_eq!(report.overtime_hours, Some(-0.5));
    }

    #[test]
    fn time_of_day_policy_discards_whole_days() {
        let elapsed = ts("2024-03-14 10:00:00") - ts("2024-03-13 08:00:00");
        assert_eq!(HoursPolicy::TimeOfDay.worked_hours(elapsed), 2);
        assert_eq!(HoursPolicy::TotalElapsed.worked_hours(elapsed), 26);
    }

    #[test]
    fn time_of_day_policy_wraps_negative_spans() {
        // Last OUT before first IN, e.g. closed at 09:00 then opened at 10:00.
        let elapsed = ts("2024-03-13 09:00:00") - ts("2024-03-13 10:00:00");
        assert_eq!(HoursPolicy::TimeOfDay.worked_hours(elapsed), 23);
        assert_eq!(HoursPolicy::TotalElapsed.worked_hours(elapsed), -1);
    }

    #[test]
    fn time_of_day_policy_floors_fractional_seconds() {
        let at = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap();
        let elapsed = at("2024-03-13 09:00:00.2") - at("2024-03-13 10:00:00.5");
        assert_eq!(HoursPolicy::TimeOfDay.worked_hours(elapsed), 22);
        assert_eq!(HoursPolicy::TotalElapsed.worked_hours(elapsed), -1);

        let elapsed = at("2024-03-13 17:59:59.9") - at("2024-03-13 09:00:00.5");
        assert_eq!(HoursPolicy::TimeOfDay.worked_hours(elapsed), 8);
    }

    #[test]
    fn custom_standard_day() {
        let config = HoursConfig {
            standard_day_hours: 8.0,
            policy: HoursPolicy::TotalElapsed,
        };
        let buckets = [bucket(
            "2024-03-13",
            &["2024-03-13 08:00:00"],
            &["2024-03-13 17:30:00"],
        )];
        let summary = summarize(&buckets, &config);
        assert_eq!(summary.overtime_total, 1.0);
    }

    #[test]
    fn report_order_follows_bucket_order() {
        let buckets = [
            bucket("2024-03-15", &["2024-03-15 08:00:00"], &["2024-03-15 17:00:00"]),
            bucket("2024-03-11", &["2024-03-11 08:00:00"], &["2024-03-11 17:00:00"]),
        ];
        let days: Vec<_> = summarize(&buckets, &HoursConfig::default())
            .days
            .iter()
            .map(|d| d.day.to_string())
            .collect();
        assert_eq!(days, ["2024-03-15", "2024-03-11"]);
    }

    #[test]
    fn summarize_is_idempotent() {
        let buckets = [
            bucket("2024-03-13", &["2024-03-13 08:00:00"], &["2024-03-13 17:30:00"]),
            bucket("2024-03-16", &[], &["2024-03-16 12:00:00"]),
        ];
        let config = HoursConfig::default();
        assert_eq!(summarize(&buckets, &config), summarize(&buckets, &config));
    }

    #[test]
    fn policy_deserializes_from_snake_case() {
        let policy: HoursPolicy = serde_json::from_str("\"total_elapsed\"").unwrap();
        assert_eq!(policy, HoursPolicy::TotalElapsed);
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&DayStatus::Incomplete).unwrap(),
            "\"INCOMPLETE\""
        );
    }
}
