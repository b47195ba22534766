//! Report command: fetch the journal, compute attendance and print it.
//!
//! Days are keyed as `Mon-11-03-24` and listed in the order they first show
//! up in the journal. Weekday lines are blue, weekend lines grey and the
//! overtime total red.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use lt_core::attendance;
use lt_core::{AttendanceReport, DayBucket, DayReport, EventKind, LogSource};
use serde::Serialize;

use crate::Cli;
use crate::Config;
use crate::journal::{FileSource, JournalctlSource};

const DAY_FORMAT: &str = "%a-%d-%m-%y";
const TIME_FORMAT: &str = "%H:%M:%S";

const BLUE: &str = "34";
const GREY: &str = "90";
const RED: &str = "31";
const YELLOW: &str = "33";

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub color: bool,
    pub events: bool,
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("\x1b[{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn time_or_dash(t: Option<NaiveDateTime>) -> String {
    t.map_or_else(|| "--:--:--".to_string(), |t| t.format(TIME_FORMAT).to_string())
}

/// Formats one day line without color.
pub fn format_day(day: &DayReport, bucket: Option<&DayBucket>) -> String {
    let key = day.day.format(DAY_FORMAT);
    let span = format!(
        "{} - {}",
        time_or_dash(day.first_in),
        time_or_dash(day.last_out)
    );

    match (day.worked_hours, day.overtime_hours) {
        (Some(worked), Some(overtime)) => {
            let suffix = if day.is_weekday { "" } else { " (weekend)" };
            format!("{key}: {worked}h : {span} : {overtime:+.1}{suffix}")
        }
        _ => {
            let counts = bucket.map_or_else(String::new, |b| {
                format!(" ({} in, {} out)", b.ins.len(), b.outs.len())
            });
            format!("{key}: incomplete : {span}{counts}")
        }
    }
}

fn format_events(output: &mut String, bucket: &DayBucket) {
    writeln!(output, "{}:", bucket.day.format(DAY_FORMAT)).unwrap();
    for kind in [EventKind::In, EventKind::Out, EventKind::Unknown] {
        writeln!(output, "\t{kind}:").unwrap();
        for t in bucket.timestamps(kind) {
            writeln!(output, "\t\t{}", t.format(TIME_FORMAT)).unwrap();
        }
    }
}

/// Formats the human-readable report.
pub fn format_report(report: &AttendanceReport, days: u32, options: RenderOptions) -> String {
    let mut output = String::new();

    writeln!(output, "Report for the last {days} days").unwrap();

    let Some(start) = report.start_time else {
        writeln!(output).unwrap();
        writeln!(output, "No logind events found.").unwrap();
        return output;
    };
    writeln!(output).unwrap();
    writeln!(
        output,
        "Start of report: {}",
        start.format("%a-%d-%m-%y %H:%M:%S")
    )
    .unwrap();

    if options.events {
        writeln!(output).unwrap();
        writeln!(output, "Events:").unwrap();
        for bucket in &report.buckets {
            format_events(&mut output, bucket);
        }
    }

    writeln!(output).unwrap();
    writeln!(output, "Hours:").unwrap();
    writeln!(output).unwrap();
    for (day, bucket) in report.summary.days.iter().zip(&report.buckets) {
        let line = format_day(day, Some(bucket));
        let code = if !day.is_complete() {
            YELLOW
        } else if day.is_weekday {
            BLUE
        } else {
            GREY
        };
        writeln!(output, "{}", paint(&line, code, options.color)).unwrap();
    }

    let total = report.summary.overtime_total;
    if total != 0.0 {
        writeln!(output).unwrap();
        let line = format!("Extras : {total:+.1}");
        writeln!(output, "{}", paint(&line, RED, options.color)).unwrap();
    }

    output
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub days_requested: u32,
    pub start_time: Option<NaiveDateTime>,
    pub days: &'a [DayReport],
    pub overtime_total: f64,
    pub skipped_lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<&'a [DayBucket]>,
}

/// Formats the report as JSON.
pub fn format_report_json(
    report: &AttendanceReport,
    days: u32,
    options: RenderOptions,
) -> Result<String> {
    let json = JsonReport {
        days_requested: days,
        start_time: report.start_time,
        days: &report.summary.days,
        overtime_total: report.summary.overtime_total,
        skipped_lines: report.skipped_lines,
        events: options.events.then_some(report.buckets.as_slice()),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

fn log_source(cli: &Cli, config: &Config) -> Box<dyn LogSource> {
    match &cli.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(JournalctlSource::new(
            &config.journalctl,
            config.unit.clone(),
            cli.days,
        )),
    }
}

/// Runs the report command.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let user = config.resolve_user(cli.user.as_deref())?;
    let source = log_source(cli, config);

    let report = attendance::run(source.as_ref(), &user, &config.hours_config())
        .with_context(|| format!("failed to retrieve journal from {}", source.describe()))?;

    let incomplete = report.summary.incomplete_days().count();
    if incomplete > 0 {
        tracing::info!(incomplete, "some days lack a session start or end");
    }

    let options = RenderOptions {
        color: cli.color.enabled() && !cli.json,
        events: cli.events,
    };
    if cli.json {
        println!("{}", format_report_json(&report, cli.days, options)?);
    } else {
        print!("{}", format_report(&report, cli.days, options));
    }

    Ok(())
}
