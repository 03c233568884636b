//! Status → display descriptor tables shared by renderers.

use crate::auth::{OverallStatus, RecordEvaluation, RecordStatus, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Caution,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub label: &'static str,
    pub marker: &'static str,
    pub tone: Tone,
    pub headline: &'static str,
}

static OVERALL_PASS: Descriptor = Descriptor {
    label: "Pass",
    marker: "[PASS]",
    tone: Tone::Positive,
    headline: "Email authentication is properly configured",
};
static OVERALL_WARNING: Descriptor = Descriptor {
    label: "Warning",
    marker: "[WARN]",
    tone: Tone::Caution,
    headline: "Some email authentication records need attention",
};
static OVERALL_FAIL: Descriptor = Descriptor {
    label: "Fail",
    marker: "[FAIL]",
    tone: Tone::Negative,
    headline: "Critical email authentication records are missing",
};

static RECORD_VALID: Descriptor = Descriptor {
    label: "Valid",
    marker: "[OK]",
    tone: Tone::Positive,
    headline: "Record found and correctly configured",
};
static RECORD_WARNING: Descriptor = Descriptor {
    label: "Warning",
    marker: "[WARN]",
    tone: Tone::Caution,
    headline: "Record found with issues",
};
static RECORD_MISSING: Descriptor = Descriptor {
    label: "Missing",
    marker: "[MISSING]",
    tone: Tone::Negative,
    headline: "No record published",
};
static RECORD_INVALID: Descriptor = Descriptor {
    label: "Invalid",
    marker: "[INVALID]",
    tone: Tone::Negative,
    headline: "Record could not be used",
};

pub fn overall_descriptor(status: OverallStatus) -> &'static Descriptor {
    match status {
        OverallStatus::Pass => &OVERALL_PASS,
        OverallStatus::Warning => &OVERALL_WARNING,
        OverallStatus::Fail => &OVERALL_FAIL,
    }
}

pub fn record_descriptor(status: RecordStatus) -> &'static Descriptor {
    match status {
        RecordStatus::Valid => &RECORD_VALID,
        RecordStatus::Warning => &RECORD_WARNING,
        RecordStatus::Missing => &RECORD_MISSING,
        RecordStatus::Invalid => &RECORD_INVALID,
    }
}

/// Plain-text rendering of a report, one line per fact.
pub fn report_lines(report: &Report) -> Vec<String> {
    let overall = overall_descriptor(report.overall_status);
    let mut lines = vec![format!(
        "{} {} ({}) :: {}",
        overall.marker, report.email, report.domain, overall.headline
    )];
    for record in report.records() {
        record_lines(record, &mut lines);
    }
    lines
}

fn record_lines(record: &RecordEvaluation, lines: &mut Vec<String>) {
    let descriptor = record_descriptor(record.status);
    match &record.record {
        Some(value) => lines.push(format!(
            "  {:<5} {} {}",
            record.kind.as_str(),
            descriptor.marker,
            value
        )),
        None => lines.push(format!("  {:<5} {}", record.kind.as_str(), descriptor.marker)),
    }
    for issue in &record.issues {
        lines.push(format!("        issue: {issue}"));
    }
    for recommendation in &record.recommendations {
        lines.push(format!("        fix:   {recommendation}"));
    }
}
