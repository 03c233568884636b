#[cfg(any(feature = "with-serde", feature = "with-csv"))]
use anyhow::Context;
use anyhow::{Result, bail};

use crate::args::Cli;
use mailyser_lib::{OverallStatus, Report, RequestState, report_lines};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[cfg_attr(feature = "with-serde", serde(untagged))]
#[derive(Debug, Clone)]
pub enum OutputRow {
    Report(Box<Report>),
    Rejected { email: String, error: String },
}

impl OutputRow {
    /// Row for the final state of one request.
    pub fn from_state(email: &str, state: &RequestState) -> Self {
        match state {
            RequestState::Succeeded(report) => Self::Report(report.clone()),
            RequestState::Failed { message } => Self::Rejected {
                email: email.to_string(),
                error: message.clone(),
            },
            RequestState::Idle | RequestState::Pending { .. } => Self::Rejected {
                email: email.to_string(),
                error: "check did not complete".to_string(),
            },
        }
    }

    fn failed(&self) -> bool {
        match self {
            Self::Report(report) => report.overall_status == OverallStatus::Fail,
            Self::Rejected { .. } => true,
        }
    }
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

pub fn any_failed(rows: &[OutputRow]) -> bool {
    rows.iter().any(OutputRow::failed)
}

fn write_human(rows: &[OutputRow]) -> Result<()> {
    for row in rows {
        match row {
            OutputRow::Report(report) => {
                for line in report_lines(report) {
                    println!("{line}");
                }
            }
            OutputRow::Rejected { email, error } => {
                println!("[INVALID] {email} :: {error}");
            }
        }
    }
    Ok(())
}

#[cfg(feature = "with-serde")]
fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=ndjson nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
const CSV_HEADER: [&str; 11] = [
    "email",
    "domain",
    "overall_status",
    "spf_status",
    "spf_record",
    "dmarc_status",
    "dmarc_record",
    "dkim_status",
    "dkim_record",
    "issues",
    "error",
];

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(CSV_HEADER)?;
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        wtr.write_record(CSV_HEADER)?;
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

#[cfg(feature = "with-csv")]
fn csv_record(row: &OutputRow) -> Vec<String> {
    match row {
        OutputRow::Report(report) => {
            let mut record = vec![
                report.email.clone(),
                report.domain.clone(),
                report.overall_status.as_str().to_string(),
            ];
            let mut issues = Vec::new();
            for evaluation in report.records() {
                record.push(evaluation.status.as_str().to_string());
                record.push(evaluation.record.clone().unwrap_or_default());
                issues.extend(evaluation.issues.iter().cloned());
            }
            record.push(issues.join("|"));
            record.push(String::new());
            record
        }
        OutputRow::Rejected { email, error } => {
            let mut record = vec![email.clone()];
            record.extend(std::iter::repeat_n(String::new(), CSV_HEADER.len() - 2));
            record.push(error.clone());
            record
        }
    }
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}

#[cfg(all(test, feature = "with-csv"))]
mod tests {
    use super::*;

    #[test]
    fn rejected_row_fills_every_csv_column() {
        let row = OutputRow::Rejected {
            email: "nobody".to_string(),
            error: "missing '@'".to_string(),
        };
        let record = csv_record(&row);
        assert_eq!(record.len(), CSV_HEADER.len());
        assert_eq!(record[0], "nobody");
        assert_eq!(record[CSV_HEADER.len() - 1], "missing '@'");
        assert!(record[1..CSV_HEADER.len() - 1].iter().all(String::is_empty));
    }

    #[test]
    fn report_row_lists_statuses_records_and_issues() {
        let report: Report = serde_json::from_value(serde_json::json!({
            "email": "a@example.com",
            "domain": "example.com",
            "overall_status": "warning",
            "spf": {"type": "SPF", "status": "valid", "record": "v=spf1 -all", "issues": [], "recommendations": []},
            "dmarc": {"type": "DMARC", "status": "warning", "record": "v=DMARC1; p=none", "issues": ["policy none"], "recommendations": []},
            "dkim": {"type": "DKIM", "status": "missing", "record": null, "issues": ["no key"], "recommendations": []},
            "timestamp": "2024-01-01T00:00:00Z"
        }))
        .expect("report json");

        let record = csv_record(&OutputRow::Report(Box::new(report)));
        assert_eq!(record.len(), CSV_HEADER.len());
        assert_eq!(
            record,
            [
                "a@example.com",
                "example.com",
                "warning",
                "valid",
                "v=spf1 -all",
                "warning",
                "v=DMARC1; p=none",
                "missing",
                "",
                "policy none|no key",
                "",
            ]
        );
    }
}
