use super::{RawAnswer, RecordEvaluation, RecordKind};

const SPF_MARKER: &str = "v=spf1";

pub(crate) fn evaluate(answers: &[RawAnswer], include_limit: Option<usize>) -> RecordEvaluation {
    // Duplicate SPF records are a misconfiguration, but only the first one is
    // evaluated and the duplicates are not reported.
    let Some(answer) = answers
        .iter()
        .find(|answer| answer.data.contains(SPF_MARKER))
    else {
        return RecordEvaluation::missing(
            RecordKind::Spf,
            "No SPF record found",
            vec![
                "Add an SPF record to your DNS".to_string(),
                "Example: v=spf1 include:_spf.google.com ~all".to_string(),
            ],
        );
    };

    let record = answer.unquoted().to_string();
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if !has_all_mechanism(&record) {
        issues.push("SPF record should end with an 'all' mechanism".to_string());
        recommendations.push("Add ~all (softfail) or -all (hardfail) at the end".to_string());
    }

    if let Some(limit) = include_limit {
        if record.matches("include:").count() > limit {
            issues.push("Too many include mechanisms may cause DNS lookup limit issues".to_string());
            recommendations.push("Consolidate include mechanisms to reduce DNS lookups".to_string());
        }
    }

    RecordEvaluation::found(RecordKind::Spf, record, issues, recommendations)
}

fn has_all_mechanism(record: &str) -> bool {
    record.contains("~all") || record.contains("-all")
}
