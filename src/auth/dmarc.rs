use super::{RawAnswer, RecordEvaluation, RecordKind};

const DMARC_MARKER: &str = "v=DMARC1";
const MONITORING_POLICY: &str = "p=none";

pub(crate) fn evaluate(answers: &[RawAnswer]) -> RecordEvaluation {
    let Some(answer) = answers
        .iter()
        .find(|answer| answer.data.contains(DMARC_MARKER))
    else {
        return RecordEvaluation::missing(
            RecordKind::Dmarc,
            "No DMARC record found",
            vec![
                "Add a DMARC record to your DNS".to_string(),
                "Example: v=DMARC1; p=quarantine; rua=mailto:dmarc@yourdomain.com".to_string(),
            ],
        );
    };

    let record = answer.unquoted().to_string();
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if record.contains(MONITORING_POLICY) {
        issues.push("DMARC policy is set to 'none' - emails won't be protected".to_string());
        recommendations.push("Consider upgrading to p=quarantine or p=reject".to_string());
    }

    RecordEvaluation::found(RecordKind::Dmarc, record, issues, recommendations)
}
