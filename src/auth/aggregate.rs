use super::{OverallStatus, RecordStatus};

/// Folds the SPF, DMARC and DKIM statuses into one verdict.
///
/// Only the counts matter: two valid records pass, otherwise two missing
/// records fail, anything else is a warning.
pub fn overall_status(spf: RecordStatus, dmarc: RecordStatus, dkim: RecordStatus) -> OverallStatus {
    let statuses = [spf, dmarc, dkim];
    let valid = count(&statuses, RecordStatus::Valid);
    let missing = count(&statuses, RecordStatus::Missing);

    if valid >= 2 {
        OverallStatus::Pass
    } else if missing >= 2 {
        OverallStatus::Fail
    } else {
        OverallStatus::Warning
    }
}

fn count(statuses: &[RecordStatus], wanted: RecordStatus) -> usize {
    statuses.iter().filter(|status| **status == wanted).count()
}
