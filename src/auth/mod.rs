//! SPF / DMARC / DKIM deliverability check for the domain of an e-mail address.
//!
//! [`check`] resolves through the system configuration; [`check_with_resolver`]
//! accepts any [`LookupTxt`] implementation. [`Checker`] adds last-request-wins
//! cancellation on top of the same evaluation.

mod aggregate;
mod checker;
mod dkim;
mod dmarc;
mod domain;
mod error;
mod resolver;
mod spf;
mod types;

pub use aggregate::overall_status;
pub use checker::{Checker, PendingCheck};
pub use domain::{ExtractedDomain, extract_domain};
pub use error::{AuthError, CheckError};
pub use resolver::{LookupTxt, RawAnswer};
pub use types::{
    CheckOptions, DkimStrategy, OverallStatus, RecordEvaluation, RecordKind, RecordStatus, Report,
};

use resolver::{fqdn, lookup_or_empty, system_resolver};
use tracing::debug;

/// Checks the domain of `email` with default options and the system resolver.
pub async fn check(email: &str) -> Result<Report, CheckError> {
    check_with_options(email, &CheckOptions::default()).await
}

pub async fn check_with_options(email: &str, options: &CheckOptions) -> Result<Report, CheckError> {
    let extracted = extract_domain(email)?;
    let resolver = system_resolver().map_err(CheckError::resolver_init)?;
    Ok(evaluate_domain(&resolver, email, extracted, options).await)
}

/// Same as [`check_with_options`] with a caller-provided resolver.
///
/// Input is validated before the first query: a malformed address never
/// reaches the resolver.
pub async fn check_with_resolver<R>(
    resolver: &R,
    email: &str,
    options: &CheckOptions,
) -> Result<Report, CheckError>
where
    R: LookupTxt,
{
    let extracted = extract_domain(email)?;
    Ok(evaluate_domain(resolver, email, extracted, options).await)
}

async fn evaluate_domain<R>(
    resolver: &R,
    email: &str,
    extracted: ExtractedDomain,
    options: &CheckOptions,
) -> Report
where
    R: LookupTxt,
{
    let ascii = extracted.ascii.as_str();
    let dmarc_name = fqdn("_dmarc", ascii);
    let timeout = options.timeout();

    let (spf, dmarc, dkim) = tokio::join!(
        async {
            let answers = lookup_or_empty(resolver, ascii, timeout).await;
            spf::evaluate(&answers, options.spf_include_limit())
        },
        async {
            let answers = lookup_or_empty(resolver, &dmarc_name, timeout).await;
            dmarc::evaluate(&answers)
        },
        dkim::evaluate(resolver, ascii, options),
    );

    let report = Report::new(email.trim().to_string(), extracted.domain, spf, dmarc, dkim);
    debug!(
        domain = %report.domain,
        spf = report.spf.status.as_str(),
        dmarc = report.dmarc.status.as_str(),
        dkim = report.dkim.status.as_str(),
        overall = report.overall_status.as_str(),
        "DNS authentication check complete"
    );
    report
}
