use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};
use trust_dns_resolver::{
    TokioAsyncResolver,
    error::{ResolveError, ResolveErrorKind},
    lookup::TxtLookup,
};

use super::AuthError;

/// One TXT answer as returned by a resolver.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnswer {
    pub name: String,
    pub data: String,
}

impl RawAnswer {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Answer data with surrounding quote characters removed.
    pub fn unquoted(&self) -> &str {
        self.data.trim().trim_matches('"')
    }
}

/// TXT lookup seam used by every evaluator.
///
/// Implementations return `Ok(vec![])` when the name has no TXT record and
/// reserve `Err` for transport failures.
pub trait LookupTxt: Send + Sync {
    fn lookup_txt(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<RawAnswer>, AuthError>> + Send;
}

impl LookupTxt for TokioAsyncResolver {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<RawAnswer>, AuthError> {
        let lookup = match self.txt_lookup(name).await {
            Ok(lookup) => lookup,
            Err(err) => {
                if should_treat_as_empty(&err) {
                    return Ok(Vec::new());
                }
                return Err(AuthError::txt_lookup(name, err));
            }
        };
        collect_txt_records(name, &lookup)
    }
}

pub(crate) fn system_resolver() -> Result<TokioAsyncResolver, ResolveError> {
    TokioAsyncResolver::tokio_from_system_conf()
}

/// Runs one bounded lookup and folds timeouts and transport failures into an
/// empty answer set.
pub(crate) async fn lookup_or_empty<R>(
    resolver: &R,
    name: &str,
    timeout: Duration,
) -> Vec<RawAnswer>
where
    R: LookupTxt,
{
    let outcome = match tokio::time::timeout(timeout, resolver.lookup_txt(name)).await {
        Ok(result) => result,
        Err(_) => Err(AuthError::timeout(name, timeout)),
    };

    match outcome {
        Ok(answers) => {
            debug!(query = name, answers = answers.len(), "TXT lookup");
            answers
        }
        Err(err) => {
            warn!(query = name, error = %err, "TXT lookup failed, treating as no record");
            Vec::new()
        }
    }
}

pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", trimmed.to_ascii_lowercase(), domain)
    }
}

fn collect_txt_records(name: &str, lookup: &TxtLookup) -> Result<Vec<RawAnswer>, AuthError> {
    let mut records = Vec::new();
    for txt in lookup.iter() {
        let mut record = String::new();
        for piece in txt.txt_data().iter() {
            let segment = std::str::from_utf8(piece.as_ref())
                .map_err(|err| AuthError::txt_data_utf8(name, err))?;
            record.push_str(segment);
        }
        records.push(RawAnswer::new(name, record));
    }
    Ok(records)
}

fn should_treat_as_empty(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
