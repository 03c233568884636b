use std::time::Duration;

use chrono::{DateTime, Utc};

pub(crate) const DEFAULT_DKIM_SELECTORS: [&str; 3] = ["default", "selector1", "google"];

pub(crate) const EXTENDED_DKIM_SELECTORS: [&str; 8] = [
    "selector2", "k1", "dkim", "mail", "email", "mxvault", "pps1", "x",
];

const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    #[cfg_attr(feature = "with-serde", serde(rename = "SPF"))]
    Spf,
    #[cfg_attr(feature = "with-serde", serde(rename = "DMARC"))]
    Dmarc,
    #[cfg_attr(feature = "with-serde", serde(rename = "DKIM"))]
    Dkim,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spf => "SPF",
            Self::Dmarc => "DMARC",
            Self::Dkim => "DKIM",
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    Valid,
    Warning,
    Missing,
    Invalid,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Warning => "warning",
            Self::Missing => "missing",
            Self::Invalid => "invalid",
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverallStatus {
    Pass,
    Warning,
    Fail,
}

impl OverallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warning => "warning",
            Self::Fail => "fail",
        }
    }
}

/// Outcome of one record check (SPF, DMARC or DKIM).
///
/// `record` is `None` whenever the status is [`RecordStatus::Missing`], and
/// `issues` is never empty unless the status is [`RecordStatus::Valid`].
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEvaluation {
    #[cfg_attr(feature = "with-serde", serde(rename = "type"))]
    pub kind: RecordKind,
    pub status: RecordStatus,
    pub record: Option<String>,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl RecordEvaluation {
    pub(crate) fn valid(kind: RecordKind, record: String) -> Self {
        Self {
            kind,
            status: RecordStatus::Valid,
            record: Some(record),
            issues: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    pub(crate) fn missing(kind: RecordKind, issue: &str, recommendations: Vec<String>) -> Self {
        Self {
            kind,
            status: RecordStatus::Missing,
            record: None,
            issues: vec![issue.to_string()],
            recommendations,
        }
    }

    /// Builds a found-record evaluation: warning when any issue was raised.
    pub(crate) fn found(
        kind: RecordKind,
        record: String,
        issues: Vec<String>,
        recommendations: Vec<String>,
    ) -> Self {
        let status = if issues.is_empty() {
            RecordStatus::Valid
        } else {
            RecordStatus::Warning
        };
        Self {
            kind,
            status,
            record: Some(record),
            issues,
            recommendations,
        }
    }
}

/// Immutable result of one `check` invocation.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub email: String,
    pub domain: String,
    pub overall_status: OverallStatus,
    pub spf: RecordEvaluation,
    pub dmarc: RecordEvaluation,
    pub dkim: RecordEvaluation,
    pub timestamp: DateTime<Utc>,
}

impl Report {
    pub(crate) fn new(
        email: String,
        domain: String,
        spf: RecordEvaluation,
        dmarc: RecordEvaluation,
        dkim: RecordEvaluation,
    ) -> Self {
        let overall_status = super::aggregate::overall_status(spf.status, dmarc.status, dkim.status);
        Self {
            email,
            domain,
            overall_status,
            spf,
            dmarc,
            dkim,
            timestamp: Utc::now(),
        }
    }

    pub fn records(&self) -> [&RecordEvaluation; 3] {
        [&self.spf, &self.dmarc, &self.dkim]
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DkimStrategy {
    /// All selectors are queried at once, the priority order is applied afterwards.
    #[default]
    Concurrent,
    /// Selectors are queried one after the other, stopping at the first hit.
    Sequential,
}

/// Configuration knobs for [`check_with_options`](super::check_with_options).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    dkim_selectors: Vec<String>,
    timeout_ms: u64,
    dkim_strategy: DkimStrategy,
    spf_include_limit: Option<usize>,
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with an empty selector list, to be filled with
    /// [`with_dkim_selector`](Self::with_dkim_selector).
    pub fn without_selectors() -> Self {
        Self {
            dkim_selectors: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_dkim_selector(mut self, selector: impl Into<String>) -> Self {
        if let Some(normalized) = normalize_selector(selector.into()) {
            if !self.dkim_selectors.contains(&normalized) {
                self.dkim_selectors.push(normalized);
            }
        }
        self
    }

    pub fn with_dkim_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for selector in selectors {
            self = self.with_dkim_selector(selector);
        }
        self
    }

    /// Appends the wider list of commonly used selectors after the current ones.
    pub fn with_extended_selectors(self) -> Self {
        self.with_dkim_selectors(EXTENDED_DKIM_SELECTORS)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_dkim_strategy(mut self, strategy: DkimStrategy) -> Self {
        self.dkim_strategy = strategy;
        self
    }

    pub fn with_spf_include_limit(mut self, limit: Option<usize>) -> Self {
        self.spf_include_limit = limit;
        self
    }

    /// Replaces the selector list instead of appending to it.
    pub fn replace_dkim_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dkim_selectors.clear();
        self.with_dkim_selectors(selectors)
    }

    /// Re-applies selector normalization, e.g. after deserializing a config file.
    pub fn normalized(mut self) -> Self {
        let selectors = std::mem::take(&mut self.dkim_selectors);
        self.with_dkim_selectors(selectors)
    }

    pub fn dkim_selectors(&self) -> &[String] {
        &self.dkim_selectors
    }

    /// Per-lookup deadline. Every lookup is bounded: zero falls back to the
    /// default deadline.
    pub fn timeout(&self) -> Duration {
        if self.timeout_ms == 0 {
            Duration::from_millis(DEFAULT_TIMEOUT_MS)
        } else {
            Duration::from_millis(self.timeout_ms)
        }
    }

    pub fn dkim_strategy(&self) -> DkimStrategy {
        self.dkim_strategy
    }

    pub fn spf_include_limit(&self) -> Option<usize> {
        self.spf_include_limit
    }
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            dkim_selectors: DEFAULT_DKIM_SELECTORS.iter().map(|s| s.to_string()).collect(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            dkim_strategy: DkimStrategy::default(),
            spf_include_limit: None,
        }
    }
}

fn normalize_selector(input: String) -> Option<String> {
    let trimmed = input.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}
