use thiserror::Error;

/// Errors raised by a [`LookupTxt`](super::LookupTxt) implementation.
///
/// The evaluators never propagate these: a failed lookup is folded into an
/// empty answer set.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("TXT lookup failed for {name}: {source}")]
    TxtLookup {
        name: String,
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
    #[error("TXT record {name} contains invalid UTF-8 data: {source}")]
    TxtDataUtf8 {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },
    #[error("TXT lookup for {name} timed out after {timeout_ms} ms")]
    Timeout { name: String, timeout_ms: u128 },
    #[error("TXT lookup failed for {name}: {reason}")]
    Transport { name: String, reason: String },
}

impl AuthError {
    pub(crate) fn txt_lookup(
        name: impl Into<String>,
        source: trust_dns_resolver::error::ResolveError,
    ) -> Self {
        Self::TxtLookup {
            name: name.into(),
            source,
        }
    }

    pub(crate) fn txt_data_utf8(name: impl Into<String>, source: std::str::Utf8Error) -> Self {
        Self::TxtDataUtf8 {
            name: name.into(),
            source,
        }
    }

    pub(crate) fn timeout(name: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            name: name.into(),
            timeout_ms: timeout.as_millis(),
        }
    }

    /// Transport failure reported by a custom resolver.
    pub fn transport(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transport {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced to the caller of a check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("invalid email address '{input}': {reason}")]
    InvalidInput { input: String, reason: String },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
    #[error("check superseded by a newer request")]
    Superseded,
    #[error("check task aborted: {source}")]
    Aborted {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl CheckError {
    pub(crate) fn invalid_input(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn resolver_init(source: trust_dns_resolver::error::ResolveError) -> Self {
        Self::ResolverInit { source }
    }

    /// Message suitable for an end user: specific for rejected input,
    /// generic otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { reason, .. } => format!("Please enter a valid email address ({reason})"),
            Self::ResolverInit { .. } | Self::Superseded | Self::Aborted { .. } => {
                "Something went wrong while checking DNS records. Please try again.".to_string()
            }
        }
    }
}
