use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;
use trust_dns_resolver::TokioAsyncResolver;

use super::{CheckError, CheckOptions, LookupTxt, Report, check_with_resolver, resolver};

/// Runs checks against one resolver, keeping only the latest submission alive.
///
/// Each [`submit`](Self::submit) aborts the previously submitted check if it
/// is still running; the aborted [`PendingCheck`] resolves to
/// [`CheckError::Superseded`].
pub struct Checker<R> {
    resolver: Arc<R>,
    options: Arc<CheckOptions>,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl Checker<TokioAsyncResolver> {
    pub fn from_system_conf(options: CheckOptions) -> Result<Self, CheckError> {
        let resolver = resolver::system_resolver().map_err(CheckError::resolver_init)?;
        Ok(Self::new(resolver, options))
    }
}

impl<R> Checker<R>
where
    R: LookupTxt + 'static,
{
    pub fn new(resolver: R, options: CheckOptions) -> Self {
        Self {
            resolver: Arc::new(resolver),
            options: Arc::new(options),
            in_flight: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Inline check, cancelled by dropping the returned future.
    pub async fn check(&self, email: &str) -> Result<Report, CheckError> {
        check_with_resolver(self.resolver.as_ref(), email, &self.options).await
    }

    /// Spawns a check on the current tokio runtime and supersedes the
    /// previous one.
    pub fn submit(&self, email: impl Into<String>) -> PendingCheck {
        let email = email.into();
        let resolver = Arc::clone(&self.resolver);
        let options = Arc::clone(&self.options);
        let handle =
            tokio::spawn(async move { check_with_resolver(resolver.as_ref(), &email, &options).await });

        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle.abort_handle());
        if let Some(previous) = previous {
            if !previous.is_finished() {
                debug!("aborting superseded check");
                previous.abort();
            }
        }

        PendingCheck { handle }
    }

    /// Aborts the latest submitted check, if any.
    pub fn cancel(&self) {
        let current = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(current) = current {
            current.abort();
        }
    }
}

/// Handle on a submitted check.
#[derive(Debug)]
pub struct PendingCheck {
    handle: JoinHandle<Result<Report, CheckError>>,
}

impl PendingCheck {
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(self) -> Result<Report, CheckError> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(CheckError::Superseded),
            Err(source) => Err(CheckError::Aborted { source }),
        }
    }
}
