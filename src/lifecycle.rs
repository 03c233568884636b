//! Caller-side state of a check request.
//!
//! The evaluator itself is stateless; a UI or CLI that issues checks keeps a
//! [`RequestLifecycle`] and feeds it the outcome of each check. Only the most
//! recent request can move the state out of `Pending`.

use crate::auth::{CheckError, Report};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending { email: String },
    Succeeded(Box<Report>),
    Failed { message: String },
}

/// Identifies one request issued through [`RequestLifecycle::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct RequestLifecycle {
    state: RequestState,
    latest: u64,
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            latest: 0,
        }
    }
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RequestState::Pending { .. })
    }

    /// Moves to `Pending` for `email`; any earlier ticket becomes stale.
    pub fn begin(&mut self, email: impl Into<String>) -> Ticket {
        self.latest += 1;
        self.state = RequestState::Pending {
            email: email.into(),
        };
        Ticket(self.latest)
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Returns `false` and leaves the state untouched when the ticket is stale
    /// or the request was superseded.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<Report, CheckError>) -> bool {
        if ticket.0 != self.latest || !self.is_pending() {
            return false;
        }
        self.state = match outcome {
            Ok(report) => RequestState::Succeeded(Box::new(report)),
            Err(CheckError::Superseded) => return false,
            Err(err) => RequestState::Failed {
                message: err.user_message(),
            },
        };
        true
    }

    pub fn reset(&mut self) {
        self.state = RequestState::Idle;
    }
}
