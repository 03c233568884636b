#![forbid(unsafe_code)]
//! mailyser_lib — SPF / DMARC / DKIM deliverability check for an e-mail domain

pub mod auth;
pub mod lifecycle;
pub mod presentation;

pub use auth::{
    AuthError, CheckError, CheckOptions, Checker, DkimStrategy, ExtractedDomain, LookupTxt,
    OverallStatus, PendingCheck, RawAnswer, RecordEvaluation, RecordKind, RecordStatus, Report,
    check, check_with_options, check_with_resolver, extract_domain, overall_status,
};
pub use lifecycle::{RequestLifecycle, RequestState, Ticket};
pub use presentation::{Descriptor, Tone, overall_descriptor, record_descriptor, report_lines};
