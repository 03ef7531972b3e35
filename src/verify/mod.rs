//! Verification round-trip against the check-in authority.
//!
//! [`VerificationClient`] is the seam the scan driver calls through; the
//! reqwest-backed [`AuthorityClient`] is the production implementation. A
//! rejection by the authority is a normal [`VerificationResult::Rejected`]
//! outcome, not an error: errors here mean the round-trip itself broke down.

mod reqwest_client;

pub use reqwest_client::{AuthorityClient, AuthorityConfig};

use async_trait::async_trait;

use crate::definitions::{ErrorInfo, ErrorKind, ScanPayload, VerificationResult};

/// Failures of the verification round-trip.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced an authority response.
    #[error("verification request failed: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The authority responded, but with a body this client cannot use.
    #[error("authority response unusable: {0}")]
    Authority(String),
}

impl From<&Error> for ErrorInfo {
    fn from(error: &Error) -> Self {
        let kind = match error {
            Error::Network(_) => ErrorKind::Network,
            Error::Authority(_) => ErrorKind::Authority,
        };
        ErrorInfo::new(kind, error.to_string())
    }
}

/// One verification round-trip per candidate payload.
///
/// Implementations issue exactly one request per call and never retry on
/// their own; retry is the attendee pressing "scan again".
// TODO: drop async_trait once the crate edition moves past dyn-incompatible
// async fns in traits
#[async_trait]
pub trait VerificationClient: Send + Sync {
    /// Submit `payload` to the authority and normalize its answer.
    async fn verify(&self, payload: &ScanPayload) -> Result<VerificationResult, Error>;
}
