use serde::{Deserialize, Serialize};

/// Normalized answer of the check-in authority for one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationResult {
    /// The authority recognised the payload and checked the attendee in.
    Verified {
        identity: VerifiedIdentity,
        /// Status line supplied by the authority, when present.
        status_message: Option<String>,
    },
    /// The authority refused the payload.
    Rejected { reason: String },
}

impl VerificationResult {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationResult::Verified { .. })
    }
}

/// Attendee identity as surfaced by the authority.
///
/// Every field is optional: authorities omit fields freely, and the
/// presentation layer substitutes an explicit placeholder instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}
