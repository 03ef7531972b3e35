//! Render-ready projection of session state.

use serde::Serialize;

use crate::definitions::{ErrorKind, VerificationResult};
use crate::session::{Mode, ScanSession};

/// Placeholder shown for fields the authority did not provide.
pub const NOT_AVAILABLE: &str = "not available";

/// What the screen shows right now.
///
/// A pure function of the session: exactly one variant describes the screen
/// at any time, and every variant other than a non-verifying [`View::Live`]
/// implies a path back to scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Live camera feed. While a verification is in flight the raw payload is
    /// already shown, ahead of the outcome.
    Live {
        verifying: bool,
        payload: Option<String>,
        /// Inline decode warning; scanning continues underneath it.
        warning: Option<String>,
    },
    /// Successful check-in summary.
    Verified {
        name: String,
        email: String,
        role: String,
        status_message: String,
    },
    /// The authority refused the payload. Offers "scan again".
    Rejected { reason: String },
    /// The cycle ended in an error. Offers "scan again".
    Failed { kind: ErrorKind, detail: String },
}

impl View {
    /// Project the current session state.
    pub fn of(session: &ScanSession) -> View {
        match session.mode() {
            Mode::Idle | Mode::Scanning => View::Live {
                verifying: false,
                payload: None,
                warning: session.error().map(|e| e.detail.clone()),
            },
            Mode::Verifying => View::Live {
                verifying: true,
                payload: session.last_payload().map(|p| p.as_str().to_string()),
                warning: None,
            },
            Mode::Settled => match (session.outcome(), session.error()) {
                (Some(VerificationResult::Verified { identity, status_message }), _) => {
                    View::Verified {
                        name: or_placeholder(identity.name.as_deref()),
                        email: or_placeholder(identity.email.as_deref()),
                        role: or_placeholder(identity.role.as_deref()),
                        status_message: or_placeholder(status_message.as_deref()),
                    }
                }
                (Some(VerificationResult::Rejected { reason }), _) => View::Rejected {
                    reason: reason.clone(),
                },
                (None, Some(error)) => View::Failed {
                    kind: error.kind,
                    detail: error.detail.clone(),
                },
                // A settled session always carries an outcome or an error;
                // render the gap as a failure rather than panicking.
                (None, None) => View::Failed {
                    kind: ErrorKind::Authority,
                    detail: "session settled without an outcome".to_string(),
                },
            },
        }
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}
