use std::fmt;

use serde::Serialize;

/// Failure classification exposed to the presentation layer.
///
/// Built at the session boundary from the per-module error types; carries the
/// class the UI branches on plus a human-readable detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.detail)
    }
}

/// Where in the flow a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    /// Device unavailable or permission denied. Terminal for the session
    /// instance until a manual retry.
    Camera,
    /// A non-noise decode failure. Scanning continues.
    Decode,
    /// The verification request never reached a response.
    Network,
    /// The authority responded, but the response was unusable.
    Authority,
}
