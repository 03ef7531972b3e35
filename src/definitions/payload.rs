use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque text decoded from one QR symbol.
///
/// The scanner never interprets the payload; it is carried verbatim to the
/// check-in authority, which owns its meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanPayload(String);

impl ScanPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ScanPayload {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ScanPayload {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for ScanPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
