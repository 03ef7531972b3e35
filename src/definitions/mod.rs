//! Data model of the check-in verification flow.
//!
//! These types cross every seam in the crate: payloads produced by the
//! [decoder](crate::decoder), outcomes produced by the
//! [verification client](crate::verify), and the failure classification the
//! [presentation layer](crate::presentation) renders.

pub mod error_info;
pub mod outcome;
pub mod payload;

pub use error_info::{ErrorInfo, ErrorKind};
pub use outcome::{VerificationResult, VerifiedIdentity};
pub use payload::ScanPayload;
