//! QR check-in verification flow for the Eventloop event platform.
//!
//! The crate models one check-in screen instance: a camera stream is decoded
//! continuously, each new distinct payload is verified against the check-in
//! authority over HTTP, and the result is exposed as a render-ready view with
//! a single "scan again" command back into scanning.
//!
//! # Architecture
//!
//! - [`decoder`]: the camera/decode capability boundary and device lifecycle
//! - [`session`]: the scan session state machine and its deduplicator
//! - [`verify`]: the verification round-trip to the authority
//! - [`scanner`]: the cooperative driver a screen instance embeds
//! - [`presentation`]: pure projection of session state into a view
//!
//! Platform integrations implement [`decoder::DecodeBackend`]; everything
//! above that seam is portable and exercised by the simulated flows under
//! `tests/`.

pub mod decoder;
pub mod definitions;
pub mod presentation;
pub mod scanner;
pub mod session;
pub mod verify;

pub use definitions::{ErrorInfo, ErrorKind, ScanPayload, VerificationResult, VerifiedIdentity};
pub use presentation::View;
pub use scanner::{CheckinScanner, ScannerConfig};
pub use session::{Mode, ScanSession};
