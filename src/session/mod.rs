//! Scan session state machine.
//!
//! One [`ScanSession`] exists per check-in screen instance. It moves through
//! four modes:
//!
//! ```text
//!          activate           handle_decode          settle /
//! Idle ──────────▶ Scanning ──────────────▶ Verifying ──────────▶ Settled
//!                     ▲                                settle_error   │
//!                     └────────────────────────────────────────────────┘
//!                                      scan_again
//! ```
//!
//! The session is driven entirely by its owner: decode events arrive through
//! [`ScanSession::handle_decode`], the verification outcome through
//! [`ScanSession::settle`] or [`ScanSession::settle_error`], and the explicit
//! user command through [`ScanSession::scan_again`]. Every transition reads the
//! current mode at call time, so re-entrant decode deliveries and stale
//! verification resolutions are rejected by construction rather than by the
//! caller's discipline.

pub mod dedup;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::definitions::{ErrorInfo, ScanPayload, VerificationResult};

/// Where a session currently is in the scan/verify cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Created but not yet attached to a camera.
    #[default]
    Idle,
    /// Live decoding; new distinct payloads are forwarded.
    Scanning,
    /// One verification round-trip is in flight; decode output is ignored.
    Verifying,
    /// Holding an outcome or an error until "scan again".
    Settled,
}

/// What the session decided to do with a decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The payload was accepted; exactly one verification must be issued.
    Verify(ScanPayload),
    /// Duplicate or out-of-mode payload; nothing to do.
    Ignored,
}

/// Live state of one check-in screen instance.
#[derive(Debug)]
pub struct ScanSession {
    id: Uuid,
    mode: Mode,
    last_payload: Option<ScanPayload>,
    outcome: Option<VerificationResult>,
    error: Option<ErrorInfo>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            mode: Mode::Idle,
            last_payload: None,
            outcome: None,
            error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The payload most recently accepted for verification.
    pub fn last_payload(&self) -> Option<&ScanPayload> {
        self.last_payload.as_ref()
    }

    pub fn outcome(&self) -> Option<&VerificationResult> {
        self.outcome.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    /// Idle → Scanning, once the camera is open and subscribed.
    pub fn activate(&mut self) {
        if self.mode == Mode::Idle {
            debug!(session = %self.id, "session active, scanning");
            self.mode = Mode::Scanning;
        }
    }

    /// Settle into an error from any mode.
    ///
    /// Camera open failures land here before the session ever scans; the
    /// session then holds the error until a manual retry.
    pub fn fail(&mut self, error: ErrorInfo) {
        warn!(session = %self.id, kind = %error.kind, "session failed: {}", error.detail);
        self.mode = Mode::Settled;
        self.outcome = None;
        self.error = Some(error);
    }

    /// Feed one decoded payload through the deduplicator.
    ///
    /// The mode is read fresh on every call: a payload surfacing while a
    /// verification is in flight, or after the session settled, is ignored.
    /// On accept the payload is recorded, any surfaced decode warning is
    /// cleared, and the session suspends forwarding until it settles.
    pub fn handle_decode(&mut self, payload: ScanPayload) -> Decision {
        if !dedup::accept(self, &payload) {
            return Decision::Ignored;
        }
        debug!(session = %self.id, payload = %payload, "payload accepted, verifying");
        self.error = None;
        self.last_payload = Some(payload.clone());
        self.mode = Mode::Verifying;
        Decision::Verify(payload)
    }

    /// Surface a non-noise decode failure without leaving `Scanning`.
    ///
    /// The live view shows the warning while the camera keeps streaming; the
    /// next accepted payload clears it.
    pub fn note_decode_failure(&mut self, error: ErrorInfo) {
        if self.mode == Mode::Scanning {
            self.error = Some(error);
        }
    }

    /// Verifying → Settled with the authority's outcome.
    ///
    /// A resolution arriving in any other mode is stale (the cycle it belongs
    /// to is over) and is discarded.
    pub fn settle(&mut self, outcome: VerificationResult) {
        if self.mode != Mode::Verifying {
            return;
        }
        debug!(session = %self.id, verified = outcome.is_verified(), "verification settled");
        self.mode = Mode::Settled;
        self.outcome = Some(outcome);
        self.error = None;
    }

    /// Verifying → Settled with a verification failure.
    pub fn settle_error(&mut self, error: ErrorInfo) {
        if self.mode != Mode::Verifying {
            return;
        }
        warn!(session = %self.id, kind = %error.kind, "verification failed: {}", error.detail);
        self.mode = Mode::Settled;
        self.outcome = None;
        self.error = Some(error);
    }

    /// Settled → Scanning on the explicit user command.
    ///
    /// Clears the recorded payload, outcome, and error, so a previously seen
    /// payload can trigger a fresh verification.
    pub fn scan_again(&mut self) -> bool {
        if self.mode != Mode::Settled {
            return false;
        }
        debug!(session = %self.id, "scan again");
        self.last_payload = None;
        self.outcome = None;
        self.error = None;
        self.mode = Mode::Scanning;
        true
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}
