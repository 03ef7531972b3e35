//! Forwarding filter between the decode stream and the session.

use super::{Mode, ScanSession};
use crate::definitions::ScanPayload;

/// Whether `payload` should be forwarded into a verification.
///
/// A payload is forwarded only while the session is scanning and it differs
/// from the payload the session last accepted. The mode is consulted at call
/// time, never captured, so re-entrant decode deliveries observe the state the
/// session is actually in.
pub fn accept(session: &ScanSession, payload: &ScanPayload) -> bool {
    session.mode() == Mode::Scanning && session.last_payload() != Some(payload)
}
