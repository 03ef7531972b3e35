//! Cooperative driver for one check-in screen instance.
//!
//! [`CheckinScanner`] ties the decoder, the session state machine, and the
//! verification client together. The host mounts one scanner per screen,
//! pumps it from its event loop, forwards the user's "scan again" command,
//! and renders [`CheckinScanner::view`]. Dropping the scanner releases the
//! camera and discards any in-flight verification.

use std::time::Duration;

use serde::Deserialize;

use crate::decoder::{DecodeBackend, DecodeEvent, DecoderAdapter, DeviceHandle};
use crate::definitions::ErrorInfo;
use crate::presentation::View;
use crate::session::{Decision, Mode, ScanSession};
use crate::verify::VerificationClient;

/// Pause between empty drains of the decode stream, in milliseconds.
const DEFAULT_SCAN_INTERVAL_MS: u64 = 300;

/// Tuning for one scanner instance.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Pause between empty drains of the decode stream.
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,
    /// Device id to open when present, bypassing the selection policy.
    #[serde(default)]
    pub preferred_device: Option<String>,
}

fn default_scan_interval_ms() -> u64 {
    DEFAULT_SCAN_INTERVAL_MS
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: DEFAULT_SCAN_INTERVAL_MS,
            preferred_device: None,
        }
    }
}

impl ScannerConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }
}

/// One screen instance's scan/verify loop.
pub struct CheckinScanner<B, C> {
    adapter: DecoderAdapter<B>,
    client: C,
    config: ScannerConfig,
    session: ScanSession,
    device: Option<DeviceHandle>,
}

impl<B: DecodeBackend, C: VerificationClient> CheckinScanner<B, C> {
    /// Mount a new scanner: open a camera and start scanning.
    ///
    /// A camera failure settles the session immediately and no verification
    /// is ever issued; the scanner is still returned so the screen can render
    /// the error and offer a retry.
    pub fn start(backend: B, client: C, config: ScannerConfig) -> Self {
        let adapter = DecoderAdapter::new(backend);
        let mut session = ScanSession::new();
        let device = match adapter.open(config.preferred_device.as_deref()) {
            Ok(handle) => {
                session.activate();
                Some(handle)
            }
            Err(error) => {
                session.fail(ErrorInfo::from(&error));
                None
            }
        };
        Self {
            adapter,
            client,
            config,
            session,
            device,
        }
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Presentation snapshot of the current session state.
    pub fn view(&self) -> View {
        View::of(&self.session)
    }

    /// Drain the decode events queued so far.
    ///
    /// At most one verification is issued per call and it is awaited inline,
    /// so a second request cannot start before the session settles. Events
    /// that queue up while the round-trip is in flight are examined on the
    /// next call, against the mode current then. Returns whether a
    /// verification settled.
    pub async fn pump(&mut self) -> bool {
        loop {
            let Some(event) = self.device.as_mut().and_then(|d| d.next_event()) else {
                return false;
            };
            match event {
                DecodeEvent::Payload(payload) => {
                    if let Decision::Verify(payload) = self.session.handle_decode(payload) {
                        match self.client.verify(&payload).await {
                            Ok(outcome) => self.session.settle(outcome),
                            Err(error) => self.session.settle_error(ErrorInfo::from(&error)),
                        }
                        return true;
                    }
                }
                DecodeEvent::Failure(failure) => {
                    self.session.note_decode_failure(ErrorInfo::from(&failure));
                }
            }
        }
    }

    /// Pump until the session settles, pacing empty drains by the configured
    /// scan interval. Runs forever if the camera never yields a payload; the
    /// host decides when to unmount.
    pub async fn run_until_settled(&mut self) {
        while self.session.mode() != Mode::Settled {
            if !self.pump().await {
                tokio::time::sleep(self.config.scan_interval()).await;
            }
        }
    }

    /// The explicit "scan again" command.
    ///
    /// From a settled outcome this clears the session and resumes forwarding.
    /// When the camera was never opened (or was lost), the open is
    /// re-attempted; a repeat failure settles the session again. Returns
    /// whether the session is scanning afterwards.
    pub fn scan_again(&mut self) -> bool {
        if !self.session.scan_again() {
            return false;
        }
        if self.device.is_none() {
            match self.adapter.open(self.config.preferred_device.as_deref()) {
                Ok(handle) => self.device = Some(handle),
                Err(error) => {
                    self.session.fail(ErrorInfo::from(&error));
                    return false;
                }
            }
        }
        true
    }

    /// Unmount: release the camera. Idempotent; also runs on drop through the
    /// device handle.
    pub fn close(&mut self) {
        if let Some(mut handle) = self.device.take() {
            handle.release();
        }
    }
}
