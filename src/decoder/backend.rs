//! Decode-capability boundary.
//!
//! Platform integrations implement [`DecodeBackend`]: enumerate the available
//! video inputs, then run a continuous decode stream against one of them. The
//! backend owns frame capture and symbol decoding; everything above this seam
//! only sees text payloads and classified failures.

use super::Error;

/// A video input visible to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Backend-specific stable identifier.
    pub id: String,
    /// Human-readable label, e.g. "Back Camera" or "USB webcam".
    pub label: String,
}

impl DeviceInfo {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Classification of a failed decode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeClass {
    /// No symbol found in the frame.
    NotFound,
    /// A symbol was found but its checksum did not validate.
    Checksum,
    /// A symbol was found but its format could not be parsed.
    Format,
    /// Any other decoder failure.
    Other,
}

impl DecodeClass {
    /// Whether this class is steady-state noise of continuous video decoding.
    ///
    /// Most frames contain no symbol, and partially visible symbols fail
    /// checksum or format checks while the attendee lines the code up. None of
    /// that is user-visible.
    pub fn is_noise(self) -> bool {
        matches!(self, Self::NotFound | Self::Checksum | Self::Format)
    }
}

/// A failed decode attempt as reported by the backend.
#[derive(Debug, Clone)]
pub struct DecodeFailure {
    pub class: DecodeClass,
    pub detail: String,
}

impl DecodeFailure {
    pub fn new(class: DecodeClass, detail: impl Into<String>) -> Self {
        Self {
            class,
            detail: detail.into(),
        }
    }
}

/// One event from a running decode stream, before noise filtering.
#[derive(Debug, Clone)]
pub enum RawDecodeEvent {
    /// A symbol was decoded into its text payload.
    Decoded(String),
    /// A decode attempt failed.
    Failed(DecodeFailure),
}

/// Continuous video-to-text decode capability.
pub trait DecodeBackend {
    /// List the available video inputs.
    fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, Error>;

    /// Start continuous decoding against `device`, or against the platform
    /// default when `None`.
    fn start(&self, device: Option<&DeviceInfo>) -> Result<Box<dyn DecodeStream>, Error>;
}

/// A running decode stream bound to one opened device.
pub trait DecodeStream {
    /// Drain the next pending event without blocking.
    fn next_event(&mut self) -> Option<RawDecodeEvent>;

    /// Stop decoding and release the device.
    fn stop(&mut self);
}
