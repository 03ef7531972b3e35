//! Decoder adapter: device selection and the camera stream lifecycle.
//!
//! [`DecoderAdapter`] opens a camera through a [`DecodeBackend`] using the
//! rear-facing selection policy and hands back a [`DeviceHandle`], the unit of
//! teardown. The handle drains decode events and absorbs steady-state decode
//! noise so that only payloads and genuine failures travel further.

mod backend;

pub use backend::{
    DecodeBackend, DecodeClass, DecodeFailure, DecodeStream, DeviceInfo, RawDecodeEvent,
};

use tracing::{debug, trace};

use crate::definitions::{ErrorInfo, ErrorKind, ScanPayload};

/// Label substrings that indicate a rear-facing camera.
const REAR_FACING_HINTS: [&str; 3] = ["back", "rear", "environment"];

/// Errors of the camera boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No camera is available on this platform.
    #[error("no camera available")]
    NoCamera,
    /// The user or platform denied access to the camera.
    #[error("camera permission denied")]
    PermissionDenied,
    /// Any other backend failure while enumerating or opening a device.
    #[error("camera backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<&Error> for ErrorInfo {
    fn from(error: &Error) -> Self {
        ErrorInfo::new(ErrorKind::Camera, error.to_string())
    }
}

impl From<&DecodeFailure> for ErrorInfo {
    fn from(failure: &DecodeFailure) -> Self {
        ErrorInfo::new(ErrorKind::Decode, failure.detail.clone())
    }
}

/// Pick the device to open from an enumeration.
///
/// An explicitly preferred id wins when present. Otherwise prefer a device
/// whose label looks rear-facing, then the last enumerated device. `None`
/// when enumeration is empty; the backend then opens the platform default.
pub fn select_device<'a>(
    devices: &'a [DeviceInfo],
    preferred: Option<&str>,
) -> Option<&'a DeviceInfo> {
    if let Some(id) = preferred {
        if let Some(device) = devices.iter().find(|d| d.id == id) {
            return Some(device);
        }
    }
    devices
        .iter()
        .find(|d| {
            let label = d.label.to_lowercase();
            REAR_FACING_HINTS.iter().any(|hint| label.contains(hint))
        })
        .or_else(|| devices.last())
}

/// Adapter over a [`DecodeBackend`] applying the device selection policy.
pub struct DecoderAdapter<B> {
    backend: B,
}

impl<B: DecodeBackend> DecoderAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Open a camera and start continuous decoding.
    pub fn open(&self, preferred: Option<&str>) -> Result<DeviceHandle, Error> {
        let devices = self.backend.enumerate_devices()?;
        let device = select_device(&devices, preferred);
        match device {
            Some(device) => debug!(device = %device.label, "opening video input"),
            None => debug!("no video inputs enumerated, opening platform default"),
        }
        let stream = self.backend.start(device)?;
        Ok(DeviceHandle {
            stream: Some(stream),
            device: device.cloned(),
        })
    }
}

/// A decode event after noise filtering.
#[derive(Debug, Clone)]
pub enum DecodeEvent {
    /// A freshly decoded payload.
    Payload(ScanPayload),
    /// A non-noise decode failure, surfaced to the session.
    Failure(DecodeFailure),
}

/// Exclusive ownership of one opened camera stream.
///
/// The handle is the unit of teardown: releasing it stops decoding and frees
/// the device. Release is idempotent and also runs on drop, so a session can
/// never leave the camera open or free it twice.
pub struct DeviceHandle {
    stream: Option<Box<dyn DecodeStream>>,
    device: Option<DeviceInfo>,
}

impl DeviceHandle {
    /// The device this handle was opened against, when one was enumerated.
    pub fn device(&self) -> Option<&DeviceInfo> {
        self.device.as_ref()
    }

    /// Drain the next decode event, absorbing steady-state noise.
    pub fn next_event(&mut self) -> Option<DecodeEvent> {
        let stream = self.stream.as_mut()?;
        while let Some(event) = stream.next_event() {
            match event {
                RawDecodeEvent::Decoded(text) => {
                    return Some(DecodeEvent::Payload(ScanPayload::new(text)))
                }
                RawDecodeEvent::Failed(failure) if failure.class.is_noise() => {
                    trace!(class = ?failure.class, "absorbed decode noise");
                }
                RawDecodeEvent::Failed(failure) => return Some(DecodeEvent::Failure(failure)),
            }
        }
        None
    }

    /// Stop decoding and release the device. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    fn devices(labels: &[&str]) -> Vec<DeviceInfo> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| DeviceInfo::new(i.to_string(), *label))
            .collect()
    }

    #[test]
    fn selection_prefers_rear_facing_labels() {
        let devices = devices(&["Front Camera", "Back Camera", "Desk View"]);
        let selected = select_device(&devices, None).unwrap();
        assert_eq!(selected.label, "Back Camera");
    }

    #[test]
    fn selection_matches_labels_case_insensitively() {
        let devices = devices(&["front", "ENVIRONMENT-facing cam"]);
        let selected = select_device(&devices, None).unwrap();
        assert_eq!(selected.label, "ENVIRONMENT-facing cam");
    }

    #[test]
    fn selection_falls_back_to_last_device() {
        let devices = devices(&["Webcam A", "Webcam B"]);
        let selected = select_device(&devices, None).unwrap();
        assert_eq!(selected.label, "Webcam B");
    }

    #[test]
    fn selection_yields_none_for_empty_enumeration() {
        assert!(select_device(&[], None).is_none());
    }

    #[test]
    fn explicitly_preferred_device_wins() {
        let devices = devices(&["Front Camera", "Back Camera"]);
        let selected = select_device(&devices, Some("0")).unwrap();
        assert_eq!(selected.label, "Front Camera");
    }

    #[test]
    fn unknown_preferred_id_falls_back_to_policy() {
        let devices = devices(&["Front Camera", "Back Camera"]);
        let selected = select_device(&devices, Some("missing")).unwrap();
        assert_eq!(selected.label, "Back Camera");
    }

    struct ScriptedStream {
        events: VecDeque<RawDecodeEvent>,
        stops: Arc<AtomicUsize>,
    }

    impl DecodeStream for ScriptedStream {
        fn next_event(&mut self) -> Option<RawDecodeEvent> {
            self.events.pop_front()
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ScriptedBackend {
        events: Mutex<VecDeque<RawDecodeEvent>>,
        stops: Arc<AtomicUsize>,
    }

    impl ScriptedBackend {
        fn new(events: Vec<RawDecodeEvent>) -> Self {
            Self {
                events: Mutex::new(events.into()),
                stops: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl DecodeBackend for ScriptedBackend {
        fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, Error> {
            Ok(vec![DeviceInfo::new("0", "Back Camera")])
        }

        fn start(&self, _device: Option<&DeviceInfo>) -> Result<Box<dyn DecodeStream>, Error> {
            Ok(Box::new(ScriptedStream {
                events: std::mem::take(&mut *self.events.lock().unwrap()),
                stops: self.stops.clone(),
            }))
        }
    }

    #[test]
    fn noise_classes_are_absorbed() {
        let backend = ScriptedBackend::new(vec![
            RawDecodeEvent::Failed(DecodeFailure::new(DecodeClass::NotFound, "no symbol")),
            RawDecodeEvent::Failed(DecodeFailure::new(DecodeClass::Checksum, "bad ecc")),
            RawDecodeEvent::Failed(DecodeFailure::new(DecodeClass::Format, "bad format")),
            RawDecodeEvent::Decoded("QR123".into()),
        ]);
        let mut handle = DecoderAdapter::new(backend).open(None).unwrap();
        match handle.next_event() {
            Some(DecodeEvent::Payload(payload)) => assert_eq!(payload.as_str(), "QR123"),
            other => panic!("expected payload, got {other:?}"),
        }
        assert!(handle.next_event().is_none());
    }

    #[test]
    fn non_noise_failures_are_surfaced() {
        let backend = ScriptedBackend::new(vec![RawDecodeEvent::Failed(DecodeFailure::new(
            DecodeClass::Other,
            "decoder crashed",
        ))]);
        let mut handle = DecoderAdapter::new(backend).open(None).unwrap();
        match handle.next_event() {
            Some(DecodeEvent::Failure(failure)) => assert_eq!(failure.detail, "decoder crashed"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn release_stops_the_stream_exactly_once() {
        let backend = ScriptedBackend::new(vec![]);
        let stops = backend.stops.clone();
        let mut handle = DecoderAdapter::new(backend).open(None).unwrap();
        handle.release();
        handle.release();
        drop(handle);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases_the_stream() {
        let backend = ScriptedBackend::new(vec![]);
        let stops = backend.stops.clone();
        let handle = DecoderAdapter::new(backend).open(None).unwrap();
        drop(handle);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
