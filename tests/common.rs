use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use eventloop_checkin::decoder::{
    DecodeBackend, DecodeClass, DecodeFailure, DecodeStream, DeviceInfo, Error as DecoderError,
    RawDecodeEvent,
};

/// Scripted decode source.
///
/// Tests push events into a shared queue and the scanner drains them, exactly
/// as a camera callback queue would deliver them. Clones share the queue, the
/// stop counter, and the availability flag.
#[derive(Clone)]
pub struct SimulatedBackend {
    devices: Vec<DeviceInfo>,
    available: Arc<AtomicBool>,
    events: Arc<Mutex<VecDeque<RawDecodeEvent>>>,
    stops: Arc<AtomicUsize>,
}

impl SimulatedBackend {
    pub fn new(devices: Vec<DeviceInfo>) -> Self {
        Self {
            devices,
            available: Arc::new(AtomicBool::new(true)),
            events: Arc::new(Mutex::new(VecDeque::new())),
            stops: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_back_camera() -> Self {
        Self::new(vec![DeviceInfo::new("0", "Back Camera")])
    }

    pub fn camera_unavailable() -> Self {
        let backend = Self::new(vec![]);
        backend.set_camera_available(false);
        backend
    }

    pub fn set_camera_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn push_decoded(&self, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push_back(RawDecodeEvent::Decoded(text.to_string()));
    }

    pub fn push_failure(&self, class: DecodeClass, detail: &str) {
        self.events
            .lock()
            .unwrap()
            .push_back(RawDecodeEvent::Failed(DecodeFailure::new(class, detail)));
    }

    /// How many times a stream of this backend has been stopped.
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl DecodeBackend for SimulatedBackend {
    fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, DecoderError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(DecoderError::NoCamera);
        }
        Ok(self.devices.clone())
    }

    fn start(&self, _device: Option<&DeviceInfo>) -> Result<Box<dyn DecodeStream>, DecoderError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(DecoderError::NoCamera);
        }
        Ok(Box::new(SimulatedStream {
            events: self.events.clone(),
            stops: self.stops.clone(),
        }))
    }
}

struct SimulatedStream {
    events: Arc<Mutex<VecDeque<RawDecodeEvent>>>,
    stops: Arc<AtomicUsize>,
}

impl DecodeStream for SimulatedStream {
    fn next_event(&mut self) -> Option<RawDecodeEvent> {
        self.events.lock().unwrap().pop_front()
    }

    fn stop(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
struct AuthorityState {
    status: u16,
    body: serde_json::Value,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

/// Handle to a running stub authority.
pub struct StubAuthority {
    pub base_url: String,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl StubAuthority {
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve a scripted `/verifyQR` response on an ephemeral local port.
pub async fn spawn_authority(status: u16, body: serde_json::Value) -> StubAuthority {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = AuthorityState {
        status,
        body,
        requests: requests.clone(),
    };
    let app = Router::new()
        .route("/verifyQR", post(verify_qr))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    StubAuthority {
        base_url: format!("http://{addr}"),
        requests,
    }
}

async fn verify_qr(
    State(state): State<AuthorityState>,
    Json(request): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.requests.lock().unwrap().push(request);
    (
        StatusCode::from_u16(state.status).unwrap(),
        Json(state.body.clone()),
    )
}

/// A local URL nothing listens on, for transport-failure scenarios.
pub async fn refused_authority_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
