//! Reqwest-based client for the check-in authority.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Error, VerificationClient};
use crate::definitions::{ScanPayload, VerificationResult, VerifiedIdentity};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Rejection reason used when the authority supplies none.
const GENERIC_REJECTION: &str = "Invalid QR Data";

/// Connection settings for the check-in authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityConfig {
    /// Base URL of the authority, e.g. `https://api.eventloop.example`.
    pub base_url: String,
    /// Bearer token attached to every request, for header-authenticated
    /// deployments. Cookie credentials are always replayed regardless.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Round-trip timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl AuthorityConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Verification client implementation using reqwest.
///
/// Cookies set by the authority are stored and replayed across requests,
/// mirroring a browser session that sends credentials with every call.
#[derive(Clone)]
pub struct AuthorityClient {
    client: reqwest::Client,
    config: AuthorityConfig,
}

impl AuthorityClient {
    pub fn new(config: AuthorityConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/verifyQR", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    qr_string: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponseBody {
    #[serde(default)]
    user: Option<WireUser>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct WireUser {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// Normalize one authority response into the result union.
///
/// A success status with an unreadable body is an authority error; a
/// non-success status is a rejection even when its body is unreadable, since
/// the refusal itself is the answer.
fn normalize_response(status: u16, body: &[u8]) -> Result<VerificationResult, Error> {
    if (200..300).contains(&status) {
        let body: VerifyResponseBody = serde_json::from_slice(body)
            .map_err(|e| Error::Authority(format!("malformed verification response: {e}")))?;
        let identity = body
            .user
            .map(|user| VerifiedIdentity {
                name: user.name,
                email: user.email,
                role: user.role,
            })
            .unwrap_or_default();
        Ok(VerificationResult::Verified {
            identity,
            status_message: body.message,
        })
    } else {
        let reason = serde_json::from_slice::<VerifyResponseBody>(body)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());
        Ok(VerificationResult::Rejected { reason })
    }
}

#[async_trait]
impl VerificationClient for AuthorityClient {
    async fn verify(&self, payload: &ScanPayload) -> Result<VerificationResult, Error> {
        let mut request = self.client.post(self.endpoint()).json(&VerifyRequest {
            qr_string: payload.as_str(),
        });
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(Box::new(e)))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(Box::new(e)))?;

        let result = normalize_response(status, &body)?;
        if let VerificationResult::Rejected { reason } = &result {
            warn!(status, "authority rejected payload: {reason}");
        }
        Ok(result)
    }
}
