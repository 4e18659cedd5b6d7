//! The `UrlProbe` trait -- the outbound transport for liveness checks.
//!
//! The production implementation wraps reqwest; tests inject scripted
//! probes. The trait is object-safe so checkers can hold `Arc<dyn UrlProbe>`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Browsers' default agents are fine, but library defaults (and anything
/// containing "bot") get blocked by several origins.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; pathcraft-validator/1.0)";

/// HTTP method used for a probe. HEAD is the default; GET is the fallback
/// for origins that reject HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Head,
    Get,
}

/// Status-only view of a probe response. The body is never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
}

impl ProbeResponse {
    /// Whether the status is in the 2xx success range.
    pub fn is_ok(self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A probe failure below the HTTP layer.
///
/// The split matters downstream: [`ProbeError::is_transient`] outcomes are
/// eligible for the lenient verdict (the failure says more about the
/// validator's network than about the URL), while the rest are definitive.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("request could not be built: {0}")]
    BadRequest(String),
}

impl ProbeError {
    /// Whether this failure is plausibly validator-side flakiness rather
    /// than evidence the URL is dead.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }
}

/// Outbound transport for a single existence check.
///
/// Implementations follow redirects and own their timeout; a response is
/// returned for any HTTP status, and `Err` is reserved for failures below
/// the HTTP layer.
#[async_trait]
pub trait UrlProbe: Send + Sync {
    async fn request(&self, method: ProbeMethod, url: &str) -> Result<ProbeResponse, ProbeError>;
}

// Compile-time assertion: UrlProbe must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn UrlProbe) {}
};

/// Production probe backed by a shared reqwest client.
pub struct ReqwestProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestProbe {
    /// Build a probe with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProbeError::BadRequest(e.to_string()))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl UrlProbe for ReqwestProbe {
    async fn request(&self, method: ProbeMethod, url: &str) -> Result<ProbeResponse, ProbeError> {
        let request = match method {
            ProbeMethod::Head => self.client.head(url),
            ProbeMethod::Get => self.client.get(url),
        };

        let response = request
            .header(reqwest::header::ACCEPT, "*/*")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify)?;

        Ok(ProbeResponse {
            status: response.status().as_u16(),
        })
    }
}

fn classify(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else if err.is_builder() {
        ProbeError::BadRequest(err.to_string())
    } else {
        ProbeError::Network(err.to_string())
    }
}
