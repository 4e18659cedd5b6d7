//! Shared test doubles for pathcraft integration tests.
//!
//! Provides a scripted LLM client and a scripted URL probe with call
//! counters, so core and CLI tests can drive the pipeline without any
//! real network traffic.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use pathcraft_core::check::{ProbeError, ProbeMethod, ProbeResponse, UrlProbe};
use pathcraft_core::llm::{ChatMessage, LlmClient, LlmError};

// ---------------------------------------------------------------------------
// MockLlm
// ---------------------------------------------------------------------------

enum LlmBehavior {
    Respond(String),
    Fail(fn() -> LlmError),
}

/// Scripted [`LlmClient`] that records requests.
pub struct MockLlm {
    behavior: LlmBehavior,
    calls: AtomicUsize,
    /// (role, content) pairs plus temperature of the most recent request.
    last_request: Mutex<Option<(Vec<(String, String)>, f32)>>,
}

impl MockLlm {
    /// Always answer with the given assistant text.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self::new(LlmBehavior::Respond(text.into()))
    }

    /// Always fail with [`LlmError::RateLimited`].
    pub fn rate_limited() -> Self {
        Self::new(LlmBehavior::Fail(|| LlmError::RateLimited))
    }

    /// Always fail with [`LlmError::PaymentRequired`].
    pub fn payment_required() -> Self {
        Self::new(LlmBehavior::Fail(|| LlmError::PaymentRequired))
    }

    /// Always fail with a generic upstream error.
    pub fn upstream_failure() -> Self {
        Self::new(LlmBehavior::Fail(|| LlmError::Upstream {
            status: 500,
            body: "internal error".to_string(),
        }))
    }

    fn new(behavior: LlmBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of completion calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages and temperature of the most recent request, if any.
    pub fn last_request(&self) -> Option<(Vec<(String, String)>, f32)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let recorded = messages
            .iter()
            .map(|m| (m.role.to_string(), m.content.clone()))
            .collect();
        *self.last_request.lock().unwrap() = Some((recorded, temperature));

        match &self.behavior {
            LlmBehavior::Respond(text) => Ok(text.clone()),
            LlmBehavior::Fail(make_err) => Err(make_err()),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingProbe
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum ProbeOutcome {
    Status(u16),
    Timeout,
    BadRequest(String),
}

/// Script for a [`RecordingProbe`].
///
/// The default outcome applies to every HEAD request unless overridden by
/// a URL-substring rule, a per-attempt sequence, or a distinct GET
/// outcome.
#[derive(Clone)]
pub struct ProbeScript {
    default: ProbeOutcome,
    /// Per-attempt HEAD outcomes; the last entry repeats once exhausted.
    sequence: Vec<ProbeOutcome>,
    /// (url substring, status) overrides, checked in order.
    url_rules: Vec<(String, u16)>,
    get: Option<ProbeOutcome>,
}

impl ProbeScript {
    /// Every probe returns the given HTTP status.
    pub fn status(status: u16) -> Self {
        Self {
            default: ProbeOutcome::Status(status),
            sequence: Vec::new(),
            url_rules: Vec::new(),
            get: None,
        }
    }

    /// HEAD attempts walk this status sequence (last entry repeats).
    pub fn statuses(statuses: &[u16]) -> Self {
        let mut script = Self::status(*statuses.last().expect("at least one status"));
        script.sequence = statuses.iter().map(|s| ProbeOutcome::Status(*s)).collect();
        script
    }

    /// Every probe fails with a timeout.
    pub fn timeout() -> Self {
        Self {
            default: ProbeOutcome::Timeout,
            sequence: Vec::new(),
            url_rules: Vec::new(),
            get: None,
        }
    }

    /// First HEAD attempt times out, then the given status.
    pub fn timeout_then_status(status: u16) -> Self {
        let mut script = Self::status(status);
        script.sequence = vec![ProbeOutcome::Timeout, ProbeOutcome::Status(status)];
        script
    }

    /// Every probe fails as unbuildable (e.g. unsupported scheme).
    pub fn error_bad_request(msg: &str) -> Self {
        Self {
            default: ProbeOutcome::BadRequest(msg.to_string()),
            sequence: Vec::new(),
            url_rules: Vec::new(),
            get: None,
        }
    }

    /// URLs containing `needle` get this status instead of the default.
    pub fn with_url_status(mut self, needle: &str, status: u16) -> Self {
        self.url_rules.push((needle.to_string(), status));
        self
    }

    /// GET requests get this status (HEAD keeps the scripted outcome).
    pub fn with_get_status(mut self, status: u16) -> Self {
        self.get = Some(ProbeOutcome::Status(status));
        self
    }
}

/// Scripted [`UrlProbe`] with per-method call counters.
pub struct RecordingProbe {
    script: ProbeScript,
    head_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl RecordingProbe {
    pub fn new(script: ProbeScript) -> Self {
        Self {
            script,
            head_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        }
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.head_calls() + self.get_calls()
    }

    fn outcome_for(&self, method: ProbeMethod, url: &str, head_attempt: usize) -> ProbeOutcome {
        if method == ProbeMethod::Get {
            if let Some(get) = &self.script.get {
                return get.clone();
            }
        }
        for (needle, status) in &self.script.url_rules {
            if url.contains(needle.as_str()) {
                return ProbeOutcome::Status(*status);
            }
        }
        if !self.script.sequence.is_empty() {
            let idx = head_attempt.min(self.script.sequence.len() - 1);
            return self.script.sequence[idx].clone();
        }
        self.script.default.clone()
    }
}

#[async_trait]
impl UrlProbe for RecordingProbe {
    async fn request(&self, method: ProbeMethod, url: &str) -> Result<ProbeResponse, ProbeError> {
        let head_attempt = match method {
            ProbeMethod::Head => self.head_calls.fetch_add(1, Ordering::SeqCst),
            ProbeMethod::Get => {
                self.get_calls.fetch_add(1, Ordering::SeqCst);
                0
            }
        };

        match self.outcome_for(method, url, head_attempt) {
            ProbeOutcome::Status(status) => Ok(ProbeResponse { status }),
            ProbeOutcome::Timeout => Err(ProbeError::Timeout),
            ProbeOutcome::BadRequest(msg) => Err(ProbeError::BadRequest(msg)),
        }
    }
}
