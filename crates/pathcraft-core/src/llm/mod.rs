//! The `LlmClient` trait -- the adapter interface for generation backends.
//!
//! The production implementation ([`http::HttpLlmClient`]) talks to an
//! OpenAI-compatible chat-completions endpoint. The trait is object-safe
//! so the generator can hold `Arc<dyn LlmClient>` and tests can inject
//! scripted clients.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpLlmClient;

/// One message in a chat-completion request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// A failed call to the generation backend.
///
/// Rate limiting and payment exhaustion are split out because callers
/// surface them verbatim with distinct HTTP statuses; everything else
/// collapses into a generic upstream failure.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("generation backend rate limited the request")]
    RateLimited,

    #[error("generation backend rejected the request: payment required")]
    PaymentRequired,

    #[error("generation backend returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("generation backend returned no completion content")]
    EmptyCompletion,

    #[error("failed to reach generation backend: {0}")]
    Transport(String),
}

/// Adapter interface for chat-completion backends.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one chat-completion request and return the assistant text.
    async fn complete(&self, messages: &[ChatMessage], temperature: f32)
    -> Result<String, LlmError>;
}

// Compile-time assertion: LlmClient must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn LlmClient) {}
};
