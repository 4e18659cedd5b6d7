//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ChatMessage, LlmClient, LlmError};

/// Connection settings for the generation backend, injected at process
/// start rather than read from the environment inside the pipeline.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL up to the API version segment, e.g.
    /// `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Chat-completions client over reqwest.
pub struct HttpLlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl HttpLlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": temperature,
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                429 => LlmError::RateLimited,
                402 => LlmError::PaymentRequired,
                code => {
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(status = code, %body, "generation backend error");
                    LlmError::Upstream { status: code, body }
                }
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }
}
