//! Plan generation: one LLM call, normalized into a [`Plan`].
//!
//! The generator builds the prompt pair, calls the backend exactly once
//! (no internal retry -- regeneration is a caller policy), and hands the
//! raw output to the normalizer. Sampling temperature leans deterministic
//! to reduce hallucinated or unstable URLs.

pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{ChatMessage, LlmClient, LlmError};
use crate::plan::{MalformedPlanError, Plan, normalize_plan};

/// Low temperature for consistent, reliable URL output.
const TEMPERATURE: f32 = 0.5;

/// Parameters for one plan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub topic: String,
    pub level: String,
    pub weeks: u32,
    pub hours_per_week: u32,
}

/// A failed generation attempt. Fatal for the request; there is never a
/// partial plan.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("rate limits exceeded, please try again later")]
    RateLimited,

    #[error("payment required, please add credits to your workspace")]
    PaymentRequired,

    #[error("generation backend failure")]
    Upstream { status: u16, body: String },

    #[error("failed to reach generation backend: {0}")]
    Transport(String),

    #[error(transparent)]
    Malformed(#[from] MalformedPlanError),
}

impl From<LlmError> for GenerateError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited => Self::RateLimited,
            LlmError::PaymentRequired => Self::PaymentRequired,
            LlmError::Upstream { status, body } => Self::Upstream { status, body },
            LlmError::EmptyCompletion => Self::Upstream {
                status: 200,
                body: "no completion content".to_string(),
            },
            LlmError::Transport(msg) => Self::Transport(msg),
        }
    }
}

/// Derive the target resource count from total available hours.
///
/// One resource per ~3 hours, clamped to [10, 20] so that both trivially
/// small and excessively large requests land on a workable curriculum.
pub fn resource_count(weeks: u32, hours_per_week: u32) -> u32 {
    let total_hours = weeks * hours_per_week;
    (total_hours / 3).clamp(10, 20)
}

/// Builds prompts and drives the generation backend.
pub struct PlanGenerator {
    llm: Arc<dyn LlmClient>,
}

impl PlanGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Generate a plan for the request. Returns the generation-stage plan;
    /// validation and enrichment are separate stages.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<Plan, GenerateError> {
        let count = resource_count(request.weeks, request.hours_per_week);
        tracing::info!(
            topic = %request.topic,
            level = %request.level,
            weeks = request.weeks,
            hours_per_week = request.hours_per_week,
            resource_count = count,
            "generating learning plan"
        );

        let messages = [
            ChatMessage::system(prompt::build_system_prompt()),
            ChatMessage::user(prompt::build_user_prompt(request, count)),
        ];

        let raw = self.llm.complete(&messages, TEMPERATURE).await?;
        let plan = normalize_plan(&raw)?;

        tracing::info!(
            weeks = plan.weeks.len(),
            resources = plan.resource_count(),
            "generated plan parsed"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    // Import the externally built crate rather than `super::*` so these
    // types match the crate instance the test-utils mocks implement.
    use pathcraft_core::generate::{GenerateError, GenerateRequest, PlanGenerator, resource_count};
    use pathcraft_test_utils::MockLlm;
    use std::sync::Arc;

    #[test]
    fn resource_count_clamps_tiny_requests_up() {
        // 1 week * 1 hour = 1 total hour; 1/3 floors to 0, clamped to 10.
        assert_eq!(resource_count(1, 1), 10);
    }

    #[test]
    fn resource_count_clamps_large_requests_down() {
        // 10 * 10 = 100 hours; 100/3 floors to 33, clamped to 20.
        assert_eq!(resource_count(10, 10), 20);
    }

    #[test]
    fn resource_count_passes_through_midrange() {
        // 45 hours -> 15 resources.
        assert_eq!(resource_count(9, 5), 15);
        // 36 hours -> 12.
        assert_eq!(resource_count(6, 6), 12);
    }

    #[test]
    fn resource_count_boundaries_are_inclusive() {
        // 30 hours -> exactly 10; 60 hours -> exactly 20.
        assert_eq!(resource_count(6, 5), 10);
        assert_eq!(resource_count(12, 5), 20);
    }

    fn request() -> GenerateRequest {
        GenerateRequest {
            topic: "Python Programming".to_string(),
            level: "beginner".to_string(),
            weeks: 2,
            hours_per_week: 5,
        }
    }

    const PLAN_JSON: &str = r#"{"topic": "Python Programming", "weeks": [
        {"weekNumber": 1, "theme": "Basics", "resources": [
            {"id": 1, "type": "reading", "title": "Tutorial",
             "source": "Python.org", "url": "https://docs.python.org/3/tutorial/",
             "duration": "2 hours", "description": "Official docs", "completed": false}
        ]}
    ]}"#;

    #[tokio::test]
    async fn generate_parses_model_output() {
        let llm = Arc::new(MockLlm::with_response(PLAN_JSON));
        let generator = PlanGenerator::new(llm.clone());

        let plan = generator.generate(&request()).await.expect("should generate");

        assert_eq!(plan.topic, "Python Programming");
        assert_eq!(plan.weeks.len(), 1);
        assert_eq!(llm.calls(), 1, "generator must call the backend exactly once");
    }

    #[tokio::test]
    async fn generate_sends_system_and_user_messages() {
        let llm = Arc::new(MockLlm::with_response(PLAN_JSON));
        let generator = PlanGenerator::new(llm.clone());

        generator.generate(&request()).await.unwrap();

        let (messages, temperature) = llm.last_request().expect("a request was recorded");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].0, "system");
        assert_eq!(messages[1].0, "user");
        assert!(messages[1].1.contains("2-week study plan"));
        assert!((temperature - 0.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn malformed_output_is_fatal_and_not_retried() {
        let llm = Arc::new(MockLlm::with_response("I cannot produce JSON today."));
        let generator = PlanGenerator::new(llm.clone());

        let err = generator.generate(&request()).await.unwrap_err();

        assert!(matches!(err, GenerateError::Malformed(_)), "got: {err}");
        assert_eq!(llm.calls(), 1, "no regeneration retry at this layer");
    }

    #[tokio::test]
    async fn rate_limit_surfaces_as_kind_specific_error() {
        let llm = Arc::new(MockLlm::rate_limited());
        let generator = PlanGenerator::new(llm);

        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::RateLimited), "got: {err}");
    }

    #[tokio::test]
    async fn payment_required_surfaces_as_kind_specific_error() {
        let llm = Arc::new(MockLlm::payment_required());
        let generator = PlanGenerator::new(llm);

        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::PaymentRequired), "got: {err}");
    }

    #[tokio::test]
    async fn fenced_output_is_repaired() {
        let fenced = format!("```json\n{PLAN_JSON}\n```");
        let llm = Arc::new(MockLlm::with_response(fenced));
        let generator = PlanGenerator::new(llm);

        let plan = generator.generate(&request()).await.expect("should repair fences");
        assert_eq!(plan.weeks.len(), 1);
    }
}
