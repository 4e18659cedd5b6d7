//! The full request pipeline: generate -> validate -> enrich.
//!
//! One [`PlanPipeline`] is built at process start with its backends
//! injected, then shared across requests. A plan value lives only for the
//! duration of one call; persistence belongs to external collaborators.

use tokio_util::sync::CancellationToken;

use crate::check::LivenessChecker;
use crate::generate::{GenerateError, GenerateRequest, PlanGenerator};
use crate::plan::EnrichedPlan;
use crate::validate::{ValidationReport, validate_plan};

/// Generation plus validation behind a single entry point.
pub struct PlanPipeline {
    generator: PlanGenerator,
    checker: LivenessChecker,
}

impl PlanPipeline {
    pub fn new(generator: PlanGenerator, checker: LivenessChecker) -> Self {
        Self { generator, checker }
    }

    /// Run one request end to end.
    ///
    /// Generation and normalization failures are fatal; validation never
    /// fails and only prunes. The caller gets either a complete cleaned
    /// plan or a single top-level error, never a mix.
    pub async fn run(
        &self,
        request: &GenerateRequest,
        cancel: &CancellationToken,
    ) -> Result<(EnrichedPlan, ValidationReport), GenerateError> {
        let plan = self.generator.generate(request).await?;
        let (cleaned, report) = validate_plan(plan, &self.checker, cancel).await;

        let enriched = EnrichedPlan {
            plan: cleaned,
            level: request.level.clone(),
            weeks_requested: request.weeks,
            hours_per_week: request.hours_per_week,
        };
        Ok((enriched, report))
    }
}
