use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use pathcraft_core::check::{LivenessChecker, ReqwestProbe};
use pathcraft_core::generate::{GenerateRequest, PlanGenerator};
use pathcraft_core::llm::http::HttpLlmClient;
use pathcraft_core::pipeline::PlanPipeline;
use pathcraft_core::plan::EnrichedPlan;
use pathcraft_core::validate::ValidationReport;

use crate::config::PathcraftConfig;

pub struct GenerateArgs {
    pub topic: String,
    pub level: String,
    pub weeks: u32,
    pub hours_per_week: u32,
    pub skip_validation: bool,
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct GenerateOutput {
    plan: EnrichedPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<ValidationReport>,
}

/// Build the shared pipeline from resolved configuration.
pub fn build_pipeline(config: &PathcraftConfig) -> Result<Arc<PlanPipeline>> {
    let llm = Arc::new(HttpLlmClient::new(config.llm.clone()));
    let probe =
        Arc::new(ReqwestProbe::new(config.probe_timeout).context("failed to build URL probe")?);
    let checker = LivenessChecker::new(probe, config.checker.clone());
    Ok(Arc::new(PlanPipeline::new(PlanGenerator::new(llm), checker)))
}

/// Execute the `pathcraft generate` command: one plan, printed as JSON.
pub async fn run_generate(config: &PathcraftConfig, args: GenerateArgs) -> Result<()> {
    let request = GenerateRequest {
        topic: args.topic,
        level: args.level,
        weeks: args.weeks,
        hours_per_week: args.hours_per_week,
    };

    let output = if args.skip_validation {
        let llm = Arc::new(HttpLlmClient::new(config.llm.clone()));
        let plan = PlanGenerator::new(llm).generate(&request).await?;
        GenerateOutput {
            plan: EnrichedPlan {
                plan,
                level: request.level,
                weeks_requested: request.weeks,
                hours_per_week: request.hours_per_week,
            },
            validation: None,
        }
    } else {
        let pipeline = build_pipeline(config)?;

        // Ctrl+C resolves in-flight checks leniently instead of killing
        // the run mid-validation.
        let cancel = CancellationToken::new();
        let cancel_on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel_on_signal.cancel();
            }
        });

        let (plan, validation) = pipeline.run(&request, &cancel).await?;
        GenerateOutput {
            plan,
            validation: Some(validation),
        }
    };

    let json = serde_json::to_string_pretty(&output).context("failed to serialize plan")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write plan to {}", path.display()))?;
            tracing::info!(path = %path.display(), "plan written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
