//! Raw model output -> canonical [`Plan`].
//!
//! Generation backends frequently wrap their JSON in markdown code fences
//! despite instructions not to. Normalization strips one layer of fencing
//! (with an optional language tag), parses the JSON into the plan schema,
//! and canonicalizes every resource URL. Any parse failure is fatal here;
//! regeneration retries are a caller policy, not built in.

use thiserror::Error;

use super::types::Plan;
use super::youtube;

/// The generated text could not be repaired into the plan schema.
#[derive(Debug, Error)]
pub enum MalformedPlanError {
    #[error("generated output is empty")]
    Empty,

    #[error("generated output is not a valid plan: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse raw generated text into a [`Plan`].
///
/// Strips markdown code-fence wrapping if present, parses the JSON, and
/// rewrites recognized YouTube URL variants to the canonical `watch?v=`
/// form.
pub fn normalize_plan(raw: &str) -> Result<Plan, MalformedPlanError> {
    let stripped = strip_code_fences(raw);
    if stripped.is_empty() {
        return Err(MalformedPlanError::Empty);
    }

    let mut plan: Plan = serde_json::from_str(stripped)?;

    for week in &mut plan.weeks {
        for resource in &mut week.resources {
            resource.url = youtube::canonicalize(&resource.url);
        }
    }

    Ok(plan)
}

/// Remove a leading/trailing triple-backtick fence, including an optional
/// language tag on the opening fence. Unfenced input is returned trimmed.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the rest of the opening fence line (e.g. "json").
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => return trimmed,
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
