//! Concurrent plan validation: scatter/gather across every resource.
//!
//! Every (week, resource) pair becomes one independent check in a single
//! flat batch joined by one barrier; total wall-clock time is bounded by
//! the slowest single check, not the sum. A resource's check never
//! affects another's, and a failed check never aborts the batch -- the
//! validator always resolves. Rejected resources are pruned in place;
//! weeks are kept even when they end up empty, and ordering is preserved.

use std::collections::HashMap;

use futures::future::join_all;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::check::{LivenessChecker, Verdict, is_trusted};
use crate::plan::{Plan, youtube};

/// Retention counts for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStats {
    pub week_number: u32,
    pub checked: usize,
    pub retained: usize,
    pub removed: usize,
}

/// Aggregate counts for one validation pass. Informational only; no
/// minimum resource count is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub checked: usize,
    pub retained: usize,
    pub weeks: Vec<WeekStats>,
}

/// Validate every resource URL in the plan, pruning the rejected ones.
///
/// Per resource: canonicalize the URL, accept trusted domains without a
/// network call, otherwise run a liveness check. The canonical URL
/// replaces the original in the output; verdicts are internal bookkeeping
/// and never appear in the returned plan.
///
/// Cancelling `cancel` aborts in-flight probes; checks that never ran
/// resolve leniently so nothing is pruned on a check that was cut short.
pub async fn validate_plan(
    plan: Plan,
    checker: &LivenessChecker,
    cancel: &CancellationToken,
) -> (Plan, ValidationReport) {
    tracing::info!(weeks = plan.weeks.len(), resources = plan.resource_count(), "validating resource urls");

    // Scatter: one flat batch of independent checks.
    let mut checks = Vec::with_capacity(plan.resource_count());
    for (week_idx, week) in plan.weeks.iter().enumerate() {
        for (resource_idx, resource) in week.resources.iter().enumerate() {
            let url = youtube::canonicalize(&resource.url);
            checks.push(async move {
                let verdict = if is_trusted(&url) {
                    tracing::debug!(%url, "trusted domain, skipped validation");
                    Verdict::Trusted
                } else {
                    tokio::select! {
                        verdict = checker.check(&url) => verdict,
                        _ = cancel.cancelled() => Verdict::Lenient {
                            note: "validation cancelled".to_string(),
                        },
                    }
                };
                ((week_idx, resource_idx), (url, verdict))
            });
        }
    }

    // Gather: the join barrier is the only synchronization point.
    let outcomes: HashMap<(usize, usize), (String, Verdict)> =
        join_all(checks).await.into_iter().collect();

    let mut report = ValidationReport {
        checked: outcomes.len(),
        ..ValidationReport::default()
    };

    let mut cleaned = Plan {
        topic: plan.topic,
        weeks: Vec::with_capacity(plan.weeks.len()),
    };

    for (week_idx, mut week) in plan.weeks.into_iter().enumerate() {
        let checked = week.resources.len();
        let mut retained = Vec::with_capacity(checked);

        for (resource_idx, mut resource) in week.resources.drain(..).enumerate() {
            // Every scattered key is gathered back; a missing entry would
            // mean the barrier lost a check.
            let Some((url, verdict)) = outcomes.get(&(week_idx, resource_idx)) else {
                continue;
            };
            if verdict.is_valid() {
                resource.url = url.clone();
                retained.push(resource);
            } else {
                tracing::info!(
                    week = week.week_number,
                    title = %resource.title,
                    %url,
                    ?verdict,
                    "removing invalid resource"
                );
            }
        }

        let stats = WeekStats {
            week_number: week.week_number,
            checked,
            retained: retained.len(),
            removed: checked - retained.len(),
        };
        if stats.removed > 0 {
            tracing::info!(week = week.week_number, removed = stats.removed, "pruned resources");
        }
        report.retained += stats.retained;
        report.weeks.push(stats);

        week.resources = retained;
        cleaned.weeks.push(week);
    }

    tracing::info!(
        retained = report.retained,
        checked = report.checked,
        "validation complete"
    );

    (cleaned, report)
}
