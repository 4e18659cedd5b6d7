//! The canonical plan structure.
//!
//! These types are the wire contract shared with downstream consumers:
//! field names and casing must not drift. The generation backend is
//! prompted to emit exactly this JSON shape, and the cleaned plan is
//! returned to callers in the same shape.

use serde::{Deserialize, Serialize};

/// Content modality of a learning resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Reading,
    Interactive,
    Project,
}

/// One learning unit within a week.
///
/// `id` is assigned sequentially by the generator within a single plan.
/// After validation prunes dead links, surviving ids are **not**
/// renumbered; gaps are expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub title: String,
    pub source: String,
    pub url: String,
    /// Free-text duration label (e.g. "2 hours", "30 minutes").
    pub duration: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// An ordered curriculum unit.
///
/// `week_number` is 1-based and dense across the plan. A week's resource
/// list may become empty after validation; empty weeks are retained and
/// callers must handle them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub week_number: u32,
    pub theme: String,
    pub resources: Vec<Resource>,
}

/// A generation-stage plan, before metadata enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub topic: String,
    pub weeks: Vec<Week>,
}

impl Plan {
    /// Total resource count across all weeks.
    pub fn resource_count(&self) -> usize {
        self.weeks.iter().map(|w| w.resources.len()).sum()
    }
}

/// A cleaned plan plus the request metadata that produced it.
///
/// The metadata is supplied by the caller, never re-derived from model
/// output. The weeks array keeps the contract name `weeks`; the requested
/// week count serializes as `weeksRequested` to avoid colliding with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPlan {
    #[serde(flatten)]
    pub plan: Plan,
    pub level: String,
    pub weeks_requested: u32,
    pub hours_per_week: u32,
}
