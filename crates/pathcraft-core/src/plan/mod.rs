//! Plan data model, output normalization, and URL canonicalization.

pub mod normalize;
pub mod types;
pub mod youtube;

pub use normalize::{MalformedPlanError, normalize_plan};
pub use types::{EnrichedPlan, Plan, Resource, ResourceKind, Week};
