//! pathcraft-core: the plan-generation and resource-validation pipeline.
//!
//! A request flows through four stages:
//!
//! 1. [`generate`] -- build the prompt and call the generation backend.
//! 2. [`plan::normalize`] -- repair the raw model output into a [`plan::Plan`].
//! 3. [`validate`] -- concurrently confirm every resource URL is live or
//!    trusted, pruning the rest.
//! 4. Enrichment -- attach the request metadata to the cleaned plan.
//!
//! [`pipeline::PlanPipeline`] wires the stages together; the HTTP server
//! and the one-shot CLI command both drive it. External runtimes (the LLM
//! backend, the outbound URL probe) sit behind object-safe traits so tests
//! can inject scripted doubles.

pub mod check;
pub mod generate;
pub mod llm;
pub mod pipeline;
pub mod plan;
pub mod validate;
