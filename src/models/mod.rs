//! Data models for generated digests.
//!
//! - [`DigestData`] - The persisted result of one generation cycle
//! - [`WorkflowResult`] - Phase and delivery status reported by the agent
//! - [`ResearchResult`] - Findings and the sources the agent searched
//! - [`Finding`] - One research result with topic and credibility metadata
//!
//! These types are fully typed. Loosely-shaped agent replies are mapped into
//! them by the `normalizer` module.

pub mod digest;

pub use digest::{DigestData, Finding, PhasesCompleted, ResearchResult, WorkflowResult};
