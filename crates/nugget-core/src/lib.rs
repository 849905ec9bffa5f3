#![deny(warnings)]
#![allow(missing_docs)]
//! Core functionality for Nugget Cover.
//!
//! This crate flattens per-topic nugget requirement documents into typed AND/OR
//! requirements and resolves them into a small set of documents that substantiates every
//! supportable fact, using a deterministic greedy set-cover heuristic.

/// Structured diagnostics for recovered data-quality conditions
pub mod diagnostics;
/// Topic-level error handling
pub mod error;
/// Normalization of raw topic documents into requirements
pub mod flatten;
/// OR-collapse and greedy minimal-document cover
pub mod resolver;
/// Per-topic boundary combining flattening and resolution
pub mod topic;

pub use diagnostics::{Diagnostic, Diagnostics, FactOrigin, Severity};
pub use error::{CoverError, CoverResult};
pub use flatten::{flatten_question, flatten_requirements};
pub use nugget_types::{DocumentId, FactEntry, Requirement, RequirementKind};
pub use resolver::{
    CoverStep, CoverageFact, CoverageTable, FactKey, OrChoice, Resolution, collapse_or,
    greedy_cover, resolve_cover,
};
pub use topic::{TopicResolution, resolve_topic, resolve_topic_str};

