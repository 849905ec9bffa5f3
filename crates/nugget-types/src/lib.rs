//! Nugget Types
//!
//! This crate defines the data model shared by the Nugget Cover ecosystem (currently
//! `nugget-core` and `nugget-cli`). It provides the fact and requirement types that the
//! flattener produces and the cover resolver consumes, and keeps the JSON mapping for
//! document lists next to the types it concerns.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(missing_docs)]

mod types;
pub use types::{DocumentId, FactEntry, Requirement, RequirementKind, json_kind};
