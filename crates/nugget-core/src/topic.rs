//! Topic boundary: one parsed nugget document in, one resolution out

use crate::diagnostics::Diagnostics;
use crate::error::{CoverError, CoverResult};
use crate::flatten::flatten_requirements;
use crate::resolver::{Resolution, resolve_cover};
use nugget_types::{Requirement, json_kind};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

/// Everything computed for one topic
#[derive(Debug, Clone, Serialize)]
pub struct TopicResolution {
    /// Flattened requirements in input order
    pub requirements: Vec<Requirement>,
    /// Collapse and cover outcome
    pub resolution: Resolution,
    /// Conditions recovered while flattening and resolving
    pub diagnostics: Diagnostics,
}

impl TopicResolution {
    /// Selected documents in display order
    pub fn documents(&self) -> Vec<&str> {
        self.resolution.selected_sorted()
    }
}

/// Flatten and resolve a parsed topic document.
///
/// Only a top-level value that is not a JSON object is an error; every problem inside the
/// object is recovered and recorded in the returned diagnostics.
#[instrument(skip_all)]
pub fn resolve_topic(data: &Value) -> CoverResult<TopicResolution> {
    let Value::Object(map) = data else {
        return Err(CoverError::invalid_topic(
            json_kind(data),
            "topic document must be an object keyed by fact question",
        ));
    };

    let mut diagnostics = Diagnostics::new();
    let requirements = flatten_requirements(map, &mut diagnostics);
    let resolution = resolve_cover(&requirements, &mut diagnostics);

    info!(
        questions = map.len(),
        requirements = requirements.len(),
        selected = resolution.selected.len(),
        diagnostics = diagnostics.len(),
        "Topic resolved"
    );

    Ok(TopicResolution { requirements, resolution, diagnostics })
}

/// Parse JSON text and resolve it
pub fn resolve_topic_str(json: &str) -> CoverResult<TopicResolution> {
    let data: Value = serde_json::from_str(json)?;
    resolve_topic(&data)
}
