//! Requirement Flattener
//!
//! Normalizes a topic's nugget-requirement document into an ordered sequence of
//! [`Requirement`] values. A topic document maps each fact question to one of:
//!
//! ```text
//! "Q1": ["OR", {"alt1": ["d1"], "alt2": ["d2", "d3"]}]    -> Requirement::Or
//! "Q2": [{"f1": ["d1"]}, {"f2": ["d4"]}, "ignored"]      -> Requirement::And (f1, f2)
//! "Q3": {"f3": ["d5", "d6"]}                              -> Requirement::And (f3)
//! "Q4": 17                                                -> skipped, diagnostic
//! ```
//!
//! Output order follows the document's key order, which `serde_json` preserves.

use crate::diagnostics::{Diagnostic, Diagnostics};
use nugget_types::{FactEntry, Requirement, json_kind};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Tag marking an OR-group as the first element of a question's array
pub const OR_TAG: &str = "OR";

/// Flatten every fact question of a topic, in input order.
///
/// Unrecognized shapes are reported to `diagnostics` and contribute nothing.
#[instrument(skip_all, fields(questions = data.len()))]
pub fn flatten_requirements(data: &Map<String, Value>, diagnostics: &mut Diagnostics) -> Vec<Requirement> {
    let mut requirements = Vec::with_capacity(data.len());

    for (question, info) in data {
        if let Some(requirement) = flatten_question(question, info, diagnostics) {
            requirements.push(requirement);
        }
    }

    debug!(requirements = requirements.len(), "Flattened topic requirements");
    requirements
}

/// Flatten a single fact question, or `None` when its shape is unrecognized
pub fn flatten_question(question: &str, info: &Value, diagnostics: &mut Diagnostics) -> Option<Requirement> {
    match info {
        Value::Array(items) if is_or_group(items) => match items.get(1) {
            Some(Value::Object(alternatives)) => {
                let alternatives = fact_entries(question, alternatives, diagnostics);
                Some(Requirement::or(question, alternatives))
            }
            other => {
                let found = other.map_or("nothing", json_kind);
                diagnostics.push(Diagnostic::UnrecognizedRequirementShape {
                    question: question.to_string(),
                    found: format!("OR tag followed by {found}"),
                });
                None
            }
        },
        Value::Array(items) => {
            let mut facts = Vec::new();
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::Object(map) => facts.extend(fact_entries(question, map, diagnostics)),
                    other => debug!(
                        question = %question,
                        index,
                        kind = json_kind(other),
                        "Ignoring non-mapping item in AND list"
                    ),
                }
            }
            Some(Requirement::and(question, facts))
        }
        Value::Object(map) => Some(Requirement::and(question, fact_entries(question, map, diagnostics))),
        other => {
            diagnostics.push(Diagnostic::UnrecognizedRequirementShape {
                question: question.to_string(),
                found: json_kind(other).to_string(),
            });
            None
        }
    }
}

fn is_or_group(items: &[Value]) -> bool {
    matches!(items.first(), Some(Value::String(tag)) if tag == OR_TAG)
}

/// Convert a fact-label -> document-list mapping, keeping malformed lists as empty facts
fn fact_entries(question: &str, map: &Map<String, Value>, diagnostics: &mut Diagnostics) -> Vec<FactEntry> {
    map.iter()
        .map(|(label, value)| match FactEntry::from_json(label, value) {
            Ok(entry) => {
                if entry.skipped > 0 {
                    diagnostics.push(Diagnostic::SkippedDocumentIds {
                        question: question.to_string(),
                        label: label.clone(),
                        skipped: entry.skipped,
                    });
                }
                entry
            }
            Err(_) => {
                diagnostics.push(Diagnostic::MalformedDocumentList {
                    question: question.to_string(),
                    label: label.clone(),
                    found: json_kind(value).to_string(),
                });
                FactEntry::new(label.as_str(), Vec::<String>::new())
            }
        })
        .collect()
}
