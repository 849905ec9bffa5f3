//! Structured diagnostics for data-quality conditions
//!
//! The flattener and the resolver never fail on bad topic data. Every condition they recover
//! from is recorded here as a [`Diagnostic`] and mirrored to `tracing`, so a library caller
//! can inspect what was skipped without scraping console output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Expected gap in the source data
    Info,
    /// Input that did not match the expected shape
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// Where an unsupportable fact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactOrigin {
    /// Mandatory fact of an AND-requirement
    AndEntry,
    /// Alternative picked by OR-collapse (every alternative was empty)
    OrChoice,
}

impl fmt::Display for FactOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactOrigin::AndEntry => write!(f, "AND entry"),
            FactOrigin::OrChoice => write!(f, "chosen OR alternative"),
        }
    }
}

/// A recovered data-quality condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A fact question's value matched none of the AND/OR shapes and was skipped
    UnrecognizedRequirementShape {
        /// Fact question that was skipped
        question: String,
        /// Kind of JSON value found instead
        found: String,
    },
    /// A fact has no supporting documents and imposes no coverage obligation
    UnsupportableFact {
        /// Fact question the fact belongs to
        question: String,
        /// Fact label
        label: String,
        /// Whether the fact was mandatory or a chosen alternative
        origin: FactOrigin,
    },
    /// A fact's document list was not an array; the fact was kept with no documents
    MalformedDocumentList {
        /// Fact question the fact belongs to
        question: String,
        /// Fact label
        label: String,
        /// Kind of JSON value found instead of an array
        found: String,
    },
    /// Elements of a fact's document list were not document ids and were left out
    SkippedDocumentIds {
        /// Fact question the fact belongs to
        question: String,
        /// Fact label
        label: String,
        /// Number of elements left out
        skipped: usize,
    },
    /// An OR-requirement listed no alternatives at all
    EmptyOrGroup {
        /// Fact question of the empty group
        question: String,
    },
}

impl Diagnostic {
    /// Stable code used for counting and display
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::UnrecognizedRequirementShape { .. } => "unrecognized_requirement_shape",
            Diagnostic::UnsupportableFact { .. } => "unsupportable_fact",
            Diagnostic::MalformedDocumentList { .. } => "malformed_document_list",
            Diagnostic::SkippedDocumentIds { .. } => "skipped_document_ids",
            Diagnostic::EmptyOrGroup { .. } => "empty_or_group",
        }
    }

    /// Informational for expected gaps, warning for malformed input
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::UnsupportableFact { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Fact question the condition was found under
    pub fn question(&self) -> &str {
        match self {
            Diagnostic::UnrecognizedRequirementShape { question, .. }
            | Diagnostic::UnsupportableFact { question, .. }
            | Diagnostic::MalformedDocumentList { question, .. }
            | Diagnostic::SkippedDocumentIds { question, .. }
            | Diagnostic::EmptyOrGroup { question } => question,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnrecognizedRequirementShape { question, found } => {
                write!(f, "unknown format for question '{question}' (found {found})")
            }
            Diagnostic::UnsupportableFact { question, label, origin } => {
                write!(f, "fact '{label}' under '{question}' has no supporting documents ({origin})")
            }
            Diagnostic::MalformedDocumentList { question, label, found } => {
                write!(f, "fact '{label}' under '{question}' has a {found} instead of a document list")
            }
            Diagnostic::SkippedDocumentIds { question, label, skipped } => {
                write!(f, "fact '{label}' under '{question}' lists {skipped} entries that are not document ids")
            }
            Diagnostic::EmptyOrGroup { question } => {
                write!(f, "OR group for question '{question}' has no alternatives")
            }
        }
    }
}

/// Collector passed through flattening and resolution of one topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => warn!(
                kind = diagnostic.kind(),
                question = %diagnostic.question(),
                "{diagnostic}"
            ),
            Severity::Info => debug!(
                kind = diagnostic.kind(),
                question = %diagnostic.question(),
                "{diagnostic}"
            ),
        }
        self.entries.push(diagnostic);
    }

    /// Diagnostics in the order they were recorded
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics of the given kind code
    pub fn count_kind(&self, kind: &str) -> usize {
        self.entries.iter().filter(|d| d.kind() == kind).count()
    }

    /// Counts per kind code, sorted by code
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in &self.entries {
            *counts.entry(diagnostic.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Take the recorded diagnostics
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
