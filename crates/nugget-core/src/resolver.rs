//! Greedy Cover Resolver
//!
//! Turns a flattened requirement sequence into a small set of documents that covers every
//! supportable fact.
//!
//! ## Resolution Steps
//!
//! ```text
//! Requirements → OR-collapse → Coverage table → Greedy loop → Selected documents
//!   And / Or      fewest docs    FactKey → docs   max uncovered
//!                 first wins     empty dropped    smallest id wins ties
//! ```
//!
//! The loop is the classic greedy set-cover approximation. It is deterministic but not
//! optimal: once a document is selected it is never removed.

use crate::diagnostics::{Diagnostic, Diagnostics, FactOrigin};
use nugget_types::{DocumentId, FactEntry, Requirement};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument, trace};

/// Unique key of a fact within one topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactKey {
    /// Index of the requirement in the flattened sequence
    pub requirement: usize,
    /// Index of the fact (or chosen alternative) inside that requirement
    pub entry: usize,
}

/// A supportable fact and the documents that cover it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageFact {
    /// Position of the fact in the flattened requirements
    pub key: FactKey,
    /// Fact question the fact was flattened from
    pub question: String,
    /// Fact label
    pub label: String,
    /// Usable supporting documents, deduplicated
    pub documents: BTreeSet<DocumentId>,
}

/// Outcome of collapsing one OR-requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrChoice {
    /// Index of the OR-requirement in the flattened sequence
    pub requirement: usize,
    /// Fact question of the OR-requirement
    pub question: String,
    /// Label of the chosen alternative
    pub label: String,
    /// Length of the chosen alternative's document list as written
    pub listed_count: usize,
    /// Number of alternatives that were offered
    pub alternatives: usize,
}

/// One iteration of the greedy loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverStep {
    /// Document selected in this iteration
    pub document: DocumentId,
    /// Labels of the facts this document covered for the first time
    pub newly_covered: Vec<String>,
    /// Facts still uncovered after this step
    pub remaining: usize,
}

/// Fact-coverage table, ordered by [`FactKey`]. Only supportable facts are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTable {
    facts: Vec<CoverageFact>,
}

impl CoverageTable {
    /// Collapse OR-requirements and merge everything into one table.
    ///
    /// Facts with no supporting documents are reported as unsupportable and left out.
    pub fn build(requirements: &[Requirement], diagnostics: &mut Diagnostics) -> (Self, Vec<OrChoice>) {
        let mut facts = Vec::new();
        let mut or_choices = Vec::new();

        for (requirement_index, requirement) in requirements.iter().enumerate() {
            let question = requirement.question();
            match requirement {
                Requirement::And { facts: entries, .. } => {
                    for (entry_index, entry) in entries.iter().enumerate() {
                        let key = FactKey { requirement: requirement_index, entry: entry_index };
                        push_fact(&mut facts, key, question, entry, FactOrigin::AndEntry, diagnostics);
                    }
                }
                Requirement::Or { alternatives, .. } => {
                    let Some(chosen) = collapse_or(alternatives) else {
                        diagnostics.push(Diagnostic::EmptyOrGroup { question: question.to_string() });
                        continue;
                    };
                    let entry = &alternatives[chosen];
                    debug!(
                        question = %question,
                        label = %entry.label,
                        listed = entry.listed_count(),
                        alternatives = alternatives.len(),
                        "Collapsed OR requirement"
                    );
                    or_choices.push(OrChoice {
                        requirement: requirement_index,
                        question: question.to_string(),
                        label: entry.label.clone(),
                        listed_count: entry.listed_count(),
                        alternatives: alternatives.len(),
                    });
                    let key = FactKey { requirement: requirement_index, entry: chosen };
                    push_fact(&mut facts, key, question, entry, FactOrigin::OrChoice, diagnostics);
                }
            }
        }

        (Self { facts }, or_choices)
    }

    /// Supportable facts, in key order
    pub fn facts(&self) -> &[CoverageFact] {
        &self.facts
    }

    /// Number of supportable facts
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// True when no fact imposes a coverage obligation
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Union of every document referenced by the table
    pub fn documents(&self) -> BTreeSet<&str> {
        self.facts.iter().flat_map(|f| f.documents.iter().map(String::as_str)).collect()
    }
}

fn push_fact(
    facts: &mut Vec<CoverageFact>,
    key: FactKey,
    question: &str,
    entry: &FactEntry,
    origin: FactOrigin,
    diagnostics: &mut Diagnostics,
) {
    if entry.is_unsupportable() {
        diagnostics.push(Diagnostic::UnsupportableFact {
            question: question.to_string(),
            label: entry.label.clone(),
            origin,
        });
        return;
    }
    facts.push(CoverageFact {
        key,
        question: question.to_string(),
        label: entry.label.clone(),
        documents: entry.documents.iter().cloned().collect(),
    });
}

/// Index of the OR alternative with the fewest listed documents.
///
/// Alternatives are ranked by the length of their list as written, so elements that are not
/// document ids still count. An empty list ranks after every non-empty one, and equal
/// counts keep the first in mapping order. Returns `None` only when there are no
/// alternatives.
pub fn collapse_or(alternatives: &[FactEntry]) -> Option<usize> {
    alternatives
        .iter()
        .enumerate()
        .min_by_key(|(_, entry)| (entry.listed_count() == 0, entry.listed_count()))
        .map(|(index, _)| index)
}

/// Greedy maximum-coverage loop over a coverage table.
///
/// Each iteration selects the document covering the most uncovered facts; ties go to the
/// lexicographically smallest document id.
pub fn greedy_cover(table: &CoverageTable) -> (BTreeSet<DocumentId>, Vec<CoverStep>) {
    let facts = table.facts();
    let mut uncovered: BTreeSet<usize> = (0..facts.len()).collect();
    let mut selected = BTreeSet::new();
    let mut steps = Vec::new();

    while !uncovered.is_empty() {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for &index in &uncovered {
            for document in &facts[index].documents {
                *counts.entry(document.as_str()).or_insert(0) += 1;
            }
        }

        // BTreeMap iterates in id order, so keeping only strictly greater counts
        // leaves the smallest id among the tied maxima.
        let mut best: Option<(&str, usize)> = None;
        for (&document, &count) in &counts {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((document, count));
            }
        }
        let Some((document, count)) = best else {
            break;
        };

        let newly: Vec<usize> =
            uncovered.iter().copied().filter(|&i| facts[i].documents.contains(document)).collect();
        for index in &newly {
            uncovered.remove(index);
        }

        trace!(document = %document, covered = count, remaining = uncovered.len(), "Selected document");
        selected.insert(document.to_string());
        steps.push(CoverStep {
            document: document.to_string(),
            newly_covered: newly.iter().map(|&i| facts[i].label.clone()).collect(),
            remaining: uncovered.len(),
        });
    }

    (selected, steps)
}

/// Result of resolving one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Selected documents, sorted
    pub selected: BTreeSet<DocumentId>,
    /// One entry per collapsed OR-requirement
    pub or_choices: Vec<OrChoice>,
    /// Greedy iterations in selection order
    pub steps: Vec<CoverStep>,
    /// Coverage table the loop ran over
    pub table: CoverageTable,
    /// Facts that reached the coverage stage, supportable or not
    pub facts_total: usize,
    /// Facts dropped for having no usable document
    pub facts_unsupportable: usize,
}

impl Resolution {
    /// True when every fact in the table has at least one selected document
    pub fn covers_all(&self) -> bool {
        self.uncovered_facts().is_empty()
    }

    /// Table facts with no selected document
    pub fn uncovered_facts(&self) -> Vec<&CoverageFact> {
        self.table
            .facts()
            .iter()
            .filter(|fact| fact.documents.is_disjoint(&self.selected))
            .collect()
    }

    /// Selected document ids in ascending order
    pub fn selected_sorted(&self) -> Vec<&str> {
        self.selected.iter().map(String::as_str).collect()
    }
}

/// Collapse, tabulate and cover a flattened requirement sequence
#[instrument(skip_all, fields(requirements = requirements.len()))]
pub fn resolve_cover(requirements: &[Requirement], diagnostics: &mut Diagnostics) -> Resolution {
    let unsupportable_before = diagnostics.count_kind("unsupportable_fact");
    let (table, or_choices) = CoverageTable::build(requirements, diagnostics);
    let facts_unsupportable = diagnostics.count_kind("unsupportable_fact") - unsupportable_before;

    let (selected, steps) = greedy_cover(&table);
    debug!(
        facts = table.len(),
        unsupportable = facts_unsupportable,
        selected = selected.len(),
        "Resolved minimal document cover"
    );

    Resolution {
        selected,
        or_choices,
        steps,
        facts_total: table.len() + facts_unsupportable,
        facts_unsupportable,
        table,
    }
}
