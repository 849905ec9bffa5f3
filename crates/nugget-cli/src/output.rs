//! Text and JSON rendering of resolved topics

use crate::batch::{BatchReport, TopicOutcome, TopicStatus};
use nugget_core::{CoverResult, Diagnostic, OrChoice, TopicResolution};
use serde::Serialize;
use std::fmt::Write as _;

/// JSON record for one topic of a batch
#[derive(Debug, Serialize)]
pub struct TopicRecord<'a> {
    pub lang: &'a str,
    pub topic: &'a str,
    pub path: String,
    /// `resolved`, `missing` or `failed`
    pub status: &'static str,
    /// Selected documents, empty unless resolved
    pub documents: Vec<&'a str>,
    pub or_choices: &'a [OrChoice],
    pub diagnostics: &'a [Diagnostic],
    /// Failure message for failed topics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a TopicOutcome> for TopicRecord<'a> {
    fn from(outcome: &'a TopicOutcome) -> Self {
        let mut record = TopicRecord {
            lang: &outcome.source.lang,
            topic: &outcome.source.topic,
            path: outcome.source.path.display().to_string(),
            status: outcome.status.name(),
            documents: Vec::new(),
            or_choices: &[],
            diagnostics: &[],
            error: None,
        };
        match &outcome.status {
            TopicStatus::Resolved(topic) => {
                record.documents = topic.documents();
                record.or_choices = &topic.resolution.or_choices;
                record.diagnostics = topic.diagnostics.entries();
            }
            TopicStatus::Missing => {}
            TopicStatus::Failed(err) => record.error = Some(err.to_string()),
        }
        record
    }
}

/// Selected documents, one per line
pub fn render_documents(topic: &TopicResolution) -> String {
    let mut out = String::new();
    for document in topic.documents() {
        let _ = writeln!(out, "{document}");
    }
    out
}

pub fn render_batch_text(report: &BatchReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        let label = outcome.source.label();
        match &outcome.status {
            TopicStatus::Resolved(topic) => {
                let _ = writeln!(out, "Minimal document IDs for {label}:");
                out.push_str(&render_documents(topic));
                let unsupportable = topic.resolution.facts_unsupportable;
                if unsupportable > 0 {
                    let _ = writeln!(out, "# {unsupportable} unsupportable facts skipped");
                }
            }
            TopicStatus::Missing => {
                let _ = writeln!(out, "File not found for {label}: {}", outcome.source.path.display());
            }
            TopicStatus::Failed(err) => {
                let _ = writeln!(out, "Failed {label}: {err}");
            }
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "Summary: {} resolved, {} missing, {} failed",
        report.resolved(),
        report.missing(),
        report.failed()
    );
    out
}

pub fn render_batch_json(report: &BatchReport) -> CoverResult<String> {
    let records: Vec<TopicRecord<'_>> = report.outcomes.iter().map(TopicRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Decision trace of one topic: requirements, OR choices, greedy steps, diagnostics
pub fn render_explain(topic: &TopicResolution) -> String {
    let mut out = String::new();
    let resolution = &topic.resolution;

    let _ = writeln!(out, "Requirements ({}):", topic.requirements.len());
    for (index, requirement) in topic.requirements.iter().enumerate() {
        let _ = writeln!(out, "  [{index}] {requirement}");
    }

    let _ = writeln!(out, "\nOR choices ({}):", resolution.or_choices.len());
    for choice in &resolution.or_choices {
        let _ = writeln!(
            out,
            "  [{}] {} -> {} ({} docs, {} alternatives)",
            choice.requirement, choice.question, choice.label, choice.listed_count, choice.alternatives
        );
    }

    let _ = writeln!(
        out,
        "\nCoverage table: {} facts ({} unsupportable dropped)",
        resolution.table.len(),
        resolution.facts_unsupportable
    );

    let _ = writeln!(out, "\nGreedy steps:");
    for (step_number, step) in resolution.steps.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} covers [{}], {} remaining",
            step_number + 1,
            step.document,
            step.newly_covered.join(", "),
            step.remaining
        );
    }

    if !topic.diagnostics.is_empty() {
        let _ = writeln!(out, "\nDiagnostics:");
        for diagnostic in topic.diagnostics.entries() {
            let _ = writeln!(out, "  {}: {diagnostic}", diagnostic.severity());
        }
    }

    let _ = writeln!(out, "\nSelected ({}):", resolution.selected.len());
    for document in topic.documents() {
        let _ = writeln!(out, "  {document}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nugget_core::resolve_topic;
    use serde_json::json;

    fn sample_topic() -> TopicResolution {
        resolve_topic(&json!({
            "Q1": { "A": ["doc1", "doc2"], "B": ["doc2", "doc3"] },
            "Q2": ["OR", { "alt1": ["doc4"], "alt2": ["doc4", "doc5"] }],
            "Q3": { "empty": [] }
        }))
        .unwrap()
    }

    #[test]
    fn test_render_documents_sorted_lines() {
        assert_eq!(render_documents(&sample_topic()), "doc2\ndoc4\n");
    }

    #[test]
    fn test_render_explain_lists_steps_and_choices() {
        let text = render_explain(&sample_topic());
        assert!(text.contains("Q2 -> alt1 (1 docs, 2 alternatives)"));
        assert!(text.contains("1. doc2 covers [A, B], 1 remaining"));
        assert!(text.contains("2. doc4 covers [alt1], 0 remaining"));
        assert!(text.contains("INFO: fact 'empty' under 'Q3' has no supporting documents"));
    }
}
