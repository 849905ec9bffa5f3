//! End-to-end scenarios for topic resolution through the JSON boundary

use nugget_core::{FactOrigin, resolve_topic};
use serde_json::json;

#[test]
fn test_shared_document_is_selected_alone() {
    let topic = resolve_topic(&json!({
        "What happened?": { "A": ["doc1", "doc2"], "B": ["doc2", "doc3"] }
    }))
    .expect("topic resolves");

    assert_eq!(topic.documents(), vec!["doc2"]);
    assert!(topic.resolution.covers_all());
}

#[test]
fn test_or_collapse_picks_single_document_alternative() {
    let data = json!({
        "Who was involved?": ["OR", { "alt1": ["doc1"], "alt2": ["doc1", "doc2", "doc3"] }]
    });

    for _ in 0..5 {
        let topic = resolve_topic(&data).expect("topic resolves");
        assert_eq!(topic.resolution.or_choices.len(), 1);
        assert_eq!(topic.resolution.or_choices[0].label, "alt1");
        assert_eq!(topic.resolution.or_choices[0].listed_count, 1);
        assert_eq!(topic.documents(), vec!["doc1"]);
    }
}

#[test]
fn test_or_collapse_tie_keeps_first_alternative() {
    let topic = resolve_topic(&json!({
        "Q": ["OR", { "second_name": ["docB"], "first_name": ["docA"] }]
    }))
    .expect("topic resolves");

    assert_eq!(topic.resolution.or_choices[0].label, "second_name");
    assert_eq!(topic.documents(), vec!["docB"]);
}

#[test]
fn test_topic_of_only_empty_facts_selects_nothing() {
    let topic = resolve_topic(&json!({
        "Q1": { "a": [] },
        "Q2": [{ "b": [] }],
        "Q3": ["OR", { "c": [], "d": [] }]
    }))
    .expect("topic resolves");

    assert!(topic.documents().is_empty());
    assert!(topic.resolution.table.is_empty());
    assert_eq!(topic.resolution.facts_unsupportable, 3);

    let origins: Vec<_> = topic
        .diagnostics
        .entries()
        .iter()
        .filter_map(|d| match d {
            nugget_core::Diagnostic::UnsupportableFact { origin, .. } => Some(*origin),
            _ => None,
        })
        .collect();
    assert_eq!(origins, vec![FactOrigin::AndEntry, FactOrigin::AndEntry, FactOrigin::OrChoice]);
}

#[test]
fn test_unrecognized_question_does_not_block_the_rest() {
    let topic = resolve_topic(&json!({
        "Q1": { "a": ["doc1"] },
        "Q9": 42,
        "Q10": [{ "b": ["doc2", "doc1"] }]
    }))
    .expect("topic resolves");

    assert_eq!(topic.diagnostics.count_kind("unrecognized_requirement_shape"), 1);
    assert_eq!(topic.diagnostics.entries()[0].question(), "Q9");
    assert_eq!(topic.requirements.len(), 2);
    assert_eq!(topic.documents(), vec!["doc1"]);
}

#[test]
fn test_unsupportable_and_skipped_are_distinguishable() {
    let topic = resolve_topic(&json!({
        "Q1": { "a": [] },
        "Q2": "not a requirement"
    }))
    .expect("topic resolves");

    let summary = topic.diagnostics.summary();
    assert_eq!(summary.get("unsupportable_fact"), Some(&1));
    assert_eq!(summary.get("unrecognized_requirement_shape"), Some(&1));
}

#[test]
fn test_mixed_topic_selects_greedy_cover() {
    let topic = resolve_topic(&json!({
        "Q1": { "f1": ["d1", "d2"], "f2": ["d2", "d3"], "f3": ["d4"] },
        "Q2": ["OR", { "g1": ["d5", "d6"], "g2": ["d4"] }],
        "Q3": [{ "h1": ["d3", "d4"] }, { "h2": ["d7"] }]
    }))
    .expect("topic resolves");

    // d4 covers f3, g2 and h1; d2 covers f1 and f2; d7 covers h2
    assert_eq!(topic.documents(), vec!["d2", "d4", "d7"]);
    let steps: Vec<_> = topic.resolution.steps.iter().map(|s| s.document.as_str()).collect();
    assert_eq!(steps, vec!["d4", "d2", "d7"]);
    assert_eq!(topic.resolution.steps.last().map(|s| s.remaining), Some(0));
}

#[test]
fn test_numeric_document_ids_are_accepted() {
    let topic = resolve_topic(&json!({ "Q": { "a": [101, 202], "b": [202] } })).expect("topic resolves");

    assert_eq!(topic.documents(), vec!["202"]);
}

#[test]
fn test_non_id_elements_are_reported_not_silently_dropped() {
    let topic = resolve_topic(&json!({ "Q": { "f": [1.5, true], "g": ["d1", 2.5] } })).expect("topic resolves");

    assert_eq!(topic.diagnostics.count_kind("skipped_document_ids"), 2);
    assert_eq!(topic.diagnostics.count_kind("unsupportable_fact"), 1);
    assert_eq!(topic.documents(), vec!["d1"]);
}

#[test]
fn test_or_collapse_counts_the_list_as_written() {
    let topic = resolve_topic(&json!({
        "Q": ["OR", { "a": [1.5, 2.5], "b": ["x", "y", "z"] }]
    }))
    .expect("topic resolves");

    assert_eq!(topic.resolution.or_choices[0].label, "a");
    assert_eq!(topic.resolution.or_choices[0].listed_count, 2);
    assert!(topic.documents().is_empty());
    assert_eq!(topic.diagnostics.count_kind("skipped_document_ids"), 1);

    let padded = resolve_topic(&json!({
        "Q": ["OR", { "a": ["d1", null, null], "b": ["x", "y"] }]
    }))
    .expect("topic resolves");

    assert_eq!(padded.resolution.or_choices[0].label, "b");
    assert_eq!(padded.documents(), vec!["x"]);
}
