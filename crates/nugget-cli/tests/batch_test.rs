//! Batch driver tests over a temporary nugget directory

use nugget_cli::batch::{discover, load_topic, run_batch};
use nugget_cli::config::{CoverConfig, InputConfig};
use nugget_cli::output::{render_batch_json, render_batch_text};
use nugget_cli::TopicStatus;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_topic(dir: &Path, lang: &str, topic: &str, body: &str) {
    fs::write(dir.join(format!("nuggets_{lang}_{topic}.json")), body).expect("write topic file");
}

fn setup() -> (TempDir, InputConfig) {
    let dir = TempDir::new().expect("create temp dir");
    write_topic(
        dir.path(),
        "zho",
        "300",
        r#"{ "Q1": { "A": ["doc1", "doc2"], "B": ["doc2", "doc3"] } }"#,
    );
    write_topic(
        dir.path(),
        "zho",
        "303",
        r#"{ "Q1": ["OR", { "alt1": ["doc9"], "alt2": ["doc1", "doc2"] }], "Q9": 7 }"#,
    );
    write_topic(dir.path(), "fas", "300", "{ not json");
    // fas-303 deliberately absent

    let input = InputConfig {
        base_dir: dir.path().to_path_buf(),
        languages: vec!["zho".to_string(), "fas".to_string()],
        topics: vec!["300".to_string(), "303".to_string()],
        ..InputConfig::default()
    };
    (dir, input)
}

#[test]
fn test_discover_is_language_major() {
    let (_dir, input) = setup();
    let labels: Vec<_> = discover(&input).iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["zho-300", "zho-303", "fas-300", "fas-303"]);
}

#[test]
fn test_batch_skips_missing_and_isolates_failures() {
    let (_dir, input) = setup();

    for parallel in [false, true] {
        let report = run_batch(discover(&input), parallel, true);

        assert_eq!(report.resolved(), 2);
        assert_eq!(report.missing(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.has_problems());

        let statuses: Vec<_> = report.outcomes.iter().map(|o| o.status.name()).collect();
        assert_eq!(statuses, vec!["resolved", "resolved", "failed", "missing"]);

        match &report.outcomes[1].status {
            TopicStatus::Resolved(topic) => {
                assert_eq!(topic.documents(), vec!["doc9"]);
                assert_eq!(topic.diagnostics.count_kind("unrecognized_requirement_shape"), 1);
            }
            other => panic!("expected resolved topic, got {}", other.name()),
        }
    }
}

#[test]
fn test_text_output_lists_sorted_documents() {
    let (_dir, input) = setup();
    let report = run_batch(discover(&input), false, false);

    let text = render_batch_text(&report);

    assert!(text.contains("Minimal document IDs for zho-300:\ndoc2\n"));
    assert!(text.contains("Minimal document IDs for zho-303:\ndoc9\n"));
    assert!(text.contains("File not found for fas-303"));
    assert!(text.contains("Failed fas-300"));
    assert!(text.ends_with("Summary: 2 resolved, 1 missing, 1 failed\n"));
}

#[test]
fn test_json_output_records_status() {
    let (_dir, input) = setup();
    let report = run_batch(discover(&input), false, false);

    let json: serde_json::Value = serde_json::from_str(&render_batch_json(&report).unwrap()).unwrap();

    assert_eq!(json[0]["status"], "resolved");
    assert_eq!(json[0]["documents"], serde_json::json!(["doc2"]));
    assert_eq!(json[1]["or_choices"][0]["label"], "alt1");
    assert_eq!(json[1]["diagnostics"][0]["kind"], "unrecognized_requirement_shape");
    assert_eq!(json[2]["status"], "failed");
    assert!(json[2]["error"].as_str().unwrap().contains("Serialization error"));
    assert_eq!(json[3]["status"], "missing");
}

#[test]
fn test_load_topic_missing_file_is_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = load_topic(&dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.category(), "missing_input");
}

#[test]
fn test_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nugget-cover.toml");
    fs::write(
        &path,
        "[input]\nlanguages = [\"rus\"]\ntopics = [\"388\"]\n\n[execution]\nparallel = false\n",
    )
    .unwrap();

    let config = CoverConfig::load(Some(&path)).unwrap();

    assert_eq!(config.input.languages, vec!["rus"]);
    assert_eq!(config.input.topics, vec!["388"]);
    assert!(!config.execution.parallel);
    assert_eq!(config.input.file_pattern, "nuggets_{lang}_{topic}.json");
}
