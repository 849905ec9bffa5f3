//! Batch driver over language × topic nugget files
//!
//! Discovery and existence checks live here, outside the core: a missing file is reported
//! and its topic skipped without ever invoking the resolver. Topics are independent, so they
//! run on the rayon pool when parallel execution is enabled.

use crate::config::InputConfig;
use nugget_core::{CoverError, CoverResult, TopicResolution, resolve_topic_str};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

/// One (language, topic) pair and the file it should be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSource {
    /// Language code
    pub lang: String,
    /// Topic id
    pub topic: String,
    /// Nugget file expected for this pair
    pub path: PathBuf,
}

impl TopicSource {
    /// `lang-topic` label used in output
    pub fn label(&self) -> String {
        format!("{}-{}", self.lang, self.topic)
    }
}

/// What happened to one topic
#[derive(Debug)]
pub enum TopicStatus {
    /// Topic resolved (and verified, when requested)
    Resolved(Box<TopicResolution>),
    /// Topic file does not exist
    Missing,
    /// Topic could not be read, parsed or verified
    Failed(CoverError),
}

impl TopicStatus {
    /// Short status name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            TopicStatus::Resolved(_) => "resolved",
            TopicStatus::Missing => "missing",
            TopicStatus::Failed(_) => "failed",
        }
    }
}

/// A topic source paired with its status
#[derive(Debug)]
pub struct TopicOutcome {
    /// Topic that was processed
    pub source: TopicSource,
    /// Result of processing it
    pub status: TopicStatus,
}

/// Enumerate topic files in language-major order
pub fn discover(input: &InputConfig) -> Vec<TopicSource> {
    input
        .languages
        .iter()
        .flat_map(|lang| {
            input.topics.iter().map(move |topic| TopicSource {
                lang: lang.clone(),
                topic: topic.clone(),
                path: input.topic_path(lang, topic),
            })
        })
        .collect()
}

/// Read and resolve one topic file
pub fn load_topic(path: &Path) -> CoverResult<TopicResolution> {
    if !path.is_file() {
        return Err(CoverError::missing_input(path.display().to_string()));
    }
    let text = fs::read_to_string(path)?;
    resolve_topic_str(&text)
}

/// Resolve one topic, turning every failure into an outcome
#[instrument(skip_all, fields(lang = %source.lang, topic = %source.topic))]
pub fn run_topic(source: TopicSource, verify: bool) -> TopicOutcome {
    info!(path = %source.path.display(), "Processing topic");

    let status = match load_topic(&source.path) {
        Ok(resolution) if verify && !resolution.resolution.covers_all() => {
            let uncovered = resolution.resolution.uncovered_facts().len();
            error!(uncovered, "Coverage verification failed");
            TopicStatus::Failed(CoverError::IncompleteCover { uncovered })
        }
        Ok(resolution) => TopicStatus::Resolved(Box::new(resolution)),
        Err(CoverError::MissingInput { path }) => {
            warn!(path = %path, "File not found, skipping topic");
            TopicStatus::Missing
        }
        Err(err) => {
            error!(
                category = err.category(),
                recoverable = err.is_recoverable(),
                "Failed to resolve topic: {err}"
            );
            TopicStatus::Failed(err)
        }
    };

    TopicOutcome { source, status }
}

/// Outcomes of a batch, in discovery order
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One outcome per source
    pub outcomes: Vec<TopicOutcome>,
}

impl BatchReport {
    pub fn resolved(&self) -> usize {
        self.count("resolved")
    }

    pub fn missing(&self) -> usize {
        self.count("missing")
    }

    pub fn failed(&self) -> usize {
        self.count("failed")
    }

    /// Any topic that did not resolve
    pub fn has_problems(&self) -> bool {
        self.missing() + self.failed() > 0
    }

    fn count(&self, status: &str) -> usize {
        self.outcomes.iter().filter(|o| o.status.name() == status).count()
    }
}

/// Resolve every source, in parallel when requested. Order of outcomes matches `sources`.
#[instrument(skip_all, fields(topics = sources.len(), parallel = parallel))]
pub fn run_batch(sources: Vec<TopicSource>, parallel: bool, verify: bool) -> BatchReport {
    let outcomes: Vec<TopicOutcome> = if parallel {
        sources.into_par_iter().map(|source| run_topic(source, verify)).collect()
    } else {
        sources.into_iter().map(|source| run_topic(source, verify)).collect()
    };

    let report = BatchReport { outcomes };
    info!(
        resolved = report.resolved(),
        missing = report.missing(),
        failed = report.failed(),
        "Batch finished"
    );
    report
}
