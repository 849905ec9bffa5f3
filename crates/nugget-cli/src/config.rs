//! Batch configuration loaded from TOML
//!
//! Every field has a default, so a missing file or a partial file is valid. CLI flags are
//! applied on top of the loaded values by the command layer.

use nugget_core::{CoverError, CoverResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "NUGGET_COVER_CONFIG";
/// Config file used when neither a flag nor the environment names one
pub const DEFAULT_CONFIG_PATH: &str = "nugget-cover.toml";

/// Topic ids of the evaluation collection, used when no topics are configured
pub const DEFAULT_TOPICS: &[&str] = &[
    "300", "303", "308", "309", "310", "334", "335", "343", "351", "352", "365", "367", "372", "373",
    "377", "380", "382", "383", "388",
];

/// Output rendering for resolved topics
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One header and id list per topic
    #[default]
    Text,
    /// Machine-readable records
    Json,
}

/// Where topic files live and which ones to read
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding the per-language, per-topic nugget files
    pub base_dir: PathBuf,
    /// File name with `{lang}` and `{topic}` placeholders
    pub file_pattern: String,
    /// Language codes, processed in order
    pub languages: Vec<String>,
    /// Topic ids, processed in order within each language
    pub topics: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("data/nuggets"),
            file_pattern: "nuggets_{lang}_{topic}.json".to_string(),
            languages: vec!["zho".to_string(), "fas".to_string(), "rus".to_string()],
            topics: DEFAULT_TOPICS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl InputConfig {
    /// Path of the nugget file for one language and topic
    pub fn topic_path(&self, lang: &str, topic: &str) -> PathBuf {
        let file_name = self.file_pattern.replace("{lang}", lang).replace("{topic}", topic);
        self.base_dir.join(file_name)
    }
}

/// How batch results are reported
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Rendering of the batch report
    pub format: OutputFormat,
    /// Re-check coverage of every resolved topic before reporting it
    pub verify: bool,
}

/// How topics are scheduled
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Resolve topics on the rayon pool
    pub parallel: bool,
    /// Exit non-zero when any topic is missing or fails
    pub strict: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { parallel: true, strict: false }
    }
}

/// Top-level `nugget-cover.toml` layout
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CoverConfig {
    /// `[input]` table
    pub input: InputConfig,
    /// `[output]` table
    pub output: OutputConfig,
    /// `[execution]` table
    pub execution: ExecutionConfig,
}

impl CoverConfig {
    /// Load configuration from `path`, `NUGGET_COVER_CONFIG` or `nugget-cover.toml`.
    ///
    /// A file that does not exist falls back to defaults. A file that exists but does not
    /// parse or validate is a configuration error.
    pub fn load(path: Option<&Path>) -> CoverResult<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(|| {
            PathBuf::from(
                std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
            )
        });

        if !config_path.is_file() {
            warn!(
                "Configuration file '{}' not found. Using default configuration.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(&config_path)?;
        let config = Self::from_toml_str(&config_str)?;
        info!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> CoverResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| {
            CoverError::configuration("toml", "valid nugget-cover configuration", "unparsable", e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject file patterns that cannot name a topic file
    pub fn validate(&self) -> CoverResult<()> {
        let pattern = &self.input.file_pattern;
        if pattern.trim().is_empty() {
            return Err(CoverError::configuration(
                "input.file_pattern",
                "non-empty pattern",
                "empty",
                "file pattern must not be empty",
            ));
        }
        if !pattern.contains("{topic}") {
            return Err(CoverError::configuration(
                "input.file_pattern",
                "pattern containing {topic}",
                pattern,
                "file pattern must contain the {topic} placeholder",
            ));
        }
        Ok(())
    }

    /// Render as a TOML template
    pub fn to_toml_string(&self) -> CoverResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CoverError::serialization("toml", "serialize", e.to_string()))
    }
}
