//! Model tunables loaded from an optional YAML settings file.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::contexts::SamplingParams;

const DEFAULT_SETTINGS_PATH: &str = "codesmith.yml";

const DEFAULT_MODEL: &str = "us.anthropic.claude-3-5-sonnet-20240620-v1:0";
const DEFAULT_MAX_TOKENS_PER_CALL: usize = 2000;
const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_TEMPERATURE: f64 = 0.2;
const DEFAULT_TOP_P: f64 = 0.9;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 300;

/// Tunables for the generation pipeline. Every field has a default, so a
/// partial (or absent) settings file is fine.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-call token ceiling. Kept small so individual responses stay
    /// within response-size limits; the staged pipeline compensates.
    #[serde(default = "default_max_tokens")]
    pub max_tokens_per_call: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS_PER_CALL
}

fn default_max_retries() -> usize {
    DEFAULT_MAX_RETRIES
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_top_p() -> f64 {
    DEFAULT_TOP_P
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_read_timeout() -> u64 {
    DEFAULT_READ_TIMEOUT_SECS
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens_per_call: default_max_tokens(),
            max_retries: default_max_retries(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
        }
    }
}

impl ModelSettings {
    /// Loads settings from the given path (defaults to `codesmith.yml`).
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read settings file {}: {}", path.display(), e)
        })?;

        let settings: ModelSettings = serde_yaml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Invalid settings file {}: {}", path.display(), e)
        })?;

        Ok(settings)
    }

    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}
