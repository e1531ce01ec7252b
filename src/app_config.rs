use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// environment overlay, validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Translation client settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Orchestrator settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Structural validator settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings of the translation client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Bearer credential for the translation API
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Attempts per translation call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Linear backoff unit; attempt N waits N times this
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Debug logging
    #[serde(default)]
    pub verbose: bool,

    /// HTTP timeout per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output-token ceiling for any single call
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Reuse successful translations within a run
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_endpoint: default_api_endpoint(),
            model: default_model(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            verbose: false,
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            cache_enabled: default_cache_enabled(),
        }
    }
}

/// Settings of the translation orchestrator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Root of the per-language content tree (`{root}/{lang}/{product}/...`)
    #[serde(default = "default_content_root")]
    pub content_root: PathBuf,

    /// Retries per language after the first attempt
    #[serde(default = "default_language_retries")]
    pub language_retries: u32,

    /// Base of the exponential backoff between language attempts
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Ceiling of the exponential backoff
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    /// Body sections sent in the troubleshooting payload
    #[serde(default = "default_troubleshoot_sections")]
    pub troubleshoot_sections: usize,

    /// Language of the source articles
    #[serde(default = "default_source_language")]
    pub source_language: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            language_retries: default_language_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            troubleshoot_sections: default_troubleshoot_sections(),
            source_language: default_source_language(),
        }
    }
}

impl PipelineConfig {
    /// Total attempts per language
    pub fn total_attempts(&self) -> u32 {
        self.language_retries + 1
    }

    /// Delay before attempt `attempt + 1`: `base * 2^(attempt-1)`, capped
    pub fn backoff_for(&self, attempt: u32) -> u64 {
        let exponent = attempt.saturating_sub(1).min(32);
        self.backoff_base_ms
            .saturating_mul(1u64 << exponent)
            .min(self.backoff_max_ms)
    }
}

/// Settings of the structural validator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Front-matter fields that must survive translation
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,

    /// Product identifier fields; one must exist, and none may be dropped
    #[serde(default = "default_product_fields")]
    pub product_fields: Vec<String>,

    /// Front-matter fields that must stay byte-identical
    #[serde(default = "default_technical_fields")]
    pub technical_fields: Vec<String>,

    /// Terms whose frequency must not drop
    #[serde(default = "default_technical_terms")]
    pub technical_terms: Vec<String>,

    /// Relative drop of a term count that raises a warning
    #[serde(default = "default_term_drop_threshold")]
    pub term_drop_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_fields: default_required_fields(),
            product_fields: default_product_fields(),
            technical_fields: default_technical_fields(),
            technical_terms: default_technical_terms(),
            term_drop_threshold: default_term_drop_threshold(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "doctrans.json";

fn default_api_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_output_tokens() -> u32 {
    4096
}

fn default_cache_enabled() -> bool {
    true
}

fn default_content_root() -> PathBuf {
    PathBuf::from("content")
}

fn default_language_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    2000
}

fn default_backoff_max_ms() -> u64 {
    30_000
}

fn default_troubleshoot_sections() -> usize {
    3
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_required_fields() -> Vec<String> {
    vec!["title".to_string(), "description".to_string()]
}

fn default_product_fields() -> Vec<String> {
    vec!["products".to_string(), "product".to_string(), "platform".to_string()]
}

fn default_technical_fields() -> Vec<String> {
    ["products", "product", "platform", "date", "lastmod", "weight", "draft", "type", "url"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_technical_terms() -> Vec<String> {
    ["Java", ".NET", "C#", "API", "PDF", "DOCX", "Maven", "NuGet", "JSON", "XML", "HTML"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_term_drop_threshold() -> f64 {
    0.2
}

impl Config {
    /// Load a configuration file, writing a default one when it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Overlay values from a flat key-value environment
    ///
    /// Recognized keys: `TRANSLATION_API_KEY`, `TRANSLATION_API_ENDPOINT`,
    /// `TRANSLATION_MODEL`, `DEBUG`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = get("TRANSLATION_API_KEY") {
            self.translation.api_key = api_key;
        }
        if let Some(endpoint) = get("TRANSLATION_API_ENDPOINT") {
            self.translation.api_endpoint = endpoint;
        }
        if let Some(model) = get("TRANSLATION_MODEL") {
            self.translation.model = model;
        }
        if let Some(debug) = get("DEBUG") {
            let debug = debug.trim().to_lowercase();
            if debug == "1" || debug == "true" || debug == "yes" {
                self.translation.verbose = true;
            }
        }
    }

    /// Overlay values from the process environment
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Effective log level, `verbose` forcing at least debug
    pub fn effective_log_level(&self) -> LogLevel {
        if self.translation.verbose && !matches!(self.log_level, LogLevel::Trace) {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.translation.api_endpoint).map_err(|e| {
            anyhow!("Invalid translation API endpoint '{}': {}", self.translation.api_endpoint, e)
        })?;

        if self.translation.model.trim().is_empty() {
            return Err(anyhow!("Translation model must not be empty"));
        }
        if self.translation.max_retries == 0 {
            return Err(anyhow!("translation.max_retries must be at least 1"));
        }
        if self.translation.max_output_tokens == 0 {
            return Err(anyhow!("translation.max_output_tokens must be at least 1"));
        }
        if self.pipeline.troubleshoot_sections == 0 {
            return Err(anyhow!("pipeline.troubleshoot_sections must be at least 1"));
        }

        crate::language_utils::validate_language_code(&self.pipeline.source_language)?;

        let threshold = self.validation.term_drop_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(anyhow!("validation.term_drop_threshold must be within (0, 1], got {}", threshold));
        }

        Ok(())
    }

    /// Validate the extra requirements of a translate run
    pub fn validate_for_translation(&self) -> Result<()> {
        self.validate()?;
        if self.translation.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Translation API key is required (set translation.api_key or TRANSLATION_API_KEY)"
            ));
        }
        Ok(())
    }
}
