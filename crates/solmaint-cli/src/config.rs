//! Configuration management for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, environment
//! variables (after `.env` is loaded), then command-line flags.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use solmaint_extractor::ExtractorConfig;
use solmaint_llm::anthropic::{
    API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS, DEFAULT_TIMEOUT_SECS,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Model used when nothing else is configured
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";

/// Environment variable overriding the model
pub const MODEL_ENV: &str = "SOLMAINT_MODEL";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "solmaint.toml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where documents come from and results go
    pub pipeline: PipelineSettings,

    /// LLM connection settings
    pub llm: LlmSettings,

    /// Field extractor limits
    pub extractor: ExtractorConfig,

    /// Output preferences
    pub output: OutputSettings,
}

/// Input, output and schema locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Directory scanned for PDFs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,

    /// Store location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// JSON schema used for validation
    pub schema_path: PathBuf,
}

/// LLM connection settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier
    pub model: String,

    /// API base URL
    pub endpoint: String,

    /// Completion token budget
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per request
    pub max_retries: u32,

    /// API key; only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Output preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Default output format
    pub format: OutputFormat,

    /// Enable colored output
    pub color: bool,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Table format
    Table,
}

impl Config {
    /// Load configuration from `explicit`, `./solmaint.toml`, or the user config
    /// file, falling back to defaults when none exists.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        let candidates = std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)).chain(Self::user_path());
        for path in candidates {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Per-user configuration file path.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("solmaint").join("config.toml"))
    }

    /// Read and parse one TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parse configuration from TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `ANTHROPIC_API_KEY` and `SOLMAINT_MODEL` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides from an arbitrary lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            self.llm.model = model;
        }
    }

    /// Check the values that cannot be fixed later.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        if self.llm.model.trim().is_empty() {
            return Err(CliError::Config("llm.model must not be empty".to_string()));
        }
        if self.llm.max_tokens == 0 {
            return Err(CliError::Config("llm.max_tokens must be greater than 0".to_string()));
        }
        Ok(())
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            schema_path: PathBuf::from("schemas/inverter_schema.json"),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            color: true,
        }
    }
}
