//! Configuration for RecoLens
//!
//! The configuration file carries a `models` section with an `llm` block
//! (required) and a `detector` block (optional). JSON, TOML and YAML are all
//! accepted; the format is picked from the file extension and otherwise
//! detected by trying each parser in turn.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "RECOLENS_CONFIG";

/// Default minimum score for a detection to be kept
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Weights file used when `models.detector.weights` is not set
pub const DEFAULT_WEIGHTS_FILE: &str = "yolov8n.onnx";

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub models: ModelsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub llm: LlmConfig,
    pub detector: DetectorConfig,
}

/// Remote text-generation endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// URL the recommendation request is posted to
    pub api_url: String,
    /// Model identifier sent with every request
    pub default_model: String,
    /// Optional request timeout; no timeout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

/// Object detector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Explicit path to the ONNX weights file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<PathBuf>,
    /// Default confidence threshold when the caller does not supply one
    pub confidence_threshold: f32,
    /// Directory downloaded weights are stored in
    pub model_dir: PathBuf,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            weights: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            model_dir: Self::default_model_dir(),
        }
    }
}

impl DetectorConfig {
    /// `~/.recolens/models`, or `./models` when there is no home directory
    pub fn default_model_dir() -> PathBuf {
        dirs::home_dir()
            .map(|mut p| {
                p.push(".recolens");
                p.push("models");
                p
            })
            .unwrap_or_else(|| PathBuf::from("./models"))
    }

    /// Weights file to load: the explicit path, or the default file in `model_dir`
    pub fn weights_path(&self) -> PathBuf {
        self.weights
            .clone()
            .unwrap_or_else(|| self.model_dir.join(DEFAULT_WEIGHTS_FILE))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.confidence_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(ConfigError::Validation(format!(
                "models.detector.confidence_threshold must be within [0, 1], got {}",
                t
            )));
        }
        Ok(())
    }
}

impl LlmConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "models.llm.api_url must not be empty".to_string(),
            ));
        }
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "models.llm.default_model must not be empty".to_string(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "models.llm.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }
}

// Every key optional, so a missing one can be reported by name instead of
// surfacing as a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    models: RawModels,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawModels {
    llm: RawLlm,
    detector: RawDetector,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLlm {
    api_url: Option<String>,
    default_model: Option<String>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDetector {
    weights: Option<PathBuf>,
    confidence_threshold: Option<f32>,
    model_dir: Option<PathBuf>,
}

impl RawConfig {
    fn parse_as(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("JSON: {}", e))),
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::Parse(format!("TOML: {}", e)))
            }
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("YAML: {}", e))),
        }
    }

    fn into_config(self) -> Result<AppConfig, ConfigError> {
        let RawModels { llm, detector } = self.models;

        let llm = LlmConfig {
            api_url: llm
                .api_url
                .ok_or(ConfigError::MissingKey("models.llm.api_url"))?,
            default_model: llm
                .default_model
                .ok_or(ConfigError::MissingKey("models.llm.default_model"))?,
            request_timeout_secs: llm.request_timeout_secs,
        };

        let defaults = DetectorConfig::default();
        let detector = DetectorConfig {
            weights: detector.weights,
            confidence_threshold: detector
                .confidence_threshold
                .unwrap_or(defaults.confidence_threshold),
            model_dir: detector.model_dir.unwrap_or(defaults.model_dir),
        };

        let config = AppConfig {
            models: ModelsConfig { llm, detector },
        };
        config.validate()?;
        Ok(config)
    }
}

impl AppConfig {
    /// Resolve the configuration path and load it
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = resolve_config_path(explicit)?;
        Self::from_file(&path)
    }

    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match ConfigFormat::from_path(path) {
            Some(format) => RawConfig::parse_as(&content, format)?.into_config()?,
            None => Self::parse(&content)?,
        };
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from a string of unknown format
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        // Try JSON first, then TOML, then YAML
        for format in [ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            match RawConfig::parse_as(content, format) {
                Ok(raw) => return raw.into_config(),
                Err(e) => debug!("Configuration is not {:?}: {}", format, e),
            }
        }
        Err(ConfigError::Parse("Unknown format".to_string()))
    }

    /// Load configuration from a string of a known format
    pub fn parse_as(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        RawConfig::parse_as(content, format)?.into_config()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.models.llm.validate()?;
        self.models.detector.validate()
    }
}

/// Relative and per-user locations searched when no path is given
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("config").join("config.yaml"),
        PathBuf::from("config.yaml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("recolens").join("config.yaml"));
    }
    paths
}

/// Find the configuration file: explicit path, then `RECOLENS_CONFIG`, then
/// the default search path.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    resolve_config_path_with(
        explicit,
        std::env::var_os(CONFIG_ENV_VAR),
        &default_search_paths(),
    )
}

pub fn resolve_config_path_with(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    candidates: &[PathBuf],
) -> Result<PathBuf, ConfigError> {
    // An explicitly named file never falls through to the search path
    if let Some(path) = explicit {
        return require_file(path.to_path_buf());
    }

    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        debug!("Using configuration from {}", CONFIG_ENV_VAR);
        return require_file(PathBuf::from(value));
    }

    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound(candidates.to_vec()))
}

fn require_file(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::NotFound(vec![path]))
    }
}
