//! recolens-core: shared types for the RecoLens workspace
//!
//! Holds the configuration layer, the detection record handed from the
//! vision side to the prompt side, and the fixed prompt catalog.

pub mod config;
pub mod detection;
pub mod error;
pub mod prompts;

pub use config::{AppConfig, DetectorConfig, LlmConfig, ModelsConfig};
pub use detection::{passes_threshold, summarize_detections, DetectionRecord};
pub use error::ConfigError;
pub use prompts::{Category, PromptCatalog, PromptPair, UnknownCategory};
