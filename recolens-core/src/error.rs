//! Error types for recolens-core

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No configuration file found (searched: {})", display_paths(.0))]
    NotFound(Vec<PathBuf>),

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing required configuration key: {0}")]
    MissingKey(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_candidates() {
        let err = ConfigError::NotFound(vec![
            PathBuf::from("./config/config.yaml"),
            PathBuf::from("./config.yaml"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("./config/config.yaml"));
        assert!(msg.contains("./config.yaml"));
    }

    #[test]
    fn test_missing_key_display() {
        let err = ConfigError::MissingKey("models.llm.api_url");
        assert_eq!(
            err.to_string(),
            "Missing required configuration key: models.llm.api_url"
        );
    }
}
