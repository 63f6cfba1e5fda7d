//! Model manager with auto-download functionality

use crate::error::VisionError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default YOLOv8 nano export
pub const YOLO_V8_URL: &str =
    "https://github.com/ultralytics/assets/releases/download/v8.2.0/yolov8n.onnx";
pub const YOLO_V8_FILE: &str = "yolov8n.onnx";
// Empty: verification skipped
const YOLO_V8_CHECKSUM: &str = "";

const MAX_MODEL_SIZE: usize = 2_000_000_000;
const MIN_MODEL_SIZE: usize = 1024;
const DOWNLOAD_TIMEOUT_SECS: u64 = 3600;

/// Downloads and caches model weights in a local directory
pub struct ModelManager {
    model_dir: PathBuf,
}

impl ModelManager {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    /// Ensure model directory exists
    pub fn ensure_model_dir(&self) -> Result<PathBuf, VisionError> {
        if !self.model_dir.exists() {
            fs::create_dir_all(&self.model_dir)?;
            info!("Created model directory: {:?}", self.model_dir);
        }
        Ok(self.model_dir.clone())
    }

    /// Download model if not present
    pub async fn ensure_model(
        &self,
        model_name: &str,
        url: &str,
        checksum: &str,
    ) -> Result<PathBuf, VisionError> {
        validate_model_name(model_name)?;
        validate_model_url(url)?;

        self.ensure_model_dir()?;

        let model_path = self.model_dir.join(model_name);
        if model_path.exists() {
            info!("Model {} already exists at {:?}", model_name, model_path);
            return Ok(model_path);
        }

        info!("Downloading model {} from {}", model_name, url);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()?;

        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(VisionError::Model(format!(
                "Failed to download model: HTTP {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_MODEL_SIZE as u64 {
                return Err(VisionError::Model(format!(
                    "Model too large: {} bytes (max {} bytes)",
                    content_length, MAX_MODEL_SIZE
                )));
            }
        }

        let bytes = response.bytes().await?;
        check_download_size(bytes.len())?;

        if checksum.is_empty() {
            warn!(
                "Downloaded {} bytes for model {} (checksum verification skipped)",
                bytes.len(),
                model_name
            );
        } else {
            verify_checksum(&bytes, checksum)?;
            info!("Verified checksum for model {}", model_name);
        }

        write_atomically(&model_path, &bytes)?;
        info!("Model {} saved to {:?}", model_name, model_path);
        Ok(model_path)
    }

    /// Get YOLO model path, downloading if needed
    pub async fn get_yolo_model(&self) -> Result<PathBuf, VisionError> {
        self.ensure_model(YOLO_V8_FILE, YOLO_V8_URL, YOLO_V8_CHECKSUM)
            .await
    }
}

/// Write through a sibling `.tmp` file and rename it into place. The temp
/// file is removed if either step fails.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), VisionError> {
    let temp_path = path.with_extension("tmp");
    let result = fs::write(&temp_path, bytes).and_then(|_| fs::rename(&temp_path, path));
    if let Err(e) = result {
        if temp_path.is_file() {
            let _ = fs::remove_file(&temp_path);
        }
        return Err(VisionError::Io(e));
    }
    Ok(())
}

/// Model names are bare file names: no separators, no traversal.
pub fn validate_model_name(model_name: &str) -> Result<(), VisionError> {
    if model_name.is_empty() || model_name.len() > 255 {
        return Err(VisionError::Model("Invalid model name".to_string()));
    }
    if model_name.contains("..") || model_name.contains('/') || model_name.contains('\\') {
        return Err(VisionError::Model(
            "Model name contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Only HTTPS URLs are accepted for model downloads
pub fn validate_model_url(url: &str) -> Result<(), VisionError> {
    if url.is_empty() || url.len() > 2048 {
        return Err(VisionError::Model("Invalid URL".to_string()));
    }
    if !url.starts_with("https://") {
        return Err(VisionError::Model(
            "Only HTTPS URLs are allowed for model downloads".to_string(),
        ));
    }
    Ok(())
}

fn check_download_size(len: usize) -> Result<(), VisionError> {
    if len > MAX_MODEL_SIZE {
        return Err(VisionError::Model(format!(
            "Downloaded model too large: {} bytes (max {} bytes)",
            len, MAX_MODEL_SIZE
        )));
    }
    if len < MIN_MODEL_SIZE {
        return Err(VisionError::Model(
            "Downloaded file too small, likely corrupted".to_string(),
        ));
    }
    Ok(())
}

/// Compare the SHA-256 of `bytes` against a hex digest (case-insensitive)
pub fn verify_checksum(bytes: &[u8], expected: &str) -> Result<(), VisionError> {
    let computed = hex::encode(Sha256::digest(bytes));
    if computed.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(VisionError::Model(format!(
            "Checksum mismatch: expected {}, got {}",
            expected, computed
        )))
    }
}
