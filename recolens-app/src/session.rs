//! One recommendation session: detect, summarize, fill the template, generate
//!
//! The detector and the recommendation service are injected, so a session
//! owns exactly one model handle and one client for its lifetime.

use image::DynamicImage;
use recolens_core::{summarize_detections, Category, DetectionRecord, PromptCatalog, PromptPair};
use recolens_eye::{validate_threshold, ObjectDetector, VisionError};
use recolens_llm::{RecommendationError, RecommendationService};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Unknown category {0:?}")]
    UnknownCategory(String),

    #[error("Invalid confidence threshold {0}: must be within [0, 1]")]
    InvalidThreshold(f32),

    #[error("Detection failed: {0}")]
    Detection(#[from] VisionError),

    // Display is already "Error: ..."
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
}

/// Result of a successful [`Session::recommend`] call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing cleared the threshold; no request was sent
    NoObjects,
    Recommendations {
        detections: Vec<DetectionRecord>,
        summary: String,
        prompt: PromptPair,
        text: String,
    },
}

pub struct Session<D, S> {
    detector: D,
    service: S,
    current_recommendations: Option<String>,
}

impl<D: ObjectDetector, S: RecommendationService> Session<D, S> {
    pub fn new(detector: D, service: S) -> Self {
        Self {
            detector,
            service,
            current_recommendations: None,
        }
    }

    /// Text of the last successful recommendation
    pub fn current_recommendations(&self) -> Option<&str> {
        self.current_recommendations.as_deref()
    }

    /// Run the full flow for one image.
    ///
    /// The category and threshold are checked before inference. On a failed request the
    /// previous recommendations are left in place.
    pub async fn recommend(
        &mut self,
        image: &DynamicImage,
        category_key: &str,
        confidence_threshold: f32,
    ) -> Result<Outcome, SessionError> {
        let category = Category::from_key(category_key)
            .ok_or_else(|| SessionError::UnknownCategory(category_key.to_string()))?;
        validate_threshold(confidence_threshold)
            .map_err(|_| SessionError::InvalidThreshold(confidence_threshold))?;

        let detections = self.detector.detect(image, confidence_threshold)?;
        if detections.is_empty() {
            info!("No objects above threshold {}", confidence_threshold);
            return Ok(Outcome::NoObjects);
        }

        let summary = summarize_detections(&detections);
        info!("Detected objects: {}", summary);

        let prompt = PromptCatalog::build(category, &summary);
        debug!("User prompt for {}:\n{}", category, prompt.user_prompt);

        let text = self
            .service
            .generate(&prompt.user_prompt, &prompt.system_prompt)
            .await
            .map_err(|e| {
                warn!("Recommendation request failed: {}", e);
                e
            })?;

        self.current_recommendations = Some(text.clone());
        Ok(Outcome::Recommendations {
            detections,
            summary,
            prompt,
            text,
        })
    }
}
