//! Detection adapter seam

use crate::error::VisionError;
use image::DynamicImage;
use recolens_core::DetectionRecord;

/// Anything that turns an image into detection records.
pub trait ObjectDetector: Send + Sync {
    /// Run one inference pass and keep detections scoring strictly above
    /// `confidence_threshold`. `Ok(vec![])` means nothing was found.
    fn detect(
        &self,
        image: &DynamicImage,
        confidence_threshold: f32,
    ) -> Result<Vec<DetectionRecord>, VisionError>;
}

/// Reject thresholds outside [0, 1], including NaN.
pub fn validate_threshold(threshold: f32) -> Result<(), VisionError> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(VisionError::InvalidThreshold(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_threshold_bounds() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(0.5).is_ok());
        assert!(validate_threshold(1.0).is_ok());
    }

    #[test]
    fn test_validate_threshold_rejects() {
        for t in [-0.01, 1.01, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(matches!(
                validate_threshold(t),
                Err(VisionError::InvalidThreshold(_))
            ));
        }
    }
}
