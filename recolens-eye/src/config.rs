//! Detector parameters

use crate::error::VisionError;
use serde::{Deserialize, Serialize};

/// Inference parameters for a YOLOv8 export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoloParams {
    /// Square model input edge in pixels
    pub input_size: u32,
    /// Overlap above which a lower-scored box of the same class is dropped
    pub iou_threshold: f32,
    /// Upper bound on returned detections
    pub max_detections: usize,
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }
}

impl YoloParams {
    /// Validate parameters
    pub fn validate(&self) -> Result<(), VisionError> {
        if self.input_size == 0 || self.input_size > 4096 {
            return Err(VisionError::Config(
                "Input size must be between 1 and 4096".to_string(),
            ));
        }

        // YOLOv8 strides go up to 32
        if self.input_size % 32 != 0 {
            return Err(VisionError::Config(format!(
                "Input size must be a multiple of 32, got {}",
                self.input_size
            )));
        }

        if !self.iou_threshold.is_finite() || !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(VisionError::Config(
                "IoU threshold must be within [0, 1]".to_string(),
            ));
        }

        if self.max_detections == 0 {
            return Err(VisionError::Config(
                "Max detections must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default() {
        let params = YoloParams::default();
        assert_eq!(params.input_size, 640);
        assert_eq!(params.iou_threshold, 0.7);
        assert_eq!(params.max_detections, 300);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_input_size() {
        let mut params = YoloParams::default();
        params.input_size = 0;
        assert!(params.validate().is_err());

        params.input_size = 4128;
        assert!(params.validate().is_err());

        params.input_size = 650;
        assert!(params.validate().is_err());

        params.input_size = 320;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_iou_threshold() {
        let mut params = YoloParams::default();
        params.iou_threshold = -0.1;
        assert!(params.validate().is_err());

        params.iou_threshold = f32::NAN;
        assert!(params.validate().is_err());

        params.iou_threshold = 1.0;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_max_detections() {
        let mut params = YoloParams::default();
        params.max_detections = 0;
        assert!(params.validate().is_err());
    }
}
