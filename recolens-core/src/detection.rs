//! Detection records and their prompt-ready summary

use serde::{Deserialize, Serialize};

/// One predicted object instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub label: String,
    /// Score in [0, 1]
    pub confidence: f32,
    /// Box in original image pixels: [x1, y1, x2, y2]
    pub bbox: [f32; 4],
}

impl DetectionRecord {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: [f32; 4]) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}

/// Whether a score clears `threshold`. Strict: a score equal to the
/// threshold does not pass, and NaN never passes.
pub fn passes_threshold(confidence: f32, threshold: f32) -> bool {
    confidence > threshold
}

/// Render detections as `"label (0.87), label (0.73)"`, preserving order.
pub fn summarize_detections(detections: &[DetectionRecord]) -> String {
    detections
        .iter()
        .map(|d| format!("{} ({:.2})", d.label, d.confidence))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, confidence: f32) -> DetectionRecord {
        DetectionRecord::new(label, confidence, [0.0, 0.0, 10.0, 10.0])
    }

    #[test]
    fn test_summary_format() {
        let detections = vec![record("chair", 0.873), record("lamp", 0.731)];
        assert_eq!(summarize_detections(&detections), "chair (0.87), lamp (0.73)");
    }

    #[test]
    fn test_summary_preserves_order_and_duplicates() {
        let detections = vec![
            record("lamp", 0.51),
            record("chair", 0.99),
            record("lamp", 0.6),
        ];
        assert_eq!(
            summarize_detections(&detections),
            "lamp (0.51), chair (0.99), lamp (0.60)"
        );
    }

    #[test]
    fn test_summary_single_and_empty() {
        assert_eq!(summarize_detections(&[record("tv", 1.0)]), "tv (1.00)");
        assert_eq!(summarize_detections(&[]), "");
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!passes_threshold(0.5, 0.5));
        assert!(passes_threshold(0.5, 0.49));
        assert!(!passes_threshold(0.5, 0.51));
        assert!(passes_threshold(1.0, 0.0));
        assert!(!passes_threshold(0.0, 0.0));
        assert!(!passes_threshold(f32::NAN, 0.0));
    }
}
