//! YOLOv8 object detection on ONNX Runtime

use crate::config::YoloParams;
use crate::detector::{validate_threshold, ObjectDetector};
use crate::error::VisionError;
use crate::models::labels::coco_label;
use crate::processing::{
    decode_predictions, letterbox_tensor, non_max_suppression, Candidate, Letterbox,
};
use image::DynamicImage;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use parking_lot::Mutex;
use recolens_core::DetectionRecord;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// YOLO model for object detection.
///
/// Weights are loaded once in [`YoloDetector::new`]; every
/// [`detect`](ObjectDetector::detect) call reuses the same session.
pub struct YoloDetector {
    // `Session::run` takes `&mut self`
    session: Mutex<Session>,
    params: YoloParams,
}

impl YoloDetector {
    /// Load weights with default parameters
    pub fn new(model_path: &Path) -> Result<Self, VisionError> {
        Self::with_params(model_path, YoloParams::default())
    }

    pub fn with_params(model_path: &Path, params: YoloParams) -> Result<Self, VisionError> {
        params.validate()?;

        if !model_path.is_file() {
            return Err(VisionError::Model(format!(
                "YOLO weights not found at {:?}",
                model_path
            )));
        }

        let session = Session::builder()
            .map_err(|e| VisionError::Ort(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| VisionError::Ort(format!("Failed to set optimization level: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| VisionError::Ort(format!("Failed to load YOLO model: {}", e)))?;

        info!("YOLO model loaded from {:?}", model_path);

        Ok(Self {
            session: Mutex::new(session),
            params,
        })
    }

    fn infer(
        &self,
        input: Vec<f32>,
        confidence_threshold: f32,
    ) -> Result<Vec<Candidate>, VisionError> {
        let size = self.params.input_size as usize;
        let tensor = Tensor::from_array(([1usize, 3, size, size], input))
            .map_err(|e| VisionError::Ort(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| VisionError::Ort(format!("YOLO inference failed: {}", e)))?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| VisionError::Ort(format!("Failed to extract output tensor: {}", e)))?;
        debug!("YOLO output shape: {:?}", shape);

        let candidates = decode_predictions(shape, data, confidence_threshold)?;
        Ok(candidates)
    }
}

impl ObjectDetector for YoloDetector {
    fn detect(
        &self,
        image: &DynamicImage,
        confidence_threshold: f32,
    ) -> Result<Vec<DetectionRecord>, VisionError> {
        validate_threshold(confidence_threshold)?;

        let started = Instant::now();
        let (input, geometry) = letterbox_tensor(image, self.params.input_size)?;
        let candidates = self.infer(input, confidence_threshold)?;
        let kept = non_max_suppression(
            candidates,
            self.params.iou_threshold,
            self.params.max_detections,
        );
        let detections = label_candidates(kept, &geometry)?;

        debug!(
            "YOLO detected {} objects in {:.2?}",
            detections.len(),
            started.elapsed()
        );
        Ok(detections)
    }
}

/// Attach COCO labels and map boxes back onto the source image.
/// A class id outside the label table is an error.
pub fn label_candidates(
    candidates: Vec<Candidate>,
    geometry: &Letterbox,
) -> Result<Vec<DetectionRecord>, VisionError> {
    candidates
        .into_iter()
        .map(|c| {
            let label = coco_label(c.class_id).ok_or_else(|| {
                VisionError::Model(format!(
                    "Class id {} is outside the label table",
                    c.class_id
                ))
            })?;
            Ok(DetectionRecord::new(label, c.confidence, geometry.to_source(c.bbox)))
        })
        .collect()
}
