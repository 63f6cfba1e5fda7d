//! recolens-eye: object detection for RecoLens
//!
//! Wraps a pretrained YOLOv8 ONNX model behind the [`ObjectDetector`] trait.
//! One image in, one ordered list of [`DetectionRecord`]s out. An empty list
//! means nothing cleared the threshold; a failed inference is an error.
//!
//! [`DetectionRecord`]: recolens_core::DetectionRecord

pub mod config;
pub mod detector;
pub mod error;
pub mod models;
pub mod processing;

pub use config::YoloParams;
pub use detector::{validate_threshold, ObjectDetector};
pub use error::VisionError;
pub use models::{ModelManager, YoloDetector};
