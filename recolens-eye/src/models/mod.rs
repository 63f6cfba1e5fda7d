//! Vision model loading, inference and weight management

pub mod labels;
pub mod manager;
pub mod yolo;

pub use labels::{coco_label, COCO_CLASSES};
pub use manager::ModelManager;
pub use yolo::YoloDetector;
