//! Pre- and post-processing around the detector forward pass

pub mod decode;
pub mod letterbox;

pub use decode::{decode_predictions, iou, non_max_suppression, Candidate};
pub use letterbox::{letterbox_tensor, to_chw_tensor, Letterbox, PAD_VALUE};
