//! YOLOv8 output decoding and non-maximum suppression

use crate::error::VisionError;
use recolens_core::passes_threshold;
use tracing::debug;

/// A box that cleared the confidence threshold, still in model input space
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub class_id: usize,
    pub confidence: f32,
    /// [x1, y1, x2, y2]
    pub bbox: [f32; 4],
}

/// Decode a `[1, 4 + C, N]` YOLOv8 output.
///
/// Rows 0..4 are `cx, cy, w, h`; the remaining `C` rows are per-class scores.
/// Each anchor takes its best class and is kept only if that score is
/// strictly greater than `confidence_threshold`.
pub fn decode_predictions(
    shape: &[i64],
    data: &[f32],
    confidence_threshold: f32,
) -> Result<Vec<Candidate>, VisionError> {
    let (rows, anchors) = match shape {
        [1, rows, anchors] if *rows > 4 && *anchors >= 0 => (*rows as usize, *anchors as usize),
        _ => {
            return Err(VisionError::Model(format!(
                "Unexpected YOLO output shape {:?}, expected [1, 4 + classes, anchors]",
                shape
            )))
        }
    };

    let expected = rows
        .checked_mul(anchors)
        .ok_or_else(|| VisionError::Model("Output size calculation overflow".to_string()))?;
    if data.len() != expected {
        return Err(VisionError::Model(format!(
            "YOLO output has {} values, shape {:?} implies {}",
            data.len(),
            shape,
            expected
        )));
    }

    let num_classes = rows - 4;
    let at = |row: usize, anchor: usize| data[row * anchors + anchor];

    let mut candidates = Vec::new();
    for anchor in 0..anchors {
        let mut best_class = 0;
        let mut best_score = f32::NEG_INFINITY;
        for class_id in 0..num_classes {
            let score = at(4 + class_id, anchor);
            if score > best_score {
                best_score = score;
                best_class = class_id;
            }
        }

        if !passes_threshold(best_score, confidence_threshold) {
            continue;
        }

        let (cx, cy, w, h) = (at(0, anchor), at(1, anchor), at(2, anchor), at(3, anchor));
        if !cx.is_finite() || !cy.is_finite() || !w.is_finite() || !h.is_finite() {
            continue;
        }
        if w <= 0.0 || h <= 0.0 {
            continue;
        }

        candidates.push(Candidate {
            class_id: best_class,
            confidence: best_score,
            bbox: [cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0],
        });
    }

    debug!(
        "{} of {} anchors above threshold {}",
        candidates.len(),
        anchors,
        confidence_threshold
    );
    Ok(candidates)
}

/// Class-aware NMS. Output is ordered by descending confidence and holds at
/// most `max_detections` boxes.
pub fn non_max_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if keep.len() >= max_detections {
            break;
        }

        let suppressed = keep.iter().any(|kept| {
            kept.class_id == candidate.class_id
                && iou(&kept.bbox, &candidate.bbox) > iou_threshold
        });
        if !suppressed {
            keep.push(candidate);
        }
    }

    keep
}

/// Intersection over union of two xyxy boxes
pub fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return 0.0;
    }

    let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
    let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);

    let inter_w = (a[2].min(b[2]) - a[0].max(b[0])).max(0.0);
    let inter_h = (a[3].min(b[3]) - a[1].max(b[1])).max(0.0);
    let inter_area = inter_w * inter_h;

    let union_area = area_a + area_b - inter_area;
    if union_area <= 0.0 || !union_area.is_finite() {
        return 0.0;
    }

    (inter_area / union_area).clamp(0.0, 1.0)
}
