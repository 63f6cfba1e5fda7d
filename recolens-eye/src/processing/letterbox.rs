//! Letterbox resize and tensor layout for YOLO input

use crate::error::VisionError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};

/// Gray used for the padding bands
pub const PAD_VALUE: u8 = 114;

/// Geometry of an aspect-preserving resize into a square canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub source_width: u32,
    pub source_height: u32,
    pub target_size: u32,
    pub scale: f32,
    pub resized_width: u32,
    pub resized_height: u32,
    pub pad_x: u32,
    pub pad_y: u32,
}

impl Letterbox {
    pub fn new(
        source_width: u32,
        source_height: u32,
        target_size: u32,
    ) -> Result<Self, VisionError> {
        if source_width == 0 || source_height == 0 {
            return Err(VisionError::Processing("Invalid image dimensions".to_string()));
        }
        if target_size == 0 {
            return Err(VisionError::Processing("Target size cannot be zero".to_string()));
        }

        let target = target_size as f32;
        let scale = (target / source_width as f32).min(target / source_height as f32);
        let resized_width = ((source_width as f32 * scale).round() as u32).clamp(1, target_size);
        let resized_height = ((source_height as f32 * scale).round() as u32).clamp(1, target_size);

        Ok(Self {
            source_width,
            source_height,
            target_size,
            scale,
            resized_width,
            resized_height,
            pad_x: (target_size - resized_width) / 2,
            pad_y: (target_size - resized_height) / 2,
        })
    }

    /// Map an xyxy box from model input space back onto the source image,
    /// clamped to its bounds.
    pub fn to_source(&self, bbox: [f32; 4]) -> [f32; 4] {
        let w = self.source_width as f32;
        let h = self.source_height as f32;
        let unmap_x = |x: f32| ((x - self.pad_x as f32) / self.scale).clamp(0.0, w);
        let unmap_y = |y: f32| ((y - self.pad_y as f32) / self.scale).clamp(0.0, h);
        [unmap_x(bbox[0]), unmap_y(bbox[1]), unmap_x(bbox[2]), unmap_y(bbox[3])]
    }
}

/// Letterbox `image` into a `target_size` square and lay it out as a
/// normalized NCHW float tensor (batch of one).
pub fn letterbox_tensor(
    image: &DynamicImage,
    target_size: u32,
) -> Result<(Vec<f32>, Letterbox), VisionError> {
    let geometry = Letterbox::new(image.width(), image.height(), target_size)?;

    let rgb = image.to_rgb8();
    let resized = imageops::resize(
        &rgb,
        geometry.resized_width,
        geometry.resized_height,
        FilterType::Triangle,
    );

    let mut canvas = RgbImage::from_pixel(target_size, target_size, Rgb([PAD_VALUE; 3]));
    imageops::overlay(
        &mut canvas,
        &resized,
        geometry.pad_x as i64,
        geometry.pad_y as i64,
    );

    Ok((to_chw_tensor(&canvas), geometry))
}

/// Reshape RGB pixels into CHW planes scaled to [0, 1]
pub fn to_chw_tensor(image: &RgbImage) -> Vec<f32> {
    let (width, height) = image.dimensions();
    let plane = width as usize * height as usize;
    let mut data = vec![0.0f32; plane * 3];

    for (x, y, pixel) in image.enumerate_pixels() {
        let idx = y as usize * width as usize + x as usize;
        for c in 0..3 {
            data[c * plane + idx] = pixel[c] as f32 / 255.0;
        }
    }

    data
}
