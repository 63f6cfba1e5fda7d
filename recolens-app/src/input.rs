//! Image input

use crate::error::AppError;
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// File extensions accepted for uploaded images, compared case-insensitively
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_allowed_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Decode a jpg/jpeg/png file. Other extensions are refused before the file
/// is opened.
pub fn load_image(path: &Path) -> Result<DynamicImage, AppError> {
    if !is_allowed_image(path) {
        return Err(AppError::UnsupportedImage(path.to_path_buf()));
    }

    let image = image::open(path).map_err(|source| AppError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Loaded {:?} ({}x{})",
        path,
        image.width(),
        image.height()
    );
    Ok(image)
}
