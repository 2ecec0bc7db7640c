//! Image verification helpers for chart tests.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::path::Path;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, image::ImageError> {
    image::open(path)
}

/// Detect image format from bytes
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Fraction of pixels that are not pure white.
///
/// Charts start from a white canvas, so this measures how much of the
/// image was actually drawn on.
pub fn non_white_fraction(image: &DynamicImage) -> f64 {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }
    let mut drawn = 0u64;
    for (_x, _y, pixel) in image.pixels() {
        if pixel.0[0] != 255 || pixel.0[1] != 255 || pixel.0[2] != 255 {
            drawn += 1;
        }
    }
    drawn as f64 / (width as u64 * height as u64) as f64
}
