//! Raster drawing surface shared by all chart types.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::path::Path;

use crate::error::{Result, SynopticError};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);
pub const LIGHT_GRAY: Rgba<u8> = Rgba([200, 200, 200, 255]);
pub const RED: Rgba<u8> = Rgba([200, 20, 20, 255]);

/// An RGBA image buffer plus a loaded font for annotations.
pub struct Canvas {
    image: RgbaImage,
    font: Font<'static>,
}

impl Canvas {
    /// Create a white canvas with a font loaded from `font_path`.
    pub fn new(width: u32, height: u32, font_path: &Path) -> Result<Self> {
        let font_data = std::fs::read(font_path).map_err(|e| SynopticError::Font {
            message: format!("Failed to read font file {}: {}", font_path.display(), e),
        })?;
        let font = Font::try_from_vec(font_data).ok_or_else(|| SynopticError::Font {
            message: format!("Invalid TrueType font: {}", font_path.display()),
        })?;
        let image = RgbaImage::from_pixel(width, height, WHITE);
        Ok(Self { image, font })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, color);
        }
    }

    pub fn draw_line(&mut self, start: (f32, f32), end: (f32, f32), color: Rgba<u8>) {
        draw_line_segment_mut(&mut self.image, start, end, color);
    }

    /// Draw connected line segments through each consecutive pair of points.
    pub fn draw_polyline(&mut self, points: &[(f32, f32)], color: Rgba<u8>) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        draw_filled_rect_mut(&mut self.image, Rect::at(x, y).of_size(width, height), color);
    }

    pub fn draw_rect_outline(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        draw_hollow_rect_mut(&mut self.image, Rect::at(x, y).of_size(width, height), color);
    }

    /// Draw text with its top-left corner at `(x, y)`.
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, size: f32, color: Rgba<u8>) {
        let scale = Scale::uniform(size);
        draw_text_mut(&mut self.image, color, x, y, scale, &self.font, text);
    }

    /// Draw text centered on `(cx, cy)`.
    pub fn draw_text_centered(&mut self, text: &str, cx: i32, cy: i32, size: f32, color: Rgba<u8>) {
        let width = self.text_width(text, size);
        let height = size as i32;
        self.draw_text(text, cx - width / 2, cy - height / 2, size, color);
    }

    /// Approximate rendered width of `text` in pixels.
    pub fn text_width(&self, text: &str, size: f32) -> i32 {
        (text.chars().count() as f32 * size * 0.6) as i32
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
