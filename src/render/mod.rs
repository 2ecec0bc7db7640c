//! Chart rendering.
//!
//! Each chart type composes the same building blocks: a [`Canvas`] wrapping an
//! RGBA image buffer, a map projection from the `projection` module, and the
//! contouring and sampling routines from `contour` and `interpolation`.

mod canvas;
mod overlay;
mod slp;

pub use canvas::Canvas;
pub use overlay::render_wind_overlay;
pub use slp::render_slp_chart;

use crate::field::ScalarField;

/// Pixel rectangle that a chart draws its map into, leaving margins for
/// titles and legends.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Map normalized projection coordinates in [-1, 1] to pixel coordinates.
    /// Normalized y increases northward while pixel y increases downward.
    pub fn to_pixels(&self, nx: f64, ny: f64) -> (f32, f32) {
        let px = self.x + (nx + 1.0) / 2.0 * self.width;
        let py = self.y + (1.0 - ny) / 2.0 * self.height;
        (px as f32, py as f32)
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.x + self.width / 2.0) as f32,
            (self.y + self.height / 2.0) as f32,
        )
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px as f64 >= self.x
            && px as f64 <= self.x + self.width
            && py as f64 >= self.y
            && py as f64 <= self.y + self.height
    }
}

/// Convert fractional grid coordinates produced by the contour tracer into
/// geographic coordinates through the field's coordinate arrays.
pub(crate) fn grid_to_lonlat(field: &ScalarField, frow: f64, fcol: f64) -> (f64, f64) {
    (field.lon_at(fcol), field.lat_at(frow))
}
