//! Temperature and wind overlay chart: filled contour bands sampled per
//! pixel with a subsampled wind vector field, axis ticks, and a colorbar.

use image::{Rgba, RgbaImage};
use tracing::{debug, info};

use crate::colormaps::{self, Colormap};
use crate::config::RenderConfig;
use crate::error::{Result, SynopticError};
use crate::field::{ScalarField, VectorField};
use crate::interpolation::sample_at;
use crate::projection::Projection;
use crate::render::canvas::{self, Canvas};
use crate::render::PlotArea;

/// Band edges used by the reference chart: every 4 K from 228 to 272.
const LEVEL_START: f32 = 228.0;
const LEVEL_STOP: f32 = 272.0;
const LEVEL_INTERVAL: f32 = 4.0;

/// Normalized sub-range of the colormap the reference chart uses.
const COLORMAP_LO: f32 = 0.1;
const COLORMAP_HI: f32 = 0.6;

/// Reference magnitude for the vector key, in the wind's units.
const KEY_MAGNITUDE: f32 = 30.0;

/// Arrow length in plot-width fractions per unit of wind, matching the
/// reference chart's quiver scale of 600 axes units.
const VECTOR_SCALE: f64 = 1.0 / 600.0;

const ORCHID: Rgba<u8> = Rgba([186, 85, 211, 255]);

/// Render the temperature and wind overlay chart.
pub fn render_wind_overlay(
    temp: &ScalarField,
    wind: &VectorField,
    projection: &Projection,
    level_label: Option<&str>,
    config: &RenderConfig,
) -> Result<RgbaImage> {
    let left = 70.0;
    let right = 30.0;
    let top = 40.0;
    let bottom = 110.0;
    if config.width as f64 <= left + right || config.height as f64 <= top + bottom {
        return Err(SynopticError::Render {
            message: format!(
                "Image {}x{} is too small for the overlay chart margins",
                config.width, config.height
            ),
        });
    }

    let mut canvas = Canvas::new(config.width, config.height, &config.font_path)?;
    let area = PlotArea {
        x: left,
        y: top,
        width: config.width as f64 - left - right,
        height: config.height as f64 - top - bottom,
    };

    let colormap = colormaps::truncate(
        colormaps::get_colormap(&config.colormap)?,
        COLORMAP_LO,
        COLORMAP_HI,
    )?;
    let levels = band_levels();

    fill_temperature_bands(&mut canvas, &area, projection, temp, &levels, colormap.as_ref());
    draw_wind_vectors(&mut canvas, &area, projection, wind, config.vector_stride);
    draw_frame_and_ticks(&mut canvas, &area, projection);
    draw_vector_key(&mut canvas, &area);
    draw_colorbar(&mut canvas, &area, &levels, colormap.as_ref());
    draw_annotations(&mut canvas, &area, projection, temp, level_label);

    debug!(
        bands = levels.len() + 1,
        colormap = colormap.name(),
        "Rendered wind overlay chart"
    );
    Ok(canvas.into_image())
}

fn band_levels() -> Vec<f32> {
    let mut levels = Vec::new();
    let mut level = LEVEL_START;
    while level <= LEVEL_STOP {
        levels.push(level);
        level += LEVEL_INTERVAL;
    }
    levels
}

/// Index of the band a value falls in. Values below the first edge land in
/// band 0 and values above the last edge in the final band, so the palette
/// extends past both ends of the ladder.
fn band_index(value: f32, levels: &[f32]) -> usize {
    levels.iter().filter(|&&edge| value >= edge).count()
}

fn band_color(band: usize, band_count: usize, colormap: &dyn Colormap) -> Rgba<u8> {
    let normalized = if band_count > 1 {
        band as f32 / (band_count - 1) as f32
    } else {
        0.5
    };
    Rgba(colormap.map_normalized(normalized))
}

/// Classify every pixel of the plot area into a band and fill it.
fn fill_temperature_bands(
    canvas: &mut Canvas,
    area: &PlotArea,
    projection: &Projection,
    temp: &ScalarField,
    levels: &[f32],
    colormap: &dyn Colormap,
) {
    let band_count = levels.len() + 1;
    let x0 = area.x as u32;
    let y0 = area.y as u32;
    let x1 = (area.x + area.width) as u32;
    let y1 = (area.y + area.height) as u32;

    let mut filled = 0u64;
    for py in y0..y1 {
        for px in x0..x1 {
            let nx = 2.0 * (px as f64 + 0.5 - area.x) / area.width - 1.0;
            let ny = 1.0 - 2.0 * (py as f64 + 0.5 - area.y) / area.height;
            let Some((lon, lat)) = projection.unproject(nx, ny) else {
                continue;
            };
            let value = sample_at(temp, lon, lat);
            if value.is_nan() {
                continue;
            }
            let band = band_index(value, levels);
            canvas.put_pixel(px, py, band_color(band, band_count, colormap));
            filled += 1;
        }
    }
    info!(filled_pixels = filled, "Filled temperature bands");
}

/// Draw an arrow for every `stride`-th grid point that projects into view.
fn draw_wind_vectors(
    canvas: &mut Canvas,
    area: &PlotArea,
    projection: &Projection,
    wind: &VectorField,
    stride: usize,
) {
    let grid = &wind.u;
    for row in (0..grid.height()).step_by(stride) {
        for col in (0..grid.width()).step_by(stride) {
            let u = wind.u.get(row, col);
            let v = wind.v.get(row, col);
            if u.is_nan() || v.is_nan() {
                continue;
            }
            let Some((nx, ny)) = projection.project(grid.lon(col), grid.lat(row)) else {
                continue;
            };
            let (px, py) = area.to_pixels(nx, ny);
            if !area.contains(px, py) {
                continue;
            }
            let dx = (u as f64 * VECTOR_SCALE * area.width) as f32;
            let dy = -(v as f64 * VECTOR_SCALE * area.width) as f32;
            draw_arrow(canvas, (px, py), (px + dx, py + dy), canvas::BLACK);
        }
    }
}

/// An arrow is a shaft plus two short barbs at the head.
fn draw_arrow(canvas: &mut Canvas, tail: (f32, f32), head: (f32, f32), color: Rgba<u8>) {
    let dx = head.0 - tail.0;
    let dy = head.1 - tail.1;
    let length = (dx * dx + dy * dy).sqrt();
    if length < 0.5 {
        return;
    }
    canvas.draw_line(tail, head, color);

    let barb = (length * 0.35).clamp(2.0, 6.0);
    let angle = dy.atan2(dx);
    for offset in [2.6f32, -2.6f32] {
        let barb_angle = angle + offset;
        let bx = head.0 + barb * barb_angle.cos();
        let by = head.1 + barb * barb_angle.sin();
        canvas.draw_line(head, (bx, by), color);
    }
}

fn draw_frame_and_ticks(canvas: &mut Canvas, area: &PlotArea, projection: &Projection) {
    canvas.draw_rect_outline(
        area.x as i32,
        area.y as i32,
        area.width as u32,
        area.height as u32,
        canvas::BLACK,
    );

    let Some(extent) = projection.extent() else {
        return;
    };

    let bottom = (area.y + area.height) as f32;
    for lon in lon_ticks(extent.min_lon, extent.max_lon) {
        if let Some((nx, _)) = projection.project(lon, extent.min_lat) {
            let (px, _) = area.to_pixels(nx, -1.0);
            canvas.draw_line((px, bottom), (px, bottom + 8.0), canvas::BLACK);
            let label = format_lon(lon);
            canvas.draw_text_centered(&label, px as i32, bottom as i32 + 18, 13.0, canvas::BLACK);
        }
    }

    for lat in lat_ticks(extent.min_lat, extent.max_lat) {
        if let Some((_, ny)) = projection.project(extent.min_lon, lat) {
            let (_, py) = area.to_pixels(-1.0, ny);
            let left = area.x as f32;
            canvas.draw_line((left - 8.0, py), (left, py), canvas::BLACK);
            let label = format_lat(lat);
            let width = canvas.text_width(&label, 13.0);
            canvas.draw_text(&label, left as i32 - 14 - width, py as i32 - 7, 13.0, canvas::BLACK);
        }
    }
}

/// Round tick positions every 20 degrees of longitude, as the reference
/// chart labels 100E, 120E, and 140E.
fn lon_ticks(min: f64, max: f64) -> Vec<f64> {
    ticks_every(min, max, 20.0)
}

/// Every 10 degrees of latitude.
fn lat_ticks(min: f64, max: f64) -> Vec<f64> {
    ticks_every(min, max, 10.0)
}

fn ticks_every(min: f64, max: f64, step: f64) -> Vec<f64> {
    let mut ticks = Vec::new();
    let mut tick = (min / step).ceil() * step;
    while tick <= max {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

fn format_lon(lon: f64) -> String {
    if lon < 0.0 {
        format!("{:.0}\u{b0}W", -lon)
    } else if lon > 180.0 {
        format!("{:.0}\u{b0}W", 360.0 - lon)
    } else {
        format!("{:.0}\u{b0}E", lon)
    }
}

fn format_lat(lat: f64) -> String {
    if lat < 0.0 {
        format!("{:.0}\u{b0}S", -lat)
    } else {
        format!("{:.0}\u{b0}N", lat)
    }
}

/// Reference arrow with its magnitude, boxed in the top right of the plot.
fn draw_vector_key(canvas: &mut Canvas, area: &PlotArea) {
    let key_len = (KEY_MAGNITUDE as f64 * VECTOR_SCALE * area.width) as f32;
    let box_width = (key_len + 24.0).max(52.0) as u32;
    let box_height = 36u32;
    let x = (area.x + area.width) as i32 - box_width as i32 - 8;
    let y = area.y as i32 + 8;

    canvas.fill_rect(x, y, box_width, box_height, canvas::WHITE);
    canvas.draw_rect_outline(x, y, box_width, box_height, canvas::BLACK);

    let label = format!("{:.0}", KEY_MAGNITUDE);
    canvas.draw_text_centered(&label, x + box_width as i32 / 2, y + 10, 13.0, canvas::BLACK);

    let ay = (y + box_height as i32 - 10) as f32;
    let ax = x as f32 + (box_width as f32 - key_len) / 2.0;
    draw_arrow(canvas, (ax, ay), (ax + key_len, ay), canvas::BLACK);
}

/// Horizontal colorbar with one cell per band and edge ticks labeled.
fn draw_colorbar(canvas: &mut Canvas, area: &PlotArea, levels: &[f32], colormap: &dyn Colormap) {
    let band_count = levels.len() + 1;
    let bar_y = (area.y + area.height) as i32 + 48;
    let bar_height = 16u32;
    let bar_x = area.x as i32;
    let bar_width = area.width as f64;

    for band in 0..band_count {
        let cell_x = bar_x + (band as f64 / band_count as f64 * bar_width) as i32;
        let cell_end = bar_x + ((band + 1) as f64 / band_count as f64 * bar_width) as i32;
        let cell_width = (cell_end - cell_x).max(1) as u32;
        canvas.fill_rect(
            cell_x,
            bar_y,
            cell_width,
            bar_height,
            band_color(band, band_count, colormap),
        );
    }
    canvas.draw_rect_outline(bar_x, bar_y, bar_width as u32, bar_height, canvas::BLACK);

    for (i, level) in levels.iter().enumerate() {
        let edge_x = bar_x + ((i + 1) as f64 / band_count as f64 * bar_width) as i32;
        canvas.draw_line(
            (edge_x as f32, bar_y as f32),
            (edge_x as f32, (bar_y + bar_height as i32) as f32),
            canvas::BLACK,
        );
        let label = format!("{:.0}", level);
        canvas.draw_text_centered(&label, edge_x, bar_y + bar_height as i32 + 12, 12.0, canvas::BLACK);
    }
}

fn draw_annotations(
    canvas: &mut Canvas,
    area: &PlotArea,
    projection: &Projection,
    temp: &ScalarField,
    level_label: Option<&str>,
) {
    let title_y = area.y as i32 - 24;
    let left_title = if temp.name.is_empty() { "Temp" } else { &temp.name };
    canvas.draw_text(left_title, area.x as i32, title_y, 18.0, canvas::BLACK);

    let right_title = "Wind";
    let width = canvas.text_width(right_title, 18.0);
    canvas.draw_text(
        right_title,
        (area.x + area.width) as i32 - width,
        title_y,
        18.0,
        canvas::BLACK,
    );

    if let Some(label) = level_label {
        // Near the top left of the map, like the reference chart's
        // "500hPa" marker
        let (px, py) = if let Some(extent) = projection.extent() {
            let lon = extent.min_lon + 0.11 * (extent.max_lon - extent.min_lon);
            let lat = extent.max_lat - 0.06 * (extent.max_lat - extent.min_lat);
            match projection.project(lon, lat) {
                Some((nx, ny)) => area.to_pixels(nx, ny),
                None => (area.x as f32 + 50.0, area.y as f32 + 20.0),
            }
        } else {
            (area.x as f32 + 50.0, area.y as f32 + 20.0)
        };
        let size = 16.0;
        let text_width = canvas.text_width(label, size);
        canvas.fill_rect(
            px as i32 - text_width / 2 - 4,
            py as i32 - 12,
            (text_width + 8) as u32,
            24,
            canvas::WHITE,
        );
        canvas.draw_text_centered(label, px as i32, py as i32, size, ORCHID);
    }
}
