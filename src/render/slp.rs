//! Sea-level pressure chart: black line contours on an orthographic globe
//! with detected low-pressure centers marked.

use image::RgbaImage;
use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::contour::{self, ContourLine};
use crate::error::{Result, SynopticError};
use crate::extrema::GridMinimum;
use crate::field::ScalarField;
use crate::projection::Projection;
use crate::render::canvas::{self, Canvas};
use crate::render::{grid_to_lonlat, PlotArea};

/// Contour ladder used by the reference chart: every 4 hPa from 948 to 1056,
/// with an extra 975 hPa line.
const LEVEL_START: f32 = 948.0;
const LEVEL_STOP: f32 = 1056.0;
const LEVEL_INTERVAL: f32 = 4.0;
const EXTRA_LEVELS: [f32; 1] = [975.0];

/// Render the SLP chart.
///
/// The field is expected in hPa with a cyclic longitude column appended so
/// contour lines close around the globe. Detected minima are indices into
/// that same field.
pub fn render_slp_chart(
    field: &ScalarField,
    minima: &[GridMinimum],
    projection: &Projection,
    title: Option<&str>,
    config: &RenderConfig,
) -> Result<RgbaImage> {
    let margin = 40.0;
    let top = 80.0;
    let bottom = 70.0;
    let side = (config.width as f64 - 2.0 * margin)
        .min(config.height as f64 - top - bottom);
    if side <= 0.0 {
        return Err(SynopticError::Render {
            message: format!(
                "Image {}x{} is too small for the SLP chart margins",
                config.width, config.height
            ),
        });
    }

    let mut canvas = Canvas::new(config.width, config.height, &config.font_path)?;
    let area = PlotArea {
        x: (config.width as f64 - side) / 2.0,
        y: top + (config.height as f64 - top - bottom - side) / 2.0,
        width: side,
        height: side,
    };

    draw_globe_disc(&mut canvas, &area);
    draw_graticule(&mut canvas, &area, projection);

    let levels = contour::contour_levels(LEVEL_START, LEVEL_STOP, LEVEL_INTERVAL, &EXTRA_LEVELS);
    let lines = contour::extract_contours(field, &levels);
    info!(
        levels = levels.len(),
        contour_lines = lines.len(),
        "Extracted SLP contours"
    );

    for line in &lines {
        let smoothed = contour::smooth_contour(line, config.smoothing);
        draw_contour_line(&mut canvas, &area, projection, field, &smoothed);
        draw_contour_value_label(&mut canvas, &area, projection, field, &smoothed);
    }

    draw_low_labels(&mut canvas, &area, projection, field, minima);
    draw_titles(&mut canvas, &area, title);
    draw_contour_info_box(&mut canvas, &area, config);

    debug!(minima = minima.len(), "Rendered SLP chart");
    Ok(canvas.into_image())
}

/// Fill the visible hemisphere disc and stroke its limb.
fn draw_globe_disc(canvas: &mut Canvas, area: &PlotArea) {
    let (cx, cy) = area.center();
    let radius = (area.width / 2.0) as f32;

    let background = image::Rgba([224, 255, 255, 255]);
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let x1 = (cx + radius).ceil() as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let y1 = (cy + radius).ceil() as u32;
    for py in y0..y1.min(canvas.height()) {
        for px in x0..x1.min(canvas.width()) {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                canvas.put_pixel(px, py, background);
            }
        }
    }

    // Limb circle drawn as a fine polyline
    let steps = 360;
    let mut points = Vec::with_capacity(steps + 1);
    for k in 0..=steps {
        let theta = 2.0 * std::f32::consts::PI * k as f32 / steps as f32;
        points.push((cx + radius * theta.cos(), cy + radius * theta.sin()));
    }
    canvas.draw_polyline(&points, canvas::BLACK);
}

/// Draw meridians every 30 degrees and parallels every 15 degrees.
fn draw_graticule(canvas: &mut Canvas, area: &PlotArea, projection: &Projection) {
    let mut lon = -180.0;
    while lon < 180.0 {
        let mut segment = Vec::new();
        let mut lat = -90.0;
        while lat <= 90.0 {
            push_projected(&mut segment, canvas, area, projection, lon, lat);
            lat += 2.0;
        }
        flush_segment(&mut segment, canvas);
        lon += 30.0;
    }

    let mut lat = -75.0;
    while lat <= 75.0 {
        let mut segment = Vec::new();
        let mut lon = -180.0;
        while lon <= 180.0 {
            push_projected(&mut segment, canvas, area, projection, lon, lat);
            lon += 2.0;
        }
        flush_segment(&mut segment, canvas);
        lat += 15.0;
    }
}

fn push_projected(
    segment: &mut Vec<(f32, f32)>,
    canvas: &mut Canvas,
    area: &PlotArea,
    projection: &Projection,
    lon: f64,
    lat: f64,
) {
    match projection.project(lon, lat) {
        Some((nx, ny)) => segment.push(area.to_pixels(nx, ny)),
        None => flush_segment(segment, canvas),
    }
}

fn flush_segment(segment: &mut Vec<(f32, f32)>, canvas: &mut Canvas) {
    if segment.len() >= 2 {
        canvas.draw_polyline(segment, canvas::LIGHT_GRAY);
    }
    segment.clear();
}

/// Project a contour polyline and draw its visible pieces.
fn draw_contour_line(
    canvas: &mut Canvas,
    area: &PlotArea,
    projection: &Projection,
    field: &ScalarField,
    line: &ContourLine,
) {
    let mut segment = Vec::new();
    for point in &line.points {
        let (lon, lat) = grid_to_lonlat(field, point.row, point.col);
        push_projected(&mut segment, canvas, area, projection, lon, lat);
    }
    flush_segment(&mut segment, canvas);
}

/// Print the contour's level value at a visible midpoint of the line, on a
/// small white mask so it stays legible over the line itself.
fn draw_contour_value_label(
    canvas: &mut Canvas,
    area: &PlotArea,
    projection: &Projection,
    field: &ScalarField,
    line: &ContourLine,
) {
    let visible: Vec<(f32, f32)> = line
        .points
        .iter()
        .filter_map(|point| {
            let (lon, lat) = grid_to_lonlat(field, point.row, point.col);
            projection
                .project(lon, lat)
                .map(|(nx, ny)| area.to_pixels(nx, ny))
        })
        .filter(|&(px, py)| area.contains(px, py))
        .collect();
    // Short scraps near the limb stay unlabeled
    if visible.len() < 8 {
        return;
    }
    let (px, py) = visible[visible.len() / 2];
    let text = format!("{:.0}", line.level);
    let size = 10.0;
    let text_width = canvas.text_width(&text, size);
    canvas.fill_rect(
        px as i32 - text_width / 2 - 2,
        py as i32 - size as i32 / 2 - 2,
        (text_width + 4) as u32,
        size as u32 + 4,
        canvas::WHITE,
    );
    canvas.draw_text_centered(&text, px as i32, py as i32, size, canvas::BLACK);
}

/// Mark each detected low with an "L" and the pressure value beneath it.
fn draw_low_labels(
    canvas: &mut Canvas,
    area: &PlotArea,
    projection: &Projection,
    field: &ScalarField,
    minima: &[GridMinimum],
) {
    for minimum in minima {
        let lon = field.lon(minimum.col);
        let lat = field.lat(minimum.row);
        let Some((nx, ny)) = projection.project(lon, lat) else {
            // Lows on the far hemisphere are not visible
            continue;
        };
        let (px, py) = area.to_pixels(nx, ny);
        if !area.contains(px, py) {
            continue;
        }
        let value = field.get(minimum.row, minimum.col);
        canvas.draw_text_centered("L", px as i32, py as i32, 20.0, canvas::BLACK);
        if value.is_finite() {
            let label = format!("{:.0}", value);
            canvas.draw_text_centered(&label, px as i32 + 10, py as i32 + 8, 11.0, canvas::BLACK);
        }
    }
}

fn draw_titles(canvas: &mut Canvas, area: &PlotArea, title: Option<&str>) {
    let width = canvas.width() as i32;
    if let Some(title) = title {
        canvas.draw_text_centered(title, width / 2, 22, 22.0, canvas::BLACK);
    }
    let y = (area.y - 24.0) as i32;
    canvas.draw_text(
        "mean Daily Sea Level Pressure",
        area.x as i32,
        y,
        14.0,
        canvas::BLACK,
    );
    let right_label = "hPa";
    let right_width = canvas.text_width(right_label, 14.0);
    canvas.draw_text(
        right_label,
        (area.x + area.width) as i32 - right_width,
        y,
        14.0,
        canvas::BLACK,
    );
}

fn draw_contour_info_box(canvas: &mut Canvas, area: &PlotArea, config: &RenderConfig) {
    let text = format!(
        "CONTOUR FROM {:.0} TO {:.0} BY {:.0}",
        LEVEL_START, LEVEL_STOP, LEVEL_INTERVAL
    );
    let size = 13.0;
    let text_width = canvas.text_width(&text, size);
    let box_width = (text_width + 12) as u32;
    let box_height = (size as i32 + 10) as u32;
    let x = (config.width as i32 - box_width as i32) / 2;
    let y = (area.y + area.height) as i32 + 16;
    canvas.fill_rect(x, y, box_width, box_height, canvas::WHITE);
    canvas.draw_rect_outline(x, y, box_width, box_height, canvas::BLACK);
    canvas.draw_text(&text, x + 6, y + 5, size, canvas::BLACK);
}
