//! Contour extraction for gridded fields.
//!
//! Isolines are traced with the marching-squares algorithm: each grid cell
//! is classified by which corners sit above the contour level, crossing
//! points are placed by linear interpolation along the cell edges, and the
//! resulting segments are chained into polylines. Vertex coordinates are
//! fractional grid indices `(row, col)`; callers map them to physical
//! coordinates through the field's coordinate arrays.

use crate::field::ScalarField;

/// A contour vertex in fractional grid-index space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Fractional row index
    pub row: f64,
    /// Fractional column index
    pub col: f64,
}

impl GridPoint {
    fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    fn close_to(&self, other: &GridPoint, tol: f64) -> bool {
        (self.row - other.row).abs() < tol && (self.col - other.col).abs() < tol
    }
}

/// An unordered contour segment between two crossing points.
#[derive(Debug, Clone)]
struct Segment {
    start: GridPoint,
    end: GridPoint,
}

/// A chained contour polyline at a single level.
#[derive(Debug, Clone)]
pub struct ContourLine {
    /// The level this line traces
    pub level: f32,
    /// Polyline vertices in grid-index space
    pub points: Vec<GridPoint>,
    /// Whether the polyline closes on itself
    pub closed: bool,
}

/// Build a regularly spaced level list, with optional extra levels spliced
/// in (the reference SLP chart adds a 975 hPa line to its 4 hPa ladder).
pub fn contour_levels(start: f32, stop: f32, interval: f32, extra: &[f32]) -> Vec<f32> {
    let mut levels = Vec::new();
    if interval > 0.0 {
        let mut level = start;
        while level <= stop {
            levels.push(level);
            level += interval;
        }
    }
    for &e in extra {
        if e.is_finite() && !levels.iter().any(|&l| (l - e).abs() < 1e-6) {
            levels.push(e);
        }
    }
    levels.sort_by(f32::total_cmp);
    levels
}

/// Extract all contour lines of a field at the given levels.
pub fn extract_contours(field: &ScalarField, levels: &[f32]) -> Vec<ContourLine> {
    let mut lines = Vec::new();
    for &level in levels {
        let segments = march_squares(field, level);
        for mut line in connect_segments(segments) {
            line.level = level;
            lines.push(line);
        }
    }
    lines
}

/// Marching squares over one level, producing unordered segments.
fn march_squares(field: &ScalarField, level: f32) -> Vec<Segment> {
    let h = field.height();
    let w = field.width();
    if h < 2 || w < 2 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for i in 0..h - 1 {
        for j in 0..w - 1 {
            let tl = field.get(i, j);
            let tr = field.get(i, j + 1);
            let bl = field.get(i + 1, j);
            let br = field.get(i + 1, j + 1);

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut index = 0u8;
            if tl >= level {
                index |= 1;
            }
            if tr >= level {
                index |= 2;
            }
            if br >= level {
                index |= 4;
            }
            if bl >= level {
                index |= 8;
            }

            segments.extend(cell_segments(index, i as f64, j as f64, tl, tr, br, bl, level));
        }
    }
    segments
}

/// Segment lookup for one marching-squares cell.
#[allow(clippy::too_many_arguments)]
fn cell_segments(
    index: u8,
    row: f64,
    col: f64,
    tl: f32,
    tr: f32,
    br: f32,
    bl: f32,
    level: f32,
) -> Vec<Segment> {
    let top = edge_crossing(row, col, row, col + 1.0, tl, tr, level);
    let right = edge_crossing(row, col + 1.0, row + 1.0, col + 1.0, tr, br, level);
    let bottom = edge_crossing(row + 1.0, col, row + 1.0, col + 1.0, bl, br, level);
    let left = edge_crossing(row, col, row + 1.0, col, tl, bl, level);

    let seg = |start, end| Segment { start, end };
    match index {
        0 | 15 => vec![],
        1 | 14 => vec![seg(left, top)],
        2 | 13 => vec![seg(top, right)],
        3 | 12 => vec![seg(left, right)],
        4 | 11 => vec![seg(right, bottom)],
        // Saddle cells produce two independent segments
        5 => vec![seg(left, top), seg(right, bottom)],
        6 | 9 => vec![seg(top, bottom)],
        7 | 8 => vec![seg(left, bottom)],
        10 => vec![seg(top, right), seg(left, bottom)],
        _ => vec![],
    }
}

/// Where the level crosses an edge, by linear interpolation of the corner
/// values.
fn edge_crossing(
    r1: f64,
    c1: f64,
    r2: f64,
    c2: f64,
    v1: f32,
    v2: f32,
    level: f32,
) -> GridPoint {
    if (v2 - v1).abs() < 1e-6 {
        return GridPoint::new((r1 + r2) / 2.0, (c1 + c2) / 2.0);
    }
    let t = (((level - v1) / (v2 - v1)) as f64).clamp(0.0, 1.0);
    GridPoint::new(r1 + t * (r2 - r1), c1 + t * (c2 - c1))
}

/// Chain unordered segments into continuous polylines.
fn connect_segments(segments: Vec<Segment>) -> Vec<ContourLine> {
    const TOL: f64 = 1e-3;

    let mut lines = Vec::new();
    let mut used = vec![false; segments.len()];

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;
        let mut points = vec![segments[start_idx].start, segments[start_idx].end];

        let mut extended = true;
        while extended {
            extended = false;
            let tail = *points.last().expect("polyline is never empty");
            for (i, seg) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }
                if seg.start.close_to(&tail, TOL) {
                    points.push(seg.end);
                } else if seg.end.close_to(&tail, TOL) {
                    points.push(seg.start);
                } else {
                    continue;
                }
                used[i] = true;
                extended = true;
                break;
            }
        }

        let closed = points.len() > 2
            && points
                .first()
                .expect("polyline is never empty")
                .close_to(points.last().expect("polyline is never empty"), TOL);

        lines.push(ContourLine {
            level: 0.0,
            points,
            closed,
        });
    }

    lines
}

/// One pass of Chaikin corner cutting per iteration, to soften the
/// stairstep look of coarse grids.
pub fn smooth_contour(line: &ContourLine, iterations: u32) -> ContourLine {
    if iterations == 0 || line.points.len() < 3 {
        return line.clone();
    }

    let mut points = line.points.clone();
    for _ in 0..iterations {
        let mut next = Vec::with_capacity(points.len() * 2);
        if !line.closed {
            next.push(points[0]);
        }
        let pair_count = if line.closed {
            points.len()
        } else {
            points.len() - 1
        };
        for i in 0..pair_count {
            let p = points[i];
            let q = points[(i + 1) % points.len()];
            next.push(GridPoint::new(
                0.75 * p.row + 0.25 * q.row,
                0.75 * p.col + 0.25 * q.col,
            ));
            next.push(GridPoint::new(
                0.25 * p.row + 0.75 * q.row,
                0.25 * p.col + 0.75 * q.col,
            ));
        }
        if !line.closed {
            next.push(*points.last().expect("polyline is never empty"));
        }
        points = next;
    }

    ContourLine {
        level: line.level,
        points,
        closed: line.closed,
    }
}
