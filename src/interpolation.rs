//! Spatial sampling of gridded fields.
//!
//! Filled-contour rendering walks every output pixel, converts it back to
//! geographic coordinates, and samples the field there. These helpers do
//! the coordinate-to-index lookup and the bilinear blend.

use crate::field::ScalarField;

/// Map a physical coordinate to a fractional index into a monotonic
/// coordinate array.
///
/// Handles both ascending and descending arrays (latitude often runs north
/// to south). Returns `None` outside the coordinate range.
pub fn coord_to_index(coords: &[f64], value: f64) -> Option<f64> {
    if coords.len() < 2 {
        return (coords.len() == 1 && coords[0] == value).then_some(0.0);
    }
    let ascending = coords[coords.len() - 1] > coords[0];
    let (lo, hi) = if ascending {
        (coords[0], coords[coords.len() - 1])
    } else {
        (coords[coords.len() - 1], coords[0])
    };
    if value < lo || value > hi {
        return None;
    }

    // Linear scan; coordinate arrays are short (hundreds of entries).
    for k in 0..coords.len() - 1 {
        let (a, b) = (coords[k], coords[k + 1]);
        let inside = if ascending {
            value >= a && value <= b
        } else {
            value <= a && value >= b
        };
        if inside {
            if (b - a).abs() < f64::EPSILON {
                return Some(k as f64);
            }
            return Some(k as f64 + (value - a) / (b - a));
        }
    }
    None
}

/// Bilinear sample of a field at a fractional grid location.
///
/// Returns `NaN` when the location falls outside the grid or touches a
/// missing value.
pub fn bilinear_sample(field: &ScalarField, frow: f64, fcol: f64) -> f32 {
    let h = field.height();
    let w = field.width();
    if frow < 0.0 || fcol < 0.0 || frow > (h - 1) as f64 || fcol > (w - 1) as f64 {
        return f32::NAN;
    }

    let r0 = frow.floor() as usize;
    let c0 = fcol.floor() as usize;
    let r1 = (r0 + 1).min(h - 1);
    let c1 = (c0 + 1).min(w - 1);
    let fr = (frow - r0 as f64) as f32;
    let fc = (fcol - c0 as f64) as f32;

    let v00 = field.get(r0, c0);
    let v01 = field.get(r0, c1);
    let v10 = field.get(r1, c0);
    let v11 = field.get(r1, c1);

    let top = v00 * (1.0 - fc) + v01 * fc;
    let bottom = v10 * (1.0 - fc) + v11 * fc;
    top * (1.0 - fr) + bottom * fr
}

/// Sample a field at a geographic location, or `NaN` when the point is off
/// the grid.
pub fn sample_at(field: &ScalarField, lon: f64, lat: f64) -> f32 {
    let frow = coord_to_index(field.lats(), lat);
    let fcol = coord_to_index(field.lons(), lon);
    match (frow, fcol) {
        (Some(r), Some(c)) => bilinear_sample(field, r, c),
        _ => f32::NAN,
    }
}
