//! Gridded scalar and vector fields on a latitude/longitude grid.
//!
//! A [`ScalarField`] is the unit of data every chart and diagnostic in this
//! crate consumes: a 2D array of values plus the 1D coordinate arrays that
//! position each row and column on the globe. Fields are validated once at
//! construction and treated as immutable afterwards.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use ndarray::{s, Array2, ArrayView2};

use crate::error::{Result, SynopticError};

/// A 2D scalar quantity sampled on a rectangular lat/lon grid.
///
/// Row index `i` runs over `lat`, column index `j` over `lon`. The grid is
/// rectangular but not necessarily evenly spaced.
#[derive(Debug, Clone)]
pub struct ScalarField {
    /// Field values, shape `(lat.len(), lon.len())`
    data: Array2<f32>,
    /// Latitude of each row, degrees north
    lat: Vec<f64>,
    /// Longitude of each column, degrees east
    lon: Vec<f64>,
    /// Human-readable name of the quantity (for titles and logs)
    pub name: String,
    /// Physical units of the values
    pub units: String,
}

impl ScalarField {
    /// Build a field, checking that the coordinate arrays match the data shape.
    pub fn new(data: Array2<f32>, lat: Vec<f64>, lon: Vec<f64>) -> Result<Self> {
        if lat.is_empty() || lon.is_empty() {
            return Err(SynopticError::InvalidGrid {
                message: "Coordinate arrays must be non-empty".to_string(),
            });
        }
        if data.nrows() != lat.len() || data.ncols() != lon.len() {
            return Err(SynopticError::InvalidGrid {
                message: format!(
                    "Data shape ({}, {}) does not match coordinates (lat: {}, lon: {})",
                    data.nrows(),
                    data.ncols(),
                    lat.len(),
                    lon.len()
                ),
            });
        }
        Ok(Self {
            data,
            lat,
            lon,
            name: String::new(),
            units: String::new(),
        })
    }

    /// Attach a name and units, for chart titles.
    pub fn with_metadata(mut self, name: &str, units: &str) -> Self {
        self.name = name.to_string();
        self.units = units.to_string();
        self
    }

    /// Number of grid rows (latitudes).
    pub fn height(&self) -> usize {
        self.lat.len()
    }

    /// Number of grid columns (longitudes).
    pub fn width(&self) -> usize {
        self.lon.len()
    }

    /// Read-only view of the values.
    pub fn values(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Value at a grid point.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[[row, col]]
    }

    /// Latitude of a grid row, degrees north.
    pub fn lat(&self, row: usize) -> f64 {
        self.lat[row]
    }

    /// Longitude of a grid column, degrees east.
    pub fn lon(&self, col: usize) -> f64 {
        self.lon[col]
    }

    /// The full latitude coordinate array.
    pub fn lats(&self) -> &[f64] {
        &self.lat
    }

    /// The full longitude coordinate array.
    pub fn lons(&self) -> &[f64] {
        &self.lon
    }

    /// Latitude at a fractional row index, linearly interpolated.
    pub fn lat_at(&self, frow: f64) -> f64 {
        interp_coord(&self.lat, frow)
    }

    /// Longitude at a fractional column index, linearly interpolated.
    pub fn lon_at(&self, fcol: f64) -> f64 {
        interp_coord(&self.lon, fcol)
    }

    /// Minimum and maximum of the finite values, if any exist.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in self.data.iter() {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min <= max {
            Some((min, max))
        } else {
            None
        }
    }

    /// Return a copy with every value scaled and offset (`v * scale + offset`).
    ///
    /// Used for unit conversions such as Pa to hPa before contouring.
    pub fn convert_units(&self, scale: f32, offset: f32, units: &str) -> Self {
        let mut out = self.clone();
        out.data.mapv_inplace(|v| v * scale + offset);
        out.units = units.to_string();
        out
    }

    /// Append one wrapped column so global contours close across the
    /// longitude seam.
    ///
    /// The duplicated first column is placed at `lon[0] + 360`, removing the
    /// not-shown-data gap between the last and first longitudes of a global
    /// grid. Returns `self` unchanged in shape if the grid has fewer than two
    /// columns.
    pub fn add_cyclic_longitude(&self) -> Result<Self> {
        let w = self.width();
        if w < 2 {
            return Ok(self.clone());
        }
        let h = self.height();
        let mut data = Array2::zeros((h, w + 1));
        data.slice_mut(s![.., ..w]).assign(&self.data);
        data.slice_mut(s![.., w]).assign(&self.data.slice(s![.., 0]));

        let mut lon = self.lon.clone();
        lon.push(self.lon[0] + 360.0);

        let mut out = ScalarField::new(data, self.lat.clone(), lon)?;
        out.name = self.name.clone();
        out.units = self.units.clone();
        Ok(out)
    }
}

/// Paired east/north wind components on a shared grid.
#[derive(Debug, Clone)]
pub struct VectorField {
    /// Eastward component
    pub u: ScalarField,
    /// Northward component
    pub v: ScalarField,
}

impl VectorField {
    /// Pair two components, checking they live on the same grid.
    pub fn new(u: ScalarField, v: ScalarField) -> Result<Self> {
        if u.height() != v.height() || u.width() != v.width() {
            return Err(SynopticError::InvalidGrid {
                message: format!(
                    "Vector components have mismatched shapes: ({}, {}) vs ({}, {})",
                    u.height(),
                    u.width(),
                    v.height(),
                    v.width()
                ),
            });
        }
        Ok(Self { u, v })
    }
}

/// Linear interpolation into a 1D coordinate array at a fractional index.
fn interp_coord(coords: &[f64], findex: f64) -> f64 {
    if coords.len() == 1 {
        return coords[0];
    }
    let clamped = findex.clamp(0.0, (coords.len() - 1) as f64);
    let lo = clamped.floor() as usize;
    let hi = (lo + 1).min(coords.len() - 1);
    let frac = clamped - lo as f64;
    coords[lo] * (1.0 - frac) + coords[hi] * frac
}

/// Decode a CF-style time coordinate value into a calendar label.
///
/// Understands `"days since <date>"` and `"hours since <date>"` unit strings
/// with a handful of date spellings, including the loose `1-1-1 00:00:0.0`
/// form found in older reanalysis files. Returns `None` when the units string
/// is not recognized, in which case callers fall back to the raw value.
pub fn time_label(units: &str, value: f64) -> Option<String> {
    let mut parts = units.splitn(2, " since ");
    let unit = parts.next()?.trim().to_lowercase();
    let origin_str = parts.next()?.trim();

    let origin = parse_time_origin(origin_str)?;
    let offset = match unit.as_str() {
        "days" | "day" => Duration::hours((value * 24.0).round() as i64),
        "hours" | "hour" => Duration::hours(value.round() as i64),
        _ => return None,
    };
    let when = origin.checked_add_signed(offset)?;
    Some(when.format("%Y, %B %-d").to_string())
}

/// Parse the reference date of a CF time units string.
fn parse_time_origin(s: &str) -> Option<NaiveDateTime> {
    // Date-and-time spellings first, then bare dates.
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    // Loose forms like "1-1-1 00:00:0.0": parse just the date component.
    let date_part = s.split_whitespace().next()?;
    let nums: Vec<&str> = date_part.split('-').collect();
    if nums.len() == 3 {
        let y: i32 = nums[0].parse().ok()?;
        let m: u32 = nums[1].parse().ok()?;
        let d: u32 = nums[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d).map(|date| date.and_hms_opt(0, 0, 0).unwrap());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn field_3x4() -> ScalarField {
        let data = array![
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0]
        ];
        ScalarField::new(data, vec![90.0, 87.5, 85.0], vec![0.0, 2.5, 5.0, 7.5]).unwrap()
    }

    #[test]
    fn test_shape_validation() {
        let data = Array2::<f32>::zeros((3, 4));
        assert!(ScalarField::new(data.clone(), vec![0.0; 3], vec![0.0; 4]).is_ok());
        assert!(ScalarField::new(data.clone(), vec![0.0; 4], vec![0.0; 4]).is_err());
        assert!(ScalarField::new(data.clone(), vec![0.0; 3], vec![0.0; 3]).is_err());
        assert!(ScalarField::new(data, vec![], vec![0.0; 4]).is_err());
    }

    #[test]
    fn test_unit_conversion() {
        let f = field_3x4().with_metadata("slp", "Pa");
        let hpa = f.convert_units(0.01, 0.0, "hPa");
        assert!((hpa.get(0, 0) - 0.01).abs() < 1e-6);
        assert!((hpa.get(2, 3) - 0.12).abs() < 1e-6);
        assert_eq!(hpa.units, "hPa");
        // Original is untouched
        assert_eq!(f.get(0, 0), 1.0);
    }

    #[test]
    fn test_cyclic_longitude() {
        let f = field_3x4();
        let wrapped = f.add_cyclic_longitude().unwrap();
        assert_eq!(wrapped.width(), 5);
        assert_eq!(wrapped.height(), 3);
        // New column duplicates column 0, shifted by a full turn
        assert_eq!(wrapped.get(0, 4), f.get(0, 0));
        assert_eq!(wrapped.get(2, 4), f.get(2, 0));
        assert!((wrapped.lon(4) - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_range() {
        let f = field_3x4();
        assert_eq!(f.value_range(), Some((1.0, 12.0)));

        let all_nan = ScalarField::new(
            Array2::from_elem((2, 2), f32::NAN),
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        )
        .unwrap();
        assert_eq!(all_nan.value_range(), None);
    }

    #[test]
    fn test_fractional_coordinates() {
        let f = field_3x4();
        assert!((f.lat_at(0.5) - 88.75).abs() < 1e-9);
        assert!((f.lon_at(1.5) - 3.75).abs() < 1e-9);
        // Clamped at the edges
        assert!((f.lat_at(-1.0) - 90.0).abs() < 1e-9);
        assert!((f.lon_at(10.0) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_vector_field_shape_check() {
        let u = field_3x4();
        let v = field_3x4();
        assert!(VectorField::new(u.clone(), v).is_ok());

        let smaller = ScalarField::new(
            Array2::zeros((2, 2)),
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        )
        .unwrap();
        assert!(VectorField::new(u, smaller).is_err());
    }

    #[test]
    fn test_time_label() {
        let label = time_label("hours since 1963-01-01 00:00:00", 24.0 * 23.0).unwrap();
        assert_eq!(label, "1963, January 24");

        let label = time_label("days since 1963-01-01 00:00:00", 23.0).unwrap();
        assert_eq!(label, "1963, January 24");

        // Loose reanalysis-style origin
        assert!(time_label("hours since 1-1-1 00:00:0.0", 0.0).is_some());

        // Unrecognized units fall through
        assert!(time_label("months since 1963-01-01", 1.0).is_none());
        assert!(time_label("kelvin", 1.0).is_none());
    }
}
