//! Map projections for chart rendering.
//!
//! A projection maps geographic coordinates (degrees east, degrees north)
//! into a normalized square: both axes run -1 to +1 with y pointing up.
//! The canvas layer scales that square onto pixels. Points an orthographic
//! view cannot see (beyond the horizon) project to `None`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynopticError};

/// A geographic extent: `[min_lon, max_lon, min_lat, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Extent {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Result<Self> {
        if min_lon >= max_lon || min_lat >= max_lat {
            return Err(SynopticError::InvalidParameter {
                param: "extent".to_string(),
                message: format!(
                    "Degenerate extent: lon {}..{}, lat {}..{}",
                    min_lon, max_lon, min_lat, max_lat
                ),
            });
        }
        if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
            return Err(SynopticError::InvalidParameter {
                param: "extent".to_string(),
                message: "Latitude must be in the range -90 to 90".to_string(),
            });
        }
        Ok(Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        })
    }

    /// Whole-globe extent with longitudes 0..360.
    pub fn global() -> Self {
        Self {
            min_lon: 0.0,
            max_lon: 360.0,
            min_lat: -90.0,
            max_lat: 90.0,
        }
    }
}

/// Supported chart projections.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Equirectangular view of a lon/lat extent.
    PlateCarree(Extent),
    /// Satellite view of the hemisphere centered on a lon/lat point.
    Orthographic {
        center_lon: f64,
        center_lat: f64,
    },
}

impl Projection {
    /// Project geographic coordinates into the normalized [-1, 1] square.
    ///
    /// Returns `None` for points the projection cannot display.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        match self {
            Projection::PlateCarree(extent) => {
                let x = 2.0 * (lon - extent.min_lon) / (extent.max_lon - extent.min_lon) - 1.0;
                let y = 2.0 * (lat - extent.min_lat) / (extent.max_lat - extent.min_lat) - 1.0;
                Some((x, y))
            }
            Projection::Orthographic {
                center_lon,
                center_lat,
            } => {
                let lam = (lon - center_lon).to_radians();
                let phi = lat.to_radians();
                let phi0 = center_lat.to_radians();

                // Angular distance from the view center; beyond 90 degrees
                // the point is behind the globe.
                let cos_c = phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * lam.cos();
                if cos_c < 0.0 {
                    return None;
                }

                let x = phi.cos() * lam.sin();
                let y = phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * lam.cos();
                Some((x, y))
            }
        }
    }

    /// Inverse projection from the normalized square back to lon/lat.
    ///
    /// Only the plate-carrée projection supports this (it is what pixel-fill
    /// rendering needs); the orthographic inverse is not required by any
    /// chart and returns `None`.
    pub fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match self {
            Projection::PlateCarree(extent) => {
                let lon = extent.min_lon + (x + 1.0) / 2.0 * (extent.max_lon - extent.min_lon);
                let lat = extent.min_lat + (y + 1.0) / 2.0 * (extent.max_lat - extent.min_lat);
                Some((lon, lat))
            }
            Projection::Orthographic { .. } => None,
        }
    }

    /// The geographic extent this projection displays, if it has one.
    pub fn extent(&self) -> Option<Extent> {
        match self {
            Projection::PlateCarree(extent) => Some(*extent),
            Projection::Orthographic { .. } => None,
        }
    }
}

impl FromStr for Projection {
    type Err = SynopticError;

    /// Parse `"ortho:<center_lon>,<center_lat>"` or
    /// `"platecarree:<min_lon>,<max_lon>,<min_lat>,<max_lat>"`.
    fn from_str(s: &str) -> Result<Self> {
        let (kind, rest) = s.split_once(':').unwrap_or((s, ""));
        match kind.to_lowercase().as_str() {
            "ortho" | "orthographic" => {
                let parts = parse_floats(rest, 2, "projection")?;
                Ok(Projection::Orthographic {
                    center_lon: parts[0],
                    center_lat: parts[1],
                })
            }
            "platecarree" | "pc" => {
                if rest.is_empty() {
                    return Ok(Projection::PlateCarree(Extent::global()));
                }
                let parts = parse_floats(rest, 4, "projection")?;
                Ok(Projection::PlateCarree(Extent::new(
                    parts[0], parts[1], parts[2], parts[3],
                )?))
            }
            other => Err(SynopticError::InvalidParameter {
                param: "projection".to_string(),
                message: format!(
                    "Unknown projection: {}. Valid values are 'ortho:<lon>,<lat>' or 'platecarree:<min_lon>,<max_lon>,<min_lat>,<max_lat>'",
                    other
                ),
            }),
        }
    }
}

/// Parse a comma-separated list of exactly `count` floats.
pub(crate) fn parse_floats(s: &str, count: usize, param: &str) -> Result<Vec<f64>> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != count {
        return Err(SynopticError::InvalidParameter {
            param: param.to_string(),
            message: format!("Expected {} comma-separated numbers, got '{}'", count, s),
        });
    }
    parts
        .iter()
        .map(|p| {
            p.parse::<f64>().map_err(|_| SynopticError::InvalidParameter {
                param: param.to_string(),
                message: format!("Invalid number: {}", p),
            })
        })
        .collect()
}
