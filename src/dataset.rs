//! In-memory representation of a loaded NetCDF file.
//!
//! This module defines the metadata and data containers filled by the
//! loader, plus the hyperslab extraction that turns an n-dimensional
//! variable into the 2D [`ScalarField`] the chart code consumes.

use ndarray::{Array, Axis, IxDyn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{Result, SynopticError};
use crate::field::ScalarField;

/// Metadata about a NetCDF dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimension {
    /// Name of the dimension
    pub name: String,
    /// Size of the dimension
    pub size: usize,
    /// Whether this dimension is unlimited
    pub is_unlimited: bool,
}

/// Metadata about a NetCDF variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Name of the variable
    pub name: String,
    /// Dimensions of the variable
    pub dimensions: Vec<String>,
    /// Shape of the variable (dimension sizes)
    pub shape: Vec<usize>,
    /// Variable attributes
    pub attributes: HashMap<String, AttributeValue>,
    /// Data type as string
    pub dtype: String,
}

impl Variable {
    /// A string attribute, if present.
    pub fn text_attribute(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name) {
            Some(AttributeValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// A numeric attribute, if present.
    pub fn number_attribute(&self, name: &str) -> Option<f64> {
        match self.attributes.get(name) {
            Some(AttributeValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Possible attribute values in NetCDF
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// String attribute
    Text(String),
    /// Numeric attribute (stored as f64 for simplicity)
    Number(f64),
    /// Array of numbers
    NumberArray(Vec<f64>),
}

/// Complete metadata for a NetCDF file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// File-level attributes
    pub global_attributes: HashMap<String, AttributeValue>,
    /// Dimensions in the file
    pub dimensions: HashMap<String, Dimension>,
    /// Variables in the file
    pub variables: HashMap<String, Variable>,
    /// Coordinate variables (subset of variables that match dimension names)
    pub coordinates: HashMap<String, Vec<f64>>,
}

/// A loaded NetCDF file held fully in memory
#[derive(Debug, Clone)]
pub struct Dataset {
    /// File metadata
    pub metadata: Metadata,
    /// Loaded data arrays
    pub data: HashMap<String, Array<f32, IxDyn>>,
}

/// Dimension names recognized as latitude
const LAT_NAMES: &[&str] = &["lat", "latitude"];
/// Dimension names recognized as longitude
const LON_NAMES: &[&str] = &["lon", "longitude"];
/// Dimension names recognized as time
const TIME_NAMES: &[&str] = &["time"];

impl Dataset {
    /// Check if a variable exists
    pub fn has_variable(&self, name: &str) -> bool {
        self.metadata.variables.contains_key(name)
    }

    /// Get variable metadata with error handling
    pub fn variable_metadata(&self, name: &str) -> Result<&Variable> {
        self.metadata
            .variables
            .get(name)
            .ok_or_else(|| SynopticError::DataNotFound {
                message: format!("Variable not found: {}", name),
            })
    }

    /// Get coordinate values for a dimension with error handling
    pub fn coordinate(&self, name: &str) -> Result<&Vec<f64>> {
        self.metadata
            .coordinates
            .get(name)
            .ok_or_else(|| SynopticError::DataNotFound {
                message: format!("Coordinate not found: {}", name),
            })
    }

    /// Find the index of the coordinate value closest to `value`.
    pub fn find_coordinate_index(&self, dim_name: &str, value: f64) -> Result<usize> {
        let coords = self.coordinate(dim_name)?;
        if coords.is_empty() {
            return Err(SynopticError::DataNotFound {
                message: format!("Coordinate {} is empty", dim_name),
            });
        }

        let mut closest_idx = 0;
        let mut min_diff = f64::MAX;
        for (i, &coord) in coords.iter().enumerate() {
            let diff = (coord - value).abs();
            if diff < min_diff {
                min_diff = diff;
                closest_idx = i;
            }
        }
        Ok(closest_idx)
    }

    /// The units attribute of the time coordinate variable, if any.
    pub fn time_units(&self) -> Option<&str> {
        let time_dim = self
            .metadata
            .dimensions
            .keys()
            .find(|d| TIME_NAMES.contains(&d.as_str()))?;
        self.metadata
            .variables
            .get(time_dim)
            .and_then(|v| v.text_attribute("units"))
    }

    /// The physical time value at a time index, if a time coordinate exists.
    pub fn time_value(&self, time_index: usize) -> Option<f64> {
        let time_dim = self
            .metadata
            .dimensions
            .keys()
            .find(|d| TIME_NAMES.contains(&d.as_str()))?;
        self.metadata
            .coordinates
            .get(time_dim)
            .and_then(|c| c.get(time_index))
            .copied()
    }

    /// Extract a 2D lat/lon field from a variable.
    ///
    /// Non-spatial dimensions are collapsed: the time dimension at
    /// `time_index`, a vertical dimension at the entry closest to `level`,
    /// and any other extra dimension at its first entry. Packed data is
    /// unpacked through the `scale_factor` and `add_offset` attributes.
    pub fn field_2d(
        &self,
        var_name: &str,
        time_index: usize,
        level: Option<f64>,
    ) -> Result<ScalarField> {
        let var = self.variable_metadata(var_name)?.clone();
        let array = self
            .data
            .get(var_name)
            .ok_or_else(|| SynopticError::DataNotFound {
                message: format!("Data array for variable {} not found", var_name),
            })?;

        let lat_dim = find_dim(&var.dimensions, LAT_NAMES).ok_or_else(|| {
            SynopticError::InvalidGrid {
                message: format!("Variable {} has no latitude dimension", var_name),
            }
        })?;
        let lon_dim = find_dim(&var.dimensions, LON_NAMES).ok_or_else(|| {
            SynopticError::InvalidGrid {
                message: format!("Variable {} has no longitude dimension", var_name),
            }
        })?;

        // Collapse every non-spatial axis, highest axis first so earlier
        // indices stay valid.
        let mut collapsed = array.view();
        for axis in (0..var.dimensions.len()).rev() {
            if axis == lat_dim || axis == lon_dim {
                continue;
            }
            let dim_name = &var.dimensions[axis];
            let index = if TIME_NAMES.contains(&dim_name.as_str()) {
                if time_index >= var.shape[axis] {
                    return Err(SynopticError::InvalidParameter {
                        param: "time_index".to_string(),
                        message: format!(
                            "Time index {} out of range for {} (size {})",
                            time_index, var_name, var.shape[axis]
                        ),
                    });
                }
                time_index
            } else if let Some(level_value) = level {
                self.find_coordinate_index(dim_name, level_value)?
            } else {
                0
            };
            debug!(
                var = %var_name,
                dim = %dim_name,
                index = index,
                "Collapsing non-spatial dimension"
            );
            collapsed = collapsed.index_axis_move(Axis(axis), index);
        }

        // The two remaining axes are lat and lon; transpose if the variable
        // stores longitude first.
        let mut plane = collapsed
            .into_dimensionality::<ndarray::Ix2>()
            .map_err(|_| SynopticError::InvalidGrid {
                message: format!("Variable {} did not reduce to a 2D plane", var_name),
            })?
            .to_owned();
        if lon_dim < lat_dim {
            plane = plane.reversed_axes().to_owned();
        }

        // Unpack short-packed data
        let scale = var.number_attribute("scale_factor").unwrap_or(1.0) as f32;
        let offset = var.number_attribute("add_offset").unwrap_or(0.0) as f32;
        if scale != 1.0 || offset != 0.0 {
            plane.mapv_inplace(|v| v * scale + offset);
        }

        let lat = self.coordinate(&var.dimensions[lat_dim])?.clone();
        let lon = self.coordinate(&var.dimensions[lon_dim])?.clone();

        let name = var
            .text_attribute("long_name")
            .unwrap_or(&var.name)
            .to_string();
        let units = var.text_attribute("units").unwrap_or("").to_string();

        Ok(ScalarField::new(plane, lat, lon)?.with_metadata(&name, &units))
    }

    /// Validate that the dataset is consistent and ready for use
    pub fn validate(&self) -> Result<()> {
        if self.metadata.variables.is_empty() {
            return Err(SynopticError::DataNotFound {
                message: "No variables found in the NetCDF file".to_string(),
            });
        }

        for (var_name, var) in &self.metadata.variables {
            for dim_name in &var.dimensions {
                if !self.metadata.dimensions.contains_key(dim_name) {
                    return Err(SynopticError::DataNotFound {
                        message: format!(
                            "Variable {} references non-existent dimension {}",
                            var_name, dim_name
                        ),
                    });
                }
            }

            if let Some(data) = self.data.get(var_name) {
                if data.shape() != var.shape.as_slice() {
                    return Err(SynopticError::DataNotFound {
                        message: format!(
                            "Variable {} has inconsistent shape: metadata {:?}, data {:?}",
                            var_name,
                            var.shape,
                            data.shape()
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Locate a dimension by any of its conventional names.
fn find_dim(dims: &[String], names: &[&str]) -> Option<usize> {
    dims.iter().position(|d| names.contains(&d.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    /// Build a small dataset with a (time, lat, lon) variable by hand.
    fn test_dataset() -> Dataset {
        let mut dimensions = HashMap::new();
        for (name, size) in [("time", 2), ("lat", 3), ("lon", 4)] {
            dimensions.insert(
                name.to_string(),
                Dimension {
                    name: name.to_string(),
                    size,
                    is_unlimited: name == "time",
                },
            );
        }

        let mut attributes = HashMap::new();
        attributes.insert(
            "units".to_string(),
            AttributeValue::Text("Pascals".to_string()),
        );
        attributes.insert(
            "long_name".to_string(),
            AttributeValue::Text("Sea Level Pressure".to_string()),
        );
        attributes.insert("scale_factor".to_string(), AttributeValue::Number(2.0));
        attributes.insert("add_offset".to_string(), AttributeValue::Number(10.0));

        let mut variables = HashMap::new();
        variables.insert(
            "slp".to_string(),
            Variable {
                name: "slp".to_string(),
                dimensions: vec!["time".to_string(), "lat".to_string(), "lon".to_string()],
                shape: vec![2, 3, 4],
                attributes,
                dtype: "Short".to_string(),
            },
        );

        let mut time_attrs = HashMap::new();
        time_attrs.insert(
            "units".to_string(),
            AttributeValue::Text("hours since 1963-01-01 00:00:00".to_string()),
        );
        variables.insert(
            "time".to_string(),
            Variable {
                name: "time".to_string(),
                dimensions: vec!["time".to_string()],
                shape: vec![2],
                attributes: time_attrs,
                dtype: "Double".to_string(),
            },
        );

        let mut coordinates = HashMap::new();
        coordinates.insert("time".to_string(), vec![0.0, 24.0]);
        coordinates.insert("lat".to_string(), vec![90.0, 87.5, 85.0]);
        coordinates.insert("lon".to_string(), vec![0.0, 2.5, 5.0, 7.5]);

        let mut data = HashMap::new();
        let values: Vec<f32> = (0..24).map(|i| i as f32).collect();
        data.insert(
            "slp".to_string(),
            Array::from_shape_vec(IxDyn(&[2, 3, 4]), values).unwrap(),
        );
        data.insert(
            "time".to_string(),
            Array::from_shape_vec(IxDyn(&[2]), vec![0.0, 24.0]).unwrap(),
        );

        Dataset {
            metadata: Metadata {
                global_attributes: HashMap::new(),
                dimensions,
                variables,
                coordinates,
            },
            data,
        }
    }

    #[test]
    fn test_field_extraction_with_unpacking() {
        let ds = test_dataset();
        let field = ds.field_2d("slp", 1, None).unwrap();
        assert_eq!(field.height(), 3);
        assert_eq!(field.width(), 4);
        // Raw value at time=1 is 12; unpacked through scale 2 offset 10
        assert_eq!(field.get(0, 0), 12.0 * 2.0 + 10.0);
        assert_eq!(field.name, "Sea Level Pressure");
        assert_eq!(field.units, "Pascals");
        assert_eq!(field.lat(0), 90.0);
        assert_eq!(field.lon(3), 7.5);
    }

    #[test]
    fn test_time_index_out_of_range() {
        let ds = test_dataset();
        assert!(ds.field_2d("slp", 5, None).is_err());
    }

    #[test]
    fn test_missing_variable() {
        let ds = test_dataset();
        assert!(ds.field_2d("nope", 0, None).is_err());
    }

    #[test]
    fn test_find_coordinate_index_nearest() {
        let ds = test_dataset();
        assert_eq!(ds.find_coordinate_index("lon", 2.4).unwrap(), 1);
        assert_eq!(ds.find_coordinate_index("lat", 86.0).unwrap(), 2);
        assert!(ds.find_coordinate_index("lev", 500.0).is_err());
    }

    #[test]
    fn test_time_metadata() {
        let ds = test_dataset();
        assert_eq!(ds.time_units(), Some("hours since 1963-01-01 00:00:00"));
        assert_eq!(ds.time_value(1), Some(24.0));
        assert_eq!(ds.time_value(7), None);
    }

    #[test]
    fn test_validation_catches_shape_mismatch() {
        let mut ds = test_dataset();
        assert!(ds.validate().is_ok());
        ds.data.insert(
            "slp".to_string(),
            Array::from_shape_vec(IxDyn(&[2, 3, 3]), vec![0.0; 18]).unwrap(),
        );
        assert!(ds.validate().is_err());
    }

    #[test]
    fn test_attribute_value_serialization() {
        let text = AttributeValue::Text("test".to_string());
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#""test""#);

        let number = AttributeValue::Number(42.0);
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "42.0");
    }
}
