//! NetCDF data loading functionality.
//!
//! This module handles reading NetCDF files and loading them into memory.
//! It converts NetCDF variables and metadata into the in-memory [`Dataset`]
//! the chart code works against.

use ndarray::{Array, Dim, IxDyn};
use netcdf::{self, Attribute, Variable as NetCDFVariable};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::dataset::{AttributeValue, Dataset, Dimension, Metadata, Variable};
use crate::error::{Result, SynopticError};

/// Load a NetCDF file into memory as a validated dataset
pub fn load_netcdf(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(SynopticError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let file = netcdf::open(path)?;

    info!("Opened NetCDF file: {}", path.display());
    debug!("File has {} variables", file.variables().count());
    debug!("File has {} dimensions", file.dimensions().count());

    let metadata = extract_metadata(&file)?;
    let data = extract_data(&file, &metadata)?;

    let dataset = Dataset { metadata, data };
    dataset.validate()?;
    Ok(dataset)
}

/// Extract metadata from the NetCDF file
fn extract_metadata(file: &netcdf::File) -> Result<Metadata> {
    // Extract global attributes
    let mut global_attributes = HashMap::new();
    for attr in file.attributes() {
        let value = convert_attribute(&attr)?;
        global_attributes.insert(attr.name().to_string(), value);
    }

    // Extract dimensions
    let mut dimensions = HashMap::new();
    for dim in file.dimensions() {
        let dimension = Dimension {
            name: dim.name().to_string(),
            size: dim.len(),
            is_unlimited: dim.is_unlimited(),
        };
        dimensions.insert(dim.name().to_string(), dimension);
    }

    // Extract variables and their metadata
    let mut variables = HashMap::new();
    let mut coordinates = HashMap::new();

    for var in file.variables() {
        // Skip variables we can't handle (non-numeric types)
        if !is_supported_variable(&var) {
            warn!("Skipping unsupported variable: {}", var.name());
            continue;
        }

        let var_dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|dim| dim.name().to_string())
            .collect();

        let var_shape: Vec<usize> = var
            .dimensions()
            .iter()
            .map(|dim| dim.len())
            .collect();

        let mut var_attrs = HashMap::new();
        for attr in var.attributes() {
            let value = convert_attribute(&attr)?;
            var_attrs.insert(attr.name().to_string(), value);
        }

        let variable = Variable {
            name: var.name().to_string(),
            dimensions: var_dims,
            shape: var_shape,
            attributes: var_attrs,
            dtype: format!("{:?}", var.vartype()),
        };

        variables.insert(var.name().to_string(), variable);

        // If this is a coordinate variable (name matches a dimension),
        // extract the coordinate values
        if file.dimension(&var.name()).is_some() {
            let coord_values = extract_coordinate_values(&var)?;
            coordinates.insert(var.name().to_string(), coord_values);
        }
    }

    // Check for missing coordinate variables and create index coordinates
    // where the file has none
    for (dim_name, dim) in &dimensions {
        if !coordinates.contains_key(dim_name) {
            let coord_values: Vec<f64> = (0..dim.size).map(|i| i as f64).collect();
            coordinates.insert(dim_name.to_string(), coord_values);
            warn!("Created default coordinates for dimension: {}", dim_name);
        }
    }

    Ok(Metadata {
        global_attributes,
        dimensions,
        variables,
        coordinates,
    })
}

/// Check if a variable has a supported type that we can work with
fn is_supported_variable(var: &NetCDFVariable) -> bool {
    use netcdf::types::{BasicType, VariableType};

    matches!(
        var.vartype(),
        VariableType::Basic(BasicType::Byte)
            | VariableType::Basic(BasicType::Char)
            | VariableType::Basic(BasicType::Short)
            | VariableType::Basic(BasicType::Int)
            | VariableType::Basic(BasicType::Float)
            | VariableType::Basic(BasicType::Double)
    )
}

/// Convert a NetCDF attribute to our AttributeValue enum
fn convert_attribute(attr: &Attribute) -> Result<AttributeValue> {
    use netcdf::AttributeValue as NcAttributeValue;

    let value = attr.value()?;

    match value {
        NcAttributeValue::Str(s) => Ok(AttributeValue::Text(s)),

        // Numeric types - store as f64 for simplicity
        NcAttributeValue::Uchar(v) => Ok(AttributeValue::Number(v as f64)),
        NcAttributeValue::Schar(v) => Ok(AttributeValue::Number(v as f64)),
        NcAttributeValue::Short(v) => Ok(AttributeValue::Number(v as f64)),
        NcAttributeValue::Int(v) => Ok(AttributeValue::Number(v as f64)),
        NcAttributeValue::Float(v) => Ok(AttributeValue::Number(v as f64)),
        NcAttributeValue::Double(v) => Ok(AttributeValue::Number(v)),

        _ => {
            // Convert any other types to a text representation for now
            Ok(AttributeValue::Text(format!("{:?}", value)))
        }
    }
}

/// Extract coordinate values from a coordinate variable
fn extract_coordinate_values(var: &NetCDFVariable) -> Result<Vec<f64>> {
    use netcdf::types::{BasicType, VariableType};

    match var.vartype() {
        VariableType::Basic(BasicType::Byte) => {
            let values: Vec<i8> = var.get_values::<i8, _>(&[] as &[netcdf::Extent])?;
            Ok(values.into_iter().map(|v| v as f64).collect())
        }
        VariableType::Basic(BasicType::Short) => {
            let values: Vec<i16> = var.get_values::<i16, _>(&[] as &[netcdf::Extent])?;
            Ok(values.into_iter().map(|v| v as f64).collect())
        }
        VariableType::Basic(BasicType::Int) => {
            let values: Vec<i32> = var.get_values::<i32, _>(&[] as &[netcdf::Extent])?;
            Ok(values.into_iter().map(|v| v as f64).collect())
        }
        VariableType::Basic(BasicType::Float) => {
            let values: Vec<f32> = var.get_values::<f32, _>(&[] as &[netcdf::Extent])?;
            Ok(values.into_iter().map(|v| v as f64).collect())
        }
        VariableType::Basic(BasicType::Double) => {
            let values: Vec<f64> = var.get_values::<f64, _>(&[] as &[netcdf::Extent])?;
            Ok(values)
        }
        _ => {
            // For unsupported types, create a sequence of indices
            let indices: Vec<f64> = (0..var.dimensions()[0].len()).map(|i| i as f64).collect();
            warn!(
                "Unsupported coordinate variable type: {:?}, using indices instead",
                var.vartype()
            );
            Ok(indices)
        }
    }
}

/// Extract data from the NetCDF variables
fn extract_data(
    file: &netcdf::File,
    metadata: &Metadata,
) -> Result<HashMap<String, Array<f32, IxDyn>>> {
    let mut data = HashMap::new();

    for var_name in metadata.variables.keys() {
        if let Some(var) = file.variable(var_name) {
            if !is_supported_variable(&var) {
                continue;
            }

            let shape = &metadata.variables[var_name].shape;
            let array = convert_variable_to_array(&var, shape)?;
            data.insert(var_name.clone(), array);
        }
    }

    Ok(data)
}

/// Convert a NetCDF variable to an ndarray Array<f32, IxDyn>
fn convert_variable_to_array(var: &NetCDFVariable, shape: &[usize]) -> Result<Array<f32, IxDyn>> {
    use netcdf::types::{BasicType, VariableType};

    let dim = Dim(shape.to_vec());

    match var.vartype() {
        VariableType::Basic(BasicType::Byte) => {
            let data: Vec<i8> = var.get_values::<i8, _>(&[] as &[netcdf::Extent])?;
            let array = Array::from_shape_vec(dim, data.into_iter().map(|v| v as f32).collect())?;
            Ok(array)
        }
        VariableType::Basic(BasicType::Short) => {
            let data: Vec<i16> = var.get_values::<i16, _>(&[] as &[netcdf::Extent])?;
            let array = Array::from_shape_vec(dim, data.into_iter().map(|v| v as f32).collect())?;
            Ok(array)
        }
        VariableType::Basic(BasicType::Int) => {
            let data: Vec<i32> = var.get_values::<i32, _>(&[] as &[netcdf::Extent])?;
            let array = Array::from_shape_vec(dim, data.into_iter().map(|v| v as f32).collect())?;
            Ok(array)
        }
        VariableType::Basic(BasicType::Float) => {
            let data: Vec<f32> = var.get_values::<f32, _>(&[] as &[netcdf::Extent])?;
            let array = Array::from_shape_vec(dim, data)?;
            Ok(array)
        }
        VariableType::Basic(BasicType::Double) => {
            let data: Vec<f64> = var.get_values::<f64, _>(&[] as &[netcdf::Extent])?;
            let array = Array::from_shape_vec(dim, data.into_iter().map(|v| v as f32).collect())?;
            Ok(array)
        }
        _ => Err(SynopticError::DataNotFound {
            message: format!("Unsupported variable type: {:?}", var.vartype()),
        }),
    }
}
