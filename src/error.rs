//! Error types for the synoptic application.
//!
//! This module defines a comprehensive error enum that covers all possible
//! error conditions in the application.

use thiserror::Error;

/// The main error type for synoptic operations.
#[derive(Error, Debug)]
pub enum SynopticError {
    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Array shape errors from ndarray
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Grid consistency errors (mismatched dimensions, empty coordinates)
    #[error("Invalid grid: {message}")]
    InvalidGrid { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Chart rendering errors
    #[error("Render error: {message}")]
    Render { message: String },

    /// Font loading errors
    #[error("Font error: {message}")]
    Font { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with SynopticError
pub type Result<T> = std::result::Result<T, SynopticError>;
