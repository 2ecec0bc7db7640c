//! # synoptic
//!
//! Synoptic-scale weather chart rendering from NetCDF files.
//!
//! This library loads gridded atmospheric data into memory and renders it as
//! publication-style raster charts: line contours of sea-level pressure on an
//! orthographic globe with detected low-pressure centers labeled, and filled
//! temperature contours with wind vectors over a regional extent.
//!
//! ## Architecture
//!
//! - **Data Layer**: Loads NetCDF files into in-memory ndarray storage
//! - **Analysis**: Local-minimum detection, contour extraction, interpolation
//! - **Rendering**: Map projections, colormaps, and raster chart composition

pub mod colormaps;
pub mod config;
pub mod contour;
#[cfg(feature = "netcdf")]
pub mod data_loader;
pub mod dataset;
pub mod error;
pub mod extrema;
pub mod field;
pub mod interpolation;
pub mod logging;
pub mod projection;
pub mod render;

pub use config::{Cli, Command, Config};
pub use dataset::{AttributeValue, Dataset, Dimension, Metadata, Variable};
pub use error::{Result, SynopticError};
pub use extrema::{find_local_minima, GridMinimum, MinimaSearch};
pub use field::{ScalarField, VectorField};
pub use logging::{
    init_tracing, log_data_load_stats, log_error, log_operation_end, log_operation_start,
    log_timed_operation,
};
pub use projection::{Extent, Projection};
