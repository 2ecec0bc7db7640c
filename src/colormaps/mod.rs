//! Colormap implementations for chart rendering.
//!
//! This module provides matplotlib-inspired colormaps plus the NCL-style
//! rainbow used by the wind overlay chart.

pub mod colormap;
pub mod ncl;
pub mod sequential;

pub use colormap::{get_colormap, truncate, Colormap};
pub use ncl::NclRainbow;
pub use sequential::{Cividis, Inferno, Magma, Plasma, Viridis};
