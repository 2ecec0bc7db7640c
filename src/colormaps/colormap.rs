//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps.

use crate::error::{Result, SynopticError};

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f32, min: f32, max: f32) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Get a colormap by name
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    use super::{ncl::*, sequential::*};

    match name.to_lowercase().as_str() {
        "viridis" => Ok(Box::new(Viridis)),
        "plasma" => Ok(Box::new(Plasma)),
        "inferno" => Ok(Box::new(Inferno)),
        "magma" => Ok(Box::new(Magma)),
        "cividis" => Ok(Box::new(Cividis)),
        "ncl_rainbow" | "rainbow" => Ok(Box::new(NclRainbow)),
        _ => Err(SynopticError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!("Unknown colormap: {}", name),
        }),
    }
}

/// A sub-range view of another colormap.
///
/// The reference overlay chart builds its palette from the middle of an NCL
/// rainbow (normalized 0.1 to 0.6) rather than the full ramp; this adapter
/// reproduces that subselection for any colormap.
pub struct Truncated {
    inner: Box<dyn Colormap>,
    lo: f32,
    hi: f32,
    name: String,
}

impl Colormap for Truncated {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        let v = self.lo + value.clamp(0.0, 1.0) * (self.hi - self.lo);
        self.inner.map_normalized(v)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Restrict a colormap to the normalized sub-range `lo..hi`.
pub fn truncate(inner: Box<dyn Colormap>, lo: f32, hi: f32) -> Result<Box<dyn Colormap>> {
    if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo >= hi {
        return Err(SynopticError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!("Invalid truncation range: {}..{}", lo, hi),
        });
    }
    let name = format!("{}[{:.2}..{:.2}]", inner.name(), lo, hi);
    Ok(Box::new(Truncated {
        inner,
        lo,
        hi,
        name,
    }))
}
