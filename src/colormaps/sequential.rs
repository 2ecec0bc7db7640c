//! Sequential colormaps (perceptually uniform progressions).
//!
//! These are backed by the `colorgrad` presets and suit data that runs from
//! low to high.

use colorgrad::Gradient;
use once_cell::sync::Lazy;

use super::colormap::Colormap;

static VIRIDIS: Lazy<Gradient> = Lazy::new(colorgrad::viridis);
static PLASMA: Lazy<Gradient> = Lazy::new(colorgrad::plasma);
static INFERNO: Lazy<Gradient> = Lazy::new(colorgrad::inferno);
static MAGMA: Lazy<Gradient> = Lazy::new(colorgrad::magma);
static CIVIDIS: Lazy<Gradient> = Lazy::new(colorgrad::cividis);

/// Viridis colormap - perceptually uniform, colorblind-friendly
pub struct Viridis;

impl Colormap for Viridis {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        VIRIDIS.at(value.clamp(0.0, 1.0) as f64).to_rgba8()
    }

    fn name(&self) -> &str {
        "viridis"
    }
}

/// Plasma colormap
pub struct Plasma;

impl Colormap for Plasma {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        PLASMA.at(value.clamp(0.0, 1.0) as f64).to_rgba8()
    }

    fn name(&self) -> &str {
        "plasma"
    }
}

/// Inferno colormap
pub struct Inferno;

impl Colormap for Inferno {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        INFERNO.at(value.clamp(0.0, 1.0) as f64).to_rgba8()
    }

    fn name(&self) -> &str {
        "inferno"
    }
}

/// Magma colormap
pub struct Magma;

impl Colormap for Magma {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        MAGMA.at(value.clamp(0.0, 1.0) as f64).to_rgba8()
    }

    fn name(&self) -> &str {
        "magma"
    }
}

/// Cividis colormap - colorblind-friendly alternative to viridis
pub struct Cividis;

impl Colormap for Cividis {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        CIVIDIS.at(value.clamp(0.0, 1.0) as f64).to_rgba8()
    }

    fn name(&self) -> &str {
        "cividis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colormap_names() {
        assert_eq!(Viridis.name(), "viridis");
        assert_eq!(Plasma.name(), "plasma");
        assert_eq!(Inferno.name(), "inferno");
        assert_eq!(Magma.name(), "magma");
        assert_eq!(Cividis.name(), "cividis");
    }

    #[test]
    fn test_endpoints_are_opaque() {
        for cm in [
            Box::new(Viridis) as Box<dyn Colormap>,
            Box::new(Plasma),
            Box::new(Inferno),
            Box::new(Magma),
            Box::new(Cividis),
        ] {
            assert_eq!(cm.map_normalized(0.0)[3], 255);
            assert_eq!(cm.map_normalized(1.0)[3], 255);
        }
    }

    #[test]
    fn test_values_are_clamped() {
        assert_eq!(Viridis.map_normalized(-1.0), Viridis.map_normalized(0.0));
        assert_eq!(Viridis.map_normalized(2.0), Viridis.map_normalized(1.0));
    }
}
