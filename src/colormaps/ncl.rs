//! NCL-style rainbow colormap.
//!
//! A custom gradient approximating the classic NCL
//! black-blue-aqua-green-yellow-orange-red-violet-white ramp used by the
//! reference overlay chart. The overlay itself consumes a truncated middle
//! slice of this ramp.

use colorgrad::{Color, CustomGradient, Gradient};
use once_cell::sync::Lazy;

use super::colormap::Colormap;

static NCL_RAINBOW: Lazy<Gradient> = Lazy::new(|| {
    CustomGradient::new()
        .colors(&[
            Color::from_rgba8(0, 0, 0, 255),
            Color::from_rgba8(30, 60, 255, 255),
            Color::from_rgba8(0, 210, 210, 255),
            Color::from_rgba8(20, 170, 50, 255),
            Color::from_rgba8(245, 235, 30, 255),
            Color::from_rgba8(250, 140, 20, 255),
            Color::from_rgba8(230, 25, 25, 255),
            Color::from_rgba8(160, 40, 210, 255),
            Color::from_rgba8(255, 255, 255, 255),
        ])
        .build()
        .expect("NCL rainbow gradient is statically valid")
});

/// Black-to-white rainbow ramp in the NCL house style
pub struct NclRainbow;

impl Colormap for NclRainbow {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        NCL_RAINBOW.at(value.clamp(0.0, 1.0) as f64).to_rgba8()
    }

    fn name(&self) -> &str {
        "ncl_rainbow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(NclRainbow.map_normalized(0.0), [0, 0, 0, 255]);
        assert_eq!(NclRainbow.map_normalized(1.0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_middle_is_colorful() {
        // Somewhere in the middle the ramp must leave the gray axis
        let [r, g, b, _] = NclRainbow.map_normalized(0.35);
        assert!(r != g || g != b);
    }
}
