//! Configuration management for synoptic.
//!
//! This module handles the layered configuration system with the following
//! precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::colormaps;
use crate::error::{Result, SynopticError};

/// Command-line interface for synoptic
#[derive(Parser, Debug)]
#[command(name = "synoptic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to JSON configuration file
    #[arg(short, long, env = "SYNOPTIC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SYNOPTIC_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Path to a TrueType font for chart text
    #[arg(long, env = "SYNOPTIC_FONT", global = true)]
    pub font: Option<PathBuf>,
}

/// The charts synoptic can render
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render line contours of sea-level pressure on an orthographic globe,
    /// with detected low-pressure centers labeled
    Slp(SlpArgs),
    /// Render filled temperature contours with wind vectors over a regional
    /// extent
    Overlay(OverlayArgs),
}

/// Arguments for the SLP chart
#[derive(Args, Debug)]
pub struct SlpArgs {
    /// Path to the NetCDF file to chart
    pub netcdf_file: PathBuf,

    /// Name of the pressure variable
    #[arg(long, default_value = "slp")]
    pub var: String,

    /// Time index to chart (0-based)
    #[arg(short, long, default_value_t = 24)]
    pub time_index: usize,

    /// Projection, e.g. "ortho:270,45"
    #[arg(long, default_value = "ortho:270,45")]
    pub projection: String,

    /// Output image path
    #[arg(short, long, default_value = "slp.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Zero tolerance for the low-center derivative screen
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Neighbor offset for the low-center minimum confirmation
    #[arg(long)]
    pub step: Option<usize>,

    /// Require lows to be minima along both grid axes
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the wind overlay chart
#[derive(Args, Debug)]
pub struct OverlayArgs {
    /// Path to the NetCDF file to chart
    pub netcdf_file: PathBuf,

    /// Name of the temperature variable
    #[arg(long, default_value = "T")]
    pub t_var: String,

    /// Name of the eastward wind variable
    #[arg(long, default_value = "U")]
    pub u_var: String,

    /// Name of the northward wind variable
    #[arg(long, default_value = "V")]
    pub v_var: String,

    /// Time index to chart (0-based)
    #[arg(short, long, default_value_t = 0)]
    pub time_index: usize,

    /// Pressure level to select, in the file's vertical coordinate units
    #[arg(long, default_value_t = 500.0)]
    pub level: f64,

    /// Projection, e.g. "platecarree:100,145,15,55"
    #[arg(long, default_value = "platecarree:100,145,15,55")]
    pub projection: String,

    /// Output image path
    #[arg(short, long, default_value = "overlay.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Colormap for the filled contours
    #[arg(long)]
    pub colormap: Option<String>,

    /// Draw a wind vector every N grid cells
    #[arg(long)]
    pub vector_stride: Option<usize>,
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Colormap for filled contours
    #[serde(default = "default_colormap")]
    pub colormap: String,

    /// TrueType font for chart text
    #[serde(default = "default_font_path")]
    pub font_path: PathBuf,

    /// Chaikin smoothing passes applied to contour lines
    #[serde(default = "default_smoothing")]
    pub smoothing: u32,

    /// Draw a wind vector every N grid cells
    #[serde(default = "default_vector_stride")]
    pub vector_stride: usize,
}

/// Low-center detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimaConfig {
    /// Zero tolerance for the derivative screen
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Neighbor offset for the minimum confirmation
    #[serde(default = "default_step")]
    pub step: usize,

    /// Require minima along both grid axes
    #[serde(default)]
    pub strict: bool,

    /// Reproduce the reference chart's triangular column scan
    #[serde(default)]
    pub triangular_scan: bool,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chart rendering configuration
    #[serde(default)]
    pub render: RenderConfig,

    /// Low-center detection configuration
    #[serde(default)]
    pub minima: MinimaConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load(cli: &Cli) -> Result<Self> {
        // Start with defaults, then the JSON file, then CLI overrides
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            let json_config = Self::load_from_file(config_path)?;
            config = json_config;
        }

        if let Some(level) = &cli.log_level {
            config.log_level = level.clone();
        }
        if let Some(font) = &cli.font {
            config.render.font_path = font.clone();
        }

        match &cli.command {
            Command::Slp(args) => config.apply_slp_args(args),
            Command::Overlay(args) => config.apply_overlay_args(args),
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn apply_slp_args(&mut self, args: &SlpArgs) {
        if let Some(width) = args.width {
            self.render.width = width;
        }
        if let Some(height) = args.height {
            self.render.height = height;
        }
        if let Some(epsilon) = args.epsilon {
            self.minima.epsilon = epsilon;
        }
        if let Some(step) = args.step {
            self.minima.step = step;
        }
        if args.strict {
            self.minima.strict = true;
        }
    }

    fn apply_overlay_args(&mut self, args: &OverlayArgs) {
        if let Some(width) = args.width {
            self.render.width = width;
        }
        if let Some(height) = args.height {
            self.render.height = height;
        }
        if let Some(colormap) = &args.colormap {
            self.render.colormap = colormap.clone();
        }
        if let Some(stride) = args.vector_stride {
            self.render.vector_stride = stride;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.render.width == 0 || self.render.height == 0 {
            return Err(SynopticError::Config {
                message: "Image dimensions must be non-zero".to_string(),
            });
        }

        if !self.minima.epsilon.is_finite() || self.minima.epsilon < 0.0 {
            return Err(SynopticError::Config {
                message: format!(
                    "Minima epsilon must be a non-negative number, got {}",
                    self.minima.epsilon
                ),
            });
        }

        if self.minima.step == 0 {
            return Err(SynopticError::Config {
                message: "Minima step must be at least 1".to_string(),
            });
        }

        if self.render.vector_stride == 0 {
            return Err(SynopticError::Config {
                message: "Vector stride must be at least 1".to_string(),
            });
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(SynopticError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        // The colormap name must resolve
        colormaps::get_colormap(&self.render.colormap)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            minima: MinimaConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            colormap: default_colormap(),
            font_path: default_font_path(),
            smoothing: default_smoothing(),
            vector_stride: default_vector_stride(),
        }
    }
}

impl Default for MinimaConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            step: default_step(),
            strict: false,
            triangular_scan: false,
        }
    }
}

// Default value functions for serde
fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    800
}

fn default_colormap() -> String {
    "ncl_rainbow".to_string()
}

fn default_font_path() -> PathBuf {
    PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf")
}

fn default_smoothing() -> u32 {
    1
}

fn default_vector_stride() -> usize {
    2
}

fn default_epsilon() -> f64 {
    0.02
}

fn default_step() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}
