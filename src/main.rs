//! synoptic - weather chart rendering from NetCDF files
//!
//! This is the main entry point for the synoptic application.

use clap::Parser;
use std::time::Instant;
use tracing::{error, info};

use synoptic::config::{Cli, Command, OverlayArgs, SlpArgs};
use synoptic::data_loader::load_netcdf;
use synoptic::extrema::{find_local_minima, MinimaSearch};
use synoptic::field::{time_label, ScalarField, VectorField};
use synoptic::projection::Projection;
use synoptic::render::{render_slp_chart, render_wind_overlay};
use synoptic::{Config, Dataset, Result, SynopticError};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli).map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    synoptic::init_tracing(&config.log_level);

    info!("Starting synoptic v{}", env!("CARGO_PKG_VERSION"));

    let start = Instant::now();
    let result = match &cli.command {
        Command::Slp(args) => run_slp(args, &config),
        Command::Overlay(args) => run_overlay(args, &config),
    };

    match &result {
        Ok(()) => {
            synoptic::log_operation_end("render_chart", start, true);
        }
        Err(e) => {
            synoptic::log_operation_end("render_chart", start, false);
            error!("Chart rendering failed: {}", e);
        }
    }
    result
}

fn load_dataset(path: &std::path::Path) -> Result<Dataset> {
    info!("Loading NetCDF file: {:?}", path);
    let dataset = load_netcdf(path)?;

    let var_names: Vec<&str> = dataset
        .metadata
        .variables
        .keys()
        .map(String::as_str)
        .collect();
    let dim_details = dataset
        .metadata
        .dimensions
        .iter()
        .map(|(name, dim)| format!("{}={}", name, dim.size))
        .collect::<Vec<_>>()
        .join(", ");
    synoptic::log_data_load_stats(
        &path.display().to_string(),
        var_names.len(),
        &var_names,
        dataset.metadata.dimensions.len(),
        &dim_details,
    );
    Ok(dataset)
}

/// Render the sea-level pressure chart with labeled low centers.
fn run_slp(args: &SlpArgs, config: &Config) -> Result<()> {
    let projection: Projection = args.projection.parse()?;
    let dataset = load_dataset(&args.netcdf_file)?;

    let field = dataset.field_2d(&args.var, args.time_index, None)?;
    let field = to_hectopascals(field);
    // A cyclic longitude column closes contour lines around the globe
    let field = field.add_cyclic_longitude()?;

    let search = MinimaSearch {
        epsilon: config.minima.epsilon,
        step: config.minima.step,
        strict: config.minima.strict,
        triangular_scan: config.minima.triangular_scan,
    };
    let minima = find_local_minima(&field, &search);
    info!(count = minima.len(), "Detected low-pressure centers");

    let title = chart_title(&dataset, args.time_index);
    let image = render_slp_chart(&field, &minima, &projection, title.as_deref(), &config.render)?;
    save_image(&image, &args.output)
}

/// Render the temperature and wind overlay chart.
fn run_overlay(args: &OverlayArgs, config: &Config) -> Result<()> {
    let projection: Projection = args.projection.parse()?;
    let dataset = load_dataset(&args.netcdf_file)?;

    let temp = dataset.field_2d(&args.t_var, args.time_index, Some(args.level))?;
    let u = dataset.field_2d(&args.u_var, args.time_index, Some(args.level))?;
    let v = dataset.field_2d(&args.v_var, args.time_index, Some(args.level))?;
    let wind = VectorField::new(u, v)?;

    let level_label = format!("{:.0}hPa", args.level);
    let image = render_wind_overlay(
        &temp,
        &wind,
        &projection,
        Some(&level_label),
        &config.render,
    )?;
    save_image(&image, &args.output)
}

/// Convert pressure to hPa when the file stores Pa or millibars.
fn to_hectopascals(field: ScalarField) -> ScalarField {
    match field.units.trim() {
        "Pa" | "Pascals" | "pascals" => field.convert_units(0.01, 0.0, "hPa"),
        "millibars" | "mb" => field.convert_units(1.0, 0.0, "hPa"),
        _ => field,
    }
}

/// Build a title like "SLP 1963, January 24" from the file's time axis.
fn chart_title(dataset: &Dataset, time_index: usize) -> Option<String> {
    let units = dataset.time_units()?;
    let value = dataset.time_value(time_index)?;
    let label = time_label(units, value)?;
    Some(format!("SLP {}", label))
}

fn save_image(image: &image::RgbaImage, path: &std::path::Path) -> Result<()> {
    image.save(path).map_err(|e| SynopticError::Render {
        message: format!("Failed to write {}: {}", path.display(), e),
    })?;
    info!("Wrote chart to {:?}", path);
    Ok(())
}
