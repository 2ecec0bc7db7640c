//! Integration tests for the synoptic chart pipeline.
//!
//! These tests write small synthetic NetCDF files, run them through the
//! loader, the low-center detector, and the chart renderers, and verify
//! the results end-to-end.

#![cfg(feature = "netcdf")]

mod common;

use common::{image_utils, test_data};
use pretty_assertions::assert_eq;

use synoptic::data_loader::load_netcdf;
use synoptic::extrema::{find_local_minima, MinimaSearch};
use synoptic::field::VectorField;
use synoptic::projection::Projection;
use synoptic::render::{render_slp_chart, render_wind_overlay};
use synoptic::{ScalarField, SynopticError};

/// Run the SLP preprocessing steps the CLI applies before detection.
fn prepared_slp_field(path: &std::path::Path) -> ScalarField {
    let dataset = load_netcdf(path).unwrap();
    let field = dataset.field_2d("slp", 0, None).unwrap();
    let field = field.convert_units(0.01, 0.0, "hPa");
    field.add_cyclic_longitude().unwrap()
}

/// Chart rendering needs a font on the host; skip the test when the
/// default font path does not resolve.
fn is_missing_font(result: &synoptic::Result<image::RgbaImage>) -> bool {
    matches!(result, Err(SynopticError::Font { .. }))
}

#[test]
fn test_slp_pipeline_locates_synthetic_low() {
    let dir = tempfile::tempdir().unwrap();
    let nc_path = dir.path().join("slp_test.nc");
    test_data::create_slp_nc(&nc_path).unwrap();

    let field = prepared_slp_field(&nc_path);
    assert_eq!(field.height(), 37);
    assert_eq!(field.width(), 73); // cyclic column appended

    let minima = find_local_minima(&field, &MinimaSearch::default());
    assert!(!minima.is_empty(), "The trough should be detected");

    // The flat parabolic trough produces a short run of detections along
    // its central row; all of them sit at its base.
    for minimum in &minima {
        assert_eq!(minimum.row, test_data::SLP_LOW_ROW);
        assert!(
            minimum.col.abs_diff(test_data::SLP_LOW_COL) <= 5,
            "Detection at column {} is outside the trough",
            minimum.col
        );
    }
    assert!(minima
        .iter()
        .any(|m| m.row == test_data::SLP_LOW_ROW && m.col == test_data::SLP_LOW_COL));

    // The trough floor is 1 hPa below the 1020 hPa background
    let center = field.get(test_data::SLP_LOW_ROW, test_data::SLP_LOW_COL);
    assert!((center - 1019.0).abs() < 1e-3);
}

#[test]
fn test_strict_search_keeps_only_the_trough_center() {
    let dir = tempfile::tempdir().unwrap();
    let nc_path = dir.path().join("slp_strict.nc");
    test_data::create_slp_nc(&nc_path).unwrap();

    let field = prepared_slp_field(&nc_path);
    let search = MinimaSearch {
        strict: true,
        ..MinimaSearch::default()
    };
    let minima = find_local_minima(&field, &search);

    assert_eq!(minima.len(), 1);
    assert_eq!(minima[0].row, test_data::SLP_LOW_ROW);
    assert_eq!(minima[0].col, test_data::SLP_LOW_COL);
}

#[test]
fn test_triangular_scan_misses_lows_east_of_the_diagonal() {
    let dir = tempfile::tempdir().unwrap();
    let nc_path = dir.path().join("slp_triangular.nc");
    test_data::create_slp_nc(&nc_path).unwrap();

    let field = prepared_slp_field(&nc_path);
    // The trough sits at column 36 of row 10, which the truncated
    // column scan never visits.
    let search = MinimaSearch {
        triangular_scan: true,
        ..MinimaSearch::default()
    };
    assert!(find_local_minima(&field, &search).is_empty());
}

#[test]
fn test_level_selection_picks_the_requested_slab() {
    let dir = tempfile::tempdir().unwrap();
    let nc_path = dir.path().join("uvt_test.nc");
    test_data::create_uvt_nc(&nc_path).unwrap();

    let dataset = load_netcdf(&nc_path).unwrap();

    let t500 = dataset.field_2d("T", 0, Some(500.0)).unwrap();
    // Southernmost row of the 500 hPa slab is 272 K
    assert!((t500.get(0, 0) - 272.0).abs() < 1e-3);
    assert!((t500.get(20, 0) - 228.0).abs() < 1e-3);

    let t850 = dataset.field_2d("T", 0, Some(850.0)).unwrap();
    assert!((t850.get(0, 0) - 280.0).abs() < 1e-3);
    assert!((t850.get(20, 5) - 280.0).abs() < 1e-3);
}

#[test]
fn test_slp_chart_renders_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let nc_path = dir.path().join("slp_chart.nc");
    test_data::create_slp_nc(&nc_path).unwrap();

    let field = prepared_slp_field(&nc_path);
    let minima = find_local_minima(&field, &MinimaSearch::default());
    let projection = Projection::Orthographic {
        center_lon: 270.0,
        center_lat: 45.0,
    };

    let config = synoptic::config::RenderConfig {
        width: 400,
        height: 400,
        ..Default::default()
    };
    let result = render_slp_chart(&field, &minima, &projection, Some("SLP test"), &config);
    if is_missing_font(&result) {
        eprintln!("Skipping chart test: no font at the default path");
        return;
    }
    let image = result.unwrap();
    assert_eq!(image.width(), 400);
    assert_eq!(image.height(), 400);

    let png_path = dir.path().join("slp_chart.png");
    image.save(&png_path).unwrap();
    let bytes = std::fs::read(&png_path).unwrap();
    assert_eq!(
        image_utils::detect_image_format(&bytes),
        Some(image::ImageFormat::Png)
    );

    let reloaded = image_utils::load_image(&png_path).unwrap();
    // The graticule and globe disc alone cover a large share of the frame
    assert!(image_utils::non_white_fraction(&reloaded) > 0.2);
}

#[test]
fn test_overlay_chart_renders_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let nc_path = dir.path().join("uvt_chart.nc");
    test_data::create_uvt_nc(&nc_path).unwrap();

    let dataset = load_netcdf(&nc_path).unwrap();
    let temp = dataset.field_2d("T", 0, Some(500.0)).unwrap();
    let u = dataset.field_2d("U", 0, Some(500.0)).unwrap();
    let v = dataset.field_2d("V", 0, Some(500.0)).unwrap();
    let wind = VectorField::new(u, v).unwrap();

    let projection: Projection = "platecarree:100,145,15,55".parse().unwrap();
    let config = synoptic::config::RenderConfig {
        width: 480,
        height: 420,
        ..Default::default()
    };
    let result = render_wind_overlay(&temp, &wind, &projection, Some("500hPa"), &config);
    if is_missing_font(&result) {
        eprintln!("Skipping chart test: no font at the default path");
        return;
    }
    let image = result.unwrap();
    assert_eq!(image.width(), 480);
    assert_eq!(image.height(), 420);

    let png_path = dir.path().join("uvt_chart.png");
    image.save(&png_path).unwrap();
    let reloaded = image_utils::load_image(&png_path).unwrap();
    // Filled temperature bands cover the whole plot area
    assert!(image_utils::non_white_fraction(&reloaded) > 0.3);
}

#[test]
fn test_missing_file_is_an_error() {
    let result = load_netcdf(std::path::Path::new("/nonexistent/file.nc"));
    assert!(result.is_err());
}
