//! Test data generation utilities.
//!
//! This module provides functions that write small NetCDF files with known
//! data patterns for testing the chart pipeline end-to-end.

use std::path::Path;

use netcdf::Error;
type Result<T> = std::result::Result<T, Error>;

/// Grid row and column of the pressure trough written by
/// [`create_slp_nc`], in (lat, lon) index order.
pub const SLP_LOW_ROW: usize = 10;
pub const SLP_LOW_COL: usize = 36;

/// Creates a NetCDF file with a sea-level pressure field in Pascals.
///
/// The field is a constant 1020 hPa with one shallow circular trough
/// centered at grid point (`SLP_LOW_ROW`, `SLP_LOW_COL`). The trough is
/// a downward paraboloid of 0.01 hPa per cell squared, gentle enough that
/// the finite-difference minimum detector sees near-zero derivatives at
/// its base.
pub fn create_slp_nc(path: &Path) -> Result<()> {
    let mut file = netcdf::create(path)?;

    let n_lat = 37; // 90 to -90 by 5
    let n_lon = 72; // 0 to 355 by 5
    let n_time = 2;

    file.add_dimension("lat", n_lat)?;
    file.add_dimension("lon", n_lon)?;
    file.add_unlimited_dimension("time")?;
    file.add_attribute("title", "Synthetic SLP Test Data")?;
    file.add_attribute("institution", "synoptic test suite")?;

    let lat_values: Vec<f64> = (0..n_lat).map(|i| 90.0 - 5.0 * i as f64).collect();
    let lon_values: Vec<f64> = (0..n_lon).map(|i| 5.0 * i as f64).collect();
    let time_values: Vec<f64> = vec![0.0, 24.0];

    let base_hpa = 1020.0f32;
    let radius_sq = 100.0f32;
    let bowl = 0.01f32;
    let mut data = Vec::with_capacity(n_time * n_lat * n_lon);
    for _t in 0..n_time {
        for r in 0..n_lat {
            for c in 0..n_lon {
                let dr = r as f32 - SLP_LOW_ROW as f32;
                let dc = c as f32 - SLP_LOW_COL as f32;
                let dist_sq = dr * dr + dc * dc;
                let hpa = if dist_sq <= radius_sq {
                    base_hpa - bowl * (radius_sq - dist_sq)
                } else {
                    base_hpa
                };
                // Stored in Pascals like the reference file
                data.push(hpa * 100.0);
            }
        }
    }

    {
        let mut lat_var = file.add_variable::<f64>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put_values(&lat_values, &[..])?;
    }
    {
        let mut lon_var = file.add_variable::<f64>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put_values(&lon_values, &[..])?;
    }
    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "hours since 1963-01-01 00:00:00")?;
        time_var.put_values(&time_values, &[..])?;
    }
    {
        let mut slp_var = file.add_variable::<f32>("slp", &["time", "lat", "lon"])?;
        slp_var.put_attribute("units", "Pascals")?;
        slp_var.put_attribute("long_name", "Sea Level Pressure")?;
        slp_var.put_values(&data, &[.., .., ..])?;
    }

    Ok(())
}

/// Creates a NetCDF file with U, V, and T variables on (time, lev, lat, lon).
///
/// The 500 hPa temperature slab runs from 272 K in the south to 228 K in
/// the north; the 850 hPa slab is a constant 280 K so level selection is
/// observable. Winds are uniform 10 m/s eastward and 5 m/s northward.
pub fn create_uvt_nc(path: &Path) -> Result<()> {
    let mut file = netcdf::create(path)?;

    let n_lat = 21; // 10 to 60 by 2.5
    let n_lon = 23; // 95 to 150 by 2.5
    let n_lev = 2;

    file.add_dimension("lat", n_lat)?;
    file.add_dimension("lon", n_lon)?;
    file.add_dimension("lev", n_lev)?;
    file.add_unlimited_dimension("time")?;
    file.add_attribute("title", "Synthetic UVT Test Data")?;

    let lat_values: Vec<f64> = (0..n_lat).map(|i| 10.0 + 2.5 * i as f64).collect();
    let lon_values: Vec<f64> = (0..n_lon).map(|i| 95.0 + 2.5 * i as f64).collect();
    let lev_values: Vec<f64> = vec![850.0, 500.0];
    let time_values: Vec<f64> = vec![0.0];

    let plane = n_lat * n_lon;
    let mut t_data = Vec::with_capacity(n_lev * plane);
    // 850 hPa slab
    t_data.resize(plane, 280.0f32);
    // 500 hPa slab, cooling northward
    for r in 0..n_lat {
        let temp = 272.0 - 44.0 * r as f32 / (n_lat - 1) as f32;
        for _c in 0..n_lon {
            t_data.push(temp);
        }
    }
    let u_data = vec![10.0f32; n_lev * plane];
    let v_data = vec![5.0f32; n_lev * plane];

    {
        let mut lat_var = file.add_variable::<f64>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put_values(&lat_values, &[..])?;
    }
    {
        let mut lon_var = file.add_variable::<f64>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put_values(&lon_values, &[..])?;
    }
    {
        let mut lev_var = file.add_variable::<f64>("lev", &["lev"])?;
        lev_var.put_attribute("units", "hPa")?;
        lev_var.put_values(&lev_values, &[..])?;
    }
    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "hours since 2000-01-01 00:00:00")?;
        time_var.put_values(&time_values, &[..])?;
    }

    for (name, long_name, units, values) in [
        ("T", "Temperature", "K", &t_data),
        ("U", "Zonal wind", "m/s", &u_data),
        ("V", "Meridional wind", "m/s", &v_data),
    ] {
        let mut var = file.add_variable::<f32>(name, &["time", "lev", "lat", "lon"])?;
        var.put_attribute("units", units)?;
        var.put_attribute("long_name", long_name)?;
        var.put_values(values, &[.., .., .., ..])?;
    }

    Ok(())
}
