use anyhow::Context;
use std::path::PathBuf;

/// Developer tool: dump the structure of a NetCDF file so chart arguments
/// (variable names, time indices, levels) can be picked by eye.
fn main() -> anyhow::Result<()> {
    let file_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: inspect_netcdf <file.nc>")?;

    println!("Inspecting NetCDF file: {}", file_path.display());

    let file = netcdf::open(&file_path)
        .with_context(|| format!("Failed to open {}", file_path.display()))?;

    println!("\nDimensions:");
    for dim in file.dimensions() {
        println!(
            "  {} = {} {}",
            dim.name(),
            dim.len(),
            if dim.is_unlimited() { "(unlimited)" } else { "" }
        );
    }

    println!("\nVariables:");
    for var in file.variables() {
        print!("  {} ({:?})", var.name(), var.vartype());

        print!(" [");
        for (i, dim) in var.dimensions().iter().enumerate() {
            if i > 0 {
                print!(", ");
            }
            print!("{} = {}", dim.name(), dim.len());
        }
        println!("]");

        for attr in var.attributes() {
            print!("    {}: ", attr.name());
            match attr.value() {
                Ok(val) => println!("{:?}", val),
                Err(e) => println!("Error reading value: {}", e),
            }
        }
    }

    println!("\nGlobal Attributes:");
    for attr in file.attributes() {
        print!("  {}: ", attr.name());
        match attr.value() {
            Ok(val) => println!("{:?}", val),
            Err(e) => println!("Error reading value: {}", e),
        }
    }

    // Coordinate variables are small, print them in full
    println!("\nCoordinate Values:");
    for var in file.variables() {
        let name = var.name();
        if !matches!(
            name.as_str(),
            "lat" | "latitude" | "lon" | "longitude" | "lev" | "level" | "time"
        ) {
            continue;
        }
        println!("  {}:", name);
        match var.vartype() {
            netcdf::types::VariableType::Basic(netcdf::types::BasicType::Float) => {
                match var.get_values::<f32, _>(&[] as &[netcdf::Extent]) {
                    Ok(vals) => println!("    {:?}", vals),
                    Err(e) => println!("    Error reading values: {}", e),
                }
            }
            netcdf::types::VariableType::Basic(netcdf::types::BasicType::Double) => {
                match var.get_values::<f64, _>(&[] as &[netcdf::Extent]) {
                    Ok(vals) => println!("    {:?}", vals),
                    Err(e) => println!("    Error reading values: {}", e),
                }
            }
            _ => println!("    Skipping unsupported type"),
        }
    }

    Ok(())
}
