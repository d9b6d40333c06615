//! Entry point for the wrfkit application.
//! Handles CLI parsing, file loading, and dispatches field reads, attribute
//! lookups and temperature derivation.

use clap::Parser;
use ndarray::ArrayD;
use netcdf::AttributeValue;
use tracing_subscriber::EnvFilter;
use wrf_utils::{
    field_packing, field_units, list_variables_and_dimensions, open_dataset, read_field,
    read_global_attribute, read_temperature, squeezed_dimension_names, summarize_field,
    FieldWriter, OutputField, ParallelConfig, THETA_FIELD,
};

mod cli;

use cli::Args;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    ParallelConfig::new(args.threads).setup_global_pool()?;

    let file = open_dataset(&args.file, args.format)?;
    println!("Successfully opened WRF file: {}", args.file.display());

    let mut did_something = false;
    // Everything requested with --output-netcdf goes into one file
    let mut outputs = Vec::new();

    if args.list_vars {
        list_variables_and_dimensions(&file)?;
        did_something = true;
    }

    if let Some(name) = &args.attribute {
        let value = read_global_attribute(&file, name)?;
        println!("\n {} = {}", name, format_attribute(&value));
        did_something = true;
    }

    if let Some(name) = &args.field {
        let data = read_field(&file, name)?;
        let units = field_units(&file, name)?.unwrap_or_default();
        summarize_field(&data).print(name, &units);

        if args.output_netcdf.is_some() {
            let dims = squeezed_dimension_names(&file, name)?;
            let fill = output_fill(&data, field_packing(&file, name)?.fill_value());
            outputs.push(
                OutputField::new(name.as_str(), data, dims)
                    .with_units(units)
                    .with_fill_value(fill),
            );
        }
        did_something = true;
    }

    if args.temperature {
        let kelvin = read_temperature(&file)?;
        let temperature = args.units.convert_array(&kelvin);
        summarize_field(&temperature).print("temperature", args.units.symbol());

        if args.output_netcdf.is_some() {
            let dims = squeezed_dimension_names(&file, THETA_FIELD)?;
            let fill = output_fill(&temperature, None);
            outputs.push(
                OutputField::new("TEMP", temperature, dims)
                    .with_units(args.units.symbol())
                    .with_long_name("air temperature")
                    .with_fill_value(fill),
            );
        }
        did_something = true;
    }

    if let Some(output_path) = &args.output_netcdf {
        if !outputs.is_empty() {
            FieldWriter::new(output_path)
                .with_source(&args.file)
                .write_fields(&outputs)?;
            let names: Vec<&str> = outputs.iter().map(|o| o.name.as_str()).collect();
            println!("✅ Saved {} to {}", names.join(", "), output_path.display());
        }
    }

    if !did_something {
        list_variables_and_dimensions(&file)?;
    }

    Ok(())
}

/// netCDF default fill for doubles
const DEFAULT_FILL: f64 = 9.969_209_968_386_869e36;

/// Keep the source field's fill value, or fall back to the default when
/// masked cells need one.
fn output_fill(data: &ArrayD<f64>, source_fill: Option<f64>) -> Option<f64> {
    source_fill.or_else(|| data.iter().any(|x| x.is_nan()).then_some(DEFAULT_FILL))
}

fn format_attribute(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Str(s) => s.clone(),
        AttributeValue::Float(v) => v.to_string(),
        AttributeValue::Double(v) => v.to_string(),
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Short(v) => v.to_string(),
        other => format!("{:?}", other),
    }
}
