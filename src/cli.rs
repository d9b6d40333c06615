//! Defines command-line interface options using `clap` for the wrfkit binary.

use clap::Parser;
use std::path::PathBuf;
use wrf_utils::{FileFormat, TemperatureUnit};

/// A CLI tool for reading fields out of WRF output files
#[derive(Parser, Debug)]
#[command(
    version,
    name = "wrfkit",
    about = "Read WRF output fields and convert temperatures"
)]
pub struct Args {
    /// Path to the WRF output (NetCDF) file
    #[arg(short, long)]
    pub file: PathBuf,

    /// NetCDF format the file was written in: CLASSIC, NETCDF3_64BIT, NETCDF4 or NETCDF4_CLASSIC
    #[arg(long, default_value = "NETCDF4", value_parser = parse_format_arg)]
    pub format: FileFormat,

    /// Read a field and print a summary of it
    #[arg(long)]
    pub field: Option<String>,

    /// Print a global attribute of the file
    #[arg(long)]
    pub attribute: Option<String>,

    /// Derive absolute temperature from the T, P and PB fields
    #[arg(long)]
    pub temperature: bool,

    /// Units for derived temperature: kelvin, celsius or fahrenheit
    #[arg(long, default_value = "kelvin", value_parser = parse_unit_arg)]
    pub units: TemperatureUnit,

    /// Path to save the field or derived temperature as NetCDF
    #[arg(long)]
    pub output_netcdf: Option<PathBuf>,

    /// List all variables, dimensions and global attributes
    #[arg(long)]
    pub list_vars: bool,

    /// Number of threads to use for array conversions. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

fn parse_format_arg(s: &str) -> Result<FileFormat, String> {
    s.parse().map_err(|e: wrf_utils::WrfError| e.to_string())
}

fn parse_unit_arg(s: &str) -> Result<TemperatureUnit, String> {
    s.parse().map_err(|e: wrf_utils::WrfError| e.to_string())
}
