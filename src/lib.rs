//! wrf_utils: reading WRF model output and converting temperatures
//!
//! Small helpers for pulling fields out of WRF (Weather Research and
//! Forecasting model) NetCDF output and turning WRF's perturbation potential
//! temperature into absolute temperature in Kelvin, Celsius or Fahrenheit.
//!
//! ## Module Organization
//!
//! - [`wrf_io`]: field and global attribute reads, singleton squeezing
//! - [`thermo`]: potential temperature and temperature scale conversions
//! - [`metadata`]: file listing and field summaries
//! - [`netcdf_io`]: writing derived fields back to NetCDF
//! - [`parallel`]: thread pool configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wrf_utils::prelude::*;
//!
//! let path = Path::new("wrfout_d01_2024-06-01_00:00:00");
//! let theta = get_wrf_field(path, FileFormat::Netcdf4, "T").unwrap();
//! let p = get_wrf_field(path, FileFormat::Netcdf4, "P").unwrap();
//! let pb = get_wrf_field(path, FileFormat::Netcdf4, "PB").unwrap();
//!
//! let kelvin = convert_theta_to_temperature(&theta, &p, &pb).unwrap();
//! let fahrenheit = convert_kelvin_to_fahrenheit(&kelvin);
//! ```

pub mod errors;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod thermo;
pub mod wrf_io;

pub use errors::*;
pub use metadata::*;
pub use netcdf_io::*;
pub use parallel::*;
pub use thermo::*;
pub use wrf_io::*;

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::errors::{Result, WrfError};
    pub use crate::thermo::{
        convert_kelvin_to_celsius, convert_kelvin_to_fahrenheit, convert_theta_to_temperature,
        TemperatureUnit,
    };
    pub use crate::wrf_io::{get_file_attribute, get_wrf_field, FileFormat};
}
