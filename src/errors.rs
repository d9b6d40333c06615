//! Centralized error handling for wrf_utils
//!
//! Every fallible operation in the crate returns [`Result`], so callers can
//! match on a missing variable separately from a file that failed to open.

use thiserror::Error;

/// Main error type for wrf_utils operations
#[derive(Error, Debug)]
pub enum WrfError {
    /// NetCDF file operation errors
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Array shape or dimension error
    #[error("Array error: {0}")]
    Array(#[from] ndarray::ShapeError),

    /// Variable not found in NetCDF file
    #[error("Variable '{var}' not found in file")]
    VariableNotFound { var: String },

    /// Global attribute not found in NetCDF file
    #[error("Attribute '{attr}' not found in file")]
    AttributeNotFound { attr: String },

    /// Elementwise inputs disagree on shape
    #[error("Shape mismatch for '{name}': expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Unrecognised netCDF format name
    #[error("Invalid file format '{0}': expected CLASSIC, NETCDF3_64BIT, NETCDF4 or NETCDF4_CLASSIC")]
    InvalidFormat(String),

    /// Unrecognised temperature unit name
    #[error("Invalid temperature unit '{0}': expected kelvin, celsius or fahrenheit")]
    InvalidUnit(String),

    /// Thread pool configuration error
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type alias for wrf_utils operations
pub type Result<T> = std::result::Result<T, WrfError>;

impl WrfError {
    /// True when the error is a missing variable or attribute lookup
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WrfError::VariableNotFound { .. } | WrfError::AttributeNotFound { .. }
        )
    }
}
