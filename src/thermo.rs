//! Thermodynamic conversions for WRF output
//!
//! WRF stores temperature as a perturbation potential temperature `T` about a
//! 300 K base state, and pressure as a perturbation `P` on top of a base-state
//! pressure `PB`. This module turns those into absolute temperature and
//! converts between Kelvin, Celsius and Fahrenheit.
//!
//! Scalar functions take and return `f64`. The `convert_*` functions apply
//! the same formula elementwise to an array of any dimensionality using
//! rayon-backed [`Zip`], so the output always has the input's shape.

use crate::errors::{Result, WrfError};
use ndarray::{Array, ArrayBase, Data, Dimension, Zip};
use std::fmt;
use std::str::FromStr;

/// Reference pressure for potential temperature (Pa)
pub const P0: f64 = 105_000.0;

/// Poisson constant R/c_p for dry air
pub const KAPPA: f64 = 0.286;

/// Base-state potential temperature added to WRF's perturbation `T` (K)
pub const WRF_BASE_THETA: f64 = 300.0;

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Absolute temperature (K) from perturbation potential temperature and the
/// two pressure components (Pa).
pub fn theta_to_temperature(theta: f64, p: f64, pb: f64) -> f64 {
    (theta + WRF_BASE_THETA) * ((p + pb) / P0).powf(KAPPA)
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    1.8 * (kelvin - KELVIN_OFFSET) + 32.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

pub fn fahrenheit_to_kelvin(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) / 1.8 + KELVIN_OFFSET
}

/// Converts perturbation potential temperature to absolute temperature (K).
///
/// `theta` is WRF's `T` field, `p` the perturbation pressure `P` and `pb` the
/// base-state pressure `PB`. All three must share one shape.
///
/// # Errors
///
/// Returns [`WrfError::ShapeMismatch`] if `p` or `pb` differ in shape from `theta`.
pub fn convert_theta_to_temperature<S1, S2, S3, D>(
    theta: &ArrayBase<S1, D>,
    p: &ArrayBase<S2, D>,
    pb: &ArrayBase<S3, D>,
) -> Result<Array<f64, D>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    S3: Data<Elem = f64>,
    D: Dimension,
{
    check_shape("P", theta.shape(), p.shape())?;
    check_shape("PB", theta.shape(), pb.shape())?;

    Ok(Zip::from(theta)
        .and(p)
        .and(pb)
        .par_map_collect(|&t, &p, &pb| theta_to_temperature(t, p, pb)))
}

/// Elementwise Kelvin to Fahrenheit.
pub fn convert_kelvin_to_fahrenheit<S, D>(kelvin: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    Zip::from(kelvin).par_map_collect(|&k| kelvin_to_fahrenheit(k))
}

/// Elementwise Kelvin to Celsius.
pub fn convert_kelvin_to_celsius<S, D>(kelvin: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    Zip::from(kelvin).par_map_collect(|&k| kelvin_to_celsius(k))
}

pub fn convert_celsius_to_kelvin<S, D>(celsius: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    Zip::from(celsius).par_map_collect(|&c| celsius_to_kelvin(c))
}

pub fn convert_fahrenheit_to_kelvin<S, D>(fahrenheit: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    Zip::from(fahrenheit).par_map_collect(|&f| fahrenheit_to_kelvin(f))
}

fn check_shape(name: &str, expected: &[usize], found: &[usize]) -> Result<()> {
    if expected != found {
        return Err(WrfError::ShapeMismatch {
            name: name.to_string(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        });
    }
    Ok(())
}

/// Temperature scale selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Units string written to the `units` attribute of output variables
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Kelvin => "K",
            Self::Celsius => "degC",
            Self::Fahrenheit => "degF",
        }
    }

    /// Convert a single Kelvin value into this unit
    #[must_use]
    pub fn from_kelvin(self, kelvin: f64) -> f64 {
        match self {
            Self::Kelvin => kelvin,
            Self::Celsius => kelvin_to_celsius(kelvin),
            Self::Fahrenheit => kelvin_to_fahrenheit(kelvin),
        }
    }

    /// Convert a Kelvin array into this unit
    pub fn convert_array<S, D>(self, kelvin: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        match self {
            Self::Kelvin => kelvin.to_owned(),
            Self::Celsius => convert_kelvin_to_celsius(kelvin),
            Self::Fahrenheit => convert_kelvin_to_fahrenheit(kelvin),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = WrfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "k" | "kelvin" => Ok(Self::Kelvin),
            "c" | "celsius" | "degc" => Ok(Self::Celsius),
            "f" | "fahrenheit" | "degf" => Ok(Self::Fahrenheit),
            _ => Err(WrfError::InvalidUnit(s.to_string())),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
