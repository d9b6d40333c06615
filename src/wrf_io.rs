//! Reading fields and attributes from WRF output files
//!
//! WRF writes one netCDF file per output time with variables shaped
//! `(Time, bottom_top, south_north, west_east)`. Since `Time` is almost always
//! length one, reads here drop singleton dimensions so callers get the
//! spatial grid directly.

use crate::errors::{Result, WrfError};
use crate::thermo::convert_theta_to_temperature;
use ndarray::{ArrayD, Axis, IxDyn};
use netcdf::{AttributeValue, File, Variable};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// WRF field holding perturbation potential temperature (K)
pub const THETA_FIELD: &str = "T";
/// WRF field holding perturbation pressure (Pa)
pub const PRESSURE_FIELD: &str = "P";
/// WRF field holding base-state pressure (Pa)
pub const BASE_PRESSURE_FIELD: &str = "PB";

/// NetCDF flavour a caller expects the file to be written in.
///
/// The netCDF library detects the on-disk format when opening for reading,
/// so this only documents intent and shows up in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    /// netCDF 3 classic
    Classic,
    /// netCDF 3 with 64-bit offsets
    Offset64,
    /// netCDF 4 (HDF5 backed)
    #[default]
    Netcdf4,
    /// netCDF 4 restricted to the classic data model
    Netcdf4Classic,
}

impl FileFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "CLASSIC",
            Self::Offset64 => "NETCDF3_64BIT",
            Self::Netcdf4 => "NETCDF4",
            Self::Netcdf4Classic => "NETCDF4_CLASSIC",
        }
    }
}

impl FromStr for FileFormat {
    type Err = WrfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CLASSIC" | "NETCDF3_CLASSIC" => Ok(Self::Classic),
            "NETCDF3_64BIT" | "NETCDF3_64BIT_OFFSET" | "64BIT_OFFSET" => Ok(Self::Offset64),
            "NETCDF4" => Ok(Self::Netcdf4),
            "NETCDF4_CLASSIC" => Ok(Self::Netcdf4Classic),
            _ => Err(WrfError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opens a WRF output file read-only.
pub fn open_dataset(file_name: &Path, format: FileFormat) -> Result<File> {
    debug!(path = %file_name.display(), %format, "opening WRF file");
    Ok(netcdf::open(file_name)?)
}

/// Reads a field from a WRF output file with singleton dimensions removed.
///
/// The file is closed before returning in every case. A missing field comes
/// back as [`WrfError::VariableNotFound`] rather than a library error.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the field does not exist,
/// or its values cannot be read as `f64`.
pub fn get_wrf_field(file_name: &Path, format: FileFormat, field: &str) -> Result<ArrayD<f64>> {
    let file = open_dataset(file_name, format)?;
    read_field(&file, field)
}

/// Reads a global attribute from a WRF output file.
///
/// # Errors
///
/// Returns [`WrfError::AttributeNotFound`] when no global attribute has that name.
pub fn get_file_attribute(
    file_name: &Path,
    format: FileFormat,
    attribute: &str,
) -> Result<AttributeValue> {
    let file = open_dataset(file_name, format)?;
    read_global_attribute(&file, attribute)
}

/// Reads a global attribute from an open file.
pub fn read_global_attribute(file: &File, attribute: &str) -> Result<AttributeValue> {
    let attr = file.attribute(attribute).ok_or_else(|| {
        warn!(attribute, "global attribute not found");
        WrfError::AttributeNotFound {
            attr: attribute.to_string(),
        }
    })?;
    Ok(attr.value()?)
}

/// Reads absolute temperature (K) from the `T`, `P` and `PB` fields of one file.
pub fn get_wrf_temperature(file_name: &Path, format: FileFormat) -> Result<ArrayD<f64>> {
    let file = open_dataset(file_name, format)?;
    read_temperature(&file)
}

/// Absolute temperature (K) from an already opened file.
pub fn read_temperature(file: &File) -> Result<ArrayD<f64>> {
    let theta = read_field(file, THETA_FIELD)?;
    let p = read_field(file, PRESSURE_FIELD)?;
    let pb = read_field(file, BASE_PRESSURE_FIELD)?;
    convert_theta_to_temperature(&theta, &p, &pb)
}

/// Reads a field from an open file, squeezing singleton dimensions.
///
/// Cells equal to `_FillValue` or `missing_value` become NaN, and packed
/// values are expanded with `scale_factor` and `add_offset`.
pub fn read_field(file: &File, field: &str) -> Result<ArrayD<f64>> {
    let var = lookup_variable(file, field)?;
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    // Every integer and float storage type converts to f64 on read
    let values = var.get_values::<f64, _>(..)?;
    let packing = Packing::from_variable(&var)?;

    debug!(field, ?shape, ?packing, "read field");

    let mut data = ArrayD::from_shape_vec(IxDyn(&shape), values)?;
    if !packing.is_identity() {
        data.mapv_inplace(|raw| packing.unpack(raw));
    }
    Ok(squeeze(data))
}

/// Masking and packing attributes of a variable, following the CF conventions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Packing {
    /// Raw values that mark a missing cell (`_FillValue` then `missing_value`)
    pub fill_values: Vec<f64>,
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
}

impl Packing {
    pub fn from_variable(var: &Variable<'_>) -> Result<Self> {
        let mut fill_values = Vec::new();
        for key in ["_FillValue", "missing_value"] {
            if let Some(value) = var.attribute_value(key).transpose()? {
                fill_values.extend(attribute_numbers(&value));
            }
        }
        let scalar = |key: &str| -> Result<Option<f64>> {
            Ok(var
                .attribute_value(key)
                .transpose()?
                .and_then(|v| attribute_numbers(&v).first().copied()))
        };

        Ok(Self {
            fill_values,
            scale_factor: scalar("scale_factor")?,
            add_offset: scalar("add_offset")?,
        })
    }

    /// True when reads need no masking or unpacking
    pub fn is_identity(&self) -> bool {
        self.fill_values.is_empty() && self.scale_factor.is_none() && self.add_offset.is_none()
    }

    /// The `_FillValue` (or `missing_value`) in raw storage units
    pub fn fill_value(&self) -> Option<f64> {
        self.fill_values.first().copied()
    }

    /// Turns one stored value into a physical value, NaN for fill cells.
    pub fn unpack(&self, raw: f64) -> f64 {
        if self.fill_values.iter().any(|&fill| raw == fill) {
            return f64::NAN;
        }
        raw * self.scale_factor.unwrap_or(1.0) + self.add_offset.unwrap_or(0.0)
    }
}

/// Masking and packing attributes of a named field.
pub fn field_packing(file: &File, field: &str) -> Result<Packing> {
    let var = lookup_variable(file, field)?;
    Packing::from_variable(&var)
}

/// The `units` attribute of a field, `None` when the field has none.
///
/// # Errors
///
/// A missing field or an unreadable attribute is an error.
pub fn field_units(file: &File, field: &str) -> Result<Option<String>> {
    let var = lookup_variable(file, field)?;
    Ok(match var.attribute_value("units").transpose()? {
        Some(AttributeValue::Str(s)) => Some(s),
        Some(other) => Some(format!("{:?}", other)),
        None => None,
    })
}

/// Names of a variable's dimensions that survive [`squeeze`].
pub fn squeezed_dimension_names(file: &File, field: &str) -> Result<Vec<String>> {
    let var = lookup_variable(file, field)?;
    Ok(var
        .dimensions()
        .iter()
        .filter(|d| d.len() != 1)
        .map(|d| d.name().to_string())
        .collect())
}

/// Reads an attribute (such as `units`) attached to a field.
pub fn field_attribute(file: &File, field: &str, attribute: &str) -> Result<AttributeValue> {
    let var = lookup_variable(file, field)?;
    let attr = var
        .attribute(attribute)
        .ok_or_else(|| WrfError::AttributeNotFound {
            attr: format!("{field}:{attribute}"),
        })?;
    Ok(attr.value()?)
}

/// Removes every axis of length one, keeping the order of the others.
///
/// An array whose axes are all singleton becomes zero-dimensional.
pub fn squeeze<T>(mut array: ArrayD<T>) -> ArrayD<T> {
    for axis in (0..array.ndim()).rev() {
        if array.len_of(Axis(axis)) == 1 {
            array = array.index_axis_move(Axis(axis), 0);
        }
    }
    array
}

fn lookup_variable<'f>(file: &'f File, field: &str) -> Result<Variable<'f>> {
    file.variable(field).ok_or_else(|| {
        warn!(field, "variable not found");
        WrfError::VariableNotFound {
            var: field.to_string(),
        }
    })
}

fn attribute_numbers(value: &AttributeValue) -> Vec<f64> {
    match value {
        AttributeValue::Uchar(v) => vec![f64::from(*v)],
        AttributeValue::Uchars(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Schar(v) => vec![f64::from(*v)],
        AttributeValue::Schars(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Ushort(v) => vec![f64::from(*v)],
        AttributeValue::Ushorts(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Short(v) => vec![f64::from(*v)],
        AttributeValue::Shorts(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Uint(v) => vec![f64::from(*v)],
        AttributeValue::Uints(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Int(v) => vec![f64::from(*v)],
        AttributeValue::Ints(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Ulonglong(v) => vec![*v as f64],
        AttributeValue::Ulonglongs(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Longlong(v) => vec![*v as f64],
        AttributeValue::Longlongs(v) => v.iter().map(|&x| x as f64).collect(),
        AttributeValue::Float(v) => vec![f64::from(*v)],
        AttributeValue::Floats(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Double(v) => vec![*v],
        AttributeValue::Doubles(v) => v.clone(),
        _ => Vec::new(),
    }
}
