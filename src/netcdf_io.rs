//! Writing derived WRF fields to NetCDF
//!
//! Derived quantities such as absolute temperature are written to a fresh
//! NetCDF file along with their units and a history stamp, so they can be
//! opened by the same tools that read the WRF output. Several fields can
//! share one output file as long as their dimensions agree.

use crate::errors::{Result, WrfError};
use chrono::Utc;
use ndarray::ArrayD;
use netcdf::create;
use std::collections::HashMap;
use std::{fs, path::Path};
use tracing::debug;

/// One variable to be written by [`FieldWriter`]
#[derive(Debug, Clone)]
pub struct OutputField {
    pub name: String,
    pub data: ArrayD<f64>,
    /// Name of each axis of `data`, in order
    pub dims: Vec<String>,
    pub units: String,
    pub long_name: String,
    /// Written as `_FillValue`; NaN cells are stored as this value
    pub fill_value: Option<f64>,
}

impl OutputField {
    pub fn new(name: impl Into<String>, data: ArrayD<f64>, dims: Vec<String>) -> Self {
        let name = name.into();
        Self {
            long_name: name.clone(),
            name,
            data,
            dims,
            units: String::new(),
            fill_value: None,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self
    }

    pub fn with_fill_value(mut self, fill_value: Option<f64>) -> Self {
        self.fill_value = fill_value;
        self
    }
}

/// Writer for derived fields
pub struct FieldWriter<'a> {
    output_path: &'a Path,
    source: Option<&'a Path>,
}

impl<'a> FieldWriter<'a> {
    pub fn new(output_path: &'a Path) -> Self {
        Self {
            output_path,
            source: None,
        }
    }

    /// Record the WRF file the field was derived from in the history attribute
    pub fn with_source(mut self, source: &'a Path) -> Self {
        self.source = Some(source);
        self
    }

    /// Write `data` as variable `var_name`, replacing any existing file.
    ///
    /// `dim_names` must name each axis of `data` in order.
    pub fn write_field(
        &self,
        data: &ArrayD<f64>,
        dim_names: &[String],
        var_name: &str,
        units: &str,
        long_name: &str,
    ) -> Result<()> {
        let field = OutputField::new(var_name, data.clone(), dim_names.to_vec())
            .with_units(units)
            .with_long_name(long_name);
        self.write_fields(&[field])
    }

    /// Write every field into one file, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`WrfError::ShapeMismatch`] when a field's dimension names do
    /// not match its rank, or when two fields give one dimension different
    /// lengths. Nothing is written in that case.
    pub fn write_fields(&self, fields: &[OutputField]) -> Result<()> {
        let dimensions = collect_dimensions(fields)?;

        if self.output_path.exists() {
            fs::remove_file(self.output_path)?;
        }

        let mut file = create(self.output_path)?;

        for (dim_name, dim_len) in &dimensions {
            file.add_dimension(dim_name, *dim_len)?;
        }

        for field in fields {
            let dim_refs: Vec<&str> = field.dims.iter().map(|s| s.as_str()).collect();
            let mut var = file.add_variable::<f64>(&field.name, &dim_refs)?;

            // _FillValue has to be in place before any data is written
            let data = match field.fill_value {
                Some(fill) => {
                    var.put_attribute("_FillValue", fill)?;
                    field.data.mapv(|x| if x.is_nan() { fill } else { x })
                }
                None => field.data.as_standard_layout().into_owned(),
            };
            if !field.units.is_empty() {
                var.put_attribute("units", field.units.as_str())?;
            }
            var.put_attribute("long_name", field.long_name.as_str())?;
            var.put(data.view(), ..)?;

            debug!(path = %self.output_path.display(), var_name = %field.name, "wrote derived field");
        }

        let history = match self.source {
            Some(src) => format!(
                "Derived from {} by wrf_utils on {}",
                src.display(),
                Utc::now().to_rfc3339()
            ),
            None => format!("Created by wrf_utils on {}", Utc::now().to_rfc3339()),
        };
        file.add_attribute("history", history)?;

        Ok(())
    }
}

/// Dimension names and lengths shared by all fields, in first-seen order.
fn collect_dimensions(fields: &[OutputField]) -> Result<Vec<(String, usize)>> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut ordered = Vec::new();

    for field in fields {
        if field.dims.len() != field.data.ndim() {
            return Err(WrfError::ShapeMismatch {
                name: field.name.clone(),
                expected: field.data.shape().to_vec(),
                found: vec![field.dims.len()],
            });
        }
        for (dim, &len) in field.dims.iter().zip(field.data.shape()) {
            match seen.get(dim.as_str()) {
                Some(&existing) if existing != len => {
                    return Err(WrfError::ShapeMismatch {
                        name: format!("{}:{}", field.name, dim),
                        expected: vec![existing],
                        found: vec![len],
                    });
                }
                Some(_) => {}
                None => {
                    seen.insert(dim.as_str(), len);
                    ordered.push((dim.clone(), len));
                }
            }
        }
    }

    Ok(ordered)
}
