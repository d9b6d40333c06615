//! WRF file inspection and field summaries
//!
//! Functions for listing what a WRF output file contains and for reducing a
//! field read through [`crate::wrf_io`] to a few headline numbers.

use crate::errors::Result;
use ndarray::parallel::prelude::*;
use ndarray::ArrayD;
use netcdf::{AttributeValue, File};

/// Quick statistics over the finite values of a field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    pub shape: Vec<usize>,
    pub total_elements: usize,
    pub valid_elements: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Running count, extremes and sum over finite values
#[derive(Debug, Clone, Copy)]
struct Moments {
    count: usize,
    min: f64,
    max: f64,
    sum: f64,
}

impl Moments {
    fn empty() -> Self {
        Self {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
        }
    }

    fn push(mut self, x: f64) -> Self {
        self.count += 1;
        self.min = self.min.min(x);
        self.max = self.max.max(x);
        self.sum += x;
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            sum: self.sum + other.sum,
        }
    }
}

/// Computes min/max/mean/std over the finite values of `data`.
///
/// NaN (masked) and infinite cells are skipped. With no finite values every
/// statistic is NaN.
pub fn summarize_field(data: &ArrayD<f64>) -> FieldSummary {
    let moments = data
        .par_iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(Moments::empty, Moments::push)
        .reduce(Moments::empty, Moments::merge);

    let (min, max, mean, std_dev) = if moments.count == 0 {
        (f64::NAN, f64::NAN, f64::NAN, f64::NAN)
    } else {
        let n = moments.count as f64;
        let mean = moments.sum / n;
        let variance = data
            .par_iter()
            .copied()
            .filter(|x| x.is_finite())
            .map(|x| (x - mean).powi(2))
            .sum::<f64>()
            / n;
        (moments.min, moments.max, mean, variance.sqrt())
    };

    FieldSummary {
        shape: data.shape().to_vec(),
        total_elements: data.len(),
        valid_elements: moments.count,
        min,
        max,
        mean,
        std_dev,
    }
}

impl FieldSummary {
    pub fn print(&self, name: &str, units: &str) {
        println!("\n Summary for Field: {}", name);
        println!("================================");
        println!(
            "   Shape: ({})",
            self.shape
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" × ")
        );
        println!(
            "   Valid elements: {} / {}",
            self.valid_elements, self.total_elements
        );
        println!("   Min: {:.2} {}", self.min, units);
        println!("   Max: {:.2} {}", self.max, units);
        println!("   Mean: {:.2} {}", self.mean, units);
        println!("   Std Dev: {:.2} {}", self.std_dev, units);
    }
}

/// Lists all dimensions, variables and global attributes of a WRF file.
pub fn list_variables_and_dimensions(file: &File) -> Result<()> {
    println!("\n Dimensions");
    println!("==============");

    let mut dimensions: Vec<_> = file.dimensions().collect();
    dimensions.sort_by(|a, b| a.name().cmp(&b.name()));

    if dimensions.is_empty() {
        println!("   (No dimensions found)");
    }
    for dim in dimensions {
        let length_info = if dim.is_unlimited() {
            format!("{} (unlimited)", dim.len())
        } else {
            dim.len().to_string()
        };
        println!("    {} = {}", dim.name(), length_info);
    }

    println!("\n Variables");
    println!("=============");

    let mut variables: Vec<_> = file.variables().collect();
    variables.sort_by(|a, b| a.name().cmp(&b.name()));

    if variables.is_empty() {
        println!("   (No variables found)");
    }
    for var in variables {
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| format!("{}[{}]", d.name(), d.len()))
            .collect();

        // WRF annotates fields with `units` and `description` rather than `long_name`
        let mut notes = Vec::new();
        for key in ["units", "description"] {
            if let Some(AttributeValue::Str(s)) = var.attribute(key).and_then(|a| a.value().ok())
            {
                if !s.is_empty() {
                    notes.push(format!("{key}: {s}"));
                }
            }
        }

        if dims.is_empty() {
            println!("    {}: scalar", var.name());
        } else {
            println!("    {} ({})", var.name(), dims.join(", "));
        }
        if !notes.is_empty() {
            println!("      └─ {}", notes.join(", "));
        }
    }

    println!("\n Global Attributes");
    println!("=====================");
    for attr in file.attributes() {
        println!("    {}: {:?}", attr.name(), attr.value()?);
    }

    Ok(())
}
