//! Small wrfout-shaped fixtures shared by the integration and CLI tests.
#![allow(dead_code)]

use ndarray::{Array1, Array3, Array4};
use netcdf::{create, create_with, Options};
use std::path::Path;
use wrf_utils::errors::{Result, WrfError};

pub const NZ: usize = 2;
pub const NY: usize = 3;
pub const NX: usize = 4;

/// Raw short value marking a missing `T2_PACKED` cell
pub const PACKED_FILL: i16 = -32767;

fn theta_values() -> Array4<f32> {
    Array4::from_shape_fn((1, NZ, NY, NX), |(_, k, j, i)| {
        (k * NY * NX + j * NX + i) as f32 - 10.0
    })
}

fn base_pressure_values() -> Array4<f32> {
    Array4::from_shape_fn((1, NZ, NY, NX), |(_, k, _, _)| {
        95_000.0f32 - 20_000.0 * k as f32
    })
}

/// Writes a small netCDF-4 file laid out like wrfout: one time step,
/// staggering omitted.
///
/// Besides `T`, `P`, `PB` and `XTIME` it holds an `int` field (`ISLTYP`), a
/// `short` field (`HGT_LEVEL`), a packed `short` field with a fill cell
/// (`T2_PACKED`) and a `float` field with a fill cell (`QFILL`).
pub fn create_wrfout(path: &Path) -> Result<()> {
    let mut file = create(path)?;

    file.add_attribute("TITLE", " OUTPUT FROM WRF V4.5 MODEL")?;
    file.add_attribute("DX", 3000.0f32)?;
    file.add_attribute("MAP_PROJ", 1i32)?;

    file.add_dimension("Time", 1)?;
    file.add_dimension("bottom_top", NZ)?;
    file.add_dimension("south_north", NY)?;
    file.add_dimension("west_east", NX)?;

    let dims = ["Time", "bottom_top", "south_north", "west_east"];
    let surface = ["Time", "south_north", "west_east"];

    // Perturbation potential temperature, -10 K .. +13 K
    {
        let mut var = file.add_variable::<f32>("T", &dims)?;
        var.put_attribute("units", "K")?;
        var.put_attribute("description", "perturbation potential temperature (theta-t0)")?;
        var.put(theta_values().view(), ..)?;
    }

    // Perturbation pressure
    {
        let mut var = file.add_variable::<f32>("P", &dims)?;
        var.put_attribute("units", "Pa")?;
        var.put(Array4::from_elem((1, NZ, NY, NX), 500.0f32).view(), ..)?;
    }

    // Base-state pressure, decreasing with height
    {
        let mut var = file.add_variable::<f32>("PB", &dims)?;
        var.put_attribute("units", "Pa")?;
        var.put(base_pressure_values().view(), ..)?;
    }

    {
        let mut var = file.add_variable::<f32>("XTIME", &["Time"])?;
        var.put_attribute("units", "minutes since 2024-06-01 00:00:00")?;
        var.put(Array1::from(vec![60.0f32]).view(), ..)?;
    }

    // Soil category, 1 .. 12
    {
        let mut var = file.add_variable::<i32>("ISLTYP", &surface)?;
        var.put_attribute("description", "DOMINANT SOIL CATEGORY")?;
        let data = Array3::from_shape_fn((1, NY, NX), |(_, j, i)| (j * NX + i) as i32 + 1);
        var.put(data.view(), ..)?;
    }

    // Terrain level stored as short, -6 .. 5
    {
        let mut var = file.add_variable::<i16>("HGT_LEVEL", &surface)?;
        let data = Array3::from_shape_fn((1, NY, NX), |(_, j, i)| (j * NX + i) as i16 - 6);
        var.put(data.view(), ..)?;
    }

    // Packed 2 m temperature: 250 + 0.5 * raw, first cell missing
    {
        let mut var = file.add_variable::<i16>("T2_PACKED", &surface)?;
        var.put_attribute("_FillValue", PACKED_FILL)?;
        var.put_attribute("scale_factor", 0.5f64)?;
        var.put_attribute("add_offset", 250.0f64)?;
        var.put_attribute("units", "K")?;
        let data = Array3::from_shape_fn((1, NY, NX), |(_, j, i)| {
            if j == 0 && i == 0 {
                PACKED_FILL
            } else {
                ((j * NX + i) * 10) as i16
            }
        });
        var.put(data.view(), ..)?;
    }

    // Mixing ratio with one missing cell
    {
        let mut var = file.add_variable::<f32>("QFILL", &surface)?;
        var.put_attribute("_FillValue", -999.0f32)?;
        var.put_attribute("units", "kg kg-1")?;
        let data = Array3::from_shape_fn((1, NY, NX), |(_, j, i)| {
            if j == NY - 1 && i == NX - 1 {
                -999.0f32
            } else {
                0.001 * (j * NX + i) as f32
            }
        });
        var.put(data.view(), ..)?;
    }

    Ok(())
}

/// Writes the `T`, `P` and `PB` fields of [`create_wrfout`] as a netCDF-3
/// classic file.
pub fn create_classic_wrfout(path: &Path) -> Result<()> {
    let mut file = create_with(path, Options::CLASSIC)?;

    file.add_attribute("TITLE", " OUTPUT FROM WRF V3.9 MODEL")?;
    file.add_dimension("Time", 1)?;
    file.add_dimension("bottom_top", NZ)?;
    file.add_dimension("south_north", NY)?;
    file.add_dimension("west_east", NX)?;

    let dims = ["Time", "bottom_top", "south_north", "west_east"];
    for (name, units) in [("T", "K"), ("P", "Pa"), ("PB", "Pa")] {
        let mut var = file.add_variable::<f32>(name, &dims)?;
        var.put_attribute("units", units)?;
    }

    // netCDF-3 only accepts data once definitions are closed
    file.enddef()?;

    let values = [
        ("T", theta_values()),
        ("P", Array4::from_elem((1, NZ, NY, NX), 500.0f32)),
        ("PB", base_pressure_values()),
    ];
    for (name, data) in values {
        let mut var = file
            .variable_mut(name)
            .ok_or_else(|| WrfError::VariableNotFound {
                var: name.to_string(),
            })?;
        var.put(data.view(), ..)?;
    }

    Ok(())
}
