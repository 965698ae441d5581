//! Mesh (field) records.

use ndarray::{Array3, ArrayView, ArrayView2, Dimension};
use num_complex::Complex;
use pmdh5::{AttrValue, FileBuilder};

use crate::attributes::AttributeTarget;
use crate::config::{GridConfig, OpenPmdConfig, TimeConfig};
use crate::error::{Error, Result};
use crate::path::PathContext;
use crate::pic::write_field_pic_attributes;
use crate::units::UnitDimension;

/// Cell-centred sampling.
const CELL_CENTRED: [f64; 2] = [0.0, 0.0];

/// Yee stagger of the planar `E` components, in cell units.
pub const E_STAGGER: [(&str, [f64; 2]); 3] = [
    ("x", [0.0, 0.5]),
    ("y", [0.5, 0.0]),
    ("z", [0.0, 0.0]),
];

/// Mesh geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Cartesian,
    /// r-z grid with azimuthal modes `0..=modes`; mode 0 real, the rest complex.
    Cylindrical { modes: u32 },
}

impl Geometry {
    pub fn name(&self) -> &'static str {
        match self {
            Geometry::Cartesian => "cartesian",
            Geometry::Cylindrical { .. } => "cylindrical",
        }
    }

    /// `geometryParameters`, if the geometry has any.
    pub fn parameters(&self) -> Option<String> {
        match self {
            Geometry::Cartesian => None,
            Geometry::Cylindrical { modes } => Some(format!("m={modes}; imag=+")),
        }
    }

    /// Length of the leading mode axis: one real layer for mode 0, then
    /// a real and an imaginary layer per higher mode.
    pub fn mode_layers(&self) -> usize {
        match self {
            Geometry::Cartesian => 1,
            Geometry::Cylindrical { modes } => 2 * *modes as usize + 1,
        }
    }
}

fn write_geometry<T: AttributeTarget + ?Sized>(target: &mut T, geometry: Geometry) {
    target.put_str("geometry", geometry.name());
    target.put_opt_str("geometryParameters", geometry.parameters().as_deref());
}

fn write_grid<T: AttributeTarget + ?Sized>(target: &mut T, grid: &GridConfig) {
    target.put_attr("gridSpacing", per_axis(grid.spacing, grid));
    target.put_attr("gridGlobalOffset", per_axis(grid.global_offset, grid));
    target.put_attr("gridUnitSI", AttrValue::F64(grid.unit_si));
    target.put_str("dataOrder", &grid.data_order);
}

fn write_time<T: AttributeTarget + ?Sized>(target: &mut T, time: &TimeConfig) {
    target.put_attr("time", AttrValue::F64(time.time));
    target.put_attr("timeUnitSI", AttrValue::F64(time.unit_si));
}

fn shape_check(record: &str, expected: &[usize], found: &[usize]) -> Result<()> {
    if expected != found {
        return Err(Error::ShapeMismatch {
            record: record.into(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        });
    }
    Ok(())
}

fn dims(shape: &[usize]) -> Vec<u64> {
    shape.iter().map(|&d| d as u64).collect()
}

fn column_major(grid: &GridConfig) -> bool {
    grid.data_order == "F"
}

/// Flatten `data` in the storage order `dataOrder` names, with the stored dims.
///
/// Column-major (`"F"`) storage writes the transpose: the axes are reversed
/// and the first logical index varies fastest.
fn stored<D: Dimension>(data: ArrayView<'_, f32, D>, grid: &GridConfig) -> (Vec<f32>, Vec<u64>) {
    let data = if column_major(grid) { data.reversed_axes() } else { data };
    (data.iter().copied().collect(), dims(data.shape()))
}

/// Per-axis attribute in the axis order of the stored data.
fn per_axis(mut values: [f64; 2], grid: &GridConfig) -> AttrValue {
    if column_major(grid) {
        values.reverse();
    }
    values.into()
}

/// Write the charge density `rho` on a cylindrical r-z grid with azimuthal
/// modes 0 and 1.
///
/// The dataset is `3 x H x W` single precision: mode 0, then the real and
/// imaginary parts of mode 1. With `dataOrder="F"` it is stored transposed
/// as `W x H x 3`. Fails with [`Error::ShapeMismatch`] before anything is
/// created when the two modes differ in shape.
pub fn write_rho_cylindrical(
    builder: &mut FileBuilder,
    ctx: &PathContext,
    cfg: &OpenPmdConfig,
    mode0: ArrayView2<'_, f64>,
    mode1: ArrayView2<'_, Complex<f64>>,
) -> Result<()> {
    let path = ctx.mesh("rho");
    shape_check(&path, mode0.shape(), mode1.shape())?;

    let geometry = Geometry::Cylindrical { modes: 1 };
    let (h, w) = mode0.dim();
    let layers = Array3::from_shape_fn((geometry.mode_layers(), h, w), |(k, i, j)| match k {
        0 => mode0[[i, j]] as f32,
        1 => mode1[[i, j]].re as f32,
        _ => mode1[[i, j]].im as f32,
    });
    let (values, shape) = stored(layers.view(), &cfg.grid);

    let rho = builder.create_dataset(&path)?;
    rho.with_f32_data(&values).with_shape(&shape);
    write_geometry(rho, geometry);
    rho.put_attr("unitSI", AttrValue::F64(cfg.rho_unit_si));
    rho.put_attr("unitDimension", UnitDimension::CHARGE_DENSITY.into());
    write_time(rho, &cfg.time);
    rho.put_attr("gridSpacing", per_axis(cfg.grid.spacing, &cfg.grid));
    rho.put_attr("gridGlobalOffset", per_axis(cfg.grid.global_offset, &cfg.grid));
    rho.put_attr("position", per_axis(CELL_CENTRED, &cfg.grid));
    rho.put_attr("gridUnitSI", AttrValue::F64(cfg.grid.unit_si));
    rho.put_str("dataOrder", &cfg.grid.data_order);
    write_field_pic_attributes(rho, &cfg.field_solver);

    tracing::debug!(path = %path, ?shape, "mesh record written");
    Ok(())
}

/// Write the electric field `E` on a planar Cartesian grid.
///
/// Grid, unit and ED-PIC attributes live on the `E` group; each component
/// dataset carries its own stagger `position` and `unitSI`. All three
/// components share the group's grid, so they must have equal shapes.
pub fn write_e_cartesian<'a>(
    builder: &mut FileBuilder,
    ctx: &PathContext,
    cfg: &OpenPmdConfig,
    ex: ArrayView2<'a, f64>,
    ey: ArrayView2<'a, f64>,
    ez: ArrayView2<'a, f64>,
) -> Result<()> {
    let path = ctx.mesh("E");
    let components = [ex, ey, ez];
    for ((name, _), data) in E_STAGGER.iter().zip(&components).skip(1) {
        shape_check(&format!("{path}/{name}"), ex.shape(), data.shape())?;
    }

    let e = builder.create_group(&path)?;
    write_geometry(e, Geometry::Cartesian);
    write_grid(e, &cfg.grid);
    e.put_attr("unitDimension", UnitDimension::ELECTRIC_FIELD.into());
    write_field_pic_attributes(e, &cfg.field_solver);
    write_time(e, &cfg.time);

    for ((name, position), data) in E_STAGGER.iter().zip(&components) {
        // Logical order regardless of the input's memory layout.
        let (values, shape) = stored(data.mapv(|v| v as f32).view(), &cfg.grid);
        let component = e.create_dataset(name)?;
        component.with_f32_data(&values).with_shape(&shape);
        component.put_attr("position", per_axis(*position, &cfg.grid));
        component.put_attr("unitSI", AttrValue::F64(cfg.e_unit_si));
    }

    tracing::debug!(path = %path, shape = ?ex.shape(), "mesh record written");
    Ok(())
}
