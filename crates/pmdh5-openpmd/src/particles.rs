//! Particle species records.

use pmdh5::{AttrValue, DatasetBuilder, Datatype, FileBuilder, GroupBuilder};

use crate::attributes::AttributeTarget;
use crate::config::{ConstantRecord, SpeciesConfig};
use crate::error::{Error, Result};
use crate::path::PathContext;
use crate::pic::write_species_pic_attributes;
use crate::units::UnitDimension;

const AXES: [&str; 3] = ["x", "y", "z"];

/// Per-particle values for one species, in file units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleData {
    pub weighting: Vec<f32>,
    /// x, y, z components.
    pub position: [Vec<f32>; 3],
    /// x, y, z components.
    pub momentum: [Vec<f32>; 3],
}

impl ParticleData {
    /// `count` particles with every value zero.
    pub fn zeros(count: usize) -> Self {
        let column = || vec![0.0; count];
        Self {
            weighting: column(),
            position: [column(), column(), column()],
            momentum: [column(), column(), column()],
        }
    }

    /// Fail unless every array holds exactly `count` values.
    pub fn check_len(&self, count: usize) -> Result<()> {
        let columns = std::iter::once(("weighting".to_string(), &self.weighting))
            .chain(vector_columns("position", &self.position))
            .chain(vector_columns("momentum", &self.momentum));
        for (record, values) in columns {
            if values.len() != count {
                return Err(Error::ParticleCountMismatch {
                    record,
                    expected: count,
                    found: values.len(),
                });
            }
        }
        Ok(())
    }
}

fn vector_columns<'a>(
    record: &'static str,
    comps: &'a [Vec<f32>; 3],
) -> impl Iterator<Item = (String, &'a Vec<f32>)> + 'a {
    AXES.iter()
        .zip(comps)
        .map(move |(axis, v)| (format!("{record}/{axis}"), v))
}

fn write_constant(group: &mut GroupBuilder, record: &ConstantRecord, dimension: UnitDimension) {
    group.put_attr("value", AttrValue::F64(record.value));
    group.put_attr("unitSI", AttrValue::F64(record.unit_si));
    group.put_attr("unitDimension", dimension.into());
}

/// One `f32` column of `count` values; left unallocated (reads as zeros)
/// when no values are supplied.
fn write_column<'g>(
    parent: &'g mut GroupBuilder,
    name: &str,
    count: usize,
    values: Option<&[f32]>,
) -> Result<&'g mut DatasetBuilder> {
    let ds = parent.create_dataset(name)?;
    match values {
        Some(v) => ds.with_f32_data(v),
        None => ds.with_unallocated(Datatype::f32(), &[count as u64]),
    };
    Ok(ds)
}

fn write_vector_record(
    species: &mut GroupBuilder,
    name: &str,
    count: usize,
    unit_si: f64,
    dimension: UnitDimension,
    values: Option<&[Vec<f32>; 3]>,
) -> Result<()> {
    let record = species.create_group(name)?;
    for (i, axis) in AXES.iter().enumerate() {
        write_column(record, axis, count, values.map(|v| v[i].as_slice()))?;
    }
    record.put_attr("unitSI", AttrValue::F64(unit_si));
    record.put_attr("unitDimension", dimension.into());
    Ok(())
}

/// Write species `cfg.name` with constant charge and mass records and
/// per-particle weighting, position and momentum.
///
/// Without `data` the per-particle arrays are declared but left unwritten,
/// so they read back as zeros. Supplied data is length-checked against
/// `cfg.particle_count` before anything is created.
pub fn write_species(
    builder: &mut FileBuilder,
    ctx: &PathContext,
    cfg: &SpeciesConfig,
    data: Option<&ParticleData>,
) -> Result<()> {
    let count = cfg.particle_count;
    if let Some(d) = data {
        d.check_len(count)?;
    }

    let path = ctx.species(&cfg.name);
    let species = builder.create_group(&path)?;

    write_constant(species.create_group("charge")?, &cfg.charge, UnitDimension::CHARGE);
    write_constant(species.create_group("mass")?, &cfg.mass, UnitDimension::MASS);

    species.put_opt_str("longName", cfg.long_name.as_deref());
    write_species_pic_attributes(species, &cfg.pic);

    let weighting = write_column(species, "weighting", count, data.map(|d| d.weighting.as_slice()))?;
    weighting.put_attr("unitSI", AttrValue::F64(cfg.weighting_unit_si));
    weighting.put_attr("unitDimension", UnitDimension::DIMENSIONLESS.into());

    write_vector_record(
        species,
        "position",
        count,
        cfg.position_unit_si,
        UnitDimension::LENGTH,
        data.map(|d| &d.position),
    )?;
    write_vector_record(
        species,
        "momentum",
        count,
        cfg.momentum_unit_si,
        UnitDimension::MOMENTUM,
        data.map(|d| &d.momentum),
    )?;

    tracing::debug!(path = %path, count, filled = data.is_some(), "species written");
    Ok(())
}
