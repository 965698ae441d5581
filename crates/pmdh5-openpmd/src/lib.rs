//! openPMD 1.0.0 sample files with the ED-PIC extension.
//!
//! Writes one iteration of a file-based series: a cylindrical charge
//! density `rho` (azimuthal modes 0 and 1), a Cartesian electric field `E`
//! and one particle species, each stamped with the base-standard and
//! ED-PIC attributes.
//!
//! ```no_run
//! use ndarray::Array2;
//! use num_complex::Complex;
//! use pmdh5_openpmd::{OpenPmdConfig, Series};
//!
//! let mut series = Series::create("example.h5", OpenPmdConfig::default())?;
//! let mode0 = Array2::<f64>::zeros((32, 64));
//! let mode1 = Array2::<Complex<f64>>::zeros((32, 64));
//! series.write_rho(mode0.view(), mode1.view())?;
//! series.write_species(None)?;
//! series.close()?;
//! # Ok::<(), pmdh5_openpmd::Error>(())
//! ```

pub mod attributes;
pub mod config;
pub mod error;
pub mod mesh;
pub mod particles;
pub mod path;
pub mod pic;
pub mod root;
pub mod series;
pub mod units;

pub use attributes::AttributeTarget;
pub use config::{
    ConstantRecord, FieldSolverConfig, GridConfig, OpenPmdConfig, RootConfig, SpeciesConfig,
    SpeciesPicConfig, TimeConfig,
};
pub use error::{Error, Result};
pub use mesh::{write_e_cartesian, write_rho_cylindrical, Geometry};
pub use particles::{write_species, ParticleData};
pub use path::PathContext;
pub use root::{format_date, write_root_attributes, OPENPMD_VERSION};
pub use series::Series;
pub use units::UnitDimension;
