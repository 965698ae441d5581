//! High-level API for writing and reading HDF5 files.
//!
//! This crate provides an ergonomic, path-addressed interface on top of
//! `pmdh5-format`.
//!
//! # Writing
//!
//! ```no_run
//! use pmdh5::{AttrValue, FileBuilder};
//!
//! let mut builder = FileBuilder::new();
//! builder
//!     .create_dataset("sensors/temperature")?
//!     .with_f64_data(&[22.5, 23.1, 21.8]);
//! builder.set_attr("version", AttrValue::I64(1));
//! builder.write("output.h5")?;
//! # Ok::<(), pmdh5::Error>(())
//! ```
//!
//! # Reading
//!
//! ```no_run
//! use pmdh5::File;
//!
//! let file = File::open("output.h5")?;
//! let ds = file.dataset("sensors/temperature")?;
//! println!("shape: {:?}, data: {:?}", ds.shape()?, ds.read_f64()?);
//! # Ok::<(), pmdh5::Error>(())
//! ```

pub mod error;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::Error;
pub use reader::{Dataset, File, Group};
pub use types::{AttrValue, DType};
pub use writer::FileBuilder;

pub use pmdh5_format::datatype::Datatype;
pub use pmdh5_format::error::FormatError;
pub use pmdh5_format::type_builders::{DatasetBuilder, GroupBuilder};
