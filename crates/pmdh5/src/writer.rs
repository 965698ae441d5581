//! Writing API: FileBuilder for creating HDF5 files.

use std::io::Write;
use std::path::Path;

use pmdh5_format::file_writer::FileWriter as FormatWriter;
use pmdh5_format::type_builders::{AttrValue, DatasetBuilder, GroupBuilder};

use crate::error::Error;

/// Builder for creating a new HDF5 file.
///
/// Groups and datasets are addressed by `/`-separated paths relative to
/// the root; missing intermediate groups are created on demand.
///
/// # Example
///
/// ```no_run
/// use pmdh5::{AttrValue, FileBuilder};
///
/// let mut builder = FileBuilder::new();
/// builder
///     .create_dataset("data/0/fields/rho")?
///     .with_f32_data(&[1.0, 2.0, 3.0])
///     .set_attr("unitSI", AttrValue::F64(1.0));
/// builder.set_attr("version", AttrValue::String("1.0.0".into()));
/// builder.write("output.h5")?;
/// # Ok::<(), pmdh5::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct FileBuilder {
    writer: FormatWriter,
}

impl FileBuilder {
    /// Create a new file builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Group at `path`, created along with any missing parents.
    pub fn create_group(&mut self, path: &str) -> Result<&mut GroupBuilder, Error> {
        tracing::debug!(path, "group");
        Ok(self.writer.require_group(path)?)
    }

    /// Create a dataset at `path`. Returns a mutable reference to a
    /// `DatasetBuilder` for configuring data, shape, and attributes.
    pub fn create_dataset(&mut self, path: &str) -> Result<&mut DatasetBuilder, Error> {
        tracing::debug!(path, "dataset");
        Ok(self.writer.create_dataset(path)?)
    }

    /// Set an attribute on the root group.
    pub fn set_attr(&mut self, name: &str, value: AttrValue) {
        self.writer.set_root_attr(name, value);
    }

    /// The root group as built so far.
    pub fn root(&self) -> &GroupBuilder {
        self.writer.root()
    }

    /// Existing group at `path`, if any.
    pub fn group(&self, path: &str) -> Option<&GroupBuilder> {
        self.writer.root().group(path)
    }

    /// Existing dataset at `path`, if any.
    pub fn dataset(&self, path: &str) -> Option<&DatasetBuilder> {
        self.writer.root().dataset(path.trim_start_matches('/'))
    }

    /// Serialize the file to bytes in memory.
    pub fn finish(self) -> Result<Vec<u8>, Error> {
        Ok(self.writer.finish()?)
    }

    /// Serialize and write the file to `path`, replacing any existing file.
    pub fn write<P: AsRef<Path>>(self, path: P) -> Result<(), Error> {
        let mut file = std::fs::File::create(path.as_ref())?;
        self.write_to(&mut file).map(|_| ())
    }

    /// Serialize into an open writer and flush it. Returns the byte count.
    pub fn write_to<W: Write>(self, out: &mut W) -> Result<u64, Error> {
        let bytes = self.finish()?;
        out.write_all(&bytes)?;
        out.flush()?;
        tracing::debug!(bytes = bytes.len(), "HDF5 image written");
        Ok(bytes.len() as u64)
    }
}
