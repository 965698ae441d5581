//! A single-iteration, file-based openPMD series.

use std::path::{Path, PathBuf};

use ndarray::ArrayView2;
use num_complex::Complex;
use pmdh5::FileBuilder;

use crate::config::OpenPmdConfig;
use crate::error::Result;
use crate::mesh::{write_e_cartesian, write_rho_cylindrical};
use crate::particles::{write_species, ParticleData};
use crate::path::PathContext;
use crate::root::write_root_attributes;

/// An output file being populated with one iteration of openPMD data.
///
/// The target file is created (and truncated) when the series is created;
/// the HDF5 image is assembled in memory and written on [`Series::close`]
/// or on drop. A record writer that fails leaves nothing behind, so the
/// rest of the series can still be written.
#[derive(Debug)]
pub struct Series {
    path: PathBuf,
    file: Option<std::fs::File>,
    builder: FileBuilder,
    config: OpenPmdConfig,
    context: PathContext,
}

impl Series {
    /// Validate `config`, create the file at `path` and stamp the root
    /// attributes.
    pub fn create<P: AsRef<Path>>(path: P, config: OpenPmdConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref().to_path_buf();
        let file = std::fs::File::create(&path)?;

        let mut builder = FileBuilder::new();
        let context = write_root_attributes(&mut builder, &config)?;
        tracing::debug!(path = %path.display(), iteration = context.iteration(), "series created");

        Ok(Self {
            path,
            file: Some(file),
            builder,
            config,
            context,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context(&self) -> &PathContext {
        &self.context
    }

    pub fn config(&self) -> &OpenPmdConfig {
        &self.config
    }

    /// Write `rho` from its mode-0 and mode-1 parts.
    /// See [`write_rho_cylindrical`].
    pub fn write_rho(
        &mut self,
        mode0: ArrayView2<'_, f64>,
        mode1: ArrayView2<'_, Complex<f64>>,
    ) -> Result<()> {
        write_rho_cylindrical(&mut self.builder, &self.context, &self.config, mode0, mode1)
    }

    /// Write the three `E` components. See [`write_e_cartesian`].
    pub fn write_e<'a>(
        &mut self,
        ex: ArrayView2<'a, f64>,
        ey: ArrayView2<'a, f64>,
        ez: ArrayView2<'a, f64>,
    ) -> Result<()> {
        write_e_cartesian(&mut self.builder, &self.context, &self.config, ex, ey, ez)
    }

    /// Write the configured species. See [`write_species`].
    pub fn write_species(&mut self, data: Option<&ParticleData>) -> Result<()> {
        write_species(&mut self.builder, &self.context, &self.config.species, data)
    }

    /// Serialize the series to its file. Returns the number of bytes written.
    pub fn close(mut self) -> Result<u64> {
        self.flush()
    }

    fn flush(&mut self) -> Result<u64> {
        let Some(mut file) = self.file.take() else {
            return Ok(0);
        };
        let bytes = std::mem::take(&mut self.builder).write_to(&mut file)?;
        tracing::info!(path = %self.path.display(), bytes, "series closed");
        Ok(bytes)
    }
}

impl Drop for Series {
    fn drop(&mut self) {
        if self.file.is_none() {
            return;
        }
        tracing::warn!(path = %self.path.display(), "series dropped without close, flushing");
        if let Err(e) = self.flush() {
            tracing::error!(path = %self.path.display(), error = %e, "failed to flush series");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn create_truncates_and_close_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.h5");
        std::fs::write(&path, b"stale contents").unwrap();

        let series = Series::create(&path, OpenPmdConfig::default()).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
        assert_eq!(series.context().base_path(), "/data/0/");

        let bytes = series.close().unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), bytes);
        let file = pmdh5::File::open(&path).unwrap();
        assert!(file.root().attrs().unwrap().contains_key("version"));
    }

    #[test]
    fn invalid_config_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.h5");
        let mut cfg = OpenPmdConfig::default();
        cfg.species.name.clear();
        assert!(Series::create(&path, cfg).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn failed_record_leaves_series_usable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.h5");
        let mut series = Series::create(&path, OpenPmdConfig::default()).unwrap();

        let a = Array2::<f64>::zeros((2, 3));
        let b = Array2::<Complex<f64>>::zeros((3, 2));
        assert!(series.write_rho(a.view(), b.view()).is_err());
        series.write_e(a.view(), a.view(), a.view()).unwrap();
        series.close().unwrap();

        let file = pmdh5::File::open(&path).unwrap();
        assert!(!file.exists("/data/0/fields/rho").unwrap());
        assert!(file.exists("/data/0/fields/E/x").unwrap());
    }

    #[test]
    fn every_record_through_series_methods() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.h5");
        let mut series = Series::create(&path, OpenPmdConfig::default()).unwrap();

        let ex = Array2::<f64>::ones((2, 3));
        let ey = Array2::<f64>::zeros((2, 3));
        let ez = Array2::<f64>::from_elem((3, 2), 2.0);
        let rho = Array2::<f64>::zeros((2, 3));
        let rho1 = Array2::<Complex<f64>>::zeros((2, 3));
        series.write_rho(rho.view(), rho1.view()).unwrap();
        series.write_e(ex.view(), ey.view(), ez.t()).unwrap();
        series.write_species(None).unwrap();
        series.close().unwrap();

        let file = pmdh5::File::open(&path).unwrap();
        let fields = file.group("/data/0/fields").unwrap();
        assert_eq!(fields.member_names().unwrap(), vec!["rho", "E"]);
        assert!(file.exists("/data/0/particles/electrons/position/x").unwrap());
        let z = file.dataset("/data/0/fields/E/z").unwrap();
        assert_eq!(z.shape().unwrap(), vec![2, 3]);
    }
}
