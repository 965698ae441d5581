//! Error types for openPMD writing.

use thiserror::Error;

/// Errors raised while building or writing an openPMD series.
#[derive(Error, Debug)]
pub enum Error {
    /// Inputs that must share a grid have different shapes
    #[error("{record}: shape mismatch, expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        record: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Per-particle data does not match the species' particle count
    #[error("{record}: expected {expected} particles, found {found}")]
    ParticleCountMismatch {
        record: String,
        expected: usize,
        found: usize,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from the HDF5 layer
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] pmdh5::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration
    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp could not be rendered
    #[error("Date formatting failed: {0}")]
    Date(#[from] time::error::Format),
}

impl From<pmdh5::FormatError> for Error {
    fn from(e: pmdh5::FormatError) -> Self {
        Error::Hdf5(e.into())
    }
}

/// Result type alias for openPMD operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
