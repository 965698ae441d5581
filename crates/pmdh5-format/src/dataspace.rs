//! HDF5 Dataspace message (message type 0x0001).

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::bytes::{ensure_len, read_uint};
use crate::error::FormatError;

/// Type of dataspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataspaceType {
    /// A single element.
    Scalar,
    /// An N-dimensional array.
    Simple,
    /// No data.
    Null,
}

/// Shape of a dataset or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataspace {
    pub space_type: DataspaceType,
    /// Current dimension sizes (empty for scalar and null spaces).
    pub dimensions: Vec<u64>,
    /// Maximum dimension sizes, if stored. `u64::MAX` means unlimited.
    pub max_dimensions: Option<Vec<u64>>,
}

impl Dataspace {
    pub fn scalar() -> Dataspace {
        Dataspace {
            space_type: DataspaceType::Scalar,
            dimensions: Vec::new(),
            max_dimensions: None,
        }
    }

    /// Fixed-size array of the given shape. An empty shape gives a scalar.
    pub fn simple(dimensions: &[u64]) -> Dataspace {
        if dimensions.is_empty() {
            return Dataspace::scalar();
        }
        Dataspace {
            space_type: DataspaceType::Simple,
            dimensions: dimensions.to_vec(),
            max_dimensions: None,
        }
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Number of elements: 1 for scalar, 0 for null, product of dims otherwise.
    pub fn element_count(&self) -> u64 {
        match self.space_type {
            DataspaceType::Scalar => 1,
            DataspaceType::Null => 0,
            DataspaceType::Simple => self.dimensions.iter().product(),
        }
    }

    /// Parse a version 1 or 2 dataspace message.
    ///
    /// `length_size` comes from the superblock.
    pub fn parse(data: &[u8], length_size: u8) -> Result<Dataspace, FormatError> {
        ensure_len(data, 0, 4)?;
        let version = data[0];
        let rank = data[1] as usize;
        let flags = data[2];

        let (space_type, mut pos) = match version {
            1 => {
                ensure_len(data, 0, 8)?;
                let st = if rank == 0 {
                    DataspaceType::Scalar
                } else {
                    DataspaceType::Simple
                };
                (st, 8usize)
            }
            2 => {
                let st = match data[3] {
                    0 => DataspaceType::Scalar,
                    1 => DataspaceType::Simple,
                    2 => DataspaceType::Null,
                    other => return Err(FormatError::InvalidDataspaceType(other)),
                };
                (st, 4usize)
            }
            other => return Err(FormatError::InvalidDataspaceVersion(other)),
        };

        let ls = length_size as usize;
        let mut dimensions = Vec::with_capacity(rank);
        for _ in 0..rank {
            dimensions.push(read_uint(data, pos, length_size)?);
            pos += ls;
        }
        let max_dimensions = if flags & 0x01 != 0 {
            let mut max = Vec::with_capacity(rank);
            for _ in 0..rank {
                max.push(read_uint(data, pos, length_size)?);
                pos += ls;
            }
            Some(max)
        } else {
            None
        };

        Ok(Dataspace {
            space_type,
            dimensions,
            max_dimensions,
        })
    }

    /// Encode as a version 2 dataspace message.
    pub fn serialize(&self, length_size: u8) -> Vec<u8> {
        let ls = length_size as usize;
        let mut buf = Vec::with_capacity(4 + 2 * ls * self.rank());
        buf.push(2);
        buf.push(self.rank() as u8);
        buf.push(u8::from(self.max_dimensions.is_some()));
        buf.push(match self.space_type {
            DataspaceType::Scalar => 0,
            DataspaceType::Simple => 1,
            DataspaceType::Null => 2,
        });
        let max = self.max_dimensions.as_deref().unwrap_or(&[]);
        for &dim in self.dimensions.iter().chain(max) {
            buf.extend_from_slice(&dim.to_le_bytes()[..ls]);
        }
        buf
    }
}
