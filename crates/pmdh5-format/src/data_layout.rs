//! HDF5 Data Layout message (message type 0x0008).

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::bytes::{ensure_len, read_u16, read_uint};
use crate::error::FormatError;

/// Where a dataset's raw data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLayout {
    /// Data stored inside the layout message.
    Compact { data: Vec<u8> },
    /// Data stored in one block of the file.
    Contiguous {
        /// `None` when storage has not been allocated.
        address: Option<u64>,
        size: u64,
    },
}

impl DataLayout {
    /// Parse a version 3 or 4 layout message.
    ///
    /// Chunked and virtual layouts are reported as unsupported.
    pub fn parse(data: &[u8], offset_size: u8, length_size: u8) -> Result<DataLayout, FormatError> {
        ensure_len(data, 0, 2)?;
        let version = data[0];
        if !matches!(version, 3 | 4) {
            return Err(FormatError::InvalidLayoutVersion(version));
        }
        match data[1] {
            0 => {
                let len = read_u16(data, 2)? as usize;
                ensure_len(data, 4, len)?;
                Ok(DataLayout::Compact {
                    data: data[4..4 + len].to_vec(),
                })
            }
            1 => {
                let os = offset_size as usize;
                ensure_len(data, 2, os)?;
                let address = if data[2..2 + os].iter().all(|&b| b == 0xFF) {
                    None
                } else {
                    Some(read_uint(data, 2, offset_size)?)
                };
                let size = read_uint(data, 2 + os, length_size)?;
                Ok(DataLayout::Contiguous { address, size })
            }
            other => Err(FormatError::UnsupportedLayoutClass(other)),
        }
    }

    /// Encode as a version 4 layout message with 8-byte addresses and lengths.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            DataLayout::Compact { data } => {
                let mut buf = Vec::with_capacity(4 + data.len());
                buf.extend_from_slice(&[4, 0]);
                buf.extend_from_slice(&(data.len() as u16).to_le_bytes());
                buf.extend_from_slice(data);
                buf
            }
            DataLayout::Contiguous { address, size } => {
                let mut buf = Vec::with_capacity(18);
                buf.extend_from_slice(&[4, 1]);
                buf.extend_from_slice(&address.unwrap_or(u64::MAX).to_le_bytes());
                buf.extend_from_slice(&size.to_le_bytes());
                buf
            }
        }
    }
}
