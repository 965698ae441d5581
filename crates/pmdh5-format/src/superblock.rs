//! HDF5 superblock, versions 2 and 3.
//!
//! Older superblocks (0 and 1) point at symbol-table groups, which this
//! crate never produces; they are reported as unsupported.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::bytes::{ensure_len, read_uint};
use crate::checksum::{jenkins_lookup3, verify_trailing};
use crate::error::FormatError;
use crate::signature::HDF5_SIGNATURE;

/// The undefined address (all bits set).
pub const UNDEFINED_ADDRESS: u64 = u64::MAX;

/// Parsed or to-be-written v2/v3 superblock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superblock {
    /// Superblock version (2 or 3).
    pub version: u8,
    /// Size of file addresses in bytes.
    pub offset_size: u8,
    /// Size of lengths in bytes.
    pub length_size: u8,
    /// File consistency flags.
    pub consistency_flags: u8,
    /// Absolute address that all other addresses are relative to.
    pub base_address: u64,
    /// Superblock extension object header, or [`UNDEFINED_ADDRESS`].
    pub extension_address: u64,
    /// End-of-file address.
    pub eof_address: u64,
    /// Root group object header address.
    pub root_group_address: u64,
}

impl Superblock {
    /// Superblock written by this crate: version 3, 8-byte addresses.
    pub fn v3(eof_address: u64, root_group_address: u64) -> Superblock {
        Superblock {
            version: 3,
            offset_size: 8,
            length_size: 8,
            consistency_flags: 0,
            base_address: 0,
            extension_address: UNDEFINED_ADDRESS,
            eof_address,
            root_group_address,
        }
    }

    /// Encoded size in bytes, checksum included.
    pub fn encoded_len(&self) -> usize {
        12 + 4 * self.offset_size as usize + 4
    }

    /// Parse the superblock whose signature starts at `signature_offset`.
    ///
    /// The trailing lookup3 checksum is verified.
    pub fn parse(data: &[u8], signature_offset: usize) -> Result<Superblock, FormatError> {
        let d = data
            .get(signature_offset..)
            .ok_or(FormatError::UnexpectedEof {
                expected: signature_offset,
                available: data.len(),
            })?;
        ensure_len(d, 0, 12)?;
        if d[..8] != HDF5_SIGNATURE {
            return Err(FormatError::SignatureNotFound);
        }
        let version = d[8];
        if !matches!(version, 2 | 3) {
            return Err(FormatError::UnsupportedVersion(version));
        }
        let offset_size = d[9];
        let length_size = d[10];
        if !matches!(offset_size, 2 | 4 | 8) {
            return Err(FormatError::InvalidOffsetSize(offset_size));
        }
        if !matches!(length_size, 2 | 4 | 8) {
            return Err(FormatError::InvalidLengthSize(length_size));
        }
        let consistency_flags = d[11];

        let os = offset_size as usize;
        let total = 12 + 4 * os + 4;
        ensure_len(d, 0, total)?;
        verify_trailing(&d[..total])
            .map_err(|(expected, computed)| FormatError::ChecksumMismatch { expected, computed })?;

        let field = |i: usize| read_uint(d, 12 + i * os, offset_size);
        Ok(Superblock {
            version,
            offset_size,
            length_size,
            consistency_flags,
            base_address: field(0)?,
            extension_address: field(1)?,
            eof_address: field(2)?,
            root_group_address: field(3)?,
        })
    }

    /// Encode the superblock with 8-byte addresses and lengths, appending
    /// the lookup3 checksum.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(48);
        buf.extend_from_slice(&HDF5_SIGNATURE);
        buf.push(self.version);
        buf.push(8);
        buf.push(8);
        buf.push(self.consistency_flags);
        for addr in [
            self.base_address,
            self.extension_address,
            self.eof_address,
            self.root_group_address,
        ] {
            buf.extend_from_slice(&addr.to_le_bytes());
        }
        let sum = jenkins_lookup3(&buf);
        buf.extend_from_slice(&sum.to_le_bytes());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v3_layout_is_48_bytes() {
        let sb = Superblock::v3(4096, 48);
        let bytes = sb.serialize();
        assert_eq!(bytes.len(), 48);
        assert_eq!(sb.encoded_len(), 48);
        assert_eq!(&bytes[..8], &HDF5_SIGNATURE);
        assert_eq!(bytes[8], 3);
        assert_eq!(&bytes[20..28], &u64::MAX.to_le_bytes());
        let stored = u32::from_le_bytes([bytes[44], bytes[45], bytes[46], bytes[47]]);
        assert_eq!(stored, jenkins_lookup3(&bytes[..44]));
    }

    #[test]
    fn parse_reads_back_addresses() {
        let bytes = Superblock::v3(123_456, 48).serialize();
        let sb = Superblock::parse(&bytes, 0).unwrap();
        assert_eq!(sb, Superblock::v3(123_456, 48));
    }

    #[test]
    fn parse_after_user_block() {
        let mut data = vec![0u8; 512];
        data.extend_from_slice(&Superblock::v3(1000, 560).serialize());
        let sb = Superblock::parse(&data, 512).unwrap();
        assert_eq!(sb.root_group_address, 560);
    }

    #[test]
    fn corrupted_field_fails_checksum() {
        let mut bytes = Superblock::v3(4096, 48).serialize();
        bytes[30] ^= 0x10;
        assert!(matches!(
            Superblock::parse(&bytes, 0),
            Err(FormatError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn old_versions_rejected() {
        let mut data = vec![0u8; 96];
        data[..8].copy_from_slice(&HDF5_SIGNATURE);
        data[8] = 0;
        assert_eq!(
            Superblock::parse(&data, 0),
            Err(FormatError::UnsupportedVersion(0))
        );
    }

    #[test]
    fn bad_sizes_rejected() {
        let mut data = Superblock::v3(4096, 48).serialize();
        data[9] = 3;
        assert_eq!(
            Superblock::parse(&data, 0),
            Err(FormatError::InvalidOffsetSize(3))
        );
        data[9] = 8;
        data[10] = 5;
        assert_eq!(
            Superblock::parse(&data, 0),
            Err(FormatError::InvalidLengthSize(5))
        );
    }

    #[test]
    fn truncated() {
        let bytes = Superblock::v3(4096, 48).serialize();
        assert!(matches!(
            Superblock::parse(&bytes[..40], 0),
            Err(FormatError::UnexpectedEof { .. })
        ));
    }
}
