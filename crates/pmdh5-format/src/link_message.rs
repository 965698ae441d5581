//! HDF5 Link (0x0006) and Link Info (0x0002) messages.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::bytes::{ensure_len, read_uint};
use crate::datatype::CharacterSet;
use crate::error::FormatError;
use crate::superblock::UNDEFINED_ADDRESS;

/// One named hard link of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMessage {
    pub name: String,
    pub object_header_address: u64,
}

// Link message flag bits.
const NAME_LEN_WIDTH_MASK: u8 = 0x03;
const HAS_CREATION_ORDER: u8 = 0x04;
const HAS_LINK_TYPE: u8 = 0x08;
const HAS_CHARSET: u8 = 0x10;

impl LinkMessage {
    /// Hard link to the object header at `addr`.
    pub fn hard(name: &str, addr: u64) -> LinkMessage {
        LinkMessage {
            name: name.into(),
            object_header_address: addr,
        }
    }

    /// Encode as a version 1 link message.
    pub fn serialize(&self, offset_size: u8) -> Vec<u8> {
        let name = self.name.as_bytes();
        let (width_bits, width) = match name.len() {
            0..=0xFF => (0u8, 1usize),
            0x100..=0xFFFF => (1, 2),
            _ => (2, 4),
        };
        let utf8 = CharacterSet::for_text(&self.name) == CharacterSet::Utf8;
        let flags = if utf8 { width_bits | HAS_CHARSET } else { width_bits };

        let mut buf = Vec::with_capacity(4 + name.len() + offset_size as usize);
        buf.push(1);
        buf.push(flags);
        if utf8 {
            buf.push(1);
        }
        buf.extend_from_slice(&(name.len() as u32).to_le_bytes()[..width]);
        buf.extend_from_slice(name);
        buf.extend_from_slice(&self.object_header_address.to_le_bytes()[..offset_size as usize]);
        buf
    }

    /// Parse a version 1 hard link message.
    ///
    /// Soft, external and user-defined links fail with `UnsupportedLinkType`.
    pub fn parse(data: &[u8], offset_size: u8) -> Result<LinkMessage, FormatError> {
        ensure_len(data, 0, 2)?;
        let version = data[0];
        if version != 1 {
            return Err(FormatError::InvalidLinkVersion(version));
        }
        let flags = data[1];
        let mut pos = 2;

        if flags & HAS_LINK_TYPE != 0 {
            ensure_len(data, pos, 1)?;
            if data[pos] != 0 {
                return Err(FormatError::UnsupportedLinkType(data[pos]));
            }
            pos += 1;
        }
        if flags & HAS_CREATION_ORDER != 0 {
            pos += 8;
        }
        if flags & HAS_CHARSET != 0 {
            pos += 1;
        }

        let width = 1u8 << (flags & NAME_LEN_WIDTH_MASK);
        let name_len = read_uint(data, pos, width)? as usize;
        pos += width as usize;
        ensure_len(data, pos, name_len)?;
        let name = String::from_utf8_lossy(&data[pos..pos + name_len]).into_owned();
        pos += name_len;

        Ok(LinkMessage {
            name,
            object_header_address: read_uint(data, pos, offset_size)?,
        })
    }
}

/// Link Info message for a group whose links are all stored in its header.
///
/// Version 0, no creation-order tracking, undefined fractal heap and
/// name-index B-tree addresses.
pub fn compact_link_info() -> Vec<u8> {
    let mut buf = Vec::with_capacity(18);
    buf.push(0);
    buf.push(0);
    buf.extend_from_slice(&UNDEFINED_ADDRESS.to_le_bytes());
    buf.extend_from_slice(&UNDEFINED_ADDRESS.to_le_bytes());
    buf
}

/// Whether a Link Info message points at dense (fractal heap) link storage.
pub fn link_info_is_dense(data: &[u8], offset_size: u8) -> Result<bool, FormatError> {
    ensure_len(data, 0, 2)?;
    let mut pos = 2;
    if data[1] & 0x01 != 0 {
        pos += 8;
    }
    let heap = read_uint(data, pos, offset_size)?;
    let undefined = if offset_size == 8 {
        UNDEFINED_ADDRESS
    } else {
        (1u64 << (offset_size as u32 * 8)) - 1
    };
    Ok(heap != undefined)
}

/// Check that `name` can be stored as a single link name.
pub fn validate_link_name(name: &str) -> Result<(), FormatError> {
    if name.is_empty() || name == "." || name.contains('/') {
        return Err(FormatError::InvalidLinkName(name.into()));
    }
    Ok(())
}
