//! Little-endian field readers shared by the message parsers.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;

pub(crate) fn ensure_len(data: &[u8], pos: usize, needed: usize) -> Result<(), FormatError> {
    match pos.checked_add(needed) {
        Some(end) if end <= data.len() => Ok(()),
        _ => Err(FormatError::UnexpectedEof {
            expected: pos.saturating_add(needed),
            available: data.len(),
        }),
    }
}

/// Read an unsigned integer of `size` bytes (1, 2, 4 or 8).
pub(crate) fn read_uint(data: &[u8], pos: usize, size: u8) -> Result<u64, FormatError> {
    ensure_len(data, pos, size as usize)?;
    let slice = &data[pos..pos + size as usize];
    Ok(match size {
        1 => slice[0] as u64,
        2 => LittleEndian::read_u16(slice) as u64,
        4 => LittleEndian::read_u32(slice) as u64,
        8 => LittleEndian::read_u64(slice),
        other => return Err(FormatError::InvalidOffsetSize(other)),
    })
}

pub(crate) fn read_u16(data: &[u8], pos: usize) -> Result<u16, FormatError> {
    ensure_len(data, pos, 2)?;
    Ok(LittleEndian::read_u16(&data[pos..pos + 2]))
}

pub(crate) fn read_u32(data: &[u8], pos: usize) -> Result<u32, FormatError> {
    ensure_len(data, pos, 4)?;
    Ok(LittleEndian::read_u32(&data[pos..pos + 4]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_reads() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(read_uint(&data, 0, 1), Ok(0x01));
        assert_eq!(read_uint(&data, 0, 2), Ok(0x0201));
        assert_eq!(read_uint(&data, 4, 4), Ok(0x0807_0605));
        assert_eq!(read_uint(&data, 0, 8), Ok(0x0807_0605_0403_0201));
        assert_eq!(read_uint(&data, 0, 3), Err(FormatError::InvalidOffsetSize(3)));
    }

    #[test]
    fn overrun_is_eof() {
        let data = [0u8; 4];
        assert_eq!(
            read_u32(&data, 2),
            Err(FormatError::UnexpectedEof {
                expected: 6,
                available: 4
            })
        );
        assert!(ensure_len(&data, usize::MAX, 2).is_err());
    }
}
