//! HDF5 file signature (magic bytes).

use crate::error::FormatError;

/// The 8-byte HDF5 magic signature.
pub const HDF5_SIGNATURE: [u8; 8] = [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1A, b'\n'];

/// Locate the superblock signature.
///
/// HDF5 allows a user block in front of the superblock, so the signature may
/// sit at offset 0 or at any power of two from 512 upwards.
pub fn find_signature(data: &[u8]) -> Result<usize, FormatError> {
    let candidates = core::iter::once(0usize)
        .chain(core::iter::successors(Some(512usize), |o| o.checked_mul(2)));
    for offset in candidates {
        let Some(window) = data.get(offset..offset + 8) else {
            break;
        };
        if window == HDF5_SIGNATURE {
            return Ok(offset);
        }
    }
    Err(FormatError::SignatureNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_signature_at(len: usize, offset: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        data[offset..offset + 8].copy_from_slice(&HDF5_SIGNATURE);
        data
    }

    #[test]
    fn found_at_start() {
        assert_eq!(find_signature(&with_signature_at(64, 0)), Ok(0));
    }

    #[test]
    fn found_after_user_block() {
        assert_eq!(find_signature(&with_signature_at(1024, 512)), Ok(512));
        assert_eq!(find_signature(&with_signature_at(4096, 2048)), Ok(2048));
    }

    #[test]
    fn ignored_at_unaligned_offset() {
        let data = with_signature_at(1024, 100);
        assert_eq!(find_signature(&data), Err(FormatError::SignatureNotFound));
    }

    #[test]
    fn missing_or_short_input() {
        assert_eq!(find_signature(&[]), Err(FormatError::SignatureNotFound));
        assert_eq!(
            find_signature(&HDF5_SIGNATURE[..5]),
            Err(FormatError::SignatureNotFound)
        );
        assert_eq!(
            find_signature(&vec![0u8; 8192]),
            Err(FormatError::SignatureNotFound)
        );
    }
}
