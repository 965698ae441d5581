//! Error types for HDF5 format encoding and parsing.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use core::fmt;

/// Errors that can occur when parsing or building HDF5 binary structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The HDF5 magic signature was not found at any valid offset.
    SignatureNotFound,
    /// The superblock version is not supported.
    UnsupportedVersion(u8),
    /// Unexpected end of data.
    UnexpectedEof {
        /// Number of bytes expected.
        expected: usize,
        /// Number of bytes actually available.
        available: usize,
    },
    /// Invalid offset size (must be 2, 4, or 8).
    InvalidOffsetSize(u8),
    /// Invalid length size (must be 2, 4, or 8).
    InvalidLengthSize(u8),
    /// Invalid object header signature.
    InvalidObjectHeaderSignature,
    /// Invalid object header version.
    InvalidObjectHeaderVersion(u8),
    /// Unknown message type that is marked as must-understand.
    UnsupportedMessage(u16),
    /// Jenkins lookup3 checksum mismatch.
    ChecksumMismatch {
        /// The checksum stored in the file.
        expected: u32,
        /// The checksum we computed.
        computed: u32,
    },
    /// Datatype class this crate does not handle.
    UnsupportedDatatypeClass(u8),
    /// Invalid string padding value.
    InvalidStringPadding(u8),
    /// Invalid character set value.
    InvalidCharacterSet(u8),
    /// Invalid dataspace message version.
    InvalidDataspaceVersion(u8),
    /// Invalid dataspace type byte.
    InvalidDataspaceType(u8),
    /// Invalid attribute message version.
    InvalidAttributeVersion(u8),
    /// Invalid link message version.
    InvalidLinkVersion(u8),
    /// Link type this crate does not handle (external, user-defined).
    UnsupportedLinkType(u8),
    /// Invalid data layout message version.
    InvalidLayoutVersion(u8),
    /// Data layout class this crate does not read (chunked, virtual).
    UnsupportedLayoutClass(u8),
    /// A path component could not be resolved.
    PathNotFound(String),
    /// A path component resolved to a dataset where a group was required.
    NotAGroup(String),
    /// The stored element type cannot be converted to the requested one.
    TypeMismatch {
        /// Requested element type.
        expected: &'static str,
        /// Description of the stored type.
        actual: String,
    },
    /// A dataset's raw data length does not match its shape and element size.
    DataSizeMismatch {
        /// Dataset name.
        name: String,
        /// Bytes implied by shape × element size.
        expected: u64,
        /// Bytes actually supplied.
        actual: u64,
    },
    /// Stored raw data length disagrees with the dataspace and datatype.
    StorageSizeMismatch {
        /// Bytes implied by element count × element size.
        expected: u64,
        /// Bytes recorded in the file.
        actual: u64,
    },
    /// A dataset was finished without data.
    DatasetMissingData(String),
    /// Two children of one group share a name.
    DuplicateLink(String),
    /// A link name is empty, `.` or contains `/`.
    InvalidLinkName(String),
    /// A message payload is too large for a v2 object header message.
    MessageTooLarge(usize),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::SignatureNotFound => {
                write!(f, "HDF5 signature not found at any valid offset")
            }
            FormatError::UnsupportedVersion(v) => {
                write!(f, "unsupported superblock version: {v}")
            }
            FormatError::UnexpectedEof {
                expected,
                available,
            } => {
                write!(f, "unexpected EOF: need {expected} bytes, have {available}")
            }
            FormatError::InvalidOffsetSize(s) => {
                write!(f, "invalid offset size: {s} (must be 2, 4, or 8)")
            }
            FormatError::InvalidLengthSize(s) => {
                write!(f, "invalid length size: {s} (must be 2, 4, or 8)")
            }
            FormatError::InvalidObjectHeaderSignature => {
                write!(f, "invalid object header signature")
            }
            FormatError::InvalidObjectHeaderVersion(v) => {
                write!(f, "invalid object header version: {v}")
            }
            FormatError::UnsupportedMessage(id) => {
                write!(
                    f,
                    "unsupported message type {id:#06x} marked as must-understand"
                )
            }
            FormatError::ChecksumMismatch { expected, computed } => {
                write!(
                    f,
                    "checksum mismatch: expected {expected:#010x}, computed {computed:#010x}"
                )
            }
            FormatError::UnsupportedDatatypeClass(c) => {
                write!(f, "unsupported datatype class: {c}")
            }
            FormatError::InvalidStringPadding(v) => write!(f, "invalid string padding: {v}"),
            FormatError::InvalidCharacterSet(v) => write!(f, "invalid character set: {v}"),
            FormatError::InvalidDataspaceVersion(v) => {
                write!(f, "invalid dataspace version: {v}")
            }
            FormatError::InvalidDataspaceType(v) => write!(f, "invalid dataspace type: {v}"),
            FormatError::InvalidAttributeVersion(v) => {
                write!(f, "invalid attribute message version: {v}")
            }
            FormatError::InvalidLinkVersion(v) => write!(f, "invalid link message version: {v}"),
            FormatError::UnsupportedLinkType(t) => write!(f, "unsupported link type: {t}"),
            FormatError::InvalidLayoutVersion(v) => {
                write!(f, "invalid data layout version: {v}")
            }
            FormatError::UnsupportedLayoutClass(c) => {
                write!(f, "unsupported data layout class: {c}")
            }
            FormatError::PathNotFound(p) => write!(f, "path not found: {p}"),
            FormatError::NotAGroup(p) => write!(f, "not a group: {p}"),
            FormatError::TypeMismatch { expected, actual } => {
                write!(f, "type mismatch: expected {expected}, stored {actual}")
            }
            FormatError::DataSizeMismatch {
                name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "dataset '{name}': shape needs {expected} bytes, data has {actual}"
                )
            }
            FormatError::StorageSizeMismatch { expected, actual } => {
                write!(f, "stored data is {actual} bytes, expected {expected}")
            }
            FormatError::DatasetMissingData(name) => {
                write!(f, "dataset '{name}' has no data")
            }
            FormatError::DuplicateLink(name) => write!(f, "duplicate link name: {name}"),
            FormatError::InvalidLinkName(name) => write!(f, "invalid link name: '{name}'"),
            FormatError::MessageTooLarge(n) => {
                write!(f, "header message of {n} bytes exceeds the 65535-byte limit")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            FormatError::UnexpectedEof {
                expected: 10,
                available: 4
            }
            .to_string(),
            "unexpected EOF: need 10 bytes, have 4"
        );
        assert_eq!(
            FormatError::DuplicateLink("x".into()).to_string(),
            "duplicate link name: x"
        );
        assert!(FormatError::ChecksumMismatch {
            expected: 1,
            computed: 2
        }
        .to_string()
        .contains("0x00000001"));
    }
}
