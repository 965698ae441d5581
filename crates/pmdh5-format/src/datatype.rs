//! HDF5 Datatype message (message type 0x0003).
//!
//! Fixed-point, IEEE floating-point and fixed-length string classes are
//! supported, which covers every element type the file writer emits.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::bytes::{ensure_len, read_u16, read_u32};
use crate::error::FormatError;

/// Byte order of numeric data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatatypeByteOrder {
    LittleEndian,
    BigEndian,
}

/// String padding type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringPadding {
    NullTerminate,
    NullPad,
    SpacePad,
}

/// Character set encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    Ascii,
    Utf8,
}

impl CharacterSet {
    /// ASCII when every byte of `s` is ASCII, UTF-8 otherwise.
    pub fn for_text(s: &str) -> CharacterSet {
        if s.is_ascii() {
            CharacterSet::Ascii
        } else {
            CharacterSet::Utf8
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            CharacterSet::Ascii => 0,
            CharacterSet::Utf8 => 1,
        }
    }

    fn from_bits(val: u8) -> Result<CharacterSet, FormatError> {
        match val {
            0 => Ok(CharacterSet::Ascii),
            1 => Ok(CharacterSet::Utf8),
            _ => Err(FormatError::InvalidCharacterSet(val)),
        }
    }
}

impl StringPadding {
    fn to_bits(self) -> u8 {
        match self {
            StringPadding::NullTerminate => 0,
            StringPadding::NullPad => 1,
            StringPadding::SpacePad => 2,
        }
    }

    fn from_bits(val: u8) -> Result<StringPadding, FormatError> {
        match val {
            0 => Ok(StringPadding::NullTerminate),
            1 => Ok(StringPadding::NullPad),
            2 => Ok(StringPadding::SpacePad),
            _ => Err(FormatError::InvalidStringPadding(val)),
        }
    }
}

/// Parsed HDF5 datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datatype {
    /// Class 0: integers.
    FixedPoint {
        size: u32,
        byte_order: DatatypeByteOrder,
        signed: bool,
        bit_offset: u16,
        bit_precision: u16,
    },
    /// Class 1: floating point.
    FloatingPoint {
        size: u32,
        byte_order: DatatypeByteOrder,
        sign_location: u8,
        bit_offset: u16,
        bit_precision: u16,
        exponent_location: u8,
        exponent_size: u8,
        mantissa_location: u8,
        mantissa_size: u8,
        exponent_bias: u32,
    },
    /// Class 3: fixed-length string.
    String {
        size: u32,
        padding: StringPadding,
        charset: CharacterSet,
    },
}

impl Datatype {
    /// IEEE 754 binary32, little-endian.
    pub fn f32() -> Datatype {
        Datatype::FloatingPoint {
            size: 4,
            byte_order: DatatypeByteOrder::LittleEndian,
            sign_location: 31,
            bit_offset: 0,
            bit_precision: 32,
            exponent_location: 23,
            exponent_size: 8,
            mantissa_location: 0,
            mantissa_size: 23,
            exponent_bias: 127,
        }
    }

    /// IEEE 754 binary64, little-endian.
    pub fn f64() -> Datatype {
        Datatype::FloatingPoint {
            size: 8,
            byte_order: DatatypeByteOrder::LittleEndian,
            sign_location: 63,
            bit_offset: 0,
            bit_precision: 64,
            exponent_location: 52,
            exponent_size: 11,
            mantissa_location: 0,
            mantissa_size: 52,
            exponent_bias: 1023,
        }
    }

    /// Little-endian integer of `size` bytes.
    pub fn integer(size: u32, signed: bool) -> Datatype {
        Datatype::FixedPoint {
            size,
            byte_order: DatatypeByteOrder::LittleEndian,
            signed,
            bit_offset: 0,
            bit_precision: (size * 8) as u16,
        }
    }

    /// Null-padded fixed-length string of `size` bytes.
    pub fn fixed_string(size: u32, charset: CharacterSet) -> Datatype {
        Datatype::String {
            size,
            padding: StringPadding::NullPad,
            charset,
        }
    }

    /// Size in bytes of one element.
    pub fn type_size(&self) -> u32 {
        match self {
            Datatype::FixedPoint { size, .. }
            | Datatype::FloatingPoint { size, .. }
            | Datatype::String { size, .. } => *size,
        }
    }

    /// Short human-readable name, used in type mismatch errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Datatype::FloatingPoint { size: 4, .. } => "f32",
            Datatype::FloatingPoint { size: 8, .. } => "f64",
            Datatype::FloatingPoint { .. } => "float",
            Datatype::FixedPoint { signed: true, .. } => "signed integer",
            Datatype::FixedPoint { signed: false, .. } => "unsigned integer",
            Datatype::String { .. } => "fixed-length string",
        }
    }

    /// Parse a datatype message, returning it with the bytes consumed.
    pub fn parse(data: &[u8]) -> Result<(Datatype, usize), FormatError> {
        ensure_len(data, 0, 8)?;
        let class_id = data[0] & 0x0F;
        let bf0 = data[1];
        let bf1 = data[2];
        let size = read_u32(data, 4)?;
        let byte_order = if bf0 & 0x01 == 0 {
            DatatypeByteOrder::LittleEndian
        } else {
            DatatypeByteOrder::BigEndian
        };

        match class_id {
            0 => {
                let bit_offset = read_u16(data, 8)?;
                let bit_precision = read_u16(data, 10)?;
                Ok((
                    Datatype::FixedPoint {
                        size,
                        byte_order,
                        signed: bf0 & 0x08 != 0,
                        bit_offset,
                        bit_precision,
                    },
                    12,
                ))
            }
            1 => {
                ensure_len(data, 8, 12)?;
                if bf0 & 0x40 != 0 {
                    // VAX ordering
                    return Err(FormatError::UnsupportedDatatypeClass(class_id));
                }
                Ok((
                    Datatype::FloatingPoint {
                        size,
                        byte_order,
                        sign_location: bf1,
                        bit_offset: read_u16(data, 8)?,
                        bit_precision: read_u16(data, 10)?,
                        exponent_location: data[12],
                        exponent_size: data[13],
                        mantissa_location: data[14],
                        mantissa_size: data[15],
                        exponent_bias: read_u32(data, 16)?,
                    },
                    20,
                ))
            }
            3 => Ok((
                Datatype::String {
                    size,
                    padding: StringPadding::from_bits(bf0 & 0x0F)?,
                    charset: CharacterSet::from_bits((bf0 >> 4) & 0x0F)?,
                },
                8,
            )),
            other => Err(FormatError::UnsupportedDatatypeClass(other)),
        }
    }

    /// Encode as a version 1 datatype message.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Datatype::FixedPoint {
                size,
                byte_order,
                signed,
                bit_offset,
                bit_precision,
            } => {
                let mut bf0 = 0u8;
                if *byte_order == DatatypeByteOrder::BigEndian {
                    bf0 |= 0x01;
                }
                if *signed {
                    bf0 |= 0x08;
                }
                let mut buf = header(0, [bf0, 0, 0], *size);
                buf.extend_from_slice(&bit_offset.to_le_bytes());
                buf.extend_from_slice(&bit_precision.to_le_bytes());
                buf
            }
            Datatype::FloatingPoint {
                size,
                byte_order,
                sign_location,
                bit_offset,
                bit_precision,
                exponent_location,
                exponent_size,
                mantissa_location,
                mantissa_size,
                exponent_bias,
            } => {
                // Mantissa normalization 2: the leading one is implied.
                let mut bf0 = 0x20u8;
                if *byte_order == DatatypeByteOrder::BigEndian {
                    bf0 |= 0x01;
                }
                let mut buf = header(1, [bf0, *sign_location, 0], *size);
                buf.extend_from_slice(&bit_offset.to_le_bytes());
                buf.extend_from_slice(&bit_precision.to_le_bytes());
                buf.extend_from_slice(&[
                    *exponent_location,
                    *exponent_size,
                    *mantissa_location,
                    *mantissa_size,
                ]);
                buf.extend_from_slice(&exponent_bias.to_le_bytes());
                buf
            }
            Datatype::String {
                size,
                padding,
                charset,
            } => header(3, [padding.to_bits() | (charset.to_bits() << 4), 0, 0], *size),
        }
    }
}

fn header(class: u8, bf: [u8; 3], size: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(20);
    buf.push((1 << 4) | (class & 0x0F));
    buf.extend_from_slice(&bf);
    buf.extend_from_slice(&size.to_le_bytes());
    buf
}
