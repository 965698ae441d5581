//! Raw data access and element conversion.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

use byteorder::{ByteOrder, LittleEndian};

use crate::bytes::ensure_len;
use crate::data_layout::DataLayout;
use crate::dataspace::Dataspace;
use crate::datatype::{Datatype, DatatypeByteOrder, StringPadding};
use crate::error::FormatError;

/// Read a dataset's raw bytes.
///
/// Unallocated contiguous storage reads as zeros, matching HDF5's default
/// fill value.
pub fn read_raw_data(
    file_data: &[u8],
    layout: &DataLayout,
    dataspace: &Dataspace,
    datatype: &Datatype,
) -> Result<Vec<u8>, FormatError> {
    let expected = dataspace.element_count() * datatype.type_size() as u64;
    match layout {
        DataLayout::Compact { data } => {
            check_storage(expected, data.len() as u64)?;
            Ok(data.clone())
        }
        DataLayout::Contiguous { address: None, size } => {
            check_storage(expected, *size)?;
            Ok(vec![0u8; *size as usize])
        }
        DataLayout::Contiguous {
            address: Some(addr),
            size,
        } => {
            check_storage(expected, *size)?;
            let (start, len) = (*addr as usize, *size as usize);
            ensure_len(file_data, start, len)?;
            let end = start + len;
            Ok(file_data[start..end].to_vec())
        }
    }
}

fn check_storage(expected: u64, actual: u64) -> Result<(), FormatError> {
    if expected != actual {
        return Err(FormatError::StorageSizeMismatch { expected, actual });
    }
    Ok(())
}

fn mismatch(expected: &'static str, datatype: &Datatype) -> FormatError {
    FormatError::TypeMismatch {
        expected,
        actual: String::from(datatype.describe()),
    }
}

/// Split `raw` into elements and convert each one.
///
/// Big-endian numeric types are rejected with `TypeMismatch`.
fn convert<T>(
    raw: &[u8],
    datatype: &Datatype,
    expected: &'static str,
    one: impl Fn(&[u8], &Datatype) -> Option<T>,
) -> Result<Vec<T>, FormatError> {
    if let Datatype::FixedPoint { byte_order, .. } | Datatype::FloatingPoint { byte_order, .. } = datatype {
        if *byte_order != DatatypeByteOrder::LittleEndian {
            return Err(mismatch("little-endian", datatype));
        }
    }
    let size = datatype.type_size() as usize;
    if size == 0 || raw.len() % size != 0 {
        return Err(FormatError::StorageSizeMismatch {
            expected: size as u64,
            actual: raw.len() as u64,
        });
    }
    raw.chunks_exact(size)
        .map(|elem| one(elem, datatype).ok_or_else(|| mismatch(expected, datatype)))
        .collect()
}

fn float_value(bytes: &[u8]) -> Option<f64> {
    match bytes.len() {
        4 => Some(LittleEndian::read_f32(bytes) as f64),
        8 => Some(LittleEndian::read_f64(bytes)),
        _ => None,
    }
}

fn unsigned_value(bytes: &[u8]) -> Option<u64> {
    (1..=8)
        .contains(&bytes.len())
        .then(|| LittleEndian::read_uint(bytes, bytes.len()))
}

fn signed_value(bytes: &[u8]) -> Option<i64> {
    (1..=8)
        .contains(&bytes.len())
        .then(|| LittleEndian::read_int(bytes, bytes.len()))
}

/// Convert numeric elements (float or integer) to `f64`.
pub fn read_as_f64(raw: &[u8], datatype: &Datatype) -> Result<Vec<f64>, FormatError> {
    convert(raw, datatype, "numeric", |b, dt| match dt {
        Datatype::FloatingPoint { .. } => float_value(b),
        Datatype::FixedPoint { signed: true, .. } => signed_value(b).map(|v| v as f64),
        Datatype::FixedPoint { .. } => unsigned_value(b).map(|v| v as f64),
        Datatype::String { .. } => None,
    })
}

/// Convert floating-point elements to `f32`.
pub fn read_as_f32(raw: &[u8], datatype: &Datatype) -> Result<Vec<f32>, FormatError> {
    convert(raw, datatype, "floating point", |b, dt| match dt {
        Datatype::FloatingPoint { .. } => float_value(b).map(|v| v as f32),
        _ => None,
    })
}

/// Convert integer elements to `i64`.
pub fn read_as_i64(raw: &[u8], datatype: &Datatype) -> Result<Vec<i64>, FormatError> {
    convert(raw, datatype, "integer", |b, dt| match dt {
        Datatype::FixedPoint { signed: true, .. } => signed_value(b),
        Datatype::FixedPoint { .. } => unsigned_value(b).and_then(|v| i64::try_from(v).ok()),
        _ => None,
    })
}

/// Convert unsigned integer elements to `u64`.
pub fn read_as_u64(raw: &[u8], datatype: &Datatype) -> Result<Vec<u64>, FormatError> {
    convert(raw, datatype, "unsigned integer", |b, dt| match dt {
        Datatype::FixedPoint { signed: false, .. } => unsigned_value(b),
        _ => None,
    })
}

/// Decode fixed-length string elements, stripping their padding.
pub fn read_as_strings(raw: &[u8], datatype: &Datatype) -> Result<Vec<String>, FormatError> {
    let Datatype::String { size, padding, .. } = datatype else {
        return Err(mismatch("string", datatype));
    };
    if *size == 0 {
        return Ok(Vec::new());
    }
    convert(raw, datatype, "string", |chunk, _| {
        let end = match padding {
            StringPadding::NullTerminate => chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len()),
            StringPadding::NullPad => chunk.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1),
            StringPadding::SpacePad => chunk.iter().rposition(|&b| b != b' ').map_or(0, |p| p + 1),
        };
        Some(String::from_utf8_lossy(&chunk[..end]).into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::CharacterSet;

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn contiguous_read() {
        let mut file = vec![0xEEu8; 16];
        file.extend_from_slice(&f32_bytes(&[1.5, -2.0]));
        let layout = DataLayout::Contiguous {
            address: Some(16),
            size: 8,
        };
        let raw = read_raw_data(&file, &layout, &Dataspace::simple(&[2]), &Datatype::f32()).unwrap();
        assert_eq!(read_as_f32(&raw, &Datatype::f32()).unwrap(), vec![1.5, -2.0]);
        assert_eq!(read_as_f64(&raw, &Datatype::f32()).unwrap(), vec![1.5, -2.0]);
    }

    #[test]
    fn unallocated_reads_zero() {
        let layout = DataLayout::Contiguous {
            address: None,
            size: 16,
        };
        let raw = read_raw_data(&[], &layout, &Dataspace::simple(&[4]), &Datatype::f32()).unwrap();
        assert_eq!(read_as_f32(&raw, &Datatype::f32()).unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn size_disagreement() {
        let layout = DataLayout::Contiguous {
            address: Some(0),
            size: 12,
        };
        assert_eq!(
            read_raw_data(&[0; 64], &layout, &Dataspace::simple(&[4]), &Datatype::f32()),
            Err(FormatError::StorageSizeMismatch {
                expected: 16,
                actual: 12
            })
        );
    }

    #[test]
    fn past_end_of_file() {
        let layout = DataLayout::Contiguous {
            address: Some(60),
            size: 8,
        };
        assert!(matches!(
            read_raw_data(&[0; 64], &layout, &Dataspace::simple(&[2]), &Datatype::f32()),
            Err(FormatError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn address_overflow_is_eof() {
        let layout = DataLayout::Contiguous {
            address: Some(u64::MAX - 4),
            size: 8,
        };
        assert_eq!(
            read_raw_data(&[0; 64], &layout, &Dataspace::simple(&[2]), &Datatype::f32()),
            Err(FormatError::UnexpectedEof {
                expected: usize::MAX,
                available: 64
            })
        );
    }

    #[test]
    fn big_endian_rejected() {
        let mut message = Datatype::f64().serialize();
        message[1] |= 0x01;
        let (be, _) = Datatype::parse(&message).unwrap();
        assert_eq!(
            read_as_f64(&1.0f64.to_be_bytes(), &be),
            Err(FormatError::TypeMismatch {
                expected: "little-endian",
                actual: "f64".into()
            })
        );
        let mut message = Datatype::integer(4, true).serialize();
        message[1] |= 0x01;
        let (be, _) = Datatype::parse(&message).unwrap();
        assert!(matches!(
            read_as_i64(&7i32.to_be_bytes(), &be),
            Err(FormatError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn integers() {
        let raw: Vec<u8> = [-3i64, 7].iter().flat_map(|v| v.to_le_bytes()).collect();
        let i64_t = Datatype::integer(8, true);
        assert_eq!(read_as_i64(&raw, &i64_t).unwrap(), vec![-3, 7]);
        assert_eq!(read_as_f64(&raw, &i64_t).unwrap(), vec![-3.0, 7.0]);
        assert!(matches!(
            read_as_u64(&raw, &i64_t),
            Err(FormatError::TypeMismatch { .. })
        ));
        let u64_t = Datatype::integer(8, false);
        assert_eq!(read_as_u64(&42u64.to_le_bytes(), &u64_t).unwrap(), vec![42]);
    }

    #[test]
    fn strings_strip_padding() {
        let dt = Datatype::fixed_string(6, CharacterSet::Ascii);
        let raw = b"Yee\0\0\0Boris\0";
        assert_eq!(
            read_as_strings(raw, &dt).unwrap(),
            vec!["Yee".to_string(), "Boris".to_string()]
        );
        assert!(matches!(
            read_as_f64(raw, &dt),
            Err(FormatError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn float_as_string_is_mismatch() {
        assert_eq!(
            read_as_strings(&[0; 8], &Datatype::f64()),
            Err(FormatError::TypeMismatch {
                expected: "string",
                actual: "f64".into()
            })
        );
    }
}
