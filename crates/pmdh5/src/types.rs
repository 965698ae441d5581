//! Simplified type representations for the high-level API.

use std::collections::HashMap;
use std::fmt;

use pmdh5_format::attribute::AttributeMessage;
use pmdh5_format::datatype::Datatype;
pub use pmdh5_format::type_builders::AttrValue;

/// Simplified datatype enum for the high-level API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DType {
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    String,
    Other(String),
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
            DType::I8 => write!(f, "i8"),
            DType::I16 => write!(f, "i16"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
            DType::U8 => write!(f, "u8"),
            DType::U16 => write!(f, "u16"),
            DType::U32 => write!(f, "u32"),
            DType::U64 => write!(f, "u64"),
            DType::String => write!(f, "string"),
            DType::Other(desc) => write!(f, "other({desc})"),
        }
    }
}

/// Convert a low-level `Datatype` to a simplified `DType`.
pub(crate) fn classify_datatype(dt: &Datatype) -> DType {
    match dt {
        Datatype::FloatingPoint { size: 4, .. } => DType::F32,
        Datatype::FloatingPoint { size: 8, .. } => DType::F64,
        Datatype::FloatingPoint { size, .. } => DType::Other(format!("float{}", size * 8)),
        Datatype::FixedPoint { size, signed, .. } => match (size, signed) {
            (1, true) => DType::I8,
            (2, true) => DType::I16,
            (4, true) => DType::I32,
            (8, true) => DType::I64,
            (1, false) => DType::U8,
            (2, false) => DType::U16,
            (4, false) => DType::U32,
            (8, false) => DType::U64,
            (size, signed) => {
                let prefix = if *signed { "i" } else { "u" };
                DType::Other(format!("{prefix}{}", size * 8))
            }
        },
        Datatype::String { .. } => DType::String,
    }
}

/// Read attribute messages into a `HashMap<String, AttrValue>`.
///
/// Best-effort: attributes that can't be decoded are skipped.
pub(crate) fn attrs_to_map(attrs: &[AttributeMessage]) -> HashMap<String, AttrValue> {
    attrs
        .iter()
        .filter_map(|attr| decode_attr_value(attr).map(|v| (attr.name.clone(), v)))
        .collect()
}

/// Scalar dataspaces decode to scalar variants, everything else to arrays.
fn decode_attr_value(attr: &AttributeMessage) -> Option<AttrValue> {
    let scalar = attr.dataspace.rank() == 0;
    match &attr.datatype {
        Datatype::FloatingPoint { .. } => {
            let vals = attr.read_as_f64().ok()?;
            match (scalar, vals.as_slice()) {
                (true, [v]) => Some(AttrValue::F64(*v)),
                _ => Some(AttrValue::F64Array(vals)),
            }
        }
        Datatype::FixedPoint { signed: true, .. } => {
            let vals = attr.read_as_i64().ok()?;
            match (scalar, vals.as_slice()) {
                (true, [v]) => Some(AttrValue::I64(*v)),
                _ => Some(AttrValue::I64Array(vals)),
            }
        }
        Datatype::FixedPoint { signed: false, .. } => {
            let vals = attr.read_as_u64().ok()?;
            match (scalar, vals.as_slice()) {
                (true, [v]) => Some(AttrValue::U64(*v)),
                // No U64Array variant, store as I64Array
                _ => Some(AttrValue::I64Array(vals.iter().map(|&v| v as i64).collect())),
            }
        }
        Datatype::String { .. } => {
            let mut strings = attr.read_as_strings().ok()?;
            match (scalar, strings.len()) {
                (true, 1) => strings.pop().map(AttrValue::String),
                _ => Some(AttrValue::StringArray(strings)),
            }
        }
    }
}
