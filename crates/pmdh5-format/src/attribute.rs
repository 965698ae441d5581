//! HDF5 Attribute message (message type 0x000C).

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::bytes::{ensure_len, read_u16};
use crate::data_read;
use crate::dataspace::Dataspace;
use crate::datatype::Datatype;
use crate::error::FormatError;
use crate::message_type::MessageType;
use crate::object_header::ObjectHeader;

/// A named value attached to a group or dataset header.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMessage {
    pub name: String,
    pub datatype: Datatype,
    pub dataspace: Dataspace,
    /// Packed little-endian element bytes.
    pub raw_data: Vec<u8>,
}

fn pad8(x: usize) -> usize {
    (x + 7) & !7
}

impl AttributeMessage {
    /// Parse an attribute message of version 1, 2 or 3.
    pub fn parse(data: &[u8], length_size: u8) -> Result<AttributeMessage, FormatError> {
        ensure_len(data, 0, 8)?;
        let version = data[0];
        let name_size = read_u16(data, 2)? as usize;
        let datatype_size = read_u16(data, 4)? as usize;
        let dataspace_size = read_u16(data, 6)? as usize;

        // Version 1 pads each field to eight bytes; version 3 adds a
        // name-encoding byte before the name.
        let (mut pos, padded) = match version {
            1 => (8, true),
            2 => (8, false),
            3 => {
                ensure_len(data, 0, 9)?;
                (9, false)
            }
            other => return Err(FormatError::InvalidAttributeVersion(other)),
        };
        let step = |n: usize| if padded { pad8(n) } else { n };

        ensure_len(data, pos, name_size)?;
        let name = extract_name(&data[pos..pos + name_size]);
        pos += step(name_size);

        ensure_len(data, pos, datatype_size)?;
        let (datatype, _) = Datatype::parse(&data[pos..pos + datatype_size])?;
        pos += step(datatype_size);

        ensure_len(data, pos, dataspace_size)?;
        let dataspace = Dataspace::parse(&data[pos..pos + dataspace_size], length_size)?;
        pos += step(dataspace_size);

        let value_len = (dataspace.element_count() * datatype.type_size() as u64) as usize;
        ensure_len(data, pos, value_len)?;
        let raw_data = data[pos..pos + value_len].to_vec();

        Ok(AttributeMessage {
            name,
            datatype,
            dataspace,
            raw_data,
        })
    }

    /// Encode as a version 2 attribute message (unpadded fields).
    pub fn serialize(&self, length_size: u8) -> Result<Vec<u8>, FormatError> {
        let dt_bytes = self.datatype.serialize();
        let ds_bytes = self.dataspace.serialize(length_size);
        let name_len = self.name.len() + 1;
        if name_len > u16::MAX as usize {
            return Err(FormatError::MessageTooLarge(name_len));
        }

        let mut buf =
            Vec::with_capacity(8 + name_len + dt_bytes.len() + ds_bytes.len() + self.raw_data.len());
        buf.push(2);
        buf.push(0);
        buf.extend_from_slice(&(name_len as u16).to_le_bytes());
        buf.extend_from_slice(&(dt_bytes.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(ds_bytes.len() as u16).to_le_bytes());
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(0);
        buf.extend_from_slice(&dt_bytes);
        buf.extend_from_slice(&ds_bytes);
        buf.extend_from_slice(&self.raw_data);
        Ok(buf)
    }

    pub fn read_as_f64(&self) -> Result<Vec<f64>, FormatError> {
        data_read::read_as_f64(&self.raw_data, &self.datatype)
    }

    pub fn read_as_i64(&self) -> Result<Vec<i64>, FormatError> {
        data_read::read_as_i64(&self.raw_data, &self.datatype)
    }

    pub fn read_as_u64(&self) -> Result<Vec<u64>, FormatError> {
        data_read::read_as_u64(&self.raw_data, &self.datatype)
    }

    /// Fixed-length string elements, padding stripped.
    pub fn read_as_strings(&self) -> Result<Vec<String>, FormatError> {
        data_read::read_as_strings(&self.raw_data, &self.datatype)
    }
}

fn extract_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Collect the compact attribute messages of an object header, in header order.
pub fn extract_attributes(
    header: &ObjectHeader,
    length_size: u8,
) -> Result<Vec<AttributeMessage>, FormatError> {
    header
        .messages
        .iter()
        .filter(|m| m.msg_type == MessageType::Attribute)
        .map(|m| AttributeMessage::parse(&m.data, length_size))
        .collect()
}

/// Find an attribute by name.
pub fn find_attribute<'a>(attrs: &'a [AttributeMessage], name: &str) -> Option<&'a AttributeMessage> {
    attrs.iter().find(|a| a.name == name)
}
