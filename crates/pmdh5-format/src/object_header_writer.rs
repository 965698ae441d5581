//! Version 2 object header writer.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::checksum::jenkins_lookup3;
use crate::error::FormatError;
use crate::message_type::MessageType;
use crate::object_header::OHDR_SIGNATURE;

/// Accumulates header messages and emits a single-chunk `OHDR` block.
///
/// The encoded size depends only on the messages, never on where the
/// header is placed, which lets the file writer lay out addresses first.
#[derive(Debug, Default)]
pub struct ObjectHeaderWriter {
    messages: Vec<(MessageType, Vec<u8>, u8)>,
}

impl ObjectHeaderWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message with flags 0.
    pub fn add_message(&mut self, msg_type: MessageType, data: Vec<u8>) {
        self.messages.push((msg_type, data, 0));
    }

    /// Add a message with explicit message flags (0x01 = constant).
    pub fn add_message_with_flags(&mut self, msg_type: MessageType, data: Vec<u8>, flags: u8) {
        self.messages.push((msg_type, data, flags));
    }

    /// Encode signature, prefix, messages and checksum.
    pub fn serialize(&self) -> Result<Vec<u8>, FormatError> {
        let mut body_len = 0usize;
        for (_, data, _) in &self.messages {
            if data.len() > u16::MAX as usize {
                return Err(FormatError::MessageTooLarge(data.len()));
            }
            body_len += 4 + data.len();
        }

        // Flags bits 0-1 select the width of the chunk-0 size field.
        let (flags, width) = match body_len {
            0..=0xFF => (0u8, 1usize),
            0x100..=0xFFFF => (1, 2),
            _ => (2, 4),
        };

        let mut buf = Vec::with_capacity(6 + width + body_len + 4);
        buf.extend_from_slice(&OHDR_SIGNATURE);
        buf.push(2);
        buf.push(flags);
        buf.extend_from_slice(&(body_len as u32).to_le_bytes()[..width]);
        for (msg_type, data, msg_flags) in &self.messages {
            buf.push(msg_type.to_u16() as u8);
            buf.extend_from_slice(&(data.len() as u16).to_le_bytes());
            buf.push(*msg_flags);
            buf.extend_from_slice(data);
        }
        let sum = jenkins_lookup3(&buf);
        buf.extend_from_slice(&sum.to_le_bytes());
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_header::ObjectHeader;

    #[test]
    fn empty_header() {
        let bytes = ObjectHeaderWriter::new().serialize().unwrap();
        assert_eq!(bytes.len(), 4 + 2 + 1 + 4);
        assert_eq!(bytes[6], 0);
        assert!(ObjectHeader::parse(&bytes, 0).unwrap().messages.is_empty());
    }

    #[test]
    fn chunk_size_width_grows() {
        let mut w = ObjectHeaderWriter::new();
        w.add_message(MessageType::Attribute, vec![0xAA; 300]);
        let bytes = w.serialize().unwrap();
        assert_eq!(bytes[5] & 0x03, 1);
        assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 304);
        assert_eq!(ObjectHeader::parse(&bytes, 0).unwrap().messages[0].data.len(), 300);

        let mut w = ObjectHeaderWriter::new();
        for _ in 0..3 {
            w.add_message(MessageType::Attribute, vec![1; 30_000]);
        }
        let bytes = w.serialize().unwrap();
        assert_eq!(bytes[5] & 0x03, 2);
        assert_eq!(ObjectHeader::parse(&bytes, 0).unwrap().messages.len(), 3);
    }

    #[test]
    fn oversized_message_rejected() {
        let mut w = ObjectHeaderWriter::new();
        w.add_message(MessageType::Attribute, vec![0; 70_000]);
        assert_eq!(w.serialize(), Err(FormatError::MessageTooLarge(70_000)));
    }

    #[test]
    fn placed_at_offset() {
        let mut w = ObjectHeaderWriter::new();
        w.add_message(MessageType::GroupInfo, vec![0, 0]);
        let mut file = vec![0u8; 100];
        file.extend_from_slice(&w.serialize().unwrap());
        let hdr = ObjectHeader::parse(&file, 100).unwrap();
        assert_eq!(hdr.messages[0].msg_type, MessageType::GroupInfo);
    }
}
