//! HDF5 version 2 object header parsing.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::bytes::{ensure_len, read_u16, read_uint};
use crate::checksum::verify_trailing;
use crate::error::FormatError;
use crate::message_type::MessageType;

pub(crate) const OHDR_SIGNATURE: [u8; 4] = *b"OHDR";

// Object header flag bits.
pub(crate) const CHUNK0_SIZE_MASK: u8 = 0x03;
pub(crate) const ATTR_CREATION_ORDER_TRACKED: u8 = 0x04;
pub(crate) const ATTR_PHASE_CHANGE_STORED: u8 = 0x10;
pub(crate) const TIMES_STORED: u8 = 0x20;

/// Message flag bit: fail if the message type is not understood.
const MSG_FAIL_IF_UNKNOWN: u8 = 0x08;

/// A single header message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMessage {
    pub msg_type: MessageType,
    pub flags: u8,
    pub data: Vec<u8>,
}

/// Parsed object header: every non-Nil message of its single chunk, in
/// file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHeader {
    pub flags: u8,
    pub messages: Vec<HeaderMessage>,
    /// Modification time in seconds since the epoch, when times are stored.
    pub modification_time: Option<u32>,
}

impl ObjectHeader {
    /// Parse the v2 object header at `offset` and verify its checksum.
    ///
    /// Headers split over continuation chunks fail with `UnsupportedMessage`.
    pub fn parse(data: &[u8], offset: usize) -> Result<ObjectHeader, FormatError> {
        ensure_len(data, offset, 6)?;
        if data[offset..offset + 4] != OHDR_SIGNATURE {
            return Err(FormatError::InvalidObjectHeaderSignature);
        }
        let version = data[offset + 4];
        if version != 2 {
            return Err(FormatError::InvalidObjectHeaderVersion(version));
        }
        let flags = data[offset + 5];
        let mut pos = offset + 6;

        let mut modification_time = None;
        if flags & TIMES_STORED != 0 {
            ensure_len(data, pos, 16)?;
            modification_time = Some(read_uint(data, pos + 4, 4)? as u32);
            pos += 16;
        }
        if flags & ATTR_PHASE_CHANGE_STORED != 0 {
            ensure_len(data, pos, 4)?;
            pos += 4;
        }

        let width = 1u8 << (flags & CHUNK0_SIZE_MASK);
        let chunk0_size = read_uint(data, pos, width)? as usize;
        pos += width as usize;

        let chunk0_end = pos + chunk0_size;
        ensure_len(data, chunk0_end, 4)?;
        verify_trailing(&data[offset..chunk0_end + 4])
            .map_err(|(expected, computed)| FormatError::ChecksumMismatch { expected, computed })?;

        let prefix = if flags & ATTR_CREATION_ORDER_TRACKED != 0 { 6 } else { 4 };
        let messages = parse_messages(data, pos, chunk0_end, prefix)?;

        Ok(ObjectHeader {
            flags,
            messages,
            modification_time,
        })
    }

    /// First message of the given type.
    pub fn find(&self, msg_type: MessageType) -> Option<&HeaderMessage> {
        self.messages.iter().find(|m| m.msg_type == msg_type)
    }

    /// All messages of the given type, in order.
    pub fn find_all(&self, msg_type: MessageType) -> impl Iterator<Item = &HeaderMessage> {
        self.messages.iter().filter(move |m| m.msg_type == msg_type)
    }
}

fn parse_messages(
    data: &[u8],
    start: usize,
    end: usize,
    prefix: usize,
) -> Result<Vec<HeaderMessage>, FormatError> {
    let mut messages = Vec::new();
    let mut pos = start;

    // Trailing space smaller than a message prefix is a gap.
    while pos + prefix <= end {
        let msg_type = MessageType::from_u16(data[pos] as u16);
        let size = read_u16(data, pos + 1)? as usize;
        let flags = data[pos + 3];
        pos += prefix;
        if pos + size > end {
            return Err(FormatError::UnexpectedEof {
                expected: pos + size,
                available: end,
            });
        }
        let body = &data[pos..pos + size];
        pos += size;

        match msg_type {
            MessageType::Nil => {}
            MessageType::ObjectHeaderContinuation => {
                return Err(FormatError::UnsupportedMessage(msg_type.to_u16()));
            }
            MessageType::Unknown(id) if flags & MSG_FAIL_IF_UNKNOWN != 0 => {
                return Err(FormatError::UnsupportedMessage(id));
            }
            _ => messages.push(HeaderMessage {
                msg_type,
                flags,
                data: body.to_vec(),
            }),
        }
    }
    Ok(messages)
}
