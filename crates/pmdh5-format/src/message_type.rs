//! Object header message type identifiers.

macro_rules! message_types {
    ($($(#[$doc:meta])* $name:ident = $id:literal,)+) => {
        /// Header message types this crate reads or writes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum MessageType {
            $($(#[$doc])* $name,)+
            /// Any other message type, with its raw type ID.
            Unknown(u16),
        }

        impl MessageType {
            pub fn from_u16(val: u16) -> MessageType {
                match val {
                    $($id => MessageType::$name,)+
                    other => MessageType::Unknown(other),
                }
            }

            pub fn to_u16(self) -> u16 {
                match self {
                    $(MessageType::$name => $id,)+
                    MessageType::Unknown(v) => v,
                }
            }
        }
    };
}

message_types! {
    /// Padding; skipped.
    Nil = 0x0000,
    Dataspace = 0x0001,
    LinkInfo = 0x0002,
    Datatype = 0x0003,
    FillValue = 0x0005,
    Link = 0x0006,
    DataLayout = 0x0008,
    GroupInfo = 0x000A,
    Attribute = 0x000C,
    /// Splits a header over several chunks; the reader rejects it.
    ObjectHeaderContinuation = 0x0010,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_round_trip() {
        for id in [0x00u16, 0x01, 0x02, 0x03, 0x05, 0x06, 0x08, 0x0A, 0x0C, 0x10] {
            let t = MessageType::from_u16(id);
            assert!(!matches!(t, MessageType::Unknown(_)), "{id:#x}");
            assert_eq!(t.to_u16(), id);
        }
    }

    #[test]
    fn unknown_keeps_raw_id() {
        assert_eq!(MessageType::from_u16(0x000B), MessageType::Unknown(0x000B));
        assert_eq!(MessageType::Unknown(0x0017).to_u16(), 0x0017);
    }
}
