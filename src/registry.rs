//! Known VEXnet packet types.
//!
//! The registry is a fixed table of [`PacketType`] descriptors, each mapping a
//! wire type code to the nominal payload size and checksum policy of that
//! packet. Declaration order matters: when two descriptors share a code, the
//! one declared first wins a plain [`PacketType::lookup`].

use crate::packet::Packet;

/// VEXnet packet type codes.
///
/// Note that [`JOY_STATUS_REQUEST`](codes::JOY_STATUS_REQUEST) and
/// [`JOY_VERSION_RESPONSE`](codes::JOY_VERSION_RESPONSE) share the same code.
pub mod codes {
    pub const LCD_UPDATE: u8 = 0x1E;
    pub const LCD_UPDATE_RESPONSE: u8 = 0x16;
    pub const JOY_STATUS_REQUEST: u8 = 0x3B;
    pub const JOY_STATUS_RESPONSE: u8 = 0x39;
    pub const JOY_VERSION_REQUEST: u8 = 0x3A;
    pub const JOY_VERSION_RESPONSE: u8 = 0x3B;
}

/// A registry entry describing one known packet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketType {
    /// Human readable name of the packet type.
    pub name: &'static str,

    /// Type byte sent after the sync header.
    pub code: u8,

    /// Nominal number of payload bytes. `0` for request-only packets.
    pub size: u8,

    /// Whether a trailing checksum byte follows the payload on the wire.
    pub checksum: bool,
}

impl PacketType {
    pub const LCD_UPDATE: Self = Self::new("LCD_UPDATE", codes::LCD_UPDATE, 17, true);
    pub const LCD_UPDATE_RESPONSE: Self =
        Self::new("LCD_UPDATE_RESPONSE", codes::LCD_UPDATE_RESPONSE, 1, true);
    pub const JOY_STATUS_REQUEST: Self =
        Self::new("JOY_STATUS_REQUEST", codes::JOY_STATUS_REQUEST, 0, true);
    pub const JOY_STATUS_RESPONSE: Self =
        Self::new("JOY_STATUS_RESPONSE", codes::JOY_STATUS_RESPONSE, 9, true);
    pub const JOY_VERSION_REQUEST: Self =
        Self::new("JOY_VERSION_REQUEST", codes::JOY_VERSION_REQUEST, 0, true);
    pub const JOY_VERSION_RESPONSE: Self =
        Self::new("JOY_VERSION_RESPONSE", codes::JOY_VERSION_RESPONSE, 2, false);

    const fn new(name: &'static str, code: u8, size: u8, checksum: bool) -> Self {
        Self {
            name,
            code,
            size,
            checksum,
        }
    }

    /// Value of the size byte this packet type produces on the wire.
    ///
    /// Packets without a payload have no size byte; this returns `0` for them.
    pub const fn wire_size(&self) -> u8 {
        if self.size == 0 {
            0
        } else {
            self.size.wrapping_add(self.checksum as u8)
        }
    }

    /// Returns every descriptor declared for `code`, in declaration order.
    pub fn variants(code: u8) -> impl Iterator<Item = &'static PacketType> {
        PACKET_TYPES.iter().filter(move |ty| ty.code == code)
    }

    /// Finds the first descriptor declared for `code`.
    pub fn lookup(code: u8) -> Option<&'static PacketType> {
        Self::lookup_min_size(code, 0)
    }

    /// Finds the first descriptor for `code` able to hold `min_size` payload bytes.
    pub fn lookup_min_size(code: u8, min_size: u8) -> Option<&'static PacketType> {
        Self::variants(code).find(|ty| ty.size >= min_size)
    }

    /// Finds the payload-carrying descriptor for `code` whose size byte equals `size_byte`.
    pub fn lookup_wire_size(code: u8, size_byte: u8) -> Option<&'static PacketType> {
        Self::variants(code).find(|ty| ty.size != 0 && ty.wire_size() == size_byte)
    }

    /// Finds the descriptor a packet most likely belongs to.
    pub fn of(packet: &Packet) -> Option<&'static PacketType> {
        Self::lookup_min_size(packet.code(), packet.payload_size())
    }
}

/// Every known packet type, in declaration order.
pub const PACKET_TYPES: [PacketType; 6] = [
    PacketType::LCD_UPDATE,
    PacketType::LCD_UPDATE_RESPONSE,
    PacketType::JOY_STATUS_REQUEST,
    PacketType::JOY_STATUS_RESPONSE,
    PacketType::JOY_VERSION_REQUEST,
    PacketType::JOY_VERSION_RESPONSE,
];

#[cfg(test)]
mod tests {
    use super::{codes, PacketType};
    use crate::packet::Packet;

    #[test]
    fn lookup_known() {
        let ty = PacketType::lookup(codes::JOY_STATUS_RESPONSE).unwrap();
        assert_eq!(*ty, PacketType::JOY_STATUS_RESPONSE);
        assert_eq!(ty.size, 9);
        assert!(ty.checksum);

        assert_eq!(PacketType::lookup(0x00), None);
    }

    #[test]
    fn shared_code_prefers_declaration_order() {
        assert_eq!(
            PacketType::lookup(0x3B),
            Some(&PacketType::JOY_STATUS_REQUEST)
        );
        assert_eq!(
            PacketType::lookup_min_size(0x3B, 1),
            Some(&PacketType::JOY_VERSION_RESPONSE)
        );
        assert_eq!(PacketType::lookup_min_size(0x3B, 3), None);
        assert_eq!(PacketType::variants(0x3B).count(), 2);
    }

    #[test]
    fn wire_size_accounts_for_checksum() {
        assert_eq!(PacketType::LCD_UPDATE.wire_size(), 18);
        assert_eq!(PacketType::JOY_VERSION_RESPONSE.wire_size(), 2);
        assert_eq!(PacketType::JOY_VERSION_REQUEST.wire_size(), 0);

        assert_eq!(
            PacketType::lookup_wire_size(0x3B, 2),
            Some(&PacketType::JOY_VERSION_RESPONSE)
        );
        assert_eq!(PacketType::lookup_wire_size(0x3B, 1), None);
        assert_eq!(
            PacketType::lookup_wire_size(codes::LCD_UPDATE, 17),
            None
        );
    }

    #[test]
    fn type_of_packet() {
        let version = Packet::new(0x3B, vec![1, 2], false).unwrap();
        assert_eq!(
            PacketType::of(&version),
            Some(&PacketType::JOY_VERSION_RESPONSE)
        );

        let unknown = Packet::new(0x42, vec![1], true).unwrap();
        assert_eq!(PacketType::of(&unknown), None);
    }
}
