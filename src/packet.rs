//! The VEXnet packet value type.

use std::fmt;

use thiserror::Error;

use crate::{
    encode::{Encode, MessageEncoder},
    registry::PacketType,
    SYNC_HEADER,
};

/// Computes the checksum byte for a payload.
///
/// The accumulator starts at zero and every payload byte is subtracted from it
/// with 8-bit wraparound, so the payload bytes and the checksum always sum to
/// zero (mod 256).
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, byte| acc.wrapping_sub(*byte))
}

/// A single VEXnet frame.
///
/// # Encoding
///
/// | Field      | Size | Description |
/// |------------|------|-------------|
/// | `header`   | 2    | Always [`SYNC_HEADER`]. |
/// | `code`     | 1    | Packet type code. See [`codes`](crate::registry::codes). |
/// | `size`     | 0–1  | Payload size, plus one if a checksum follows. Omitted for empty payloads. |
/// | `payload`  | n    | Payload bytes. |
/// | `checksum` | 0–1  | See [`checksum`]. Omitted for empty payloads and unchecked packets. |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawPacket")
)]
pub struct Packet {
    code: u8,
    payload: Vec<u8>,
    checksum: bool,
}

impl Packet {
    /// Largest payload a single packet can carry.
    pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

    /// Creates a packet from raw parts.
    ///
    /// # Errors
    ///
    /// Returns [`PacketSizeError`] if the payload is longer than
    /// [`Packet::MAX_PAYLOAD_SIZE`].
    pub fn new(
        code: u8,
        payload: impl Into<Vec<u8>>,
        checksum: bool,
    ) -> Result<Self, PacketSizeError> {
        let payload = payload.into();
        if payload.len() > Self::MAX_PAYLOAD_SIZE {
            return Err(PacketSizeError {
                input_size: payload.len(),
                max_size: Self::MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Self {
            code,
            payload,
            checksum,
        })
    }

    /// Creates a packet with a zeroed payload of `size` bytes.
    pub fn zeroed(code: u8, size: u8, checksum: bool) -> Self {
        Self {
            code,
            payload: vec![0; size as usize],
            checksum,
        }
    }

    /// Creates a packet of a known type with a zeroed payload of its nominal size.
    pub fn from_type(ty: &PacketType) -> Self {
        Self::zeroed(ty.code, ty.size, ty.checksum)
    }

    /// Creates a packet of a known type carrying `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`PacketSizeError`] if the payload is longer than
    /// [`Packet::MAX_PAYLOAD_SIZE`].
    pub fn with_payload(
        ty: &PacketType,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Self, PacketSizeError> {
        Self::new(ty.code, payload, ty.checksum)
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    /// Number of payload bytes.
    pub fn payload_size(&self) -> u8 {
        // Never truncates: the payload length is checked on every path that sets it.
        self.payload.len() as u8
    }

    /// Resizes the payload, truncating it or padding it with zeroes.
    pub fn set_payload_size(&mut self, size: u8) {
        self.payload.resize(size as usize, 0);
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Mutable access to the payload bytes. The payload size cannot change through this.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Whether a checksum byte is appended to the payload on the wire.
    pub fn includes_checksum(&self) -> bool {
        self.checksum
    }

    pub fn set_includes_checksum(&mut self, checksum: bool) {
        self.checksum = checksum;
    }

    /// The checksum byte of this packet's payload.
    pub fn checksum(&self) -> u8 {
        checksum(&self.payload)
    }

    /// Looks up the registry entry this packet belongs to, if any.
    pub fn packet_type(&self) -> Option<&'static PacketType> {
        PacketType::of(self)
    }
}

/// Unvalidated packet fields, checked by [`Packet::new`] on deserialization.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPacket {
    code: u8,
    payload: Vec<u8>,
    checksum: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPacket> for Packet {
    type Error = PacketSizeError;

    fn try_from(raw: RawPacket) -> Result<Self, Self::Error> {
        Self::new(raw.code, raw.payload, raw.checksum)
    }
}

impl Encode for Packet {
    fn size(&self) -> usize {
        if self.payload.is_empty() {
            SYNC_HEADER.len() + 1
        } else {
            SYNC_HEADER.len() + 2 + self.payload.len() + self.checksum as usize
        }
    }

    fn encode(&self, data: &mut [u8]) {
        let mut enc = MessageEncoder::new(data);
        enc.write(&SYNC_HEADER);
        enc.write(&self.code);

        // Empty packets end right after the type byte.
        if self.payload.is_empty() {
            return;
        }

        // A 255 byte checked payload wraps its size byte to zero.
        enc.write(&self.payload_size().wrapping_add(self.checksum as u8));
        enc.write(&self.payload.as_slice());

        if self.checksum {
            enc.write(&self.checksum());
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.packet_type().map_or("UNKNOWN_PACKET_TYPE", |ty| ty.name);
        write!(
            f,
            "{name} (type {:#04x}, size {}):",
            self.code,
            self.payload.len()
        )?;

        if self.payload.is_empty() {
            return write!(f, " none");
        }
        for byte in &self.payload {
            write!(f, " {byte:02X}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Payload of {input_size} bytes exceeds the maximum packet payload of {max_size} bytes.")]
pub struct PacketSizeError {
    pub input_size: usize,
    pub max_size: usize,
}

#[cfg(test)]
mod tests {
    use super::{checksum, Packet};
    use crate::{encode::Encode, registry::PacketType};

    #[test]
    fn checksum_cancels_payload() {
        let payload = [0x7F, 0x7F, 0x7F, 0x7F, 0x04, 0x00, 0x7F, 0x7F, 0x7F];
        let sum = payload
            .iter()
            .fold(checksum(&payload), |acc, byte| acc.wrapping_add(*byte));
        assert_eq!(sum, 0);
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0x01]), 0xFF);
    }

    #[test]
    fn empty_packet_is_three_bytes() {
        let packet = Packet::from_type(&PacketType::JOY_VERSION_REQUEST);
        assert_eq!(packet.size(), 3);
        assert_eq!(packet.to_bytes(), vec![0xAA, 0x55, 0x3A]);

        // The checksum flag does not add bytes without a payload.
        let unchecked = Packet::zeroed(0x3A, 0, false);
        assert_eq!(unchecked.to_bytes(), vec![0xAA, 0x55, 0x3A]);
    }

    #[test]
    fn encode_with_and_without_checksum() {
        let checked = Packet::new(0x16, vec![0x05], true).unwrap();
        assert_eq!(checked.to_bytes(), vec![0xAA, 0x55, 0x16, 0x02, 0x05, 0xFB]);

        let unchecked =
            Packet::with_payload(&PacketType::JOY_VERSION_RESPONSE, [0x01, 0x02]).unwrap();
        assert_eq!(unchecked.to_bytes(), vec![0xAA, 0x55, 0x3B, 0x02, 0x01, 0x02]);
    }

    #[test]
    fn max_payload_wraps_size_byte() {
        let packet = Packet::zeroed(0x42, u8::MAX, true);
        let bytes = packet.to_bytes();
        assert_eq!(bytes.len(), 4 + 255 + 1);
        assert_eq!(bytes[3], 0x00);

        assert!(Packet::new(0x42, vec![0; 256], true).is_err());
    }

    #[test]
    fn set_payload_size_reallocates() {
        let mut packet = Packet::new(0x42, vec![1, 2, 3], true).unwrap();

        packet.set_payload_size(1);
        assert_eq!(packet.payload(), &[1]);
        assert_eq!(packet.payload_size(), 1);

        packet.set_payload_size(4);
        assert_eq!(packet.payload(), &[1, 0, 0, 0]);
        assert_eq!(packet.payload_size(), 4);
    }

    #[test]
    fn checksum_flag_is_mutable() {
        let mut packet = Packet::new(0x16, vec![0x05], true).unwrap();

        packet.set_includes_checksum(false);
        assert!(!packet.includes_checksum());
        assert_eq!(packet.to_bytes(), vec![0xAA, 0x55, 0x16, 0x01, 0x05]);

        packet.set_includes_checksum(true);
        assert_eq!(packet.to_bytes(), vec![0xAA, 0x55, 0x16, 0x02, 0x05, 0xFB]);
    }

    #[test]
    fn into_payload_returns_bytes() {
        let packet = Packet::zeroed(0x39, 9, true);
        assert_eq!(packet.into_payload(), vec![0; 9]);

        let empty = Packet::from_type(&PacketType::JOY_VERSION_REQUEST);
        assert!(empty.into_payload().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_checks_payload_size() {
        let packet: Packet =
            serde_json::from_str(r#"{"code":22,"payload":[5],"checksum":true}"#).unwrap();
        assert_eq!(packet, Packet::new(0x16, vec![0x05], true).unwrap());
        assert_eq!(
            serde_json::from_str::<Packet>(&serde_json::to_string(&packet).unwrap()).unwrap(),
            packet
        );

        let oversized = format!(
            r#"{{"code":66,"payload":{:?},"checksum":true}}"#,
            vec![1u8; 300]
        );
        assert!(serde_json::from_str::<Packet>(&oversized).is_err());
    }

    #[test]
    fn display_names_known_types() {
        let packet = Packet::new(0x16, vec![0x05], true).unwrap();
        assert_eq!(
            packet.to_string(),
            "LCD_UPDATE_RESPONSE (type 0x16, size 1): 05"
        );

        let unknown = Packet::zeroed(0x42, 0, true);
        assert_eq!(
            unknown.to_string(),
            "UNKNOWN_PACKET_TYPE (type 0x42, size 0): none"
        );
    }
}
