use crate::decode::{expect_code, Decode, DecodeError};
use crate::encode::Encode;
use crate::packet::Packet;
use crate::registry::PacketType;

/// Firmware version reported in a joystick version response.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoystickVersion {
    pub major: u8,
    pub minor: u8,
}

impl JoystickVersion {
    /// Builds the joystick version response carrying this version.
    pub fn to_packet(&self) -> Packet {
        let mut packet = Packet::from_type(&PacketType::JOY_VERSION_RESPONSE);
        self.encode(packet.payload_mut());
        packet
    }
}

impl Encode for JoystickVersion {
    fn size(&self) -> usize {
        2
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = self.major;
        data[1] = self.minor;
    }
}

impl Decode for JoystickVersion {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let major = u8::decode(data)?;
        let minor = u8::decode(data)?;

        Ok(Self { major, minor })
    }
}

impl TryFrom<&Packet> for JoystickVersion {
    type Error = DecodeError;

    fn try_from(packet: &Packet) -> Result<Self, Self::Error> {
        expect_code::<Self>(packet, PacketType::JOY_VERSION_RESPONSE.code)?;
        Self::decode(&mut packet.payload())
    }
}

impl std::fmt::Display for JoystickVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::JoystickVersion;
    use crate::{encode::Encode, packet::Packet, registry::PacketType};

    #[test]
    fn version_response_has_no_checksum() {
        let version = JoystickVersion { major: 4, minor: 23 };
        let packet = version.to_packet();

        assert!(!packet.includes_checksum());
        assert_eq!(packet.to_bytes(), vec![0xAA, 0x55, 0x3B, 0x02, 4, 23]);
        assert_eq!(JoystickVersion::try_from(&packet).unwrap(), version);
        assert_eq!(version.to_string(), "4.23");
    }

    #[test]
    fn status_request_has_no_version() {
        // Shares the version response's type code, but carries no payload.
        let request = Packet::from_type(&PacketType::JOY_STATUS_REQUEST);
        assert!(JoystickVersion::try_from(&request).is_err());
    }
}
