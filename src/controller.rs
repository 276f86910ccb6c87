//! Joystick status payloads.
//!
//! A partner joystick answers a [`JOY_STATUS_REQUEST`](PacketType::JOY_STATUS_REQUEST)
//! with a 9-byte [`JOY_STATUS_RESPONSE`](PacketType::JOY_STATUS_RESPONSE) frame
//! describing its sticks, buttons and accelerometer.

use bitflags::bitflags;

use crate::{
    decode::{expect_code, Decode, DecodeError},
    encode::{Encode, MessageEncoder},
    packet::Packet,
    registry::PacketType,
};

bitflags! {
    /// Shoulder buttons, groups 5 and 6.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Buttons56: u8 {
        const DOWN_5 = 0x01;
        const UP_5 = 0x02;
        const DOWN_6 = 0x04;
        const UP_6 = 0x08;
    }
}

bitflags! {
    /// Face buttons, groups 7 and 8.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Buttons78: u8 {
        const DOWN_7 = 0x01;
        const LEFT_7 = 0x02;
        const UP_7 = 0x04;
        const RIGHT_7 = 0x08;
        const DOWN_8 = 0x10;
        const LEFT_8 = 0x20;
        const UP_8 = 0x40;
        const RIGHT_8 = 0x80;
    }
}

/// Raw accelerometer readings. `127` is roughly level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Acceleration {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

/// The state of a VEXnet joystick.
///
/// # Encoding
///
/// | Field        | Size | Description |
/// |--------------|------|-------------|
/// | `axes`       | 4    | Joystick axes 1–4, `127` when centered. |
/// | `buttons_56` | 1    | [`Buttons56`] |
/// | `buttons_78` | 1    | [`Buttons78`] |
/// | `accel`      | 3    | Accelerometer Y, X, Z, in that order. |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerState {
    pub axes: [u8; 4],
    pub buttons_56: Buttons56,
    pub buttons_78: Buttons78,
    pub accel: Acceleration,
}

impl ControllerState {
    /// Center position for axes and accelerometer readings.
    pub const CENTER: u8 = 127;

    /// A joystick at rest: sticks centered, nothing pressed, held level.
    pub const fn neutral() -> Self {
        Self {
            axes: [Self::CENTER; 4],
            buttons_56: Buttons56::empty(),
            buttons_78: Buttons78::empty(),
            accel: Acceleration {
                x: Self::CENTER,
                y: Self::CENTER,
                z: Self::CENTER,
            },
        }
    }

    /// Builds the joystick status response carrying this state.
    pub fn to_packet(&self) -> Packet {
        let mut packet = Packet::from_type(&PacketType::JOY_STATUS_RESPONSE);
        self.encode(packet.payload_mut());
        packet
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Encode for ControllerState {
    fn size(&self) -> usize {
        PacketType::JOY_STATUS_RESPONSE.size as usize
    }

    fn encode(&self, data: &mut [u8]) {
        let mut enc = MessageEncoder::new(data);
        enc.write(&self.axes);
        enc.write(&self.buttons_56.bits());
        enc.write(&self.buttons_78.bits());
        enc.write(&[self.accel.y, self.accel.x, self.accel.z]);
    }
}

impl Decode for ControllerState {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let axes = <[u8; 4]>::decode(data)?;
        let buttons_56 = Buttons56::from_bits_retain(u8::decode(data)?);
        let buttons_78 = Buttons78::from_bits_retain(u8::decode(data)?);
        let [y, x, z] = <[u8; 3]>::decode(data)?;

        Ok(Self {
            axes,
            buttons_56,
            buttons_78,
            accel: Acceleration { x, y, z },
        })
    }
}

impl TryFrom<&Packet> for ControllerState {
    type Error = DecodeError;

    fn try_from(packet: &Packet) -> Result<Self, Self::Error> {
        expect_code::<Self>(packet, PacketType::JOY_STATUS_RESPONSE.code)?;
        Self::decode(&mut packet.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::{Acceleration, Buttons56, Buttons78, ControllerState};
    use crate::{
        decode::DecodeErrorKind, encode::Encode, packet::Packet, registry::PacketType,
    };

    #[test]
    fn neutral_with_6d_pressed() {
        let state = ControllerState {
            buttons_56: Buttons56::DOWN_6,
            ..ControllerState::neutral()
        };

        let packet = state.to_packet();
        assert_eq!(packet.code(), 0x39);
        assert_eq!(
            packet.payload(),
            &[0x7F, 0x7F, 0x7F, 0x7F, 0x04, 0x00, 0x7F, 0x7F, 0x7F]
        );
        assert_eq!(
            packet.to_bytes(),
            vec![
                0xAA, 0x55, 0x39, 0x0A, 0x7F, 0x7F, 0x7F, 0x7F, 0x04, 0x00, 0x7F, 0x7F, 0x7F,
                0x83,
            ]
        );
    }

    #[test]
    fn accelerometer_order() {
        let state = ControllerState {
            axes: [1, 2, 3, 4],
            buttons_56: Buttons56::UP_5 | Buttons56::UP_6,
            buttons_78: Buttons78::LEFT_7 | Buttons78::RIGHT_8,
            accel: Acceleration { x: 10, y: 20, z: 30 },
        };

        let packet = state.to_packet();
        assert_eq!(packet.payload(), &[1, 2, 3, 4, 0x0A, 0x82, 20, 10, 30]);
        assert_eq!(ControllerState::try_from(&packet).unwrap(), state);
    }

    #[test]
    fn wrong_packet_type() {
        let packet = Packet::from_type(&PacketType::LCD_UPDATE);
        let err = ControllerState::try_from(&packet).unwrap_err();
        assert_eq!(
            err.kind(),
            DecodeErrorKind::UnexpectedPacket {
                found: 0x1E,
                expected: 0x39
            }
        );

        let short = Packet::new(0x39, vec![0; 4], true).unwrap();
        assert_eq!(
            ControllerState::try_from(&short).unwrap_err().kind(),
            DecodeErrorKind::UnexpectedEnd
        );
    }
}
