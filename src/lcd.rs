//! VEX LCD payloads.
//!
//! The LCD shows two lines of sixteen characters. The host rewrites one line
//! per [`LCD_UPDATE`](PacketType::LCD_UPDATE) frame, and the display reports
//! its buttons in an [`LCD_UPDATE_RESPONSE`](PacketType::LCD_UPDATE_RESPONSE).

use bitflags::bitflags;
use thiserror::Error;

use crate::{
    decode::{expect_code, Decode, DecodeError, DecodeErrorKind},
    encode::{Encode, MessageEncoder},
    packet::Packet,
    registry::PacketType,
};

/// Number of characters on one LCD line.
pub const LCD_LINE_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum LcdLine {
    Top = 0,
    Bottom = 1,
}

/// Replaces the text of one LCD line.
///
/// # Encoding
///
/// | Field  | Size | Description |
/// |--------|------|-------------|
/// | `line` | 1    | [`LcdLine`] to write. |
/// | `text` | 16   | ASCII text, padded with spaces. |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawLcdUpdate")
)]
pub struct LcdUpdate {
    pub line: LcdLine,
    text: [u8; LCD_LINE_WIDTH],
}

impl LcdUpdate {
    /// Creates an update writing `text` to `line`.
    ///
    /// # Errors
    ///
    /// Returns [`LcdTextError`] if `text` is longer than [`LCD_LINE_WIDTH`]
    /// or contains non-ASCII characters.
    pub fn new(line: LcdLine, text: &str) -> Result<Self, LcdTextError> {
        if !text.is_ascii() {
            return Err(LcdTextError::NotAscii);
        }
        if text.len() > LCD_LINE_WIDTH {
            return Err(LcdTextError::TooLong {
                input_size: text.len(),
            });
        }

        let mut padded = [b' '; LCD_LINE_WIDTH];
        padded[..text.len()].copy_from_slice(text.as_bytes());

        Ok(Self { line, text: padded })
    }

    /// The line's text, including padding.
    pub fn text(&self) -> &str {
        // Only ASCII ever gets stored.
        std::str::from_utf8(&self.text).unwrap_or_default()
    }

    /// Builds the LCD update packet carrying this line.
    pub fn to_packet(&self) -> Packet {
        let mut packet = Packet::from_type(&PacketType::LCD_UPDATE);
        self.encode(packet.payload_mut());
        packet
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLcdUpdate {
    line: LcdLine,
    text: [u8; LCD_LINE_WIDTH],
}

#[cfg(feature = "serde")]
impl TryFrom<RawLcdUpdate> for LcdUpdate {
    type Error = LcdTextError;

    fn try_from(raw: RawLcdUpdate) -> Result<Self, Self::Error> {
        if !raw.text.is_ascii() {
            return Err(LcdTextError::NotAscii);
        }
        Ok(Self {
            line: raw.line,
            text: raw.text,
        })
    }
}

impl Encode for LcdUpdate {
    fn size(&self) -> usize {
        1 + LCD_LINE_WIDTH
    }

    fn encode(&self, data: &mut [u8]) {
        let mut enc = MessageEncoder::new(data);
        enc.write(&(self.line as u8));
        enc.write(&self.text);
    }
}

impl Decode for LcdUpdate {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let line = match u8::decode(data)? {
            0 => LcdLine::Top,
            1 => LcdLine::Bottom,
            value => {
                return Err(DecodeError::new::<Self>(DecodeErrorKind::UnexpectedByte {
                    name: "LcdLine",
                    value,
                    expected: &[0x00, 0x01],
                }))
            }
        };

        let text = <[u8; LCD_LINE_WIDTH]>::decode(data)?;
        if let Some(byte) = text.iter().find(|byte| !byte.is_ascii()) {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::InvalidText(*byte)));
        }

        Ok(Self { line, text })
    }
}

impl TryFrom<&Packet> for LcdUpdate {
    type Error = DecodeError;

    fn try_from(packet: &Packet) -> Result<Self, Self::Error> {
        expect_code::<Self>(packet, PacketType::LCD_UPDATE.code)?;
        Self::decode(&mut packet.payload())
    }
}

bitflags! {
    /// Buttons below the LCD, as reported by an LCD update response.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LcdButtons: u8 {
        const LEFT = 0x01;
        const CENTER = 0x02;
        const RIGHT = 0x04;
    }
}

impl Decode for LcdButtons {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Self::from_bits_retain(u8::decode(data)?))
    }
}

impl TryFrom<&Packet> for LcdButtons {
    type Error = DecodeError;

    fn try_from(packet: &Packet) -> Result<Self, Self::Error> {
        expect_code::<Self>(packet, PacketType::LCD_UPDATE_RESPONSE.code)?;
        Self::decode(&mut packet.payload())
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LcdTextError {
    #[error("Text of {input_size} characters does not fit on a 16 character LCD line.")]
    TooLong { input_size: usize },
    #[error("The LCD can only display ASCII text.")]
    NotAscii,
}
