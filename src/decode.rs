use thiserror::Error;

use crate::packet::Packet;

/// An error produced while decoding a typed value from raw bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    type_name: &'static str,
}

impl DecodeError {
    pub fn new<T>(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            type_name: std::any::type_name::<T>(),
        }
    }

    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to decode {}: {}", self.type_name, self.kind)
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("Payload was too short.")]
    UnexpectedEnd,

    #[error(
        "Could not decode {name} with unexpected byte. Found {value:x}, expected one of: {expected:x?}."
    )]
    UnexpectedByte {
        name: &'static str,
        value: u8,
        expected: &'static [u8],
    },

    #[error("Packet has type {found:#04x}, expected {expected:#04x}.")]
    UnexpectedPacket { found: u8, expected: u8 },

    #[error("Text contained a non-ASCII byte {0:#04x}.")]
    InvalidText(u8),
}

/// A type that can be reconstructed (decoded) from a raw sequence of bytes.
///
/// The input slice is advanced by the number of bytes consumed.
pub trait Decode {
    /// Attempts to decode `Self` from the beginning of the provided byte slice.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input is malformed or too short.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError>
    where
        Self: Sized;
}

impl Decode for u8 {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let (&first, rest) = data
            .split_first()
            .ok_or_else(|| DecodeError::new::<Self>(DecodeErrorKind::UnexpectedEnd))?;
        *data = rest;
        Ok(first)
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        if data.len() < N {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::UnexpectedEnd));
        }

        let (bytes, rest) = data.split_at(N);
        let mut arr = [0; N];
        arr.copy_from_slice(bytes);
        *data = rest;
        Ok(arr)
    }
}

/// Checks that a packet has the type code a payload of `T` is carried in.
pub(crate) fn expect_code<T>(packet: &Packet, expected: u8) -> Result<(), DecodeError> {
    if packet.code() != expected {
        return Err(DecodeError::new::<T>(DecodeErrorKind::UnexpectedPacket {
            found: packet.code(),
            expected,
        }));
    }
    Ok(())
}
