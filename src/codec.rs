//! Sending and receiving whole packets over a [`Port`].

use std::io;

use log::{debug, trace, warn};
use thiserror::Error;

use crate::{
    connection::Port,
    encode::Encode,
    packet::Packet,
    reader::{ReadError, StreamReader},
    registry::PacketType,
    SYNC_HEADER,
};

/// Frames packets onto a port and parses them back out of its byte stream.
///
/// A codec is strictly sequential: each [`Codec::recv`] reads at most one
/// frame and each [`Codec::send`] writes exactly one. Access from several
/// threads must be serialized by the caller.
#[derive(Debug)]
pub struct Codec<P: Port> {
    reader: StreamReader<P>,
}

impl<P: Port> Codec<P> {
    pub fn new(port: P) -> Self {
        Self {
            reader: StreamReader::new(port),
        }
    }

    pub fn port(&self) -> &P {
        self.reader.get_ref()
    }

    pub fn port_mut(&mut self) -> &mut P {
        self.reader.get_mut()
    }

    pub fn into_port(self) -> P {
        self.reader.into_inner()
    }

    /// Sends a packet, returning whether it was written successfully.
    ///
    /// Failures are logged. Use [`Codec::try_send`] to inspect them.
    pub fn send(&mut self, packet: &Packet) -> bool {
        match self.try_send(packet) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send packet {packet}: {e}");
                false
            }
        }
    }

    /// Encodes a packet and writes it to the port.
    pub fn try_send(&mut self, packet: &Packet) -> Result<(), SendError> {
        let port = self.reader.get_mut();
        if !port.is_open() {
            return Err(SendError::NotOpen);
        }

        let encoded = packet.to_bytes();
        trace!("Sending packet: {:x?}", encoded);

        port.write_bytes(&encoded)?;
        port.flush()?;

        Ok(())
    }

    /// Receives a packet if a complete, valid one can be read right now.
    ///
    /// Returns `None` both when nothing has arrived yet and when a malformed
    /// frame was discarded. Use [`Codec::try_recv`] to tell them apart.
    pub fn recv(&mut self) -> Option<Packet> {
        match self.try_recv() {
            Ok(packet) => Some(packet),
            Err(RecvError::NoData) => None,
            Err(e) => {
                debug!("No packet received: {e}");
                None
            }
        }
    }

    /// Reads one frame from the port.
    ///
    /// Bytes consumed before a failure are lost. Frames are only recognized
    /// when their sync header is next in the stream; no searching is done.
    pub fn try_recv(&mut self) -> Result<Packet, RecvError> {
        if !self.reader.get_ref().is_open() {
            return Err(RecvError::NotOpen);
        }
        if self.reader.bytes_available()? == 0 {
            return Err(RecvError::NoData);
        }

        self.expect_byte("sync byte 1", SYNC_HEADER[0])?;
        self.expect_byte("sync byte 2", SYNC_HEADER[1])?;

        let code = self.reader.consume_byte()?;
        let known = PacketType::lookup(code);

        if self.at_frame_end(code, known)? {
            let packet = match known {
                Some(ty) => Packet::from_type(ty),
                None => Packet::zeroed(code, 0, true),
            };
            trace!("Received packet: {packet}");
            return Ok(packet);
        }

        let size_byte = self.reader.consume_byte()?;
        let (size, checksum) = match known {
            Some(_) => {
                let ty = PacketType::lookup_wire_size(code, size_byte).ok_or(
                    RecvError::SizeMismatch {
                        code,
                        found: size_byte,
                    },
                )?;
                (ty.size, ty.checksum)
            }
            // Unknown packets are assumed to carry a checksum.
            None => (size_byte.wrapping_sub(1), true),
        };

        let mut packet = Packet::zeroed(code, size, checksum);
        let mut sum = 0u8;
        for byte in packet.payload_mut() {
            *byte = self.reader.consume_byte()?;
            sum = sum.wrapping_add(*byte);
        }

        if checksum {
            sum = sum.wrapping_add(self.reader.consume_byte()?);
            if sum != 0 {
                return Err(RecvError::Checksum { sum });
            }
        }

        trace!("Received packet: {packet}");
        Ok(packet)
    }

    fn expect_byte(&mut self, name: &'static str, expected: u8) -> Result<(), RecvError> {
        let value = self.reader.consume_byte()?;
        if value != expected {
            return Err(RecvError::UnexpectedByte {
                name,
                value,
                expected,
            });
        }
        Ok(())
    }

    /// Decides whether a frame ends right after its type byte.
    fn at_frame_end(
        &mut self,
        code: u8,
        known: Option<&'static PacketType>,
    ) -> Result<bool, RecvError> {
        // Types that never carry a payload always end here.
        if known.is_some() && PacketType::variants(code).all(|ty| ty.size == 0) {
            return Ok(true);
        }

        // Types that always carry a payload never do.
        if known.is_some_and(|ty| ty.size != 0) {
            return Ok(false);
        }

        // Otherwise the frame ended if the next one has already started, or if
        // nothing followed the type byte at all.
        match self.reader.peek_byte() {
            Ok(next) => Ok(next == SYNC_HEADER[0]),
            Err(ReadError::Exhausted) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("The port is not open.")]
    NotOpen,
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum RecvError {
    #[error("The port is not open.")]
    NotOpen,

    #[error("No bytes are waiting to be read.")]
    NoData,

    #[error(
        "Could not decode {name} with unexpected byte. Found {value:x}, expected {expected:x}."
    )]
    UnexpectedByte {
        name: &'static str,
        value: u8,
        expected: u8,
    },

    #[error("Packet type {code:#04x} does not take a size byte of {found}.")]
    SizeMismatch { code: u8, found: u8 },

    #[error("Checksum mismatch. Payload and checksum summed to {sum:#04x} instead of zero.")]
    Checksum { sum: u8 },

    #[error(transparent)]
    Read(#[from] ReadError),
}

impl From<io::Error> for RecvError {
    fn from(e: io::Error) -> Self {
        Self::Read(ReadError::Io(e))
    }
}
