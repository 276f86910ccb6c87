//! Buffered byte access to a [`Port`].

use std::io;

use log::{trace, warn};
use thiserror::Error;

use crate::connection::Port;

/// Number of bytes the lookahead buffer holds.
pub const LOOKAHEAD_CAPACITY: usize = 10;

/// A small lookahead buffer over a [`Port`].
///
/// Bytes are fetched from the port in batches of up to [`LOOKAHEAD_CAPACITY`]
/// and handed out one at a time. A read from an exhausted buffer refills it
/// with exactly one call to [`Port::read_bytes`]; if that yields nothing, the
/// read fails instead of waiting again.
#[derive(Debug)]
pub struct StreamReader<P> {
    port: P,
    buffer: [u8; LOOKAHEAD_CAPACITY],
    /// Index of the next unconsumed byte.
    pos: usize,
    /// Number of valid bytes in `buffer`.
    len: usize,
}

impl<P: Port> StreamReader<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            buffer: [0; LOOKAHEAD_CAPACITY],
            pos: 0,
            len: 0,
        }
    }

    /// Number of fetched bytes that have not been consumed yet.
    pub fn buffered(&self) -> usize {
        self.len - self.pos
    }

    /// Buffered bytes plus whatever the port reports as ready.
    pub fn bytes_available(&self) -> Result<usize, ReadError> {
        Ok(self.buffered() + self.port.bytes_available()?)
    }

    /// Consumes and returns the next byte.
    pub fn consume_byte(&mut self) -> Result<u8, ReadError> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Returns the next byte without consuming it.
    pub fn peek_byte(&mut self) -> Result<u8, ReadError> {
        if self.pos == self.len {
            self.refill()?;
        }
        Ok(self.buffer[self.pos])
    }

    /// Replaces the (exhausted) buffer with a single read from the port.
    fn refill(&mut self) -> Result<(), ReadError> {
        let read = match self.port.read_bytes(&mut self.buffer) {
            Ok(read) => read.min(LOOKAHEAD_CAPACITY),
            Err(e) => {
                warn!("Error while reading from the port: {e}");
                return Err(ReadError::Io(e));
            }
        };

        if read == 0 {
            trace!("Read from the port returned no bytes");
            return Err(ReadError::Exhausted);
        }

        self.pos = 0;
        self.len = read;
        Ok(())
    }

    pub fn get_ref(&self) -> &P {
        &self.port
    }

    /// Mutable access to the port. Reading from it directly skips the lookahead buffer.
    pub fn get_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Returns the port, discarding any buffered bytes.
    pub fn into_inner(self) -> P {
        self.port
    }
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("The port had no bytes to read.")]
    Exhausted,
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::{ReadError, StreamReader, LOOKAHEAD_CAPACITY};
    use crate::connection::{memory::MemoryPort, Port};

    #[test]
    fn peek_does_not_consume() {
        let mut port = MemoryPort::new();
        port.push([0xAA, 0x55]);
        let mut reader = StreamReader::new(port);

        assert_eq!(reader.peek_byte().unwrap(), 0xAA);
        assert_eq!(reader.peek_byte().unwrap(), 0xAA);
        assert_eq!(reader.consume_byte().unwrap(), 0xAA);
        assert_eq!(reader.peek_byte().unwrap(), 0x55);
        assert_eq!(reader.consume_byte().unwrap(), 0x55);
    }

    #[test]
    fn refills_at_most_once_per_call() {
        let mut port = MemoryPort::new();
        port.push([1]);
        port.push([2]);
        let mut reader = StreamReader::new(port);

        assert_eq!(reader.consume_byte().unwrap(), 1);
        assert_eq!(reader.consume_byte().unwrap(), 2);
        assert!(matches!(
            reader.consume_byte(),
            Err(ReadError::Exhausted)
        ));

        // Bytes arriving later are picked up by the next call.
        reader.get_mut().push([3]);
        assert_eq!(reader.consume_byte().unwrap(), 3);
    }

    #[test]
    fn buffer_holds_capacity_bytes() {
        let mut port = MemoryPort::new();
        port.push((0..15).collect::<Vec<u8>>());
        let mut reader = StreamReader::new(port);

        assert_eq!(reader.bytes_available().unwrap(), 15);
        assert_eq!(reader.consume_byte().unwrap(), 0);
        assert_eq!(reader.buffered(), LOOKAHEAD_CAPACITY - 1);

        // Buffered and pending bytes are both counted.
        assert_eq!(reader.bytes_available().unwrap(), 14);

        for expected in 1..15 {
            assert_eq!(reader.consume_byte().unwrap(), expected);
        }
        assert_eq!(reader.bytes_available().unwrap(), 0);
    }

    #[test]
    fn port_errors_are_reported() {
        let mut port = MemoryPort::new();
        port.close();
        let mut reader = StreamReader::new(port);

        assert!(!reader.get_ref().is_open());
        assert!(matches!(reader.peek_byte(), Err(ReadError::Io(_))));
        assert!(matches!(reader.bytes_available(), Err(ReadError::Io(_))));
    }
}
