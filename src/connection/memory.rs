//! An in-memory [`Port`] for loopback use and testing.

use std::{collections::VecDeque, io};

use super::Port;

/// A port backed by in-memory queues.
///
/// Incoming bytes are queued in chunks. Each call to [`Port::read_bytes`]
/// hands out at most one chunk, which makes it possible to simulate a serial
/// line delivering a frame in pieces. An empty queue reads as a timeout.
#[derive(Debug, Clone)]
pub struct MemoryPort {
    incoming: VecDeque<Vec<u8>>,
    outgoing: Vec<u8>,
    open: bool,
}

impl Default for MemoryPort {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPort {
    pub fn new() -> Self {
        Self {
            incoming: VecDeque::new(),
            outgoing: Vec::new(),
            open: true,
        }
    }

    /// Queues `bytes` to be delivered by a single read.
    pub fn push(&mut self, bytes: impl Into<Vec<u8>>) {
        let bytes = bytes.into();
        if !bytes.is_empty() {
            self.incoming.push_back(bytes);
        }
    }

    /// Queues `bytes` to be delivered one byte per read.
    pub fn push_bytewise(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().map(|byte| vec![*byte]));
    }

    /// Every byte written to the port so far.
    pub fn written(&self) -> &[u8] {
        &self.outgoing
    }

    /// Takes the written bytes, leaving the outgoing buffer empty.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.outgoing)
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    fn check_open(&self) -> io::Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::NotConnected, "port is closed"))
        }
    }
}

impl Port for MemoryPort {
    fn is_open(&self) -> bool {
        self.open
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.check_open()?;

        let Some(mut chunk) = self.incoming.pop_front() else {
            return Ok(0);
        };

        let len = chunk.len().min(buf.len());
        buf[..len].copy_from_slice(&chunk[..len]);

        // Whatever did not fit stays at the front of the queue.
        if len < chunk.len() {
            self.incoming.push_front(chunk.split_off(len));
        }

        Ok(len)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.check_open()?;
        self.outgoing.extend_from_slice(bytes);
        Ok(())
    }

    fn bytes_available(&self) -> io::Result<usize> {
        self.check_open()?;
        Ok(self.incoming.iter().map(Vec::len).sum())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.check_open()
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryPort;
    use crate::connection::Port;

    #[test]
    fn reads_one_chunk_at_a_time() {
        let mut port = MemoryPort::new();
        port.push([1, 2, 3]);
        port.push([4]);
        assert_eq!(port.bytes_available().unwrap(), 4);

        let mut buf = [0; 10];
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 4);

        // Nothing queued reads like a timeout
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 0);
    }

    #[test]
    fn oversized_chunk_is_split() {
        let mut port = MemoryPort::new();
        port.push([1, 2, 3, 4, 5]);

        let mut buf = [0; 2];
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 2);
        assert_eq!(port.bytes_available().unwrap(), 3);
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 2);
        assert_eq!(buf, [3, 4]);
    }

    #[test]
    fn closed_port_rejects_io() {
        let mut port = MemoryPort::new();
        port.close();

        assert!(!port.is_open());
        assert!(port.write_bytes(&[1]).is_err());
        assert!(port.read_bytes(&mut [0; 1]).is_err());
        assert!(port.written().is_empty());
    }
}
