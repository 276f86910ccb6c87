//! Byte-level transports that VEXnet packets travel over.

use std::io;

pub mod memory;
#[cfg(feature = "serial")]
pub mod serial;

/// A byte-oriented device a [`Codec`](crate::codec::Codec) can talk through.
///
/// Opening happens when the implementor is constructed, and closing when it
/// is closed explicitly or dropped.
pub trait Port {
    /// Whether the device is currently open.
    fn is_open(&self) -> bool;

    /// Reads whatever bytes are ready into `buf`, returning how many were read.
    ///
    /// A read that times out returns `Ok(0)`.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Writes every byte in `bytes`.
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Number of bytes that can be read without blocking.
    fn bytes_available(&self) -> io::Result<usize>;

    /// Blocks until all written bytes have been transmitted.
    fn flush(&mut self) -> io::Result<()>;
}

impl<P: Port + ?Sized> Port for &mut P {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_bytes(buf)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_bytes(bytes)
    }

    fn bytes_available(&self) -> io::Result<usize> {
        (**self).bytes_available()
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<P: Port + ?Sized> Port for Box<P> {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_bytes(buf)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_bytes(bytes)
    }

    fn bytes_available(&self) -> io::Result<usize> {
        (**self).bytes_available()
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}
