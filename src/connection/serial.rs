//! Discovering and opening VEXnet devices attached to a serial port.

use std::{
    io::{self, Read, Write},
    time::Duration,
};

use log::{debug, trace, warn};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPortType, StopBits};
use thiserror::Error;

use super::Port;

/// Baud rate of the VEX LCD serial interface.
pub const LCD_BAUDRATE: u32 = 19200;

/// Baud rate of the VEXnet joystick partner port.
pub const PARTNER_PORT_BAUDRATE: u32 = 115200;

/// Read timeout used when none is specified.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// The kind of VEX device on the other end of a serial port.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeviceType {
    /// VEX LCD display.
    Lcd,
    /// VEXnet joystick partner port.
    JoystickPartnerPort,
}

impl DeviceType {
    pub fn baud_rate(&self) -> u32 {
        match self {
            DeviceType::Lcd => LCD_BAUDRATE,
            DeviceType::JoystickPartnerPort => PARTNER_PORT_BAUDRATE,
        }
    }

    /// Default port settings for talking to this device.
    pub fn settings(&self) -> PortSettings {
        PortSettings {
            baud_rate: self.baud_rate(),
            ..Default::default()
        }
    }
}

/// Line parameters used when opening a serial port.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PortSettings {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// How long a read waits for bytes before returning empty.
    pub timeout: Duration,
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            baud_rate: PARTNER_PORT_BAUDRATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A serial port found on this machine.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PortInfo {
    /// System name of the port, e.g. `/dev/ttyUSB0` or `COM4`.
    pub name: String,
    /// Descriptive product name, if the port is a USB device that reports one.
    pub description: Option<String>,
}

/// Lists every serial port available on this machine.
pub fn find_ports() -> Result<Vec<PortInfo>, SerialError> {
    let ports = serialport::available_ports()?;
    debug!("Found {} serial ports", ports.len());

    Ok(ports
        .into_iter()
        .map(|port| PortInfo {
            description: match port.port_type {
                SerialPortType::UsbPort(info) => info.product,
                _ => None,
            },
            name: port.port_name,
        })
        .collect())
}

/// An open serial port.
///
/// The underlying handle is released when the port is [closed](SerialPort::close)
/// or dropped, whichever comes first.
pub struct SerialPort {
    name: String,
    inner: Option<Box<dyn serialport::SerialPort>>,
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("name", &self.name)
            .field("open", &self.inner.is_some())
            .finish()
    }
}

impl SerialPort {
    /// Opens a port with the default settings for `device`.
    pub fn open(path: &str, device: DeviceType) -> Result<Self, SerialError> {
        Self::open_with(path, &device.settings())
    }

    /// Opens a port with explicit line settings.
    pub fn open_with(path: &str, settings: &PortSettings) -> Result<Self, SerialError> {
        let port = serialport::new(path, settings.baud_rate)
            .data_bits(settings.data_bits)
            .parity(settings.parity)
            .stop_bits(settings.stop_bits)
            .flow_control(FlowControl::None)
            .timeout(settings.timeout)
            .open()?;

        // Drop anything the device sent before we were listening.
        if let Err(e) = port.clear(ClearBuffer::All) {
            warn!("Failed to flush receive buffer of {path}: {e}");
        }

        debug!("Opened serial port {path} at {} baud", settings.baud_rate);

        Ok(Self {
            name: path.to_string(),
            inner: Some(port),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Closes the port. Further reads and writes fail with [`io::ErrorKind::NotConnected`].
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!("Closed serial port {}", self.name);
        }
    }

    fn inner(&mut self) -> io::Result<&mut Box<dyn serialport::SerialPort>> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port is closed"))
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        self.close();
    }
}

impl Port for SerialPort {
    fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let result = self.inner()?.read(buf);
        match result {
            Ok(n) => {
                trace!("Read {n} bytes from {}", self.name);
                Ok(n)
            }
            // A timeout just means nothing arrived in time.
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner()?.write_all(bytes)
    }

    fn bytes_available(&self) -> io::Result<usize> {
        let port = self
            .inner
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port is closed"))?;
        Ok(port.bytes_to_read().map_err(io::Error::from)? as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self.inner()?)
    }
}

#[derive(Error, Debug)]
pub enum SerialError {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serial port error: {0}")]
    SerialportError(#[from] serialport::Error),
}

#[cfg(test)]
mod tests {
    use super::{DeviceType, PortSettings, LCD_BAUDRATE, PARTNER_PORT_BAUDRATE};
    use serialport::{DataBits, Parity, StopBits};

    #[test]
    fn device_settings() {
        let lcd = DeviceType::Lcd.settings();
        assert_eq!(lcd.baud_rate, LCD_BAUDRATE);
        assert_eq!(lcd.data_bits, DataBits::Eight);
        assert_eq!(lcd.parity, Parity::None);
        assert_eq!(lcd.stop_bits, StopBits::One);

        assert_eq!(
            DeviceType::JoystickPartnerPort.settings(),
            PortSettings::default()
        );
        assert_eq!(PortSettings::default().baud_rate, PARTNER_PORT_BAUDRATE);
    }
}
