//! Serial port transport built on `serialport`.

use std::io::{self, Read, Write};

use serialport::{ClearBuffer, SerialPort};
use tracing::debug;

use super::Transport;
use crate::config::SerialConfig;
use crate::error::{ModemError, Result};

/// A [`Transport`] over a native serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the port described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured or the port cannot be opened.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let path = config
            .path
            .as_deref()
            .ok_or_else(|| ModemError::config("serial.path is not set"))?;

        let port = serialport::new(path, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(config.read_timeout())
            .open()?;

        debug!(path, baud = config.baud_rate, "opened serial port");
        Ok(Self { port })
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("name", &self.port.name())
            .finish()
    }
}

impl Transport for SerialTransport {
    fn has_byte(&mut self) -> io::Result<bool> {
        Ok(self.port.bytes_to_read()? > 0)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        Write::write_all(&mut self.port, data)?;
        self.port.flush()
    }

    fn flush_inbound(&mut self) -> io::Result<usize> {
        let pending = self.port.bytes_to_read()? as usize;
        self.port.clear(ClearBuffer::Input)?;
        Ok(pending)
    }

    fn close(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}
