//! Byte transports the modem session runs over.
//!
//! The session only needs a tiny, byte-at-a-time view of the serial link:
//! "is a byte waiting", "read one", "write these", "throw away whatever is
//! buffered". Anything that can answer those questions is a [`Transport`].

use std::io;

// Serial backend is conditionally compiled
#[cfg(feature = "serial")]
mod serial;

#[cfg(feature = "serial")]
pub use serial::SerialTransport;

/// A byte source/sink for AT traffic.
///
/// The matcher assumes exclusive, ordered access for the duration of a wait,
/// so a transport is always owned by exactly one session.
pub trait Transport {
    /// Whether at least one inbound byte can be read without blocking.
    fn has_byte(&mut self) -> io::Result<bool>;

    /// Read one inbound byte.
    ///
    /// Only called after [`has_byte`](Self::has_byte) returned `true`.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Write raw bytes to the modem.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Write a single byte (e.g. the Ctrl-Z that ends an SMS body).
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write_all(&[byte])
    }

    /// Write command text.
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.write_all(text.as_bytes())
    }

    /// Discard every inbound byte currently buffered.
    fn flush_inbound(&mut self) -> io::Result<usize> {
        let mut discarded = 0;
        while self.has_byte()? {
            self.read_byte()?;
            discarded += 1;
        }
        Ok(discarded)
    }

    /// Release the underlying link.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn has_byte(&mut self) -> io::Result<bool> {
        (**self).has_byte()
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        (**self).read_byte()
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_all(data)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        (**self).write_str(text)
    }

    fn flush_inbound(&mut self) -> io::Result<usize> {
        (**self).flush_inbound()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn has_byte(&mut self) -> io::Result<bool> {
        (**self).has_byte()
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        (**self).read_byte()
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_all(data)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        (**self).write_str(text)
    }

    fn flush_inbound(&mut self) -> io::Result<usize> {
        (**self).flush_inbound()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Available backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// A real serial port.
    Serial,
    /// Scripted transport for testing.
    Mock,
}

impl BackendType {
    /// Check if this backend was compiled in.
    #[must_use]
    pub const fn is_available(self) -> bool {
        match self {
            Self::Serial => cfg!(feature = "serial"),
            Self::Mock => cfg!(feature = "mock"),
        }
    }

    /// Get the backend name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Mock => "mock",
        }
    }
}
