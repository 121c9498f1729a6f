//! Error types for at-expect.
//!
//! The modem itself only ever tells us "the expected terminator arrived" or
//! "it did not arrive in time", so most failures surface as [`ModemError::Timeout`].
//! A timeout never proves the modem rejected the command; it only means the
//! operation was not confirmed.

use std::time::Duration;

use thiserror::Error;

/// Maximum length of buffer content to display in error messages.
const MAX_BUFFER_DISPLAY: usize = 200;

/// Render bytes the way they appear on the wire, with control characters escaped.
pub(crate) fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\r' => out.push_str("\\r"),
            b'\n' => out.push_str("\\n"),
            0x1a => out.push_str("^Z"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out
}

/// Format buffer content for display, truncating if necessary.
///
/// `received` is the raw byte count behind the escaped `buffer`.
fn format_buffer_snippet(buffer: &str, received: usize) -> String {
    if buffer.is_empty() {
        return "(nothing received)".to_string();
    }

    if buffer.len() <= MAX_BUFFER_DISPLAY {
        return format!("last bytes seen ({received} bytes): '{buffer}'");
    }

    let mut start = buffer.len() - MAX_BUFFER_DISPLAY;
    while !buffer.is_char_boundary(start) {
        start += 1;
    }
    format!(
        "last bytes seen ({received} bytes, truncated): '...{}'",
        &buffer[start..]
    )
}

/// Format a timeout error message with enhanced context.
fn format_timeout_error(
    step: &str,
    duration: Duration,
    pattern: &str,
    alternative: Option<&str>,
    buffer: &str,
    received: usize,
) -> String {
    let expected = match alternative {
        Some(alt) => format!("'{pattern}' or '{alt}'"),
        None => format!("'{pattern}'"),
    };
    format!(
        "{step}: no {expected} within {duration:?}; {}",
        format_buffer_snippet(buffer, received)
    )
}

/// The main error type for modem operations.
#[derive(Debug, Error)]
pub enum ModemError {
    /// An I/O error occurred on the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error occurred with additional context.
    #[error("{context}: {source}")]
    IoWithContext {
        /// What operation was being performed.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The `AT` / `OK` readiness handshake failed.
    #[error("modem not ready: no OK in reply to AT")]
    NotReady,

    /// The expected terminator did not arrive in time.
    #[error(
        "{}",
        format_timeout_error(step, *duration, pattern, alternative.as_deref(), buffer, *received)
    )]
    Timeout {
        /// The workflow step that was waiting.
        step: String,
        /// The timeout that elapsed.
        duration: Duration,
        /// The pattern that was being waited for (escaped).
        pattern: String,
        /// The competing pattern, when two were raced (escaped).
        alternative: Option<String>,
        /// The most recent bytes received before giving up (escaped).
        buffer: String,
        /// Number of raw bytes behind `buffer`.
        received: usize,
    },

    /// A capture buffer ran out of room before the terminator arrived.
    #[error("capture buffer overflow: capacity of {capacity} bytes exceeded")]
    CapacityExceeded {
        /// The fixed capacity that was exceeded.
        capacity: usize,
    },

    /// Invalid pattern specification.
    #[error("invalid pattern: {message}")]
    InvalidPattern {
        /// Description of what's wrong with the pattern.
        message: String,
    },

    /// An argument would corrupt the command framing.
    #[error("invalid {kind}: {reason}")]
    InvalidArgument {
        /// The kind of argument (e.g. "phone number").
        kind: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Serial port error.
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

/// Result type alias for modem operations.
pub type Result<T> = std::result::Result<T, ModemError>;

impl ModemError {
    /// Create a timeout error for a workflow step.
    pub fn timeout(
        step: impl Into<String>,
        duration: Duration,
        pattern: &[u8],
        buffer: &[u8],
    ) -> Self {
        Self::Timeout {
            step: step.into(),
            duration,
            pattern: escape_bytes(pattern),
            alternative: None,
            buffer: escape_bytes(buffer),
            received: buffer.len(),
        }
    }

    /// Create a timeout error for a step that raced two patterns.
    pub fn timeout_either(
        step: impl Into<String>,
        duration: Duration,
        first: &[u8],
        second: &[u8],
        buffer: &[u8],
    ) -> Self {
        Self::Timeout {
            step: step.into(),
            duration,
            pattern: escape_bytes(first),
            alternative: Some(escape_bytes(second)),
            buffer: escape_bytes(buffer),
            received: buffer.len(),
        }
    }

    /// Create a capacity exceeded error.
    #[must_use]
    pub const fn capacity_exceeded(capacity: usize) -> Self {
        Self::CapacityExceeded { capacity }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_context(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoWithContext {
            context: context.into(),
            source,
        }
    }

    /// Wrap an I/O result with context.
    pub fn with_io_context<T>(result: std::io::Result<T>, context: impl Into<String>) -> Result<T> {
        result.map_err(|e| Self::io_context(context, e))
    }

    /// Check if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this is the readiness failure.
    #[must_use]
    pub const fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady)
    }

    /// Check if the operation may have reached the modem without being confirmed.
    ///
    /// Timeouts and transport errors leave the modem state unknown; argument
    /// and configuration errors are raised before anything is sent.
    #[must_use]
    pub const fn is_unconfirmed(&self) -> bool {
        !matches!(
            self,
            Self::InvalidArgument { .. } | Self::InvalidPattern { .. } | Self::Config { .. }
        )
    }

    /// Get the received bytes if this error carries them.
    #[must_use]
    pub fn buffer(&self) -> Option<&str> {
        match self {
            Self::Timeout { buffer, .. } => Some(buffer),
            _ => None,
        }
    }
}
