//! Literal terminator patterns.

use std::borrow::Cow;
use std::fmt;

use crate::error::{ModemError, Result, escape_bytes};

/// A non-empty literal byte sequence that ends a reply segment.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    bytes: Cow<'static, [u8]>,
}

impl Pattern {
    /// `OK\r\n`, the final result code of a successful command.
    pub const OK: Self = Self::from_static(b"OK\r\n");

    /// `>`, the prompt before an SMS body.
    pub const PROMPT: Self = Self::from_static(b">");

    /// `+CMGL: `, the header of one listed message.
    pub const CMGL: Self = Self::from_static(b"+CMGL: ");

    /// Create a pattern from a static literal.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in const contexts) if `bytes` is empty.
    #[must_use]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        assert!(!bytes.is_empty(), "pattern must not be empty");
        Self {
            bytes: Cow::Borrowed(bytes),
        }
    }

    /// Create a pattern from caller-supplied bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ModemError::invalid_pattern("pattern must not be empty"));
        }
        Ok(Self {
            bytes: Cow::Owned(bytes),
        })
    }

    /// The pattern bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes in the pattern.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern(\"{}\")", escape_bytes(&self.bytes))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape_bytes(&self.bytes))
    }
}

impl TryFrom<&str> for Pattern {
    type Error = ModemError;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s.as_bytes())
    }
}

impl TryFrom<String> for Pattern {
    type Error = ModemError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s.into_bytes())
    }
}

impl TryFrom<&[u8]> for Pattern {
    type Error = ModemError;

    fn try_from(b: &[u8]) -> Result<Self> {
        Self::new(b)
    }
}
