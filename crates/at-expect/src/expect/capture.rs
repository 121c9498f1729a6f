//! Fixed-capacity capture of bytes seen while matching.

use std::fmt;

use crate::error::{ModemError, Result, escape_bytes};

/// A zero-filled byte array with a logical write cursor.
///
/// The capacity never changes. Appending past it fails with
/// [`ModemError::CapacityExceeded`] instead of writing. The logical length
/// is tracked explicitly, so stale bytes left beyond it by earlier captures
/// never leak into [`as_bytes`](Self::as_bytes).
#[derive(Clone, PartialEq, Eq)]
pub struct CaptureBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl CaptureBuffer {
    /// Create an empty, zero-filled buffer.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Append one byte at the cursor.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if the buffer is full.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        let capacity = self.data.len();
        let slot = self
            .data
            .get_mut(self.len)
            .ok_or_else(|| ModemError::capacity_exceeded(capacity))?;
        *slot = byte;
        self.len += 1;
        Ok(())
    }

    /// Erase the final `n` logical bytes (fewer if the buffer is shorter).
    pub fn trim_trailing(&mut self, n: usize) {
        let new_len = self.len.saturating_sub(n);
        self.data[new_len..self.len].fill(0);
        self.len = new_len;
    }

    /// Zero-fill from `from` to capacity and pull the cursor back to `from`
    /// if it was beyond it. Bytes before `from` are untouched.
    pub fn clear_from(&mut self, from: usize) {
        let from = from.min(self.data.len());
        self.data[from..].fill(0);
        self.len = self.len.min(from);
    }

    /// Zero-fill the whole buffer.
    pub fn clear(&mut self) {
        self.clear_from(0);
    }

    /// The captured bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The full backing array, including zeroed space past the cursor.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// The captured bytes as text, replacing invalid UTF-8.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// Number of captured bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been captured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fixed capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Room left before the next push fails.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.len
    }
}

impl fmt::Debug for CaptureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureBuffer")
            .field("content", &escape_bytes(self.as_bytes()))
            .field("capacity", &self.data.len())
            .finish()
    }
}
