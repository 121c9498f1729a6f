//! Argument validation for AT command text.
//!
//! Arguments are spliced into command lines verbatim, so characters that
//! carry framing meaning must be rejected before anything is written.

use crate::error::{ModemError, Result};
use crate::session::CTRL_Z;

/// Characters that would end a quoted argument or the command line early.
pub const FRAMING_CHARACTERS: &[char] = &['"', '\r', '\n'];

/// Check if a string contains framing characters.
#[must_use]
pub fn contains_framing_char(s: &str) -> bool {
    s.contains(FRAMING_CHARACTERS)
}

/// Validate a recipient number for `AT+CMGS="<number>"`.
///
/// # Errors
///
/// Returns an error if the number is empty or contains framing characters.
pub fn validate_phone_number(number: &str) -> Result<()> {
    if number.is_empty() {
        return Err(ModemError::invalid_argument(
            "phone number",
            "must not be empty",
        ));
    }
    if contains_framing_char(number) {
        return Err(ModemError::invalid_argument(
            "phone number",
            "must not contain quotes or line breaks",
        ));
    }
    Ok(())
}

/// Validate a free-form status filter for `AT+CMGL="<status>"`.
///
/// # Errors
///
/// Returns an error if the status is empty or contains framing characters.
pub fn validate_status(status: &str) -> Result<()> {
    if status.is_empty() || contains_framing_char(status) {
        return Err(ModemError::invalid_argument(
            "status",
            "must be non-empty without quotes or line breaks",
        ));
    }
    Ok(())
}

/// Validate an SMS body.
///
/// # Errors
///
/// Returns an error if the body contains Ctrl-Z, which would submit the
/// message early.
pub fn validate_message(message: &str) -> Result<()> {
    if message.as_bytes().contains(&CTRL_Z) {
        return Err(ModemError::invalid_argument(
            "message",
            "must not contain Ctrl-Z (0x1a)",
        ));
    }
    Ok(())
}
