//! SMS data types.

use std::fmt;
use std::str::FromStr;

use crate::error::ModemError;

/// Storage status filter for `AT+CMGL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SmsStatus {
    /// Received and not yet read.
    #[default]
    RecUnread,
    /// Received and read.
    RecRead,
    /// Stored, not sent.
    StoUnsent,
    /// Stored and sent.
    StoSent,
    /// Every message.
    All,
}

impl SmsStatus {
    /// All status filters.
    pub const ALL: [Self; 5] = [
        Self::RecUnread,
        Self::RecRead,
        Self::StoUnsent,
        Self::StoSent,
        Self::All,
    ];

    /// The text-mode name the modem expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecUnread => "REC UNREAD",
            Self::RecRead => "REC READ",
            Self::StoUnsent => "STO UNSENT",
            Self::StoSent => "STO SENT",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for SmsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SmsStatus {
    type Err = ModemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModemError::invalid_argument("status", format!("unknown status '{s}'")))
    }
}

/// One message taken from a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sms {
    /// Storage index, usable with `delete_sms`.
    pub id: u32,
    /// Sender or recipient number as reported.
    pub phone_number: String,
    /// Service centre timestamp, e.g. `21/01/01,12:00:00+00`.
    pub timestamp: String,
    /// Message body (first line).
    pub message: String,
}

/// Parse a message index the lenient way modems get parsed: leading
/// whitespace skipped, leading digits taken, anything else yields 0.
pub(crate) fn parse_index(text: &str) -> u32 {
    let trimmed = text.trim_start();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().unwrap_or(0)
}
