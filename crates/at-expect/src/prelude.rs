//! Convenient re-exports for common at-expect usage.
//!
//! # Example
//!
//! ```rust
//! use at_expect::prelude::*;
//!
//! let config = ModemConfig::default();
//! assert_eq!(config.timeouts.ready.as_millis(), 10_000);
//! ```

// Configuration
pub use crate::config::{ModemConfig, TimeoutConfig};

// Error handling
pub use crate::error::{ModemError, Result};

// Transport and time
pub use crate::backend::Transport;
pub use crate::clock::{Clock, ManualClock, SystemClock};

// Matching
pub use crate::expect::{CaptureBuffer, MatchOutcome, Pattern};

// Sessions and workflows
pub use crate::session::{Session, SessionBuilder};
pub use crate::shared::SharedModem;
pub use crate::sms::{Sms, SmsStatus};
