//! at-expect: Expect-style AT command driver for SIM900-class modems
//!
//! This crate drives a cellular module over a byte-oriented serial link to
//! send, list and delete SMS messages. At its centre is a streaming,
//! timeout-bounded matcher that waits for one or two literal terminators
//! (`OK\r\n`, `>`, `+CMGL: `) and can capture the bytes seen on the way.
//!
//! # Features
//!
//! - **Byte-at-a-time matching** that never reads past a terminator, so a
//!   reply can be split into fields with successive delimiter-bounded waits
//! - **Injectable transport and clock** ([`Transport`], [`Clock`])
//! - **Serial backend** via `serialport` (feature: `serial`)
//! - **Mock backend** for testing (feature: `mock`)
//! - **TOML and environment configuration** for timeouts and buffers
//!
//! # Example
//!
//! ```rust
//! use at_expect::prelude::*;
//! use at_expect::mock::{MockTransport, listing_scenario};
//!
//! # fn main() -> at_expect::Result<()> {
//! let scenario = listing_scenario(
//!     "+CMGL: 3,\"REC UNREAD\",\"+15551234567\",,\"21/01/01,12:00:00+00\"\r\nHello\r\n",
//! );
//! let mut session = SessionBuilder::new()
//!     .build(MockTransport::from_scenario(&scenario), ManualClock::new())?;
//!
//! let sms = session.next_sms(SmsStatus::RecUnread, false)?.expect("one message");
//! assert_eq!(sms.id, 3);
//! assert_eq!(sms.message, "Hello");
//! # Ok(())
//! # }
//! ```
//!
//! # Failure model
//!
//! A modem that rejects a command and a modem that never answers look the
//! same on the wire, so every unmet expectation is a
//! [`ModemError::Timeout`]. Treat it as "not confirmed", not as "failed".

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod expect;
pub mod prelude;
pub mod session;
pub mod shared;
pub mod sms;
pub mod validation;

/// Mock backend for testing.
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use backend::{BackendType, Transport};
#[cfg(feature = "serial")]
pub use backend::SerialTransport;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BufferConfig, ModemConfig, NotificationConfig, SerialConfig, TimeoutConfig};
pub use error::{ModemError, Result};
pub use expect::{CaptureBuffer, MatchOutcome, MatchState, Matcher, Pattern};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockBuilder, MockTransport, Scenario};
pub use session::{Session, SessionBuilder};
pub use shared::SharedModem;
pub use sms::{Sms, SmsStatus};
