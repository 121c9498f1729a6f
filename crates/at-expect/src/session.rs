//! Command sessions against a modem.
//!
//! A [`Session`] owns the transport for its whole lifetime and pairs literal
//! AT commands with the expected reply terminator: "send X, expect Y within
//! T ms". The SMS workflows in [`crate::sms`] are built on top of it.
//!
//! # Example
//!
//! ```rust
//! use at_expect::clock::ManualClock;
//! use at_expect::mock::{MockTransport, Scenario};
//! use at_expect::SessionBuilder;
//!
//! let transport = MockTransport::from_scenario(&Scenario::new("probe").ready());
//! let mut session = SessionBuilder::new()
//!     .build(transport, ManualClock::new())
//!     .unwrap();
//!
//! assert!(session.send_at().unwrap());
//! session.close().unwrap();
//! ```

mod builder;
mod handle;

pub use builder::SessionBuilder;
pub use handle::Session;

/// Byte that terminates an SMS body (Ctrl-Z).
pub const CTRL_Z: u8 = 0x1a;

/// Line terminator appended to every command.
pub const CRLF: &str = "\r\n";
