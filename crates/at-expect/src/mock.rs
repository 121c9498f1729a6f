//! Mock modem support for testing.
//!
//! This module provides a scripted transport for testing workflows without
//! a serial port. It includes:
//!
//! - [`MockTransport`]: a scripted byte source/sink
//! - [`Scenario`]: expect/respond scripts
//! - Built-in scenarios for common modem exchanges
//!
//! Delays are measured against a [`ManualClock`](crate::clock::ManualClock),
//! so a test that waits ten seconds of modem time runs instantly.
//!
//! # Example
//!
//! ```rust
//! use at_expect::mock::{MockTransport, Scenario};
//!
//! let scenario = Scenario::new("delete")
//!     .ready()
//!     .expect_respond("AT+CMGD=3\r\n", "OK\r\n");
//!
//! let transport = MockTransport::from_scenario(&scenario);
//! ```

pub mod builtin;
pub mod event;
pub mod scenario;
pub mod transport;

pub use builtin::*;
pub use event::{EventTimeline, MockEvent};
pub use scenario::{Scenario, ScenarioStep};
pub use transport::MockTransport;

/// Create a simple mock transport with pre-queued output.
///
/// # Example
///
/// ```rust
/// use at_expect::mock::simple_mock;
///
/// let transport = simple_mock("OK\r\n");
/// ```
#[must_use]
pub fn simple_mock(output: &str) -> MockTransport {
    let transport = MockTransport::new();
    transport.queue_output_str(output);
    transport
}

/// Builder for creating mock transports fluently.
#[derive(Debug, Default)]
pub struct MockBuilder {
    events: Vec<MockEvent>,
}

impl MockBuilder {
    /// Create a new mock builder.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add output to the mock.
    #[must_use]
    pub fn output(mut self, data: &str) -> Self {
        self.events.push(MockEvent::output_str(data));
        self
    }

    /// Add a delay.
    #[must_use]
    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.events.push(MockEvent::delay_ms(ms));
        self
    }

    /// Fail the next read.
    #[must_use]
    pub fn error(mut self, msg: &str) -> Self {
        self.events.push(MockEvent::error(msg));
        self
    }

    /// Build the mock transport.
    #[must_use]
    pub fn build(self) -> MockTransport {
        MockTransport::from_timeline(EventTimeline::from_events(self.events))
    }
}
