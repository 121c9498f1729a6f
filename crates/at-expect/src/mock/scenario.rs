//! Mock scenarios for scripting a modem conversation.
//!
//! A scenario is an ordered list of steps. A step with an `expect` text
//! waits until the host has written that text; its delay and response are
//! then released onto the link. A step without `expect` is released as soon
//! as the steps before it have been.

use std::time::Duration;

use super::event::MockEvent;

/// A step in a mock scenario.
#[derive(Debug, Clone, Default)]
pub struct ScenarioStep {
    /// Text the host must write before this step fires.
    pub expect: Option<String>,
    /// Reply sent when the step fires.
    pub response: Option<String>,
    /// Silence before the reply.
    pub delay: Duration,
    /// Read error injected after the reply.
    pub error: Option<String>,
}

impl ScenarioStep {
    /// Create a new scenario step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text to wait for.
    #[must_use]
    pub fn expect(mut self, text: impl Into<String>) -> Self {
        self.expect = Some(text.into());
        self
    }

    /// Set the reply to send.
    #[must_use]
    pub fn respond(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Set the delay before the reply.
    #[must_use]
    pub const fn delay(mut self, duration: Duration) -> Self {
        self.delay = duration;
        self
    }

    /// Set the delay in milliseconds.
    #[must_use]
    pub const fn delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    /// Inject a read error after the reply.
    #[must_use]
    pub fn error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(msg.into());
        self
    }

    /// The events this step releases when it fires.
    #[must_use]
    pub fn events(&self) -> Vec<MockEvent> {
        let mut events = Vec::new();
        if !self.delay.is_zero() {
            events.push(MockEvent::delay(self.delay));
        }
        if let Some(response) = &self.response {
            events.push(MockEvent::output_str(response));
        }
        if let Some(error) = &self.error {
            events.push(MockEvent::error(error.clone()));
        }
        events
    }
}

/// A complete mock scenario.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    /// Name of the scenario.
    name: String,
    /// Description of the scenario.
    description: String,
    /// Steps in the scenario.
    steps: Vec<ScenarioStep>,
    /// Output already waiting on the link before any command.
    initial_output: Option<String>,
}

impl Scenario {
    /// Create a new scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set output that is already buffered when the link opens.
    #[must_use]
    pub fn initial_output(mut self, output: impl Into<String>) -> Self {
        self.initial_output = Some(output.into());
        self
    }

    /// Add a step to the scenario.
    #[must_use]
    pub fn step(mut self, step: ScenarioStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Add an expect-respond pair.
    #[must_use]
    pub fn expect_respond(self, expect: impl Into<String>, response: impl Into<String>) -> Self {
        self.step(ScenarioStep::new().expect(expect).respond(response))
    }

    /// Answer the `AT` readiness probe with `OK`.
    #[must_use]
    pub fn ready(self) -> Self {
        self.expect_respond("AT\r\n", "AT\r\r\nOK\r\n")
    }

    /// Get the scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the scenario description.
    #[must_use]
    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// Get the steps.
    #[must_use]
    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    /// Get the initial output.
    #[must_use]
    pub fn get_initial_output(&self) -> Option<&str> {
        self.initial_output.as_deref()
    }
}
