//! Scripted transport for testing.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::event::{EventTimeline, MockEvent};
use super::scenario::{Scenario, ScenarioStep};
use crate::backend::Transport;
use crate::clock::{Clock, ManualClock};

/// Shared state for the mock transport.
#[derive(Debug, Default)]
struct MockState {
    /// Bytes readable right now.
    output: VecDeque<u8>,
    /// Everything the host wrote since the last `take_input`.
    input: Vec<u8>,
    /// Written bytes not yet consumed by a step's `expect`.
    unmatched: Vec<u8>,
    /// Released events not yet played.
    timeline: EventTimeline,
    /// Scenario steps not yet fired.
    steps: VecDeque<ScenarioStep>,
    /// Clock that `Delay` events are measured on.
    clock: Option<ManualClock>,
    /// End of the delay currently being served.
    hold_until: Option<u64>,
    /// Error to return on next read.
    error: Option<String>,
    /// Whether `close` was called.
    closed: bool,
}

impl MockState {
    /// Fire satisfied steps and play released events up to the first
    /// delay that has not elapsed yet.
    fn pump(&mut self) {
        loop {
            self.fire_steps();

            let Some(event) = self.timeline.peek() else {
                return;
            };
            match event {
                MockEvent::Output(data) => {
                    self.output.extend(data);
                }
                MockEvent::Error(msg) => {
                    self.error = Some(msg.clone());
                }
                MockEvent::Delay(d) => {
                    if let Some(clock) = &self.clock {
                        let now = clock.now_millis();
                        let until = *self
                            .hold_until
                            .get_or_insert(now + d.as_millis() as u64);
                        if now < until {
                            return;
                        }
                        self.hold_until = None;
                    }
                }
            }
            self.timeline.pop();
        }
    }

    fn fire_steps(&mut self) {
        while let Some(step) = self.steps.front() {
            if let Some(expect) = &step.expect {
                let needle = expect.as_bytes();
                let Some(pos) = find(&self.unmatched, needle) else {
                    return;
                };
                self.unmatched.drain(..pos + needle.len());
            }
            if let Some(step) = self.steps.pop_front() {
                self.timeline.extend(step.events());
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A mock modem link.
///
/// Clones share the same state, so a test can keep one handle to inspect
/// what the session wrote after handing the other to it.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create an idle mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport that plays a fixed timeline.
    #[must_use]
    pub fn from_timeline(timeline: EventTimeline) -> Self {
        let transport = Self::new();
        transport.lock().timeline = timeline;
        transport
    }

    /// Create a mock transport that follows a scenario.
    #[must_use]
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let transport = Self::new();
        {
            let mut state = transport.lock();
            if let Some(initial) = scenario.get_initial_output() {
                state.output.extend(initial.as_bytes());
            }
            state.steps = scenario.steps().iter().cloned().collect();
        }
        transport
    }

    /// Measure `Delay` events against `clock`.
    ///
    /// Without a clock, delays are skipped.
    #[must_use]
    pub fn with_clock(self, clock: ManualClock) -> Self {
        self.lock().clock = Some(clock);
        self
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue output to be read.
    pub fn queue_output(&self, data: &[u8]) {
        self.lock().output.extend(data);
    }

    /// Queue a string to be read.
    pub fn queue_output_str(&self, s: &str) {
        self.queue_output(s.as_bytes());
    }

    /// Append an event to the timeline.
    pub fn push_event(&self, event: MockEvent) {
        self.lock().timeline.push(event);
    }

    /// Bytes that are readable right now, without consuming them.
    #[must_use]
    pub fn pending_output(&self) -> Vec<u8> {
        let mut state = self.lock();
        state.pump();
        state.output.iter().copied().collect()
    }

    /// Get data that was written by the host.
    #[must_use]
    pub fn take_input(&self) -> Vec<u8> {
        std::mem::take(&mut self.lock().input)
    }

    /// Get written data as a string.
    #[must_use]
    pub fn take_input_str(&self) -> String {
        String::from_utf8_lossy(&self.take_input()).into_owned()
    }

    /// Data written so far, without draining it.
    #[must_use]
    pub fn written(&self) -> Vec<u8> {
        self.lock().input.clone()
    }

    /// Make the next read fail.
    pub fn set_error(&self, msg: impl Into<String>) {
        self.lock().error = Some(msg.into());
    }

    /// Number of scenario steps that have not fired.
    #[must_use]
    pub fn remaining_steps(&self) -> usize {
        self.lock().steps.len()
    }

    /// Whether the host closed the link.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl Transport for MockTransport {
    fn has_byte(&mut self) -> io::Result<bool> {
        let mut state = self.lock();
        state.pump();
        if let Some(msg) = state.error.take() {
            return Err(io::Error::other(msg));
        }
        Ok(!state.output.is_empty())
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut state = self.lock();
        state.pump();
        state
            .output
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::WouldBlock))
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        state.input.extend_from_slice(data);
        state.unmatched.extend_from_slice(data);
        Ok(())
    }

    fn flush_inbound(&mut self) -> io::Result<usize> {
        let mut state = self.lock();
        state.pump();
        let discarded = state.output.len();
        state.output.clear();
        Ok(discarded)
    }

    fn close(&mut self) -> io::Result<()> {
        self.lock().closed = true;
        Ok(())
    }
}
