//! Mock events for scripting modem replies.

use std::collections::VecDeque;
use std::time::Duration;

/// An event on the modem side of a mock link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    /// Bytes the modem sends.
    Output(Vec<u8>),
    /// Silence before the next event, measured on the mock's clock.
    Delay(Duration),
    /// The next read fails with this message.
    Error(String),
}

impl MockEvent {
    /// Create an output event from bytes.
    pub fn output(data: impl Into<Vec<u8>>) -> Self {
        Self::Output(data.into())
    }

    /// Create an output event from a string.
    #[must_use]
    pub fn output_str(s: &str) -> Self {
        Self::Output(s.as_bytes().to_vec())
    }

    /// Create a delay event.
    #[must_use]
    pub const fn delay(duration: Duration) -> Self {
        Self::Delay(duration)
    }

    /// Create a delay event from milliseconds.
    #[must_use]
    pub const fn delay_ms(ms: u64) -> Self {
        Self::Delay(Duration::from_millis(ms))
    }

    /// Create an error event.
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Check if this is an output event.
    #[must_use]
    pub const fn is_output(&self) -> bool {
        matches!(self, Self::Output(_))
    }

    /// Check if this is a delay event.
    #[must_use]
    pub const fn is_delay(&self) -> bool {
        matches!(self, Self::Delay(_))
    }
}

/// A queue of events waiting to be played.
#[derive(Debug, Clone, Default)]
pub struct EventTimeline {
    events: VecDeque<MockEvent>,
}

impl EventTimeline {
    /// Create a new empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timeline from a list of events.
    #[must_use]
    pub fn from_events(events: Vec<MockEvent>) -> Self {
        Self {
            events: events.into(),
        }
    }

    /// Add an event at the end.
    pub fn push(&mut self, event: MockEvent) {
        self.events.push_back(event);
    }

    /// Add several events at the end.
    pub fn extend(&mut self, events: impl IntoIterator<Item = MockEvent>) {
        self.events.extend(events);
    }

    /// Take the next event.
    pub fn pop(&mut self) -> Option<MockEvent> {
        self.events.pop_front()
    }

    /// Peek at the next event without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<&MockEvent> {
        self.events.front()
    }

    /// Check if there are more events.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get the number of remaining events.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_basic() {
        let mut timeline = EventTimeline::new();
        timeline.push(MockEvent::output_str("OK\r\n"));
        timeline.push(MockEvent::delay_ms(100));

        assert!(timeline.has_more());
        assert!(timeline.peek().unwrap().is_output());
        assert!(timeline.pop().unwrap().is_output());
        assert!(timeline.pop().unwrap().is_delay());
        assert!(!timeline.has_more());
    }

    #[test]
    fn timeline_from_events() {
        let mut timeline = EventTimeline::from_events(vec![
            MockEvent::output(b">".to_vec()),
            MockEvent::error("line noise"),
        ]);
        assert_eq!(timeline.remaining(), 2);
        timeline.extend([MockEvent::delay(Duration::from_secs(1))]);
        assert_eq!(timeline.remaining(), 3);
        assert_eq!(timeline.pop(), Some(MockEvent::Output(b">".to_vec())));
    }
}
