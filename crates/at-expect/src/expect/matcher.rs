//! Streaming, timeout-bounded pattern matching engine.
//!
//! The matcher pulls bytes from a [`Transport`] one at a time and stops as
//! soon as a terminator completes, so bytes after the terminator stay in the
//! transport for the next read. This is what lets a reply be decomposed
//! field by field with successive delimiter-bounded waits.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::trace;

use super::capture::CaptureBuffer;
use super::pattern::Pattern;
use super::state::MatchState;
use crate::backend::Transport;
use crate::clock::Clock;
use crate::error::Result;

/// How many recently received bytes are kept for diagnostics.
pub const RECENT_CAPACITY: usize = 128;

/// Which of two raced patterns completed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Neither pattern completed before the timeout.
    Neither,
    /// The first pattern completed (also wins ties on the same byte).
    First,
    /// The second pattern completed.
    Second,
}

impl MatchOutcome {
    /// Check if either pattern matched.
    #[must_use]
    pub const fn is_match(self) -> bool {
        !matches!(self, Self::Neither)
    }
}

/// The pattern matching engine.
///
/// Owns the transport and clock for its lifetime: only one wait can read
/// the byte stream at a time.
pub struct Matcher<T, C> {
    transport: T,
    clock: C,
    recent: VecDeque<u8>,
}

impl<T: Transport, C: Clock> Matcher<T, C> {
    /// Create a matcher over `transport`, timing waits with `clock`.
    pub fn new(transport: T, clock: C) -> Self {
        Self {
            transport,
            clock,
            recent: VecDeque::with_capacity(RECENT_CAPACITY),
        }
    }

    /// Wait for `pattern`, optionally capturing everything read.
    ///
    /// Returns `Ok(true)` as soon as the pattern completes, without reading
    /// any further byte. The capture buffer is cleared first; on success it
    /// holds exactly the bytes that preceded the terminator. On timeout it
    /// returns `Ok(false)` and the capture holds whatever arrived.
    ///
    /// Fails with [`CapacityExceeded`](crate::ModemError::CapacityExceeded)
    /// if the capture fills before the terminator arrives.
    pub fn match_single(
        &mut self,
        pattern: &Pattern,
        timeout: Duration,
        capture: Option<&mut CaptureBuffer>,
    ) -> Result<bool> {
        let found = self.race(&[pattern], timeout, capture)?;
        Ok(found.is_some())
    }

    /// Race two patterns over the same stream.
    ///
    /// If both complete on the same byte, `first` wins.
    pub fn match_either(
        &mut self,
        first: &Pattern,
        second: &Pattern,
        timeout: Duration,
    ) -> Result<MatchOutcome> {
        self.match_either_inner(first, second, timeout, None)
    }

    /// Race two patterns while capturing, trimming whichever terminator won.
    pub fn match_either_capture(
        &mut self,
        first: &Pattern,
        second: &Pattern,
        timeout: Duration,
        capture: &mut CaptureBuffer,
    ) -> Result<MatchOutcome> {
        self.match_either_inner(first, second, timeout, Some(capture))
    }

    fn match_either_inner(
        &mut self,
        first: &Pattern,
        second: &Pattern,
        timeout: Duration,
        capture: Option<&mut CaptureBuffer>,
    ) -> Result<MatchOutcome> {
        Ok(match self.race(&[first, second], timeout, capture)? {
            Some(0) => MatchOutcome::First,
            Some(_) => MatchOutcome::Second,
            None => MatchOutcome::Neither,
        })
    }

    /// Core poll loop: index of the first pattern to complete, earliest
    /// index winning ties.
    fn race(
        &mut self,
        patterns: &[&Pattern],
        timeout: Duration,
        mut capture: Option<&mut CaptureBuffer>,
    ) -> Result<Option<usize>> {
        let mut states: Vec<MatchState<'_>> = patterns.iter().map(|p| MatchState::new(p)).collect();
        let limit = timeout.as_millis() as u64;
        let start = self.clock.now_millis();

        if let Some(buf) = capture.as_deref_mut() {
            buf.clear();
        }

        loop {
            if self.transport.has_byte()? {
                let byte = self.transport.read_byte()?;
                self.remember(byte);

                if let Some(buf) = capture.as_deref_mut() {
                    buf.push(byte)?;
                }

                let mut winner = None;
                for (idx, state) in states.iter_mut().enumerate() {
                    if state.advance(byte) && winner.is_none() {
                        winner = Some(idx);
                    }
                }

                if let Some(idx) = winner {
                    if let Some(buf) = capture.as_deref_mut() {
                        buf.trim_trailing(patterns[idx].len());
                    }
                    trace!(
                        pattern = %patterns[idx],
                        elapsed_ms = self.clock.now_millis().saturating_sub(start),
                        "pattern matched"
                    );
                    return Ok(Some(idx));
                }
            } else {
                self.clock.idle();
            }

            if self.clock.now_millis().saturating_sub(start) > limit {
                trace!(timeout_ms = limit, "wait timed out");
                return Ok(None);
            }
        }
    }

    fn remember(&mut self, byte: u8) {
        if self.recent.len() == RECENT_CAPACITY {
            self.recent.pop_front();
        }
        self.recent.push_back(byte);
    }

    /// The most recently received bytes, oldest first.
    #[must_use]
    pub fn recent(&self) -> Vec<u8> {
        self.recent.iter().copied().collect()
    }

    /// Forget the diagnostic history.
    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }

    /// Borrow the transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport, e.g. to write a command.
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Borrow the clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }
}

impl<T, C> std::fmt::Debug for Matcher<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("recent_len", &self.recent.len())
            .finish()
    }
}
