//! Session handle for talking to a modem.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::backend::Transport;
use crate::clock::{Clock, SystemClock};
use crate::config::ModemConfig;
use crate::error::{ModemError, Result, escape_bytes};
use crate::expect::{CaptureBuffer, MatchOutcome, Matcher, Pattern};

/// A session with one modem.
///
/// The session is the only reader of the transport, so every wait sees an
/// ordered, uninterrupted byte stream. The transport is flushed and closed
/// when the session is closed or dropped.
pub struct Session<T: Transport, C: Clock = SystemClock> {
    /// Pattern matcher that owns the transport.
    matcher: Matcher<T, C>,
    /// Session configuration.
    config: ModemConfig,
    /// Scratch buffer shared by all field reads.
    scratch: CaptureBuffer,
    /// Set once the transport has been released.
    closed: bool,
}

impl<T: Transport, C: Clock> Session<T, C> {
    /// Create a session over `transport`.
    ///
    /// Use [`SessionBuilder`](super::SessionBuilder) to validate the
    /// configuration first.
    pub fn new(transport: T, clock: C, config: ModemConfig) -> Self {
        let scratch = CaptureBuffer::new(config.buffers.scratch);
        Self {
            matcher: Matcher::new(transport, clock),
            config,
            scratch,
            closed: false,
        }
    }

    /// Get the session configuration.
    #[must_use]
    pub const fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Borrow the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        self.matcher.transport()
    }

    /// Borrow the clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        self.matcher.clock()
    }

    /// The most recent inbound bytes, oldest first.
    #[must_use]
    pub fn recent(&self) -> Vec<u8> {
        self.matcher.recent()
    }

    /// Check if the session has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ModemError::io_context(
                "writing to modem",
                std::io::Error::from(std::io::ErrorKind::NotConnected),
            ));
        }
        Ok(())
    }

    /// Send a single byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn send_char(&mut self, byte: u8) -> Result<()> {
        self.ensure_open()?;
        trace!(byte = %escape_bytes(&[byte]), "sending byte");
        ModemError::with_io_context(
            self.matcher.transport_mut().write_byte(byte),
            "writing to modem",
        )
    }

    /// Send command text exactly as given.
    ///
    /// No terminator is appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn send_cmd(&mut self, cmd: &str) -> Result<()> {
        self.ensure_open()?;
        debug!(command = %escape_bytes(cmd.as_bytes()), "sending command");
        ModemError::with_io_context(
            self.matcher.transport_mut().write_str(cmd),
            "writing to modem",
        )
    }

    /// Discard everything the modem has sent so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be drained.
    pub fn flush_serial(&mut self) -> Result<usize> {
        let discarded = ModemError::with_io_context(
            self.matcher.transport_mut().flush_inbound(),
            "flushing modem input",
        )?;
        if discarded > 0 {
            trace!(discarded, "flushed stale input");
        }
        Ok(discarded)
    }

    /// Readiness probe: flush, send `AT`, wait for `OK`.
    ///
    /// Returns `Ok(false)` if the modem stays silent for the ready timeout.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure.
    pub fn send_at(&mut self) -> Result<bool> {
        self.flush_serial()?;
        self.send_cmd("AT\r\n")?;
        let timeout = self.config.timeouts.ready;
        let ready = self.matcher.match_single(&Pattern::OK, timeout, None)?;
        if ready {
            debug!("modem ready");
        } else {
            warn!(timeout_ms = timeout.as_millis() as u64, "modem did not answer AT");
        }
        Ok(ready)
    }

    /// Run the readiness probe, failing with [`ModemError::NotReady`].
    ///
    /// # Errors
    ///
    /// Returns `NotReady` if the modem did not answer.
    pub fn ensure_ready(&mut self) -> Result<()> {
        if self.send_at()? {
            Ok(())
        } else {
            Err(ModemError::NotReady)
        }
    }

    /// Wait for `pattern`, optionally capturing the bytes before it.
    ///
    /// This is the raw matcher contract: `Ok(false)` on timeout.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or capture overflow.
    pub fn wait_for(
        &mut self,
        pattern: &Pattern,
        timeout: Duration,
        capture: Option<&mut CaptureBuffer>,
    ) -> Result<bool> {
        self.matcher.match_single(pattern, timeout, capture)
    }

    /// Race two patterns; `first` wins ties.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub fn wait_for_either(
        &mut self,
        first: &Pattern,
        second: &Pattern,
        timeout: Duration,
    ) -> Result<MatchOutcome> {
        self.matcher.match_either(first, second, timeout)
    }

    /// Wait for `pattern` as one step of a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`ModemError::Timeout`] naming `step` if the pattern does not
    /// arrive within `timeout`.
    pub fn expect(&mut self, step: &str, pattern: &Pattern, timeout: Duration) -> Result<()> {
        if self.matcher.match_single(pattern, timeout, None)? {
            debug!(step, pattern = %pattern, "step confirmed");
            Ok(())
        } else {
            Err(self.timed_out(step, pattern.as_bytes(), timeout))
        }
    }

    /// Read into `capture` up to `pattern`, within the field timeout.
    ///
    /// Returns `Ok(false)` on timeout, leaving whatever arrived in `capture`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or capture overflow.
    pub fn fill_until(&mut self, pattern: &Pattern, capture: &mut CaptureBuffer) -> Result<bool> {
        let timeout = self.config.timeouts.field;
        self.matcher.match_single(pattern, timeout, Some(capture))
    }

    /// Read one field into the scratch buffer and return it as text.
    pub(crate) fn read_field(&mut self, step: &str, terminator: &Pattern) -> Result<String> {
        let timeout = self.config.timeouts.field;
        if self
            .matcher
            .match_single(terminator, timeout, Some(&mut self.scratch))?
        {
            let field = self.scratch.to_string_lossy();
            trace!(step, field = %field, "field read");
            Ok(field)
        } else {
            Err(self.timed_out(step, terminator.as_bytes(), timeout))
        }
    }

    /// Read one field ended by either of two terminators.
    pub(crate) fn read_field_either(
        &mut self,
        step: &str,
        first: &Pattern,
        second: &Pattern,
    ) -> Result<(String, MatchOutcome)> {
        let timeout = self.config.timeouts.field;
        let outcome =
            self.matcher
                .match_either_capture(first, second, timeout, &mut self.scratch)?;
        if outcome.is_match() {
            let field = self.scratch.to_string_lossy();
            trace!(step, field = %field, ?outcome, "field read");
            Ok((field, outcome))
        } else {
            Err(self.timed_out_either(step, first, second, timeout))
        }
    }

    /// Build a timeout error carrying what the modem actually said.
    pub(crate) fn timed_out(&self, step: &str, pattern: &[u8], timeout: Duration) -> ModemError {
        let recent = self.matcher.recent();
        warn!(
            step,
            timeout_ms = timeout.as_millis() as u64,
            received = %escape_bytes(&recent),
            "step timed out"
        );
        ModemError::timeout(step, timeout, pattern, &recent)
    }

    /// Like [`timed_out`](Self::timed_out) for a step that raced two patterns.
    pub(crate) fn timed_out_either(
        &self,
        step: &str,
        first: &Pattern,
        second: &Pattern,
        timeout: Duration,
    ) -> ModemError {
        let recent = self.matcher.recent();
        warn!(
            step,
            timeout_ms = timeout.as_millis() as u64,
            received = %escape_bytes(&recent),
            "step timed out"
        );
        ModemError::timeout_either(step, timeout, first.as_bytes(), second.as_bytes(), &recent)
    }

    /// Flush and close the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing or closing fails. The session counts as
    /// closed either way.
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let flushed = self.flush_serial();
        let closed = ModemError::with_io_context(
            self.matcher.transport_mut().close(),
            "closing modem link",
        );
        debug!("session closed");
        flushed.and(closed)
    }
}

impl<T: Transport, C: Clock> Drop for Session<T, C> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            debug!(error = %e, "error while releasing modem link");
        }
    }
}

impl<T: Transport, C: Clock> std::fmt::Debug for Session<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("scratch", &self.scratch)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::mock::{MockTransport, Scenario};

    fn session(transport: &MockTransport) -> Session<MockTransport, ManualClock> {
        Session::new(transport.clone(), ManualClock::new(), ModemConfig::default())
    }

    #[test]
    fn send_at_flushes_then_probes() {
        let scenario = Scenario::new("probe").initial_output("RING\r\n").ready();
        let transport = MockTransport::from_scenario(&scenario);
        let mut s = session(&transport);

        assert!(s.send_at().unwrap());
        assert_eq!(transport.take_input_str(), "AT\r\n");
        assert_eq!(s.recent(), b"AT\r\r\nOK\r\n");
    }

    #[test]
    fn send_at_times_out_on_silence() {
        let transport = MockTransport::new();
        let mut s = session(&transport);

        assert!(!s.send_at().unwrap());
        assert!(s.clock().now_millis() > 10_000);
        assert!(s.ensure_ready().unwrap_err().is_not_ready());
    }

    #[test]
    fn expect_reports_step_and_received_bytes() {
        let transport = MockTransport::new();
        transport.queue_output_str("ERROR\r\n");
        let mut s = session(&transport);

        let err = s
            .expect("set text mode", &Pattern::OK, Duration::from_millis(20))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("set text mode"));
        assert!(msg.contains("ERROR\\r\\n"));
    }

    #[test]
    fn fill_until_uses_caller_buffer() {
        let transport = MockTransport::new();
        transport.queue_output_str("+15551234567\",\"rest");
        let mut s = session(&transport);
        let mut buf = CaptureBuffer::new(32);

        let sep = Pattern::try_from("\",\"").unwrap();
        assert!(s.fill_until(&sep, &mut buf).unwrap());
        assert_eq!(buf.as_bytes(), b"+15551234567");
    }

    #[test]
    fn send_char_writes_raw_byte() {
        let transport = MockTransport::new();
        let mut s = session(&transport);
        s.send_char(0x1a).unwrap();
        assert_eq!(transport.take_input(), vec![0x1a]);
    }

    #[test]
    fn close_releases_transport() {
        let transport = MockTransport::new();
        let s = session(&transport);
        s.close().unwrap();
        assert!(transport.is_closed());
    }

    #[test]
    fn drop_releases_transport() {
        let transport = MockTransport::new();
        {
            let _s = session(&transport);
        }
        assert!(transport.is_closed());
    }
}
