//! Sharing one modem between threads.
//!
//! The matcher needs exclusive, ordered access to the byte stream for the
//! whole of a wait, so the lock covers entire workflows rather than single
//! reads or writes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::Transport;
use crate::clock::{Clock, SystemClock};
use crate::session::Session;

/// A session behind a mutex, cheap to clone.
pub struct SharedModem<T: Transport, C: Clock = SystemClock> {
    inner: Arc<Mutex<Session<T, C>>>,
}

impl<T: Transport, C: Clock> SharedModem<T, C> {
    /// Wrap a session.
    #[must_use]
    pub fn new(session: Session<T, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` with exclusive access to the session.
    ///
    /// A panic in another holder does not poison the modem; the next
    /// readiness probe flushes whatever it left on the link.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session<T, C>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Run `f` only if nobody else holds the session.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut Session<T, C>) -> R) -> Option<R> {
        match self.inner.try_lock() {
            Ok(mut session) => Some(f(&mut session)),
            Err(std::sync::TryLockError::Poisoned(poisoned)) => Some(f(&mut poisoned.into_inner())),
            Err(std::sync::TryLockError::WouldBlock) => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session<T, C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of handles sharing this modem.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T: Transport, C: Clock> Clone for SharedModem<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport, C: Clock> std::fmt::Debug for SharedModem<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedModem")
            .field("handles", &self.handle_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ModemConfig;
    use crate::mock::{MockTransport, Scenario};
    use std::thread;

    #[test]
    fn workflows_serialize_across_threads() {
        let mut scenario = Scenario::new("two deletes");
        for _ in 0..2 {
            scenario = scenario.ready().expect_respond("AT+CMGD=", "OK\r\n");
        }
        let transport = MockTransport::from_scenario(&scenario);
        let session = Session::new(transport.clone(), ManualClock::new(), ModemConfig::default());
        let modem = SharedModem::new(session);

        let handles: Vec<_> = (1..=2)
            .map(|id| {
                let modem = modem.clone();
                thread::spawn(move || modem.with(|s| s.delete_sms(id)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let written = transport.take_input_str();
        assert_eq!(written.matches("AT\r\nAT+CMGD=").count(), 2);
    }

    #[test]
    fn try_with_reports_contention() {
        let session = Session::new(MockTransport::new(), ManualClock::new(), ModemConfig::default());
        let modem = SharedModem::new(session);
        let other = modem.clone();
        assert_eq!(modem.handle_count(), 2);

        modem.with(|_| {
            assert!(other.try_with(|_| ()).is_none());
        });
        assert!(other.try_with(|_| ()).is_some());
    }
}
