//! Millisecond clocks for timeout arithmetic.
//!
//! Every wait in this crate is a poll loop: check for a byte, check the
//! clock, repeat. The [`Clock`] trait supplies both the time reading and the
//! "nothing arrived, wait a little" hook, so tests can run the same loops
//! against a [`ManualClock`] without sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic millisecond time source.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_millis(&self) -> u64;

    /// Called by poll loops when no byte was available.
    fn idle(&self) {
        std::hint::spin_loop();
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }

    fn idle(&self) {
        (**self).idle();
    }
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
    poll_interval: Duration,
}

impl SystemClock {
    /// Create a clock that busy-polls between reads.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            poll_interval: Duration::ZERO,
        }
    }

    /// Create a clock that sleeps for `interval` between empty polls.
    #[must_use]
    pub fn with_poll_interval(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            poll_interval: interval,
        }
    }

    /// The sleep between empty polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn idle(&self) {
        if self.poll_interval.is_zero() {
            std::hint::spin_loop();
        } else {
            std::thread::sleep(self.poll_interval);
        }
    }
}

/// A deterministic clock for tests.
///
/// Time only moves when [`advance`](Self::advance) is called or when a poll
/// loop idles, which advances it by a fixed step. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
    step: u64,
}

impl ManualClock {
    /// Create a clock at time zero that advances 1 ms per idle poll.
    #[must_use]
    pub fn new() -> Self {
        Self::with_step(Duration::from_millis(1))
    }

    /// Create a clock at time zero that advances `step` per idle poll.
    #[must_use]
    pub fn with_step(step: Duration) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(0)),
            step: step.as_millis() as u64,
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set_millis(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn idle(&self) {
        self.now.fetch_add(self.step, Ordering::SeqCst);
    }
}
