//! Session builder for constructing sessions with custom configuration.

use std::path::Path;
use std::time::Duration;

use super::handle::Session;
use crate::backend::Transport;
use crate::clock::Clock;
use crate::config::env::EnvConfig;
use crate::config::{ModemConfig, TimeoutConfig};
use crate::error::Result;

/// Builder for creating sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: ModemConfig,
}

impl SessionBuilder {
    /// Create a new session builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            config: ModemConfig::load(path)?,
        })
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ModemConfig) -> Self {
        self.config = config;
        self
    }

    /// Set all timeouts.
    #[must_use]
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.config.timeouts = timeouts;
        self
    }

    /// Set the readiness timeout.
    #[must_use]
    pub const fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.ready = timeout;
        self
    }

    /// Set the field read timeout.
    #[must_use]
    pub const fn field_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.field = timeout;
        self
    }

    /// Set the scratch buffer capacity.
    #[must_use]
    pub const fn scratch_capacity(mut self, capacity: usize) -> Self {
        self.config.buffers.scratch = capacity;
        self
    }

    /// Set the serial device path.
    #[must_use]
    pub fn serial_path(mut self, path: impl Into<String>) -> Self {
        self.config.serial.path = Some(path.into());
        self
    }

    /// Apply `SIM900_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn with_env(self) -> Result<Self> {
        self.with_env_prefix(&EnvConfig::default())
    }

    /// Apply environment overrides read through `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn with_env_prefix(mut self, env: &EnvConfig) -> Result<Self> {
        self.config.apply_env(env)?;
        Ok(self)
    }

    /// Get the configuration built so far.
    #[must_use]
    pub const fn get_config(&self) -> &ModemConfig {
        &self.config
    }

    /// Validate the configuration and create a session over `transport`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if validation fails.
    pub fn build<T: Transport, C: Clock>(self, transport: T, clock: C) -> Result<Session<T, C>> {
        self.config.validate()?;
        Ok(Session::new(transport, clock, self.config))
    }

    /// Open the configured serial port and create a session over it.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured or the port cannot be opened.
    #[cfg(feature = "serial")]
    pub fn open_serial(
        self,
    ) -> Result<Session<crate::backend::SerialTransport, crate::clock::SystemClock>> {
        self.config.validate()?;
        let transport = crate::backend::SerialTransport::open(&self.config.serial)?;
        let clock = crate::clock::SystemClock::with_poll_interval(self.config.serial.poll_interval());
        tracing::debug!(path = ?self.config.serial.path, baud = self.config.serial.baud_rate, "serial port opened");
        Ok(Session::new(transport, clock, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::mock::MockTransport;

    #[test]
    fn builder_applies_settings() {
        let session = SessionBuilder::new()
            .ready_timeout(Duration::from_millis(500))
            .field_timeout(Duration::from_millis(20))
            .scratch_capacity(64)
            .build(MockTransport::new(), ManualClock::new())
            .unwrap();

        assert_eq!(session.config().timeouts.ready, Duration::from_millis(500));
        assert_eq!(session.config().timeouts.field, Duration::from_millis(20));
        assert_eq!(session.config().buffers.scratch, 64);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let err = SessionBuilder::new()
            .scratch_capacity(0)
            .build(MockTransport::new(), ManualClock::new())
            .unwrap_err();
        assert!(matches!(err, crate::ModemError::Config { .. }));
    }

    #[test]
    fn builder_keeps_serial_path() {
        let builder = SessionBuilder::new().serial_path("/dev/ttyUSB0");
        assert_eq!(builder.get_config().serial.path.as_deref(), Some("/dev/ttyUSB0"));
    }
}
