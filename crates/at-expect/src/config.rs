//! Configuration types for at-expect.
//!
//! Defaults reproduce the timings SIM900 modules are known to work with.
//! Every section can be overridden from a TOML file
//! ([`ModemConfig::load`]) and then from `SIM900_*` environment variables
//! ([`ModemConfig::apply_env`]).

pub mod env;

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ModemError, Result};
use env::EnvConfig;

/// Default timeout for the `AT` readiness probe.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default timeout for each step of sending an SMS.
pub const DEFAULT_SMS_STEP_TIMEOUT: Duration = Duration::from_millis(2_500);

/// Default timeout for command/delete/notification acknowledgements.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default timeout for each delimiter-bounded field read.
pub const DEFAULT_FIELD_TIMEOUT: Duration = Duration::from_millis(1_000);

/// Default scratch buffer capacity for field extraction.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 256;

/// Default serial baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 9_600;

/// `AT+CNMI` string that routes new-message indications to the host.
pub const DEFAULT_NOTIFICATIONS_ENABLE: &str = "AT+CNMI=1,2,0,0,0";

/// `AT+CNMI` string that silences new-message indications.
pub const DEFAULT_NOTIFICATIONS_DISABLE: &str = "AT+CNMI=0,0,0,0,0";

/// Top-level modem configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModemConfig {
    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Buffer configuration.
    pub buffers: BufferConfig,

    /// Notification command strings.
    pub notifications: NotificationConfig,

    /// Serial link configuration.
    pub serial: SerialConfig,
}

impl ModemConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ModemError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModemError::io_context(format!("reading config {}", path.display()), e)
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `SIM900_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable does not parse or the result fails
    /// validation.
    pub fn apply_env(&mut self, env: &EnvConfig) -> Result<()> {
        if let Some(path) = env.get("serial_path") {
            self.serial.path = Some(path);
        }
        if let Some(baud) = env.parse("baud_rate")? {
            self.serial.baud_rate = baud;
        }
        if let Some(ms) = env.parse("poll_interval_ms")? {
            self.serial.poll_interval_ms = ms;
        }

        let timeouts = [
            ("ready_timeout_ms", &mut self.timeouts.ready),
            ("sms_step_timeout_ms", &mut self.timeouts.sms_step),
            ("list_timeout_ms", &mut self.timeouts.list),
            ("delete_timeout_ms", &mut self.timeouts.delete),
            ("notifications_timeout_ms", &mut self.timeouts.notifications),
            ("field_timeout_ms", &mut self.timeouts.field),
        ];
        for (key, slot) in timeouts {
            if let Some(d) = env.duration_millis(key)? {
                *slot = d;
            }
        }

        if let Some(n) = env.parse("scratch_capacity")? {
            self.buffers.scratch = n;
        }
        self.validate()
    }

    /// Check invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.buffers.scratch == 0 {
            return Err(ModemError::config("buffers.scratch must be non-zero"));
        }
        if self.serial.baud_rate == 0 {
            return Err(ModemError::config("serial.baud_rate must be non-zero"));
        }
        for (name, cmd) in [
            ("notifications.enable", &self.notifications.enable),
            ("notifications.disable", &self.notifications.disable),
        ] {
            if cmd.is_empty() || cmd.contains(['\r', '\n']) {
                return Err(ModemError::config(format!(
                    "{name} must be a single non-empty command line"
                )));
            }
        }
        Ok(())
    }

    /// Set the timeout configuration.
    #[must_use]
    pub const fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the scratch buffer capacity.
    #[must_use]
    pub const fn scratch_capacity(mut self, capacity: usize) -> Self {
        self.buffers.scratch = capacity;
        self
    }

    /// Set the serial port path.
    #[must_use]
    pub fn serial_path(mut self, path: impl Into<String>) -> Self {
        self.serial.path = Some(path.into());
        self
    }

    /// Set the serial baud rate.
    #[must_use]
    pub const fn baud_rate(mut self, baud: u32) -> Self {
        self.serial.baud_rate = baud;
        self
    }
}

/// Configuration for timeouts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Wait for `OK` after the `AT` probe.
    #[serde(rename = "ready_ms", with = "millis")]
    pub ready: Duration,

    /// Wait for each acknowledgement while sending an SMS.
    #[serde(rename = "sms_step_ms", with = "millis")]
    pub sms_step: Duration,

    /// Wait for the first `+CMGL: ` or `OK` after listing.
    #[serde(rename = "list_ms", with = "millis")]
    pub list: Duration,

    /// Wait for `OK` after deleting.
    #[serde(rename = "delete_ms", with = "millis")]
    pub delete: Duration,

    /// Wait for `OK` after toggling notifications.
    #[serde(rename = "notifications_ms", with = "millis")]
    pub notifications: Duration,

    /// Wait for each field delimiter while decomposing a listing.
    #[serde(rename = "field_ms", with = "millis")]
    pub field: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            ready: DEFAULT_READY_TIMEOUT,
            sms_step: DEFAULT_SMS_STEP_TIMEOUT,
            list: DEFAULT_COMMAND_TIMEOUT,
            delete: DEFAULT_COMMAND_TIMEOUT,
            notifications: DEFAULT_COMMAND_TIMEOUT,
            field: DEFAULT_FIELD_TIMEOUT,
        }
    }
}

impl TimeoutConfig {
    /// Create a timeout configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the readiness timeout.
    #[must_use]
    pub const fn ready(mut self, timeout: Duration) -> Self {
        self.ready = timeout;
        self
    }

    /// Set the per-step SMS send timeout.
    #[must_use]
    pub const fn sms_step(mut self, timeout: Duration) -> Self {
        self.sms_step = timeout;
        self
    }

    /// Set the listing timeout.
    #[must_use]
    pub const fn list(mut self, timeout: Duration) -> Self {
        self.list = timeout;
        self
    }

    /// Set the delete timeout.
    #[must_use]
    pub const fn delete(mut self, timeout: Duration) -> Self {
        self.delete = timeout;
        self
    }

    /// Set the notification toggle timeout.
    #[must_use]
    pub const fn notifications(mut self, timeout: Duration) -> Self {
        self.notifications = timeout;
        self
    }

    /// Set the field read timeout.
    #[must_use]
    pub const fn field(mut self, timeout: Duration) -> Self {
        self.field = timeout;
        self
    }
}

/// Configuration for capture buffers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BufferConfig {
    /// Capacity of the scratch buffer shared by all field reads.
    ///
    /// Must cover the longest field plus its terminator.
    pub scratch: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            scratch: DEFAULT_SCRATCH_CAPACITY,
        }
    }
}

/// `AT+CNMI` command lines (without the trailing CRLF).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    /// Sent by `notifications_enable`.
    pub enable: String,

    /// Sent by `notifications_disable`.
    pub disable: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enable: DEFAULT_NOTIFICATIONS_ENABLE.to_string(),
            disable: DEFAULT_NOTIFICATIONS_DISABLE.to_string(),
        }
    }
}

/// Serial link settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0`.
    pub path: Option<String>,

    /// Baud rate.
    pub baud_rate: u32,

    /// Sleep between empty polls; zero busy-polls.
    pub poll_interval_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: None,
            baud_rate: DEFAULT_BAUD_RATE,
            poll_interval_ms: 0,
        }
    }
}

impl SerialConfig {
    /// The sleep between empty polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Per-read timeout handed to the OS driver.
    ///
    /// Reads only happen once a byte is known to be waiting, so this is just
    /// a safety net.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_millis(100)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
