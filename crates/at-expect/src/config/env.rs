//! Environment-based configuration.
//!
//! Variables are named `<PREFIX>_<KEY>`, e.g. `SIM900_READY_TIMEOUT_MS`.
//! A variable that is set but unparsable is an error.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{ModemError, Result};

/// Environment configuration prefix.
pub const DEFAULT_PREFIX: &str = "SIM900";

/// Environment variable reader.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Prefix for environment variables.
    prefix: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EnvConfig {
    /// Create a reader for `<prefix>_*` variables.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The full variable name for `key`.
    #[must_use]
    pub fn var_name(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, key.to_uppercase())
        }
    }

    /// Raw value of `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        std::env::var(self.var_name(key)).ok()
    }

    /// Parsed value of `key`, if set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the variable if it does not parse.
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.trim().parse().map(Some).map_err(|_| {
            ModemError::config(format!("{}: cannot parse '{raw}'", self.var_name(key)))
        })
    }

    /// A millisecond count as a duration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the value is not a whole number.
    pub fn duration_millis(&self, key: &str) -> Result<Option<Duration>> {
        Ok(self.parse::<u64>(key)?.map(Duration::from_millis))
    }
}
