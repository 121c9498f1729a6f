//! Integration tests for configuration handling.

use std::time::Duration;

use at_expect::config::env::EnvConfig;
use at_expect::{ModemConfig, ModemError, SessionBuilder, TimeoutConfig};
use pretty_assertions::assert_eq;

#[test]
fn modem_config_default() {
    let config = ModemConfig::default();
    assert_eq!(config.timeouts, TimeoutConfig::default());
    assert_eq!(config.timeouts.field, Duration::from_secs(1));
    assert_eq!(config.buffers.scratch, 256);
    assert_eq!(config.notifications.disable, "AT+CNMI=0,0,0,0,0");
    assert_eq!(config.serial.path, None);
}

#[test]
fn load_from_file() {
    let path = std::env::temp_dir().join(format!("at-expect-config-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
        [timeouts]
        sms_step_ms = 5000

        [buffers]
        scratch = 512

        [notifications]
        enable = "AT+CNMI=2,1,0,0,0"
        "#,
    )
    .unwrap();

    let config = ModemConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.timeouts.sms_step, Duration::from_secs(5));
    assert_eq!(config.buffers.scratch, 512);
    assert_eq!(config.notifications.enable, "AT+CNMI=2,1,0,0,0");
    assert_eq!(config.notifications.disable, "AT+CNMI=0,0,0,0,0");
}

#[test]
fn builder_from_missing_file_fails() {
    let err = SessionBuilder::from_file("/nonexistent/modem.toml").unwrap_err();
    assert!(matches!(err, ModemError::IoWithContext { .. }));
}

#[test]
fn malformed_toml_is_config_error() {
    let err = ModemConfig::from_toml_str("[timeouts\nready_ms = ").unwrap_err();
    assert!(matches!(err, ModemError::Config { .. }));
}

#[test]
#[allow(unsafe_code)]
fn env_overrides_apply() {
    let prefix = "AT_EXPECT_IT_ENV";
    // SAFETY: the variable names are unique to this test.
    unsafe {
        std::env::set_var(format!("{prefix}_READY_TIMEOUT_MS"), "750");
        std::env::set_var(format!("{prefix}_SERIAL_PATH"), "/dev/ttyAMA0");
        std::env::set_var(format!("{prefix}_SCRATCH_CAPACITY"), "128");
    }

    let mut config = ModemConfig::default();
    config.apply_env(&EnvConfig::new(prefix)).unwrap();

    assert_eq!(config.timeouts.ready, Duration::from_millis(750));
    assert_eq!(config.serial.path.as_deref(), Some("/dev/ttyAMA0"));
    assert_eq!(config.buffers.scratch, 128);
    assert_eq!(config.timeouts.delete, Duration::from_secs(10));
}

#[test]
#[allow(unsafe_code)]
fn env_override_that_breaks_validation_is_rejected() {
    let prefix = "AT_EXPECT_IT_BAD_ENV";
    // SAFETY: the variable name is unique to this test.
    unsafe {
        std::env::set_var(format!("{prefix}_SCRATCH_CAPACITY"), "0");
    }

    let mut config = ModemConfig::default();
    assert!(config.apply_env(&EnvConfig::new(prefix)).is_err());
}

#[test]
#[allow(unsafe_code)]
fn unparsable_env_names_the_variable() {
    let prefix = "AT_EXPECT_IT_TYPO_ENV";
    // SAFETY: the variable name is unique to this test.
    unsafe {
        std::env::set_var(format!("{prefix}_FIELD_TIMEOUT_MS"), "1s");
    }

    let mut config = ModemConfig::default();
    let err = config.apply_env(&EnvConfig::new(prefix)).unwrap_err();
    assert!(err.to_string().contains("AT_EXPECT_IT_TYPO_ENV_FIELD_TIMEOUT_MS"));
}

#[test]
fn unset_env_changes_nothing() {
    let mut config = ModemConfig::default();
    config
        .apply_env(&EnvConfig::new("AT_EXPECT_IT_NOTHING_SET"))
        .unwrap();
    assert_eq!(config, ModemConfig::default());
}
