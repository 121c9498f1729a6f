//! Built-in mock scenarios for common modem exchanges.
//!
//! Replies follow what SIM900 firmware sends with echo enabled.

use super::scenario::{Scenario, ScenarioStep};

/// A modem that answers the readiness probe and nothing else.
#[must_use]
pub fn ready_scenario() -> Scenario {
    Scenario::new("ready")
        .description("Answers AT with OK")
        .ready()
}

/// A modem that never says anything.
#[must_use]
pub fn unresponsive_scenario() -> Scenario {
    Scenario::new("unresponsive").description("Silent link")
}

/// A modem that answers the readiness probe after `delay_ms`.
#[must_use]
pub fn slow_ready_scenario(delay_ms: u64) -> Scenario {
    Scenario::new("slow ready")
        .description("Answers AT late")
        .step(
            ScenarioStep::new()
                .expect("AT\r\n")
                .delay_ms(delay_ms)
                .respond("AT\r\r\nOK\r\n"),
        )
}

/// A successful text-mode send to `number`.
#[must_use]
pub fn send_sms_scenario(number: &str) -> Scenario {
    Scenario::new("send sms")
        .description("Text mode, recipient prompt, submission")
        .ready()
        .expect_respond("AT+CMGF=1\r\n", "AT+CMGF=1\r\r\nOK\r\n")
        .expect_respond(format!("AT+CMGS=\"{number}\"\r\n"), "\r\n> ")
        .step(
            ScenarioStep::new()
                .expect("\u{1a}")
                .delay_ms(300)
                .respond("\r\n+CMGS: 14\r\n\r\nOK\r\n"),
        )
}

/// A listing that replies with `entries` followed by the final `OK`.
///
/// `entries` is the raw `+CMGL: ...` text, one or more entries.
#[must_use]
pub fn listing_scenario(entries: &str) -> Scenario {
    Scenario::new("listing")
        .description("AT+CMGL with stored messages")
        .ready()
        .expect_respond("AT+CMGL=", format!("\r\n{entries}\r\nOK\r\n"))
}

/// A listing with no stored messages.
#[must_use]
pub fn empty_listing_scenario() -> Scenario {
    Scenario::new("empty listing")
        .description("AT+CMGL with nothing stored")
        .ready()
        .expect_respond("AT+CMGL=", "\r\nOK\r\n")
}

/// A successful delete of message `id`.
#[must_use]
pub fn delete_scenario(id: u32) -> Scenario {
    Scenario::new("delete")
        .description("AT+CMGD acknowledged")
        .ready()
        .expect_respond(format!("AT+CMGD={id}\r\n"), "\r\nOK\r\n")
}

/// A modem that acknowledges `command` after the readiness probe.
#[must_use]
pub fn command_scenario(command: &str) -> Scenario {
    Scenario::new("command")
        .description("Single command acknowledged")
        .ready()
        .expect_respond(format!("{command}\r\n"), "\r\nOK\r\n")
}

/// A modem that rejects `command` with `ERROR`.
#[must_use]
pub fn error_scenario(command: &str) -> Scenario {
    Scenario::new("error")
        .description("Single command rejected")
        .ready()
        .expect_respond(format!("{command}\r\n"), "\r\nERROR\r\n")
}
