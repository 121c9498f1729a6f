//! SMS workflows on a session.

use tracing::{debug, info};

use super::types::{Sms, SmsStatus, parse_index};
use crate::backend::Transport;
use crate::clock::Clock;
use crate::error::{ModemError, Result};
use crate::expect::{MatchOutcome, Pattern};
use crate::session::{CRLF, CTRL_Z, Session};
use crate::validation::{validate_message, validate_phone_number, validate_status};

/// Ends the message index: `3,"`.
const INDEX_END: Pattern = Pattern::from_static(b",\"");
/// Separates two quoted fields: `","`.
const QUOTED_SEP: Pattern = Pattern::from_static(b"\",\"");
/// Quoted field followed by an empty unquoted one: `",,`.
const EMPTY_SEP: Pattern = Pattern::from_static(b"\",,");
/// Ends a quoted field followed by a comma: `",`.
const QUOTED_END: Pattern = Pattern::from_static(b"\",");
/// Ends a quoted timestamp and its line: `"\r\n`.
const TIMESTAMP_END: Pattern = Pattern::from_static(b"\"\r\n");
/// Ends the body line.
const LINE_END: Pattern = Pattern::from_static(b"\r\n");

impl<T: Transport, C: Clock> Session<T, C> {
    /// Send a text-mode SMS.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `number` or `message` cannot be framed.
    /// - `NotReady` if the modem did not answer `AT`.
    /// - `Timeout` naming the first step that was not acknowledged.
    pub fn send_sms(&mut self, number: &str, message: &str) -> Result<()> {
        validate_phone_number(number)?;
        validate_message(message)?;
        self.ensure_ready()?;

        let timeout = self.config().timeouts.sms_step;

        self.send_cmd("AT+CMGF=1\r\n")?;
        self.expect("set text mode", &Pattern::OK, timeout)?;

        self.send_cmd(&format!("AT+CMGS=\"{number}\"{CRLF}"))?;
        self.expect("address recipient", &Pattern::PROMPT, timeout)?;

        self.send_cmd(message)?;
        self.send_char(CTRL_Z)?;
        self.expect("submit message", &Pattern::OK, timeout)?;

        info!(number, len = message.len(), "sms sent");
        Ok(())
    }

    /// Fetch the first stored message matching `status`.
    ///
    /// Returns `Ok(None)` when the listing is empty. With
    /// `leave_unmodified`, unread messages stay unread.
    ///
    /// # Errors
    ///
    /// - `NotReady` if the modem did not answer `AT`.
    /// - `Timeout` if the listing or one of its fields did not arrive.
    pub fn next_sms(&mut self, status: SmsStatus, leave_unmodified: bool) -> Result<Option<Sms>> {
        self.next_sms_with_filter(status.as_str(), leave_unmodified)
    }

    /// Like [`next_sms`](Self::next_sms) with a raw status filter string.
    ///
    /// # Errors
    ///
    /// Also returns `InvalidArgument` if `status` cannot be framed.
    pub fn next_sms_with_filter(
        &mut self,
        status: &str,
        leave_unmodified: bool,
    ) -> Result<Option<Sms>> {
        validate_status(status)?;
        self.ensure_ready()?;

        self.send_cmd(&format!(
            "AT+CMGL=\"{status}\",{}{CRLF}",
            u8::from(leave_unmodified)
        ))?;

        let timeout = self.config().timeouts.list;
        match self.wait_for_either(&Pattern::CMGL, &Pattern::OK, timeout)? {
            MatchOutcome::First => self.read_listing_entry().map(Some),
            MatchOutcome::Second => {
                debug!(status, "no message listed");
                Ok(None)
            }
            MatchOutcome::Neither => Err(self.timed_out_either(
                "list messages",
                &Pattern::CMGL,
                &Pattern::OK,
                timeout,
            )),
        }
    }

    /// Decompose one `+CMGL: ` entry. The prefix has already been consumed.
    ///
    /// Received messages end their header with `"<timestamp>"`; stored
    /// messages carry no timestamp and end it with a bare comma.
    fn read_listing_entry(&mut self) -> Result<Sms> {
        let id = parse_index(&self.read_field("message index", &INDEX_END)?);

        self.read_field("message status", &QUOTED_SEP)?;

        // The fourth field is opaque. Most firmware sends it quoted, some
        // leave it out entirely (`"<phone>",,"<timestamp>`).
        let (phone_number, outcome) =
            self.read_field_either("phone number", &QUOTED_SEP, &EMPTY_SEP)?;
        if outcome == MatchOutcome::First {
            self.read_field("opaque field", &QUOTED_END)?;
        }

        let (timestamp, _) = self.read_field_either("timestamp", &TIMESTAMP_END, &LINE_END)?;
        let timestamp = timestamp.trim_matches('"').to_owned();
        let message = self.read_field("message body", &LINE_END)?;

        debug!(id, phone = %phone_number, "message listed");
        Ok(Sms {
            id,
            phone_number,
            timestamp,
            message,
        })
    }

    /// Delete the message stored at `id`.
    ///
    /// # Errors
    ///
    /// - `NotReady` if the modem did not answer `AT`.
    /// - `Timeout` if the deletion was not acknowledged.
    pub fn delete_sms(&mut self, id: u32) -> Result<()> {
        self.ensure_ready()?;
        self.send_cmd(&format!("AT+CMGD={id}{CRLF}"))?;
        let timeout = self.config().timeouts.delete;
        self.expect("delete message", &Pattern::OK, timeout)?;
        debug!(id, "message deleted");
        Ok(())
    }

    /// Route new-message indications to the host.
    ///
    /// # Errors
    ///
    /// - `NotReady` if the modem did not answer `AT`.
    /// - `Timeout` if the setting was not acknowledged.
    pub fn notifications_enable(&mut self) -> Result<()> {
        let cmd = self.config().notifications.enable.clone();
        self.set_notifications("enable notifications", &cmd)
    }

    /// Stop new-message indications.
    ///
    /// # Errors
    ///
    /// - `NotReady` if the modem did not answer `AT`.
    /// - `Timeout` if the setting was not acknowledged.
    pub fn notifications_disable(&mut self) -> Result<()> {
        let cmd = self.config().notifications.disable.clone();
        self.set_notifications("disable notifications", &cmd)
    }

    fn set_notifications(&mut self, step: &str, cmd: &str) -> Result<()> {
        if cmd.contains(['\r', '\n']) {
            return Err(ModemError::invalid_argument(
                "notification command",
                "must be a single line",
            ));
        }
        self.ensure_ready()?;
        self.send_cmd(&format!("{cmd}{CRLF}"))?;
        let timeout = self.config().timeouts.notifications;
        self.expect(step, &Pattern::OK, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ModemConfig;
    use crate::mock::{MockTransport, Scenario};

    fn session(scenario: &Scenario) -> (Session<MockTransport, ManualClock>, MockTransport) {
        let transport = MockTransport::from_scenario(scenario);
        let session = Session::new(transport.clone(), ManualClock::new(), ModemConfig::default());
        (session, transport)
    }

    #[test]
    fn send_sms_full_exchange() {
        let scenario = Scenario::new("send")
            .ready()
            .expect_respond("AT+CMGF=1\r\n", "OK\r\n")
            .expect_respond("AT+CMGS=\"+15551234567\"\r\n", "\r\n> ")
            .expect_respond("\u{1a}", "\r\n+CMGS: 14\r\n\r\nOK\r\n");
        let (mut s, transport) = session(&scenario);

        s.send_sms("+15551234567", "Hi").unwrap();
        assert_eq!(
            transport.take_input_str(),
            "AT\r\nAT+CMGF=1\r\nAT+CMGS=\"+15551234567\"\r\nHi\u{1a}"
        );
    }

    #[test]
    fn send_sms_stops_at_missing_prompt() {
        let scenario = Scenario::new("no prompt")
            .ready()
            .expect_respond("AT+CMGF=1\r\n", "OK\r\n")
            .expect_respond("AT+CMGS=", "ERROR\r\n");
        let (mut s, transport) = session(&scenario);

        let err = s.send_sms("+15551234567", "Hi").unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("address recipient"));
        assert!(!transport.take_input_str().contains("Hi"));
    }

    #[test]
    fn send_sms_rejects_bad_number_before_writing() {
        let (mut s, transport) = session(&Scenario::new("idle"));
        assert!(s.send_sms("+1\"555", "Hi").is_err());
        assert!(transport.take_input().is_empty());
    }

    #[test]
    fn next_sms_quoted_opaque_field() {
        let scenario = Scenario::new("list").ready().expect_respond(
            "AT+CMGL=\"REC READ\",1\r\n",
            "\r\n+CMGL: 12,\"REC READ\",\"+4479\",\"\",\"21/02/03,04:05:06+04\"\r\nSee you\r\n\r\nOK\r\n",
        );
        let (mut s, _) = session(&scenario);

        let sms = s.next_sms(SmsStatus::RecRead, true).unwrap().unwrap();
        assert_eq!(sms.id, 12);
        assert_eq!(sms.phone_number, "+4479");
        assert_eq!(sms.timestamp, "21/02/03,04:05:06+04");
        assert_eq!(sms.message, "See you");
    }

    #[test]
    fn next_sms_truncated_reply_times_out() {
        let scenario = Scenario::new("cut")
            .ready()
            .expect_respond("AT+CMGL=", "+CMGL: 1,\"REC UNREAD\",\"+1");
        let (mut s, _) = session(&scenario);

        let err = s.next_sms(SmsStatus::RecUnread, false).unwrap_err();
        assert!(err.to_string().contains("phone number"));
    }

    #[test]
    fn next_sms_stored_entry_has_no_timestamp() {
        let scenario = Scenario::new("stored").ready().expect_respond(
            "AT+CMGL=\"STO UNSENT\",1\r\n",
            "\r\n+CMGL: 1,\"STO UNSENT\",\"+1555\",\"\",\r\nDraft\r\n\r\nOK\r\n",
        );
        let (mut s, _) = session(&scenario);

        let sms = s.next_sms(SmsStatus::StoUnsent, true).unwrap().unwrap();
        assert_eq!(sms.id, 1);
        assert_eq!(sms.phone_number, "+1555");
        assert_eq!(sms.timestamp, "");
        assert_eq!(sms.message, "Draft");
    }

    #[test]
    fn next_sms_stored_entry_with_unquoted_opaque_field() {
        let scenario = Scenario::new("stored").ready().expect_respond(
            "AT+CMGL=\"STO SENT\",0\r\n",
            "\r\n+CMGL: 2,\"STO SENT\",\"+1555\",,\r\nDone\r\n\r\nOK\r\n",
        );
        let (mut s, _) = session(&scenario);

        let sms = s.next_sms(SmsStatus::StoSent, false).unwrap().unwrap();
        assert_eq!(sms.id, 2);
        assert_eq!(sms.phone_number, "+1555");
        assert!(sms.timestamp.is_empty());
        assert_eq!(sms.message, "Done");
    }

    #[test]
    fn next_sms_error_reply_times_out_naming_both_patterns() {
        let scenario = Scenario::new("error")
            .ready()
            .expect_respond("AT+CMGL=", "\r\nERROR\r\n");
        let (mut s, _) = session(&scenario);

        let err = s.next_sms(SmsStatus::All, true).unwrap_err();
        let ModemError::Timeout {
            ref step,
            ref pattern,
            ref alternative,
            ..
        } = err
        else {
            panic!("expected timeout, got {err:?}");
        };
        assert_eq!(step, "list messages");
        assert_eq!(pattern, "+CMGL: ");
        assert_eq!(alternative.as_deref(), Some("OK\\r\\n"));
        assert!(err.buffer().is_some_and(|b| b.contains("ERROR")));
    }

    #[test]
    fn next_sms_oversized_body_exceeds_scratch() {
        let body = "x".repeat(300);
        let scenario = Scenario::new("long").ready().expect_respond(
            "AT+CMGL=",
            format!(
                "+CMGL: 5,\"REC UNREAD\",\"+1555\",\"\",\"21/01/01,12:00:00+00\"\r\n{body}\r\n\r\nOK\r\n"
            ),
        );
        let (mut s, _) = session(&scenario);

        let err = s.next_sms(SmsStatus::RecUnread, false).unwrap_err();
        assert!(matches!(err, ModemError::CapacityExceeded { capacity: 256 }));
    }

    #[test]
    fn next_sms_rejects_unframeable_filter_before_writing() {
        let (mut s, transport) = session(&Scenario::new("idle"));

        for filter in ["REC\"READ", "ALL\r\n", "ALL\n"] {
            let err = s.next_sms_with_filter(filter, false).unwrap_err();
            assert!(matches!(err, ModemError::InvalidArgument { .. }), "{filter:?}");
        }
        assert!(transport.take_input().is_empty());
    }

    #[test]
    fn delete_sms_sends_index() {
        let scenario = Scenario::new("delete")
            .ready()
            .expect_respond("AT+CMGD=4\r\n", "OK\r\n");
        let (mut s, transport) = session(&scenario);

        s.delete_sms(4).unwrap();
        assert_eq!(transport.take_input_str(), "AT\r\nAT+CMGD=4\r\n");
    }

    #[test]
    fn notifications_use_configured_commands() {
        let scenario = Scenario::new("cnmi")
            .ready()
            .expect_respond("AT+CNMI=1,2,0,0,0\r\n", "OK\r\n")
            .ready()
            .expect_respond("AT+CNMI=0,0,0,0,0\r\n", "OK\r\n");
        let (mut s, _) = session(&scenario);

        s.notifications_enable().unwrap();
        s.notifications_disable().unwrap();
    }
}
