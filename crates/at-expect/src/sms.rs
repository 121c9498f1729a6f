//! SMS workflows.
//!
//! Each workflow is a short fixed sequence on a [`Session`](crate::Session):
//! readiness probe, one structured command, then a wait for a discriminating
//! terminator. Listing additionally decomposes the reply into fields with
//! successive delimiter-bounded reads into one scratch buffer.
//!
//! | Workflow | Command | Success terminator |
//! |---|---|---|
//! | [`send_sms`](crate::Session::send_sms) | `AT+CMGF=1`, `AT+CMGS="<n>"`, body, Ctrl-Z | `OK`, `>`, `OK` |
//! | [`next_sms`](crate::Session::next_sms) | `AT+CMGL="<status>",<0/1>` | `+CMGL: ` or `OK` |
//! | [`delete_sms`](crate::Session::delete_sms) | `AT+CMGD=<id>` | `OK` |
//! | [`notifications_enable`](crate::Session::notifications_enable) | `AT+CNMI=...` | `OK` |

mod types;
mod workflow;

pub use types::{Sms, SmsStatus};
