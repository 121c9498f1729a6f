//! Response matching module.
//!
//! This module provides the streaming matcher that recognises AT reply
//! terminators, the per-pattern match state, and the fixed-capacity
//! capture buffer that records payload bytes along the way.

mod capture;
mod matcher;
mod pattern;
mod state;

pub use capture::CaptureBuffer;
pub use matcher::{MatchOutcome, Matcher, RECENT_CAPACITY};
pub use pattern::Pattern;
pub use state::MatchState;
