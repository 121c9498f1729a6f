//! Property tests for the streaming matcher and capture buffer.

#![cfg(feature = "mock")]

use std::time::Duration;

use at_expect::clock::{Clock, ManualClock};
use at_expect::expect::{CaptureBuffer, MatchOutcome, Matcher, Pattern};
use at_expect::mock::{MockTransport, simple_mock};
use proptest::prelude::*;

const TIMEOUT: Duration = Duration::from_millis(50);

fn matcher_over(stream: &[u8]) -> Matcher<MockTransport, ManualClock> {
    let transport = MockTransport::new();
    transport.queue_output(stream);
    Matcher::new(transport, ManualClock::new())
}

/// End index of the first complete occurrence of `needle`.
fn first_end(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|start| start + needle.len())
}

fn small_alphabet() -> impl Strategy<Value = u8> {
    prop::sample::select(b"OK\r\n+,\"a".to_vec())
}

fn pattern_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(small_alphabet(), 1..=5)
}

fn stream_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(small_alphabet(), 0..=40)
}

proptest! {
    #[test]
    fn single_match_captures_bytes_before_first_occurrence(
        prefix in stream_bytes(),
        pattern in pattern_bytes(),
        suffix in stream_bytes(),
    ) {
        let stream = [prefix.as_slice(), pattern.as_slice(), suffix.as_slice()].concat();
        let end = first_end(&stream, &pattern).unwrap();

        let mut m = matcher_over(&stream);
        let mut buf = CaptureBuffer::new(stream.len() + 1);
        let p = Pattern::new(pattern.clone()).unwrap();

        prop_assert!(m.match_single(&p, TIMEOUT, Some(&mut buf)).unwrap());
        prop_assert_eq!(buf.as_bytes(), &stream[..end - pattern.len()]);
        prop_assert_eq!(m.transport().pending_output(), stream[end..].to_vec());
    }

    #[test]
    fn single_match_fails_within_timeout_plus_one_poll(
        stream in stream_bytes(),
        pattern in pattern_bytes(),
    ) {
        prop_assume!(first_end(&stream, &pattern).is_none());

        let mut m = matcher_over(&stream);
        let mut buf = CaptureBuffer::new(stream.len() + 1);
        let p = Pattern::new(pattern).unwrap();

        prop_assert!(!m.match_single(&p, TIMEOUT, Some(&mut buf)).unwrap());
        prop_assert_eq!(buf.as_bytes(), stream.as_slice());
        prop_assert!(m.clock().now_millis() <= TIMEOUT.as_millis() as u64 + 1);
    }

    #[test]
    fn either_reports_earliest_pattern(
        stream in stream_bytes(),
        first in pattern_bytes(),
        second in pattern_bytes(),
    ) {
        let expected = match (first_end(&stream, &first), first_end(&stream, &second)) {
            (None, None) => MatchOutcome::Neither,
            (Some(_), None) => MatchOutcome::First,
            (None, Some(_)) => MatchOutcome::Second,
            (Some(a), Some(b)) if a <= b => MatchOutcome::First,
            _ => MatchOutcome::Second,
        };

        let mut m = matcher_over(&stream);
        let p1 = Pattern::new(first).unwrap();
        let p2 = Pattern::new(second).unwrap();
        prop_assert_eq!(m.match_either(&p1, &p2, TIMEOUT).unwrap(), expected);
    }

    #[test]
    fn trim_removes_exactly_n(
        data in prop::collection::vec(1u8..=255, 0..=32),
        n in 0usize..=40,
    ) {
        let mut buf = CaptureBuffer::new(32);
        for &b in &data {
            buf.push(b).unwrap();
        }
        buf.trim_trailing(n);

        let kept = data.len().saturating_sub(n);
        prop_assert_eq!(buf.as_bytes(), &data[..kept]);
        prop_assert!(buf.raw()[kept..].iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_from_leaves_prefix(
        data in prop::collection::vec(1u8..=255, 0..=32),
        from in 0usize..=40,
    ) {
        let mut buf = CaptureBuffer::new(32);
        for &b in &data {
            buf.push(b).unwrap();
        }
        buf.clear_from(from);

        let kept = from.min(data.len());
        prop_assert_eq!(&buf.raw()[..kept], &data[..kept]);
        prop_assert!(buf.raw()[from.min(32)..].iter().all(|&b| b == 0));
    }
}

#[test]
fn self_overlapping_pattern_is_found() {
    let mut m = Matcher::new(simple_mock("OOK\r\n"), ManualClock::new());
    assert!(m.match_single(&Pattern::OK, TIMEOUT, None).unwrap());

    let p = Pattern::try_from("abab").unwrap();
    let mut m = Matcher::new(simple_mock("abababx"), ManualClock::new());
    assert!(m.match_single(&p, TIMEOUT, None).unwrap());
    assert_eq!(m.transport().pending_output(), b"abx");
}
