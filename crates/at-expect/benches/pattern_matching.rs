//! Pattern matching benchmarks.
#![allow(missing_docs)]

use std::hint::black_box;
use std::time::Duration;

use at_expect::clock::ManualClock;
use at_expect::expect::{CaptureBuffer, MatchState, Matcher, Pattern};
use at_expect::mock::simple_mock;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const LISTING: &str =
    "+CMGL: 3,\"REC UNREAD\",\"+15551234567\",,\"21/01/01,12:00:00+00\"\r\nHello\r\n\r\nOK\r\n";

fn bench_match_state(c: &mut Criterion) {
    let pattern = Pattern::OK;
    let stream = LISTING.as_bytes();

    c.bench_function("match_state_scan", |b| {
        b.iter(|| {
            let mut state = MatchState::new(&pattern);
            stream.iter().any(|&byte| state.advance(black_box(byte)))
        });
    });
}

fn bench_match_single_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_single_capture");

    for noise in &[0usize, 64, 512] {
        let stream = format!("{}OK\r\n", "x".repeat(*noise));
        group.bench_with_input(BenchmarkId::from_parameter(noise), &stream, |b, stream| {
            b.iter(|| {
                let mut m = Matcher::new(simple_mock(stream), ManualClock::new());
                let mut buf = CaptureBuffer::new(1024);
                m.match_single(&Pattern::OK, Duration::from_secs(1), Some(&mut buf))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_match_either(c: &mut Criterion) {
    c.bench_function("match_either_listing", |b| {
        b.iter(|| {
            let mut m = Matcher::new(simple_mock(black_box(LISTING)), ManualClock::new());
            m.match_either(&Pattern::CMGL, &Pattern::OK, Duration::from_secs(1))
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_match_state,
    bench_match_single_capture,
    bench_match_either,
);
criterion_main!(benches);
