//! Per-pattern streaming match progress.

use super::pattern::Pattern;

/// How many leading bytes of a pattern match the most recent input.
///
/// On a mismatch the counter falls back along the pattern's prefix function
/// instead of restarting at zero, so self-overlapping patterns such as
/// `"aab"` inside `"aaab"` and repeated leading bytes such as `"OOK\r\n"`
/// are still found.
#[derive(Debug, Clone)]
pub struct MatchState<'p> {
    pattern: &'p [u8],
    failure: Vec<usize>,
    matched: usize,
}

impl<'p> MatchState<'p> {
    /// Start tracking `pattern` with nothing matched.
    #[must_use]
    pub fn new(pattern: &'p Pattern) -> Self {
        let pattern = pattern.as_bytes();
        Self {
            pattern,
            failure: prefix_function(pattern),
            matched: 0,
        }
    }

    /// Feed one byte; returns `true` when the pattern has just completed.
    pub fn advance(&mut self, byte: u8) -> bool {
        if self.matched == self.pattern.len() {
            self.matched = self.failure[self.matched - 1];
        }
        while self.matched > 0 && self.pattern[self.matched] != byte {
            self.matched = self.failure[self.matched - 1];
        }
        if self.pattern[self.matched] == byte {
            self.matched += 1;
        }
        self.matched == self.pattern.len()
    }

    /// Bytes of the pattern currently matched, in `[0, len]`.
    #[must_use]
    pub const fn matched(&self) -> usize {
        self.matched
    }

    /// Whether the pattern is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matched == self.pattern.len()
    }

    /// Forget all progress.
    pub const fn reset(&mut self) {
        self.matched = 0;
    }
}

/// `failure[i]` is the length of the longest proper prefix of
/// `pattern[..=i]` that is also a suffix of it.
fn prefix_function(pattern: &[u8]) -> Vec<usize> {
    let mut failure = vec![0; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = failure[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        failure[i] = k;
    }
    failure
}
