//! Bounded transcript of committed console lines.
//!
//! The server streams console output in bursts.  Long-running programs can
//! print without end, so the transcript keeps at most
//! [`DEFAULT_CAPACITY`] lines and evicts the oldest first.
//!
//! Besides the retained lines, the transcript counts every line it has ever
//! accepted.  A front end that prints incrementally remembers the count it
//! last saw and asks for [`Transcript::tail_since`] to get only the new lines.

use std::collections::VecDeque;

/// Maximum number of retained transcript lines.
pub const DEFAULT_CAPACITY: usize = 1000;

/// A bounded FIFO queue of committed console lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    lines: VecDeque<String>,
    capacity: usize,
    total_appended: u64,
}

impl Transcript {
    /// Creates an empty transcript holding at most [`DEFAULT_CAPACITY`] lines.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty transcript holding at most `capacity` lines.
    ///
    /// A capacity of zero is raised to one so that the most recent line is
    /// always visible.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            total_appended: 0,
        }
    }

    /// Appends one line, evicting the oldest line if the capacity is exceeded.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
        self.total_appended += 1;
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    /// Splits a `console-output` payload on `'\n'` and appends every line.
    ///
    /// A single terminating newline does not produce a trailing empty line,
    /// so `"a\n"` and `"a"` both append exactly `"a"`.  A trailing `'\r'` is
    /// stripped from each line.
    ///
    /// Returns the number of lines appended.
    pub fn append_output(&mut self, payload: &str) -> usize {
        let body = payload.strip_suffix('\n').unwrap_or(payload);
        let mut appended = 0;
        for line in body.split('\n') {
            self.push(line.strip_suffix('\r').unwrap_or(line));
            appended += 1;
        }
        appended
    }

    /// Number of currently retained lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no lines are retained.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of retained lines.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of lines ever appended, including evicted ones.
    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }

    /// Iterates over the retained lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Returns the retained lines appended after the caller last saw
    /// `seen` lines in total.
    ///
    /// Lines that were evicted before the caller caught up are skipped.
    pub fn tail_since(&self, seen: u64) -> impl Iterator<Item = &str> {
        let fresh = self.total_appended.saturating_sub(seen);
        let fresh = usize::try_from(fresh).unwrap_or(usize::MAX).min(self.lines.len());
        self.lines
            .iter()
            .skip(self.lines.len() - fresh)
            .map(String::as_str)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
