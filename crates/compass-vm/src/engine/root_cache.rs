//! Per-match memoization of regex results on a per-token-index basis.
//!
//! Lookahead and backtracking re-test the same regex against the same
//! token many times within one `matches` call; the root cache pays for
//! each (regex, index) pair once. A fresh cache is created for every call
//! since token arrays differ.

use std::collections::HashMap;

use compass_core::CompassRegex;

#[derive(Default)]
struct RegexEntry {
    test_by_index: HashMap<usize, bool>,
    extract_by_index: HashMap<usize, Vec<String>>,
}

/// Memo table keyed by regex identity (the literal text), then token
/// index.
#[derive(Default)]
pub struct RootCache {
    entries: HashMap<String, RegexEntry>,
}

impl RootCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized `regex.test(value)` for the token at `index`.
    pub fn test(&mut self, regex: &CompassRegex, index: usize, value: &str) -> bool {
        let entry = self.entries.entry(regex.source().to_string()).or_default();
        *entry
            .test_by_index
            .entry(index)
            .or_insert_with(|| regex.test(value))
    }

    /// Memoized `regex.extract(value)` for the token at `index`.
    pub fn extract(&mut self, regex: &CompassRegex, index: usize, value: &str) -> Vec<String> {
        let entry = self.entries.entry(regex.source().to_string()).or_default();
        entry
            .extract_by_index
            .entry(index)
            .or_insert_with(|| regex.extract(value))
            .clone()
    }
}
