//! Validations: named accept/reject/transform rules applied to captured
//! candidate values before they are recorded.
//!
//! A value passes a validation when it matches every `allow_all` regex,
//! at least one `allow_any` regex (when that set is non-empty) and none of
//! the `disallow` regexes. `remove` regexes strip substrings from an
//! accepted value before it is returned. The reserved name `.` accepts
//! everything and only applies `remove`.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::regex::CompassRegex;

/// Name of the identity validation, always installed.
pub const IDENTITY_VALIDATION: &str = ".";

/// A user-registered callback that fully replaces the regex-based logic of
/// the validation it is registered under. It receives the raw candidate and
/// returns the (possibly transformed) accepted value, or `None` to reject.
pub type CustomValidation = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Table of custom validation callbacks keyed by validation name.
pub type CustomValidations = IndexMap<String, CustomValidation>;

/// A named, reusable validation rule set.
#[derive(Debug, Clone)]
pub struct Validation {
    pub name: String,
    /// Every regex must match.
    pub allow_all: Vec<Arc<CompassRegex>>,
    /// At least one must match; an empty set is ignored.
    pub allow_any: Vec<Arc<CompassRegex>>,
    /// None may match.
    pub disallow: Vec<Arc<CompassRegex>>,
    /// Matched substrings are deleted from the accepted value.
    pub remove: Vec<Arc<CompassRegex>>,
}

impl Validation {
    /// An empty rule set under `name`. Accepts everything; used as the
    /// placeholder behind custom validations registered by name only.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allow_all: Vec::new(),
            allow_any: Vec::new(),
            disallow: Vec::new(),
            remove: Vec::new(),
        }
    }

    /// Evaluate `value` against this rule set, returning the accepted
    /// (post-`remove`) value or `None` on rejection.
    ///
    /// Custom callbacks are not consulted here; the engine checks the
    /// callback table first and only falls back to the rule set.
    pub fn evaluate(&self, value: &str) -> Option<String> {
        if self.name == IDENTITY_VALIDATION {
            return Some(self.apply_remove(value));
        }

        for disallow in &self.disallow {
            if disallow.test(value) {
                return None;
            }
        }
        for allow in &self.allow_all {
            if !allow.test(value) {
                return None;
            }
        }
        if !self.allow_any.is_empty() && !self.allow_any.iter().any(|r| r.test(value)) {
            return None;
        }

        Some(self.apply_remove(value))
    }

    /// Delete every removable substring, re-scanning after each pass so
    /// removals that expose new matches are also deleted.
    fn apply_remove(&self, value: &str) -> String {
        let mut current = value.to_string();
        loop {
            let mut next = current.clone();
            for remove in &self.remove {
                next = remove.remove_from(&next);
            }
            if next == current {
                return current;
            }
            current = next;
        }
    }
}
