//! Definitions: named, reusable JSON fragments referenced from queries
//! with `$name` tokens and substituted at compile time.

use serde_json::Value;

/// A named JSON fragment. Substitution is one level deep: the fragment is
/// compiled normally but its own top-level value is not re-scanned for
/// further `$` references.
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    pub value: Value,
}

impl Definition {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
