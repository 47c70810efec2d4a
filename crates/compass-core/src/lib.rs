//! Core data structures for Compass: compiled query parts, validations,
//! definitions and the regex literal cache.
//!
//! Compass is "regex for arrays of strings": a query compiled from a JSON
//! description is run against a flat token array and yields named capture
//! records. This crate holds the compiled form; `compass-compiler` builds
//! it from JSON and `compass-vm` executes it.

mod definition;
mod dump;
mod part;
mod query;
mod regex;
mod validation;

#[cfg(test)]
mod query_tests;

pub use definition::Definition;
pub use dump::dump_queries;
pub use part::{
    Capture, CaptureMode, PART_ANY, PART_CAPTURE_STRING, PART_COMMENT, PART_DEBUG,
    PART_NOT_STRUCTURE, PART_REPEAT, PART_REPEAT_UNTIL_STRUCTURE, PART_SKIP_ALL, PART_SKIP_ANY,
    PART_SKIP_ONE, PART_SKIP_STRUCTURE, QueryPart, STRUCTURE_PREFIX, is_structure,
};
pub use query::Query;
pub use regex::{CompassRegex, RegexCache, RegexError, is_regex_literal};
pub use validation::{
    CustomValidation, CustomValidations, IDENTITY_VALIDATION, Validation,
};

/// One successful whole-query application: capture key to its ordered list
/// of captured values. Keys appear in capture order.
pub type MatchRecord = indexmap::IndexMap<String, Vec<String>>;
