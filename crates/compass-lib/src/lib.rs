//! Compass: regex-like declarative pattern matching over arrays of
//! string tokens.
//!
//! A [`Compass`] is built from a JSON query document and run against JSON
//! arrays of strings; each run yields the capture records of every query
//! that matched. See the crate examples for the query language.

mod compass;

#[cfg(test)]
mod compass_tests;

pub use compass::Compass;
pub use compass_compiler::{CompileError, CompiledDocument, compile_document};
pub use compass_core::{
    Capture, CaptureMode, CompassRegex, CustomValidation, CustomValidations, Definition,
    MatchRecord, Query, QueryPart, RegexCache, RegexError, Validation, dump_queries, is_structure,
};
pub use compass_vm::{NoopTracer, PrintTracer, RootCache, RuntimeError, Tracer, find_matches};
