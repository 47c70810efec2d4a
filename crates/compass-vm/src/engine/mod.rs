//! Match engine for compiled Compass queries.
//!
//! Executes queries against a JSON array of string tokens, producing an
//! ordered sequence of capture records.

mod error;
mod matcher;
mod root_cache;
mod trace;

#[cfg(test)]
mod root_cache_tests;

pub use error::RuntimeError;
pub use matcher::find_matches;
pub use root_cache::RootCache;
pub use trace::{NoopTracer, PrintTracer, Tracer};
