//! Backtracking match engine for compiled Compass queries.

pub mod engine;

pub use engine::{NoopTracer, PrintTracer, RootCache, RuntimeError, Tracer, find_matches};
