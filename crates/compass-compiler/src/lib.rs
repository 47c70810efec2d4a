//! Compiler for Compass query documents (JSON array → compiled queries,
//! validations and definitions).

mod compile;
mod error;

#[cfg(test)]
mod compile_tests;

pub use compile::{CompiledDocument, compile_document};
pub use error::CompileError;
