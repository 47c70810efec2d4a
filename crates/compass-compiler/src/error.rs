//! Compilation error types.
//!
//! All errors are fatal to the whole document: the first one aborts
//! construction, there is no partially compiled Compass.

use compass_core::RegexError;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The document (or a token array) is not a JSON array.
    #[error("query document is not a JSON array")]
    NotAnArray,

    /// The document text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A `/body/flags` literal with a malformed delimiter, bad flags or
    /// an uncompilable body.
    #[error("invalid regex literal: {0}")]
    InvalidRegexLiteral(#[from] RegexError),

    /// A 2-3 element array whose inner part is not a regex, `()` or a
    /// bare string.
    #[error("malformed capture triple: {element}")]
    InvalidCaptureForm { element: String },

    /// Top-level queries must begin with a `//` comment.
    #[error("queries are required to start with a comment: {element}")]
    MissingLeadingComment { element: String },

    /// A `$name` token with no matching definition.
    #[error("reference to undefined definition ${name}")]
    UndefinedDefinition { name: String },

    /// Definition names are unique per document.
    #[error("duplicate definition name {name:?}")]
    DuplicateDefinition { name: String },

    /// A validation object with a missing or mistyped key.
    #[error("malformed validation ({detail}): {element}")]
    MalformedValidation { detail: String, element: String },

    /// A definition object with a missing or mistyped key.
    #[error("malformed definition ({detail}): {element}")]
    MalformedDefinition { detail: String, element: String },

    /// A document element or query token of an unsupported kind.
    #[error("unrecognized query element: {element}")]
    UnrecognizedElement { element: String },
}
