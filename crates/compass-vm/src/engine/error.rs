//! Errors that can occur while matching queries against a token array.
//!
//! A query part failing to match is not an error; these abort the whole
//! `matches` call.

#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    /// Queries can only be matched against a JSON array.
    #[error("queries can only be matched against an array")]
    NotAnArray,

    /// A token the matcher needed to inspect as a string was some other
    /// JSON kind.
    #[error("unexpected non-string token at index {index}")]
    NonStringToken { index: usize },

    /// The token document text is not valid JSON.
    #[error("invalid token JSON: {0}")]
    Json(String),
}
