//! Query parts: the typed building blocks a query is compiled into.

use std::sync::Arc;

use crate::query::Query;
use crate::regex::CompassRegex;

/// `//` developer comment, never consumes input.
pub const PART_COMMENT: &str = "//";
/// `()` capture the whole token.
pub const PART_CAPTURE_STRING: &str = "()";
/// `!--` match any token that is not a structure marker.
pub const PART_NOT_STRUCTURE: &str = "!--";
/// `*--` skip forward through structure markers.
pub const PART_SKIP_STRUCTURE: &str = "*--";
/// Leading token of a repeating sub-query.
pub const PART_REPEAT: &str = "REPEAT";
/// Leading token of a sub-query repeated until a structure marker.
pub const PART_REPEAT_UNTIL_STRUCTURE: &str = "REPEAT_UNTIL_STRUCTURE";
/// `*` advance until the next part matches, a structure marker, or end.
pub const PART_SKIP_ANY: &str = "*";
/// `?` advance at most once.
pub const PART_SKIP_ONE: &str = "?";
/// `!*` advance until the next part matches or end.
pub const PART_SKIP_ALL: &str = "!*";
/// `.` match any one token.
pub const PART_ANY: &str = ".";
/// `DEBUG` enable trace output for the rest of the attempt.
pub const PART_DEBUG: &str = "DEBUG";

/// Prefix every structure-marker token carries.
pub const STRUCTURE_PREFIX: &str = "-- ";

/// How a capture part extracts its candidate value(s) from the cursor
/// position.
#[derive(Debug, Clone)]
pub enum CaptureMode {
    /// `()` — the whole token value.
    WholeToken,
    /// A regex literal — every extracted group yields one candidate.
    Rx(Arc<CompassRegex>),
    /// A bare string — record this fixed label, the position only needs
    /// to exist.
    Literal(String),
}

/// A named extraction point: `[key, part, validation]`.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Key the extracted values are reported under.
    pub key: String,
    pub mode: CaptureMode,
    /// Name of the validation run over each candidate. `.` accepts
    /// everything.
    pub validation: String,
}

/// One compiled element of a query. Each part matches against (or skips
/// over) entries of the token array; the engine drives an exhaustive match
/// over this enum, so a new token kind cannot be silently unhandled.
#[derive(Debug, Clone)]
pub enum QueryPart {
    /// `// ...` — no-op, payload is the text after the sigil.
    Comment(String),
    /// `DEBUG` — no-op, flips the attempt into tracing mode.
    Debug,
    /// Bare string — exact match.
    StringEquals(String),
    /// `^prefix`.
    StringStartsWith(String),
    /// `~substring`.
    StringContains(String),
    /// `/body/flags` literal.
    Regex(Arc<CompassRegex>),
    /// `!--`.
    NotStructure,
    /// `*--`.
    SkipStructure,
    /// `*`.
    SkipAny,
    /// `?`.
    SkipOne,
    /// `!*`.
    SkipAll,
    /// `.`.
    Any,
    /// Bare `()` outside a capture triple: matches any one token,
    /// captures nothing.
    CaptureString,
    /// Capture triple.
    Capture(Capture),
    /// Nested query matched exactly once.
    Subquery(Query),
    /// Nested query repeated while it matches.
    Repeat(Query),
    /// Nested query repeated until a structure marker.
    RepeatUntilStructure(Query),
}

impl QueryPart {
    /// Parts that only annotate the query and never consume a token.
    pub fn is_annotation(&self) -> bool {
        matches!(self, QueryPart::Comment(_) | QueryPart::Debug)
    }

    /// Skip-kind parts are useless as a repetition's "next part" lookahead
    /// target; the lookahead scans past them.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            QueryPart::SkipAny
                | QueryPart::SkipOne
                | QueryPart::SkipAll
                | QueryPart::SkipStructure
        )
    }

    /// The nested query of a `Subquery`/`Repeat`/`RepeatUntilStructure`.
    pub fn subquery(&self) -> Option<&Query> {
        match self {
            QueryPart::Subquery(q)
            | QueryPart::Repeat(q)
            | QueryPart::RepeatUntilStructure(q) => Some(q),
            _ => None,
        }
    }
}

/// True if the token denotes structural metadata rather than content.
pub fn is_structure(value: &str) -> bool {
    value.starts_with(STRUCTURE_PREFIX)
}
