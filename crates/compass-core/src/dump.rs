//! Re-serialization of compiled queries back to their textual JSON form.
//!
//! Compiling the dumped form again yields a structurally identical query,
//! which is how compile idempotence is checked.

use serde_json::{Value, json};

use crate::part::{
    Capture, CaptureMode, PART_ANY, PART_CAPTURE_STRING, PART_COMMENT, PART_DEBUG,
    PART_NOT_STRUCTURE, PART_REPEAT, PART_REPEAT_UNTIL_STRUCTURE, PART_SKIP_ALL, PART_SKIP_ANY,
    PART_SKIP_ONE, PART_SKIP_STRUCTURE, QueryPart,
};
use crate::query::Query;

impl QueryPart {
    /// The JSON token this part compiles from.
    pub fn to_json(&self) -> Value {
        match self {
            QueryPart::Comment(text) => json!(format!("{PART_COMMENT}{text}")),
            QueryPart::Debug => json!(PART_DEBUG),
            QueryPart::StringEquals(value) => json!(value),
            QueryPart::StringStartsWith(value) => json!(format!("^{value}")),
            QueryPart::StringContains(value) => json!(format!("~{value}")),
            QueryPart::Regex(regex) => json!(regex.source()),
            QueryPart::NotStructure => json!(PART_NOT_STRUCTURE),
            QueryPart::SkipStructure => json!(PART_SKIP_STRUCTURE),
            QueryPart::SkipAny => json!(PART_SKIP_ANY),
            QueryPart::SkipOne => json!(PART_SKIP_ONE),
            QueryPart::SkipAll => json!(PART_SKIP_ALL),
            QueryPart::Any => json!(PART_ANY),
            QueryPart::CaptureString => json!(PART_CAPTURE_STRING),
            QueryPart::Capture(capture) => capture.to_json(),
            QueryPart::Subquery(query) => Value::Array(query_tokens(query, None)),
            QueryPart::Repeat(query) => Value::Array(query_tokens(query, Some(PART_REPEAT))),
            QueryPart::RepeatUntilStructure(query) => {
                Value::Array(query_tokens(query, Some(PART_REPEAT_UNTIL_STRUCTURE)))
            }
        }
    }
}

impl Capture {
    pub fn to_json(&self) -> Value {
        let part = match &self.mode {
            CaptureMode::WholeToken => json!(PART_CAPTURE_STRING),
            CaptureMode::Rx(regex) => json!(regex.source()),
            CaptureMode::Literal(value) => json!(value),
        };
        json!([self.key, part, self.validation])
    }
}

impl Query {
    /// The JSON array this query compiles from.
    pub fn to_json(&self) -> Value {
        Value::Array(query_tokens(self, None))
    }
}

fn query_tokens(query: &Query, leading: Option<&str>) -> Vec<Value> {
    let mut tokens = Vec::with_capacity(query.parts().len() + 1);
    if let Some(control) = leading {
        tokens.push(json!(control));
    }
    tokens.extend(query.parts().iter().map(QueryPart::to_json));
    tokens
}

/// Dump a list of compiled queries as one JSON array.
pub fn dump_queries(queries: &[Query]) -> Value {
    Value::Array(queries.iter().map(Query::to_json).collect())
}
