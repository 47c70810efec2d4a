//! A query is an ordered series of query parts, each intending to match
//! against an entry of the source token array. How a part matches depends
//! on its kind.

use crate::part::QueryPart;

/// An ordered sequence of compiled parts plus two precomputed facts:
/// the minimum number of tokens an attempt can possibly consume (used to
/// prune attempts against short remaining ranges) and the flattened set of
/// capture keys used anywhere in it or its sub-queries.
#[derive(Debug, Clone)]
pub struct Query {
    parts: Vec<QueryPart>,
    minimum_parts_count: usize,
    capture_keys: Vec<String>,
}

impl Query {
    pub fn new(parts: Vec<QueryPart>) -> Self {
        let minimum_parts_count = parts.iter().filter(|p| !p.is_annotation()).count();

        let mut capture_keys = Vec::new();
        collect_capture_keys(&parts, &mut capture_keys);

        Self {
            parts,
            minimum_parts_count,
            capture_keys,
        }
    }

    pub fn parts(&self) -> &[QueryPart] {
        &self.parts
    }

    /// Count of parts excluding comments and `DEBUG`.
    pub fn minimum_parts_count(&self) -> usize {
        self.minimum_parts_count
    }

    /// Every capture key declared in this query or any nested sub-query,
    /// in declaration order, duplicates removed.
    pub fn capture_keys(&self) -> &[String] {
        &self.capture_keys
    }
}

fn collect_capture_keys(parts: &[QueryPart], keys: &mut Vec<String>) {
    for part in parts {
        match part {
            QueryPart::Capture(capture) => {
                if !keys.contains(&capture.key) {
                    keys.push(capture.key.clone());
                }
            }
            other => {
                if let Some(subquery) = other.subquery() {
                    for key in subquery.capture_keys() {
                        if !keys.contains(key) {
                            keys.push(key.clone());
                        }
                    }
                }
            }
        }
    }
}
