//! The backtracking match engine.
//!
//! A scan cursor walks the token array; at each position every query is
//! attempted in declaration order and the first success wins. One attempt
//! evaluates parts strictly left to right with a local cursor, a local
//! capture accumulator (discarded wholesale if any part fails) and
//! `last_capture_idx`, the rightmost position consumed by a capture or
//! repetition block; the scan resumes at `last_capture_idx + 1`.

use indexmap::IndexMap;
use serde_json::Value;

use compass_core::{
    Capture, CaptureMode, CustomValidations, MatchRecord, Query, QueryPart, Validation,
    is_structure,
};

use super::error::RuntimeError;
use super::root_cache::RootCache;
use super::trace::Tracer;

/// Run every query over the token array, producing one record per
/// successful whole-query application.
pub fn find_matches(
    against: &Value,
    queries: &[Query],
    validations: &IndexMap<String, Validation>,
    customs: &CustomValidations,
    tracer: &mut dyn Tracer,
) -> Result<Vec<MatchRecord>, RuntimeError> {
    let Value::Array(tokens) = against else {
        return Err(RuntimeError::NotAnArray);
    };

    let mut matcher = Matcher {
        tokens,
        validations,
        customs,
        cache: RootCache::new(),
        tracer,
    };

    let mut records = Vec::new();
    let mut root_idx = 0;
    while root_idx < tokens.len() {
        for query in queries {
            let mut debug = false;
            if matcher.attempt(query, &mut root_idx, &mut debug, 0, &mut records)? {
                // A token range is consumed by at most one query; the
                // attempt left root_idx at its last capture.
                break;
            }
        }
        root_idx += 1;
    }

    Ok(records)
}

struct Matcher<'t> {
    tokens: &'t [Value],
    validations: &'t IndexMap<String, Validation>,
    customs: &'t CustomValidations,
    cache: RootCache,
    tracer: &'t mut dyn Tracer,
}

impl<'t> Matcher<'t> {
    /// The token at `index`, which must be a string.
    fn token(&self, index: usize) -> Result<&'t str, RuntimeError> {
        self.tokens[index]
            .as_str()
            .ok_or(RuntimeError::NonStringToken { index })
    }

    /// Attempt one whole query starting at `root_idx`. On success the
    /// caller's record list gains the local accumulator and `root_idx`
    /// moves to the last capture index.
    fn attempt(
        &mut self,
        query: &Query,
        root_idx: &mut usize,
        debug: &mut bool,
        indent: usize,
        records: &mut Vec<MatchRecord>,
    ) -> Result<bool, RuntimeError> {
        // Too few tokens remain for this query to possibly match.
        if *root_idx + query.minimum_parts_count() > self.tokens.len() {
            return Ok(false);
        }

        let mut local_idx = *root_idx;
        let mut last_capture = *root_idx;
        let mut local = MatchRecord::new();

        let parts = query.parts();
        for (part_idx, part) in parts.iter().enumerate() {
            let next = next_concrete_part(parts, part_idx);
            let matched = self.eval_part(
                part,
                next,
                &mut local_idx,
                &mut last_capture,
                debug,
                indent,
                &mut local,
            )?;
            if !matched {
                return Ok(false);
            }
        }

        *root_idx = last_capture;
        if *debug {
            self.tracer.query_success(indent, local_idx, last_capture);
        }
        records.push(local);
        Ok(true)
    }

    /// Non-destructively check whether `part` would match at `index`.
    /// Used by repetitions and skips to know when to stop.
    fn probe(
        &mut self,
        part: &QueryPart,
        index: usize,
        indent: usize,
    ) -> Result<bool, RuntimeError> {
        let mut idx = index;
        let mut capture_idx = index;
        let mut debug = false;
        let mut throwaway = MatchRecord::new();
        self.eval_part(
            part,
            None,
            &mut idx,
            &mut capture_idx,
            &mut debug,
            indent + 1,
            &mut throwaway,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn eval_part(
        &mut self,
        part: &QueryPart,
        next: Option<&QueryPart>,
        local_idx: &mut usize,
        last_capture: &mut usize,
        debug: &mut bool,
        indent: usize,
        local: &mut MatchRecord,
    ) -> Result<bool, RuntimeError> {
        if *local_idx >= self.tokens.len() {
            return Ok(false);
        }
        let value = self.token(*local_idx)?;

        match part {
            QueryPart::Comment(_) => Ok(true),

            QueryPart::Debug => {
                *debug = true;
                self.tracer.begin(indent, *local_idx);
                Ok(true)
            }

            QueryPart::StringEquals(expected) => {
                if value != expected {
                    if *debug {
                        self.tracer.part_failed(
                            indent,
                            *local_idx,
                            "string",
                            &format!("{expected} != {value}"),
                        );
                    }
                    return Ok(false);
                }
                if *debug {
                    self.tracer
                        .part_matched(indent, *local_idx, "STRING MATCH", value);
                }
                *local_idx += 1;
                Ok(true)
            }

            QueryPart::StringStartsWith(prefix) => {
                if !value.starts_with(prefix.as_str()) {
                    if *debug {
                        self.tracer.part_failed(
                            indent,
                            *local_idx,
                            "starts-with",
                            &format!("{prefix} vs {value}"),
                        );
                    }
                    return Ok(false);
                }
                if *debug {
                    self.tracer
                        .part_matched(indent, *local_idx, "STRING STARTS WITH", value);
                }
                *local_idx += 1;
                Ok(true)
            }

            QueryPart::StringContains(substring) => {
                if !value.contains(substring.as_str()) {
                    if *debug {
                        self.tracer.part_failed(
                            indent,
                            *local_idx,
                            "contains",
                            &format!("{substring} vs {value}"),
                        );
                    }
                    return Ok(false);
                }
                if *debug {
                    self.tracer
                        .part_matched(indent, *local_idx, "STRING CONTAINS", value);
                }
                *local_idx += 1;
                Ok(true)
            }

            QueryPart::Regex(regex) => {
                if !self.cache.test(regex, *local_idx, value) {
                    if *debug {
                        self.tracer.part_failed(
                            indent,
                            *local_idx,
                            "regex",
                            &format!("{} against {value}", regex.source()),
                        );
                    }
                    return Ok(false);
                }
                if *debug {
                    self.tracer
                        .part_matched(indent, *local_idx, "REGEX MATCH", value);
                }
                *local_idx += 1;
                Ok(true)
            }

            QueryPart::NotStructure => {
                if is_structure(value) {
                    if *debug {
                        self.tracer
                            .part_failed(indent, *local_idx, "non structure", value);
                    }
                    return Ok(false);
                }
                if *debug {
                    self.tracer
                        .part_matched(indent, *local_idx, "MATCH NOT STRUCTURE", value);
                }
                *local_idx += 1;
                Ok(true)
            }

            QueryPart::SkipStructure => {
                // Zero or more markers; running off the end aborts since
                // no part after us could match there anyway.
                let mut current = value;
                while is_structure(current) {
                    *local_idx += 1;
                    if *local_idx >= self.tokens.len() {
                        return Ok(false);
                    }
                    current = self.token(*local_idx)?;
                }
                Ok(true)
            }

            QueryPart::SkipAny | QueryPart::SkipAll => {
                let stop_at_structure = matches!(part, QueryPart::SkipAny);
                while *local_idx < self.tokens.len() {
                    let current = self.token(*local_idx)?;
                    if stop_at_structure && is_structure(current) {
                        break;
                    }
                    if let Some(next_part) = next {
                        if self.probe(next_part, *local_idx, indent)? {
                            break;
                        }
                    }
                    *local_idx += 1;
                }
                Ok(true)
            }

            QueryPart::SkipOne => {
                let next_matches_here = match next {
                    Some(next_part) => self.probe(next_part, *local_idx, indent)?,
                    None => false,
                };
                if !next_matches_here {
                    *local_idx += 1;
                }
                Ok(true)
            }

            // Bare `()` outside a capture triple records nothing; both it
            // and `.` match any single token.
            QueryPart::Any | QueryPart::CaptureString => {
                if *debug {
                    self.tracer.part_matched(indent, *local_idx, "ANY", value);
                }
                *local_idx += 1;
                Ok(true)
            }

            QueryPart::Capture(capture) => {
                self.eval_capture(capture, local_idx, last_capture, *debug, indent, local)
            }

            QueryPart::Subquery(_) | QueryPart::Repeat(_) | QueryPart::RepeatUntilStructure(_) => {
                self.eval_repetition(part, next, local_idx, last_capture, debug, indent, local)
            }
        }
    }

    fn eval_capture(
        &mut self,
        capture: &Capture,
        local_idx: &mut usize,
        last_capture: &mut usize,
        debug: bool,
        indent: usize,
        local: &mut MatchRecord,
    ) -> Result<bool, RuntimeError> {
        let value = self.token(*local_idx)?;

        match &capture.mode {
            CaptureMode::WholeToken => {
                let Some(accepted) = self.validate(&capture.validation, value) else {
                    if debug {
                        self.tracer.validation_failed(
                            indent,
                            *local_idx,
                            &capture.validation,
                            value,
                        );
                    }
                    return Ok(false);
                };
                if debug {
                    self.tracer
                        .captured(indent, *local_idx, &capture.key, &accepted);
                }
                record_capture(local, &capture.key, accepted);
                *last_capture = *local_idx;
                *local_idx += 1;
                Ok(true)
            }

            // "This position must exist, record a fixed label."
            CaptureMode::Literal(label) => {
                let Some(accepted) = self.validate(&capture.validation, label) else {
                    if debug {
                        self.tracer.validation_failed(
                            indent,
                            *local_idx,
                            &capture.validation,
                            label,
                        );
                    }
                    return Ok(false);
                };
                if debug {
                    self.tracer
                        .captured(indent, *local_idx, &capture.key, &accepted);
                }
                record_capture(local, &capture.key, accepted);
                *last_capture = *local_idx;
                *local_idx += 1;
                Ok(true)
            }

            CaptureMode::Rx(regex) => {
                let candidates = self.cache.extract(regex, *local_idx, value);
                if candidates.is_empty() {
                    if debug {
                        self.tracer.part_failed(
                            indent,
                            *local_idx,
                            "regex capture",
                            &format!("{} against {value}", regex.source()),
                        );
                    }
                    return Ok(false);
                }
                for candidate in candidates {
                    let Some(accepted) = self.validate(&capture.validation, &candidate) else {
                        if debug {
                            self.tracer.validation_failed(
                                indent,
                                *local_idx,
                                &capture.validation,
                                &candidate,
                            );
                        }
                        return Ok(false);
                    };
                    if debug {
                        self.tracer
                            .captured(indent, *local_idx, &capture.key, &accepted);
                    }
                    record_capture(local, &capture.key, accepted);
                }
                *last_capture = *local_idx;
                *local_idx += 1;
                Ok(true)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn eval_repetition(
        &mut self,
        part: &QueryPart,
        next: Option<&QueryPart>,
        local_idx: &mut usize,
        last_capture: &mut usize,
        debug: &mut bool,
        indent: usize,
        local: &mut MatchRecord,
    ) -> Result<bool, RuntimeError> {
        let (subquery, repeating, end_on_structure) = match part {
            QueryPart::Subquery(q) => (q, false, false),
            QueryPart::Repeat(q) => (q, true, false),
            QueryPart::RepeatUntilStructure(q) => (q, true, true),
            _ => return Ok(false),
        };

        let mut sub_records: Vec<MatchRecord> = Vec::new();
        let mut matched_once = false;

        while *local_idx < self.tokens.len() {
            if repeating {
                if end_on_structure && is_structure(self.token(*local_idx)?) {
                    break;
                }
                // Stop before overrunning the rest of the pattern: if the
                // following sibling part would match here, the repetition
                // is done.
                if let Some(next_part) = next {
                    if self.probe(next_part, *local_idx, indent)? {
                        break;
                    }
                }
            }

            let mut sub_idx = *local_idx;
            if self.attempt(subquery, &mut sub_idx, debug, indent + 1, &mut sub_records)? {
                matched_once = true;
                *last_capture = sub_idx;
                *local_idx = sub_idx + 1;
                if repeating {
                    continue;
                }
                break;
            }

            if !repeating {
                return Ok(false);
            }
            // Zero repetitions are permitted; the loop simply ends.
            break;
        }

        if !repeating && !matched_once {
            return Ok(false);
        }

        *local_idx = *last_capture + 1;

        // Merge captures of every successful repetition, in order.
        for sub_record in sub_records {
            for (key, values) in sub_record {
                for value in values {
                    record_capture(local, &key, value);
                }
            }
        }

        Ok(true)
    }

    /// Custom callbacks fully override the regex rule set of the same
    /// name; a name with neither registered rejects every candidate.
    fn validate(&self, name: &str, value: &str) -> Option<String> {
        if let Some(custom) = self.customs.get(name) {
            return custom(value);
        }
        self.validations.get(name)?.evaluate(value)
    }
}

fn record_capture(record: &mut MatchRecord, key: &str, value: String) {
    record.entry(key.to_string()).or_default().push(value);
}

/// The part a repetition or skip should look ahead to. Skip-kind parts
/// make no sense as a stop condition, so scan up to two parts forward for
/// something concrete.
fn next_concrete_part(parts: &[QueryPart], part_idx: usize) -> Option<&QueryPart> {
    parts
        .iter()
        .skip(part_idx + 1)
        .take(2)
        .find(|part| !part.is_skip())
}
