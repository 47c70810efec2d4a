//! Compilation of a JSON query document into compiled Compass structures.
//!
//! A document is one JSON array whose elements are, in any order:
//! top-level comment strings (ignored), validation objects, definition
//! objects and query arrays. Validations and definitions are collected in
//! a first pass so queries may reference them regardless of element order.

use indexmap::IndexMap;
use serde_json::Value;

use compass_core::{
    Capture, CaptureMode, Definition, IDENTITY_VALIDATION, PART_ANY, PART_CAPTURE_STRING,
    PART_COMMENT, PART_DEBUG, PART_NOT_STRUCTURE, PART_REPEAT, PART_REPEAT_UNTIL_STRUCTURE,
    PART_SKIP_ALL, PART_SKIP_ANY, PART_SKIP_ONE, PART_SKIP_STRUCTURE, Query, QueryPart,
    RegexCache, Validation, is_regex_literal,
};

use crate::error::CompileError;

/// Everything a document compiles into.
#[derive(Debug)]
pub struct CompiledDocument {
    pub queries: Vec<Query>,
    pub validations: IndexMap<String, Validation>,
    pub definitions: IndexMap<String, Definition>,
}

/// Compile a whole query document. Fail-fast: the first malformed element
/// aborts with a descriptive error.
pub fn compile_document(root: &Value) -> Result<CompiledDocument, CompileError> {
    let Value::Array(elements) = root else {
        return Err(CompileError::NotAnArray);
    };

    let mut compiler = DocumentCompiler::new();

    // First pass: validations and definitions, so later query compilation
    // can resolve references independent of element order.
    for element in elements {
        match element {
            Value::Object(_) => compiler.compile_object(element)?,
            Value::String(s) if s.starts_with(PART_COMMENT) => {}
            Value::Array(_) => {}
            other => {
                return Err(CompileError::UnrecognizedElement {
                    element: snippet(other),
                });
            }
        }
    }

    // Second pass: the queries themselves.
    let mut queries = Vec::new();
    for element in elements {
        if let Value::Array(_) = element {
            queries.push(compiler.compile_query(element, true)?);
        }
    }

    let DocumentCompiler {
        mut validations,
        definitions,
    } = compiler;

    // A capture may name a validation that only ever exists as a custom
    // callback registered after construction; give it an empty placeholder
    // so the reference resolves, exactly as add_validation would.
    for query in &queries {
        install_placeholders(query, &mut validations);
    }
    validations
        .entry(IDENTITY_VALIDATION.to_string())
        .or_insert_with(|| Validation::empty(IDENTITY_VALIDATION));

    Ok(CompiledDocument {
        queries,
        validations,
        definitions,
    })
}

struct DocumentCompiler {
    validations: IndexMap<String, Validation>,
    definitions: IndexMap<String, Definition>,
}

impl DocumentCompiler {
    fn new() -> Self {
        Self {
            validations: IndexMap::new(),
            definitions: IndexMap::new(),
        }
    }

    /// An object element is a validation when it carries the
    /// `"validation"` key, a definition when it carries `"definition"`.
    fn compile_object(&mut self, element: &Value) -> Result<(), CompileError> {
        if element.get("validation").is_some() {
            let validation = compile_validation(element)?;
            self.validations.insert(validation.name.clone(), validation);
            Ok(())
        } else if element.get("definition").is_some() {
            let definition = compile_definition(element)?;
            if self.definitions.contains_key(&definition.name) {
                return Err(CompileError::DuplicateDefinition {
                    name: definition.name,
                });
            }
            self.definitions.insert(definition.name.clone(), definition);
            Ok(())
        } else {
            Err(CompileError::UnrecognizedElement {
                element: snippet(element),
            })
        }
    }

    /// Compile one query array. `REPEAT`/`REPEAT_UNTIL_STRUCTURE` control
    /// tokens are structural only (consumed by the enclosing part) and are
    /// skipped here.
    fn compile_query(&self, element: &Value, require_comment: bool) -> Result<Query, CompileError> {
        let Value::Array(tokens) = element else {
            return Err(CompileError::NotAnArray);
        };

        if require_comment {
            let leads_with_comment = matches!(
                tokens.first(),
                Some(Value::String(s)) if s.starts_with(PART_COMMENT)
            );
            if !leads_with_comment {
                return Err(CompileError::MissingLeadingComment {
                    element: snippet(element),
                });
            }
        }

        let mut parts = Vec::new();
        for token in tokens {
            if matches!(
                token,
                Value::String(s) if s == PART_REPEAT || s == PART_REPEAT_UNTIL_STRUCTURE
            ) {
                continue;
            }
            parts.push(self.compile_part(token)?);
        }

        Ok(Query::new(parts))
    }

    /// Compile one token into a query part, substituting a `$name`
    /// definition reference first.
    fn compile_part(&self, element: &Value) -> Result<QueryPart, CompileError> {
        let element = self.resolve_definition(element)?;

        match element {
            Value::String(token) => self.classify_token(token),
            Value::Array(_) => self.compile_array_part(element),
            other => Err(CompileError::UnrecognizedElement {
                element: snippet(other),
            }),
        }
    }

    /// One-level definition substitution: the substituted fragment is
    /// compiled normally but its own top-level value is not re-scanned.
    fn resolve_definition<'a>(&'a self, element: &'a Value) -> Result<&'a Value, CompileError> {
        let Value::String(token) = element else {
            return Ok(element);
        };
        let Some(name) = token.strip_prefix('$') else {
            return Ok(element);
        };
        match self.definitions.get(name) {
            Some(definition) => Ok(&definition.value),
            None => Err(CompileError::UndefinedDefinition {
                name: name.to_string(),
            }),
        }
    }

    /// Classification order: regex literal, comment, exact sigils,
    /// `^`/`~` prefixes, else an exact string literal.
    fn classify_token(&self, token: &str) -> Result<QueryPart, CompileError> {
        if is_regex_literal(token) {
            let regex = RegexCache::global().compile(token)?;
            return Ok(QueryPart::Regex(regex));
        }
        if let Some(text) = token.strip_prefix(PART_COMMENT) {
            return Ok(QueryPart::Comment(text.to_string()));
        }
        Ok(match token {
            PART_CAPTURE_STRING => QueryPart::CaptureString,
            PART_NOT_STRUCTURE => QueryPart::NotStructure,
            PART_SKIP_STRUCTURE => QueryPart::SkipStructure,
            PART_SKIP_ANY => QueryPart::SkipAny,
            PART_SKIP_ONE => QueryPart::SkipOne,
            PART_SKIP_ALL => QueryPart::SkipAll,
            PART_ANY => QueryPart::Any,
            PART_DEBUG => QueryPart::Debug,
            _ => {
                if let Some(prefix) = token.strip_prefix('^') {
                    QueryPart::StringStartsWith(prefix.to_string())
                } else if let Some(substring) = token.strip_prefix('~') {
                    QueryPart::StringContains(substring.to_string())
                } else if token.starts_with('/') {
                    // Starts like a regex but is not a well-formed literal.
                    return Err(CompileError::InvalidRegexLiteral(
                        compass_core::RegexError::MalformedLiteral(token.to_string()),
                    ));
                } else {
                    QueryPart::StringEquals(token.to_string())
                }
            }
        })
    }

    /// An array token is a capture triple when it has 2-3 elements, the
    /// first two strings and the third a string or null; otherwise it is a
    /// sub-query, repeating when its first token says so.
    fn compile_array_part(&self, element: &Value) -> Result<QueryPart, CompileError> {
        let Value::Array(items) = element else {
            return Err(CompileError::NotAnArray);
        };

        if is_capture_triple(items) {
            return self.compile_capture(element, items);
        }

        let query_type = items.first().and_then(Value::as_str);
        let subquery = self.compile_query(element, false)?;
        Ok(match query_type {
            Some(PART_REPEAT) => QueryPart::Repeat(subquery),
            Some(PART_REPEAT_UNTIL_STRUCTURE) => QueryPart::RepeatUntilStructure(subquery),
            _ => QueryPart::Subquery(subquery),
        })
    }

    fn compile_capture(
        &self,
        element: &Value,
        items: &[Value],
    ) -> Result<QueryPart, CompileError> {
        let key = items[0].as_str().unwrap_or_default().to_string();
        let validation = match items.get(2) {
            Some(Value::String(name)) => name.clone(),
            _ => IDENTITY_VALIDATION.to_string(),
        };

        // The inner part goes through normal compilation (definition
        // substitution included) but only three kinds may land inside a
        // capture triple.
        let mode = match self.compile_part(&items[1])? {
            QueryPart::Regex(regex) => CaptureMode::Rx(regex),
            QueryPart::CaptureString => CaptureMode::WholeToken,
            QueryPart::StringEquals(value) => CaptureMode::Literal(value),
            _ => {
                return Err(CompileError::InvalidCaptureForm {
                    element: snippet(element),
                });
            }
        };

        Ok(QueryPart::Capture(Capture {
            key,
            mode,
            validation,
        }))
    }
}

fn is_capture_triple(items: &[Value]) -> bool {
    if items.len() < 2 || items.len() > 3 {
        return false;
    }
    if !items[0].is_string() || !items[1].is_string() {
        return false;
    }
    match items.get(2) {
        None | Some(Value::String(_)) | Some(Value::Null) => true,
        Some(_) => false,
    }
}

fn compile_validation(element: &Value) -> Result<Validation, CompileError> {
    let name = element
        .get("validation")
        .and_then(Value::as_str)
        .ok_or_else(|| CompileError::MalformedValidation {
            detail: "\"validation\" key is not a string".to_string(),
            element: snippet(element),
        })?;

    let mut validation = Validation::empty(name);
    validation.allow_all = compile_regex_set(element, "allowAll")?;
    validation.allow_any = compile_regex_set(element, "allowAny")?;
    validation.disallow = compile_regex_set(element, "disallow")?;
    validation.remove = compile_regex_set(element, "remove")?;
    Ok(validation)
}

fn compile_regex_set(
    element: &Value,
    key: &str,
) -> Result<Vec<std::sync::Arc<compass_core::CompassRegex>>, CompileError> {
    let Some(set) = element.get(key) else {
        return Ok(Vec::new());
    };
    let Value::Array(patterns) = set else {
        return Err(CompileError::MalformedValidation {
            detail: format!("{key:?} is not an array"),
            element: snippet(element),
        });
    };

    let mut regexes = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let Value::String(literal) = pattern else {
            return Err(CompileError::MalformedValidation {
                detail: format!("{key:?} pattern is not a string"),
                element: snippet(element),
            });
        };
        regexes.push(RegexCache::global().compile(literal)?);
    }
    Ok(regexes)
}

fn compile_definition(element: &Value) -> Result<Definition, CompileError> {
    let name = element
        .get("definition")
        .and_then(Value::as_str)
        .ok_or_else(|| CompileError::MalformedDefinition {
            detail: "\"definition\" key is not a string".to_string(),
            element: snippet(element),
        })?;
    let value = element
        .get("value")
        .ok_or_else(|| CompileError::MalformedDefinition {
            detail: "missing \"value\" key".to_string(),
            element: snippet(element),
        })?;
    Ok(Definition::new(name, value.clone()))
}

/// Install an empty placeholder validation for every capture-referenced
/// name with no declaration.
fn install_placeholders(query: &Query, validations: &mut IndexMap<String, Validation>) {
    for part in query.parts() {
        match part {
            QueryPart::Capture(capture) => {
                validations
                    .entry(capture.validation.clone())
                    .or_insert_with(|| Validation::empty(&capture.validation));
            }
            other => {
                if let Some(subquery) = other.subquery() {
                    install_placeholders(subquery, validations);
                }
            }
        }
    }
}

/// A short single-line rendering of the offending element for error
/// messages.
fn snippet(element: &Value) -> String {
    let text = element.to_string();
    if text.chars().count() > 120 {
        let mut short: String = text.chars().take(117).collect();
        short.push_str("...");
        return short;
    }
    text
}
