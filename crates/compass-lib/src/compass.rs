//! The Compass façade: compile once, match many times.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use compass_compiler::{CompileError, CompiledDocument, compile_document};
use compass_core::{
    CustomValidations, Definition, MatchRecord, Query, Validation, dump_queries,
};
use compass_vm::{PrintTracer, RuntimeError, Tracer, find_matches};

/// Compass is like regex for arrays of strings. Construct one from a JSON
/// query document, then run it against token arrays; each run returns the
/// capture records of every query match found.
///
/// Read-only after construction, apart from [`add_validation`]
/// registration, which is expected during setup before concurrent
/// matching begins.
///
/// [`add_validation`]: Compass::add_validation
pub struct Compass {
    queries: Vec<Query>,
    validations: IndexMap<String, Validation>,
    definitions: IndexMap<String, Definition>,
    custom_validations: CustomValidations,
}

impl Compass {
    /// Compile a query document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        let root: Value = serde_json::from_str(json)?;
        Self::from_value(&root)
    }

    /// Compile an already parsed query document.
    pub fn from_value(root: &Value) -> Result<Self, CompileError> {
        let CompiledDocument {
            queries,
            validations,
            definitions,
        } = compile_document(root)?;
        Ok(Self {
            queries,
            validations,
            definitions,
            custom_validations: CustomValidations::new(),
        })
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn validations(&self) -> &IndexMap<String, Validation> {
        &self.validations
    }

    pub fn definitions(&self) -> &IndexMap<String, Definition> {
        &self.definitions
    }

    /// Register (or override) a custom validation callback under `name`.
    /// The callback alone decides acceptance and any transformation of
    /// the candidate value. If no validation with that name exists yet,
    /// an empty placeholder is created so references to it resolve.
    pub fn add_validation(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) {
        let name = name.into();
        self.validations
            .entry(name.clone())
            .or_insert_with(|| Validation::empty(name.clone()));
        self.custom_validations.insert(name, Box::new(callback));
    }

    /// Match every query against a JSON array of string tokens. `DEBUG`
    /// tokens trace to stderr.
    pub fn matches(&self, against: &Value) -> Result<Vec<MatchRecord>, RuntimeError> {
        self.matches_with_tracer(against, &mut PrintTracer)
    }

    /// Like [`matches`](Compass::matches), parsing the token array from
    /// JSON text first.
    pub fn matches_json(&self, json: &str) -> Result<Vec<MatchRecord>, RuntimeError> {
        let tokens: Value =
            serde_json::from_str(json).map_err(|e| RuntimeError::Json(e.to_string()))?;
        self.matches(&tokens)
    }

    /// Match with a caller-supplied tracer receiving `DEBUG` output.
    pub fn matches_with_tracer(
        &self,
        against: &Value,
        tracer: &mut dyn Tracer,
    ) -> Result<Vec<MatchRecord>, RuntimeError> {
        find_matches(
            against,
            &self.queries,
            &self.validations,
            &self.custom_validations,
            tracer,
        )
    }
}

impl fmt::Debug for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compass")
            .field("queries", &self.queries)
            .field("validations", &self.validations)
            .field("definitions", &self.definitions)
            .field(
                "custom_validations",
                &self.custom_validations.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Re-serializes the compiled queries to their textual form. Compiling
/// the output again yields a structurally identical Compass.
impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", dump_queries(&self.queries))
    }
}
