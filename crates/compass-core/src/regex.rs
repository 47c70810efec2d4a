//! Regex literals (`/body/flags`) and the process-wide compilation cache.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use regex::{Regex, RegexBuilder};

/// Error parsing or compiling a `/body/flags` regex literal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegexError {
    /// Missing `/` delimiters or an empty body.
    #[error("regex literal must be of the form /body/flags: {0}")]
    MalformedLiteral(String),
    /// A trailing flag character outside `i`, `g`, `m`.
    #[error("unknown regex flag {flag:?} in {literal}")]
    UnknownFlag { literal: String, flag: char },
    /// The body did not compile.
    #[error("failed to compile regex {literal}: {message}")]
    BadPattern { literal: String, message: String },
}

/// A compiled regex plus its flags. Identity is the full literal text
/// (`source`), which doubles as the cache key both here and in the
/// per-match root cache.
#[derive(Debug)]
pub struct CompassRegex {
    source: String,
    regex: Regex,
    ignore_case: bool,
    global: bool,
    multiline: bool,
}

impl CompassRegex {
    /// Parse and compile a `/body/flags` literal. Flags are a subset of
    /// `{i,g,m}` in any order; repeated flags apply once.
    pub fn parse(literal: &str) -> Result<Self, RegexError> {
        let rest = literal
            .strip_prefix('/')
            .ok_or_else(|| RegexError::MalformedLiteral(literal.to_string()))?;
        let close = rest
            .rfind('/')
            .ok_or_else(|| RegexError::MalformedLiteral(literal.to_string()))?;
        let body = &rest[..close];
        let flags = &rest[close + 1..];
        if body.is_empty() || flags.len() > 3 {
            return Err(RegexError::MalformedLiteral(literal.to_string()));
        }

        let mut ignore_case = false;
        let mut global = false;
        let mut multiline = false;
        for flag in flags.chars() {
            match flag {
                'i' => ignore_case = true,
                'g' => global = true,
                'm' => multiline = true,
                other => {
                    return Err(RegexError::UnknownFlag {
                        literal: literal.to_string(),
                        flag: other,
                    });
                }
            }
        }

        let regex = RegexBuilder::new(body)
            .case_insensitive(ignore_case)
            .multi_line(multiline)
            .build()
            .map_err(|e| RegexError::BadPattern {
                literal: literal.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            source: literal.to_string(),
            regex,
            ignore_case,
            global,
            multiline,
        })
    }

    /// The original `/body/flags` literal.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Test the value. Without the `g` flag the match must begin at
    /// offset 0; with it, anywhere.
    pub fn test(&self, value: &str) -> bool {
        if self.global {
            self.regex.is_match(value)
        } else {
            // find() returns the leftmost match, so a nonzero start means
            // no match exists at offset 0.
            self.regex.find(value).is_some_and(|m| m.start() == 0)
        }
    }

    /// Extract captured values. Each match contributes every filled
    /// group, or its whole text when the pattern has no groups. Without
    /// the `g` flag only a match anchored at offset 0 counts.
    pub fn extract(&self, value: &str) -> Vec<String> {
        let mut out = Vec::new();
        if self.global {
            for caps in self.regex.captures_iter(value) {
                push_groups(&caps, &mut out);
            }
        } else if let Some(caps) = self.regex.captures(value) {
            if caps.get(0).is_some_and(|m| m.start() == 0) {
                push_groups(&caps, &mut out);
            }
        }
        out
    }

    /// Delete every match of this regex from `value`.
    pub fn remove_from(&self, value: &str) -> String {
        self.regex.replace_all(value, "").into_owned()
    }
}

fn push_groups(caps: &regex::Captures<'_>, out: &mut Vec<String>) {
    if caps.len() > 1 {
        for group in caps.iter().skip(1).flatten() {
            out.push(group.as_str().to_string());
        }
    } else if let Some(whole) = caps.get(0) {
        out.push(whole.as_str().to_string());
    }
}

/// Process-wide memo of compiled regex literals, shared by every Compass
/// instance. The lock guards only the lookup-or-insert; compilation of a
/// miss happens outside it (a racing thread may compile the same literal
/// twice, the first insert wins).
pub struct RegexCache {
    inner: Mutex<HashMap<String, Arc<CompassRegex>>>,
}

static GLOBAL_REGEX_CACHE: LazyLock<RegexCache> = LazyLock::new(RegexCache::new);

impl RegexCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// The shared process-wide cache.
    pub fn global() -> &'static RegexCache {
        &GLOBAL_REGEX_CACHE
    }

    /// Look up the literal, compiling and inserting on a miss.
    pub fn compile(&self, literal: &str) -> Result<Arc<CompassRegex>, RegexError> {
        {
            let cache = self.inner.lock().expect("regex cache poisoned");
            if let Some(cached) = cache.get(literal) {
                return Ok(Arc::clone(cached));
            }
        }

        let compiled = Arc::new(CompassRegex::parse(literal)?);

        let mut cache = self.inner.lock().expect("regex cache poisoned");
        let entry = cache
            .entry(literal.to_string())
            .or_insert_with(|| Arc::clone(&compiled));
        Ok(Arc::clone(entry))
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new()
    }
}

/// True if the token reads as a `/body/flags` regex literal: delimited by
/// slashes with at most three trailing flag characters from `{i,g,m}`.
pub fn is_regex_literal(value: &str) -> bool {
    let Some(rest) = value.strip_prefix('/') else {
        return false;
    };
    let Some(close) = rest.rfind('/') else {
        return false;
    };
    let flags = &rest[close + 1..];
    !rest[..close].is_empty() && flags.len() <= 3 && flags.chars().all(|c| "igm".contains(c))
}
