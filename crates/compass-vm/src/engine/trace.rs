//! Tracing hooks for the `DEBUG` query token.
//!
//! The engine only calls the tracer while the per-attempt debug flag is
//! set, so tracing never affects match outcomes and costs nothing for
//! queries without a `DEBUG` token.

/// Receives match-engine events for diagnostic output.
pub trait Tracer {
    /// A `DEBUG` token was encountered at `index`.
    fn begin(&mut self, indent: usize, index: usize);

    /// A part consumed (or skipped at) `index`.
    fn part_matched(&mut self, indent: usize, index: usize, label: &str, detail: &str);

    /// A part failed at `index`, aborting the attempt.
    fn part_failed(&mut self, indent: usize, index: usize, label: &str, detail: &str);

    /// A value was accepted under `key`.
    fn captured(&mut self, indent: usize, index: usize, key: &str, value: &str);

    /// A candidate was rejected by the named validation.
    fn validation_failed(&mut self, indent: usize, index: usize, name: &str, value: &str);

    /// The whole query attempt succeeded.
    fn query_success(&mut self, indent: usize, index: usize, last_capture: usize);
}

/// Discards every event.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn begin(&mut self, _indent: usize, _index: usize) {}

    #[inline(always)]
    fn part_matched(&mut self, _indent: usize, _index: usize, _label: &str, _detail: &str) {}

    #[inline(always)]
    fn part_failed(&mut self, _indent: usize, _index: usize, _label: &str, _detail: &str) {}

    #[inline(always)]
    fn captured(&mut self, _indent: usize, _index: usize, _key: &str, _value: &str) {}

    #[inline(always)]
    fn validation_failed(&mut self, _indent: usize, _index: usize, _name: &str, _value: &str) {}

    #[inline(always)]
    fn query_success(&mut self, _indent: usize, _index: usize, _last_capture: usize) {}
}

/// Writes events to stderr, one line each, indented by nesting depth.
#[derive(Default)]
pub struct PrintTracer;

impl PrintTracer {
    fn line(&self, indent: usize, index: usize, message: &str) {
        eprintln!("{:width$}[DEBUG] [{index}] {message}", "", width = indent * 2);
    }
}

impl Tracer for PrintTracer {
    fn begin(&mut self, indent: usize, index: usize) {
        self.line(indent, index, "-- BEGIN DEBUG QUERY --");
    }

    fn part_matched(&mut self, indent: usize, index: usize, label: &str, detail: &str) {
        self.line(indent, index, &format!("{label}: {detail}"));
    }

    fn part_failed(&mut self, indent: usize, index: usize, label: &str, detail: &str) {
        self.line(indent, index, &format!("failed {label}: {detail}"));
    }

    fn captured(&mut self, indent: usize, index: usize, key: &str, value: &str) {
        self.line(indent, index, &format!("CAPTURE [{key}] {value}"));
    }

    fn validation_failed(&mut self, indent: usize, index: usize, name: &str, value: &str) {
        self.line(indent, index, &format!("FAILED VALIDATION {name}: {value}"));
    }

    fn query_success(&mut self, indent: usize, index: usize, last_capture: usize) {
        self.line(
            indent,
            index,
            &format!("QUERY SUCCESS: last capture at {last_capture}"),
        );
    }
}
