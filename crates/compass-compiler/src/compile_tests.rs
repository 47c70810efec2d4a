use indoc::indoc;
use serde_json::{Value, json};

use compass_core::{CaptureMode, QueryPart, dump_queries};

use crate::compile::{CompiledDocument, compile_document};
use crate::error::CompileError;

fn compile(text: &str) -> Result<CompiledDocument, CompileError> {
    let root: Value = serde_json::from_str(text).unwrap();
    compile_document(&root)
}

fn compile_ok(text: &str) -> CompiledDocument {
    compile(text).unwrap()
}

#[test]
fn classifies_every_token_kind() {
    let doc = compile_ok(indoc! {r#"
        [
            [
                "// kitchen sink",
                "line1",
                "^prefix",
                "~substring",
                "/line(.*)/i",
                "!--",
                "*--",
                "*",
                "?",
                "!*",
                ".",
                "()",
                "DEBUG",
                ["KEY", "()", "isThing"]
            ]
        ]
    "#});

    let query = &doc.queries[0];
    let parts = query.parts();
    assert!(matches!(&parts[0], QueryPart::Comment(text) if text == " kitchen sink"));
    assert!(matches!(&parts[1], QueryPart::StringEquals(v) if v == "line1"));
    assert!(matches!(&parts[2], QueryPart::StringStartsWith(v) if v == "prefix"));
    assert!(matches!(&parts[3], QueryPart::StringContains(v) if v == "substring"));
    assert!(matches!(&parts[4], QueryPart::Regex(r) if r.source() == "/line(.*)/i"));
    assert!(matches!(&parts[5], QueryPart::NotStructure));
    assert!(matches!(&parts[6], QueryPart::SkipStructure));
    assert!(matches!(&parts[7], QueryPart::SkipAny));
    assert!(matches!(&parts[8], QueryPart::SkipOne));
    assert!(matches!(&parts[9], QueryPart::SkipAll));
    assert!(matches!(&parts[10], QueryPart::Any));
    assert!(matches!(&parts[11], QueryPart::CaptureString));
    assert!(matches!(&parts[12], QueryPart::Debug));
    assert!(matches!(&parts[13], QueryPart::Capture(_)));

    // Comment and DEBUG never consume input.
    assert_eq!(query.minimum_parts_count(), 12);
}

#[test]
fn capture_triple_defaults_validation_to_identity() {
    let doc = compile_ok(r#"[["// q", ["KEY", "()"]]]"#);
    let QueryPart::Capture(capture) = &doc.queries[0].parts()[1] else {
        panic!("expected a capture part");
    };
    assert_eq!(capture.key, "KEY");
    assert_eq!(capture.validation, ".");
    assert!(matches!(capture.mode, CaptureMode::WholeToken));
}

#[test]
fn capture_triple_with_regex_and_literal_modes() {
    let doc = compile_ok(r#"[["// q", ["A", "/x(\\d+)/"], ["B", "label", "."]]]"#);
    let QueryPart::Capture(a) = &doc.queries[0].parts()[1] else {
        panic!();
    };
    assert!(matches!(&a.mode, CaptureMode::Rx(r) if r.source() == "/x(\\d+)/"));
    let QueryPart::Capture(b) = &doc.queries[0].parts()[2] else {
        panic!();
    };
    assert!(matches!(&b.mode, CaptureMode::Literal(v) if v == "label"));
}

#[test]
fn capture_triple_rejects_other_inner_kinds() {
    let err = compile(r#"[["// q", ["KEY", "!--", "."]]]"#).unwrap_err();
    assert!(matches!(err, CompileError::InvalidCaptureForm { .. }));
}

#[test]
fn null_third_element_is_still_a_capture() {
    let doc = compile_ok(r#"[["// q", ["KEY", "()", null]]]"#);
    assert!(matches!(&doc.queries[0].parts()[1], QueryPart::Capture(c) if c.validation == "."));
}

#[test]
fn repeat_control_token_sets_part_type_and_is_excluded() {
    let doc = compile_ok(r#"[["// q", ["REPEAT", "dog"], ["REPEAT_UNTIL_STRUCTURE", "cat"], ["a", "b", "c", "d"]]]"#);
    let parts = doc.queries[0].parts();
    let QueryPart::Repeat(sub) = &parts[1] else {
        panic!("expected REPEAT subquery");
    };
    assert_eq!(sub.parts().len(), 1);
    assert!(matches!(&parts[2], QueryPart::RepeatUntilStructure(_)));
    // Four plain strings cannot be a capture triple, so: subquery.
    assert!(matches!(&parts[3], QueryPart::Subquery(q) if q.parts().len() == 4));
}

#[test]
fn top_level_query_requires_leading_comment() {
    let err = compile(r#"[["line1"]]"#).unwrap_err();
    assert!(matches!(err, CompileError::MissingLeadingComment { .. }));

    // Subqueries are exempt.
    compile_ok(r#"[["// q", ["line1", "line2", "line3", "line4"]]]"#);
}

#[test]
fn top_level_comments_and_element_order_are_free() {
    let doc = compile_ok(indoc! {r#"
        [
            "// a top-level note",
            ["// q", ["KEY", "()", "isCat"]],
            {"validation": "isCat", "allowAny": ["/CAT\\d+/"]},
            {"definition": "d", "value": "line1"}
        ]
    "#});
    assert_eq!(doc.queries.len(), 1);
    assert!(doc.validations.contains_key("isCat"));
    assert!(doc.definitions.contains_key("d"));
}

#[test]
fn identity_validation_is_always_installed() {
    let doc = compile_ok("[]");
    assert!(doc.validations.contains_key("."));
}

#[test]
fn referenced_unknown_validation_gets_a_placeholder() {
    let doc = compile_ok(r#"[["// q", ["HP", "()", "isHitPoints"]]]"#);
    let placeholder = &doc.validations["isHitPoints"];
    assert!(placeholder.allow_any.is_empty());
    assert!(placeholder.disallow.is_empty());
}

#[test]
fn definitions_substitute_before_classification() {
    let doc = compile_ok(indoc! {r#"
        [
            {"definition": "anyLine", "value": "/line\\d+/"},
            {"definition": "block", "value": ["REPEAT", "$anyLine"]},
            ["// q", "$anyLine", "$block"]
        ]
    "#});
    let parts = doc.queries[0].parts();
    assert!(matches!(&parts[1], QueryPart::Regex(r) if r.source() == "/line\\d+/"));
    // Nested tokens of a substituted fragment compile normally.
    let QueryPart::Repeat(sub) = &parts[2] else {
        panic!("expected REPEAT from definition");
    };
    assert!(matches!(&sub.parts()[0], QueryPart::Regex(_)));
}

#[test]
fn undefined_definition_reference_fails() {
    let err = compile(r#"[["// q", "$missing"]]"#).unwrap_err();
    assert!(matches!(err, CompileError::UndefinedDefinition { name } if name == "missing"));
}

#[test]
fn duplicate_definition_fails() {
    let err = compile(
        r#"[{"definition": "d", "value": "x"}, {"definition": "d", "value": "y"}]"#,
    )
    .unwrap_err();
    assert!(matches!(err, CompileError::DuplicateDefinition { name } if name == "d"));
}

#[test]
fn malformed_regex_literal_fails() {
    let err = compile(r#"[["// q", "/unterminated"]]"#).unwrap_err();
    assert!(matches!(err, CompileError::InvalidRegexLiteral(_)));
}

#[test]
fn malformed_validation_fails() {
    let err = compile(r#"[{"validation": "v", "allowAll": "not-an-array"}]"#).unwrap_err();
    assert!(matches!(err, CompileError::MalformedValidation { .. }));

    let err = compile(r#"[{"validation": "v", "disallow": [42]}]"#).unwrap_err();
    assert!(matches!(err, CompileError::MalformedValidation { .. }));
}

#[test]
fn object_without_known_keys_fails() {
    let err = compile(r#"[{"neither": true}]"#).unwrap_err();
    assert!(matches!(err, CompileError::UnrecognizedElement { .. }));
}

#[test]
fn non_array_document_fails() {
    assert!(matches!(
        compile_document(&json!("nope")),
        Err(CompileError::NotAnArray)
    ));
}

#[test]
fn compile_dump_compile_is_idempotent() {
    let text = indoc! {r#"
        [
            [
                "// everything",
                "line1",
                "^pre",
                "~mid",
                "/rx(\\d+)/ig",
                "!--",
                "*--",
                ".",
                ["KEY", "()", "isCat"],
                ["REPEAT_UNTIL_STRUCTURE", ["V", "/v=(\\w+)/", "."]]
            ]
        ]
    "#};
    let first = compile_ok(text);
    let dumped = dump_queries(&first.queries);

    let second = compile_document(&dumped).unwrap();
    let redumped = dump_queries(&second.queries);
    assert_eq!(dumped, redumped);
}
