use indoc::indoc;
use serde_json::json;

use super::compass::Compass;
use crate::{CompileError, MatchRecord, RuntimeError};

fn record(entries: &[(&str, &[&str])]) -> MatchRecord {
    entries
        .iter()
        .map(|(key, values)| {
            (
                key.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn from_json_and_matches_end_to_end() {
    let compass =
        Compass::from_json(r#"[["// c", "line1", ["KEY", "()", "."], "line3"]]"#).unwrap();
    let records = compass
        .matches(&json!(["line0", "line1", "line2", "line3", "line4"]))
        .unwrap();
    assert_eq!(records, vec![record(&[("KEY", &["line2"])])]);
}

#[test]
fn matches_json_parses_token_text() {
    let compass = Compass::from_json(r#"[["// c", ["KEY", "()", "."]]]"#).unwrap();
    let records = compass.matches_json(r#"["only"]"#).unwrap();
    assert_eq!(records, vec![record(&[("KEY", &["only"])])]);
}

#[test]
fn matches_json_reports_parse_failures() {
    let compass = Compass::from_json(r#"[["// c", "a"]]"#).unwrap();
    let err = compass.matches_json("not json").unwrap_err();
    assert!(matches!(err, RuntimeError::Json(_)));
}

#[test]
fn non_array_tokens_are_rejected() {
    let compass = Compass::from_json(r#"[["// c", "a"]]"#).unwrap();
    let err = compass.matches(&json!({"a": 1})).unwrap_err();
    assert!(matches!(err, RuntimeError::NotAnArray));
}

#[test]
fn non_array_document_is_a_compile_error() {
    let err = Compass::from_json(r#"{"not": "an array"}"#).unwrap_err();
    assert!(matches!(err, CompileError::NotAnArray));
}

#[test]
fn malformed_document_text_is_a_json_error() {
    let err = Compass::from_json("[[").unwrap_err();
    assert!(matches!(err, CompileError::Json(_)));
}

#[test]
fn add_validation_overrides_matching_behavior() {
    let doc = r#"[["// c", "HP", ["HP", "()", "isHitPoints"]]]"#;
    let mut compass = Compass::from_json(doc).unwrap();
    compass.add_validation("isHitPoints", |value| {
        let n: i64 = value.parse().ok()?;
        if n <= 0 {
            return None;
        }
        Some(((n / 10) * 10).to_string())
    });

    let rejected = compass.matches(&json!(["HP", "-1000"])).unwrap();
    assert!(rejected.is_empty());

    let accepted = compass.matches(&json!(["HP", "47"])).unwrap();
    assert_eq!(accepted, vec![record(&[("HP", &["40"])])]);
}

#[test]
fn add_validation_creates_placeholder_entries() {
    let mut compass = Compass::from_json(r#"[["// c", "a"]]"#).unwrap();
    assert!(!compass.validations().contains_key("extra"));
    compass.add_validation("extra", |_| None);
    assert!(compass.validations().contains_key("extra"));
}

#[test]
fn document_validations_and_definitions_are_exposed() {
    let doc = indoc! {r#"
        [
            {"validation": "isCat", "allowAny": ["/CAT\\d+/"]},
            {"definition": "anchor", "value": "start"},
            ["// c", "$anchor", ["KEY", "()", "isCat"]]
        ]
    "#};
    let compass = Compass::from_json(doc).unwrap();
    assert!(compass.validations().contains_key("isCat"));
    assert!(compass.definitions().contains_key("anchor"));
    assert_eq!(compass.queries().len(), 1);
}

#[test]
fn display_round_trips_through_the_compiler() {
    let doc = indoc! {r#"
        [
            ["// c", "^prefix", "~needle", "/rx\\d+/ig", "*", "?", "!*", ".",
             "!--", "*--", "()", ["KEY", "()", "."],
             ["REPEAT_UNTIL_STRUCTURE", ["ITEM", "()", "."]]]
        ]
    "#};
    let compass = Compass::from_json(doc).unwrap();
    let dumped = compass.to_string();
    let reparsed = Compass::from_json(&dumped).unwrap();
    assert_eq!(reparsed.to_string(), dumped);
}

#[test]
fn compass_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Compass>();
}
