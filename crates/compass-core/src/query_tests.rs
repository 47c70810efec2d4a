use crate::part::{Capture, CaptureMode, QueryPart};
use crate::query::Query;

fn capture(key: &str) -> QueryPart {
    QueryPart::Capture(Capture {
        key: key.to_string(),
        mode: CaptureMode::WholeToken,
        validation: ".".to_string(),
    })
}

#[test]
fn minimum_parts_count_excludes_annotations() {
    let query = Query::new(vec![
        QueryPart::Comment(" heading".to_string()),
        QueryPart::Debug,
        QueryPart::StringEquals("a".to_string()),
        capture("KEY"),
    ]);
    assert_eq!(query.minimum_parts_count(), 2);
}

#[test]
fn capture_keys_flatten_subqueries() {
    let inner = Query::new(vec![capture("INNER")]);
    let query = Query::new(vec![
        capture("OUTER"),
        QueryPart::RepeatUntilStructure(inner),
    ]);
    assert_eq!(query.capture_keys(), ["OUTER", "INNER"]);
}

#[test]
fn capture_keys_deduplicate() {
    let query = Query::new(vec![capture("KEY"), capture("KEY")]);
    assert_eq!(query.capture_keys(), ["KEY"]);
}

#[test]
fn dump_round_trips_tokens() {
    let query = Query::new(vec![
        QueryPart::Comment(" q".to_string()),
        QueryPart::StringEquals("line1".to_string()),
        QueryPart::StringStartsWith("pre".to_string()),
        QueryPart::StringContains("mid".to_string()),
        QueryPart::NotStructure,
        capture("KEY"),
    ]);
    assert_eq!(
        query.to_json(),
        serde_json::json!(["// q", "line1", "^pre", "~mid", "!--", ["KEY", "()", "."]])
    );
}

#[test]
fn dump_restores_repeat_control_token() {
    let inner = Query::new(vec![capture("K")]);
    let query = Query::new(vec![QueryPart::Repeat(inner)]);
    assert_eq!(
        query.to_json(),
        serde_json::json!([["REPEAT", ["K", "()", "."]]])
    );
}
