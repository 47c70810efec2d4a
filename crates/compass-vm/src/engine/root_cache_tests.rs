use compass_core::CompassRegex;

use super::root_cache::RootCache;

#[test]
fn test_results_are_memoized_per_index() {
    let regex = CompassRegex::parse(r"/CAT\d+/").unwrap();
    let mut cache = RootCache::new();

    assert!(cache.test(&regex, 0, "CAT1"));
    // Same key returns the stored result, even for a different value.
    assert!(cache.test(&regex, 0, "DOG"));
    // A different index is computed fresh.
    assert!(!cache.test(&regex, 1, "DOG"));
}

#[test]
fn extract_results_are_memoized_per_index() {
    let regex = CompassRegex::parse(r"/-- (\w+) --/").unwrap();
    let mut cache = RootCache::new();

    assert_eq!(cache.extract(&regex, 3, "-- table --"), vec!["table"]);
    assert_eq!(cache.extract(&regex, 3, "unrelated"), vec!["table"]);
    assert!(cache.extract(&regex, 4, "unrelated").is_empty());
}

#[test]
fn regexes_are_keyed_by_literal_identity() {
    let anchored = CompassRegex::parse("/cat/").unwrap();
    let global = CompassRegex::parse("/cat/g").unwrap();
    let mut cache = RootCache::new();

    assert!(!cache.test(&anchored, 0, "a cat"));
    assert!(cache.test(&global, 0, "a cat"));
}
