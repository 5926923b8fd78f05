//! Integration tests for per-origin style storage.

use tern_css::{Origin, StyleableMap};

fn sample() -> StyleableMap<&'static str, &'static str> {
    let mut map = StyleableMap::new();
    let _ = map.put(Origin::UserAgent, "fill", Some("black"));
    let _ = map.put(Origin::Author, "fill", Some("red"));
    let _ = map.put(Origin::UserAgent, "stroke", Some("none"));
    map
}

// ========== reads ==========

#[test]
fn test_highest_origin_wins() {
    let map = sample();
    assert_eq!(map.get("fill"), Some(&"red"));
    assert_eq!(map.effective_origin("fill"), Some(Origin::Author));
    assert_eq!(map.get("stroke"), Some(&"none"));
    assert_eq!(map.effective_origin("stroke"), Some(Origin::UserAgent));
    assert_eq!(map.get("width"), None);
    assert_eq!(map.effective_origin("width"), None);
}

#[test]
fn test_explicit_null_is_not_absence() {
    let mut map = StyleableMap::new();
    let _ = map.put(Origin::UserAgent, "fill", Some("red"));
    let _ = map.put(Origin::Author, "fill", None);

    assert!(map.contains_key(Origin::Author, "fill"));
    assert_eq!(map.get("fill"), None);
    assert_eq!(map.get_from(Origin::Author, "fill"), None);
    assert_eq!(map.get_from(Origin::UserAgent, "fill"), Some(&"red"));

    // Removing the null uncovers the lower origin again.
    assert_eq!(map.remove(Origin::Author, "fill"), Some(None));
    assert!(!map.contains_key(Origin::Author, "fill"));
    assert_eq!(map.get("fill"), Some(&"red"));
}

#[test]
fn test_put_returns_previous_slot() {
    let mut map = StyleableMap::new();
    assert_eq!(map.put(Origin::Inline, "x", Some(1)), None);
    assert_eq!(map.put(Origin::Inline, "x", None), Some(Some(1)));
    assert_eq!(map.put(Origin::Inline, "x", Some(2)), Some(None));
}

#[test]
fn test_iteration_reports_effective_values() {
    let mut map = sample();
    let _ = map.put(Origin::Override, "stroke", None);

    let all: Vec<_> = map.iter().collect();
    assert_eq!(all, vec![(&"fill", Some(&"red")), (&"stroke", None)]);

    let ua: Vec<_> = map.entries_from(Origin::UserAgent).collect();
    assert_eq!(ua, vec![(&"fill", Some(&"black")), (&"stroke", Some(&"none"))]);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["fill", "stroke"]);
}

// ========== removal ==========

#[test]
fn test_remove_prunes_empty_keys() {
    let mut map = sample();
    assert_eq!(map.len(), 2);

    assert_eq!(map.remove(Origin::UserAgent, "stroke"), Some(Some("none")));
    assert_eq!(map.len(), 1);
    assert_eq!(map.remove(Origin::UserAgent, "stroke"), None);
}

#[test]
fn test_remove_all_only_touches_one_origin() {
    let mut map = sample();
    map.remove_all(Origin::UserAgent);

    assert_eq!(map.len(), 1);
    assert_eq!(map.get("fill"), Some(&"red"));
    assert_eq!(map.get_from(Origin::UserAgent, "fill"), None);
    assert_eq!(map.get("stroke"), None);

    map.remove_all(Origin::Author);
    assert!(map.is_empty());
}

// ========== serialization ==========

#[test]
fn test_serializes_slots_per_origin() {
    let mut map = sample();
    let _ = map.put(Origin::Inline, "stroke", None);

    let json = serde_json::to_value(&map).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "fill": { "user-agent": "black", "author": "red" },
            "stroke": { "user-agent": "none", "inline": null },
        })
    );
}

#[test]
fn test_origin_names() {
    assert_eq!(Origin::UserAgent.to_string(), "user-agent");
    assert_eq!("override".parse::<Origin>().unwrap(), Origin::Override);
    assert!(Origin::Author < Origin::Inline);
}
