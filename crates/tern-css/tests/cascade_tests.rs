//! Integration tests for stylesheet parsing, the cascade and the style
//! manager.

use std::collections::HashMap;
use std::sync::Arc;

use tern_common::WarningLog;
use tern_css::{
    Origin, RuleSet, SelectorRegistry, StyleManager, StyleableMap, compute_style,
    compute_style_with_inline, parse_declarations, parse_stylesheet, parse_stylesheet_with,
};
use tern_dom::{DomTree, ElementData, NodeId};

type Style = StyleableMap<String, String>;

fn author(css: &str) -> RuleSet {
    RuleSet::new([parse_stylesheet(css, Origin::Author)])
}

fn style_of(tree: &DomTree, element: NodeId, rules: &RuleSet) -> Style {
    let mut map = StyleableMap::new();
    let _ = compute_style(tree, &element, rules, &mut map);
    map
}

fn value<'a>(map: &'a Style, name: &str) -> Option<&'a str> {
    map.get(name).map(String::as_str)
}

/// `<g><rect id="r" class="a"/></g>`
fn rect_in_group() -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let g = tree.append_element(NodeId::ROOT, ElementData::new("g"));
    let rect = tree.append_element(
        g,
        ElementData::new("rect").with_attr("id", "r").with_attr("class", "a"),
    );
    (tree, g, rect)
}

// ========== ranking ==========

#[test]
fn test_higher_specificity_wins_regardless_of_order() {
    let (tree, _g, rect) = rect_in_group();

    let map = style_of(&tree, rect, &author(".a { x: 1 } #r.a { x: 2 }"));
    assert_eq!(value(&map, "x"), Some("2"));

    let map = style_of(&tree, rect, &author("#r.a { x: 2 } .a { x: 1 }"));
    assert_eq!(value(&map, "x"), Some("2"));
}

#[test]
fn test_later_rule_wins_specificity_tie() {
    let (tree, _g, rect) = rect_in_group();
    let map = style_of(&tree, rect, &author(".a{x:1} .a{x:2}"));
    assert_eq!(value(&map, "x"), Some("2"));
}

#[test]
fn test_later_declaration_in_same_rule_wins() {
    let (tree, _g, rect) = rect_in_group();
    let map = style_of(&tree, rect, &author("rect { fill: red; fill: blue }"));
    assert_eq!(value(&map, "fill"), Some("blue"));
}

#[test]
fn test_group_uses_specificity_of_matching_member() {
    let mut tree = DomTree::new();
    let plain = tree.append_element(NodeId::ROOT, ElementData::new("rect").with_attr("class", "c"));
    let with_id = tree.append_element(
        NodeId::ROOT,
        ElementData::new("rect").with_attr("class", "c").with_attr("id", "x"),
    );
    let rules = author("#x, rect { fill: a } rect.c { fill: b }");

    // Only the `rect` member matches: (0,0,1) loses to (0,1,1).
    assert_eq!(value(&style_of(&tree, plain, &rules), "fill"), Some("b"));
    // `#x` matches first: (1,0,0) wins.
    assert_eq!(value(&style_of(&tree, with_id, &rules), "fill"), Some("a"));
}

#[test]
fn test_origin_outranks_specificity() {
    let (tree, _g, rect) = rect_in_group();
    let rules = RuleSet::new([
        parse_stylesheet("g > rect#r.a { fill: ua; stroke: ua }", Origin::UserAgent),
        parse_stylesheet("* { fill: author }", Origin::Author),
    ]);
    let (inline, errors) = parse_declarations("stroke: inline");
    assert!(errors.is_empty());

    let mut map = StyleableMap::new();
    let applied = compute_style_with_inline(&tree, &rect, &rules, &inline, &mut map);

    assert_eq!(applied, vec!["fill".to_string(), "stroke".to_string()]);
    assert_eq!(value(&map, "fill"), Some("author"));
    assert_eq!(map.effective_origin("fill"), Some(Origin::Author));
    assert_eq!(value(&map, "stroke"), Some("inline"));
    assert_eq!(map.effective_origin("stroke"), Some(Origin::Inline));
    assert_eq!(map.get_from(Origin::UserAgent, "stroke").map(String::as_str), Some("ua"));
}

#[test]
fn test_descendant_rule_applies() {
    let (tree, g, rect) = rect_in_group();
    let rules = author("g rect { fill: red } g > g { fill: blue }");
    assert_eq!(value(&style_of(&tree, rect, &rules), "fill"), Some("red"));
    assert!(style_of(&tree, g, &rules).is_empty());
}

// ========== explicit null ==========

#[test]
fn test_unset_blocks_lower_origin() {
    let (tree, _g, rect) = rect_in_group();
    let rules = RuleSet::new([
        parse_stylesheet("rect { fill: black }", Origin::UserAgent),
        parse_stylesheet("rect { fill: unset }", Origin::Author),
    ]);
    let map = style_of(&tree, rect, &rules);

    assert_eq!(map.get("fill"), None);
    assert!(map.contains_key(Origin::Author, "fill"));
    assert_eq!(map.effective_origin("fill"), Some(Origin::Author));
    assert_eq!(map.get_from(Origin::UserAgent, "fill").map(String::as_str), Some("black"));
}

// ========== repeated passes ==========

#[test]
fn test_recomputing_is_idempotent() {
    let (tree, _g, rect) = rect_in_group();
    let rules = RuleSet::new([
        parse_stylesheet("rect { fill: black; stroke: none }", Origin::UserAgent),
        parse_stylesheet(".a { fill: unset } #r { width: 2px }", Origin::Author),
    ]);
    let mut map = StyleableMap::new();

    let first = compute_style(&tree, &rect, &rules, &mut map);
    let snapshot = map.clone();
    let second = compute_style(&tree, &rect, &rules, &mut map);

    assert_eq!(first, second);
    assert_eq!(map, snapshot);
}

#[test]
fn test_properties_that_stop_matching_are_cleared() {
    let (mut tree, _g, rect) = rect_in_group();
    let rules = author(".a { fill: red } rect { stroke: blue }");
    let mut map = StyleableMap::new();
    let _ = compute_style(&tree, &rect, &rules, &mut map);
    assert_eq!(value(&map, "fill"), Some("red"));

    if let Some(data) = tree.as_element_mut(rect) {
        let _ = data.attrs.remove("class");
    }
    let _ = compute_style(&tree, &rect, &rules, &mut map);

    assert_eq!(map.get("fill"), None);
    assert!(!map.contains_key(Origin::Author, "fill"));
    assert_eq!(value(&map, "stroke"), Some("blue"));
}

#[test]
fn test_override_origin_is_never_touched() {
    let (tree, _g, rect) = rect_in_group();
    let mut map = StyleableMap::new();
    let _ = map.put(Origin::Override, "fill".to_string(), Some("gold".to_string()));

    let _ = compute_style(&tree, &rect, &author("rect { fill: red }"), &mut map);

    assert_eq!(value(&map, "fill"), Some("gold"));
    assert_eq!(map.get_from(Origin::Author, "fill").map(String::as_str), Some("red"));
}

#[test]
fn test_override_origin_sheet_does_not_clear_host_values() {
    let (tree, _g, rect) = rect_in_group();
    let mut map = StyleableMap::new();
    let _ = map.put(Origin::Override, "opacity".to_string(), Some("0.5".to_string()));
    let rules = RuleSet::new([parse_stylesheet("circle { fill: red }", Origin::Override)]);

    let _ = compute_style(&tree, &rect, &rules, &mut map);
    assert_eq!(value(&map, "opacity"), Some("0.5"));

    // A matching rule parsed at the override origin is not applied either.
    let rules = RuleSet::new([parse_stylesheet("rect { opacity: 1 }", Origin::Override)]);
    let applied = compute_style(&tree, &rect, &rules, &mut map);
    assert!(applied.is_empty());
    assert_eq!(value(&map, "opacity"), Some("0.5"));
}

#[test]
fn test_origins_absent_from_rules_are_left_alone() {
    let (tree, _g, rect) = rect_in_group();
    let mut map = StyleableMap::new();
    let _ = map.put(Origin::UserAgent, "fill".to_string(), Some("black".to_string()));

    let _ = compute_style(&tree, &rect, &author("circle { fill: red }"), &mut map);

    assert_eq!(value(&map, "fill"), Some("black"));
}

// ========== parse recovery ==========

#[test]
fn test_bad_member_keeps_the_rest_of_the_group() {
    let sheet = parse_stylesheet("a, b[x ?= y], c { fill: red }", Origin::Author);
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].selectors.to_string(), "a, c");
    assert_eq!(sheet.errors.len(), 1);
    assert_eq!(sheet.errors[0].rule_index, 0);
}

#[test]
fn test_rule_without_valid_selector_is_dropped() {
    let sheet = parse_stylesheet("[[ { fill: red } rect { fill: blue }", Origin::Author);
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].selectors.to_string(), "rect");
    // Dropped rules still take up a source position.
    assert_eq!(sheet.rules[0].source_order, 1);
    assert_eq!(sheet.errors[0].rule_index, 0);
}

#[test]
fn test_bad_declarations_are_skipped() {
    let sheet = parse_stylesheet(
        "rect { fill red; stroke: blue; : x; width: 2 } circle { r: ; cx: 1 }",
        Origin::Author,
    );
    assert_eq!(sheet.rules.len(), 2);

    let names: Vec<_> = sheet.rules[0].declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["stroke", "width"]);
    assert_eq!(sheet.rules[1].declarations.len(), 1);

    let indices: Vec<_> = sheet.errors.iter().map(|e| e.rule_index).collect();
    assert_eq!(indices, vec![0, 0, 1]);
}

#[test]
fn test_declaration_values_keep_inner_spacing() {
    let sheet = parse_stylesheet("rect { font: bold  12px 'Sans Serif' ; }", Origin::Author);
    assert_eq!(sheet.rules[0].declarations[0].value_text(), "bold 12px \"Sans Serif\"");
}

#[test]
fn test_unknown_pseudo_class_goes_to_warning_log() {
    let registry = SelectorRegistry::with_pseudo_classes(["hover"]);
    let warnings = WarningLog::new();
    let sheet = parse_stylesheet_with(
        "rect:armed { x: 1 } rect:hover { x: 2 }",
        Origin::Author,
        &registry,
        &warnings,
    );

    assert_eq!(sheet.rules.len(), 2);
    assert!(sheet.is_clean());
    assert_eq!(warnings.len(), 1);
    let warning = &warnings.warnings()[0];
    assert_eq!(warning.component, "selector");
    assert!(warning.message.contains("armed"));
}

// ========== rule sets ==========

#[test]
fn test_rule_set_renumbers_across_sheets() {
    let rules = RuleSet::new([
        parse_stylesheet("a { x: 1 } b { x: 2 }", Origin::UserAgent),
        parse_stylesheet("c { x: 3 } d { x: 4 }", Origin::Author),
    ]);
    let orders: Vec<_> = rules.iter().map(|r| r.source_order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
    assert_eq!(
        rules.origins().into_iter().collect::<Vec<_>>(),
        vec![Origin::UserAgent, Origin::Author]
    );
}

#[test]
fn test_later_sheet_wins_tie() {
    let (tree, _g, rect) = rect_in_group();
    let rules = RuleSet::new([
        parse_stylesheet("rect { fill: first }", Origin::Author),
        parse_stylesheet("rect { fill: second }", Origin::Author),
    ]);
    assert_eq!(value(&style_of(&tree, rect, &rules), "fill"), Some("second"));
}

// ========== style manager ==========

#[test]
fn test_manager_replace_rules() {
    let (tree, _g, rect) = rect_in_group();
    let mut manager = StyleManager::new(author("rect { fill: red }"));
    let mut map = StyleableMap::new();
    let _ = manager.style_element(&tree, &rect, &mut map).unwrap();
    assert_eq!(value(&map, "fill"), Some("red"));

    let old = manager.replace_rules(author("rect { fill: blue }"));
    assert_eq!(old.len(), 1);
    let _ = manager.style_element(&tree, &rect, &mut map).unwrap();
    assert_eq!(value(&map, "fill"), Some("blue"));
}

#[test]
fn test_manager_shares_rule_set() {
    let rules = Arc::new(author("rect { fill: red }"));
    let a = StyleManager::new(Arc::clone(&rules));
    let b = StyleManager::new(Arc::clone(&rules));
    assert!(Arc::ptr_eq(a.rules(), b.rules()));
}

#[test]
fn test_style_subtree_visits_every_element() {
    let mut tree = DomTree::new();
    let g = tree.append_element(NodeId::ROOT, ElementData::new("g"));
    let rect = tree.append_element(g, ElementData::new("rect"));
    let text = tree.alloc(tern_dom::NodeType::Text("label".into()));
    tree.append_child(g, text);
    let circle = tree.append_element(
        g,
        ElementData::new("circle").with_attr("style", "fill: green"),
    );

    let manager = StyleManager::new(author("g { stroke: black } g > * { fill: red }"))
        .with_inline_style_attribute("style");
    let mut maps = HashMap::new();
    let styled = manager.style_subtree(&tree, &g, &mut maps).unwrap();

    assert_eq!(styled, 3);
    assert!(!maps.contains_key(&text));
    assert_eq!(value(&maps[&g], "stroke"), Some("black"));
    assert_eq!(maps[&g].get("fill"), None);
    assert_eq!(value(&maps[&rect], "fill"), Some("red"));
    assert_eq!(value(&maps[&circle], "fill"), Some("green"));
    assert_eq!(maps[&circle].effective_origin("fill"), Some(Origin::Inline));
}
