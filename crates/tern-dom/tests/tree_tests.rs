//! Tests for tree construction, sibling links and ElementSpec loading.

use tern_dom::{DomTree, ElementData, ElementSpec, NodeId, NodeType};

// ========== building ==========

#[test]
fn test_append_sets_parent_and_order() {
    let mut tree = DomTree::new();
    let g = tree.append_element(NodeId::ROOT, ElementData::new("g"));
    let rect = tree.append_element(g, ElementData::new("rect"));
    let circle = tree.append_element(g, ElementData::new("circle"));

    assert_eq!(tree.children(g), &[rect, circle]);
    assert_eq!(tree.parent(rect), Some(g));
    assert_eq!(tree.parent(g), Some(NodeId::ROOT));
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

#[test]
fn test_detached_node_has_no_links() {
    let mut tree = DomTree::new();
    let loose = tree.alloc(NodeType::Element(ElementData::new("rect")));

    assert_eq!(tree.parent(loose), None);
    assert!(tree.children(loose).is_empty());
    assert_eq!(tree.preceding_siblings(loose).count(), 0);
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn test_preceding_siblings_include_text_nearest_first() {
    let mut tree = DomTree::new();
    let g = tree.append_element(NodeId::ROOT, ElementData::new("g"));
    let first = tree.append_element(g, ElementData::new("rect"));
    let label = tree.alloc(NodeType::Text("label".to_string()));
    tree.append_child(g, label);
    let last = tree.append_element(g, ElementData::new("circle"));

    assert_eq!(tree.preceding_siblings(last).collect::<Vec<_>>(), vec![label, first]);
    assert_eq!(tree.preceding_siblings(first).count(), 0);
    assert!(tree.as_element(label).is_none());
    assert!(tree.as_element(NodeId::ROOT).is_none());
}

#[test]
fn test_as_element_mut_edits_in_place() {
    let mut tree = DomTree::new();
    let button = tree.append_element(NodeId::ROOT, ElementData::new("button"));

    let _ = tree.as_element_mut(button).unwrap().states.insert("hover".into());

    assert!(tree.as_element(button).unwrap().states.contains("hover"));
    assert!(tree.as_element_mut(NodeId::ROOT).is_none());
}

// ========== element data ==========

#[test]
fn test_element_id_classes_and_states() {
    let data = ElementData::new("rect")
        .with_attr("id", "r1")
        .with_attr("class", "  shape  selected ")
        .with_state("hover");

    assert_eq!(data.id(), Some("r1"));
    assert_eq!(data.classes().collect::<Vec<_>>(), vec!["shape", "selected"]);
    assert!(data.has_class("selected"));
    assert!(!data.has_class("shap"));
    assert!(data.states.contains("hover"));
    assert_eq!(ElementData::new("g").classes().count(), 0);
}

// ========== ElementSpec loading ==========

#[test]
fn test_from_spec_builds_nested_tree() {
    let spec: ElementSpec = serde_json::from_str(
        r#"{
            "tag": "drawing",
            "children": [
                { "tag": "rect", "attrs": { "class": "a" }, "states": ["hover"] },
                { "tag": "group", "children": [ { "tag": "text" } ] }
            ]
        }"#,
    )
    .unwrap();

    let (tree, top) = DomTree::from_spec(&spec);

    assert_eq!(tree.children(NodeId::ROOT), &[top]);
    let kids = tree.children(top);
    assert_eq!(kids.len(), 2);
    let rect = tree.as_element(kids[0]).unwrap();
    assert_eq!(rect.tag_name, "rect");
    assert!(rect.has_class("a"));
    assert!(rect.states.contains("hover"));
    assert_eq!(tree.preceding_siblings(kids[1]).collect::<Vec<_>>(), vec![kids[0]]);
    assert_eq!(tree.children(kids[1]).len(), 1);
}
