//! The cascade: deciding which declaration wins for each property.
//!
//! Every rule whose selector group matches the element is collected and
//! sorted ascending by `(origin, specificity, source order)`. Declarations
//! are then applied in that order, so for each origin the last declaration
//! of a property is the one stored. Each origin keeps its own winner in the
//! [`StyleableMap`], and the map's read order picks between origins.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::SelectorModel;
use crate::parser::{Declaration, RuleSet};
use crate::selector::Specificity;
use crate::style::{Origin, StyleableMap};

mod manager;

pub use manager::StyleManager;

/// A rule that matched the element, with the key it sorts by.
struct MatchedRule<'a> {
    origin: Origin,
    specificity: Specificity,
    source_order: usize,
    declarations: &'a [Declaration],
}

/// Compute the style of `element` from `rules` and write it into `map`.
///
/// The slot of every origin present in `rules` is cleared first, so
/// properties that no longer match disappear. Other origins are left alone.
/// [`Origin::Override`] belongs to the host: rules parsed at that origin are
/// skipped and its slot is never cleared or written. Declarations whose
/// value is `unset` store an explicit null for their origin.
///
/// Returns the names of the properties that were written, sorted.
/// Running the same computation twice leaves `map` unchanged.
pub fn compute_style<E, M>(
    model: &M,
    element: &E,
    rules: &RuleSet,
    map: &mut StyleableMap<String, String>,
) -> Vec<String>
where
    E: Clone,
    M: SelectorModel<E> + ?Sized,
{
    cascade(model, element, rules, None, map)
}

/// Like [`compute_style`], with `inline` declarations applied at
/// [`Origin::Inline`] after every inline-origin rule.
///
/// The inline slot is always cleared, even when `inline` is empty.
pub fn compute_style_with_inline<E, M>(
    model: &M,
    element: &E,
    rules: &RuleSet,
    inline: &[Declaration],
    map: &mut StyleableMap<String, String>,
) -> Vec<String>
where
    E: Clone,
    M: SelectorModel<E> + ?Sized,
{
    cascade(model, element, rules, Some(inline), map)
}

fn cascade<E, M>(
    model: &M,
    element: &E,
    rules: &RuleSet,
    inline: Option<&[Declaration]>,
    map: &mut StyleableMap<String, String>,
) -> Vec<String>
where
    E: Clone,
    M: SelectorModel<E> + ?Sized,
{
    let mut matched: Vec<MatchedRule<'_>> = rules
        .iter()
        .filter(|rule| rule.origin != Origin::Override)
        .filter_map(|rule| {
            let (selector, _) = rule.selectors.match_element(model, element)?;
            Some(MatchedRule {
                origin: rule.origin,
                specificity: selector.specificity(),
                source_order: rule.source_order,
                declarations: &rule.declarations,
            })
        })
        .collect();

    if let Some(declarations) = inline.filter(|d| !d.is_empty()) {
        matched.push(MatchedRule {
            origin: Origin::Inline,
            specificity: Specificity::default(),
            source_order: usize::MAX,
            declarations,
        });
    }

    matched.sort_by_key(|m| (m.origin, m.specificity, m.source_order));
    log::trace!(target: "tern::cascade", "{} matching rule(s)", matched.len());

    // Later entries overwrite earlier ones: the last writer per origin wins.
    let mut winners: BTreeMap<(Origin, &str), Option<String>> = BTreeMap::new();
    for m in &matched {
        for declaration in m.declarations {
            let key = (m.origin, declaration.name.as_str());
            let _ = winners.insert(key, declaration.stored_value());
        }
    }

    let mut cleared = rules.origins();
    let _ = cleared.remove(&Origin::Override);
    if inline.is_some() {
        let _ = cleared.insert(Origin::Inline);
    }
    for origin in cleared {
        map.remove_all(origin);
    }

    let mut applied = BTreeSet::new();
    for ((origin, name), value) in winners {
        let _ = map.put(origin, name.to_string(), value);
        let _ = applied.insert(name.to_string());
    }
    applied.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use tern_dom::{DomTree, ElementData, NodeId};

    use super::*;
    use crate::parser::parse_stylesheet;

    fn rules(css: &str, origin: Origin) -> RuleSet {
        RuleSet::new([parse_stylesheet(css, origin)])
    }

    #[test]
    fn test_specificity_beats_source_order() {
        let mut tree = DomTree::new();
        let el = tree.append_element(
            NodeId::ROOT,
            ElementData::new("rect").with_attr("class", "a"),
        );
        let rules = rules("rect.a { fill: red } rect { fill: blue }", Origin::Author);
        let mut map = StyleableMap::new();

        let applied = compute_style(&tree, &el, &rules, &mut map);

        assert_eq!(applied, vec!["fill".to_string()]);
        assert_eq!(map.get("fill").map(String::as_str), Some("red"));
    }

    #[test]
    fn test_stale_values_are_cleared() {
        let mut tree = DomTree::new();
        let el = tree.append_element(NodeId::ROOT, ElementData::new("rect"));
        let mut map = StyleableMap::new();
        let _ = map.put(Origin::Author, "stroke".to_string(), Some("old".to_string()));
        let _ = map.put(Origin::Override, "opacity".to_string(), Some("1".to_string()));

        let _ = compute_style(&tree, &el, &rules("rect { fill: red }", Origin::Author), &mut map);

        assert_eq!(map.get("stroke"), None);
        assert!(!map.contains_key(Origin::Author, "stroke"));
        assert_eq!(map.get("opacity").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_inline_declarations_sit_above_author() {
        let mut tree = DomTree::new();
        let el = tree.append_element(NodeId::ROOT, ElementData::new("rect").with_attr("id", "r"));
        let (inline, _) = crate::parser::parse_declarations("fill: green");
        let mut map = StyleableMap::new();

        let _ = compute_style_with_inline(
            &tree,
            &el,
            &rules("#r { fill: red }", Origin::Author),
            &inline,
            &mut map,
        );

        assert_eq!(map.get("fill").map(String::as_str), Some("green"));
        assert_eq!(map.get_from(Origin::Author, "fill").map(String::as_str), Some("red"));
        assert_eq!(map.effective_origin("fill"), Some(Origin::Inline));
    }

    #[test]
    fn test_override_origin_rules_are_skipped() {
        let mut tree = DomTree::new();
        let el = tree.append_element(NodeId::ROOT, ElementData::new("circle"));
        let mut map = StyleableMap::new();
        let _ = map.put(Origin::Override, "opacity".to_string(), Some("0.5".to_string()));

        let applied =
            compute_style(&tree, &el, &rules("circle { fill: red }", Origin::Override), &mut map);

        assert!(applied.is_empty());
        assert_eq!(map.get("fill"), None);
        assert_eq!(map.get("opacity").map(String::as_str), Some("0.5"));
    }
}
