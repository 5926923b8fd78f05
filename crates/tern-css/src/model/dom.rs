//! [`SelectorModel`] for the arena tree in `tern-dom`.
//!
//! Element handles are [`NodeId`]s. Text nodes are invisible to matching and
//! the document node is not an element, so top-level elements have no parent.

use std::borrow::Cow;

use tern_dom::{DomTree, NodeId};

use super::SelectorModel;

impl SelectorModel<NodeId> for DomTree {
    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.parent(*element)
            .filter(|&parent| self.as_element(parent).is_some())
    }

    fn previous_sibling(&self, element: &NodeId) -> Option<NodeId> {
        self.preceding_siblings(*element)
            .find(|&sibling| self.as_element(sibling).is_some())
    }

    fn children(&self, element: &NodeId) -> Vec<NodeId> {
        DomTree::children(self, *element)
            .iter()
            .copied()
            .filter(|&child| self.as_element(child).is_some())
            .collect()
    }

    fn type_name(&self, element: &NodeId) -> Cow<'_, str> {
        self.as_element(*element)
            .map_or(Cow::Borrowed(""), |data| Cow::Borrowed(data.tag_name.as_str()))
    }

    fn has_id(&self, element: &NodeId, id: &str) -> bool {
        self.as_element(*element)
            .and_then(|data| data.id())
            .is_some_and(|own| own == id)
    }

    fn has_style_class(&self, element: &NodeId, class: &str) -> bool {
        self.as_element(*element)
            .is_some_and(|data| data.has_class(class))
    }

    fn has_pseudo_state(&self, element: &NodeId, state: &str) -> bool {
        self.as_element(*element)
            .is_some_and(|data| data.states.contains(state))
    }

    /// A namespaced lookup reads the attribute stored as `namespace:name`.
    fn attribute(
        &self,
        element: &NodeId,
        namespace: Option<&str>,
        name: &str,
    ) -> Option<Cow<'_, str>> {
        let data = self.as_element(*element)?;
        let value = match namespace {
            None => data.attrs.get(name),
            Some(ns) => data.attrs.get(&format!("{ns}:{name}")),
        };
        value.map(|v| Cow::Borrowed(v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use tern_dom::{ElementData, NodeType};

    use super::*;

    #[test]
    fn test_top_level_element_has_no_parent() {
        let mut tree = DomTree::new();
        let root = tree.append_element(NodeId::ROOT, ElementData::new("drawing"));
        let child = tree.append_element(root, ElementData::new("rect"));

        assert_eq!(SelectorModel::parent(&tree, &root), None);
        assert_eq!(SelectorModel::parent(&tree, &child), Some(root));
    }

    #[test]
    fn test_previous_sibling_skips_text() {
        let mut tree = DomTree::new();
        let root = tree.append_element(NodeId::ROOT, ElementData::new("g"));
        let first = tree.append_element(root, ElementData::new("rect"));
        let text = tree.alloc(NodeType::Text("label".into()));
        tree.append_child(root, text);
        let second = tree.append_element(root, ElementData::new("circle"));

        assert_eq!(tree.previous_sibling(&second), Some(first));
        assert_eq!(tree.previous_sibling(&first), None);
        assert_eq!(SelectorModel::children(&tree, &root), vec![first, second]);
    }

    #[test]
    fn test_attribute_lookup() {
        let mut tree = DomTree::new();
        let el = tree.append_element(
            NodeId::ROOT,
            ElementData::new("text")
                .with_attr("lang", "en-US")
                .with_attr("xml:space", "preserve"),
        );

        assert_eq!(tree.attribute(&el, None, "lang").as_deref(), Some("en-US"));
        assert_eq!(
            tree.attribute(&el, Some("xml"), "space").as_deref(),
            Some("preserve")
        );
        assert!(tree.attribute_value_starts_with(&el, None, "lang", "en"));
        assert!(!tree.attribute_value_ends_with(&el, None, "missing", ""));
        assert_eq!(tree.type_name(&el), "text");
    }
}
