//! Element tree for the Tern style engine.
//!
//! This crate provides an arena-based tree of elements that hosts (and the
//! engine's own tests) can style. It is deliberately small: elements carry a
//! type name, string attributes and a set of pseudo-states. Text nodes are
//! kept so that sibling traversal has something to skip over.
//!
//! # Design
//!
//! Nodes live in one vector and link to each other through [`NodeId`]
//! indices, so walking up to a parent or back to a sibling is a lookup.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

/// Index of a node in its [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// The kind of a node.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The invisible root that owns the top-level elements.
    Document,
    /// A styleable element.
    Element(ElementData),
    /// Character data. Never styled, skipped by sibling traversal.
    Text(String),
}

/// Links are kept for the parent and the previous sibling because those are
/// the directions selector matching walks.
#[derive(Debug, Clone)]
struct Node {
    node_type: NodeType,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            prev_sibling: None,
        }
    }
}

/// What a styleable element exposes to selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementData {
    /// The element's type name, compared case-sensitively by type selectors.
    pub tag_name: String,
    /// The element's attributes. `id` and `class` are interpreted specially.
    pub attrs: HashMap<String, String>,
    /// Pseudo-states currently active on the element (`hover`, `focus`, ...).
    pub states: BTreeSet<String>,
}

impl ElementData {
    /// Create an element with no attributes and no states.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute, builder style.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attrs.insert(name.into(), value.into());
        self
    }

    /// Turn on a pseudo-state, builder style.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        let _ = self.states.insert(state.into());
        self
    }

    /// The `id` attribute, if set.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// The words of the `class` attribute, in order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Whether `name` is one of the element's classes.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|class| class == name)
    }
}

/// Serializable description of an element subtree.
///
/// Hosts that keep their documents as data (JSON fixtures, the `tern` CLI)
/// deserialize an `ElementSpec` and turn it into a [`DomTree`] with
/// [`DomTree::from_spec`].
///
/// ```
/// use tern_dom::ElementSpec;
///
/// let spec: ElementSpec = serde_json::from_str(
///     r#"{ "tag": "svg", "children": [ { "tag": "rect", "attrs": { "id": "r" } } ] }"#,
/// ).unwrap();
/// assert_eq!(spec.children[0].attrs["id"], "r");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementSpec {
    /// The element's type name.
    pub tag: String,
    /// Attributes, kept sorted so loading is deterministic.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Active pseudo-states.
    #[serde(default)]
    pub states: Vec<String>,
    /// Child elements in document order.
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

/// Arena-based element tree.
///
/// The document node sits at [`NodeId::ROOT`]; everything else hangs below
/// it. Nodes are only ever added, so a [`NodeId`] stays valid for the life
/// of the tree.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
        }
    }

    /// Build a tree whose single top-level element is described by `spec`.
    ///
    /// Returns the tree and the id of the top-level element.
    #[must_use]
    pub fn from_spec(spec: &ElementSpec) -> (Self, NodeId) {
        let mut tree = Self::new();
        let top = tree.insert_spec(NodeId::ROOT, spec);
        (tree, top)
    }

    fn insert_spec(&mut self, parent: NodeId, spec: &ElementSpec) -> NodeId {
        let mut data = ElementData::new(spec.tag.clone());
        data.attrs.extend(spec.attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
        data.states.extend(spec.states.iter().cloned());

        let id = self.append_element(parent, data);
        for child in &spec.children {
            let _ = self.insert_spec(id, child);
        }
        id
    }

    /// Add a node without attaching it anywhere.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// Add an element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(data));
        self.append_child(parent, id);
        id
    }

    /// Attach the detached node `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let last = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev_sibling = last;
    }

    /// The parent of `id`. The document node for top-level elements, `None`
    /// for the document itself and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// The children of `id` in document order, text nodes included.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |node| node.children.as_slice())
    }

    /// The siblings before `id`, nearest first, text nodes included.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.nodes.get(id.0).and_then(|node| node.prev_sibling);
        std::iter::successors(first, |&sibling| self.nodes[sibling.0].prev_sibling)
    }

    /// The element data of `id`, or `None` if it is not an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.0)?.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Document | NodeType::Text(_) => None,
        }
    }

    /// Mutable element data, for hosts that flip states or attributes
    /// before restyling.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Document | NodeType::Text(_) => None,
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
