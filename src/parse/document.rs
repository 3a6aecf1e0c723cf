//! Arena tree produced by the tolerant parser.

use super::tag_matches;
use std::collections::HashMap;

pub type NodeId = usize;

/// Index of the synthetic node that owns all top-level elements.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) text: String,
}

/// Element tree for one blueprint document.
///
/// Nodes live in a flat arena and refer to each other by index; the tree is
/// built once per analysis and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct BlueprintDocument {
    pub(crate) nodes: Vec<Element>,
    pub(crate) ids: HashMap<String, NodeId>,
    pub(crate) repairs: usize,
}

impl BlueprintDocument {
    pub(crate) fn from_parts(nodes: Vec<Element>, repairs: usize) -> Self {
        let mut ids = HashMap::new();
        for (idx, node) in nodes.iter().enumerate() {
            if let Some((_, value)) = node.attributes.iter().find(|(k, _)| k == "id") {
                ids.entry(value.clone()).or_insert(idx);
            }
        }
        Self { nodes, ids, repairs }
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    /// The outermost element, if the document has any element at all.
    pub fn root_element(&self) -> Option<NodeRef<'_>> {
        self.nodes[ROOT].children.first().map(|&id| self.node(id))
    }

    /// All elements matching `tag`, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<NodeRef<'_>> {
        self.node(ROOT).find_all(tag)
    }

    pub fn find_all_with_attr(&self, tag: &str, attr: &str, value: &str) -> Vec<NodeRef<'_>> {
        self.find_all(tag).into_iter().filter(|n| n.attr(attr) == Some(value)).collect()
    }

    /// First element carrying `id="<id>"`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeRef<'_>> {
        self.ids.get(id).map(|&idx| self.node(idx))
    }

    /// Number of elements, excluding the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many malformed constructs the parser had to skip or close implicitly.
    pub fn repairs(&self) -> usize {
        self.repairs
    }
}

#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a BlueprintDocument,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn element(&self) -> &'a Element {
        &self.doc.nodes[self.id]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.element().name
    }

    pub fn local_name(&self) -> &'a str {
        super::local_name(self.name())
    }

    pub fn is(&self, tag: &str) -> bool {
        tag_matches(self.name(), tag)
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.element().attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Attribute value, treating blank values as absent.
    pub fn non_empty_attr(&self, key: &str) -> Option<&'a str> {
        self.attr(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn attributes(&self) -> &'a [(String, String)] {
        &self.element().attributes
    }

    /// Direct text content, trimmed.
    pub fn text(&self) -> &'a str {
        self.element().text.trim()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        match self.element().parent {
            Some(ROOT) | None => None,
            Some(id) => Some(self.doc.node(id)),
        }
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        self.element().children.iter().map(move |&id| doc.node(id))
    }

    pub fn first_child(&self, tag: &str) -> Option<NodeRef<'a>> {
        self.children().find(|c| c.is(tag))
    }

    /// Descendants matching `tag`, in document order (pre-order).
    pub fn find_all(&self, tag: &str) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.element().children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.doc.node(id);
            if node.is(tag) {
                out.push(node);
            }
            stack.extend(node.element().children.iter().rev().copied());
        }
        out
    }

    /// Nearest ancestor matching `tag`.
    pub fn ancestor(&self, tag: &str) -> Option<NodeRef<'a>> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.is(tag) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef").field("id", &self.id).field("name", &self.name()).finish()
    }
}
