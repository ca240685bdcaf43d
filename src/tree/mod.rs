//! Arena-based XML document tree.
//!
//! This is the external representation the builder converts into before
//! text is produced. All nodes live in a contiguous `Vec<NodeData>` owned by
//! the `Document`, and are referenced by `NodeId`, a newtype over
//! `NonZeroU32`.
//!
//! Dropping the `Document` frees every node at once. Navigation links
//! (parent, first\_child, last\_child, next\_sibling, prev\_sibling) are arena
//! indices, so there are no reference cycles and no per-node allocation.
//!
//! A `Document` performs no validation of names or content. It is also the
//! type callers use to hand pre-built fragments to
//! [`ElementNode::add_foreign`](crate::ElementNode::add_foreign).

mod node;

pub use node::NodeKind;

use std::num::NonZeroU32;

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, meaning it can never be zero
/// and `Option<NodeId>` has the same size as `NodeId` (niche optimization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node, if any. The document root node has no parent.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An XML attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name.
    pub name: String,
    /// The attribute value (unescaped).
    pub value: String,
}

/// An XML document.
///
/// The `Document` owns all nodes in an arena and provides methods for
/// tree navigation and mutation. All tree operations go through
/// `&Document` (navigation) or `&mut Document` (mutation).
///
/// # Examples
///
/// ```
/// use xmlnode::Document;
/// use xmlnode::serial::serialize;
///
/// let mut doc = Document::new();
/// let child = doc.create_element("child");
/// doc.append_child(doc.root(), child);
/// assert_eq!(serialize(&doc), "<?xml version=\"1.0\"?><child/>");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document root node id (the Document node, not the root element).
    root: NodeId,
    /// XML version for the declaration (e.g., "1.0").
    pub version: Option<String>,
    /// Encoding for the declaration (e.g., "UTF-8").
    pub encoding: Option<String>,
}

impl Document {
    /// Creates a new empty document.
    ///
    /// The document contains a single root Document node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(16);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document));
        // Index 1: the document root node
        nodes.push(NodeData::new(NodeKind::Document));
        let root = NodeId::from_index(1);
        Self {
            nodes,
            root,
            version: None,
            encoding: None,
        }
    }

    /// Returns the document root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the root element of the document (the first top-level element).
    ///
    /// Returns `None` if the document has no element children.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| matches!(self.node(id).kind, NodeKind::Element { .. }))
    }

    /// Returns `true` if nothing has been appended to the document node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_child(self.root).is_none()
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a valid node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    /// Returns a mutable reference to the `NodeData` for the given node.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns the name of a node, if applicable.
    ///
    /// Elements and PIs have names; text, comments, CDATA, and document nodes
    /// return `None`.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. }
            | NodeKind::ProcessingInstruction { target: name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the text content of a text, comment, or CDATA node.
    ///
    /// Element and document nodes return `None`.
    #[must_use]
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text { content }
            | NodeKind::Comment { content }
            | NodeKind::CData { content } => Some(content),
            NodeKind::ProcessingInstruction { data, .. } => data.as_deref(),
            _ => None,
        }
    }

    /// Returns the attributes of an element node.
    ///
    /// Returns an empty slice for non-element nodes.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the value of an attribute by name on an element node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    // --- Navigation ---

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    // --- Mutation ---

    /// Allocates a new node in the arena and returns its `NodeId`.
    ///
    /// The node is detached until passed to [`append_child`](Self::append_child).
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Allocates a new element with no attributes.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create_node(NodeKind::Element {
            name: name.to_string(),
            attributes: Vec::new(),
        })
    }

    /// Allocates a new text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.create_node(NodeKind::Text {
            content: content.to_string(),
        })
    }

    /// Sets an attribute on an element node, replacing any existing value.
    ///
    /// New attributes are appended after existing ones. Non-element nodes
    /// are left untouched.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let NodeKind::Element { attributes, .. } = &mut self.node_mut(id).kind else {
            return;
        };
        if let Some(existing) = attributes.iter_mut().find(|a| a.name == name) {
            existing.value = value.to_string();
        } else {
            attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Appends a child node to the end of a parent's child list.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `child` already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent; detach it first"
        );

        self.node_mut(child).parent = Some(parent);

        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
            self.node_mut(parent).last_child = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
            self.node_mut(parent).last_child = Some(child);
        }
    }

    /// Detaches a node from its parent (but does not free it from the arena).
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };

        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }

        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }

        self.node_mut(id).parent = None;
        self.node_mut(id).prev_sibling = None;
        self.node_mut(id).next_sibling = None;
    }

    /// Deep-copies `id` and its descendants out of `source` into this arena.
    ///
    /// Returns the detached copy, ready to be appended.
    pub fn import_node(&mut self, source: &Document, id: NodeId) -> NodeId {
        let copy = self.create_node(source.node(id).kind.clone());
        for child in source.children(id) {
            let imported = self.import_node(source, child);
            self.append_child(copy, imported);
        }
        copy
    }

    /// Puts the tree into normal form.
    ///
    /// Adjacent text nodes are merged into one and empty text nodes are
    /// removed, throughout the whole document.
    pub fn normalize(&mut self) {
        self.normalize_node(self.root);
    }

    fn normalize_node(&mut self, id: NodeId) {
        let mut child = self.first_child(id);
        while let Some(current) = child {
            let is_text = matches!(self.node(current).kind, NodeKind::Text { .. });
            let is_element = matches!(self.node(current).kind, NodeKind::Element { .. });
            if is_text {
                self.merge_following_text(current);
            } else if is_element {
                self.normalize_node(current);
            }
            child = self.next_sibling(current);
            if is_text && self.node_text(current).is_some_and(str::is_empty) {
                self.detach(current);
            }
        }
    }

    fn merge_following_text(&mut self, id: NodeId) {
        while let Some(next) = self.next_sibling(id) {
            let extra = match &mut self.node_mut(next).kind {
                NodeKind::Text { content } => std::mem::take(content),
                _ => break,
            };
            self.detach(next);
            if let NodeKind::Text { content } = &mut self.node_mut(id).kind {
                content.push_str(&extra);
            }
        }
    }

    /// Returns the total number of nodes in the arena (including detached
    /// nodes, excluding the placeholder).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1 // subtract placeholder at index 0
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn text(doc: &mut Document, content: &str) -> NodeId {
        doc.create_text(content)
    }

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new();
        assert!(matches!(doc.node(doc.root()).kind, NodeKind::Document));
        assert_eq!(doc.node_count(), 1); // just the root
        assert!(doc.is_empty());
        assert_eq!(doc.root_element(), None);
    }

    #[test]
    fn test_create_and_append_element() {
        let mut doc = Document::new();
        let root = doc.root();
        let elem = doc.create_element("div");
        doc.append_child(root, elem);

        assert_eq!(doc.first_child(root), Some(elem));
        assert_eq!(doc.node(root).last_child, Some(elem));
        assert_eq!(doc.node(elem).parent, Some(root));
        assert_eq!(doc.node_name(elem), Some("div"));
        assert_eq!(doc.root_element(), Some(elem));
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_append_multiple_children() {
        let mut doc = Document::new();
        let root = doc.root();

        let a = text(&mut doc, "A");
        let b = text(&mut doc, "B");
        let c = text(&mut doc, "C");

        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(root, c);

        assert_eq!(doc.first_child(root), Some(a));
        assert_eq!(doc.node(root).last_child, Some(c));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.next_sibling(b), Some(c));
        assert_eq!(doc.next_sibling(c), None);
        assert_eq!(doc.node(c).prev_sibling, Some(b));
        assert_eq!(doc.node(b).prev_sibling, Some(a));
        assert_eq!(doc.node(a).prev_sibling, None);

        let children: Vec<NodeId> = doc.children(root).collect();
        assert_eq!(children, vec![a, b, c]);
    }

    #[test]
    fn test_set_attribute_appends_and_replaces() {
        let mut doc = Document::new();
        let elem = doc.create_element("a");
        doc.set_attribute(elem, "href", "x");
        doc.set_attribute(elem, "rel", "next");
        doc.set_attribute(elem, "href", "y");

        let names: Vec<&str> = doc.attributes(elem).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["href", "rel"]);
        assert_eq!(doc.attribute(elem, "href"), Some("y"));
        assert_eq!(doc.attribute(elem, "missing"), None);
    }

    #[test]
    fn test_set_attribute_on_text_is_ignored() {
        let mut doc = Document::new();
        let t = text(&mut doc, "hi");
        doc.set_attribute(t, "x", "1");
        assert!(doc.attributes(t).is_empty());
    }

    #[test]
    fn test_detach_middle_child() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = text(&mut doc, "A");
        let b = text(&mut doc, "B");
        let c = text(&mut doc, "C");
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(root, c);

        doc.detach(b);

        let children: Vec<NodeId> = doc.children(root).collect();
        assert_eq!(children, vec![a, c]);
        assert_eq!(doc.node(b).parent, None);
        assert_eq!(doc.node(c).prev_sibling, Some(a));
    }

    #[test]
    fn test_detach_without_parent_is_noop() {
        let mut doc = Document::new();
        let a = text(&mut doc, "A");
        doc.detach(a);
        assert_eq!(doc.node(a).parent, None);
    }

    #[test]
    fn test_node_text() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let hello = text(&mut doc, "Hello ");
        doc.append_child(doc.root(), p);
        doc.append_child(p, hello);

        assert_eq!(doc.node_text(hello), Some("Hello "));
        assert_eq!(doc.node_text(p), None);
    }

    #[test]
    fn test_import_node_deep_copies() {
        let mut source = Document::new();
        let item = source.create_element("item");
        source.set_attribute(item, "id", "7");
        let label = source.create_text("seven");
        source.append_child(source.root(), item);
        source.append_child(item, label);

        let mut doc = Document::new();
        let copy = doc.import_node(&source, item);
        doc.append_child(doc.root(), copy);

        assert_eq!(doc.node_name(copy), Some("item"));
        assert_eq!(doc.attribute(copy, "id"), Some("7"));
        let copied_label = doc.first_child(copy).unwrap();
        assert_ne!(copied_label, label);
        assert_eq!(doc.node_text(copied_label), Some("seven"));
        // The source is untouched.
        assert_eq!(source.first_child(item), Some(label));
        assert_eq!(source.node_text(label), Some("seven"));
    }

    #[test]
    fn test_normalize_merges_adjacent_text() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create_element("p");
        doc.append_child(root, p);
        for piece in ["This is ", "the text ", "I'm adding."] {
            let t = text(&mut doc, piece);
            doc.append_child(p, t);
        }

        doc.normalize();

        let children: Vec<NodeId> = doc.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node_text(children[0]), Some("This is the text I'm adding."));
    }

    #[test]
    fn test_normalize_removes_empty_text_and_recurses() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.create_element("outer");
        let inner = doc.create_element("inner");
        let empty = text(&mut doc, "");
        let a = text(&mut doc, "a");
        let b = text(&mut doc, "b");
        doc.append_child(root, outer);
        doc.append_child(outer, empty);
        doc.append_child(outer, inner);
        doc.append_child(inner, a);
        doc.append_child(inner, b);

        doc.normalize();

        let outer_children: Vec<NodeId> = doc.children(outer).collect();
        assert_eq!(outer_children, vec![inner]);
        let inner_children: Vec<NodeId> = doc.children(inner).collect();
        assert_eq!(inner_children, vec![a]);
        assert_eq!(doc.node_text(a), Some("ab"));
    }

    #[test]
    fn test_normalize_keeps_text_split_by_element() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create_element("p");
        let a = text(&mut doc, "a");
        let br = doc.create_element("br");
        let b = text(&mut doc, "b");
        doc.append_child(root, p);
        doc.append_child(p, a);
        doc.append_child(p, br);
        doc.append_child(p, b);

        doc.normalize();

        let children: Vec<NodeId> = doc.children(p).collect();
        assert_eq!(children, vec![a, br, b]);
    }

    #[test]
    fn test_node_count_after_creating_nodes() {
        let mut doc = Document::new();
        doc.create_element("a");
        text(&mut doc, "b");
        assert_eq!(doc.node_count(), 3);
    }
}
