//! The closed set of builder node variants.

use super::ElementNode;
use crate::tree::{Document, NodeId};

/// A member of a builder tree.
///
/// Every variant knows how to convert itself into the arena representation;
/// that conversion is the only operation serialization needs.
#[derive(Debug, Clone)]
pub enum Node {
    /// A nested element.
    Element(ElementNode),
    /// Literal character content.
    Text(TextNode),
    /// A pre-built fragment embedded as-is.
    Foreign(ForeignNode),
}

impl Node {
    /// Returns the element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the element mutably, if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the text, if this node is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.text()),
            _ => None,
        }
    }

    /// Converts this node and appends the result under `parent` in `doc`.
    pub(crate) fn append_to(&self, doc: &mut Document, parent: NodeId) {
        match self {
            Self::Element(element) => {
                let id = element.build(doc);
                doc.append_child(parent, id);
            }
            Self::Text(text) => {
                let id = doc.create_text(text.text());
                doc.append_child(parent, id);
            }
            Self::Foreign(foreign) => {
                let fragment = foreign.fragment();
                for child in fragment.children(fragment.root()) {
                    let id = doc.import_node(fragment, child);
                    doc.append_child(parent, id);
                }
            }
        }
    }
}

/// A leaf holding literal text. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    text: String,
}

impl TextNode {
    pub(crate) fn new(text: &str) -> Self {
        debug_assert!(!text.is_empty(), "text nodes are never empty");
        Self {
            text: text.to_string(),
        }
    }

    /// The text, exactly as it was added.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// An externally built fragment, embedded without inspection.
///
/// Every top-level node of the fragment document is copied into the output
/// verbatim when the tree is converted.
#[derive(Debug, Clone)]
pub struct ForeignNode {
    fragment: Document,
}

impl ForeignNode {
    pub(crate) fn new(fragment: Document) -> Self {
        Self { fragment }
    }

    /// The wrapped fragment.
    #[must_use]
    pub fn fragment(&self) -> &Document {
        &self.fragment
    }
}
