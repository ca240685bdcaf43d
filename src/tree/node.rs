//! Node type definitions.
//!
//! The `NodeKind` enum represents the node types a `Document` arena can hold.
//! Each variant carries the node-type-specific payload (element name and
//! attributes, text content).

use super::Attribute;

/// The kind of an XML node and its associated data.
///
/// This enum carries the payload for each node type. Navigation links
/// (parent, children, siblings) are stored in `NodeData`, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node at the top of every `Document`.
    Document,

    /// An element node, e.g., `<div class="x">`.
    Element {
        /// The element name.
        name: String,
        /// Attributes on this element, in output order.
        attributes: Vec<Attribute>,
    },

    /// A text node containing character data (unescaped).
    Text {
        /// The text content.
        content: String,
    },

    /// A CDATA section, e.g., `<![CDATA[...]]>`.
    CData {
        /// The CDATA content (no escaping applied).
        content: String,
    },

    /// A comment node, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        content: String,
    },

    /// A processing instruction, e.g., `<?target data?>`.
    ProcessingInstruction {
        /// The PI target (e.g., `"xml-stylesheet"`).
        target: String,
        /// The PI data, if any.
        data: Option<String>,
    },
}
