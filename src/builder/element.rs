//! Validating element builder.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use super::node::{ForeignNode, Node, TextNode};
use crate::error::XmlError;
use crate::serial::{self, SerializeOptions};
use crate::tracing_macros::{debug, trace};
use crate::tree::{Document, NodeId};
use crate::util::name::{is_valid_name, is_xml_char};

/// A named XML element with sorted attributes and ordered children.
///
/// Every name and attribute is validated as it is added, and a call that
/// fails leaves the element exactly as it was. Mutating methods return a
/// node for chaining: attribute and text methods return `self`, while the
/// `add_child*` family returns the new child so nested structure can be
/// built in one expression.
///
/// Attributes are kept in a `BTreeMap`, so they serialize in key order
/// regardless of the order they were added.
///
/// An `ElementNode` is plain owned data. Mutation needs `&mut`, so sharing
/// one across threads for writing requires the caller's own locking.
///
/// # Examples
///
/// ```
/// use xmlnode::ElementNode;
///
/// let mut root = ElementNode::new("root").unwrap();
/// root.add_attribute("zoop", "zing").unwrap();
/// root.add_child("branch").unwrap().add_child("leaf").unwrap().add_text("green");
/// root.add_text_child("a", "x").unwrap().add_text_child("b", "y").unwrap();
///
/// assert_eq!(
///     root.serialize(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
///      <root zoop=\"zing\"><branch><leaf>green</leaf></branch><a>x</a><b>y</b></root>"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ElementNode {
    name: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
}

impl ElementNode {
    /// Creates an element with no attributes and no children.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::InvalidName`] if `name` is not a valid XML name.
    pub fn new(name: &str) -> Result<Self, XmlError> {
        if !is_valid_name(name) {
            debug!(name, "rejected element name");
            return Err(XmlError::invalid_name(name));
        }
        Ok(Self {
            name: name.to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        })
    }

    /// Creates an element carrying the given attributes.
    ///
    /// Every entry goes through the same rule as
    /// [`add_attribute`](Self::add_attribute). Later duplicates win.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::InvalidName`] for a bad element name and
    /// [`XmlError::InvalidAttribute`] for a bad entry.
    pub fn with_attributes<I, K, V>(name: &str, attributes: I) -> Result<Self, XmlError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut element = Self::new(name)?;
        element.attributes = collect_attributes(attributes)?;
        Ok(element)
    }

    /// The element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attributes, in key order.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Looks up a single attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The children, in the order they were added.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Sets an attribute, replacing any previous value. Returns `self`.
    ///
    /// Empty values are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::InvalidAttribute`] if `name` is not a valid XML
    /// name or `value` contains a character outside the XML `Char` range.
    pub fn add_attribute(&mut self, name: &str, value: &str) -> Result<&mut Self, XmlError> {
        validate_attribute(name, value)?;
        self.attributes.insert(name.to_string(), value.to_string());
        Ok(self)
    }

    /// Appends a text node. Returns `self`.
    ///
    /// `None` and the empty string are ignored. Text is stored verbatim and
    /// escaped only when serialized; characters XML cannot carry are dropped
    /// from the output.
    pub fn add_text<'a>(&mut self, text: impl Into<Option<&'a str>>) -> &mut Self {
        if let Some(text) = text.into().filter(|t| !t.is_empty()) {
            self.children.push(Node::Text(TextNode::new(text)));
        }
        self
    }

    /// Appends an empty child element and returns the **child**.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::InvalidName`] if `name` is not a valid XML name.
    pub fn add_child(&mut self, name: &str) -> Result<&mut ElementNode, XmlError> {
        let child = Self::new(name)?;
        self.push_child(child)
    }

    /// Appends a child element with attributes and returns the **child**.
    ///
    /// # Errors
    ///
    /// As for [`with_attributes`](Self::with_attributes).
    pub fn add_child_with_attributes<I, K, V>(
        &mut self,
        name: &str,
        attributes: I,
    ) -> Result<&mut ElementNode, XmlError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let child = Self::with_attributes(name, attributes)?;
        self.push_child(child)
    }

    /// Appends a child element containing `text` and returns the **child**.
    ///
    /// Empty or `None` text yields an empty child.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::InvalidName`] if `name` is not a valid XML name.
    pub fn add_child_with_text<'a>(
        &mut self,
        name: &str,
        text: impl Into<Option<&'a str>>,
    ) -> Result<&mut ElementNode, XmlError> {
        let mut child = Self::new(name)?;
        child.add_text(text);
        self.push_child(child)
    }

    /// Appends a child element with attributes and text, and returns the
    /// **child**.
    ///
    /// # Errors
    ///
    /// As for [`with_attributes`](Self::with_attributes).
    pub fn add_child_with_text_and_attributes<'a, I, K, V>(
        &mut self,
        name: &str,
        text: impl Into<Option<&'a str>>,
        attributes: I,
    ) -> Result<&mut ElementNode, XmlError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut child = Self::with_attributes(name, attributes)?;
        child.add_text(text);
        self.push_child(child)
    }

    /// Appends a child element containing `text` and returns `self`, so
    /// siblings can be chained.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::InvalidName`] if `name` is not a valid XML name.
    pub fn add_text_child<'a>(
        &mut self,
        name: &str,
        text: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, XmlError> {
        self.add_child_with_text(name, text)?;
        Ok(self)
    }

    /// Embeds a pre-built fragment. Returns `self`.
    ///
    /// The fragment's top-level nodes are copied into the output unchanged;
    /// nothing inside it is validated.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::InvalidArgument`] if `fragment` has no content.
    pub fn add_foreign(&mut self, fragment: Document) -> Result<&mut Self, XmlError> {
        if fragment.is_empty() {
            debug!(element = %self.name, "rejected empty foreign fragment");
            return Err(XmlError::InvalidArgument {
                message: "empty foreign fragment".to_string(),
            });
        }
        self.children.push(Node::Foreign(ForeignNode::new(fragment)));
        Ok(self)
    }

    /// Converts this element into a standalone document.
    ///
    /// The document declares version 1.0 and UTF-8, holds this element as
    /// its only child, and is normalized (adjacent text merged).
    #[must_use]
    pub fn to_tree(&self) -> Document {
        let mut doc = Document::new();
        doc.version = Some("1.0".to_string());
        doc.encoding = Some("UTF-8".to_string());
        let root = self.build(&mut doc);
        doc.append_child(doc.root(), root);
        doc.normalize();
        trace!(element = %self.name, nodes = doc.node_count(), "converted element tree");
        doc
    }

    /// Serializes this element to its canonical XML text.
    #[must_use]
    pub fn serialize(&self) -> String {
        serial::serialize(&self.to_tree())
    }

    /// Serializes this element with the given options.
    #[must_use]
    pub fn serialize_with_options(&self, options: &SerializeOptions) -> String {
        serial::serialize_with_options(&self.to_tree(), options)
    }

    /// Serializes this element into bytes of the declared encoding.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Serialization`] if the output encoding is unknown
    /// or cannot represent the content.
    pub fn to_bytes(&self, options: &SerializeOptions) -> Result<Vec<u8>, XmlError> {
        serial::serialize_to_bytes(&self.to_tree(), options)
    }

    /// Serializes this element into `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Serialization`] for encoding and I/O failures.
    pub fn write_to<W: Write>(
        &self,
        writer: W,
        options: &SerializeOptions,
    ) -> Result<(), XmlError> {
        serial::write_document(&self.to_tree(), writer, options)
    }

    /// Creates this element and its subtree in `doc`, returning the detached
    /// element id.
    pub(crate) fn build(&self, doc: &mut Document) -> NodeId {
        let id = doc.create_element(&self.name);
        for (name, value) in &self.attributes {
            doc.set_attribute(id, name, value);
        }
        for child in &self.children {
            child.append_to(doc, id);
        }
        id
    }

    fn push_child(&mut self, child: ElementNode) -> Result<&mut ElementNode, XmlError> {
        self.children.push(Node::Element(child));
        self.children
            .last_mut()
            .and_then(Node::as_element_mut)
            .ok_or_else(|| XmlError::InvalidArgument {
                message: "last child is not an element".to_string(),
            })
    }
}

impl fmt::Display for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn validate_attribute(name: &str, value: &str) -> Result<(), XmlError> {
    if !is_valid_name(name) {
        debug!(name, "rejected attribute name");
        return Err(XmlError::invalid_attribute(name, "invalid name"));
    }
    if !value.chars().all(is_xml_char) {
        debug!(name, "rejected attribute value");
        return Err(XmlError::invalid_attribute(
            name,
            "value contains characters not allowed in XML",
        ));
    }
    Ok(())
}

/// Validates every entry before returning, so a bad entry leaves nothing
/// half-applied.
fn collect_attributes<I, K, V>(attributes: I) -> Result<BTreeMap<String, String>, XmlError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut map = BTreeMap::new();
    for (name, value) in attributes {
        let (name, value) = (name.as_ref(), value.as_ref());
        validate_attribute(name, value)?;
        map.insert(name.to_string(), value.to_string());
    }
    Ok(map)
}
