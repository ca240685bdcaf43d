//! Fluent, validating construction of XML element trees.
//!
//! An [`ElementNode`] owns its attributes and an ordered list of [`Node`]
//! children. Trees are built top-down through chained calls and converted
//! into a [`Document`](crate::Document) only when they are serialized.

mod element;
mod node;

pub use element::ElementNode;
pub use node::{ForeignNode, Node, TextNode};
