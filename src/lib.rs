//! # xmlnode
//!
//! A lightweight builder for XML element trees. Names and attributes are
//! validated as they are added, and a call that fails leaves the tree as it
//! was. Text and attribute values are escaped on output; callers never escape
//! by hand. Text may hold any string, but characters outside the XML `Char`
//! production are dropped when it is serialized. Embedded foreign fragments
//! are written out as given.
//!
//! ## Quick Start
//!
//! ```
//! use xmlnode::ElementNode;
//!
//! let mut root = ElementNode::new("root").unwrap();
//! root.add_child_with_text_and_attributes("branch", "Foo", [("word", "bond")])
//!     .unwrap();
//! assert_eq!(
//!     root.serialize(),
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?><root><branch word=\"bond\">Foo</branch></root>"
//! );
//! ```
//!
//! ## Layout
//!
//! - [`builder`]: the element/text/foreign node model and the chaining API.
//! - [`tree`]: the arena document the builder converts into.
//! - [`serial`]: document to text, with escaping and options.
//! - [`encoding`]: output transcoding.
//! - [`util::name`]: the XML `Name` grammar.
//!
//! Enable the `tracing` feature to get `tracing` events for rejected input
//! and for each conversion.

mod tracing_macros;

pub mod builder;
pub mod encoding;
pub mod error;
pub mod serial;
pub mod tree;
pub mod util;

// Re-export primary types at the crate root for convenience.
pub use builder::{ElementNode, Node};
pub use error::XmlError;
pub use tree::{Document, NodeId, NodeKind};
