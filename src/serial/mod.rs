//! XML serialization.
//!
//! This module serializes a `Document` tree to XML text. The serializer
//! handles escaping, the XML declaration, optional indentation, and encoding
//! the result into the declared character set.

pub mod xml;

pub use xml::{
    serialize, serialize_to_bytes, serialize_with_options, write_document, SerializeOptions,
};
