//! Error types for tree construction and serialization.
//!
//! Validation errors are raised synchronously by the builder before any
//! mutation takes place, so a node that returned an error is exactly as it
//! was before the call. Serialization errors come from the output side
//! (encoding, I/O) and are propagated unchanged.

use std::fmt;

use crate::encoding::EncodingError;

/// The error type returned by builder and serializer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// An element name failed the XML `Name` grammar (or was empty).
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// An attribute could not be added: its name failed the XML `Name`
    /// grammar, or its value contains characters XML cannot represent.
    InvalidAttribute {
        /// The attribute name as supplied.
        name: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A required argument (such as a foreign fragment) was missing or empty.
    InvalidArgument {
        /// Human-readable description of the problem.
        message: String,
    },
    /// The tree could not be converted to its output form.
    Serialization {
        /// Human-readable description of the problem.
        message: String,
    },
}

impl XmlError {
    pub(crate) fn invalid_name(name: &str) -> Self {
        Self::InvalidName {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_attribute(name: &str, reason: &'static str) -> Self {
        Self::InvalidAttribute {
            name: name.to_string(),
            reason,
        }
    }
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { name } => write!(f, "bad element name: {name:?}"),
            Self::InvalidAttribute { name, reason } => {
                write!(f, "bad element attribute {name:?}: {reason}")
            }
            Self::InvalidArgument { message } => write!(f, "invalid argument: {message}"),
            Self::Serialization { message } => write!(f, "serialization error: {message}"),
        }
    }
}

impl std::error::Error for XmlError {}

impl From<EncodingError> for XmlError {
    fn from(err: EncodingError) -> Self {
        Self::Serialization {
            message: err.message,
        }
    }
}

impl From<std::io::Error> for XmlError {
    fn from(err: std::io::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
