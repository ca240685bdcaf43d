//! Utility modules for xmlnode.
//!
//! Contains the XML `Name` grammar shared by every validating call.

pub mod name;
