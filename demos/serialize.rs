//! Building and serializing a small document.
//!
//! Run with: `cargo run --example serialize`
#![allow(clippy::expect_used)]

use xmlnode::serial::SerializeOptions;
use xmlnode::{Document, ElementNode};

fn main() {
    let mut config = ElementNode::new("config").expect("valid name");
    config
        .add_attribute("version", "2.0")
        .expect("valid attribute");
    config
        .add_child_with_attributes("setting", [("name", "debug")])
        .expect("valid setting")
        .add_text("true");
    config
        .add_child_with_attributes("setting", [("name", "timeout")])
        .expect("valid setting")
        .add_text("30");
    config
        .add_child("data")
        .expect("valid name")
        .add_text_child("item", "First & foremost")
        .expect("valid item")
        .add_text_child("item", "Less <than> more")
        .expect("valid item");

    // A fragment built directly against the document tree is embedded as-is.
    let mut fragment = Document::new();
    let note = fragment.create_element("note");
    let text = fragment.create_text("hand-built");
    fragment.append_child(fragment.root(), note);
    fragment.append_child(note, text);
    config.add_foreign(fragment).expect("non-empty fragment");

    println!("=== Canonical ===");
    println!("{config}");

    println!("\n=== Indented ===");
    print!(
        "{}",
        config.serialize_with_options(&SerializeOptions::default().indent(true))
    );

    // Invalid input is rejected and the tree is left as it was.
    let before = config.serialize();
    if let Err(err) = config.add_child("bad tag") {
        println!("\nrejected: {err}");
    }
    println!("=== Unchanged after rejection: {} ===", before == config.serialize());
}
