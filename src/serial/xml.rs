//! XML serializer.
//!
//! Serializes a `Document` tree into a well-formed XML string. The default
//! output is canonical: an XML declaration immediately followed by the
//! markup, no inserted whitespace, `<name/>` for childless elements.

use std::io::Write;

use crate::encoding;
use crate::error::XmlError;
use crate::tracing_macros::trace;
use crate::tree::{Document, NodeId, NodeKind};
use crate::util::name::is_xml_char;

/// Options controlling XML serialization output.
///
/// The default produces the canonical form.
///
/// # Examples
///
/// ```
/// use xmlnode::ElementNode;
/// use xmlnode::serial::SerializeOptions;
///
/// let mut root = ElementNode::new("root").unwrap();
/// root.add_child("child").unwrap();
/// let xml = root.serialize_with_options(&SerializeOptions::default().indent(true));
/// assert!(xml.contains("  <child/>"));
/// ```
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Whether to produce indented (pretty-printed) output.
    /// Defaults to `false`.
    pub indent: bool,
    /// The indentation string used for each level when `indent` is `true`.
    /// Defaults to two spaces.
    pub indent_str: String,
    /// Whether to emit the `<?xml ...?>` declaration. Defaults to `true`.
    pub declaration: bool,
    /// Encoding to declare and to encode byte output in, overriding the
    /// document's own `encoding`. Defaults to `None`.
    pub encoding: Option<String>,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent: false,
            indent_str: "  ".to_string(),
            declaration: true,
            encoding: None,
        }
    }
}

impl SerializeOptions {
    /// Enables or disables indented (pretty-printed) output.
    ///
    /// When enabled, child elements are placed on their own lines with
    /// indentation (two spaces per level by default). Mixed-content elements
    /// (those containing both text and element children) are not indented.
    #[must_use]
    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the indentation string used for each nesting level.
    ///
    /// Only takes effect when [`indent`](Self::indent) is enabled.
    #[must_use]
    pub fn indent_str(mut self, s: &str) -> Self {
        self.indent_str = s.to_string();
        self
    }

    /// Enables or disables the XML declaration.
    #[must_use]
    pub fn declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }

    /// Sets the output encoding (e.g. `"ISO-8859-1"`).
    #[must_use]
    pub fn encoding(mut self, encoding: &str) -> Self {
        self.encoding = Some(encoding.to_string());
        self
    }
}

/// Serializes a document to a canonical XML string.
///
/// # Examples
///
/// ```
/// use xmlnode::Document;
/// use xmlnode::serial::serialize;
///
/// let mut doc = Document::new();
/// doc.encoding = Some("UTF-8".to_string());
/// let child = doc.create_element("child");
/// doc.append_child(doc.root(), child);
/// assert_eq!(serialize(&doc), "<?xml version=\"1.0\" encoding=\"UTF-8\"?><child/>");
/// ```
#[must_use]
pub fn serialize(doc: &Document) -> String {
    serialize_with_options(doc, &SerializeOptions::default())
}

/// Serializes a document to an XML string with the given options.
#[must_use]
pub fn serialize_with_options(doc: &Document, options: &SerializeOptions) -> String {
    let mut output = String::new();
    let encoding = declared_encoding(doc, options);

    if options.declaration {
        // Always emit a version, defaulting to 1.0
        let version = doc.version.as_deref().unwrap_or("1.0");
        output.push_str("<?xml version=\"");
        output.push_str(version);
        output.push('"');
        if let Some(encoding) = encoding {
            output.push_str(" encoding=\"");
            output.push_str(encoding);
            output.push('"');
        }
        output.push_str("?>");
        if options.indent {
            output.push('\n');
        }
    }

    // Without a declared encoding the output must survive any reader, so
    // non-ASCII characters are written as character references.
    let reencode_non_ascii = encoding.is_none();

    for child in doc.children(doc.root()) {
        serialize_node(
            doc,
            child,
            &mut output,
            reencode_non_ascii,
            options,
            0,
            false,
        );
    }

    if options.indent {
        output.push('\n');
    }

    trace!(bytes = output.len(), "serialized document");
    output
}

/// Serializes a document and encodes it in its declared encoding.
///
/// The encoding is taken from `options.encoding`, then `doc.encoding`, and
/// falls back to UTF-8.
///
/// # Errors
///
/// Returns [`XmlError::Serialization`] if the encoding is unknown, cannot be
/// used for output, or cannot represent a character of the document.
pub fn serialize_to_bytes(
    doc: &Document,
    options: &SerializeOptions,
) -> Result<Vec<u8>, XmlError> {
    let text = serialize_with_options(doc, options);
    let label = declared_encoding(doc, options).unwrap_or("UTF-8");
    Ok(encoding::encode(&text, label)?)
}

/// Serializes a document into `writer`.
///
/// # Errors
///
/// Returns [`XmlError::Serialization`] for encoding failures (see
/// [`serialize_to_bytes`]) and for I/O errors reported by `writer`.
pub fn write_document<W: Write>(
    doc: &Document,
    mut writer: W,
    options: &SerializeOptions,
) -> Result<(), XmlError> {
    let bytes = serialize_to_bytes(doc, options)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

fn declared_encoding<'a>(doc: &'a Document, options: &'a SerializeOptions) -> Option<&'a str> {
    options.encoding.as_deref().or(doc.encoding.as_deref())
}

/// Returns `true` if the element contains only other elements (and optional
/// whitespace text), meaning it's safe to add indentation.
fn is_element_only(doc: &Document, id: NodeId) -> bool {
    let mut has_element_child = false;
    for child in doc.children(id) {
        match &doc.node(child).kind {
            NodeKind::Element { .. } => has_element_child = true,
            NodeKind::Text { content } => {
                if !content.trim().is_empty() {
                    return false;
                }
            }
            NodeKind::CData { .. } => return false,
            _ => {}
        }
    }
    has_element_child
}

fn push_indent(out: &mut String, options: &SerializeOptions, depth: usize) {
    for _ in 0..depth {
        out.push_str(&options.indent_str);
    }
}

fn serialize_node(
    doc: &Document,
    id: NodeId,
    out: &mut String,
    reencode_non_ascii: bool,
    options: &SerializeOptions,
    depth: usize,
    parent_is_element_only: bool,
) {
    let pretty = options.indent && parent_is_element_only;
    match &doc.node(id).kind {
        NodeKind::Element { name, attributes } => {
            if pretty {
                push_indent(out, options, depth);
            }
            out.push('<');
            out.push_str(name);

            for attr in attributes {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                write_escaped_attr(out, &attr.value, reencode_non_ascii);
                out.push('"');
            }

            if doc.first_child(id).is_none() {
                out.push_str("/>");
            } else {
                out.push('>');
                let element_only = options.indent && is_element_only(doc, id);
                if element_only {
                    out.push('\n');
                }
                for child in doc.children(id) {
                    if element_only {
                        if let NodeKind::Text { content } = &doc.node(child).kind {
                            if content.trim().is_empty() {
                                continue;
                            }
                        }
                    }
                    serialize_node(
                        doc,
                        child,
                        out,
                        reencode_non_ascii,
                        options,
                        depth + 1,
                        element_only,
                    );
                }
                if element_only {
                    push_indent(out, options, depth);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            if pretty {
                out.push('\n');
            }
        }
        NodeKind::Text { content } => {
            write_escaped_text(out, content, reencode_non_ascii);
        }
        NodeKind::CData { content } => {
            out.push_str("<![CDATA[");
            out.push_str(content);
            out.push_str("]]>");
        }
        NodeKind::Comment { content } => {
            if pretty {
                push_indent(out, options, depth);
            }
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
            if pretty {
                out.push('\n');
            }
        }
        NodeKind::ProcessingInstruction { target, data } => {
            if pretty {
                push_indent(out, options, depth);
            }
            out.push_str("<?");
            out.push_str(target);
            if let Some(d) = data {
                out.push(' ');
                out.push_str(d);
            }
            out.push_str("?>");
            if pretty {
                out.push('\n');
            }
        }
        NodeKind::Document => {
            // A nested document node contributes only its children.
            for child in doc.children(id) {
                serialize_node(
                    doc,
                    child,
                    out,
                    reencode_non_ascii,
                    options,
                    depth,
                    parent_is_element_only,
                );
            }
        }
    }
}

/// Writes a hexadecimal character reference (`&#xHH;`) for a Unicode code point.
fn write_hex_char_ref(out: &mut String, ch: char) {
    use std::fmt::Write;
    let _ = write!(out, "&#x{:X};", u32::from(ch));
}

/// Escapes text content for XML output.
///
/// - `<`, `>`, `&` are escaped with named entity references
/// - `\r` is encoded as `&#13;`
/// - `\t` and `\n` are passed through
/// - Characters outside the XML `Char` production are dropped
/// - Non-ASCII characters are passed through unless `reencode_non_ascii`
fn write_escaped_text(out: &mut String, text: &str, reencode_non_ascii: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '\t' | '\n' => out.push(ch),
            c if !is_xml_char(c) => {}
            c if reencode_non_ascii && u32::from(c) >= 0x80 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

/// Escapes attribute values for XML output.
///
/// - `<`, `>`, `&`, `"` are escaped with named entity references
/// - `\t` → `&#9;`, `\n` → `&#10;`, `\r` → `&#13;`, so they survive
///   attribute-value normalization
/// - Characters outside the XML `Char` production are dropped
/// - Non-ASCII characters are hex-encoded when `reencode_non_ascii`
fn write_escaped_attr(out: &mut String, text: &str, reencode_non_ascii: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if !is_xml_char(c) => {}
            c if reencode_non_ascii && u32::from(c) >= 0x80 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const P: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

    fn utf8_doc() -> Document {
        let mut doc = Document::new();
        doc.version = Some("1.0".to_string());
        doc.encoding = Some("UTF-8".to_string());
        doc
    }

    #[test]
    fn test_serialize_single_child() {
        let mut doc = utf8_doc();
        let child = doc.create_element("child");
        doc.append_child(doc.root(), child);
        assert_eq!(serialize(&doc), format!("{P}<child/>"));
    }

    #[test]
    fn test_serialize_without_encoding_declaration() {
        let mut doc = Document::new();
        let elem = doc.create_element("br");
        doc.append_child(doc.root(), elem);
        assert_eq!(serialize(&doc), "<?xml version=\"1.0\"?><br/>");
    }

    #[test]
    fn test_serialize_element_with_text() {
        let mut doc = utf8_doc();
        let p = doc.create_element("p");
        let text = doc.create_text("Hello");
        doc.append_child(doc.root(), p);
        doc.append_child(p, text);
        assert_eq!(serialize(&doc), format!("{P}<p>Hello</p>"));
    }

    #[test]
    fn test_serialize_attributes_in_document_order() {
        let mut doc = utf8_doc();
        let div = doc.create_element("div");
        doc.set_attribute(div, "id", "main");
        doc.set_attribute(div, "class", "big");
        doc.append_child(doc.root(), div);
        assert_eq!(serialize(&doc), format!("{P}<div id=\"main\" class=\"big\"/>"));
    }

    #[test]
    fn test_serialize_escaping() {
        let mut doc = utf8_doc();
        let p = doc.create_element("p");
        let text = doc.create_text("a < b & c > d \"q\"");
        doc.append_child(doc.root(), p);
        doc.append_child(p, text);
        assert_eq!(
            serialize(&doc),
            format!("{P}<p>a &lt; b &amp; c &gt; d \"q\"</p>")
        );
    }

    #[test]
    fn test_serialize_attr_escaping() {
        let mut doc = utf8_doc();
        let a = doc.create_element("a");
        doc.set_attribute(a, "title", "He said \"hello\" & <bye>\n");
        doc.append_child(doc.root(), a);
        assert_eq!(
            serialize(&doc),
            format!("{P}<a title=\"He said &quot;hello&quot; &amp; &lt;bye&gt;&#10;\"/>")
        );
    }

    #[test]
    fn test_serialize_non_ascii_without_encoding() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.set_attribute(p, "lang", "caf\u{e9}");
        let text = doc.create_text("caf\u{e9}");
        doc.append_child(doc.root(), p);
        doc.append_child(p, text);
        assert_eq!(
            serialize(&doc),
            "<?xml version=\"1.0\"?><p lang=\"caf&#xE9;\">caf&#xE9;</p>"
        );
    }

    #[test]
    fn test_serialize_drops_non_xml_chars() {
        let mut doc = utf8_doc();
        let p = doc.create_element("p");
        doc.set_attribute(p, "k", "x\u{1}y");
        let text = doc.create_text("a\u{0}b\u{FFFE}c\u{B}d\t\ne");
        doc.append_child(doc.root(), p);
        doc.append_child(p, text);
        assert_eq!(serialize(&doc), format!("{P}<p k=\"xy\">abcd\t\ne</p>"));
    }

    #[test]
    fn test_serialize_keeps_astral_chars() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let text = doc.create_text("\u{1F600}");
        doc.append_child(doc.root(), p);
        doc.append_child(p, text);
        assert_eq!(serialize(&doc), "<?xml version=\"1.0\"?><p>&#x1F600;</p>");
    }

    #[test]
    fn test_serialize_non_ascii_with_utf8() {
        let mut doc = utf8_doc();
        let p = doc.create_element("p");
        let text = doc.create_text("caf\u{e9}");
        doc.append_child(doc.root(), p);
        doc.append_child(p, text);
        assert_eq!(serialize(&doc), format!("{P}<p>caf\u{e9}</p>"));
    }

    #[test]
    fn test_serialize_comment_cdata_and_pi() {
        let mut doc = utf8_doc();
        let root = doc.create_element("root");
        let comment = doc.create_node(NodeKind::Comment {
            content: " a comment ".to_string(),
        });
        let cdata = doc.create_node(NodeKind::CData {
            content: "x < 1 && y > 2".to_string(),
        });
        let pi = doc.create_node(NodeKind::ProcessingInstruction {
            target: "render".to_string(),
            data: Some("fast".to_string()),
        });
        doc.append_child(doc.root(), root);
        doc.append_child(root, comment);
        doc.append_child(root, cdata);
        doc.append_child(root, pi);
        assert_eq!(
            serialize(&doc),
            format!("{P}<root><!-- a comment --><![CDATA[x < 1 && y > 2]]><?render fast?></root>")
        );
    }

    #[test]
    fn test_serialize_without_declaration() {
        let mut doc = utf8_doc();
        let root = doc.create_element("root");
        doc.append_child(doc.root(), root);
        let opts = SerializeOptions::default().declaration(false);
        assert_eq!(serialize_with_options(&doc, &opts), "<root/>");
    }

    fn nested_doc() -> Document {
        let mut doc = utf8_doc();
        let root = doc.create_element("root");
        let child = doc.create_element("child");
        let inner = doc.create_element("inner");
        let text = doc.create_text("text");
        doc.append_child(doc.root(), root);
        doc.append_child(root, child);
        doc.append_child(child, inner);
        doc.append_child(inner, text);
        doc
    }

    #[test]
    fn test_serialize_pretty_print() {
        let doc = nested_doc();
        let opts = SerializeOptions::default().indent(true);
        assert_eq!(
            serialize_with_options(&doc, &opts),
            format!("{P}\n<root>\n  <child>\n    <inner>text</inner>\n  </child>\n</root>\n")
        );
    }

    #[test]
    fn test_serialize_pretty_print_custom_indent() {
        let doc = nested_doc();
        let opts = SerializeOptions::default().indent(true).indent_str("\t");
        let xml = serialize_with_options(&doc, &opts);
        assert!(xml.contains("\t<child>\n\t\t<inner>"));
    }

    #[test]
    fn test_serialize_pretty_print_mixed_content() {
        let mut doc = utf8_doc();
        let root = doc.create_element("root");
        let p = doc.create_element("p");
        let hello = doc.create_text("Hello ");
        let b = doc.create_element("b");
        let world = doc.create_text("world");
        doc.append_child(doc.root(), root);
        doc.append_child(root, p);
        doc.append_child(p, hello);
        doc.append_child(p, b);
        doc.append_child(b, world);
        let xml = serialize_with_options(&doc, &SerializeOptions::default().indent(true));
        // Mixed content children are not indented
        assert!(xml.contains("  <p>Hello <b>world</b></p>\n"));
    }

    #[test]
    fn test_serialize_no_indent_unchanged() {
        let doc = nested_doc();
        assert_eq!(
            serialize(&doc),
            serialize_with_options(&doc, &SerializeOptions::default())
        );
    }

    #[test]
    fn test_serialize_to_bytes_latin1() {
        let mut doc = utf8_doc();
        let p = doc.create_element("p");
        let text = doc.create_text("caf\u{e9}");
        doc.append_child(doc.root(), p);
        doc.append_child(p, text);
        let opts = SerializeOptions::default().encoding("ISO-8859-1");
        let bytes = serialize_to_bytes(&doc, &opts).unwrap();
        assert_eq!(
            bytes,
            b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><p>caf\xE9</p>".to_vec()
        );
    }

    #[test]
    fn test_serialize_to_bytes_unknown_encoding() {
        let doc = nested_doc();
        let opts = SerializeOptions::default().encoding("KLINGON");
        let err = serialize_to_bytes(&doc, &opts).unwrap_err();
        assert!(matches!(err, XmlError::Serialization { .. }));
    }

    #[test]
    fn test_write_document() {
        let doc = nested_doc();
        let mut buf = Vec::new();
        write_document(&doc, &mut buf, &SerializeOptions::default()).unwrap();
        assert_eq!(buf, serialize(&doc).into_bytes());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_document_propagates_io_error() {
        let doc = nested_doc();
        let err = write_document(&doc, FailingWriter, &SerializeOptions::default()).unwrap_err();
        assert_eq!(
            err,
            XmlError::Serialization {
                message: "disk full".to_string()
            }
        );
    }
}
