//! Output encoding.
//!
//! Serialized XML is produced as a UTF-8 `String`. When a document declares a
//! different encoding, the text is transcoded through `encoding_rs` before it
//! leaves the crate.
//!
//! # Encoding Strategy
//!
//! 1. UTF-8 labels are passed through without copying.
//! 2. Other labels are looked up with `encoding_rs::Encoding::for_label`.
//! 3. Encodings that `encoding_rs` cannot produce as output (UTF-16, the
//!    replacement encoding) are rejected rather than silently written as UTF-8.
//! 4. Characters the target encoding cannot represent are an error. Character
//!    references are not substituted because they are illegal inside names.
//!
//! WHATWG maps the ASCII and ISO-8859-1 labels (and ISO-8859-9, TIS-620) onto
//! the windows-125x supersets. Output written under those labels keeps to
//! the labelled character set: ASCII labels accept only ASCII, ISO-8859-1 is
//! encoded byte-for-byte from U+0000..U+00FF, and the other ISO labels reject
//! characters that the superset places in the C1 range 0x80..0x9F.

use std::fmt;

/// An error that occurs while encoding serialized output.
#[derive(Debug, Clone)]
pub struct EncodingError {
    /// A human-readable description of the encoding error.
    pub message: String,
}

impl EncodingError {
    /// Creates a new `EncodingError` with the given message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encoding error: {}", self.message)
    }
}

impl std::error::Error for EncodingError {}

/// Encodes a UTF-8 string into the named character encoding.
///
/// # Errors
///
/// Returns `EncodingError` if the encoding name is not recognized, if the
/// encoding cannot be used for output, or if `text` contains a character
/// the encoding cannot represent.
///
/// # Examples
///
/// ```
/// use xmlnode::encoding::encode;
///
/// assert_eq!(encode("caf\u{e9}", "ISO-8859-1").unwrap(), b"caf\xE9");
/// assert!(encode("hello", "UNKNOWN-ENCODING-42").is_err());
/// ```
pub fn encode(text: &str, encoding_name: &str) -> Result<Vec<u8>, EncodingError> {
    if is_utf8_label(encoding_name) {
        return Ok(text.as_bytes().to_vec());
    }

    let label = encoding_name.trim().to_ascii_lowercase();
    if ASCII_LABELS.contains(&label.as_str()) {
        return encode_ascii(text, encoding_name);
    }
    if LATIN1_LABELS.contains(&label.as_str()) {
        return encode_latin1(text, encoding_name);
    }

    let encoding = encoding_rs::Encoding::for_label(encoding_name.as_bytes())
        .ok_or_else(|| EncodingError::new(format!("unsupported encoding: {encoding_name}")))?;

    if encoding.output_encoding() != encoding {
        return Err(EncodingError::new(format!(
            "cannot write output in encoding {encoding_name}"
        )));
    }

    let (bytes, _used_encoding, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(not_representable(encoding_name));
    }

    // An ISO label resolved to its windows superset: every character is one
    // byte, and 0x80..0x9F must only come from the matching C1 control.
    if encoding.name().starts_with("windows-") && !is_windows_label(&label) {
        let borrowed_c1 = text.chars().zip(bytes.iter()).any(|(ch, &byte)| {
            (0x80..=0x9F).contains(&byte) && u32::from(ch) != u32::from(byte)
        });
        if borrowed_c1 {
            return Err(not_representable(encoding_name));
        }
    }
    Ok(bytes.into_owned())
}

/// Labels WHATWG resolves to windows-1252 that mean US-ASCII.
const ASCII_LABELS: &[&str] = &["us-ascii", "ascii", "ansi_x3.4-1968"];

/// Labels WHATWG resolves to windows-1252 that mean ISO-8859-1.
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso88591",
    "iso_8859-1",
    "iso_8859-1:1987",
    "iso-ir-100",
    "latin1",
    "l1",
    "cp819",
    "ibm819",
    "csisolatin1",
];

fn is_windows_label(label: &str) -> bool {
    ["windows-", "cp", "x-cp", "dos-"]
        .iter()
        .any(|prefix| label.starts_with(prefix))
}

fn encode_ascii(text: &str, encoding_name: &str) -> Result<Vec<u8>, EncodingError> {
    if !text.is_ascii() {
        return Err(not_representable(encoding_name));
    }
    Ok(text.as_bytes().to_vec())
}

fn encode_latin1(text: &str, encoding_name: &str) -> Result<Vec<u8>, EncodingError> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).map_err(|_| not_representable(encoding_name)))
        .collect()
}

fn not_representable(encoding_name: &str) -> EncodingError {
    EncodingError::new(format!(
        "text contains characters not representable in {encoding_name}"
    ))
}

/// Returns `true` if the label is a recognized alias for UTF-8.
pub(crate) fn is_utf8_label(label: &str) -> bool {
    label.eq_ignore_ascii_case("UTF-8") || label.eq_ignore_ascii_case("UTF8")
}
