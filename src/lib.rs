//! # cfgtext
//!
//! Reader, writer and document model for a small hierarchical configuration format that
//! people edit by hand.
//!
//! ## The Format
//!
//! ```text
//! # Comments run to the end of the line and belong to the entry below them.
//! Name=Alice
//! Tags=[red, green, "blue,purple"]
//! Server {
//!     Port=8080
//!     'Display Name'=`Main "primary" server`
//! }
//! ```
//!
//! - **Strings**: `key=value`, the value running to the end of the line
//! - **Arrays**: `key=[a, b, c]` or `key[a, b, c]`, values separated by commas
//! - **Sections**: `key { ... }`, nesting to any depth
//! - **Quotes**: `"`, `'` or `` ` `` around a key or value keep its whitespace and
//!   special characters; there are no escape sequences
//!
//! ## Key Features
//!
//! - **Round-trip**: a document keeps the order of its entries and their comments, so
//!   loading and saving reproduces the file's content
//! - **Validating writer**: the [`Writer`] refuses any call that would produce text the
//!   [`Reader`] cannot read back
//! - **Path lookups**: `doc.get("Server:Port")` walks nested sections; lookups that do not
//!   fail return [`Element::Invalid`] instead of panicking
//! - **Flattening**: [`Document::leaves`] yields every value with its full path
//! - **No global state**: all options are passed in with [`LoadOptions`] and
//!   [`Formatting`]
//!
//! ## Quick Start
//!
//! ```rust
//! use cfgtext::{from_str, to_string};
//!
//! let text = "Name=Alice\nTags=[red, green, \"blue,purple\"]\nServer {\n\tPort=8080\n}\n";
//! let doc = from_str(text).unwrap();
//!
//! assert_eq!(doc.root()["Name"], "Alice");
//! assert_eq!(doc.root().find("Server:Port").unwrap(), "8080");
//! assert_eq!(doc["Tags"]["2"], "blue,purple");
//!
//! let saved = to_string(&doc).unwrap();
//! assert_eq!(from_str(&saved).unwrap(), doc);
//! ```
//!
//! ### Building Documents
//!
//! ```rust
//! use cfgtext::{config, to_string_with_formatting, Formatting};
//!
//! let doc = config!({
//!     "Name": "Alice",
//!     "Server": { "Port": "8080" }
//! })
//! .unwrap();
//!
//! let text = to_string_with_formatting(&doc, &Formatting::compact()).unwrap();
//! assert_eq!(text, "Name=Alice\nServer {\n\tPort=8080\n}\n");
//! ```
//!
//! ### Token-Level Access
//!
//! ```rust
//! use cfgtext::{Reader, TokenKind};
//!
//! let kinds: Vec<TokenKind> = Reader::new("a=1\n")
//!     .map(|token| token.map(|t| t.kind))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(kinds, vec![TokenKind::Key, TokenKind::Value, TokenKind::Finish]);
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Tree walks (load, save, flatten) use explicit stacks, so deep nesting cannot overflow
//!   the call stack
//! - A failed load never hands out a partial document

pub mod document;
pub mod element;
pub mod error;
mod load;
pub mod macros;
pub mod map;
pub mod options;
pub mod path;
pub mod reader;
pub mod syntax;
pub mod token;
pub mod writer;

pub use document::{Document, Leaves};
pub use element::{
    ArrayElement, Element, ElementKind, ElementMut, SectionElement, StringElement,
};
pub use error::{Error, Result};
pub use map::{KeyComparer, KeyMap};
pub use options::{CommentPolicy, Formatting, LoadOptions, QuotePreference};
pub use reader::{ReadState, Reader};
pub use token::{Token, TokenKind, TokenSet};
pub use writer::Writer;

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Loads a document from configuration text with default [`LoadOptions`].
///
/// # Examples
///
/// ```rust
/// use cfgtext::from_str;
///
/// let doc = from_str("# greeting\nName=Alice\n").unwrap();
/// assert_eq!(doc.get("Name"), Some("Alice"));
/// assert_eq!(doc.root()["Name"].comments().unwrap(), [" greeting"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] with the line and column if the text is malformed,
/// [`Error::DuplicateKey`] if two siblings share a key, and [`Error::InvalidKey`] if a
/// key contains the path delimiter.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Document> {
    load::load(s, &LoadOptions::default())
}

/// Loads a document from configuration text with custom options.
///
/// # Examples
///
/// ```rust
/// use cfgtext::{from_str_with_options, KeyComparer, LoadOptions};
///
/// let options = LoadOptions::new().with_comparer(KeyComparer::IgnoreCase);
/// let doc = from_str_with_options("Port=80\n", &options).unwrap();
/// assert_eq!(doc.get("PORT"), Some("80"));
/// ```
///
/// # Errors
///
/// Same as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(s: &str, options: &LoadOptions) -> Result<Document> {
    load::load(s, options)
}

/// Loads a document from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, or anything [`from_str`] returns.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Document> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Loads a document from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use cfgtext::from_reader;
/// use std::io::Cursor;
///
/// let doc = from_reader(Cursor::new(b"Port=8080\n")).unwrap();
/// assert_eq!(doc.get("Port"), Some("8080"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, or anything [`from_str`] returns.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Document>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Loads the file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or anything [`from_str`] returns.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load_file<P>(path: P, options: &LoadOptions) -> Result<Document>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| Error::io(&format!("{}: {e}", path.display())))?;
    log::debug!("loading {}", path.display());
    from_str_with_options(&text, options)
}

/// Saves a document as text with the default [`Formatting`].
///
/// # Errors
///
/// Returns [`Error::Unquotable`] if a key or value contains all three quote characters.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(doc: &Document) -> Result<String> {
    to_string_with_formatting(doc, &Formatting::default())
}

/// Saves a document as text with custom formatting.
///
/// Only the children of the root are written; the root itself has no key or comments of
/// its own.
///
/// # Examples
///
/// ```rust
/// use cfgtext::{from_str, to_string_with_formatting, Formatting};
///
/// let doc = from_str("a{\nb=1\n}\n").unwrap();
/// let formatting = Formatting::compact()
///     .with_indentation("  ")
///     .with_section_brace_same_line(false);
///
/// let text = to_string_with_formatting(&doc, &formatting).unwrap();
/// assert_eq!(text, "a\n{\n  b=1\n}\n");
/// ```
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_formatting(doc: &Document, formatting: &Formatting) -> Result<String> {
    let mut writer = Writer::with_formatting(formatting.clone());
    write_document(&mut writer, doc)?;
    let text = writer.into_inner();
    log::debug!(
        "saved {} top-level elements as {} bytes",
        doc.root().len(),
        text.len()
    );
    Ok(text)
}

/// Saves a document to an I/O stream with the default [`Formatting`].
///
/// Text is written to the stream entry by entry, and the stream is flushed at the end.
/// Pass `&mut stream` to keep using the stream afterwards.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails, or anything [`to_string`] returns. The stream
/// may already hold the entries before the failing one.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, doc: &Document) -> Result<()>
where
    W: io::Write,
{
    let mut output = writer::IoOutput::new(writer);
    let written = write_document(
        &mut Writer::with_output(&mut output, Formatting::default()),
        doc,
    );
    output.finish(written)
}

fn write_document<W: fmt::Write>(writer: &mut Writer<W>, doc: &Document) -> Result<()> {
    writer.write_section(doc.root())?;
    writer.finished()
}

/// Saves a document to the file at `path`, replacing its contents.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written, or anything
/// [`to_string_with_formatting`] returns. Nothing is written if formatting fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn save_file<P>(path: P, doc: &Document, formatting: &Formatting) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = to_string_with_formatting(doc, formatting)?;
    fs::write(path, text).map_err(|e| Error::io(&format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "Name=Alice\nTags=[red, green, \"blue,purple\"]\nServer {\n  Port=8080\n}\n";

    #[test]
    fn test_load_scenario() {
        let doc = from_str(SCENARIO).unwrap();
        let root = doc.root();

        assert_eq!(root.len(), 3);
        assert_eq!(root["Name"], "Alice");
        let tags = root["Tags"].as_array().unwrap();
        assert_eq!(tags.values().collect::<Vec<_>>(), vec!["red", "green", "blue,purple"]);
        assert_eq!(tags["2"], "blue,purple");
        assert_eq!(root.find("Server:Port").unwrap(), "8080");
    }

    #[test]
    fn test_save_then_load() {
        let doc = from_str(SCENARIO).unwrap();
        let text = to_string(&doc).unwrap();
        assert_eq!(from_str(&text).unwrap(), doc);
    }

    #[test]
    fn test_default_formatting_output() {
        let doc = from_str(SCENARIO).unwrap();
        assert_eq!(
            to_string(&doc).unwrap(),
            "Name=Alice\n\nTags=[red, green, \"blue,purple\"]\n\nServer {\n\tPort=8080\n}\n"
        );
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        assert!(from_slice(&[b'a', b'=', 0xff, b'\n']).is_err());
        assert_eq!(from_slice(b"a=1\n").unwrap().get("a"), Some("1"));
    }

    #[test]
    fn test_to_writer() {
        let doc = from_str("a=1\n").unwrap();
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &doc).unwrap();
        assert_eq!(buffer, b"a=1\n");
    }

    #[test]
    fn test_to_writer_reports_stream_errors() {
        struct Full;

        impl io::Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let doc = from_str("a=1\n").unwrap();
        let err = to_writer(Full, &doc).unwrap_err();
        assert!(matches!(err, Error::Io(ref m) if m.contains("disk full")));
    }

    #[test]
    fn test_empty_document() {
        let doc = from_str("").unwrap();
        assert!(doc.root().is_empty());
        assert_eq!(to_string(&doc).unwrap(), "");
    }

    #[test]
    fn test_unbalanced_sections() {
        assert!(matches!(from_str("a {\n"), Err(Error::Format { .. })));
        assert!(matches!(from_str("}\n"), Err(Error::Format { .. })));
    }
}
