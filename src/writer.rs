//! Validating writer for configuration text.
//!
//! This module provides the [`Writer`], the mirror image of the
//! [`Reader`](crate::Reader): one method per token kind, each checked against the set
//! of tokens that are currently legal, so only text the reader accepts can be produced.
//!
//! ## Overview
//!
//! - **Legality**: calling a method whose token is not legal fails with
//!   [`Error::IllegalWrite`], naming what was attempted and what would have been legal
//! - **Quoting**: keys and values are quoted only when the reader could not read them
//!   back unquoted, using the first quote character the text does not contain
//! - **Layout**: indentation, brace placement, `=` before arrays and blank lines are
//!   taken from [`Formatting`]
//!
//! ## Output
//!
//! Text goes to any [`fmt::Write`] output as each token is written. [`Writer::new`]
//! collects it in a `String`; [`Writer::with_output`] takes any other output, by value
//! to hand it over or by `&mut` to keep it.
//!
//! ## Usage
//!
//! ```rust
//! use cfgtext::{Formatting, Writer};
//!
//! let mut writer = Writer::with_formatting(Formatting::compact().with_indentation("  "));
//! writer.write_comment(" connection").unwrap();
//! writer.write_key("Server").unwrap();
//! writer.write_start_section().unwrap();
//! writer.write_key("Port").unwrap();
//! writer.write_value("8080").unwrap();
//! writer.write_key("Hosts").unwrap();
//! writer.write_start_array().unwrap();
//! writer.write_value("a").unwrap();
//! writer.write_value("b, c").unwrap();
//! writer.write_end_array().unwrap();
//! writer.write_end_section().unwrap();
//! writer.finished().unwrap();
//!
//! assert_eq!(
//!     writer.into_inner(),
//!     "# connection\nServer {\n  Port=8080\n  Hosts=[a, \"b, c\"]\n}\n"
//! );
//! ```

use crate::element::{Element, ElementKind, SectionElement};
use crate::options::Formatting;
use crate::syntax::{self, is_quote};
use crate::token::{TokenKind, TokenSet};
use crate::{Error, Result};
use std::fmt;
use std::io;

/// Where a string is written, which decides what forces it to be quoted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Key,
    Value,
    ArrayValue,
}

/// Writes configuration text to an output.
///
/// Created with [`Writer::new`] or [`Writer::with_formatting`] to write into a `String`,
/// or with [`Writer::with_output`]. The output is taken back with
/// [`into_inner`](Writer::into_inner).
pub struct Writer<W = String> {
    output: W,
    // Text of the token being written, passed on once the write succeeds.
    buffer: String,
    formatting: Formatting,
    indentation: String,
    previous: Option<TokenKind>,
    valid: TokenSet,
    section_level: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self::with_formatting(Formatting::default())
    }

    pub fn with_formatting(formatting: Formatting) -> Self {
        Self::with_output(String::with_capacity(256), formatting)
    }

    /// The text written so far.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.output
    }
}

impl<W: fmt::Write> Writer<W> {
    /// Creates a writer that sends its text to `output`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgtext::{Formatting, Writer};
    ///
    /// let mut text = String::from("# generated\n");
    /// let mut writer = Writer::with_output(&mut text, Formatting::compact());
    /// writer.write_key("Port").unwrap();
    /// writer.write_value("8080").unwrap();
    /// writer.finished().unwrap();
    ///
    /// assert_eq!(text, "# generated\nPort=8080\n");
    /// ```
    pub fn with_output(output: W, formatting: Formatting) -> Self {
        Writer {
            output,
            buffer: String::new(),
            formatting,
            indentation: String::new(),
            previous: None,
            valid: TokenSet::KEY | TokenSet::COMMENT | TokenSet::FINISH,
            section_level: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn formatting(&self) -> &Formatting {
        &self.formatting
    }

    /// The tokens that may be written next.
    #[inline]
    #[must_use]
    pub fn valid_writes(&self) -> TokenSet {
        self.valid
    }

    #[inline]
    #[must_use]
    pub fn can_write(&self, kind: TokenKind) -> bool {
        self.valid.contains(kind)
    }

    #[inline]
    #[must_use]
    pub fn section_level(&self) -> usize {
        self.section_level
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    /// Writes a line break. Legal at any time; it does not change what may follow.
    ///
    /// # Errors
    ///
    /// Fails if the output does not accept the text.
    pub fn write_line(&mut self) -> Result<()> {
        self.buffer.push('\n');
        self.flush()
    }

    /// # Errors
    ///
    /// Fails if a key is not legal here or `key` cannot be quoted.
    pub fn write_key(&mut self, key: &str) -> Result<()> {
        self.check(TokenKind::Key)?;
        let quote = self.quote_for(key, Slot::Key)?;
        self.blank_line_if_needed(TokenKind::Key);
        self.buffer.push_str(&self.indentation);
        self.push_quoted(key, quote);
        self.valid = TokenSet::START_ARRAY | TokenSet::START_SECTION | TokenSet::VALUE;
        self.previous = Some(TokenKind::Key);
        self.flush()
    }

    /// Writes a value after a key, or the next value inside an open array.
    ///
    /// # Errors
    ///
    /// Fails if neither a value nor an array value is legal here, or `value` cannot be
    /// quoted.
    pub fn write_value(&mut self, value: &str) -> Result<()> {
        if self.can_write(TokenKind::Value) {
            let quote = self.quote_for(value, Slot::Value)?;
            self.buffer.push(syntax::VALUE_START);
            if self.blank_line_if_needed(TokenKind::Value) {
                self.push_inner_indentation();
            }
            self.push_quoted(value, quote);
            self.buffer.push('\n');
            self.valid = self.after_entry();
            self.previous = Some(TokenKind::Value);
            self.flush()
        } else if self.can_write(TokenKind::ArrayValue) {
            let quote = self.quote_for(value, Slot::ArrayValue)?;
            let follows_value = self.previous == Some(TokenKind::ArrayValue);
            if follows_value {
                self.buffer.push(syntax::ARRAY_ELEMENT_DELIMITER);
            }
            if self.blank_line_if_needed(TokenKind::ArrayValue) {
                self.push_inner_indentation();
            } else if follows_value {
                self.buffer.push(' ');
            }
            self.push_quoted(value, quote);
            self.valid = TokenSet::ARRAY_VALUE | TokenSet::END_ARRAY;
            self.previous = Some(TokenKind::ArrayValue);
            self.flush()
        } else {
            Err(Error::illegal_write(TokenKind::Value, self.valid))
        }
    }

    /// Writes a comment, one `#` line per line of `text`.
    ///
    /// `\n`, `\r\n` and a lone `\r` all end a line. Text ending in a line break gets an
    /// empty `#` line after it.
    ///
    /// # Errors
    ///
    /// Fails if a comment is not legal here.
    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        self.check(TokenKind::Comment)?;
        self.blank_line_if_needed(TokenKind::Comment);
        let mut rest = text;
        loop {
            let Some(at) = rest.find(&syntax::END_OF_LINE[..]) else {
                self.push_comment_line(rest);
                break;
            };
            self.push_comment_line(&rest[..at]);
            let width = if rest[at..].starts_with("\r\n") { 2 } else { 1 };
            rest = &rest[at + width..];
        }
        self.previous = Some(TokenKind::Comment);
        self.flush()
    }

    /// # Errors
    ///
    /// Fails if a section is not legal here.
    pub fn write_start_section(&mut self) -> Result<()> {
        self.check(TokenKind::StartSection)?;
        let blank = self.blank_line_if_needed(TokenKind::StartSection);
        if blank || !self.formatting.section_brace_same_line {
            if !blank {
                self.buffer.push('\n');
            }
            self.buffer.push_str(&self.indentation);
        } else {
            self.buffer.push(' ');
        }
        self.buffer.push(syntax::SECTION_START);
        self.buffer.push('\n');

        self.section_level += 1;
        self.indentation = self.formatting.indentation.repeat(self.section_level);
        self.valid = TokenSet::KEY | TokenSet::COMMENT | TokenSet::END_SECTION;
        self.previous = Some(TokenKind::StartSection);
        self.flush()
    }

    /// # Errors
    ///
    /// Fails if no section is open or an entry is incomplete.
    pub fn write_end_section(&mut self) -> Result<()> {
        self.check(TokenKind::EndSection)?;
        self.blank_line_if_needed(TokenKind::EndSection);
        self.section_level -= 1;
        self.indentation = self.formatting.indentation.repeat(self.section_level);
        self.buffer.push_str(&self.indentation);
        self.buffer.push(syntax::SECTION_END);
        self.buffer.push('\n');
        self.valid = self.after_entry();
        self.previous = Some(TokenKind::EndSection);
        self.flush()
    }

    /// # Errors
    ///
    /// Fails if an array is not legal here.
    pub fn write_start_array(&mut self) -> Result<()> {
        self.check(TokenKind::StartArray)?;
        if self.formatting.equals_before_array {
            self.buffer.push(syntax::VALUE_START);
        }
        if self.blank_line_if_needed(TokenKind::StartArray) {
            self.buffer.push_str(&self.indentation);
        }
        self.buffer.push(syntax::ARRAY_START);
        self.valid = TokenSet::ARRAY_VALUE | TokenSet::END_ARRAY;
        self.previous = Some(TokenKind::StartArray);
        self.flush()
    }

    /// # Errors
    ///
    /// Fails if no array is open.
    pub fn write_end_array(&mut self) -> Result<()> {
        self.check(TokenKind::EndArray)?;
        if self.blank_line_if_needed(TokenKind::EndArray) {
            self.buffer.push_str(&self.indentation);
        }
        self.buffer.push(syntax::ARRAY_END);
        self.buffer.push('\n');
        self.valid = self.after_entry();
        self.previous = Some(TokenKind::EndArray);
        self.flush()
    }

    /// Checks that the text is complete. After this only `finished` may be called again.
    ///
    /// # Errors
    ///
    /// - [`Error::UnclosedSections`] if sections are still open
    /// - [`Error::IllegalWrite`] if an entry is incomplete
    pub fn finished(&mut self) -> Result<()> {
        if self.section_level > 0 {
            return Err(Error::UnclosedSections {
                open: self.section_level,
            });
        }
        self.check(TokenKind::Finish)?;
        self.valid = TokenSet::FINISH;
        Ok(())
    }

    /// Writes every child of `section`, recursing into nested sections.
    ///
    /// Each child's comments come first, then its key and content. The key and comments
    /// of `section` itself are not written.
    ///
    /// # Errors
    ///
    /// Fails on the first write that fails.
    pub fn write_section(&mut self, section: &SectionElement) -> Result<()> {
        let mut open = vec![section.children().values()];
        while let Some(children) = open.last_mut() {
            let Some(element) = children.next() else {
                open.pop();
                if !open.is_empty() {
                    self.write_end_section()?;
                }
                continue;
            };

            for comment in element.comments()? {
                self.write_comment(comment)?;
            }
            self.write_key(element.key()?)?;
            match element {
                Element::String(s) => self.write_value(s.value())?,
                Element::Array(a) => {
                    self.write_start_array()?;
                    for value in a.values() {
                        self.write_value(value)?;
                    }
                    self.write_end_array()?;
                }
                Element::Section(s) => {
                    self.write_start_section()?;
                    open.push(s.children().values());
                }
                Element::Invalid => {
                    return Err(Error::invalid_access(
                        ElementKind::Invalid,
                        "write the element",
                    ))
                }
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let sent = self.output.write_str(&self.buffer);
        self.buffer.clear();
        sent.map_err(|_| Error::io("the output did not accept the text"))
    }

    fn check(&self, kind: TokenKind) -> Result<()> {
        if self.can_write(kind) {
            Ok(())
        } else {
            Err(Error::illegal_write(kind, self.valid))
        }
    }

    fn after_entry(&self) -> TokenSet {
        let mut valid = TokenSet::KEY | TokenSet::COMMENT;
        valid |= if self.section_level > 0 {
            TokenSet::END_SECTION
        } else {
            TokenSet::FINISH
        };
        valid
    }

    fn blank_line_if_needed(&mut self, next: TokenKind) -> bool {
        if self.formatting.blank_line_between(self.previous, next) {
            self.buffer.push('\n');
            true
        } else {
            false
        }
    }

    fn push_inner_indentation(&mut self) {
        self.buffer.push_str(&self.indentation);
        self.buffer.push_str(&self.formatting.indentation);
    }

    fn push_comment_line(&mut self, line: &str) {
        self.buffer.push_str(&self.indentation);
        self.buffer.push(syntax::COMMENT_START);
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    fn push_quoted(&mut self, text: &str, quote: Option<char>) {
        match quote {
            Some(q) => {
                self.buffer.push(q);
                self.buffer.push_str(text);
                self.buffer.push(q);
            }
            None => self.buffer.push_str(text),
        }
    }

    /// Picks the quote character for `text`, or `None` if it can be written bare.
    fn quote_for(&self, text: &str, slot: Slot) -> Result<Option<char>> {
        let quotes = self.formatting.quote_preference.quotes();
        let (Some(first), Some(last)) = (text.chars().next(), text.chars().next_back()) else {
            return Ok(Some(quotes[0]));
        };

        let padded = first.is_whitespace() || last.is_whitespace();
        let needs_quotes = padded
            || is_quote(first)
            || match slot {
                Slot::Key => {
                    self.formatting.always_quote_keys
                        || first == syntax::SECTION_END
                        || first == syntax::COMMENT_START
                        || text.contains(&syntax::END_OF_KEY[..])
                }
                Slot::Value => {
                    self.formatting.always_quote_values
                        || first == syntax::ARRAY_START
                        || text.contains(&syntax::END_OF_LINE[..])
                }
                Slot::ArrayValue => {
                    self.formatting.always_quote_values
                        || text.contains(&syntax::END_OF_ARRAY_VALUE[..])
                        || text.contains(&syntax::END_OF_LINE[..])
                }
            };
        if !needs_quotes {
            return Ok(None);
        }

        quotes
            .into_iter()
            .find(|q| !text.contains(*q))
            .map(Some)
            .ok_or_else(|| Error::unquotable(text))
    }
}

/// Passes writer text on to an [`io::Write`] stream, keeping the first I/O error.
pub(crate) struct IoOutput<W> {
    stream: W,
    error: Option<io::Error>,
}

impl<W: io::Write> IoOutput<W> {
    pub(crate) fn new(stream: W) -> Self {
        IoOutput {
            stream,
            error: None,
        }
    }

    /// Flushes the stream after `written`, reporting an I/O error ahead of anything else.
    pub(crate) fn finish(mut self, written: Result<()>) -> Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e.into());
        }
        written?;
        self.stream.flush().map_err(Error::from)
    }
}

impl<W: io::Write> fmt::Write for IoOutput<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.error.is_some() {
            return Err(fmt::Error);
        }
        self.stream.write_all(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::QuotePreference;

    fn compact() -> Writer {
        Writer::with_formatting(Formatting::compact())
    }

    fn value_text(value: &str) -> String {
        let mut writer = compact();
        writer.write_key("K").unwrap();
        writer.write_value(value).unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_initial_valid_writes() {
        let writer = Writer::new();
        assert_eq!(
            writer.valid_writes(),
            TokenSet::KEY | TokenSet::COMMENT | TokenSet::FINISH
        );
    }

    #[test]
    fn test_value_quoting() {
        assert_eq!(value_text("plainword"), "K=plainword\n");
        assert_eq!(value_text(""), "K=\"\"\n");
        assert_eq!(value_text(" lead"), "K=\" lead\"\n");
        assert_eq!(value_text("two\nlines"), "K=\"two\nlines\"\n");
        assert_eq!(value_text("[x"), "K=\"[x\"\n");
        assert_eq!(value_text("a=b # c, d]"), "K=a=b # c, d]\n");
        assert_eq!(value_text("\"x\""), "K='\"x\"'\n");
    }

    #[test]
    fn test_key_quoting() {
        let key_text = |key: &str| {
            let mut writer = compact();
            writer.write_key(key).unwrap();
            writer.into_inner()
        };
        assert_eq!(key_text("Name"), "Name");
        assert_eq!(key_text("a=b"), "\"a=b\"");
        assert_eq!(key_text("#x"), "\"#x\"");
        assert_eq!(key_text("}x"), "\"}x\"");
        assert_eq!(key_text("a,b]"), "a,b]");
        assert_eq!(key_text(""), "\"\"");
    }

    #[test]
    fn test_array_value_quoting() {
        let mut writer = compact();
        writer.write_key("A").unwrap();
        writer.write_start_array().unwrap();
        for value in ["x", "y,z", "q]", "{ok}"] {
            writer.write_value(value).unwrap();
        }
        writer.write_end_array().unwrap();
        assert_eq!(writer.into_inner(), "A=[x, \"y,z\", \"q]\", {ok}]\n");
    }

    #[test]
    fn test_quote_preference() {
        let mut writer = Writer::with_formatting(
            Formatting::compact().with_quote_preference(QuotePreference::BacktickSingleDouble),
        );
        writer.write_key("K").unwrap();
        writer.write_value(" `x").unwrap();
        assert_eq!(writer.into_inner(), "K=' `x'\n");
    }

    #[test]
    fn test_unquotable() {
        let mut writer = compact();
        writer.write_key("K").unwrap();
        let err = writer.write_value(" \"'` ").unwrap_err();
        assert!(matches!(err, Error::Unquotable { .. }));
    }

    #[test]
    fn test_always_quote() {
        let mut writer = Writer::with_formatting(
            Formatting::compact()
                .with_always_quote_keys(true)
                .with_always_quote_values(true),
        );
        writer.write_key("K").unwrap();
        writer.write_value("v").unwrap();
        assert_eq!(writer.into_inner(), "\"K\"=\"v\"\n");
    }

    #[test]
    fn test_illegal_writes() {
        let mut writer = compact();
        let err = writer.write_value("x").unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalWrite { attempted: TokenKind::Value, .. }
        ));
        assert!(writer.write_end_section().is_err());
        assert!(writer.write_start_array().is_err());

        writer.write_key("K").unwrap();
        assert!(writer.write_key("L").is_err());
        assert!(writer.write_comment("c").is_err());
        assert!(writer.finished().is_err());
    }

    #[test]
    fn test_unclosed_sections() {
        let mut writer = compact();
        writer.write_key("A").unwrap();
        writer.write_start_section().unwrap();
        writer.write_key("B").unwrap();
        writer.write_start_section().unwrap();
        assert!(matches!(
            writer.finished(),
            Err(Error::UnclosedSections { open: 2 })
        ));
    }

    #[test]
    fn test_finished_is_repeatable() {
        let mut writer = compact();
        writer.finished().unwrap();
        writer.finished().unwrap();
        assert_eq!(writer.valid_writes(), TokenSet::FINISH);
        assert!(writer.write_key("K").is_err());
    }

    #[test]
    fn test_multiline_comment() {
        let mut writer = compact();
        writer.write_comment("one\r\ntwo\nthree\rfour\n").unwrap();
        assert_eq!(writer.into_inner(), "#one\n#two\n#three\n#four\n#\n");
    }

    #[test]
    fn test_default_blank_lines() {
        let mut writer = Writer::new();
        writer.write_key("A").unwrap();
        writer.write_value("1").unwrap();
        writer.write_comment(" note").unwrap();
        writer.write_key("B").unwrap();
        writer.write_start_section().unwrap();
        writer.write_key("C").unwrap();
        writer.write_value("2").unwrap();
        writer.write_end_section().unwrap();
        writer.finished().unwrap();
        assert_eq!(writer.into_inner(), "A=1\n\n# note\nB {\n\tC=2\n}\n");
    }

    #[test]
    fn test_brace_on_next_line_and_no_equals() {
        let mut writer = Writer::with_formatting(
            Formatting::compact()
                .with_section_brace_same_line(false)
                .with_equals_before_array(false)
                .with_indentation("  "),
        );
        writer.write_key("S").unwrap();
        writer.write_start_section().unwrap();
        writer.write_key("A").unwrap();
        writer.write_start_array().unwrap();
        writer.write_end_array().unwrap();
        writer.write_end_section().unwrap();
        assert_eq!(writer.into_inner(), "S\n{\n  A[]\n}\n");
    }

    #[test]
    fn test_blank_line_inside_value() {
        let mut writer = Writer::with_formatting(
            Formatting::compact().with_blank_line(TokenKind::Key, TokenSet::VALUE),
        );
        writer.write_key("K").unwrap();
        writer.write_value("v").unwrap();
        assert_eq!(writer.into_inner(), "K=\n\tv\n");
    }

    #[test]
    fn test_write_line_keeps_state() {
        let mut writer = compact();
        writer.write_key("K").unwrap();
        let before = writer.valid_writes();
        writer.write_line().unwrap();
        assert_eq!(writer.valid_writes(), before);
    }

    /// Records each piece of text as the writer passes it on.
    #[derive(Default)]
    struct Pieces(Vec<String>);

    impl fmt::Write for Pieces {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.0.push(s.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_output_receives_each_token() {
        let mut writer = Writer::with_output(Pieces::default(), Formatting::compact());
        writer.write_key("K").unwrap();
        writer.write_value("v").unwrap();
        assert!(writer.write_value("w").is_err());
        writer.finished().unwrap();
        assert_eq!(writer.into_inner().0, vec!["K", "=v\n"]);
    }

    #[test]
    fn test_borrowed_output_keeps_earlier_text() {
        let mut text = String::from("#head\n");
        let mut writer = Writer::with_output(&mut text, Formatting::compact());
        writer.write_key("S").unwrap();
        writer.write_start_section().unwrap();
        writer.write_end_section().unwrap();
        writer.finished().unwrap();
        assert_eq!(text, "#head\nS {\n}\n");
    }

    struct Refusing;

    impl io::Write for Refusing {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_io_output_reports_stream_error() {
        let mut output = IoOutput::new(Refusing);
        let mut writer = Writer::with_output(&mut output, Formatting::compact());
        let written = writer.write_key("K");
        assert!(matches!(written, Err(Error::Io(_))));
        let err = output.finish(written).unwrap_err();
        assert!(matches!(err, Error::Io(ref m) if m.contains("closed")));
    }

    #[test]
    fn test_io_output_streams_bytes() {
        let mut bytes = Vec::new();
        let mut output = IoOutput::new(&mut bytes);
        let mut writer = Writer::with_output(&mut output, Formatting::compact());
        writer.write_key("K").unwrap();
        writer.write_value("v").unwrap();
        let written = writer.finished();
        output.finish(written).unwrap();
        assert_eq!(bytes, b"K=v\n");
    }
}
