//! Forward-only tokenizer for configuration text.
//!
//! This module provides the [`Reader`], a state machine that turns text into a flat
//! stream of [`Token`]s and rejects anything that is not syntactically valid.
//!
//! ## Overview
//!
//! - **Single pass**: every character is looked at once, there is no backtracking
//! - **Validating**: unbalanced sections, unterminated quotes and stray characters are
//!   reported as [`Error::Format`] with the line and column where reading stopped
//! - **Borrowing**: the reader works on a `&str` and owns nothing but its cursor
//!
//! ## Usage
//!
//! Most users should load whole documents with [`from_str`](crate::from_str). The
//! reader is useful when only the token stream is needed:
//!
//! ```rust
//! use cfgtext::{Reader, TokenKind};
//!
//! let kinds: Vec<TokenKind> = Reader::new("Tags=[a, b]\n")
//!     .map(|token| token.map(|t| t.kind))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Key,
//!         TokenKind::StartArray,
//!         TokenKind::ArrayValue,
//!         TokenKind::ArrayValue,
//!         TokenKind::EndArray,
//!         TokenKind::Finish,
//!     ]
//! );
//! ```

use crate::syntax::{self, is_quote};
use crate::token::{Token, TokenKind};
use crate::{Error, Result};

/// What the [`Reader`] expects to read next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadState {
    /// Initial state: a key, a comment, the end of a section or the end of the text.
    ExpectingKeyCommentEndSectionEndFile,
    /// A `{` was read after a key; the next token is `StartSection`.
    AtStartOfSection,
    /// A `[` was read directly after a key; the next token is `StartArray`.
    AtStartOfArray,
    /// A `]` was read after an array value; the next token is `EndArray`.
    AtEndOfArray,
    /// An `=` was read; either a value or an array follows.
    AtStartOfArrayOrValue,
    ReadingArray,
    /// Nothing more to read. Every further read returns `Finish`.
    EndOfFile,
}

/// Reads [`Token`]s from configuration text.
///
/// The reader is also an [`Iterator`] over `Result<Token>` that yields `Finish` once and
/// then stops. It stops after the first error as well.
pub struct Reader<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    state: ReadState,
    section_level: usize,
    exhausted: bool,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Reader {
            input: input.strip_prefix('\u{feff}').unwrap_or(input),
            position: 0,
            line: 1,
            column: 1,
            state: ReadState::ExpectingKeyCommentEndSectionEndFile,
            section_level: 0,
            exhausted: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> ReadState {
        self.state
    }

    /// How many sections are currently open.
    #[inline]
    #[must_use]
    pub fn section_level(&self) -> usize {
        self.section_level
    }

    /// The 1-based line of the next character to be read.
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns `false` once `Finish` has been read or an error occurred.
    #[inline]
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.state != ReadState::EndOfFile
    }

    /// Reads one token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the text is malformed at this point. The reader
    /// then moves to [`ReadState::EndOfFile`].
    pub fn read(&mut self) -> Result<Token> {
        let token = match self.state {
            ReadState::ExpectingKeyCommentEndSectionEndFile => self.read_at_key_position(),
            ReadState::AtStartOfSection => {
                self.state = ReadState::ExpectingKeyCommentEndSectionEndFile;
                Ok(Token::bare(TokenKind::StartSection))
            }
            ReadState::AtStartOfArray => {
                self.state = ReadState::ReadingArray;
                Ok(Token::bare(TokenKind::StartArray))
            }
            ReadState::AtEndOfArray => {
                self.state = ReadState::ExpectingKeyCommentEndSectionEndFile;
                Ok(Token::bare(TokenKind::EndArray))
            }
            ReadState::AtStartOfArrayOrValue => self.read_value(),
            ReadState::ReadingArray => self.read_array_value(),
            ReadState::EndOfFile => Ok(Token::bare(TokenKind::Finish)),
        };
        if token.is_err() {
            self.state = ReadState::EndOfFile;
        }
        token
    }

    fn read_at_key_position(&mut self) -> Result<Token> {
        let Some(c) = self.skip_whitespace_and_next() else {
            self.state = ReadState::EndOfFile;
            if self.section_level > 0 {
                return Err(self.error(&format!(
                    "Found end of file when there were still {} sections to close",
                    self.section_level
                )));
            }
            return Ok(Token::bare(TokenKind::Finish));
        };

        match c {
            syntax::COMMENT_START => {
                let text = self.read_line();
                Ok(Token::new(text.trim_end(), TokenKind::Comment))
            }
            syntax::SECTION_END => {
                if self.section_level == 0 {
                    return Err(
                        self.error("Found } (section close) when there was no section to close")
                    );
                }
                self.section_level -= 1;
                Ok(Token::bare(TokenKind::EndSection))
            }
            syntax::VALUE_START | syntax::ARRAY_START | syntax::SECTION_START => {
                Err(self.error(&format!("Expected a key but found {c}")))
            }
            q if is_quote(q) => {
                let key = self.read_quoted(q)?;
                let next = self.skip_whitespace_and_next();
                self.after_key(&key, next)?;
                Ok(Token::new(key, TokenKind::Key))
            }
            _ => {
                let (key, mut next) = self.read_until(c, &syntax::END_OF_KEY);
                if next.is_some_and(char::is_whitespace) {
                    next = self.skip_whitespace_and_next();
                }
                self.after_key(&key, next)?;
                Ok(Token::new(key, TokenKind::Key))
            }
        }
    }

    fn read_value(&mut self) -> Result<Token> {
        let Some(c) = self.skip_whitespace_and_next() else {
            return Err(
                self.error("Encountered end of file when trying to read a value or array after a key")
            );
        };
        if c == syntax::ARRAY_START {
            self.state = ReadState::ReadingArray;
            return Ok(Token::bare(TokenKind::StartArray));
        }

        // An unquoted value may run to the end of the text.
        let value = if is_quote(c) {
            self.read_quoted(c)?
        } else {
            self.read_until(c, &syntax::END_OF_LINE).0
        };
        self.state = ReadState::ExpectingKeyCommentEndSectionEndFile;
        Ok(Token::new(value, TokenKind::Value))
    }

    fn read_array_value(&mut self) -> Result<Token> {
        let Some(c) = self.skip_whitespace_and_next() else {
            return Err(self.error("Encountered end of file inside an array"));
        };
        match c {
            syntax::ARRAY_END => {
                self.state = ReadState::ExpectingKeyCommentEndSectionEndFile;
                Ok(Token::bare(TokenKind::EndArray))
            }
            syntax::ARRAY_ELEMENT_DELIMITER => Err(self.error("Found an empty array element")),
            q if is_quote(q) => {
                let value = self.read_quoted(q)?;
                let next = self.skip_whitespace_and_next();
                self.after_array_value(&value, next)?;
                Ok(Token::new(value, TokenKind::ArrayValue))
            }
            _ => {
                let (value, next) = self.read_until(c, &syntax::END_OF_ARRAY_VALUE);
                self.after_array_value(&value, next)?;
                Ok(Token::new(value, TokenKind::ArrayValue))
            }
        }
    }

    fn after_key(&mut self, key: &str, next: Option<char>) -> Result<()> {
        match next {
            Some(syntax::VALUE_START) => self.state = ReadState::AtStartOfArrayOrValue,
            Some(syntax::ARRAY_START) => self.state = ReadState::AtStartOfArray,
            Some(syntax::SECTION_START) => {
                self.state = ReadState::AtStartOfSection;
                self.section_level += 1;
            }
            Some(other) => {
                return Err(self.error(&format!(
                    "Expected =, [ or {{ after the key {key} but found {other}"
                )))
            }
            None => {
                return Err(
                    self.error(&format!("Encountered end of file after reading the key {key}"))
                )
            }
        }
        Ok(())
    }

    fn after_array_value(&mut self, value: &str, next: Option<char>) -> Result<()> {
        match next {
            Some(syntax::ARRAY_END) => self.state = ReadState::AtEndOfArray,
            Some(syntax::ARRAY_ELEMENT_DELIMITER) => self.state = ReadState::ReadingArray,
            Some(other) => {
                return Err(self.error(&format!(
                    "Found unexpected character when searching for next array element or end of array: {other}"
                )))
            }
            None => {
                return Err(self.error(&format!(
                    "Encountered end of file after reading the array element {value}"
                )))
            }
        }
        Ok(())
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Skips whitespace, line breaks included, and returns the next character.
    fn skip_whitespace_and_next(&mut self) -> Option<char> {
        while let Some(ch) = self.next_char() {
            if !ch.is_whitespace() {
                return Some(ch);
            }
        }
        None
    }

    /// Reads the rest of the current line and consumes its line break.
    fn read_line(&mut self) -> &'a str {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if syntax::END_OF_LINE.contains(&ch) {
                break;
            }
            self.next_char();
        }
        let line = &self.input[start..self.position];
        if self.next_char() == Some('\r') && self.peek_char() == Some('\n') {
            self.next_char();
        }
        line
    }

    /// Reads up to the closing `quote`, which is consumed but not returned.
    fn read_quoted(&mut self, quote: char) -> Result<String> {
        let start = self.position;
        while let Some(ch) = self.next_char() {
            if ch == quote {
                let end = self.position - quote.len_utf8();
                return Ok(self.input[start..end].to_string());
            }
        }
        Err(self.error(&format!(
            "Reached end of file before finding the end quote {quote}"
        )))
    }

    /// Reads `first` and everything after it up to one of `until`.
    ///
    /// The terminator is consumed and returned alongside the text, which has its
    /// trailing whitespace removed. `None` means the text ended first.
    fn read_until(&mut self, first: char, until: &[char]) -> (String, Option<char>) {
        let start = self.position - first.len_utf8();
        let mut end = self.position;
        let mut terminator = None;
        while let Some(ch) = self.next_char() {
            if until.contains(&ch) {
                terminator = Some(ch);
                break;
            }
            end = self.position;
        }
        (self.input[start..end].trim_end().to_string(), terminator)
    }

    fn error(&self, msg: &str) -> Error {
        Error::format(self.line, self.column, msg)
    }
}

impl Iterator for Reader<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let token = self.read();
        self.exhausted = match &token {
            Ok(t) => t.kind == TokenKind::Finish,
            Err(_) => true,
        };
        Some(token)
    }
}
