//! Builds a [`Document`] from the token stream of a [`Reader`].
//!
//! Sections are assembled on a stack of open sections and moved into their parent when
//! they close. Comments are collected until the next entry and given to it. Loading
//! stops at the first format error or duplicate key; no partial document is returned.

use crate::document::Document;
use crate::element::{ArrayElement, SectionElement, StringElement};
use crate::options::{CommentPolicy, LoadOptions};
use crate::path;
use crate::reader::Reader;
use crate::token::{Token, TokenKind};
use crate::{Error, Result};
use std::mem;

pub(crate) fn load(input: &str, options: &LoadOptions) -> Result<Document> {
    let loaded = Loader::new(options).run(Reader::new(input));
    match &loaded {
        Ok(doc) => log::debug!(
            "loaded {} top-level elements from {} bytes",
            doc.root().len(),
            input.len()
        ),
        Err(err) => log::debug!("load abandoned: {err}"),
    }
    loaded
}

struct Loader<'o> {
    options: &'o LoadOptions,
    root: SectionElement,
    open: Vec<SectionElement>,
    comments: Vec<String>,
}

impl<'o> Loader<'o> {
    fn new(options: &'o LoadOptions) -> Self {
        Loader {
            options,
            root: SectionElement::root(options.comparer, options.delimiter),
            open: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn run(mut self, mut reader: Reader<'_>) -> Result<Document> {
        loop {
            let token = next_token(&mut reader)?;
            match token.kind {
                TokenKind::Comment => {
                    if self.options.comments == CommentPolicy::Load {
                        self.comments.push(token.text);
                    }
                }
                TokenKind::Key => self.entry(token.text, &mut reader)?,
                TokenKind::EndSection => self.end_section(&reader)?,
                TokenKind::Finish => break,
                other => return Err(unexpected(other, &reader)),
            }
        }
        self.discard_comments("at end of file");
        Ok(Document::from_root(self.root))
    }

    fn current(&mut self) -> &mut SectionElement {
        match self.open.last_mut() {
            Some(section) => section,
            None => &mut self.root,
        }
    }

    /// Reads what follows `key` and adds it to the current section.
    fn entry(&mut self, key: String, reader: &mut Reader<'_>) -> Result<()> {
        let comments = mem::take(&mut self.comments);
        let token = next_token(reader)?;
        match token.kind {
            TokenKind::Value => {
                let string = StringElement::new(key, token.text).with_comments(comments);
                self.current().add(string)?;
            }
            TokenKind::StartArray => {
                let mut array = ArrayElement::new(key).with_comments(comments);
                loop {
                    let token = next_token(reader)?;
                    match token.kind {
                        TokenKind::ArrayValue => {
                            array.push(token.text);
                        }
                        TokenKind::EndArray => break,
                        other => return Err(unexpected(other, reader)),
                    }
                }
                self.current().add(array)?;
            }
            TokenKind::StartSection => {
                let (comparer, delimiter) = (self.options.comparer, self.options.delimiter);
                let parent = self.current();
                let path = path::join(parent.path(), &key, parent.delimiter())?;
                if parent.contains_key(&key) {
                    return Err(Error::duplicate_key(&path));
                }
                let section =
                    SectionElement::at_path(key, path, comparer, delimiter).with_comments(comments);
                self.open.push(section);
            }
            other => return Err(unexpected(other, reader)),
        }
        Ok(())
    }

    fn end_section(&mut self, reader: &Reader<'_>) -> Result<()> {
        let Some(section) = self.open.pop() else {
            return Err(unexpected(TokenKind::EndSection, reader));
        };
        self.discard_comments("before the end of a section");
        self.current().adopt(section)
    }

    fn discard_comments(&mut self, place: &str) {
        if !self.comments.is_empty() {
            log::debug!(
                "discarding {} comment line(s) {place}, nothing follows them",
                self.comments.len()
            );
            self.comments.clear();
        }
    }
}

fn next_token(reader: &mut Reader<'_>) -> Result<Token> {
    let token = reader.read()?;
    log::trace!("{} {:?}", token.kind, token.text);
    Ok(token)
}

fn unexpected(kind: TokenKind, reader: &Reader<'_>) -> Error {
    Error::format(
        reader.line(),
        reader.column(),
        &format!("Unexpected {kind} token"),
    )
}
