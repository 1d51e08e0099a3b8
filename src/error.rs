//! Error types for reading, writing and navigating configuration documents.
//!
//! Every fallible operation in this crate returns [`Result`], whose error type is the
//! single [`Error`] enum defined here.
//!
//! ## Error Categories
//!
//! - **Format errors**: malformed text found by the [`Reader`](crate::Reader), with the
//!   line and column where reading stopped
//! - **Duplicate keys**: two siblings resolve to the same path
//! - **Illegal writes**: a [`Writer`](crate::Writer) method called when its token is not
//!   currently legal, or a document finished with sections still open
//! - **Element access errors**: asking an element for something its variant does not
//!   have (the value of a section, the children of a string, anything on
//!   [`Element::Invalid`](crate::Element::Invalid))
//!
//! ## Examples
//!
//! ```rust
//! use cfgtext::{from_str, Error};
//!
//! let result = from_str("Server {\n  Port=8080\n");
//! assert!(matches!(result, Err(Error::Format { .. })));
//!
//! let result = from_str("Name=Alice\nName=Bob\n");
//! assert!(matches!(result, Err(Error::DuplicateKey { .. })));
//! ```

use crate::element::ElementKind;
use crate::token::{TokenKind, TokenSet};
use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The text being read is not syntactically valid
    #[error("Format error at line {line}, column {col}: {msg}")]
    Format { line: usize, col: usize, msg: String },

    /// Two sibling elements resolve to the same path
    #[error("Duplicate key \"{path}\" was found")]
    DuplicateKey { path: String },

    /// A key contains the path delimiter, which would make its path ambiguous
    #[error("Key \"{key}\" must not contain the path delimiter '{delimiter}'")]
    InvalidKey { key: String, delimiter: char },

    /// The element was already attached to a parent
    #[error("Element \"{key}\" is already attached to a parent")]
    AlreadyAttached { key: String },

    /// No element exists at the requested path
    #[error("Could not find any element with the path \"{path}\"")]
    KeyNotFound { path: String },

    /// The operation is not supported by this kind of element
    #[error("Cannot {operation}: the element is {kind}")]
    InvalidElementAccess {
        kind: ElementKind,
        operation: String,
    },

    /// A writer method was called when its token is not currently legal
    #[error("Writer cannot currently write a {attempted}. It can currently write: {valid}")]
    IllegalWrite { attempted: TokenKind, valid: TokenSet },

    /// The writer was finished while sections were still open
    #[error("Writer cannot currently finish. You need to close {open} section(s)")]
    UnclosedSections { open: usize },

    /// The string contains every quote character, so it cannot be quoted
    #[error("Couldn't find an appropriate quote to use for the string: {text}")]
    Unquotable { text: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a format error at the given 1-based line and column.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgtext::Error;
    ///
    /// let err = Error::format(3, 7, "unexpected }");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn format(line: usize, col: usize, msg: &str) -> Self {
        Error::Format {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a duplicate-key error naming the offending path.
    pub fn duplicate_key(path: &str) -> Self {
        Error::DuplicateKey {
            path: path.to_string(),
        }
    }

    pub fn invalid_key(key: &str, delimiter: char) -> Self {
        Error::InvalidKey {
            key: key.to_string(),
            delimiter,
        }
    }

    pub fn already_attached(key: &str) -> Self {
        Error::AlreadyAttached {
            key: key.to_string(),
        }
    }

    pub fn key_not_found(path: &str) -> Self {
        Error::KeyNotFound {
            path: path.to_string(),
        }
    }

    /// Creates an element access error for an operation the element kind does not support.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgtext::{Error, ElementKind};
    ///
    /// let err = Error::invalid_access(ElementKind::Section, "read the value");
    /// assert_eq!(err.to_string(), "Cannot read the value: the element is Section");
    /// ```
    pub fn invalid_access(kind: ElementKind, operation: &str) -> Self {
        Error::InvalidElementAccess {
            kind,
            operation: operation.to_string(),
        }
    }

    pub fn illegal_write(attempted: TokenKind, valid: TokenSet) -> Self {
        Error::IllegalWrite { attempted, valid }
    }

    pub fn unquotable(text: &str) -> Self {
        Error::Unquotable {
            text: text.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
