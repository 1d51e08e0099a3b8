//! The token vocabulary shared by the [`Reader`](crate::Reader) and the
//! [`Writer`](crate::Writer).
//!
//! The reader turns text into a flat stream of [`Token`]s; the writer accepts the same
//! vocabulary as method calls. [`TokenSet`] is a small bitmask over [`TokenKind`] used
//! to describe which tokens are legal next.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// The kind of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A key that comes before a `Value`, `StartArray` or `StartSection`.
    Key,
    /// A single value directly after a key. Values inside arrays are `ArrayValue`s.
    Value,
    Comment,
    StartArray,
    /// A single value inside an array.
    ArrayValue,
    EndArray,
    StartSection,
    EndSection,
    /// The end of the document.
    Finish,
}

impl TokenKind {
    pub const ALL: [TokenKind; 9] = [
        TokenKind::Key,
        TokenKind::Value,
        TokenKind::Comment,
        TokenKind::StartArray,
        TokenKind::ArrayValue,
        TokenKind::EndArray,
        TokenKind::StartSection,
        TokenKind::EndSection,
        TokenKind::Finish,
    ];

    #[inline]
    const fn bit(self) -> u16 {
        match self {
            TokenKind::Key => 1,
            TokenKind::Value => 1 << 1,
            TokenKind::Comment => 1 << 2,
            TokenKind::StartArray => 1 << 3,
            TokenKind::ArrayValue => 1 << 4,
            TokenKind::EndArray => 1 << 5,
            TokenKind::StartSection => 1 << 6,
            TokenKind::EndSection => 1 << 7,
            TokenKind::Finish => 1 << 8,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Key => "Key",
            TokenKind::Value => "Value",
            TokenKind::Comment => "Comment",
            TokenKind::StartArray => "StartArray",
            TokenKind::ArrayValue => "ArrayValue",
            TokenKind::EndArray => "EndArray",
            TokenKind::StartSection => "StartSection",
            TokenKind::EndSection => "EndSection",
            TokenKind::Finish => "Finish",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single token read from a configuration text.
///
/// Tokens without semantic text (`StartArray`, `EndArray`, `StartSection`, `EndSection`,
/// `Finish`) carry an empty string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Token {
            text: text.into(),
            kind,
        }
    }

    /// Creates a token that carries no text.
    pub fn bare(kind: TokenKind) -> Self {
        Token {
            text: String::new(),
            kind,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A set of [`TokenKind`]s.
///
/// # Examples
///
/// ```rust
/// use cfgtext::{TokenKind, TokenSet};
///
/// let set = TokenSet::KEY | TokenSet::COMMENT;
/// assert!(set.contains(TokenKind::Key));
/// assert!(!set.contains(TokenKind::Value));
/// assert_eq!(set.to_string(), "Key, Comment");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenSet(u16);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);
    pub const KEY: TokenSet = TokenSet::of(TokenKind::Key);
    pub const VALUE: TokenSet = TokenSet::of(TokenKind::Value);
    pub const COMMENT: TokenSet = TokenSet::of(TokenKind::Comment);
    pub const START_ARRAY: TokenSet = TokenSet::of(TokenKind::StartArray);
    pub const ARRAY_VALUE: TokenSet = TokenSet::of(TokenKind::ArrayValue);
    pub const END_ARRAY: TokenSet = TokenSet::of(TokenKind::EndArray);
    pub const START_SECTION: TokenSet = TokenSet::of(TokenKind::StartSection);
    pub const END_SECTION: TokenSet = TokenSet::of(TokenKind::EndSection);
    pub const FINISH: TokenSet = TokenSet::of(TokenKind::Finish);

    /// A set holding exactly one kind.
    #[must_use]
    pub const fn of(kind: TokenKind) -> Self {
        TokenSet(kind.bit())
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & kind.bit() == kind.bit()
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: TokenSet) -> Self {
        TokenSet(self.0 | other.0)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the kinds in this set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl From<TokenKind> for TokenSet {
    fn from(kind: TokenKind) -> Self {
        TokenSet::of(kind)
    }
}

impl BitOr for TokenSet {
    type Output = TokenSet;

    fn bitor(self, rhs: TokenSet) -> TokenSet {
        self.union(rhs)
    }
}

impl BitOrAssign for TokenSet {
    fn bitor_assign(&mut self, rhs: TokenSet) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(kind.as_str())?;
        }
        Ok(())
    }
}
