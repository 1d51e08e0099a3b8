//! Configuration for loading and saving documents.
//!
//! This module provides:
//!
//! - [`Formatting`]: how the [`Writer`](crate::Writer) lays out text
//! - [`QuotePreference`]: which quote character to try first when quoting is needed
//! - [`LoadOptions`]: how text is turned into a [`Document`](crate::Document)
//! - [`CommentPolicy`]: whether comments are kept while loading
//!
//! ## Examples
//!
//! ```rust
//! use cfgtext::{Formatting, QuotePreference, LoadOptions, KeyComparer};
//!
//! let formatting = Formatting::new()
//!     .with_indentation("    ")
//!     .with_quote_preference(QuotePreference::SingleDoubleBacktick)
//!     .with_equals_before_array(false);
//!
//! let options = LoadOptions::new().with_comparer(KeyComparer::IgnoreCase);
//! ```

use crate::map::KeyComparer;
use crate::syntax;
use crate::token::{TokenKind, TokenSet};
use std::collections::HashMap;

/// The order in which quote characters are tried when a string needs quoting.
///
/// The first quote character that does not occur in the string is used.
///
/// # Examples
///
/// ```rust
/// use cfgtext::QuotePreference;
///
/// assert_eq!(QuotePreference::DoubleSingleBacktick.quotes(), ['"', '\'', '`']);
/// assert_eq!(QuotePreference::BacktickSingleDouble.quotes(), ['`', '\'', '"']);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QuotePreference {
    #[default]
    DoubleSingleBacktick,
    DoubleBacktickSingle,
    SingleDoubleBacktick,
    SingleBacktickDouble,
    BacktickDoubleSingle,
    BacktickSingleDouble,
}

impl QuotePreference {
    /// Returns the quote characters in order of preference.
    #[must_use]
    pub const fn quotes(self) -> [char; 3] {
        match self {
            QuotePreference::DoubleSingleBacktick => ['"', '\'', '`'],
            QuotePreference::DoubleBacktickSingle => ['"', '`', '\''],
            QuotePreference::SingleDoubleBacktick => ['\'', '"', '`'],
            QuotePreference::SingleBacktickDouble => ['\'', '`', '"'],
            QuotePreference::BacktickDoubleSingle => ['`', '"', '\''],
            QuotePreference::BacktickSingleDouble => ['`', '\'', '"'],
        }
    }
}

/// Describes how a document is laid out when written as text.
///
/// # Examples
///
/// ```rust
/// use cfgtext::Formatting;
///
/// let formatting = Formatting::default();
/// assert_eq!(formatting.indentation, "\t");
/// assert!(formatting.section_brace_same_line);
/// assert!(formatting.equals_before_array);
/// ```
#[derive(Clone, Debug)]
pub struct Formatting {
    /// The string used for one level of indentation.
    pub indentation: String,
    /// Maps a token just written to the set of next tokens that get one extra blank line
    /// in between.
    pub extra_blank_lines: HashMap<TokenKind, TokenSet>,
    /// `Key {` when true, `{` on its own line when false.
    pub section_brace_same_line: bool,
    /// `Key=[...]` when true, `Key[...]` when false.
    pub equals_before_array: bool,
    pub always_quote_keys: bool,
    pub always_quote_values: bool,
    pub quote_preference: QuotePreference,
}

impl Default for Formatting {
    fn default() -> Self {
        let spaced = TokenSet::KEY | TokenSet::COMMENT;
        let mut extra_blank_lines = HashMap::with_capacity(3);
        extra_blank_lines.insert(TokenKind::Value, spaced);
        extra_blank_lines.insert(TokenKind::EndArray, spaced);
        extra_blank_lines.insert(TokenKind::EndSection, spaced);

        Formatting {
            indentation: "\t".to_string(),
            extra_blank_lines,
            section_brace_same_line: true,
            equals_before_array: true,
            always_quote_keys: false,
            always_quote_values: false,
            quote_preference: QuotePreference::default(),
        }
    }
}

impl Formatting {
    /// Creates the default formatting: tab indentation, blank lines between entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates formatting without any extra blank lines.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgtext::Formatting;
    ///
    /// assert!(Formatting::compact().extra_blank_lines.is_empty());
    /// ```
    #[must_use]
    pub fn compact() -> Self {
        Formatting {
            extra_blank_lines: HashMap::new(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indentation(mut self, indentation: impl Into<String>) -> Self {
        self.indentation = indentation.into();
        self
    }

    /// Adds one blank line between `after` and any of the `before` tokens.
    ///
    /// Replaces any set previously registered for `after`.
    #[must_use]
    pub fn with_blank_line(mut self, after: TokenKind, before: TokenSet) -> Self {
        self.extra_blank_lines.insert(after, before);
        self
    }

    #[must_use]
    pub fn with_section_brace_same_line(mut self, same_line: bool) -> Self {
        self.section_brace_same_line = same_line;
        self
    }

    #[must_use]
    pub fn with_equals_before_array(mut self, equals: bool) -> Self {
        self.equals_before_array = equals;
        self
    }

    #[must_use]
    pub fn with_always_quote_keys(mut self, always: bool) -> Self {
        self.always_quote_keys = always;
        self
    }

    #[must_use]
    pub fn with_always_quote_values(mut self, always: bool) -> Self {
        self.always_quote_values = always;
        self
    }

    #[must_use]
    pub fn with_quote_preference(mut self, preference: QuotePreference) -> Self {
        self.quote_preference = preference;
        self
    }

    /// Returns true if a blank line goes between `previous` and `next`.
    #[inline]
    #[must_use]
    pub fn blank_line_between(&self, previous: Option<TokenKind>, next: TokenKind) -> bool {
        previous
            .and_then(|p| self.extra_blank_lines.get(&p))
            .is_some_and(|set| set.contains(next))
    }
}

/// Whether comments are kept while loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CommentPolicy {
    /// Keep comments so a saved document preserves them.
    #[default]
    Load,
    /// Discard comments; every element gets an empty comment list.
    Ignore,
}

/// Options controlling how text is loaded into a [`Document`](crate::Document).
///
/// # Examples
///
/// ```rust
/// use cfgtext::{from_str_with_options, CommentPolicy, KeyComparer, LoadOptions};
///
/// let options = LoadOptions::new()
///     .with_comparer(KeyComparer::IgnoreCase)
///     .with_comments(CommentPolicy::Ignore);
/// let doc = from_str_with_options("# note\nName=Alice\n", &options).unwrap();
/// assert_eq!(doc.get("NAME"), Some("Alice"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Key comparison used by every section created during the load.
    pub comparer: KeyComparer,
    pub comments: CommentPolicy,
    /// The path delimiter.
    pub delimiter: char,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            comparer: KeyComparer::default(),
            comments: CommentPolicy::default(),
            delimiter: syntax::KEY_DELIMITER,
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_comparer(mut self, comparer: KeyComparer) -> Self {
        self.comparer = comparer;
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comments: CommentPolicy) -> Self {
        self.comments = comments;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blank_lines() {
        let f = Formatting::default();
        assert!(f.blank_line_between(Some(TokenKind::Value), TokenKind::Key));
        assert!(f.blank_line_between(Some(TokenKind::EndSection), TokenKind::Comment));
        assert!(!f.blank_line_between(Some(TokenKind::Value), TokenKind::EndSection));
        assert!(!f.blank_line_between(Some(TokenKind::Key), TokenKind::Value));
        assert!(!f.blank_line_between(None, TokenKind::Key));
    }

    #[test]
    fn test_with_blank_line_replaces() {
        let f = Formatting::compact().with_blank_line(TokenKind::Key, TokenSet::VALUE);
        assert!(f.blank_line_between(Some(TokenKind::Key), TokenKind::Value));
        assert_eq!(f.extra_blank_lines.len(), 1);
    }

    #[test]
    fn test_load_options_defaults() {
        let options = LoadOptions::new();
        assert_eq!(options.comparer, KeyComparer::Ordinal);
        assert_eq!(options.comments, CommentPolicy::Load);
        assert_eq!(options.delimiter, ':');
    }
}
