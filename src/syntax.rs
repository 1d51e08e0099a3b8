//! Syntax characters of the configuration text format.
//!
//! # Overview
//!
//! A configuration text is a sequence of entries. Each entry is either a comment or a
//! key followed by a value, an array or a section:
//!
//! ```text
//! # A comment runs to the end of the line
//! Name=Alice
//! Tags=[red, green, "blue,purple"]
//! Server {
//!     Port=8080
//! }
//! ```
//!
//! # Grammar
//!
//! ```text
//! file      := entry* EOF
//! entry     := comment | keyvalue
//! comment   := '#' text-to-eol
//! keyvalue  := key ( '=' (array | scalar) | array | section )
//! key       := quoted | unquoted-until('=', '[', '{', '\r', '\n')
//! scalar    := quoted | unquoted-to-eol
//! array     := '[' (arrayval (',' arrayval)*)? ']'
//! arrayval  := quoted | unquoted-until(',', ']')
//! section   := '{' entry* '}'
//! quoted    := ('"' | '\'' | '`') raw-chars-until-matching-quote
//! ```
//!
//! ## Keys
//!
//! - Unquoted keys end at `=`, `[`, `{` or a line break; trailing whitespace is trimmed
//! - A key can be followed by its `=`, `[` or `{` on a later line
//! - Quoted keys may contain anything except their own quote character
//!
//! ## Values
//!
//! - Unquoted values run to the end of the line and are trimmed
//! - `Key==Yes` is the value `=Yes`; only a leading `[` starts an array
//! - Quoted values may span several lines
//!
//! ## Arrays
//!
//! - `Key=[a, b]` and `Key[a, b]` are equivalent
//! - Unquoted elements end at `,` or `]`, so elements containing them must be quoted
//! - A trailing comma before `]` is accepted
//!
//! ## Quoting
//!
//! There is no escape mechanism. A quoted string ends at the first occurrence of the
//! quote character that opened it, so a string can be written as long as at least one
//! of `"`, `'` and `` ` `` does not occur in it.
//!
//! # Paths
//!
//! Every element is addressed by the keys leading to it, joined by [`KEY_DELIMITER`]
//! (`Server:Port`). Array elements are addressed by index (`Tags:2`).

pub const COMMENT_START: char = '#';
pub const VALUE_START: char = '=';
pub const ARRAY_START: char = '[';
pub const ARRAY_END: char = ']';
pub const ARRAY_ELEMENT_DELIMITER: char = ',';
pub const SECTION_START: char = '{';
pub const SECTION_END: char = '}';

/// The default path delimiter.
pub const KEY_DELIMITER: char = ':';

/// The quote characters, in the default order of preference.
pub const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Characters that end an unquoted key.
pub const END_OF_KEY: [char; 5] = [VALUE_START, ARRAY_START, SECTION_START, '\r', '\n'];

pub const END_OF_LINE: [char; 2] = ['\r', '\n'];

/// Characters that end an unquoted array element.
pub const END_OF_ARRAY_VALUE: [char; 2] = [ARRAY_ELEMENT_DELIMITER, ARRAY_END];

#[inline]
#[must_use]
pub fn is_quote(c: char) -> bool {
    QUOTES.contains(&c)
}
