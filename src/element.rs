//! The in-memory document tree.
//!
//! A loaded configuration is a tree of [`Element`]s rooted at a section:
//!
//! - [`StringElement`]: a key with a single text value
//! - [`ArrayElement`]: a key with an ordered list of string values, addressed by index
//! - [`SectionElement`]: a key with uniquely-keyed children
//! - [`Element::Invalid`]: the "no such element" marker returned by non-failing lookups
//!
//! ## Attachment
//!
//! Elements are created detached and become part of a tree when they are added to a
//! section. Adding an element moves it into its parent and assigns its path once; an
//! element that is already attached somewhere cannot be added again.
//!
//! Mutable lookups and the `add_*` methods hand out an [`ElementMut`] rather than a plain
//! `&mut` reference. It can change values and comments and add children, but cannot
//! replace the element it points to.
//!
//! ```rust
//! use cfgtext::Document;
//!
//! let mut doc = Document::new();
//! let mut root = doc.root_mut();
//! let mut server = root.add_section("Server").unwrap();
//! server.add_string("Port", "8080").unwrap();
//!
//! let port = doc.root().find("Server:Port").unwrap();
//! assert_eq!(port.path().unwrap(), "Server:Port");
//! assert_eq!(port.value().unwrap(), "8080");
//! ```
//!
//! ## Lookups
//!
//! Every lookup comes in a failing and a non-failing flavor. The non-failing flavor
//! returns [`Element::Invalid`] so lookups can be chained without checking each step:
//!
//! ```rust
//! use cfgtext::from_str;
//!
//! let doc = from_str("outer {\n inner {\n  leaf=X\n }\n}\n").unwrap();
//! let root = doc.root();
//!
//! assert_eq!(root["outer"]["inner"]["leaf"], "X");
//! assert!(root["outer"]["missing"]["leaf"].is_invalid());
//! assert!(root.try_find("outer:").is_invalid());
//! assert!(root.find("outer:missing").is_err());
//! ```

use crate::map::{KeyComparer, KeyMap};
use crate::path;
use crate::syntax;
use crate::{Error, Result};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Deref, Index};

static INVALID: Element = Element::Invalid;

/// The variant of an [`Element`], without its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    String,
    Array,
    Section,
    Invalid,
}

impl ElementKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ElementKind::String => "String",
            ElementKind::Array => "Array",
            ElementKind::Section => "Section",
            ElementKind::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key with a single text value.
///
/// # Examples
///
/// ```rust
/// use cfgtext::StringElement;
///
/// let mut name = StringElement::new("Name", "Alice").with_comments(vec![" who".into()]);
/// assert_eq!(name.value(), "Alice");
/// assert!(!name.is_attached());
///
/// name.set_value("Bob");
/// assert_eq!(name.value(), "Bob");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringElement {
    key: String,
    path: Option<String>,
    value: String,
    comments: Vec<String>,
}

impl StringElement {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        StringElement {
            key: key.into(),
            path: None,
            value: value.into(),
            comments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full path of this element, or an empty string while it is detached.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.path.is_some()
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    #[inline]
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.comments
    }
}

/// A key with an ordered list of string values.
///
/// Each value is a [`StringElement`] whose key is its index, so `Tags:2` addresses the
/// third value of `Tags`.
///
/// # Examples
///
/// ```rust
/// use cfgtext::ArrayElement;
///
/// let mut tags = ArrayElement::from_values("Tags", ["red", "green"]);
/// tags.push("blue,purple");
///
/// assert_eq!(tags.len(), 3);
/// assert_eq!(tags["2"], "blue,purple");
/// assert_eq!(tags.values().collect::<Vec<_>>(), vec!["red", "green", "blue,purple"]);
/// assert!(tags[7].is_invalid());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayElement {
    key: String,
    path: Option<String>,
    delimiter: char,
    // Always `Element::String`.
    values: Vec<Element>,
    comments: Vec<String>,
}

impl ArrayElement {
    pub fn new(key: impl Into<String>) -> Self {
        ArrayElement {
            key: key.into(),
            path: None,
            delimiter: syntax::KEY_DELIMITER,
            values: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Creates an array holding `values` in order.
    pub fn from_values<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut array = ArrayElement::new(key);
        for value in values {
            array.push(value);
        }
        array
    }

    #[must_use]
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full path of this element, or an empty string while it is detached.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.path.is_some()
    }

    #[inline]
    #[must_use]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    #[inline]
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.comments
    }

    /// Appends a value, keyed by its index.
    ///
    /// Values of a detached array stay detached until the array is added to a section.
    pub fn push(&mut self, value: impl Into<String>) -> &mut Self {
        let key = self.values.len().to_string();
        let path = self
            .path
            .as_deref()
            .map(|parent| path::join_unchecked(parent, &key, self.delimiter));
        self.values.push(Element::String(StringElement {
            key,
            path,
            value: value.into(),
            comments: Vec::new(),
        }));
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StringElement> {
        self.values.get(index).and_then(Element::as_string)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<ElementMut<'_, StringElement>> {
        self.values
            .get_mut(index)
            .and_then(Element::as_string_mut)
            .map(ElementMut::new)
    }

    /// Looks up a value by its key, which is its index written in decimal.
    #[must_use]
    pub fn try_get(&self, key: &str) -> &Element {
        key.parse::<usize>()
            .ok()
            .and_then(|index| self.values.get(index))
            .unwrap_or(&INVALID)
    }

    /// Iterates over the values as text.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.elements().map(StringElement::value)
    }

    pub fn elements(&self) -> impl Iterator<Item = &StringElement> + '_ {
        self.values.iter().filter_map(Element::as_string)
    }

    pub(crate) fn as_elements(&self) -> &[Element] {
        &self.values
    }
}

impl Index<usize> for ArrayElement {
    type Output = Element;

    /// Returns [`Element::Invalid`] when `index` is out of range.
    fn index(&self, index: usize) -> &Element {
        self.values.get(index).unwrap_or(&INVALID)
    }
}

impl Index<&str> for ArrayElement {
    type Output = Element;

    fn index(&self, key: &str) -> &Element {
        self.try_get(key)
    }
}

/// A key with uniquely-keyed children.
///
/// Keys are compared with the section's [`KeyComparer`]. Sections created through
/// [`add_section`](SectionElement::add_section) inherit the comparer of their parent.
///
/// # Examples
///
/// ```rust
/// use cfgtext::{Error, SectionElement};
///
/// let mut server = SectionElement::new("Server");
/// server.add_string("Host", "localhost").unwrap();
/// server.add_array("Ports", ["80", "443"]).unwrap();
///
/// assert_eq!(server["Host"], "localhost");
/// assert_eq!(server.try_find("Ports:1"), "443");
/// assert!(matches!(
///     server.add_string("Host", "example.com"),
///     Err(Error::DuplicateKey { .. })
/// ));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SectionElement {
    key: String,
    path: Option<String>,
    delimiter: char,
    children: KeyMap,
    comments: Vec<String>,
}

impl SectionElement {
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_comparer(key, KeyComparer::default())
    }

    pub fn with_comparer(key: impl Into<String>, comparer: KeyComparer) -> Self {
        SectionElement {
            key: key.into(),
            path: None,
            delimiter: syntax::KEY_DELIMITER,
            children: KeyMap::with_comparer(comparer),
            comments: Vec::new(),
        }
    }

    /// A document root: empty key, empty path, already attached.
    pub(crate) fn root(comparer: KeyComparer, delimiter: char) -> Self {
        SectionElement {
            key: String::new(),
            path: Some(String::new()),
            delimiter,
            children: KeyMap::with_comparer(comparer),
            comments: Vec::new(),
        }
    }

    /// A section whose final path is already known. Only [`adopt`](Self::adopt) may
    /// place it in its parent.
    pub(crate) fn at_path(
        key: String,
        path: String,
        comparer: KeyComparer,
        delimiter: char,
    ) -> Self {
        SectionElement {
            key,
            path: Some(path),
            delimiter,
            children: KeyMap::with_comparer(comparer),
            comments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full path of this element, or an empty string while it is detached.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.path.is_some()
    }

    #[inline]
    #[must_use]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    #[inline]
    #[must_use]
    pub fn comparer(&self) -> KeyComparer {
        self.children.comparer()
    }

    #[inline]
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.comments
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &KeyMap {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    /// Returns the direct child with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Element> {
        self.children.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<ElementMut<'_>> {
        self.children.get_mut(key).map(ElementMut::new)
    }

    /// Returns the direct child with the given key, or [`Element::Invalid`].
    #[must_use]
    pub fn try_get(&self, key: &str) -> &Element {
        self.children.get(key).unwrap_or(&INVALID)
    }

    /// Follows a delimiter-separated path from this section.
    ///
    /// Returns [`Element::Invalid`] if any segment is missing or the path ends with the
    /// delimiter.
    #[must_use]
    pub fn try_find(&self, path: &str) -> &Element {
        match path::split_first(path, self.delimiter) {
            None => self.try_get(path),
            Some((_, "")) => &INVALID,
            Some((head, rest)) => self.try_get(head).try_find(rest),
        }
    }

    /// Follows a delimiter-separated path from this section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no element exists at `path`.
    pub fn find(&self, path: &str) -> Result<&Element> {
        match self.try_find(path) {
            Element::Invalid => Err(Error::key_not_found(path)),
            found => Ok(found),
        }
    }

    /// Mutable version of [`find`](Self::find).
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no element exists at `path`.
    pub fn find_mut(&mut self, path: &str) -> Result<ElementMut<'_>> {
        let found = match path::split_first(path, self.delimiter) {
            None => self
                .children
                .get_mut(path)
                .ok_or_else(|| Error::key_not_found(path))?,
            Some((_, "")) => return Err(Error::key_not_found(path)),
            Some((head, rest)) => self
                .children
                .get_mut(head)
                .ok_or_else(|| Error::key_not_found(path))?
                .find_element_mut(rest)
                .map_err(|_| Error::key_not_found(path))?,
        };
        Ok(ElementMut::new(found))
    }

    /// Attaches `element` as a child of this section and returns it in its new place.
    ///
    /// If this section belongs to a document, the element's path and the paths of
    /// everything below it are assigned here. Under a detached section they stay unset
    /// until that section is added to a document. Descendants take on this section's path
    /// delimiter either way.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidElementAccess`] if `element` is [`Element::Invalid`]
    /// - [`Error::AlreadyAttached`] if `element` already belongs to a parent
    /// - [`Error::InvalidKey`] if its key, or the key of any descendant, contains the
    ///   delimiter
    /// - [`Error::DuplicateKey`] if a sibling with an equal key exists
    pub fn add(&mut self, element: impl Into<Element>) -> Result<ElementMut<'_>> {
        let mut element = element.into();
        match &element {
            Element::Invalid => {
                return Err(Error::invalid_access(ElementKind::Invalid, "add the element"))
            }
            attached if attached.is_attached() => {
                return Err(Error::already_attached(attached.raw_key()))
            }
            _ => {}
        }

        let key = element.raw_key().to_string();
        let path = path::join(self.path(), &key, self.delimiter)?;
        if self.children.contains_key(&key) {
            return Err(Error::duplicate_key(&path));
        }
        let assigned = self.path.as_ref().map(|_| path.clone());
        element.attach(assigned, self.delimiter)?;
        self.children
            .insert_new(&key, element)
            .map(ElementMut::new)
            .map_err(|_| Error::duplicate_key(&path))
    }

    /// Adds a [`StringElement`] and returns it.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub fn add_string(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<ElementMut<'_, StringElement>> {
        match self.add(StringElement::new(key, value))?.into_inner() {
            Element::String(added) => Ok(ElementMut::new(added)),
            other => Err(Error::invalid_access(other.kind(), "add a string")),
        }
    }

    /// Adds an [`ArrayElement`] holding `values` and returns it.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub fn add_array<I, S>(
        &mut self,
        key: impl Into<String>,
        values: I,
    ) -> Result<ElementMut<'_, ArrayElement>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.add(ArrayElement::from_values(key, values))?.into_inner() {
            Element::Array(added) => Ok(ElementMut::new(added)),
            other => Err(Error::invalid_access(other.kind(), "add an array")),
        }
    }

    /// Adds an empty [`SectionElement`] using this section's comparer and returns it.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub fn add_section(&mut self, key: impl Into<String>) -> Result<ElementMut<'_, SectionElement>> {
        let section = SectionElement::with_comparer(key, self.comparer());
        match self.add(section)?.into_inner() {
            Element::Section(added) => Ok(ElementMut::new(added)),
            other => Err(Error::invalid_access(other.kind(), "add a section")),
        }
    }

    /// Places a section built by [`at_path`](Self::at_path) under this one.
    pub(crate) fn adopt(&mut self, section: SectionElement) -> Result<()> {
        let key = section.key.clone();
        self.children
            .insert_new(&key, Element::Section(section))
            .map(|_| ())
            .map_err(|_| {
                Error::duplicate_key(&path::join_unchecked(self.path(), &key, self.delimiter))
            })
    }

    /// Iterates over `(key, child)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> + '_ {
        self.children.iter()
    }
}

impl Index<&str> for SectionElement {
    type Output = Element;

    /// Returns [`Element::Invalid`] when there is no child with `key`.
    fn index(&self, key: &str) -> &Element {
        self.try_get(key)
    }
}

/// Any node of the document tree.
///
/// # Examples
///
/// ```rust
/// use cfgtext::{Element, ElementKind, StringElement};
///
/// let element = Element::from(StringElement::new("Name", "Alice"));
/// assert_eq!(element.kind(), ElementKind::String);
/// assert_eq!(element.value().unwrap(), "Alice");
/// assert!(element.find("anything").is_err());
///
/// let missing = Element::Invalid;
/// assert!(missing.key().is_err());
/// assert_eq!(missing.value_or("n/a"), "n/a");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    String(StringElement),
    Array(ArrayElement),
    Section(SectionElement),
    /// No element. Returned by lookups that do not fail.
    Invalid,
}

impl Element {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Element::String(_) => ElementKind::String,
            Element::Array(_) => ElementKind::Array,
            Element::Section(_) => ElementKind::Section,
            Element::Invalid => ElementKind::Invalid,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Element::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Element::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_section(&self) -> bool {
        matches!(self, Element::Section(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Element::Invalid)
    }

    #[inline]
    #[must_use]
    pub fn as_string(&self) -> Option<&StringElement> {
        match self {
            Element::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayElement> {
        match self {
            Element::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_section(&self) -> Option<&SectionElement> {
        match self {
            Element::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_string_mut(&mut self) -> Option<&mut StringElement> {
        match self {
            Element::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayElement> {
        match self {
            Element::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_section_mut(&mut self) -> Option<&mut SectionElement> {
        match self {
            Element::Section(s) => Some(s),
            _ => None,
        }
    }

    /// Fails if this is [`Element::Invalid`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidElementAccess`] for the invalid element.
    pub fn ensure_valid(&self) -> Result<&Element> {
        match self {
            Element::Invalid => Err(Error::invalid_access(ElementKind::Invalid, "use the element")),
            valid => Ok(valid),
        }
    }

    /// The key, or an empty string for the invalid element.
    pub(crate) fn raw_key(&self) -> &str {
        match self {
            Element::String(s) => &s.key,
            Element::Array(a) => &a.key,
            Element::Section(s) => &s.key,
            Element::Invalid => "",
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidElementAccess`] for the invalid element.
    pub fn key(&self) -> Result<&str> {
        self.ensure_valid()
            .map_err(|_| Error::invalid_access(ElementKind::Invalid, "read the key"))
            .map(Element::raw_key)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidElementAccess`] for the invalid element.
    pub fn path(&self) -> Result<&str> {
        match self {
            Element::String(s) => Ok(s.path()),
            Element::Array(a) => Ok(a.path()),
            Element::Section(s) => Ok(s.path()),
            Element::Invalid => Err(Error::invalid_access(ElementKind::Invalid, "read the path")),
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        match self {
            Element::String(s) => s.is_attached(),
            Element::Array(a) => a.is_attached(),
            Element::Section(s) => s.is_attached(),
            Element::Invalid => false,
        }
    }

    /// The path delimiter of a section or array.
    #[must_use]
    pub fn delimiter(&self) -> Option<char> {
        match self {
            Element::Array(a) => Some(a.delimiter),
            Element::Section(s) => Some(s.delimiter),
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidElementAccess`] for the invalid element.
    pub fn comments(&self) -> Result<&[String]> {
        match self {
            Element::String(s) => Ok(&s.comments),
            Element::Array(a) => Ok(&a.comments),
            Element::Section(s) => Ok(&s.comments),
            Element::Invalid => Err(Error::invalid_access(
                ElementKind::Invalid,
                "read the comments",
            )),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidElementAccess`] for the invalid element.
    pub fn comments_mut(&mut self) -> Result<&mut Vec<String>> {
        match self {
            Element::String(s) => Ok(&mut s.comments),
            Element::Array(a) => Ok(&mut a.comments),
            Element::Section(s) => Ok(&mut s.comments),
            Element::Invalid => Err(Error::invalid_access(
                ElementKind::Invalid,
                "change the comments",
            )),
        }
    }

    /// The value of a string element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidElementAccess`] unless this is a string element.
    pub fn value(&self) -> Result<&str> {
        match self {
            Element::String(s) => Ok(&s.value),
            other => Err(Error::invalid_access(other.kind(), "read the value")),
        }
    }

    /// The value of a string element, or `placeholder` for any other element.
    #[must_use]
    pub fn value_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self {
            Element::String(s) => &s.value,
            _ => placeholder,
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidElementAccess`] unless this is a string element.
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        match self {
            Element::String(s) => {
                s.set_value(value);
                Ok(())
            }
            other => Err(Error::invalid_access(other.kind(), "set the value")),
        }
    }

    /// Number of direct children. Zero for strings and the invalid element.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Element::Array(a) => a.len(),
            Element::Section(s) => s.len(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the direct child with the given key. Array children are keyed by index.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Element> {
        match self {
            Element::Section(s) => s.get(key),
            Element::Array(a) => Some(a.try_get(key)).filter(|e| !e.is_invalid()),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<ElementMut<'_>> {
        self.child_mut(key).map(ElementMut::new)
    }

    fn child_mut(&mut self, key: &str) -> Option<&mut Element> {
        match self {
            Element::Section(s) => s.children.get_mut(key),
            Element::Array(a) => key
                .parse::<usize>()
                .ok()
                .and_then(|index| a.values.get_mut(index)),
            _ => None,
        }
    }

    /// Returns the direct child with the given key, or [`Element::Invalid`].
    #[must_use]
    pub fn try_get(&self, key: &str) -> &Element {
        self.get(key).unwrap_or(&INVALID)
    }

    /// Follows a delimiter-separated path, returning [`Element::Invalid`] if it does not
    /// lead anywhere.
    #[must_use]
    pub fn try_find(&self, path: &str) -> &Element {
        let mut current = self;
        let mut rest = path;
        loop {
            let Some(delimiter) = current.delimiter() else {
                return &INVALID;
            };
            match path::split_first(rest, delimiter) {
                None => return current.try_get(rest),
                Some((_, "")) => return &INVALID,
                Some((head, tail)) => {
                    current = current.try_get(head);
                    rest = tail;
                }
            }
        }
    }

    /// Follows a delimiter-separated path.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidElementAccess`] if this element has no children to search
    /// - [`Error::KeyNotFound`] if nothing exists at `path`
    pub fn find(&self, path: &str) -> Result<&Element> {
        if self.delimiter().is_none() {
            return Err(Error::invalid_access(self.kind(), "look up a child"));
        }
        match self.try_find(path) {
            Element::Invalid => Err(Error::key_not_found(path)),
            found => Ok(found),
        }
    }

    /// Mutable version of [`find`](Self::find).
    ///
    /// # Errors
    ///
    /// Same as [`find`](Self::find).
    pub fn find_mut(&mut self, path: &str) -> Result<ElementMut<'_>> {
        self.find_element_mut(path).map(ElementMut::new)
    }

    fn find_element_mut(&mut self, path: &str) -> Result<&mut Element> {
        if self.delimiter().is_none() {
            return Err(Error::invalid_access(self.kind(), "look up a child"));
        }
        let mut current = self;
        let mut rest = path;
        loop {
            let delimiter = current
                .delimiter()
                .ok_or_else(|| Error::key_not_found(path))?;
            match path::split_first(rest, delimiter) {
                None => {
                    return current
                        .child_mut(rest)
                        .ok_or_else(|| Error::key_not_found(path))
                }
                Some((_, "")) => return Err(Error::key_not_found(path)),
                Some((head, tail)) => {
                    current = current
                        .child_mut(head)
                        .ok_or_else(|| Error::key_not_found(path))?;
                    rest = tail;
                }
            }
        }
    }

    /// Gives this element and everything below it `delimiter`, and paths under `path`
    /// when there is one.
    fn attach(&mut self, path: Option<String>, delimiter: char) -> Result<()> {
        if self.delimiter().is_some_and(|d| d != delimiter) {
            self.check_descendant_keys(delimiter)?;
        }

        let mut pending: Vec<(&mut Element, Option<String>)> = vec![(self, path)];
        while let Some((element, path)) = pending.pop() {
            let below =
                |key: &str| path.as_deref().map(|p| path::join_unchecked(p, key, delimiter));
            match element {
                Element::String(s) => s.path = path,
                Element::Array(a) => {
                    a.delimiter = delimiter;
                    for value in a.values.iter_mut() {
                        if let Element::String(s) = value {
                            s.path = below(&s.key);
                        }
                    }
                    a.path = path;
                }
                Element::Section(s) => {
                    s.delimiter = delimiter;
                    for child in s.children.values_mut() {
                        let child_path = below(child.raw_key());
                        pending.push((child, child_path));
                    }
                    s.path = path;
                }
                Element::Invalid => {}
            }
        }
        Ok(())
    }

    fn check_descendant_keys(&self, delimiter: char) -> Result<()> {
        let mut pending = vec![self];
        while let Some(element) = pending.pop() {
            if let Element::Section(s) = element {
                for child in &s.children {
                    path::check_key(child.raw_key(), delimiter)?;
                    pending.push(child);
                }
            }
        }
        Ok(())
    }
}

/// Mutable access to an element that belongs to a tree.
///
/// Reading goes through [`Deref`]. Editing is limited to values, comments and new
/// children, so the key and path an element received when it was added stay as they
/// are. There is no `DerefMut`: an element in a tree cannot be swapped for another.
///
/// # Examples
///
/// ```rust
/// use cfgtext::from_str;
///
/// let mut doc = from_str("A=1\nTags=[x, y]\n").unwrap();
/// let mut root = doc.root_mut();
///
/// let mut a = root.get_mut("A").unwrap();
/// a.set_value("one").unwrap();
/// a.comments_mut().unwrap().push(" edited".to_string());
/// assert_eq!(a.path().unwrap(), "A");
///
/// let mut tags = root.get_mut("Tags").and_then(|e| e.into_array()).unwrap();
/// tags.push("z");
/// assert_eq!(tags.get(2).unwrap().path(), "Tags:2");
/// ```
///
/// Replacing the element itself does not compile:
///
/// ```compile_fail
/// use cfgtext::{from_str, Element, StringElement};
///
/// let mut doc = from_str("A=1\nB=2\n").unwrap();
/// let mut root = doc.root_mut();
/// let mut a = root.get_mut("A").unwrap();
/// *a = Element::from(StringElement::new("B", "swapped"));
/// ```
#[derive(Debug)]
pub struct ElementMut<'a, T = Element> {
    inner: &'a mut T,
}

impl<'a, T> ElementMut<'a, T> {
    pub(crate) fn new(inner: &'a mut T) -> Self {
        ElementMut { inner }
    }

    pub(crate) fn into_inner(self) -> &'a mut T {
        self.inner
    }
}

impl<T> Deref for ElementMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.inner
    }
}

impl<'a> ElementMut<'a, Element> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidElementAccess`] unless this is a string element.
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        self.inner.set_value(value)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidElementAccess`] for the invalid element.
    pub fn comments_mut(&mut self) -> Result<&mut Vec<String>> {
        self.inner.comments_mut()
    }

    pub fn get_mut(&mut self, key: &str) -> Option<ElementMut<'_>> {
        self.inner.get_mut(key)
    }

    /// # Errors
    ///
    /// Same as [`Element::find`].
    pub fn find_mut(&mut self, path: &str) -> Result<ElementMut<'_>> {
        self.inner.find_mut(path)
    }

    #[must_use]
    pub fn into_string(self) -> Option<ElementMut<'a, StringElement>> {
        self.inner.as_string_mut().map(ElementMut::new)
    }

    #[must_use]
    pub fn into_array(self) -> Option<ElementMut<'a, ArrayElement>> {
        self.inner.as_array_mut().map(ElementMut::new)
    }

    #[must_use]
    pub fn into_section(self) -> Option<ElementMut<'a, SectionElement>> {
        self.inner.as_section_mut().map(ElementMut::new)
    }
}

impl ElementMut<'_, StringElement> {
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.inner.set_value(value);
    }

    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.inner.comments
    }
}

impl ElementMut<'_, ArrayElement> {
    /// Appends a value, keyed by its index.
    pub fn push(&mut self, value: impl Into<String>) -> &mut Self {
        self.inner.push(value);
        self
    }

    pub fn get_mut(&mut self, index: usize) -> Option<ElementMut<'_, StringElement>> {
        self.inner.get_mut(index)
    }

    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.inner.comments
    }
}

impl ElementMut<'_, SectionElement> {
    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.inner.comments
    }

    pub fn get_mut(&mut self, key: &str) -> Option<ElementMut<'_>> {
        self.inner.get_mut(key)
    }

    /// # Errors
    ///
    /// Same as [`SectionElement::find_mut`].
    pub fn find_mut(&mut self, path: &str) -> Result<ElementMut<'_>> {
        self.inner.find_mut(path)
    }

    /// # Errors
    ///
    /// Same as [`SectionElement::add`].
    pub fn add(&mut self, element: impl Into<Element>) -> Result<ElementMut<'_>> {
        self.inner.add(element)
    }

    /// # Errors
    ///
    /// Same as [`SectionElement::add`].
    pub fn add_string(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<ElementMut<'_, StringElement>> {
        self.inner.add_string(key, value)
    }

    /// # Errors
    ///
    /// Same as [`SectionElement::add`].
    pub fn add_array<I, S>(
        &mut self,
        key: impl Into<String>,
        values: I,
    ) -> Result<ElementMut<'_, ArrayElement>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.add_array(key, values)
    }

    /// # Errors
    ///
    /// Same as [`SectionElement::add`].
    pub fn add_section(&mut self, key: impl Into<String>) -> Result<ElementMut<'_, SectionElement>> {
        self.inner.add_section(key)
    }
}

impl From<StringElement> for Element {
    fn from(element: StringElement) -> Self {
        Element::String(element)
    }
}

impl From<ArrayElement> for Element {
    fn from(element: ArrayElement) -> Self {
        Element::Array(element)
    }
}

impl From<SectionElement> for Element {
    fn from(element: SectionElement) -> Self {
        Element::Section(element)
    }
}

impl Index<&str> for Element {
    type Output = Element;

    /// Returns [`Element::Invalid`] when there is no child with `key`.
    fn index(&self, key: &str) -> &Element {
        self.try_get(key)
    }
}

impl Index<usize> for Element {
    type Output = Element;

    /// Returns [`Element::Invalid`] unless this is an array with a value at `index`.
    fn index(&self, index: usize) -> &Element {
        match self {
            Element::Array(a) => &a[index],
            _ => &INVALID,
        }
    }
}

impl PartialEq<str> for Element {
    /// A string element equals its value. No other element equals any string.
    fn eq(&self, other: &str) -> bool {
        matches!(self, Element::String(s) if s.value == other)
    }
}

impl PartialEq<&str> for Element {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl PartialEq<str> for StringElement {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for StringElement {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl Serialize for StringElement {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

impl Serialize for ArrayElement {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for value in self.values() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl Serialize for SectionElement {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.children.len()))?;
        for (key, child) in self.children.iter() {
            map.serialize_entry(key, child)?;
        }
        map.end()
    }
}

impl Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Element::String(s) => s.serialize(serializer),
            Element::Array(a) => a.serialize(serializer),
            Element::Section(s) => s.serialize(serializer),
            Element::Invalid => serializer.serialize_unit(),
        }
    }
}
