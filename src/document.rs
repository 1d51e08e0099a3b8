//! The loaded form of a configuration file.
//!
//! A [`Document`] owns the root [`SectionElement`] of the element tree. Besides tree access
//! it offers a flat view of the tree: every string value, including each value of an
//! array, paired with its full path.
//!
//! ## Examples
//!
//! ```rust
//! use cfgtext::from_str;
//!
//! let doc = from_str("Name=Alice\nTags=[red, green]\nServer {\n\tPort=8080\n}\n").unwrap();
//!
//! assert_eq!(doc.get("Server:Port"), Some("8080"));
//! assert_eq!(doc["Tags"]["1"], "green");
//!
//! let flat: Vec<_> = doc.leaves().collect();
//! assert_eq!(
//!     flat,
//!     vec![
//!         ("Name", "Alice"),
//!         ("Tags:0", "red"),
//!         ("Tags:1", "green"),
//!         ("Server:Port", "8080"),
//!     ]
//! );
//! ```

use crate::element::{Element, ElementMut, SectionElement};
use crate::map::KeyComparer;
use crate::options::LoadOptions;
use crate::syntax;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::ops::Index;
use std::slice;

/// A configuration document: a root section and everything below it.
///
/// The root has an empty key and path and is never written out itself; saving a document
/// writes only the root's children.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    root: SectionElement,
}

impl Default for Document {
    fn default() -> Self {
        Document::with_comparer(KeyComparer::default())
    }
}

impl Document {
    /// Creates an empty document with ordinal key comparison and `:` paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_comparer(comparer: KeyComparer) -> Self {
        Document {
            root: SectionElement::root(comparer, syntax::KEY_DELIMITER),
        }
    }

    /// Creates an empty document using the comparer and delimiter from `options`.
    #[must_use]
    pub fn with_options(options: &LoadOptions) -> Self {
        Document {
            root: SectionElement::root(options.comparer, options.delimiter),
        }
    }

    pub(crate) fn from_root(root: SectionElement) -> Self {
        Document { root }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &SectionElement {
        &self.root
    }

    /// Mutable access to the root for adding children and editing values.
    #[inline]
    pub fn root_mut(&mut self) -> ElementMut<'_, SectionElement> {
        ElementMut::new(&mut self.root)
    }

    /// Returns the value of the string element at `path`.
    ///
    /// Sections, arrays and missing paths all give `None`. Array values are reachable
    /// by index, as in `"Tags:0"`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.root.try_find(path).as_string().map(|s| s.value())
    }

    /// Replaces the value of the string element at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::KeyNotFound`] if nothing exists at `path`
    /// - [`Error::InvalidElementAccess`] if the element there is a section or an array
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgtext::from_str;
    ///
    /// let mut doc = from_str("Port=80\n").unwrap();
    /// doc.set("Port", "8080").unwrap();
    /// assert_eq!(doc.get("Port"), Some("8080"));
    /// assert!(doc.set("Host", "localhost").is_err());
    /// ```
    pub fn set(&mut self, path: &str, value: impl Into<String>) -> Result<()> {
        self.root.find_mut(path)?.set_value(value)
    }

    /// Iterates over `(path, value)` for every string in the tree, arrays expanded, in
    /// the order the elements were added.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            sections: vec![self.root.children().values()],
            array: None,
        }
    }

    /// Flattens the document into a path to value map.
    #[must_use]
    pub fn to_map(&self) -> IndexMap<String, String> {
        self.leaves()
            .map(|(path, value)| (path.to_string(), value.to_string()))
            .collect()
    }

    /// Adds every leaf of this document to `map`.
    ///
    /// With `overwrite` set, a path already in `map` takes this document's value.
    ///
    /// # Errors
    ///
    /// Without `overwrite`, returns [`Error::DuplicateKey`] at the first path already in
    /// `map`. Entries added before the collision stay in `map`.
    pub fn fill_map(&self, map: &mut IndexMap<String, String>, overwrite: bool) -> Result<()> {
        for (path, value) in self.leaves() {
            if !overwrite && map.contains_key(path) {
                return Err(Error::duplicate_key(path));
            }
            map.insert(path.to_string(), value.to_string());
        }
        Ok(())
    }

    /// Flattens several documents into one map, in order.
    ///
    /// # Errors
    ///
    /// Same as [`fill_map`](Self::fill_map).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgtext::{from_str, Document};
    ///
    /// let base = from_str("Port=80\nHost=localhost\n").unwrap();
    /// let local = from_str("Port=8080\n").unwrap();
    ///
    /// let merged = Document::merge_maps([&base, &local], true).unwrap();
    /// assert_eq!(merged["Port"], "8080");
    /// assert_eq!(merged["Host"], "localhost");
    ///
    /// assert!(Document::merge_maps([&base, &local], false).is_err());
    /// ```
    pub fn merge_maps<'d, I>(docs: I, overwrite: bool) -> Result<IndexMap<String, String>>
    where
        I: IntoIterator<Item = &'d Document>,
    {
        let mut map = IndexMap::new();
        for doc in docs {
            doc.fill_map(&mut map, overwrite)?;
        }
        Ok(map)
    }
}

impl Index<&str> for Document {
    type Output = Element;

    /// Follows `path` from the root, giving [`Element::Invalid`] when it leads nowhere.
    fn index(&self, path: &str) -> &Element {
        self.root.try_find(path)
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.root.serialize(serializer)
    }
}

/// Iterator returned by [`Document::leaves`].
///
/// Walks the tree with an explicit stack, so nesting depth is not limited by the call
/// stack.
pub struct Leaves<'a> {
    sections: Vec<indexmap::map::Values<'a, String, Element>>,
    array: Option<slice::Iter<'a, Element>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(values) = &mut self.array {
                if let Some(s) = values.find_map(Element::as_string) {
                    return Some((s.path(), s.value()));
                }
                self.array = None;
            }

            let children = self.sections.last_mut()?;
            match children.next() {
                None => {
                    self.sections.pop();
                }
                Some(Element::String(s)) => return Some((s.path(), s.value())),
                Some(Element::Array(a)) => self.array = Some(a.as_elements().iter()),
                Some(Element::Section(s)) => self.sections.push(s.children().values()),
                Some(Element::Invalid) => {}
            }
        }
    }
}
