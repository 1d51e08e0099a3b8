//! Ordered child map used by sections.
//!
//! This module provides [`KeyMap`], a wrapper around [`IndexMap`] that keeps the children
//! of a [`SectionElement`](crate::SectionElement) in insertion order and compares keys
//! with a configurable [`KeyComparer`].
//!
//! ## Why IndexMap?
//!
//! Saving a document walks each section's children in the order they were added, so
//! a loaded file is written back with its entries in their original order.
//!
//! ## Examples
//!
//! ```rust
//! use cfgtext::{KeyComparer, SectionElement};
//!
//! let mut section = SectionElement::with_comparer("Server", KeyComparer::IgnoreCase);
//! section.add_string("Port", "8080").unwrap();
//!
//! assert!(section.children().contains_key("PORT"));
//! assert_eq!(section.children().keys().collect::<Vec<_>>(), vec!["Port"]);
//! ```

use crate::element::Element;
use indexmap::IndexMap;
use std::borrow::Cow;

/// How keys are compared within one section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum KeyComparer {
    /// Keys match only if they are identical.
    #[default]
    Ordinal,
    /// Keys match if they are equal after lowercasing.
    IgnoreCase,
}

impl KeyComparer {
    /// Returns the form of `key` used for lookups.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgtext::KeyComparer;
    ///
    /// assert_eq!(KeyComparer::Ordinal.normalize("Port"), "Port");
    /// assert_eq!(KeyComparer::IgnoreCase.normalize("Port"), "port");
    /// ```
    #[inline]
    #[must_use]
    pub fn normalize<'k>(self, key: &'k str) -> Cow<'k, str> {
        match self {
            KeyComparer::Ordinal => Cow::Borrowed(key),
            KeyComparer::IgnoreCase => Cow::Owned(key.to_lowercase()),
        }
    }
}

/// An insertion-ordered map from child key to [`Element`].
///
/// Each child keeps its key as written; the map itself is indexed by the key normalized
/// through its [`KeyComparer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMap {
    comparer: KeyComparer,
    entries: IndexMap<String, Element>,
}

impl KeyMap {
    /// Creates an empty map using ordinal comparison.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_comparer(comparer: KeyComparer) -> Self {
        KeyMap {
            comparer,
            entries: IndexMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn comparer(&self) -> KeyComparer {
        self.comparer
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Element> {
        self.entries.get(self.comparer.normalize(key).as_ref())
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Element> {
        let normalized = self.comparer.normalize(key);
        self.entries.get_mut(normalized.as_ref())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .contains_key(self.comparer.normalize(key).as_ref())
    }

    /// Inserts `element` under `key` unless an equal key is already present.
    ///
    /// On a collision the element is handed back unchanged.
    pub(crate) fn insert_new(
        &mut self,
        key: &str,
        element: Element,
    ) -> std::result::Result<&mut Element, Element> {
        use indexmap::map::Entry;

        match self.entries.entry(self.comparer.normalize(key).into_owned()) {
            Entry::Occupied(_) => Err(element),
            Entry::Vacant(slot) => Ok(slot.insert(element)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the keys of the children as written, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.values().map(Element::raw_key)
    }

    /// Returns the children in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Element> {
        self.entries.values()
    }

    pub(crate) fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, Element> {
        self.entries.values_mut()
    }

    /// Returns `(key, child)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> + '_ {
        self.entries.values().map(|e| (e.raw_key(), e))
    }
}

impl<'a> IntoIterator for &'a KeyMap {
    type Item = &'a Element;
    type IntoIter = indexmap::map::Values<'a, String, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
