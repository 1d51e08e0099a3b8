//! Helpers for delimiter-joined element paths.

use crate::{Error, Result};

/// Joins `parent` and `key` with `delimiter`.
///
/// An empty `parent` yields `key` unchanged, and a `parent` that already ends in the
/// delimiter is not given a second one.
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] if `key` contains the delimiter.
///
/// # Examples
///
/// ```rust
/// use cfgtext::path::join;
///
/// assert_eq!(join("Server", "Port", ':').unwrap(), "Server:Port");
/// assert_eq!(join("Server:", "Port", ':').unwrap(), "Server:Port");
/// assert_eq!(join("", "Port", ':').unwrap(), "Port");
/// assert!(join("Server", "Po:rt", ':').is_err());
/// ```
pub fn join(parent: &str, key: &str, delimiter: char) -> Result<String> {
    check_key(key, delimiter)?;
    Ok(join_unchecked(parent, key, delimiter))
}

/// Fails if `key` contains `delimiter`.
#[inline]
pub fn check_key(key: &str, delimiter: char) -> Result<()> {
    if key.contains(delimiter) {
        Err(Error::invalid_key(key, delimiter))
    } else {
        Ok(())
    }
}

pub(crate) fn join_unchecked(parent: &str, key: &str, delimiter: char) -> String {
    if parent.is_empty() {
        return key.to_string();
    }
    let mut joined = String::with_capacity(parent.len() + key.len() + 1);
    joined.push_str(parent);
    if !parent.ends_with(delimiter) {
        joined.push(delimiter);
    }
    joined.push_str(key);
    joined
}

/// Splits off the first segment of `path`.
///
/// Returns `None` when `path` has no delimiter. A trailing delimiter leaves an empty
/// remainder, which never names an element.
///
/// # Examples
///
/// ```rust
/// use cfgtext::path::split_first;
///
/// assert_eq!(split_first("a:b:c", ':'), Some(("a", "b:c")));
/// assert_eq!(split_first("a:", ':'), Some(("a", "")));
/// assert_eq!(split_first("a", ':'), None);
/// ```
#[inline]
#[must_use]
pub fn split_first(path: &str, delimiter: char) -> Option<(&str, &str)> {
    path.split_once(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joining() {
        assert_eq!(join("Path", "Key", ':').unwrap(), "Path:Key");
        assert_eq!(join("Path:", "Key", ':').unwrap(), "Path:Key");
        assert_eq!(join("Path:Path2", "Key", ':').unwrap(), "Path:Path2:Key");
        assert_eq!(join("Path:Path2:", "Key", ':').unwrap(), "Path:Path2:Key");
        assert_eq!(join("", "Key", ':').unwrap(), "Key");
        assert!(matches!(
            join("Path", "Ke:y", ':'),
            Err(Error::InvalidKey { delimiter: ':', .. })
        ));
    }

    #[test]
    fn test_custom_delimiter() {
        assert_eq!(join("a", "b:c", '/').unwrap(), "a/b:c");
        assert!(join("a", "b/c", '/').is_err());
    }
}
