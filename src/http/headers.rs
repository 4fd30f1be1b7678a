//! Ordered, case-insensitive, multi-valued header map.

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Maximum inline header names before heap allocation.
/// Most responses carry ≤16 distinct headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Values stored under one header name, in insertion order.
pub type HeaderValues = SmallVec<[String; 2]>;

/// Header multimap preserving the insertion order of names and of values.
///
/// Names are compared case-insensitively (RFC 7230) but keep the spelling used
/// when they were first inserted. Header names use `Arc<str>` because the same
/// handful of names is repeated across every response.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: SmallVec<[(Arc<str>, HeaderValues); MAX_INLINE_HEADERS]>,
}

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// All values stored under `name`.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|i| self.entries[i].1.as_slice())
    }

    /// First value stored under `name`.
    #[inline]
    #[must_use]
    pub fn get_first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Values joined with `", "`, as they would appear folded on one line.
    #[must_use]
    pub fn get_line(&self, name: &str) -> Option<String> {
        self.get(name).map(|values| values.join(", "))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Replace every value of `name` with `value`.
    ///
    /// An existing header keeps its position in the ordering.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let mut values = HeaderValues::new();
        values.push(value.into());
        match self.position(name) {
            Some(i) => self.entries[i].1 = values,
            None => self.entries.push((Arc::from(name), values)),
        }
    }

    /// Add `value` after any existing values of `name`.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(i) => self.entries[i].1.push(value.into()),
            None => {
                let mut values = HeaderValues::new();
                values.push(value.into());
                self.entries.push((Arc::from(name), values));
            }
        }
    }

    /// Remove `name`; returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Iterate over `(name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_ref(), values.as_slice()))
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name.as_ref(), value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/html");
        assert_eq!(headers.get_first("content-type"), Some("text/html"));
        assert!(headers.contains("CONTENT-TYPE"));
    }

    #[test]
    fn test_append_preserves_value_order() {
        let mut headers = Headers::new();
        headers.append("Set-Cookie", "a=1");
        headers.append("set-cookie", "b=2");
        assert_eq!(headers.get("Set-Cookie").unwrap(), ["a=1", "b=2"]);
        assert_eq!(headers.get_line("Set-Cookie").unwrap(), "a=1, b=2");
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut headers: Headers = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        headers.set("a", "9");
        let names: Vec<&str> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(headers.get("A").unwrap(), ["9"]);
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::new();
        headers.set("Content-Length", "3");
        assert!(headers.remove("content-length"));
        assert!(!headers.remove("content-length"));
        assert!(headers.is_empty());
    }
}
