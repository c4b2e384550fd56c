//! Insertion-ordered string-keyed map.
//!
//! Both input mappings and schema mappings enumerate their keys in the order
//! they were first inserted, so validation walks fields (and reports errors)
//! in document order rather than hash or sort order.

use std::fmt;

use indexmap::IndexMap;

/// An ordered map from `String` keys to `V`.
///
/// Backed by an [`IndexMap`], so lookups hash while iteration follows
/// insertion order. Equality is order-sensitive.
///
/// # Examples
///
/// ```
/// use shape_schema_core::Map;
///
/// let mut map: Map<i64> = Map::new();
/// map.insert("b", 1);
/// map.insert("a", 2);
/// map.insert("b", 3);
///
/// assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
/// assert_eq!(map.get("b"), Some(&3));
/// ```
#[derive(Clone)]
pub struct Map<V> {
    entries: IndexMap<String, V>,
}

impl<V> Map<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts `value` under `key`.
    ///
    /// An existing key keeps its position and the previous value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Returns `true` if at least one key is not an integer literal.
    ///
    /// A map whose keys are all integer literals (`"0"`, `"1"`, ...) has list
    /// semantics during validation.
    ///
    /// ```
    /// use shape_schema_core::Map;
    ///
    /// let list: Map<i64> = [("0", 1), ("1", 2)].into_iter().collect();
    /// let keyed: Map<i64> = [("0", 1), ("name", 2)].into_iter().collect();
    /// assert!(!list.is_associative());
    /// assert!(keyed.is_associative());
    /// assert!(!Map::<i64>::new().is_associative());
    /// ```
    pub fn is_associative(&self) -> bool {
        self.keys().any(|key| !is_index_key(key))
    }
}

fn is_index_key(key: &str) -> bool {
    key.parse::<i64>()
        .is_ok_and(|index| index.to_string() == key)
}

impl<V> Default for Map<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for Map<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: fmt::Debug> fmt::Debug for Map<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Map<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Map {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }
}

impl<V> IntoIterator for Map<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Map<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over `(key, value)` pairs in insertion order.
pub struct Iter<'a, V> {
    inner: indexmap::map::Iter<'a, String, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
