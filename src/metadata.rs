//! Document metadata store.
//!
//! Keys are normalized the way the markup language treats them: lowercase,
//! with whitespace removed, so `Quotes Language` and `quoteslanguage` name
//! the same entry. Insertion order is preserved because document wrapping
//! emits `<meta>` tags in the order the author wrote them.

/// Ordered key/value metadata of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a metadata key.
    pub fn normalize_key(key: &str) -> String {
        key.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// Insert or replace a value, keeping the original position on replace.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let key = Self::normalize_key(key);
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value by (unnormalized) key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = Self::normalize_key(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Metadata::new();
        for (k, v) in iter {
            meta.insert(k.as_ref(), v);
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalization() {
        let meta = Metadata::new().with("Quotes Language", "french");
        assert_eq!(meta.get("quoteslanguage"), Some("french"));
        assert_eq!(meta.get("QUOTES language"), Some("french"));
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut meta = Metadata::new().with("title", "A").with("author", "B");
        meta.insert("Title", "C");

        let keys: Vec<_> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["title", "author"]);
        assert_eq!(meta.get("title"), Some("C"));
    }
}
