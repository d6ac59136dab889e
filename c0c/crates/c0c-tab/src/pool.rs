//! Deduplicated string-literal pool.

use indexmap::IndexMap;

/// Maps string contents to `$STRING_<n>` labels.
///
/// Insertion is idempotent: the same content always yields the same
/// label. Iteration follows insertion order, which fixes the order of
/// `.asciiz` directives in the data segment.
///
/// # Examples
///
/// ```
/// use c0c_tab::StringPool;
///
/// let mut pool = StringPool::new();
/// let a = pool.label("hello");
/// let b = pool.label("world");
/// assert_eq!(a, "$STRING_0");
/// assert_eq!(b, "$STRING_1");
/// assert_eq!(pool.label("hello"), "$STRING_0");
/// ```
#[derive(Default)]
pub struct StringPool {
    strings: IndexMap<String, String>,
}

impl StringPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the label for `content`, inserting it if new.
    pub fn label(&mut self, content: &str) -> String {
        if let Some(label) = self.strings.get(content) {
            return label.clone();
        }
        let label = format!("$STRING_{}", self.strings.len());
        self.strings.insert(content.to_string(), label.clone());
        label
    }

    /// Iterates `(content, label)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.strings.iter().map(|(s, l)| (s.as_str(), l.as_str()))
    }

    /// Number of distinct strings pooled.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True when nothing has been pooled.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_sequential() {
        let mut pool = StringPool::new();
        assert_eq!(pool.label("a"), "$STRING_0");
        assert_eq!(pool.label("b"), "$STRING_1");
        assert_eq!(pool.label("c"), "$STRING_2");
    }

    #[test]
    fn test_insertion_is_idempotent() {
        let mut pool = StringPool::new();
        let first = pool.label("x=");
        let second = pool.label("x=");
        assert_eq!(first, second);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_distinct_contents_distinct_labels() {
        let mut pool = StringPool::new();
        let labels: Vec<_> = ["a", "b", "a", "c", "b"]
            .iter()
            .map(|s| pool.label(s))
            .collect();
        assert_eq!(pool.len(), 3);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[1], labels[4]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_iter_in_insertion_order() {
        let mut pool = StringPool::new();
        pool.label("second?");
        pool.label("first?");
        let pairs: Vec<_> = pool.iter().collect();
        assert_eq!(
            pairs,
            vec![("second?", "$STRING_0"), ("first?", "$STRING_1")]
        );
    }

    #[test]
    fn test_empty() {
        let pool = StringPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.iter().count(), 0);
    }
}
