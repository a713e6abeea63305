//! Tag set module - relationship tags observed for a pair

use std::collections::BTreeSet;
use std::fmt;

/// Separator used when a tag set crosses a text boundary
pub const TAG_SEPARATOR: &str = ", ";

/// A set of relationship tags
///
/// Tags are kept verbatim, including ones outside the known vocabulary.
/// Iteration is lexicographic, which makes the serialized form stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Create an empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, returning whether it was new
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    /// Whether the set holds `tag`
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no relationship was observed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tags in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether any of `tags` is in the set
    pub fn intersects(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.contains(tag))
    }

    /// Tags in `self` that are not in `other`, sorted
    pub fn difference<'a>(&'a self, other: &'a TagSet) -> Vec<&'a str> {
        self.0.difference(&other.0).map(String::as_str).collect()
    }

    /// Render the set as `"a, b, c"`
    pub fn to_joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(TAG_SEPARATOR)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_joined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_is_sorted() {
        let tags: TagSet = ["rivals", "friendship", "allies"].into_iter().collect();
        assert_eq!(tags.to_joined(), "allies, friendship, rivals");
    }

    #[test]
    fn test_duplicates_collapse() {
        let tags: TagSet = ["enemies", "enemies"].into_iter().collect();
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_difference() {
        let prev: TagSet = ["enemies", "rivals"].into_iter().collect();
        let curr: TagSet = ["rivals", "betrayal"].into_iter().collect();
        assert_eq!(prev.difference(&curr), vec!["enemies"]);
        assert_eq!(curr.difference(&prev), vec!["betrayal"]);
    }

    #[test]
    fn test_unknown_tags_are_kept() {
        let tags: TagSet = ["sworn brothers"].into_iter().collect();
        assert!(tags.contains("sworn brothers"));
        assert!(!tags.intersects(&["friendship"]));
    }

    #[test]
    fn test_empty_display() {
        assert_eq!(TagSet::new().to_string(), "");
    }
}
