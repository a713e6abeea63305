//! Tag taxonomy - permanent vs temporary tags and key events
//!
//! Pure lookups over fixed vocabularies. Tags outside the vocabulary are
//! ignored by every lookup here.

use crate::tags::TagSet;
use std::fmt;

/// Tags describing a lasting relationship state
pub const PERMANENT_TAGS: [&str; 15] = [
    "friendship",
    "teammates",
    "allies",
    "teacher-student",
    "master-disciple",
    "rivals",
    "enemies",
    "ideological conflict",
    "trust",
    "betrayal",
    "love",
    "respect",
    "leader-subordinate",
    "former allies",
    "former enemies",
];

/// Tags describing an episode-local interaction
pub const TEMPORARY_TAGS: [&str; 2] = ["opponents", "conflict"];

/// Tags that mark a narratively significant change
///
/// "death" is not in either vocabulary; the oracle may still return it.
pub const KEY_EVENT_TAGS: [&str; 4] = ["betrayal", "former allies", "death", "leader-subordinate"];

/// Whether a tag set describes a lasting or an episode-local relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    /// At least one permanent tag
    Permanent,

    /// Temporary tags only
    Temporary,

    /// No recognized tag
    Unknown,
}

impl TagType {
    /// Get the tag type name as written to the dataset
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::Permanent => "Permanent",
            TagType::Temporary => "Temporary",
            TagType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-event flag for a tag set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// The set contains a key-event tag
    Yes,

    /// It does not
    No,
}

impl KeyEvent {
    /// Get the flag as written to the dataset
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyEvent::Yes => "Yes",
            KeyEvent::No => "No",
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a tag set; permanent tags win over temporary ones
///
/// # Examples
///
/// ```
/// use kizuna_domain::{classify_tag_type, TagSet, TagType};
///
/// let tags: TagSet = ["opponents", "rivals"].into_iter().collect();
/// assert_eq!(classify_tag_type(&tags), TagType::Permanent);
/// ```
pub fn classify_tag_type(tags: &TagSet) -> TagType {
    if tags.intersects(&PERMANENT_TAGS) {
        TagType::Permanent
    } else if tags.intersects(&TEMPORARY_TAGS) {
        TagType::Temporary
    } else {
        TagType::Unknown
    }
}

/// Flag tag sets containing a key-event tag
pub fn is_key_event(tags: &TagSet) -> KeyEvent {
    if tags.intersects(&KEY_EVENT_TAGS) {
        KeyEvent::Yes
    } else {
        KeyEvent::No
    }
}

/// Every tag the oracle may choose from, permanent first
pub fn vocabulary() -> impl Iterator<Item = &'static str> {
    PERMANENT_TAGS.iter().chain(TEMPORARY_TAGS.iter()).copied()
}

/// Type of a single tag, if it is in the vocabulary
pub fn tag_type_of(tag: &str) -> TagType {
    if PERMANENT_TAGS.contains(&tag) {
        TagType::Permanent
    } else if TEMPORARY_TAGS.contains(&tag) {
        TagType::Temporary
    } else {
        TagType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> TagSet {
        items.iter().copied().collect()
    }

    #[test]
    fn test_permanent() {
        assert_eq!(classify_tag_type(&tags(&["enemies"])), TagType::Permanent);
    }

    #[test]
    fn test_temporary() {
        assert_eq!(classify_tag_type(&tags(&["opponents"])), TagType::Temporary);
    }

    #[test]
    fn test_permanent_takes_priority() {
        assert_eq!(
            classify_tag_type(&tags(&["conflict", "friendship"])),
            TagType::Permanent
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify_tag_type(&tags(&["sparring"])), TagType::Unknown);
        assert_eq!(classify_tag_type(&TagSet::new()), TagType::Unknown);
    }

    #[test]
    fn test_key_events() {
        assert_eq!(is_key_event(&tags(&["betrayal"])), KeyEvent::Yes);
        assert_eq!(is_key_event(&tags(&["death", "sparring"])), KeyEvent::Yes);
        assert_eq!(is_key_event(&tags(&["enemies"])), KeyEvent::No);
    }

    #[test]
    fn test_vocabulary_size() {
        assert_eq!(vocabulary().count(), 17);
        assert_eq!(tag_type_of("conflict"), TagType::Temporary);
        assert_eq!(tag_type_of("death"), TagType::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(TagType::Permanent.to_string(), "Permanent");
        assert_eq!(KeyEvent::No.to_string(), "No");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn tag_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            proptest::sample::select(PERMANENT_TAGS.to_vec()).prop_map(String::from),
            proptest::sample::select(TEMPORARY_TAGS.to_vec()).prop_map(String::from),
            "[a-z]{3,8}",
        ]
    }

    proptest! {
        /// Property: classification is deterministic
        #[test]
        fn test_classification_deterministic(tags in proptest::collection::vec(tag_strategy(), 0..6)) {
            let set: TagSet = tags.into_iter().collect();
            prop_assert_eq!(classify_tag_type(&set), classify_tag_type(&set.clone()));
        }

        /// Property: any permanent tag forces Permanent, regardless of temporary ones
        #[test]
        fn test_permanent_priority(
            tags in proptest::collection::vec(tag_strategy(), 0..6),
            permanent in proptest::sample::select(PERMANENT_TAGS.to_vec()),
            temporary in proptest::sample::select(TEMPORARY_TAGS.to_vec()),
        ) {
            let mut set: TagSet = tags.into_iter().collect();
            set.insert(temporary);
            set.insert(permanent);
            prop_assert_eq!(classify_tag_type(&set), TagType::Permanent);
        }
    }
}
