//! Character module - the tracked cast and the pairs drawn from it

use std::fmt;

/// Names tracked by the reference configuration
pub const DEFAULT_ROSTER: [&str; 9] = [
    "Naruto", "Sasuke", "Sakura", "Kakashi", "Hinata", "Jiraiya", "Itachi", "Pain", "Gaara",
];

/// A tracked character, identified by name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Character(String);

impl Character {
    /// Create a character from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The character's name
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether the name occurs verbatim in `text`
    ///
    /// Plain case-sensitive substring containment, so "Pain" also matches
    /// "Painful".
    ///
    /// # Examples
    ///
    /// ```
    /// use kizuna_domain::Character;
    ///
    /// let naruto = Character::new("Naruto");
    /// assert!(naruto.appears_in("Naruto fought Sasuke"));
    /// assert!(!naruto.appears_in("NARUTO fought Sasuke"));
    /// ```
    pub fn appears_in(&self, text: &str) -> bool {
        text.contains(self.0.as_str())
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Character {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Two distinct characters, in roster enumeration order
///
/// Equality and hashing follow the emitted `(first, second)` order; use
/// [`CharacterPair::canonical`] when the order must not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterPair {
    /// First character (the one centrality is reported for)
    pub first: Character,

    /// Second character
    pub second: Character,
}

impl CharacterPair {
    /// Create a pair
    ///
    /// # Panics
    /// Panics if both sides are the same character
    pub fn new(first: Character, second: Character) -> Self {
        assert!(first != second, "A pair needs two distinct characters");
        Self { first, second }
    }

    /// Order-independent form of the pair, used as a storage key
    pub fn canonical(&self) -> (Character, Character) {
        if self.first <= self.second {
            (self.first.clone(), self.second.clone())
        } else {
            (self.second.clone(), self.first.clone())
        }
    }

    /// Whether both names occur in `text`
    pub fn appears_in(&self, text: &str) -> bool {
        self.first.appears_in(text) && self.second.appears_in(text)
    }
}

impl fmt::Display for CharacterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// The fixed, closed universe of tracked characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    /// Build a roster from names, keeping their order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            characters: names.into_iter().map(Character::new).collect(),
        }
    }

    /// Characters in roster order
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Number of characters
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Whether the roster contains a character
    pub fn contains(&self, character: &Character) -> bool {
        self.characters.contains(character)
    }

    /// All unordered pairs, as `(roster[i], roster[j])` with `i < j`
    ///
    /// # Examples
    ///
    /// ```
    /// use kizuna_domain::Roster;
    ///
    /// let roster = Roster::new(["A", "B", "C"]);
    /// let pairs: Vec<String> = roster.pairs().map(|p| p.to_string()).collect();
    /// assert_eq!(pairs, vec!["A-B", "A-C", "B-C"]);
    /// ```
    pub fn pairs(&self) -> impl Iterator<Item = CharacterPair> + '_ {
        self.characters.iter().enumerate().flat_map(move |(i, first)| {
            self.characters[i + 1..]
                .iter()
                .map(move |second| CharacterPair::new(first.clone(), second.clone()))
        })
    }

    /// Pairs whose two names both occur in `synopsis`, in enumeration order
    pub fn pairs_in<'a>(&'a self, synopsis: &'a str) -> impl Iterator<Item = CharacterPair> + 'a {
        self.pairs().filter(move |pair| pair.appears_in(synopsis))
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_ROSTER)
    }
}
