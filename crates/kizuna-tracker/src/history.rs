//! Per-pair relationship history and the change between observations

use crate::config::HistoryMode;
use kizuna_domain::{Character, CharacterPair, TagSet};
use std::collections::HashMap;
use std::fmt;

/// Change of a pair's tags between two observations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkChange {
    /// Same tags as before
    Unchanged,

    /// Tags were removed and/or added, each group sorted
    Changed {
        /// Tags in the previous set only
        removed: Vec<String>,

        /// Tags in the current set only
        added: Vec<String>,
    },
}

impl NetworkChange {
    /// Whether anything changed
    pub fn is_changed(&self) -> bool {
        matches!(self, NetworkChange::Changed { .. })
    }
}

/// Diff two tag sets
///
/// # Examples
///
/// ```
/// use kizuna_domain::TagSet;
/// use kizuna_tracker::network_change;
///
/// let previous: TagSet = ["enemies"].into_iter().collect();
/// let current: TagSet = ["betrayal"].into_iter().collect();
/// assert_eq!(network_change(&previous, &current).to_string(), "True -> –enemies +betrayal");
/// assert_eq!(network_change(&current, &current).to_string(), "False");
/// ```
pub fn network_change(previous: &TagSet, current: &TagSet) -> NetworkChange {
    let removed: Vec<String> = previous.difference(current).into_iter().map(String::from).collect();
    let added: Vec<String> = current.difference(previous).into_iter().map(String::from).collect();

    if removed.is_empty() && added.is_empty() {
        NetworkChange::Unchanged
    } else {
        NetworkChange::Changed { removed, added }
    }
}

impl fmt::Display for NetworkChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkChange::Unchanged => f.write_str("False"),
            NetworkChange::Changed { removed, added } => {
                let parts: Vec<String> = removed
                    .iter()
                    .map(|tag| format!("\u{2013}{}", tag))
                    .chain(added.iter().map(|tag| format!("+{}", tag)))
                    .collect();
                write!(f, "True -> {}", parts.join(" "))
            }
        }
    }
}

/// Most recent tag set per pair
///
/// Keys are order-independent, so `(Naruto, Sasuke)` and `(Sasuke, Naruto)`
/// share an entry.
#[derive(Debug, Clone, Default)]
pub struct RelationshipHistory {
    mode: HistoryMode,
    entries: HashMap<(Character, Character), TagSet>,
}

impl RelationshipHistory {
    /// Create an empty history
    pub fn new(mode: HistoryMode) -> Self {
        Self {
            mode,
            entries: HashMap::new(),
        }
    }

    /// Baseline mode in use
    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    /// Diff `current` against the pair's previous tags, then store it
    ///
    /// In incremental mode a pair seen for the first time has no baseline
    /// and reports [`NetworkChange::Unchanged`]. In empty-baseline mode
    /// nothing is stored and every diff is against the empty set.
    pub fn record_and_diff(&mut self, pair: &CharacterPair, current: &TagSet) -> NetworkChange {
        match self.mode {
            HistoryMode::Incremental => {
                let key = pair.canonical();
                let change = match self.entries.get(&key) {
                    Some(previous) => network_change(previous, current),
                    None => NetworkChange::Unchanged,
                };
                self.entries.insert(key, current.clone());
                change
            }
            HistoryMode::EmptyBaseline => network_change(&TagSet::new(), current),
        }
    }

    /// Last tags stored for a pair
    pub fn previous(&self, pair: &CharacterPair) -> Option<&TagSet> {
        self.entries.get(&pair.canonical())
    }

    /// Number of pairs with an entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pair has an entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
