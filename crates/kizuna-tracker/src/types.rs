//! Output record and run summary types

use crate::classifier::AttributeLabel;
use crate::history::NetworkChange;
use kizuna_domain::{Character, KeyEvent, TagSet, TagType};
use serde::{Serialize, Serializer};
use std::fmt;

/// Output columns, in order
pub const OUTPUT_COLUMNS: [&str; 15] = [
    "Episode",
    "Character1",
    "Character2",
    "Relationship",
    "Arc",
    "Tag_Type",
    "Key_Event_Flag",
    "Network_Changes",
    "Degree_Centrality",
    "Betweenness_Centrality",
    "Closeness_Centrality",
    "Clan_Character1",
    "Clan_Character2",
    "Group_Character1",
    "Group_Character2",
];

/// One emitted row: a pair with a relationship in one episode
///
/// Field order matches [`OUTPUT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    /// Episode identifier
    #[serde(rename = "Episode")]
    pub episode: String,

    /// First character of the pair
    #[serde(rename = "Character1", serialize_with = "as_display")]
    pub character1: Character,

    /// Second character of the pair
    #[serde(rename = "Character2", serialize_with = "as_display")]
    pub character2: Character,

    /// Tags observed in this episode
    #[serde(rename = "Relationship", serialize_with = "as_display")]
    pub relationship: TagSet,

    /// Story arc label
    #[serde(rename = "Arc")]
    pub arc: String,

    /// Permanent, temporary or unknown
    #[serde(rename = "Tag_Type", serialize_with = "as_display")]
    pub tag_type: TagType,

    /// Whether a key-event tag is present
    #[serde(rename = "Key_Event_Flag", serialize_with = "as_display")]
    pub key_event: KeyEvent,

    /// Change since the pair's previous observation
    #[serde(rename = "Network_Changes", serialize_with = "as_display")]
    pub network_changes: NetworkChange,

    /// Degree centrality of the first character
    #[serde(rename = "Degree_Centrality")]
    pub degree_centrality: f64,

    /// Betweenness centrality of the first character
    #[serde(rename = "Betweenness_Centrality")]
    pub betweenness_centrality: f64,

    /// Closeness centrality of the first character
    #[serde(rename = "Closeness_Centrality")]
    pub closeness_centrality: f64,

    /// Clan of the first character
    #[serde(rename = "Clan_Character1", serialize_with = "as_display")]
    pub clan_character1: AttributeLabel,

    /// Clan of the second character
    #[serde(rename = "Clan_Character2", serialize_with = "as_display")]
    pub clan_character2: AttributeLabel,

    /// Group of the first character
    #[serde(rename = "Group_Character1", serialize_with = "as_display")]
    pub group_character1: AttributeLabel,

    /// Group of the second character
    #[serde(rename = "Group_Character2", serialize_with = "as_display")]
    pub group_character2: AttributeLabel,
}

fn as_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingSummary {
    /// Episodes read
    pub episodes_processed: usize,

    /// Pairs whose names both occurred in a synopsis
    pub candidate_pairs: usize,

    /// Records emitted
    pub records_emitted: usize,

    /// Candidate pairs the oracle found no relationship for
    pub no_relationship: usize,

    /// Candidate pairs skipped because the relationship call failed
    pub relationship_failures: usize,

    /// Attribute calls that failed and fell back to `None`
    pub attribute_fallbacks: usize,

    /// Edges in the co-occurrence graph at the end of the run
    pub graph_edges: usize,

    /// Wall-clock duration of the run (milliseconds)
    pub elapsed_ms: u64,
}

/// Records and counters from one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingReport {
    /// Emitted records, in emission order
    pub records: Vec<OutputRecord>,

    /// Run counters
    pub summary: ProcessingSummary,
}
