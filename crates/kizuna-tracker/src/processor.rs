//! Episode processor: drives classification, history and graph per episode

use crate::classifier::{
    AttributeCategory, AttributeClassifier, AttributeLabel, Oracle, RelationshipClassifier,
};
use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::graph::CooccurrenceGraph;
use crate::history::RelationshipHistory;
use crate::types::{OutputRecord, ProcessingReport, ProcessingSummary};
use kizuna_domain::{classify_tag_type, is_key_event, Character, Episode, LlmProvider, Roster};
use kizuna_llm::LlmError;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Turns episodes into output records
///
/// Owns the relationship history and the co-occurrence graph. Both are reset
/// at the start of every [`EpisodeProcessor::process_episodes`] call and
/// mutated strictly in episode order, pair by pair.
pub struct EpisodeProcessor<L> {
    roster: Roster,
    relationships: RelationshipClassifier<L>,
    attributes: AttributeClassifier<L>,
    history: RelationshipHistory,
    graph: CooccurrenceGraph,
}

impl<L> EpisodeProcessor<L>
where
    L: LlmProvider<Error = LlmError>,
{
    /// Create a new processor
    pub fn new(llm: L, config: TrackerConfig) -> Result<Self> {
        config.validate().map_err(TrackerError::Config)?;

        let oracle = Oracle::new(llm, config.retry.policy(), config.request_timeout());
        let roster = config.roster();
        let graph = CooccurrenceGraph::new(&roster);

        Ok(Self {
            relationships: RelationshipClassifier::new(
                oracle.clone(),
                config.relationship_max_tokens,
            ),
            attributes: AttributeClassifier::new(
                oracle,
                config.clans,
                config.groups,
                config.attribute_max_tokens,
            ),
            history: RelationshipHistory::new(config.history_mode),
            graph,
            roster,
        })
    }

    /// Tracked characters
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Relationship history after the last run
    pub fn history(&self) -> &RelationshipHistory {
        &self.history
    }

    /// Co-occurrence graph after the last run
    pub fn graph(&self) -> &CooccurrenceGraph {
        &self.graph
    }

    /// Clear history and graph edges
    pub fn reset(&mut self) {
        self.history.reset();
        self.graph.reset();
    }

    /// Process episodes in order and return every emitted record
    ///
    /// Never fails: a relationship call that fails skips its pair, and an
    /// attribute call that fails yields `None`.
    pub async fn process_episodes(&mut self, episodes: &[Episode]) -> ProcessingReport {
        let start = Instant::now();
        self.reset();

        info!(
            episodes = episodes.len(),
            characters = self.roster.len(),
            "Starting episode processing"
        );

        let mut records = Vec::new();
        let mut summary = ProcessingSummary::default();

        for episode in episodes {
            self.process_episode(episode, &mut records, &mut summary)
                .await;
            summary.episodes_processed += 1;
        }

        summary.records_emitted = records.len();
        summary.graph_edges = self.graph.edge_count();
        summary.elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            episodes = summary.episodes_processed,
            records = summary.records_emitted,
            failures = summary.relationship_failures,
            edges = summary.graph_edges,
            "Episode processing complete"
        );

        ProcessingReport { records, summary }
    }

    async fn process_episode(
        &mut self,
        episode: &Episode,
        records: &mut Vec<OutputRecord>,
        summary: &mut ProcessingSummary,
    ) {
        let pairs: Vec<_> = self.roster.pairs_in(&episode.synopsis).collect();
        info!(episode = %episode.id, candidates = pairs.len(), "Processing episode");
        summary.candidate_pairs += pairs.len();

        for pair in pairs {
            let tags = match self.relationships.classify(&pair, &episode.synopsis).await {
                Ok(tags) if tags.is_empty() => {
                    debug!(episode = %episode.id, pair = %pair, "No relationship");
                    summary.no_relationship += 1;
                    continue;
                }
                Ok(tags) => tags,
                Err(e) => {
                    error!(
                        episode = %episode.id,
                        pair = %pair,
                        error = %e,
                        "Relationship classification failed, skipping pair"
                    );
                    summary.relationship_failures += 1;
                    continue;
                }
            };

            let tag_type = classify_tag_type(&tags);
            let key_event = is_key_event(&tags);
            let network_changes = self.history.record_and_diff(&pair, &tags);
            self.graph.add_interaction(&pair);
            let centrality = self.graph.centrality(&pair.first);

            let clan_character1 = self
                .attribute(episode, &pair.first, AttributeCategory::Clan, summary)
                .await;
            let clan_character2 = self
                .attribute(episode, &pair.second, AttributeCategory::Clan, summary)
                .await;
            let group_character1 = self
                .attribute(episode, &pair.first, AttributeCategory::Group, summary)
                .await;
            let group_character2 = self
                .attribute(episode, &pair.second, AttributeCategory::Group, summary)
                .await;

            debug!(
                episode = %episode.id,
                pair = %pair,
                tags = %tags,
                change = %network_changes,
                "Emitting record"
            );

            records.push(OutputRecord {
                episode: episode.id.clone(),
                character1: pair.first,
                character2: pair.second,
                relationship: tags,
                arc: episode.arc.clone(),
                tag_type,
                key_event,
                network_changes,
                degree_centrality: centrality.degree,
                betweenness_centrality: centrality.betweenness,
                closeness_centrality: centrality.closeness,
                clan_character1,
                clan_character2,
                group_character1,
                group_character2,
            });
        }
    }

    async fn attribute(
        &self,
        episode: &Episode,
        character: &Character,
        category: AttributeCategory,
        summary: &mut ProcessingSummary,
    ) -> AttributeLabel {
        match self.attributes.classify(character, category).await {
            Ok(label) => label,
            Err(e) => {
                warn!(
                    episode = %episode.id,
                    character = %character,
                    category = %category,
                    error = %e,
                    "Attribute classification failed, using None"
                );
                summary.attribute_fallbacks += 1;
                AttributeLabel::None
            }
        }
    }
}
