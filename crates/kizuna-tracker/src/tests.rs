//! End-to-end tests for the episode processor

#[cfg(test)]
mod tests {
    use crate::{
        AttributeLabel, CooccurrenceGraph, EpisodeProcessor, HistoryMode, NetworkChange,
        RetrySettings, TrackerConfig, TrackerError,
    };
    use kizuna_domain::{Character, CharacterPair, Episode, KeyEvent, Roster, TagType};
    use kizuna_llm::{LlmError, MockProvider};
    use proptest::prelude::*;

    const NARUTO_SASUKE: &str = "for Naruto and Sasuke";

    fn config() -> TrackerConfig {
        TrackerConfig {
            retry: RetrySettings {
                max_attempts: 3,
                min_backoff_ms: 1,
                max_backoff_ms: 2,
                multiplier: 2.0,
            },
            ..TrackerConfig::default()
        }
    }

    fn pair(a: &str, b: &str) -> CharacterPair {
        CharacterPair::new(a.into(), b.into())
    }

    fn episode(id: &str, synopsis: &str) -> Episode {
        Episode::new(id, "Test Arc", synopsis)
    }

    #[tokio::test]
    async fn test_first_sighting_of_enemies() {
        let mut llm = MockProvider::new("None");
        llm.add_response(NARUTO_SASUKE, "enemies");
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[episode("1", "Naruto and Sasuke fought as enemies.")])
            .await;

        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.episode, "1");
        assert_eq!(record.arc, "Test Arc");
        assert_eq!(record.character1, Character::new("Naruto"));
        assert_eq!(record.character2, Character::new("Sasuke"));
        assert_eq!(record.relationship.to_string(), "enemies");
        assert_eq!(record.tag_type, TagType::Permanent);
        assert_eq!(record.key_event, KeyEvent::No);
        assert_eq!(record.network_changes.to_string(), "False");
        assert_eq!(record.degree_centrality, 0.125);
        assert_eq!(record.betweenness_centrality, 0.0);
        assert_eq!(record.closeness_centrality, 0.125);
        assert!(processor.graph().has_edge(&pair("Naruto", "Sasuke")));
    }

    #[tokio::test]
    async fn test_betrayal_after_enemies() {
        let mut llm = MockProvider::new("None");
        llm.add_sequence(
            NARUTO_SASUKE,
            vec![Ok("enemies".to_string()), Ok("betrayal".to_string())],
        );
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[
                episode("1", "Naruto and Sasuke fought as enemies."),
                episode("2", "Sasuke turned on Naruto."),
            ])
            .await;

        assert_eq!(report.records.len(), 2);
        let second = &report.records[1];
        assert_eq!(second.network_changes.to_string(), "True -> –enemies +betrayal");
        assert_eq!(second.key_event, KeyEvent::Yes);
        assert_eq!(second.tag_type, TagType::Permanent);
    }

    #[tokio::test]
    async fn test_failed_relationship_skips_pair() {
        let mut llm = MockProvider::new("None");
        llm.add_error(NARUTO_SASUKE, LlmError::Communication("connection reset".into()));
        let handle = llm.clone();
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[episode("1", "Naruto and Sasuke fought as enemies.")])
            .await;

        assert!(report.records.is_empty());
        assert_eq!(handle.calls_matching(NARUTO_SASUKE), 3);
        assert_eq!(handle.calls_matching("Identify the"), 0);
        assert_eq!(processor.graph().edge_count(), 0);
        assert!(processor.history().is_empty());
        assert_eq!(report.summary.relationship_failures, 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_earlier_state_untouched() {
        let mut llm = MockProvider::new("None");
        llm.add_sequence(
            NARUTO_SASUKE,
            vec![
                Ok("enemies".to_string()),
                Err(LlmError::Timeout),
            ],
        );
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[
                episode("1", "Naruto and Sasuke fought as enemies."),
                episode("2", "Naruto chased Sasuke."),
            ])
            .await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(
            processor
                .history()
                .previous(&pair("Naruto", "Sasuke"))
                .map(|tags| tags.to_string()),
            Some("enemies".to_string())
        );
        assert_eq!(processor.graph().edge_count(), 1);
    }

    #[tokio::test]
    async fn test_label_outside_allowed_set_is_none() {
        let mut llm = MockProvider::new("None");
        llm.add_response(NARUTO_SASUKE, "rivals");
        llm.add_response("clan of Naruto", "Leaf Village");
        llm.add_response("clan of Sasuke", "Uchiha");
        llm.add_response("group of Naruto", "Team 7");
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[episode("1", "Naruto and Sasuke raced.")])
            .await;

        let record = &report.records[0];
        assert_eq!(record.clan_character1, AttributeLabel::None);
        assert_eq!(record.clan_character2, AttributeLabel::Label("Uchiha".to_string()));
        assert_eq!(record.group_character1, AttributeLabel::Label("Team 7".to_string()));
        assert_eq!(record.group_character2, AttributeLabel::None);
        assert_eq!(report.summary.attribute_fallbacks, 0);
    }

    #[tokio::test]
    async fn test_failed_attribute_degrades_to_none() {
        let mut llm = MockProvider::new("None");
        llm.add_response(NARUTO_SASUKE, "rivals");
        llm.add_error("group of Sasuke", LlmError::RateLimitExceeded);
        llm.add_response("group of Naruto", "Team 7");
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[episode("1", "Naruto and Sasuke raced.")])
            .await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].group_character2, AttributeLabel::None);
        assert_eq!(
            report.records[0].group_character1,
            AttributeLabel::Label("Team 7".to_string())
        );
        assert_eq!(report.summary.attribute_fallbacks, 1);
    }

    #[tokio::test]
    async fn test_four_attribute_calls_per_record() {
        let mut llm = MockProvider::new("None");
        llm.add_response("from this episode", "teammates");
        let handle = llm.clone();
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[episode("7", "Naruto, Sasuke and Sakura trained together.")])
            .await;

        assert_eq!(report.records.len(), 3);
        assert_eq!(handle.calls_matching("Identify the"), 12);
        assert_eq!(handle.calls_matching("Identify the clan of"), 6);
        assert_eq!(handle.calls_matching("Identify the group of"), 6);
    }

    #[tokio::test]
    async fn test_pairs_follow_roster_order_and_centrality_grows() {
        let mut llm = MockProvider::new("None");
        llm.add_response("from this episode", "teammates");
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[episode("7", "Sakura, Sasuke and Naruto trained together.")])
            .await;

        let pairs: Vec<String> = report
            .records
            .iter()
            .map(|r| format!("{}-{}", r.character1, r.character2))
            .collect();
        assert_eq!(pairs, vec!["Naruto-Sasuke", "Naruto-Sakura", "Sasuke-Sakura"]);

        let second = &report.records[1];
        assert_eq!(second.degree_centrality, 0.25);
        assert_eq!(second.closeness_centrality, 0.25);
        // One of C(8, 2) pairs routes through Naruto
        assert_eq!(second.betweenness_centrality, 0.036);

        let third = &report.records[2];
        assert_eq!(third.degree_centrality, 0.25);
        assert_eq!(third.betweenness_centrality, 0.0);
    }

    #[tokio::test]
    async fn test_graph_is_monotone_across_episodes() {
        let mut llm = MockProvider::new("None");
        llm.add_sequence(
            NARUTO_SASUKE,
            vec![Ok("rivals".to_string()), Ok("None".to_string())],
        );
        llm.add_response("for Naruto and Sakura", "teammates");
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[
                episode("1", "Naruto and Sasuke raced."),
                episode("2", "Naruto and Sasuke ate ramen."),
                episode("3", "Naruto and Sakura searched."),
            ])
            .await;

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].degree_centrality, 0.125);
        assert_eq!(report.records[1].degree_centrality, 0.25);
        assert_eq!(
            processor.graph().edges(),
            vec![
                (Character::new("Naruto"), Character::new("Sakura")),
                (Character::new("Naruto"), Character::new("Sasuke")),
            ]
        );
        assert_eq!(report.summary.no_relationship, 1);
        assert_eq!(report.summary.graph_edges, 2);
    }

    #[tokio::test]
    async fn test_substring_match_is_case_sensitive() {
        let llm = MockProvider::new("rivals");
        let handle = llm.clone();
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[episode("1", "NARUTO and sasuke argued.")])
            .await;

        assert!(report.records.is_empty());
        assert_eq!(handle.call_count(), 0);
        assert_eq!(report.summary.candidate_pairs, 0);
        assert_eq!(report.summary.episodes_processed, 1);
    }

    #[tokio::test]
    async fn test_empty_baseline_mode() {
        let mut llm = MockProvider::new("None");
        llm.add_response(NARUTO_SASUKE, "enemies");
        let config = TrackerConfig {
            history_mode: HistoryMode::EmptyBaseline,
            ..config()
        };
        let mut processor = EpisodeProcessor::new(llm, config).unwrap();

        let report = processor
            .process_episodes(&[
                episode("1", "Naruto and Sasuke fought."),
                episode("2", "Naruto and Sasuke fought again."),
            ])
            .await;

        for record in &report.records {
            assert_eq!(record.network_changes.to_string(), "True -> +enemies");
        }
        assert!(processor.history().is_empty());
    }

    #[tokio::test]
    async fn test_each_run_starts_fresh() {
        let mut llm = MockProvider::new("None");
        llm.add_response(NARUTO_SASUKE, "enemies");
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();
        let episodes = [episode("1", "Naruto and Sasuke fought.")];

        let first = processor.process_episodes(&episodes).await;
        let second = processor.process_episodes(&episodes).await;

        assert_eq!(first.records, second.records);
        assert_eq!(second.records[0].network_changes, NetworkChange::Unchanged);
        assert_eq!(processor.graph().edge_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tags_are_kept() {
        let mut llm = MockProvider::new("None");
        llm.add_response(NARUTO_SASUKE, "sworn brothers");
        let mut processor = EpisodeProcessor::new(llm, config()).unwrap();

        let report = processor
            .process_episodes(&[episode("1", "Naruto and Sasuke swore an oath.")])
            .await;

        assert_eq!(report.records[0].relationship.to_string(), "sworn brothers");
        assert_eq!(report.records[0].tag_type, TagType::Unknown);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TrackerConfig {
            roster: vec!["Naruto".to_string()],
            ..TrackerConfig::default()
        };
        let result = EpisodeProcessor::new(MockProvider::new("None"), config);
        assert!(matches!(result, Err(TrackerError::Config(_))));
    }

    fn edge_sets() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec((0usize..9, 0usize..9), 0..20)
    }

    proptest! {
        #[test]
        fn prop_centrality_bounded_and_rounded(edges in edge_sets()) {
            let roster = Roster::default();
            let mut graph = CooccurrenceGraph::new(&roster);
            let characters = roster.characters();

            for (i, j) in edges {
                if i != j {
                    graph.add_interaction(&CharacterPair::new(
                        characters[i].clone(),
                        characters[j].clone(),
                    ));
                }
            }

            for character in characters {
                let c = graph.centrality(character);
                for value in [c.degree, c.betweenness, c.closeness] {
                    prop_assert!((0.0..=1.0).contains(&value));
                    prop_assert_eq!((value * 1000.0).round() / 1000.0, value);
                }
            }
        }

        #[test]
        fn prop_edges_only_accumulate(edges in edge_sets()) {
            let roster = Roster::default();
            let mut graph = CooccurrenceGraph::new(&roster);
            let characters = roster.characters();
            let mut seen = Vec::new();

            for (i, j) in edges {
                if i == j {
                    continue;
                }
                let pair = CharacterPair::new(characters[i].clone(), characters[j].clone());
                let before = graph.edge_count();
                graph.add_interaction(&pair);
                prop_assert!(graph.edge_count() >= before);
                seen.push(pair);
                for earlier in &seen {
                    prop_assert!(graph.has_edge(earlier));
                }
            }
        }
    }
}
