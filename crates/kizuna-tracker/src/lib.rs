//! Kizuna Tracker
//!
//! Turns episode synopses into a relationship dataset using an LLM as the
//! relationship oracle.
//!
//! # Overview
//!
//! For every episode, in input order, the tracker finds the roster pairs whose
//! names both occur in the synopsis, asks the LLM which relationship tags apply,
//! and emits one record per pair with a non-empty answer. Each record carries
//! the tag type, a key-event flag, the change since the pair's previous
//! observation, the first character's centrality in the cumulative
//! co-occurrence network, and clan/group labels for both characters.
//!
//! # Architecture
//!
//! ```text
//! Episodes → EpisodeProcessor → RelationshipClassifier → TagSet
//!                             → taxonomy + RelationshipHistory + CooccurrenceGraph
//!                             → AttributeClassifier → OutputRecord
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use kizuna_domain::Episode;
//! use kizuna_llm::MockProvider;
//! use kizuna_tracker::{EpisodeProcessor, TrackerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut llm = MockProvider::new("None");
//! llm.add_response("for Naruto and Sasuke", "enemies");
//!
//! let mut processor = EpisodeProcessor::new(llm, TrackerConfig::default())?;
//! let episodes = vec![Episode::new("1", "Prologue", "Naruto and Sasuke fought as enemies.")];
//!
//! let report = processor.process_episodes(&episodes).await;
//! println!("Emitted {} records", report.records.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod dataset;
mod error;
mod graph;
mod history;
mod parser;
mod processor;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use classifier::{
    AttributeCategory, AttributeClassifier, AttributeLabel, ClassifierError, Oracle,
    RelationshipClassifier,
};
pub use config::{HistoryMode, RetrySettings, TrackerConfig};
pub use dataset::{
    read_episodes, read_episodes_from_path, write_csv, write_json, write_records, DatasetFormat,
};
pub use error::{Result, TrackerError};
pub use graph::{Centrality, CooccurrenceGraph};
pub use history::{network_change, NetworkChange, RelationshipHistory};
pub use parser::{parse_attribute_label, parse_tag_list};
pub use processor::EpisodeProcessor;
pub use types::{OutputRecord, ProcessingReport, ProcessingSummary, OUTPUT_COLUMNS};
