//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use kizuna_domain::taxonomy::{tag_type_of, vocabulary, KEY_EVENT_TAGS};
use kizuna_tracker::ProcessingSummary;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the summary of a run that wrote `output`.
    pub fn format_summary(&self, summary: &ProcessingSummary, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "output": output.display().to_string(),
                "summary": summary,
            }))?),
            OutputFormat::Table => Ok(self.format_summary_table(summary, output)),
            OutputFormat::Quiet => Ok(output.display().to_string()),
        }
    }

    fn format_summary_table(&self, summary: &ProcessingSummary, output: &Path) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);

        let rows = [
            ("Episodes processed", summary.episodes_processed.to_string()),
            ("Candidate pairs", summary.candidate_pairs.to_string()),
            ("Records written", summary.records_emitted.to_string()),
            ("No relationship", summary.no_relationship.to_string()),
            ("Relationship failures", summary.relationship_failures.to_string()),
            ("Attribute fallbacks", summary.attribute_fallbacks.to_string()),
            ("Graph edges", summary.graph_edges.to_string()),
            ("Elapsed", format!("{:.1}s", summary.elapsed_ms as f64 / 1000.0)),
        ];
        for (metric, value) in &rows {
            builder.push_record([*metric, value.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let headline = format!(
            "Wrote {} record(s) to {}",
            summary.records_emitted,
            output.display()
        );
        let headline = if summary.relationship_failures > 0 {
            self.warning(&format!(
                "{} ({} pair(s) skipped after failed calls)",
                headline, summary.relationship_failures
            ))
        } else {
            self.success(&headline)
        };

        format!("{}\n{}", headline, table)
    }

    /// Format the tag vocabulary with each tag's type and key-event flag.
    pub fn format_taxonomy(&self) -> Result<String> {
        let tags: Vec<&str> = vocabulary()
            .chain(
                KEY_EVENT_TAGS
                    .iter()
                    .copied()
                    .filter(|tag| !vocabulary().any(|known| known == *tag)),
            )
            .collect();

        match self.format {
            OutputFormat::Json => {
                let entries: Vec<serde_json::Value> = tags
                    .iter()
                    .map(|tag| {
                        serde_json::json!({
                            "tag": tag,
                            "type": tag_type_of(tag).as_str(),
                            "key_event": KEY_EVENT_TAGS.contains(tag),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Quiet => Ok(tags.join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Tag", "Type", "Key Event"]);
                for tag in &tags {
                    let key_event = if KEY_EVENT_TAGS.contains(tag) { "Yes" } else { "No" };
                    builder.push_record([*tag, tag_type_of(tag).as_str(), key_event]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
