//! Configuration for the tracker

use kizuna_domain::character::DEFAULT_ROSTER;
use kizuna_domain::Roster;
use kizuna_llm::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Clans the attribute oracle may choose from in the reference configuration
pub const DEFAULT_CLANS: [&str; 10] = [
    "Uchiha", "Senju", "Hyuga", "Uzumaki", "Nara", "Akimichi", "Yamanaka", "Aburame", "Inuzuka",
    "Kaguya",
];

/// Groups the attribute oracle may choose from in the reference configuration
pub const DEFAULT_GROUPS: [&str; 11] = [
    "Team 7",
    "Team 8",
    "Team 10",
    "Team Guy",
    "Sannin",
    "Akatsuki",
    "Konoha 11",
    "Taka",
    "Hebi",
    "The Five Kage",
    "Allied Shinobi Forces",
];

/// What the relationship history diffs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryMode {
    /// Persist each observation; diff against the pair's previous tags
    #[default]
    Incremental,

    /// Never persist; every diff is against an empty baseline
    EmptyBaseline,
}

/// Retry settings for every oracle call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Attempts per call, including the first
    pub max_attempts: u32,

    /// Wait before the first retry (milliseconds)
    pub min_backoff_ms: u64,

    /// Cap on any single wait (milliseconds)
    pub max_backoff_ms: u64,

    /// Growth factor between waits
    pub multiplier: f64,
}

impl RetrySettings {
    /// Build the retry policy these settings describe
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.min_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
        .with_multiplier(self.multiplier)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_backoff_ms: 4_000,
            max_backoff_ms: 10_000,
            multiplier: 2.0,
        }
    }
}

/// Configuration for the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Tracked characters, in pair enumeration order
    pub roster: Vec<String>,

    /// Allowed clan labels
    pub clans: Vec<String>,

    /// Allowed group labels
    pub groups: Vec<String>,

    /// Baseline used for the network-change column
    pub history_mode: HistoryMode,

    /// Maximum time for a single oracle call attempt (seconds)
    pub request_timeout_secs: u64,

    /// Reply budget for relationship calls (tokens)
    pub relationship_max_tokens: u32,

    /// Reply budget for clan/group calls (tokens)
    pub attribute_max_tokens: u32,

    /// Retry behavior for oracle calls
    pub retry: RetrySettings,
}

impl TrackerConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The roster as a domain value
    pub fn roster(&self) -> Roster {
        Roster::new(self.roster.iter().cloned())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.roster.len() < 2 {
            return Err("roster needs at least two characters".to_string());
        }
        let mut seen = HashSet::new();
        for name in &self.roster {
            if name.trim().is_empty() {
                return Err("roster contains an empty name".to_string());
            }
            if !seen.insert(name) {
                return Err(format!("roster lists '{}' twice", name));
            }
        }
        if self.clans.is_empty() {
            return Err("clans must not be empty".to_string());
        }
        if self.groups.is_empty() {
            return Err("groups must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.relationship_max_tokens == 0 || self.attribute_max_tokens == 0 {
            return Err("max token budgets must be greater than 0".to_string());
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be greater than 0".to_string());
        }
        if self.retry.min_backoff_ms > self.retry.max_backoff_ms {
            return Err("retry.min_backoff_ms cannot exceed retry.max_backoff_ms".to_string());
        }
        if self.retry.multiplier < 1.0 {
            return Err("retry.multiplier must be at least 1.0".to_string());
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    /// The reference configuration
    fn default() -> Self {
        Self {
            roster: DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect(),
            clans: DEFAULT_CLANS.iter().map(|s| s.to_string()).collect(),
            groups: DEFAULT_GROUPS.iter().map(|s| s.to_string()).collect(),
            history_mode: HistoryMode::Incremental,
            request_timeout_secs: 30,
            relationship_max_tokens: 20,
            attribute_max_tokens: 10,
            retry: RetrySettings::default(),
        }
    }
}

impl TrackerConfig {
    /// Fast preset: short waits, for local models that fail fast
    pub fn fast() -> Self {
        Self {
            request_timeout_secs: 10,
            retry: RetrySettings {
                max_attempts: 2,
                min_backoff_ms: 250,
                max_backoff_ms: 2_000,
                multiplier: 2.0,
            },
            ..Self::default()
        }
    }

    /// Patient preset: more attempts and longer timeouts for busy endpoints
    pub fn patient() -> Self {
        Self {
            request_timeout_secs: 60,
            retry: RetrySettings {
                max_attempts: 5,
                min_backoff_ms: 4_000,
                max_backoff_ms: 30_000,
                multiplier: 2.0,
            },
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
