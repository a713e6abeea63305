//! Relationship and attribute classifiers backed by the LLM oracle

use crate::parser::{parse_attribute_label, parse_tag_list};
use crate::prompt::{attribute_prompt, relationship_prompt};
use kizuna_domain::{Character, CharacterPair, CompletionRequest, LlmProvider, TagSet};
use kizuna_llm::{LlmError, RetryExhausted, RetryPolicy};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

/// A classifier call that failed for good
///
/// Distinct from an answer of "no relationship", which is `Ok` with an
/// empty tag set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// Every attempt failed, or the last error was permanent
    #[error("{operation} failed after {attempts} attempt(s): {source}")]
    Failed {
        /// What was being classified
        operation: String,

        /// Attempts made
        attempts: u32,

        /// The last error seen
        #[source]
        source: LlmError,
    },
}

impl From<RetryExhausted> for ClassifierError {
    fn from(e: RetryExhausted) -> Self {
        ClassifierError::Failed {
            operation: e.operation,
            attempts: e.attempts,
            source: e.source,
        }
    }
}

/// LLM access shared by the classifiers
///
/// Each attempt is bounded by `timeout`; attempts are driven by the retry
/// policy.
pub struct Oracle<L> {
    llm: Arc<L>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl<L> Clone for Oracle<L> {
    fn clone(&self) -> Self {
        Self {
            llm: Arc::clone(&self.llm),
            policy: self.policy.clone(),
            timeout: self.timeout,
        }
    }
}

impl<L> Oracle<L>
where
    L: LlmProvider<Error = LlmError>,
{
    /// Create a new oracle
    pub fn new(llm: L, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            llm: Arc::new(llm),
            policy,
            timeout,
        }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &L {
        &self.llm
    }

    /// Send one request, retrying transient failures
    pub async fn ask(
        &self,
        operation: &str,
        request: &CompletionRequest,
    ) -> Result<String, ClassifierError> {
        let llm = self.llm.as_ref();
        let limit = self.timeout;

        let reply = self
            .policy
            .run(operation, || async move {
                match timeout(limit, llm.generate(request)).await {
                    Ok(result) => result,
                    Err(_) => Err(LlmError::Timeout),
                }
            })
            .await?;

        debug!(operation, reply = %reply.trim(), "Oracle replied");
        Ok(reply)
    }
}

/// Classifies the relationship of a pair within one synopsis
pub struct RelationshipClassifier<L> {
    oracle: Oracle<L>,
    max_tokens: u32,
}

impl<L> RelationshipClassifier<L>
where
    L: LlmProvider<Error = LlmError>,
{
    /// Create a new relationship classifier
    pub fn new(oracle: Oracle<L>, max_tokens: u32) -> Self {
        Self { oracle, max_tokens }
    }

    /// Tags for `pair` in `synopsis`; empty when the oracle sees no relationship
    pub async fn classify(
        &self,
        pair: &CharacterPair,
        synopsis: &str,
    ) -> Result<TagSet, ClassifierError> {
        let request = CompletionRequest::new(relationship_prompt(pair, synopsis), self.max_tokens);
        let reply = self
            .oracle
            .ask(&format!("relationship {}", pair), &request)
            .await?;
        Ok(parse_tag_list(&reply))
    }
}

/// Attribute categories asked about each character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeCategory {
    /// Family clan
    Clan,

    /// Team or faction
    Group,
}

impl AttributeCategory {
    /// Category name as used in prompts and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeCategory::Clan => "clan",
            AttributeCategory::Group => "group",
        }
    }
}

impl fmt::Display for AttributeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute answer: an allowed label, or none
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttributeLabel {
    /// A label from the category's allowed set
    Label(String),

    /// No label applies, or the reply was unusable
    #[default]
    None,
}

impl AttributeLabel {
    /// The label, if any
    pub fn as_label(&self) -> Option<&str> {
        match self {
            AttributeLabel::Label(label) => Some(label),
            AttributeLabel::None => None,
        }
    }
}

impl fmt::Display for AttributeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeLabel::Label(label) => f.write_str(label),
            AttributeLabel::None => f.write_str("None"),
        }
    }
}

/// Classifies a character's clan or group
pub struct AttributeClassifier<L> {
    oracle: Oracle<L>,
    clans: Vec<String>,
    groups: Vec<String>,
    max_tokens: u32,
}

impl<L> AttributeClassifier<L>
where
    L: LlmProvider<Error = LlmError>,
{
    /// Create a new attribute classifier
    pub fn new(oracle: Oracle<L>, clans: Vec<String>, groups: Vec<String>, max_tokens: u32) -> Self {
        Self {
            oracle,
            clans,
            groups,
            max_tokens,
        }
    }

    /// Allowed labels for a category
    pub fn labels(&self, category: AttributeCategory) -> &[String] {
        match category {
            AttributeCategory::Clan => &self.clans,
            AttributeCategory::Group => &self.groups,
        }
    }

    /// Ask for `character`'s label in `category`
    ///
    /// A reply outside the allowed set is `Ok(AttributeLabel::None)`.
    pub async fn classify(
        &self,
        character: &Character,
        category: AttributeCategory,
    ) -> Result<AttributeLabel, ClassifierError> {
        let labels = self.labels(category);
        let request = CompletionRequest::new(
            attribute_prompt(character, category.as_str(), labels),
            self.max_tokens,
        );
        let reply = self
            .oracle
            .ask(&format!("{} of {}", category, character), &request)
            .await?;

        Ok(match parse_attribute_label(&reply, labels) {
            Some(label) => AttributeLabel::Label(label.to_string()),
            None => AttributeLabel::None,
        })
    }
}
