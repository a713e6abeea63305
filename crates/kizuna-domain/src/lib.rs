//! Kizuna Domain Layer
//!
//! This crate contains the core vocabulary of Kizuna: the tracked characters,
//! the relationship tags an oracle may assign to a pair of them, and the
//! taxonomy that sorts those tags into lasting and episode-local kinds.
//! It has no external dependencies and defines the trait that LLM providers
//! implement for the rest of the workspace.
//!
//! ## Key Concepts
//!
//! - **Character**: a name drawn from a fixed, closed roster
//! - **Character Pair**: an unordered pair of distinct characters
//! - **Tag Set**: the relationship tags observed for a pair in one episode
//! - **Taxonomy**: permanent vs temporary tags, plus the key-event subset
//! - **Episode**: identifier, arc label and synopsis text
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure lookups and value types only
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod character;
pub mod episode;
pub mod tags;
pub mod taxonomy;
pub mod traits;

// Re-exports for convenience
pub use character::{Character, CharacterPair, Roster};
pub use episode::Episode;
pub use tags::TagSet;
pub use taxonomy::{classify_tag_type, is_key_event, KeyEvent, TagType};
pub use traits::{CompletionRequest, LlmProvider};
