//! mailintent - Email Intent Classification and Action Ranking
//!
//! Turns an incoming email into a ranked list of things the user can do with it:
//! - Pattern-based intent classification over a fixed taxonomy
//! - AI fallback when patterns are not confident, merged deterministically
//! - Compound multi-step actions detected from intent + entities
//! - Per-user priority personalization from corpus statistics, cached with a TTL

pub mod types;
pub mod error;
pub mod config;
pub mod taxonomy;
mod taxonomy_data;
pub mod extractors;
pub mod pattern;
pub mod email_text;
pub mod generative;
pub mod ai_classifier;
pub mod merger;
pub mod actions;
pub mod compound;
pub mod ranking;
pub mod corpus_client;
pub mod cache;
pub mod engine;
pub mod server;

pub use types::*;
pub use error::{PipelineError, PipelineResult};
pub use config::{PipelineConfig, ServiceConfig};
pub use taxonomy::{SharedTaxonomy, TaxonomyStore};
pub use pattern::PatternClassifier;
pub use generative::{GeminiModel, GenerativeModel, MockModel};
pub use ai_classifier::AiClassifier;
pub use actions::ActionCatalog;
pub use compound::CompoundRegistry;
pub use corpus_client::{CorpusStatsProvider, HttpCorpusClient, StaticCorpusProvider};
pub use cache::RegistryCache;
pub use engine::{ActionEngine, SharedActionEngine};

#[cfg(test)]
mod tests;
