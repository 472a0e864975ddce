//! Service configuration and tuned pipeline constants

use std::time::Duration;

/// Pattern confidence below which the model is consulted
pub const AI_GATE_THRESHOLD: f64 = 0.30;
/// AI confidence at or above which the AI result wins outright
pub const AI_PRIMARY_THRESHOLD: f64 = 0.85;
/// Pattern confidence at or above which the two results are blended
pub const PATTERN_BLEND_THRESHOLD: f64 = 0.40;
pub const PATTERN_BLEND_WEIGHT: f64 = 0.4;
pub const AI_BLEND_WEIGHT: f64 = 0.6;
/// AI-sourced confidence is never treated as certain
pub const AI_CONFIDENCE_CAP: f64 = 0.95;

/// Confidence reported when no intent matched any trigger
pub const PATTERN_NO_MATCH_CONFIDENCE: f64 = 0.28;
/// Confidence of the generic intent when the model call or its JSON failed
pub const AI_ERROR_CONFIDENCE: f64 = 0.5;
/// Confidence of the generic intent when the model named an unknown intent
pub const AI_MISMATCH_CONFIDENCE: f64 = 0.6;

pub const GENERIC_INTENT: &str = "generic.transactional";

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Weights and thresholds of the classification merge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergePolicy {
    pub ai_primary_threshold: f64,
    pub pattern_blend_threshold: f64,
    pub pattern_weight: f64,
    pub ai_weight: f64,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            ai_primary_threshold: AI_PRIMARY_THRESHOLD,
            pattern_blend_threshold: PATTERN_BLEND_THRESHOLD,
            pattern_weight: PATTERN_BLEND_WEIGHT,
            ai_weight: AI_BLEND_WEIGHT,
        }
    }
}

/// Priority adjustments applied from usage history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingPolicy {
    pub high_frequency: f64,
    pub high_frequency_boost: u8,
    pub medium_frequency: f64,
    pub medium_frequency_boost: u8,
    pub execution_rate: f64,
    pub min_suggestions: u64,
    pub execution_boost: u8,
    pub recency_days: i64,
    pub recency_boost: u8,
    /// Corpus size after which unobserved actions are dropped
    pub filter_min_corpus: u64,
    /// Actions at or above this base priority survive the relevance filter
    pub filter_exempt_priority: u8,
    pub max_priority: u8,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            high_frequency: 0.15,
            high_frequency_boost: 10,
            medium_frequency: 0.08,
            medium_frequency_boost: 5,
            execution_rate: 0.75,
            min_suggestions: 5,
            execution_boost: 5,
            recency_days: 7,
            recency_boost: 3,
            filter_min_corpus: 100,
            filter_exempt_priority: 90,
            max_priority: 100,
        }
    }
}

/// Everything the pipeline needs to make decisions, independent of transport
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub ai_gate_threshold: f64,
    pub merge: MergePolicy,
    pub ranking: RankingPolicy,
    pub ai_timeout: Duration,
    pub corpus_timeout: Duration,
    pub cache_ttl: Duration,
    /// How long an expired registry entry may still be served when the corpus is down
    pub max_stale: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ai_gate_threshold: AI_GATE_THRESHOLD,
            merge: MergePolicy::default(),
            ranking: RankingPolicy::default(),
            ai_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            corpus_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_stale: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

/// Process-level settings read from the environment
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub corpus_service_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub taxonomy_path: Option<String>,
    pub pipeline: PipelineConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let mut pipeline = PipelineConfig::default();
        if let Some(secs) = env_parse::<u64>("AI_TIMEOUT_SECS") {
            pipeline.ai_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse::<u64>("CORPUS_TIMEOUT_SECS") {
            pipeline.corpus_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse::<u64>("REGISTRY_CACHE_TTL_SECS") {
            pipeline.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(threshold) = env_parse::<f64>("AI_GATE_THRESHOLD") {
            pipeline.ai_gate_threshold = threshold.clamp(0.0, 1.0);
        }

        Self {
            port: env_parse("PORT").unwrap_or(8090),
            corpus_service_url: env_non_empty("CORPUS_SERVICE_URL"),
            gemini_api_key: env_non_empty("GEMINI_API_KEY"),
            gemini_model: env_non_empty("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            gemini_base_url: env_non_empty("GEMINI_BASE_URL").unwrap_or_else(|| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            taxonomy_path: env_non_empty("TAXONOMY_PATH"),
            pipeline,
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.ai_gate_threshold, 0.30);
        assert_eq!(cfg.merge.ai_primary_threshold, 0.85);
        assert_eq!(cfg.merge.pattern_blend_threshold, 0.40);
        assert_eq!(cfg.merge.pattern_weight + cfg.merge.ai_weight, 1.0);
        assert_eq!(cfg.cache_ttl, Duration::from_secs(86_400));
        assert!(PATTERN_NO_MATCH_CONFIDENCE < AI_GATE_THRESHOLD);
    }
}
