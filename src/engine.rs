//! Core ActionEngine: classification, compound detection and personalized ranking

use crate::actions::ActionCatalog;
use crate::ai_classifier::AiClassifier;
use crate::cache::{CacheKey, CacheStats, CachedRegistry, RegistryCache, StalePolicy};
use crate::compound::CompoundRegistry;
use crate::config::{PipelineConfig, DEFAULT_WINDOW_DAYS};
use crate::corpus_client::CorpusStatsProvider;
use crate::error::{PipelineError, PipelineResult};
use crate::generative::GenerativeModel;
use crate::merger::merge;
use crate::pattern::PatternClassifier;
use crate::ranking::{personalized_priority, rank_actions, sort_ranked};
use crate::taxonomy::SharedTaxonomy;
use crate::types::*;
use chrono::Utc;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Largest batch accepted by `classify_batch`
pub const MAX_BATCH_SIZE: usize = 100;
/// Longest statistics window a caller may ask for
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Unpersonalized catalog for one mode
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListing {
    pub mode: ActionMode,
    pub count: usize,
    pub actions: BTreeMap<String, ActionDefinition>,
    pub compounds: Vec<CompoundActionDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyEntry {
    pub id: String,
    pub description: String,
}

/// Outcome of asking the corpus service for a user's statistics
enum StatsFetch {
    Disabled,
    Fetched(CorpusStats),
    Failed,
}

/// Main action engine (thread-safe via Arc)
pub struct ActionEngine {
    taxonomy: SharedTaxonomy,
    catalog: Arc<ActionCatalog>,
    compounds: Arc<CompoundRegistry>,
    pattern: PatternClassifier,
    ai: Option<AiClassifier>,
    corpus: Option<Arc<dyn CorpusStatsProvider>>,
    cache: RegistryCache,
    config: PipelineConfig,
}

pub type SharedActionEngine = Arc<ActionEngine>;

impl ActionEngine {
    /// Engine over the builtin action catalog and compound registry
    pub fn new(taxonomy: SharedTaxonomy, config: PipelineConfig) -> PipelineResult<Self> {
        Self::with_tables(
            taxonomy,
            Arc::new(ActionCatalog::builtin()?),
            Arc::new(CompoundRegistry::builtin()?),
            config,
        )
    }

    /// Engine over caller-supplied tables; cross references are checked here
    pub fn with_tables(
        taxonomy: SharedTaxonomy,
        catalog: Arc<ActionCatalog>,
        compounds: Arc<CompoundRegistry>,
        config: PipelineConfig,
    ) -> PipelineResult<Self> {
        catalog.validate_against(&taxonomy)?;
        compounds.validate_against(&catalog, &taxonomy)?;

        let stale_policy = if config.max_stale.is_zero() {
            StalePolicy::Never
        } else {
            StalePolicy::ServeStaleFor(config.max_stale)
        };

        Ok(Self {
            pattern: PatternClassifier::new(taxonomy.clone()),
            taxonomy,
            catalog,
            compounds,
            ai: None,
            corpus: None,
            cache: RegistryCache::new(config.cache_ttl, stale_policy),
            config,
        })
    }

    /// Enable the AI fallback classifier
    pub fn with_model(mut self, model: Arc<dyn GenerativeModel>) -> Self {
        self.ai = Some(AiClassifier::new(model, self.taxonomy.clone(), self.config.ai_timeout));
        self
    }

    /// Enable personalization from corpus statistics
    pub fn with_corpus(mut self, provider: Arc<dyn CorpusStatsProvider>) -> Self {
        self.corpus = Some(provider);
        self
    }

    pub fn into_shared(self) -> SharedActionEngine {
        Arc::new(self)
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    pub fn personalization_enabled(&self) -> bool {
        self.corpus.is_some()
    }

    pub fn taxonomy_listing(&self) -> Vec<TaxonomyEntry> {
        self.taxonomy
            .iter()
            .map(|intent| TaxonomyEntry {
                id: intent.id.clone(),
                description: intent.description.clone(),
            })
            .collect()
    }

    /// Classify one email: patterns first, the model only below the gate (or when forced).
    ///
    /// An email without any text gets the pattern no-match result; there is
    /// nothing for the model to read.
    pub async fn classify(&self, email: &Email, options: ClassifyOptions) -> ClassificationResult {
        let start = Instant::now();

        let pattern = self.pattern.classify(email);
        let has_text = !email.subject.trim().is_empty() || !email.content().trim().is_empty();
        if !has_text {
            debug!("Email from '{}' has no subject, body or snippet", email.from);
        }
        let needs_ai =
            has_text && (options.force_ai || pattern.confidence < self.config.ai_gate_threshold);

        let result = match (&self.ai, needs_ai) {
            (Some(ai), true) => {
                debug!(
                    "Pattern confidence {:.2} for {}; consulting {}",
                    pattern.confidence,
                    pattern.intent_id,
                    ai.model_name()
                );
                let ai_result = ai.classify(email).await;
                merge(pattern, ai_result, &self.config.merge)
            }
            _ => pattern,
        };
        let result = self.attach_suggestions(result);

        info!(
            "Classified '{}' as {} ({:.2}, {}) in {}ms",
            truncate_for_log(&email.subject),
            result.intent_id,
            result.confidence,
            result.source,
            start.elapsed().as_millis()
        );
        result
    }

    /// Classify up to `MAX_BATCH_SIZE` emails concurrently, preserving order
    pub async fn classify_batch(
        &self,
        emails: &[Email],
    ) -> PipelineResult<Vec<ClassificationResult>> {
        if emails.is_empty() {
            return Err(PipelineError::validation("emails must not be empty"));
        }
        if emails.len() > MAX_BATCH_SIZE {
            return Err(PipelineError::validation(format!(
                "batch of {} emails exceeds the limit of {}",
                emails.len(),
                MAX_BATCH_SIZE
            )));
        }

        let tasks = emails
            .iter()
            .map(|email| self.classify(email, ClassifyOptions::default()));
        Ok(futures::future::join_all(tasks).await)
    }

    /// Classification plus the ranked, possibly compound, action list for one email
    pub async fn suggest_actions(
        &self,
        email: &Email,
        user_id: Option<&str>,
        mode: ActionMode,
    ) -> PipelineResult<SuggestionResponse> {
        let classification = self.classify(email, ClassifyOptions::default()).await;
        let entities = &classification.entities;

        let user_id = user_id.map(str::trim).filter(|u| !u.is_empty());
        let (personal, personalization_applied) = match user_id {
            Some(user) => {
                let registry = self
                    .registry(&RegistryQuery {
                        user_id: user.to_string(),
                        mode,
                        window_days: DEFAULT_WINDOW_DAYS,
                        limit: None,
                        bust_cache: false,
                    })
                    .await?;
                let applied = registry.metadata.personalization_applied;
                let by_id: HashMap<String, RankedAction> = registry
                    .actions
                    .into_iter()
                    .map(|ranked| (ranked.action.id.clone(), ranked))
                    .collect();
                (by_id, applied)
            }
            None => (HashMap::new(), false),
        };

        // Email context overrides the registry's relevance filter: anything
        // applicable and executable is a candidate, at its personal priority if known.
        let mut ranked: Vec<RankedAction> = self
            .catalog
            .for_intent(&classification.intent_id, mode)
            .into_iter()
            .filter(|action| ActionCatalog::executable(action, entities))
            .map(|action| {
                personal.get(&action.id).cloned().unwrap_or_else(|| RankedAction {
                    action: action.clone(),
                    priority: action.base_priority,
                    user_stats: None,
                })
            })
            .collect();

        let compound = self.compounds.detect(&classification.intent_id, entities).cloned();
        if let Some(compound) = &compound {
            // Step actions stay available individually even when the intent doesn't list them
            for step in &compound.steps {
                if ranked.iter().any(|r| &r.action.id == step) {
                    continue;
                }
                if let Some(action) = self.catalog.get(step).filter(|a| a.mode.offered_in(mode)) {
                    ranked.push(personal.get(step).cloned().unwrap_or_else(|| RankedAction {
                        action: action.clone(),
                        priority: action.base_priority,
                        user_stats: None,
                    }));
                }
            }
        }
        sort_ranked(&mut ranked);

        let actions = build_suggestions(&ranked, compound.as_ref());
        info!(
            "Suggested {} actions for {} (compound: {}, personalized: {})",
            actions.len(),
            classification.intent_id,
            compound.as_ref().map_or("none", |c| c.id.as_str()),
            personalization_applied
        );

        Ok(SuggestionResponse {
            classification,
            actions,
            compound,
            personalization_applied,
        })
    }

    /// Personalized action registry for a user, served from cache when fresh
    pub async fn registry(&self, query: &RegistryQuery) -> PipelineResult<RegistryResponse> {
        let user_id = query.user_id.trim();
        if user_id.is_empty() {
            return Err(PipelineError::validation("userId is required"));
        }
        validate_window(query.window_days)?;

        let key = CacheKey::new(user_id, query.mode, query.window_days);
        if !query.bust_cache {
            if let Some(entry) = self.cache.get(&key) {
                return Ok(registry_response(entry, query.limit, true, false));
            }
        }

        let entry = match self.fetch_stats(user_id, query.window_days).await {
            StatsFetch::Fetched(stats) => {
                let outcome = rank_actions(
                    &self.catalog.for_mode(query.mode),
                    &stats,
                    &self.config.ranking,
                    Utc::now(),
                );
                let entry = CachedRegistry::new(
                    outcome.actions,
                    stats.overall.total_emails,
                    outcome.filtered,
                    outcome.personalization_applied,
                );
                self.cache.insert(key, entry.clone());
                info!(
                    "Registry for {}: {} actions ({} filtered, corpus {})",
                    user_id,
                    entry.actions.len(),
                    entry.actions_filtered,
                    entry.corpus_size
                );
                entry
            }
            StatsFetch::Failed => {
                if let Some(stale) = self.cache.get_stale(&key) {
                    warn!(
                        "Serving stale registry for {} ({}s old)",
                        user_id,
                        stale.age().as_secs()
                    );
                    return Ok(registry_response(stale, query.limit, true, true));
                }
                self.unpersonalized(query.mode)
            }
            StatsFetch::Disabled => self.unpersonalized(query.mode),
        };

        Ok(registry_response(entry, query.limit, false, false))
    }

    /// One action, with the user's usage stats when a user is given
    pub async fn action_detail(
        &self,
        action_id: &str,
        user_id: Option<&str>,
        window_days: u32,
    ) -> PipelineResult<RankedAction> {
        let action = self.catalog.get(action_id).ok_or_else(|| PipelineError::NotFound {
            kind: "action",
            id: action_id.to_string(),
        })?;
        validate_window(window_days)?;

        let stats = match user_id.map(str::trim).filter(|u| !u.is_empty()) {
            Some(user) => match self.fetch_stats(user, window_days).await {
                StatsFetch::Fetched(stats) => stats,
                StatsFetch::Failed | StatsFetch::Disabled => CorpusStats::empty(),
            },
            None => CorpusStats::empty(),
        };
        let stat = stats.stat_for(action_id);

        Ok(RankedAction {
            action: action.clone(),
            priority: personalized_priority(
                action.base_priority,
                stat,
                &self.config.ranking,
                Utc::now(),
            ),
            user_stats: stat.cloned(),
        })
    }

    pub fn catalog(&self, mode: ActionMode) -> CatalogListing {
        let actions: BTreeMap<String, ActionDefinition> = self
            .catalog
            .for_mode(mode)
            .into_iter()
            .map(|a| (a.id.clone(), a.clone()))
            .collect();
        CatalogListing {
            mode,
            count: actions.len(),
            actions,
            compounds: self.compounds.iter().cloned().collect(),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) -> usize {
        let removed = self.cache.clear();
        info!("Cleared registry cache ({} entries)", removed);
        removed
    }

    pub fn invalidate_user(&self, user_id: &str) -> usize {
        let removed = self.cache.invalidate_user(user_id);
        info!("Invalidated {} registry entries for {}", removed, user_id);
        removed
    }

    async fn fetch_stats(&self, user_id: &str, window_days: u32) -> StatsFetch {
        let Some(provider) = &self.corpus else {
            return StatsFetch::Disabled;
        };
        let timeout = self.config.corpus_timeout;
        let fetch = provider.user_stats(user_id, window_days);
        match tokio::time::timeout(timeout, fetch).await {
            Ok(Ok(stats)) => StatsFetch::Fetched(stats),
            Ok(Err(e)) => {
                warn!("Corpus stats from {} failed for {}: {:#}", provider.name(), user_id, e);
                StatsFetch::Failed
            }
            Err(_) => {
                warn!("Corpus stats for {} timed out after {:?}", user_id, timeout);
                StatsFetch::Failed
            }
        }
    }

    fn unpersonalized(&self, mode: ActionMode) -> CachedRegistry {
        let outcome = rank_actions(
            &self.catalog.for_mode(mode),
            &CorpusStats::empty(),
            &self.config.ranking,
            Utc::now(),
        );
        CachedRegistry::new(outcome.actions, 0, 0, false)
    }

    /// Catalog-known model suggestions first, then executable actions by base priority
    fn attach_suggestions(&self, mut result: ClassificationResult) -> ClassificationResult {
        let mut ids: Vec<String> = result
            .suggested_actions
            .iter()
            .filter(|id| self.catalog.contains(id))
            .cloned()
            .collect();

        let mut candidates: Vec<&ActionDefinition> = self
            .catalog
            .for_intent(&result.intent_id, ActionMode::Both)
            .into_iter()
            .filter(|a| ActionCatalog::executable(a, &result.entities))
            .collect();
        candidates.sort_by(|a, b| {
            b.base_priority
                .cmp(&a.base_priority)
                .then_with(|| a.id.cmp(&b.id))
        });

        for action in candidates {
            if !ids.contains(&action.id) {
                ids.push(action.id.clone());
            }
        }
        result.suggested_actions = ids;
        result
    }
}

/// The first entry is primary: the compound when one was detected, else the top atomic action
fn build_suggestions(
    ranked: &[RankedAction],
    compound: Option<&CompoundActionDefinition>,
) -> Vec<SuggestedAction> {
    let mut suggestions = Vec::with_capacity(ranked.len() + 1);

    if let Some(compound) = compound {
        let top_atomic = ranked.iter().map(|r| r.priority as u16).max().unwrap_or(0);
        suggestions.push(SuggestedAction {
            action_id: compound.id.clone(),
            display_name: compound.display_name.clone(),
            kind: None,
            priority: top_atomic + 1,
            role: SuggestionRole::Primary,
            is_compound: true,
            steps: compound.steps.clone(),
            end_behavior: Some(compound.end_behavior),
            permission_tier: if compound.is_premium {
                PermissionTier::Premium
            } else {
                PermissionTier::Free
            },
        });
    }

    for ranked_action in ranked {
        let role = if suggestions.is_empty() {
            SuggestionRole::Primary
        } else {
            SuggestionRole::Alternative
        };
        suggestions.push(SuggestedAction {
            action_id: ranked_action.action.id.clone(),
            display_name: ranked_action.action.display_name.clone(),
            kind: Some(ranked_action.action.kind),
            priority: ranked_action.priority as u16,
            role,
            is_compound: false,
            steps: Vec::new(),
            end_behavior: None,
            permission_tier: ranked_action.action.permission_tier,
        });
    }

    suggestions
}

fn registry_response(
    entry: CachedRegistry,
    limit: Option<usize>,
    from_cache: bool,
    stale: bool,
) -> RegistryResponse {
    let mut actions = entry.actions;
    if let Some(limit) = limit {
        actions.truncate(limit);
    }
    RegistryResponse {
        metadata: RegistryMetadata {
            corpus_size: entry.corpus_size,
            actions_returned: actions.len(),
            actions_filtered: entry.actions_filtered,
            personalization_applied: entry.personalization_applied,
            from_cache,
            stale,
        },
        actions,
    }
}

fn validate_window(days: u32) -> PipelineResult<()> {
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(PipelineError::validation(format!(
            "days must be between 1 and {}",
            MAX_WINDOW_DAYS
        )));
    }
    Ok(())
}

fn truncate_for_log(text: &str) -> &str {
    crate::email_text::truncate_chars(text, 60)
}

impl std::fmt::Debug for ActionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEngine")
            .field("intents", &self.taxonomy.len())
            .field("actions", &self.catalog.len())
            .field("compounds", &self.compounds.len())
            .field("ai_enabled", &self.ai_enabled())
            .field("personalization_enabled", &self.personalization_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus_client::StaticCorpusProvider;
    use crate::generative::MockModel;
    use crate::taxonomy::TaxonomyStore;

    fn engine() -> ActionEngine {
        let taxonomy = Arc::new(TaxonomyStore::builtin().unwrap());
        ActionEngine::new(taxonomy, PipelineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_email_gets_no_match_result() {
        let model = Arc::new(MockModel::replying(
            r#"{"intent": "generic.personal", "confidence": 0.9}"#,
        ));
        let e = engine().with_model(model.clone());
        let result = e.classify(&Email::default(), ClassifyOptions { force_ai: true }).await;
        assert_eq!(result.intent_id, "generic.transactional");
        assert_eq!(result.confidence, 0.28);
        assert_eq!(result.source, ClassificationSource::Pattern);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_email_does_not_fail_batch() {
        let shipping = Email::new(
            "Your package has shipped — Tracking 1Z999AA10123456784",
            "orders@shop.example.com",
            "Your package is on its way. Carrier: UPS",
        );
        let results = engine()
            .classify_batch(&[shipping, Email::default()])
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].intent_id, "e-commerce.shipping.notification");
        assert_eq!(results[1].intent_id, "generic.transactional");
        assert_eq!(results[1].confidence, 0.28);
    }

    #[tokio::test]
    async fn test_batch_limits() {
        let e = engine();
        assert!(e.classify_batch(&[]).await.is_err());
        let too_many = vec![Email::new("Invoice", "", "amount due"); MAX_BATCH_SIZE + 1];
        assert!(matches!(
            e.classify_batch(&too_many).await,
            Err(PipelineError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_registry_requires_user() {
        let query = RegistryQuery {
            user_id: "  ".to_string(),
            mode: ActionMode::Mail,
            window_days: 30,
            limit: None,
            bust_cache: false,
        };
        assert!(matches!(engine().registry(&query).await, Err(PipelineError::Validation(_))));
    }

    #[tokio::test]
    async fn test_registry_without_corpus_is_unpersonalized_and_uncached() {
        let e = engine();
        let query = RegistryQuery {
            user_id: "u1".to_string(),
            mode: ActionMode::Mail,
            window_days: 30,
            limit: Some(5),
            bust_cache: false,
        };
        let response = e.registry(&query).await.unwrap();
        assert_eq!(response.actions.len(), 5);
        assert!(!response.metadata.personalization_applied);
        assert!(!response.metadata.from_cache);
        assert_eq!(e.cache_stats().entries, 0);
        assert!(response.actions.windows(2).all(|w| w[0].priority >= w[1].priority));
    }

    #[tokio::test]
    async fn test_action_detail() {
        let e = engine().with_corpus(Arc::new(StaticCorpusProvider::new()));
        let detail = e.action_detail("track_package", Some("u1"), 30).await.unwrap();
        assert_eq!(detail.priority, 90);
        assert!(detail.user_stats.is_none());
        assert!(matches!(
            e.action_detail("teleport", None, 30).await,
            Err(PipelineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_catalog_listing_by_mode() {
        let e = engine();
        let ads = e.catalog(ActionMode::Ads);
        assert!(ads.actions.contains_key("copy_promo_code"));
        assert!(!ads.actions.contains_key("track_package"));
        assert_eq!(ads.count, ads.actions.len());
        assert_eq!(ads.compounds.len(), 8);
    }

    #[test]
    fn test_compound_priority_above_atomic() {
        let registry = CompoundRegistry::builtin().unwrap();
        let catalog = ActionCatalog::builtin().unwrap();
        let sign = catalog.get("sign_form").unwrap().clone();
        let ranked = vec![RankedAction {
            action: sign,
            priority: 100,
            user_stats: None,
        }];
        let suggestions = build_suggestions(&ranked, registry.get("sign_and_send"));
        assert_eq!(suggestions[0].priority, 101);
        assert!(suggestions[0].is_compound);
        assert_eq!(suggestions[0].role, SuggestionRole::Primary);
        assert_eq!(suggestions[1].role, SuggestionRole::Alternative);
    }
}
