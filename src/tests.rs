//! End-to-end pipeline scenarios for ActionEngine

use crate::generative::ProviderErrorKind;
use crate::*;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn taxonomy() -> SharedTaxonomy {
    Arc::new(TaxonomyStore::builtin().unwrap())
}

fn engine_with(config: PipelineConfig) -> ActionEngine {
    ActionEngine::new(taxonomy(), config).unwrap()
}

fn shipping_email() -> Email {
    Email::new(
        "Your package has shipped — Tracking 1Z999AA10123456784",
        "orders@shop.example.com",
        "Your package is on its way. Carrier: UPS",
    )
}

fn permission_email() -> Email {
    Email::new(
        "Field trip permission slip",
        "office@school.example.org",
        "Please sign and return by 2025-11-10. \
         The trip costs $45 and takes place on November 15, 2025.",
    )
}

fn unmatched_email() -> Email {
    Email::new("Zxqv", "", "Lorem ipsum dolor sit amet.")
}

fn registry_query(user: &str) -> RegistryQuery {
    RegistryQuery {
        user_id: user.to_string(),
        mode: ActionMode::Mail,
        window_days: 30,
        limit: None,
        bust_cache: false,
    }
}

/// Heavy user of view_order, light corpus (no relevance filtering)
fn heavy_view_order_stats() -> CorpusStats {
    CorpusStats {
        overall: CorpusOverview {
            total_emails: 50,
            total_actions: 20,
        },
        top_actions: vec![UserActionStat {
            action_id: "view_order".to_string(),
            frequency: 0.2,
            times_suggested: 10,
            times_executed: 8,
            execution_rate: 0.8,
            last_used_at: Some(Utc::now() - ChronoDuration::days(1)),
        }],
        top_intents: vec![],
    }
}

/// Answers once, then fails every call
struct FlakyProvider {
    stats: CorpusStats,
    calls: AtomicUsize,
}

#[async_trait]
impl CorpusStatsProvider for FlakyProvider {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn user_stats(&self, _user_id: &str, _window_days: u32) -> Result<CorpusStats> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(self.stats.clone())
        } else {
            anyhow::bail!("connection refused")
        }
    }
}

#[tokio::test]
async fn test_shipping_email_suggests_tracking() {
    let engine = engine_with(PipelineConfig::default());
    let response = engine
        .suggest_actions(&shipping_email(), None, ActionMode::Mail)
        .await
        .unwrap();

    let classification = &response.classification;
    assert_eq!(classification.intent_id, "e-commerce.shipping.notification");
    assert!(classification.confidence >= 0.85);
    assert_eq!(classification.source, ClassificationSource::Pattern);
    assert_eq!(
        classification.entities.get("trackingNumber"),
        Some(&EntityValue::from("1Z999AA10123456784"))
    );
    assert_eq!(classification.entities.get("carrier"), Some(&EntityValue::from("UPS")));

    assert!(response.compound.is_none());
    let ids: Vec<_> = response.actions.iter().map(|a| a.action_id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["track_package", "view_order", "quick_reply", "archive", "save_for_later"]
    );
    assert_eq!(response.actions[0].role, SuggestionRole::Primary);
    assert_eq!(response.actions[0].priority, 90);
    assert!(response.actions[1..].iter().all(|a| a.role == SuggestionRole::Alternative));
}

#[tokio::test]
async fn test_permission_form_prefers_payment_compound() {
    let engine = engine_with(PipelineConfig::default());
    let response = engine
        .suggest_actions(&permission_email(), None, ActionMode::Mail)
        .await
        .unwrap();

    assert_eq!(response.classification.intent_id, "education.permission.form");
    let compound = response.compound.as_ref().unwrap();
    assert_eq!(compound.id, "sign_form_with_payment");
    assert_eq!(compound.steps, vec!["sign_form", "pay_fee"]);

    let primary = &response.actions[0];
    assert!(primary.is_compound);
    assert_eq!(primary.action_id, "sign_form_with_payment");
    assert_eq!(primary.priority, 96);
    assert_eq!(primary.permission_tier, PermissionTier::Premium);

    // Atomic steps remain available as alternatives
    let alternatives: Vec<_> = response.actions[1..].iter().map(|a| a.action_id.as_str()).collect();
    assert_eq!(&alternatives[..3], &["sign_form", "pay_fee", "add_to_calendar"]);
}

#[tokio::test]
async fn test_unknown_model_intent_degrades_to_generic() {
    let model = Arc::new(MockModel::replying(
        r#"{"intent": "shopping.mystery.box", "confidence": 0.92, "reasoning": "a box"}"#,
    ));
    let engine = engine_with(PipelineConfig::default()).with_model(model.clone());

    let result = engine.classify(&unmatched_email(), ClassifyOptions::default()).await;

    assert_eq!(model.calls(), 1);
    assert_eq!(result.intent_id, "generic.transactional");
    assert_eq!(result.confidence, 0.6);
    assert_eq!(result.source, ClassificationSource::AiErrorFallback);
}

#[tokio::test]
async fn test_confident_pattern_skips_model() {
    let model = Arc::new(MockModel::failing(ProviderErrorKind::ServerError, "not called"));
    let engine = engine_with(PipelineConfig::default()).with_model(model.clone());

    let result = engine.classify(&shipping_email(), ClassifyOptions::default()).await;

    assert_eq!(model.calls(), 0);
    assert_eq!(result.source, ClassificationSource::Pattern);
}

#[tokio::test]
async fn test_forced_model_blends_with_pattern() {
    let model = Arc::new(MockModel::replying(
        r#"{"intent": "e-commerce.shipping.notification", "confidence": 0.7,
            "entities": {"deliveryDate": "2025-11-21"}}"#,
    ));
    let engine = engine_with(PipelineConfig::default()).with_model(model.clone());

    let pattern_only = engine_with(PipelineConfig::default())
        .classify(&shipping_email(), ClassifyOptions::default())
        .await;
    let result = engine.classify(&shipping_email(), ClassifyOptions { force_ai: true }).await;

    assert_eq!(model.calls(), 1);
    assert_eq!(result.source, ClassificationSource::Hybrid);
    assert_eq!(result.intent_id, "e-commerce.shipping.notification");
    let expected = 0.4 * pattern_only.confidence + 0.6 * 0.7;
    assert!((result.confidence - expected).abs() < 1e-9);
    assert!(result.entities.contains_key("trackingNumber"));
    assert!(result.entities.contains_key("deliveryDate"));
}

#[tokio::test]
async fn test_model_outage_keeps_pattern_result() {
    let model = Arc::new(MockModel::failing(ProviderErrorKind::Network, "connection reset"));
    let engine = engine_with(PipelineConfig::default()).with_model(model.clone());

    let result = engine.classify(&shipping_email(), ClassifyOptions { force_ai: true }).await;

    assert_eq!(model.calls(), 1);
    assert_eq!(result.intent_id, "e-commerce.shipping.notification");
    assert_eq!(result.source, ClassificationSource::Pattern);
}

#[tokio::test]
async fn test_corpus_timeout_returns_base_priorities() {
    let config = PipelineConfig {
        corpus_timeout: Duration::from_millis(20),
        ..PipelineConfig::default()
    };
    let provider = Arc::new(StaticCorpusProvider::new().with_delay(Duration::from_millis(500)));
    let engine = engine_with(config).with_corpus(provider.clone());

    let registry = engine.registry(&registry_query("u1")).await.unwrap();
    assert!(!registry.metadata.personalization_applied);
    assert!(!registry.metadata.from_cache);
    assert!(registry.actions.iter().all(|r| r.priority == r.action.base_priority));
    assert_eq!(engine.cache_stats().entries, 0);

    let response = engine
        .suggest_actions(&shipping_email(), Some("u1"), ActionMode::Mail)
        .await
        .unwrap();
    assert!(!response.personalization_applied);
    assert_eq!(response.actions[0].action_id, "track_package");
    assert_eq!(response.actions[0].priority, 90);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_personal_history_reorders_suggestions() {
    let provider = StaticCorpusProvider::new().with_user("u1", heavy_view_order_stats());
    let engine = engine_with(PipelineConfig::default()).with_corpus(Arc::new(provider));

    let response = engine
        .suggest_actions(&shipping_email(), Some("u1"), ActionMode::Mail)
        .await
        .unwrap();

    assert!(response.personalization_applied);
    assert_eq!(response.actions[0].action_id, "view_order");
    assert_eq!(response.actions[0].priority, 93);
    assert_eq!(response.actions[1].action_id, "track_package");

    // Someone else sees the default order
    let other = engine
        .suggest_actions(&shipping_email(), Some("u2"), ActionMode::Mail)
        .await
        .unwrap();
    assert_eq!(other.actions[0].action_id, "track_package");
}

#[tokio::test]
async fn test_registry_cache_lifecycle() {
    let provider = Arc::new(StaticCorpusProvider::new().with_user("u1", heavy_view_order_stats()));
    let engine = engine_with(PipelineConfig::default()).with_corpus(provider.clone());

    let first = engine.registry(&registry_query("u1")).await.unwrap();
    let second = engine.registry(&registry_query("u1")).await.unwrap();
    assert!(!first.metadata.from_cache);
    assert!(second.metadata.from_cache);
    assert_eq!(first.actions, second.actions);
    assert_eq!(provider.calls(), 1);

    let busted = engine
        .registry(&RegistryQuery {
            bust_cache: true,
            ..registry_query("u1")
        })
        .await
        .unwrap();
    assert!(!busted.metadata.from_cache);
    assert_eq!(provider.calls(), 2);

    assert_eq!(engine.invalidate_user("u1"), 1);
    let refetched = engine.registry(&registry_query("u1")).await.unwrap();
    assert!(!refetched.metadata.from_cache);
    assert_eq!(provider.calls(), 3);

    let stats = engine.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.entries, 1);
    assert_eq!(engine.clear_cache(), 1);
}

#[tokio::test]
async fn test_stale_registry_served_when_corpus_fails() {
    let config = PipelineConfig {
        cache_ttl: Duration::ZERO,
        max_stale: Duration::from_secs(60),
        ..PipelineConfig::default()
    };
    let provider = Arc::new(FlakyProvider {
        stats: heavy_view_order_stats(),
        calls: AtomicUsize::new(0),
    });
    let engine = engine_with(config).with_corpus(provider.clone());

    let fresh = engine.registry(&registry_query("u1")).await.unwrap();
    assert!(fresh.metadata.personalization_applied);

    let stale = engine.registry(&registry_query("u1")).await.unwrap();
    assert!(stale.metadata.from_cache);
    assert!(stale.metadata.stale);
    assert!(stale.metadata.personalization_applied);
    assert_eq!(stale.actions, fresh.actions);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert_eq!(engine.cache_stats().stale_served, 1);
}

#[tokio::test]
async fn test_large_corpus_filters_unseen_actions() {
    let mut stats = heavy_view_order_stats();
    stats.overall.total_emails = 400;
    let provider = StaticCorpusProvider::new().with_user("u1", stats);
    let engine = engine_with(PipelineConfig::default()).with_corpus(Arc::new(provider));

    let registry = engine.registry(&registry_query("u1")).await.unwrap();
    assert!(registry.metadata.actions_filtered > 0);
    assert_eq!(registry.metadata.corpus_size, 400);
    assert!(registry
        .actions
        .iter()
        .all(|r| r.action.generic || r.user_stats.is_some() || r.action.base_priority >= 90));

    // Email context still offers filtered actions that apply
    let response = engine
        .suggest_actions(&shipping_email(), Some("u1"), ActionMode::Mail)
        .await
        .unwrap();
    assert!(response.actions.iter().any(|a| a.action_id == "track_package"));
}

#[tokio::test]
async fn test_batch_classification_keeps_order() {
    let engine = engine_with(PipelineConfig::default());
    let emails = vec![permission_email(), unmatched_email(), shipping_email()];
    let results = engine.classify_batch(&emails).await.unwrap();
    let intents: Vec<_> = results.iter().map(|r| r.intent_id.as_str()).collect();
    assert_eq!(
        intents,
        vec![
            "education.permission.form",
            "generic.transactional",
            "e-commerce.shipping.notification"
        ]
    );
}

#[test]
fn test_ads_mode_only_offers_ads_actions() {
    let engine = engine_with(PipelineConfig::default());
    let email = Email::new(
        "Flash sale: 30% off everything",
        "deals@shop.example.com",
        "Use promo code SAVE30 at checkout. Limited time offer.",
    );
    let response =
        tokio_test::block_on(engine.suggest_actions(&email, None, ActionMode::Ads)).unwrap();
    assert!(!response.actions.is_empty());
    assert!(response
        .actions
        .iter()
        .all(|a| a.action_id != "track_package" && a.action_id != "pay_invoice"));
}

#[test]
fn test_action_detail_blocking() {
    let provider = StaticCorpusProvider::new().with_user("u1", heavy_view_order_stats());
    let engine = engine_with(PipelineConfig::default()).with_corpus(Arc::new(provider));

    let detail = tokio_test::block_on(engine.action_detail("view_order", Some("u1"), 30)).unwrap();
    assert_eq!(detail.priority, 93);
    assert_eq!(detail.user_stats.as_ref().map(|s| s.times_executed), Some(8));

    let anonymous = tokio_test::block_on(engine.action_detail("view_order", None, 30)).unwrap();
    assert_eq!(anonymous.priority, 75);
    assert!(matches!(
        tokio_test::block_on(engine.action_detail("view_order", None, 0)),
        Err(PipelineError::Validation(_))
    ));
}
