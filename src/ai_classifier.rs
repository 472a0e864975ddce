//! AI fallback classifier
//!
//! Asks a generative model to pick an intent from the taxonomy when pattern
//! matching is not confident. Every failure mode degrades to the generic
//! intent with a fixed confidence; the caller never sees an error.

use crate::config::{AI_CONFIDENCE_CAP, AI_ERROR_CONFIDENCE, AI_MISMATCH_CONFIDENCE};
use crate::email_text::clean_body;
use crate::extractors::extract_entities;
use crate::generative::{GenerativeModel, ProviderError};
use crate::taxonomy::SharedTaxonomy;
use crate::types::{ClassificationResult, ClassificationSource, Email, EntityMap, EntityValue};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Why a model answer could not be used
#[derive(Debug, thiserror::Error)]
pub enum AiFailure {
    #[error("model unavailable: {0}")]
    UpstreamUnavailable(#[from] ProviderError),
    #[error("model did not answer within {0:?}")]
    TimedOut(Duration),
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
    #[error("model returned unknown intent '{0}'")]
    TaxonomyMismatch(String),
}

impl AiFailure {
    fn fallback_confidence(&self) -> f64 {
        match self {
            AiFailure::TaxonomyMismatch(_) => AI_MISMATCH_CONFIDENCE,
            _ => AI_ERROR_CONFIDENCE,
        }
    }
}

/// Shape the prompt asks the model to produce. Every field but `intent` may be
/// missing or `null`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiReply {
    #[serde(alias = "intentId")]
    intent: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    entities: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    suggested_actions: Option<Vec<String>>,
}

pub struct AiClassifier {
    model: Arc<dyn GenerativeModel>,
    taxonomy: SharedTaxonomy,
    timeout: Duration,
}

impl AiClassifier {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        taxonomy: SharedTaxonomy,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            taxonomy,
            timeout,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Classify with the model. Always returns a result.
    pub async fn classify(&self, email: &Email) -> ClassificationResult {
        let extracted = extract_entities(email);
        match self.try_classify(email, &extracted).await {
            Ok(result) => {
                debug!(
                    "AI classification via {}: {} ({:.2})",
                    self.model.name(),
                    result.intent_id,
                    result.confidence
                );
                result
            }
            Err(failure) => {
                warn!("AI classification degraded: {}", failure);
                ClassificationResult {
                    intent_id: self.taxonomy.generic_intent().to_string(),
                    confidence: failure.fallback_confidence(),
                    entities: extracted,
                    source: ClassificationSource::AiErrorFallback,
                    reasoning: Some(failure.to_string()),
                    suggested_actions: Vec::new(),
                }
            }
        }
    }

    async fn try_classify(
        &self,
        email: &Email,
        extracted: &EntityMap,
    ) -> Result<ClassificationResult, AiFailure> {
        let prompt = self.build_prompt(email);
        let raw = tokio::time::timeout(self.timeout, self.model.generate(&prompt))
            .await
            .map_err(|_| AiFailure::TimedOut(self.timeout))??;

        let reply = parse_reply(&raw)?;
        let intent_id = reply.intent.trim().to_string();
        if !self.taxonomy.contains(&intent_id) {
            return Err(AiFailure::TaxonomyMismatch(intent_id));
        }

        // Locally extracted entities fill whatever the model left out
        let mut entities = extracted.clone();
        for (name, value) in reply.entities.iter().flatten() {
            if let Some(value) = EntityValue::from_json(value) {
                entities.insert(name.clone(), value);
            }
        }

        Ok(ClassificationResult {
            intent_id,
            confidence: cap_confidence(reply.confidence.unwrap_or(AI_ERROR_CONFIDENCE)),
            entities,
            source: ClassificationSource::Ai,
            reasoning: reply.reasoning.filter(|r| !r.trim().is_empty()),
            suggested_actions: reply.suggested_actions.unwrap_or_default(),
        })
    }

    pub fn build_prompt(&self, email: &Email) -> String {
        format!(
            "You classify emails into exactly one intent from a fixed taxonomy.\n\n\
             Allowed intents (id: description):\n{listing}\n\n\
             Email:\nFrom: {from}\nSubject: {subject}\nBody:\n{body}\n\n\
             Respond with a single JSON object and nothing else:\n\
             {{\"intent\": \"<one id from the list>\", \"confidence\": <0.0-1.0>, \
             \"reasoning\": \"<one sentence>\", \"entities\": {{\"<name>\": \"<value>\"}}, \
             \"suggestedActions\": [\"<action id>\"]}}\n\
             Dates must be YYYY-MM-DD. If nothing fits, use \"{generic}\".",
            listing = self.taxonomy.prompt_listing(),
            from = email.from,
            subject = email.subject,
            body = clean_body(email.content()),
            generic = self.taxonomy.generic_intent(),
        )
    }
}

/// Clamp to [0, cap]; NaN counts as no confidence at all
fn cap_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, AI_CONFIDENCE_CAP)
    }
}

fn parse_reply(raw: &str) -> Result<AiReply, AiFailure> {
    let unfenced = strip_code_fence(raw);
    if let Ok(reply) = serde_json::from_str::<AiReply>(unfenced) {
        return Ok(reply);
    }

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&unfenced[start..=end])
            .map_err(|e| AiFailure::MalformedResponse(e.to_string())),
        _ => Err(AiFailure::MalformedResponse("no JSON object in reply".to_string())),
    }
}

/// Remove a surrounding ```json ... ``` (or bare ```) fence
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generative::{MockModel, ProviderErrorKind};
    use crate::taxonomy::TaxonomyStore;

    fn classifier(model: MockModel) -> AiClassifier {
        AiClassifier::new(
            Arc::new(model),
            Arc::new(TaxonomyStore::builtin().unwrap()),
            Duration::from_secs(5),
        )
    }

    fn email() -> Email {
        Email::new("Quick question", "pat@example.com", "Could you look at this?")
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_reply_finds_embedded_object() {
        let raw = r#"Sure! Here you go: {"intent": "generic.personal", "confidence": 0.7} cheers"#;
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.intent, "generic.personal");
        assert_eq!(reply.confidence, Some(0.7));
        assert!(matches!(parse_reply("no json here"), Err(AiFailure::MalformedResponse(_))));
    }

    #[test]
    fn test_cap_confidence() {
        assert_eq!(cap_confidence(1.4), 0.95);
        assert_eq!(cap_confidence(-0.2), 0.0);
        assert_eq!(cap_confidence(f64::NAN), 0.0);
        assert_eq!(cap_confidence(0.7), 0.7);
    }

    #[tokio::test]
    async fn test_fenced_reply_is_accepted() {
        let model = MockModel::replying(
            "```json\n{\"intent\": \"events.rsvp.request\", \"confidence\": 0.99, \
             \"reasoning\": \"asks to RSVP\", \"entities\": {\"eventDate\": \"2025-12-05\"}, \
             \"suggestedActions\": [\"rsvp_yes\"]}\n```",
        );
        let result = classifier(model).classify(&email()).await;
        assert_eq!(result.intent_id, "events.rsvp.request");
        assert_eq!(result.source, ClassificationSource::Ai);
        assert_eq!(result.confidence, 0.95);
        assert_eq!(
            result.entities.get("eventDate"),
            Some(&EntityValue::Date(chrono::NaiveDate::from_ymd_opt(2025, 12, 5).unwrap()))
        );
        assert_eq!(result.suggested_actions, vec!["rsvp_yes"]);
    }

    #[tokio::test]
    async fn test_null_optional_fields_are_accepted() {
        let model = MockModel::replying(
            r#"{"intent": "events.rsvp.request", "confidence": 0.9, "reasoning": null,
                "entities": null, "suggestedActions": null}"#,
        );
        let result = classifier(model).classify(&email()).await;
        assert_eq!(result.intent_id, "events.rsvp.request");
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.source, ClassificationSource::Ai);
        assert_eq!(result.reasoning, None);
        assert!(result.suggested_actions.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_intent_degrades_to_generic() {
        let model = MockModel::replying("{\"intent\": \"foo.bar.baz\", \"confidence\": 0.9}");
        let result = classifier(model).classify(&email()).await;
        assert_eq!(result.intent_id, "generic.transactional");
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.source, ClassificationSource::AiErrorFallback);
    }

    #[tokio::test]
    async fn test_malformed_reply_degrades() {
        let model = MockModel::replying("I think it's a newsletter");
        let result = classifier(model).classify(&email()).await;
        assert_eq!(result.intent_id, "generic.transactional");
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.source, ClassificationSource::AiErrorFallback);
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades() {
        let model = MockModel::failing(ProviderErrorKind::ServerError, "503");
        let result = classifier(model).classify(&email()).await;
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.source, ClassificationSource::AiErrorFallback);
    }

    #[tokio::test]
    async fn test_timeout_degrades() {
        let model = MockModel::replying("{\"intent\": \"generic.personal\"}")
            .with_delay(Duration::from_millis(200));
        let ai = AiClassifier::new(
            Arc::new(model),
            Arc::new(TaxonomyStore::builtin().unwrap()),
            Duration::from_millis(20),
        );
        let result = ai.classify(&email()).await;
        assert_eq!(result.source, ClassificationSource::AiErrorFallback);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_prompt_lists_taxonomy_and_cleaned_body() {
        let ai = classifier(MockModel::replying("{}"));
        let mut email = email();
        email.body = "<p>Hello</p><p>See https://example.com/a/very/long/path?x=1</p>".to_string();
        let prompt = ai.build_prompt(&email);
        assert!(prompt.contains("e-commerce.shipping.notification"));
        assert!(prompt.contains("https://example.com/…"));
        assert!(!prompt.contains("<p>"));
    }
}
