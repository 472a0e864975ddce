//! Taxonomy Store: immutable table of intent definitions
//!
//! Loaded once at startup and shared behind an `Arc`. Nothing mutates it after
//! construction; callers only ever receive `&IntentDefinition`.

use crate::config::GENERIC_INTENT;
use crate::error::{PipelineError, PipelineResult};
use crate::taxonomy_data::{IntentSpec, BUILTIN_INTENTS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentDefinition {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub triggers: Vec<String>,
    #[serde(default)]
    pub negative_patterns: Vec<String>,
    #[serde(default)]
    pub required_entities: Vec<String>,
    #[serde(default)]
    pub optional_entities: Vec<String>,
}

impl IntentDefinition {
    /// Number of dotted path segments; more segments means a more specific intent
    pub fn specificity(&self) -> usize {
        segment_count(&self.id)
    }

    pub fn category(&self) -> &str {
        self.id.split('.').next().unwrap_or_default()
    }
}

impl From<&IntentSpec> for IntentDefinition {
    fn from(spec: &IntentSpec) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            id: spec.id.to_string(),
            description: spec.description.to_string(),
            triggers: owned(spec.triggers),
            negative_patterns: owned(spec.negatives),
            required_entities: owned(spec.required),
            optional_entities: owned(spec.optional),
        }
    }
}

/// Number of non-empty dotted segments in an intent id
pub fn segment_count(id: &str) -> usize {
    id.split('.').filter(|s| !s.is_empty()).count()
}

#[derive(Debug)]
pub struct TaxonomyStore {
    intents: Vec<IntentDefinition>,
    index: HashMap<String, usize>,
    generic_id: String,
}

pub type SharedTaxonomy = Arc<TaxonomyStore>;

impl TaxonomyStore {
    /// Build a store, rejecting duplicate ids and malformed entries
    pub fn new(intents: Vec<IntentDefinition>) -> PipelineResult<Self> {
        let mut index = HashMap::with_capacity(intents.len());

        for (pos, intent) in intents.iter().enumerate() {
            if intent.id.trim().is_empty() || intent.id.split('.').any(|s| s.is_empty()) {
                return Err(PipelineError::InvalidTaxonomy(format!(
                    "malformed intent id '{}'",
                    intent.id
                )));
            }
            if intent.triggers.is_empty() {
                return Err(PipelineError::InvalidTaxonomy(format!(
                    "intent '{}' has no trigger phrases",
                    intent.id
                )));
            }
            if index.insert(intent.id.clone(), pos).is_some() {
                return Err(PipelineError::DuplicateId {
                    kind: "intent",
                    id: intent.id.clone(),
                });
            }
        }

        if !index.contains_key(GENERIC_INTENT) {
            return Err(PipelineError::InvalidTaxonomy(format!(
                "taxonomy must define the generic intent '{}'",
                GENERIC_INTENT
            )));
        }

        Ok(Self {
            intents,
            index,
            generic_id: GENERIC_INTENT.to_string(),
        })
    }

    /// The compiled-in taxonomy
    pub fn builtin() -> PipelineResult<Self> {
        let store = Self::new(BUILTIN_INTENTS.iter().map(IntentDefinition::from).collect())?;
        info!("Loaded builtin taxonomy: {} intents", store.len());
        Ok(store)
    }

    /// Load a taxonomy from a JSON array of intent definitions
    pub fn from_json(raw: &str) -> PipelineResult<Self> {
        let intents: Vec<IntentDefinition> = serde_json::from_str(raw)
            .map_err(|e| PipelineError::InvalidTaxonomy(e.to_string()))?;
        let store = Self::new(intents)?;
        info!("Loaded taxonomy from JSON: {} intents", store.len());
        Ok(store)
    }

    pub fn get(&self, id: &str) -> Option<&IntentDefinition> {
        self.index.get(id).map(|&pos| &self.intents[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Intents in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &IntentDefinition> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn generic_intent(&self) -> &str {
        &self.generic_id
    }

    /// `id: description` lines, one per intent, for model prompts
    pub fn prompt_listing(&self) -> String {
        self.intents
            .iter()
            .map(|i| format!("- {}: {}", i.id, i.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: &str) -> IntentDefinition {
        IntentDefinition {
            id: id.to_string(),
            description: String::new(),
            triggers: vec!["anything".to_string()],
            negative_patterns: vec![],
            required_entities: vec![],
            optional_entities: vec![],
        }
    }

    #[test]
    fn test_builtin_taxonomy_loads() {
        let store = TaxonomyStore::builtin().unwrap();
        assert!(store.len() >= 140, "expected ~150 intents, got {}", store.len());
        assert!(store.contains("e-commerce.shipping.notification"));
        assert!(store.contains("education.permission.form"));
        assert_eq!(store.generic_intent(), "generic.transactional");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = TaxonomyStore::new(vec![def("generic.transactional"), def("a.b.c"), def("a.b.c")])
            .unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateId { .. }));
    }

    #[test]
    fn test_generic_intent_required() {
        let err = TaxonomyStore::new(vec![def("a.b.c")]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidTaxonomy(_)));
    }

    #[test]
    fn test_malformed_id_rejected() {
        let err = TaxonomyStore::new(vec![def("generic.transactional"), def("a..c")]).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidTaxonomy(_)));
    }

    #[test]
    fn test_from_json() {
        let raw = r#"[
            {"id": "generic.transactional", "triggers": ["receipt"]},
            {"id": "billing.invoice.due", "description": "Invoice", "triggers": ["invoice"],
             "requiredEntities": ["amount"]}
        ]"#;
        let store = TaxonomyStore::from_json(raw).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("billing.invoice.due").unwrap().required_entities, vec!["amount"]);
        assert!(TaxonomyStore::from_json("{not json").is_err());
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(segment_count("e-commerce.shipping.notification"), 3);
        assert_eq!(segment_count("generic.transactional"), 2);
        assert_eq!(segment_count(""), 0);
    }

    #[test]
    fn test_builtin_phrases_are_lowercase() {
        let store = TaxonomyStore::builtin().unwrap();
        for intent in store.iter() {
            for phrase in intent.triggers.iter().chain(intent.negative_patterns.iter()) {
                let lower = phrase.to_lowercase();
                assert_eq!(phrase, &lower, "{} has non-lowercase phrase", intent.id);
            }
        }
    }
}
