//! Pattern Classifier: scores an email against every intent in the taxonomy
//!
//! Pure function of the email text. Negative patterns are a hard veto: an
//! intent whose negative pattern appears is never selected, whatever its
//! trigger count.

use crate::config::PATTERN_NO_MATCH_CONFIDENCE;
use crate::extractors::extract_entities;
use crate::taxonomy::{IntentDefinition, SharedTaxonomy};
use crate::types::{ClassificationResult, ClassificationSource, Email, EntityMap};
use tracing::debug;

/// Weight of a trigger that also appears in the subject line
const SUBJECT_BONUS: f64 = 0.5;
const CONFIDENCE_BASE: f64 = 0.35;
const CONFIDENCE_PER_TRIGGER: f64 = 0.10;
const MAX_COUNTED_TRIGGERS: usize = 4;
const ENTITY_COMPLETENESS_WEIGHT: f64 = 0.20;

/// Score of one intent against one email
#[derive(Debug, Clone, PartialEq)]
pub struct IntentScore {
    pub intent_id: String,
    pub score: f64,
    pub distinct_triggers: usize,
    pub matched: Vec<String>,
    pub vetoed_by: Option<String>,
}

pub struct PatternClassifier {
    taxonomy: SharedTaxonomy,
    /// Lower-cased copies of each intent's phrases, in taxonomy order
    compiled: Vec<CompiledIntent>,
}

struct CompiledIntent {
    triggers: Vec<String>,
    negatives: Vec<String>,
}

impl PatternClassifier {
    pub fn new(taxonomy: SharedTaxonomy) -> Self {
        let compiled = taxonomy
            .iter()
            .map(|intent| CompiledIntent {
                triggers: lowered(&intent.triggers),
                negatives: lowered(&intent.negative_patterns),
            })
            .collect();
        Self { taxonomy, compiled }
    }

    pub fn taxonomy(&self) -> &SharedTaxonomy {
        &self.taxonomy
    }

    /// Classify an email: best intent, confidence and extracted entities
    pub fn classify(&self, email: &Email) -> ClassificationResult {
        let entities = extract_entities(email);
        let scores = self.score_all(email);

        let best = scores
            .iter()
            .zip(self.taxonomy.iter())
            .filter(|(s, _)| s.score > 0.0)
            .fold(None::<(&IntentScore, &IntentDefinition)>, |best, (s, def)| match best {
                None => Some((s, def)),
                Some((b, bdef)) => {
                    // Later intents only win on a strictly better score or equal
                    // score with more segments; declaration order breaks the rest.
                    let better = s.score > b.score
                        || (s.score == b.score && def.specificity() > bdef.specificity());
                    if better {
                        Some((s, def))
                    } else {
                        Some((b, bdef))
                    }
                }
            });

        match best {
            Some((score, intent)) => {
                let confidence = self.confidence_for(intent, score.distinct_triggers, &entities);
                debug!(
                    "Pattern match: {} (score {:.1}, triggers {:?}, confidence {:.2})",
                    intent.id, score.score, score.matched, confidence
                );
                ClassificationResult {
                    intent_id: intent.id.clone(),
                    confidence,
                    entities,
                    source: ClassificationSource::Pattern,
                    reasoning: Some(format!("matched triggers: {}", score.matched.join(", "))),
                    suggested_actions: Vec::new(),
                }
            }
            None => {
                debug!("Pattern match: no intent matched '{}'", email.subject);
                ClassificationResult {
                    intent_id: self.taxonomy.generic_intent().to_string(),
                    confidence: PATTERN_NO_MATCH_CONFIDENCE,
                    entities,
                    source: ClassificationSource::Pattern,
                    reasoning: Some("no trigger phrase matched".to_string()),
                    suggested_actions: Vec::new(),
                }
            }
        }
    }

    /// Raw per-intent scores, in taxonomy order
    pub fn score_all(&self, email: &Email) -> Vec<IntentScore> {
        let subject = email.subject.to_lowercase();
        let text = format!("{}\n{}", subject, email.content().to_lowercase());

        self.taxonomy
            .iter()
            .zip(self.compiled.iter())
            .map(|(intent, compiled)| score_intent(intent, compiled, &subject, &text))
            .collect()
    }

    /// 0.35 + 0.10 per distinct trigger (up to 4) + 0.20 x required-entity completeness.
    /// Matches on the catch-all generic intents stay below the model gate.
    fn confidence_for(
        &self,
        intent: &IntentDefinition,
        distinct: usize,
        entities: &EntityMap,
    ) -> f64 {
        let completeness = if intent.required_entities.is_empty() {
            1.0
        } else {
            let present = intent
                .required_entities
                .iter()
                .filter(|name| entities.contains_key(name.as_str()))
                .count();
            present as f64 / intent.required_entities.len() as f64
        };

        let confidence = CONFIDENCE_BASE
            + CONFIDENCE_PER_TRIGGER * distinct.min(MAX_COUNTED_TRIGGERS) as f64
            + ENTITY_COMPLETENESS_WEIGHT * completeness;

        if intent.category() == "generic" {
            confidence.min(PATTERN_NO_MATCH_CONFIDENCE)
        } else {
            confidence.clamp(0.0, 1.0)
        }
    }
}

fn score_intent(
    intent: &IntentDefinition,
    compiled: &CompiledIntent,
    subject: &str,
    text: &str,
) -> IntentScore {
    if let Some(neg) = compiled.negatives.iter().find(|n| contains_phrase(text, n)) {
        return IntentScore {
            intent_id: intent.id.clone(),
            score: 0.0,
            distinct_triggers: 0,
            matched: Vec::new(),
            vetoed_by: Some(neg.clone()),
        };
    }

    let mut matched = Vec::new();
    let mut score = 0.0;
    for trigger in &compiled.triggers {
        if matched.contains(trigger) || !contains_phrase(text, trigger) {
            continue;
        }
        score += 1.0;
        if contains_phrase(subject, trigger) {
            score += SUBJECT_BONUS;
        }
        matched.push(trigger.clone());
    }

    IntentScore {
        intent_id: intent.id.clone(),
        score,
        distinct_triggers: matched.len(),
        matched,
        vetoed_by: None,
    }
}

fn lowered(phrases: &[String]) -> Vec<String> {
    phrases
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Phrase occurrence on word boundaries. Boundaries are only enforced at
/// phrase ends that are alphanumeric, so "% off" and "re:" still match.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let first_alnum = phrase.chars().next().map_or(false, |c| c.is_alphanumeric());
    let last_alnum = phrase.chars().last().map_or(false, |c| c.is_alphanumeric());

    haystack.match_indices(phrase).any(|(start, m)| {
        let end = start + m.len();
        let before_ok = !first_alnum
            || haystack[..start]
                .chars()
                .last()
                .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = !last_alnum
            || haystack[end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
