//! Classification merger: reconciles the pattern and AI results
//!
//! Pure and deterministic. Same inputs always give the same output.

use crate::config::MergePolicy;
use crate::taxonomy::segment_count;
use crate::types::{ClassificationResult, ClassificationSource};

pub fn merge(
    pattern: ClassificationResult,
    ai: ClassificationResult,
    policy: &MergePolicy,
) -> ClassificationResult {
    if ai.source == ClassificationSource::AiErrorFallback {
        return if pattern.confidence >= policy.pattern_blend_threshold {
            pattern
        } else {
            ai
        };
    }

    if ai.confidence >= policy.ai_primary_threshold {
        return ClassificationResult {
            source: ClassificationSource::AiPrimary,
            ..ai
        };
    }

    if pattern.confidence >= policy.pattern_blend_threshold {
        return blend(pattern, ai, policy);
    }

    ClassificationResult {
        source: ClassificationSource::AiFallback,
        ..ai
    }
}

fn blend(
    pattern: ClassificationResult,
    ai: ClassificationResult,
    policy: &MergePolicy,
) -> ClassificationResult {
    let weighted = policy.pattern_weight * pattern.confidence + policy.ai_weight * ai.confidence;
    let confidence = weighted.clamp(0.0, 1.0);

    // The more specific intent wins; equal depth goes to the model
    let intent_id = if segment_count(&pattern.intent_id) > segment_count(&ai.intent_id) {
        pattern.intent_id
    } else {
        ai.intent_id
    };

    let mut entities = pattern.entities;
    entities.extend(ai.entities);

    let mut suggested_actions = pattern.suggested_actions;
    for action in ai.suggested_actions {
        if !suggested_actions.contains(&action) {
            suggested_actions.push(action);
        }
    }

    let reasoning = match (pattern.reasoning, ai.reasoning) {
        (Some(p), Some(a)) => Some(format!("{}; {}", p, a)),
        (p, a) => a.or(p),
    };

    ClassificationResult {
        intent_id,
        confidence,
        entities,
        source: ClassificationSource::Hybrid,
        reasoning,
        suggested_actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntityMap, EntityValue};

    fn result(intent: &str, confidence: f64, source: ClassificationSource) -> ClassificationResult {
        ClassificationResult {
            intent_id: intent.to_string(),
            confidence,
            entities: EntityMap::new(),
            source,
            reasoning: None,
            suggested_actions: vec![],
        }
    }

    #[test]
    fn test_confident_ai_wins() {
        let merged = merge(
            result("billing.invoice.due", 0.6, ClassificationSource::Pattern),
            result("billing.invoice.overdue", 0.9, ClassificationSource::Ai),
            &MergePolicy::default(),
        );
        assert_eq!(merged.intent_id, "billing.invoice.overdue");
        assert_eq!(merged.source, ClassificationSource::AiPrimary);
        assert_eq!(merged.confidence, 0.9);
    }

    #[test]
    fn test_blend_uses_weights_and_specificity() {
        let mut pattern =
            result("e-commerce.shipping.notification", 0.5, ClassificationSource::Pattern);
        pattern.entities.insert("carrier".into(), EntityValue::from("UPS"));
        pattern.entities.insert("trackingNumber".into(), EntityValue::from("1Z1"));
        pattern.suggested_actions = vec!["track_package".into()];
        let mut ai = result("generic.transactional", 0.7, ClassificationSource::Ai);
        ai.entities.insert("carrier".into(), EntityValue::from("FedEx"));
        ai.suggested_actions = vec!["archive".into(), "track_package".into()];

        let merged = merge(pattern, ai, &MergePolicy::default());
        assert_eq!(merged.source, ClassificationSource::Hybrid);
        assert_eq!(merged.intent_id, "e-commerce.shipping.notification");
        assert!((merged.confidence - (0.4 * 0.5 + 0.6 * 0.7)).abs() < 1e-9);
        assert_eq!(merged.entities.get("carrier"), Some(&EntityValue::from("FedEx")));
        assert_eq!(merged.entities.get("trackingNumber"), Some(&EntityValue::from("1Z1")));
        assert_eq!(merged.suggested_actions, vec!["track_package", "archive"]);
    }

    #[test]
    fn test_blend_tie_goes_to_ai() {
        let merged = merge(
            result("billing.invoice.due", 0.45, ClassificationSource::Pattern),
            result("billing.payment.received", 0.6, ClassificationSource::Ai),
            &MergePolicy::default(),
        );
        assert_eq!(merged.intent_id, "billing.payment.received");
    }

    #[test]
    fn test_weak_pattern_falls_back_to_ai() {
        let merged = merge(
            result("generic.transactional", 0.28, ClassificationSource::Pattern),
            result("events.rsvp.request", 0.6, ClassificationSource::Ai),
            &MergePolicy::default(),
        );
        assert_eq!(merged.intent_id, "events.rsvp.request");
        assert_eq!(merged.source, ClassificationSource::AiFallback);
        assert_eq!(merged.confidence, 0.6);
    }

    #[test]
    fn test_degraded_ai_keeps_usable_pattern() {
        let pattern = result("billing.invoice.due", 0.55, ClassificationSource::Pattern);
        let degraded = result("generic.transactional", 0.5, ClassificationSource::AiErrorFallback);
        let merged = merge(pattern.clone(), degraded.clone(), &MergePolicy::default());
        assert_eq!(merged, pattern);

        let weak = result("generic.transactional", 0.28, ClassificationSource::Pattern);
        let merged = merge(weak, degraded.clone(), &MergePolicy::default());
        assert_eq!(merged, degraded);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let p = result("travel.flight.check-in", 0.5, ClassificationSource::Pattern);
        let a = result("travel.flight.change", 0.7, ClassificationSource::Ai);
        let first = merge(p.clone(), a.clone(), &MergePolicy::default());
        for _ in 0..10 {
            assert_eq!(merge(p.clone(), a.clone(), &MergePolicy::default()), first);
        }
    }
}
