//! Compound action detection
//!
//! A compound action is a guided multi-step flow (sign, then pay, then reply)
//! that replaces a handful of atomic suggestions when the email carries
//! enough context. Detection walks an ordered rule list once; the first rule
//! whose intent and entities match decides.

use crate::actions::ActionCatalog;
use crate::error::{PipelineError, PipelineResult};
use crate::taxonomy::TaxonomyStore;
use crate::types::{CompoundActionDefinition, EndBehavior, EntityMap};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRule {
    pub compound_id: String,
    pub intents: Vec<String>,
    pub required_entities: Vec<String>,
}

impl DetectionRule {
    pub fn new(compound_id: &str, intents: &[&str], required_entities: &[&str]) -> Self {
        Self {
            compound_id: compound_id.to_string(),
            intents: intents.iter().map(|s| s.to_string()).collect(),
            required_entities: required_entities.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn matches(&self, intent_id: &str, entities: &EntityMap) -> bool {
        self.intents.iter().any(|i| i == intent_id)
            && self
                .required_entities
                .iter()
                .all(|name| entities.contains_key(name.as_str()))
    }
}

#[derive(Debug)]
pub struct CompoundRegistry {
    compounds: Vec<CompoundActionDefinition>,
    index: HashMap<String, usize>,
    rules: Vec<DetectionRule>,
}

impl CompoundRegistry {
    pub fn new(
        compounds: Vec<CompoundActionDefinition>,
        rules: Vec<DetectionRule>,
    ) -> PipelineResult<Self> {
        let mut index = HashMap::with_capacity(compounds.len());
        for (pos, compound) in compounds.iter().enumerate() {
            if compound.steps.is_empty() {
                return Err(PipelineError::InvalidTaxonomy(format!(
                    "compound '{}' has no steps",
                    compound.id
                )));
            }
            if index.insert(compound.id.clone(), pos).is_some() {
                return Err(PipelineError::DuplicateId {
                    kind: "compound action",
                    id: compound.id.clone(),
                });
            }
        }
        if let Some(rule) = rules.iter().find(|r| !index.contains_key(&r.compound_id)) {
            return Err(PipelineError::UnknownReference {
                owner: "detection rule".to_string(),
                kind: "compound action",
                id: rule.compound_id.clone(),
            });
        }
        Ok(Self { compounds, index, rules })
    }

    pub fn builtin() -> PipelineResult<Self> {
        let compound = |id: &str, name: &str, steps: &[&str], end_behavior, is_premium| {
            CompoundActionDefinition {
                id: id.to_string(),
                display_name: name.to_string(),
                steps: steps.iter().map(|s| s.to_string()).collect(),
                end_behavior,
                is_premium,
            }
        };

        let compounds = vec![
            compound(
                "sign_form_with_payment",
                "Sign Form & Pay",
                &["sign_form", "pay_fee"],
                EndBehavior::OpenEmailComposer,
                true,
            ),
            compound(
                "sign_form_with_calendar",
                "Sign Form & Add to Calendar",
                &["sign_form", "add_to_calendar"],
                EndBehavior::OpenEmailComposer,
                true,
            ),
            compound(
                "sign_and_send",
                "Sign & Send",
                &["sign_form"],
                EndBehavior::OpenEmailComposer,
                false,
            ),
            compound(
                "track_with_calendar",
                "Track & Add Delivery to Calendar",
                &["track_package", "add_to_calendar"],
                EndBehavior::ReturnToApp,
                false,
            ),
            compound(
                "pay_invoice_with_confirmation",
                "Pay & Confirm",
                &["pay_invoice", "quick_reply"],
                EndBehavior::OpenEmailComposer,
                true,
            ),
            compound(
                "check_in_with_wallet",
                "Check In & Add Boarding Pass",
                &["check_in", "add_to_wallet"],
                EndBehavior::ReturnToApp,
                true,
            ),
            compound(
                "rsvp_with_calendar",
                "RSVP & Add to Calendar",
                &["rsvp", "add_to_calendar"],
                EndBehavior::ReturnToApp,
                false,
            ),
            compound(
                "confirm_appointment_with_calendar",
                "Confirm & Add to Calendar",
                &["confirm_appointment", "add_to_calendar"],
                EndBehavior::ReturnToApp,
                false,
            ),
        ];

        // Order matters: payment beats calendar for the same permission form.
        let rules = vec![
            DetectionRule::new(
                "sign_form_with_payment",
                &["education.permission.form"],
                &["amount"],
            ),
            DetectionRule::new(
                "sign_form_with_calendar",
                &["education.permission.form"],
                &["eventDate"],
            ),
            DetectionRule::new("sign_and_send", &["education.permission.form"], &[]),
            DetectionRule::new(
                "track_with_calendar",
                &["e-commerce.shipping.notification"],
                &["trackingNumber", "deliveryDate"],
            ),
            DetectionRule::new(
                "pay_invoice_with_confirmation",
                &["billing.invoice.due"],
                &["amount", "dueDate"],
            ),
            DetectionRule::new(
                "check_in_with_wallet",
                &["travel.flight.check-in"],
                &["flightNumber"],
            ),
            DetectionRule::new("rsvp_with_calendar", &["events.rsvp.request"], &["eventDate"]),
            DetectionRule::new(
                "confirm_appointment_with_calendar",
                &["healthcare.appointment.reminder"],
                &["eventDate"],
            ),
        ];

        Self::new(compounds, rules)
    }

    /// Step actions must exist in the catalog and rule intents in the taxonomy
    pub fn validate_against(
        &self,
        catalog: &ActionCatalog,
        taxonomy: &TaxonomyStore,
    ) -> PipelineResult<()> {
        for compound in &self.compounds {
            if let Some(step) = compound.steps.iter().find(|s| !catalog.contains(s)) {
                return Err(PipelineError::UnknownReference {
                    owner: compound.id.clone(),
                    kind: "action",
                    id: step.clone(),
                });
            }
        }
        for rule in &self.rules {
            if let Some(intent) = rule.intents.iter().find(|i| !taxonomy.contains(i)) {
                return Err(PipelineError::UnknownReference {
                    owner: rule.compound_id.clone(),
                    kind: "intent",
                    id: intent.clone(),
                });
            }
        }
        Ok(())
    }

    /// First matching rule in declaration order, if any
    pub fn detect(
        &self,
        intent_id: &str,
        entities: &EntityMap,
    ) -> Option<&CompoundActionDefinition> {
        let rule = self.rules.iter().find(|rule| rule.matches(intent_id, entities))?;
        debug!("Compound rule matched: {} for {}", rule.compound_id, intent_id);
        self.get(&rule.compound_id)
    }

    pub fn get(&self, id: &str) -> Option<&CompoundActionDefinition> {
        self.index.get(id).map(|&pos| &self.compounds[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompoundActionDefinition> {
        self.compounds.iter()
    }

    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityValue;
    use chrono::NaiveDate;

    fn entities(pairs: &[(&str, EntityValue)]) -> EntityMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_builtin_references_resolve() {
        let registry = CompoundRegistry::builtin().unwrap();
        let catalog = ActionCatalog::builtin().unwrap();
        let taxonomy = TaxonomyStore::builtin().unwrap();
        registry.validate_against(&catalog, &taxonomy).unwrap();
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn test_payment_wins_over_calendar() {
        let registry = CompoundRegistry::builtin().unwrap();
        let date = EntityValue::Date(NaiveDate::from_ymd_opt(2025, 11, 15).unwrap());
        let both = entities(&[("amount", EntityValue::Number(45.0)), ("eventDate", date.clone())]);
        let found = registry.detect("education.permission.form", &both).unwrap();
        assert_eq!(found.id, "sign_form_with_payment");

        let calendar_only = entities(&[("eventDate", date)]);
        let found = registry.detect("education.permission.form", &calendar_only).unwrap();
        assert_eq!(found.id, "sign_form_with_calendar");

        let found = registry.detect("education.permission.form", &EntityMap::new()).unwrap();
        assert_eq!(found.id, "sign_and_send");
    }

    #[test]
    fn test_no_rule_means_atomic_only() {
        let registry = CompoundRegistry::builtin().unwrap();
        let tracking = entities(&[("trackingNumber", EntityValue::from("1Z999AA10123456784"))]);
        assert!(registry.detect("e-commerce.shipping.notification", &tracking).is_none());
        assert!(registry.detect("generic.transactional", &tracking).is_none());
    }

    #[test]
    fn test_rule_for_unknown_compound_rejected() {
        let rules = vec![DetectionRule::new("ghost", &["a.b.c"], &[])];
        let err = CompoundRegistry::new(vec![], rules).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownReference { .. }));
    }

    #[test]
    fn test_unknown_step_fails_validation() {
        let compound = CompoundActionDefinition {
            id: "fly_to_moon".to_string(),
            display_name: "Fly".to_string(),
            steps: vec!["launch_rocket".to_string()],
            end_behavior: EndBehavior::ReturnToApp,
            is_premium: false,
        };
        let registry = CompoundRegistry::new(vec![compound], vec![]).unwrap();
        let catalog = ActionCatalog::builtin().unwrap();
        let taxonomy = TaxonomyStore::builtin().unwrap();
        let err = registry.validate_against(&catalog, &taxonomy).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownReference { kind: "action", .. }));
    }
}
