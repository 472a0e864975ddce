//! Action Catalog: immutable table of atomic actions

use crate::error::{PipelineError, PipelineResult};
use crate::taxonomy::TaxonomyStore;
use crate::types::{ActionDefinition, ActionKind, ActionMode, EntityMap, PermissionTier};
use std::collections::HashMap;
use tracing::info;

struct ActionSpec {
    id: &'static str,
    display_name: &'static str,
    kind: ActionKind,
    base_priority: u8,
    tier: PermissionTier,
    mode: ActionMode,
    required: &'static [&'static str],
    optional: &'static [&'static str],
    intents: &'static [&'static str],
    generic: bool,
}

macro_rules! action {
    ($id:expr, $name:expr, $kind:ident, $base:expr, $tier:ident, $mode:ident,
     [$($r:expr),* $(,)?], [$($o:expr),* $(,)?], [$($i:expr),* $(,)?] $(,)?) => {
        ActionSpec {
            id: $id,
            display_name: $name,
            kind: ActionKind::$kind,
            base_priority: $base,
            tier: PermissionTier::$tier,
            mode: ActionMode::$mode,
            required: &[$($r),*],
            optional: &[$($o),*],
            intents: &[$($i),*],
            generic: false,
        }
    };
}

macro_rules! generic_action {
    ($id:expr, $name:expr, $kind:ident, $base:expr) => {
        ActionSpec {
            id: $id,
            display_name: $name,
            kind: ActionKind::$kind,
            base_priority: $base,
            tier: PermissionTier::Free,
            mode: ActionMode::Both,
            required: &[],
            optional: &[],
            intents: &[],
            generic: true,
        }
    };
}

#[rustfmt::skip]
static BUILTIN_ACTIONS: &[ActionSpec] = &[
    // shopping
    action!("track_package", "Track Package", OpenLink, 90, Free, Mail,
        ["trackingNumber"], ["carrier", "url"],
        ["e-commerce.shipping.notification", "e-commerce.shipping.out-for-delivery",
         "e-commerce.shipping.delayed", "e-commerce.delivery.failed"]),
    action!("view_order", "View Order", OpenLink, 75, Free, Mail,
        [], ["orderNumber", "url"],
        ["e-commerce.order.confirmation", "e-commerce.shipping.notification", "e-commerce.delivery.confirmation",
         "e-commerce.order.cancelled", "e-commerce.receipt.purchase", "e-commerce.subscription.box",
         "food.delivery.order", "food.grocery.order", "food.meal-kit.delivery"]),
    action!("reschedule_delivery", "Reschedule Delivery", OpenLink, 72, Free, Mail,
        [], ["trackingNumber", "carrier"],
        ["e-commerce.delivery.failed", "e-commerce.shipping.out-for-delivery", "e-commerce.shipping.delayed"]),
    action!("report_delivery_issue", "Report Delivery Issue", Compose, 60, Free, Mail,
        [], ["orderNumber", "trackingNumber"],
        ["e-commerce.delivery.confirmation", "e-commerce.delivery.failed", "food.delivery.order"]),
    action!("start_return", "Start Return", OpenLink, 65, Free, Mail,
        [], ["orderNumber"],
        ["e-commerce.delivery.confirmation", "e-commerce.receipt.purchase", "e-commerce.return.initiated"]),
    action!("print_return_label", "Print Return Label", OpenLink, 82, Free, Mail,
        [], ["orderNumber", "url"],
        ["e-commerce.return.initiated"]),
    action!("view_refund", "View Refund", OpenLink, 70, Free, Mail,
        [], ["amount", "orderNumber"],
        ["e-commerce.refund.processed", "e-commerce.order.cancelled"]),
    action!("get_directions", "Get Directions", OpenLink, 74, Free, Mail,
        [], ["url"],
        ["e-commerce.pickup.ready", "healthcare.prescription.ready"]),
    action!("register_warranty", "Register Warranty", OpenLink, 60, Free, Mail,
        [], ["orderNumber", "url"],
        ["e-commerce.warranty.registration"]),
    action!("write_review", "Write Review", OpenLink, 55, Free, Both,
        [], ["url"],
        ["e-commerce.review.request", "support.feedback.request"]),
    action!("complete_purchase", "Complete Purchase", OpenLink, 70, Free, Ads,
        [], ["url", "promoCode"],
        ["e-commerce.cart.abandoned", "e-commerce.restock.alert", "e-commerce.price.drop"]),
    action!("shop_now", "Shop Now", OpenLink, 60, Free, Ads,
        [], ["url", "promoCode"],
        ["marketing.promotion.sale", "marketing.new-arrivals.announcement", "marketing.win-back.offer",
         "marketing.loyalty.rewards", "e-commerce.restock.alert", "e-commerce.price.drop"]),
    action!("copy_promo_code", "Copy Promo Code", InApp, 72, Free, Ads,
        ["promoCode"], [],
        ["marketing.promotion.coupon", "marketing.promotion.sale", "marketing.loyalty.rewards",
         "marketing.win-back.offer", "marketing.referral.program", "e-commerce.cart.abandoned"]),
    action!("unsubscribe", "Unsubscribe", OpenLink, 55, Free, Both,
        [], ["url"],
        ["generic.newsletter", "content.newsletter.digest", "content.blog.update", "content.article.recommendation",
         "marketing.promotion.sale", "marketing.new-arrivals.announcement", "marketing.win-back.offer",
         "social.digest.summary", "career.job.alert", "home.real-estate.listing"]),
    action!("take_survey", "Take Survey", OpenLink, 50, Free, Ads,
        [], ["url"],
        ["marketing.survey.request", "support.feedback.request"]),
    // billing and finance
    action!("pay_invoice", "Pay Invoice", OpenLink, 95, Free, Mail,
        ["amount"], ["dueDate", "invoiceNumber", "url"],
        ["billing.invoice.due", "billing.invoice.overdue", "billing.utility.bill", "billing.phone.bill",
         "healthcare.billing.statement", "home.rent.payment", "education.tuition.payment", "finance.loan.payment"]),
    action!("set_payment_reminder", "Set Payment Reminder", InApp, 76, Free, Mail,
        ["dueDate"], ["amount"],
        ["billing.invoice.due", "billing.utility.bill", "billing.phone.bill", "billing.payment.scheduled",
         "billing.subscription.renewal", "home.rent.payment", "finance.loan.payment", "education.tuition.payment"]),
    action!("update_payment_method", "Update Payment Method", OpenLink, 88, Free, Mail,
        [], ["url"],
        ["billing.payment.failed", "billing.subscription.trial-ending"]),
    action!("manage_subscription", "Manage Subscription", OpenLink, 72, Free, Mail,
        [], ["url", "amount"],
        ["billing.subscription.renewal", "billing.subscription.cancelled", "billing.subscription.trial-ending",
         "billing.price.change", "e-commerce.subscription.box"]),
    action!("view_statement", "View Statement", OpenLink, 70, Free, Mail,
        [], ["url"],
        ["billing.statement.ready", "finance.credit.card-activity", "finance.investment.update",
         "finance.tax.document", "healthcare.billing.statement", "work.payroll.paystub"]),
    action!("view_receipt", "View Receipt", OpenLink, 60, Free, Mail,
        [], ["amount", "orderNumber"],
        ["billing.payment.received", "e-commerce.receipt.purchase", "travel.rideshare.receipt",
         "civic.charity.donation-receipt", "civic.political.donation", "generic.transactional"]),
    action!("view_account", "View Account", OpenLink, 65, Free, Mail,
        [], ["url"],
        ["finance.banking.transfer", "finance.credit.score-update", "finance.crypto.activity",
         "travel.loyalty.points", "account.storage.limit", "account.deletion.notice", "home.smart-device.update",
         "fitness.activity.summary", "insurance.policy.renewal"]),
    action!("submit_expense", "Submit Expense", OpenLink, 75, Free, Mail,
        [], ["amount"],
        ["finance.expense.report", "travel.rideshare.receipt"]),
    // security and accounts
    action!("review_security_alert", "Review Security Alert", OpenLink, 95, Free, Mail,
        [], ["url"],
        ["finance.fraud.alert", "finance.banking.alert", "account.security.login-alert", "account.data.breach",
         "home.security.alert"]),
    action!("reset_password", "Reset Password", OpenLink, 92, Free, Mail,
        [], ["url"],
        ["account.security.password-reset", "account.security.password-changed", "account.data.breach"]),
    action!("copy_code", "Copy Code", InApp, 96, Free, Mail,
        ["confirmationCode"], [],
        ["account.security.verification-code"]),
    action!("verify_account", "Verify Account", OpenLink, 90, Free, Mail,
        [], ["url"],
        ["account.verification.email", "account.welcome.onboarding"]),
    // travel
    action!("check_in", "Check In", OpenLink, 95, Free, Mail,
        [], ["flightNumber", "confirmationCode", "url"],
        ["travel.flight.check-in"]),
    action!("view_boarding_pass", "View Boarding Pass", OpenLink, 90, Free, Mail,
        [], ["flightNumber"],
        ["travel.flight.boarding-pass", "travel.flight.check-in"]),
    action!("add_to_wallet", "Add to Wallet", InApp, 70, Premium, Mail,
        [], ["flightNumber", "confirmationCode"],
        ["travel.flight.boarding-pass", "travel.flight.check-in", "travel.train.ticket", "events.ticket.confirmation"]),
    action!("view_itinerary", "View Itinerary", OpenLink, 80, Free, Mail,
        [], ["confirmationCode", "flightNumber"],
        ["travel.flight.confirmation", "travel.flight.change", "travel.hotel.reservation", "travel.rental.car",
         "travel.train.ticket", "travel.cruise.booking", "travel.vacation.rental", "travel.itinerary.reminder"]),
    action!("manage_booking", "Manage Booking", OpenLink, 72, Free, Mail,
        [], ["confirmationCode", "url"],
        ["travel.hotel.reservation", "travel.rental.car", "travel.vacation.rental", "travel.cruise.booking",
         "travel.flight.change", "food.restaurant.reservation", "fitness.class.booking"]),
    action!("view_document", "View Document", OpenLink, 75, Free, Mail,
        [], ["url"],
        ["travel.visa.document", "work.document.shared", "legal.contract.update", "account.update.terms",
         "insurance.policy.renewal", "healthcare.insurance.update", "civic.government.notice", "career.offer.letter",
         "education.certificate.earned"]),
    // school
    action!("sign_form", "Sign Form", InApp, 95, Free, Mail,
        [], ["dueDate"],
        ["education.permission.form", "legal.document.signature"]),
    action!("pay_fee", "Pay Fee", OpenLink, 85, Free, Mail,
        ["amount"], ["dueDate"],
        ["education.permission.form", "education.sports.schedule", "education.library.due"]),
    action!("view_assignment", "View Assignment", OpenLink, 80, Free, Mail,
        [], ["dueDate", "url"],
        ["education.assignment.due", "education.course.update", "education.course.enrollment"]),
    action!("renew_item", "Renew Item", OpenLink, 75, Free, Mail,
        [], ["dueDate"],
        ["education.library.due"]),
    action!("read_announcement", "Read Announcement", InApp, 60, Free, Mail,
        [], ["url"],
        ["education.school.announcement", "education.school.closure", "civic.community.alert",
         "civic.government.notice"]),
    // events and calendar
    action!("add_to_calendar", "Add to Calendar", InApp, 78, Free, Mail,
        [], ["eventDate", "dueDate", "meetingUrl"],
        ["education.permission.form", "education.conference.scheduling", "education.sports.schedule",
         "education.assignment.due", "education.school.closure", "events.meeting.invitation", "events.meeting.update",
         "events.rsvp.request", "events.ticket.confirmation", "events.webinar.registration", "events.reminder.upcoming",
         "events.social.party", "events.volunteer.signup", "healthcare.appointment.reminder",
         "healthcare.appointment.booking", "healthcare.vaccination.reminder", "healthcare.dental.reminder",
         "healthcare.pet.care", "home.service.appointment", "fitness.class.booking", "career.interview.invitation",
         "civic.voting.reminder", "travel.flight.confirmation", "travel.itinerary.reminder",
         "work.deadline.reminder", "food.restaurant.reservation", "marketing.event.invitation"]),
    action!("rsvp", "RSVP", InApp, 88, Free, Mail,
        [], ["eventDate"],
        ["events.rsvp.request", "events.social.party", "events.volunteer.signup", "marketing.event.invitation"]),
    action!("accept_meeting", "Accept Meeting", InApp, 90, Free, Mail,
        [], ["eventDate", "meetingUrl"],
        ["events.meeting.invitation", "events.meeting.update"]),
    action!("join_meeting", "Join Meeting", OpenLink, 92, Free, Mail,
        ["meetingUrl"], [],
        ["events.meeting.invitation", "events.meeting.update", "events.webinar.registration",
         "events.reminder.upcoming"]),
    action!("open_calendar", "Open Calendar", InApp, 62, Free, Mail,
        [], ["eventDate"],
        ["events.meeting.response", "events.meeting.cancelled"]),
    action!("schedule_interview", "Schedule Interview", OpenLink, 92, Free, Mail,
        [], ["url"],
        ["career.interview.invitation", "education.conference.scheduling"]),
    // health and home
    action!("confirm_appointment", "Confirm Appointment", InApp, 90, Free, Mail,
        [], ["eventDate"],
        ["healthcare.appointment.reminder", "healthcare.dental.reminder", "healthcare.vaccination.reminder",
         "healthcare.pet.care", "home.service.appointment"]),
    action!("reschedule_appointment", "Reschedule Appointment", OpenLink, 70, Free, Mail,
        [], ["eventDate", "url"],
        ["healthcare.appointment.reminder", "healthcare.appointment.booking", "healthcare.dental.reminder",
         "home.service.appointment"]),
    action!("view_results", "View Results", OpenLink, 85, Free, Mail,
        [], ["url"],
        ["healthcare.results.available", "healthcare.portal.message", "education.grade.posted",
         "insurance.claim.update"]),
    // work, social, communication
    action!("view_task", "View Task", OpenLink, 80, Free, Mail,
        [], ["dueDate", "url"],
        ["work.task.assigned", "work.review.requested", "work.deadline.reminder"]),
    action!("submit_timesheet", "Submit Timesheet", OpenLink, 85, Free, Mail,
        [], ["dueDate"],
        ["work.timesheet.reminder"]),
    action!("view_incident", "View Incident", OpenLink, 92, Free, Mail,
        [], ["url"],
        ["work.build.failed", "work.incident.alert"]),
    action!("view_application", "View Application", OpenLink, 70, Free, Mail,
        [], ["url"],
        ["career.job.application", "career.offer.letter", "career.job.alert"]),
    action!("view_message", "View Message", OpenLink, 70, Free, Mail,
        [], ["url"],
        ["social.message.received", "social.notification.activity", "social.community.post",
         "communication.voicemail.transcript", "communication.personal.message"]),
    action!("accept_connection", "Accept Connection", InApp, 65, Free, Mail,
        [], [],
        ["social.connection.request", "communication.introduction.contact"]),
    action!("send_requested_info", "Send Requested Info", Compose, 82, Free, Mail,
        [], [],
        ["communication.request.information", "communication.thread.reply"]),
    action!("view_ticket", "View Support Ticket", OpenLink, 70, Free, Mail,
        [], ["url"],
        ["support.ticket.created", "support.ticket.resolved"]),
    action!("read_more", "Read More", OpenLink, 45, Free, Both,
        [], ["url"],
        ["content.newsletter.digest", "content.article.recommendation", "content.podcast.episode",
         "content.blog.update", "entertainment.streaming.new-content", "entertainment.gaming.update",
         "entertainment.music.release", "account.welcome.onboarding", "social.digest.summary"]),
    // everywhere
    generic_action!("quick_reply", "Quick Reply", Compose, 50),
    generic_action!("archive", "Archive", InApp, 40),
    generic_action!("save_for_later", "Save for Later", InApp, 35),
];

impl From<&ActionSpec> for ActionDefinition {
    fn from(spec: &ActionSpec) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            id: spec.id.to_string(),
            display_name: spec.display_name.to_string(),
            kind: spec.kind,
            required_entities: owned(spec.required),
            optional_entities: owned(spec.optional),
            base_priority: spec.base_priority,
            permission_tier: spec.tier,
            valid_intents: owned(spec.intents),
            mode: spec.mode,
            generic: spec.generic,
        }
    }
}

#[derive(Debug)]
pub struct ActionCatalog {
    actions: Vec<ActionDefinition>,
    index: HashMap<String, usize>,
}

impl ActionCatalog {
    pub fn new(actions: Vec<ActionDefinition>) -> PipelineResult<Self> {
        let mut index = HashMap::with_capacity(actions.len());
        for (pos, action) in actions.iter().enumerate() {
            if action.base_priority > 100 {
                return Err(PipelineError::InvalidTaxonomy(format!(
                    "action '{}' has base priority {} above 100",
                    action.id, action.base_priority
                )));
            }
            if index.insert(action.id.clone(), pos).is_some() {
                return Err(PipelineError::DuplicateId {
                    kind: "action",
                    id: action.id.clone(),
                });
            }
        }
        Ok(Self { actions, index })
    }

    pub fn builtin() -> PipelineResult<Self> {
        let catalog = Self::new(BUILTIN_ACTIONS.iter().map(ActionDefinition::from).collect())?;
        info!("Loaded action catalog: {} actions", catalog.len());
        Ok(catalog)
    }

    /// Every intent an action names must exist in the taxonomy
    pub fn validate_against(&self, taxonomy: &TaxonomyStore) -> PipelineResult<()> {
        for action in &self.actions {
            if let Some(unknown) = action.valid_intents.iter().find(|i| !taxonomy.contains(i)) {
                return Err(PipelineError::UnknownReference {
                    owner: action.id.clone(),
                    kind: "intent",
                    id: unknown.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ActionDefinition> {
        self.index.get(id).map(|&pos| &self.actions[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter()
    }

    /// Actions that apply to an intent (generic ones included) in the given mode, in catalog order
    pub fn for_intent(&self, intent_id: &str, mode: ActionMode) -> Vec<&ActionDefinition> {
        self.actions
            .iter()
            .filter(|a| a.applies_to(intent_id) && a.mode.offered_in(mode))
            .collect()
    }

    /// Full unpersonalized catalog for a mode
    pub fn for_mode(&self, mode: ActionMode) -> Vec<&ActionDefinition> {
        self.actions.iter().filter(|a| a.mode.offered_in(mode)).collect()
    }

    /// An action can run when every required entity is present. Generic actions always can.
    pub fn executable(action: &ActionDefinition, entities: &EntityMap) -> bool {
        action.generic || action.missing_entities(entities).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityValue;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = ActionCatalog::builtin().unwrap();
        assert!(catalog.len() >= 45);
        let track = catalog.get("track_package").unwrap();
        assert_eq!(track.base_priority, 90);
        assert_eq!(track.required_entities, vec!["trackingNumber"]);
    }

    #[test]
    fn test_valid_intents_exist_in_taxonomy() {
        let taxonomy = TaxonomyStore::builtin().unwrap();
        ActionCatalog::builtin().unwrap().validate_against(&taxonomy).unwrap();
    }

    #[test]
    fn test_every_non_generic_intent_has_a_specific_action() {
        let taxonomy = TaxonomyStore::builtin().unwrap();
        let catalog = ActionCatalog::builtin().unwrap();
        let uncovered: Vec<_> = taxonomy
            .iter()
            .filter(|i| i.category() != "generic")
            .filter(|i| {
                !catalog
                    .for_intent(&i.id, ActionMode::Both)
                    .iter()
                    .any(|a| !a.generic)
            })
            .map(|i| i.id.clone())
            .collect();
        assert!(uncovered.is_empty(), "intents without actions: {:?}", uncovered);
    }

    #[test]
    fn test_duplicate_action_rejected() {
        let action = ActionDefinition::from(&BUILTIN_ACTIONS[0]);
        let err = ActionCatalog::new(vec![action.clone(), action]).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateId { kind: "action", .. }));
    }

    #[test]
    fn test_for_intent_includes_generic_and_respects_mode() {
        let catalog = ActionCatalog::builtin().unwrap();
        let ids = |mode| {
            catalog
                .for_intent("marketing.promotion.coupon", mode)
                .iter()
                .map(|a| a.id.clone())
                .collect::<Vec<_>>()
        };
        let ads = ids(ActionMode::Ads);
        assert!(ads.contains(&"copy_promo_code".to_string()));
        assert!(ads.contains(&"quick_reply".to_string()));
        let mail = ids(ActionMode::Mail);
        assert!(!mail.contains(&"copy_promo_code".to_string()));
        assert!(mail.contains(&"archive".to_string()));
    }

    #[test]
    fn test_executable_requires_entities() {
        let catalog = ActionCatalog::builtin().unwrap();
        let track = catalog.get("track_package").unwrap();
        let mut entities = EntityMap::new();
        assert!(!ActionCatalog::executable(track, &entities));
        entities.insert("trackingNumber".into(), EntityValue::from("1Z999AA10123456784"));
        assert!(ActionCatalog::executable(track, &entities));
        assert!(ActionCatalog::executable(catalog.get("archive").unwrap(), &EntityMap::new()));
    }
}
