//! Core type definitions for email intent classification and action ranking

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw email as received at the HTTP boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Email {
    pub subject: String,
    pub from: String,
    pub body: String,
    pub snippet: String,
}

impl Email {
    pub fn new(
        subject: impl Into<String>,
        from: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            from: from.into(),
            body: body.into(),
            snippet: String::new(),
        }
    }

    /// Body text, falling back to the snippet when the body is empty
    pub fn content(&self) -> &str {
        if self.body.trim().is_empty() {
            &self.snippet
        } else {
            &self.body
        }
    }
}

/// Extracted value of a single entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl EntityValue {
    /// Convert a loosely-typed JSON value (e.g. from the model) into an entity value.
    /// Returns None for null, empty strings and nested structures.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(EntityValue::Number),
            serde_json::Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    Some(EntityValue::Date(date))
                } else {
                    Some(EntityValue::Text(s.to_string()))
                }
            }
            serde_json::Value::Bool(b) => Some(EntityValue::Text(b.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for EntityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityValue::Number(n) => write!(f, "{}", n),
            EntityValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EntityValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for EntityValue {
    fn from(s: &str) -> Self {
        EntityValue::Text(s.to_string())
    }
}

impl From<f64> for EntityValue {
    fn from(n: f64) -> Self {
        EntityValue::Number(n)
    }
}

impl From<NaiveDate> for EntityValue {
    fn from(d: NaiveDate) -> Self {
        EntityValue::Date(d)
    }
}

/// Entity name -> extracted value. Partial and best-effort.
pub type EntityMap = BTreeMap<String, EntityValue>;

/// Which stage of the pipeline produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Pattern,
    Ai,
    Hybrid,
    AiPrimary,
    AiFallback,
    AiErrorFallback,
}

impl ClassificationSource {
    pub fn is_ai(&self) -> bool {
        !matches!(self, ClassificationSource::Pattern)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationSource::Pattern => "pattern",
            ClassificationSource::Ai => "ai",
            ClassificationSource::Hybrid => "hybrid",
            ClassificationSource::AiPrimary => "ai_primary",
            ClassificationSource::AiFallback => "ai_fallback",
            ClassificationSource::AiErrorFallback => "ai_error_fallback",
        }
    }
}

impl fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub intent_id: String,
    pub confidence: f64,
    pub entities: EntityMap,
    pub source: ClassificationSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<String>,
}

/// Neutral descriptor of how an action is carried out. Rendering is up to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    InApp,
    OpenLink,
    Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionTier {
    Free,
    Premium,
}

/// Inbox mode an action is offered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    Mail,
    Ads,
    Both,
}

impl ActionMode {
    /// Whether an action declared with `self` is offered when the inbox is in `requested` mode
    pub fn offered_in(&self, requested: ActionMode) -> bool {
        matches!(
            (self, requested),
            (ActionMode::Both, _) | (_, ActionMode::Both)
        ) || *self == requested
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionMode::Mail => "mail",
            ActionMode::Ads => "ads",
            ActionMode::Both => "both",
        }
    }
}

impl FromStr for ActionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mail" => Ok(ActionMode::Mail),
            "ads" => Ok(ActionMode::Ads),
            "both" | "all" => Ok(ActionMode::Both),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomic action that can be suggested for an email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub id: String,
    pub display_name: String,
    pub kind: ActionKind,
    pub required_entities: Vec<String>,
    pub optional_entities: Vec<String>,
    pub base_priority: u8,
    pub permission_tier: PermissionTier,
    pub valid_intents: Vec<String>,
    pub mode: ActionMode,
    /// Generic actions attach to every intent and are never filtered as irrelevant
    pub generic: bool,
}

impl ActionDefinition {
    pub fn applies_to(&self, intent_id: &str) -> bool {
        self.generic || self.valid_intents.iter().any(|i| i == intent_id)
    }

    /// Required entities absent from `entities`
    pub fn missing_entities(&self, entities: &EntityMap) -> Vec<String> {
        self.required_entities
            .iter()
            .filter(|name| !entities.contains_key(name.as_str()))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndBehavior {
    ReturnToApp,
    OpenEmailComposer,
}

/// Multi-step guided flow that supersedes atomic actions when context justifies it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundActionDefinition {
    pub id: String,
    pub display_name: String,
    pub steps: Vec<String>,
    pub end_behavior: EndBehavior,
    pub is_premium: bool,
}

/// Per-user historical usage of one action, as reported by the corpus service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionStat {
    #[serde(alias = "action_id")]
    pub action_id: String,
    #[serde(default)]
    pub frequency: f64,
    #[serde(default, alias = "times_suggested")]
    pub times_suggested: u64,
    #[serde(default, alias = "times_executed")]
    pub times_executed: u64,
    #[serde(default, alias = "execution_rate")]
    pub execution_rate: f64,
    #[serde(
        default,
        alias = "last_used",
        alias = "lastUsed",
        deserialize_with = "lenient_timestamp"
    )]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare date; anything else becomes None
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_timestamp(&s)))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl UserActionStat {
    /// An action counts as observed once it has been suggested or executed at least once
    pub fn observed(&self) -> bool {
        self.times_suggested > 0 || self.times_executed > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusOverview {
    #[serde(default, alias = "total_emails")]
    pub total_emails: u64,
    #[serde(default, alias = "total_actions")]
    pub total_actions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentStat {
    #[serde(alias = "intent_id")]
    pub intent: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub frequency: f64,
}

/// Read-only snapshot of a user's corpus statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStats {
    #[serde(default)]
    pub overall: CorpusOverview,
    #[serde(default, alias = "top_actions")]
    pub top_actions: Vec<UserActionStat>,
    #[serde(default, alias = "top_intents")]
    pub top_intents: Vec<IntentStat>,
}

impl CorpusStats {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.overall.total_emails == 0 && self.top_actions.is_empty()
    }

    pub fn stat_for(&self, action_id: &str) -> Option<&UserActionStat> {
        self.top_actions.iter().find(|s| s.action_id == action_id)
    }
}

/// Action with its personalized priority, as returned by the registry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedAction {
    #[serde(flatten)]
    pub action: ActionDefinition,
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_stats: Option<UserActionStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionRole {
    Primary,
    Alternative,
}

/// One entry of the per-email suggestion list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedAction {
    pub action_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActionKind>,
    /// Compound entries sit above the 0-100 atomic range
    pub priority: u16,
    pub role: SuggestionRole,
    pub is_compound: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_behavior: Option<EndBehavior>,
    pub permission_tier: PermissionTier,
}

/// Options accepted by `classify`
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions {
    /// Consult the model even when the pattern classifier is confident
    pub force_ai: bool,
}

/// Parameters of a personalized registry request
#[derive(Debug, Clone)]
pub struct RegistryQuery {
    pub user_id: String,
    pub mode: ActionMode,
    pub window_days: u32,
    pub limit: Option<usize>,
    pub bust_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryMetadata {
    pub corpus_size: u64,
    pub actions_returned: usize,
    pub actions_filtered: usize,
    pub personalization_applied: bool,
    pub from_cache: bool,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryResponse {
    pub actions: Vec<RankedAction>,
    pub metadata: RegistryMetadata,
}

/// End-to-end result for a single email
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub classification: ClassificationResult,
    pub actions: Vec<SuggestedAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compound: Option<CompoundActionDefinition>,
    pub personalization_applied: bool,
}
