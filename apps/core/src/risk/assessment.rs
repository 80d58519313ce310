//! Assessment types produced by the risk engine.
//!
//! Every analyzer returns one of the structs below; `RiskAssessment` is the
//! aggregate handed to callers. All types serialize to camelCase JSON so the
//! extension popup can consume them unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Severity unit used throughout the engine. Ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Numeric weight used by the aggregator (low=1, medium=2, high=3).
    pub fn weight(self) -> u8 {
        match self {
            RiskTier::Low => 1,
            RiskTier::Medium => 2,
            RiskTier::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Optional caller context. Only the page URL is used today.
///
/// Deserialization never fails: a non-object context or a non-string `url`
/// reads as no URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct RiskContext {
    pub url: Option<String>,
}

impl From<Value> for RiskContext {
    fn from(value: Value) -> Self {
        Self {
            url: string_field(&value, "url"),
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

impl RiskContext {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

/// Raw input as received from the extension.
///
/// Any JSON value deserializes. Missing, null or non-string fields fall back
/// to the empty text, the general platform and an empty context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct AnalysisInput {
    pub text: Option<String>,
    pub platform: Option<String>,
    pub context: RiskContext,
}

impl From<Value> for AnalysisInput {
    fn from(value: Value) -> Self {
        Self {
            text: string_field(&value, "text"),
            platform: string_field(&value, "platform"),
            context: value
                .get("context")
                .cloned()
                .map(RiskContext::from)
                .unwrap_or_default(),
        }
    }
}

impl AnalysisInput {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn platform(&self) -> Platform {
        self.platform
            .as_deref()
            .map(Platform::parse)
            .unwrap_or_default()
    }
}

// --- Emotional content ---

/// Trigger strings grouped by the tier they were matched in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSet {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

impl TriggerSet {
    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.medium.is_empty() && self.low.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalAssessment {
    pub tier: RiskTier,
    pub triggers: TriggerSet,
    /// Upper-case words found in the original text (shouting).
    pub caps_words: Vec<String>,
    pub has_excessive_caps: bool,
    pub has_excessive_punctuation: bool,
}

// --- Platform exposure ---

/// Platform the message is written on. Unrecognised names map to `Unknown`,
/// which shares the general risk table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    General,
    Slack,
    Gmail,
    Linkedin,
    Reddit,
    Discord,
    Youtube,
    Twitter,
    Unknown,
}

impl Platform {
    /// Case-insensitive lookup; never fails.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "" | "general" => Platform::General,
            "slack" => Platform::Slack,
            "gmail" => Platform::Gmail,
            "linkedin" => Platform::Linkedin,
            "reddit" => Platform::Reddit,
            "discord" => Platform::Discord,
            "youtube" => Platform::Youtube,
            "twitter" | "x" => Platform::Twitter,
            _ => Platform::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::General => "general",
            Platform::Slack => "slack",
            Platform::Gmail => "gmail",
            Platform::Linkedin => "linkedin",
            Platform::Reddit => "reddit",
            Platform::Discord => "discord",
            Platform::Youtube => "youtube",
            Platform::Twitter => "twitter",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Kind of surface the text is being typed into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Compose,
    Reply,
    Comment,
    Post,
    Tweet,
    Channel,
    Dm,
    Thread,
    Message,
    Forward,
    Public,
    #[default]
    Form,
}

impl MessageType {
    /// Types whose content is visible beyond the direct recipient.
    pub fn is_public(self) -> bool {
        matches!(
            self,
            MessageType::Post | MessageType::Comment | MessageType::Tweet | MessageType::Reply
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAssessment {
    pub tier: RiskTier,
    pub platform: Platform,
    pub message_type: MessageType,
    pub is_public: bool,
    pub audience_size: AudienceSize,
}

// --- Communicative scenario ---

/// Named communicative situations. Declaration order is the tie-break order
/// used by the scenario detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scenario {
    CustomerComplaint,
    PublicReply,
    ExecutiveCommunication,
    ConflictEscalation,
    ApologyNeeded,
    #[default]
    General,
}

impl Scenario {
    pub fn tag(self) -> &'static str {
        match self {
            Scenario::CustomerComplaint => "customerComplaint",
            Scenario::PublicReply => "publicReply",
            Scenario::ExecutiveCommunication => "executiveCommunication",
            Scenario::ConflictEscalation => "conflictEscalation",
            Scenario::ApologyNeeded => "apologyNeeded",
            Scenario::General => "general",
        }
    }

    /// Human-readable context label shown on the scenario badge.
    pub fn context(self) -> &'static str {
        match self {
            Scenario::CustomerComplaint => "customer service",
            Scenario::PublicReply => "public discussion",
            Scenario::ExecutiveCommunication => "leadership communication",
            Scenario::ConflictEscalation => "conflict resolution",
            Scenario::ApologyNeeded => "mistake acknowledgment",
            Scenario::General => "general communication",
        }
    }

    /// Intrinsic risk of the scenario.
    pub fn tier(self) -> RiskTier {
        match self {
            Scenario::CustomerComplaint
            | Scenario::PublicReply
            | Scenario::ExecutiveCommunication => RiskTier::High,
            Scenario::ConflictEscalation | Scenario::ApologyNeeded => RiskTier::Medium,
            Scenario::General => RiskTier::Low,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAssessment {
    pub scenario: Scenario,
    pub context: String,
    pub tier: RiskTier,
    pub match_count: usize,
}

impl ScenarioAssessment {
    pub fn matched(scenario: Scenario, match_count: usize) -> Self {
        Self {
            scenario,
            context: scenario.context().to_string(),
            tier: scenario.tier(),
            match_count,
        }
    }

    pub fn general() -> Self {
        Self::matched(Scenario::General, 0)
    }

    pub fn is_general(&self) -> bool {
        self.scenario == Scenario::General
    }
}

impl Default for ScenarioAssessment {
    fn default() -> Self {
        Self::general()
    }
}

// --- Urgency ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyAssessment {
    pub has_urgency: bool,
    pub urgency_words: Vec<String>,
    pub tier: RiskTier,
}

// --- Politeness ---

/// Target register for a smoothing rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Friendly,
    #[default]
    Balanced,
    Firm,
}

impl Tone {
    /// Maps the popup's 0-100 tone slider onto a register.
    pub fn from_slider(value: u8) -> Self {
        match value {
            0..=33 => Tone::Friendly,
            34..=66 => Tone::Balanced,
            _ => Tone::Firm,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Friendly => "friendly",
            Tone::Balanced => "balanced",
            Tone::Firm => "firm",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Everyday situations that benefit from smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommonScenario {
    Cancellation,
    LandlordRequest,
    Apology,
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolitenessIssue {
    BluntLanguage,
    AwkwardPhrasing,
    EslPatterns,
    MissingPlease,
    MissingGratitude,
    AbruptEnding,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolitenessAssessment {
    pub needs_smoothing: bool,
    /// Meaningful only when `needs_smoothing` is set; `Low` otherwise.
    pub severity: RiskTier,
    pub suggested_tone: Tone,
    pub detected_scenario: Option<CommonScenario>,
    pub issues: Vec<PolitenessIssue>,
    /// Blunt, awkward and ESL phrases that produced issues.
    pub flagged_phrases: Vec<String>,
}

impl PolitenessAssessment {
    pub fn has_issue(&self, issue: PolitenessIssue) -> bool {
        self.issues.contains(&issue)
    }
}

// --- Aggregate ---

/// Advisory codes attached to an assessment. Display text lives in
/// `rewrite::labels`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    PanicMode,
    CoolDown,
    DeEscalate,
    CrisisResponse,
    ProfessionalMode,
    ApologyFramework,
}

/// Complete result of analysing one candidate message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall_risk: RiskTier,
    pub emotional_risk: EmotionalAssessment,
    pub platform_risk: PlatformAssessment,
    pub scenario_risk: ScenarioAssessment,
    pub urgency_factors: UrgencyAssessment,
    pub politeness_analysis: PolitenessAssessment,
    pub recommendations: Vec<Recommendation>,
}

impl RiskAssessment {
    /// Panic mode is only offered for high overall risk.
    pub fn offers_panic_mode(&self) -> bool {
        self.overall_risk == RiskTier::High
    }

    /// One-line summary for logging.
    pub fn summary(&self) -> String {
        format!(
            "Risk: {} (emotional {}, platform {}, scenario {} [{}]), urgency: {}, smoothing: {}",
            self.overall_risk,
            self.emotional_risk.tier,
            self.platform_risk.tier,
            self.scenario_risk.tier,
            self.scenario_risk.scenario,
            if self.urgency_factors.has_urgency { "yes" } else { "no" },
            if self.politeness_analysis.needs_smoothing {
                "yes"
            } else {
                "no"
            }
        )
    }
}
