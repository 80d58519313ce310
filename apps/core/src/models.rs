use crate::rewrite::{Rewrite, RewriteMode};
use crate::risk::{PolitenessAssessment, RiskAssessment, Tone};
use crate::usage::UsageStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A request for three rewrite alternatives.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRequest {
    /// The draft the user wants to send.
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    #[validate(length(min = 1))]
    pub user_id: String,
    /// Platform name as reported by the extension (e.g. "slack").
    pub platform: Option<String>,
    /// Page URL, used for platform and message-type inference.
    #[validate(url)]
    pub url: Option<String>,
    /// Explicit mode chosen in the popup; overrides the recommendation.
    pub mode: Option<RewriteMode>,
    /// Panic mode forces the safest strategy.
    #[serde(default)]
    pub panic: bool,
}

/// A request for a single smoothed message.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SmoothRequest {
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    #[validate(length(min = 1))]
    pub user_id: String,
    /// Tone slider position, 0 (friendly) to 100 (firm).
    #[validate(range(max = 100))]
    #[serde(default = "default_tone_value")]
    pub tone_value: u8,
}

fn default_tone_value() -> u8 {
    50
}

impl Default for SmoothRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            user_id: String::new(),
            tone_value: default_tone_value(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResponse {
    pub rewrites: Vec<Rewrite>,
    pub mode: RewriteMode,
    pub slot_labels: Vec<String>,
    pub assessment: RiskAssessment,
    pub risk_badge: String,
    pub context_badges: Vec<String>,
    pub recommendations: Vec<String>,
    pub offers_panic_mode: bool,
    /// Set when the rewrites are templated rather than model-generated.
    pub fallback: bool,
    pub from_cache: bool,
    pub cache_id: Option<Uuid>,
    pub usage: UsageStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothResponse {
    pub smoothed_text: String,
    pub original_text: String,
    pub tone: Tone,
    pub tone_value: u8,
    pub politeness: PolitenessAssessment,
    pub fallback: bool,
    pub usage: UsageStatus,
}
