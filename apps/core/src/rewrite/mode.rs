//! Picks the rewrite strategy from an assessment.

use crate::risk::{RiskAssessment, RiskTier, Scenario};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy the rewrite prompt is built around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RewriteMode {
    ReputationShield,
    DeEscalation,
    CrisisResponse,
    ProfessionalPushback,
    ApologyFramework,
    #[default]
    General,
}

impl RewriteMode {
    pub const ALL: [RewriteMode; 6] = [
        RewriteMode::ReputationShield,
        RewriteMode::DeEscalation,
        RewriteMode::CrisisResponse,
        RewriteMode::ProfessionalPushback,
        RewriteMode::ApologyFramework,
        RewriteMode::General,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            RewriteMode::ReputationShield => "reputationShield",
            RewriteMode::DeEscalation => "deEscalation",
            RewriteMode::CrisisResponse => "crisisResponse",
            RewriteMode::ProfessionalPushback => "professionalPushback",
            RewriteMode::ApologyFramework => "apologyFramework",
            RewriteMode::General => "general",
        }
    }

    /// Mode naturally paired with a detected scenario, if any.
    pub fn for_scenario(scenario: Scenario) -> Option<Self> {
        match scenario {
            Scenario::CustomerComplaint => Some(RewriteMode::CrisisResponse),
            Scenario::PublicReply => Some(RewriteMode::ReputationShield),
            Scenario::ExecutiveCommunication => Some(RewriteMode::ProfessionalPushback),
            Scenario::ConflictEscalation => Some(RewriteMode::DeEscalation),
            Scenario::ApologyNeeded => Some(RewriteMode::ApologyFramework),
            Scenario::General => None,
        }
    }
}

impl fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for RewriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RewriteMode::ALL
            .into_iter()
            .find(|mode| mode.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown rewrite mode '{}'", s))
    }
}

/// Mode suggested by the assessment alone.
pub fn recommended_mode(assessment: &RiskAssessment) -> RewriteMode {
    if let Some(mode) = RewriteMode::for_scenario(assessment.scenario_risk.scenario) {
        return mode;
    }
    if assessment.overall_risk == RiskTier::High {
        RewriteMode::ReputationShield
    } else if assessment.emotional_risk.tier == RiskTier::High {
        RewriteMode::DeEscalation
    } else {
        RewriteMode::General
    }
}

/// Final mode: panic beats an explicit choice, which beats the recommendation.
pub fn select_mode(
    assessment: &RiskAssessment,
    user_choice: Option<RewriteMode>,
    panic: bool,
) -> RewriteMode {
    if panic {
        return RewriteMode::ReputationShield;
    }
    user_choice.unwrap_or_else(|| recommended_mode(assessment))
}
