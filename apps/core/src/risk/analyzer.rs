//! Risk Analyzer - Main orchestrator for the risk module.
//!
//! Runs the emotional, platform, scenario, urgency and politeness analyzers
//! over the same input and merges their outputs into one `RiskAssessment`.
//! The analyzers share no state, so their order is irrelevant.

use tracing::debug;

use super::assessment::{
    AnalysisInput, EmotionalAssessment, Platform, PlatformAssessment, Recommendation, RiskContext,
    RiskAssessment, RiskTier, Scenario, ScenarioAssessment, UrgencyAssessment,
};
use super::emotional::EmotionalAnalyzer;
use super::platform::PlatformAnalyzer;
use super::politeness::PolitenessAnalyzer;
use super::scenario::ScenarioDetector;
use super::urgency::UrgencyDetector;

/// Average weight at or above which the overall risk is high.
const HIGH_THRESHOLD: f32 = 2.5;
/// Average weight at or above which the overall risk is medium.
const MEDIUM_THRESHOLD: f32 = 1.5;

/// Main risk analyzer that orchestrates all analysis components
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskAnalyzer {
    emotional: EmotionalAnalyzer,
    platform: PlatformAnalyzer,
    scenario: ScenarioDetector,
    urgency: UrgencyDetector,
    politeness: PolitenessAnalyzer,
}

impl RiskAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a candidate message and produce a full assessment
    pub fn assess(&self, text: &str, platform: Platform, context: &RiskContext) -> RiskAssessment {
        let emotional_risk = self.emotional.analyze(text);
        let platform_risk = self.platform.analyze(platform, context);
        let scenario_risk = self.scenario.detect(text, context);
        let urgency_factors = self.urgency.detect(text);
        let politeness_analysis = self.politeness.analyze(text);

        let overall_risk =
            overall_risk(&emotional_risk, &platform_risk, &scenario_risk, &urgency_factors);
        let recommendations = recommendations(overall_risk, &scenario_risk, &emotional_risk);

        let assessment = RiskAssessment {
            overall_risk,
            emotional_risk,
            platform_risk,
            scenario_risk,
            urgency_factors,
            politeness_analysis,
            recommendations,
        };

        debug!("{}", assessment.summary());
        assessment
    }

    /// Same as [`RiskAnalyzer::assess`] for loosely-typed extension input.
    pub fn assess_input(&self, input: &AnalysisInput) -> RiskAssessment {
        self.assess(input.text(), input.platform(), &input.context)
    }
}

/// Combines the weighted tiers. Urgency adds a flat point but the sum is
/// still divided by three, so it only ever nudges the result upward.
pub fn overall_risk(
    emotional: &EmotionalAssessment,
    platform: &PlatformAssessment,
    scenario: &ScenarioAssessment,
    urgency: &UrgencyAssessment,
) -> RiskTier {
    let urgency_bonus = u8::from(urgency.has_urgency);
    let total = emotional.tier.weight()
        + platform.tier.weight()
        + scenario.tier.weight()
        + urgency_bonus;
    let average = f32::from(total) / 3.0;

    if average >= HIGH_THRESHOLD {
        RiskTier::High
    } else if average >= MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Every applicable advisory, in display order.
pub fn recommendations(
    overall: RiskTier,
    scenario: &ScenarioAssessment,
    emotional: &EmotionalAssessment,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if overall == RiskTier::High {
        recommendations.push(Recommendation::PanicMode);
        recommendations.push(Recommendation::CoolDown);
    }

    if emotional.tier == RiskTier::High {
        recommendations.push(Recommendation::DeEscalate);
    }

    match scenario.scenario {
        Scenario::CustomerComplaint => recommendations.push(Recommendation::CrisisResponse),
        Scenario::ExecutiveCommunication => recommendations.push(Recommendation::ProfessionalMode),
        Scenario::ApologyNeeded => recommendations.push(Recommendation::ApologyFramework),
        _ => {}
    }

    recommendations
}
