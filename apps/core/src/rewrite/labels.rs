//! Human-readable text for assessments and rewrite slots.

use super::mode::RewriteMode;
use crate::risk::{AudienceSize, Recommendation, RiskAssessment, RiskTier};

pub fn recommendation_text(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::PanicMode => "HIGH RISK: Consider using Panic Mode for safest options",
        Recommendation::CoolDown => "Take time to cool down before sending",
        Recommendation::DeEscalate => {
            "High emotional content detected - recommend De-escalation mode"
        }
        Recommendation::CrisisResponse => "Customer complaint detected - use Crisis Response mode",
        Recommendation::ProfessionalMode => "Executive communication - use Professional mode",
        Recommendation::ApologyFramework => "Apology context detected - use Apology Framework",
    }
}

pub fn risk_badge(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "Low Communication Risk",
        RiskTier::Medium => "Moderate Communication Risk",
        RiskTier::High => "HIGH RISK - Use Caution",
    }
}

/// Badges shown next to the risk summary, in display order.
pub fn context_badges(assessment: &RiskAssessment) -> Vec<String> {
    let mut badges = vec![assessment.platform_risk.platform.label().to_uppercase()];
    if !assessment.scenario_risk.is_general() {
        badges.push(assessment.scenario_risk.context.to_uppercase());
    }
    if assessment.platform_risk.audience_size == AudienceSize::Large {
        badges.push("PUBLIC".to_string());
    }
    badges
}

/// Labels for the professional, direct and collaborative slots.
pub fn slot_labels(mode: RewriteMode) -> [&'static str; 3] {
    match mode {
        RewriteMode::ReputationShield => ["Safest", "Balanced", "Strategic"],
        RewriteMode::DeEscalation => ["Calming", "Diplomatic", "Bridge-building"],
        RewriteMode::CrisisResponse => ["Apologetic", "Solution-focused", "Escalation"],
        RewriteMode::ProfessionalPushback => ["Diplomatic", "Assertive", "Executive"],
        RewriteMode::ApologyFramework => {
            ["Full Responsibility", "Collaborative", "Learning-focused"]
        }
        RewriteMode::General => ["Professional", "Direct", "Collaborative"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{Platform, RiskAnalyzer, RiskContext};

    #[test]
    fn test_badges_for_public_complaint() {
        let assessment = RiskAnalyzer::default().assess(
            "This is terrible service, I want a refund",
            Platform::Reddit,
            &RiskContext::with_url("https://www.reddit.com/r/support/post"),
        );
        let badges = context_badges(&assessment);
        assert_eq!(badges[0], "REDDIT");
        assert!(badges.contains(&"CUSTOMER SERVICE".to_string()));
        assert_eq!(badges.last().map(String::as_str), Some("PUBLIC"));
    }

    #[test]
    fn test_general_message_has_platform_badge_only() {
        let context = RiskContext::default();
        let assessment =
            RiskAnalyzer::default().assess("see you at lunch", Platform::Slack, &context);
        assert_eq!(context_badges(&assessment), vec!["SLACK".to_string()]);
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(slot_labels(RewriteMode::General)[0], "Professional");
        assert_eq!(slot_labels(RewriteMode::DeEscalation)[2], "Bridge-building");
        assert_eq!(risk_badge(RiskTier::High), "HIGH RISK - Use Caution");
    }
}
