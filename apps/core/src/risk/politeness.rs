//! Politeness and social-smoothness analysis.
//!
//! Feeds the "Smooth It" simple mode: decides whether a message reads as
//! blunt or awkward, how badly, and which tone a rewrite should aim for.

use regex::Regex;
use std::sync::LazyLock;

use super::assessment::{CommonScenario, PolitenessAssessment, PolitenessIssue, RiskTier, Tone};
use super::lexicon::{
    substring_matches, ABRUPT_LENGTH_LIMIT, AWKWARDNESS, BLUNTNESS, COMMON_SCENARIOS,
    ESL_INDICATORS, GRATITUDE_MARKERS, PLEASE_MARKER, REQUEST_PHRASES,
};

/// Bluntness phrases compiled as case-insensitive whole-word patterns.
static BLUNT_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    BLUNTNESS
        .iter()
        .map(|phrase| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(phrase));
            (
                *phrase,
                Regex::new(&pattern).expect("Invalid regex: bluntness phrase"),
            )
        })
        .collect()
});

#[derive(Debug, Default, Clone, Copy)]
pub struct PolitenessAnalyzer;

impl PolitenessAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> PolitenessAssessment {
        let lower = text.to_lowercase();
        let mut issues = Vec::new();
        let mut flagged_phrases = Vec::new();
        let mut issue_count = 0usize;

        let blunt: Vec<String> = BLUNT_PATTERNS
            .iter()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(phrase, _)| phrase.to_string())
            .collect();
        let awkward = substring_matches(&lower, AWKWARDNESS);
        let esl = substring_matches(&lower, ESL_INDICATORS);

        for (issue, matches) in [
            (PolitenessIssue::BluntLanguage, blunt),
            (PolitenessIssue::AwkwardPhrasing, awkward),
            (PolitenessIssue::EslPatterns, esl),
        ] {
            if !matches.is_empty() {
                issues.push(issue);
                issue_count += matches.len();
                flagged_phrases.extend(matches);
            }
        }

        let is_request = REQUEST_PHRASES.iter().any(|phrase| lower.contains(phrase));
        if is_request {
            if !lower.contains(PLEASE_MARKER) {
                issues.push(PolitenessIssue::MissingPlease);
                issue_count += 1;
            }
            if !GRATITUDE_MARKERS.iter().any(|marker| lower.contains(marker)) {
                issues.push(PolitenessIssue::MissingGratitude);
                issue_count += 1;
            }
        }

        if is_abrupt(text) {
            issues.push(PolitenessIssue::AbruptEnding);
            issue_count += 1;
        }

        let detected_scenario = COMMON_SCENARIOS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
            .map(|(scenario, _)| *scenario);

        let (needs_smoothing, severity, mut suggested_tone) = match issue_count {
            0 => (false, RiskTier::Low, Tone::Balanced),
            1 => (true, RiskTier::Low, Tone::Balanced),
            2 => (true, RiskTier::Medium, Tone::Balanced),
            _ => (true, RiskTier::High, Tone::Friendly),
        };

        // Scenario overrides always win over the severity default
        match detected_scenario {
            Some(CommonScenario::LandlordRequest) => suggested_tone = Tone::Firm,
            Some(CommonScenario::Apology) => suggested_tone = Tone::Friendly,
            _ => {}
        }

        PolitenessAssessment {
            needs_smoothing,
            severity,
            suggested_tone,
            detected_scenario,
            issues,
            flagged_phrases,
        }
    }
}

/// Short, non-blank text without any sentence punctuation.
fn is_abrupt(text: &str) -> bool {
    !text.trim().is_empty()
        && text.chars().count() < ABRUPT_LENGTH_LIMIT
        && !text.contains(['.', '!', '?'])
}
