//! Urgency keyword detection.

use super::assessment::{RiskTier, UrgencyAssessment};
use super::lexicon::{substring_matches, URGENCY};

#[derive(Debug, Default, Clone, Copy)]
pub struct UrgencyDetector;

impl UrgencyDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> UrgencyAssessment {
        let urgency_words = substring_matches(&text.to_lowercase(), URGENCY);
        let has_urgency = !urgency_words.is_empty();

        UrgencyAssessment {
            has_urgency,
            urgency_words,
            tier: if has_urgency {
                RiskTier::High
            } else {
                RiskTier::Low
            },
        }
    }
}
