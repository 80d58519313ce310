//! Emotional content analysis.
//!
//! Lexicon hits are tiered; shouting (ALL-CAPS words) always counts as a
//! high-tier trigger and runs of `!`/`?` count as medium.

use regex::Regex;
use std::sync::LazyLock;

use super::assessment::{EmotionalAssessment, RiskTier, TriggerSet};
use super::lexicon::{
    substring_matches, CAPS_TRIGGER, EMOTIONAL_HIGH, EMOTIONAL_LOW, EMOTIONAL_MEDIUM,
    PUNCTUATION_TRIGGER,
};

// NOTE: expect() is acceptable here, the patterns are compile-time constants
// Word boundaries are ASCII-only: accented capitals split a word, so "ÉCOLE"
// still yields "COLE".
static CAPS_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[A-Z]{2,}(?-u:\b)").expect("Invalid regex: caps word")
});

static PUNCTUATION_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[!?]{2,}").expect("Invalid regex: punctuation run"));

/// Scores the emotional temperature of a message.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmotionalAnalyzer;

impl EmotionalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> EmotionalAssessment {
        let lower = text.to_lowercase();

        let mut triggers = TriggerSet {
            high: substring_matches(&lower, EMOTIONAL_HIGH),
            medium: substring_matches(&lower, EMOTIONAL_MEDIUM),
            low: substring_matches(&lower, EMOTIONAL_LOW),
        };

        // Caps detection runs on the original casing
        let caps_words: Vec<String> = CAPS_WORD
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        let has_excessive_caps = !caps_words.is_empty();
        if has_excessive_caps {
            triggers.high.push(CAPS_TRIGGER.to_string());
        }

        let has_excessive_punctuation = PUNCTUATION_RUN.is_match(text);
        if has_excessive_punctuation {
            triggers.medium.push(PUNCTUATION_TRIGGER.to_string());
        }

        let tier = if !triggers.high.is_empty() {
            RiskTier::High
        } else if !triggers.medium.is_empty() {
            RiskTier::Medium
        } else {
            RiskTier::Low
        };

        EmotionalAssessment {
            tier,
            triggers,
            caps_words,
            has_excessive_caps,
            has_excessive_punctuation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_keyword() {
        let result = EmotionalAnalyzer::new().analyze("this is ridiculous");
        assert_eq!(result.tier, RiskTier::High);
        assert_eq!(result.triggers.high, vec!["ridiculous".to_string()]);
        assert!(!result.has_excessive_caps);
    }

    #[test]
    fn test_medium_keyword() {
        let result = EmotionalAnalyzer::new().analyze("I'm a bit frustrated with the delay");
        assert_eq!(result.tier, RiskTier::Medium);
        assert!(result.triggers.medium.contains(&"frustrated".to_string()));
    }

    #[test]
    fn test_low_keywords_stay_low() {
        let result = EmotionalAnalyzer::new().analyze("I think we could maybe try again");
        assert_eq!(result.tier, RiskTier::Low);
        assert!(result.triggers.low.contains(&"think".to_string()));
        assert!(result.triggers.low.contains(&"maybe".to_string()));
    }

    #[test]
    fn test_caps_escalates_to_high() {
        let result = EmotionalAnalyzer::new().analyze("PLEASE STOP THAT");
        assert!(result.has_excessive_caps);
        assert_eq!(result.tier, RiskTier::High);
        assert_eq!(result.caps_words, vec!["PLEASE", "STOP", "THAT"]);
        assert!(result.triggers.high.contains(&CAPS_TRIGGER.to_string()));
    }

    #[test]
    fn test_single_capital_is_not_shouting() {
        let result = EmotionalAnalyzer::new().analyze("I went to the store");
        assert!(!result.has_excessive_caps);
    }

    #[test]
    fn test_accented_capitals_split_caps_words() {
        let result = EmotionalAnalyzer::new().analyze("ÉCOLE FERMÉE");
        assert_eq!(result.caps_words, vec!["COLE".to_string(), "FERM".to_string()]);
        assert!(result.has_excessive_caps);
        assert_eq!(result.tier, RiskTier::High);

        let mixed = EmotionalAnalyzer::new().analyze("HELLOworld");
        assert!(!mixed.has_excessive_caps);
    }

    #[test]
    fn test_punctuation_run() {
        let result = EmotionalAnalyzer::new().analyze("are you serious?!");
        assert!(result.has_excessive_punctuation);
        assert_eq!(result.tier, RiskTier::Medium);
        assert!(result.triggers.medium.contains(&PUNCTUATION_TRIGGER.to_string()));
    }

    #[test]
    fn test_empty_text() {
        let result = EmotionalAnalyzer::new().analyze("");
        assert_eq!(result.tier, RiskTier::Low);
        assert!(result.triggers.is_empty());
    }

    #[test]
    fn test_repeated_keyword_listed_once() {
        let result = EmotionalAnalyzer::new().analyze("awful, just awful, truly awful");
        assert_eq!(result.triggers.high, vec!["awful".to_string()]);
    }
}
