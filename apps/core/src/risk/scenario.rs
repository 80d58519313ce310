//! Communicative scenario detection.
//!
//! Scores the text against every scenario keyword set and keeps the best
//! match. Ties keep the scenario declared first in `lexicon::SCENARIOS`.

use super::assessment::{RiskContext, ScenarioAssessment};
use super::lexicon::SCENARIOS;

#[derive(Debug, Default, Clone, Copy)]
pub struct ScenarioDetector;

impl ScenarioDetector {
    pub fn new() -> Self {
        Self
    }

    /// `context` is accepted for interface parity; no scenario currently
    /// depends on it.
    pub fn detect(&self, text: &str, _context: &RiskContext) -> ScenarioAssessment {
        let lower = text.to_lowercase();

        let mut best: Option<ScenarioAssessment> = None;
        let mut best_count = 0;

        for definition in SCENARIOS {
            let match_count = definition
                .keywords
                .iter()
                .filter(|keyword| lower.contains(*keyword))
                .count();

            // Strictly greater: equal counts keep the earlier scenario
            if match_count > best_count {
                best_count = match_count;
                best = Some(ScenarioAssessment::matched(definition.scenario, match_count));
            }
        }

        best.unwrap_or_else(ScenarioAssessment::general)
    }
}
