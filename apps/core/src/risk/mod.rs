//! # Risk Module
//!
//! Fast, non-LLM analysis of a draft message before it is sent for rewriting.
//!
//! ## Components
//! - `lexicon`: Static keyword tables
//! - `emotional`: Emotional temperature (keywords, shouting, punctuation)
//! - `platform`: Platform exposure and audience estimate
//! - `scenario`: Communicative scenario detection
//! - `urgency`: Urgency keywords
//! - `politeness`: Bluntness, awkwardness and courtesy checks for Smooth It
//! - `assessment`: Output data structures
//! - `analyzer`: Main orchestrator

pub mod analyzer;
pub mod assessment;
pub mod emotional;
pub mod lexicon;
pub mod platform;
pub mod politeness;
pub mod scenario;
pub mod urgency;

pub use analyzer::RiskAnalyzer;
pub use assessment::{
    AnalysisInput, AudienceSize, CommonScenario, EmotionalAssessment, MessageType, Platform,
    PlatformAssessment, PolitenessAssessment, PolitenessIssue, Recommendation, RiskAssessment,
    RiskContext, RiskTier, Scenario, ScenarioAssessment, Tone, TriggerSet, UrgencyAssessment,
};
pub use emotional::EmotionalAnalyzer;
pub use platform::PlatformAnalyzer;
pub use politeness::PolitenessAnalyzer;
pub use scenario::ScenarioDetector;
pub use urgency::UrgencyDetector;
