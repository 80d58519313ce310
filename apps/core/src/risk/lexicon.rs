//! Static keyword tables used by the analyzers.
//!
//! All phrases are lower-case and matched against lower-cased text unless an
//! analyzer says otherwise. Table order matters where noted: scenario and
//! common-scenario lookups are first-declared-wins.

use super::assessment::{CommonScenario, Scenario};

/// Aggressive, accusatory or absolute language.
pub const EMOTIONAL_HIGH: &[&str] = &[
    "angry",
    "furious",
    "ridiculous",
    "stupid",
    "idiotic",
    "incompetent",
    "unacceptable",
    "outrageous",
    "disgusted",
    "appalled",
    "you always",
    "you never",
    "your fault",
    "blame you",
    "you should have",
    "absolutely not",
    "completely wrong",
    "total failure",
    "disaster",
    "terrible",
    "awful",
    "worst",
    "hate",
    "can't stand",
];

/// Frustrated, passive-aggressive or demanding language.
pub const EMOTIONAL_MEDIUM: &[&str] = &[
    "frustrated",
    "disappointed",
    "confused",
    "concerned",
    "worried",
    "surprised",
    "shocked",
    "unexpected",
    "unfortunate",
    "fine",
    "whatever",
    "obviously",
    "clearly",
    "as i said",
    "per my last",
    "need this now",
    "asap",
    "urgent",
    "immediately",
    "demanding",
    "require",
];

/// Mildly emotional hedges.
pub const EMOTIONAL_LOW: &[&str] = &[
    "hope",
    "think",
    "feel",
    "believe",
    "suggest",
    "recommend",
    "prefer",
    "would like",
    "could we",
    "maybe",
    "perhaps",
];

/// Trigger label recorded when shouting (ALL-CAPS words) is detected.
pub const CAPS_TRIGGER: &str = "excessive caps";

/// Trigger label recorded for runs of `!`/`?`.
pub const PUNCTUATION_TRIGGER: &str = "excessive punctuation";

/// Keyword definition of one communicative scenario.
pub struct ScenarioDefinition {
    pub scenario: Scenario,
    pub keywords: &'static [&'static str],
}

/// Scenario definitions in tie-break order: on equal match counts the
/// earlier entry wins.
pub const SCENARIOS: &[ScenarioDefinition] = &[
    ScenarioDefinition {
        scenario: Scenario::CustomerComplaint,
        keywords: &[
            "complaint",
            "dissatisfied",
            "refund",
            "problem",
            "issue",
            "broken",
            "not working",
        ],
    },
    ScenarioDefinition {
        scenario: Scenario::PublicReply,
        keywords: &["@", "reply to", "responding to", "in response"],
    },
    ScenarioDefinition {
        scenario: Scenario::ExecutiveCommunication,
        keywords: &["ceo", "executive", "senior", "leadership", "board", "director"],
    },
    ScenarioDefinition {
        scenario: Scenario::ConflictEscalation,
        keywords: &["disagree", "wrong", "mistake", "error", "failed", "disappointed"],
    },
    ScenarioDefinition {
        scenario: Scenario::ApologyNeeded,
        keywords: &["sorry", "apologize", "my fault", "my mistake", "regret"],
    },
];

pub const URGENCY: &[&str] = &["urgent", "asap", "immediately", "now", "emergency", "critical"];

/// Blunt words, matched on word boundaries so `fine` does not fire inside
/// `finesse`.
pub const BLUNTNESS: &[&str] = &[
    "nope",
    "nah",
    "whatever",
    "fine",
    "k",
    "sure",
    "obviously",
    "clearly",
    "duh",
    "come on",
    "seriously",
    "you need to",
    "you should",
    "you have to",
    "just do it",
];

pub const AWKWARDNESS: &[&str] = &[
    "umm",
    "uh",
    "so yeah",
    "i guess",
    "maybe",
    "sorta",
    "kinda",
    "i dunno",
    "not sure",
    "i think maybe",
    "if thats ok",
    "sorry to bother",
    "hope this is ok",
    "sorry again",
];

/// Non-native phrasing that reads oddly to native speakers.
pub const ESL_INDICATORS: &[&str] = &[
    "very much",
    "so much sorry",
    "please to",
    "kindly do",
    "revert back",
    "do the needful",
    "good name",
    "out of station",
];

/// Phrases that make a message a request; courtesy checks only run when
/// one of these is present.
pub const REQUEST_PHRASES: &[&str] = &[
    "can you",
    "could you",
    "would you",
    "need you to",
    "want you to",
];

pub const PLEASE_MARKER: &str = "please";

pub const GRATITUDE_MARKERS: &[&str] = &["thank", "appreciate"];

/// Everyday scenarios in lookup order; the first with a hit wins.
pub const COMMON_SCENARIOS: &[(CommonScenario, &[&str])] = &[
    (
        CommonScenario::Cancellation,
        &["cant make it", "have to cancel", "sorry cant", "maybe later", "rain check"],
    ),
    (
        CommonScenario::LandlordRequest,
        &["landlord", "fix", "broken", "repair", "maintenance", "heat", "water"],
    ),
    (
        CommonScenario::Apology,
        &["my bad", "oops", "sorry about", "messed up", "screwed up"],
    ),
    (
        CommonScenario::Request,
        &["need", "want", "can you", "help", "favor", "ask you"],
    ),
];

/// Abrupt-ending check applies below this many characters.
pub const ABRUPT_LENGTH_LIMIT: usize = 50;

/// Returns every phrase of `lexicon` contained in `haystack`, in table order.
pub fn substring_matches(haystack: &str, lexicon: &[&'static str]) -> Vec<String> {
    lexicon
        .iter()
        .filter(|phrase| haystack.contains(*phrase))
        .map(|phrase| phrase.to_string())
        .collect()
}
