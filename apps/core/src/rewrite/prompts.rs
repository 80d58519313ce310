//! Prompt assembly for the chat-completion broker.

use super::mode::RewriteMode;
use crate::risk::{Platform, RiskAssessment, Tone};

/// System and user halves of one chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const OUTPUT_CONTRACT: &str = "Respond with ONLY a JSON array of exactly 3 objects, each shaped \
{\"type\": \"professional\" | \"direct\" | \"collaborative\", \"text\": \"...\"}. \
Each text must stay under 280 characters. Rewrite the user's draft; never reply to it.";

#[derive(Debug, Default, Clone, Copy)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the three-alternative rewrite request.
    pub fn rewrite_prompt(
        &self,
        text: &str,
        assessment: &RiskAssessment,
        mode: RewriteMode,
    ) -> Prompt {
        let guidance = match mode {
            RewriteMode::General => platform_guidance(assessment.platform_risk.platform),
            other => mode_guidance(other),
        };

        let system = format!(
            "You are RealTalk, a message rewriting assistant. {}\n\n\
             Detected risk level: {}. Detected context: {}. Preferred register: {}.\n\n\
             Keep the sender's core point, remove hostile or emotional wording and prefer \
             \"I\" statements.\n\n{}",
            guidance,
            assessment.overall_risk,
            assessment.scenario_risk.context,
            assessment.politeness_analysis.suggested_tone,
            OUTPUT_CONTRACT
        );

        Prompt {
            system,
            user: format!("Draft message: \"{}\"", text),
        }
    }

    /// Builds the single-message smoothing request.
    pub fn smooth_prompt(&self, text: &str, tone: Tone) -> Prompt {
        let (register, instructions) = match tone {
            Tone::Friendly => (
                "friendly and warm",
                "Use warm, approachable wording with courtesy words such as please and thank you.",
            ),
            Tone::Balanced => (
                "balanced and professional",
                "Be polite but direct, with clear wording and appropriate courtesy.",
            ),
            Tone::Firm => (
                "firm and assertive",
                "Be confident and decisive with strong action words, while staying respectful.",
            ),
        };

        let system = format!(
            "You are Smooth It, a writing assistant that turns rough, awkward or blunt messages \
             into polished ones with the same meaning. Make the message {}. {} \
             Fix grammar and phrasing, add politeness markers where they are missing and keep \
             it concise. Return ONLY the improved message as plain text, without quotes or \
             commentary.",
            register, instructions
        );

        Prompt {
            system,
            user: format!("Message: \"{}\"", text),
        }
    }
}

fn mode_guidance(mode: RewriteMode) -> &'static str {
    match mode {
        RewriteMode::ReputationShield => {
            "The draft could damage the sender's reputation. Produce the safest possible \
             versions: neutral, measured and impossible to screenshot out of context."
        }
        RewriteMode::DeEscalation => {
            "The draft is emotionally charged. Lower the temperature: acknowledge feelings, \
             drop blame and invite a calm conversation."
        }
        RewriteMode::CrisisResponse => {
            "The draft is a complaint or crisis message. Make it clear and factual, state the \
             desired resolution and keep an escalation path without threats."
        }
        RewriteMode::ProfessionalPushback => {
            "The sender needs to push back on someone senior. Be assertive and diplomatic, \
             ground objections in facts and propose an alternative."
        }
        RewriteMode::ApologyFramework => {
            "The draft acknowledges a mistake. Take ownership without over-apologising, \
             explain the fix and what changes next time."
        }
        RewriteMode::General => "Make the draft clearer and more professional.",
    }
}

fn platform_guidance(platform: Platform) -> &'static str {
    match platform {
        Platform::Slack => {
            "The message is for Slack workplace chat: keep it brief, friendly and actionable."
        }
        Platform::Gmail => {
            "The message is an email: use a complete, courteous structure suited to business mail."
        }
        Platform::Linkedin => {
            "The message is for LinkedIn: keep a polished professional-network tone."
        }
        Platform::Reddit => {
            "The message is for Reddit: stay constructive and civil in a public thread."
        }
        Platform::Discord => {
            "The message is for Discord: casual community tone without hostility."
        }
        Platform::Youtube => {
            "The message is a public YouTube comment: keep it constructive and respectful."
        }
        Platform::Twitter => {
            "The message is a public tweet: keep it short, measured and safe to be quoted."
        }
        Platform::General | Platform::Unknown => {
            "Make the draft clearer and more professional for a general audience."
        }
    }
}
