//! Templated output used when the model is unavailable or answers badly.

use super::mode::RewriteMode;
use super::response::Rewrite;
use crate::risk::Tone;

const BASE_TEXT_CHARS: usize = 100;
const EMPTY_SMOOTH: &str = "I wanted to get in touch with you about something.";

fn base_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > BASE_TEXT_CHARS {
        let head: String = trimmed.chars().take(BASE_TEXT_CHARS).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

/// Three deterministic rewrites in professional, direct, collaborative order.
pub fn fallback_rewrites(text: &str, mode: RewriteMode) -> Vec<Rewrite> {
    let base = base_text(text);
    let [professional, direct, collaborative] = match mode {
        RewriteMode::ReputationShield => [
            format!(
                "I'd like to discuss this professionally: {base}. \
                 Could we find time to talk it through?"
            ),
            format!(
                "I understand there may be concerns about {base}. \
                 I'm committed to a constructive resolution."
            ),
            format!(
                "I value our working relationship \
                 and would appreciate discussing {base} further."
            ),
        ],
        RewriteMode::DeEscalation => [
            format!(
                "I understand this matters to both of us: {base}. \
                 Let's find a solution that works for everyone."
            ),
            format!(
                "I hear the concerns around {base}. \
                 Can we talk when we both have time to focus?"
            ),
            format!("Thanks for raising this. Let's work out the best path forward on {base}."),
        ],
        RewriteMode::CrisisResponse => [
            format!(
                "Thank you for looking into this: {base}. \
                 I'd appreciate an update on how it will be resolved."
            ),
            format!("This needs prompt attention: {base}. Please let me know the next steps."),
            format!("I'd like to work with you to resolve this: {base}. What can we do to fix it?"),
        ],
        RewriteMode::ProfessionalPushback => [
            format!(
                "I'd like to share a different perspective on {base}. \
                 Could we review the options together?"
            ),
            format!("I have concerns about {base}. I'd propose we reconsider before moving ahead."),
            format!(
                "I want us to get this right: {base}. \
                 Can we align on an approach that addresses these points?"
            ),
        ],
        RewriteMode::ApologyFramework => [
            format!("I take responsibility for this: {base}. Here is how I'm going to fix it."),
            format!(
                "I made a mistake with {base}. \
                 I'm correcting it now and will confirm once it's done."
            ),
            format!(
                "I'm sorry about {base}. \
                 I'd like to work with you to make sure it doesn't happen again."
            ),
        ],
        RewriteMode::General => [
            format!(
                "I wanted to bring to your attention: {base}. \
                 I'd appreciate your guidance on how to proceed."
            ),
            format!("I need to discuss: {base}. Can we schedule time to address this?"),
            format!("I'd like to work together on: {base}. What are your thoughts on next steps?"),
        ],
    };

    vec![
        Rewrite::new("professional", professional),
        Rewrite::new("direct", direct),
        Rewrite::new("collaborative", collaborative),
    ]
}

/// Deterministic smoothing in the requested register.
pub fn fallback_smooth(text: &str, tone: Tone) -> String {
    let base = text.trim();
    if base.is_empty() {
        return EMPTY_SMOOTH.to_string();
    }

    match tone {
        Tone::Friendly => format!(
            "I hope you're doing well! {}. Thank you so much for your time and understanding!",
            capitalize_first(base)
        ),
        Tone::Balanced => format!(
            "I wanted to reach out regarding: {}. I'd appreciate your assistance with this matter.",
            base
        ),
        Tone::Firm => format!(
            "I need to address the following: {}. Please let me know how we can proceed.",
            base
        ),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
