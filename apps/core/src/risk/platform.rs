//! Platform exposure analysis.
//!
//! Maps (platform, message type) to a risk tier and an audience estimate.
//! The message type is inferred from the page URL.

use tracing::debug;
use url::Url;

use super::assessment::{
    AudienceSize, MessageType, Platform, PlatformAssessment, RiskContext, RiskTier,
};

/// URL keyword checks in evaluation order. Later checks overwrite earlier
/// ones, so a URL containing both `reply` and `post` resolves to `Post`.
const URL_HINTS: &[(&str, MessageType)] = &[
    ("compose", MessageType::Compose),
    ("new", MessageType::Compose),
    ("reply", MessageType::Reply),
    ("comment", MessageType::Comment),
    ("post", MessageType::Post),
];

/// Risk table per platform. `None` means the table has no entry for the
/// message type.
fn table_tier(platform: Platform, message_type: MessageType) -> Option<RiskTier> {
    use MessageType as M;
    use RiskTier::{High, Low, Medium};

    match platform {
        Platform::Linkedin => match message_type {
            M::Public | M::Comment => Some(High),
            M::Message => Some(Medium),
            _ => None,
        },
        Platform::Twitter => match message_type {
            M::Tweet | M::Reply => Some(High),
            M::Dm => Some(Low),
            _ => None,
        },
        Platform::Reddit => match message_type {
            M::Post | M::Comment => Some(High),
            M::Message => Some(Low),
            _ => None,
        },
        Platform::Slack => match message_type {
            M::Channel | M::Thread => Some(Medium),
            M::Dm => Some(Low),
            _ => None,
        },
        Platform::Gmail => match message_type {
            M::Compose | M::Reply => Some(Low),
            M::Forward => Some(Medium),
            _ => None,
        },
        // Discord, YouTube and unknown platforms share the general table
        Platform::General | Platform::Discord | Platform::Youtube | Platform::Unknown => {
            match message_type {
                M::Form => Some(Medium),
                M::Comment => Some(High),
                M::Message => Some(Low),
                _ => None,
            }
        }
    }
}

fn audience_size(platform: Platform, message_type: MessageType) -> AudienceSize {
    use AudienceSize::{Large, Medium, Small};
    use MessageType as M;

    match (platform, message_type) {
        (Platform::Linkedin, M::Post) => Large,
        (Platform::Linkedin, M::Comment) => Medium,
        (Platform::Linkedin, M::Message) => Small,
        (Platform::Twitter, M::Tweet | M::Reply) => Large,
        (Platform::Twitter, M::Dm) => Small,
        (Platform::Reddit, M::Post) => Large,
        (Platform::Reddit, M::Comment) => Medium,
        (Platform::Reddit, M::Message) => Small,
        (Platform::Slack, M::Channel | M::Dm | M::Thread) => Small,
        (Platform::Gmail, M::Compose | M::Reply) => Small,
        (Platform::Gmail, M::Forward) => Medium,
        _ => Medium,
    }
}

/// Infers the message type from URL substrings; `Form` when nothing matches.
pub fn infer_message_type(context: &RiskContext) -> MessageType {
    let Some(url) = context.url.as_deref() else {
        return MessageType::Form;
    };

    URL_HINTS
        .iter()
        .filter(|(hint, _)| url.contains(hint))
        .last()
        .map(|(_, message_type)| *message_type)
        .unwrap_or(MessageType::Form)
}

impl Platform {
    /// Detects the platform from a page URL's host. Anything unrecognised,
    /// including an unparsable URL, is `General`.
    pub fn from_url(page_url: &str) -> Self {
        let host = match Url::parse(page_url) {
            Ok(parsed) => parsed.host_str().unwrap_or_default().to_lowercase(),
            Err(e) => {
                debug!("Could not parse page URL '{}': {}", page_url, e);
                return Platform::General;
            }
        };

        let on = |domain: &str| host == domain || host.ends_with(&format!(".{}", domain));

        if on("slack.com") {
            Platform::Slack
        } else if on("gmail.com") || on("mail.google.com") {
            Platform::Gmail
        } else if on("linkedin.com") {
            Platform::Linkedin
        } else if on("reddit.com") {
            Platform::Reddit
        } else if on("discord.com") {
            Platform::Discord
        } else if on("youtube.com") {
            Platform::Youtube
        } else if on("twitter.com") || on("x.com") {
            Platform::Twitter
        } else {
            Platform::General
        }
    }
}

/// Estimates reputational exposure of the target platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformAnalyzer;

impl PlatformAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, platform: Platform, context: &RiskContext) -> PlatformAssessment {
        let message_type = infer_message_type(context);
        let tier = table_tier(platform, message_type).unwrap_or(RiskTier::Medium);

        PlatformAssessment {
            tier,
            platform,
            message_type,
            is_public: message_type.is_public(),
            audience_size: audience_size(platform, message_type),
        }
    }
}
