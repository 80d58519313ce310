//! Validation of raw completion text.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

pub const MAX_REWRITE_CHARS: usize = 280;
pub const REWRITE_COUNT: usize = 3;

/// One rewrite alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl Rewrite {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }
}

/// Accepts a JSON array of exactly three `{type, text}` objects.
pub fn parse_rewrites(raw: &str) -> Result<Vec<Rewrite>, AppError> {
    let rewrites: Vec<Rewrite> = serde_json::from_str(raw.trim())?;

    if rewrites.len() != REWRITE_COUNT {
        return Err(AppError::InvalidResponse(format!(
            "expected {} rewrites, got {}",
            REWRITE_COUNT,
            rewrites.len()
        )));
    }

    Ok(rewrites
        .into_iter()
        .map(|r| Rewrite {
            kind: r.kind,
            text: r.text.chars().take(MAX_REWRITE_CHARS).collect(),
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmoothedEnvelope {
    smoothed_text: String,
}

/// Lenient: JSON envelope, JSON string, or plain text.
pub fn parse_smoothed(raw: &str) -> String {
    let text = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => {
            if let Ok(envelope) = serde_json::from_value::<SmoothedEnvelope>(value.clone()) {
                envelope.smoothed_text
            } else if let serde_json::Value::String(s) = value {
                s
            } else {
                raw.to_string()
            }
        }
        Err(_) => strip_quotes(raw).to_string(),
    };

    clip_with_ellipsis(&text, MAX_REWRITE_CHARS)
}

fn strip_quotes(raw: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let s = raw.strip_prefix(is_quote).unwrap_or(raw);
    s.strip_suffix(is_quote).unwrap_or(s)
}

/// Cuts to `limit` characters, ending in "..." when anything was dropped.
pub fn clip_with_ellipsis(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(limit.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_array() {
        let raw = r#"[
            {"type": "professional", "text": "A"},
            {"type": "direct", "text": "B"},
            {"type": "collaborative", "text": "C"}
        ]"#;
        let rewrites = parse_rewrites(raw).unwrap();
        assert_eq!(rewrites.len(), 3);
        assert_eq!(rewrites[1], Rewrite::new("direct", "B"));
    }

    #[test]
    fn test_long_text_is_truncated_by_chars() {
        let long = "é".repeat(400);
        let raw = serde_json::json!([
            {"type": "professional", "text": long},
            {"type": "direct", "text": "B"},
            {"type": "collaborative", "text": "C"}
        ])
        .to_string();
        let rewrites = parse_rewrites(&raw).unwrap();
        assert_eq!(rewrites[0].text.chars().count(), MAX_REWRITE_CHARS);
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(matches!(
            parse_rewrites(r#"[{"type": "direct", "text": "B"}]"#),
            Err(AppError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_rewrites(r#"{"rewrites": []}"#),
            Err(AppError::InvalidResponse(_))
        ));
        assert!(parse_rewrites("Sure! Here are three options").is_err());
    }

    #[test]
    fn test_parse_smoothed_variants() {
        assert_eq!(parse_smoothed(r#"{"smoothedText": "Hi there"}"#), "Hi there");
        assert_eq!(parse_smoothed(r#""Hi there""#), "Hi there");
        assert_eq!(parse_smoothed("'Hi there'"), "Hi there");
        assert_eq!(parse_smoothed("Hi there"), "Hi there");
    }

    #[test]
    fn test_parse_smoothed_clips() {
        let out = parse_smoothed(&"a".repeat(300));
        assert_eq!(out.chars().count(), 280);
        assert!(out.ends_with("..."));
    }
}
