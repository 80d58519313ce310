use thiserror::Error;

/// Every failure the crate can surface.
///
/// The risk engine itself never fails; these come from the request boundary,
/// the completion broker and the usage ledger.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents data validation errors (e.g., empty text, missing user id).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., missing API key).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents a failed call to the chat-completion API.
    #[error("LLM request failed: {0}")]
    Llm(String),

    /// Represents a completion that does not have the expected rewrite shape.
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),

    /// Represents an upstream rate limit that persisted through all retries.
    #[error("Upstream rate limit persisted through all retries")]
    RateLimited,

    /// Represents a user who has used up their monthly rewrites.
    #[error("Monthly limit of {limit} rewrites reached")]
    QuotaExceeded { limit: u32 },

    /// A completion or HTTP call ran past its deadline.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Represents errors originating from the usage database.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Poisoned locks and other states that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the rewrite flow should answer with templated fallbacks
    /// instead of surfacing this error.
    pub fn is_recoverable_upstream(&self) -> bool {
        matches!(
            self,
            AppError::Llm(_)
                | AppError::InvalidResponse(_)
                | AppError::RateLimited
                | AppError::Timeout(_)
        )
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("deadline elapsed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidResponse(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("HTTP request timed out: {}", err))
        } else {
            AppError::Llm(format!("HTTP error: {}", err))
        }
    }
}
