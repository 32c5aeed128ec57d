//! Error Types

use thiserror::Error;

/// Result type alias for chat-layer operations.
pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {
    /// LLM provider returned an error.
    #[error("provider error: {0}")]
    Provider(String),

    /// LLM provider unreachable or not responding.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Memory log could not be persisted or loaded.
    #[error("memory log error: {0}")]
    Memory(String),

    /// Configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssistantError {
    /// Whether retrying the same call might help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_) | Self::Io(_))
    }

    /// User-facing phrasing, stripped of internals.
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(_) | Self::ProviderUnavailable(_) => {
                "The language model is currently unavailable. Showing raw analysis instead.".into()
            }
            Self::Memory(_) | Self::Io(_) | Self::Json(_) => {
                "Could not save the conversation history.".into()
            }
            Self::Config(msg) => format!("Configuration problem: {msg}"),
        }
    }
}

impl From<anyhow::Error> for AssistantError {
    fn from(err: anyhow::Error) -> Self {
        AssistantError::Provider(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(AssistantError::ProviderUnavailable("down".into()).is_retryable());
        assert!(!AssistantError::Provider("bad request".into()).is_retryable());
        assert!(!AssistantError::Config("missing model".into()).is_retryable());
    }
}
