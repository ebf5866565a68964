//! Failures of a digest generation and the text shown for each.

use thiserror::Error;

use crate::agent::AgentCallError;

const RATE_LIMIT_MESSAGE: &str = "API credits exhausted. The service is temporarily unavailable. Please contact support or try again later.";
const RATE_LIMIT_CALL_MESSAGE: &str = "API credits exhausted. The service is temporarily unavailable due to rate limiting. Please contact support or try again later.";
const AUTH_MESSAGE: &str = "Authentication error. Check your agent API key and try again.";
const SERVER_MESSAGE: &str =
    "Server error. The AI service is temporarily unavailable. Please try again in a few minutes.";
const TRANSPORT_FALLBACK: &str = "Failed to generate digest";
const REJECTED_FALLBACK: &str = "Failed to generate digest. Please try again.";
const CALL_FALLBACK: &str = "An error occurred while generating the digest. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Generation was requested before an email was saved
    #[error("no saved email address")]
    MissingEmail,

    /// A generation is already in flight
    #[error("a digest is already being generated")]
    InProgress,

    /// The envelope reported `success: false`
    #[error(
        "agent transport failure (status {http_status:?}): {}",
        message.as_deref().unwrap_or("no message")
    )]
    Transport { http_status: Option<u16>, message: Option<String> },

    /// The envelope succeeded but the agent's own status was not "success"
    #[error("agent rejected the request: {}", message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    /// The call itself failed
    #[error(transparent)]
    Call(#[from] AgentCallError),
}

/// Recognizable failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    Unauthorized,
    ServerError,
    Other,
}

impl FailureKind {
    /// Classify from an HTTP status or, failing that, from status codes mentioned in the text
    pub fn classify(status: Option<u16>, text: &str) -> Self {
        match status {
            Some(429) => return Self::RateLimited,
            Some(401) => return Self::Unauthorized,
            Some(500) => return Self::ServerError,
            _ => {}
        }

        if text.contains("429") {
            Self::RateLimited
        } else if text.contains("401") {
            Self::Unauthorized
        } else if text.contains("500") {
            Self::ServerError
        } else {
            Self::Other
        }
    }
}

impl GenerationError {
    /// Notification text for this failure
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingEmail => "Please save your email address first".to_string(),
            Self::InProgress => "A digest is already being generated".to_string(),
            Self::Transport { http_status: Some(429), .. } => RATE_LIMIT_MESSAGE.to_string(),
            Self::Transport { message, .. } => non_blank(message.as_deref())
                .unwrap_or(TRANSPORT_FALLBACK)
                .to_string(),
            Self::Rejected { message } => {
                non_blank(message.as_deref()).unwrap_or(REJECTED_FALLBACK).to_string()
            }
            Self::Call(error) => {
                let text = error.to_string();
                let hint = error.transport_message().unwrap_or_default();
                match FailureKind::classify(error.status(), hint) {
                    FailureKind::RateLimited => RATE_LIMIT_CALL_MESSAGE.to_string(),
                    FailureKind::Unauthorized => AUTH_MESSAGE.to_string(),
                    FailureKind::ServerError => SERVER_MESSAGE.to_string(),
                    FailureKind::Other if text.trim().is_empty() => CALL_FALLBACK.to_string(),
                    FailureKind::Other => format!("Error: {}", text),
                }
            }
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
