use thiserror::Error;

/// Failure raised by the agent call itself, before any envelope exists
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentCallError {
    /// The endpoint is not configured
    #[error("agent endpoint is not configured")]
    NotConfigured,

    /// No connection could be made to the endpoint
    #[error("could not connect to the agent service")]
    Connect,

    /// The configured timeout elapsed before a reply arrived
    #[error("the agent service did not reply in time")]
    Timeout,

    /// The request could not be sent or the reply could not be read
    #[error("{message}")]
    Transport { status: Option<u16>, message: String },

    /// The reply body could not be decoded
    #[error("invalid agent reply: {0}")]
    Decode(String),

    /// The background worker went away without replying
    #[error("agent worker stopped before replying")]
    WorkerLost,
}

impl AgentCallError {
    /// HTTP status attached to the failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Transport text that may mention a status code; other variants have none
    pub fn transport_message(&self) -> Option<&str> {
        match self {
            Self::Transport { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AgentCallError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout;
        }
        if error.is_connect() {
            return Self::Connect;
        }

        let status = error.status().map(|s| s.as_u16());
        // The URL would otherwise end up in the text and be read as a status code
        Self::Transport { status, message: error.without_url().to_string() }
    }
}
