//! Maps untyped agent replies into [`DigestData`].
//!
//! This is the only place the loosely-shaped reply is read. Every field is
//! extracted individually and defaulted when missing, so nothing downstream
//! has to deal with partial data.

pub mod fields;
pub mod research;
pub mod workflow;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::agent::AgentEnvelope;
use crate::error::GenerationError;
use crate::models::DigestData;
pub use research::parse_research;
pub use workflow::{DEFAULT_DIGEST_TITLE, parse_workflow};

const SUCCESS_STATUS: &str = "success";

/// Turn an agent envelope into a digest for `recipient`.
///
/// The digest's `timestamp` and `email` always come from the request, never
/// from the reply.
pub fn normalize_reply(
    envelope: &AgentEnvelope,
    recipient: &str,
    requested_at: DateTime<Utc>,
) -> Result<DigestData, GenerationError> {
    if !envelope.success {
        let response = envelope.response.as_ref();
        let message = response
            .and_then(|r| r.message.clone())
            .filter(|m| !m.trim().is_empty())
            .or_else(|| envelope.error.clone());
        return Err(GenerationError::Transport {
            http_status: fields::status_code(envelope.result(), "http_status"),
            message,
        });
    }

    let response = match envelope.response.as_ref() {
        Some(response) if response.status == SUCCESS_STATUS => response,
        Some(response) => {
            return Err(GenerationError::Rejected { message: response.message.clone() });
        }
        None => return Err(GenerationError::Rejected { message: envelope.error.clone() }),
    };

    let result = &response.result;
    let digest = DigestData {
        workflow: parse_workflow(result, recipient, requested_at),
        research: parse_research(result, requested_at),
        timestamp: requested_at,
        email: recipient.to_string(),
    };

    debug!(
        findings = digest.findings().len(),
        has_workflow = digest.workflow.is_some(),
        "normalized agent reply"
    );

    Ok(digest)
}
