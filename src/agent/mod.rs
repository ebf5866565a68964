//! Boundary to the remote research agent.
//!
//! The agent performs research discovery, synthesis and email delivery. This
//! crate only sends it one instruction and reads back an [`AgentEnvelope`].

pub mod envelope;
pub mod error;
pub mod http;

pub use envelope::{AgentEnvelope, AgentResponse};
pub use error::AgentCallError;
pub use http::HttpAgentClient;

/// Identifier of the manager agent that orchestrates the digest workflow
pub const MANAGER_AGENT_ID: &str = "69702ecdd6d0dcaec1115908";

/// Something that can deliver an instruction to an agent and return its reply
pub trait AgentClient {
    fn call(&self, message: &str, agent_id: &str) -> Result<AgentEnvelope, AgentCallError>;
}

/// Stand-in used when no endpoint is configured; every call fails
pub struct UnconfiguredClient;

impl AgentClient for UnconfiguredClient {
    fn call(&self, _message: &str, _agent_id: &str) -> Result<AgentEnvelope, AgentCallError> {
        Err(AgentCallError::NotConfigured)
    }
}

/// Instruction sent to the manager agent for one digest run
pub fn digest_instruction(email: &str) -> String {
    format!(
        "Generate and send the parenting science digest to {}. Please research the latest findings and send the complete digest.",
        email
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_embeds_email() {
        let text = digest_instruction("parent@example.com");
        assert!(text.contains("to parent@example.com."));
        assert_eq!(text, digest_instruction("parent@example.com"));
    }

    #[test]
    fn test_unconfigured_client_fails() {
        let result = UnconfiguredClient.call("hello", MANAGER_AGENT_ID);
        assert_eq!(result, Err(AgentCallError::NotConfigured));
    }
}
