//! Blocking HTTP transport for the agent service

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{AgentCallError, AgentClient, AgentEnvelope};
use crate::config::AgentConfig;

pub struct HttpAgentClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAgentClient {
    pub fn new(config: &AgentConfig) -> Result<Self, AgentCallError> {
        let endpoint = config.endpoint.trim();
        if endpoint.is_empty() {
            return Err(AgentCallError::NotConfigured);
        }

        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
        })
    }
}

impl AgentClient for HttpAgentClient {
    fn call(&self, message: &str, agent_id: &str) -> Result<AgentEnvelope, AgentCallError> {
        let payload = json!({ "message": message, "agent_id": agent_id });

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        debug!(endpoint = %self.endpoint, agent_id, "calling agent");
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "agent returned an error status");
            return Ok(envelope_for_status(status));
        }

        envelope_from_body(&body)
    }
}

/// Failure envelope for a non-2xx reply, carrying the status as `result.http_status`
fn envelope_for_status(status: StatusCode) -> AgentEnvelope {
    let reason = status.canonical_reason().unwrap_or("request failed");
    AgentEnvelope::failure(
        format!("Agent API {}: {}", status.as_u16(), reason),
        Some(status.as_u16()),
    )
}

/// Decode a 2xx body. Bodies that are not envelopes are treated as the result itself.
fn envelope_from_body(body: &str) -> Result<AgentEnvelope, AgentCallError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| AgentCallError::Decode(e.to_string()))?;

    let looks_like_envelope = value.get("success").is_some_and(Value::is_boolean);
    if looks_like_envelope {
        serde_json::from_value(value).map_err(|e| AgentCallError::Decode(e.to_string()))
    } else {
        Ok(AgentEnvelope::success(value))
    }
}
