//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;

use parenting_digest::agent::{AgentCallError, AgentClient, AgentEnvelope};
use parenting_digest::storage::{DigestStorage, FileStore};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Agent double that records every call and replays a fixed reply
pub struct MockAgentClient {
    reply: Result<AgentEnvelope, AgentCallError>,
    calls: RefCell<Vec<(String, String)>>,
}

impl MockAgentClient {
    pub fn replying(reply: AgentEnvelope) -> Self {
        Self { reply: Ok(reply), calls: RefCell::new(Vec::new()) }
    }

    pub fn failing(error: AgentCallError) -> Self {
        Self { reply: Err(error), calls: RefCell::new(Vec::new()) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// (message, agent_id) of every call so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl AgentClient for MockAgentClient {
    fn call(&self, message: &str, agent_id: &str) -> Result<AgentEnvelope, AgentCallError> {
        self.calls.borrow_mut().push((message.to_string(), agent_id.to_string()));
        self.reply.clone()
    }
}

/// Builder for agent result payloads
pub struct ReplyBuilder {
    result: Value,
}

impl ReplyBuilder {
    pub fn new() -> Self {
        Self { result: json!({}) }
    }

    pub fn finding(mut self, title: &str, topic: &str) -> Self {
        let finding = json!({
            "title": title,
            "source": "Pediatrics",
            "date_published": "2024-11",
            "topic_area": topic,
            "key_finding": format!("{} matters", title),
            "credibility_score": "high",
        });
        let mut findings =
            self.result["research_findings"].as_array().cloned().unwrap_or_default();
        findings.push(finding);
        self.result["research_findings"] = Value::Array(findings);
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.result[key] = value;
        self
    }

    pub fn result(self) -> Value {
        self.result
    }

    pub fn success(self) -> AgentEnvelope {
        AgentEnvelope::success(self.result)
    }
}

/// Temp directory with a file-backed store inside it
pub struct TempStore {
    pub dir: TempDir,
}

impl TempStore {
    pub fn new() -> Self {
        Self { dir: TempDir::new().expect("Failed to create temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a fresh store over the same file, as a restarted app would
    pub fn open(&self) -> DigestStorage<FileStore> {
        DigestStorage::new(FileStore::open(self.dir.path()).expect("Failed to open store"))
    }
}
