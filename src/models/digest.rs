use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reported research result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    pub source: String,
    pub date_published: String,
    pub topic_area: String,
    pub key_finding: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actionable_implication: Option<String>,
    pub credibility_score: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Finding {
    /// Lower-cased comparison key for the topic
    pub fn topic_key(&self) -> String {
        self.topic_area.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    #[serde(rename = "research_findings")]
    pub findings: Vec<Finding>,
    /// Total reported by the agent, not necessarily `findings.len()`
    pub total_findings: u64,
    pub search_timestamp: String,
    pub sources_searched: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasesCompleted {
    pub research_discovery: bool,
    pub insights_synthesis: bool,
    pub email_delivery: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub workflow_status: String,
    pub phases_completed: PhasesCompleted,
    pub research_findings_count: String,
    pub topics_covered: Vec<String>,
    pub email_sent_to: String,
    pub digest_title: String,
    pub completion_timestamp: String,
    pub summary_message: String,
}

/// The single persisted artifact of one generation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchResult>,
    pub timestamp: DateTime<Utc>,
    pub email: String,
}

impl DigestData {
    /// Findings in source order, empty when the agent returned none
    pub fn findings(&self) -> &[Finding] {
        self.research.as_ref().map(|r| r.findings.as_slice()).unwrap_or(&[])
    }
}
