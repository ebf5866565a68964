use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::fields;
use crate::models::{PhasesCompleted, WorkflowResult};

pub const DEFAULT_DIGEST_TITLE: &str = "Parenting Science Digest";

/// Build the workflow status block. Returns `None` unless the reply carries `workflow_status`.
pub fn parse_workflow(
    result: &Value,
    recipient: &str,
    requested_at: DateTime<Utc>,
) -> Option<WorkflowResult> {
    let workflow_status = fields::text(result, "workflow_status")?;

    let phases = result.get("phases_completed").unwrap_or(&Value::Null);
    let phases_completed = PhasesCompleted {
        research_discovery: fields::flag(phases, "research_discovery").unwrap_or(false),
        insights_synthesis: fields::flag(phases, "insights_synthesis").unwrap_or(false),
        email_delivery: fields::flag(phases, "email_delivery").unwrap_or(false),
    };

    Some(WorkflowResult {
        workflow_status,
        phases_completed,
        research_findings_count: fields::text(result, "research_findings_count")
            .unwrap_or_else(|| "0".to_string()),
        topics_covered: fields::string_list(result, "topics_covered").unwrap_or_default(),
        email_sent_to: fields::string(result, "email_sent_to")
            .unwrap_or_else(|| recipient.to_string()),
        digest_title: fields::string(result, "digest_title")
            .unwrap_or_else(|| DEFAULT_DIGEST_TITLE.to_string()),
        completion_timestamp: fields::string(result, "completion_timestamp")
            .unwrap_or_else(|| requested_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        summary_message: fields::string(result, "summary_message").unwrap_or_default(),
    })
}
