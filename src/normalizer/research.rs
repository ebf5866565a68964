use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::warn;

use super::fields;
use crate::models::{Finding, ResearchResult};

const DEFAULT_TITLE: &str = "Untitled finding";
const DEFAULT_SOURCE: &str = "Unknown source";
const DEFAULT_TOPIC: &str = "general";
const DEFAULT_CREDIBILITY: &str = "unrated";

/// Parse the research payload carried by the reply.
///
/// Looks in `result.research` first and falls back to `result` itself.
/// Returns `None` when the reply has no findings, total or sources at all.
pub fn parse_research(result: &Value, requested_at: DateTime<Utc>) -> Option<ResearchResult> {
    let payload = match result.get("research") {
        Some(research) if research.is_object() => research,
        _ => result,
    };

    let raw_findings = payload
        .get("research_findings")
        .or_else(|| payload.get("findings"))
        .and_then(Value::as_array);
    let reported_total = fields::count(payload, "total_findings");
    let sources = fields::string_list(payload, "sources_searched");

    if raw_findings.is_none() && reported_total.is_none() && sources.is_none() {
        return None;
    }

    let findings: Vec<Finding> = raw_findings
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| {
                    let finding = parse_finding(item);
                    if finding.is_none() {
                        warn!(index = idx, "skipping research finding that is not an object");
                    }
                    finding
                })
                .collect()
        })
        .unwrap_or_default();

    Some(ResearchResult {
        total_findings: reported_total.unwrap_or(findings.len() as u64),
        findings,
        search_timestamp: fields::string(payload, "search_timestamp")
            .unwrap_or_else(|| requested_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        sources_searched: dedup_preserving_order(sources.unwrap_or_default()),
    })
}

fn parse_finding(item: &Value) -> Option<Finding> {
    if !item.is_object() {
        return None;
    }

    Some(Finding {
        title: fields::string(item, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        source: fields::string(item, "source").unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        date_published: fields::text(item, "date_published").unwrap_or_default(),
        topic_area: fields::string(item, "topic_area").unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
        key_finding: fields::string(item, "key_finding").unwrap_or_default(),
        actionable_implication: fields::string(item, "actionable_implication"),
        credibility_score: fields::text(item, "credibility_score")
            .unwrap_or_else(|| DEFAULT_CREDIBILITY.to_string()),
        url: fields::string(item, "url"),
    })
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_no_research_payload_is_none() {
        assert!(parse_research(&json!({}), at()).is_none());
        assert!(parse_research(&json!({ "workflow_status": "completed" }), at()).is_none());
        assert!(parse_research(&Value::Null, at()).is_none());
    }

    #[test]
    fn test_findings_parsed_from_nested_research() {
        let result = json!({
            "research": {
                "research_findings": [
                    {
                        "title": "Omega-3 and working memory",
                        "source": "Pediatrics",
                        "date_published": "2024-11",
                        "topic_area": "Nutrition",
                        "key_finding": "DHA improved working memory",
                        "actionable_implication": "Serve fish twice a week",
                        "credibility_score": "high",
                        "url": "https://doi.org/10.1542/peds.1"
                    }
                ],
                "total_findings": 10,
                "sources_searched": ["Pediatrics", "Child Development"]
            }
        });

        let research = parse_research(&result, at()).unwrap();
        assert_eq!(research.findings.len(), 1);
        assert_eq!(research.total_findings, 10);
        assert_eq!(research.findings[0].topic_area, "Nutrition");
        assert_eq!(research.findings[0].url.as_deref(), Some("https://doi.org/10.1542/peds.1"));
        assert_eq!(research.sources_searched, vec!["Pediatrics", "Child Development"]);
        assert_eq!(research.search_timestamp, "2024-11-01T08:00:00.000Z");
    }

    #[test]
    fn test_findings_parsed_from_flat_result() {
        let result = json!({
            "findings": [{ "title": "A", "topic_area": "sleep" }, { "title": "B" }],
        });

        let research = parse_research(&result, at()).unwrap();
        assert_eq!(research.findings.len(), 2);
        assert_eq!(research.total_findings, 2);
        assert_eq!(research.findings[1].topic_area, DEFAULT_TOPIC);
        assert!(research.sources_searched.is_empty());
    }

    #[test]
    fn test_finding_defaults() {
        let result =
            json!({ "research_findings": [{ "actionable_implication": "  ", "url": "" }] });
        let finding = &parse_research(&result, at()).unwrap().findings[0];

        assert_eq!(finding.title, DEFAULT_TITLE);
        assert_eq!(finding.source, DEFAULT_SOURCE);
        assert_eq!(finding.date_published, "");
        assert_eq!(finding.key_finding, "");
        assert_eq!(finding.credibility_score, DEFAULT_CREDIBILITY);
        assert!(finding.actionable_implication.is_none());
        assert!(finding.url.is_none());
    }

    #[test]
    fn test_non_object_findings_skipped_in_order() {
        let result = json!({
            "research_findings": [{ "title": "first" }, "junk", 3, { "title": "second" }]
        });
        let research = parse_research(&result, at()).unwrap();
        let titles: Vec<&str> = research.findings.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_total_may_exceed_findings() {
        let result = json!({ "research_findings": [{ "title": "only" }], "total_findings": "25" });
        let research = parse_research(&result, at()).unwrap();
        assert_eq!(research.findings.len(), 1);
        assert_eq!(research.total_findings, 25);
    }

    #[test]
    fn test_sources_deduplicated_keeping_first() {
        let result = json!({ "sources_searched": ["JAMA", "Pediatrics", "JAMA", ""] });
        let research = parse_research(&result, at()).unwrap();
        assert_eq!(research.sources_searched, vec!["JAMA", "Pediatrics"]);
        assert!(research.findings.is_empty());
        assert_eq!(research.total_findings, 0);
    }

    #[test]
    fn test_nested_non_object_research_falls_back_to_result() {
        let result = json!({ "research": "see email", "total_findings": 3 });
        let research = parse_research(&result, at()).unwrap();
        assert_eq!(research.total_findings, 3);
    }
}
