use std::collections::BTreeMap;

use crate::models::{DigestData, Finding};

/// One distinct topic with its badge count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicGroup {
    /// Lower-cased comparison key
    pub key: String,
    /// Display label, casing of the first finding seen with this topic
    pub label: String,
    pub count: usize,
}

/// Why there is nothing to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoDigest,
    NoFindingsReturned,
    NoFindingsForTopic,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoDigest => "Your latest research findings will appear here",
            Self::NoFindingsReturned => "The agent did not return any findings for this digest",
            Self::NoFindingsForTopic => "No findings for this topic",
        }
    }
}

/// Distinct topics sorted by key
pub fn topic_groups(digest: &DigestData) -> Vec<TopicGroup> {
    let mut groups: BTreeMap<String, TopicGroup> = BTreeMap::new();

    for finding in digest.findings() {
        let key = finding.topic_key();
        groups
            .entry(key.clone())
            .and_modify(|group| group.count += 1)
            .or_insert_with(|| TopicGroup {
                key,
                label: finding.topic_area.trim().to_string(),
                count: 1,
            });
    }

    groups.into_values().collect()
}

/// Findings matching `topic` (case-insensitive) in source order; all findings when `None`
pub fn findings_for<'a>(digest: &'a DigestData, topic: Option<&str>) -> Vec<&'a Finding> {
    let findings = digest.findings();
    match topic {
        None => findings.iter().collect(),
        Some(topic) => {
            let key = topic.trim().to_lowercase();
            findings.iter().filter(|f| f.topic_key() == key).collect()
        }
    }
}

/// Empty state to show for the current selection, if the list would be empty
pub fn empty_state(digest: Option<&DigestData>, topic: Option<&str>) -> Option<EmptyState> {
    let Some(digest) = digest else {
        return Some(EmptyState::NoDigest);
    };

    if digest.findings().is_empty() {
        Some(EmptyState::NoFindingsReturned)
    } else if findings_for(digest, topic).is_empty() {
        Some(EmptyState::NoFindingsForTopic)
    } else {
        None
    }
}

/// Selected topic, `None` meaning "All Topics"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    selected: Option<String>,
}

impl TopicFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, key: &str) {
        self.selected = Some(key.trim().to_lowercase());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Advance through All → first topic → ... → last topic → All
    pub fn cycle_next(&mut self, groups: &[TopicGroup]) {
        self.selected = match self.position(groups) {
            None => groups.first().map(|g| g.key.clone()),
            Some(idx) => groups.get(idx + 1).map(|g| g.key.clone()),
        };
    }

    /// Reverse of [`cycle_next`](Self::cycle_next)
    pub fn cycle_prev(&mut self, groups: &[TopicGroup]) {
        self.selected = match self.position(groups) {
            None => groups.last().map(|g| g.key.clone()),
            Some(0) => None,
            Some(idx) => groups.get(idx - 1).map(|g| g.key.clone()),
        };
    }

    /// Index of the selection in `groups`; a stale selection counts as "All"
    fn position(&self, groups: &[TopicGroup]) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        groups.iter().position(|g| g.key == selected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::ResearchResult;

    fn finding(title: &str, topic: &str) -> Finding {
        Finding {
            title: title.to_string(),
            source: "Pediatrics".to_string(),
            date_published: "2024-11".to_string(),
            topic_area: topic.to_string(),
            key_finding: String::new(),
            actionable_implication: None,
            credibility_score: "high".to_string(),
            url: None,
        }
    }

    fn digest(findings: Vec<Finding>) -> DigestData {
        DigestData {
            workflow: None,
            research: Some(ResearchResult {
                total_findings: findings.len() as u64,
                findings,
                search_timestamp: String::new(),
                sources_searched: Vec::new(),
            }),
            timestamp: Utc::now(),
            email: "a@b.co".to_string(),
        }
    }

    fn mixed() -> DigestData {
        digest(vec![
            finding("a", "Sleep"),
            finding("b", "nutrition"),
            finding("c", "SLEEP"),
            finding("d", "Behavior"),
            finding("e", "sleep"),
        ])
    }

    #[test]
    fn test_topic_keys_sorted_and_case_folded() {
        let groups = topic_groups(&mixed());
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["behavior", "nutrition", "sleep"]);
    }

    #[test]
    fn test_topic_counts_and_first_seen_label() {
        let groups = topic_groups(&mixed());
        let sleep = groups.iter().find(|g| g.key == "sleep").unwrap();
        assert_eq!(sleep.count, 3);
        assert_eq!(sleep.label, "Sleep");
    }

    #[test]
    fn test_topic_order_independent_of_input_order() {
        let forward = topic_groups(&digest(vec![finding("a", "b-topic"), finding("b", "a-topic")]));
        let reverse = topic_groups(&digest(vec![finding("b", "a-topic"), finding("a", "b-topic")]));
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_filter_preserves_source_order() {
        let digest = mixed();
        let titles: Vec<&str> =
            findings_for(&digest, Some("Sleep")).iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c", "e"]);
    }

    #[test]
    fn test_no_filter_returns_all() {
        let digest = mixed();
        assert_eq!(findings_for(&digest, None).len(), 5);
    }

    #[test]
    fn test_unknown_topic_is_empty() {
        let digest = mixed();
        assert!(findings_for(&digest, Some("astronomy")).is_empty());
        assert_eq!(
            empty_state(Some(&digest), Some("astronomy")),
            Some(EmptyState::NoFindingsForTopic)
        );
    }

    #[test]
    fn test_zero_findings() {
        let empty = digest(Vec::new());
        assert!(topic_groups(&empty).is_empty());
        assert!(findings_for(&empty, None).is_empty());
        assert_eq!(empty_state(Some(&empty), None), Some(EmptyState::NoFindingsReturned));
    }

    #[test]
    fn test_no_research_and_no_digest() {
        let mut no_research = mixed();
        no_research.research = None;
        assert!(topic_groups(&no_research).is_empty());
        assert_eq!(empty_state(Some(&no_research), None), Some(EmptyState::NoFindingsReturned));
        assert_eq!(empty_state(None, None), Some(EmptyState::NoDigest));
        assert_eq!(empty_state(Some(&mixed()), None), None);
    }

    #[test]
    fn test_filter_cycles_through_topics() {
        let groups = topic_groups(&mixed());
        let mut filter = TopicFilter::new();
        assert_eq!(filter.selected(), None);

        filter.cycle_next(&groups);
        assert_eq!(filter.selected(), Some("behavior"));
        filter.cycle_next(&groups);
        filter.cycle_next(&groups);
        assert_eq!(filter.selected(), Some("sleep"));
        filter.cycle_next(&groups);
        assert_eq!(filter.selected(), None);

        filter.cycle_prev(&groups);
        assert_eq!(filter.selected(), Some("sleep"));
        filter.select("Behavior");
        filter.cycle_prev(&groups);
        assert_eq!(filter.selected(), None);
    }

    #[test]
    fn test_filter_cycle_with_no_topics_stays_all() {
        let mut filter = TopicFilter::new();
        filter.cycle_next(&[]);
        assert_eq!(filter.selected(), None);
        filter.cycle_prev(&[]);
        assert_eq!(filter.selected(), None);
    }
}
