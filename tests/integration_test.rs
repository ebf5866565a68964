/// End-to-end integration tests for the digest workflow
///
/// These tests drive a `Session` against a mock agent and an on-disk store:
/// save email → generate → normalize → persist → reload
mod common;

use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use common::{MockAgentClient, ReplyBuilder, TempStore};
use parenting_digest::agent::{AgentCallError, AgentEnvelope, MANAGER_AGENT_ID};
use parenting_digest::session::{GenerationState, NotificationKind, Session};
use parenting_digest::view::{findings_for, topic_groups};
use serde_json::json;

#[test]
fn test_e2e_save_email_then_generate() {
    let store = TempStore::new();
    let mut session = Session::load(store.open(), Duration::ZERO);

    session.email_mut().set_draft("a@b.co");
    assert!(session.submit_email(Instant::now()));
    assert_eq!(session.poll_email_save(Instant::now()).as_deref(), Some("a@b.co"));

    let client = MockAgentClient::replying(ReplyBuilder::new().success());
    session.generate(&client).unwrap();

    // One call, with the fixed instruction and manager agent id
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("a@b.co"));
    assert_eq!(calls[0].1, MANAGER_AGENT_ID);

    let notification = session.notification().current().unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert!(notification.message.contains("a@b.co"));

    // A restarted app sees the same digest
    let reloaded = store.open();
    let digest = reloaded.load_digest().unwrap().expect("digest persisted");
    assert_eq!(digest.email, "a@b.co");
    assert!(reloaded.load_last_generated().unwrap().is_some());
    assert_eq!(reloaded.load_email().unwrap().as_deref(), Some("a@b.co"));
}

#[test]
fn test_e2e_generate_without_email_makes_no_call() {
    let store = TempStore::new();
    let mut session = Session::load(store.open(), Duration::ZERO);
    let client = MockAgentClient::replying(ReplyBuilder::new().success());

    assert!(session.generate(&client).is_err());
    assert_eq!(client.call_count(), 0);
    assert_eq!(session.state(), &GenerationState::Idle);
    assert_eq!(
        session.notification().current().map(|n| n.kind),
        Some(NotificationKind::Error)
    );
}

#[test]
fn test_e2e_rate_limited_reply_persists_nothing() {
    let store = TempStore::new();
    store.open().save_email("a@b.co").unwrap();
    let mut session = Session::load(store.open(), Duration::ZERO);

    let reply = AgentEnvelope::failure("Agent API 429: Too Many Requests", Some(429));
    let client = MockAgentClient::replying(reply);
    assert!(session.generate(&client).is_err());

    let notification = session.notification().current().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert!(notification.message.starts_with("API credits exhausted"));

    let reloaded = store.open();
    assert!(reloaded.load_digest().unwrap().is_none());
    assert!(reloaded.load_last_generated().unwrap().is_none());
}

#[test]
fn test_e2e_transport_error_keeps_previous_digest() {
    let store = TempStore::new();
    store.open().save_email("a@b.co").unwrap();
    let mut session = Session::load(store.open(), Duration::ZERO);

    let ok = MockAgentClient::replying(ReplyBuilder::new().finding("Naps", "Sleep").success());
    session.generate(&ok).unwrap();
    session.dismiss_notification();

    let broken = MockAgentClient::failing(AgentCallError::Transport {
        status: None,
        message: "connection refused".to_string(),
    });
    assert!(session.generate(&broken).is_err());
    assert_eq!(session.state(), &GenerationState::Failed);

    // The earlier digest is still shown and still stored
    assert_eq!(session.digest().map(|d| d.findings().len()), Some(1));
    assert_eq!(store.open().load_digest().unwrap().map(|d| d.findings().len()), Some(1));
}

#[test]
fn test_e2e_recipient_and_timestamp_come_from_request() {
    let store = TempStore::new();
    store.open().save_email("a@b.co").unwrap();
    let mut session = Session::load(store.open(), Duration::ZERO);

    let requested_at = Utc.with_ymd_and_hms(2024, 11, 1, 8, 0, 0).unwrap();
    let request = session.begin_generation(requested_at).unwrap();

    let reply = ReplyBuilder::new()
        .field("email", json!("other@example.com"))
        .field("timestamp", json!("1999-01-01T00:00:00Z"))
        .success();
    session.complete_generation(&request, Ok(reply)).unwrap();

    let digest = session.digest().unwrap();
    assert_eq!(digest.email, "a@b.co");
    assert_eq!(digest.timestamp, requested_at);
    assert_eq!(session.last_generated(), Some(requested_at));
}

#[test]
fn test_e2e_topics_from_generated_digest() {
    let store = TempStore::new();
    store.open().save_email("a@b.co").unwrap();
    let mut session = Session::load(store.open(), Duration::ZERO);

    let reply = ReplyBuilder::new()
        .finding("Omega-3", "Nutrition")
        .finding("Naps", "sleep")
        .finding("Vegetables", "nutrition")
        .field("total_findings", json!(12))
        .success();
    session.generate(&MockAgentClient::replying(reply)).unwrap();

    let digest = session.digest().unwrap();
    let groups = topic_groups(digest);
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["nutrition", "sleep"]);
    assert_eq!(groups[0].count, 2);

    let nutrition: Vec<&str> =
        findings_for(digest, Some("NUTRITION")).iter().map(|f| f.title.as_str()).collect();
    assert_eq!(nutrition, vec!["Omega-3", "Vegetables"]);
    assert_eq!(digest.research.as_ref().map(|r| r.total_findings), Some(12));
}

#[test]
fn test_e2e_corrupted_store_file_starts_empty() {
    let store = TempStore::new();
    std::fs::write(store.path().join("storage.json"), "{not json").unwrap();

    let session = Session::load(store.open(), Duration::ZERO);
    assert!(session.email().saved().is_none());
    assert!(session.digest().is_none());

    // The store is writable again afterwards
    store.open().save_email("a@b.co").unwrap();
    assert_eq!(store.open().load_email().unwrap().as_deref(), Some("a@b.co"));
}
