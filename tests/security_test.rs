/// Security-focused integration tests
///
/// Agent replies are untrusted: terminal escape sequences must never reach
/// stdout, and oversized or deeply nested replies must not break the store.
mod common;

use std::process::Command;

use assert_cmd::prelude::*;
use chrono::Utc;
use common::{ReplyBuilder, TempStore};
use parenting_digest::normalize_reply;
use predicates::prelude::*;
use serde_json::json;

fn hostile_digest(store: &TempStore) {
    let reply = ReplyBuilder::new()
        .field(
            "research_findings",
            json!([{
                "title": "\u{1b}]0;pwned\u{7}Screen time \u{1b}[31mred\u{1b}[0m",
                "source": "Journal\u{1b}[2J",
                "topic_area": "Screens",
                "key_finding": "Moderation\u{8}\u{8}helps",
                "url": "https://example.org/\u{1b}[1A"
            }]),
        )
        .success();
    let digest = normalize_reply(&reply, "a@b.co", Utc::now()).unwrap();
    store.open().save_digest(&digest).unwrap();
}

#[test]
fn test_security_show_strips_escape_sequences() {
    let store = TempStore::new();
    hostile_digest(&store);

    Command::new(env!("CARGO_BIN_EXE_parenting-digest"))
        .env("HOME", store.path())
        .env("XDG_CONFIG_HOME", store.path().join("config"))
        .env("PARENTING_DIGEST_STORAGE__DATA_DIR", store.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen time red"))
        .stdout(predicate::str::contains("\u{1b}").not())
        .stdout(predicate::str::contains("\u{7}").not());
}

#[test]
fn test_security_hostile_text_survives_storage_roundtrip() {
    let store = TempStore::new();
    hostile_digest(&store);

    // Stored verbatim; sanitizing happens at display time
    let digest = store.open().load_digest().unwrap().unwrap();
    assert!(digest.findings()[0].title.contains('\u{1b}'));
}

#[test]
fn test_security_large_reply_roundtrips() {
    let store = TempStore::new();
    let mut builder = ReplyBuilder::new();
    for i in 0..2_000 {
        builder = builder.finding(&format!("Finding {}", i), &format!("Topic {}", i % 17));
    }
    let digest = normalize_reply(&builder.success(), "a@b.co", Utc::now()).unwrap();
    store.open().save_digest(&digest).unwrap();

    let loaded = store.open().load_digest().unwrap().unwrap();
    assert_eq!(loaded.findings().len(), 2_000);
}

#[test]
fn test_security_deeply_nested_result_is_ignored() {
    let mut nested = json!("bottom");
    for _ in 0..64 {
        nested = json!({ "inner": nested });
    }
    let reply = ReplyBuilder::new().field("research", nested).success();

    let digest = normalize_reply(&reply, "a@b.co", Utc::now()).unwrap();
    assert!(digest.findings().is_empty());
}
