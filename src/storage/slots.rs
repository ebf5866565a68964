//! Typed access to the three persisted slots

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::warn;

use super::store::KeyValueStore;
use crate::models::DigestData;

pub const EMAIL_KEY: &str = "parentingDigest_email";
pub const DIGEST_KEY: &str = "parentingDigest_lastDigest";
pub const LAST_GENERATED_KEY: &str = "parentingDigest_lastGenerated";

pub struct DigestStorage<S> {
    store: S,
}

impl<S: KeyValueStore> DigestStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saved email, `None` when absent or blank
    pub fn load_email(&self) -> Result<Option<String>> {
        Ok(self.store.get(EMAIL_KEY)?.filter(|email| !email.trim().is_empty()))
    }

    pub fn save_email(&self, email: &str) -> Result<()> {
        self.store.set(EMAIL_KEY, email).context("Failed to save email")
    }

    /// Last digest. Unparseable content is logged and treated as absent.
    pub fn load_digest(&self) -> Result<Option<DigestData>> {
        let Some(raw) = self.store.get(DIGEST_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(digest) => Ok(Some(digest)),
            Err(e) => {
                warn!(error = %e, "failed to parse saved digest, ignoring it");
                Ok(None)
            }
        }
    }

    pub fn save_digest(&self, digest: &DigestData) -> Result<()> {
        let json = serde_json::to_string(digest).context("Failed to serialize digest")?;
        self.store.set(DIGEST_KEY, &json).context("Failed to save digest")
    }

    /// Last-generated time. Unparseable content is logged and treated as absent.
    pub fn load_last_generated(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.store.get(LAST_GENERATED_KEY)? else {
            return Ok(None);
        };

        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(timestamp) => Ok(Some(timestamp.with_timezone(&Utc))),
            Err(e) => {
                warn!(error = %e, value = %raw, "failed to parse last-generated timestamp");
                Ok(None)
            }
        }
    }

    pub fn save_last_generated(&self, timestamp: DateTime<Utc>) -> Result<()> {
        self.store
            .set(LAST_GENERATED_KEY, &timestamp.to_rfc3339())
            .context("Failed to save last-generated timestamp")
    }

    /// Remove all three slots
    pub fn clear(&self) -> Result<()> {
        for key in [EMAIL_KEY, DIGEST_KEY, LAST_GENERATED_KEY] {
            self.store.remove(key).with_context(|| format!("Failed to remove {}", key))?;
        }
        Ok(())
    }
}
