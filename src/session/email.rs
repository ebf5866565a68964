//! Email form: draft editing, syntactic validation and a delayed save.

use std::time::{Duration, Instant};

use anyhow::Result;
use thiserror::Error;

use crate::storage::{DigestStorage, KeyValueStore};

/// Longest draft accepted from keyboard input
const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Please enter an email address")]
    Empty,
    #[error("Please enter a valid email address")]
    Invalid,
}

/// Syntactic check only: `local@domain.tld` with no whitespace and a single `@`
pub fn validate_email(email: &str) -> Result<(), EmailError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(EmailError::Empty);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(EmailError::Invalid);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(EmailError::Invalid);
    };
    if local.is_empty() || domain.contains('@') {
        return Err(EmailError::Invalid);
    }

    // Needs a dot with at least one character on both sides
    let has_inner_dot = domain
        .char_indices()
        .any(|(idx, c)| c == '.' && idx > 0 && idx + 1 < domain.len());
    if !has_inner_dot {
        return Err(EmailError::Invalid);
    }

    Ok(())
}

#[derive(Debug, Clone)]
struct PendingSave {
    email: String,
    ready_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct EmailForm {
    draft: String,
    saved: Option<String>,
    error: Option<EmailError>,
    pending: Option<PendingSave>,
}

impl EmailForm {
    pub fn new(saved: Option<String>) -> Self {
        Self { draft: saved.clone().unwrap_or_default(), saved, error: None, pending: None }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn saved(&self) -> Option<&str> {
        self.saved.as_deref()
    }

    /// Inline validation error from the last submit
    pub fn error(&self) -> Option<EmailError> {
        self.error
    }

    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    /// Draft differs from what is saved
    pub fn has_unsaved_changes(&self) -> bool {
        self.saved.as_deref().is_some_and(|saved| saved != self.draft.trim())
    }

    pub fn push_char(&mut self, c: char) {
        if self.draft.len() < MAX_EMAIL_LEN {
            self.draft.push(c);
            self.error = None;
        }
    }

    pub fn pop_char(&mut self) {
        if self.draft.pop().is_some() {
            self.error = None;
        }
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
        self.error = None;
    }

    /// Validate the draft and schedule a save completing after `delay`.
    ///
    /// Returns `Ok(false)` when ignored (blank draft or a save already pending).
    /// On invalid input the draft is kept and the inline error set.
    pub fn submit(&mut self, now: Instant, delay: Duration) -> Result<bool, EmailError> {
        if self.pending.is_some() || self.draft.trim().is_empty() {
            return Ok(false);
        }

        if let Err(e) = validate_email(&self.draft) {
            self.error = Some(e);
            return Err(e);
        }

        self.error = None;
        self.pending =
            Some(PendingSave { email: self.draft.trim().to_string(), ready_at: now + delay });
        Ok(true)
    }

    /// Commit a pending save whose delay has elapsed, returning the saved address
    pub fn poll_save<S: KeyValueStore>(
        &mut self,
        now: Instant,
        storage: &DigestStorage<S>,
    ) -> Result<Option<String>> {
        let ready = self.pending.as_ref().is_some_and(|p| now >= p.ready_at);
        if !ready {
            return Ok(None);
        }
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };

        storage.save_email(&pending.email)?;
        self.draft = pending.email.clone();
        self.saved = Some(pending.email.clone());
        Ok(Some(pending.email))
    }
}
