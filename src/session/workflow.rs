//! Generation workflow: one explicit state machine over the form,
//! notification, storage and the last digest.

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::email::EmailForm;
use super::notification::NotificationState;
use crate::agent::{
    AgentCallError, AgentClient, AgentEnvelope, MANAGER_AGENT_ID, digest_instruction,
};
use crate::error::GenerationError;
use crate::models::DigestData;
use crate::normalizer::normalize_reply;
use crate::storage::{DIGEST_KEY, DigestStorage, KeyValueStore, LAST_GENERATED_KEY};
use crate::view::TopicFilter;

const EMAIL_SAVED_MESSAGE: &str = "Email address saved successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating { recipient: String, requested_at: DateTime<Utc> },
    Succeeded { recipient: String },
    Failed,
}

/// Everything the agent call needs, captured when generation starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub instruction: String,
    pub agent_id: &'static str,
    pub recipient: String,
    pub requested_at: DateTime<Utc>,
}

pub struct Session<S: KeyValueStore> {
    storage: DigestStorage<S>,
    email: EmailForm,
    notification: NotificationState,
    digest: Option<DigestData>,
    last_generated: Option<DateTime<Utc>>,
    state: GenerationState,
    topic_filter: TopicFilter,
    save_delay: Duration,
}

impl<S: KeyValueStore> Session<S> {
    /// Restore the saved email, digest and timestamp. Unreadable slots start empty.
    pub fn load(storage: DigestStorage<S>, save_delay: Duration) -> Self {
        let email = or_log(storage.load_email(), "email");
        let digest = or_log(storage.load_digest(), "digest");
        let stored_at = or_log(storage.load_last_generated(), "last-generated timestamp");
        // The digest records its own request time and wins if the two slots disagree
        let last_generated = digest.as_ref().map(|d| d.timestamp).or(stored_at);

        Self {
            storage,
            email: EmailForm::new(email),
            notification: NotificationState::default(),
            digest,
            last_generated,
            state: GenerationState::Idle,
            topic_filter: TopicFilter::new(),
            save_delay,
        }
    }

    pub fn storage(&self) -> &DigestStorage<S> {
        &self.storage
    }

    pub fn email(&self) -> &EmailForm {
        &self.email
    }

    pub fn email_mut(&mut self) -> &mut EmailForm {
        &mut self.email
    }

    pub fn notification(&self) -> &NotificationState {
        &self.notification
    }

    pub fn digest(&self) -> Option<&DigestData> {
        self.digest.as_ref()
    }

    pub fn last_generated(&self) -> Option<DateTime<Utc>> {
        self.last_generated
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, GenerationState::Generating { .. })
    }

    /// Trigger is enabled: an email is saved and nothing is in flight
    pub fn can_generate(&self) -> bool {
        self.email.saved().is_some() && !self.is_generating()
    }

    pub fn topic_filter(&self) -> &TopicFilter {
        &self.topic_filter
    }

    pub fn topic_filter_mut(&mut self) -> &mut TopicFilter {
        &mut self.topic_filter
    }

    /// Dismiss the banner; a finished run goes back to idle
    pub fn dismiss_notification(&mut self) -> bool {
        if matches!(self.state, GenerationState::Succeeded { .. } | GenerationState::Failed) {
            self.state = GenerationState::Idle;
        }
        self.notification.dismiss()
    }

    /// Validate the draft and schedule the save. Returns whether a save started.
    pub fn submit_email(&mut self, now: Instant) -> bool {
        // The inline error is kept on the form; nothing else happens
        self.email.submit(now, self.save_delay).unwrap_or(false)
    }

    /// Finish a pending email save once its delay has passed
    pub fn poll_email_save(&mut self, now: Instant) -> Option<String> {
        match self.email.poll_save(now, &self.storage) {
            Ok(Some(email)) => {
                info!("saved email address");
                self.notification.success(EMAIL_SAVED_MESSAGE);
                Some(email)
            }
            Ok(None) => None,
            Err(e) => {
                error!(error = %e, "failed to persist email");
                self.notification.error(format!("Failed to save email address: {}", e));
                None
            }
        }
    }

    /// Start a generation.
    ///
    /// Without a saved email this shows an error and stays idle. While another
    /// generation is in flight the request is refused without touching state.
    pub fn begin_generation(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<GenerationRequest, GenerationError> {
        if self.is_generating() {
            return Err(GenerationError::InProgress);
        }

        let Some(recipient) = self.email.saved().map(str::to_string) else {
            let error = GenerationError::MissingEmail;
            self.notification.error(error.user_message());
            return Err(error);
        };

        self.notification.dismiss();
        self.state =
            GenerationState::Generating { recipient: recipient.clone(), requested_at: now };
        info!(recipient = %recipient, "starting digest generation");

        Ok(GenerationRequest {
            instruction: digest_instruction(&recipient),
            agent_id: MANAGER_AGENT_ID,
            recipient,
            requested_at: now,
        })
    }

    /// Apply the outcome of the agent call. Always leaves the generating state.
    pub fn complete_generation(
        &mut self,
        request: &GenerationRequest,
        outcome: Result<AgentEnvelope, AgentCallError>,
    ) -> Result<(), GenerationError> {
        let result = outcome.map_err(GenerationError::from).and_then(|envelope| {
            normalize_reply(&envelope, &request.recipient, request.requested_at)
        });

        match result {
            Ok(digest) => {
                self.accept_digest(request, digest);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "digest generation failed");
                self.notification.error(e.user_message());
                self.state = GenerationState::Failed;
                Err(e)
            }
        }
    }

    /// Run a whole generation synchronously against `client`
    pub fn generate(&mut self, client: &dyn AgentClient) -> Result<(), GenerationError> {
        let request = self.begin_generation(Utc::now())?;
        let outcome = client.call(&request.instruction, request.agent_id);
        self.complete_generation(&request, outcome)
    }

    fn accept_digest(&mut self, request: &GenerationRequest, digest: DigestData) {
        // Digest first: the timestamp slot is only written once the digest is stored
        let persisted = self
            .storage
            .save_digest(&digest)
            .map_err(|e| (DIGEST_KEY, e))
            .and_then(|()| {
                self.storage
                    .save_last_generated(request.requested_at)
                    .map_err(|e| (LAST_GENERATED_KEY, e))
            });

        self.digest = Some(digest);
        self.last_generated = Some(request.requested_at);
        self.topic_filter.clear();
        self.state = GenerationState::Succeeded { recipient: request.recipient.clone() };

        match persisted {
            Ok(()) => {
                info!(recipient = %request.recipient, "digest generated");
                self.notification.success(format!(
                    "Digest generated and sent to {}! Check your inbox for the latest parenting science research.",
                    request.recipient
                ));
            }
            Err((slot, e)) => {
                error!(slot, error = %e, "failed to persist digest");
                self.notification.error(format!(
                    "Digest sent to {} but could not be saved locally: {}",
                    request.recipient, e
                ));
            }
        }
    }
}

fn or_log<T>(result: Result<Option<T>>, slot: &str) -> Option<T> {
    result.unwrap_or_else(|e| {
        warn!(slot, error = %e, "failed to read saved value, starting without it");
        None
    })
}
