//! TUI application state and event handling.
//!
//! The `App` owns a [`Session`] and drives it from keyboard actions. Agent
//! calls run on a worker thread and report back over a channel, so the
//! screen keeps redrawing (and the saving delay keeps ticking) while the
//! digest is being generated.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{debug, error};

use super::events::{Action, Focus, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::agent::{AgentCallError, AgentClient, AgentEnvelope};
use crate::clipboard::copy_finding;
use crate::models::Finding;
use crate::session::{GenerationRequest, Session};
use crate::storage::KeyValueStore;
use crate::view::{empty_state, findings_for, topic_groups};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
const PAGE_SIZE: isize = 10;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

pub type SharedClient = Arc<dyn AgentClient + Send + Sync>;

struct InFlight {
    request: GenerationRequest,
    receiver: Receiver<Result<AgentEnvelope, AgentCallError>>,
}

pub struct App<S: KeyValueStore> {
    session: Session<S>,
    client: SharedClient,
    focus: Focus,
    selected_idx: usize,
    in_flight: Option<InFlight>,
    status_message: Option<StatusMessage>,
    should_quit: bool,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(session: Session<S>, client: SharedClient) -> Self {
        let focus = if session.email().saved().is_some() { Focus::Digest } else { Focus::Email };

        Self {
            session,
            client,
            focus,
            selected_idx: 0,
            in_flight: None,
            status_message: None,
            should_quit: false,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn check_and_clear_expired_status(&mut self) {
        let should_clear = self
            .status_message
            .as_ref()
            .map(|msg| Instant::now() >= msg.expires_at)
            .unwrap_or(false);
        if should_clear {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.check_and_clear_expired_status();
            self.tick(Instant::now());

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                terminal.draw(|f| {
                    let digest = self.session.digest();
                    let selected_topic = self.session.topic_filter().selected();
                    let topics = digest.map(topic_groups).unwrap_or_default();
                    let findings =
                        digest.map(|d| findings_for(d, selected_topic)).unwrap_or_default();

                    let state = RenderState {
                        focus: self.focus,
                        email: self.session.email(),
                        notification: self.session.notification().current(),
                        digest,
                        topics: &topics,
                        selected_topic,
                        findings: &findings,
                        selected_idx: self.selected_idx,
                        empty_state: empty_state(digest, selected_topic),
                        generating: self.session.is_generating(),
                        last_generated: self.session.last_generated(),
                        status_message: self.status_message.as_ref(),
                    };
                    render_ui(f, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100), self.focus)?;
            self.handle_action(action);
        }

        Ok(())
    }

    /// Advance time-driven state: the delayed email save and the agent reply
    fn tick(&mut self, now: Instant) {
        if self.session.email().is_saving() {
            self.session.poll_email_save(now);
            if !self.session.email().is_saving() {
                if self.session.email().saved().is_some() {
                    self.focus = Focus::Digest;
                }
                self.needs_redraw = true;
            }
        }
        self.poll_generation();
    }

    fn poll_generation(&mut self) {
        let Some(in_flight) = &self.in_flight else {
            return;
        };

        let outcome = match in_flight.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(AgentCallError::WorkerLost),
        };

        if let Some(in_flight) = self.in_flight.take() {
            // Failures are reported through the session notification
            let _ = self.session.complete_generation(&in_flight.request, outcome);
        }
        self.selected_idx = 0;
        self.needs_redraw = true;
    }

    fn start_generation(&mut self) {
        let request = match self.session.begin_generation(Utc::now()) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "generation not started");
                self.needs_redraw = true;
                return;
            }
        };

        let (sender, receiver) = mpsc::channel();
        let client = Arc::clone(&self.client);
        let instruction = request.instruction.clone();
        let agent_id = request.agent_id;

        let spawned = thread::Builder::new().name("digest-agent".to_string()).spawn(move || {
            // The receiver is gone only if the app already quit
            let _ = sender.send(client.call(&instruction, agent_id));
        });

        match spawned {
            Ok(_) => self.in_flight = Some(InFlight { request, receiver }),
            Err(e) => {
                error!(error = %e, "failed to spawn agent worker");
                let _ = self.session.complete_generation(&request, Err(AgentCallError::WorkerLost));
            }
        }
        self.needs_redraw = true;
    }

    fn visible_findings(&self) -> Vec<&Finding> {
        self.session
            .digest()
            .map(|d| findings_for(d, self.session.topic_filter().selected()))
            .unwrap_or_default()
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Email => Focus::Digest,
                    Focus::Digest => Focus::Email,
                };
                self.needs_redraw = true;
            }
            Action::Input(c) => {
                self.session.email_mut().push_char(c);
                self.needs_redraw = true;
            }
            Action::DeleteChar => {
                self.session.email_mut().pop_char();
                self.needs_redraw = true;
            }
            Action::SaveEmail => {
                self.session.submit_email(Instant::now());
                self.needs_redraw = true;
            }
            Action::Generate => self.start_generation(),
            Action::NextTopic => self.cycle_topic(true),
            Action::PrevTopic => self.cycle_topic(false),
            Action::AllTopics => {
                self.session.topic_filter_mut().clear();
                self.selected_idx = 0;
                self.needs_redraw = true;
            }
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-PAGE_SIZE),
            Action::PageDown => self.move_selection(PAGE_SIZE),
            Action::CopyFinding => self.copy_selected(),
            Action::Dismiss => {
                if self.session.dismiss_notification() {
                    self.needs_redraw = true;
                }
            }
            Action::None => {}
        }
    }

    fn cycle_topic(&mut self, forward: bool) {
        let groups = self.session.digest().map(topic_groups).unwrap_or_default();
        let filter = self.session.topic_filter_mut();
        if forward {
            filter.cycle_next(&groups);
        } else {
            filter.cycle_prev(&groups);
        }
        self.selected_idx = 0;
        self.needs_redraw = true;
    }

    fn copy_selected(&mut self) {
        let Some(finding) = self.visible_findings().get(self.selected_idx).map(|f| (*f).clone())
        else {
            self.set_status(
                "✗ No finding selected",
                MessageType::Error,
                STATUS_ERROR_DURATION_MS,
            );
            return;
        };

        match copy_finding(&finding) {
            Ok(_) => {
                let what = if finding.url.is_some() { "link" } else { "citation" };
                self.set_status(
                    format!("✓ Copied {} to clipboard", what),
                    MessageType::Success,
                    STATUS_SUCCESS_DURATION_MS,
                );
            }
            Err(e) => {
                self.set_status(
                    format!("✗ Clipboard error: {}", e),
                    MessageType::Error,
                    STATUS_ERROR_DURATION_MS,
                );
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let total = self.visible_findings().len();
        if total == 0 {
            self.selected_idx = 0;
            return;
        }

        let old_idx = self.selected_idx;
        let new_idx = (self.selected_idx as isize + delta).max(0) as usize;
        self.selected_idx = new_idx.min(total - 1);

        if old_idx != self.selected_idx {
            self.needs_redraw = true;
        }
    }
}
