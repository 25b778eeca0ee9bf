//! View Controller
//!
//! Owns the [`Session`], the composer and every timer the wizard needs:
//! - the simulated generation delay
//! - the character-by-character reveal of the generated prompt
//! - the auto-clearing "copied" feedback
//!
//! Timers are [`ScopedTask`]s that only send [`ControllerEvent`]s back over a
//! channel. Each event carries the epoch it was spawned under; events from an
//! older epoch are discarded, and leaving a screen drops the tasks outright.

mod task;

pub use task::{ScopedTask, after, every};

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clipboard::ClipboardSink;
use crate::composer::PromptComposer;
use crate::session::{Action, GenerationTicket, Session, Transition, View};

/// Delays used by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Simulated processing time before the prompt appears
    pub generate_delay: Duration,
    /// Time per revealed character (zero shows the prompt at once)
    pub reveal_interval: Duration,
    /// How long copy feedback stays visible (zero drops it at once)
    pub copy_feedback: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            generate_delay: Duration::from_millis(2000),
            reveal_interval: Duration::from_millis(20),
            copy_feedback: Duration::from_millis(2000),
        }
    }
}

impl Timings {
    /// No delays at all
    pub fn immediate() -> Self {
        Self {
            generate_delay: Duration::ZERO,
            reveal_interval: Duration::ZERO,
            copy_feedback: Duration::ZERO,
        }
    }
}

/// Deferred work reported back to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    GenerationFinished { ticket: GenerationTicket, text: String },
    RevealTick { epoch: u64 },
    CopyFeedbackExpired { copy_epoch: u64 },
}

/// Outcome of the last copy request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyStatus {
    Copied,
    Failed(String),
}

#[derive(Debug)]
struct Reveal {
    shown: usize,
    total: usize,
    _ticker: ScopedTask,
}

/// Drives a [`Session`] and its scheduled work
#[derive(Debug)]
pub struct Controller {
    session: Session,
    composer: PromptComposer,
    timings: Timings,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    /// Pending generation delay
    generation: Option<ScopedTask>,
    /// Reveal in progress (None once the whole prompt is visible)
    reveal: Option<Reveal>,
    copy_status: Option<CopyStatus>,
    copy_expiry: Option<ScopedTask>,
    copy_epoch: u64,
}

impl Controller {
    pub fn new(composer: PromptComposer, timings: Timings) -> Self {
        debug!(?timings, "Controller::new: called");
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(),
            composer,
            timings,
            events_tx,
            events_rx,
            generation: None,
            reveal: None,
            copy_status: None,
            copy_expiry: None,
            copy_epoch: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn copy_status(&self) -> Option<&CopyStatus> {
        self.copy_status.as_ref()
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// The part of the generated prompt currently on screen
    pub fn displayed_text(&self) -> Option<&str> {
        let text = self.session.generated()?;
        match &self.reveal {
            Some(reveal) => Some(
                text.char_indices()
                    .nth(reveal.shown)
                    .map(|(idx, _)| &text[..idx])
                    .unwrap_or(text),
            ),
            None => Some(text),
        }
    }

    /// Apply an action to the session and (re)schedule timers
    pub fn dispatch(&mut self, action: Action) -> Transition {
        debug!(?action, "Controller::dispatch: called");
        let epoch = self.session.epoch();
        let transition = self.session.dispatch(action);

        if self.session.epoch() != epoch {
            self.cancel_scheduled();
        }

        match transition {
            Transition::Generate(ticket) => self.schedule_generation(ticket),
            Transition::Ignored(reason) => debug!(%reason, "Controller::dispatch: action ignored"),
            Transition::Applied => {}
        }
        transition
    }

    /// Show the whole prompt now
    pub fn skip_reveal(&mut self) {
        if self.reveal.take().is_some() {
            debug!("Controller::skip_reveal: reveal skipped");
        }
    }

    /// Copy the generated prompt
    ///
    /// Only available on the result screen. The full prompt is copied even
    /// while it is still being revealed.
    pub fn copy_to(&mut self, sink: &mut dyn ClipboardSink) -> Option<CopyStatus> {
        debug!("Controller::copy_to: called");
        if self.session.view() != View::Result {
            debug!("Controller::copy_to: not on result screen");
            return None;
        }
        let text = self.session.generated()?;

        let status = match sink.set_text(text) {
            Ok(()) => {
                info!("Copied prompt to clipboard ({} chars)", text.len());
                CopyStatus::Copied
            }
            Err(e) => {
                warn!("Copy failed: {}", e);
                CopyStatus::Failed(e.to_string())
            }
        };

        self.copy_epoch += 1;
        if self.timings.copy_feedback.is_zero() {
            debug!("Controller::copy_to: feedback disabled, not retaining status");
            self.copy_status = None;
            self.copy_expiry = None;
            return Some(status);
        }

        self.copy_status = Some(status.clone());
        self.copy_expiry = Some(after(
            "copy-feedback",
            self.timings.copy_feedback,
            self.events_tx.clone(),
            ControllerEvent::CopyFeedbackExpired {
                copy_epoch: self.copy_epoch,
            },
        ));
        Some(status)
    }

    /// Wait for the next scheduled event
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    /// Take a queued event without waiting
    pub fn try_next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Apply a scheduled event; returns true if anything visible changed
    pub fn handle_event(&mut self, event: ControllerEvent) -> bool {
        match event {
            ControllerEvent::GenerationFinished { ticket, text } => {
                debug!(ticket_epoch = ticket.epoch(), "Controller::handle_event: GenerationFinished");
                let finished = self.finish_generation(ticket, text);
                if finished {
                    self.generation = None;
                }
                finished
            }
            ControllerEvent::RevealTick { epoch } => {
                if epoch != self.session.epoch() {
                    return false;
                }
                let Some(reveal) = self.reveal.as_mut() else {
                    return false;
                };
                reveal.shown += 1;
                if reveal.shown >= reveal.total {
                    debug!("Controller::handle_event: reveal complete");
                    self.reveal = None;
                }
                true
            }
            ControllerEvent::CopyFeedbackExpired { copy_epoch } => {
                if copy_epoch != self.copy_epoch {
                    return false;
                }
                debug!("Controller::handle_event: copy feedback expired");
                self.copy_expiry = None;
                self.copy_status.take().is_some()
            }
        }
    }

    fn schedule_generation(&mut self, ticket: GenerationTicket) {
        let Some(template) = self.session.selected_template().copied() else {
            return;
        };
        let text = self
            .composer
            .compose(&template, self.session.use_case(), self.session.answers());

        if self.timings.generate_delay.is_zero() {
            debug!("Controller::schedule_generation: no delay, completing now");
            self.finish_generation(ticket, text);
            return;
        }

        self.generation = Some(after(
            "generate",
            self.timings.generate_delay,
            self.events_tx.clone(),
            ControllerEvent::GenerationFinished { ticket, text },
        ));
    }

    fn finish_generation(&mut self, ticket: GenerationTicket, text: String) -> bool {
        if !self.session.complete_generation(ticket, text) {
            return false;
        }
        self.start_reveal();
        true
    }

    fn start_reveal(&mut self) {
        let total = self.session.generated().map(|t| t.chars().count()).unwrap_or(0);
        if total == 0 || self.timings.reveal_interval.is_zero() {
            self.reveal = None;
            return;
        }

        let epoch = self.session.epoch();
        debug!(total, epoch, "Controller::start_reveal: called");
        self.reveal = Some(Reveal {
            shown: 0,
            total,
            _ticker: every(
                "reveal",
                self.timings.reveal_interval,
                self.events_tx.clone(),
                move || ControllerEvent::RevealTick { epoch },
            ),
        });
    }

    fn cancel_scheduled(&mut self) {
        debug!("Controller::cancel_scheduled: called");
        self.generation = None;
        self.reveal = None;
        self.copy_status = None;
        self.copy_expiry = None;
    }
}
