//! TUI runner - main event loop
//!
//! Owns the terminal, the App and the Controller. All state mutation happens
//! on this loop: key presses queue requests on the App, which are drained
//! into the controller after every event, and controller timers come back
//! through the same `select!`.

use std::time::Duration;

use eyre::Result;
use tracing::{debug, info};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{AppState, PendingAction};
use super::views;
use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::controller::Controller;
use crate::session::{Action, IgnoreReason, Transition};

/// TUI runner that manages the main event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    controller: Controller,
    event_handler: EventHandler,
    clipboard: Box<dyn ClipboardSink>,
}

impl TuiRunner {
    /// Create a runner polling the real terminal
    pub fn new(terminal: Tui, controller: Controller, tick_rate: Duration) -> Self {
        debug!(?tick_rate, "TuiRunner::new: called");
        Self {
            app: App::new(),
            terminal,
            controller,
            event_handler: EventHandler::new(tick_rate),
            clipboard: Box::new(SystemClipboard::new()),
        }
    }

    /// Run the main loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        loop {
            self.terminal
                .draw(|frame| views::render(self.app.state(), &self.controller, frame))?;

            tokio::select! {
                event = self.event_handler.next() => {
                    match event? {
                        Event::Tick => {
                            self.app.state_mut().tick_count += 1;
                        }
                        Event::Key(key) => {
                            if self.app.handle_key(key, self.controller.session()) {
                                debug!("TuiRunner::run: force quit");
                                break;
                            }
                        }
                        Event::Resize(width, height) => {
                            debug!(width, height, "TuiRunner::run: resize");
                        }
                    }
                }
                Some(event) = self.controller.next_event() => {
                    self.controller.handle_event(event);
                }
            }

            apply_pending(self.app.state_mut(), &mut self.controller, self.clipboard.as_mut());

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        info!("TUI exiting");
        Ok(())
    }
}

/// Drain queued requests into the controller
pub(crate) fn apply_pending(state: &mut AppState, controller: &mut Controller, clipboard: &mut dyn ClipboardSink) {
    for pending in state.take_pending() {
        debug!(?pending, "apply_pending: applying");
        match pending {
            PendingAction::Dispatch(action) => {
                let is_generate = action == Action::Generate;
                match controller.dispatch(action) {
                    Transition::Ignored(reason @ (IgnoreReason::EmptyUseCase | IgnoreReason::NoTemplate))
                        if is_generate =>
                    {
                        state.set_notice(reason.to_string());
                    }
                    Transition::Ignored(_) | Transition::Applied | Transition::Generate(_) => {}
                }
            }
            PendingAction::CopyPrompt => {
                controller.copy_to(clipboard);
            }
            PendingAction::SkipReveal => controller.skip_reveal(),
        }
    }
}
