//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.
//!
//! The wizard's own state (view, template, use case, answers, generated
//! prompt) lives in [`crate::session::Session`]; this module only holds what
//! the terminal front end needs on top of it: cursor focus, list selection
//! and requests waiting for the runner.

use rand::seq::IndexedRandom;
use tracing::debug;

use crate::session::Action;

/// Words shown while a prompt is being generated
pub const WORKING_WORDS: &[&str] = &[
    "Forging",
    "Composing",
    "Drafting",
    "Assembling",
    "Tuning",
    "Polishing",
    "Weaving",
    "Sculpting",
];

/// Interaction mode (modal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Help overlay
    Help,
}

/// Which builder field has the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The use-case description
    #[default]
    UseCase,
    /// A refinement question, by position
    Question(usize),
    /// The Generate control
    Generate,
}

impl Focus {
    /// Next field, given how many questions the template has
    pub fn next(self, question_count: usize) -> Self {
        match self {
            Self::UseCase if question_count > 0 => Self::Question(0),
            Self::UseCase => Self::Generate,
            Self::Question(i) if i + 1 < question_count => Self::Question(i + 1),
            Self::Question(_) => Self::Generate,
            Self::Generate => Self::UseCase,
        }
    }

    /// Previous field, given how many questions the template has
    pub fn prev(self, question_count: usize) -> Self {
        match self {
            Self::UseCase => Self::Generate,
            Self::Question(0) => Self::UseCase,
            Self::Question(i) => Self::Question(i - 1),
            Self::Generate if question_count > 0 => Self::Question(question_count - 1),
            Self::Generate => Self::UseCase,
        }
    }

    /// Clamp a question focus that no longer exists
    pub fn clamp(self, question_count: usize) -> Self {
        match self {
            Self::Question(i) if i >= question_count => Self::Generate,
            other => other,
        }
    }
}

/// Selection state for the template list
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub selected_index: usize,
}

impl SelectionState {
    pub fn select_next(&mut self, max_items: usize) {
        if max_items > 0 && self.selected_index < max_items - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self, max_items: usize) {
        if max_items > 0 {
            self.selected_index = max_items - 1;
        }
    }
}

/// Work the runner performs after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Forward to the controller
    Dispatch(Action),
    /// Copy the generated prompt to the clipboard
    CopyPrompt,
    /// Show the whole prompt now
    SkipReveal,
}

/// Main TUI application state
#[derive(Debug)]
pub struct AppState {
    /// Current interaction mode
    pub interaction_mode: InteractionMode,
    /// Highlighted template on the landing screen
    pub landing: SelectionState,
    /// Focused builder field
    pub focus: Focus,
    /// Scroll offset of the result text
    pub result_scroll: u16,
    /// Requests waiting for the runner, in key order
    pub pending_actions: Vec<PendingAction>,
    /// Transient notice shown in the footer (cleared on next key)
    pub notice: Option<String>,
    /// Word shown while generating
    pub working_word: String,
    /// Ticks since start (drives the generating animation)
    pub tick_count: u64,
    /// Should the app quit
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        debug!("AppState::new: called");
        Self {
            interaction_mode: InteractionMode::Normal,
            landing: SelectionState::default(),
            focus: Focus::UseCase,
            result_scroll: 0,
            pending_actions: Vec::new(),
            notice: None,
            working_word: WORKING_WORDS[0].to_string(),
            tick_count: 0,
            should_quit: false,
        }
    }

    /// Queue an action for the controller
    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "AppState::dispatch: called");
        self.pending_actions.push(PendingAction::Dispatch(action));
    }

    /// Take every queued request
    pub fn take_pending(&mut self) -> Vec<PendingAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Pick a fresh word for the generating indicator
    pub fn pick_working_word(&mut self) {
        let mut rng = rand::rng();
        self.working_word = WORKING_WORDS.choose(&mut rng).unwrap_or(&"Forging").to_string();
        debug!(word = %self.working_word, "AppState::pick_working_word: picked");
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn toggle_help(&mut self) {
        self.interaction_mode = match self.interaction_mode {
            InteractionMode::Help => InteractionMode::Normal,
            InteractionMode::Normal => InteractionMode::Help,
        };
    }
}
