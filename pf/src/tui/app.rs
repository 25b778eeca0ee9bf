//! TUI application - key handling
//!
//! The App struct owns the AppState and turns key presses into queued
//! requests. It never touches the session directly: everything that changes
//! wizard state is queued as an [`Action`] for the runner to dispatch.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::{AppState, Focus, InteractionMode, PendingAction};
use crate::catalog::{QuestionKind, list_templates};
use crate::session::{Action, Session, View};

/// TUI application
#[derive(Debug, Default)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self { state: AppState::new() }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event against the current session
    ///
    /// Returns true if the application should exit immediately.
    pub fn handle_key(&mut self, key: KeyEvent, session: &Session) -> bool {
        debug!(?key, view = ?session.view(), "App::handle_key: called");
        self.state.clear_notice();

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.state.interaction_mode == InteractionMode::Help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(1)) {
                self.state.toggle_help();
            }
            return false;
        }

        if key.code == KeyCode::F(1) {
            self.state.toggle_help();
            return false;
        }

        match session.view() {
            View::Landing => self.handle_landing_key(key),
            View::Builder { generating: false } => self.handle_builder_key(key, session),
            View::Builder { generating: true } => self.handle_generating_key(key, session),
            View::Result => self.handle_result_key(key),
        }
        false
    }

    fn handle_landing_key(&mut self, key: KeyEvent) {
        let count = list_templates().len();
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('?') => self.state.toggle_help(),
            KeyCode::Up | KeyCode::Char('k') => self.state.landing.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.state.landing.select_next(count),
            KeyCode::Char('g') | KeyCode::Home => self.state.landing.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.state.landing.select_last(count),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if idx < count {
                    self.state.landing.selected_index = idx;
                    self.select_highlighted();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select_highlighted(),
            _ => {}
        }
    }

    fn select_highlighted(&mut self) {
        if let Some(template) = list_templates().get(self.state.landing.selected_index) {
            debug!(template_id = template.id, "App::select_highlighted: selecting");
            self.state.focus = Focus::UseCase;
            self.state.dispatch(Action::SelectTemplate(*template));
        }
    }

    fn handle_builder_key(&mut self, key: KeyEvent, session: &Session) {
        let questions = session.questions();
        let focus = self.state.focus.clamp(questions.len());
        self.state.focus = focus;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('g') {
                self.request_generate(session);
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.state.dispatch(Action::GoBack),
            KeyCode::Tab | KeyCode::Down => self.state.focus = focus.next(questions.len()),
            KeyCode::BackTab | KeyCode::Up => self.state.focus = focus.prev(questions.len()),
            KeyCode::Enter if focus == Focus::UseCase && inserts_newline(key) => self.edit_use_case(key, session),
            KeyCode::Enter => match focus {
                Focus::Generate => self.request_generate(session),
                _ => self.state.focus = focus.next(questions.len()),
            },
            _ => match focus {
                Focus::UseCase => self.edit_use_case(key, session),
                Focus::Question(idx) => self.edit_question(key, session, idx),
                Focus::Generate => match key.code {
                    KeyCode::Char('q') => self.state.should_quit = true,
                    KeyCode::Char('?') => self.state.toggle_help(),
                    _ => {}
                },
            },
        }
    }

    fn request_generate(&mut self, session: &Session) {
        if session.can_generate() {
            self.state.pick_working_word();
        }
        // Blank use cases are still dispatched; the runner reports why nothing happened
        self.state.dispatch(Action::Generate);
    }

    fn edit_use_case(&mut self, key: KeyEvent, session: &Session) {
        if let Some(text) = edited(session.use_case(), key, false) {
            self.state.dispatch(Action::EditUseCase(text));
        }
    }

    fn edit_question(&mut self, key: KeyEvent, session: &Session, idx: usize) {
        let Some(question) = session.questions().get(idx) else {
            return;
        };
        let current = session.answer(question.id).unwrap_or("");

        match question.kind {
            QuestionKind::SingleChoice(choices) => {
                let value = match key.code {
                    KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l') => cycle_choice(choices, current, true),
                    KeyCode::Left | KeyCode::Char('h') => cycle_choice(choices, current, false),
                    _ => None,
                };
                if let Some(value) = value {
                    self.state.dispatch(Action::answer(question.id, value));
                }
            }
            kind => {
                let digits_only = matches!(kind, QuestionKind::Number);
                if let Some(text) = edited(current, key, digits_only) {
                    self.state.dispatch(Action::answer(question.id, text));
                }
            }
        }
    }

    /// Only the use case stays editable while a prompt is generating
    fn handle_generating_key(&mut self, key: KeyEvent, session: &Session) {
        match key.code {
            KeyCode::Esc => self.state.dispatch(Action::GoBack),
            _ if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            _ if self.state.focus == Focus::UseCase => self.edit_use_case(key, session),
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('?') => self.state.toggle_help(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('?') => self.state.toggle_help(),
            KeyCode::Char('c') | KeyCode::Char('y') => self.state.pending_actions.push(PendingAction::CopyPrompt),
            KeyCode::Char('r') | KeyCode::Esc => {
                self.state.result_scroll = 0;
                self.state.dispatch(Action::Refine);
            }
            KeyCode::Char('n') | KeyCode::Char('s') => {
                self.state.result_scroll = 0;
                self.state.landing.select_first();
                self.state.focus = Focus::UseCase;
                self.state.dispatch(Action::StartOver);
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.state.pending_actions.push(PendingAction::SkipReveal),
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.result_scroll = self.state.result_scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.result_scroll = self.state.result_scroll.saturating_sub(1);
            }
            KeyCode::Char('g') | KeyCode::Home => self.state.result_scroll = 0,
            _ => {}
        }
    }
}

/// Shift+Enter or Alt+Enter breaks the line instead of moving on
fn inserts_newline(key: KeyEvent) -> bool {
    key.code == KeyCode::Enter && key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT)
}

/// Apply a text-editing key to `current`
///
/// Returns the new text, or None if the key does not edit.
fn edited(current: &str, key: KeyEvent, digits_only: bool) -> Option<String> {
    match key.code {
        KeyCode::Enter if !digits_only && inserts_newline(key) => {
            let mut text = current.to_string();
            text.push('\n');
            Some(text)
        }
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => {
            debug!(%c, "edited: ignoring alt-modified key");
            None
        }
        KeyCode::Char(c) if digits_only && !c.is_ascii_digit() => None,
        KeyCode::Char(c) => {
            let mut text = current.to_string();
            text.push(c);
            Some(text)
        }
        KeyCode::Backspace if !current.is_empty() => {
            let mut text = current.to_string();
            text.pop();
            Some(text)
        }
        _ => None,
    }
}

/// Step to the neighbouring choice, wrapping at both ends
///
/// An unanswered question starts at the first choice going forward and at the
/// last going backward.
fn cycle_choice(choices: &[&'static str], current: &str, forward: bool) -> Option<&'static str> {
    if choices.is_empty() {
        return None;
    }
    let len = choices.len();
    let idx = match choices.iter().position(|c| *c == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    choices.get(idx).copied()
}
