//! Session actions and their outcomes

use thiserror::Error;

use super::GenerationTicket;
use crate::catalog::Template;

/// Everything the rendering layer may ask the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectTemplate(Template),
    EditUseCase(String),
    EditAnswer { question_id: String, value: String },
    Generate,
    Refine,
    StartOver,
    GoBack,
}

impl Action {
    pub fn answer(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::EditAnswer {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

/// Why an action was a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IgnoreReason {
    #[error("action not available on this screen")]
    WrongView,

    #[error("a prompt is being generated")]
    Generating,

    #[error("describe your use case first")]
    EmptyUseCase,

    #[error("no template selected")]
    NoTemplate,

    #[error("question does not belong to the selected template")]
    UnknownQuestion,
}

/// Result of dispatching an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed
    Applied,
    /// Generation started; the caller schedules completion with this ticket
    Generate(GenerationTicket),
    /// Guard failed, nothing changed
    Ignored(IgnoreReason),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}
