//! Session state and the view state machine
//!
//! `Session` holds everything a user has entered for the current wizard run.
//! Every mutation goes through [`Session::dispatch`], which enforces the
//! transition table: an action that is not allowed in the current view is a
//! no-op reported as [`Transition::Ignored`], never an error.
//!
//! ```text
//! Landing --select_template--> Builder --generate--> Builder{generating}
//!    ^                          |  ^                        |
//!    |                   go_back|  |refine          complete|
//!    +--------------------------+  |                        v
//!    +-----------start_over--------+------------------- Result
//! ```

mod action;

pub use action::{Action, IgnoreReason, Transition};

use tracing::{debug, info};

use crate::catalog::{Question, Template, questions_for};
use crate::composer::Answers;

/// Which screen the wizard is on
///
/// `generating` only exists on `Builder`, so a pending generation cannot
/// outlive the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Landing,
    Builder {
        generating: bool,
    },
    Result,
}

impl View {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Landing => "Templates",
            Self::Builder { generating: false } => "Configure",
            Self::Builder { generating: true } => "Generating",
            Self::Result => "Result",
        }
    }
}

/// Progress step shown in the step indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ChooseTemplate,
    Configure,
    TestAndRefine,
    Deploy,
}

impl Step {
    pub const ALL: [Step; 4] = [Self::ChooseTemplate, Self::Configure, Self::TestAndRefine, Self::Deploy];

    /// 1-based position
    pub fn number(self) -> u8 {
        match self {
            Self::ChooseTemplate => 1,
            Self::Configure => 2,
            Self::TestAndRefine => 3,
            Self::Deploy => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ChooseTemplate => "Choose Template",
            Self::Configure => "Configure",
            Self::TestAndRefine => "Test & Refine",
            Self::Deploy => "Deploy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ChooseTemplate => "Select your agent type",
            Self::Configure => "Fine-tune parameters",
            Self::TestAndRefine => "Validate your prompt",
            Self::Deploy => "Get production-ready code",
        }
    }
}

/// Proof that a generation was started at a given epoch
///
/// Only the ticket issued by the latest `generate` can complete it; any
/// navigation in between bumps the epoch and the ticket goes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
}

impl GenerationTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Transient per-interaction state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    selected: Option<Template>,
    use_case: String,
    answers: Answers,
    generated: Option<String>,
    view: View,
    /// Bumped whenever scheduled work spawned earlier must be discarded
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        debug!("Session::new: called");
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected_template(&self) -> Option<&Template> {
        self.selected.as_ref()
    }

    pub fn use_case(&self) -> &str {
        &self.use_case
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn generated(&self) -> Option<&str> {
        self.generated.as_deref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.view, View::Builder { generating: true })
    }

    /// Questions for the selected template (empty when none is selected)
    pub fn questions(&self) -> &'static [Question] {
        self.selected.map(|t| questions_for(t.id)).unwrap_or(&[])
    }

    /// Whether the Generate control should be enabled
    pub fn can_generate(&self) -> bool {
        matches!(self.view, View::Builder { generating: false })
            && self.selected.is_some()
            && !self.use_case.trim().is_empty()
    }

    pub fn step(&self) -> Step {
        match self.view {
            View::Landing => Step::ChooseTemplate,
            View::Builder { generating: false } => Step::Configure,
            View::Builder { generating: true } => Step::TestAndRefine,
            View::Result => Step::Deploy,
        }
    }

    /// Apply an action
    ///
    /// This is the only place the view changes.
    pub fn dispatch(&mut self, action: Action) -> Transition {
        debug!(?action, view = ?self.view, "Session::dispatch: called");
        let transition = match action {
            Action::SelectTemplate(template) => self.select_template(template),
            Action::EditUseCase(text) => self.edit_use_case(text),
            Action::EditAnswer { question_id, value } => self.edit_answer(question_id, value),
            Action::Generate => self.generate(),
            Action::Refine => self.refine(),
            Action::StartOver => self.start_over(),
            Action::GoBack => self.go_back(),
        };
        debug!(?transition, view = ?self.view, epoch = self.epoch, "Session::dispatch: done");
        transition
    }

    /// Finish a generation started with `ticket`
    ///
    /// Returns false (and changes nothing) when the ticket is stale or the
    /// session is no longer generating.
    pub fn complete_generation(&mut self, ticket: GenerationTicket, text: String) -> bool {
        debug!(
            ticket_epoch = ticket.epoch,
            epoch = self.epoch,
            view = ?self.view,
            "Session::complete_generation: called"
        );
        if ticket.epoch != self.epoch || !self.is_generating() {
            debug!("Session::complete_generation: stale ticket, ignoring");
            return false;
        }

        info!("Generation complete: {} chars", text.len());
        self.generated = Some(text);
        self.view = View::Result;
        self.epoch += 1;
        true
    }

    fn select_template(&mut self, template: Template) -> Transition {
        if matches!(self.view, View::Result) {
            return Transition::Ignored(IgnoreReason::WrongView);
        }
        info!("Template selected: {}", template.id);
        self.selected = Some(template);
        self.answers.clear();
        self.generated = None;
        self.view = View::Builder { generating: false };
        self.epoch += 1;
        Transition::Applied
    }

    /// The use case stays editable during a pending generation; the prompt
    /// being generated was composed from the text at the time of the request.
    fn edit_use_case(&mut self, text: String) -> Transition {
        match self.view {
            View::Builder { .. } => {
                self.use_case = text;
                Transition::Applied
            }
            _ => Transition::Ignored(IgnoreReason::WrongView),
        }
    }

    fn edit_answer(&mut self, question_id: String, value: String) -> Transition {
        match self.view {
            View::Builder { generating: false } => {}
            View::Builder { generating: true } => return Transition::Ignored(IgnoreReason::Generating),
            _ => return Transition::Ignored(IgnoreReason::WrongView),
        }
        if !self.questions().iter().any(|q| q.id == question_id) {
            debug!(%question_id, "Session::edit_answer: not a question of the selected template");
            return Transition::Ignored(IgnoreReason::UnknownQuestion);
        }
        self.answers.insert(question_id, value);
        Transition::Applied
    }

    fn generate(&mut self) -> Transition {
        match self.view {
            View::Builder { generating: false } => {}
            View::Builder { generating: true } => return Transition::Ignored(IgnoreReason::Generating),
            _ => return Transition::Ignored(IgnoreReason::WrongView),
        }
        if self.selected.is_none() {
            return Transition::Ignored(IgnoreReason::NoTemplate);
        }
        if self.use_case.trim().is_empty() {
            return Transition::Ignored(IgnoreReason::EmptyUseCase);
        }

        self.epoch += 1;
        self.view = View::Builder { generating: true };
        info!("Generation started (epoch {})", self.epoch);
        Transition::Generate(GenerationTicket { epoch: self.epoch })
    }

    fn refine(&mut self) -> Transition {
        if !matches!(self.view, View::Result) {
            return Transition::Ignored(IgnoreReason::WrongView);
        }
        self.generated = None;
        self.view = View::Builder { generating: false };
        self.epoch += 1;
        Transition::Applied
    }

    fn start_over(&mut self) -> Transition {
        if !matches!(self.view, View::Result) {
            return Transition::Ignored(IgnoreReason::WrongView);
        }
        info!("Starting over");
        let epoch = self.epoch + 1;
        *self = Self::default();
        self.epoch = epoch;
        Transition::Applied
    }

    fn go_back(&mut self) -> Transition {
        if !matches!(self.view, View::Builder { .. }) {
            return Transition::Ignored(IgnoreReason::WrongView);
        }
        if self.is_generating() {
            info!("Generation abandoned");
        }
        self.view = View::Landing;
        self.epoch += 1;
        Transition::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_template;

    fn template(id: &str) -> Template {
        *find_template(id).unwrap()
    }

    fn builder(id: &str) -> Session {
        let mut session = Session::new();
        assert_eq!(session.dispatch(Action::SelectTemplate(template(id))), Transition::Applied);
        session
    }

    fn ready(id: &str, use_case: &str) -> Session {
        let mut session = builder(id);
        session.dispatch(Action::EditUseCase(use_case.to_string()));
        session
    }

    fn ticket(transition: Transition) -> GenerationTicket {
        match transition {
            Transition::Generate(ticket) => ticket,
            other => panic!("expected Generate, got {:?}", other),
        }
    }

    fn at_result() -> Session {
        let mut session = ready("summarization", "summarize this");
        session.dispatch(Action::answer("tone", "Casual"));
        let t = ticket(session.dispatch(Action::Generate));
        assert!(session.complete_generation(t, "PROMPT".to_string()));
        session
    }

    #[test]
    fn test_new_session() {
        let session = Session::new();
        assert_eq!(session.view(), View::Landing);
        assert!(session.selected_template().is_none());
        assert!(session.use_case().is_empty());
        assert!(session.answers().is_empty());
        assert!(session.generated().is_none());
        assert!(!session.is_generating());
        assert_eq!(session.step(), Step::ChooseTemplate);
    }

    #[test]
    fn test_select_template_enters_builder() {
        let session = builder("json-agent");
        assert_eq!(session.view(), View::Builder { generating: false });
        assert_eq!(session.selected_template().unwrap().id, "json-agent");
        assert_eq!(session.questions().len(), 3);
        assert_eq!(session.step(), Step::Configure);
    }

    #[test]
    fn test_select_template_in_builder_clears_answers() {
        let mut session = ready("summarization", "notes");
        session.dispatch(Action::answer("length", "Brief (1-2 sentences)"));
        assert_eq!(session.answers().len(), 1);

        session.dispatch(Action::SelectTemplate(template("keyword-agent")));
        assert!(session.answers().is_empty());
        assert!(session.generated().is_none());
        assert_eq!(session.selected_template().unwrap().id, "keyword-agent");
        assert_eq!(session.use_case(), "notes");
    }

    #[test]
    fn test_edit_answer_rejects_unknown_question() {
        let mut session = builder("json-agent");
        assert_eq!(
            session.dispatch(Action::answer("tone", "Casual")),
            Transition::Ignored(IgnoreReason::UnknownQuestion)
        );
        assert!(session.answers().is_empty());

        assert_eq!(session.dispatch(Action::answer("required_fields", "id")), Transition::Applied);
        assert_eq!(session.answer("required_fields"), Some("id"));
    }

    #[test]
    fn test_edits_ignored_on_landing() {
        let mut session = Session::new();
        assert_eq!(
            session.dispatch(Action::EditUseCase("x".to_string())),
            Transition::Ignored(IgnoreReason::WrongView)
        );
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_generate_noop_on_blank_use_case() {
        let mut session = ready("json-agent", "   \n\t ");
        let before = session.clone();
        assert_eq!(
            session.dispatch(Action::Generate),
            Transition::Ignored(IgnoreReason::EmptyUseCase)
        );
        assert_eq!(session, before);
        assert!(!session.can_generate());
    }

    #[test]
    fn test_generate_sets_generating() {
        let mut session = ready("json-agent", "extract user info");
        assert!(session.can_generate());
        let t = ticket(session.dispatch(Action::Generate));
        assert!(session.is_generating());
        assert!(!session.can_generate());
        assert_eq!(session.step(), Step::TestAndRefine);
        assert_eq!(t.epoch(), session.epoch());
    }

    #[test]
    fn test_no_mutation_while_generating() {
        let mut session = ready("json-agent", "extract user info");
        session.dispatch(Action::Generate);
        let before = session.clone();

        assert_eq!(session.dispatch(Action::Generate), Transition::Ignored(IgnoreReason::Generating));
        assert_eq!(
            session.dispatch(Action::answer("required_fields", "id")),
            Transition::Ignored(IgnoreReason::Generating)
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_use_case_editable_while_generating() {
        let mut session = ready("json-agent", "extract user info");
        let Transition::Generate(ticket) = session.dispatch(Action::Generate) else {
            panic!("expected generation to start");
        };

        assert_eq!(
            session.dispatch(Action::EditUseCase("other".to_string())),
            Transition::Applied
        );
        assert_eq!(session.use_case(), "other");
        assert!(session.is_generating());
        assert!(session.generated().is_none());

        // The pending generation still lands with the text it was composed from
        assert!(session.complete_generation(ticket, "PROMPT".to_string()));
        assert_eq!(session.generated(), Some("PROMPT"));
        assert_eq!(session.use_case(), "other");
    }

    #[test]
    fn test_complete_generation() {
        let session = at_result();
        assert_eq!(session.view(), View::Result);
        assert_eq!(session.generated(), Some("PROMPT"));
        assert!(!session.is_generating());
        assert_eq!(session.step(), Step::Deploy);
    }

    #[test]
    fn test_stale_ticket_after_go_back() {
        let mut session = ready("json-agent", "extract user info");
        let t = ticket(session.dispatch(Action::Generate));
        assert_eq!(session.dispatch(Action::GoBack), Transition::Applied);
        assert_eq!(session.view(), View::Landing);

        let before = session.clone();
        assert!(!session.complete_generation(t, "late".to_string()));
        assert_eq!(session, before);
    }

    #[test]
    fn test_stale_ticket_after_select_template() {
        let mut session = ready("json-agent", "extract user info");
        let t = ticket(session.dispatch(Action::Generate));
        session.dispatch(Action::SelectTemplate(template("summarization")));
        assert_eq!(session.view(), View::Builder { generating: false });

        assert!(!session.complete_generation(t, "late".to_string()));
        assert!(session.generated().is_none());

        // A new generation is not completed by the old ticket either
        let fresh = ticket(session.dispatch(Action::Generate));
        assert!(!session.complete_generation(t, "late".to_string()));
        assert!(session.complete_generation(fresh, "fresh".to_string()));
        assert_eq!(session.generated(), Some("fresh"));
    }

    #[test]
    fn test_refine_keeps_inputs() {
        let mut session = at_result();
        assert_eq!(session.dispatch(Action::Refine), Transition::Applied);
        assert_eq!(session.view(), View::Builder { generating: false });
        assert_eq!(session.selected_template().unwrap().id, "summarization");
        assert_eq!(session.use_case(), "summarize this");
        assert_eq!(session.answer("tone"), Some("Casual"));
        assert!(session.generated().is_none());
    }

    #[test]
    fn test_start_over_resets_everything() {
        let mut session = at_result();
        let epoch = session.epoch();
        assert_eq!(session.dispatch(Action::StartOver), Transition::Applied);

        assert_eq!(session.view(), View::Landing);
        assert!(session.selected_template().is_none());
        assert!(session.use_case().is_empty());
        assert!(session.answers().is_empty());
        assert!(session.generated().is_none());
        assert!(session.epoch() > epoch);
    }

    #[test]
    fn test_start_over_only_from_result() {
        let mut session = ready("json-agent", "x");
        assert_eq!(session.dispatch(Action::StartOver), Transition::Ignored(IgnoreReason::WrongView));
        assert_eq!(session.use_case(), "x");
    }

    #[test]
    fn test_go_back_keeps_inputs() {
        let mut session = ready("custom", "build a bot");
        session.dispatch(Action::answer("purpose", "support"));
        session.dispatch(Action::GoBack);
        assert_eq!(session.view(), View::Landing);
        assert_eq!(session.use_case(), "build a bot");

        // Selecting again resets the answers
        session.dispatch(Action::SelectTemplate(template("custom")));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_refine_and_go_back_ignored_elsewhere() {
        let mut session = Session::new();
        assert_eq!(session.dispatch(Action::Refine), Transition::Ignored(IgnoreReason::WrongView));
        assert_eq!(session.dispatch(Action::GoBack), Transition::Ignored(IgnoreReason::WrongView));

        let mut session = at_result();
        assert_eq!(session.dispatch(Action::GoBack), Transition::Ignored(IgnoreReason::WrongView));
        assert_eq!(
            session.dispatch(Action::SelectTemplate(template("custom"))),
            Transition::Ignored(IgnoreReason::WrongView)
        );
        assert_eq!(session.generated(), Some("PROMPT"));
    }

    #[test]
    fn test_generated_only_in_result() {
        let mut session = at_result();
        assert!(session.generated().is_some());
        session.dispatch(Action::Refine);
        assert!(session.generated().is_none());
    }

    #[test]
    fn test_steps() {
        let numbers: Vec<u8> = Step::ALL.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(Step::TestAndRefine.title(), "Test & Refine");
        assert_eq!(Step::Deploy.description(), "Get production-ready code");
    }
}
