//! Template Catalog
//!
//! Fixed, ordered reference data: the agent templates offered on the landing
//! screen and the refinement questions asked for each of them.
//!
//! Everything here is `'static` and immutable. Lookups never fail; an unknown
//! template id simply has no questions.

mod questions;
mod templates;

pub use questions::{Question, QuestionKind, questions_for};
pub use templates::{Accent, TEMPLATES, Template, find_template, list_templates};
