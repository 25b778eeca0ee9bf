//! Prompt Composer
//!
//! Turns a template, the user's use-case description and the collected
//! answers into the final system prompt.
//!
//! Skeleton loading chain:
//! 1. `{prompts-dir}/{template_id}.pmt` (user override, optional)
//! 2. Embedded skeleton compiled into the binary
//! 3. Generic skeleton
//!
//! Skeletons use Handlebars syntax with HTML escaping turned off; the use case
//! and answers are inserted verbatim.

pub mod embedded;
mod loader;
mod skeletons;

pub use loader::{ComposeError, PromptComposer, preview};
pub use skeletons::{Skeleton, Slot, resolve_slot, skeleton_for};

use std::collections::BTreeMap;

/// Answers keyed by question id (absent = unanswered)
pub type Answers = BTreeMap<String, String>;

/// Plain-text generic prompt used when no skeleton can be rendered
pub fn generic_prompt(use_case: &str) -> String {
    format!(
        "You are an AI assistant designed to help with: {}\n\nPlease provide a comprehensive and helpful response that addresses the user's needs effectively.",
        use_case
    )
}
