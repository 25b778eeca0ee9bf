//! Skeleton slot tables
//!
//! Each skeleton names the slots it renders. A slot is filled from one answer
//! key, or from a literal default when that answer is absent or empty. The same
//! answer may feed several slots with different defaults (the summarization
//! heading says "medium-length" while the body says "Medium (1 paragraph)").

use tracing::debug;

use super::Answers;

/// A named substitution point in a skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Variable name used inside the .pmt file
    pub name: &'static str,
    /// Question id the value is read from
    pub answer_key: &'static str,
    /// Literal used when the answer is missing or empty
    pub default: &'static str,
}

const fn slot(name: &'static str, answer_key: &'static str, default: &'static str) -> Slot {
    Slot {
        name,
        answer_key,
        default,
    }
}

/// Fixed text-with-slots associated with a template id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skeleton {
    pub template_id: &'static str,
    pub slots: &'static [Slot],
}

const SKELETONS: &[Skeleton] = &[
    Skeleton {
        template_id: "json-agent",
        slots: &[
            slot("required_fields", "required_fields", "id, content, metadata"),
            slot("validation_rules", "validation_rules", "standard validation rules"),
            slot(
                "output_format",
                "output_format",
                r#"{"id": "string", "content": "string", "metadata": {}}"#,
            ),
        ],
    },
    Skeleton {
        template_id: "summarization",
        slots: &[
            slot("length_heading", "length", "medium-length"),
            slot("tone_heading", "tone", "professional"),
            slot("length", "length", "Medium (1 paragraph)"),
            slot("tone", "tone", "Professional"),
            slot("focus", "focus", "Main themes and key insights"),
        ],
    },
    Skeleton {
        template_id: "keyword-agent",
        slots: &[
            slot("keyword_count", "keyword_count", "5-10"),
            slot("keyword_type_heading", "keyword_type", "general topic"),
            slot("keyword_type", "keyword_type", "General topics"),
            slot("format", "format", "Comma-separated"),
        ],
    },
];

/// Skeleton for a template id, if one exists
///
/// conversational, analytical and custom collect answers but have no
/// skeleton; they render the generic prompt.
pub fn skeleton_for(template_id: &str) -> Option<&'static Skeleton> {
    debug!(%template_id, "skeleton_for: called");
    SKELETONS.iter().find(|s| s.template_id == template_id)
}

/// Resolve one slot against the answers
pub fn resolve_slot<'a>(slot: &Slot, answers: &'a Answers) -> &'a str {
    match answers.get(slot.answer_key) {
        Some(value) if !value.is_empty() => value.as_str(),
        _ => slot.default,
    }
}
