//! Agent templates

use serde::Serialize;
use tracing::debug;

/// Display accent for a template card
///
/// The catalog only names the accent; the TUI decides what it looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accent {
    Emerald,
    Blue,
    Pink,
    Purple,
    Yellow,
    Cyan,
}

/// A named category of agent behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub accent: Accent,
}

/// Reference templates, in display order
pub const TEMPLATES: &[Template] = &[
    Template {
        id: "json-agent",
        title: "JSON-Only Agent",
        description: "Generate agents that return clean, parseable JSON\u{2014}no fluff, just structure.",
        category: "Structured Output",
        accent: Accent::Emerald,
    },
    Template {
        id: "summarization",
        title: "Smart Summarizer",
        description: "Perfectly balanced summarization prompts with context control and tone guidance.",
        category: "Content Processing",
        accent: Accent::Blue,
    },
    Template {
        id: "keyword-agent",
        title: "Keyword Extractor",
        description: "Design agents that always return key terms, formatted just right.",
        category: "Data Extraction",
        accent: Accent::Pink,
    },
    Template {
        id: "conversational",
        title: "Conversational Agent",
        description: "Create engaging conversational AI with personality and context awareness.",
        category: "Interaction",
        accent: Accent::Purple,
    },
    Template {
        id: "analytical",
        title: "Data Analyst",
        description: "Build prompts for deep data analysis and insight generation.",
        category: "Analytics",
        accent: Accent::Yellow,
    },
    Template {
        id: "custom",
        title: "Custom Agent",
        description: "Start from scratch with guided prompt engineering assistance.",
        category: "Custom",
        accent: Accent::Cyan,
    },
];

/// All templates in display order
pub fn list_templates() -> &'static [Template] {
    debug!(count = TEMPLATES.len(), "list_templates: called");
    TEMPLATES
}

/// Look up a template by id
pub fn find_template(id: &str) -> Option<&'static Template> {
    debug!(%id, "find_template: called");
    let found = TEMPLATES.iter().find(|t| t.id == id);
    if found.is_none() {
        debug!(%id, "find_template: no template with this id");
    }
    found
}
