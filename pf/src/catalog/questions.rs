//! Refinement questions

use serde::Serialize;
use tracing::debug;

/// Input kind of a refinement question
///
/// Choices only exist for `SingleChoice`, so the type carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "choices", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Multi-line free text
    FreeText,
    /// Single-line text
    ShortText,
    /// Numeric input (kept as text; only digits are accepted when typing)
    Number,
    /// Pick one of a fixed, ordered list
    SingleChoice(&'static [&'static str]),
}

impl QuestionKind {
    pub fn choices(&self) -> &'static [&'static str] {
        match self {
            Self::SingleChoice(choices) => choices,
            _ => &[],
        }
    }

    /// Whether the value is typed rather than picked
    pub fn is_typed(&self) -> bool {
        !matches!(self, Self::SingleChoice(_))
    }
}

/// A structured follow-up input used to fill a skeleton slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub kind: QuestionKind,
}

const fn question(id: &'static str, prompt: &'static str, kind: QuestionKind) -> Question {
    Question { id, prompt, kind }
}

const JSON_AGENT: &[Question] = &[
    question(
        "output_format",
        "What specific JSON structure do you need?",
        QuestionKind::FreeText,
    ),
    question("required_fields", "Which fields are mandatory?", QuestionKind::ShortText),
    question(
        "validation_rules",
        "Any validation rules or constraints?",
        QuestionKind::FreeText,
    ),
];

const SUMMARIZATION: &[Question] = &[
    question(
        "length",
        "Preferred summary length?",
        QuestionKind::SingleChoice(&[
            "Brief (1-2 sentences)",
            "Medium (1 paragraph)",
            "Detailed (2-3 paragraphs)",
        ]),
    ),
    question(
        "tone",
        "What tone should the summary have?",
        QuestionKind::SingleChoice(&["Professional", "Casual", "Academic", "Creative"]),
    ),
    question("focus", "What aspects should be emphasized?", QuestionKind::FreeText),
];

const KEYWORD_AGENT: &[Question] = &[
    question(
        "keyword_count",
        "How many keywords should be extracted?",
        QuestionKind::Number,
    ),
    question(
        "keyword_type",
        "What type of keywords?",
        QuestionKind::SingleChoice(&["General topics", "Technical terms", "Entities", "Actions"]),
    ),
    question(
        "format",
        "How should keywords be formatted?",
        QuestionKind::SingleChoice(&["Comma-separated", "JSON array", "Bullet points"]),
    ),
];

const CONVERSATIONAL: &[Question] = &[
    question(
        "personality",
        "What personality should the agent have?",
        QuestionKind::FreeText,
    ),
    question(
        "context_memory",
        "Should it remember conversation history?",
        QuestionKind::SingleChoice(&["Yes", "No"]),
    ),
    question(
        "response_style",
        "Preferred response style?",
        QuestionKind::SingleChoice(&["Concise", "Detailed", "Conversational", "Professional"]),
    ),
];

const ANALYTICAL: &[Question] = &[
    question(
        "analysis_type",
        "What type of analysis is needed?",
        QuestionKind::SingleChoice(&["Statistical", "Trend analysis", "Comparative", "Predictive"]),
    ),
    question(
        "output_format",
        "How should insights be presented?",
        QuestionKind::SingleChoice(&["Bullet points", "Narrative", "Structured report", "Key metrics"]),
    ),
    question(
        "depth",
        "Level of detail required?",
        QuestionKind::SingleChoice(&[
            "High-level overview",
            "Detailed analysis",
            "Deep dive with recommendations",
        ]),
    ),
];

const CUSTOM: &[Question] = &[
    question(
        "purpose",
        "What is the main purpose of your agent?",
        QuestionKind::FreeText,
    ),
    question(
        "input_type",
        "What type of input will it receive?",
        QuestionKind::FreeText,
    ),
    question(
        "output_requirements",
        "What should the output look like?",
        QuestionKind::FreeText,
    ),
];

/// Refinement questions for a template, in the order they are asked
///
/// Unknown ids get an empty slice.
pub fn questions_for(template_id: &str) -> &'static [Question] {
    debug!(%template_id, "questions_for: called");
    match template_id {
        "json-agent" => JSON_AGENT,
        "summarization" => SUMMARIZATION,
        "keyword-agent" => KEYWORD_AGENT,
        "conversational" => CONVERSATIONAL,
        "analytical" => ANALYTICAL,
        "custom" => CUSTOM,
        _ => {
            debug!(%template_id, "questions_for: unknown template, no questions");
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::list_templates;
    use std::collections::HashSet;

    fn ids(template_id: &str) -> Vec<&'static str> {
        questions_for(template_id).iter().map(|q| q.id).collect()
    }

    #[test]
    fn test_every_template_has_questions() {
        for template in list_templates() {
            assert!(
                !questions_for(template.id).is_empty(),
                "{} should have questions",
                template.id
            );
        }
    }

    #[test]
    fn test_question_sets_match_reference() {
        assert_eq!(ids("json-agent"), vec!["output_format", "required_fields", "validation_rules"]);
        assert_eq!(ids("summarization"), vec!["length", "tone", "focus"]);
        assert_eq!(ids("keyword-agent"), vec!["keyword_count", "keyword_type", "format"]);
        assert_eq!(ids("conversational"), vec!["personality", "context_memory", "response_style"]);
        assert_eq!(ids("analytical"), vec!["analysis_type", "output_format", "depth"]);
        assert_eq!(ids("custom"), vec!["purpose", "input_type", "output_requirements"]);
    }

    #[test]
    fn test_question_prompts_match_reference() {
        let prompts: Vec<&str> = list_templates()
            .iter()
            .flat_map(|t| questions_for(t.id).iter().map(|q| q.prompt))
            .collect();
        assert_eq!(
            prompts,
            vec![
                "What specific JSON structure do you need?",
                "Which fields are mandatory?",
                "Any validation rules or constraints?",
                "Preferred summary length?",
                "What tone should the summary have?",
                "What aspects should be emphasized?",
                "How many keywords should be extracted?",
                "What type of keywords?",
                "How should keywords be formatted?",
                "What personality should the agent have?",
                "Should it remember conversation history?",
                "Preferred response style?",
                "What type of analysis is needed?",
                "How should insights be presented?",
                "Level of detail required?",
                "What is the main purpose of your agent?",
                "What type of input will it receive?",
                "What should the output look like?",
            ]
        );
    }

    #[test]
    fn test_question_kinds_match_reference() {
        assert_eq!(
            questions_for("json-agent")[0],
            Question {
                id: "output_format",
                prompt: "What specific JSON structure do you need?",
                kind: QuestionKind::FreeText,
            }
        );
        assert_eq!(questions_for("json-agent")[1].kind, QuestionKind::ShortText);
        assert_eq!(questions_for("keyword-agent")[0].kind, QuestionKind::Number);
        assert_eq!(
            questions_for("keyword-agent")[1].kind,
            QuestionKind::SingleChoice(&["General topics", "Technical terms", "Entities", "Actions"])
        );
        assert_eq!(
            questions_for("summarization")[1].kind,
            QuestionKind::SingleChoice(&["Professional", "Casual", "Academic", "Creative"])
        );
        assert_eq!(
            questions_for("conversational")[1].kind,
            QuestionKind::SingleChoice(&["Yes", "No"])
        );
        assert_eq!(
            questions_for("analytical")[2].kind,
            QuestionKind::SingleChoice(&[
                "High-level overview",
                "Detailed analysis",
                "Deep dive with recommendations",
            ])
        );

        let typed: Vec<(&str, &str)> = list_templates()
            .iter()
            .flat_map(|t| questions_for(t.id).iter().map(move |q| (t.id, q)))
            .filter(|(_, q)| q.kind.is_typed())
            .map(|(t, q)| (t, q.id))
            .collect();
        assert_eq!(
            typed,
            vec![
                ("json-agent", "output_format"),
                ("json-agent", "required_fields"),
                ("json-agent", "validation_rules"),
                ("summarization", "focus"),
                ("keyword-agent", "keyword_count"),
                ("conversational", "personality"),
                ("custom", "purpose"),
                ("custom", "input_type"),
                ("custom", "output_requirements"),
            ]
        );
    }

    #[test]
    fn test_unknown_template_has_no_questions() {
        assert!(questions_for("nonexistent").is_empty());
    }

    #[test]
    fn test_questions_are_stable() {
        assert_eq!(questions_for("summarization"), questions_for("summarization"));
    }

    #[test]
    fn test_question_ids_unique_within_template() {
        for template in list_templates() {
            let set: HashSet<&str> = ids(template.id).into_iter().collect();
            assert_eq!(set.len(), questions_for(template.id).len());
        }
    }

    #[test]
    fn test_choices_only_on_single_choice() {
        for template in list_templates() {
            for q in questions_for(template.id) {
                match q.kind {
                    QuestionKind::SingleChoice(choices) => assert!(!choices.is_empty()),
                    other => assert!(other.choices().is_empty()),
                }
            }
        }
    }

    #[test]
    fn test_summarization_length_choices() {
        let length = &questions_for("summarization")[0];
        assert_eq!(length.kind.choices()[1], "Medium (1 paragraph)");
        assert!(!length.kind.is_typed());
        assert_eq!(questions_for("keyword-agent")[0].kind, QuestionKind::Number);
    }

    #[test]
    fn test_question_kind_serialization() {
        let json = serde_json::to_value(questions_for("keyword-agent")[2]).unwrap();
        assert_eq!(json["kind"]["type"], "single_choice");
        assert_eq!(json["kind"]["choices"][1], "JSON array");

        let json = serde_json::to_value(questions_for("custom")[0]).unwrap();
        assert_eq!(json["kind"]["type"], "free_text");
    }
}
