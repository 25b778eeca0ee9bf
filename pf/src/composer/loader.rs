//! Prompt Composer
//!
//! Registers the skeletons with Handlebars and renders them against a
//! template, a use case and the collected answers.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use handlebars::Handlebars;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::embedded::{self, GENERIC_NAME};
use super::skeletons::{resolve_slot, skeleton_for};
use super::{Answers, generic_prompt};
use crate::catalog::{Template, find_template};

/// Number of use-case characters shown in the builder preview
const PREVIEW_CHARS: usize = 100;

/// Errors from building a composer
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Invalid embedded skeleton {name}: {source}")]
    EmbeddedSkeleton {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
}

/// Loads skeletons and renders prompts
///
/// Rendering never fails: a broken override falls back to the embedded
/// skeleton, and anything that cannot be rendered falls back to the generic
/// prompt.
pub struct PromptComposer {
    /// Handlebars registry holding embedded and override skeletons
    hbs: Handlebars<'static>,
    /// Template ids that have a user override registered
    overrides: HashSet<String>,
}

impl std::fmt::Debug for PromptComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptComposer")
            .field("overrides", &self.overrides)
            .finish()
    }
}

fn override_name(template_id: &str) -> String {
    format!("override:{}", template_id)
}

impl PromptComposer {
    /// Create a composer that only uses embedded skeletons
    pub fn embedded_only() -> Result<Self, ComposeError> {
        debug!("PromptComposer::embedded_only: called");
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);

        for (name, source) in embedded::all() {
            hbs.register_template_string(name, source.trim_end_matches('\n'))
                .map_err(|e| ComposeError::EmbeddedSkeleton {
                    name: name.to_string(),
                    source: Box::new(e),
                })?;
        }

        Ok(Self {
            hbs,
            overrides: HashSet::new(),
        })
    }

    /// Create a composer that also loads `{template_id}.pmt` overrides from `dir`
    ///
    /// Files whose stem is not a catalog template id are ignored, as are files
    /// that fail to read or parse. A missing directory means no overrides.
    pub fn with_overrides(dir: impl AsRef<Path>) -> Result<Self, ComposeError> {
        let dir = dir.as_ref();
        debug!(?dir, "PromptComposer::with_overrides: called");
        let mut composer = Self::embedded_only()?;

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(?dir, error = %e, "PromptComposer::with_overrides: no override directory");
                return Ok(composer);
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("pmt") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if find_template(stem).is_none() {
                debug!(?path, "PromptComposer::with_overrides: not a template id, skipping");
                continue;
            }

            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    warn!("Failed to read skeleton override {}: {}", path.display(), e);
                    continue;
                }
            };

            match composer
                .hbs
                .register_template_string(&override_name(stem), source.trim_end_matches('\n'))
            {
                Ok(()) => {
                    info!("Loaded skeleton override for '{}' from {}", stem, path.display());
                    composer.overrides.insert(stem.to_string());
                }
                Err(e) => warn!("Ignoring invalid skeleton override {}: {}", path.display(), e),
            }
        }

        Ok(composer)
    }

    /// Whether answers for this template are used by a skeleton
    pub fn has_skeleton(&self, template_id: &str) -> bool {
        debug!(%template_id, "PromptComposer::has_skeleton: called");
        skeleton_for(template_id).is_some() || self.overrides.contains(template_id)
    }

    /// Build the final prompt text
    ///
    /// Pure and deterministic for a given composer. Unknown template ids and
    /// missing answers resolve to defaults.
    pub fn compose(&self, template: &Template, use_case: &str, answers: &Answers) -> String {
        debug!(
            template_id = template.id,
            use_case_len = use_case.len(),
            answer_count = answers.len(),
            "PromptComposer::compose: called"
        );
        let context = build_context(template.id, use_case, answers);

        if self.overrides.contains(template.id) {
            match self.hbs.render(&override_name(template.id), &context) {
                Ok(text) => return text,
                Err(e) => warn!("Skeleton override for '{}' failed to render: {}", template.id, e),
            }
        }

        if skeleton_for(template.id).is_some() {
            match self.hbs.render(template.id, &context) {
                Ok(text) => return text,
                Err(e) => warn!("Skeleton '{}' failed to render: {}", template.id, e),
            }
        } else if !answers.is_empty() {
            warn!(
                "No skeleton for '{}'; {} answer(s) not used in the prompt",
                template.id,
                answers.len()
            );
        }

        self.hbs.render(GENERIC_NAME, &context).unwrap_or_else(|e| {
            warn!("Generic skeleton failed to render: {}", e);
            generic_prompt(use_case)
        })
    }
}

/// Variables visible to a skeleton
///
/// Raw answers are exposed by question id, then slot values are laid over
/// them, so a slot and an answer sharing a name resolve to the slot.
fn build_context<'a>(template_id: &str, use_case: &'a str, answers: &'a Answers) -> BTreeMap<&'a str, &'a str> {
    let mut context: BTreeMap<&str, &str> = answers.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

    if let Some(skeleton) = skeleton_for(template_id) {
        for slot in skeleton.slots {
            context.insert(slot.name, resolve_slot(slot, answers));
        }
    }

    context.insert("use_case", use_case);
    context
}

/// One-line preview of what is being built
///
/// Returns `None` until the user has typed a use case.
pub fn preview(template: &Template, use_case: &str) -> Option<String> {
    if use_case.is_empty() {
        return None;
    }
    let head: String = use_case.chars().take(PREVIEW_CHARS).collect();
    Some(format!(
        "Building {} for: \"{}...\"",
        template.title.to_lowercase(),
        head
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Accent, find_template};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn composer() -> PromptComposer {
        PromptComposer::embedded_only().unwrap()
    }

    fn template(id: &str) -> Template {
        *find_template(id).unwrap()
    }

    fn answers(pairs: &[(&str, &str)]) -> Answers {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn unknown_template() -> Template {
        Template {
            id: "nonexistent",
            title: "Mystery",
            description: "",
            category: "",
            accent: Accent::Cyan,
        }
    }

    #[test]
    fn test_json_agent_defaults() {
        let text = composer().compose(&template("json-agent"), "extract user info", &Answers::new());
        assert!(text.contains("id, content, metadata"));
        assert!(text.contains("standard validation rules"));
        assert!(text.contains("extract user info"));
        assert!(text.contains(r#"{"id": "string", "content": "string", "metadata": {}}"#));
    }

    #[test]
    fn test_json_agent_full_text() {
        let text = composer().compose(&template("json-agent"), "parse invoices", &answers(&[("required_fields", "total")]));
        let expected = "You are a specialized JSON generation agent. Your task is to process the given input and return a valid JSON response that follows the specified schema.\n\
\n\
CRITICAL INSTRUCTIONS:\n\
- Always return valid JSON format\n\
- Include all required fields: total\n\
- Never include explanatory text outside the JSON\n\
- Validate data according to: standard validation rules\n\
\n\
JSON SCHEMA:\n\
{\"id\": \"string\", \"content\": \"string\", \"metadata\": {}}\n\
\n\
USER REQUEST: parse invoices\n\
\n\
Remember: Return ONLY valid JSON, no additional text or explanations.";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_summarization_uses_answers() {
        let text = composer().compose(
            &template("summarization"),
            "summarize meeting notes",
            &answers(&[("length", "Brief (1-2 sentences)"), ("tone", "Casual")]),
        );
        assert!(text.contains("Brief (1-2 sentences)"));
        assert!(text.contains("Casual"));
        assert!(!text.contains("Medium (1 paragraph)"));
        assert!(text.starts_with("You are an expert summarization agent designed to create Brief (1-2 sentences) summaries with a Casual tone."));
        assert!(text.contains("- Focus areas: Main themes and key insights"));
        assert!(text.contains("TASK: summarize meeting notes"));
    }

    #[test]
    fn test_summarization_defaults_differ_between_heading_and_body() {
        let text = composer().compose(&template("summarization"), "x", &Answers::new());
        assert!(text.contains("create medium-length summaries with a professional tone"));
        assert!(text.contains("- Length: Medium (1 paragraph)"));
        assert!(text.contains("- Tone: Professional"));
    }

    #[test]
    fn test_keyword_agent_defaults() {
        let text = composer().compose(&template("keyword-agent"), "blog post", &Answers::new());
        assert!(text.contains("Extract exactly 5-10 relevant general topic keywords."));
        assert!(text.contains("- Number of keywords: 5-10"));
        assert!(text.contains("- Keyword type: General topics"));
        assert!(text.contains("- Format: Comma-separated"));
        assert!(text.contains("INPUT: blog post"));
    }

    #[test]
    fn test_keyword_agent_answers() {
        let text = composer().compose(
            &template("keyword-agent"),
            "release notes",
            &answers(&[("keyword_count", "3"), ("keyword_type", "Technical terms"), ("format", "JSON array")]),
        );
        assert!(text.contains("Extract exactly 3 relevant Technical terms keywords."));
        assert!(text.contains("- Format: JSON array"));
        assert!(!text.contains("5-10"));
    }

    #[test]
    fn test_empty_answer_falls_back_to_default() {
        let text = composer().compose(&template("json-agent"), "x", &answers(&[("required_fields", "")]));
        assert!(text.contains("Include all required fields: id, content, metadata"));
    }

    #[test]
    fn test_unknown_template_uses_generic() {
        let text = composer().compose(&unknown_template(), "plan a trip", &Answers::new());
        assert_eq!(text, generic_prompt("plan a trip"));
        assert!(text.contains("plan a trip"));
    }

    #[test]
    fn test_templates_without_skeleton_use_generic() {
        let c = composer();
        for id in ["conversational", "analytical", "custom"] {
            let text = c.compose(&template(id), "help me", &answers(&[("personality", "witty")]));
            assert_eq!(text, generic_prompt("help me"));
            assert!(!text.contains("witty"));
            assert!(!c.has_skeleton(id));
        }
        assert!(c.has_skeleton("json-agent"));
    }

    #[test]
    fn test_use_case_not_escaped() {
        let text = composer().compose(&template("json-agent"), "<b>&\"quotes\"</b> {{braces}}", &Answers::new());
        assert!(text.contains("USER REQUEST: <b>&\"quotes\"</b> {{braces}}"));
    }

    #[test]
    fn test_override_replaces_embedded_skeleton() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("summarization.pmt"), "Summarize {{use_case}} in a {{tone}} voice.\n").unwrap();
        let c = PromptComposer::with_overrides(dir.path()).unwrap();

        let text = c.compose(&template("summarization"), "the memo", &Answers::new());
        assert_eq!(text, "Summarize the memo in a Professional voice.");
    }

    #[test]
    fn test_override_fills_missing_skeleton_with_raw_answers() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("conversational.pmt"), "Be {{personality}}. {{use_case}}").unwrap();
        let c = PromptComposer::with_overrides(dir.path()).unwrap();
        assert!(c.has_skeleton("conversational"));

        let text = c.compose(&template("conversational"), "Chat.", &answers(&[("personality", "witty")]));
        assert_eq!(text, "Be witty. Chat.");
    }

    #[test]
    fn test_invalid_override_is_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("json-agent.pmt"), "broken {{#if ready}} never closed").unwrap();
        std::fs::write(dir.path().join("not-a-template.pmt"), "ignored").unwrap();
        let c = PromptComposer::with_overrides(dir.path()).unwrap();

        let text = c.compose(&template("json-agent"), "x", &Answers::new());
        assert!(text.contains("specialized JSON generation agent"));
    }

    #[test]
    fn test_missing_override_dir() {
        let dir = TempDir::new().unwrap();
        let c = PromptComposer::with_overrides(dir.path().join("does-not-exist")).unwrap();
        assert!(!c.has_skeleton("custom"));
    }

    #[test]
    fn test_preview() {
        let t = template("keyword-agent");
        assert_eq!(preview(&t, ""), None);
        assert_eq!(
            preview(&t, "tag my notes").as_deref(),
            Some("Building keyword extractor for: \"tag my notes...\"")
        );

        let long = "a".repeat(150);
        let p = preview(&t, &long).unwrap();
        assert!(p.contains(&format!("\"{}...\"", "a".repeat(100))));
    }

    proptest! {
        #[test]
        fn prop_compose_is_deterministic(
            idx in 0usize..6,
            use_case in ".{0,80}",
            value in "[a-zA-Z0-9 ,]{0,20}",
        ) {
            let c = composer();
            let t = crate::catalog::list_templates()[idx];
            let mut a = Answers::new();
            for q in crate::catalog::questions_for(t.id) {
                a.insert(q.id.to_string(), value.clone());
            }
            let first = c.compose(&t, &use_case, &a);
            let second = c.compose(&t, &use_case, &a);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.contains(use_case.as_str()));
        }
    }
}
