//! PromptForge - template-driven prompt builder
//!
//! CLI entry point: launches the interactive wizard or runs one-shot commands.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use eyre::{Context, Result, bail};
use tracing::{debug, info};

use promptforge::catalog::{Question, QuestionKind, find_template, list_templates, questions_for};
use promptforge::cli::{Cli, Command, OutputFormat, generate_after_help};
use promptforge::clipboard::SystemClipboard;
use promptforge::config::Config;
use promptforge::controller::{Controller, CopyStatus, Timings};
use promptforge::session::{Action, Transition};
use promptforge::tui;

fn parse_level(s: &str) -> Option<tracing::Level> {
    match s.to_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" | "WARNING" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logs go to a file; the TUI owns the terminal
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptforge")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => parse_level(s).unwrap_or_else(|| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }),
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("promptforge.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Log level from config is needed before the full config load
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Templates { format }) => cmd_templates(format),
        Some(Command::Questions { template, format }) => cmd_questions(&template, format),
        Some(Command::Compose {
            template,
            use_case,
            answers,
            copy,
        }) => cmd_compose(&config, &template, &use_case, &answers, copy),
        None => {
            debug!("main: no command specified, launching TUI");
            cmd_tui(&config).await
        }
    }
}

/// List the template catalog
fn cmd_templates(format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_templates: called");
    let templates = list_templates();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(templates)?);
        }
        OutputFormat::Text => {
            for template in templates {
                println!(
                    "{:<16} {} {}",
                    template.id.cyan(),
                    template.title.bold(),
                    format!("({})", template.category).dimmed()
                );
                println!("{:<16} {}", "", template.description);
            }
        }
    }
    Ok(())
}

/// Describe a question's input kind for text output
fn describe_kind(question: &Question) -> String {
    match question.kind {
        QuestionKind::FreeText => "free text".to_string(),
        QuestionKind::ShortText => "short text".to_string(),
        QuestionKind::Number => "number".to_string(),
        QuestionKind::SingleChoice(choices) => format!("one of: {}", choices.join(" | ")),
    }
}

/// List a template's questions (nothing for an unknown template)
fn cmd_questions(template_id: &str, format: OutputFormat) -> Result<()> {
    debug!(%template_id, ?format, "cmd_questions: called");
    let questions = questions_for(template_id);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(questions)?);
        }
        OutputFormat::Text => {
            for question in questions {
                println!("{:<20} {}", question.id.yellow(), question.prompt);
                println!("{:<20} {}", "", describe_kind(question).dimmed());
            }
        }
    }
    Ok(())
}

/// Check a CLI answer against the template's questions
fn validate_answer(template_id: &str, key: &str, value: &str) -> Result<()> {
    let questions = questions_for(template_id);
    let Some(question) = questions.iter().find(|q| q.id == key) else {
        let known: Vec<&str> = questions.iter().map(|q| q.id).collect();
        bail!(
            "Unknown question '{}' for template '{}' (expected one of: {})",
            key,
            template_id,
            known.join(", ")
        );
    };

    match question.kind {
        QuestionKind::SingleChoice(choices) if !value.is_empty() && !choices.contains(&value) => {
            bail!(
                "Invalid answer '{}' for '{}' (expected one of: {})",
                value,
                key,
                choices.join(", ")
            );
        }
        QuestionKind::Number if !value.chars().all(|c| c.is_ascii_digit()) => {
            bail!("Answer for '{}' must be a number, got '{}'", key, value);
        }
        _ => Ok(()),
    }
}

/// Compose a prompt non-interactively and print it
fn cmd_compose(config: &Config, template_id: &str, use_case: &str, answers: &[(String, String)], copy: bool) -> Result<()> {
    debug!(%template_id, answer_count = answers.len(), copy, "cmd_compose: called");
    let Some(template) = find_template(template_id) else {
        let known: Vec<&str> = list_templates().iter().map(|t| t.id).collect();
        bail!("Unknown template '{}' (available: {})", template_id, known.join(", "));
    };
    if use_case.trim().is_empty() {
        bail!("Use case must not be empty");
    }
    for (key, value) in answers {
        validate_answer(template.id, key, value)?;
    }

    // Same path as the wizard, minus the delays
    let mut controller = Controller::new(config.composer()?, Timings::immediate());
    controller.dispatch(Action::SelectTemplate(*template));
    controller.dispatch(Action::EditUseCase(use_case.to_string()));
    for (key, value) in answers {
        controller.dispatch(Action::answer(key.clone(), value.clone()));
    }
    if let Transition::Ignored(reason) = controller.dispatch(Action::Generate) {
        bail!("Could not generate prompt: {}", reason);
    }

    let Some(prompt) = controller.session().generated() else {
        bail!("Generation did not complete");
    };
    println!("{}", prompt);

    if !controller.composer().has_skeleton(template.id) && !answers.is_empty() {
        eprintln!(
            "{} '{}' has no dedicated skeleton; answers were not used",
            "!".yellow(),
            template.id
        );
    }

    if copy {
        match controller.copy_to(&mut SystemClipboard::new()) {
            Some(CopyStatus::Copied) => eprintln!("{} Copied to clipboard", "✓".green()),
            Some(CopyStatus::Failed(reason)) => eprintln!("{} Copy failed: {}", "✗".red(), reason),
            None => {}
        }
    }
    Ok(())
}

/// Launch the interactive wizard
async fn cmd_tui(config: &Config) -> Result<()> {
    debug!("cmd_tui: called");
    let composer = config.composer()?;
    let controller = Controller::new(composer, config.timing.timings());

    info!("Launching TUI");
    tui::run(controller, config.timing.tick_rate()).await
}
