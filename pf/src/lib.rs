//! PromptForge - template-driven prompt builder
//!
//! PromptForge walks a user through building a prompt for an AI agent: pick a
//! template, describe the use case, answer a few template-specific questions
//! and get back a ready-to-paste system prompt.
//!
//! # Core Concepts
//!
//! - **Static catalog**: templates and their questions are compile-time tables
//! - **Pure composition**: the same template, use case and answers always give
//!   the same prompt
//! - **Central reducer**: every view change goes through `Session::dispatch`
//! - **Scoped timers**: delays and animations die with the screen that started them
//!
//! # Modules
//!
//! - [`catalog`] - Template catalog and per-template questions
//! - [`composer`] - Prompt skeletons and composition
//! - [`session`] - Wizard state and the view state machine
//! - [`controller`] - Timers, reveal animation and copy feedback
//! - [`clipboard`] - Clipboard collaborator
//! - [`tui`] - Terminal user interface
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod catalog;
pub mod cli;
pub mod clipboard;
pub mod composer;
pub mod config;
pub mod controller;
pub mod session;
pub mod tui;

// Re-export commonly used types
pub use catalog::{Accent, Question, QuestionKind, Template, find_template, list_templates, questions_for};
pub use clipboard::{ClipboardError, ClipboardSink, MemoryClipboard, SystemClipboard};
pub use composer::{Answers, ComposeError, PromptComposer, preview};
pub use config::{Config, TimingConfig};
pub use controller::{Controller, ControllerEvent, CopyStatus, Timings};
pub use session::{Action, GenerationTicket, IgnoreReason, Session, Step, Transition, View};
