//! TUI views and rendering
//!
//! All rendering logic is contained here. Views draw from the AppState and
//! the controller but never modify either.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::trace;

use super::state::{AppState, Focus, InteractionMode};
use crate::catalog::{Accent, Question, QuestionKind, Template, list_templates, questions_for};
use crate::composer::preview;
use crate::controller::{Controller, CopyStatus};
use crate::session::{Session, Step, View};

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const DIM: Color = Color::DarkGray;
    pub const DONE: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const WORKING: Color = Color::Rgb(255, 215, 0); // Gold
    pub const FAILED: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const FOCUS: Color = Color::Rgb(100, 149, 237); // Cornflower blue
}

/// Card color for a template accent
fn accent_color(accent: Accent) -> Color {
    match accent {
        Accent::Emerald => Color::Rgb(16, 185, 129),
        Accent::Blue => Color::Rgb(59, 130, 246),
        Accent::Pink => Color::Rgb(236, 72, 153),
        Accent::Purple => Color::Rgb(168, 85, 247),
        Accent::Yellow => Color::Rgb(234, 179, 8),
        Accent::Cyan => Color::Rgb(6, 182, 212),
    }
}

/// Main render function
pub fn render(state: &AppState, controller: &Controller, frame: &mut Frame) {
    let session = controller.session();
    trace!(view = ?session.view(), "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(session, frame, chunks[0]);

    match session.view() {
        View::Landing => render_landing(state, controller, frame, chunks[1]),
        View::Builder { generating } => {
            render_builder(state, controller, frame, chunks[1]);
            if generating {
                render_generating(state, frame, chunks[1]);
            }
        }
        View::Result => render_result(state, controller, frame, chunks[1]),
    }

    render_footer(state, controller, frame, chunks[2]);

    if state.interaction_mode == InteractionMode::Help {
        render_help_overlay(frame, frame.area());
    }
}

/// Render header with the step indicator
fn render_header(session: &Session, frame: &mut Frame, area: Rect) {
    let current = session.step();
    let mut spans = vec![
        Span::styled(
            " PromptForge",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
    ];

    for step in Step::ALL {
        let style = if step == current {
            Style::default().fg(Color::Black).bg(colors::HEADER).add_modifier(Modifier::BOLD)
        } else if step.number() < current.number() {
            Style::default().fg(colors::DONE)
        } else {
            Style::default().fg(colors::DIM)
        };
        let marker = if step.number() < current.number() {
            "✓".to_string()
        } else {
            step.number().to_string()
        };
        spans.push(Span::styled(format!(" {} {} ", marker, step.title()), style));
        spans.push(Span::raw(" "));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Render the template grid and details of the highlighted card
fn render_landing(state: &AppState, controller: &Controller, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let templates = list_templates();
    let mut lines = vec![
        Line::from(Span::styled(
            "Choose your agent template",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (i, template) in templates.iter().enumerate() {
        let selected = i == state.landing.selected_index;
        let base = if selected {
            Style::default().bg(colors::SELECTED_BG)
        } else {
            Style::default()
        };
        let accent = accent_color(template.accent);
        lines.push(Line::from(vec![
            Span::styled(if selected { "▌" } else { " " }, base.fg(accent)),
            Span::styled(format!("{} ", i + 1), base.fg(colors::DIM)),
            Span::styled(template.title, base.fg(accent).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", template.category), base.fg(colors::DIM)),
        ]));
        lines.push(Line::from(vec![
            Span::styled(if selected { "▌" } else { " " }, base.fg(accent)),
            Span::styled(format!("  {}", template.description), base),
        ]));
        lines.push(Line::from(""));
    }

    let list = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Templates "))
        .wrap(Wrap { trim: false });
    frame.render_widget(list, chunks[0]);

    if let Some(template) = templates.get(state.landing.selected_index) {
        render_template_details(template, controller, frame, chunks[1]);
    }
}

fn render_template_details(template: &Template, controller: &Controller, frame: &mut Frame, area: Rect) {
    let accent = accent_color(template.accent);
    let mut lines = vec![
        Line::from(Span::styled(
            template.title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(template.category, Style::default().fg(colors::DIM))),
        Line::from(""),
        Line::from(template.description),
        Line::from(""),
        Line::from(Span::styled("You will be asked:", Style::default().add_modifier(Modifier::BOLD))),
    ];
    for question in questions_for(template.id) {
        lines.push(Line::from(format!("  • {}", question.prompt)));
    }
    if !controller.composer().has_skeleton(template.id) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Answers refine your notes only; the prompt uses the generic skeleton.",
            Style::default().fg(colors::DIM),
        )));
    }

    let details = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Details "))
        .wrap(Wrap { trim: true });
    frame.render_widget(details, area);
}

/// Render the builder form and preview
fn render_builder(state: &AppState, controller: &Controller, frame: &mut Frame, area: Rect) {
    let session = controller.session();
    let Some(template) = session.selected_template() else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let questions = session.questions();
    let focus = state.focus.clamp(questions.len());
    let editing = !session.is_generating();

    let mut lines = Vec::new();
    lines.push(field_label("Describe your use case", focus == Focus::UseCase));
    // The use case stays editable while generating
    lines.extend(text_value(session.use_case(), focus == Focus::UseCase, "e.g. extract user info"));
    lines.push(Line::from(""));

    for (i, question) in questions.iter().enumerate() {
        let focused = focus == Focus::Question(i);
        lines.push(field_label(question.prompt, focused));
        lines.extend(question_value(question, session.answer(question.id), focused && editing));
        lines.push(Line::from(""));
    }

    let generate_style = if !session.can_generate() {
        Style::default().fg(colors::DIM)
    } else if focus == Focus::Generate {
        Style::default()
            .fg(Color::Black)
            .bg(accent_color(template.accent))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(accent_color(template.accent)).add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(" [ Generate Prompt ] ", generate_style)));

    let form = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", template.title))
                .border_style(Style::default().fg(accent_color(template.accent))),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(form, chunks[0]);

    let step = session.step();
    let mut side = vec![
        Line::from(Span::styled(
            format!("Step {}: {}", step.number(), step.title()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(step.description(), Style::default().fg(colors::DIM))),
        Line::from(""),
    ];
    match preview(template, session.use_case()) {
        Some(text) => side.extend(Text::from(text).lines),
        None => side.push(Line::from(Span::styled(
            "Start typing your use case to see a preview.",
            Style::default().fg(colors::DIM),
        ))),
    }
    if !controller.composer().has_skeleton(template.id) {
        side.push(Line::from(""));
        side.push(Line::from(Span::styled(
            "This template has no dedicated skeleton yet; a generic prompt is produced.",
            Style::default().fg(colors::WORKING),
        )));
    }

    let preview_panel = Paragraph::new(side)
        .block(Block::default().borders(Borders::ALL).title(" Preview "))
        .wrap(Wrap { trim: true });
    frame.render_widget(preview_panel, chunks[1]);
}

fn field_label(label: &str, focused: bool) -> Line<'_> {
    let style = if focused {
        Style::default().fg(colors::FOCUS).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Line::from(vec![Span::styled(if focused { "› " } else { "  " }, style), Span::styled(label, style)])
}

fn text_value<'a>(value: &'a str, with_cursor: bool, placeholder: &'a str) -> Vec<Line<'a>> {
    if value.is_empty() && !with_cursor {
        return vec![Line::from(vec![
            Span::raw("    "),
            Span::styled(placeholder, Style::default().fg(colors::DIM)),
        ])];
    }

    // split('\n') keeps a trailing empty line so the cursor follows a fresh newline
    let mut lines: Vec<Line<'a>> = value
        .split('\n')
        .map(|line| Line::from(vec![Span::raw("    "), Span::raw(line)]))
        .collect();
    if with_cursor {
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
        }
    }
    lines
}

fn question_value<'a>(question: &'a Question, answer: Option<&'a str>, focused: bool) -> Vec<Line<'a>> {
    match question.kind {
        QuestionKind::SingleChoice(choices) => {
            let mut spans = vec![Span::raw("    ")];
            for (i, choice) in choices.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" · ", Style::default().fg(colors::DIM)));
                }
                let style = if answer == Some(*choice) {
                    Style::default().fg(Color::Black).bg(colors::FOCUS)
                } else {
                    Style::default().fg(colors::DIM)
                };
                spans.push(Span::styled(*choice, style));
            }
            if focused {
                spans.push(Span::styled("  ←/→", Style::default().fg(colors::KEYBIND)));
            }
            vec![Line::from(spans)]
        }
        QuestionKind::Number => text_value(answer.unwrap_or(""), focused, "a number"),
        QuestionKind::FreeText | QuestionKind::ShortText => text_value(answer.unwrap_or(""), focused, "optional"),
    }
}

/// Render the generating indicator over the builder
fn render_generating(state: &AppState, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(40, 25, area);
    frame.render_widget(Clear, popup_area);

    let dots = ".".repeat((state.tick_count / 10 % 4) as usize);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{}{}", state.working_word, dots),
            Style::default().fg(colors::WORKING).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Esc to cancel", Style::default().fg(colors::DIM))),
    ];

    let popup = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Generating ")
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(popup, popup_area);
}

/// Render the generated prompt
fn render_result(state: &AppState, controller: &Controller, frame: &mut Frame, area: Rect) {
    let session = controller.session();
    let text = controller.displayed_text().unwrap_or("");
    let title = match session.selected_template() {
        Some(template) => format!(" Your {} prompt ", template.title),
        None => " Your prompt ".to_string(),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let mut lines: Vec<Line> = text.lines().map(Line::from).collect();
    if controller.is_revealing() {
        lines.push(Line::from(Span::styled("▍", Style::default().fg(colors::WORKING))));
    }
    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((state.result_scroll, 0));
    frame.render_widget(body, chunks[0]);

    let status = match controller.copy_status() {
        Some(CopyStatus::Copied) => Line::from(Span::styled(" ✓ Copied to clipboard", Style::default().fg(colors::DONE))),
        Some(CopyStatus::Failed(reason)) => Line::from(Span::styled(
            format!(" ✗ Copy failed: {} (press c to retry)", reason),
            Style::default().fg(colors::FAILED),
        )),
        None if controller.is_revealing() => Line::from(Span::styled(
            " Revealing... press space to show all",
            Style::default().fg(colors::DIM),
        )),
        None => Line::from(Span::styled(
            format!(" {} characters", session.generated().map(|t| t.chars().count()).unwrap_or(0)),
            Style::default().fg(colors::DIM),
        )),
    };
    frame.render_widget(Paragraph::new(status), chunks[1]);
}

/// Render footer with context-sensitive keybinds
fn render_footer(state: &AppState, controller: &Controller, frame: &mut Frame, area: Rect) {
    let content = if let Some(notice) = &state.notice {
        Line::from(Span::styled(format!(" {}", notice), Style::default().fg(colors::WORKING)))
    } else {
        let keybinds = match controller.session().view() {
            View::Landing => vec![("[↑↓]", "Move"), ("[Enter]", "Select"), ("[1-6]", "Pick")],
            View::Builder { generating: false } => vec![
                ("[Tab]", "Next field"),
                ("[←→]", "Choose"),
                ("[Ctrl+G]", "Generate"),
                ("[Esc]", "Back"),
            ],
            View::Builder { generating: true } => vec![("[Esc]", "Cancel")],
            View::Result => vec![
                ("[c]", "Copy"),
                ("[r]", "Refine"),
                ("[n]", "Start over"),
                ("[Space]", "Skip"),
            ],
        };

        let mut spans = vec![Span::raw(" ")];
        for (key, action) in keybinds {
            spans.push(Span::styled(
                key,
                Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(" {} ", action)));
        }
        spans.push(Span::styled("[F1]", Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(" Help "));
        spans.push(Span::styled("[Ctrl+C]", Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(" Quit "));
        Line::from(spans)
    };

    let footer = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
    };
    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )),
        Line::from(""),
        section("Global"),
        key_line("F1 / ?", "Toggle help"),
        key_line("q", "Quit (when not typing)"),
        key_line("Ctrl+C", "Quit"),
        Line::from(""),
        section("Templates"),
        key_line("j/k ↑/↓", "Move"),
        key_line("Enter", "Select template"),
        key_line("1-6", "Select by number"),
        Line::from(""),
        section("Builder"),
        key_line("Tab/S-Tab", "Next / previous field"),
        key_line("←/→", "Cycle choices"),
        key_line("S-Enter/A-Enter", "New line in use case"),
        key_line("Ctrl+G", "Generate prompt"),
        key_line("Esc", "Back to templates (cancels generation)"),
        Line::from(""),
        section("Result"),
        key_line("c / y", "Copy prompt"),
        key_line("Space", "Skip the reveal animation"),
        key_line("r / Esc", "Refine answers"),
        key_line("n / s", "Start over"),
        key_line("j/k", "Scroll"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (? to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Helper to create a key binding line
fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_template;
    use crate::clipboard::MemoryClipboard;
    use crate::composer::PromptComposer;
    use crate::controller::Timings;
    use crate::session::Action;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn controller() -> Controller {
        Controller::new(PromptComposer::embedded_only().unwrap(), Timings::immediate())
    }

    fn draw(state: &AppState, controller: &Controller) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 50)).unwrap();
        terminal.draw(|frame| render(state, controller, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_landing_lists_templates() {
        let screen = draw(&AppState::new(), &controller());
        for template in list_templates() {
            assert!(screen.contains(template.title), "missing {}", template.title);
        }
        assert!(screen.contains("Choose Template"));
    }

    #[test]
    fn test_builder_shows_questions_and_preview() {
        let mut c = controller();
        c.dispatch(Action::SelectTemplate(*find_template("summarization").unwrap()));
        c.dispatch(Action::EditUseCase("meeting notes".into()));

        let screen = draw(&AppState::new(), &c);
        assert!(screen.contains("Preferred summary length?"));
        assert!(screen.contains("Building smart summarizer for: \"meeting notes...\""));
        assert!(screen.contains("Generate Prompt"));
    }

    #[test]
    fn test_builder_renders_multiline_use_case() {
        let mut c = controller();
        c.dispatch(Action::SelectTemplate(*find_template("custom").unwrap()));
        c.dispatch(Action::EditUseCase("first line\nsecond line".into()));

        let screen = draw(&AppState::new(), &c);
        let first = screen.lines().position(|l| l.contains("first line")).unwrap();
        assert!(screen.lines().nth(first + 1).unwrap().contains("second line"));
    }

    #[test]
    fn test_builder_flags_missing_skeleton() {
        let mut c = controller();
        c.dispatch(Action::SelectTemplate(*find_template("analytical").unwrap()));

        let screen = draw(&AppState::new(), &c);
        assert!(screen.contains("no dedicated skeleton"));
    }

    #[tokio::test]
    async fn test_result_shows_prompt_and_copy_status() {
        let timings = Timings {
            copy_feedback: std::time::Duration::from_secs(60),
            ..Timings::immediate()
        };
        let mut c = Controller::new(PromptComposer::embedded_only().unwrap(), timings);
        c.dispatch(Action::SelectTemplate(*find_template("json-agent").unwrap()));
        c.dispatch(Action::EditUseCase("extract user info".into()));
        c.dispatch(Action::Generate);
        c.copy_to(&mut MemoryClipboard::new());

        let screen = draw(&AppState::new(), &c);
        assert!(screen.contains("USER REQUEST: extract user info"));
        assert!(screen.contains("Copied to clipboard"));
        assert!(screen.contains("Deploy"));
    }

    #[test]
    fn test_help_overlay() {
        let mut state = AppState::new();
        state.toggle_help();
        let screen = draw(&state, &controller());
        assert!(screen.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_notice_replaces_keybinds() {
        let mut state = AppState::new();
        state.set_notice("describe your use case first");
        let screen = draw(&state, &controller());
        assert!(screen.contains("describe your use case first"));
    }
}
