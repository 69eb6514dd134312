use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::ui::chat_view::{ChatView, Sender};
use crate::ui::components::UiComponent;
use crate::ui::markdown::render_markdown;
use crate::ui::style::dim_unless_focused;

const HELP_TEXT: &str =
    "Enter: send • ↑↓/PgUp/PgDn: scroll • Tab: suggestions • Ctrl+L: clear • Esc: quit";
const HISTORY_WRAP: Wrap = Wrap { trim: false };

pub fn render_chat(app: &mut App, area: Rect, buf: &mut Buffer) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Min(1),     // Chat history
            Constraint::Length(3),  // Input box
            Constraint::Length(3),  // Help
        ])
        .split(area);

    // Title
    let title = Paragraph::new("🤖 Talksy - Interactive Chat")
        .block(
            Block::bordered()
                .title(format!(" {} ", app.model_label))
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded)
        )
        .fg(Color::Green)
        .alignment(Alignment::Center);
    title.render(main_layout[0], buf);

    render_chat_history(&mut app.view, main_layout[1], buf);
    render_input(&app.view, main_layout[2], buf);

    UiComponent::help(HELP_TEXT).render(main_layout[3], buf);
}

pub fn render_chat_history(view: &mut ChatView, area: Rect, buf: &mut Buffer) {
    let lines = if view.show_welcome() && view.entries().is_empty() {
        welcome_lines(view)
    } else {
        history_lines(view)
    };

    let text = Text::from(lines);
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let max_scroll = wrapped_height(&text, inner_width).saturating_sub(inner_height);

    view.page_height = inner_height;
    // Clamp so scrolling back down never has to unwind past the top.
    view.scroll_from_bottom = view.scroll_from_bottom.min(max_scroll);
    let scroll = max_scroll - view.scroll_from_bottom;

    let title = if view.scroll_from_bottom == 0 {
        "Chat History".to_string()
    } else {
        format!("Chat History (↑{} lines)", view.scroll_from_bottom)
    };

    let chat_widget = Paragraph::new(text)
        .block(
            Block::bordered()
                .title(title)
                .border_type(BorderType::Rounded)
        )
        .wrap(HISTORY_WRAP)
        .scroll((scroll, 0));

    chat_widget.render(area, buf);
}

fn render_input(view: &ChatView, area: Rect, buf: &mut Buffer) {
    let enabled = view.input_enabled();
    let title = if enabled { "Type your message" } else { "Waiting for reply" };

    let input_widget = Paragraph::new(format!("> {}", view.input()))
        .block(
            Block::bordered()
                .title(title)
                .border_type(BorderType::Rounded)
        )
        .style(dim_unless_focused(enabled, Style::default().fg(Color::Yellow)));
    input_widget.render(area, buf);
}

fn sender_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Cyan),
        Sender::Bot => Style::default().fg(Color::Green),
    }
}

fn header_line(sender: Sender) -> Line<'static> {
    Line::from(Span::styled(
        format!("[{}] {}", sender.icon(), sender.label()),
        sender_style(sender).add_modifier(Modifier::BOLD),
    ))
}

fn history_lines(view: &ChatView) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let body = Style::default().fg(Color::White);

    for entry in view.entries() {
        lines.push(header_line(entry.sender));
        for line in render_markdown(&entry.markdown, body) {
            let mut spans = vec![Span::raw("    ")];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }

    if view.is_pending() {
        lines.push(header_line(Sender::Bot));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(view.indicator_text(), Style::default().fg(Color::DarkGray).italic()),
        ]));
    }

    lines
}

fn welcome_lines(view: &ChatView) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from("Welcome to Talksy!"),
        Line::from(""),
        Line::from("Ask anything. Answers come back as Markdown."),
    ];

    if !view.suggestions().is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from("Try one of these (Tab to pick):"));
        for (i, suggestion) in view.suggestions().iter().enumerate() {
            let style = if view.suggestion_index() == Some(i) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(Span::styled(format!("• {}", suggestion), style)));
        }
    }

    lines
}

/// Rows the text takes once word-wrapped to `width` columns, counted by the
/// same wrapper the history paragraph renders with.
pub fn wrapped_height(text: &Text, width: u16) -> u16 {
    let rows = Paragraph::new(text.clone())
        .wrap(HISTORY_WRAP)
        .line_count(width);
    rows.min(u16::MAX as usize) as u16
}
