// src/ui/markdown.rs
//! Just enough Markdown for chat replies: headings, lists, quotes, rules,
//! fenced code, `**bold**`, `*italic*` and `` `code` ``.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const CODE_STYLE: Style = Style::new().fg(Color::Yellow);

pub fn render_markdown(source: &str, base: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for raw in source.lines() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            lines.push(Line::from(vec![
                Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                Span::styled(raw.to_string(), CODE_STYLE),
            ]));
            continue;
        }

        lines.push(render_block_line(raw, trimmed, base));
    }

    lines
}

fn render_block_line(raw: &str, trimmed: &str, base: Style) -> Line<'static> {
    if let Some((level, text)) = heading(trimmed) {
        let mut style = base.fg(Color::Magenta).add_modifier(Modifier::BOLD);
        if level == 1 {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        return Line::from(inline_spans(text, style));
    }

    if is_rule(trimmed) {
        return Line::styled("─".repeat(24), Style::default().fg(Color::DarkGray));
    }

    let indent = " ".repeat(raw.len() - trimmed.len());

    if let Some(item) = ["- ", "* ", "+ "].iter().find_map(|m| trimmed.strip_prefix(m)) {
        let mut spans = vec![Span::raw(indent), Span::styled("• ", base.fg(Color::Cyan))];
        spans.extend(inline_spans(item, base));
        return Line::from(spans);
    }

    if let Some((number, item)) = numbered_item(trimmed) {
        let mut spans = vec![
            Span::raw(indent),
            Span::styled(format!("{}. ", number), base.fg(Color::Cyan)),
        ];
        spans.extend(inline_spans(item, base));
        return Line::from(spans);
    }

    if let Some(quote) = trimmed.strip_prefix('>') {
        let mut spans = vec![Span::styled("┃ ", Style::default().fg(Color::DarkGray))];
        spans.extend(inline_spans(quote.trim_start(), base.add_modifier(Modifier::ITALIC)));
        return Line::from(spans);
    }

    Line::from(inline_spans(raw, base))
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(|text| (level, text.trim()))
}

fn is_rule(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|marker| line.chars().all(|c| c == *marker))
}

fn numbered_item(line: &str) -> Option<(&str, &str)> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .map(|item| (&line[..digits], item))
}

/// Split a line into styled spans. Unclosed markers stay literal.
pub fn inline_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                flush(&mut spans, &mut plain, base);
                spans.push(Span::styled(
                    after[..end].to_string(),
                    base.add_modifier(Modifier::BOLD),
                ));
                rest = &after[end + 2..];
                continue;
            }
        } else if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                flush(&mut spans, &mut plain, base);
                spans.push(Span::styled(after[..end].to_string(), CODE_STYLE));
                rest = &after[end + 1..];
                continue;
            }
        } else if let Some(after) = rest.strip_prefix('*') {
            match after.find('*') {
                Some(end) if end > 0 && !after.starts_with(' ') => {
                    flush(&mut spans, &mut plain, base);
                    spans.push(Span::styled(
                        after[..end].to_string(),
                        base.add_modifier(Modifier::ITALIC),
                    ));
                    rest = &after[end + 1..];
                    continue;
                }
                _ => {}
            }
        }

        let Some(ch) = rest.chars().next() else { break };
        plain.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    flush(&mut spans, &mut plain, base);
    spans
}

fn flush(spans: &mut Vec<Span<'static>>, plain: &mut String, base: Style) {
    if !plain.is_empty() {
        spans.push(Span::styled(std::mem::take(plain), base));
    }
}
