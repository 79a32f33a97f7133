//! Source pane rendering with syntax highlighting
//!
//! Displays the (preprocessed) program text the tree was parsed from. The
//! span of the node selected in the tree pane is painted with a selection
//! background, character by character, and the line a runtime error points
//! at is painted red.
//!
//! Highlighting is a small character tokenizer, separate from the parser's
//! scanner, so half-typed or unparsable programs still render.

use crate::parser::ast::Span as SourceSpan;
use crate::types::TYPE_KEYWORDS;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Split a line into styled tokens
pub(crate) fn highlight_source_code(line: &str) -> Line<'static> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '/' && chars.get(i + 1) == Some(&'/') {
            let rest: String = chars[i..].iter().collect();
            spans.push(Span::styled(rest, Style::default().fg(DEFAULT_THEME.comment)));
            break;
        }

        if c == '"' || c == '\'' {
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += if chars[end] == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            let literal: String = chars[i..end].iter().collect();
            spans.push(Span::styled(literal, Style::default().fg(DEFAULT_THEME.string)));
            i = end;
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let number: String = chars[start..i].iter().collect();
            spans.push(Span::styled(number, Style::default().fg(DEFAULT_THEME.number)));
            continue;
        }

        if c.is_alphanumeric() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let is_call = chars[i..].iter().find(|ch| !ch.is_whitespace()) == Some(&'(');
            let style = get_keyword_style(&word, is_call);
            spans.push(Span::styled(word, style));
            continue;
        }

        let style = match c {
            '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
        i += 1;
    }

    Line::from(spans)
}

fn get_keyword_style(word: &str, is_function: bool) -> Style {
    if TYPE_KEYWORDS.contains(&word) {
        return Style::default().fg(DEFAULT_THEME.type_name);
    }
    match word {
        "return" | "if" | "else" | "while" | "for" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "true" | "false" => Style::default().fg(DEFAULT_THEME.number),
        _ if is_function => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Patch `style` onto the characters `from..to` of `line`, splitting tokens as needed
fn patch_range(line: Line<'static>, from: usize, to: usize, style: Style) -> Line<'static> {
    if from >= to {
        return line;
    }

    let mut out = Vec::with_capacity(line.spans.len() + 2);
    let mut offset = 0;
    for span in line.spans {
        let chars: Vec<char> = span.content.chars().collect();
        let (start, end) = (offset, offset + chars.len());
        offset = end;

        if end <= from || start >= to {
            out.push(span);
            continue;
        }

        let cut_a = from.saturating_sub(start).min(chars.len());
        let cut_b = to.saturating_sub(start).min(chars.len());
        let pieces = [
            (&chars[..cut_a], span.style),
            (&chars[cut_a..cut_b], span.style.patch(style)),
            (&chars[cut_b..], span.style),
        ];
        for (text, piece_style) in pieces {
            if !text.is_empty() {
                out.push(Span::styled(text.iter().collect::<String>(), piece_style));
            }
        }
    }
    Line::from(out)
}

/// Render the source pane.
///
/// `reveal_line` (1-based) is scrolled into view once and then cleared.
#[allow(clippy::too_many_arguments)]
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    selection: Option<SourceSpan>,
    error_line: Option<usize>,
    is_focused: bool,
    scroll: &mut usize,
    reveal_line: &mut Option<usize>,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.split('\n').collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if let Some(line) = reveal_line.take() {
        let idx = line.saturating_sub(1);
        if idx < *scroll || idx >= *scroll + visible_height {
            *scroll = idx.saturating_sub(visible_height / 3);
        }
    }
    *scroll = (*scroll).min(total_lines.saturating_sub(visible_height));

    let selection_style = Style::default().bg(DEFAULT_THEME.selection_bg);

    let mut line_offset = 0;
    let mut visible_lines = Vec::with_capacity(visible_height);
    for (idx, text) in lines.iter().enumerate() {
        let len = text.chars().count();
        let start = line_offset;
        line_offset += len + 1;

        if idx < *scroll {
            continue;
        }
        if visible_lines.len() >= visible_height {
            break;
        }

        let line_num = idx + 1;
        let is_error = error_line == Some(line_num);
        let mut content = highlight_source_code(text);

        let mut num_style = Style::default().fg(DEFAULT_THEME.comment);
        if let Some(span) = selection {
            let from = span.start.offset.max(start).saturating_sub(start);
            let to = span.end.offset.min(start + len).saturating_sub(start);
            if from < to {
                content = patch_range(content, from, to, selection_style);
                num_style = Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD);
            }
        }

        if is_error {
            num_style = Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD);
            for span in &mut content.spans {
                span.style = Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
            }
        }

        let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
        spans.extend(content.spans);
        visible_lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_tokens() {
        let line = highlight_source_code("int x = add(1, 'a');");
        let tokens = text(&line);
        assert_eq!(tokens[0], "int");
        assert!(tokens.contains(&"'a'".to_string()));
        let add = line.spans.iter().find(|s| s.content == "add").unwrap();
        assert_eq!(add.style.fg, Some(DEFAULT_THEME.function));
        let int = &line.spans[0];
        assert_eq!(int.style.fg, Some(DEFAULT_THEME.type_name));
    }

    #[test]
    fn test_patch_range_splits_tokens() {
        let line = highlight_source_code("value;");
        let style = Style::default().bg(DEFAULT_THEME.selection_bg);
        let patched = patch_range(line, 2, 4, style);
        assert_eq!(text(&patched), vec!["va", "lu", "e", ";"]);
        assert_eq!(patched.spans[1].style.bg, Some(DEFAULT_THEME.selection_bg));
        assert_eq!(patched.spans[0].style.bg, None);
    }
}
