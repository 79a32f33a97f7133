//! Scopes pane: every live scope with its bindings in declaration order
//!
//! After a failed run the pane shows the stack as it stood at the failure.
//! Bindings inherited from an outer scope are shown dimmed, since they are
//! copies made when the scope was created.

use crate::memory::environment::Scope;
use crate::memory::value::Value;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn scope_lines(scope: &Scope) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{} ", scope.name),
            Style::default()
                .fg(DEFAULT_THEME.function)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("(depth {})", scope.depth),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ])];

    if scope.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (no bindings)",
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    }

    for (name, binding) in scope.iter() {
        let inherited = binding.depth < scope.depth;
        let value_style = match binding.value {
            Value::Absent => Style::default().fg(DEFAULT_THEME.comment),
            Value::Char(_) => Style::default().fg(DEFAULT_THEME.string),
            _ => Style::default().fg(DEFAULT_THEME.number),
        };
        let mut spans = vec![
            Span::raw("  "),
            Span::styled(
                format!("{} ", binding.type_tag),
                Style::default().fg(DEFAULT_THEME.type_name),
            ),
            Span::styled(name.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
            Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(binding.value.to_string(), value_style),
        ];
        if inherited {
            for span in &mut spans {
                span.style = span.style.add_modifier(Modifier::DIM);
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Render the scopes pane; `result` is what `main` (or a top-level return) produced
pub fn render_scopes_pane(
    frame: &mut Frame,
    area: Rect,
    scopes: &[Scope],
    result: Option<&Value>,
    is_focused: bool,
    scroll: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Scopes ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut lines: Vec<Line> = scopes.iter().rev().flat_map(scope_lines).collect();
    if let Some(value) = result {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("result ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                value.to_string(),
                Style::default()
                    .fg(DEFAULT_THEME.return_value)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll = (*scroll).min(lines.len().saturating_sub(visible_height));

    let visible: Vec<Line> = lines.into_iter().skip(*scroll).take(visible_height).collect();
    frame.render_widget(Paragraph::new(visible).block(block), area);
}
