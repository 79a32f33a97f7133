//! Syntax tree pane: the flattened module, one row per node

use crate::parser::ast::TreeRow;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Style the role prefix ("Statement0:") apart from the node label
fn row_line(row: &TreeRow, is_selected: bool) -> Line<'static> {
    let indent = "  ".repeat(row.depth);
    let (role, label) = match row.label.split_once(": ") {
        Some((role, label)) => (format!("{}: ", role), label.to_string()),
        None => (String::new(), row.label.clone()),
    };

    let mut label_style = Style::default().fg(DEFAULT_THEME.fg);
    if label.starts_with("Function") {
        label_style = label_style.fg(DEFAULT_THEME.function);
    } else if label.starts_with("Literal") {
        label_style = label_style.fg(DEFAULT_THEME.number);
    }

    let mut spans = vec![
        Span::raw(indent),
        Span::styled(role, Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(label, label_style),
        Span::styled(
            format!("  {}", row.span),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ];

    if is_selected {
        for span in &mut spans {
            span.style = span
                .style
                .bg(DEFAULT_THEME.selection_bg)
                .add_modifier(Modifier::BOLD);
        }
    }
    Line::from(spans)
}

/// Render the tree pane, keeping `selected` inside the visible window
pub fn render_ast_pane(
    frame: &mut Frame,
    area: Rect,
    rows: &[TreeRow],
    selected: usize,
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
        .title(format!(" Syntax Tree ({} nodes) ", rows.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if selected < *scroll {
        *scroll = selected;
    } else if selected >= *scroll + visible_height {
        *scroll = selected + 1 - visible_height;
    }

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(*scroll)
        .take(visible_height)
        .map(|(idx, row)| row_line(row, idx == selected))
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
