//! Trace pane: parser and interpreter entry/exit lines
//!
//! Scrolling follows the terminal pane convention: `usize::MAX` pins the view
//! to the bottom and is clamped on render.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn trace_style(line: &str) -> Style {
    let body = line.trim_start();
    if body.starts_with("← (fail)") {
        Style::default().fg(DEFAULT_THEME.error)
    } else if body.starts_with("← (success)") {
        Style::default().fg(DEFAULT_THEME.success)
    } else {
        Style::default().fg(DEFAULT_THEME.primary)
    }
}

pub fn render_trace_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[String],
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
        .title(format!(" Trace ({} lines) ", lines.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll = (*scroll).min(lines.len().saturating_sub(visible_height));

    let visible: Vec<Line> = if lines.is_empty() {
        vec![Line::styled(
            "Tracing is off (run with --trace)",
            Style::default().fg(DEFAULT_THEME.comment),
        )]
    } else {
        lines
            .iter()
            .skip(*scroll)
            .take(visible_height)
            .map(|line| Line::styled(line.clone(), trace_style(line)))
            .collect()
    };

    frame.render_widget(Paragraph::new(visible).block(block), area);
}
