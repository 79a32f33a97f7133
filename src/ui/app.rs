//! Inspector application state and event loop

use crate::errors::Result as RunResult;
use crate::interpreter::engine::Interpreter;
use crate::memory::environment::Scope;
use crate::memory::value::Value;
use crate::parser::ast::{tree_rows, Module, TreeRow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;

/// Rows moved by PageUp / PageDown
const PAGE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tree,
    Scopes,
    Trace,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: tree -> scopes -> trace -> source)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Tree => FocusedPane::Scopes,
            FocusedPane::Scopes => FocusedPane::Trace,
            FocusedPane::Trace => FocusedPane::Source,
            FocusedPane::Source => FocusedPane::Tree,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Tree => FocusedPane::Source,
            FocusedPane::Scopes => FocusedPane::Tree,
            FocusedPane::Trace => FocusedPane::Scopes,
            FocusedPane::Source => FocusedPane::Trace,
        }
    }
}

/// A run that stopped with an error
#[derive(Debug, Clone)]
pub struct Failure {
    /// `"<Category> error: <message>"` without the context block
    pub summary: String,
    pub line: usize,
}

/// Everything the inspector shows, captured once the run has finished
#[derive(Debug, Clone)]
pub struct Inspection {
    pub source: String,
    pub rows: Vec<TreeRow>,
    pub scopes: Vec<Scope>,
    pub trace: Vec<String>,
    pub result: Option<Value>,
    pub failure: Option<Failure>,
}

impl Inspection {
    pub fn new(
        module: &Module,
        interpreter: &Interpreter,
        outcome: &RunResult<Option<Value>>,
        source: String,
        trace: Vec<String>,
    ) -> Self {
        let (result, failure) = match outcome {
            Ok(result) => (*result, None),
            Err(err) => (
                None,
                Some(Failure {
                    summary: format!("{} error: {}", err.category(), err.message()),
                    line: err.context().line,
                }),
            ),
        };
        Inspection {
            source,
            rows: tree_rows(module),
            scopes: interpreter
                .scopes_at_failure()
                .unwrap_or(interpreter.env().scopes())
                .to_vec(),
            trace,
            result,
            failure,
        }
    }
}

/// The main application state
pub struct App {
    pub inspection: Inspection,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Index into `inspection.rows`
    pub selected: usize,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub tree_scroll: usize,
    pub scopes_scroll: usize,
    pub trace_scroll: usize,

    /// Source line to bring into view on the next render
    pub reveal_line: Option<usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(inspection: Inspection) -> Self {
        let status_message = match (&inspection.failure, &inspection.result) {
            (Some(failure), _) => failure.summary.clone(),
            (None, Some(value)) => format!("Finished, result {}", value),
            (None, None) => "Finished".to_string(),
        };
        let reveal_line = inspection.failure.as_ref().map(|f| f.line);
        App {
            inspection,
            focused_pane: FocusedPane::Tree,
            selected: 0,
            source_scroll: 0,
            tree_scroll: 0,
            scopes_scroll: 0,
            trace_scroll: 0,
            reveal_line,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }
        Ok(())
    }

    pub fn selected_row(&self) -> Option<&TreeRow> {
        self.inspection.rows.get(self.selected)
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Trace (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        // Right column: Tree (top) | Scopes (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let selection = self.selected_row().map(|row| row.span);
        let node_label = self
            .selected_row()
            .map(|row| row.label.clone())
            .unwrap_or_default();

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.inspection.source,
            selection,
            self.inspection.failure.as_ref().map(|f| f.line),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
            &mut self.reveal_line,
        );

        super::panes::render_trace_pane(
            frame,
            left_rows[1],
            &self.inspection.trace,
            self.focused_pane == FocusedPane::Trace,
            &mut self.trace_scroll,
        );

        super::panes::render_ast_pane(
            frame,
            right_rows[0],
            &self.inspection.rows,
            self.selected,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        super::panes::render_scopes_pane(
            frame,
            right_rows[1],
            &self.inspection.scopes,
            self.inspection.result.as_ref(),
            self.focused_pane == FocusedPane::Scopes,
            &mut self.scopes_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            &node_label,
            self.inspection.failure.is_some(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => self.move_by(-1),
            KeyCode::Down => self.move_by(1),
            KeyCode::PageUp => self.move_by(-(PAGE as isize)),
            KeyCode::PageDown => self.move_by(PAGE as isize),
            KeyCode::Enter => self.move_by(isize::MAX),
            KeyCode::Backspace => self.move_by(isize::MIN),
            _ => {}
        }
    }

    /// Move the tree selection or scroll the focused pane.
    ///
    /// Scroll offsets may overshoot here; each pane clamps on render.
    fn move_by(&mut self, delta: isize) {
        fn shift(value: usize, delta: isize) -> usize {
            if delta < 0 {
                value.saturating_sub(delta.unsigned_abs())
            } else {
                value.saturating_add(delta as usize)
            }
        }

        match self.focused_pane {
            FocusedPane::Tree => {
                let last = self.inspection.rows.len().saturating_sub(1);
                self.selected = shift(self.selected, delta).min(last);
                if let Some(row) = self.selected_row() {
                    self.reveal_line = Some(row.span.start.line);
                }
            }
            FocusedPane::Source => self.source_scroll = shift(self.source_scroll, delta),
            FocusedPane::Scopes => self.scopes_scroll = shift(self.scopes_scroll, delta),
            FocusedPane::Trace => self.trace_scroll = shift(self.trace_scroll, delta),
        }
    }
}
