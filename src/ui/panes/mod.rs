//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: program text with syntax highlighting, selected-node span, error line
//! - [`ast`]: the flattened syntax tree with the current selection
//! - [`scopes`]: live scopes and their bindings after the run
//! - [`trace`]: parser and interpreter trace lines
//! - [`status`]: status bar with keybindings and the run outcome
//!
//! Each pane module exports a single `render_*` function. Panes hold no
//! state of their own; scroll offsets live in [`crate::ui::app::App`].

pub mod ast;
pub mod scopes;
pub mod source;
pub mod status;
pub mod trace;

pub use ast::render_ast_pane;
pub use scopes::render_scopes_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;
pub use trace::render_trace_pane;
