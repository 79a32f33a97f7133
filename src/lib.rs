//! # Introduction
//!
//! pcc parses and evaluates a small subset of C. The front end is a
//! backtracking recursive-descent parser working directly on the character
//! stream, and the back end walks the resulting tree against a stack of
//! copy-on-create scopes. A terminal inspector built with
//! [ratatui](https://docs.rs/ratatui) shows the tree, the final scopes, and the
//! optional trace of every production and evaluation handler.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Preprocessor → Scanner ⇄ Parser → AST → Interpreter → Environment
//! ```
//!
//! 1. [`config`]: run options and the preprocessing hook.
//! 2. [`parser`]: the checkpointing [`parser::scanner::Scanner`], the grammar
//!    productions, and the positioned AST.
//! 3. [`interpreter`]: evaluates a [`parser::ast::Module`] statement by statement.
//! 4. [`memory`]: runtime [`memory::value::Value`]s and the scope
//!    [`memory::environment::Environment`].
//! 5. [`trace`]: the entry/exit trace hook shared by parser and interpreter.
//! 6. [`errors`]: the single [`errors::Error`] family with lexer context.
//! 7. [`ui`]: ratatui-based inspector; not part of the stable library API.
//!
//! ## Supported C subset
//!
//! Types: `int`, `float`, `char`, `bool`, `void`.
//! Statements: declarations, assignments (plain and compound), `if/else`,
//! `while`, `for`, `return`, blocks, function definitions and prototypes.
//! Expressions: arithmetic, comparison, logical, prefix and postfix
//! increment, calls. Subscripts, member access, `*` and `&` parse but are
//! rejected at run time.

pub mod config;
pub mod errors;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod trace;
pub mod types;
pub mod ui;
