//! Tree-walking evaluator
//!
//! This module provides the execution logic:
//! - [`engine`]: the [`Interpreter`](engine::Interpreter) struct and entry point
//! - `statements`: declarations, assignments, control flow, blocks
//! - `expressions`: per-node expression dispatch
//! - [`ops`]: arithmetic, comparison, increment, assignment, calls
//!
//! # Execution Model
//!
//! Top-level statements run in the global scope. Blocks open child scopes
//! (see [`crate::memory::environment`]). If the module defines `main`, it is
//! called once the top level has finished.

pub mod engine;
mod expressions;
pub mod ops;
mod statements;
