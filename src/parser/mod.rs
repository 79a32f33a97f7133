//! C source parser
//!
//! This module turns source text into an AST:
//! - [`scanner`]: cursor, lexeme readers, and backtracking checkpoints
//! - [`parse`]: the [`Parser`](parse::Parser) struct and its combinators
//! - [`ast`]: AST node definitions
//!
//! # Supported C Subset
//!
//! - Types: `int`, `float`, `char`, `bool`, `void` (tags only, no checking)
//! - Statements: declarations, assignments (plain and compound), expression
//!   statements, `if`/`else if`/`else`, `while`, `for`, `return`, blocks
//! - Expressions: arithmetic, comparison, logical, prefix and postfix
//!   increment, member/subscript/call chains
//! - Functions: top-level definitions and prototypes
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with trial-and-rewind for ambiguous
//! prefixes. No separate tokenizer and no parser generator.

pub mod ast;
mod declarations;
mod expressions;
pub mod parse;
pub mod scanner;
mod statements;
