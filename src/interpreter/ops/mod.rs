//! Operator semantics, split by operator family
//!
//! All of these are `impl Interpreter` blocks.

pub mod access;
pub mod assign;
pub mod binary;
pub mod unary;
