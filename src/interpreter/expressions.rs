//! Expression evaluation
//!
//! [`Interpreter::evaluate_expr`] dispatches on the node kind; each handler
//! is traced under its own name. Operator semantics live in `ops/`.

use crate::errors::{Result, RuntimeErrorKind};
use crate::interpreter::engine::Interpreter;
use crate::memory::value::Value;
use crate::parser::ast::*;
use crate::trace::traced;

impl Interpreter {
    pub fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(literal) => traced(self, "evaluate_literal", |_| {
                Ok(match *literal {
                    Literal::Int(n) => Value::Int(n),
                    Literal::Float(x) => Value::Float(x),
                    Literal::Bool(b) => Value::Bool(b),
                    Literal::Char(c) => Value::Char(c),
                })
            }),

            ExprKind::Identifier(name) => traced(self, "evaluate_identifier", |it| {
                it.read_variable(name, span)
            }),

            ExprKind::Parenthetical(inner) => traced(self, "evaluate_parenthetical", |it| {
                it.evaluate_expr(inner)
            }),

            ExprKind::Prefix { op, operand } => traced(self, "evaluate_prefix", |it| {
                it.evaluate_prefix(*op, operand, span)
            }),

            ExprKind::Postfix { op, operand } => traced(self, "evaluate_postfix", |it| {
                it.evaluate_postfix(*op, operand, span)
            }),

            ExprKind::Binary { op, left, right } => traced(self, "evaluate_binary", |it| {
                it.evaluate_binary(*op, left, right, span)
            }),

            ExprKind::Call { locator, args } => traced(self, "evaluate_call", |it| {
                it.evaluate_call(locator, args, span)
            }),

            ExprKind::Subscript { locator, index } => traced(self, "evaluate_subscript", |it| {
                it.evaluate_subscript(locator, index, span)
            }),

            ExprKind::Member {
                locator,
                access,
                member,
            } => traced(self, "evaluate_member", |it| {
                it.evaluate_member(locator, *access, member, span)
            }),
        }
    }

    /// Value bound to `name`; an uninitialized binding reads as [`Value::Absent`]
    pub(crate) fn read_variable(&self, name: &str, span: Span) -> Result<Value> {
        self.env.lookup(name).map(|binding| binding.value).ok_or_else(|| {
            self.error(
                RuntimeErrorKind::Unbound {
                    name: name.to_string(),
                },
                span,
            )
        })
    }

    /// The variable an increment or assignment writes to
    pub(crate) fn lvalue_name<'e>(&self, target: &'e Expr) -> Result<&'e str> {
        target.as_identifier().ok_or_else(|| {
            self.error(
                RuntimeErrorKind::UnsupportedLValue {
                    target: target.label(),
                },
                target.span,
            )
        })
    }
}
