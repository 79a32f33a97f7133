use crate::errors::{Result, RuntimeErrorKind};
use crate::interpreter::engine::Interpreter;
use crate::memory::value::{Numeric, Value};
use crate::parser::ast::{BinOp, Expr, Span};
use std::cmp::Ordering;

impl Interpreter {
    /// `||` and `&&` short-circuit; every other operator evaluates both sides
    pub(crate) fn evaluate_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        span: Span,
    ) -> Result<Value> {
        match op {
            BinOp::Or => {
                if self.evaluate_expr(left)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.evaluate_expr(right)?.is_truthy()))
            }
            BinOp::And => {
                if !self.evaluate_expr(left)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.evaluate_expr(right)?.is_truthy()))
            }
            _ => {
                let lhs = self.evaluate_expr(left)?;
                let rhs = self.evaluate_expr(right)?;
                self.apply_binary(op, lhs, rhs, span)
            }
        }
    }

    /// Apply a non-short-circuit operator to two evaluated operands
    pub(crate) fn apply_binary(&self, op: BinOp, lhs: Value, rhs: Value, span: Span) -> Result<Value> {
        match op {
            BinOp::Or => Ok(Value::Bool(lhs.is_truthy() || rhs.is_truthy())),
            BinOp::And => Ok(Value::Bool(lhs.is_truthy() && rhs.is_truthy())),
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let ordering = self.compare(lhs, rhs, span)?;
                Ok(Value::Bool(match op {
                    BinOp::Eq => ordering == Some(Ordering::Equal),
                    BinOp::Ne => ordering != Some(Ordering::Equal),
                    BinOp::Lt => ordering == Some(Ordering::Less),
                    BinOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                    BinOp::Gt => ordering == Some(Ordering::Greater),
                    _ => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
                }))
            }
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                let a = self.numeric(lhs, span)?;
                let b = self.numeric(rhs, span)?;
                self.arithmetic(op, a, b, span)
            }
        }
    }

    /// Numeric view of an operand; absent values cannot take part in arithmetic
    pub(crate) fn numeric(&self, value: Value, span: Span) -> Result<Numeric> {
        value.as_numeric().ok_or_else(|| {
            self.error(
                RuntimeErrorKind::TypeMismatch {
                    expected: "a numeric value".to_string(),
                    got: value.type_name().to_string(),
                },
                span,
            )
        })
    }

    /// `None` when a float comparison involves NaN
    fn compare(&self, lhs: Value, rhs: Value, span: Span) -> Result<Option<Ordering>> {
        let a = self.numeric(lhs, span)?;
        let b = self.numeric(rhs, span)?;
        Ok(match (a, b) {
            (Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        })
    }

    /// Integer operands use checked arithmetic; any float promotes both sides
    fn arithmetic(&self, op: BinOp, a: Numeric, b: Numeric, span: Span) -> Result<Value> {
        let (Numeric::Int(x), Numeric::Int(y)) = (a, b) else {
            let (x, y) = (a.as_f64(), b.as_f64());
            return Ok(Value::Float(match op {
                BinOp::Add => x + y,
                BinOp::Sub => x - y,
                BinOp::Mul => x * y,
                BinOp::Div => x / y,
                _ => x % y,
            }));
        };

        if matches!(op, BinOp::Div | BinOp::Mod) && y == 0 {
            return Err(self.error(
                RuntimeErrorKind::DivisionByZero {
                    operation: format!("{} {} {}", x, op.symbol(), y),
                },
                span,
            ));
        }

        let result = match op {
            BinOp::Add => x.checked_add(y),
            BinOp::Sub => x.checked_sub(y),
            BinOp::Mul => x.checked_mul(y),
            BinOp::Div => x.checked_div(y),
            _ => x.checked_rem(y),
        };
        result.map(Value::Int).ok_or_else(|| {
            self.error(
                RuntimeErrorKind::IntegerOverflow {
                    operation: format!("{} {} {}", x, op.symbol(), y),
                },
                span,
            )
        })
    }
}
