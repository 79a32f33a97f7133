use crate::errors::{Result, RuntimeErrorKind};
use crate::interpreter::engine::Interpreter;
use crate::memory::value::{Numeric, Value};
use crate::parser::ast::{Expr, PostfixOp, PrefixOp, Span};

impl Interpreter {
    pub(crate) fn evaluate_prefix(&mut self, op: PrefixOp, operand: &Expr, span: Span) -> Result<Value> {
        match op {
            PrefixOp::Not => Ok(Value::Bool(!self.evaluate_expr(operand)?.is_truthy())),
            PrefixOp::Neg => {
                let value = self.evaluate_expr(operand)?;
                self.negate(value, span)
            }
            PrefixOp::Inc | PrefixOp::Dec => {
                let delta = if op == PrefixOp::Inc { 1 } else { -1 };
                let (_, new) = self.increment(operand, delta, span)?;
                Ok(new)
            }
            PrefixOp::Deref | PrefixOp::AddrOf => Err(self.error(
                RuntimeErrorKind::UnsupportedOperator {
                    operator: op.symbol().to_string(),
                },
                span,
            )),
        }
    }

    /// Write the stepped value back and yield the original
    pub(crate) fn evaluate_postfix(&mut self, op: PostfixOp, operand: &Expr, span: Span) -> Result<Value> {
        let delta = match op {
            PostfixOp::Inc => 1,
            PostfixOp::Dec => -1,
        };
        let (old, _) = self.increment(operand, delta, span)?;
        Ok(old)
    }

    /// Step the variable named by `operand` by `delta`, returning (old, new)
    fn increment(&mut self, operand: &Expr, delta: i64, span: Span) -> Result<(Value, Value)> {
        let name = self.lvalue_name(operand)?;
        let old = self.read_variable(name, operand.span)?;
        let new = self.step(old, delta, span)?;
        self.env
            .update(name, new)
            .map_err(|err| self.scope_error(err, span))?;
        Ok((old, new))
    }

    /// `old + delta`, keeping chars as chars and floats as floats
    fn step(&self, value: Value, delta: i64, span: Span) -> Result<Value> {
        let overflow = || {
            self.error(
                RuntimeErrorKind::IntegerOverflow {
                    operation: format!("{} {:+}", value, delta),
                },
                span,
            )
        };
        match value {
            Value::Int(n) => n.checked_add(delta).map(Value::Int).ok_or_else(overflow),
            Value::Float(x) => Ok(Value::Float(x + delta as f64)),
            Value::Bool(b) => Ok(Value::Int(i64::from(b) + delta)),
            Value::Char(c) => i64::from(u32::from(c))
                .checked_add(delta)
                .and_then(|code| u32::try_from(code).ok())
                .and_then(char::from_u32)
                .map(Value::Char)
                .ok_or_else(overflow),
            Value::Absent => Err(self.error(
                RuntimeErrorKind::TypeMismatch {
                    expected: "a numeric value".to_string(),
                    got: value.type_name().to_string(),
                },
                span,
            )),
        }
    }

    fn negate(&self, value: Value, span: Span) -> Result<Value> {
        match self.numeric(value, span)? {
            Numeric::Float(x) => Ok(Value::Float(-x)),
            Numeric::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(|| {
                self.error(
                    RuntimeErrorKind::IntegerOverflow {
                        operation: format!("-{}", n),
                    },
                    span,
                )
            }),
        }
    }
}
