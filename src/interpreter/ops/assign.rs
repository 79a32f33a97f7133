use crate::errors::{Result, RuntimeErrorKind};
use crate::interpreter::engine::Interpreter;
use crate::memory::value::{Numeric, Value};
use crate::parser::ast::{AssignOp, BinOp, Expr, Span};

impl Interpreter {
    /// `target op= value`; the right-hand side is evaluated before the target is read
    pub(crate) fn execute_assignment(
        &mut self,
        target: &Expr,
        op: AssignOp,
        value: &Expr,
        span: Span,
    ) -> Result<()> {
        let name = self.lvalue_name(target)?;
        let rhs = self.evaluate_expr(value)?;

        let new = if op == AssignOp::Assign {
            rhs
        } else {
            let current = self.read_variable(name, target.span)?;
            self.apply_compound(op, current, rhs, span)?
        };

        self.env
            .update(name, new)
            .map_err(|err| self.scope_error(err, target.span))
    }

    fn apply_compound(&self, op: AssignOp, current: Value, rhs: Value, span: Span) -> Result<Value> {
        let arithmetic = match op {
            AssignOp::Add => Some(BinOp::Add),
            AssignOp::Sub => Some(BinOp::Sub),
            AssignOp::Mul => Some(BinOp::Mul),
            AssignOp::Div => Some(BinOp::Div),
            AssignOp::Mod => Some(BinOp::Mod),
            _ => None,
        };
        if let Some(bin) = arithmetic {
            return self.apply_binary(bin, current, rhs, span);
        }

        let a = self.integer_operand(current, span)?;
        let b = self.integer_operand(rhs, span)?;
        let result = match op {
            AssignOp::BitAnd => Some(a & b),
            AssignOp::BitOr => Some(a | b),
            AssignOp::BitXor => Some(a ^ b),
            AssignOp::Shl => u32::try_from(b).ok().and_then(|s| a.checked_shl(s)),
            _ => u32::try_from(b).ok().and_then(|s| a.checked_shr(s)),
        };
        result.map(Value::Int).ok_or_else(|| {
            self.error(
                RuntimeErrorKind::IntegerOverflow {
                    operation: format!("{} {} {}", a, op.symbol(), b),
                },
                span,
            )
        })
    }

    /// Bitwise operators only accept integer-like operands
    fn integer_operand(&self, value: Value, span: Span) -> Result<i64> {
        match self.numeric(value, span)? {
            Numeric::Int(n) => Ok(n),
            Numeric::Float(_) => Err(self.error(
                RuntimeErrorKind::TypeMismatch {
                    expected: "int".to_string(),
                    got: "float".to_string(),
                },
                span,
            )),
        }
    }
}
