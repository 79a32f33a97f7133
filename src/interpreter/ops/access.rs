//! Chain links: calls, subscripts, member access
//!
//! Only calls have a runtime meaning. Subscripts and member access evaluate
//! their locator (so unbound names are still reported) and then fail, since
//! there are no array or struct values.

use crate::errors::{Result, RuntimeErrorKind};
use crate::interpreter::engine::{Flow, Interpreter};
use crate::memory::value::Value;
use crate::parser::ast::{Expr, Function, MemberAccess, Span};

impl Interpreter {
    /// Arguments are evaluated left to right in the caller's scope
    pub(crate) fn evaluate_call(&mut self, locator: &Expr, args: &[Expr], span: Span) -> Result<Value> {
        let Some(name) = locator.as_identifier() else {
            return Err(self.error(
                RuntimeErrorKind::UnsupportedOperation {
                    message: format!("cannot call {}", locator.label()),
                },
                locator.span,
            ));
        };

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate_expr(arg)?);
        }
        self.call_function(name, values, span)
    }

    /// Invoke a defined function on a fresh scope seeded from the globals
    pub(crate) fn call_function(&mut self, name: &str, args: Vec<Value>, span: Span) -> Result<Value> {
        let func = self.functions.get(name).cloned().ok_or_else(|| {
            self.error(
                RuntimeErrorKind::UndefinedFunction {
                    name: name.to_string(),
                },
                span,
            )
        })?;

        if func.params.len() != args.len() {
            return Err(self.error(
                RuntimeErrorKind::ArgumentCountMismatch {
                    function: func.name.clone(),
                    expected: func.params.len(),
                    got: args.len(),
                },
                span,
            ));
        }

        let limit = self.config.max_call_depth;
        if self.call_depth >= limit {
            return Err(self.error(RuntimeErrorKind::CallDepthExceeded { limit }, span));
        }

        let frame = self.env.enter_function(&func.name);
        self.call_depth += 1;
        let result = self.invoke(&func, args);
        self.call_depth -= 1;
        self.record_failure(&result);
        self.env.leave_function(frame);
        result
    }

    /// Bind parameters in the function scope and run the body
    fn invoke(&mut self, func: &Function, args: Vec<Value>) -> Result<Value> {
        for (param, value) in func.params.iter().zip(args) {
            self.env
                .declare(&param.name, param.type_tag, value)
                .map_err(|err| self.scope_error(err, param.span))?;
        }
        let body = func.body.as_ref().map_or(&[][..], |b| &b.statements[..]);
        Ok(match self.execute_statements(body)? {
            Flow::Return(value) => value,
            Flow::Normal => Value::Absent,
        })
    }

    pub(crate) fn evaluate_subscript(&mut self, locator: &Expr, index: &Expr, span: Span) -> Result<Value> {
        let base = self.evaluate_expr(locator)?;
        self.evaluate_expr(index)?;
        Err(self.error(
            RuntimeErrorKind::UnsupportedOperation {
                message: format!("subscript of a {} value", base.type_name()),
            },
            span,
        ))
    }

    pub(crate) fn evaluate_member(
        &mut self,
        locator: &Expr,
        access: MemberAccess,
        member: &Expr,
        span: Span,
    ) -> Result<Value> {
        let base = self.evaluate_expr(locator)?;
        Err(self.error(
            RuntimeErrorKind::UnsupportedOperation {
                message: format!(
                    "member access '{}{}' on a {} value",
                    access.symbol(),
                    member.as_identifier().unwrap_or("?"),
                    base.type_name()
                ),
            },
            span,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::errors::{Error, RuntimeErrorKind};
    use crate::interpreter::engine::Interpreter;
    use crate::memory::value::Value;
    use crate::parser::parse::Parser;

    fn run(source: &str) -> Result<(Interpreter, Option<Value>), Error> {
        let config = Config::default().with_max_call_depth(32);
        let mut parser = Parser::with_config(source, &config);
        let module = parser.parse_module()?;
        let mut it = Interpreter::new(parser.source(), &config);
        let result = it.run(&module)?;
        Ok((it, result))
    }

    fn runtime_kind(source: &str) -> RuntimeErrorKind {
        run(source).err().and_then(|e| e.runtime_kind().cloned()).unwrap()
    }

    #[test]
    fn test_call_with_arguments() {
        let (_, result) = run(
            "int add(int a, int b) { return a + b; }\n\
             int main() { return add(2, 3) * 2; }",
        )
        .unwrap();
        assert_eq!(result, Some(Value::Int(10)));
    }

    #[test]
    fn test_recursion() {
        let (_, result) = run(
            "int fact(int n) { if (n <= 1) { return 1; } return n * fact(n - 1); }\n\
             int main() { return fact(5); }",
        )
        .unwrap();
        assert_eq!(result, Some(Value::Int(120)));
    }

    #[test]
    fn test_callee_cannot_see_caller_locals() {
        assert!(matches!(
            runtime_kind("int peek() { return secret; } int main() { int secret = 1; return peek(); }"),
            RuntimeErrorKind::Unbound { .. }
        ));
    }

    #[test]
    fn test_callee_updates_globals() {
        let (it, _) = run("int count = 0; void bump() { count++; } int main() { bump(); bump(); return 0; }")
            .unwrap();
        assert_eq!(it.lookup("count"), Some(Value::Int(2)));
    }

    #[test]
    fn test_void_function_yields_absent() {
        let (_, result) = run("void noop() { } int main() { return noop(); }").unwrap();
        assert_eq!(result, Some(Value::Absent));
    }

    #[test]
    fn test_call_errors() {
        assert!(matches!(
            runtime_kind("int main() { return missing(); }"),
            RuntimeErrorKind::UndefinedFunction { .. }
        ));
        assert!(matches!(
            runtime_kind("int f(int a) { return a; } int main() { return f(); }"),
            RuntimeErrorKind::ArgumentCountMismatch { expected: 1, got: 0, .. }
        ));
        assert!(matches!(
            runtime_kind("int proto(int a); int main() { return proto(1); }"),
            RuntimeErrorKind::UndefinedFunction { .. }
        ));
    }

    #[test]
    fn test_unbounded_recursion_hits_depth_limit() {
        assert!(matches!(
            runtime_kind("int f() { return f(); } int main() { return f(); }"),
            RuntimeErrorKind::CallDepthExceeded { limit: 32 }
        ));
    }

    #[test]
    fn test_subscript_and_member_are_unsupported() {
        assert!(matches!(
            runtime_kind("int a = 1; int b = a[0];"),
            RuntimeErrorKind::UnsupportedOperation { .. }
        ));
        assert!(matches!(
            runtime_kind("int a = 1; int b = a.field;"),
            RuntimeErrorKind::UnsupportedOperation { .. }
        ));
        assert!(matches!(
            runtime_kind("int b = nothing.field;"),
            RuntimeErrorKind::Unbound { .. }
        ));
    }
}
