//! Execution engine
//!
//! [`Interpreter`] owns the scope stack, the function table, and the tracer,
//! and walks a parsed [`Module`]. Statement handlers live in
//! `statements.rs`, expression handlers in `expressions.rs` and `ops/`.

use crate::config::Config;
use crate::errors::{Error, LexerContext, Result, RuntimeErrorKind};
use crate::memory::environment::{Environment, Scope, ScopeError};
use crate::memory::value::Value;
use crate::parser::ast::{Function, Module, Span};
use crate::trace::{traced, Describe, Traced, Tracer};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// How a statement finished
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

impl Describe for Flow {
    fn describe(&self) -> String {
        match self {
            Flow::Normal => "Normal".to_string(),
            Flow::Return(value) => format!("Return({})", value),
        }
    }
}

impl From<ScopeError> for RuntimeErrorKind {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::Redeclaration { name } => RuntimeErrorKind::Redeclaration { name },
            ScopeError::Unbound { name } => RuntimeErrorKind::Unbound { name },
        }
    }
}

/// Tree-walking evaluator for a parsed module
#[derive(Debug)]
pub struct Interpreter {
    pub(crate) config: Config,

    /// Source text the spans refer to, for error context
    source: Vec<char>,

    pub(crate) env: Environment,

    /// Function definitions (name -> definition)
    pub(crate) functions: FxHashMap<String, Rc<Function>>,

    pub(crate) tracer: Tracer,

    pub(crate) call_depth: usize,

    /// Span of the statement being executed
    pub(crate) current_span: Span,

    /// Scope stack as it stood where the last run failed
    failure_scopes: Option<Vec<Scope>>,
}

impl Interpreter {
    /// `source` is the (preprocessed) text the module was parsed from
    pub fn new(source: &[char], config: &Config) -> Self {
        Interpreter {
            config: config.clone(),
            source: source.to_vec(),
            env: Environment::new(config.scope_mode),
            functions: FxHashMap::default(),
            tracer: Tracer::new(config.trace, config.echo_trace),
            call_depth: 0,
            current_span: Span::default(),
            failure_scopes: None,
        }
    }

    /// Execute the module's statements in the global scope.
    ///
    /// If the module defines `main`, it is called afterwards and its return
    /// value is the result. A top-level `return` stops execution early.
    pub fn run(&mut self, module: &Module) -> Result<Option<Value>> {
        self.failure_scopes = None;
        traced(self, "run", |it| {
            for stmt in &module.statements {
                if let Flow::Return(value) = it.execute_statement(stmt)? {
                    return Ok(Some(value));
                }
            }
            if it.functions.contains_key("main") {
                return it.call_function("main", Vec::new(), module.span).map(Some);
            }
            Ok(None)
        })
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Scopes that were live when the last run failed, innermost last.
    ///
    /// `None` when the run succeeded or failed in the global scope.
    pub fn scopes_at_failure(&self) -> Option<&[Scope]> {
        self.failure_scopes.as_deref()
    }

    pub fn globals(&self) -> &Scope {
        self.env.global()
    }

    /// Current value of a name visible in the innermost scope
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.env.lookup(name).map(|binding| binding.value)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn take_trace(&mut self) -> Vec<String> {
        self.tracer.take_lines()
    }

    // ===== Error helpers =====

    /// Context pointing at the first non-blank character of `span`
    pub(crate) fn context_at(&self, span: Span) -> LexerContext {
        let end = span.end.offset.min(self.source.len());
        let mut offset = span.start.offset.min(end);
        while offset < end && self.source[offset].is_whitespace() {
            offset += 1;
        }
        LexerContext::capture(&self.source, offset)
    }

    pub(crate) fn error(&self, kind: RuntimeErrorKind, span: Span) -> Error {
        Error::runtime(kind, self.context_at(span))
    }

    pub(crate) fn scope_error(&self, err: ScopeError, span: Span) -> Error {
        self.error(err.into(), span)
    }

    /// Run `f` inside a fresh child scope, popping it whatever happens
    pub(crate) fn in_scope<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.env.push_scope(name);
        let result = f(self);
        self.record_failure(&result);
        self.env.pop_scope();
        result
    }

    /// Keep the innermost scope stack seen by a failing result
    pub(crate) fn record_failure<T>(&mut self, result: &Result<T>) {
        if result.is_err() && self.failure_scopes.is_none() {
            self.failure_scopes = Some(self.env.scopes().to_vec());
        }
    }
}

impl Traced for Interpreter {
    fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    fn trace_context(&self) -> LexerContext {
        self.context_at(self.current_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn run(source: &str) -> (Interpreter, Option<Value>) {
        let config = Config::default();
        let mut parser = Parser::with_config(source, &config);
        let module = parser.parse_module().unwrap();
        let mut interpreter = Interpreter::new(parser.source(), &config);
        let result = interpreter.run(&module).unwrap();
        (interpreter, result)
    }

    #[test]
    fn test_run_without_main_returns_nothing() {
        let (interpreter, result) = run("int x = 2;");
        assert_eq!(result, None);
        assert_eq!(interpreter.lookup("x"), Some(Value::Int(2)));
    }

    #[test]
    fn test_run_calls_main() {
        let (interpreter, result) = run("int g = 1; int main() { g = g + 41; return g; }");
        assert_eq!(result, Some(Value::Int(42)));
        assert_eq!(interpreter.lookup("g"), Some(Value::Int(42)));
    }

    #[test]
    fn test_runtime_error_points_at_statement() {
        let config = Config::default();
        let mut parser = Parser::with_config("int x = 1;\n  y = 2;", &config);
        let module = parser.parse_module().unwrap();
        let mut interpreter = Interpreter::new(parser.source(), &config);
        let err = interpreter.run(&module).unwrap_err();
        assert!(matches!(
            err.runtime_kind(),
            Some(RuntimeErrorKind::Unbound { name }) if name == "y"
        ));
        assert_eq!((err.context().line, err.context().column), (2, 3));
    }

    #[test]
    fn test_failure_keeps_innermost_scopes() {
        let config = Config::default();
        let source = "int g = 1;\nint main() { int local = 3; { int inner = local / 0; } return 0; }";
        let mut parser = Parser::with_config(source, &config);
        let module = parser.parse_module().unwrap();
        let mut interpreter = Interpreter::new(parser.source(), &config);
        assert!(interpreter.run(&module).is_err());

        let scopes = interpreter.scopes_at_failure().expect("scopes at failure");
        let names: Vec<&str> = scopes.iter().map(|scope| scope.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"global"));
        assert!(names.contains(&"main"));
        assert!(scopes.iter().any(|scope| scope.get("local").is_some()));

        // The live stack is back to the globals only
        assert_eq!(interpreter.env().scopes().len(), 1);

        let mut parser = Parser::with_config("int x = 1;", &config);
        let module = parser.parse_module().unwrap();
        interpreter.run(&module).unwrap();
        assert!(interpreter.scopes_at_failure().is_none());
    }

    #[test]
    fn test_run_trace_is_balanced() {
        let config = Config::default().with_trace(false);
        let mut parser = Parser::with_config("int x = 1 + 2;", &config);
        let module = parser.parse_module().unwrap();
        let mut interpreter = Interpreter::new(parser.source(), &config);
        interpreter.run(&module).unwrap();
        let trace = interpreter.take_trace();
        assert_eq!(trace.first().map(String::as_str), Some("→ Entering run()"));
        assert_eq!(
            trace.last().map(String::as_str),
            Some("← (success) Exiting run() with result: None")
        );
    }
}
