//! Error family for scanning, parsing, and evaluation
//!
//! Every failure in the pipeline is an [`Error`]. Each variant carries a
//! [`LexerContext`] snapshot so the message can point at the offending source.
//! The rendered form is `"<Category> error: <message> <lexer-context>"`, which
//! the CLI prints verbatim.
//!
//! Only recoverable [`Error::Parse`] values are absorbed by the parser's trial
//! combinator; everything else unwinds to the top-level call.

use std::fmt;
use thiserror::Error;

/// Number of characters shown past the cursor in a context snippet
const SNIPPET_LOOKAHEAD: usize = 20;

pub type Result<T> = std::result::Result<T, Error>;

/// Snapshot of a scanner position used for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexerContext {
    pub line: usize,
    pub column: usize,
    pub position: usize,
    pub snippet: String,
}

impl LexerContext {
    /// Build a context for `position` given the offset at which its line starts
    pub fn new(source: &[char], line: usize, line_start: usize, position: usize) -> Self {
        let position = position.min(source.len());
        let line_start = line_start.min(position);
        let end = (position + SNIPPET_LOOKAHEAD).min(source.len());
        LexerContext {
            line,
            column: position - line_start + 1,
            position,
            snippet: source[line_start..end].iter().collect(),
        }
    }

    /// Build a context by scanning `source` up to `position`
    pub fn capture(source: &[char], position: usize) -> Self {
        let position = position.min(source.len());
        let mut line = 1;
        let mut line_start = 0;
        for (offset, ch) in source[..position].iter().enumerate() {
            if *ch == '\n' {
                line += 1;
                line_start = offset + 1;
            }
        }
        Self::new(source, line, line_start, position)
    }
}

impl fmt::Display for LexerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n\n----- Lexer Debug ----------\n\
             Lexer @ ln{}:{}\n\
             File position: {}\n\n\
             ```\n{}\n```\n\
             ----------------------------\n",
            self.line, self.column, self.position, self.snippet
        )
    }
}

/// Failures raised while evaluating a parsed module
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Illegal redeclaration of '{name}' in same scope")]
    Redeclaration { name: String },

    #[error("Reading from undeclared value '{name}'")]
    Unbound { name: String },

    /// `*` and `&` have no memory model behind them
    #[error("Operator '{operator}' is not supported without a memory model")]
    UnsupportedOperator { operator: String },

    #[error("Unsupported operation: {message}")]
    UnsupportedOperation { message: String },

    #[error("Cannot assign to {target}")]
    UnsupportedLValue { target: String },

    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Division by zero in {operation}")]
    DivisionByZero { operation: String },

    #[error("Integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    #[error("Undefined function '{name}'")]
    UndefinedFunction { name: String },

    #[error("Function '{function}' expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("Illegal nesting of function '{name}'. Function declarations only allowed at top-level")]
    IllegalFunctionNesting { name: String },

    #[error("Loop exceeded {limit} iterations")]
    LoopLimitExceeded { limit: usize },

    #[error("Call depth exceeded {limit}")]
    CallDepthExceeded { limit: usize },
}

/// The single error type shared by scanner, parser, and interpreter
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Malformed or unexpected lexeme, premature end of input
    #[error("Parse error: {message} {context}")]
    Parse {
        message: String,
        context: LexerContext,
        /// Whether a trial combinator may rewind and try another candidate
        recoverable: bool,
    },

    /// Structurally invalid token, e.g. an identifier starting with a digit
    #[error("Syntax error: {message} {context}")]
    Syntax {
        message: String,
        context: LexerContext,
    },

    /// Malformed literal value
    #[error("Value error: {message} {context}")]
    Value {
        message: String,
        context: LexerContext,
    },

    #[error("Runtime error: {kind} {context}")]
    Runtime {
        kind: RuntimeErrorKind,
        context: LexerContext,
    },

    /// Trace-mode invariant violation
    #[error("Debug error: {message} {context}")]
    Debug {
        message: String,
        context: LexerContext,
    },
}

impl Error {
    pub fn parse(message: impl Into<String>, context: LexerContext) -> Self {
        Error::Parse {
            message: message.into(),
            context,
            recoverable: true,
        }
    }

    /// A parse error that no alternative production can fix
    pub fn fatal_parse(message: impl Into<String>, context: LexerContext) -> Self {
        Error::Parse {
            message: message.into(),
            context,
            recoverable: false,
        }
    }

    pub fn syntax(message: impl Into<String>, context: LexerContext) -> Self {
        Error::Syntax {
            message: message.into(),
            context,
        }
    }

    pub fn value(message: impl Into<String>, context: LexerContext) -> Self {
        Error::Value {
            message: message.into(),
            context,
        }
    }

    pub fn runtime(kind: RuntimeErrorKind, context: LexerContext) -> Self {
        Error::Runtime { kind, context }
    }

    pub fn debug(message: impl Into<String>, context: LexerContext) -> Self {
        Error::Debug {
            message: message.into(),
            context,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Parse { recoverable: true, .. })
    }

    pub fn category(&self) -> &'static str {
        match self {
            Error::Parse { .. } => "Parse",
            Error::Syntax { .. } => "Syntax",
            Error::Value { .. } => "Value",
            Error::Runtime { .. } => "Runtime",
            Error::Debug { .. } => "Debug",
        }
    }

    /// The message without category prefix or context block
    pub fn message(&self) -> String {
        match self {
            Error::Parse { message, .. }
            | Error::Syntax { message, .. }
            | Error::Value { message, .. }
            | Error::Debug { message, .. } => message.clone(),
            Error::Runtime { kind, .. } => kind.to_string(),
        }
    }

    pub fn context(&self) -> &LexerContext {
        match self {
            Error::Parse { context, .. }
            | Error::Syntax { context, .. }
            | Error::Value { context, .. }
            | Error::Runtime { context, .. }
            | Error::Debug { context, .. } => context,
        }
    }

    pub fn runtime_kind(&self) -> Option<&RuntimeErrorKind> {
        match self {
            Error::Runtime { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_finds_line_and_column() {
        let source: Vec<char> = "int x;\nint y = 2;".chars().collect();
        let ctx = LexerContext::capture(&source, 11);
        assert_eq!(ctx.line, 2);
        assert_eq!(ctx.column, 5);
        assert_eq!(ctx.position, 11);
        assert_eq!(ctx.snippet, "int y = 2;");
    }

    #[test]
    fn test_rendered_format() {
        let source: Vec<char> = "abc".chars().collect();
        let err = Error::value("Non-decimals cannot begin with zero.", LexerContext::capture(&source, 1));
        let text = err.to_string();
        assert!(text.starts_with("Value error: Non-decimals cannot begin with zero. \n\n----- Lexer Debug"));
        assert!(text.contains("Lexer @ ln1:2"));
        assert!(text.contains("File position: 1"));
        assert!(text.contains("```\nabc\n```"));
    }

    #[test]
    fn test_only_soft_parse_errors_recover() {
        let ctx = LexerContext::default();
        assert!(Error::parse("Empty value", ctx.clone()).is_recoverable());
        assert!(!Error::fatal_parse("Encountered EOL unexpectedly", ctx.clone()).is_recoverable());
        assert!(!Error::syntax("bad", ctx.clone()).is_recoverable());
        assert!(!Error::runtime(RuntimeErrorKind::Unbound { name: "x".into() }, ctx).is_recoverable());
    }
}
