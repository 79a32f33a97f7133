//! Debug trace hook
//!
//! When enabled, every grammar production and every evaluation handler
//! reports entry and exit, indented by call depth:
//!
//! ```text
//! → Entering parse_statement()
//!  → Entering parse_declaration()
//!  ← (success) Exiting parse_declaration() with result: Declaration<int>[x] @ ln1:1-11
//! ← (success) Exiting parse_statement() with result: ...
//! ```
//!
//! Tracing is a side channel: [`traced`] returns exactly what the wrapped
//! closure returns. Lines are kept in memory and optionally echoed to stderr.

use crate::errors::{Error, LexerContext, Result};

/// Collects trace lines for one parse or evaluation
#[derive(Debug, Clone, Default)]
pub struct Tracer {
    enabled: bool,
    echo: bool,
    depth: usize,
    lines: Vec<String>,
}

impl Tracer {
    pub fn new(enabled: bool, echo: bool) -> Self {
        Tracer {
            enabled,
            echo,
            depth: 0,
            lines: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Record a line at the current indentation
    pub fn emit(&mut self, text: &str) {
        if !self.enabled {
            return;
        }
        let line = format!("{}{}", " ".repeat(self.depth), text);
        if self.echo {
            eprintln!("{}", line);
        }
        self.lines.push(line);
    }

    pub fn enter(&mut self, name: &str) {
        self.emit(&format!("→ Entering {}()", name));
        self.depth += 1;
    }

    pub fn exit_ok(&mut self, name: &str, result: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.emit(&format!("← (success) Exiting {}() with result: {}", name, result));
    }

    pub fn exit_err(&mut self, name: &str, err: &Error) {
        self.depth = self.depth.saturating_sub(1);
        self.emit(&format!(
            "← (fail) Exiting {}() with error: {} error: {}",
            name,
            err.category(),
            err.message()
        ));
    }
}

/// One-line rendering of a traced result
pub trait Describe {
    fn describe(&self) -> String;
}

impl Describe for () {
    fn describe(&self) -> String {
        "()".to_string()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe(&self) -> String {
        let items: Vec<String> = self.iter().map(Describe::describe).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe(&self) -> String {
        match self {
            Some(inner) => inner.describe(),
            None => "None".to_string(),
        }
    }
}

/// Anything that owns a [`Tracer`]
pub trait Traced {
    fn tracer_mut(&mut self) -> &mut Tracer;

    /// Where to point a [`Error::Debug`] raised by the trace hook
    fn trace_context(&self) -> LexerContext;
}

/// Run `f` as the handler `name`, reporting entry and exit when tracing
pub fn traced<S, T, F>(subject: &mut S, name: &'static str, f: F) -> Result<T>
where
    S: Traced,
    T: Describe,
    F: FnOnce(&mut S) -> Result<T>,
{
    if !subject.tracer_mut().is_enabled() {
        return f(subject);
    }

    let depth = subject.tracer_mut().depth();
    subject.tracer_mut().enter(name);
    let result = f(subject);

    let tracer = subject.tracer_mut();
    match &result {
        Ok(value) => tracer.exit_ok(name, &value.describe()),
        Err(err) => tracer.exit_err(name, err),
    }

    if tracer.depth() != depth {
        return Err(Error::debug(
            format!(
                "trace depth for {}() ended at {}, expected {}",
                name,
                tracer.depth(),
                depth
            ),
            subject.trace_context(),
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        tracer: Tracer,
    }

    impl Traced for Probe {
        fn tracer_mut(&mut self) -> &mut Tracer {
            &mut self.tracer
        }

        fn trace_context(&self) -> LexerContext {
            LexerContext::default()
        }
    }

    #[test]
    fn test_nested_lines_are_indented() {
        let mut probe = Probe {
            tracer: Tracer::new(true, false),
        };

        let result = traced(&mut probe, "outer", |p| {
            traced(p, "inner", |_| Ok(()))?;
            Ok(vec![()])
        });

        assert!(result.is_ok());
        assert_eq!(
            probe.tracer.lines(),
            &[
                "→ Entering outer()".to_string(),
                " → Entering inner()".to_string(),
                " ← (success) Exiting inner() with result: ()".to_string(),
                "← (success) Exiting outer() with result: [()]".to_string(),
            ]
        );
    }

    #[test]
    fn test_failures_are_reported_and_returned() {
        let mut probe = Probe {
            tracer: Tracer::new(true, false),
        };

        let result: Result<()> = traced(&mut probe, "failing", |_| {
            Err(Error::parse("Empty value", LexerContext::default()))
        });

        assert!(matches!(result, Err(Error::Parse { .. })));
        assert_eq!(
            probe.tracer.lines()[1],
            "← (fail) Exiting failing() with error: Parse error: Empty value"
        );
    }

    #[test]
    fn test_disabled_tracer_records_nothing() {
        let mut probe = Probe {
            tracer: Tracer::disabled(),
        };
        traced(&mut probe, "quiet", |_| Ok(())).unwrap();
        assert!(probe.tracer.lines().is_empty());
    }

    #[test]
    fn test_unbalanced_depth_is_a_debug_error() {
        let mut probe = Probe {
            tracer: Tracer::new(true, false),
        };
        let result = traced(&mut probe, "leaky", |p| {
            p.tracer.enter("never_exited");
            Ok(())
        });
        assert!(matches!(result, Err(Error::Debug { .. })));
    }
}
