//! Run configuration shared by the parser, the interpreter, and the CLI

use crate::memory::environment::ScopeMode;

/// Pass applied to raw source text before scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preprocessor {
    /// Hand the text to the scanner unchanged
    #[default]
    Identity,
    /// Blank out comments and `#` directive lines, keeping every newline
    StripComments,
}

impl Preprocessor {
    pub fn apply(self, source: &str) -> String {
        match self {
            Preprocessor::Identity => source.to_string(),
            Preprocessor::StripComments => strip_comments(source),
        }
    }
}

/// Replace comments and directives with spaces so offsets stay valid
fn strip_comments(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;
    let mut at_line_start = true;

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        if at_line_start && ch == '#' {
            while i < chars.len() && chars[i] != '\n' {
                out.push(' ');
                i += 1;
            }
            continue;
        }

        match (ch, next) {
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    out.push(' ');
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                out.push_str("  ");
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    out.push(if chars[i] == '\n' { '\n' } else { ' ' });
                    i += 1;
                }
                if i < chars.len() {
                    out.push_str("  ");
                    i += 2;
                }
            }
            ('"', _) | ('\'', _) => {
                // Quoted text is copied verbatim up to the closing quote or end of line
                out.push(ch);
                i += 1;
                while i < chars.len() && chars[i] != ch && chars[i] != '\n' {
                    out.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() && chars[i] == ch {
                    out.push(ch);
                    i += 1;
                }
            }
            _ => {
                out.push(ch);
                i += 1;
            }
        }

        at_line_start = match ch {
            '\n' => true,
            ' ' | '\t' => at_line_start,
            _ => false,
        };
    }

    out
}

/// Knobs for one parse-and-evaluate run
#[derive(Debug, Clone)]
pub struct Config {
    /// Record enter/exit lines for productions and evaluation handlers
    pub trace: bool,
    /// Also print trace lines to stderr as they are recorded
    pub echo_trace: bool,
    pub scope_mode: ScopeMode,
    pub preprocessor: Preprocessor,
    pub max_loop_iterations: usize,
    pub max_call_depth: usize,
    /// Grammar productions that may be active at once while parsing
    pub max_nesting_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trace: false,
            echo_trace: false,
            scope_mode: ScopeMode::default(),
            preprocessor: Preprocessor::default(),
            max_loop_iterations: 1_000_000,
            max_call_depth: 50,
            max_nesting_depth: 256,
        }
    }
}

impl Config {
    pub fn with_trace(mut self, echo: bool) -> Self {
        self.trace = true;
        self.echo_trace = echo;
        self
    }

    pub fn with_scope_mode(mut self, mode: ScopeMode) -> Self {
        self.scope_mode = mode;
        self
    }

    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_max_loop_iterations(mut self, limit: usize) -> Self {
        self.max_loop_iterations = limit;
        self
    }

    pub fn with_max_call_depth(mut self, limit: usize) -> Self {
        self.max_call_depth = limit;
        self
    }

    pub fn with_max_nesting_depth(mut self, limit: usize) -> Self {
        self.max_nesting_depth = limit;
        self
    }
}
