//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and the machinery every grammar
//! production shares: span stamping, tracing, and the trial combinator.
//!
//! # Parser Architecture
//!
//! The Parser is a backtracking recursive descent over an on-demand
//! [`Scanner`]. There is no token stream; productions pull lexemes directly.
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: type keywords, variable declarations, functions
//! - `statements`: control flow, blocks, assignment and expression statements
//! - `expressions`: the precedence ladder, unary forms, symbols and chains
//!
//! # Productions
//!
//! Every production runs through [`Parser::production`], which skips leading
//! and trailing whitespace, reports entry and exit to the tracer, and stamps
//! the node it built with the span between the cursor before and after.
//!
//! # Backtracking
//!
//! Where the next lexeme does not decide the rule, [`Parser::attempt`] tries
//! an ordered list of candidates. Each candidate runs behind a scanner
//! checkpoint; a recoverable parse error rewinds and moves on to the next one,
//! anything else is final.

use crate::config::Config;
use crate::errors::{Error, LexerContext, Result};
use crate::parser::ast::*;
use crate::parser::scanner::Scanner;
use crate::trace::{traced, Describe, Traced, Tracer};
use crate::types::TYPE_KEYWORDS;
use std::path::Path;

/// A named alternative for [`Parser::attempt`]
pub(crate) type Candidate<T> = (&'static str, fn(&mut Parser) -> Result<T>);

/// Words that can never be used as identifiers
const RESERVED: [&str; 7] = ["if", "else", "for", "while", "return", "true", "false"];

/// Recursive descent parser for the C subset
pub struct Parser {
    pub(crate) scanner: Scanner,
    pub(crate) tracer: Tracer,
    name: String,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self::with_config(source, &Config::default())
    }

    /// Run the configured preprocessor over `source` and set up tracing
    pub fn with_config(source: &str, config: &Config) -> Self {
        Parser {
            scanner: Scanner::new(&config.preprocessor.apply(source)),
            tracer: Tracer::new(config.trace, config.echo_trace),
            name: "<source>".to_string(),
            depth: 0,
            max_depth: config.max_nesting_depth,
        }
    }

    /// Read a source file; an unreadable file is a parse error naming the path
    pub fn from_file(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| {
            Error::fatal_parse(
                format!("Could not read file '{}': {}", path.display(), err),
                LexerContext::default(),
            )
        })?;
        let mut parser = Self::with_config(&source, config);
        parser.name = path.display().to_string();
        Ok(parser)
    }

    /// The text being parsed, after preprocessing
    pub fn source(&self) -> &[char] {
        self.scanner.source()
    }

    /// Absolute cursor offset
    pub fn position(&self) -> usize {
        self.scanner.pos()
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn take_trace(&mut self) -> Vec<String> {
        self.tracer.take_lines()
    }

    /// Parse the whole input as a sequence of statements
    pub fn parse_module(&mut self) -> Result<Module> {
        let name = self.name.clone();
        self.production("parse_module", move |p| {
            let mut statements = Vec::new();
            while !p.scanner.is_eof() {
                statements.push(p.parse_statement()?);
                p.scanner.skip_whitespace();
            }
            Ok(Module {
                name,
                statements,
                span: Span::default(),
            })
        })
    }

    // ===== Combinators =====

    /// Run `f` as the production `name` and stamp its result with a span.
    ///
    /// Nesting past the configured depth is a fatal parse error, so deeply
    /// bracketed input fails instead of exhausting the stack.
    pub(crate) fn production<T, F>(&mut self, name: &'static str, f: F) -> Result<T>
    where
        T: Spanned + Describe,
        F: FnOnce(&mut Parser) -> Result<T>,
    {
        if self.depth >= self.max_depth {
            return Err(Error::fatal_parse(
                format!("Nesting too deep: more than {} active productions", self.max_depth),
                self.scanner.context(),
            ));
        }
        let start = self.scanner.position();
        self.depth += 1;
        let result = traced(self, name, |p| {
            p.scanner.skip_whitespace();
            let mut node = f(p)?;
            p.scanner.skip_whitespace();
            node.set_span(Span::new(start, p.scanner.position()));
            Ok(node)
        });
        self.depth -= 1;
        result
    }

    /// Try each candidate in order behind a checkpoint; first success wins.
    ///
    /// Recoverable parse errors rewind the scanner and fall through to the
    /// next candidate. Any other error rewinds and propagates. When every
    /// candidate fails, the error lists the names that were tried.
    pub(crate) fn attempt<T>(&mut self, candidates: &[Candidate<T>]) -> Result<T> {
        let mut tried = Vec::with_capacity(candidates.len());
        for (name, candidate) in candidates {
            self.scanner.save_state();
            match candidate(self) {
                Ok(node) => {
                    self.scanner.commit_state();
                    return Ok(node);
                }
                Err(err) if err.is_recoverable() => {
                    self.scanner.resume_state();
                    tried.push(*name);
                }
                Err(err) => {
                    self.scanner.resume_state();
                    return Err(err);
                }
            }
        }
        Err(Error::parse(
            format!("No production matched. Tried:\n{}", tried.join("\n")),
            self.scanner.context(),
        ))
    }

    // ===== Helper methods =====

    /// Consume punctuation, skipping whitespace on both sides
    pub(crate) fn punct(&mut self, literal: &str) -> Result<()> {
        self.scanner.skip_whitespace();
        self.scanner.expect(literal)?;
        self.scanner.skip_whitespace();
        Ok(())
    }

    /// Whether the next lexeme is `literal`, after any whitespace
    pub(crate) fn at(&mut self, literal: &str) -> bool {
        self.scanner.skip_whitespace();
        self.scanner.matches(literal)
    }

    pub(crate) fn at_keyword(&mut self, keyword: &str) -> bool {
        self.scanner.skip_whitespace();
        self.scanner.match_keyword(keyword)
    }

    pub(crate) fn keyword(&mut self, keyword: &str) -> Result<()> {
        if !self.at_keyword(keyword) {
            return Err(Error::parse(
                format!("Expected keyword '{}'", keyword),
                self.scanner.context(),
            ));
        }
        self.scanner.next(keyword.len());
        self.scanner.skip_whitespace();
        Ok(())
    }

    /// An identifier that is not a reserved word or type keyword
    pub(crate) fn name_token(&mut self) -> Result<String> {
        self.scanner.skip_whitespace();
        let context = self.scanner.context();
        let token = self.scanner.token()?;
        if RESERVED.contains(&token.as_str()) || TYPE_KEYWORDS.contains(&token.as_str()) {
            return Err(Error::parse(
                format!("'{}' is a reserved word", token),
                context,
            ));
        }
        Ok(token)
    }
}

impl Traced for Parser {
    fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    fn trace_context(&self) -> LexerContext {
        self.scanner.context()
    }
}
