//! On-demand scanner for C source text
//!
//! There is no token stream. The parser pulls lexemes one at a time and the
//! scanner advances an absolute cursor over the source buffer. Line and
//! column numbers come from an index of the newline offsets consumed so far.
//!
//! Backtracking goes through [`Scanner::save_state`] / [`Scanner::resume_state`],
//! a stack of checkpoints that restore the cursor (and the newline index)
//! exactly.

use crate::errors::{Error, LexerContext, Result};
use crate::parser::ast::Position;

/// Saved cursor for a trial parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checkpoint {
    pos: usize,
    newlines: usize,
}

/// Cursor over an immutable source buffer
#[derive(Debug, Clone)]
pub struct Scanner {
    source: Vec<char>,
    pos: usize,
    /// Offsets of every newline consumed so far, in order
    newlines: Vec<usize>,
    checkpoints: Vec<Checkpoint>,
}

impl Scanner {
    /// Create a scanner over already-preprocessed text.
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            pos: 0,
            newlines: Vec::new(),
            checkpoints: Vec::new(),
        }
    }

    pub fn source(&self) -> &[char] {
        &self.source
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn eof(&self) -> usize {
        self.source.len()
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn line(&self) -> usize {
        self.newlines.len() + 1
    }

    pub fn column(&self) -> usize {
        self.pos - self.line_start() + 1
    }

    fn line_start(&self) -> usize {
        self.newlines.last().map_or(0, |nl| nl + 1)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line(), self.column(), self.pos)
    }

    /// Snapshot of the cursor for error reporting
    pub fn context(&self) -> LexerContext {
        LexerContext::new(&self.source, self.line(), self.line_start(), self.pos)
    }

    /// Whether at least `n` more characters remain
    fn has(&self, n: usize) -> bool {
        self.pos + n <= self.source.len()
    }

    // ===== Lookahead =====

    /// The next `n` characters, without consuming them
    pub fn peek(&self, n: usize) -> Option<String> {
        if n == 0 || !self.has(n) {
            return None;
        }
        Some(self.source[self.pos..self.pos + n].iter().collect())
    }

    pub fn peek_char(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset).copied()
    }

    /// Whether the upcoming text is exactly `literal`
    pub fn matches(&self, literal: &str) -> bool {
        let mut offset = 0;
        for expected in literal.chars() {
            if self.char_at(offset) != Some(expected) {
                return false;
            }
            offset += 1;
        }
        offset > 0
    }

    /// The first of `literals` that the upcoming text starts with
    pub fn match_any<'a>(&self, literals: &[&'a str]) -> Option<&'a str> {
        literals.iter().copied().find(|lit| self.matches(lit))
    }

    /// Like [`Scanner::matches`], but the keyword must end at a word boundary
    pub fn match_keyword(&self, keyword: &str) -> bool {
        self.matches(keyword)
            && !self
                .char_at(keyword.chars().count())
                .is_some_and(is_identifier_char)
    }

    pub fn match_any_keyword<'a>(&self, keywords: &[&'a str]) -> Option<&'a str> {
        keywords.iter().copied().find(|kw| self.match_keyword(kw))
    }

    /// Match an operator without splitting a longer lexeme.
    ///
    /// Operators are tried in order, so longer spellings must come first. A
    /// one-character operator is rejected when it is the start of a compound
    /// lexeme: `+` never matches `+=` or `++`, `-` never matches `->`.
    pub fn match_operator<'a>(&self, operators: &[&'a str]) -> Option<&'a str> {
        operators.iter().copied().find(|op| {
            if !self.matches(op) {
                return false;
            }
            let mut chars = op.chars();
            match (chars.next(), chars.next()) {
                (Some(first), None) => match self.char_at(1) {
                    Some('=') => false,
                    Some(next) if next == first => false,
                    Some('>') if first == '-' => false,
                    _ => true,
                },
                _ => true,
            }
        })
    }

    // ===== Consumption =====

    /// Consume `n` characters, recording any newlines crossed
    pub fn next(&mut self, n: usize) -> Option<String> {
        if n == 0 || !self.has(n) {
            return None;
        }
        let mut text = String::with_capacity(n);
        for _ in 0..n {
            let ch = self.source[self.pos];
            if ch == '\n' {
                self.newlines.push(self.pos);
            }
            text.push(ch);
            self.pos += 1;
        }
        Some(text)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        if ch == '\n' {
            self.newlines.push(self.pos);
        }
        self.pos += 1;
        Some(ch)
    }

    /// Consume `literal` or fail without moving
    pub fn expect(&mut self, literal: &str) -> Result<()> {
        if !self.matches(literal) {
            let actual = self
                .peek(literal.chars().count())
                .or_else(|| self.peek(self.eof() - self.pos))
                .unwrap_or_default();
            return Err(Error::parse(
                format!(
                    "Expected '{}', got '{}' @ ln{}:{} (position: {})",
                    literal,
                    actual,
                    self.line(),
                    self.column(),
                    self.pos
                ),
                self.context(),
            ));
        }
        self.next(literal.chars().count());
        Ok(())
    }

    /// Consume the first of `literals` present, or fail without moving
    pub fn expect_any<'a>(&mut self, literals: &[&'a str]) -> Result<&'a str> {
        match self.match_any(literals) {
            Some(lit) => {
                self.next(lit.chars().count());
                Ok(lit)
            }
            None => Err(Error::parse(
                format!(
                    "Expected one of {:?} @ ln{}:{} (position: {})",
                    literals,
                    self.line(),
                    self.column(),
                    self.pos
                ),
                self.context(),
            )),
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume the longest run satisfying `predicate`, trimming surrounding whitespace
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        self.skip_whitespace();
        let mut text = String::new();
        while let Some(ch) = self.peek_char() {
            if !predicate(ch) {
                break;
            }
            text.push(ch);
            self.bump();
        }
        self.skip_whitespace();
        text
    }

    /// Consume everything up to (not including) `terminator`.
    ///
    /// Fails with "Reached EOF unexpectedly" if the terminator never shows up.
    pub fn eat_until(&mut self, terminator: &str) -> Result<String> {
        self.eat_until_checked(terminator, false)
    }

    fn eat_until_checked(&mut self, terminator: &str, single_line: bool) -> Result<String> {
        self.skip_whitespace();
        let mut text = String::new();
        while !self.matches(terminator) {
            match self.peek_char() {
                None => {
                    return Err(Error::fatal_parse("Reached EOF unexpectedly", self.context()));
                }
                Some('\n') if single_line => {
                    return Err(Error::fatal_parse("Encountered EOL unexpectedly", self.context()));
                }
                Some(ch) => {
                    text.push(ch);
                    self.bump();
                }
            }
        }
        self.skip_whitespace();
        Ok(text)
    }

    // ===== Lexemes =====

    /// An identifier: letters, digits, and underscores, not starting with a digit
    pub fn token(&mut self) -> Result<String> {
        let start = self.context();
        let token = self.eat_while(is_identifier_char);
        if token.is_empty() {
            return Err(Error::parse("Empty value", start));
        }
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(Error::syntax(
                format!("'{}', identifiers cannot start with a number.", token),
                start,
            ));
        }
        Ok(token)
    }

    /// A run of digits and decimal points.
    ///
    /// A number running straight into identifier characters is a misspelled
    /// identifier and raises a syntax error.
    pub fn number(&mut self) -> Result<String> {
        self.skip_whitespace();
        let start = self.context();
        let mut number = String::new();
        while let Some(ch) = self.peek_char().filter(|&ch| is_numeric_char(ch)) {
            number.push(ch);
            self.bump();
        }
        if !number.is_empty() && self.peek_char().is_some_and(is_identifier_char) {
            let rest = self.eat_while(is_identifier_char);
            return Err(Error::syntax(
                format!("'{}{}', identifiers cannot start with a number.", number, rest),
                start,
            ));
        }
        self.skip_whitespace();
        if !number.contains('.') && number.len() > 1 && number.starts_with('0') {
            return Err(Error::value("Non-decimals cannot begin with zero.", start));
        }
        Ok(number)
    }

    /// A double-quoted literal on a single line
    pub fn string(&mut self) -> Result<String> {
        self.expect("\"")?;
        let text = self.quoted_body('"')?;
        self.expect("\"")?;
        Ok(text)
    }

    /// A single-quoted literal holding exactly one character
    pub fn character(&mut self) -> Result<char> {
        self.expect("'")?;
        let start = self.context();
        let text = self.quoted_body('\'')?;
        let mut chars = text.chars();
        let ch = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch,
            _ => return Err(Error::value("Character literal expected", start)),
        };
        self.expect("'")?;
        Ok(ch)
    }

    /// Raw text up to the closing quote; whitespace inside quotes is kept
    fn quoted_body(&mut self, quote: char) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(Error::fatal_parse("Reached EOF unexpectedly", self.context()));
                }
                Some('\n') => {
                    return Err(Error::fatal_parse("Encountered EOL unexpectedly", self.context()));
                }
                Some(ch) if ch == quote => return Ok(text),
                Some(ch) => {
                    text.push(ch);
                    self.bump();
                }
            }
        }
    }

    // ===== Checkpoints =====

    pub fn save_state(&mut self) {
        self.checkpoints.push(Checkpoint {
            pos: self.pos,
            newlines: self.newlines.len(),
        });
    }

    /// Rewind to the most recent checkpoint and drop it
    pub fn resume_state(&mut self) {
        if let Some(checkpoint) = self.checkpoints.pop() {
            self.pos = checkpoint.pos;
            self.newlines.truncate(checkpoint.newlines);
        }
    }

    /// Drop the most recent checkpoint without rewinding
    pub fn commit_state(&mut self) {
        self.checkpoints.pop();
    }

    pub fn checkpoint_depth(&self) -> usize {
        self.checkpoints.len()
    }
}

pub fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub fn is_numeric_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tracks_lines() {
        let mut scanner = Scanner::new("abc123\n");
        assert_eq!(scanner.next(1).as_deref(), Some("a"));
        assert_eq!(scanner.pos(), 1);
        assert_eq!(scanner.next(2).as_deref(), Some("bc"));
        assert_eq!(scanner.next(3).as_deref(), Some("123"));
        assert_eq!(scanner.pos(), 6);
        assert_eq!(scanner.next(1).as_deref(), Some("\n"));
        assert!(scanner.is_eof());
        assert_eq!(scanner.line(), 2);
        assert_eq!(scanner.column(), 1);
    }

    #[test]
    fn test_next_past_end() {
        let mut scanner = Scanner::new("");
        assert_eq!(scanner.next(1), None);
        assert_eq!(scanner.pos(), 0);

        let mut scanner = Scanner::new("ab");
        assert_eq!(scanner.next(3), None);
        assert_eq!(scanner.pos(), 0);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let scanner = Scanner::new("abc 123\n");
        assert_eq!(scanner.peek(1).as_deref(), Some("a"));
        assert_eq!(scanner.peek(3).as_deref(), Some("abc"));
        assert_eq!(scanner.pos(), 0);
        assert_eq!(Scanner::new("").peek(1), None);
    }

    #[test]
    fn test_token_sequence() {
        let mut scanner = Scanner::new("each one of these  _ok but 0n3 .");
        assert_eq!(scanner.token().unwrap(), "each");
        assert_eq!(scanner.pos(), 5);
        assert_eq!(scanner.token().unwrap(), "one");
        assert_eq!(scanner.token().unwrap(), "of");
        assert_eq!(scanner.token().unwrap(), "these");
        assert_eq!(scanner.pos(), 19);
        assert_eq!(scanner.token().unwrap(), "_ok");
        assert_eq!(scanner.token().unwrap(), "but");
        assert!(matches!(scanner.token(), Err(Error::Syntax { .. })));
        let err = scanner.token().unwrap_err();
        assert!(err.is_recoverable(), "'.' is simply not an identifier");
    }

    #[test]
    fn test_number_rules() {
        let mut scanner = Scanner::new("10.0 0.0001 0 00054");
        assert_eq!(scanner.number().unwrap(), "10.0");
        assert_eq!(scanner.pos(), 5);
        assert_eq!(scanner.number().unwrap(), "0.0001");
        assert_eq!(scanner.number().unwrap(), "0");
        assert!(matches!(scanner.number(), Err(Error::Value { .. })));
    }

    #[test]
    fn test_number_running_into_letters_is_a_syntax_error() {
        let mut scanner = Scanner::new("9lives = 1;");
        let err = scanner.number().unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
        assert_eq!(err.message(), "'9lives', identifiers cannot start with a number.");
        assert!(!err.is_recoverable());

        let mut scanner = Scanner::new("12 + x");
        assert_eq!(scanner.number().unwrap(), "12");
        assert_eq!(scanner.pos(), 3);
    }

    #[test]
    fn test_string_and_character() {
        let mut scanner = Scanner::new("\"hi there\" 'x' 'xy'");
        assert_eq!(scanner.string().unwrap(), "hi there");
        scanner.skip_whitespace();
        assert_eq!(scanner.character().unwrap(), 'x');
        scanner.skip_whitespace();
        assert!(matches!(scanner.character(), Err(Error::Value { .. })));
    }

    #[test]
    fn test_unterminated_literals_are_fatal() {
        let mut scanner = Scanner::new("\"open\nclosed\"");
        let err = scanner.string().unwrap_err();
        assert!(!err.is_recoverable());
        assert!(err.message().contains("EOL"));

        let mut scanner = Scanner::new("'a");
        assert!(!scanner.character().unwrap_err().is_recoverable());
    }

    #[test]
    fn test_skip_whitespace_counts_lines() {
        let mut scanner = Scanner::new("   \t     \n \t  \r  \n");
        scanner.skip_whitespace();
        assert_eq!(scanner.line(), 3);
        assert_eq!(scanner.column(), 1);
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_expect() {
        let mut scanner = Scanner::new("expect this and that");
        scanner.expect("expect ").unwrap();
        assert_eq!(scanner.pos(), 7);
        scanner.expect("this ").unwrap();
        assert!(scanner.expect("or").is_err());
        assert_eq!(scanner.pos(), 12);
        assert_eq!(scanner.expect_any(&["or ", "and "]).unwrap(), "and ");
        assert!(scanner.expect_any(&["this", "those"]).is_err());
        assert_eq!(scanner.pos(), 16);
        scanner.expect("that").unwrap();
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_eat_until() {
        let mut scanner = Scanner::new("  .  random stuff but stop at pause");
        assert_eq!(scanner.eat_until("pause").unwrap(), ".  random stuff but stop at ");

        let mut scanner = Scanner::new("no terminator here");
        let err = scanner.eat_until(";").unwrap_err();
        assert!(err.message().contains("EOF"));
    }

    #[test]
    fn test_keyword_boundaries() {
        let scanner = Scanner::new("iffy");
        assert!(scanner.matches("if"));
        assert!(!scanner.match_keyword("if"));
        assert_eq!(Scanner::new("if (").match_any_keyword(&["if", "for"]), Some("if"));
    }

    #[test]
    fn test_operator_does_not_split_compound_lexemes() {
        assert_eq!(Scanner::new("+= 1").match_operator(&["+", "-"]), None);
        assert_eq!(Scanner::new("++x").match_operator(&["+", "-"]), None);
        assert_eq!(Scanner::new("->m").match_operator(&["+", "-"]), None);
        assert_eq!(Scanner::new("- 1").match_operator(&["+", "-"]), Some("-"));
        assert_eq!(Scanner::new(">= 1").match_operator(&[">=", ">"]), Some(">="));
        assert_eq!(Scanner::new("== 1").match_operator(&["==", "!="]), Some("=="));
    }

    #[test]
    fn test_checkpoints_restore_exactly() {
        let mut scanner = Scanner::new("a\nb\nc");
        scanner.save_state();
        scanner.next(3);
        scanner.save_state();
        scanner.next(2);
        assert_eq!(scanner.line(), 3);
        scanner.resume_state();
        assert_eq!((scanner.pos(), scanner.line(), scanner.column()), (3, 2, 2));
        scanner.resume_state();
        assert_eq!((scanner.pos(), scanner.line(), scanner.column()), (0, 1, 1));
        assert_eq!(scanner.checkpoint_depth(), 0);
    }
}
