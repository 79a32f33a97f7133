//! Expression parsing implementation
//!
//! Binary levels, lowest precedence first:
//!
//! ```text
//! or          ||
//! and         &&
//! equality    == !=
//! relational  <= >= < >
//! additive    + -
//! multiplicative * / %
//! unary       prefix ++ -- ! - & *, postfix ++ --
//! primary     true | false | 'c' | number | symbol
//! ```
//!
//! Each level parses one operand from the level above, then left-folds while
//! the next lexeme is one of its operators.
//!
//! A symbol is a parenthesized expression, a dereference, or an identifier
//! followed by any number of chain links (`.m`, `->m`, `[i]`, `(args)`). Each
//! link wraps everything parsed so far as its locator.
//!
//! All parsing methods are implemented as methods on the [`Parser`] struct.

use crate::errors::{Error, Result};
use crate::parser::ast::*;
use crate::parser::parse::Parser;

const OR_OPS: &[(&str, BinOp)] = &[("||", BinOp::Or)];
const AND_OPS: &[(&str, BinOp)] = &[("&&", BinOp::And)];
const EQUALITY_OPS: &[(&str, BinOp)] = &[("==", BinOp::Eq), ("!=", BinOp::Ne)];
const RELATIONAL_OPS: &[(&str, BinOp)] = &[
    ("<=", BinOp::Le),
    (">=", BinOp::Ge),
    ("<", BinOp::Lt),
    (">", BinOp::Gt),
];
const ADDITIVE_OPS: &[(&str, BinOp)] = &[("+", BinOp::Add), ("-", BinOp::Sub)];
const MULTIPLICATIVE_OPS: &[(&str, BinOp)] =
    &[("*", BinOp::Mul), ("/", BinOp::Div), ("%", BinOp::Mod)];

impl Parser {
    /// Parse expression (top-level entry point)
    pub fn parse_expression(&mut self) -> Result<Expr> {
        self.production("parse_expression", Parser::parse_or)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        self.production("parse_or", |p| p.binary_level(OR_OPS, Parser::parse_and))
    }

    fn parse_and(&mut self) -> Result<Expr> {
        self.production("parse_and", |p| p.binary_level(AND_OPS, Parser::parse_equality))
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        self.production("parse_equality", |p| {
            p.binary_level(EQUALITY_OPS, Parser::parse_relational)
        })
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        self.production("parse_relational", |p| {
            p.binary_level(RELATIONAL_OPS, Parser::parse_additive)
        })
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.production("parse_additive", |p| {
            p.binary_level(ADDITIVE_OPS, Parser::parse_multiplicative)
        })
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        self.production("parse_multiplicative", |p| {
            p.binary_level(MULTIPLICATIVE_OPS, Parser::parse_unary)
        })
    }

    /// One left-associative precedence level
    fn binary_level(
        &mut self,
        operators: &[(&str, BinOp)],
        operand: fn(&mut Parser) -> Result<Expr>,
    ) -> Result<Expr> {
        let mut left = operand(self)?;
        loop {
            self.scanner.skip_whitespace();
            let found = operators
                .iter()
                .find(|(symbol, _)| self.scanner.match_operator(&[*symbol]).is_some());
            let Some(&(symbol, op)) = found else {
                break;
            };
            self.scanner.next(symbol.len());
            let right = operand(self)?;
            let span = Span::new(left.span.start, right.span.end);
            left = Expr {
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            };
        }
        Ok(left)
    }

    /// Prefix operators nest (`- -x`, `!!x`); postfix `++`/`--` bind to the primary
    pub(crate) fn parse_unary(&mut self) -> Result<Expr> {
        self.production("parse_unary", |p| {
            if let Some(op) = p.prefix_operator() {
                p.scanner.next(op.symbol().len());
                let operand = p.parse_unary()?;
                return Ok(Expr::new(ExprKind::Prefix {
                    op,
                    operand: Box::new(operand),
                }));
            }

            let mut expr = p.parse_primary()?;
            loop {
                p.scanner.skip_whitespace();
                let op = if p.scanner.matches("++") {
                    PostfixOp::Inc
                } else if p.scanner.matches("--") {
                    PostfixOp::Dec
                } else {
                    break;
                };
                p.scanner.next(2);
                let span = Span::new(expr.span.start, p.scanner.position());
                expr = Expr {
                    kind: ExprKind::Postfix {
                        op,
                        operand: Box::new(expr),
                    },
                    span,
                };
            }
            Ok(expr)
        })
    }

    fn prefix_operator(&mut self) -> Option<PrefixOp> {
        self.scanner.skip_whitespace();
        if let Some(symbol) = self.scanner.match_any(&["++", "--"]) {
            return PrefixOp::from_symbol(symbol);
        }
        let symbol = self.scanner.match_any(&["!", "-", "&", "*"])?;
        // `!=`, `-=`, `&=`, `*=` and `->` are never prefixes
        match self.scanner.peek(2)?.chars().nth(1) {
            Some('=') => None,
            Some('>') if symbol == "-" => None,
            _ => PrefixOp::from_symbol(symbol),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        self.production("parse_primary", |p| {
            if let Some(word) = p.scanner.match_any_keyword(&["true", "false"]) {
                p.scanner.next(word.len());
                return Ok(Expr::new(ExprKind::Literal(Literal::Bool(word == "true"))));
            }
            if p.scanner.matches("'") {
                let ch = p.scanner.character()?;
                return Ok(Expr::new(ExprKind::Literal(Literal::Char(ch))));
            }
            p.attempt(&[
                ("parse_numeric", Parser::parse_numeric),
                ("parse_symbol", Parser::parse_symbol),
            ])
        })
    }

    /// Integer or floating literal; a decimal point makes it a float
    fn parse_numeric(&mut self) -> Result<Expr> {
        self.production("parse_numeric", |p| {
            let context = p.scanner.context();
            let text = p.scanner.number()?;
            if text.is_empty() {
                return Err(Error::parse("Expected a numeric literal", context));
            }
            let literal = if text.contains('.') {
                text.parse::<f64>()
                    .map(Literal::Float)
                    .map_err(|_| Error::value(format!("Malformed float literal '{}'", text), context))?
            } else {
                text.parse::<i64>().map(Literal::Int).map_err(|_| {
                    Error::value(format!("Integer literal '{}' is out of range", text), context)
                })?
            };
            Ok(Expr::new(ExprKind::Literal(literal)))
        })
    }

    pub(crate) fn parse_symbol(&mut self) -> Result<Expr> {
        self.production("parse_symbol", |p| {
            p.attempt(&[
                ("parse_parenthetical", Parser::parse_parenthetical),
                ("parse_dereference", Parser::parse_dereference),
                ("parse_chain", Parser::parse_chain),
            ])
        })
    }

    fn parse_parenthetical(&mut self) -> Result<Expr> {
        self.production("parse_parenthetical", |p| {
            p.punct("(")?;
            let inner = p.parse_expression()?;
            p.punct(")")?;
            Ok(Expr::new(ExprKind::Parenthetical(Box::new(inner))))
        })
    }

    fn parse_dereference(&mut self) -> Result<Expr> {
        self.production("parse_dereference", |p| {
            p.punct("*")?;
            let operand = p.parse_symbol()?;
            Ok(Expr::new(ExprKind::Prefix {
                op: PrefixOp::Deref,
                operand: Box::new(operand),
            }))
        })
    }

    pub(crate) fn parse_identifier(&mut self) -> Result<Expr> {
        self.production("parse_identifier", |p| {
            let name = p.name_token()?;
            Ok(Expr::new(ExprKind::Identifier(name)))
        })
    }

    /// An identifier and its trailing member, subscript, and call links
    fn parse_chain(&mut self) -> Result<Expr> {
        self.production("parse_chain", |p| {
            let mut expr = p.parse_identifier()?;
            loop {
                p.scanner.skip_whitespace();
                let start = expr.span.start;
                let kind = if let Some(access) = p.scanner.match_any(&["->", "."]) {
                    p.scanner.next(access.len());
                    let member = p.parse_identifier()?;
                    ExprKind::Member {
                        locator: Box::new(expr),
                        access: if access == "->" {
                            MemberAccess::Arrow
                        } else {
                            MemberAccess::Dot
                        },
                        member: Box::new(member),
                    }
                } else if p.scanner.matches("[") {
                    let index = p.parse_subscript()?;
                    ExprKind::Subscript {
                        locator: Box::new(expr),
                        index: Box::new(index),
                    }
                } else if p.scanner.matches("(") {
                    let args = p.parse_arguments()?;
                    ExprKind::Call {
                        locator: Box::new(expr),
                        args,
                    }
                } else {
                    break;
                };
                expr = Expr {
                    kind,
                    span: Span::new(start, p.scanner.position()),
                };
            }
            Ok(expr)
        })
    }

    fn parse_subscript(&mut self) -> Result<Expr> {
        self.punct("[")?;
        let index = self.parse_expression()?;
        self.punct("]")?;
        Ok(index)
    }

    /// `( expr, expr, ... )`
    fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        self.punct("(")?;
        let mut args = Vec::new();
        if !self.at(")") {
            loop {
                args.push(self.parse_expression()?);
                if self.at(",") {
                    self.punct(",")?;
                } else {
                    break;
                }
            }
        }
        self.punct(")")?;
        Ok(args)
    }
}
