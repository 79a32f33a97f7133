//! Statement parsing implementation
//!
//! `if`, `for`, `while`, `return`, and `{` are recognised from the next
//! lexeme. Anything else is settled by trial, in order: expression
//! statement (assignment first, then bare expression), declaration, function.

use crate::errors::{Error, Result};
use crate::parser::ast::*;
use crate::parser::parse::Parser;

/// Longest spellings first so `<<=` is never read as `<`
const ASSIGN_OPS: [&str; 11] = [
    "<<=", ">>=", "+=", "-=", "*=", "/=", "%=", "&=", "^=", "|=", "=",
];

impl Parser {
    pub fn parse_statement(&mut self) -> Result<Stmt> {
        self.production("parse_statement", |p| {
            if p.at_keyword("if") {
                return p.parse_if();
            }
            if p.at_keyword("while") {
                return p.parse_while();
            }
            if p.at_keyword("for") {
                return p.parse_for();
            }
            if p.at_keyword("return") {
                return p.parse_return();
            }
            if p.at("{") {
                let block = p.parse_block()?;
                return Ok(Stmt::new(StmtKind::Block(block)));
            }
            p.attempt(&[
                ("parse_expression_statement", Parser::parse_expression_statement),
                ("parse_declaration", Parser::parse_declaration),
                ("parse_function", Parser::parse_function),
            ])
        })
    }

    pub(crate) fn parse_block(&mut self) -> Result<Block> {
        self.production("parse_block", |p| {
            p.punct("{")?;
            let mut statements = Vec::new();
            while !p.at("}") {
                if p.scanner.is_eof() {
                    return Err(Error::parse(
                        "Expected '}' before end of input",
                        p.scanner.context(),
                    ));
                }
                statements.push(p.parse_statement()?);
            }
            p.punct("}")?;
            Ok(Block {
                statements,
                span: Span::default(),
            })
        })
    }

    /// An assignment or bare expression followed by `;`
    fn parse_expression_statement(&mut self) -> Result<Stmt> {
        self.production("parse_expression_statement", |p| {
            let stmt = p.parse_simple_statement()?;
            p.punct(";")?;
            Ok(stmt)
        })
    }

    /// Assignment or expression without the terminator; also a `for` step
    fn parse_simple_statement(&mut self) -> Result<Stmt> {
        self.attempt(&[
            ("parse_assignment", Parser::parse_assignment),
            ("parse_bare_expression", Parser::parse_bare_expression),
        ])
    }

    fn parse_assignment(&mut self) -> Result<Stmt> {
        self.production("parse_assignment", |p| {
            let target = p.parse_unary()?;
            p.scanner.skip_whitespace();
            let op = p
                .assignment_operator()
                .ok_or_else(|| Error::parse("Expected an assignment operator", p.scanner.context()))?;
            p.scanner.next(op.symbol().len());
            let value = p.parse_expression()?;
            Ok(Stmt::new(StmtKind::Assignment { target, op, value }))
        })
    }

    fn assignment_operator(&self) -> Option<AssignOp> {
        let symbol = self.scanner.match_any(&ASSIGN_OPS)?;
        if symbol == "=" && self.scanner.matches("==") {
            return None;
        }
        AssignOp::from_symbol(symbol)
    }

    fn parse_bare_expression(&mut self) -> Result<Stmt> {
        self.production("parse_bare_expression", |p| {
            let expr = p.parse_expression()?;
            Ok(Stmt::new(StmtKind::Expression(expr)))
        })
    }

    /// `if (cond) { ... }` with an optional `else { ... }` or `else if`
    fn parse_if(&mut self) -> Result<Stmt> {
        self.production("parse_if", |p| {
            p.keyword("if")?;
            let condition = p.parse_condition()?;
            let then = p.parse_block()?;

            let otherwise = if p.at_keyword("else") {
                p.keyword("else")?;
                if p.at_keyword("if") {
                    Some(Else::If(Box::new(p.parse_if()?)))
                } else if p.at("{") {
                    Some(Else::Block(p.parse_block()?))
                } else {
                    return Err(Error::fatal_parse(
                        "Expected '{' or 'if' after 'else'",
                        p.scanner.context(),
                    ));
                }
            } else {
                None
            };

            Ok(Stmt::new(StmtKind::If {
                condition,
                then,
                otherwise,
            }))
        })
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        self.production("parse_while", |p| {
            p.keyword("while")?;
            let condition = p.parse_condition()?;
            let body = p.parse_block()?;
            Ok(Stmt::new(StmtKind::While { condition, body }))
        })
    }

    /// `for (init; condition; step) { ... }`, every clause optional
    fn parse_for(&mut self) -> Result<Stmt> {
        self.production("parse_for", |p| {
            p.keyword("for")?;
            p.punct("(")?;

            let init = if p.at(";") {
                p.punct(";")?;
                None
            } else {
                Some(Box::new(p.attempt(&[
                    ("parse_declaration", Parser::parse_declaration),
                    ("parse_expression_statement", Parser::parse_expression_statement),
                ])?))
            };

            let condition = if p.at(";") {
                None
            } else {
                Some(p.parse_expression()?)
            };
            p.punct(";")?;

            let step = if p.at(")") {
                None
            } else {
                Some(Box::new(p.parse_simple_statement()?))
            };
            p.punct(")")?;

            let body = p.parse_block()?;
            Ok(Stmt::new(StmtKind::For {
                init,
                condition,
                step,
                body,
            }))
        })
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        self.production("parse_return", |p| {
            p.keyword("return")?;
            let value = if p.at(";") {
                None
            } else {
                Some(p.parse_expression()?)
            };
            p.punct(";")?;
            Ok(Stmt::new(StmtKind::Return(value)))
        })
    }

    fn parse_condition(&mut self) -> Result<Expr> {
        self.punct("(")?;
        let condition = self.parse_expression()?;
        self.punct(")")?;
        Ok(condition)
    }
}
