//! Declaration parsing implementation
//!
//! - Variables: `int x, y = 2, z;`
//! - Functions: `float scale(float v, int n) { ... }` or a `;` prototype.
//!   An empty list or `(void)` means no parameters.

use crate::errors::{Error, Result};
use crate::parser::ast::*;
use crate::parser::parse::Parser;
use crate::types::{PrimitiveType, TYPE_KEYWORDS};

impl Parser {
    /// A primitive type keyword
    pub(crate) fn parse_type(&mut self) -> Result<PrimitiveType> {
        self.scanner.skip_whitespace();
        let found = self
            .scanner
            .match_any_keyword(&TYPE_KEYWORDS)
            .and_then(|word| PrimitiveType::from_keyword(word).map(|ty| (word, ty)));
        let Some((word, ty)) = found else {
            return Err(Error::parse("Expected a type keyword", self.scanner.context()));
        };
        self.scanner.next(word.len());
        self.scanner.skip_whitespace();
        Ok(ty)
    }

    pub(crate) fn parse_declaration(&mut self) -> Result<Stmt> {
        self.production("parse_declaration", |p| {
            let type_tag = p.parse_type()?;
            let mut declarators = vec![p.parse_declarator()?];
            while p.at(",") {
                p.punct(",")?;
                declarators.push(p.parse_declarator()?);
            }
            p.punct(";")?;
            Ok(Stmt::new(StmtKind::Declaration(Declaration {
                type_tag,
                declarators,
            })))
        })
    }

    /// `name` or `name = expr`
    fn parse_declarator(&mut self) -> Result<Declarator> {
        self.production("parse_declarator", |p| {
            let name = p.name_token()?;
            let init = if p.at("=") && !p.scanner.matches("==") {
                p.punct("=")?;
                Some(p.parse_expression()?)
            } else {
                None
            };
            Ok(Declarator {
                name,
                init,
                span: Span::default(),
            })
        })
    }

    pub(crate) fn parse_function(&mut self) -> Result<Stmt> {
        self.production("parse_function", |p| {
            let return_type = p.parse_type()?;
            let name = p.name_token()?;
            let params = p.parse_params()?;

            let body = if p.at(";") {
                p.punct(";")?;
                None
            } else {
                Some(p.parse_block()?)
            };

            Ok(Stmt::new(StmtKind::Function(Function {
                return_type,
                name,
                params,
                body,
            })))
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        self.punct("(")?;

        if self.at_keyword("void") {
            self.scanner.save_state();
            self.keyword("void")?;
            if self.at(")") {
                self.scanner.commit_state();
                self.punct(")")?;
                return Ok(Vec::new());
            }
            self.scanner.resume_state();
        }

        let mut params = Vec::new();
        if !self.at(")") {
            loop {
                params.push(self.parse_param()?);
                if self.at(",") {
                    self.punct(",")?;
                } else {
                    break;
                }
            }
        }
        self.punct(")")?;
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<Param> {
        self.production("parse_param", |p| {
            let type_tag = p.parse_type()?;
            let name = p.name_token()?;
            Ok(Param {
                type_tag,
                name,
                span: Span::default(),
            })
        })
    }
}
