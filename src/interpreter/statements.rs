//! Statement execution
//!
//! Every block body (`if`, `else`, loop bodies, bare `{}`) runs in a child
//! scope that is discarded on exit. A `for` loop opens one extra scope around
//! the whole loop for its initializer.

use crate::errors::{Result, RuntimeErrorKind};
use crate::interpreter::engine::{Flow, Interpreter};
use crate::memory::value::Value;
use crate::parser::ast::*;
use crate::trace::traced;
use std::rc::Rc;

impl Interpreter {
    /// Execute a single statement
    pub fn execute_statement(&mut self, stmt: &Stmt) -> Result<Flow> {
        self.current_span = stmt.span;
        let span = stmt.span;

        match &stmt.kind {
            StmtKind::Expression(expr) => traced(self, "execute_expression_statement", |it| {
                it.evaluate_expr(expr)?;
                Ok(Flow::Normal)
            }),

            StmtKind::Assignment { target, op, value } => {
                traced(self, "execute_assignment", |it| {
                    it.execute_assignment(target, *op, value, span)?;
                    Ok(Flow::Normal)
                })
            }

            StmtKind::Declaration(decl) => traced(self, "execute_declaration", |it| {
                it.execute_declaration(decl)?;
                Ok(Flow::Normal)
            }),

            StmtKind::If {
                condition,
                then,
                otherwise,
            } => traced(self, "execute_if", |it| {
                if it.evaluate_expr(condition)?.is_truthy() {
                    return it.execute_block(then, "if");
                }
                match otherwise {
                    Some(Else::If(chained)) => it.execute_statement(chained),
                    Some(Else::Block(block)) => it.execute_block(block, "else"),
                    None => Ok(Flow::Normal),
                }
            }),

            StmtKind::While { condition, body } => traced(self, "execute_while", |it| {
                it.execute_loop(None, Some(condition), body, span)
            }),

            StmtKind::For {
                init,
                condition,
                step,
                body,
            } => traced(self, "execute_for", |it| {
                it.in_scope("for", |it| {
                    if let Some(init) = init {
                        it.execute_statement(init)?;
                    }
                    it.execute_loop(step.as_deref(), condition.as_ref(), body, span)
                })
            }),

            StmtKind::Block(block) => traced(self, "execute_compound", |it| {
                it.execute_block(block, "block")
            }),

            StmtKind::Return(value) => traced(self, "execute_return", |it| {
                let value = match value {
                    Some(expr) => it.evaluate_expr(expr)?,
                    None => Value::Absent,
                };
                Ok(Flow::Return(value))
            }),

            StmtKind::Function(func) => traced(self, "execute_function_declaration", |it| {
                it.register_function(func, span)?;
                Ok(Flow::Normal)
            }),
        }
    }

    /// Run `block` in a new child scope, stopping at the first `return`
    pub(crate) fn execute_block(&mut self, block: &Block, scope_name: &str) -> Result<Flow> {
        traced(self, "execute_block", |it| {
            it.in_scope(scope_name, |it| it.execute_statements(&block.statements))
        })
    }

    /// Run statements in the current scope
    pub(crate) fn execute_statements(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute_statement(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Shared loop driver for `while` and `for`; a missing condition is true
    fn execute_loop(
        &mut self,
        step: Option<&Stmt>,
        condition: Option<&Expr>,
        body: &Block,
        span: Span,
    ) -> Result<Flow> {
        let limit = self.config.max_loop_iterations;
        let mut iterations = 0usize;

        loop {
            if let Some(condition) = condition {
                if !self.evaluate_expr(condition)?.is_truthy() {
                    return Ok(Flow::Normal);
                }
            }

            iterations += 1;
            if iterations > limit {
                return Err(self.error(RuntimeErrorKind::LoopLimitExceeded { limit }, span));
            }

            if let Flow::Return(value) = self.execute_block(body, "loop")? {
                return Ok(Flow::Return(value));
            }

            if let Some(step) = step {
                self.execute_statement(step)?;
            }
        }
    }

    /// Bind every declarator in order; initializers see earlier declarators
    fn execute_declaration(&mut self, decl: &Declaration) -> Result<()> {
        for declarator in &decl.declarators {
            let value = match &declarator.init {
                Some(init) => self.evaluate_expr(init)?,
                None => Value::Absent,
            };
            self.env
                .declare(&declarator.name, decl.type_tag, value)
                .map_err(|err| self.scope_error(err, declarator.span))?;
        }
        Ok(())
    }

    /// Definitions go into the function table; prototypes only get checked
    fn register_function(&mut self, func: &Function, span: Span) -> Result<()> {
        if self.env.depth() != 0 {
            return Err(self.error(
                RuntimeErrorKind::IllegalFunctionNesting {
                    name: func.name.clone(),
                },
                span,
            ));
        }
        if func.body.is_some() {
            self.functions
                .insert(func.name.clone(), Rc::new(func.clone()));
        }
        Ok(())
    }
}
