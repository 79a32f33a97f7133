//! AST definitions
//!
//! Every syntactic category is its own variant with named fields; each node
//! owns its children outright and carries the [`Span`] of source it was
//! parsed from. The tree is never mutated after the parser returns it.

use crate::trace::Describe;
use crate::types::PrimitiveType;
use std::fmt;

/// A point in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    /// Absolute character offset
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }
}

/// Source range covered by a production, including the whitespace it consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start.offset <= offset && offset < self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ln{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Nodes whose span is stamped by the parser after a production succeeds
pub trait Spanned {
    fn span(&self) -> Span;
    fn set_span(&mut self, span: Span);
}

macro_rules! impl_spanned {
    ($($ty:ty),* $(,)?) => {
        $(impl Spanned for $ty {
            fn span(&self) -> Span {
                self.span
            }

            fn set_span(&mut self, span: Span) {
                self.span = span;
            }
        })*
    };
}

impl_spanned!(Expr, Stmt, Block, Module, Declarator, Param);

// ===== Operators =====

/// Binary operators, grouped by precedence level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Not,
    Neg,
    Deref,
    AddrOf,
    Inc,
    Dec,
}

impl PrefixOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "!" => PrefixOp::Not,
            "-" => PrefixOp::Neg,
            "*" => PrefixOp::Deref,
            "&" => PrefixOp::AddrOf,
            "++" => PrefixOp::Inc,
            "--" => PrefixOp::Dec,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
            PrefixOp::Deref => "*",
            PrefixOp::AddrOf => "&",
            PrefixOp::Inc => "++",
            PrefixOp::Dec => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Inc,
    Dec,
}

impl PostfixOp {
    pub fn symbol(self) -> &'static str {
        match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        }
    }
}

/// `=` and the compound assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl AssignOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => AssignOp::Assign,
            "+=" => AssignOp::Add,
            "-=" => AssignOp::Sub,
            "*=" => AssignOp::Mul,
            "/=" => AssignOp::Div,
            "%=" => AssignOp::Mod,
            "&=" => AssignOp::BitAnd,
            "|=" => AssignOp::BitOr,
            "^=" => AssignOp::BitXor,
            "<<=" => AssignOp::Shl,
            ">>=" => AssignOp::Shr,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAccess {
    Dot,
    Arrow,
}

impl MemberAccess {
    pub fn symbol(self) -> &'static str {
        match self {
            MemberAccess::Dot => ".",
            MemberAccess::Arrow => "->",
        }
    }
}

// ===== Expressions =====

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl Literal {
    pub fn type_tag(&self) -> PrimitiveType {
        match self {
            Literal::Int(_) => PrimitiveType::Int,
            Literal::Float(_) => PrimitiveType::Float,
            Literal::Bool(_) => PrimitiveType::Bool,
            Literal::Char(_) => PrimitiveType::Char,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Char(c) => write!(f, "'{}'", c.escape_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    Parenthetical(Box<Expr>),
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        locator: Box<Expr>,
        args: Vec<Expr>,
    },
    Subscript {
        locator: Box<Expr>,
        index: Box<Expr>,
    },
    Member {
        locator: Box<Expr>,
        access: MemberAccess,
        member: Box<Expr>,
    },
}

impl Expr {
    /// A node with an empty span; the production wrapper fills it in
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            kind,
            span: Span::default(),
        }
    }

    pub fn label(&self) -> String {
        match &self.kind {
            ExprKind::Literal(lit) => format!("Literal<{}>({})", lit.type_tag(), lit),
            ExprKind::Identifier(name) => format!("Identifier({})", name),
            ExprKind::Parenthetical(_) => "Parenthetical".to_string(),
            ExprKind::Prefix { op, .. } => format!("Prefix({})", op.symbol()),
            ExprKind::Postfix { op, .. } => format!("Postfix({})", op.symbol()),
            ExprKind::Binary { op, .. } => format!("Binary({})", op.symbol()),
            ExprKind::Call { args, .. } => format!("Call[{} arg(s)]", args.len()),
            ExprKind::Subscript { .. } => "Subscript".to_string(),
            ExprKind::Member { access, .. } => format!("Member({})", access.symbol()),
        }
    }

    /// Children with the role each one plays, in source order
    pub fn children(&self) -> Vec<(String, &Expr)> {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Identifier(_) => Vec::new(),
            ExprKind::Parenthetical(inner) => vec![("Group".to_string(), &**inner)],
            ExprKind::Prefix { operand, .. } | ExprKind::Postfix { operand, .. } => {
                vec![("Operand".to_string(), &**operand)]
            }
            ExprKind::Binary { left, right, .. } => vec![
                ("LeftOperand".to_string(), &**left),
                ("RightOperand".to_string(), &**right),
            ],
            ExprKind::Call { locator, args } => {
                let mut out = vec![("Callable".to_string(), &**locator)];
                out.extend(args.iter().enumerate().map(|(i, a)| (format!("Arg{}", i), a)));
                out
            }
            ExprKind::Subscript { locator, index } => vec![
                ("Locator".to_string(), &**locator),
                ("Index".to_string(), &**index),
            ],
            ExprKind::Member {
                locator, member, ..
            } => vec![
                ("Locator".to_string(), &**locator),
                ("Member".to_string(), &**member),
            ],
        }
    }

    /// The bare identifier this expression names, looking through parentheses
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            ExprKind::Parenthetical(inner) => inner.as_identifier(),
            _ => None,
        }
    }
}

impl Describe for Expr {
    fn describe(&self) -> String {
        format!("{} @ {}", self.label(), self.span)
    }
}

// ===== Statements =====

/// One `name` or `name = init` in a declaration list
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub type_tag: PrimitiveType,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub type_tag: PrimitiveType,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub return_type: PrimitiveType,
    pub name: String,
    pub params: Vec<Param>,
    /// `None` for a prototype
    pub body: Option<Block>,
}

/// Brace-delimited statement list; scoping happens at evaluation time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Else {
    If(Box<Stmt>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expression(Expr),
    Assignment {
        target: Expr,
        op: AssignOp,
        value: Expr,
    },
    Declaration(Declaration),
    If {
        condition: Expr,
        then: Block,
        otherwise: Option<Else>,
    },
    While {
        condition: Expr,
        body: Block,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        step: Option<Box<Stmt>>,
        body: Block,
    },
    Block(Block),
    Return(Option<Expr>),
    Function(Function),
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Stmt {
            kind,
            span: Span::default(),
        }
    }

    pub fn label(&self) -> String {
        match &self.kind {
            StmtKind::Expression(_) => "ExpressionStatement".to_string(),
            StmtKind::Assignment { op, .. } => format!("Assignment({})", op.symbol()),
            StmtKind::Declaration(decl) => {
                let names: Vec<&str> = decl.declarators.iter().map(|d| d.name.as_str()).collect();
                format!("Declaration<{}>[{}]", decl.type_tag, names.join(", "))
            }
            StmtKind::If { .. } => "If".to_string(),
            StmtKind::While { .. } => "While".to_string(),
            StmtKind::For { .. } => "For".to_string(),
            StmtKind::Block(_) => "Block".to_string(),
            StmtKind::Return(_) => "Return".to_string(),
            StmtKind::Function(func) => {
                let params: Vec<String> = func
                    .params
                    .iter()
                    .map(|p| format!("{} {}", p.type_tag, p.name))
                    .collect();
                format!(
                    "Function<{}> {}({}){}",
                    func.return_type,
                    func.name,
                    params.join(", "),
                    if func.body.is_none() { " prototype" } else { "" }
                )
            }
        }
    }
}

impl Describe for Stmt {
    fn describe(&self) -> String {
        format!("{} @ {}", self.label(), self.span)
    }
}

impl Describe for Block {
    fn describe(&self) -> String {
        format!("Block[{} statement(s)] @ {}", self.statements.len(), self.span)
    }
}

impl Describe for Declarator {
    fn describe(&self) -> String {
        format!("Declarator({}) @ {}", self.name, self.span)
    }
}

impl Describe for Param {
    fn describe(&self) -> String {
        format!("Param<{}>({}) @ {}", self.type_tag, self.name, self.span)
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl Describe for Module {
    fn describe(&self) -> String {
        format!(
            "Module({})[{} statement(s)] @ {}",
            self.name,
            self.statements.len(),
            self.span
        )
    }
}

// ===== Tree dump =====

/// One line of a flattened tree view
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub depth: usize,
    pub label: String,
    pub span: Span,
}

/// Flatten a module depth-first, each row labelled with its role in its parent
pub fn tree_rows(module: &Module) -> Vec<TreeRow> {
    let mut rows = vec![TreeRow {
        depth: 0,
        label: format!("Module({})", module.name),
        span: module.span,
    }];
    for (i, stmt) in module.statements.iter().enumerate() {
        push_stmt(&mut rows, 1, &format!("Statement{}", i), stmt);
    }
    rows
}

/// Indented text rendering of [`tree_rows`]
pub fn dump(module: &Module) -> String {
    tree_rows(module)
        .iter()
        .map(|row| format!("{}{} @ {}\n", "  ".repeat(row.depth), row.label, row.span))
        .collect()
}

fn push_expr(rows: &mut Vec<TreeRow>, depth: usize, role: &str, expr: &Expr) {
    rows.push(TreeRow {
        depth,
        label: format!("{}: {}", role, expr.label()),
        span: expr.span,
    });
    for (child_role, child) in expr.children() {
        push_expr(rows, depth + 1, &child_role, child);
    }
}

fn push_block(rows: &mut Vec<TreeRow>, depth: usize, role: &str, block: &Block) {
    rows.push(TreeRow {
        depth,
        label: format!("{}: Block", role),
        span: block.span,
    });
    for (i, stmt) in block.statements.iter().enumerate() {
        push_stmt(rows, depth + 1, &format!("Statement{}", i), stmt);
    }
}

fn push_stmt(rows: &mut Vec<TreeRow>, depth: usize, role: &str, stmt: &Stmt) {
    rows.push(TreeRow {
        depth,
        label: format!("{}: {}", role, stmt.label()),
        span: stmt.span,
    });
    let depth = depth + 1;
    match &stmt.kind {
        StmtKind::Expression(expr) => push_expr(rows, depth, "Expression", expr),
        StmtKind::Assignment { target, value, .. } => {
            push_expr(rows, depth, "Target", target);
            push_expr(rows, depth, "Value", value);
        }
        StmtKind::Declaration(decl) => {
            for (i, d) in decl.declarators.iter().enumerate() {
                rows.push(TreeRow {
                    depth,
                    label: format!("Decl{}: {}", i, d.name),
                    span: d.span,
                });
                if let Some(init) = &d.init {
                    push_expr(rows, depth + 1, "Init", init);
                }
            }
        }
        StmtKind::If {
            condition,
            then,
            otherwise,
        } => {
            push_expr(rows, depth, "If", condition);
            push_block(rows, depth, "Then", then);
            match otherwise {
                Some(Else::If(chained)) => push_stmt(rows, depth, "Else", chained),
                Some(Else::Block(block)) => push_block(rows, depth, "Else", block),
                None => {}
            }
        }
        StmtKind::While { condition, body } => {
            push_expr(rows, depth, "Condition", condition);
            push_block(rows, depth, "Body", body);
        }
        StmtKind::For {
            init,
            condition,
            step,
            body,
        } => {
            if let Some(init) = init {
                push_stmt(rows, depth, "Init", init);
            }
            if let Some(condition) = condition {
                push_expr(rows, depth, "Condition", condition);
            }
            if let Some(step) = step {
                push_stmt(rows, depth, "Step", step);
            }
            push_block(rows, depth, "Body", body);
        }
        StmtKind::Block(block) => {
            for (i, inner) in block.statements.iter().enumerate() {
                push_stmt(rows, depth, &format!("Statement{}", i), inner);
            }
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                push_expr(rows, depth, "Value", value);
            }
        }
        StmtKind::Function(func) => {
            if let Some(body) = &func.body {
                push_block(rows, depth, "Body", body);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.to_string()))
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(BinOp::Le.symbol(), "<=");
        for sym in ["=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>="] {
            assert_eq!(AssignOp::from_symbol(sym).map(AssignOp::symbol), Some(sym));
        }
        assert_eq!(PrefixOp::from_symbol("~"), None);
    }

    #[test]
    fn test_as_identifier_sees_through_parentheses() {
        let wrapped = Expr::new(ExprKind::Parenthetical(Box::new(ident("x"))));
        assert_eq!(wrapped.as_identifier(), Some("x"));
        let call = Expr::new(ExprKind::Call {
            locator: Box::new(ident("f")),
            args: vec![],
        });
        assert_eq!(call.as_identifier(), None);
    }

    #[test]
    fn test_tree_rows_label_roles() {
        let module = Module {
            name: "m".into(),
            statements: vec![Stmt::new(StmtKind::Expression(Expr::new(ExprKind::Binary {
                op: BinOp::Add,
                left: Box::new(ident("a")),
                right: Box::new(ident("b")),
            })))],
            span: Span::default(),
        };
        let labels: Vec<String> = tree_rows(&module).into_iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                "Module(m)",
                "Statement0: ExpressionStatement",
                "Expression: Binary(+)",
                "LeftOperand: Identifier(a)",
                "RightOperand: Identifier(b)",
            ]
        );
    }

    #[test]
    fn test_span_display_and_contains() {
        let span = Span::new(Position::new(1, 1, 0), Position::new(2, 3, 9));
        assert_eq!(span.to_string(), "ln1:1-2:3");
        assert!(span.contains(0));
        assert!(!span.contains(9));
    }
}
