//! Primitive type table
//!
//! Types are only used to tag declarations, literals, and bindings. Nothing in
//! the pipeline checks them; a `float` variable may end up holding an `int`.

use std::fmt;

/// Primitive types recognised in declarations and function signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Float,
    Bool,
    Char,
    Void,
}

/// Keywords that may start a declaration
pub const TYPE_KEYWORDS: [&str; 5] = ["int", "float", "char", "void", "bool"];

impl PrimitiveType {
    /// Look up the type named by a keyword
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(PrimitiveType::Int),
            "float" => Some(PrimitiveType::Float),
            "bool" => Some(PrimitiveType::Bool),
            "char" => Some(PrimitiveType::Char),
            "void" => Some(PrimitiveType::Void),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Char => "char",
            PrimitiveType::Void => "void",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
