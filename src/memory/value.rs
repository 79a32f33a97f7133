//! Runtime value representation
//!
//! Values are tagged: an `int` binding holds [`Value::Int`], a `float`
//! literal evaluates to [`Value::Float`], and so on. Declared types are not
//! enforced, so any binding may hold any variant.
//!
//! # Numeric views
//!
//! `bool` and `char` take part in arithmetic through their integer codes
//! (`true` is 1, `'a'` is 97). Mixing an integer with a float promotes the
//! integer to a float.

use crate::trace::Describe;
use crate::types::PrimitiveType;
use std::fmt;

/// Runtime values in the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// Declared without an initializer, or a `return;` from a function
    #[default]
    Absent,
}

/// Operand view used by the arithmetic helpers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Value {
    /// C truthiness: zero, `0.0`, `false`, `'\0'`, and absent values are false
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::Char(c) => *c != '\0',
            Value::Absent => false,
        }
    }

    /// Numeric view of the value, `None` for [`Value::Absent`]
    pub fn as_numeric(&self) -> Option<Numeric> {
        match self {
            Value::Int(n) => Some(Numeric::Int(*n)),
            Value::Float(f) => Some(Numeric::Float(*f)),
            Value::Bool(b) => Some(Numeric::Int(i64::from(*b))),
            Value::Char(c) => Some(Numeric::Int(i64::from(u32::from(*c)))),
            Value::Absent => None,
        }
    }

    /// The primitive type this value naturally carries
    pub fn type_tag(&self) -> Option<PrimitiveType> {
        match self {
            Value::Int(_) => Some(PrimitiveType::Int),
            Value::Float(_) => Some(PrimitiveType::Float),
            Value::Bool(_) => Some(PrimitiveType::Bool),
            Value::Char(_) => Some(PrimitiveType::Char),
            Value::Absent => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_tag().map_or("absent", PrimitiveType::keyword)
    }
}

impl Numeric {
    pub fn into_value(self) -> Value {
        match self {
            Numeric::Int(n) => Value::Int(n),
            Numeric::Float(f) => Value::Float(f),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(n) => n as f64,
            Numeric::Float(f) => f,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            // Keep a trailing ".0" so floats read as floats
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "'{}'", c.escape_default()),
            Value::Absent => f.write_str("<absent>"),
        }
    }
}

impl Describe for Value {
    fn describe(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::Int(-3).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(!Value::Char('\0').is_truthy());
        assert!(Value::Char('a').is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Absent.is_truthy());
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(Value::Bool(true).as_numeric(), Some(Numeric::Int(1)));
        assert_eq!(Value::Char('a').as_numeric(), Some(Numeric::Int(97)));
        assert_eq!(Value::Float(2.5).as_numeric(), Some(Numeric::Float(2.5)));
        assert_eq!(Value::Absent.as_numeric(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Int(12).to_string(), "12");
        assert_eq!(Value::Char('\n').to_string(), "'\\n'");
    }
}
